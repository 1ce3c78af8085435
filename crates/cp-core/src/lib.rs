//! # cp-core
//!
//! Core types, traits, and utilities for Capacity Planner.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types
//! - Result type aliases
//! - Core traits (Identifiable)
//! - Calendar primitives (weekday sets, inclusive date ranges, date parsing)
//! - Configuration types

pub mod error;
pub mod result;
pub mod traits;
pub mod calendar;
pub mod config;

pub use error::*;
pub use result::*;
pub use traits::*;
pub use calendar::*;
