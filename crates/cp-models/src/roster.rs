//! The employee roster a render pass works against

use std::collections::HashMap;

use chrono::NaiveDate;
use cp_core::calendar::WeekdaySet;
use cp_core::traits::{Id, Identifiable};

use crate::employee::Employee;

/// Employees in their original order, indexed by id
#[derive(Debug, Clone, Default)]
pub struct Roster {
    employees: Vec<Employee>,
    index: HashMap<Id, usize>,
}

impl Roster {
    pub fn new(employees: Vec<Employee>) -> Self {
        let index = employees
            .iter()
            .enumerate()
            .map(|(position, employee)| (employee.id(), position))
            .collect();
        Self { employees, index }
    }

    pub fn get(&self, id: Id) -> Option<&Employee> {
        self.index.get(&id).map(|&position| &self.employees[position])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Employee> {
        self.employees.iter()
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Working days of an assignee; Monday..Friday when unassigned or unknown
    pub fn working_days_of(&self, employee_id: Option<Id>) -> WeekdaySet {
        employee_id
            .and_then(|id| self.get(id))
            .map(|employee| employee.working_days)
            .unwrap_or(WeekdaySet::WORK_WEEK)
    }

    /// Employees scheduled to work on `date`
    pub fn working_on(&self, date: NaiveDate) -> impl Iterator<Item = &Employee> {
        self.employees.iter().filter(move |e| e.works_on(date))
    }
}

impl FromIterator<Employee> for Roster {
    fn from_iter<I: IntoIterator<Item = Employee>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Employee;
    type IntoIter = std::slice::Iter<'a, Employee>;

    fn into_iter(self) -> Self::IntoIter {
        self.employees.iter()
    }
}
