//! Core traits shared by the model crates

use uuid::Uuid;

/// Primary key type for employees, projects and tasks
pub type Id = Uuid;

/// Trait for entities that have a primary key
pub trait Identifiable {
    fn id(&self) -> Id;
}

/// Trait for entities that may be assigned to an employee
pub trait Assignable {
    fn assigned_employee_id(&self) -> Option<Id>;

    fn is_assigned_to(&self, employee_id: Id) -> bool {
        self.assigned_employee_id() == Some(employee_id)
    }
}

/// Position of the entity with `id`; the first one wins on duplicates
pub fn position_of<T: Identifiable>(items: &[T], id: Id) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}
