mod department;
mod employee;
mod project;
mod report;
mod role;
mod task;
mod time_entry;

pub use department::Department;
pub use employee::{Employee, NewEmployee};
pub use project::{Project, ProjectStatus};
pub use report::{Report, TIME_SHEET};
pub use role::Role;
pub use task::{Task, TaskStatus};
pub use time_entry::TimeEntry;
