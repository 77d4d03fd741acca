pub mod components;
pub mod dashboard;
pub mod login;
pub mod my_tasks;
pub mod project_wizard;
pub mod projects;
pub mod register;
pub mod reports;
pub mod task_manager;
pub mod task_wizard;
pub mod team;
pub mod time_tracker;
