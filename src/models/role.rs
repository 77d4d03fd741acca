/// Fixed set of roles. Roles only gate which screens a user can open.
#[derive(sqlx::Type, clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Role {
    Employee = 1,
    Manager = 2,
    Administrator = 3,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Employee, Role::Manager, Role::Administrator];

    pub fn label(self) -> &'static str {
        match self {
            Role::Employee => "Employee",
            Role::Manager => "Department manager",
            Role::Administrator => "System administrator",
        }
    }

    pub fn can_manage_tasks(self) -> bool {
        matches!(self, Role::Manager | Role::Administrator)
    }

    pub fn can_register(self) -> bool {
        matches!(self, Role::Manager | Role::Administrator)
    }

    pub fn can_view_team(self) -> bool {
        self == Role::Manager
    }
}
