use anyhow::Result;

use crate::db::Database;
use crate::models::Employee;
use crate::tasks::workload_summary;

#[derive(Debug, Clone)]
pub struct TeamMember {
    pub employee: Employee,
    pub workload: String,
}

/// Other members of the manager's department with their task workload.
pub async fn load_team(db: &Database, manager: &Employee) -> Result<Vec<TeamMember>> {
    let members = db
        .get_department_members(manager.department_id, manager.id)
        .await?;

    let mut team = Vec::with_capacity(members.len());
    for employee in members {
        let tasks = db.get_tasks_by_assignee(employee.id).await?;
        team.push(TeamMember {
            workload: workload_summary(&tasks),
            employee,
        });
    }
    Ok(team)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::{department, employee, project, task};
    use crate::models::{Role, TaskStatus};

    #[tokio::test]
    async fn team_excludes_manager_and_counts_tasks() {
        let db = Database::in_memory().await.unwrap();
        let dept = department(&db, "Research").await;
        let other = department(&db, "Sales").await;
        let manager_id = employee(&db, dept, "Grace", "Hopper", Role::Manager).await;
        let alan = employee(&db, dept, "Alan", "Turing", Role::Employee).await;
        employee(&db, dept, "Ada", "Byron", Role::Employee).await;
        employee(&db, other, "Bob", "Seller", Role::Employee).await;

        let proj = project(&db, dept, manager_id, "Enigma").await;
        task(&db, proj, alan, "Decode", TaskStatus::Done).await;
        task(&db, proj, alan, "Build bombe", TaskStatus::InProgress).await;

        let manager = db.get_employee(manager_id).await.unwrap();
        let team = load_team(&db, &manager).await.unwrap();
        let names: Vec<String> = team.iter().map(|m| m.employee.full_name()).collect();
        assert_eq!(names, vec!["Ada Byron", "Alan Turing"]);
        assert_eq!(team[0].workload, "Tasks total: 0 • Active: 0 • Completed: 0");
        assert_eq!(team[1].workload, "Tasks total: 2 • Active: 1 • Completed: 1");
    }
}
