use std::collections::HashMap;

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDateTime};
use crossterm::event::KeyCode;
use tracing::{error, info};
use tui::{backend::Backend, Frame};

use crate::auth;
use crate::clock::{today_summary, WorkClock};
use crate::db::Database;
use crate::error::TrackerError;
use crate::models::{Employee, Role, Task, TaskStatus};
use crate::projects;
use crate::report::ReportGenerator;
use crate::tasks;
use crate::team::load_team;
use crate::ui::{
    components::popup::{render_notice, Notice},
    dashboard::{self, DashboardState, MenuItem},
    login::{self, LoginAction, LoginState},
    my_tasks::{self, MyTasksAction, MyTasksState},
    project_wizard::{self, ProjectWizardAction, ProjectWizardState},
    projects::{self as projects_screen, ProjectAction, ProjectsState},
    register::{self, RegisterAction, RegisterState},
    reports::{self, ReportsAction, ReportsState},
    task_manager::{self, TaskManagerAction, TaskManagerState},
    task_wizard::{self, Choices, TaskWizardAction, TaskWizardState},
    team::{self, TeamState},
    time_tracker::{self, TimeTrackerAction, TimeTrackerState},
};

// The current screen together with its state
pub enum AppScreen {
    Login(LoginState),
    Register(RegisterState),
    Dashboard(DashboardState),
    TimeTracker(TimeTrackerState),
    MyTasks(MyTasksState),
    TaskManager(TaskManagerState),
    TaskWizard(TaskWizardState),
    Projects(ProjectsState),
    ProjectWizard(ProjectWizardState),
    Team(TeamState),
    Reports(ReportsState),
}

// What a key press on the current screen asks the app to do
enum Action {
    Login(LoginAction),
    Register(RegisterAction),
    Menu(MenuItem),
    TimeTracker(TimeTrackerAction),
    MyTasks(MyTasksAction),
    TaskManager(TaskManagerAction),
    TaskWizard(TaskWizardAction),
    Projects(ProjectAction),
    ProjectWizard(ProjectWizardAction),
    TeamBack,
    Reports(ReportsAction),
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::Login(_) => "sign in",
            Action::Register(_) => "register employee",
            Action::Menu(_) => "open screen",
            Action::TimeTracker(_) => "time tracker",
            Action::MyTasks(_) => "my tasks",
            Action::TaskManager(_) => "task manager",
            Action::TaskWizard(_) => "save task",
            Action::Projects(_) => "projects",
            Action::ProjectWizard(_) => "save project",
            Action::TeamBack => "team",
            Action::Reports(_) => "reports",
        }
    }
}

// Main application state
pub struct AppState {
    db: Database,
    report_generator: ReportGenerator,
    user: Option<Employee>,
    pub screen: AppScreen,
    pub notice: Option<Notice>,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl AppState {
    pub fn new(db: Database, report_generator: ReportGenerator) -> Self {
        Self {
            db,
            report_generator,
            user: None,
            screen: AppScreen::Login(LoginState::new()),
            notice: None,
        }
    }

    fn current_user(&self) -> Result<Employee> {
        self.user
            .clone()
            .ok_or_else(|| anyhow!("no employee is signed in"))
    }

    /// Refresh time-dependent labels.
    pub fn tick(&mut self) {
        if let AppScreen::TimeTracker(state) = &mut self.screen {
            state.tick(now());
        }
    }

    pub fn render<B: Backend>(&mut self, frame: &mut Frame<B>) {
        match &mut self.screen {
            AppScreen::Login(state) => login::render_login(frame, state),
            AppScreen::Register(state) => register::render_register(frame, state),
            AppScreen::Dashboard(state) => dashboard::render_dashboard(frame, state),
            AppScreen::TimeTracker(state) => time_tracker::render_time_tracker(frame, state),
            AppScreen::MyTasks(state) => my_tasks::render_my_tasks(frame, state),
            AppScreen::TaskManager(state) => task_manager::render_task_manager(frame, state),
            AppScreen::TaskWizard(state) => task_wizard::render_task_wizard(frame, state),
            AppScreen::Projects(state) => projects_screen::render_projects(frame, state),
            AppScreen::ProjectWizard(state) => project_wizard::render_project_wizard(frame, state),
            AppScreen::Team(state) => team::render_team(frame, state),
            AppScreen::Reports(state) => reports::render_reports(frame, state),
        }

        if let Some(notice) = &self.notice {
            render_notice(frame, notice);
        }
    }

    /// Handle one key press. Returns true when the app should exit.
    ///
    /// An error leaves the current screen as it was; the caller reports it.
    pub async fn handle_key(&mut self, key: KeyCode) -> Result<bool> {
        if self.notice.take().is_some() {
            return Ok(false);
        }

        match self.screen_action(key) {
            Some(action) => self.apply(action).await,
            None => Ok(false),
        }
    }

    fn screen_action(&mut self, key: KeyCode) -> Option<Action> {
        match &mut self.screen {
            AppScreen::Login(state) => login::handle_key(state, key).map(Action::Login),
            AppScreen::Register(state) => register::handle_key(state, key).map(Action::Register),
            AppScreen::Dashboard(state) => dashboard::handle_key(state, key).map(Action::Menu),
            AppScreen::TimeTracker(state) => {
                time_tracker::handle_key(state, key).map(Action::TimeTracker)
            }
            AppScreen::MyTasks(state) => my_tasks::handle_key(state, key).map(Action::MyTasks),
            AppScreen::TaskManager(state) => {
                task_manager::handle_key(state, key).map(Action::TaskManager)
            }
            AppScreen::TaskWizard(state) => {
                task_wizard::handle_key(state, key).map(Action::TaskWizard)
            }
            AppScreen::Projects(state) => {
                projects_screen::handle_key(state, key).map(Action::Projects)
            }
            AppScreen::ProjectWizard(state) => {
                project_wizard::handle_key(state, key).map(Action::ProjectWizard)
            }
            AppScreen::Team(state) => team::handle_key(state, key).then_some(Action::TeamBack),
            AppScreen::Reports(state) => reports::handle_key(state, key).map(Action::Reports),
        }
    }

    async fn apply(&mut self, action: Action) -> Result<bool> {
        let operation = action.name();
        let result = self.dispatch(action).await;
        if let Err(err) = &result {
            error!(operation, error = %err, "action failed");
        }
        result
    }

    async fn dispatch(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::Login(LoginAction::Quit) => return Ok(true),
            Action::Login(LoginAction::Submit { email, password }) => {
                self.sign_in(&email, &password).await?
            }
            Action::Menu(item) => self.open(item).await?,
            Action::TimeTracker(action) => self.on_time_tracker(action).await?,
            Action::MyTasks(action) => self.on_my_tasks(action).await?,
            Action::TaskManager(action) => self.on_task_manager(action).await?,
            Action::TaskWizard(TaskWizardAction::Cancel) => self.open_task_manager().await?,
            Action::TaskWizard(TaskWizardAction::Save(draft)) => {
                let id = tasks::save_task(&self.db, &draft).await?;
                self.open_task_manager().await?;
                if let AppScreen::TaskManager(state) = &mut self.screen {
                    state.list.select_task(id);
                }
                self.notice = Some(Notice::info("Task saved"));
            }
            Action::Projects(action) => self.on_projects(action).await?,
            Action::ProjectWizard(ProjectWizardAction::Cancel) => self.open_projects().await?,
            Action::ProjectWizard(ProjectWizardAction::Save(draft)) => {
                let user = self.current_user()?;
                projects::save_project(&self.db, &draft, &user).await?;
                self.open_projects().await?;
                self.notice = Some(Notice::info("Project saved"));
            }
            Action::TeamBack => self.open_dashboard()?,
            Action::Reports(action) => self.on_reports(action).await?,
            Action::Register(RegisterAction::Cancel) => self.open_dashboard()?,
            Action::Register(RegisterAction::Submit(form)) => {
                let user = self.current_user()?;
                auth::register(&self.db, &form, Some(&user), now()).await?;
                self.open_dashboard()?;
                self.notice = Some(Notice::info(format!(
                    "Employee {} {} registered",
                    form.first_name.trim(),
                    form.last_name.trim()
                )));
            }
        }
        Ok(false)
    }

    async fn sign_in(&mut self, email: &str, password: &str) -> Result<()> {
        match auth::authenticate(&self.db, email, password).await {
            Ok(employee) => {
                self.user = Some(employee);
                self.open_dashboard()
            }
            Err(e) if e.downcast_ref::<TrackerError>() == Some(&TrackerError::InvalidCredentials) => {
                if let AppScreen::Login(state) = &mut self.screen {
                    state.reject("Invalid email or password");
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn open(&mut self, item: MenuItem) -> Result<()> {
        match item {
            MenuItem::TimeTracker => self.open_time_tracker().await,
            MenuItem::MyTasks => self.open_my_tasks().await,
            MenuItem::TaskManager => self.open_task_manager().await,
            MenuItem::Projects => self.open_projects().await,
            MenuItem::Team => {
                let user = self.current_user()?;
                let members = load_team(&self.db, &user).await?;
                self.screen = AppScreen::Team(TeamState::new(members));
                Ok(())
            }
            MenuItem::Reports => {
                let user = self.current_user()?;
                let history = self.db.get_reports_by_creator(user.id).await?;
                self.screen = AppScreen::Reports(ReportsState::new(now().date(), history));
                Ok(())
            }
            MenuItem::Register => {
                let user = self.current_user()?;
                let departments = self.db.get_departments().await?;
                self.screen = AppScreen::Register(RegisterState::new(
                    departments,
                    user.role == Role::Administrator,
                ));
                Ok(())
            }
            MenuItem::SignOut => {
                if let Some(user) = self.user.take() {
                    info!(employee_id = user.id, "employee signed out");
                }
                self.screen = AppScreen::Login(LoginState::new());
                Ok(())
            }
        }
    }

    fn open_dashboard(&mut self) -> Result<()> {
        let user = self.current_user()?;
        self.screen = AppScreen::Dashboard(DashboardState::new(user));
        Ok(())
    }

    async fn project_names(&self) -> Result<HashMap<i64, String>> {
        let projects = self.db.get_projects().await?;
        Ok(projects.into_iter().map(|p| (p.id, p.name)).collect())
    }

    async fn open_time_tracker(&mut self) -> Result<()> {
        let user = self.current_user()?;
        let now = now();
        let mut clock = WorkClock::new(&user);
        clock.resume(&self.db, now).await?;
        let summary = today_summary(&self.db, user.id, now).await?;
        let active: Vec<Task> = self
            .db
            .get_tasks_by_assignee(user.id)
            .await?
            .into_iter()
            .filter(|t| t.status != TaskStatus::Done)
            .collect();

        self.screen = AppScreen::TimeTracker(TimeTrackerState::new(clock, summary, active, now));
        Ok(())
    }

    async fn on_time_tracker(&mut self, action: TimeTrackerAction) -> Result<()> {
        let user = self.current_user()?;
        let now = now();
        let AppScreen::TimeTracker(state) = &mut self.screen else {
            return Ok(());
        };

        match action {
            TimeTrackerAction::Back => return self.open_dashboard(),
            TimeTrackerAction::Start(task_id) => {
                let started = state.clock.start(&self.db, task_id, now).await?;
                state.tick(now);
                self.notice = Some(Notice::info(format!(
                    "Work day started at {}",
                    started.format("%H:%M")
                )));
            }
            TimeTrackerAction::End => {
                let summary = state.clock.stop(&self.db, now).await?;
                state.tick(now);
                state.summary = today_summary(&self.db, user.id, now).await?;
                self.notice = Some(Notice::info(summary.describe()));
            }
        }
        Ok(())
    }

    async fn open_my_tasks(&mut self) -> Result<()> {
        let user = self.current_user()?;
        let tasks = self.db.get_tasks_by_assignee(user.id).await?;
        let names = self.project_names().await?;
        self.screen = AppScreen::MyTasks(MyTasksState::new(tasks, names));
        Ok(())
    }

    async fn on_my_tasks(&mut self, action: MyTasksAction) -> Result<()> {
        let message = match action {
            MyTasksAction::Back => return self.open_dashboard(),
            MyTasksAction::Start(task) => {
                tasks::start_task(&self.db, &task).await?;
                format!("Task '{}' started", task.title)
            }
            MyTasksAction::Complete(task) => {
                tasks::complete_task(&self.db, &task).await?;
                format!("Task '{}' completed", task.title)
            }
        };

        let user = self.current_user()?;
        let refreshed = self.db.get_tasks_by_assignee(user.id).await?;
        if let AppScreen::MyTasks(state) = &mut self.screen {
            state.list.replace_tasks(refreshed);
        }
        self.notice = Some(Notice::info(message));
        Ok(())
    }

    async fn open_task_manager(&mut self) -> Result<()> {
        let tasks = self.db.get_tasks().await?;
        let project_names = self.project_names().await?;
        let assignee_names = self
            .db
            .get_employees()
            .await?
            .into_iter()
            .map(|e| (e.id, e.full_name()))
            .collect();
        self.screen = AppScreen::TaskManager(TaskManagerState::new(tasks, project_names, assignee_names));
        Ok(())
    }

    async fn task_choices(&self) -> Result<(Choices, Choices)> {
        let projects = self
            .db
            .get_projects()
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();
        let employees = self
            .db
            .get_employees()
            .await?
            .into_iter()
            .map(|e| (e.id, e.full_name()))
            .collect();
        Ok((projects, employees))
    }

    async fn on_task_manager(&mut self, action: TaskManagerAction) -> Result<()> {
        match action {
            TaskManagerAction::Back => return self.open_dashboard(),
            TaskManagerAction::NewTask => {
                let (projects, employees) = self.task_choices().await?;
                self.screen = AppScreen::TaskWizard(TaskWizardState::new(projects, employees));
                return Ok(());
            }
            TaskManagerAction::EditTask(task) => {
                let (projects, employees) = self.task_choices().await?;
                self.screen =
                    AppScreen::TaskWizard(TaskWizardState::from_existing(&task, projects, employees));
                return Ok(());
            }
            TaskManagerAction::DeleteTask(id) => {
                self.db.delete_task(id).await?;
                info!(task_id = id, "task deleted");
                self.notice = Some(Notice::info("Task deleted"));
            }
            TaskManagerAction::CycleStatus(task) => {
                let status = tasks::cycle_status(&self.db, &task).await?;
                self.notice = Some(Notice::info(format!(
                    "Task '{}' is now {}",
                    task.title,
                    status.label()
                )));
            }
            TaskManagerAction::Reload => {}
        }

        let refreshed = self.db.get_tasks().await?;
        if let AppScreen::TaskManager(state) = &mut self.screen {
            state.list.replace_tasks(refreshed);
        }
        Ok(())
    }

    async fn open_projects(&mut self) -> Result<()> {
        let user = self.current_user()?;
        let projects = self.db.get_projects_by_department(user.department_id).await?;
        self.screen = AppScreen::Projects(ProjectsState::new(projects));
        Ok(())
    }

    async fn on_projects(&mut self, action: ProjectAction) -> Result<()> {
        match action {
            ProjectAction::Back => self.open_dashboard(),
            ProjectAction::NewProject => {
                self.screen = AppScreen::ProjectWizard(ProjectWizardState::new(now().date()));
                Ok(())
            }
            ProjectAction::EditProject(project) => {
                self.screen = AppScreen::ProjectWizard(ProjectWizardState::from_existing(&project));
                Ok(())
            }
            ProjectAction::DeleteProject(id) => {
                projects::delete_project(&self.db, id).await?;
                self.open_projects().await
            }
        }
    }

    async fn on_reports(&mut self, action: ReportsAction) -> Result<()> {
        let user = self.current_user()?;
        match action {
            ReportsAction::Back => self.open_dashboard()?,
            ReportsAction::Generate { from, to } => {
                let report = self
                    .report_generator
                    .generate(&self.db, &user, from, to, now())
                    .await?;
                if let AppScreen::Reports(state) = &mut self.screen {
                    state.show(report);
                }
                self.notice = Some(Notice::info("Report saved"));
            }
            ReportsAction::Export(report) => {
                let path = self.report_generator.export(&report, &user, now().date())?;
                self.notice = Some(Notice::info(format!("Report exported to {}", path.display())));
            }
        }
        Ok(())
    }
}
