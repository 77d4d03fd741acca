mod app;
mod auth;
mod clock;
mod commands;
mod config;
mod db;
mod error;
mod logging;
mod models;
mod projects;
mod report;
mod tasks;
mod team;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{error, info};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::app::AppState;
use crate::commands::AdminAccount;
use crate::config::Overrides;
use crate::models::Role;
use crate::report::ReportGenerator;
use crate::ui::components::popup::Notice;

const TICK: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "time_tracker", version, about = "Track employee work hours, tasks and time reports")]
struct Cli {
    /// SQLite database URL, overrides DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Directory for exported reports, overrides REPORT_DIR
    #[arg(long, global = true)]
    report_dir: Option<String>,

    /// Log file path, overrides LOG_FILE
    #[arg(long, global = true)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the interactive terminal UI (default)
    Run,
    /// Create a department
    AddDepartment { name: String },
    /// Create an administrator account
    AddAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        department: String,
        #[arg(long, default_value = "Administrator")]
        position: String,
    },
    /// Rename a department
    RenameDepartment {
        name: String,
        new_name: String,
    },
    /// Delete a department that has no employees or projects
    RemoveDepartment { name: String },
    /// Change an employee's role
    SetRole {
        #[arg(long)]
        email: String,
        #[arg(long, value_enum)]
        role: Role,
    },
    /// Delete an employee with no projects, tasks or time records
    RemoveEmployee {
        #[arg(long)]
        email: String,
    },
    /// Generate and export a time report without the UI
    Report {
        #[arg(long)]
        email: String,
        /// First day, YYYY-MM-DD
        #[arg(long)]
        from: NaiveDate,
        /// Last day, YYYY-MM-DD
        #[arg(long)]
        to: NaiveDate,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init(Overrides {
        database_url: cli.database_url,
        report_dir: cli.report_dir,
        log_file: cli.log_file,
    })?;
    logging::init(&config)?;

    // Initialize database connection
    let db = db::init(&config).await?;
    let report_generator = ReportGenerator::new(&config.report_dir);
    let now = Local::now().naive_local();

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(db, report_generator).await?,
        Command::AddDepartment { name } => {
            let id = commands::add_department(&db, &name, now).await?;
            println!("Department '{}' created with id {}", name.trim(), id);
        }
        Command::AddAdmin {
            email,
            password,
            first_name,
            last_name,
            department,
            position,
        } => {
            let account = AdminAccount {
                email,
                password,
                first_name,
                last_name,
                department,
                position,
            };
            let id = commands::add_admin(&db, &account, now).await?;
            println!("Administrator {} created with id {}", account.email, id);
        }
        Command::RenameDepartment { name, new_name } => {
            commands::rename_department(&db, &name, &new_name).await?;
            println!("Department '{}' renamed to '{}'", name.trim(), new_name.trim());
        }
        Command::RemoveDepartment { name } => {
            commands::remove_department(&db, &name).await?;
            println!("Department '{}' removed", name.trim());
        }
        Command::SetRole { email, role } => {
            let employee = commands::set_role(&db, &email, role, now).await?;
            println!("{} is now {}", employee.full_name(), employee.role.label());
        }
        Command::RemoveEmployee { email } => {
            commands::remove_employee(&db, &email).await?;
            println!("Employee {} removed", email.trim());
        }
        Command::Report { email, from, to } => {
            let path = commands::report(&db, &report_generator, &email, from, to, now).await?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

async fn run(db: db::Database, report_generator: ReportGenerator) -> Result<()> {
    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::new(db, report_generator);
    info!("terminal UI started");

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!(error = %err, "terminal UI stopped with an error");
        println!("Error: {}", err);
    }
    info!("terminal UI closed");

    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|f| app_state.render(f))?;

        // A poll timeout is the once-a-second tick
        if !event::poll(TICK)? {
            app_state.tick();
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app_state.handle_key(key.code).await {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => app_state.notice = Some(Notice::error(err.to_string())),
        }
    }

    Ok(())
}
