use anyhow::Result;
use chrono::{Duration, NaiveDateTime};
use tracing::info;

use crate::db::{day_bounds, Database};
use crate::error::TrackerError;
use crate::models::Employee;

/// Whether the current employee is clocked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkDay {
    Idle,
    Running { entry_id: i64, started_at: NaiveDateTime },
}

/// Outcome of clocking out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
    pub total_minutes: i64,
}

impl SessionSummary {
    pub fn describe(&self) -> String {
        format!(
            "Work day finished!\nStart: {}\nEnd: {}\nWorked: {}\nTotal: {} minutes",
            self.started_at.format("%H:%M"),
            self.ended_at.format("%H:%M"),
            format_hours_minutes(self.total_minutes),
            self.total_minutes
        )
    }
}

pub struct WorkClock {
    employee_id: i64,
    state: WorkDay,
}

impl WorkClock {
    pub fn new(employee: &Employee) -> Self {
        Self {
            employee_id: employee.id,
            state: WorkDay::Idle,
        }
    }

    pub fn state(&self) -> WorkDay {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, WorkDay::Running { .. })
    }

    /// Pick up a work day started earlier today and not yet finished.
    pub async fn resume(&mut self, db: &Database, now: NaiveDateTime) -> Result<()> {
        let (from, to) = day_bounds(now.date());
        if let Some(entry) = db.find_open_time_entry(self.employee_id, from, to).await? {
            self.state = WorkDay::Running {
                entry_id: entry.id,
                started_at: entry.start_time,
            };
        }
        Ok(())
    }

    pub async fn start(
        &mut self,
        db: &Database,
        task_id: Option<i64>,
        now: NaiveDateTime,
    ) -> Result<NaiveDateTime> {
        if self.is_running() {
            return Err(TrackerError::WorkDayAlreadyStarted.into());
        }
        // Another session may have clocked in today without this clock knowing
        let (from, to) = day_bounds(now.date());
        if db.find_open_time_entry(self.employee_id, from, to).await?.is_some() {
            return Err(TrackerError::WorkDayAlreadyStarted.into());
        }

        let entry_id = db.create_time_entry(self.employee_id, task_id, now).await?;
        self.state = WorkDay::Running {
            entry_id,
            started_at: now,
        };

        info!(employee_id = self.employee_id, entry_id, ?task_id, "work day started");
        Ok(now)
    }

    pub async fn stop(&mut self, db: &Database, now: NaiveDateTime) -> Result<SessionSummary> {
        let WorkDay::Running { entry_id, started_at } = self.state else {
            return Err(TrackerError::WorkDayNotStarted.into());
        };

        let total_minutes = (now - started_at).num_minutes().max(0);
        db.close_time_entry(entry_id, now, total_minutes).await?;
        self.state = WorkDay::Idle;

        info!(employee_id = self.employee_id, entry_id, total_minutes, "work day finished");
        Ok(SessionSummary {
            started_at,
            ended_at: now,
            total_minutes,
        })
    }

    pub fn elapsed(&self, now: NaiveDateTime) -> Duration {
        match self.state {
            WorkDay::Idle => Duration::zero(),
            WorkDay::Running { started_at, .. } => (now - started_at).max(Duration::zero()),
        }
    }

    pub fn elapsed_text(&self, now: NaiveDateTime) -> String {
        format_elapsed(self.elapsed(now))
    }

    pub fn status_text(&self) -> &'static str {
        match self.state {
            WorkDay::Idle => "Work day not started",
            WorkDay::Running { .. } => "Work day in progress",
        }
    }
}

/// Minutes of finished sessions started on `now`'s day.
pub async fn today_summary(db: &Database, employee_id: i64, now: NaiveDateTime) -> Result<String> {
    let (from, to) = day_bounds(now.date());
    let entries = db.get_closed_time_entries(employee_id, from, to).await?;
    if entries.is_empty() {
        return Ok("No work sessions today yet".to_string());
    }

    let total: i64 = entries.iter().filter_map(|e| e.duration_minutes).sum();
    Ok(format!("Worked today: {}", format_hours_minutes(total)))
}

/// `HH:MM:SS`; hours keep counting past 24.
pub fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

pub fn format_hours_minutes(total_minutes: i64) -> String {
    format!("{} h {} min", total_minutes / 60, total_minutes % 60)
}
