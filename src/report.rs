use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use crate::clock::format_hours_minutes;
use crate::db::{day_bounds, Database};
use crate::error::TrackerError;
use crate::models::{Employee, Report, Task, TaskStatus, TimeEntry, TIME_SHEET};

const DATE_FORMAT: &str = "%d.%m.%Y";

/// Service for producing time sheet reports and writing them to text files
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Build the report for `employee` over `from..=to` and store it.
    pub async fn generate(
        &self,
        db: &Database,
        employee: &Employee,
        from: NaiveDate,
        to: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<Report> {
        if from > to {
            return Err(TrackerError::InvalidDateRange.into());
        }

        let (range_start, _) = day_bounds(from);
        let (_, range_end) = day_bounds(to);
        let entries = db
            .get_closed_time_entries(employee.id, range_start, range_end)
            .await?;
        let assigned = db.get_tasks_by_assignee(employee.id).await?;
        let completed = db
            .get_tasks_by_assignee_and_status(employee.id, TaskStatus::Done)
            .await?;

        // Entries may point at tasks assigned to someone else
        let mut task_titles: HashMap<i64, String> =
            assigned.iter().map(|t| (t.id, t.title.clone())).collect();
        for task_id in entries.iter().filter_map(|e| e.task_id) {
            if !task_titles.contains_key(&task_id) {
                let task = db.get_task(task_id).await?;
                task_titles.insert(task.id, task.title);
            }
        }

        let total_minutes = total_minutes(&entries);
        let mut report = Report {
            id: 0,
            title: format!(
                "Time report {} {} - {}",
                employee.full_name(),
                from.format(DATE_FORMAT),
                to.format(DATE_FORMAT)
            ),
            report_type: TIME_SHEET.to_string(),
            start_date: from,
            end_date: to,
            total_minutes,
            report_data: render_text(employee, from, to, &entries, &task_titles, &completed),
            created_by: employee.id,
            created_at: now,
        };
        report.id = db.create_report(&report).await?;

        info!(report_id = report.id, employee_id = employee.id, total_minutes, "report generated");
        Ok(report)
    }

    /// Write the report text to `Report_<last name>_<yyyymmdd>.txt`.
    pub fn export(&self, report: &Report, employee: &Employee, today: NaiveDate) -> Result<PathBuf> {
        if !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir)
                .with_context(|| format!("create report directory {}", self.output_dir.display()))?;
        }

        let path = self.output_dir.join(export_file_name(employee, today));
        let mut file = File::create(&path)
            .with_context(|| format!("create report file {}", path.display()))?;
        file.write_all(report.report_data.as_bytes())?;

        info!(report_id = report.id, path = %path.display(), "report exported");
        Ok(path)
    }
}

pub fn export_file_name(employee: &Employee, today: NaiveDate) -> String {
    format!("Report_{}_{}.txt", employee.last_name, today.format("%Y%m%d"))
}

pub fn total_minutes(entries: &[TimeEntry]) -> i64 {
    entries.iter().filter_map(|e| e.duration_minutes).sum()
}

fn render_text(
    employee: &Employee,
    from: NaiveDate,
    to: NaiveDate,
    entries: &[TimeEntry],
    task_titles: &HashMap<i64, String>,
    completed: &[Task],
) -> String {
    let total = total_minutes(entries);
    let mut content = String::new();

    content.push_str("WORK TIME REPORT\n\n");
    content.push_str(&format!("Employee: {}\n", employee.full_name()));
    content.push_str(&format!(
        "Period: {} - {}\n",
        from.format(DATE_FORMAT),
        to.format(DATE_FORMAT)
    ));
    content.push_str(&format!(
        "Total time: {} ({} minutes)\n\n",
        format_hours_minutes(total),
        total
    ));

    content.push_str("DAILY DETAILS\n\n");

    let mut by_day: BTreeMap<NaiveDate, Vec<&TimeEntry>> = BTreeMap::new();
    for entry in entries {
        by_day.entry(entry.start_time.date()).or_default().push(entry);
    }

    for (day, mut day_entries) in by_day {
        day_entries.sort_by_key(|e| e.start_time);
        let day_minutes: i64 = day_entries.iter().filter_map(|e| e.duration_minutes).sum();
        content.push_str(&format!(
            "{} - {}\n",
            day.format(DATE_FORMAT),
            format_hours_minutes(day_minutes)
        ));

        for entry in day_entries {
            let label = entry
                .task_id
                .and_then(|id| task_titles.get(&id))
                .map(String::as_str)
                .unwrap_or("Work day");
            let end = entry
                .end_time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default();
            content.push_str(&format!(
                "  {}-{}: {} ({} min)\n",
                entry.start_time.format("%H:%M"),
                end,
                label,
                entry.duration_minutes.unwrap_or(0)
            ));
        }
        content.push('\n');
    }

    content.push_str("COMPLETED TASKS\n\n");

    if completed.is_empty() {
        content.push_str("No completed tasks\n");
    } else {
        for task in completed {
            content.push_str(&format!("• {}\n", task.title));
            if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
                content.push_str(&format!("  {}\n", description));
            }
            content.push('\n');
        }
    }

    content
}
