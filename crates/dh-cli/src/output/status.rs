//! Human-readable service status

use tabled::{settings::Style, Table, Tabled};

use dh_core::status::ServiceStatus;

use super::{truncate, Output};

/// Format a service status as sectioned text
///
/// Shows the service summary, then a task table and an alarm table. Empty
/// sections say so rather than printing an empty table.
pub fn format_status(status: &ServiceStatus, output: &Output) -> String {
    let mut out = String::new();

    out.push_str("Service Status\n\n");
    let state = if status.is_steady() {
        status.summary.status.clone()
    } else {
        format!("{} (updating)", status.summary.status)
    };
    out.push_str(&format!(
        "  {}  {} / {} running tasks\n",
        output.highlight_user_input(&state),
        status.summary.running_count,
        status.summary.desired_count
    ));
    out.push_str(&format!(
        "  Service: {}  Environment: {}  Project: {}\n",
        status.service, status.environment, status.project
    ));
    if let Some(at) = &status.summary.last_deployed_at {
        out.push_str(&format!("  Last deployment: {}\n", at));
    }

    out.push_str("\nTask Status\n\n");
    out.push_str(&format_tasks(status));
    out.push('\n');

    out.push_str("\nAlarms\n\n");
    out.push_str(&format_alarms(status));
    out.push('\n');

    out
}

fn format_tasks(status: &ServiceStatus) -> String {
    if status.tasks.is_empty() {
        return "  No tasks running".to_string();
    }

    #[derive(Tabled)]
    struct TaskRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "IMAGE DIGEST")]
        digest: String,
        #[tabled(rename = "LAST STATUS")]
        last_status: String,
        #[tabled(rename = "HEALTH")]
        health: String,
        #[tabled(rename = "STARTED AT")]
        started_at: String,
    }

    let rows: Vec<TaskRow> = status
        .tasks
        .iter()
        .map(|t| TaskRow {
            id: truncate(&t.id, 11),
            digest: t
                .image_digest
                .as_deref()
                .map(|d| truncate(d.trim_start_matches("sha256:"), 11))
                .unwrap_or_else(|| "-".to_string()),
            last_status: t.last_status.clone(),
            health: t.health.clone().unwrap_or_else(|| "-".to_string()),
            started_at: t.started_at.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

fn format_alarms(status: &ServiceStatus) -> String {
    if status.alarms.is_empty() {
        return "  No alarms".to_string();
    }

    #[derive(Tabled)]
    struct AlarmRow {
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "TYPE")]
        kind: String,
        #[tabled(rename = "STATE")]
        state: String,
        #[tabled(rename = "REASON")]
        reason: String,
        #[tabled(rename = "LAST UPDATED")]
        updated_at: String,
    }

    let rows: Vec<AlarmRow> = status
        .alarms
        .iter()
        .map(|a| AlarmRow {
            name: a.name.clone(),
            kind: a.kind.clone(),
            state: a.state.clone(),
            reason: a
                .reason
                .as_deref()
                .map(|r| truncate(r, 40))
                .unwrap_or_else(|| "-".to_string()),
            updated_at: a.updated_at.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}
