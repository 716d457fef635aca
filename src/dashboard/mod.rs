use crate::cache::TaskCache;
use crate::domain::deadline::{self, Countdown};
use crate::domain::EmployeeRecord;
use chrono::Local;
use colored::Colorize;
use std::io::{self, Write};

pub fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
    let _ = io::stdout().flush();
}

/// One rendered deadline value: live countdown, `Expired`, `N/A`, or
/// `Invalid Deadline` with the re-assign hint. Parse failures never take
/// the view down.
pub fn deadline_cell(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return "N/A".dimmed().to_string();
    };

    match deadline::parse_deadline(raw) {
        Ok(parsed) => match deadline::remaining_now(parsed) {
            Countdown::Expired => "Expired".red().bold().to_string(),
            active @ Countdown::Active { hours: 0, .. } => {
                active.to_string().yellow().bold().to_string()
            }
            active => active.to_string().green().to_string(),
        },
        Err(_) => "Invalid Deadline (re-assign)".red().to_string(),
    }
}

// ==================================================
// ADMIN ROSTER
// ==================================================

pub async fn render_admin(cache: &TaskCache) {
    let employees = cache.employees().await;
    let checked = last_checked(cache).await;

    clear_screen();
    println!("======================================================");
    println!(
        "EMPLOYEE OVERVIEW - {}   (last refresh: {})",
        Local::now().format("%H:%M:%S"),
        checked
    );
    println!("======================================================");

    if employees.is_empty() {
        if cache.last_refreshed().await.is_none() {
            println!("Loading employees...");
        } else {
            println!("No regular employees found.");
        }
        return;
    }

    for emp in &employees {
        println!("{}  [#{}]", emp.name.bold(), emp.display_id());
        if let Some(phone) = emp.phone_no.as_deref() {
            println!("   Phone:    {}", phone);
        }

        if emp.has_task() {
            println!("   Task:     {}", emp.task.as_deref().unwrap_or_default());
            let cell = deadline_cell(emp.deadline.as_deref());
            println!("   Deadline: {}", cell);

            let expired = emp
                .deadline
                .as_deref()
                .and_then(|d| deadline::parse_deadline(d).ok())
                .map(|p| deadline::remaining_now(p).is_expired())
                .unwrap_or(false);
            if expired {
                println!("   {}", "Time expired — chase or re-assign!".red().bold());
            }
        } else {
            println!("   {}", "No task assigned (idle)".dimmed());
        }
        println!("------------------------------------------------------");
    }
}

// ==================================================
// EMPLOYEE CARD
// ==================================================

pub async fn render_employee(cache: &TaskCache, email: &str) {
    let record = cache.get(email).await;
    let checked = last_checked(cache).await;

    clear_screen();
    println!("======================================================");
    println!("YOUR ASSIGNED TASK - {}", Local::now().format("%H:%M:%S"));
    println!("======================================================");

    match record {
        Some(me) => {
            if me.has_task() {
                println!("Task:     {}", me.task.as_deref().unwrap_or_default());
                println!("Deadline: {}", deadline_cell(me.deadline.as_deref()));
                println!("Status:   {}", "In Progress".yellow());
            } else {
                println!("Task:     {}", "No task assigned.".dimmed());
                println!("Status:   {}", "Idle".dimmed());
            }
        }
        None => {
            // first poll may not have landed yet, or the record vanished
            println!("Loading your record...");
        }
    }

    println!("------------------------------------------------------");
    println!("Last checked: {}   (Ctrl+C to exit)", checked);
}

async fn last_checked(cache: &TaskCache) -> String {
    cache
        .last_refreshed()
        .await
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "just now".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::deadline::format_db_deadline;
    use chrono::Duration;

    #[test]
    fn missing_deadline_renders_na() {
        colored::control::set_override(false);
        assert_eq!(deadline_cell(None), "N/A");
        assert_eq!(deadline_cell(Some("   ")), "N/A");
    }

    #[test]
    fn invalid_deadline_renders_reassign_hint() {
        colored::control::set_override(false);
        assert!(deadline_cell(Some("whenever")).contains("Invalid Deadline"));
    }

    #[test]
    fn future_deadline_renders_a_countdown() {
        colored::control::set_override(false);
        let future = Local::now().naive_local() + Duration::hours(2);
        let cell = deadline_cell(Some(&format_db_deadline(future)));
        assert!(cell.contains('h'), "expected an hour component: {}", cell);
    }

    #[test]
    fn past_deadline_renders_expired() {
        colored::control::set_override(false);
        let past = Local::now().naive_local() - Duration::hours(2);
        assert_eq!(deadline_cell(Some(&format_db_deadline(past))), "Expired");
    }
}
