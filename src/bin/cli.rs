use chrono::{NaiveDate, Weekday};
use study_plan::{
    PlanOptions, PlanResult, PlannerConfig, StudyTask, TaskRegistry, TaskType, format_range,
};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            if len > widths[ci] {
                widths[ci] = len;
            }
        }
    }

    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&widths, headers));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&render_row(&widths, &cells));
        out.push('\n');
    }
    out.push_str(&sep);
    out
}

fn render_row(widths: &[usize], cells: &[&str]) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.iter().enumerate() {
        line.push(' ');
        line.push_str(cell);
        let pad = widths[ci].saturating_sub(cell.chars().count());
        line.push_str(&" ".repeat(pad));
        line.push_str(" |");
    }
    line
}

fn render_tasks(registry: &TaskRegistry) -> String {
    let rows: Vec<Vec<String>> = registry
        .tasks()
        .iter()
        .map(|task| {
            vec![
                task.id.clone(),
                task.display_title().to_string(),
                task.task_type.to_string(),
                task.start_date.to_string(),
                task.end_date.to_string(),
                task.required_hours().to_string(),
                task.max_hours_per_week
                    .map(|cap| cap.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                task.available_days
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(","),
            ]
        })
        .collect();
    render_text_table(
        &["id", "title", "type", "start", "end", "hours", "cap/week", "days"],
        &rows,
    )
}

fn render_weeks(plan: &PlanResult) -> String {
    let mut rows = Vec::new();
    for week in &plan.weeks {
        let range = format_range(week.week.start, week.week.end);
        let usage = format!("{}/{}h", week.used_hours, week.week.capacity_hours);
        if week.rows.is_empty() {
            rows.push(vec![
                week.week.index.to_string(),
                range,
                usage,
                "-".to_string(),
                String::new(),
                String::new(),
                String::new(),
            ]);
            continue;
        }
        for (ri, row) in week.rows.iter().enumerate() {
            let (index, range, usage) = if ri == 0 {
                (week.week.index.to_string(), range.clone(), usage.clone())
            } else {
                (String::new(), String::new(), String::new())
            };
            rows.push(vec![
                index,
                range,
                usage,
                row.title.clone(),
                row.task_type.to_string(),
                row.hours.to_string(),
                row.deadline.to_string(),
            ]);
        }
    }
    render_text_table(
        &["week", "range", "used", "task", "type", "hours", "deadline"],
        &rows,
    )
}

fn render_status(plan: &PlanResult, registry: &TaskRegistry) -> String {
    let rows: Vec<Vec<String>> = plan
        .task_status
        .iter()
        .map(|status| {
            let title = registry
                .find_task(&status.task_id)
                .map(|task| task.display_title().to_string())
                .unwrap_or_default();
            vec![
                status.task_id.clone(),
                title,
                status.required_hours.to_string(),
                status.allocated_total_hours.to_string(),
                status.remaining_hours.to_string(),
                status.deadline.to_string(),
                status.risk.as_str().to_string(),
            ]
        })
        .collect();
    let mut out = render_text_table(
        &["id", "title", "required", "allocated", "remaining", "deadline", "risk"],
        &rows,
    );
    for notice in &plan.notices {
        let label = match notice.kind {
            study_plan::NoticeKind::Warning => "warning",
            study_plan::NoticeKind::Danger => "danger",
        };
        out.push_str(&format!("\n[{label}] {}", notice.message));
    }
    out
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_days(s: &str) -> Result<Vec<Weekday>, String> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<Weekday>().map_err(|_| format!("Invalid weekday '{p}'")))
        .collect()
}

fn print_help() {
    let types = TaskType::variants()
        .iter()
        .map(TaskType::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show tasks\n  add <id> <start> <end> <hours> [cap|-] [title...]\n                                     Upsert a task (dates YYYY-MM-DD)\n  type <id> <type>                   Set task type ({types})\n  days <id> <Mon,Tue,...>            Set preferred study days\n  delete <id>                        Delete a task\n  hours [n]                          Show or set weekly study hours\n  plan                               Show the weekly allocation\n  status                             Show per-task fulfilment and notices\n  summary                            One-line plan summary\n  quit|exit                          Exit"
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = match PlannerConfig::load(None) {
        Ok(config) => config,
        Err(e) => {
            println!("Config error: {e}; using defaults");
            PlannerConfig::default()
        }
    };
    let mut weekly_hours = config.weekly_hours;
    let mut registry = TaskRegistry::new();

    println!("Study Planner (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => println!("{}", render_tasks(&registry)),
            "add" => {
                let (Some(id), Some(start_s), Some(end_s), Some(hours_s)) =
                    (parts.next(), parts.next(), parts.next(), parts.next())
                else {
                    println!("Usage: add <id> <start> <end> <hours> [cap|-] [title...]");
                    continue;
                };
                let (Some(start), Some(end)) = (parse_date(start_s), parse_date(end_s)) else {
                    println!("Invalid date (YYYY-MM-DD)");
                    continue;
                };
                let hours: f64 = match hours_s.parse() {
                    Ok(v) => v,
                    Err(_) => {
                        println!("Invalid hours");
                        continue;
                    }
                };
                let cap = match parts.next() {
                    None | Some("-") => None,
                    Some(cap_s) => match cap_s.parse::<u32>() {
                        Ok(v) => Some(v),
                        Err(_) => {
                            println!("Invalid cap");
                            continue;
                        }
                    },
                };
                let title = parts.collect::<Vec<_>>().join(" ");

                let mut task = StudyTask::new(id, title, start, end, hours);
                task.max_hours_per_week = cap;
                if let Some(existing) = registry.find_task(id) {
                    task.task_type = existing.task_type;
                    task.available_days = existing.available_days.clone();
                }
                match registry.upsert_task(task) {
                    Ok(_) => {
                        println!("Task {id} saved.");
                        println!("{}", render_tasks(&registry));
                    }
                    Err(e) => println!("Error: {e}"),
                }
            }
            "type" => {
                let (Some(id), Some(type_s)) = (parts.next(), parts.next()) else {
                    println!("Usage: type <id> <type>");
                    continue;
                };
                let rest = parts.collect::<Vec<_>>().join(" ");
                let raw = if rest.is_empty() {
                    type_s.to_string()
                } else {
                    format!("{type_s} {rest}")
                };
                let task_type = match raw.parse::<TaskType>() {
                    Ok(t) => t,
                    Err(e) => {
                        println!("Error: {e}");
                        continue;
                    }
                };
                match registry.update_task_with(id, |task| task.task_type = task_type) {
                    Ok(true) => println!("Task {id} type set to {task_type}."),
                    Ok(false) => println!("Task {id} not found."),
                    Err(e) => println!("Error: {e}"),
                }
            }
            "days" => {
                let (Some(id), Some(days_s)) = (parts.next(), parts.next()) else {
                    println!("Usage: days <id> <Mon,Tue,...>");
                    continue;
                };
                let days = match parse_days(days_s) {
                    Ok(days) => days,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                match registry.update_task_with(id, |task| task.available_days = days) {
                    Ok(true) => println!("Task {id} study days set."),
                    Ok(false) => println!("Task {id} not found."),
                    Err(e) => println!("Error: {e}"),
                }
            }
            "delete" => match parts.next() {
                Some(id) => {
                    if registry.delete_task(id) {
                        println!("Deleted task {id}.");
                    } else {
                        println!("Task {id} not found.");
                    }
                }
                None => println!("Usage: delete <id>"),
            },
            "hours" => match parts.next() {
                None => println!("Weekly hours: {weekly_hours}"),
                Some(v) => match v.parse::<f64>() {
                    Ok(h) if h.is_finite() && h > 0.0 => {
                        weekly_hours = h;
                        println!("Weekly hours set to {h}.");
                    }
                    _ => println!("Weekly hours must be a positive number"),
                },
            },
            "plan" => {
                let plan = registry.plan(&PlanOptions::new(weekly_hours));
                if plan.weeks.is_empty() {
                    println!("No tasks to plan.");
                } else {
                    println!("{}", render_weeks(&plan));
                }
            }
            "status" => {
                let plan = registry.plan(&PlanOptions::new(weekly_hours));
                println!("{}", render_status(&plan, &registry));
            }
            "summary" => {
                let plan = registry.plan(&PlanOptions::new(weekly_hours));
                println!("Plan ({})", plan.summary_line());
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
