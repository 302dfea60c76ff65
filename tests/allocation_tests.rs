use chrono::NaiveDate;
use study_plan::{
    NoticeKind, PlanOptions, PlanResult, StudyTask, TaskRisk, TaskType, generate_study_plan,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn plan(tasks: &[StudyTask], weekly_hours: f64) -> PlanResult {
    generate_study_plan(tasks, &PlanOptions::new(weekly_hours))
}

#[test]
fn empty_task_list_yields_empty_plan() {
    let result = plan(&[], 40.0);
    assert!(result.weeks.is_empty());
    assert!(result.task_status.is_empty());
    assert!(result.notices.is_empty());
    assert_eq!(result.totals.total_required, 0);
    assert_eq!(result.totals.total_capacity, 0);
    assert_eq!(result.totals.total_allocated, 0);
}

#[test]
fn short_task_is_fully_allocated_in_its_first_week() {
    // Thursday..Wednesday spans two Monday-aligned weeks
    let tasks = vec![StudyTask::new("essay", "Essay", d(2026, 1, 29), d(2026, 2, 4), 10.0)];
    let result = plan(&tasks, 40.0);

    assert_eq!(result.weeks.len(), 2);
    assert_eq!(result.weeks[0].used_hours, 10);
    assert_eq!(result.weeks[0].remaining_hours, 30);
    assert_eq!(result.weeks[1].used_hours, 0);
    assert!(result.weeks[1].rows.is_empty());

    let status = result.status_for("essay").unwrap();
    assert_eq!(status.allocated_total_hours, 10);
    assert_eq!(status.remaining_hours, 0);
    assert_eq!(status.risk, TaskRisk::Ok);
    assert!(result.notices.is_empty());
}

#[test]
fn week_buckets_are_indexed_and_share_capacity() {
    let tasks = vec![StudyTask::new("essay", "Essay", d(2026, 1, 29), d(2026, 2, 4), 10.0)];
    let result = plan(&tasks, 12.6);
    let indexes: Vec<usize> = result.weeks.iter().map(|w| w.week.index).collect();
    assert_eq!(indexes, vec![1, 2]);
    assert!(result.weeks.iter().all(|w| w.week.capacity_hours == 12));
    assert_eq!(result.weeks[0].week.start, d(2026, 1, 29));
    assert_eq!(result.weeks[1].week.end, d(2026, 2, 4));
    assert_eq!(result.totals.total_capacity, 24);
}

#[test]
fn oversubscribed_week_uses_exactly_its_capacity() {
    let tasks = vec![
        StudyTask::new("a", "Task A", d(2026, 3, 2), d(2026, 3, 8), 30.0),
        StudyTask::new("b", "Task B", d(2026, 3, 2), d(2026, 3, 8), 30.0),
    ];
    let result = plan(&tasks, 40.0);

    assert_eq!(result.weeks.len(), 1);
    assert_eq!(result.weeks[0].used_hours, 40);
    assert_eq!(result.weeks[0].remaining_hours, 0);

    let a = result.status_for("a").unwrap();
    let b = result.status_for("b").unwrap();
    assert_eq!(a.allocated_total_hours + b.allocated_total_hours, 40);
    assert_eq!(a.remaining_hours + b.remaining_hours, 20);
    // Equal pressure and deadline keep input order.
    assert_eq!(a.allocated_total_hours, 30);
    assert_eq!(b.allocated_total_hours, 10);
    assert_eq!(b.risk, TaskRisk::DeadlineRisk);

    assert_eq!(result.notices[0].kind, NoticeKind::Danger);
    assert_eq!(
        result.notices[0].message,
        "Total required hours are 60h, but you only have 40h available (40h/week)."
    );
    assert_eq!(result.notices[1].kind, NoticeKind::Warning);
    assert_eq!(
        result.notices[1].message,
        "Deadline Risk: \"Task B\" cannot be fully scheduled within its date range (10/30h)."
    );
}

#[test]
fn weekly_cap_limits_each_week_and_leaves_deficit() {
    let tasks = vec![
        StudyTask::new("lab", "Lab", d(2026, 3, 2), d(2026, 3, 22), 20.0)
            .with_type(TaskType::Lab)
            .with_max_hours_per_week(5),
    ];
    let result = plan(&tasks, 40.0);

    assert_eq!(result.weeks.len(), 3);
    for week in &result.weeks {
        assert_eq!(week.hours_for("lab"), 5);
        assert_eq!(week.rows[0].task_type, TaskType::Lab);
    }
    let status = result.status_for("lab").unwrap();
    assert_eq!(status.allocated_total_hours, 15);
    assert_eq!(status.remaining_hours, 5);
    assert_eq!(status.risk, TaskRisk::DeadlineRisk);
}

#[test]
fn zero_weekly_hours_allocates_nothing() {
    let tasks = vec![
        StudyTask::new("a", "A", d(2026, 3, 2), d(2026, 3, 15), 8.0),
        StudyTask::new("b", "B", d(2026, 3, 9), d(2026, 3, 22), 3.0),
    ];
    let result = plan(&tasks, 0.0);

    assert_eq!(result.weeks.len(), 3);
    for week in &result.weeks {
        assert_eq!(week.week.capacity_hours, 0);
        assert!(week.rows.is_empty());
    }
    for (task, status) in tasks.iter().zip(&result.task_status) {
        assert_eq!(status.remaining_hours, task.required_hours());
        assert_eq!(status.allocated_total_hours, 0);
    }
}

#[test]
fn negative_weekly_hours_behave_like_zero() {
    let tasks = vec![StudyTask::new("a", "A", d(2026, 3, 2), d(2026, 3, 8), 4.0)];
    assert_eq!(plan(&tasks, -5.0), plan(&tasks, 0.0));
}

#[test]
fn fractional_hours_are_floored_before_allocation() {
    let tasks = vec![StudyTask::new("read", "Reading", d(2026, 3, 2), d(2026, 3, 8), 7.8)];
    let result = plan(&tasks, 40.0);
    let status = result.status_for("read").unwrap();
    assert_eq!(status.required_hours, 7);
    assert_eq!(status.allocated_total_hours, 7);
    assert_eq!(result.totals.total_required, 7);
}

#[test]
fn exact_fit_is_fully_allocated() {
    let tasks = vec![StudyTask::new("proj", "Project", d(2026, 3, 2), d(2026, 3, 22), 30.0)];
    let result = plan(&tasks, 10.0);
    for week in &result.weeks {
        assert_eq!(week.used_hours, 10);
    }
    assert_eq!(result.status_for("proj").unwrap().remaining_hours, 0);
    assert!(result.notices.is_empty());
}

#[test]
fn leftover_capacity_is_shared_round_robin() {
    let tasks = vec![
        StudyTask::new("a", "A", d(2026, 3, 2), d(2026, 3, 22), 6.0),
        StudyTask::new("b", "B", d(2026, 3, 2), d(2026, 3, 22), 6.0),
        StudyTask::new("c", "C", d(2026, 3, 2), d(2026, 3, 22), 6.0),
    ];
    let result = plan(&tasks, 10.0);

    // Baseline of 2h each, then 4 leftover hours handed out a, b, c, a.
    let first = &result.weeks[0];
    assert_eq!(first.hours_for("a"), 4);
    assert_eq!(first.hours_for("b"), 3);
    assert_eq!(first.hours_for("c"), 3);

    // Second week ranks the tasks with more left first.
    let order: Vec<&str> = result.weeks[1].rows.iter().map(|r| r.task_id.as_str()).collect();
    assert_eq!(order, vec!["b", "c", "a"]);
    assert_eq!(result.weeks[1].used_hours, 8);
    assert!(result.weeks[2].rows.is_empty());
    assert!(result.task_status.iter().all(|s| s.remaining_hours == 0));
}

#[test]
fn rows_carry_display_fields() {
    let tasks = vec![
        StudyTask::new("t1", "", d(2026, 3, 2), d(2026, 3, 6), 2.0).with_type(TaskType::ExamPrep),
    ];
    let result = plan(&tasks, 40.0);
    let row = &result.weeks[0].rows[0];
    assert_eq!(row.title, "Untitled task");
    assert_eq!(row.task_type, TaskType::ExamPrep);
    assert_eq!(row.deadline, d(2026, 3, 6));
    assert!(!row.is_after_deadline);
}

#[test]
fn zero_hour_task_is_satisfied_without_rows() {
    let tasks = vec![
        StudyTask::new("done", "Done", d(2026, 3, 2), d(2026, 3, 8), 0.0),
        StudyTask::new("neg", "Negative", d(2026, 3, 2), d(2026, 3, 8), -4.0),
    ];
    let result = plan(&tasks, 40.0);
    assert!(result.weeks[0].rows.is_empty());
    assert!(result.task_status.iter().all(|s| s.risk == TaskRisk::Ok));
}

#[test]
fn inverted_task_never_becomes_active() {
    let tasks = vec![
        StudyTask::new("ok", "Fine", d(2026, 3, 2), d(2026, 3, 8), 4.0),
        StudyTask::new("bad", "Backwards", d(2026, 3, 6), d(2026, 3, 4), 4.0),
    ];
    let result = plan(&tasks, 40.0);
    assert_eq!(result.weeks.len(), 1);
    assert_eq!(result.weeks[0].hours_for("bad"), 0);
    let bad = result.status_for("bad").unwrap();
    assert_eq!(bad.allocated_total_hours, 0);
    assert_eq!(bad.remaining_hours, 4);
    assert_eq!(result.status_for("ok").unwrap().remaining_hours, 0);
}

#[test]
fn zero_weekly_cap_blocks_a_task() {
    let tasks = vec![
        StudyTask::new("paused", "Paused", d(2026, 3, 2), d(2026, 3, 8), 4.0)
            .with_max_hours_per_week(0),
    ];
    let result = plan(&tasks, 40.0);
    assert_eq!(result.totals.total_allocated, 0);
    assert_eq!(result.status_for("paused").unwrap().remaining_hours, 4);
}

#[test]
fn available_days_do_not_change_allocation() {
    use chrono::Weekday;
    let base = StudyTask::new("t", "T", d(2026, 3, 2), d(2026, 3, 22), 12.0);
    let with_days = base.clone().with_available_days(vec![Weekday::Sat]);
    assert_eq!(
        plan(&[base], 5.0).weeks,
        plan(&[with_days], 5.0).weeks
    );
}

#[test]
fn repeated_runs_are_identical() {
    let tasks = vec![
        StudyTask::new("a", "A", d(2026, 1, 29), d(2026, 2, 20), 17.0).with_max_hours_per_week(6),
        StudyTask::new("b", "B", d(2026, 2, 2), d(2026, 2, 10), 9.0),
        StudyTask::new("c", "C", d(2026, 2, 5), d(2026, 3, 1), 25.5),
    ];
    let options = PlanOptions::new(14.0);
    assert_eq!(
        generate_study_plan(&tasks, &options),
        generate_study_plan(&tasks, &options)
    );
}

#[test]
fn plan_serializes_in_dashboard_shape() {
    let tasks = vec![StudyTask::new("t1", "Essay", d(2026, 3, 2), d(2026, 3, 8), 3.0)];
    let value = serde_json::to_value(plan(&tasks, 40.0)).unwrap();
    assert_eq!(value["weeks"][0]["week"]["capacityHours"], 40);
    assert_eq!(value["weeks"][0]["rows"][0]["taskId"], "t1");
    assert_eq!(value["weeks"][0]["rows"][0]["isAfterDeadline"], false);
    assert_eq!(value["taskStatus"][0]["allocatedTotalHours"], 3);
    assert_eq!(value["taskStatus"][0]["risk"], "OK");
    assert_eq!(value["totals"]["totalAllocated"], 3);
}
