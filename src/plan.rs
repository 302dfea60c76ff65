use crate::task::{TaskId, TaskType, floor_hours};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Caller-supplied knobs for a single allocator run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOptions {
    pub weekly_hours: f64,
}

impl PlanOptions {
    pub fn new(weekly_hours: f64) -> Self {
        Self { weekly_hours }
    }

    /// Weekly capacity in whole hours: `max(0, floor(weekly_hours))`.
    pub fn capacity_hours(&self) -> u32 {
        floor_hours(self.weekly_hours)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBucket {
    /// 1-based position in the plan.
    pub index: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub capacity_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRow {
    pub task_id: TaskId,
    pub title: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub hours: u32,
    pub deadline: NaiveDate,
    /// Reserved for overflow scheduling past a deadline; currently always false.
    pub is_after_deadline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekAllocation {
    pub week: WeekBucket,
    pub rows: Vec<AllocationRow>,
    pub used_hours: u32,
    pub remaining_hours: u32,
}

impl WeekAllocation {
    pub fn empty(week: WeekBucket) -> Self {
        let remaining_hours = week.capacity_hours;
        Self {
            week,
            rows: Vec::new(),
            used_hours: 0,
            remaining_hours,
        }
    }

    pub fn hours_for(&self, task_id: &str) -> u32 {
        self.rows
            .iter()
            .filter(|row| row.task_id == task_id)
            .map(|row| row.hours)
            .sum()
    }

    /// Adds hours for a task, merging into its existing row for this week.
    pub(crate) fn commit(&mut self, row: AllocationRow) {
        let hours = row.hours;
        match self.rows.iter_mut().find(|existing| existing.task_id == row.task_id) {
            Some(existing) => existing.hours += hours,
            None => self.rows.push(row),
        }
        self.used_hours += hours;
        self.remaining_hours = self.week.capacity_hours.saturating_sub(self.used_hours);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskRisk {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "Deadline Risk")]
    DeadlineRisk,
}

impl TaskRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskRisk::Ok => "OK",
            TaskRisk::DeadlineRisk => "Deadline Risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    pub task_id: TaskId,
    pub required_hours: u32,
    pub allocated_total_hours: u32,
    pub remaining_hours: u32,
    pub deadline: NaiveDate,
    pub risk: TaskRisk,
}

impl TaskStatus {
    pub fn is_at_risk(&self) -> bool {
        self.risk == TaskRisk::DeadlineRisk
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTotals {
    pub total_required: u64,
    pub total_capacity: u64,
    pub total_allocated: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanNotice {
    pub kind: NoticeKind,
    pub message: String,
}

impl PlanNotice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Danger,
            message: message.into(),
        }
    }
}

/// Snapshot produced by one allocator run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub weeks: Vec<WeekAllocation>,
    pub task_status: Vec<TaskStatus>,
    pub totals: PlanTotals,
    #[serde(default)]
    pub notices: Vec<PlanNotice>,
}

impl PlanResult {
    pub fn status_for(&self, task_id: &str) -> Option<&TaskStatus> {
        self.task_status.iter().find(|status| status.task_id == task_id)
    }

    pub fn at_risk(&self) -> impl Iterator<Item = &TaskStatus> {
        self.task_status.iter().filter(|status| status.is_at_risk())
    }

    pub fn summary_line(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("weeks={}", self.weeks.len()));
        parts.push(format!("tasks={}", self.task_status.len()));
        parts.push(format!("required={}", self.totals.total_required));
        parts.push(format!("capacity={}", self.totals.total_capacity));
        parts.push(format!("allocated={}", self.totals.total_allocated));
        let at_risk = self.at_risk().count();
        if at_risk > 0 {
            parts.push(format!("at_risk={}", at_risk));
        }
        parts.join(", ")
    }
}
