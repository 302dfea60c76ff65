use crate::calendar;
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type TaskId = String;

pub const UNTITLED_TASK: &str = "Untitled task";

/// Category tag carried through to allocation rows untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskType {
    Assignment,
    Lecture,
    Lab,
    #[serde(rename = "Exam Prep")]
    ExamPrep,
    #[default]
    Other,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Assignment => "Assignment",
            TaskType::Lecture => "Lecture",
            TaskType::Lab => "Lab",
            TaskType::ExamPrep => "Exam Prep",
            TaskType::Other => "Other",
        }
    }

    pub fn variants() -> &'static [TaskType] {
        &[
            TaskType::Assignment,
            TaskType::Lecture,
            TaskType::Lab,
            TaskType::ExamPrep,
            TaskType::Other,
        ]
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "assignment" => Ok(TaskType::Assignment),
            "lecture" => Ok(TaskType::Lecture),
            "lab" => Ok(TaskType::Lab),
            "examprep" => Ok(TaskType::ExamPrep),
            "other" => Ok(TaskType::Other),
            _ => Err(format!("unknown task type '{value}'")),
        }
    }
}

/// A unit of study work with an inclusive date window and an hour budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyTask {
    pub id: TaskId,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Fractional hours are accepted on the wire and floored before use.
    pub total_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hours_per_week: Option<u32>,
    /// Preferred study days. Stored for the UI; the allocator ignores it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_days: Vec<Weekday>,
}

impl StudyTask {
    pub fn new(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_hours: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            task_type: TaskType::default(),
            start_date,
            end_date,
            total_hours,
            max_hours_per_week: None,
            available_days: Vec::new(),
        }
    }

    pub fn with_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    pub fn with_max_hours_per_week(mut self, cap: u32) -> Self {
        self.max_hours_per_week = Some(cap);
        self
    }

    pub fn with_available_days(mut self, days: Vec<Weekday>) -> Self {
        self.available_days = days;
        self
    }

    /// Whole hours the task needs: `max(0, floor(total_hours))`.
    pub fn required_hours(&self) -> u32 {
        floor_hours(self.total_hours)
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            UNTITLED_TASK
        } else {
            &self.title
        }
    }

    /// Whether the task's window overlaps the inclusive range `[start, end]`.
    pub fn is_active_between(&self, start: NaiveDate, end: NaiveDate) -> bool {
        calendar::intervals_overlap(self.start_date, self.end_date, start, end)
    }
}

/// Floors a wire hour quantity into whole non-negative hours.
/// NaN and negative values become zero; huge values saturate.
pub fn floor_hours(value: f64) -> u32 {
    if !value.is_finite() {
        return if value == f64::INFINITY { u32::MAX } else { 0 };
    }
    if value <= 0.0 {
        return 0;
    }
    let floored = value.floor();
    if floored >= u32::MAX as f64 {
        u32::MAX
    } else {
        floored as u32
    }
}
