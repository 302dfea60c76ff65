use crate::task::StudyTask;
use chrono::NaiveDate;
use std::collections::HashSet;
use thiserror::Error;

/// Rejections raised where tasks enter the registry. The allocator itself
/// accepts anything and degrades instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskValidationError {
    #[error("task id must not be empty")]
    EmptyId,

    #[error("duplicate task id {0}")]
    DuplicateId(String),

    #[error("task {id} starts on {start}, after its end date {end}")]
    InvertedDates {
        id: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("task {id} has invalid total hours {hours} (must be a finite, non-negative number)")]
    InvalidHours { id: String, hours: f64 },
}

pub fn validate_task(task: &StudyTask) -> Result<(), TaskValidationError> {
    if task.id.trim().is_empty() {
        return Err(TaskValidationError::EmptyId);
    }

    if task.start_date > task.end_date {
        return Err(TaskValidationError::InvertedDates {
            id: task.id.clone(),
            start: task.start_date,
            end: task.end_date,
        });
    }

    if !task.total_hours.is_finite() || task.total_hours < 0.0 {
        return Err(TaskValidationError::InvalidHours {
            id: task.id.clone(),
            hours: task.total_hours,
        });
    }

    Ok(())
}

pub fn validate_task_collection(tasks: &[StudyTask]) -> Result<(), TaskValidationError> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert(task.id.as_str()) {
            return Err(TaskValidationError::DuplicateId(task.id.clone()));
        }
        validate_task(task)?;
    }
    Ok(())
}
