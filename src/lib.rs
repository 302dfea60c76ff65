pub mod calculations;
pub mod calendar;
pub mod config;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod plan;
pub mod registry;
pub mod task;
pub mod task_validation;

pub use calculations::{Allocator, generate_study_plan};
pub use calendar::{WeekWindow, format_range, weeks_between};
pub use config::{ConfigError, PlannerConfig};
pub use plan::{
    AllocationRow, NoticeKind, PlanNotice, PlanOptions, PlanResult, PlanTotals, TaskRisk,
    TaskStatus, WeekAllocation, WeekBucket,
};
pub use registry::TaskRegistry;
pub use task::{StudyTask, TaskId, TaskType};
pub use task_validation::{TaskValidationError, validate_task, validate_task_collection};
