use crate::calculations::generate_study_plan;
use crate::plan::{PlanOptions, PlanResult};
use crate::task::StudyTask;
use crate::task_validation::{self, TaskValidationError};
use tracing::debug;

/// In-memory task list backing the CLI and HTTP front-ends.
///
/// Insertion order is preserved; it is the order the allocator walks in its
/// leftover-capacity pass and the order of `task_status` in a plan.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: Vec<StudyTask>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<StudyTask>) -> Result<Self, TaskValidationError> {
        task_validation::validate_task_collection(&tasks)?;
        Ok(Self { tasks })
    }

    pub fn tasks(&self) -> &[StudyTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn find_task(&self, id: &str) -> Option<&StudyTask> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Inserts the task, or replaces the one with the same id in place.
    /// Returns true when an existing task was replaced.
    pub fn upsert_task(&mut self, task: StudyTask) -> Result<bool, TaskValidationError> {
        task_validation::validate_task(&task)?;
        match self.tasks.iter_mut().find(|existing| existing.id == task.id) {
            Some(existing) => {
                debug!(task = %task.id, "task replaced");
                *existing = task;
                Ok(true)
            }
            None => {
                debug!(task = %task.id, "task added");
                self.tasks.push(task);
                Ok(false)
            }
        }
    }

    /// Applies `mutator` to a copy of the task and stores it only if the
    /// result still validates.
    pub fn update_task_with<F>(&mut self, id: &str, mutator: F) -> Result<bool, TaskValidationError>
    where
        F: FnOnce(&mut StudyTask),
    {
        let Some(mut task) = self.find_task(id).cloned() else {
            return Ok(false);
        };
        mutator(&mut task);
        task.id = id.to_string();
        self.upsert_task(task)?;
        Ok(true)
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        before != self.tasks.len()
    }

    pub fn plan(&self, options: &PlanOptions) -> PlanResult {
        generate_study_plan(&self.tasks, options)
    }
}
