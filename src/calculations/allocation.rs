use crate::calendar::{self, WeekWindow};
use crate::plan::{
    AllocationRow, PlanNotice, PlanOptions, PlanResult, PlanTotals, TaskRisk, TaskStatus,
    WeekAllocation, WeekBucket,
};
use crate::task::StudyTask;
use chrono::NaiveDate;
use std::cmp::Ordering;
use tracing::{debug, info, instrument};

/// Distributes every task's hours across the Monday-aligned weeks of the
/// combined task window. See [`Allocator`] for the rules.
pub fn generate_study_plan(tasks: &[StudyTask], options: &PlanOptions) -> PlanResult {
    Allocator::new(tasks, options).execute()
}

/// Week-by-week greedy allocator.
///
/// Each week with capacity runs two passes over the tasks active in it:
///
/// 1. Tasks are ranked by pressure (`remaining / weeks_left`, descending,
///    earlier deadline first on ties) and each is granted up to its even-spread
///    baseline `ceil(remaining / weeks_left)`.
/// 2. Leftover capacity is handed out one hour at a time, round-robin in task
///    order, until the week is full or no task can take another hour.
///
/// Grants never exceed the week's capacity, a task's weekly cap, or its
/// remaining requirement. Infeasible tasks are reported through
/// [`TaskStatus::remaining_hours`], never as an error.
pub struct Allocator<'a> {
    tasks: &'a [StudyTask],
    capacity: u32,
}

/// Ranking key for pass 1.
struct Urgency {
    slot: usize,
    remaining: u32,
    weeks_left: u32,
    deadline: NaiveDate,
}

impl Urgency {
    /// Compares `remaining / weeks_left` exactly, without floating point.
    fn cmp_pressure(&self, other: &Self) -> Ordering {
        let lhs = self.remaining as u64 * other.weeks_left as u64;
        let rhs = other.remaining as u64 * self.weeks_left as u64;
        lhs.cmp(&rhs)
    }
}

impl<'a> Allocator<'a> {
    pub fn new(tasks: &'a [StudyTask], options: &PlanOptions) -> Self {
        Self {
            tasks,
            capacity: options.capacity_hours(),
        }
    }

    #[instrument(skip(self), fields(tasks = self.tasks.len(), capacity = self.capacity))]
    pub fn execute(&self) -> PlanResult {
        let (Some(plan_start), Some(plan_end)) = (
            self.tasks.iter().map(|task| task.start_date).min(),
            self.tasks.iter().map(|task| task.end_date).max(),
        ) else {
            return PlanResult::default();
        };

        let windows = calendar::weeks_between(plan_start, plan_end);
        let mut weeks: Vec<WeekAllocation> = windows
            .iter()
            .enumerate()
            .map(|(idx, window)| {
                WeekAllocation::empty(WeekBucket {
                    index: idx + 1,
                    start: window.start,
                    end: window.end,
                    capacity_hours: self.capacity,
                })
            })
            .collect();

        // Working state is indexed by task position, so repeated ids never share hours.
        let mut remaining: Vec<u32> = self.tasks.iter().map(StudyTask::required_hours).collect();
        let mut allocated = vec![0u32; self.tasks.len()];

        for (week_idx, week) in weeks.iter_mut().enumerate() {
            let grants = self.allocate_week(&windows, week_idx, &remaining);
            for (task_idx, hours) in grants {
                let task = &self.tasks[task_idx];
                week.commit(AllocationRow {
                    task_id: task.id.clone(),
                    title: task.display_title().to_string(),
                    task_type: task.task_type,
                    hours,
                    deadline: task.end_date,
                    is_after_deadline: false,
                });
                remaining[task_idx] = remaining[task_idx].saturating_sub(hours);
                allocated[task_idx] += hours;
            }
            debug!(
                week = week.week.index,
                start = %week.week.start,
                end = %week.week.end,
                rows = week.rows.len(),
                used = week.used_hours,
                "week allocated"
            );
        }

        let task_status = self.task_status(&allocated);
        let totals = PlanTotals {
            total_required: self.tasks.iter().map(|t| t.required_hours() as u64).sum(),
            total_capacity: weeks.iter().map(|w| w.week.capacity_hours as u64).sum(),
            total_allocated: weeks.iter().map(|w| w.used_hours as u64).sum(),
        };
        let notices = self.notices(&task_status, &totals);

        let plan = PlanResult {
            weeks,
            task_status,
            totals,
            notices,
        };
        info!(summary = %plan.summary_line(), "study plan generated");
        plan
    }

    /// Returns `(task index, hours)` grants for one week, in the order each
    /// task first received hours.
    fn allocate_week(
        &self,
        windows: &[WeekWindow],
        week_idx: usize,
        remaining: &[u32],
    ) -> Vec<(usize, u32)> {
        if self.capacity == 0 {
            return Vec::new();
        }
        let window = windows[week_idx];
        let active: Vec<usize> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|&(idx, task)| {
                task.is_active_between(window.start, window.end) && remaining[idx] > 0
            })
            .map(|(idx, _)| idx)
            .collect();
        if active.is_empty() {
            return Vec::new();
        }

        let mut given = vec![0u32; active.len()];
        let mut first_grant: Vec<usize> = Vec::with_capacity(active.len());
        let mut left = self.capacity;

        let mut ranked: Vec<Urgency> = active
            .iter()
            .enumerate()
            .map(|(slot, &task_idx)| {
                let task = &self.tasks[task_idx];
                let weeks_left = windows[week_idx..]
                    .iter()
                    .filter(|w| w.overlaps(task.start_date, task.end_date))
                    .count()
                    .max(1);
                Urgency {
                    slot,
                    remaining: remaining[task_idx],
                    weeks_left: u32::try_from(weeks_left).unwrap_or(u32::MAX),
                    deadline: task.end_date,
                }
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.cmp_pressure(a)
                .then_with(|| a.deadline.cmp(&b.deadline))
        });

        for urgency in &ranked {
            if left == 0 {
                break;
            }
            let task = &self.tasks[active[urgency.slot]];
            let already = given[urgency.slot];
            let baseline = urgency.remaining.div_ceil(urgency.weeks_left);
            let grant = baseline
                .min(weekly_room(task, already))
                .min(urgency.remaining.saturating_sub(already))
                .min(left);
            if grant > 0 {
                if already == 0 {
                    first_grant.push(urgency.slot);
                }
                given[urgency.slot] += grant;
                left -= grant;
            }
        }

        // Whole round-robin rounds are granted at once; a final partial round
        // goes one hour per task in slot order.
        let headroom = |slot: usize, given: &[u32]| {
            let task = &self.tasks[active[slot]];
            remaining[active[slot]]
                .saturating_sub(given[slot])
                .min(weekly_room(task, given[slot]))
        };
        while left > 0 {
            let open: Vec<usize> = (0..active.len())
                .filter(|&slot| headroom(slot, &given) > 0)
                .collect();
            if open.is_empty() {
                break;
            }
            let open_count = u32::try_from(open.len()).unwrap_or(u32::MAX);
            let rounds = open
                .iter()
                .map(|&slot| headroom(slot, &given))
                .min()
                .unwrap_or(0)
                .min(left / open_count)
                .max(1);
            for &slot in &open {
                if left == 0 {
                    break;
                }
                let grant = rounds.min(left);
                if given[slot] == 0 {
                    first_grant.push(slot);
                }
                given[slot] += grant;
                left -= grant;
            }
        }

        first_grant
            .into_iter()
            .map(|slot| (active[slot], given[slot]))
            .collect()
    }

    fn task_status(&self, allocated: &[u32]) -> Vec<TaskStatus> {
        self.tasks
            .iter()
            .zip(allocated)
            .map(|(task, &allocated_total_hours)| {
                let required_hours = task.required_hours();
                let risk = if allocated_total_hours < required_hours {
                    TaskRisk::DeadlineRisk
                } else {
                    TaskRisk::Ok
                };
                if risk == TaskRisk::DeadlineRisk {
                    debug!(
                        task = %task.id,
                        required = required_hours,
                        allocated = allocated_total_hours,
                        "task cannot be completed within its window"
                    );
                }
                TaskStatus {
                    task_id: task.id.clone(),
                    required_hours,
                    allocated_total_hours,
                    remaining_hours: required_hours.saturating_sub(allocated_total_hours),
                    deadline: task.end_date,
                    risk,
                }
            })
            .collect()
    }

    fn notices(&self, task_status: &[TaskStatus], totals: &PlanTotals) -> Vec<PlanNotice> {
        let mut notices = Vec::new();
        if totals.total_required > totals.total_capacity {
            notices.push(PlanNotice::danger(format!(
                "Total required hours are {}h, but you only have {}h available ({}h/week).",
                totals.total_required, totals.total_capacity, self.capacity
            )));
        }
        for (task, status) in self.tasks.iter().zip(task_status) {
            if status.is_at_risk() {
                notices.push(PlanNotice::warning(format!(
                    "Deadline Risk: \"{}\" cannot be fully scheduled within its date range ({}/{}h).",
                    task.display_title(),
                    status.allocated_total_hours,
                    status.required_hours
                )));
            }
        }
        notices
    }
}

/// Hours the task may still take this week under its own cap.
fn weekly_room(task: &StudyTask, already: u32) -> u32 {
    task.max_hours_per_week
        .map_or(u32::MAX, |cap| cap.saturating_sub(already))
}
