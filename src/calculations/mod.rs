pub mod allocation;

pub use allocation::{Allocator, generate_study_plan};
