pub mod habit;
pub mod stats;

pub use habit::{Completions, Habit, HabitFormData, HabitId};
pub use stats::{DailyCompletion, HabitStats, HabitSummary};
