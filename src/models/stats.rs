use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How many habits were done on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCompletion {
    pub date: NaiveDate,
    pub completed: u32,
    pub total: u32,
}

impl DailyCompletion {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitStats {
    pub total_habits: u32,
    pub completed_today: u32,
    /// Share of habits done today, 0..=100.
    pub completion_rate: f64,
    pub longest_streak: u32,
    pub active_streaks: u32,
    pub total_completions: u32,
    pub average_streak: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitSummary {
    pub name: String,
    pub category: String,
    pub streak: u32,
    pub best_streak: u32,
    pub total_completions: u32,
    pub completion_rate: f64,
}
