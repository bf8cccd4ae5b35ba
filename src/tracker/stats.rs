use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::models::{DailyCompletion, Habit, HabitStats, HabitSummary};
use crate::tracker::calculator::completion_rate;

pub fn habit_stats(habits: &[Habit], today: NaiveDate) -> HabitStats {
    let total_habits = habits.len() as u32;
    let completed_today = habits.iter().filter(|h| h.is_completed_on(today)).count() as u32;
    let completion_rate = if total_habits > 0 {
        completed_today as f64 / total_habits as f64 * 100.0
    } else {
        0.0
    };
    let streak_sum: u32 = habits.iter().map(|h| h.streak).sum();
    let average_streak = if total_habits > 0 {
        streak_sum as f64 / total_habits as f64
    } else {
        0.0
    };

    HabitStats {
        total_habits,
        completed_today,
        completion_rate,
        longest_streak: habits.iter().map(|h| h.best_streak).max().unwrap_or(0),
        active_streaks: habits.iter().filter(|h| h.streak > 0).count() as u32,
        total_completions: habits.iter().map(|h| h.total_completions).sum(),
        average_streak,
    }
}

pub fn daily_completion(habits: &[Habit], date: NaiveDate) -> DailyCompletion {
    DailyCompletion {
        date,
        completed: habits.iter().filter(|h| h.is_completed_on(date)).count() as u32,
        total: habits.len() as u32,
    }
}

/// One entry per day of the given month.
pub fn month_overview(habits: &[Habit], year: i32, month: u32) -> Result<Vec<DailyCompletion>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| anyhow!("Invalid month {}-{:02}", year, month))?;
    Ok(first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|d| daily_completion(habits, d))
        .collect())
}

pub fn summaries(habits: &[Habit], as_of: DateTime<Utc>) -> Vec<HabitSummary> {
    habits
        .iter()
        .map(|h| HabitSummary {
            name: h.name.clone(),
            category: h.category.clone(),
            streak: h.streak,
            best_streak: h.best_streak,
            total_completions: h.total_completions,
            completion_rate: completion_rate(h, as_of),
        })
        .collect()
}
