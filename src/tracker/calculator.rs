use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{Completions, Habit, HabitId};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Count completed days walking backwards from `today`, stopping at the first gap.
pub fn current_streak(completions: &Completions, today: NaiveDate) -> u32 {
    if completions.is_empty() {
        return 0;
    }
    let mut streak = 0u32;
    let mut check = Some(today);
    while let Some(day) = check {
        if !completions.contains(day) {
            break;
        }
        streak += 1;
        check = day.pred_opt();
    }
    streak
}

/// Mark `day` done or not done and recompute the derived counters.
///
/// The streak is always measured back from `today`, whichever day was
/// touched; `best_streak` only ever grows.
pub fn set_completion(habit: &Habit, day: NaiveDate, completed: bool, today: NaiveDate) -> Habit {
    let mut completions = habit.completions.clone();
    if completed {
        completions.insert(day);
    } else {
        completions.remove(day);
    }

    let streak = current_streak(&completions, today);
    let total_completions = completions.len() as u32;

    Habit {
        completions,
        streak,
        total_completions,
        best_streak: habit.best_streak.max(streak),
        ..habit.clone()
    }
}

/// Flip the completion state of `day`.
pub fn toggle_completion(habit: &Habit, day: NaiveDate, today: NaiveDate) -> Habit {
    let completed = !habit.is_completed_on(day);
    set_completion(habit, day, completed, today)
}

/// Percentage of days since creation (creation day counts as day 1) on which
/// the habit was done, evaluated at `as_of`.
pub fn completion_rate(habit: &Habit, as_of: DateTime<Utc>) -> f64 {
    let elapsed_ms = as_of
        .signed_duration_since(habit.created_at)
        .num_milliseconds();
    let days_elapsed = elapsed_ms.div_euclid(MILLIS_PER_DAY) + 1;
    if days_elapsed <= 0 {
        return 0.0;
    }
    habit.total_completions as f64 / days_elapsed as f64 * 100.0
}

pub fn generate_habit_id() -> HabitId {
    HabitId::new(uuid::Uuid::new_v4().simple().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HabitFormData;
    use chrono::{Duration, TimeZone};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn ago(days: i64) -> NaiveDate {
        today() - Duration::days(days)
    }

    fn fresh() -> Habit {
        let created = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        let form = HabitFormData {
            name: "Stretch".to_string(),
            ..Default::default()
        };
        Habit::new(generate_habit_id(), form, created)
    }

    fn mark(habit: &Habit, days: &[i64]) -> Habit {
        days.iter()
            .fold(habit.clone(), |h, d| set_completion(&h, ago(*d), true, today()))
    }

    #[test]
    fn fresh_habit_has_zero_counters() {
        let h = fresh();
        assert_eq!(current_streak(&h.completions, today()), 0);
        assert_eq!(h.streak, 0);
        assert_eq!(h.best_streak, 0);
        assert_eq!(h.total_completions, 0);
    }

    #[test]
    fn removing_the_only_completion_resets_streak() {
        let h = mark(&fresh(), &[0]);
        let h = set_completion(&h, today(), false, today());
        assert!(h.completions.is_empty());
        assert_eq!(current_streak(&h.completions, today()), 0);
        assert_eq!(h.streak, 0);
        assert_eq!(h.best_streak, 1);
    }

    #[test]
    fn today_and_yesterday_make_a_two_day_streak() {
        let h = mark(&fresh(), &[0, 1]);
        assert_eq!(h.streak, 2);
        assert_eq!(h.total_completions, 2);
        assert_eq!(h.best_streak, 2);
    }

    #[test]
    fn gap_breaks_the_streak() {
        let h = mark(&fresh(), &[0, 1, 3]);
        assert_eq!(h.streak, 2);
        assert_eq!(h.total_completions, 3);
        assert_eq!(h.best_streak, 2);
    }

    #[test]
    fn unmarking_today_keeps_best_streak() {
        let h = mark(&fresh(), &[4, 3, 2, 1, 0]);
        assert_eq!(h.streak, 5);

        let h = set_completion(&h, today(), false, today());
        assert_eq!(h.streak, 0);
        assert_eq!(h.best_streak, 5);
        assert_eq!(h.total_completions, 4);
    }

    #[test]
    fn marking_twice_is_idempotent() {
        let once = set_completion(&fresh(), today(), true, today());
        let twice = set_completion(&once, today(), true, today());
        assert_eq!(once, twice);
    }

    #[test]
    fn unmarking_absent_day_is_idempotent() {
        let h = mark(&fresh(), &[0]);
        let again = set_completion(&h, ago(7), false, today());
        assert_eq!(h, again);
    }

    #[test]
    fn off_then_on_restores_completion_set() {
        let h = mark(&fresh(), &[0, 1, 2]);
        let off = set_completion(&h, ago(1), false, today());
        assert_eq!(off.streak, 1);

        let on = set_completion(&off, ago(1), true, today());
        assert_eq!(on.completions, h.completions);
        assert_eq!(on.streak, h.streak);
        assert_eq!(on.total_completions, h.total_completions);
    }

    #[test]
    fn past_day_only_counts_when_it_joins_todays_run() {
        let h = mark(&fresh(), &[5, 6, 7]);
        assert_eq!(h.streak, 0);
        assert_eq!(h.total_completions, 3);

        let h = mark(&h, &[0, 1, 2, 3, 4]);
        assert_eq!(h.streak, 8);
        assert_eq!(h.best_streak, 8);
    }

    #[test]
    fn future_days_are_accepted_but_do_not_extend_streak() {
        let tomorrow = today() + Duration::days(1);
        let h = set_completion(&fresh(), tomorrow, true, today());
        assert!(h.is_completed_on(tomorrow));
        assert_eq!(h.streak, 0);
        assert_eq!(h.total_completions, 1);
    }

    #[test]
    fn invariants_hold_after_every_change() {
        let ops: [(i64, bool); 9] = [
            (0, true),
            (1, true),
            (2, true),
            (1, false),
            (1, true),
            (0, false),
            (10, true),
            (0, true),
            (2, false),
        ];
        let mut h = fresh();
        for (d, completed) in ops {
            h = set_completion(&h, ago(d), completed, today());
            assert_eq!(h.total_completions as usize, h.completions.len());
            assert!(h.best_streak >= h.streak);
        }
    }

    #[test]
    fn toggle_flips_state() {
        let h = toggle_completion(&fresh(), today(), today());
        assert!(h.is_completed_on(today()));
        assert_eq!(h.streak, 1);

        let h = toggle_completion(&h, today(), today());
        assert!(!h.is_completed_on(today()));
        assert_eq!(h.streak, 0);
        assert_eq!(h.best_streak, 1);
    }

    #[test]
    fn metadata_passes_through_unchanged() {
        let before = fresh();
        let after = set_completion(&before, today(), true, today());
        assert_eq!(after.id, before.id);
        assert_eq!(after.name, before.name);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn completion_rate_counts_creation_day_as_day_one() {
        let as_of = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        let mut h = fresh();
        h.created_at = as_of - Duration::days(9);
        h.total_completions = 5;
        assert_eq!(completion_rate(&h, as_of), 50.0);
    }

    #[test]
    fn completion_rate_on_creation_day() {
        let mut h = fresh();
        h.total_completions = 1;
        let as_of = h.created_at + Duration::hours(3);
        assert_eq!(completion_rate(&h, as_of), 100.0);
    }

    #[test]
    fn completion_rate_is_zero_before_creation() {
        let mut h = fresh();
        h.total_completions = 2;
        let as_of = h.created_at - Duration::hours(30);
        assert_eq!(completion_rate(&h, as_of), 0.0);
    }

    #[test]
    fn generated_ids_are_distinct() {
        let ids: std::collections::HashSet<_> = (0..100).map(|_| generate_habit_id()).collect();
        assert_eq!(ids.len(), 100);
    }
}
