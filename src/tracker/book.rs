use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{Habit, HabitFormData, HabitId};
use crate::tracker::calculator::{self, generate_habit_id};

/// The in-memory habit collection. Every change swaps in a new habit snapshot.
#[derive(Debug, Clone, Default)]
pub struct HabitBook {
    habits: Vec<Habit>,
}

impl HabitBook {
    pub fn new(habits: Vec<Habit>) -> Self {
        Self { habits }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn add(&mut self, form: HabitFormData, now: DateTime<Utc>) -> &Habit {
        let habit = Habit::new(generate_habit_id(), form, now);
        log::info!("Created habit {} ({})", habit.id, habit.name);
        self.habits.push(habit);
        &self.habits[self.habits.len() - 1]
    }

    pub fn update(&mut self, id: &HabitId, form: HabitFormData) -> Result<&Habit> {
        let idx = self.index_of(id)?;
        self.habits[idx] = self.habits[idx].apply_form(form);
        log::info!("Updated habit {}", id);
        Ok(&self.habits[idx])
    }

    pub fn delete(&mut self, id: &HabitId) -> Result<Habit> {
        let idx = self.index_of(id)?;
        let removed = self.habits.remove(idx);
        log::info!("Deleted habit {} ({})", removed.id, removed.name);
        Ok(removed)
    }

    pub fn set_completion(
        &mut self,
        id: &HabitId,
        day: NaiveDate,
        completed: bool,
        today: NaiveDate,
    ) -> Result<&Habit> {
        let idx = self.index_of(id)?;
        self.habits[idx] = calculator::set_completion(&self.habits[idx], day, completed, today);
        log::debug!("Habit {} on {}: completed={}", id, day, completed);
        Ok(&self.habits[idx])
    }

    pub fn toggle_completion(
        &mut self,
        id: &HabitId,
        day: NaiveDate,
        today: NaiveDate,
    ) -> Result<&Habit> {
        let idx = self.index_of(id)?;
        self.habits[idx] = calculator::toggle_completion(&self.habits[idx], day, today);
        log::debug!(
            "Habit {} on {} toggled to {}",
            id,
            day,
            self.habits[idx].is_completed_on(day)
        );
        Ok(&self.habits[idx])
    }

    /// Find a habit by its full id or by a prefix that matches exactly one habit.
    pub fn resolve(&self, query: &str) -> Result<&Habit> {
        if query.is_empty() {
            bail!("Habit id must not be empty");
        }
        if let Some(h) = self.habits.iter().find(|h| h.id.as_str() == query) {
            return Ok(h);
        }
        let mut matches = self.habits.iter().filter(|h| h.id.as_str().starts_with(query));
        match (matches.next(), matches.next()) {
            (Some(h), None) => Ok(h),
            (None, _) => Err(anyhow!("No habit with id '{}'", query)),
            (Some(_), Some(_)) => Err(anyhow!(
                "Id prefix '{}' matches more than one habit, use more characters",
                query
            )),
        }
    }

    fn index_of(&self, id: &HabitId) -> Result<usize> {
        self.habits
            .iter()
            .position(|h| &h.id == id)
            .ok_or_else(|| anyhow!("No habit with id '{}'", id))
    }
}
