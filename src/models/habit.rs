use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    pub fn new(raw: impl Into<String>) -> Self {
        HabitId(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, enough to address a habit from the command line.
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl std::fmt::Display for HabitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Days on which a habit was done.
///
/// Stored as `{"2026-01-31": true, ...}`; a `false` entry reads back as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<NaiveDate, bool>", into = "BTreeMap<NaiveDate, bool>")]
pub struct Completions(BTreeSet<NaiveDate>);

impl Completions {
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.0.contains(&day)
    }

    pub fn insert(&mut self, day: NaiveDate) -> bool {
        self.0.insert(day)
    }

    pub fn remove(&mut self, day: NaiveDate) -> bool {
        self.0.remove(&day)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<NaiveDate, bool>> for Completions {
    fn from(map: BTreeMap<NaiveDate, bool>) -> Self {
        Completions(
            map.into_iter()
                .filter_map(|(day, done)| done.then_some(day))
                .collect(),
        )
    }
}

impl From<Completions> for BTreeMap<NaiveDate, bool> {
    fn from(c: Completions) -> Self {
        c.0.into_iter().map(|day| (day, true)).collect()
    }
}

/// The user-editable part of a habit, as entered on create or edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitFormData {
    pub name: String,
    pub description: String,
    pub color: String,
    pub icon: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub completions: Completions,
    /// Derived: consecutive completed days ending today.
    #[serde(default)]
    pub streak: u32,
    /// Derived: highest streak ever seen, never decreases.
    #[serde(default)]
    pub best_streak: u32,
    /// Derived: always `completions.len()`.
    #[serde(default)]
    pub total_completions: u32,
}

impl Habit {
    pub fn new(id: HabitId, form: HabitFormData, created_at: DateTime<Utc>) -> Self {
        Habit {
            id,
            name: form.name,
            description: form.description,
            color: form.color,
            icon: form.icon,
            created_at,
            category: form.category,
            completions: Completions::default(),
            streak: 0,
            best_streak: 0,
            total_completions: 0,
        }
    }

    pub fn is_completed_on(&self, day: NaiveDate) -> bool {
        self.completions.contains(day)
    }

    /// Replace the editable fields, leaving identity and derived counters alone.
    pub fn apply_form(&self, form: HabitFormData) -> Habit {
        Habit {
            name: form.name,
            description: form.description,
            color: form.color,
            icon: form.icon,
            category: form.category,
            ..self.clone()
        }
    }

    pub fn form_data(&self) -> HabitFormData {
        HabitFormData {
            name: self.name.clone(),
            description: self.description.clone(),
            color: self.color.clone(),
            icon: self.icon.clone(),
            category: self.category.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> Habit {
        let form = HabitFormData {
            name: "Read".to_string(),
            description: "20 pages".to_string(),
            color: "#3B82F6".to_string(),
            icon: "book".to_string(),
            category: "Education".to_string(),
        };
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap();
        Habit::new(HabitId::new("abc123def456"), form, created)
    }

    #[test]
    fn new_habit_starts_empty() {
        let h = sample();
        assert!(h.completions.is_empty());
        assert_eq!(h.streak, 0);
        assert_eq!(h.best_streak, 0);
        assert_eq!(h.total_completions, 0);
    }

    #[test]
    fn serializes_with_camel_case_and_iso_timestamp() {
        let mut h = sample();
        h.completions.insert(day("2026-03-02"));
        h.total_completions = 1;
        let json = serde_json::to_value(&h).unwrap();

        assert_eq!(json["createdAt"], "2026-03-01T08:30:00Z");
        assert_eq!(json["bestStreak"], 0);
        assert_eq!(json["totalCompletions"], 1);
        assert_eq!(json["completions"]["2026-03-02"], true);
        assert_eq!(json["id"], "abc123def456");
    }

    #[test]
    fn false_completion_entries_read_back_as_absent() {
        let raw = r#"{
            "id": "x1",
            "name": "Walk",
            "createdAt": "2026-03-01T00:00:00.000Z",
            "completions": {"2026-03-01": true, "2026-03-02": false}
        }"#;
        let h: Habit = serde_json::from_str(raw).unwrap();
        assert!(h.is_completed_on(day("2026-03-01")));
        assert!(!h.is_completed_on(day("2026-03-02")));
        assert_eq!(h.completions.len(), 1);
    }

    #[test]
    fn apply_form_keeps_identity_and_counters() {
        let mut h = sample();
        h.completions.insert(day("2026-03-02"));
        h.streak = 1;
        h.best_streak = 4;
        h.total_completions = 1;

        let edited = h.apply_form(HabitFormData {
            name: "Read more".to_string(),
            ..h.form_data()
        });
        assert_eq!(edited.name, "Read more");
        assert_eq!(edited.id, h.id);
        assert_eq!(edited.created_at, h.created_at);
        assert_eq!(edited.completions, h.completions);
        assert_eq!(edited.best_streak, 4);
    }

    #[test]
    fn short_id_handles_short_strings() {
        assert_eq!(HabitId::new("abc").short(), "abc");
        assert_eq!(HabitId::new("0123456789").short(), "01234567");
    }
}
