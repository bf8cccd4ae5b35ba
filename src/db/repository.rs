use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::models::Habit;

pub const HABITS_KEY: &str = "habit-tracker-data";
pub const DARK_MODE_KEY: &str = "dark-mode";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("malformed stored data: {0}")]
    Json(#[from] serde_json::Error),
}

// ─── Key/value store ─────────────────────────────────────────────────────────

pub struct KvRepo;

impl KvRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>, StorageError> {
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<(), StorageError> {
        conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }
}

// ─── Habits ──────────────────────────────────────────────────────────────────

/// Whole-collection persistence. Failures are logged and swallowed: the
/// in-memory collection stays authoritative for the session.
pub struct HabitStore;

impl HabitStore {
    pub fn save(conn: &Connection, habits: &[Habit]) {
        if let Err(e) = Self::try_save(conn, habits) {
            log::error!("Failed to save habits: {}", e);
        }
    }

    pub fn load(conn: &Connection) -> Vec<Habit> {
        match Self::try_load(conn) {
            Ok(habits) => habits,
            Err(e) => {
                log::error!("Failed to load habits: {}", e);
                Vec::new()
            }
        }
    }

    fn try_save(conn: &Connection, habits: &[Habit]) -> Result<(), StorageError> {
        let json = serde_json::to_string(habits)?;
        KvRepo::set(conn, HABITS_KEY, &json)?;
        log::debug!("Saved {} habits", habits.len());
        Ok(())
    }

    fn try_load(conn: &Connection) -> Result<Vec<Habit>, StorageError> {
        let Some(json) = KvRepo::get(conn, HABITS_KEY)? else {
            return Ok(Vec::new());
        };
        let mut habits: Vec<Habit> = serde_json::from_str(&json)?;
        for h in &mut habits {
            h.total_completions = h.completions.len() as u32;
            h.best_streak = h.best_streak.max(h.streak);
        }
        log::debug!("Loaded {} habits", habits.len());
        Ok(habits)
    }
}

// ─── Preferences ─────────────────────────────────────────────────────────────

pub struct PreferenceStore;

impl PreferenceStore {
    pub fn save_dark_mode(conn: &Connection, dark: bool) {
        let result = serde_json::to_string(&dark)
            .map_err(StorageError::from)
            .and_then(|v| KvRepo::set(conn, DARK_MODE_KEY, &v));
        if let Err(e) = result {
            log::error!("Failed to save dark mode: {}", e);
        }
    }

    pub fn load_dark_mode(conn: &Connection) -> bool {
        let stored = match KvRepo::get(conn, DARK_MODE_KEY) {
            Ok(Some(v)) => v,
            Ok(None) => return false,
            Err(e) => {
                log::warn!("Failed to read dark mode: {}", e);
                return false;
            }
        };
        serde_json::from_str(&stored).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable dark mode value: {}", e);
            false
        })
    }
}
