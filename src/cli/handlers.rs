use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use rusqlite::Connection;

use crate::cli::args::HabitFields;
use crate::config::AppConfig;
use crate::db::repository::{HabitStore, PreferenceStore};
use crate::models::{Habit, HabitFormData};
use crate::tracker::stats::{daily_completion, habit_stats, month_overview, summaries};
use crate::tracker::HabitBook;
use crate::utils::format::{
    format_days, format_percent, pad_display, parse_day, parse_month, progress_bar,
    truncate_display,
};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const RESET: &str = "\x1b[0m";

/// ANSI colors, picked by the dark mode preference.
struct Palette {
    accent: &'static str,
    good: &'static str,
    warn: &'static str,
    dim: &'static str,
    bold: &'static str,
}

impl Palette {
    fn for_mode(dark: bool) -> Self {
        if dark {
            Palette {
                accent: "\x1b[38;2;129;140;248m",
                good: "\x1b[38;2;52;211;153m",
                warn: "\x1b[38;2;251;191;36m",
                dim: "\x1b[38;2;156;163;175m",
                bold: "\x1b[1;97m",
            }
        } else {
            Palette {
                accent: "\x1b[34m",
                good: "\x1b[32m",
                warn: "\x1b[33m",
                dim: "\x1b[2m",
                bold: "\x1b[1m",
            }
        }
    }

    fn load(conn: &Connection) -> Self {
        Self::for_mode(PreferenceStore::load_dark_mode(conn))
    }

    fn streak(&self, streak: u32) -> &'static str {
        match streak {
            0 => self.dim,
            1 | 2 => self.warn,
            _ => self.good,
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn load_book(conn: &Connection) -> HabitBook {
    HabitBook::new(HabitStore::load(conn))
}

fn save_book(conn: &Connection, book: &HabitBook) {
    HabitStore::save(conn, book.habits());
}

// ─── Create / edit / delete ──────────────────────────────────────────────────

pub fn handle_add(
    conn: &Connection,
    config: &AppConfig,
    name: &str,
    fields: &HabitFields,
) -> Result<()> {
    let form = config.new_habit_form(
        name,
        fields.description.as_deref(),
        fields.color.as_deref(),
        fields.icon.as_deref(),
        fields.category.as_deref(),
    );
    let mut book = load_book(conn);
    let habit = book.add(form, Utc::now()).clone();
    save_book(conn, &book);

    let p = Palette::load(conn);
    println_colored!(p.good, "  ✓ Added {} [{}]", habit.name, habit.id.short());
    Ok(())
}

pub fn handle_edit(
    conn: &Connection,
    id: &str,
    name: Option<&str>,
    fields: &HabitFields,
) -> Result<()> {
    let mut book = load_book(conn);
    let current = book.resolve(id)?.clone();
    let form = merge_form(current.form_data(), name, fields);
    let habit = book.update(&current.id, form)?.clone();
    save_book(conn, &book);

    let p = Palette::load(conn);
    println_colored!(p.good, "  ✓ Updated {} [{}]", habit.name, habit.id.short());
    Ok(())
}

fn merge_form(current: HabitFormData, name: Option<&str>, fields: &HabitFields) -> HabitFormData {
    let pick = |new: Option<&String>, old: String| new.cloned().unwrap_or(old);
    HabitFormData {
        name: name.map(str::to_string).unwrap_or(current.name),
        description: pick(fields.description.as_ref(), current.description),
        color: pick(fields.color.as_ref(), current.color),
        icon: pick(fields.icon.as_ref(), current.icon),
        category: pick(fields.category.as_ref(), current.category),
    }
}

pub fn handle_delete(conn: &Connection, id: &str) -> Result<()> {
    let mut book = load_book(conn);
    let target = book.resolve(id)?.id.clone();
    let removed = book.delete(&target)?;
    save_book(conn, &book);

    let p = Palette::load(conn);
    println_colored!(p.warn, "  ✗ Deleted {}", removed.name);
    Ok(())
}

// ─── Completions ─────────────────────────────────────────────────────────────

pub fn handle_done(conn: &Connection, id: &str, date: &str, undo: bool) -> Result<()> {
    done_on(conn, id, date, undo, today())
}

fn done_on(conn: &Connection, id: &str, date: &str, undo: bool, today: NaiveDate) -> Result<()> {
    let day = parse_day(date, today)?;
    let mut book = load_book(conn);
    let target = book.resolve(id)?.id.clone();
    let habit = book.set_completion(&target, day, !undo, today)?.clone();
    save_book(conn, &book);
    print_completion(conn, &habit, day);
    Ok(())
}

pub fn handle_toggle(conn: &Connection, id: &str, date: &str) -> Result<()> {
    toggle_on(conn, id, date, today())
}

fn toggle_on(conn: &Connection, id: &str, date: &str, today: NaiveDate) -> Result<()> {
    let day = parse_day(date, today)?;
    let mut book = load_book(conn);
    let target = book.resolve(id)?.id.clone();
    let habit = book.toggle_completion(&target, day, today)?.clone();
    save_book(conn, &book);
    print_completion(conn, &habit, day);
    Ok(())
}

fn print_completion(conn: &Connection, habit: &Habit, day: NaiveDate) {
    let p = Palette::load(conn);
    if habit.is_completed_on(day) {
        println_colored!(p.good, "  ✓ {} — done on {}", habit.name, day);
    } else {
        println_colored!(p.dim, "  ○ {} — unmarked on {}", habit.name, day);
    }
    println_colored!(
        p.streak(habit.streak),
        "    Streak: {}  ·  Best: {}  ·  Total: {}",
        format_days(habit.streak),
        format_days(habit.best_streak),
        habit.total_completions
    );
}

// ─── List ────────────────────────────────────────────────────────────────────

pub fn handle_list(conn: &Connection, date: &str) -> Result<()> {
    list_on(conn, date, today())
}

fn list_on(conn: &Connection, date: &str, today: NaiveDate) -> Result<()> {
    let day = parse_day(date, today)?;
    let book = load_book(conn);
    let p = Palette::load(conn);

    println!();
    if book.is_empty() {
        println_colored!(p.dim, "  No habits yet. Add one with `habit add <name>`.");
        println!();
        return Ok(());
    }

    let daily = daily_completion(book.habits(), day);
    let heading = if day == today {
        "Today".to_string()
    } else {
        day.format("%A, %B %-d %Y").to_string()
    };
    println_colored!(
        p.accent,
        "  {}  ({} of {} habits completed)",
        heading,
        daily.completed,
        daily.total
    );
    println!();

    let name_width = book
        .habits()
        .iter()
        .map(|h| unicode_width::UnicodeWidthStr::width(h.name.as_str()))
        .max()
        .unwrap_or(0)
        .min(MAX_NAME_WIDTH);

    for habit in book.habits() {
        println!("{}", list_row(&p, habit, day, name_width));
    }
    println!();
    Ok(())
}

const MAX_NAME_WIDTH: usize = 28;

fn list_row(p: &Palette, habit: &Habit, day: NaiveDate, name_width: usize) -> String {
    let (mark, color) = if habit.is_completed_on(day) {
        ("✓", p.good)
    } else {
        ("○", p.dim)
    };
    format!(
        "  {}{}{}  {}{}{}  {}  {}{}{}  {}best {}{}",
        color,
        mark,
        RESET,
        p.dim,
        habit.id.short(),
        RESET,
        pad_display(&truncate_display(&habit.name, name_width), name_width),
        p.streak(habit.streak),
        pad_display(&format_days(habit.streak), 8),
        RESET,
        p.dim,
        habit.best_streak,
        RESET,
    )
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub fn handle_stats(conn: &Connection) -> Result<()> {
    stats_on(conn, today(), Utc::now())
}

fn stats_on(conn: &Connection, today: NaiveDate, now: DateTime<Utc>) -> Result<()> {
    let book = load_book(conn);
    let stats = habit_stats(book.habits(), today);
    let p = Palette::load(conn);

    println!();
    println_colored!(p.accent, "  Statistics");
    println!();
    println_colored!(
        p.bold,
        "  Completed today:  {}/{}  {}",
        stats.completed_today,
        stats.total_habits,
        progress_bar(stats.completed_today, stats.total_habits, 10)
    );
    println!("  Completion rate:  {}", format_percent(stats.completion_rate));
    println!("  Active streaks:   {}", stats.active_streaks);
    println!("  Longest streak:   {}", format_days(stats.longest_streak));
    println!("  Average streak:   {:.1} days", stats.average_streak);
    println!("  All completions:  {}", stats.total_completions);

    if !book.is_empty() {
        println!();
        println_colored!(p.accent, "  Habits");
        println!();
        for s in summaries(book.habits(), now) {
            println!(
                "  {}  {}{}{}  {}{:>4} best  {:>5} total  {:>5}{}",
                pad_display(&truncate_display(&s.name, 24), 24),
                p.streak(s.streak),
                pad_display(&format_days(s.streak), 8),
                RESET,
                p.dim,
                s.best_streak,
                s.total_completions,
                format_percent(s.completion_rate),
                RESET,
            );
            if !s.category.is_empty() {
                println_colored!(p.dim, "    {}", s.category);
            }
        }
    }
    println!();
    Ok(())
}

// ─── Calendar ────────────────────────────────────────────────────────────────

pub fn handle_calendar(conn: &Connection, month: Option<&str>) -> Result<()> {
    calendar_on(conn, month, today())
}

fn calendar_on(conn: &Connection, month: Option<&str>, today: NaiveDate) -> Result<()> {
    let (year, month) = match month {
        Some(m) => parse_month(m)?,
        None => (today.year(), today.month()),
    };
    let book = load_book(conn);
    let days = month_overview(book.habits(), year, month)?;
    let p = Palette::load(conn);

    println!();
    if let Some(first) = days.first() {
        println_colored!(p.accent, "  {}", first.date.format("%B %Y"));
    }
    println!();
    for d in &days {
        let color = match d.percentage() {
            x if x >= 100.0 => p.good,
            x if x > 0.0 => p.warn,
            _ => p.dim,
        };
        let marker = if d.date == today { "◀ today" } else { "" };
        println!(
            "  {} {}  {}{}{}  {}/{}  {}",
            d.date.format("%a"),
            d.date.format("%d"),
            color,
            progress_bar(d.completed, d.total, 10),
            RESET,
            d.completed,
            d.total,
            marker
        );
    }
    println!();
    Ok(())
}

// ─── Theme / config ──────────────────────────────────────────────────────────

pub fn handle_theme(conn: &Connection, dark: bool, light: bool) -> Result<()> {
    let mode = if dark {
        PreferenceStore::save_dark_mode(conn, true);
        true
    } else if light {
        PreferenceStore::save_dark_mode(conn, false);
        false
    } else {
        PreferenceStore::load_dark_mode(conn)
    };
    let p = Palette::for_mode(mode);
    println_colored!(
        p.accent,
        "  Theme: {}",
        if mode { "dark" } else { "light" }
    );
    Ok(())
}

pub fn handle_config(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path()?;
    if init && !path.exists() {
        config
            .save_to(&path)
            .with_context(|| format!("Writing default config to {:?}", path))?;
        println!("  Wrote {}", path.display());
    } else {
        println!("  Config:   {}", path.display());
    }
    println!("  Database: {}", config.db_path()?.display());
    Ok(())
}
