use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "habit", version, author, about = "Track daily habits, completions and streaks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        #[command(flatten)]
        fields: HabitFields,
    },
    /// Edit a habit's name, description, color, icon or category
    Edit {
        /// Habit id (a unique prefix is enough)
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: HabitFields,
    },
    /// Delete a habit and its history
    Delete {
        /// Habit id (a unique prefix is enough)
        id: String,
    },
    /// Mark a habit as done for a day
    Done {
        /// Habit id (a unique prefix is enough)
        id: String,
        /// Day to mark: YYYY-MM-DD, today or yesterday
        #[arg(long, default_value = "today")]
        date: String,
        /// Remove the completion instead
        #[arg(long)]
        undo: bool,
    },
    /// Flip a habit's completion for a day
    Toggle {
        /// Habit id (a unique prefix is enough)
        id: String,
        /// Day to toggle: YYYY-MM-DD, today or yesterday
        #[arg(long, default_value = "today")]
        date: String,
    },
    /// List habits with their state for a day (default command)
    List {
        /// Day to show: YYYY-MM-DD, today or yesterday
        #[arg(long, default_value = "today")]
        date: String,
    },
    /// Show overall statistics
    Stats,
    /// Show per-day completion counts for a month
    Calendar {
        /// Month as YYYY-MM, defaults to the current month
        #[arg(long)]
        month: Option<String>,
    },
    /// Show or change the dark mode preference
    Theme {
        /// Switch to the dark palette
        #[arg(long, conflicts_with = "light")]
        dark: bool,
        /// Switch to the light palette
        #[arg(long)]
        light: bool,
    },
    /// Show the config file location, optionally writing the defaults
    Config {
        /// Write a config file with default values if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct HabitFields {
    /// Longer description
    #[arg(long)]
    pub description: Option<String>,
    /// Display color, e.g. #10B981
    #[arg(long)]
    pub color: Option<String>,
    /// Icon name (target, flame, book, dumbbell, heart, coffee)
    #[arg(long)]
    pub icon: Option<String>,
    /// Category, e.g. "Health & Fitness"
    #[arg(long)]
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn done_defaults_to_today() {
        let cli = Cli::try_parse_from(["habit", "done", "abc"]).unwrap();
        match cli.command {
            Some(Commands::Done { id, date, undo }) => {
                assert_eq!(id, "abc");
                assert_eq!(date, "today");
                assert!(!undo);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn add_collects_optional_fields() {
        let cli = Cli::try_parse_from([
            "habit",
            "add",
            "Read",
            "--category",
            "Education",
            "--icon",
            "book",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add { name, fields }) => {
                assert_eq!(name, "Read");
                assert_eq!(fields.category.as_deref(), Some("Education"));
                assert_eq!(fields.icon.as_deref(), Some("book"));
                assert_eq!(fields.color, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn theme_flags_conflict() {
        assert!(Cli::try_parse_from(["habit", "theme", "--dark", "--light"]).is_err());
    }
}
