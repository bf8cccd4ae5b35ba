pub mod book;
pub mod calculator;
pub mod stats;

pub use book::HabitBook;
