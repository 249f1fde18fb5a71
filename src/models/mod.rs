pub mod item;
pub mod teacher;

pub use item::{Item, ItemFilter, MonthlyCount, NewItem};
pub use teacher::Teacher;
