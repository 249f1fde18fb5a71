pub mod item;
pub mod teacher;
