pub mod items;
pub mod prelude;
pub mod teachers;
