mod list;
mod sweep;
mod teacher;

pub use list::cmd_list_items;
pub use sweep::cmd_sweep;
pub use teacher::cmd_add_teacher;
