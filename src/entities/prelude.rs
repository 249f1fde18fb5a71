pub use super::items::Entity as Items;
pub use super::teachers::Entity as Teachers;
