pub mod image;
pub mod sweep;
