pub mod delete;
pub mod upload;
pub mod usage;
