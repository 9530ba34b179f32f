pub mod profile;
pub mod summary;
pub mod table;
