pub mod profile;
pub mod repository;
