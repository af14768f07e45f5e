pub mod config;
pub mod profile;
pub mod static_files;
