pub mod clock;
pub mod config;
pub mod http_client;
pub mod markdown;
pub mod validators;
