pub mod badge;
pub mod config;
pub mod event;
pub mod generate;
pub mod profile;
