pub mod common;
pub mod config;
pub mod edit;
pub mod show;
pub mod upload;
