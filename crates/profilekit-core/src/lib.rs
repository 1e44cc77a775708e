//! profilekit-core - Core library for profilekit
//!
//! This crate contains the profile models, the shared user store, the remote
//! account/storage API clients and the personal-account screen controller
//! used by every profilekit front end.

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod models;
pub mod notify;
pub mod screen;
pub mod sequencer;
pub mod store;
pub mod upload;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Error, Result};
pub use models::{ImageSlot, ProfileDraft, ProfileField, ProfileUpdate, UserRecord};
