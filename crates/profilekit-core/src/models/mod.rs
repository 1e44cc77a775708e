//! Data models for profilekit

mod draft;
mod field;
mod user;

pub use draft::{ProfileDraft, ProfileUpdate, SeedDefaults};
pub use field::{Gender, ImageSlot, MaritalStatus, ProfileField};
pub use user::UserRecord;
