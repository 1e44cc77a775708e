//! Form state for the personal account screen.
//!
//! The draft is driven by a small reducer. Seeding is keyed by the store
//! version it was taken from, so a refreshed record replaces the draft exactly
//! once and repeated reads of the same snapshot leave local edits alone.

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::models::{
    Gender, MaritalStatus, ProfileDraft, ProfileField, ProfileUpdate, SeedDefaults, UserRecord,
};
use crate::store::AuthState;

const DOB_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// Replace the whole draft with values from the user record at `version`.
    Seed {
        version: u64,
        user: Option<UserRecord>,
    },
    /// Assign a single field.
    Edit {
        field: ProfileField,
        value: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct ProfileForm {
    draft: ProfileDraft,
    seeded_version: Option<u64>,
    defaults: SeedDefaults,
}

impl ProfileForm {
    /// Form seeded from `state`.
    pub fn seeded(state: &AuthState, defaults: SeedDefaults) -> Self {
        let mut form = Self {
            draft: ProfileDraft::seed(None, &defaults),
            seeded_version: None,
            defaults,
        };
        form.reseed(state);
        form
    }

    /// Apply one event. Returns `true` when the draft changed.
    pub fn apply(&mut self, event: FormEvent) -> bool {
        match event {
            FormEvent::Seed { version, user } => {
                if self.seeded_version == Some(version) {
                    return false;
                }
                self.draft = ProfileDraft::seed(user.as_ref(), &self.defaults);
                self.seeded_version = Some(version);
                true
            }
            FormEvent::Edit { field, value } => {
                if self.draft.get(field) == value.as_deref() {
                    return false;
                }
                self.draft.set(field, value);
                true
            }
        }
    }

    /// Re-seed from `state` if its version differs from the last seed.
    pub fn reseed(&mut self, state: &AuthState) -> bool {
        if self.seeded_version == Some(state.version) {
            return false;
        }
        let reseeded = self.apply(FormEvent::Seed {
            version: state.version,
            user: state.user.clone(),
        });
        if reseeded {
            tracing::debug!(version = state.version, "re-seeded profile form");
        }
        reseeded
    }

    /// Text-input change handler.
    ///
    /// Picker-backed and managed fields are rejected; use the dedicated
    /// selectors or the upload flow for those.
    pub fn change(&mut self, field: ProfileField, text: &str) -> Result<()> {
        if field.is_picker() || field.is_managed() {
            return Err(Error::InvalidInput(format!(
                "'{field}' is not a text input"
            )));
        }
        self.apply(FormEvent::Edit {
            field,
            value: Some(text.to_string()),
        });
        Ok(())
    }

    pub fn select_country(&mut self, name: &str) {
        self.apply(FormEvent::Edit {
            field: ProfileField::Country,
            value: Some(name.to_string()),
        });
    }

    pub fn select_dob(&mut self, date: NaiveDate) {
        self.apply(FormEvent::Edit {
            field: ProfileField::Dob,
            value: Some(date.format(DOB_FORMAT).to_string()),
        });
    }

    pub fn select_gender(&mut self, gender: Gender) {
        self.apply(FormEvent::Edit {
            field: ProfileField::Gender,
            value: Some(gender.as_str().to_string()),
        });
    }

    pub fn select_marital_status(&mut self, status: MaritalStatus) {
        self.apply(FormEvent::Edit {
            field: ProfileField::MaritalStatus,
            value: Some(status.as_str().to_string()),
        });
    }

    pub const fn values(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn value(&self, field: ProfileField) -> Option<&str> {
        self.draft.get(field)
    }

    pub const fn seeded_version(&self) -> Option<u64> {
        self.seeded_version
    }

    /// Payload for the save button: the entire current draft.
    pub fn submission(&self) -> ProfileUpdate {
        ProfileUpdate::from_draft(&self.draft)
    }
}

/// Parse a `YYYY-MM-DD` date as produced by the date picker.
pub fn parse_dob(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DOB_FORMAT)
        .map_err(|error| Error::InvalidInput(format!("invalid date '{raw}': {error}")))
}
