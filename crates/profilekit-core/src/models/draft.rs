//! Local form draft and the update payloads derived from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ImageSlot, ProfileField, UserRecord};

/// Legacy coordinates sent by the mobile client when none are known.
pub const PLACEHOLDER_LONGITUDE: &str = "2312311";
pub const PLACEHOLDER_LATITUDE: &str = "1131431";

/// Values used for fields the user record may not carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedDefaults {
    pub longitude: String,
    pub latitude: String,
}

impl Default for SeedDefaults {
    fn default() -> Self {
        Self {
            longitude: PLACEHOLDER_LONGITUDE.to_string(),
            latitude: PLACEHOLDER_LATITUDE.to_string(),
        }
    }
}

/// The locally held, possibly unsaved copy of the editable profile fields.
///
/// Every [`ProfileField`] is always present; `None` means the user record had
/// no value for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    values: BTreeMap<ProfileField, Option<String>>,
}

impl ProfileDraft {
    /// Seed a draft from the loaded user record.
    ///
    /// Coordinates come from the record when it has them, otherwise from
    /// `defaults`.
    pub fn seed(user: Option<&UserRecord>, defaults: &SeedDefaults) -> Self {
        let values = ProfileField::ALL
            .into_iter()
            .map(|field| {
                let value = user.and_then(|record| record.field(field));
                let value = match field {
                    ProfileField::Longitude => value.or_else(|| Some(defaults.longitude.clone())),
                    ProfileField::Latitude => value.or_else(|| Some(defaults.latitude.clone())),
                    _ => value,
                };
                (field, value)
            })
            .collect();
        Self { values }
    }

    pub fn get(&self, field: ProfileField) -> Option<&str> {
        self.values.get(&field).and_then(Option::as_deref)
    }

    pub fn set(&mut self, field: ProfileField, value: Option<String>) {
        self.values.insert(field, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProfileField, Option<&str>)> {
        self.values
            .iter()
            .map(|(field, value)| (*field, value.as_deref()))
    }
}

/// Body of a profile-update request.
///
/// Serializes as a flat JSON object keyed by wire field names; only the
/// fields it was built with are included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileUpdate {
    fields: BTreeMap<ProfileField, Option<String>>,
}

impl ProfileUpdate {
    /// The whole draft, as submitted by the save button.
    pub fn from_draft(draft: &ProfileDraft) -> Self {
        Self {
            fields: draft.values.clone(),
        }
    }

    /// Single-field update carrying a freshly uploaded image URL.
    pub fn photo(slot: ImageSlot, secure_url: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(slot.photo_field(), Some(secure_url.into()));
        Self { fields }
    }

    pub fn get(&self, field: ProfileField) -> Option<&str> {
        self.fields.get(&field).and_then(Option::as_deref)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
