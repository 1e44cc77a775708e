//! Profile field keys and the fixed option lists used by the pickers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Editable keys of the personal account form.
///
/// Declaration order is the order used for drafts and payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    FirstName,
    LastName,
    BusinessName,
    Country,
    State,
    Email,
    PhoneNumber,
    Location,
    Longitude,
    Latitude,
    Dob,
    Gender,
    MaritalStatus,
    FacebookLink,
    InstagramLink,
    ProfilePhoto,
    CoverPhoto,
}

impl ProfileField {
    pub const ALL: [Self; 17] = [
        Self::FirstName,
        Self::LastName,
        Self::BusinessName,
        Self::Country,
        Self::State,
        Self::Email,
        Self::PhoneNumber,
        Self::Location,
        Self::Longitude,
        Self::Latitude,
        Self::Dob,
        Self::Gender,
        Self::MaritalStatus,
        Self::FacebookLink,
        Self::InstagramLink,
        Self::ProfilePhoto,
        Self::CoverPhoto,
    ];

    /// Text inputs rendered above the country picker.
    pub const UPPER_INPUTS: [Self; 5] = [
        Self::FirstName,
        Self::LastName,
        Self::BusinessName,
        Self::Email,
        Self::PhoneNumber,
    ];

    /// Text inputs rendered between the country picker and the date picker.
    pub const LOCATION_INPUTS: [Self; 2] = [Self::State, Self::Location];

    /// Social link inputs rendered at the bottom of the form.
    pub const SOCIAL_INPUTS: [Self; 2] = [Self::FacebookLink, Self::InstagramLink];

    /// Wire key used by the account API.
    pub const fn key(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::BusinessName => "business_name",
            Self::Country => "country",
            Self::State => "state",
            Self::Email => "email",
            Self::PhoneNumber => "phone_number",
            Self::Location => "location",
            Self::Longitude => "longitude",
            Self::Latitude => "latitude",
            Self::Dob => "dob",
            Self::Gender => "gender",
            Self::MaritalStatus => "marital_status",
            Self::FacebookLink => "facebook_link",
            Self::InstagramLink => "instagram_link",
            Self::ProfilePhoto => "profile_photo",
            Self::CoverPhoto => "cover_photo",
        }
    }

    /// Human label shown next to the input.
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::BusinessName => "Business Name",
            Self::Country => "Country/Region*",
            Self::State => "State",
            Self::Email => "Email",
            Self::PhoneNumber => "Phone Number",
            Self::Location => "Location",
            Self::Longitude => "Longitude",
            Self::Latitude => "Latitude",
            Self::Dob => "Date of Birth",
            Self::Gender => "Gender",
            Self::MaritalStatus => "Marital Status",
            Self::FacebookLink => "Facebook Link",
            Self::InstagramLink => "Instagram Link",
            Self::ProfilePhoto => "Profile Photo",
            Self::CoverPhoto => "Cover Photo",
        }
    }

    /// Fields that are assigned by a dedicated picker instead of free text.
    pub const fn is_picker(self) -> bool {
        matches!(
            self,
            Self::Country | Self::Dob | Self::Gender | Self::MaritalStatus
        )
    }

    /// Fields the user never types into directly.
    pub const fn is_managed(self) -> bool {
        matches!(
            self,
            Self::Longitude | Self::Latitude | Self::ProfilePhoto | Self::CoverPhoto
        )
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProfileField {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.key() == value)
            .ok_or_else(|| Error::InvalidInput(format!("unknown profile field '{value}'")))
    }
}

/// Image target an upload or preview applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSlot {
    Profile,
    Cover,
}

impl ImageSlot {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Cover => "cover",
        }
    }

    /// Draft field that stores the remote URL for this slot.
    pub const fn photo_field(self) -> ProfileField {
        match self {
            Self::Profile => ProfileField::ProfilePhoto,
            Self::Cover => ProfileField::CoverPhoto,
        }
    }
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSlot {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "profile" => Ok(Self::Profile),
            "cover" => Ok(Self::Cover),
            other => Err(Error::InvalidInput(format!("unknown image slot '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|option| option.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("unknown gender '{value}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
}

impl MaritalStatus {
    pub const ALL: [Self; 3] = [Self::Single, Self::Married, Self::Divorced];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Married => "Married",
            Self::Divorced => "Divorced",
        }
    }
}

impl FromStr for MaritalStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|option| option.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("unknown marital status '{value}'")))
    }
}
