//! Remote collaborators of the account screen.
//!
//! The screen only talks to these traits; [`account::HttpAccountApi`] and
//! [`cloudinary::CloudinaryStorageApi`] are the production bindings.

pub mod account;
pub mod cloudinary;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{ImageSlot, ProfileUpdate, UserRecord};

pub use account::HttpAccountApi;
pub use cloudinary::CloudinaryStorageApi;

/// Response of the account fetch endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub data: Option<UserRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response of endpoints that only report success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Image upload request sent to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRequest {
    /// Local path, remote URL or data URI of the picked image.
    pub file: String,
    pub upload_type: ImageSlot,
    pub upload_preset: String,
}

/// Storage answer for an image upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub secure_url: Option<String>,
}

impl UploadResponse {
    /// Remote URL of the stored asset, if the upload produced one.
    ///
    /// An upload only counts when storage assigned an asset id.
    pub fn uploaded_url(&self) -> Option<&str> {
        self.asset_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())?;
        self.secure_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn fetch_personal_account(&self) -> Result<AccountResponse>;
    async fn update_personal_account(&self, payload: &ProfileUpdate) -> Result<StatusResponse>;
}

#[async_trait]
pub trait StorageApi: Send + Sync {
    async fn upload_image_media(&self, request: &UploadRequest) -> Result<UploadResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploaded_url_requires_asset_id() {
        let response = UploadResponse {
            asset_id: None,
            secure_url: Some("https://x/y.png".to_string()),
        };
        assert_eq!(response.uploaded_url(), None);

        let response = UploadResponse {
            asset_id: Some("abc".to_string()),
            secure_url: Some("https://x/y.png".to_string()),
        };
        assert_eq!(response.uploaded_url(), Some("https://x/y.png"));
    }

    #[test]
    fn account_response_tolerates_missing_fields() {
        let response: AccountResponse = serde_json::from_str("{}").unwrap();
        assert!(!response.status);
        assert_eq!(response.data, None);
    }

    #[test]
    fn upload_request_uses_wire_slot_names() {
        let request = UploadRequest {
            file: "/tmp/a.png".to_string(),
            upload_type: ImageSlot::Profile,
            upload_preset: "unsigned".to_string(),
        };
        let body = serde_json::to_value(request).unwrap();
        assert_eq!(body["upload_type"], "profile");
        assert_eq!(body["upload_preset"], "unsigned");
    }
}
