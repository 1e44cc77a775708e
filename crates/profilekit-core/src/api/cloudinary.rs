//! Cloudinary unsigned-upload binding for profile and cover images.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use super::{StorageApi, UploadRequest, UploadResponse};
use crate::error::{Error, Result};
use crate::util::{excerpt, is_http_url, non_blank};

const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Clone)]
pub struct CloudinaryStorageApi {
    upload_url: String,
    client: Client,
}

impl CloudinaryStorageApi {
    pub fn new(cloud_name: &str) -> Result<Self> {
        let cloud_name = non_blank(Some(cloud_name))
            .ok_or_else(|| Error::Config("Cloudinary cloud name must not be empty".to_string()))?;
        Self::with_upload_url(format!("{CLOUDINARY_API_BASE}/{cloud_name}/image/upload"))
    }

    /// Client posting to an explicit upload endpoint.
    pub fn with_upload_url(upload_url: impl Into<String>) -> Result<Self> {
        let upload_url = upload_url.into();
        if !is_http_url(&upload_url) {
            return Err(Error::Config(
                "upload URL must include http:// or https://".to_string(),
            ));
        }
        Ok(Self {
            upload_url,
            client: Client::builder().build()?,
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }
}

#[async_trait]
impl StorageApi for CloudinaryStorageApi {
    async fn upload_image_media(&self, request: &UploadRequest) -> Result<UploadResponse> {
        let form = Form::new()
            .text("upload_preset", request.upload_preset.clone())
            .text("tags", request.upload_type.as_str())
            .part("file", file_part(&request.file).await?);

        tracing::debug!(slot = %request.upload_type, "uploading image to storage");
        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(format!(
                "image upload failed with HTTP {}: {}",
                status.as_u16(),
                excerpt(&body)
            )));
        }
        Ok(response.json::<UploadResponse>().await?)
    }
}

/// Remote URLs and data URIs are forwarded as text; anything else is read
/// from disk.
async fn file_part(file: &str) -> Result<Part> {
    let file = file.trim();
    if is_http_url(file) || file.starts_with("data:") {
        return Ok(Part::text(file.to_string()));
    }

    let path = Path::new(file.strip_prefix("file://").unwrap_or(file));
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    Ok(Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime.essence_str())?)
}
