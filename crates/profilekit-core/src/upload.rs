//! Image pick → storage upload → profile update pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::api::{StorageApi, UploadRequest};
use crate::config::UPLOAD_PRESET_KEY;
use crate::error::{Error, Result};
use crate::models::{ImageSlot, ProfileUpdate};
use crate::notify::{FailureKind, Notice, Notifier};
use crate::sequencer::{SubmitOutcome, UpdateSequencer};
use crate::util::{non_blank, until_cancelled};

/// An image the user picked that has not finished uploading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub slot: ImageSlot,
    pub local_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// The picker reported no slot or no image.
    Ignored,
    /// Uploaded and saved as the new profile or cover photo.
    Saved {
        slot: ImageSlot,
        secure_url: String,
        outcome: SubmitOutcome,
    },
}

#[derive(Debug, Default)]
struct Previews {
    profile: Option<String>,
    cover: Option<String>,
}

impl Previews {
    fn slot_mut(&mut self, slot: ImageSlot) -> &mut Option<String> {
        match slot {
            ImageSlot::Profile => &mut self.profile,
            ImageSlot::Cover => &mut self.cover,
        }
    }
}

struct ClearOnDrop<'a>(&'a AtomicBool);

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct UploadOrchestrator {
    storage: Arc<dyn StorageApi>,
    sequencer: Arc<UpdateSequencer>,
    notifier: Arc<dyn Notifier>,
    upload_preset: Option<String>,
    target: Mutex<Option<ImageSlot>>,
    previews: Mutex<Previews>,
    in_flight: AtomicBool,
    cancel: CancellationToken,
}

impl UploadOrchestrator {
    pub fn new(
        storage: Arc<dyn StorageApi>,
        sequencer: Arc<UpdateSequencer>,
        notifier: Arc<dyn Notifier>,
        upload_preset: Option<String>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            storage,
            sequencer,
            notifier,
            upload_preset,
            target: Mutex::new(None),
            previews: Mutex::new(Previews::default()),
            in_flight: AtomicBool::new(false),
            cancel,
        }
    }

    /// Remember which slot the image-selection surface was opened for.
    pub fn select_upload_target(&self, slot: ImageSlot) -> ImageSlot {
        *self.target.lock().unwrap_or_else(PoisonError::into_inner) = Some(slot);
        slot
    }

    pub fn target(&self) -> Option<ImageSlot> {
        *self.target.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locally picked image shown for `slot`, if any.
    pub fn preview(&self, slot: ImageSlot) -> Option<String> {
        self.previews
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .slot_mut(slot)
            .clone()
    }

    pub fn is_uploading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Handle an image reported by the selection surface.
    ///
    /// The preview switches to the picked image right away. Once storage
    /// returns an asset, a single-field update is submitted on its own,
    /// queued behind a save that is already running. On failure the preview
    /// reverts and the user is notified.
    pub async fn on_image_selected(
        &self,
        slot: Option<ImageSlot>,
        local_uri: Option<&str>,
    ) -> Result<ImageOutcome> {
        let (Some(slot), Some(local_uri)) = (slot, non_blank(local_uri)) else {
            return Ok(ImageOutcome::Ignored);
        };

        let _flight = self.begin().inspect_err(|error| self.report(error))?;
        let pending = PendingUpload { slot, local_uri };
        let previous = self.set_preview(slot, Some(pending.local_uri.clone()));

        let result = self.run(&pending).await;
        if let Err(error) = &result {
            if !matches!(error, Error::Cancelled) {
                self.set_preview(slot, previous);
            }
        }
        result
    }

    async fn run(&self, pending: &PendingUpload) -> Result<ImageOutcome> {
        let secure_url = self
            .upload(pending)
            .await
            .inspect_err(|error| self.report(error))?;
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let update = ProfileUpdate::photo(pending.slot, secure_url.clone());
        let outcome = self.sequencer.submit_when_idle(update).await?;
        Ok(ImageOutcome::Saved {
            slot: pending.slot,
            secure_url,
            outcome,
        })
    }

    async fn upload(&self, pending: &PendingUpload) -> Result<String> {
        let upload_preset = self.upload_preset.clone().ok_or_else(|| {
            Error::Config(format!("'{UPLOAD_PRESET_KEY}' is not configured"))
        })?;
        let request = UploadRequest {
            file: pending.local_uri.clone(),
            upload_type: pending.slot,
            upload_preset,
        };
        tracing::debug!(slot = %pending.slot, "uploading picked image");

        let response =
            until_cancelled(&self.cancel, self.storage.upload_image_media(&request)).await?;
        response
            .uploaded_url()
            .map(ToString::to_string)
            .ok_or(Error::UploadRejected)
    }

    fn begin(&self) -> Result<ClearOnDrop<'_>> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(Error::Busy("image upload"));
        }
        Ok(ClearOnDrop(&self.in_flight))
    }

    fn set_preview(&self, slot: ImageSlot, uri: Option<String>) -> Option<String> {
        let mut previews = self.previews.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(previews.slot_mut(slot), uri)
    }

    fn report(&self, error: &Error) {
        if matches!(error, Error::Cancelled) {
            return;
        }
        tracing::warn!("image upload failed: {error}");
        self.notifier.notify(Notice {
            kind: FailureKind::Upload,
            detail: error.to_string(),
        });
    }
}
