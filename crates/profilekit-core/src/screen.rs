//! The personal account screen: form, uploads and submission wired together.
//!
//! A screen is mounted against injected collaborators, re-seeds its form
//! whenever the shared store publishes a new version, and stops applying any
//! result once [`PersonalAccountScreen::unmount`] has been called.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;

use crate::api::{AuthApi, StorageApi};
use crate::config::{ConfigLookup, UPLOAD_PRESET_KEY};
use crate::error::{Error, Result};
use crate::form::ProfileForm;
use crate::models::{Gender, ImageSlot, MaritalStatus, ProfileDraft, ProfileField};
use crate::notify::Notifier;
use crate::sequencer::{EntryContext, SubmissionPhase, SubmitOutcome, UpdateSequencer};
use crate::store::{AuthState, UserStore};
use crate::upload::{ImageOutcome, UploadOrchestrator};

const COUNTRY_PLACEHOLDER: &str = "Select your country";
const GENDER_PLACEHOLDER: &str = "Choose Gender";
const MARITAL_STATUS_PLACEHOLDER: &str = "Marital Status";
const SAVE_TITLE: &str = "Save";

/// Collaborators a screen is mounted with.
pub struct ScreenDeps {
    pub auth_api: Arc<dyn AuthApi>,
    pub storage_api: Arc<dyn StorageApi>,
    pub store: Arc<dyn UserStore>,
    pub notifier: Arc<dyn Notifier>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    pub field: ProfileField,
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerView {
    pub placeholder: String,
    pub value: Option<String>,
    pub options: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonView {
    pub title: &'static str,
    pub busy: bool,
    pub disabled: bool,
}

/// Render snapshot of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    pub screen_name: String,
    pub profile_photo: Option<String>,
    pub cover_photo: Option<String>,
    pub upper_inputs: Vec<InputView>,
    pub country_placeholder: String,
    pub location_inputs: Vec<InputView>,
    pub dob: String,
    pub gender: PickerView,
    pub marital_status: PickerView,
    pub social_inputs: Vec<InputView>,
    pub save: ButtonView,
    pub uploading: bool,
}

pub struct PersonalAccountScreen {
    screen_name: String,
    store: Arc<dyn UserStore>,
    form: Mutex<ProfileForm>,
    sequencer: Arc<UpdateSequencer>,
    uploads: UploadOrchestrator,
    cancel: CancellationToken,
}

impl PersonalAccountScreen {
    /// Mount the screen and seed the form from the store's current user.
    ///
    /// The upload preset is optional here; picking an image without one
    /// fails at upload time.
    pub fn mount(
        screen_name: impl Into<String>,
        context: EntryContext,
        deps: ScreenDeps,
        config: &dyn ConfigLookup,
    ) -> Self {
        let upload_preset = config.get(UPLOAD_PRESET_KEY);
        let defaults = config.seed_defaults();

        let cancel = CancellationToken::new();
        let sequencer = Arc::new(UpdateSequencer::new(
            deps.auth_api,
            Arc::clone(&deps.store),
            Arc::clone(&deps.notifier),
            context,
            cancel.clone(),
        ));
        let uploads = UploadOrchestrator::new(
            deps.storage_api,
            Arc::clone(&sequencer),
            deps.notifier,
            upload_preset,
            cancel.clone(),
        );
        let form = ProfileForm::seeded(&deps.store.current(), defaults);

        let screen_name = screen_name.into();
        tracing::debug!(screen = %screen_name, %context, "mounted personal account screen");
        Self {
            screen_name,
            store: deps.store,
            form: Mutex::new(form),
            sequencer,
            uploads,
            cancel,
        }
    }

    fn form(&self) -> MutexGuard<'_, ProfileForm> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_mounted(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }

    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Stop applying results of in-flight work. Pending calls resolve to
    /// [`Error::Cancelled`].
    pub fn unmount(&self) {
        tracing::debug!(screen = %self.screen_name, "unmounting personal account screen");
        self.cancel.cancel();
    }

    pub fn context(&self) -> EntryContext {
        self.sequencer.context()
    }

    pub fn is_loading(&self) -> bool {
        self.sequencer.is_loading()
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.sequencer.phase()
    }

    pub fn draft(&self) -> ProfileDraft {
        self.form().values().clone()
    }

    pub fn value(&self, field: ProfileField) -> Option<String> {
        self.form().value(field).map(ToString::to_string)
    }

    pub fn change(&self, field: ProfileField, text: &str) -> Result<()> {
        self.ensure_mounted()?;
        self.form().change(field, text)
    }

    pub fn select_country(&self, name: &str) -> Result<()> {
        self.ensure_mounted()?;
        self.form().select_country(name);
        Ok(())
    }

    pub fn select_dob(&self, date: NaiveDate) -> Result<()> {
        self.ensure_mounted()?;
        self.form().select_dob(date);
        Ok(())
    }

    pub fn select_gender(&self, gender: Gender) -> Result<()> {
        self.ensure_mounted()?;
        self.form().select_gender(gender);
        Ok(())
    }

    pub fn select_marital_status(&self, status: MaritalStatus) -> Result<()> {
        self.ensure_mounted()?;
        self.form().select_marital_status(status);
        Ok(())
    }

    /// Re-seed the form if the store moved past the last seeded version.
    pub fn sync_with_store(&self) -> bool {
        let state = self.store.current();
        self.reseed_from(&state)
    }

    fn reseed_from(&self, state: &AuthState) -> bool {
        if !self.is_mounted() {
            return false;
        }
        self.form().reseed(state)
    }

    /// Re-seed on every store publication until the screen unmounts.
    pub async fn follow_store(&self) {
        let mut updates = self.store.subscribe();
        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = updates.borrow_and_update().clone();
                    self.reseed_from(&state);
                }
            }
        }
    }

    /// Save button: submit the whole draft.
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        self.ensure_mounted()?;
        let payload = self.form().submission();
        let outcome = self.sequencer.submit(payload).await?;
        self.sync_with_store();
        Ok(outcome)
    }

    /// Open the image-selection surface for `slot`.
    pub fn select_upload_target(&self, slot: ImageSlot) -> Result<ImageSlot> {
        self.ensure_mounted()?;
        Ok(self.uploads.select_upload_target(slot))
    }

    /// Callback of the image-selection surface.
    pub async fn on_image_selected(
        &self,
        slot: Option<ImageSlot>,
        local_uri: Option<&str>,
    ) -> Result<ImageOutcome> {
        self.ensure_mounted()?;
        let outcome = self.uploads.on_image_selected(slot, local_uri).await?;
        if matches!(outcome, ImageOutcome::Saved { .. }) {
            self.sync_with_store();
        }
        Ok(outcome)
    }

    pub fn render(&self) -> ScreenView {
        let form = self.form();
        let draft = form.values();
        let text = |field: ProfileField| draft.get(field).map(ToString::to_string);
        let inputs = |fields: &[ProfileField]| {
            fields
                .iter()
                .map(|&field| InputView {
                    field,
                    label: field.label(),
                    value: text(field).unwrap_or_default(),
                })
                .collect::<Vec<_>>()
        };
        let loading = self.is_loading();

        ScreenView {
            screen_name: self.screen_name.clone(),
            profile_photo: self
                .uploads
                .preview(ImageSlot::Profile)
                .or_else(|| text(ProfileField::ProfilePhoto)),
            cover_photo: self
                .uploads
                .preview(ImageSlot::Cover)
                .or_else(|| text(ProfileField::CoverPhoto)),
            upper_inputs: inputs(&ProfileField::UPPER_INPUTS),
            country_placeholder: text(ProfileField::Country)
                .filter(|country| !country.is_empty())
                .unwrap_or_else(|| COUNTRY_PLACEHOLDER.to_string()),
            location_inputs: inputs(&ProfileField::LOCATION_INPUTS),
            dob: text(ProfileField::Dob).unwrap_or_default(),
            gender: PickerView {
                placeholder: GENDER_PLACEHOLDER.to_string(),
                value: text(ProfileField::Gender),
                options: Gender::ALL.iter().map(|option| option.as_str()).collect(),
            },
            marital_status: PickerView {
                placeholder: text(ProfileField::MaritalStatus)
                    .filter(|status| !status.is_empty())
                    .unwrap_or_else(|| MARITAL_STATUS_PLACEHOLDER.to_string()),
                value: text(ProfileField::MaritalStatus),
                options: MaritalStatus::ALL
                    .iter()
                    .map(|option| option.as_str())
                    .collect(),
            },
            social_inputs: inputs(&ProfileField::SOCIAL_INPUTS),
            save: ButtonView {
                title: SAVE_TITLE,
                busy: loading,
                disabled: loading || !self.is_mounted(),
            },
            uploading: self.uploads.is_uploading(),
        }
    }
}

impl Drop for PersonalAccountScreen {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
