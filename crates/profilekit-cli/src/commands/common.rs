use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use profilekit_core::api::{
    AuthApi, CloudinaryStorageApi, HttpAccountApi, StorageApi, UploadRequest, UploadResponse,
};
use profilekit_core::config::{
    default_config_path, AppConfig, ConfigLookup, ACCESS_TOKEN_KEY, API_BASE_URL_KEY,
    CLOUD_NAME_KEY,
};
use profilekit_core::notify::{Notice, Notifier};
use profilekit_core::screen::{InputView, PersonalAccountScreen, ScreenDeps, ScreenView};
use profilekit_core::sequencer::EntryContext;
use profilekit_core::store::{AuthState, MemoryUserStore};
use profilekit_core::{ProfileField, UserRecord};

use crate::error::CliError;

pub const SCREEN_NAME: &str = "Personal Account";

/// Surfaces screen failures on stderr; the error detail is printed by `main`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notice: Notice) {
        tracing::debug!(kind = ?notice.kind, detail = %notice.detail, "screen notice");
        eprintln!("! {}", notice.kind.title());
    }
}

pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, CliError> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(default_config_path()?),
    }
}

/// Load the config file and apply `PROFILEKIT_*` environment overrides.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, CliError> {
    let path = resolve_config_path(explicit)?;
    let mut config = AppConfig::load_from_path(&path)?;
    config.apply_env(|name| std::env::var(name).ok());
    Ok(config)
}

pub fn account_api(config: &AppConfig) -> Result<HttpAccountApi, CliError> {
    let (Some(base_url), Some(access_token)) =
        (config.get(API_BASE_URL_KEY), config.get(ACCESS_TOKEN_KEY))
    else {
        return Err(CliError::ApiNotConfigured);
    };
    Ok(HttpAccountApi::new(&base_url, access_token)?)
}

pub async fn fetch_account(api: &dyn AuthApi) -> Result<UserRecord, CliError> {
    let response = api.fetch_personal_account().await?;
    match response.data {
        Some(user) if response.status => Ok(user),
        _ => Err(CliError::AccountUnavailable(
            response
                .message
                .unwrap_or_else(|| "response did not include account data".to_string()),
        )),
    }
}

/// Storage for commands that never upload images.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImageStorage;

#[async_trait]
impl StorageApi for NoImageStorage {
    async fn upload_image_media(
        &self,
        _request: &UploadRequest,
    ) -> profilekit_core::Result<UploadResponse> {
        Err(profilekit_core::Error::Config(
            "image storage is not available for this command".to_string(),
        ))
    }
}

pub fn storage_api(config: &AppConfig) -> Result<CloudinaryStorageApi, CliError> {
    Ok(CloudinaryStorageApi::new(&config.require(CLOUD_NAME_KEY)?)?)
}

/// Fetch the account into a fresh store and mount the screen on it.
pub async fn mount_screen(
    config: &AppConfig,
    context: EntryContext,
    storage: Arc<dyn StorageApi>,
) -> Result<PersonalAccountScreen, CliError> {
    let api = account_api(config)?;
    let access_token = config.require(ACCESS_TOKEN_KEY)?;
    let user = fetch_account(&api).await?;

    let store = Arc::new(MemoryUserStore::new(AuthState::with_session(
        user,
        access_token,
    )));
    let screen = PersonalAccountScreen::mount(
        SCREEN_NAME,
        context,
        ScreenDeps {
            auth_api: Arc::new(api),
            storage_api: storage,
            store,
            notifier: Arc::new(StderrNotifier),
        },
        config,
    );
    Ok(screen)
}

pub fn parse_context(from: Option<&str>) -> EntryContext {
    from.map_or_else(EntryContext::default, |flow| {
        flow.parse().unwrap_or_default()
    })
}

/// Parse a `field=value` text assignment.
pub fn parse_assignment(raw: &str) -> Result<(ProfileField, String), CliError> {
    let Some((field, value)) = raw.split_once('=') else {
        return Err(CliError::InvalidAssignment(raw.to_string()));
    };
    let field = field
        .parse::<ProfileField>()
        .map_err(|_| CliError::InvalidAssignment(raw.to_string()))?;
    Ok((field, value.to_string()))
}

fn input_line(input: &InputView) -> String {
    format!("{:<16} {}", input.label, input.value)
}

/// Plain-text rendering of the screen, section by section.
pub fn format_form_lines(view: &ScreenView) -> Vec<String> {
    let mut lines = vec![view.screen_name.clone()];
    lines.push(format!(
        "{:<16} {}",
        "Profile Photo",
        view.profile_photo.as_deref().unwrap_or("-")
    ));
    lines.push(format!(
        "{:<16} {}",
        "Cover Photo",
        view.cover_photo.as_deref().unwrap_or("-")
    ));
    lines.extend(view.upper_inputs.iter().map(input_line));
    lines.push(format!("{:<16} {}", "Country/Region*", view.country_placeholder));
    lines.extend(view.location_inputs.iter().map(input_line));
    lines.push(format!("{:<16} {}", "Date of Birth", view.dob));
    lines.push(format!(
        "{:<16} {}",
        "Gender",
        view.gender
            .value
            .as_deref()
            .unwrap_or(view.gender.placeholder.as_str())
    ));
    lines.push(format!("{:<16} {}", "Marital Status", view.marital_status.placeholder));
    lines.push("Links to social media pages".to_string());
    lines.extend(view.social_inputs.iter().map(input_line));
    lines
}

/// Known profile fields of an account record, one per line.
pub fn format_account_lines(user: &UserRecord) -> Vec<String> {
    ProfileField::ALL
        .into_iter()
        .map(|field| {
            format!(
                "{:<16} {}",
                field.label(),
                user.field(field).unwrap_or_else(|| "-".to_string())
            )
        })
        .collect()
}
