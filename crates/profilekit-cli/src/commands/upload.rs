use std::path::Path;
use std::sync::Arc;

use profilekit_core::upload::ImageOutcome;
use profilekit_core::ImageSlot;

use crate::cli::SlotArg;
use crate::commands::common::{load_config, mount_screen, parse_context, storage_api};
use crate::error::CliError;

pub async fn run_upload(
    config_path: Option<&Path>,
    slot: SlotArg,
    image: &str,
    from: Option<&str>,
) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let storage = Arc::new(storage_api(&config)?);
    let screen = mount_screen(&config, parse_context(from), storage).await?;
    let slot = screen.select_upload_target(ImageSlot::from(slot))?;

    match screen.on_image_selected(Some(slot), Some(image)).await? {
        ImageOutcome::Ignored => println!("No image selected"),
        ImageOutcome::Saved { secure_url, .. } => println!("{slot} photo saved: {secure_url}"),
    }
    screen.unmount();
    Ok(())
}
