use std::path::Path;
use std::sync::Arc;

use profilekit_core::form::parse_dob;
use profilekit_core::models::{Gender, MaritalStatus};
use profilekit_core::screen::PersonalAccountScreen;
use profilekit_core::sequencer::SubmitOutcome;

use crate::cli::EditArgs;
use crate::commands::common::{
    format_form_lines, load_config, mount_screen, parse_assignment, parse_context, NoImageStorage,
};
use crate::error::CliError;

pub async fn run_edit(config_path: Option<&Path>, args: EditArgs) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let screen = mount_screen(
        &config,
        parse_context(args.from.as_deref()),
        Arc::new(NoImageStorage),
    )
    .await?;

    apply_edits(&screen, &args)?;

    if args.dry_run {
        for line in format_form_lines(&screen.render()) {
            println!("{line}");
        }
        return Ok(());
    }

    match screen.submit().await? {
        SubmitOutcome::SignedOut => {
            println!("Profile saved. Sign in again to continue.");
        }
        SubmitOutcome::Refreshed(_) => {
            println!("Profile saved.");
            for line in format_form_lines(&screen.render()) {
                println!("{line}");
            }
        }
    }
    screen.unmount();
    Ok(())
}

/// Apply command-line edits to the mounted form, text inputs first.
pub fn apply_edits(screen: &PersonalAccountScreen, args: &EditArgs) -> Result<(), CliError> {
    for raw in &args.assignments {
        let (field, value) = parse_assignment(raw)?;
        screen.change(field, &value)?;
    }
    if let Some(country) = args.country.as_deref() {
        screen.select_country(country.trim())?;
    }
    if let Some(dob) = args.dob.as_deref() {
        screen.select_dob(parse_dob(dob)?)?;
    }
    if let Some(gender) = args.gender.as_deref() {
        screen.select_gender(gender.parse::<Gender>()?)?;
    }
    if let Some(status) = args.marital_status.as_deref() {
        screen.select_marital_status(status.parse::<MaritalStatus>()?)?;
    }
    Ok(())
}
