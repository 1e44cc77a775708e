use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use profilekit_core::ImageSlot;

#[derive(Parser)]
#[command(name = "profilekit")]
#[command(about = "View and edit your personal account")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and print the personal account
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit profile fields and save
    Edit(EditArgs),
    /// Upload a profile or cover image and save it to the account
    Upload {
        /// Which image to replace
        #[arg(long, value_enum)]
        slot: SlotArg,
        /// Local image path or remote image URL
        image: String,
        /// Flow the edit belongs to (e.g. `signup_process`)
        #[arg(long, value_name = "FLOW")]
        from: Option<String>,
    },
    /// Manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Args, Debug, Default)]
pub struct EditArgs {
    /// Text field assignment, e.g. `--set first_name=Ada` (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub assignments: Vec<String>,
    /// Country picked from the country list
    #[arg(long, value_name = "NAME")]
    pub country: Option<String>,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub dob: Option<String>,
    /// Gender (Male or Female)
    #[arg(long)]
    pub gender: Option<String>,
    /// Marital status (Single, Married or Divorced)
    #[arg(long, value_name = "STATUS")]
    pub marital_status: Option<String>,
    /// Flow the edit belongs to (e.g. `signup_process`)
    #[arg(long, value_name = "FLOW")]
    pub from: Option<String>,
    /// Print the resulting form without saving
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SlotArg {
    Profile,
    Cover,
}

impl From<SlotArg> for ImageSlot {
    fn from(value: SlotArg) -> Self {
        match value {
            SlotArg::Profile => Self::Profile,
            SlotArg::Cover => Self::Cover,
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create or update the configuration file
    Init {
        /// Account API base URL
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Access token used for account requests
        #[arg(long, value_name = "TOKEN")]
        access_token: Option<String>,
        /// Cloudinary cloud name
        #[arg(long, value_name = "NAME")]
        cloud_name: Option<String>,
        /// Cloudinary unsigned upload preset
        #[arg(long, value_name = "PRESET")]
        upload_preset: Option<String>,
        /// Longitude sent when the account has none
        #[arg(long, value_name = "VALUE")]
        default_longitude: Option<String>,
        /// Latitude sent when the account has none
        #[arg(long, value_name = "VALUE")]
        default_latitude: Option<String>,
    },
    /// Print the effective configuration
    Show,
}
