use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Command line options
#[derive(Parser, Debug, Serialize, Deserialize)]
#[command(name = "eventcal", author, version, about)]
pub struct Opt {
    /// The config file to read
    ///
    /// All paths mentioned in the config are relative to the directory containing the config file.
    #[clap(short, long, default_value_t = String::from("eventcal.toml"))]
    #[serde(skip)]
    pub config: String,

    /// Create the example config file in the current directory
    #[clap(long, default_value_t = false)]
    #[serde(skip)]
    pub create_default_config: bool,

    /// The event catalog file to read
    #[clap(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_file: Option<PathBuf>,

    /// Do not delete files in the output directory
    #[clap(long, default_value_t = false)]
    pub no_delete: bool,

    /// Enable debug logging
    #[clap(short, long, default_value_t = false)]
    #[serde(skip)]
    pub verbose: bool,

    #[command(subcommand)]
    #[serde(skip)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the calendar pages to the output directory (the default)
    Render {
        /// Only show events on this continent (e.g. "Europe", "Online")
        #[arg(long)]
        continent: Option<String>,

        /// Only show events of this type (e.g. "conference", "meetup")
        #[arg(long = "type")]
        event_type: Option<String>,

        /// Only show events whose name or location contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Print the filtered event catalog as a month-by-month agenda
    List {
        #[arg(long)]
        continent: Option<String>,

        #[arg(long = "type")]
        event_type: Option<String>,

        #[arg(long)]
        search: Option<String>,

        /// Only list saved events
        #[arg(long)]
        saved: bool,
    },
    /// Toggle an event in the saved list (requires a signed-in session)
    Save {
        /// The event identifier, as shown by `list`
        event_id: String,
    },
    /// Print the saved events
    Saved,
    /// Sign in with an email address (demo only, any password is accepted)
    Signin {
        email: String,

        #[arg(short, long, default_value_t = String::new())]
        password: String,
    },
    /// Sign out and clear the saved-only view
    Signout,
    /// Export one event occurrence as an iCalendar (.ics) file
    Export {
        /// The event identifier, as shown by `list`
        event_id: String,

        /// Directory to write the .ics file into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Set the rendered color theme
    Theme {
        /// "light" or "dark"
        theme: String,
    },
    /// Browse the calendar interactively, re-rendering on every change
    Browse,
}
