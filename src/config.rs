use chrono::{Local, NaiveDate};
use color_eyre::eyre::{eyre, Context, Result};
use doku::Document;
use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::path::PathBuf;
use std::time::Duration;

use crate::options::Opt;

const DEFAULT_CATALOG_PATH: &str = "events.toml";
const DEFAULT_TEMPLATE_PATH: &str = "templates";

#[derive(Debug, Deserialize, Serialize, Document)]
pub struct Config {
    /// The base directory against which all other paths are resolved
    ///
    /// This is normally automatically derived from the directory in which the config file resides
    #[doku(example = ".")]
    pub base_dir: PathBuf,

    /// The title shown in the page header
    #[doku(example = "Design Events")]
    pub site_title: String,

    /// The subtitle shown under the title
    pub site_subtitle: String,

    /// The event catalog file to read
    #[doku(example = "events.toml")]
    pub catalog_file: PathBuf,

    /// The year the calendar grids are built for
    ///
    /// Event records only carry a month and day-of-month range, so this year
    /// decides where weeks begin and how many days February has.
    #[doku(example = "2026")]
    pub reference_year: i32,

    /// The date that is considered "today" on the rendered calendar
    /// (defaults to today if left empty)
    #[doku(example = "today")]
    pub calendar_today_date: String,

    // this field is created from calendar_today_date on first use, hence the serde/doku skips
    // this is the machine readable version of the above
    #[serde(skip)]
    #[doku(skip)]
    pub today_date: OnceCell<NaiveDate>,

    /// The path to the output directory where files will be written.
    ///
    /// NOTE: This is relative to the config file
    #[doku(example = "output")]
    pub output_dir: PathBuf,

    /// Do not delete files in the output directory
    #[doku(example = "false")]
    pub no_delete: bool,

    /// The directory holding persisted browser state (saved events, session, theme)
    ///
    /// Defaults to the platform data directory if left empty
    pub state_dir: Option<PathBuf>,

    /// The path to add into the stylesheet link tag
    #[doku(example = "styles/style.css")]
    pub stylesheet_path: String,

    /// Whether to copy the bundled stylesheet into the output dir
    pub copy_stylesheet_to_output: bool,

    /// The path for custom template files overriding the bundled ones
    #[doku(example = "templates")]
    pub template_path: PathBuf,

    /// How long to wait before reminding a signed-out visitor to sign in
    #[doku(example = "1500 ms")]
    pub reminder_delay: String,

    // machine readable version of reminder_delay, see above
    #[serde(skip)]
    #[doku(skip)]
    pub reminder_delay_duration: OnceCell<Duration>,
}

/// Sane default values for the config struct.
impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: ".".into(),
            site_title: "Design Events".into(),
            site_subtitle: "A year of conferences, workshops, meetups and festivals".into(),
            catalog_file: DEFAULT_CATALOG_PATH.into(),
            reference_year: 2026,
            calendar_today_date: "today".into(),
            today_date: OnceCell::new(),
            output_dir: "output".into(),
            no_delete: false,
            state_dir: None,
            stylesheet_path: "styles/style.css".into(),
            copy_stylesheet_to_output: true,
            template_path: DEFAULT_TEMPLATE_PATH.into(),
            reminder_delay: "1500 ms".into(),
            reminder_delay_duration: OnceCell::new(),
        }
    }
}

impl Config {
    pub fn new(config_path: &str, args: &Opt) -> Result<Config> {
        // ensure that all paths are relative to the config file
        let config_dir = PathBuf::from(config_path)
            .canonicalize()
            .ok()
            .and_then(|f| f.parent().map(|d| d.to_path_buf()))
            .unwrap_or(".".into());

        debug!("reading configuration...");
        let figment: Figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .admerge(Serialized::defaults(args));

        let base_dir = figment
            .find_value("base_dir")?
            .as_str()
            // join should either append the path from the config, or replace it if the specified path is absolute
            .map(|d| config_dir.join(d))
            .unwrap_or(config_dir)
            .canonicalize()
            .wrap_err("could not canonicalize base dir")?;

        debug!("base directory is set to: {:?}", base_dir);

        let config = figment
            .merge(Figment::new().join(("base_dir", base_dir)))
            .extract()?;

        Ok(config)
    }

    /// The date to mark as "today" on the rendered grids.
    ///
    /// Parsed from `calendar_today_date` on first call, falling back to the
    /// wall clock for the "today" sentinel.
    pub fn today_date(&self) -> Result<NaiveDate> {
        if let Some(date) = self.today_date.get() {
            return Ok(*date);
        }

        let date = match self.calendar_today_date.trim() {
            "" | "today" | "now" => Local::now().date_naive(),
            explicit => NaiveDate::parse_from_str(explicit, "%Y-%m-%d")
                .wrap_err("could not parse calendar_today_date")?,
        };

        // a concurrent set is impossible here, this config is single threaded
        let _ = self.today_date.set(date);
        Ok(date)
    }

    pub fn reminder_delay(&self) -> Result<Duration> {
        if let Some(delay) = self.reminder_delay_duration.get() {
            return Ok(*delay);
        }

        let delay = humantime::parse_duration(&self.reminder_delay)
            .wrap_err("could not parse reminder_delay")?;
        let _ = self.reminder_delay_duration.set(delay);
        Ok(delay)
    }

    /// The directory in which saved events, the session marker and the theme live.
    pub fn state_dir(&self) -> Result<PathBuf> {
        match &self.state_dir {
            Some(dir) => Ok(self.base_dir.join(dir)),
            None => Ok(dirs::data_dir()
                .ok_or(eyre!("could not determine the platform data directory"))?
                .join("eventcal")),
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.base_dir.join(&self.catalog_file)
    }

    pub fn output_path(&self) -> PathBuf {
        self.base_dir.join(&self.output_dir)
    }

    pub fn template_glob(&self) -> String {
        format!(
            "{}/**/*.html",
            self.base_dir.join(&self.template_path).to_string_lossy()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn explicit_today_date_is_parsed_once() {
        let config = Config {
            calendar_today_date: "2026-03-14".into(),
            ..Config::default()
        };

        let expected = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert_eq!(config.today_date().unwrap(), expected);
        // cached value wins on subsequent calls
        assert_eq!(config.today_date().unwrap(), expected);
    }

    #[test]
    fn reminder_delay_parses_humantime() {
        let config = Config::default();
        assert_eq!(
            config.reminder_delay().unwrap(),
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn bad_today_date_is_an_error() {
        let config = Config {
            calendar_today_date: "soonish".into(),
            ..Config::default()
        };
        assert!(config.today_date().is_err());
    }
}
