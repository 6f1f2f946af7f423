use chrono::{NaiveDate, NaiveTime};
use clap::{ArgAction, Parser};
use pulsemap::estimate::{EstimateWhen, parse_date, parse_time};
use std::{convert::Infallible, path::PathBuf, time::Duration};

pub const ESTIMATE_URL_VAR: &str = "PULSEMAP_ESTIMATE_URL";
pub const TIMEOUT_VAR: &str = "PULSEMAP_TIMEOUT_SECS";
const DEFAULT_ESTIMATE_URL: &str = "http://127.0.0.1:5000/api/estimate";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where the geometry comes from, a directory or a zip bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum DataPath {
    Dir(PathBuf),
    Zip(PathBuf),
}

impl From<PathBuf> for DataPath {
    fn from(value: PathBuf) -> Self {
        if value.extension().is_some_and(|ext| ext == "zip") {
            DataPath::Zip(value)
        } else {
            DataPath::Dir(value)
        }
    }
}

fn data_path(value: &str) -> Result<DataPath, Infallible> {
    Ok(PathBuf::from(value).into())
}

/// Command line of the headless dashboard.
#[derive(Debug, Clone, Parser)]
#[command(name = "pulsemap-dashboard", version)]
pub struct Config {
    /// Directory or zip bundle holding the line and station GeoJSON files.
    #[arg(value_name = "DATA", value_parser = data_path)]
    pub data: DataPath,

    #[arg(long = "estimate-url", value_name = "URL", env = ESTIMATE_URL_VAR, default_value = DEFAULT_ESTIMATE_URL)]
    pub estimate_url: String,

    /// HTTP timeout for a single estimate request.
    #[arg(long = "timeout", value_name = "SECS", env = TIMEOUT_VAR, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Defaults to today.
    #[arg(long = "date", value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Defaults to 12:00.
    #[arg(long = "time", value_name = "HH:MM", value_parser = parse_time)]
    pub time: Option<NaiveTime>,

    /// Line to select, matched case-insensitively.
    #[arg(long = "line", value_name = "NAME", conflicts_with = "station")]
    pub line: Option<String>,

    /// Station id to select, `{station}_{line}`.
    #[arg(long = "station", value_name = "ID")]
    pub station: Option<String>,

    /// Let the mock vehicle feed drift.
    #[arg(long = "live", action = ArgAction::SetTrue)]
    pub live: bool,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn when(&self) -> EstimateWhen {
        let defaults = EstimateWhen::default();
        EstimateWhen {
            date: self.date.unwrap_or(defaults.date),
            time: self.time.unwrap_or(defaults.time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn defaults_test() {
        let config = Config::try_parse_from(["pulsemap-dashboard", "data"]).unwrap();
        assert_eq!(config.data, DataPath::Dir("data".into()));
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.when().time.format("%H:%M").to_string(), "12:00");
        assert!(config.line.is_none());
        assert!(!config.live);
    }

    #[test]
    fn full_test() {
        let config = Config::try_parse_from([
            "pulsemap-dashboard",
            "mbta.zip",
            "--line",
            "Red",
            "--date",
            "2025-09-20",
            "--time",
            "08:15",
            "--estimate-url",
            "http://localhost:9000/api/estimate",
            "--timeout",
            "3",
            "--live",
        ])
        .unwrap();
        assert_eq!(config.data, DataPath::Zip("mbta.zip".into()));
        assert_eq!(config.line.as_deref(), Some("Red"));
        assert_eq!(config.when().date.to_string(), "2025-09-20");
        assert_eq!(config.when().time.to_string(), "08:15:00");
        assert_eq!(config.estimate_url, "http://localhost:9000/api/estimate");
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert!(config.live);
    }

    #[test]
    fn invalid_test() {
        let kind = |args: &[&str]| Config::try_parse_from(args).unwrap_err().kind();
        assert_eq!(
            kind(&["pulsemap-dashboard"]),
            ErrorKind::MissingRequiredArgument
        );
        assert_eq!(
            kind(&["pulsemap-dashboard", "data", "--line"]),
            ErrorKind::InvalidValue
        );
        assert_eq!(
            kind(&["pulsemap-dashboard", "data", "--fast"]),
            ErrorKind::UnknownArgument
        );
        assert_eq!(
            kind(&["pulsemap-dashboard", "data", "--time", "noon"]),
            ErrorKind::ValueValidation
        );
        assert_eq!(
            kind(&["pulsemap-dashboard", "data", "--line", "Red", "--station", "Park St_Red"]),
            ErrorKind::ArgumentConflict
        );
    }
}
