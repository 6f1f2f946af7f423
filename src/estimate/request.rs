use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{estimate, store::StationNode};

/// The date and time of day an estimate is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimateWhen {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl Default for EstimateWhen {
    fn default() -> Self {
        Self {
            date: Local::now().date_naive(),
            time: NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default(),
        }
    }
}

impl EstimateWhen {
    /// Parses an ISO date and an `HH:MM` time of day.
    pub fn parse(date: &str, time: &str) -> Result<Self, estimate::Error> {
        Ok(Self {
            date: parse_date(date)?,
            time: parse_time(time)?,
        })
    }
}

/// `YYYY-MM-DD`
pub fn parse_date(value: &str) -> Result<NaiveDate, estimate::Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| estimate::Error::InvalidDate(value.to_string()))
}

/// `HH:MM`
pub fn parse_time(value: &str) -> Result<NaiveTime, estimate::Error> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| estimate::Error::InvalidTime(value.to_string()))
}

/// Payload sent for one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub node_id: String,
    pub date: String,
    pub time: String,
    pub station: String,
    pub line: String,
    pub lat: f64,
    pub lon: f64,
}

impl EstimateRequest {
    pub fn new(station: &StationNode, when: &EstimateWhen) -> Self {
        Self {
            node_id: station.id.to_string(),
            date: when.date.format("%Y-%m-%d").to_string(),
            time: when.time.format("%H:%M").to_string(),
            station: station.station.to_string(),
            line: station.line.to_string(),
            lat: station.coordinate.latitude,
            lon: station.coordinate.longitude,
        }
    }
}

/// Successful backend reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateResponse {
    pub value: f64,
}

impl EstimateResponse {
    pub fn load(&self) -> Result<i32, estimate::Error> {
        if self.value.is_finite() {
            Ok(self.value.round() as i32)
        } else {
            Err(estimate::Error::InvalidResponse(format!(
                "value {} is not a number",
                self.value
            )))
        }
    }
}
