//! Sampling intervals for price history.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

const SECS_PER_DAY: f64 = 86_400.0;

/// Sampling interval of a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    /// 1 minute bars
    #[serde(rename = "1m")]
    Minute1,
    /// 5 minute bars
    #[serde(rename = "5m")]
    Minute5,
    /// 15 minute bars
    #[serde(rename = "15m")]
    Minute15,
    /// 1 hour bars
    #[serde(rename = "1h")]
    Hour1,
    /// 4 hour bars
    #[serde(rename = "4h")]
    Hour4,
    /// Daily bars
    #[serde(rename = "1d")]
    #[default]
    Daily,
    /// Weekly bars
    #[serde(rename = "1w")]
    Weekly,
}

impl Timeframe {
    /// Get the duration of the timeframe in seconds.
    pub fn as_secs(&self) -> u64 {
        match self {
            Timeframe::Minute1 => 60,
            Timeframe::Minute5 => 300,
            Timeframe::Minute15 => 900,
            Timeframe::Hour1 => 3600,
            Timeframe::Hour4 => 14400,
            Timeframe::Daily => 86400,
            Timeframe::Weekly => 604800,
        }
    }

    /// Get the duration of the timeframe in milliseconds.
    pub fn as_millis(&self) -> u64 {
        self.as_secs() * 1000
    }

    /// Length of one bar measured in days.
    ///
    /// This is the natural forecast step size when μ and σ are quoted per day
    /// (hourly bars give 1/24).
    pub fn step_size_days(&self) -> f64 {
        self.as_secs() as f64 / SECS_PER_DAY
    }

    /// Check if this is an intraday timeframe.
    pub fn is_intraday(&self) -> bool {
        self.as_secs() < 86400
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timeframe::Minute1 => "1m",
            Timeframe::Minute5 => "5m",
            Timeframe::Minute15 => "15m",
            Timeframe::Hour1 => "1h",
            Timeframe::Hour4 => "4h",
            Timeframe::Daily => "1d",
            Timeframe::Weekly => "1w",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Timeframe {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "1min" | "minute" => Ok(Timeframe::Minute1),
            "5m" | "5min" => Ok(Timeframe::Minute5),
            "15m" | "15min" => Ok(Timeframe::Minute15),
            "1h" | "1hour" | "hour" | "hourly" => Ok(Timeframe::Hour1),
            "4h" | "4hour" => Ok(Timeframe::Hour4),
            "1d" | "day" | "daily" => Ok(Timeframe::Daily),
            "1w" | "week" | "weekly" => Ok(Timeframe::Weekly),
            _ => Err(DataError::InvalidTimeframe(s.to_string())),
        }
    }
}
