#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Traffic-stop record types and reporting bucket definitions.
//!
//! This crate defines the shape of a row in the `police_post_log` table and
//! the fixed bucketings (stop duration, time of day, driver age) that the
//! analytics reports group by. The bucket enums are the single source of
//! truth for both the Rust-side classification helpers and the SQL `CASE`
//! expressions generated by the report catalog.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Name of the table holding traffic-stop records.
pub const STOPS_TABLE: &str = "police_post_log";

/// Column names of [`STOPS_TABLE`] in insertion order.
pub const STOP_COLUMNS: &[&str] = &[
    "stop_date",
    "stop_time",
    "country_name",
    "driver_gender",
    "driver_age_raw",
    "driver_age",
    "driver_race",
    "violation_raw",
    "violation",
    "search_conducted",
    "search_type",
    "stop_outcome",
    "is_arrested",
    "stop_duration",
    "drugs_related_stop",
    "vehicle_number",
];

/// How long a stop lasted, as recorded by the officer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum StopDuration {
    /// Under fifteen minutes.
    #[serde(rename = "<15")]
    #[strum(serialize = "<15")]
    UnderFifteen,
    /// Six to fifteen minutes.
    #[serde(rename = "6-15")]
    #[strum(serialize = "6-15")]
    SixToFifteen,
    /// Sixteen to thirty minutes.
    #[serde(rename = "16-30")]
    #[strum(serialize = "16-30")]
    SixteenToThirty,
    /// More than thirty minutes.
    #[serde(rename = "30+")]
    #[strum(serialize = "30+")]
    OverThirty,
}

impl StopDuration {
    /// Representative length of the bucket in minutes, used when averaging
    /// stop durations.
    #[must_use]
    pub const fn minutes(self) -> f64 {
        match self {
            Self::UnderFifteen => 7.5,
            Self::SixToFifteen => 10.5,
            Self::SixteenToThirty => 23.0,
            Self::OverThirty => 45.0,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::UnderFifteen,
            Self::SixToFifteen,
            Self::SixteenToThirty,
            Self::OverThirty,
        ]
    }
}

/// Coarse time-of-day bucket derived from the hour a stop happened.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum DayPeriod {
    /// Hours 0 through 5.
    Night,
    /// Hours 6 through 17.
    Day,
    /// Every other hour.
    Evening,
}

impl DayPeriod {
    /// Buckets an hour of the day (0-23).
    #[must_use]
    pub const fn for_hour(hour: u32) -> Self {
        match hour {
            0..=5 => Self::Night,
            6..=17 => Self::Day,
            _ => Self::Evening,
        }
    }

    /// Inclusive hour range covered by this bucket. `None` marks the
    /// catch-all bucket.
    #[must_use]
    pub const fn hour_range(self) -> Option<(u32, u32)> {
        match self {
            Self::Night => Some((0, 5)),
            Self::Day => Some((6, 17)),
            Self::Evening => None,
        }
    }

    /// Returns all variants of this enum, catch-all last.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Night, Self::Day, Self::Evening]
    }
}

/// Driver age bucket used by the arrest-rate report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AgeGroup {
    /// Younger than 18.
    #[serde(rename = "<18")]
    #[strum(serialize = "<18")]
    Under18,
    /// 18 through 24.
    #[serde(rename = "18-24")]
    #[strum(serialize = "18-24")]
    From18To24,
    /// 25 through 34.
    #[serde(rename = "25-34")]
    #[strum(serialize = "25-34")]
    From25To34,
    /// 35 through 49.
    #[serde(rename = "35-49")]
    #[strum(serialize = "35-49")]
    From35To49,
    /// 50 and older, and anything unclassifiable.
    #[serde(rename = "50+")]
    #[strum(serialize = "50+")]
    Over50,
}

impl AgeGroup {
    /// Inclusive `(min, max)` ages of the bucket. An open side is `None`.
    #[must_use]
    pub const fn bounds(self) -> (Option<i32>, Option<i32>) {
        match self {
            Self::Under18 => (None, Some(17)),
            Self::From18To24 => (Some(18), Some(24)),
            Self::From25To34 => (Some(25), Some(34)),
            Self::From35To49 => (Some(35), Some(49)),
            Self::Over50 => (Some(50), None),
        }
    }

    /// Buckets a driver age.
    #[must_use]
    pub const fn for_age(age: i32) -> Self {
        match age {
            i32::MIN..=17 => Self::Under18,
            18..=24 => Self::From18To24,
            25..=34 => Self::From25To34,
            35..=49 => Self::From35To49,
            _ => Self::Over50,
        }
    }

    /// Returns all variants of this enum, catch-all last.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Under18,
            Self::From18To24,
            Self::From25To34,
            Self::From35To49,
            Self::Over50,
        ]
    }
}

/// One traffic-stop event as stored in [`STOPS_TABLE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopRecord {
    /// Calendar date of the stop.
    pub stop_date: NaiveDate,
    /// Local time of the stop.
    pub stop_time: NaiveTime,
    /// Jurisdiction the stop happened in.
    pub country_name: String,
    /// Driver gender as recorded.
    pub driver_gender: String,
    /// Driver age as originally entered.
    pub driver_age_raw: i32,
    /// Normalized driver age.
    pub driver_age: i32,
    /// Driver race as recorded.
    pub driver_race: String,
    /// Violation as originally entered.
    pub violation_raw: String,
    /// Normalized violation.
    pub violation: String,
    /// Whether a search was conducted.
    pub search_conducted: bool,
    /// Kind of search, if any.
    pub search_type: String,
    /// Outcome of the stop (citation, warning, arrest, ...).
    pub stop_outcome: String,
    /// Whether the driver was arrested.
    pub is_arrested: bool,
    /// Duration bucket of the stop.
    pub stop_duration: StopDuration,
    /// Whether the stop was drug related.
    pub drugs_related_stop: bool,
    /// Vehicle identifier (plate number).
    pub vehicle_number: String,
}
