#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report identifiers and descriptors for the analytics catalog.
//!
//! Reports are addressed by a stable [`ReportId`] so that display labels
//! can change without touching anything that stores or links to a report.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Stable identifier of a predefined analytics report.
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ReportId {
    /// Top 10 vehicles by drug-related stop count.
    TopDrugVehicles,
    /// Top 20 vehicles by search count.
    MostSearchedVehicles,
    /// Arrest rate per driver age group.
    AgeGroupArrestRate,
    /// Driver gender distribution per country.
    GenderByCountry,
    /// Top 20 race and gender combinations by search rate.
    RaceGenderSearchRate,
    /// Stop count per hour of day.
    HourlyStops,
    /// Average stop length per violation.
    AvgDurationByViolation,
    /// Arrest rate per time-of-day bucket.
    PeriodArrestRate,
    /// Search and arrest counts per violation.
    ViolationSearchArrest,
    /// Top 15 violations among drivers under 25.
    YoungDriverViolations,
    /// Top 20 countries by search count.
    CountrySearchRanking,
}

impl ReportId {
    /// Human-readable title shown in report pickers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TopDrugVehicles => "Top 10 vehicle numbers involved in drug-related stops",
            Self::MostSearchedVehicles => "Which vehicles were most frequently searched",
            Self::AgeGroupArrestRate => "Driver age group with highest arrest rate",
            Self::GenderByCountry => "Gender distribution of drivers stopped in each country",
            Self::RaceGenderSearchRate => "Race & gender combination with highest search rate",
            Self::HourlyStops => "Time of day with most traffic stops (hourly)",
            Self::AvgDurationByViolation => "Average stop duration for different violations",
            Self::PeriodArrestRate => "Are night stops more likely to lead to arrests",
            Self::ViolationSearchArrest => "Violations most associated with searches or arrests",
            Self::YoungDriverViolations => {
                "Which violations are most common among younger drivers (<25)"
            }
            Self::CountrySearchRanking => "Country with most stops where search conducted",
        }
    }

    /// Returns all variants of this enum, in catalog order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::TopDrugVehicles,
            Self::MostSearchedVehicles,
            Self::AgeGroupArrestRate,
            Self::GenderByCountry,
            Self::RaceGenderSearchRate,
            Self::HourlyStops,
            Self::AvgDurationByViolation,
            Self::PeriodArrestRate,
            Self::ViolationSearchArrest,
            Self::YoungDriverViolations,
            Self::CountrySearchRanking,
        ]
    }
}

/// A report as listed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Stable identifier.
    pub id: ReportId,
    /// Display label.
    pub label: String,
}

impl From<ReportId> for ReportSummary {
    fn from(id: ReportId) -> Self {
        Self {
            id,
            label: id.label().to_string(),
        }
    }
}
