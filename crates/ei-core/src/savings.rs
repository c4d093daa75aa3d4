//! EIA state electricity profile: energy-efficiency savings.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// States offered by the savings panel, as (EIA code, display name).
pub const US_STATES: [(&str, &str); 5] = [
    ("NY", "New York"),
    ("CA", "California"),
    ("TX", "Texas"),
    ("FL", "Florida"),
    ("PA", "Pennsylvania"),
];

/// Years offered by the savings panel, newest first.
pub const SAVINGS_YEARS: [i32; 4] = [2023, 2022, 2021, 2020];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EiaResponse {
    pub response: EiaBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EiaBody {
    #[serde(default)]
    pub total: serde_json::Value,
    #[serde(default)]
    pub date_format: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub data: Vec<EnergySavingsData>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergySavingsData {
    pub period: String,
    pub state: String,
    pub state_name: String,
    #[serde(default)]
    pub time_period: String,
    pub sector: String,
    #[serde(default)]
    pub sector_name: String,
    #[serde(rename = "energy-savings", default, deserialize_with = "string_or_number")]
    pub energy_savings: Option<String>,
    #[serde(rename = "energy-savings-units", default)]
    pub energy_savings_units: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSavings {
    Text(String),
    Number(serde_json::Number),
}

/// EIA usually sends savings as a string; accept a bare number too.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(
        Option::<RawSavings>::deserialize(deserializer)?.map(|raw| match raw {
            RawSavings::Text(text) => text,
            RawSavings::Number(number) => number.to_string(),
        }),
    )
}

impl EnergySavingsData {
    /// Savings as an integer, truncating any fractional part.
    pub fn savings_value(&self) -> CoreResult<i64> {
        let raw = self.energy_savings.as_deref().unwrap_or("").trim();
        let integral = raw.split('.').next().unwrap_or("");
        integral.parse::<i64>().map_err(|_| CoreError::BadNumber {
            what: "energy-savings",
            value: raw.to_string(),
        })
    }
}

/// EIA sector codes the savings panel reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SavingsSector {
    Industrial,
    Residential,
    Total,
}

impl SavingsSector {
    pub const ALL: [SavingsSector; 3] = [
        SavingsSector::Industrial,
        SavingsSector::Residential,
        SavingsSector::Total,
    ];

    pub fn code(self) -> &'static str {
        match self {
            SavingsSector::Industrial => "IND",
            SavingsSector::Residential => "RES",
            SavingsSector::Total => "TOT",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SavingsSector::Industrial => "Industrial",
            SavingsSector::Residential => "Residential",
            SavingsSector::Total => "Total",
        }
    }
}
