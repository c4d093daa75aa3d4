//! Energy consumption records served by `GET /api/energy`.

use serde::{Deserialize, Serialize};

use crate::paging::Pagination;

/// Locations the energy table can be filtered by.
pub const LOCATIONS: [&str; 5] = [
    "New York",
    "California",
    "Texas",
    "Florida",
    "Pennsylvania",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub date: String,
    pub sector: String,
    pub location: String,
    pub energy_consumed: f64,
    pub cost: f64,
    pub created_by: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// One page of energy records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyPage {
    pub data: Vec<EnergyRecord>,
    pub pagination: Pagination,
}
