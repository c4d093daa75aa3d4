//! Energy-efficiency savings metrics for the dashboard.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use ei_client::{ClientResult, EiaClient};
use ei_core::format::group_thousands;
use ei_core::{EiaResponse, EnergySavingsData, SavingsSector};
use ei_state::{CacheStatus, TtlCache};
use serde::Serialize;

use crate::error::AppResult;

pub const SAVINGS_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

pub trait SavingsBackend {
    fn savings(&self, state: &str, year: i32) -> ClientResult<EiaResponse>;
}

impl SavingsBackend for EiaClient {
    fn savings(&self, state: &str, year: i32) -> ClientResult<EiaResponse> {
        EiaClient::savings(self, state, year)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricChange {
    pub value: String,
    pub is_positive: bool,
}

/// One card in the savings panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub name: String,
    pub value: String,
    pub change: MetricChange,
}

pub fn savings_cache_key(year: i32, state: &str) -> String {
    format!("{}-{}", year, state)
}

#[derive(Debug)]
pub struct SavingsService<B = EiaClient> {
    backend: B,
    cache: TtlCache<String, EiaResponse>,
}

impl<B: SavingsBackend> SavingsService<B> {
    pub fn new(backend: B) -> Self {
        Self::with_ttl(backend, SAVINGS_CACHE_TTL)
    }

    pub fn with_ttl(backend: B, ttl: Duration) -> Self {
        Self {
            backend,
            cache: TtlCache::new(ttl),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn metrics(&mut self, state: &str, year: i32) -> AppResult<Vec<MetricCard>> {
        self.metrics_at(state, year, Instant::now())
    }

    pub fn metrics_at(&mut self, state: &str, year: i32, now: Instant) -> AppResult<Vec<MetricCard>> {
        let key = savings_cache_key(year, state);
        let backend = &self.backend;
        let (data, status) = self
            .cache
            .fetch_through_at(key.clone(), now, || backend.savings(state, year))?;
        if status == CacheStatus::Hit {
            tracing::debug!(%key, "savings cache hit");
        } else {
            tracing::debug!(%key, "savings cache miss");
        }
        Ok(process_energy_savings(&data, state, year))
    }

    /// Store a response fetched elsewhere and derive its metrics.
    pub fn store(&mut self, state: &str, year: i32, data: EiaResponse) -> Vec<MetricCard> {
        let metrics = process_energy_savings(&data, state, year);
        self.cache.insert(savings_cache_key(year, state), data);
        metrics
    }

    pub fn cached(&self, state: &str, year: i32) -> Option<Vec<MetricCard>> {
        self.cache
            .get(&savings_cache_key(year, state))
            .map(|data| process_energy_savings(data, state, year))
    }
}

/// Year-over-year cards for each sector present in both `year` and `year - 1`.
///
/// Sectors with an unparseable value, or a zero previous value, are skipped.
pub fn process_energy_savings(data: &EiaResponse, state: &str, year: i32) -> Vec<MetricCard> {
    let current_period = year.to_string();
    let previous_period = (year - 1).to_string();

    let mut by_period: HashMap<(&str, &str), &EnergySavingsData> = HashMap::new();
    for item in &data.response.data {
        by_period.insert((item.period.as_str(), item.sector.as_str()), item);
    }

    let state_name = data
        .response
        .data
        .iter()
        .find(|item| item.state == state)
        .map(|item| item.state_name.as_str())
        .unwrap_or(state);

    let mut metrics = Vec::new();
    for sector in SavingsSector::ALL {
        let (Some(current), Some(previous)) = (
            by_period.get(&(current_period.as_str(), sector.code())),
            by_period.get(&(previous_period.as_str(), sector.code())),
        ) else {
            continue;
        };
        let (current_value, previous_value) = match (current.savings_value(), previous.savings_value()) {
            (Ok(c), Ok(p)) => (c, p),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(sector = sector.code(), error = %e, "skipping savings sector");
                continue;
            }
        };
        if previous_value == 0 {
            tracing::warn!(sector = sector.code(), "no previous-year savings to compare");
            continue;
        }

        let pct = (current_value - previous_value) as f64 / previous_value as f64 * 100.0;
        let direction = if pct >= 0.0 { "increase" } else { "decrease" };
        metrics.push(MetricCard {
            name: format!(
                "{} Energy Savings in {} ({})",
                sector.label(),
                state_name,
                current_period
            ),
            value: format!("{} MWh", group_thousands(current_value)),
            change: MetricChange {
                value: format!("{:.1}% {} from {}", pct.abs(), direction, previous_period),
                is_positive: pct >= 0.0,
            },
        });
    }
    metrics
}
