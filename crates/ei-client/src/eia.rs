//! EIA energy-efficiency savings, queried directly with an API key.

use std::time::Duration;

use ei_core::{EiaResponse, SavingsSector};
use reqwest::blocking::Client;

use crate::api::decode;
use crate::config::ClientConfig;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub struct EiaClient {
    http: Client,
    url: String,
    api_key: Option<String>,
}

impl EiaClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_s))
            .build()?;
        Ok(Self {
            http,
            url: config.eia_url.clone(),
            api_key: config.eia_api_key.clone(),
        })
    }

    /// Annual savings for `state` covering `year - 1` through `year`.
    pub fn savings(&self, state: &str, year: i32) -> ClientResult<EiaResponse> {
        let api_key = self.api_key.as_deref().ok_or(ClientError::MissingApiKey)?;
        let query = savings_query(state, year, api_key);
        tracing::debug!(state, year, "querying EIA savings");
        let response = self.http.get(&self.url).query(&query).send()?;
        decode(response)
    }
}

pub fn savings_query(state: &str, year: i32, api_key: &str) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("frequency", "annual".to_string()),
        ("data[0]", "energy-savings".to_string()),
        ("facets[state][]", state.to_string()),
    ];
    for sector in SavingsSector::ALL {
        query.push(("facets[sector][]", sector.code().to_string()));
    }
    query.extend([
        ("start", (year - 1).to_string()),
        ("end", year.to_string()),
        ("sort[0][column]", "period".to_string()),
        ("sort[0][direction]", "desc".to_string()),
        ("offset", "0".to_string()),
        ("length", "5000".to_string()),
        ("api_key", api_key.to_string()),
    ]);
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_spans_previous_year_and_all_sectors() {
        let query = savings_query("TX", 2022, "key");
        let get = |k: &str| -> Vec<&str> {
            query
                .iter()
                .filter(|(name, _)| *name == k)
                .map(|(_, v)| v.as_str())
                .collect()
        };
        assert_eq!(get("start"), vec!["2021"]);
        assert_eq!(get("end"), vec!["2022"]);
        assert_eq!(get("facets[sector][]"), vec!["IND", "RES", "TOT"]);
        assert_eq!(get("facets[state][]"), vec!["TX"]);
    }

    #[test]
    fn missing_key_fails_before_any_request() {
        let client = EiaClient::new(&ClientConfig::default()).unwrap();
        assert!(matches!(
            client.savings("NY", 2023),
            Err(ClientError::MissingApiKey)
        ));
    }
}
