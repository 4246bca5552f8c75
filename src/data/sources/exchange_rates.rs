//! Exchange-rates HTTP source
//!
//! Talks to an apilayer-style exchange rates API: `GET {base_url}/timeseries`
//! and `GET {base_url}/latest`, authenticated with an `apikey` header.

use super::{LatestResponse, RateQuery, RateSource, TimeseriesResponse};
use crate::config::ApiConfig;
use crate::error::{FxError, Result};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

const API_KEY_HEADER: &str = "apikey";
const MAX_LOGGED_BODY: usize = 300;

/// Blocking client for the exchange rates API
pub struct ExchangeRatesClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl ExchangeRatesClient {
    /// Create a new client with the configured timeout
    pub fn new(api: &ApiConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .map_err(|e| FxError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: api.base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(params)
            .send()
            .map_err(|e| FxError::Transport(format!("HTTP request to {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| FxError::Transport(format!("Failed to read response: {}", e)))?;

        let data = interpret_response(status, &body)?;
        serde_json::from_value(data).map_err(|e| {
            FxError::DataIntegrity(format!("Unexpected {} response shape: {}", endpoint, e))
        })
    }
}

/// Validate a raw response envelope
///
/// Non-JSON bodies are transport failures. JSON bodies fail as API errors
/// when the status is not 2xx, `success` is `false`, or an `error` field is present.
pub fn interpret_response(status: u16, body: &str) -> Result<Value> {
    let data: Value = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(e) => {
            log::error!("HTTP {} - failed JSON: {}", status, truncate(body, MAX_LOGGED_BODY));
            return Err(FxError::Transport(format!(
                "HTTP {}: body is not valid JSON ({})",
                status, e
            )));
        }
    };

    let ok_status = (200..300).contains(&status);
    let success_flag = data.get("success").and_then(Value::as_bool);
    let has_error = data.get("error").is_some();

    if !ok_status || success_flag == Some(false) || has_error {
        log::error!("API error: {}", data);
        return Err(FxError::Api {
            status: Some(status),
            payload: data.to_string(),
        });
    }

    Ok(data)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

impl RateSource for ExchangeRatesClient {
    fn timeseries(&self, query: &RateQuery, start: NaiveDate, end: NaiveDate) -> Result<TimeseriesResponse> {
        let params = [
            ("start_date", start.format("%Y-%m-%d").to_string()),
            ("end_date", end.format("%Y-%m-%d").to_string()),
            ("base", query.base.clone()),
            ("symbols", query.symbols_param()),
        ];
        self.get("timeseries", &params)
    }

    fn latest(&self, query: &RateQuery) -> Result<LatestResponse> {
        let params = [
            ("base", query.base.clone()),
            ("symbols", query.symbols_param()),
        ];
        self.get("latest", &params)
    }

    fn name(&self) -> &str {
        "exchange_rates"
    }
}
