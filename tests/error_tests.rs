//! Error surfaces of the persisted tables, configuration and engine
//!
//! Each test drives a public entry point into a failure and checks the
//! variant and the message a caller would see.

use fx_aggregator::config::AggregatorConfig;
use fx_aggregator::data::{DailyTable, IntradayLog, VolatilityTable};
use fx_aggregator::error::FxError;
use fx_aggregator::pairs::{Pair, PairRegistry};
use fx_aggregator::sync::DataPaths;
use fx_aggregator::volatility::{self, VolatilityEngine};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[cfg(test)]
mod table_errors {
    use super::*;

    #[test]
    fn test_daily_without_date_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("daily.csv");
        fs::write(&path, "day,EURUSD\n2024-01-01,0.9\n").unwrap();

        let err = DailyTable::read(&path).unwrap_err();
        assert!(matches!(err, FxError::DataIntegrity(_)));
        assert!(err.to_string().contains("no 'date' column"));
    }

    #[test]
    fn test_daily_invalid_date_names_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("daily.csv");
        fs::write(&path, "date,EURUSD\n2024-01-01,0.9\nyesterday,0.91\n").unwrap();

        let msg = DailyTable::read(&path).unwrap_err().to_string();
        assert!(msg.contains("yesterday"));
        assert!(msg.contains("row 2"));
    }

    #[test]
    fn test_daily_missing_file_is_csv_error() {
        let dir = TempDir::new().unwrap();
        let err = DailyTable::read(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, FxError::Csv(_)));
    }

    #[test]
    fn test_intraday_bad_price_is_data_integrity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("intraday.csv");
        fs::write(
            &path,
            "ts,pair,price\n2024-05-01T10:00:00,EURUSD,0.9\n2024-05-01T11:00:00,EURUSD,abc\n",
        )
        .unwrap();

        let err = IntradayLog::new(&path).read_all().unwrap_err();
        assert!(matches!(err, FxError::DataIntegrity(_)));
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_intraday_bad_timestamp_is_data_integrity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("intraday.csv");
        fs::write(&path, "ts,pair,price\nnoon,EURUSD,0.9\n").unwrap();

        let err = IntradayLog::new(&path).latest_per_pair().unwrap_err();
        assert!(matches!(err, FxError::DataIntegrity(_)));
    }

    #[test]
    fn test_volatility_missing_file_is_csv_error() {
        let dir = TempDir::new().unwrap();
        let err = VolatilityTable::read(&dir.path().join("volatility.csv")).unwrap_err();
        assert!(matches!(err, FxError::Csv(_)));
    }
}

#[cfg(test)]
mod config_errors {
    use super::*;

    #[test]
    fn test_missing_config_file() {
        let err = AggregatorConfig::load(Path::new("/nonexistent/fx/config.toml")).unwrap_err();
        assert!(matches!(err, FxError::Config(_)));
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = AggregatorConfig::from_toml_str("[api\nbase_url = ").unwrap_err();
        assert!(matches!(err, FxError::Config(_)));
    }

    #[test]
    fn test_missing_api_section() {
        let err = AggregatorConfig::from_toml_str(
            r#"
            [[pairs]]
            name = "EURUSD"
            base = "USD"
            quote = "EUR"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, FxError::Config(_)));
    }

    #[test]
    fn test_oversized_chunk_rejected() {
        let err = AggregatorConfig::from_toml_str(
            r#"
            [api]
            base_url = "https://api.example.com/exchangerates_data"
            base_currency = "USD"

            [history]
            chunk_days = 400

            [[pairs]]
            name = "EURUSD"
            base = "USD"
            quote = "EUR"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("1..=365"));
        assert!(err.to_string().contains("400"));
    }
}

#[cfg(test)]
mod engine_errors {
    use super::*;

    #[test]
    fn test_latest_with_short_series() {
        let prices: Vec<Option<f64>> = (0..10).map(|i| Some(1.0 + i as f64 * 0.01)).collect();
        let err = VolatilityEngine::default().latest(&prices, 30).unwrap_err();

        match err {
            FxError::InsufficientData {
                required,
                available,
            } => {
                assert_eq!(required, 30);
                assert_eq!(available, 9);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_latest_with_gap_in_window() {
        let mut prices: Vec<Option<f64>> = (0..40).map(|i| Some(1.0 + i as f64 * 0.01)).collect();
        prices[35] = None;

        let err = VolatilityEngine::default().latest(&prices, 30).unwrap_err();
        assert!(matches!(err, FxError::InsufficientData { required: 30, .. }));
    }

    #[test]
    fn test_corrupt_daily_leaves_no_volatility_file() {
        let dir = TempDir::new().unwrap();
        let paths = DataPaths::new(dir.path());
        fs::write(&paths.daily, "when,EURUSD\n2024-01-01,0.9\n").unwrap();

        let registry = PairRegistry::new(vec![Pair::new("EURUSD", "USD", "EUR", false)]);
        let err = volatility::run(&registry, &paths).unwrap_err();

        assert!(matches!(err, FxError::DataIntegrity(_)));
        assert!(!paths.volatility.exists());
    }

    #[test]
    fn test_api_error_message_carries_status() {
        let err = FxError::Api {
            status: Some(429),
            payload: "rate limit reached".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("rate limit reached"));
    }
}
