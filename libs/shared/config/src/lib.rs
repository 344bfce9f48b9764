use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

pub const DEFAULT_OPENING_HOUR: f64 = 9.0;
pub const DEFAULT_CLOSING_HOUR: f64 = 17.0;

/// Operating hours for a single clinic, expressed as fractional wall-clock
/// hours (17.5 means 5:30 PM).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicConfig {
    pub opening_hour: f64,
    pub closing_hour: f64,
}

impl ClinicConfig {
    pub fn new(opening_hour: f64, closing_hour: f64) -> Self {
        Self {
            opening_hour,
            closing_hour,
        }
    }

    pub fn from_env() -> Self {
        let config = Self {
            opening_hour: read_hour_var("CLINIC_OPENING_HOUR", DEFAULT_OPENING_HOUR),
            closing_hour: read_hour_var("CLINIC_CLOSING_HOUR", DEFAULT_CLOSING_HOUR),
        };

        if !config.is_valid() {
            warn!(
                "Invalid clinic hours {}..{}, falling back to defaults",
                config.opening_hour, config.closing_hour
            );
            return Self::default();
        }

        config
    }

    /// Opening hour must fall strictly before closing hour, both within a
    /// single calendar day.
    pub fn is_valid(&self) -> bool {
        self.opening_hour < self.closing_hour
            && self.opening_hour >= 0.0
            && self.closing_hour <= 24.0
    }
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OPENING_HOUR, DEFAULT_CLOSING_HOUR)
    }
}

fn read_hour_var(name: &str, default: f64) -> f64 {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} is not a number ({}), using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
