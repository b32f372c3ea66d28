use std::{env, str::FromStr, time::Duration};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use tracing::debug;

use crate::error::{CompareResult, ConfigError};

/// Environment variable holding the viewer's IANA time zone (e.g. `Europe/Berlin`).
pub const ENV_TIME_ZONE: &str = "QUOTE_COMPARE_TZ";

/// Environment variable holding the fetch timeout in `humantime` syntax (e.g. `15s`).
pub const ENV_FETCH_TIMEOUT: &str = "QUOTE_COMPARE_FETCH_TIMEOUT";

/// Environment variable holding the ISO currency code used for currency fields.
pub const ENV_CURRENCY: &str = "QUOTE_COMPARE_CURRENCY";

// ================================================================================================
// Display Locale
// ================================================================================================

/// How calendar values are rendered for the viewer.
///
/// Patterns use `chrono`'s `strftime` syntax. The defaults mirror the `en-US`
/// short forms (`3/15/2024` and `3/15/2024, 2:30:00 PM`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLocale {
    /// Time zone instants are converted into before rendering.
    pub time_zone: Tz,
    pub date_pattern: String,
    pub datetime_pattern: String,
}

impl Default for DisplayLocale {
    fn default() -> Self {
        Self {
            time_zone: Tz::UTC,
            date_pattern: "%-m/%-d/%Y".to_string(),
            datetime_pattern: "%-m/%-d/%Y, %-I:%M:%S %p".to_string(),
        }
    }
}

impl DisplayLocale {
    pub fn with_time_zone(self, time_zone: Tz) -> Self {
        Self { time_zone, ..self }
    }

    pub fn with_date_pattern(self, pattern: impl Into<String>) -> Self {
        Self {
            date_pattern: pattern.into(),
            ..self
        }
    }

    pub fn with_datetime_pattern(self, pattern: impl Into<String>) -> Self {
        Self {
            datetime_pattern: pattern.into(),
            ..self
        }
    }
}

// ================================================================================================
// Currency Style
// ================================================================================================

/// The single currency unit all currency fields are rendered in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyStyle {
    /// ISO 4217 code, e.g. `USD`.
    pub code: String,
    /// Prefix placed in front of the amount, e.g. `$`.
    pub symbol: String,
}

impl Default for CurrencyStyle {
    fn default() -> Self {
        Self::from_code("USD")
    }
}

impl CurrencyStyle {
    /// Builds a style from an ISO code. Codes without a well-known symbol use
    /// the code itself followed by a non-breaking space as prefix.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_ascii_uppercase();
        let symbol = match code.as_str() {
            "USD" => "$".to_string(),
            "EUR" => "€".to_string(),
            "GBP" => "£".to_string(),
            "JPY" => "¥".to_string(),
            other => format!("{other}\u{a0}"),
        };
        Self { code, symbol }
    }
}

// ================================================================================================
// Comparator Configuration
// ================================================================================================

/// Configuration of the comparison engine and its view controller.
///
/// # Example
///
/// ```
/// # use quote_comparator::prelude::*;
/// # use std::time::Duration;
/// let config = ComparatorConfig::default()
///     .with_fetch_timeout(Duration::from_secs(10))
///     .with_fallback_object_label("Unknown");
/// assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
/// ```
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparatorConfig {
    // ========================================================================
    // Rendering
    // ========================================================================
    /// Label used for a section whose left-hand side has no data.
    fallback_object_label: String,

    /// Text shown for any value that resolves to nothing.
    empty_display: String,

    currency: CurrencyStyle,

    locale: DisplayLocale,

    // ========================================================================
    // View
    // ========================================================================
    /// Upper bound for a single comparison fetch.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    fetch_timeout: Duration,

    /// Shown until (or instead of, on failure) the subject record's name is known.
    subject_placeholder: String,

    comparison_label: String,

    quote1_name: String,

    quote2_name: String,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self {
            fallback_object_label: "Unknown Object".to_string(),
            empty_display: "--".to_string(),
            currency: CurrencyStyle::default(),
            locale: DisplayLocale::default(),

            fetch_timeout: Duration::from_secs(30),
            subject_placeholder: "Current Quote".to_string(),
            comparison_label: "Comparison Quote".to_string(),
            quote1_name: "Quote 1".to_string(),
            quote2_name: "Quote 2".to_string(),
        }
    }
}

impl ComparatorConfig {
    /// Default configuration overlaid with the `QUOTE_COMPARE_*` environment variables.
    pub fn from_env() -> CompareResult<Self> {
        Self::default().overlay(|key| env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup. Blank values are ignored.
    pub fn overlay<F>(self, lookup: F) -> CompareResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = self;

        if let Some(tz) = get(ENV_TIME_ZONE) {
            let time_zone =
                Tz::from_str(tz.trim()).map_err(|_| ConfigError::InvalidTimeZone(tz.clone()))?;
            debug!(%time_zone, "Time zone overridden from environment");
            config.locale.time_zone = time_zone;
        }

        if let Some(timeout) = get(ENV_FETCH_TIMEOUT) {
            let fetch_timeout =
                humantime::parse_duration(timeout.trim()).map_err(ConfigError::from)?;
            if fetch_timeout.is_zero() {
                return Err(ConfigError::InvalidValue(format!(
                    "{ENV_FETCH_TIMEOUT} must be greater than zero"
                ))
                .into());
            }
            debug!(?fetch_timeout, "Fetch timeout overridden from environment");
            config.fetch_timeout = fetch_timeout;
        }

        if let Some(code) = get(ENV_CURRENCY) {
            let code = code.trim();
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ConfigError::InvalidValue(format!(
                    "{ENV_CURRENCY} must be a three-letter ISO code, got '{code}'"
                ))
                .into());
            }
            config.currency = CurrencyStyle::from_code(code);
        }

        Ok(config)
    }
}

// ================================================================================================
// Builder Methods
// ================================================================================================

impl ComparatorConfig {
    pub fn with_fallback_object_label(self, label: impl Into<String>) -> Self {
        Self {
            fallback_object_label: label.into(),
            ..self
        }
    }

    pub fn with_empty_display(self, text: impl Into<String>) -> Self {
        Self {
            empty_display: text.into(),
            ..self
        }
    }

    pub fn with_currency(self, currency: CurrencyStyle) -> Self {
        Self { currency, ..self }
    }

    pub fn with_locale(self, locale: DisplayLocale) -> Self {
        Self { locale, ..self }
    }

    pub fn with_fetch_timeout(self, fetch_timeout: Duration) -> Self {
        Self {
            fetch_timeout,
            ..self
        }
    }

    pub fn with_subject_placeholder(self, text: impl Into<String>) -> Self {
        Self {
            subject_placeholder: text.into(),
            ..self
        }
    }

    pub fn with_comparison_label(self, text: impl Into<String>) -> Self {
        Self {
            comparison_label: text.into(),
            ..self
        }
    }

    pub fn with_quote_names(self, quote1: impl Into<String>, quote2: impl Into<String>) -> Self {
        Self {
            quote1_name: quote1.into(),
            quote2_name: quote2.into(),
            ..self
        }
    }
}

// ================================================================================================
// Accessors
// ================================================================================================

impl ComparatorConfig {
    pub fn fallback_object_label(&self) -> &str {
        &self.fallback_object_label
    }

    pub fn empty_display(&self) -> &str {
        &self.empty_display
    }

    pub fn currency(&self) -> &CurrencyStyle {
        &self.currency
    }

    pub fn locale(&self) -> &DisplayLocale {
        &self.locale
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    pub fn subject_placeholder(&self) -> &str {
        &self.subject_placeholder
    }

    pub fn comparison_label(&self) -> &str {
        &self.comparison_label
    }

    pub fn quote1_name(&self) -> &str {
        &self.quote1_name
    }

    pub fn quote2_name(&self) -> &str {
        &self.quote2_name
    }
}
