use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Number, Value};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{EnumString, IntoStaticStr};

use crate::{
    config::{ComparatorConfig, CurrencyStyle, DisplayLocale},
    record::Resolved,
};

/// Label shown for the product lookup field regardless of its stored label.
pub const PRODUCT_LABEL: &str = "Product";

// ================================================================================================
// Field Type Tag
// ================================================================================================

/// Declared type of a comparable field. Drives the formatting policy.
///
/// Parsing is case-insensitive; any unrecognised tag (including `"string"`,
/// `"picklist"`, ...) is kept verbatim in [`FieldType::Text`].
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    IntoStaticStr,
    SerializeDisplay,
    DeserializeFromStr,
)]
#[strum(ascii_case_insensitive)]
pub enum FieldType {
    #[strum(serialize = "currency")]
    Currency,

    #[strum(serialize = "percent")]
    Percent,

    #[strum(serialize = "date")]
    Date,

    #[strum(serialize = "datetime")]
    DateTime,

    #[strum(serialize = "boolean")]
    Boolean,

    #[strum(default)]
    Text(String),
}

impl Default for FieldType {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(tag) => f.write_str(tag),
            other => {
                let name: &'static str = other.into();
                f.write_str(name)
            }
        }
    }
}

// ================================================================================================
// Field Formatter
// ================================================================================================

/// Converts resolved values into display strings.
///
/// Stateless apart from its rendering settings; the same value and type always
/// yield the same string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFormatter {
    empty_display: String,
    currency: CurrencyStyle,
    locale: DisplayLocale,
}

impl Default for FieldFormatter {
    fn default() -> Self {
        Self::from_config(&ComparatorConfig::default())
    }
}

impl FieldFormatter {
    pub fn new(
        empty_display: impl Into<String>,
        currency: CurrencyStyle,
        locale: DisplayLocale,
    ) -> Self {
        Self {
            empty_display: empty_display.into(),
            currency,
            locale,
        }
    }

    pub fn from_config(config: &ComparatorConfig) -> Self {
        Self::new(
            config.empty_display(),
            config.currency().clone(),
            config.locale().clone(),
        )
    }

    pub fn empty_display(&self) -> &str {
        &self.empty_display
    }

    /// Formats `value` according to `field_type`.
    ///
    /// Empty input (no value, `null`, `""`) always renders as the empty
    /// placeholder. Values a typed policy cannot interpret fall through to
    /// plain text rendering.
    pub fn format(&self, value: Resolved<'_>, field_type: &FieldType) -> String {
        let value = match value {
            Resolved::Empty => return self.empty_display.clone(),
            Resolved::Value(Value::String(s)) if s.is_empty() => {
                return self.empty_display.clone();
            }
            Resolved::Value(value) => value,
        };

        let typed = match field_type {
            FieldType::Currency => self.currency(value),
            FieldType::Percent => Some(percent(value)),
            FieldType::Date => self.date(value),
            FieldType::DateTime => self.datetime(value),
            FieldType::Boolean => Some(boolean(value).to_string()),
            FieldType::Text(_) => None,
        };

        typed.unwrap_or_else(|| plain_text(value))
    }

    /// Label to display for a field, applying the product lookup override.
    pub fn label<'a>(&self, api_name: &str, label: &'a str) -> &'a str {
        if api_name == crate::record::PRODUCT_LOOKUP_FIELD {
            PRODUCT_LABEL
        } else {
            label
        }
    }

    fn currency(&self, value: &Value) -> Option<String> {
        let amount = to_decimal(value)?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let mut abs = amount.abs();
        abs.rescale(2);
        let text = abs.to_string();
        let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let sign = if amount.is_sign_negative() && !amount.is_zero() {
            "-"
        } else {
            ""
        };
        Some(format!(
            "{sign}{}{}.{frac_part}",
            self.currency.symbol,
            group_thousands(int_part)
        ))
    }

    fn date(&self, value: &Value) -> Option<String> {
        let pattern = &self.locale.date_pattern;
        if let Value::String(s) = value {
            if let Ok(date) = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
                return Some(date.format(pattern).to_string());
            }
        }
        let instant = parse_instant(value)?;
        Some(
            instant
                .with_timezone(&self.locale.time_zone)
                .format(pattern)
                .to_string(),
        )
    }

    fn datetime(&self, value: &Value) -> Option<String> {
        let tz = self.locale.time_zone;
        let pattern = &self.locale.datetime_pattern;
        if let Value::String(s) = value {
            if let Ok(date) = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
                let midnight = tz
                    .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
                    .earliest()?;
                return Some(midnight.format(pattern).to_string());
            }
        }
        let instant = parse_instant(value)?;
        Some(instant.with_timezone(&tz).format(pattern).to_string())
    }
}

// ================================================================================================
// Value Helpers
// ================================================================================================

fn percent(value: &Value) -> String {
    format!("{}%", plain_text(value))
}

fn boolean(value: &Value) -> &'static str {
    let truthy = match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "false" => false,
            _ => !s.is_empty(),
        },
        Value::Array(_) | Value::Object(_) => true,
    };
    if truthy { "Yes" } else { "No" }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => js_number(n),
        other => other.to_string(),
    }
}

fn to_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().replace(',', ""),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Renders a JSON number the way a browser would (`42`, not `42.0`).
fn js_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Parses the instant encodings the backend emits: RFC 3339, the
/// `+0000` offset form, naive ISO date-times (taken as UTC) and epoch millis.
fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Utc.timestamp_millis_opt(millis).single()
        }
        Value::String(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z"))
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
                        .ok()
                        .map(|naive| naive.and_utc())
                })
        }
        _ => None,
    }
}
