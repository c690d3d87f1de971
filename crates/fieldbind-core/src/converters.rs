//! Built-in converters
//!
//! Text converters trim their input before parsing. Failures are reported
//! with the converter's configured message, never as an [`Error`](crate::Error).
//!
//! Copyright (c) 2025 Fieldbind Team
//! Licensed under the Apache-2.0 license

use crate::chain::Converter;
use crate::context::ValueContext;
use crate::result::ConversionResult;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// `String` <-> `i64`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringToIntegerConverter {
    message: String,
    empty_value: Option<i64>,
}

impl StringToIntegerConverter {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            empty_value: None,
        }
    }

    /// Convert blank input to `value` instead of failing
    pub fn with_empty_value(mut self, value: i64) -> Self {
        self.empty_value = Some(value);
        self
    }
}

impl Converter<String, i64> for StringToIntegerConverter {
    fn convert_to_model(&self, value: String, _ctx: &ValueContext) -> ConversionResult<i64> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return match self.empty_value {
                Some(empty) => ConversionResult::Ok(empty),
                None => ConversionResult::Err(self.message.clone()),
            };
        }
        match trimmed.parse::<i64>() {
            Ok(parsed) => ConversionResult::Ok(parsed),
            Err(_) => ConversionResult::Err(self.message.clone()),
        }
    }

    fn convert_to_presentation(&self, value: i64, _ctx: &ValueContext) -> String {
        value.to_string()
    }
}

/// `String` <-> `f64`, honouring the locale's decimal separator
#[derive(Debug, Clone, PartialEq)]
pub struct StringToFloatConverter {
    message: String,
    empty_value: Option<f64>,
}

impl StringToFloatConverter {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            empty_value: None,
        }
    }

    pub fn with_empty_value(mut self, value: f64) -> Self {
        self.empty_value = Some(value);
        self
    }
}

impl Converter<String, f64> for StringToFloatConverter {
    fn convert_to_model(&self, value: String, ctx: &ValueContext) -> ConversionResult<f64> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return match self.empty_value {
                Some(empty) => ConversionResult::Ok(empty),
                None => ConversionResult::Err(self.message.clone()),
            };
        }
        let separator = ctx.locale.decimal_separator();
        let normalized = if separator == '.' {
            trimmed.to_string()
        } else {
            trimmed.replace(separator, ".")
        };
        match normalized.parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => ConversionResult::Ok(parsed),
            _ => ConversionResult::Err(self.message.clone()),
        }
    }

    fn convert_to_presentation(&self, value: f64, ctx: &ValueContext) -> String {
        let text = value.to_string();
        let separator = ctx.locale.decimal_separator();
        if separator == '.' {
            text
        } else {
            text.replace('.', &separator.to_string())
        }
    }
}

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// `String` <-> `NaiveDate` using a `chrono` format string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringToDateConverter {
    message: String,
    format: String,
}

impl StringToDateConverter {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn format(&self) -> &str {
        &self.format
    }
}

impl Converter<String, NaiveDate> for StringToDateConverter {
    fn convert_to_model(&self, value: String, _ctx: &ValueContext) -> ConversionResult<NaiveDate> {
        match NaiveDate::parse_from_str(value.trim(), &self.format) {
            Ok(date) => ConversionResult::Ok(date),
            Err(_) => ConversionResult::Err(self.message.clone()),
        }
    }

    fn convert_to_presentation(&self, value: NaiveDate, _ctx: &ValueContext) -> String {
        value.format(&self.format).to_string()
    }
}

/// Optional calendar date <-> UTC instant at midnight
///
/// A missing date converts to the fallback instant, the Unix epoch unless
/// configured otherwise. Never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateToDateTimeConverter {
    fallback: DateTime<Utc>,
}

impl DateToDateTimeConverter {
    pub fn new() -> Self {
        Self {
            fallback: DateTime::<Utc>::default(),
        }
    }

    pub fn with_fallback(mut self, fallback: DateTime<Utc>) -> Self {
        self.fallback = fallback;
        self
    }
}

impl Default for DateToDateTimeConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter<Option<NaiveDate>, DateTime<Utc>> for DateToDateTimeConverter {
    fn convert_to_model(&self, value: Option<NaiveDate>, _ctx: &ValueContext) -> ConversionResult<DateTime<Utc>> {
        let instant = value
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| Utc.from_utc_datetime(&midnight))
            .unwrap_or(self.fallback);
        ConversionResult::Ok(instant)
    }

    fn convert_to_presentation(&self, value: DateTime<Utc>, _ctx: &ValueContext) -> Option<NaiveDate> {
        Some(value.date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Locale;

    fn ctx(locale: &str) -> ValueContext {
        ValueContext::new(Locale::new(locale))
    }

    #[test]
    fn test_integer_conversion() {
        let converter = StringToIntegerConverter::new("Must enter a number");
        assert_eq!(converter.convert_to_model(" 42 ".to_string(), &ctx("en-US")), ConversionResult::Ok(42));
        assert_eq!(
            converter.convert_to_model("4.2".to_string(), &ctx("en-US")).message(),
            Some("Must enter a number")
        );
        assert!(converter.convert_to_model(String::new(), &ctx("en-US")).is_error());
        assert_eq!(converter.convert_to_presentation(-3, &ctx("en-US")), "-3");

        let lenient = converter.with_empty_value(0);
        assert_eq!(lenient.convert_to_model("  ".to_string(), &ctx("en-US")), ConversionResult::Ok(0));
    }

    #[test]
    fn test_float_respects_locale() {
        let converter = StringToFloatConverter::new("Must enter a number");
        assert_eq!(converter.convert_to_model("2.5".to_string(), &ctx("en-US")), ConversionResult::Ok(2.5));
        assert_eq!(converter.convert_to_model("2,5".to_string(), &ctx("de-DE")), ConversionResult::Ok(2.5));
        assert_eq!(converter.convert_to_presentation(2.5, &ctx("de-DE")), "2,5");
        assert!(converter.convert_to_model("NaN".to_string(), &ctx("en-US")).is_error());
        assert!(converter.convert_to_model("inf".to_string(), &ctx("en-US")).is_error());
    }

    #[test]
    fn test_date_format() {
        let converter = StringToDateConverter::new("Bad date").with_format("%d.%m.%Y");
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(converter.convert_to_model("29.02.2024".to_string(), &ctx("de-DE")), ConversionResult::Ok(date));
        assert_eq!(converter.convert_to_presentation(date, &ctx("de-DE")), "29.02.2024");
        assert!(converter.convert_to_model("2024-02-29".to_string(), &ctx("de-DE")).is_error());
    }

    #[test]
    fn test_missing_date_maps_to_epoch() {
        let converter = DateToDateTimeConverter::new();
        let instant = converter.convert_to_model(None, &ctx("en-US")).into_value().unwrap();
        assert_eq!(instant.timestamp(), 0);

        let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let instant = converter.convert_to_model(Some(date), &ctx("en-US")).into_value().unwrap();
        assert_eq!(converter.convert_to_presentation(instant, &ctx("en-US")), Some(date));
    }
}
