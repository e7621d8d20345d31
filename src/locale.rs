//! Locale-aware decimal handling for numbers scraped from the web interface.
//!
//! The daemon renders numbers with whatever decimal separator its own locale
//! uses, while the remote side may be running under a different culture. All
//! numeric text is normalized to the active separator before conversion, so
//! `"50,1"` and `"50.1"` both read as `50.1`.

use std::fmt;

use serde::Serialize;
use tracing::debug;

/// Culture names with a known decimal separator.
pub const SUPPORTED_CULTURES: [&str; 5] = ["en-US", "it-IT", "de-DE", "fr-FR", "es-ES"];

/// Decimal separator used by the active locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberLocale {
    /// `1,234.5` style (en-US).
    #[default]
    Period,
    /// `1.234,5` style (it-IT, de-DE, fr-FR, es-ES).
    Comma,
}

impl NumberLocale {
    /// Selects the locale for a culture name such as `"it-IT"`.
    ///
    /// Unknown cultures fall back to [`NumberLocale::Period`].
    #[must_use]
    pub fn from_culture(culture: &str) -> Self {
        let language = culture
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "it" | "de" | "fr" | "es" => Self::Comma,
            "en" => Self::Period,
            other => {
                debug!(culture = %culture, language = %other, "unknown culture, using period separator");
                Self::Period
            }
        }
    }

    /// The decimal separator character.
    #[must_use]
    pub fn decimal_separator(self) -> char {
        match self {
            Self::Period => '.',
            Self::Comma => ',',
        }
    }

    /// The digit grouping separator character.
    #[must_use]
    pub fn group_separator(self) -> char {
        match self {
            Self::Period => ',',
            Self::Comma => '.',
        }
    }

    /// Normalizes `raw` so that either separator becomes the active one.
    #[must_use]
    pub fn normalize(self, raw: &str) -> String {
        let active = self.decimal_separator();
        raw.trim()
            .chars()
            .map(|c| if c == '.' || c == ',' { active } else { c })
            .collect()
    }

    /// Parses a decimal number written with either separator.
    ///
    /// Returns `None` when the text is not a number after normalization
    /// (grouped values such as `"1,234.5"` are rejected, matching how the
    /// daemon's own locale conversion treats them). Only digits, the
    /// separator and a sign are accepted, so exponents and `inf` are too.
    #[must_use]
    pub fn parse_decimal(self, raw: &str) -> Option<f64> {
        let normalized = self.normalize(raw);
        let separator = self.decimal_separator();
        let plain = normalized
            .chars()
            .all(|c| c.is_ascii_digit() || c == separator || c == '-' || c == '+' || c.is_whitespace());
        if normalized.is_empty() || !plain {
            return None;
        }
        normalized
            .replace(self.decimal_separator(), ".")
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
    }

    /// Formats a number with two decimals and digit grouping.
    #[must_use]
    pub fn format_number(self, value: f64) -> String {
        let fixed = format!("{:.2}", value.abs());
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, digit) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(self.group_separator());
            }
            grouped.push(digit);
        }

        let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
        format!("{sign}{grouped}{}{frac_part}", self.decimal_separator())
    }

    /// Formats an aggregated transfer rate, e.g. `"15.50 kb/s"`.
    #[must_use]
    pub fn format_speed(self, kilobytes_per_second: f64) -> String {
        format!("{} kb/s", self.format_number(kilobytes_per_second))
    }
}

impl fmt::Display for NumberLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Period => write!(f, "period"),
            Self::Comma => write!(f, "comma"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_culture_maps_known_languages() {
        assert_eq!(NumberLocale::from_culture("en-US"), NumberLocale::Period);
        assert_eq!(NumberLocale::from_culture("it-IT"), NumberLocale::Comma);
        assert_eq!(NumberLocale::from_culture("de_DE"), NumberLocale::Comma);
        assert_eq!(NumberLocale::from_culture("FR-fr"), NumberLocale::Comma);
        assert_eq!(NumberLocale::from_culture("es-ES"), NumberLocale::Comma);
    }

    #[test]
    fn test_from_culture_unknown_defaults_to_period() {
        assert_eq!(NumberLocale::from_culture("ja-JP"), NumberLocale::Period);
        assert_eq!(NumberLocale::from_culture(""), NumberLocale::Period);
    }

    #[test]
    fn test_supported_cultures_all_resolve() {
        for culture in SUPPORTED_CULTURES {
            let locale = NumberLocale::from_culture(culture);
            assert!(locale.parse_decimal("1.5").is_some(), "{culture}");
        }
    }

    #[test]
    fn test_parse_decimal_accepts_either_separator() {
        for locale in [NumberLocale::Period, NumberLocale::Comma] {
            assert_eq!(locale.parse_decimal("50.1"), Some(50.1));
            assert_eq!(locale.parse_decimal("50,1"), Some(50.1));
            assert_eq!(locale.parse_decimal(" 7 "), Some(7.0));
        }
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        let locale = NumberLocale::Comma;
        assert_eq!(locale.parse_decimal(""), None);
        assert_eq!(locale.parse_decimal("abc"), None);
        assert_eq!(locale.parse_decimal("1.234,5"), None);
    }

    #[test]
    fn test_parse_decimal_rejects_exponents_and_specials() {
        for locale in [NumberLocale::Period, NumberLocale::Comma] {
            assert_eq!(locale.parse_decimal("1e5"), None);
            assert_eq!(locale.parse_decimal("2.5E-3"), None);
            assert_eq!(locale.parse_decimal("inf"), None);
            assert_eq!(locale.parse_decimal("NaN"), None);
            assert_eq!(locale.parse_decimal("-3,5"), Some(-3.5));
            assert_eq!(locale.parse_decimal("+4"), Some(4.0));
        }
    }

    #[test]
    fn test_normalize_uses_active_separator() {
        assert_eq!(NumberLocale::Comma.normalize("50.1"), "50,1");
        assert_eq!(NumberLocale::Period.normalize("50,1"), "50.1");
    }

    #[test]
    fn test_format_speed_period() {
        assert_eq!(NumberLocale::Period.format_speed(15.5), "15.50 kb/s");
        assert_eq!(NumberLocale::Period.format_speed(1234.567), "1,234.57 kb/s");
        assert_eq!(NumberLocale::Period.format_speed(0.0), "0.00 kb/s");
    }

    #[test]
    fn test_format_speed_comma() {
        assert_eq!(NumberLocale::Comma.format_speed(15.5), "15,50 kb/s");
        assert_eq!(NumberLocale::Comma.format_speed(1234567.0), "1.234.567,00 kb/s");
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(NumberLocale::Period.format_number(-1500.0), "-1,500.00");
    }
}
