use anyhow::{anyhow, Result};
use chrono::Utc;
use serde::{Deserialize, Deserializer};

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Queue-item id: submission timestamp plus filename. Not globally unique,
/// only practically so within one session.
pub fn queue_item_id(filename: &str) -> String {
    format!("{}-{}", Utc::now().timestamp_millis(), filename)
}

pub fn format_decimal(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn parse_decimal(value: &str) -> Result<f64> {
    value
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|e| anyhow!("Parse decimal: {}", e))
}

/// Accepts either a JSON number or a decimal string; the backend emits
/// Decimal columns as strings.
pub fn de_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => parse_decimal(&text).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decimal_accepts_comma() {
        assert_eq!(parse_decimal("1.234,5").is_err(), true);
        assert_eq!(parse_decimal("1200,50").unwrap(), 1200.5);
        assert_eq!(parse_decimal(" 3.99 ").unwrap(), 3.99);
        assert!(parse_decimal("abc").is_err());
    }

    #[test]
    fn queue_ids_carry_the_filename() {
        let id = queue_item_id("offer.pdf");
        assert!(id.ends_with("-offer.pdf"));
    }

    #[test]
    fn format_decimal_two_places() {
        assert_eq!(format_decimal(1200.0), "1200.00");
        assert_eq!(format_decimal(0.5), "0.50");
    }
}
