//! Pieces shared by every HTTP client: client construction and lenient
//! deserializers for services that mix numeric and string ids.

use std::time::Duration;

use reqwest::Client;

use crate::util::version::version_label;

pub fn user_agent() -> String {
    format!("ecokisan/{}", version_label())
}

/// Builds a `reqwest` client with the app user agent and an overall request
/// timeout.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(user_agent())
        .timeout(timeout)
        .build()
}

pub fn string_from_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct StringOrNumber;

    impl<'de> serde::de::Visitor<'de> for StringOrNumber {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or number")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}

/// Accepts prices sent either as numbers or numeric strings.
pub fn f64_from_json<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct NumberOrString;

    impl<'de> serde::de::Visitor<'de> for NumberOrString {
        type Value = f64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a number or numeric string")
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value as f64)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value as f64)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| E::invalid_value(serde::de::Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(NumberOrString)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "string_from_json")]
        id: String,
        #[serde(deserialize_with = "f64_from_json")]
        price: f64,
    }

    #[test]
    fn lenient_fields_accept_both_shapes() {
        let numeric: Sample = serde_json::from_str(r#"{"id": 42, "price": 2150}"#).unwrap();
        assert_eq!(numeric.id, "42");
        assert_eq!(numeric.price, 2150.0);

        let textual: Sample = serde_json::from_str(r#"{"id": "42", "price": "2150.5"}"#).unwrap();
        assert_eq!(textual.id, "42");
        assert_eq!(textual.price, 2150.5);

        assert!(serde_json::from_str::<Sample>(r#"{"id": 1, "price": "n/a"}"#).is_err());
    }
}
