//! Custom serde deserializers for flexible type handling
//!
//! Query strings arrive as text, and clients are inconsistent about how they
//! send "no episode" (`?ep=`, `?ep=%20`, or nothing at all).

use serde::{Deserialize, Deserializer, de};

/// Deserialize an optional episode number that can be:
/// - absent or `null`: `None`
/// - an empty / whitespace-only string: `None`
/// - an integer or a string of digits: `Some(n)`
///
/// Anything else (negative numbers, words) is rejected so that a typo never
/// silently turns into "no episode".
pub fn deserialize_optional_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleU32 {
        Int(u32),
        String(String),
    }

    let value: Option<FlexibleU32> = Option::deserialize(deserializer)?;

    match value {
        None => Ok(None),
        Some(FlexibleU32::Int(n)) => Ok(Some(n)),
        Some(FlexibleU32::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<u32>()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("invalid episode number: {}", s)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestStruct {
        #[serde(default, deserialize_with = "deserialize_optional_u32")]
        value: Option<u32>,
    }

    #[test]
    fn test_deserialize_integer() {
        let result: TestStruct = serde_json::from_value(json!({"value": 2})).unwrap();
        assert_eq!(result.value, Some(2));
    }

    #[test]
    fn test_deserialize_numeric_string() {
        let result: TestStruct = serde_json::from_value(json!({"value": " 12 "})).unwrap();
        assert_eq!(result.value, Some(12));
    }

    #[test]
    fn test_deserialize_empty_string() {
        let result: TestStruct = serde_json::from_value(json!({"value": ""})).unwrap();
        assert_eq!(result.value, None);
    }

    #[test]
    fn test_deserialize_missing_and_null() {
        let result: TestStruct = serde_json::from_value(json!({})).unwrap();
        assert_eq!(result.value, None);

        let result: TestStruct = serde_json::from_value(json!({"value": null})).unwrap();
        assert_eq!(result.value, None);
    }

    #[test]
    fn test_deserialize_rejects_words() {
        let result = serde_json::from_value::<TestStruct>(json!({"value": "two"}));
        assert!(result.is_err());

        let result = serde_json::from_value::<TestStruct>(json!({"value": "-1"}));
        assert!(result.is_err());
    }
}
