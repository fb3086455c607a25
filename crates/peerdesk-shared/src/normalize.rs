use serde_json::{Map, Value};

use crate::error::NotificationError;
use crate::models::{CanonicalPayload, RawNotificationPayload};

/// Normalize a notification payload given as a JSON string.
pub fn normalize_str(json: &str) -> Result<CanonicalPayload, NotificationError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| NotificationError::malformed(format!("Failed to parse JSON: {}", e)))?;
    normalize_value(&value)
}

/// Normalize an already-parsed notification payload.
pub fn normalize_value(value: &Value) -> Result<CanonicalPayload, NotificationError> {
    if !value.is_object() {
        return Err(NotificationError::malformed("payload is not an object"));
    }
    let raw: RawNotificationPayload = serde_json::from_value(value.clone())
        .map_err(|e| NotificationError::malformed(e.to_string()))?;
    normalize(raw)
}

pub fn normalize(raw: RawNotificationPayload) -> Result<CanonicalPayload, NotificationError> {
    let screen = match raw.screen {
        Some(Value::String(s)) if !s.is_empty() => s,
        Some(Value::String(_)) => return Err(NotificationError::malformed("empty screen")),
        Some(_) => return Err(NotificationError::malformed("screen is not a string")),
        None => return Err(NotificationError::malformed("missing screen")),
    };

    let data = match raw.data {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Array(mut items)) => {
            if items.len() != 1 {
                return Err(NotificationError::malformed(format!(
                    "data array has {} elements, expected 1",
                    items.len()
                )));
            }
            decode_data(items.remove(0))?
        }
        Some(other) => decode_data(other)?,
    };

    Ok(CanonicalPayload { screen, data })
}

/// Unwrap at most one level of string encoding.
fn decode_data(value: Value) -> Result<Map<String, Value>, NotificationError> {
    let decoded = match value {
        Value::String(s) => serde_json::from_str::<Value>(&s).map_err(|e| {
            NotificationError::malformed(format!("Failed to parse data JSON: {}", e))
        })?,
        other => other,
    };
    match decoded {
        Value::Object(map) => Ok(map),
        other => Err(NotificationError::malformed(format!(
            "data decodes to {}, expected an object",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chat_data() -> Value {
        json!({"userId": "me", "receiverId": "u123", "name": "Ada", "avatar": "a.png"})
    }

    #[test]
    fn three_encodings_normalize_identically() {
        let as_object = json!({"screen": "chat", "data": chat_data()});
        let as_string = json!({"screen": "chat", "data": chat_data().to_string()});
        let as_array = json!({"screen": "chat", "data": [chat_data().to_string()]});

        let expected = normalize_value(&as_object).unwrap();
        assert_eq!(normalize_value(&as_string).unwrap(), expected);
        assert_eq!(normalize_value(&as_array).unwrap(), expected);
        assert_eq!(expected.screen, "chat");
        assert_eq!(expected.data["receiverId"], "u123");
    }

    #[test]
    fn array_wrapping_an_object_is_accepted() {
        let payload = json!({"screen": "jobDetails", "data": [{"offerId": "abc"}]});
        let canonical = normalize_value(&payload).unwrap();
        assert_eq!(canonical.data["offerId"], "abc");
    }

    #[test]
    fn missing_screen_is_malformed() {
        let err = normalize_value(&json!({"data": {"offerId": "abc"}})).unwrap_err();
        assert_eq!(err, NotificationError::malformed("missing screen"));
    }

    #[test]
    fn non_string_screen_is_malformed() {
        assert!(normalize_value(&json!({"screen": 7})).is_err());
        assert!(normalize_value(&json!({"screen": ""})).is_err());
    }

    #[test]
    fn missing_data_becomes_empty_object() {
        let canonical = normalize_value(&json!({"screen": "home"})).unwrap();
        assert!(canonical.data.is_empty());
        let canonical = normalize_value(&json!({"screen": "home", "data": null})).unwrap();
        assert!(canonical.data.is_empty());
    }

    #[test]
    fn unparsable_data_string_is_malformed() {
        let err = normalize_value(&json!({"screen": "chat", "data": "{not json"})).unwrap_err();
        assert!(matches!(err, NotificationError::MalformedPayload(_)));
    }

    #[test]
    fn only_one_level_of_string_wrapping_is_unwrapped() {
        let twice = Value::String(chat_data().to_string()).to_string();
        let err = normalize_value(&json!({"screen": "chat", "data": twice})).unwrap_err();
        assert!(err.to_string().contains("expected an object"));
    }

    #[test]
    fn arrays_of_other_lengths_are_malformed() {
        assert!(normalize_value(&json!({"screen": "chat", "data": []})).is_err());
        assert!(normalize_value(&json!({"screen": "chat", "data": ["{}", "{}"]})).is_err());
    }

    #[test]
    fn scalar_data_is_malformed() {
        assert!(normalize_value(&json!({"screen": "chat", "data": 5})).is_err());
        assert!(normalize_value(&json!({"screen": "chat", "data": "5"})).is_err());
    }

    #[test]
    fn normalize_str_rejects_invalid_json() {
        let err = normalize_str("not valid json{").unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON"));
        assert!(normalize_str("[1,2]").is_err());
    }
}
