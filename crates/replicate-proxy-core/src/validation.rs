//! Validation of the `POST /api/replicate` body.
//!
//! The body arrives as a generic JSON value and is narrowed field by field.
//! Rules run in order and the first failure wins.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use replicate_proxy_types::{ProxyRequestPayload, ValidationError};

const MAX_MODEL_LEN: usize = 100;
const MIN_CREDENTIAL_LEN: usize = 8;
const MAX_CREDENTIAL_LEN: usize = 200;

static MODEL_REGEX: OnceLock<Regex> = OnceLock::new();

fn model_regex() -> &'static Regex {
    MODEL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*/[A-Za-z0-9][A-Za-z0-9_-]*$")
            .expect("Model regex is valid")
    })
}

/// `owner/name`, each part starting with an alphanumeric, at most 100 chars.
pub fn is_valid_model(model: &str) -> bool {
    !model.is_empty() && model.len() <= MAX_MODEL_LEN && model_regex().is_match(model)
}

/// A string of 8 to 200 characters with no leading or trailing whitespace.
/// A byte-order mark counts as whitespace here.
pub fn is_valid_credential(value: &Value) -> bool {
    let Some(credential) = value.as_str() else {
        return false;
    };
    let len = credential.chars().count();
    trim_padding(credential) == credential
        && (MIN_CREDENTIAL_LEN..=MAX_CREDENTIAL_LEN).contains(&len)
}

fn trim_padding(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Narrow a parsed body into a [`ProxyRequestPayload`].
pub fn validate_payload(body: &Value) -> Result<ProxyRequestPayload, ValidationError> {
    let obj = body.as_object().ok_or(ValidationError::NotAnObject)?;

    let model = obj
        .get("model")
        .and_then(Value::as_str)
        .filter(|m| is_valid_model(m))
        .ok_or(ValidationError::InvalidModel)?;

    let credential = obj
        .get("apiKey")
        .filter(|c| is_valid_credential(c))
        .and_then(Value::as_str)
        .ok_or(ValidationError::InvalidCredential)?;

    let input = match obj.get("input") {
        None => Map::new(),
        Some(Value::Object(input)) => input.clone(),
        Some(_) => return Err(ValidationError::InvalidInput),
    };

    Ok(ProxyRequestPayload { model: model.to_string(), input, credential: credential.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn model_format_table() {
        assert!(is_valid_model("owner/model"));
        assert!(is_valid_model("stability-ai/sdxl"));
        assert!(is_valid_model("owner/model-"));
        assert!(is_valid_model("Owner_1/model_2"));

        assert!(!is_valid_model("model"));
        assert!(!is_valid_model("/model"));
        assert!(!is_valid_model("owner/"));
        assert!(!is_valid_model("owner/-model"));
        assert!(!is_valid_model("-owner/model"));
        assert!(!is_valid_model("owner/model/extra"));
        assert!(!is_valid_model("owner/model:version"));
        assert!(!is_valid_model(""));
    }

    #[test]
    fn model_length_limit() {
        let at_limit = format!("o/{}", "m".repeat(98));
        let over_limit = format!("o/{}", "m".repeat(99));
        assert!(is_valid_model(&at_limit));
        assert!(!is_valid_model(&over_limit));
    }

    #[test]
    fn credential_table() {
        assert!(is_valid_credential(&json!("12345678")));
        assert!(is_valid_credential(&json!("r8_abc def_ghi")));
        assert!(is_valid_credential(&json!("x".repeat(200))));

        assert!(!is_valid_credential(&json!("1234567")));
        assert!(!is_valid_credential(&json!("x".repeat(201))));
        assert!(!is_valid_credential(&json!(" 12345678")));
        assert!(!is_valid_credential(&json!("12345678\n")));
        assert!(!is_valid_credential(&json!("\u{feff}abcdefgh")));
        assert!(!is_valid_credential(&json!("abcdefgh\u{feff}")));
        assert!(!is_valid_credential(&json!(12_345_678)));
        assert!(!is_valid_credential(&Value::Null));
    }

    #[test]
    fn accepts_valid_payload_and_defaults_input() {
        let payload =
            validate_payload(&json!({"model": "owner/model", "apiKey": "r8_valid_key"})).unwrap();

        assert_eq!(payload.model, "owner/model");
        assert_eq!(payload.credential, "r8_valid_key");
        assert!(payload.input.is_empty());
    }

    #[test]
    fn keeps_nested_input() {
        let payload = validate_payload(&json!({
            "model": "owner/model",
            "apiKey": "r8_valid_key",
            "input": {"prompt": "a cat", "options": {"steps": 30}}
        }))
        .unwrap();

        assert_eq!(payload.input_value(), json!({"prompt": "a cat", "options": {"steps": 30}}));
    }

    #[test]
    fn rejects_non_objects() {
        for body in [json!(null), json!([]), json!("text"), json!(1)] {
            assert_eq!(validate_payload(&body), Err(ValidationError::NotAnObject));
        }
    }

    #[test]
    fn first_failure_wins() {
        // Both model and key are bad: model is reported.
        let err = validate_payload(&json!({"model": "bad", "apiKey": "x"})).unwrap_err();
        assert_eq!(err, ValidationError::InvalidModel);

        let err = validate_payload(&json!({"model": "owner/model"})).unwrap_err();
        assert_eq!(err, ValidationError::InvalidCredential);

        let err = validate_payload(&json!({
            "model": "owner/model",
            "apiKey": "r8_valid_key",
            "input": ["not", "an", "object"]
        }))
        .unwrap_err();
        assert_eq!(err, ValidationError::InvalidInput);
    }

    #[test]
    fn null_input_is_rejected() {
        let err = validate_payload(&json!({
            "model": "owner/model",
            "apiKey": "r8_valid_key",
            "input": null
        }))
        .unwrap_err();
        assert_eq!(err, ValidationError::InvalidInput);
    }

    #[test]
    fn error_messages() {
        assert_eq!(ValidationError::NotAnObject.to_string(), "Request body must be a valid object");
        assert_eq!(
            ValidationError::InvalidModel.to_string(),
            "Model name is required and must be in format owner/model"
        );
        assert_eq!(
            ValidationError::InvalidCredential.to_string(),
            "Valid API key is required (8-200 characters)"
        );
        assert_eq!(ValidationError::InvalidInput.to_string(), "Input must be an object");
    }
}
