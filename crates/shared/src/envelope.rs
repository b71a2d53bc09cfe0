//! The `{ code, msg, data }` wrapper every backend response uses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SUCCESS_CODE: i64 = 200;
pub const AUTH_REQUIRED_CODE: i64 = 401;

/// The backend sends `code` either as a JSON number or as a string. Anything
/// else is kept as-is and classified as a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCode {
    Number(i64),
    Float(f64),
    Text(String),
    Other(Value),
}

fn integral(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}

impl RawCode {
    fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Float(f) => integral(*f),
            Self::Text(text) => {
                let text = text.trim();
                text.parse().ok().or_else(|| text.parse().ok().and_then(integral))
            }
            Self::Other(_) => None,
        }
    }
}

impl std::fmt::Display for RawCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(text) => f.write_str(text),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeStatus {
    Success,
    AuthRequired,
    Failure(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub code: Option<RawCode>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl Envelope {
    pub fn success(data: Value) -> Self {
        Self {
            code: Some(RawCode::Number(SUCCESS_CODE)),
            msg: Some("success".into()),
            data: Some(data),
        }
    }

    pub fn failure(code: RawCode, msg: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            msg: Some(msg.into()),
            data: None,
        }
    }

    pub fn status(&self) -> EnvelopeStatus {
        match self.code.as_ref().and_then(RawCode::as_number) {
            Some(SUCCESS_CODE) => EnvelopeStatus::Success,
            Some(AUTH_REQUIRED_CODE) => EnvelopeStatus::AuthRequired,
            _ => EnvelopeStatus::Failure(
                self.code
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "missing".to_string()),
            ),
        }
    }

    /// `msg` when the backend sent a non-blank one.
    pub fn message(&self) -> Option<&str> {
        self.msg.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }

    /// Payload with an absent `data` treated as JSON null.
    pub fn into_data(self) -> Value {
        self.data.unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Envelope {
        serde_json::from_str(raw).expect("envelope")
    }

    #[test]
    fn numeric_and_string_codes_normalize_alike() {
        assert_eq!(parse(r#"{"code":200,"data":[]}"#).status(), EnvelopeStatus::Success);
        assert_eq!(parse(r#"{"code":"200","data":[]}"#).status(), EnvelopeStatus::Success);
        assert_eq!(parse(r#"{"code":401}"#).status(), EnvelopeStatus::AuthRequired);
        assert_eq!(parse(r#"{"code":"401"}"#).status(), EnvelopeStatus::AuthRequired);
    }

    #[test]
    fn other_codes_are_failures_carrying_the_code() {
        assert_eq!(
            parse(r#"{"code":500,"msg":"boom"}"#).status(),
            EnvelopeStatus::Failure("500".into())
        );
        assert_eq!(
            parse(r#"{"code":"E_STOCK"}"#).status(),
            EnvelopeStatus::Failure("E_STOCK".into())
        );
        assert_eq!(parse(r#"{}"#).status(), EnvelopeStatus::Failure("missing".into()));
    }

    #[test]
    fn integral_float_codes_classify_like_integers() {
        assert_eq!(parse(r#"{"code":200.0,"data":[]}"#).status(), EnvelopeStatus::Success);
        assert_eq!(parse(r#"{"code":"401.0"}"#).status(), EnvelopeStatus::AuthRequired);
        assert_eq!(
            parse(r#"{"code":200.5}"#).status(),
            EnvelopeStatus::Failure("200.5".into())
        );
    }

    #[test]
    fn unexpected_code_shapes_still_parse_as_failures() {
        assert_eq!(
            parse(r#"{"code":true,"msg":"odd"}"#).status(),
            EnvelopeStatus::Failure("true".into())
        );
        assert_eq!(
            parse(r#"{"code":[200]}"#).status(),
            EnvelopeStatus::Failure("[200]".into())
        );
    }

    #[test]
    fn blank_message_counts_as_absent() {
        assert_eq!(parse(r#"{"code":500,"msg":"  "}"#).message(), None);
        assert_eq!(parse(r#"{"code":500,"msg":"sold out"}"#).message(), Some("sold out"));
    }
}
