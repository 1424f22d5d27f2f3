use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

/// A validated `/bfhl` request. Exactly one operation per body.
#[derive(Debug, Clone, PartialEq)]
pub enum BfhlRequest {
    Fibonacci(u64),
    Prime(Vec<i64>),
    Lcm(Vec<i64>),
    Hcf(Vec<i64>),
    Ai(String),
}

impl BfhlRequest {
    pub fn operation(&self) -> &'static str {
        match self {
            BfhlRequest::Fibonacci(_) => "fibonacci",
            BfhlRequest::Prime(_) => "prime",
            BfhlRequest::Lcm(_) => "lcm",
            BfhlRequest::Hcf(_) => "hcf",
            BfhlRequest::Ai(_) => "AI",
        }
    }

    pub fn from_value(body: &Value) -> AppResult<Self> {
        let object = body
            .as_object()
            .ok_or_else(|| AppError::validation("Request body must be a JSON object"))?;
        Self::from_object(object)
    }

    pub fn from_object(object: &Map<String, Value>) -> AppResult<Self> {
        let mut entries = object.iter();
        let (key, value) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => return Err(AppError::validation("Exactly one key required")),
        };

        match key.as_str() {
            "fibonacci" => as_count(value)
                .map(BfhlRequest::Fibonacci)
                .ok_or_else(|| AppError::validation("Invalid fibonacci input")),
            "prime" => integer_list(value, "prime").map(BfhlRequest::Prime),
            "lcm" => integer_list(value, "lcm").map(BfhlRequest::Lcm),
            "hcf" => integer_list(value, "hcf").map(BfhlRequest::Hcf),
            "AI" => match value.as_str() {
                Some(question) if !question.trim().is_empty() => {
                    Ok(BfhlRequest::Ai(question.to_string()))
                }
                _ => Err(AppError::validation("Invalid AI input")),
            },
            other => Err(AppError::validation(format!("Unknown key: {other}"))),
        }
    }
}

/// Integral JSON number that fits in an `i64`; `5.0` counts, `5.5` does not.
fn as_integer(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(n) = number.as_i64() {
        return Some(n);
    }
    let f = number.as_f64()?;
    // i64::MAX rounds up to 2^63 as f64, so the upper bound is exclusive
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Non-negative integer. The full `u64` range is accepted so oversized
/// counts surface as "too large" rather than "invalid".
fn as_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    as_integer(value).and_then(|n| u64::try_from(n).ok())
}

fn integer_list(value: &Value, key: &str) -> AppResult<Vec<i64>> {
    let invalid = || AppError::validation(format!("Invalid {key} input"));
    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|v| as_integer(v).ok_or_else(invalid))
        .collect()
}
