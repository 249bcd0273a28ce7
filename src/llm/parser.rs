//! Pull structured JSON out of free-form LLM replies

use serde::de::DeserializeOwned;

use crate::core::error::{Result, SkirmishError};

/// Extract JSON object from LLM response (handles surrounding text)
pub fn extract_json(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| SkirmishError::LlmError("No JSON found in response".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| SkirmishError::LlmError("No closing brace found in response".into()))?;
    if end < start {
        return Err(SkirmishError::LlmError("Unbalanced braces in response".into()));
    }
    Ok(&response[start..=end])
}

/// Parse the first JSON object in `response` as `T`
pub fn parse_reply<T: DeserializeOwned>(response: &str) -> Result<T> {
    let json = extract_json(response)?;
    serde_json::from_str(json)
        .map_err(|e| SkirmishError::LlmError(format!("Failed to parse reply: {} - Response: {}", e, response)))
}
