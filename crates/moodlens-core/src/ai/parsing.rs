//! JSON parsing helpers for narrative backend responses
//!
//! Models frequently wrap the requested JSON in surrounding prose. These
//! helpers extract the first balanced `{...}` span before deserializing.

use crate::error::{Error, Result};

use super::types::RawNarrative;

/// Extract the first balanced JSON object from a model response
pub fn extract_json_object(response: &str) -> Result<&str> {
    let response = response.trim();

    if let Some(start) = response.find('{') {
        let mut depth = 0;
        let mut in_string = false;
        let mut escaped = false;

        for (i, c) in response[start..].char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' if in_string => escaped = true,
                '"' => in_string = !in_string,
                '{' if !in_string => depth += 1,
                '}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(&response[start..start + i + c.len_utf8()]);
                    }
                }
                _ => {}
            }
        }
    }

    Err(Error::InvalidData(format!(
        "No JSON found in narrative response | Raw: {}",
        truncate(response)
    )))
}

/// Parse the narrative fields from a model response
pub fn parse_narrative(response: &str) -> Result<RawNarrative> {
    let json_str = extract_json_object(response)?;
    serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid narrative JSON: {} | Raw: {}",
            e,
            truncate(json_str)
        ))
    })
}

/// Truncate long responses for error messages
fn truncate(s: &str) -> String {
    if s.len() > 200 {
        let cut = s
            .char_indices()
            .take_while(|(i, _)| *i < 200)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &s[..cut])
    } else {
        s.to_string()
    }
}
