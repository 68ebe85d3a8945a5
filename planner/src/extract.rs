//! Isolates the JSON payload from a free-form model reply.

use crate::error::ExtractionError;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Returns the slice of `raw` that should be parsed as JSON.
///
/// Three cases, checked in order:
/// 1. a ```` ```json ```` fence exists: content between it and the next fence;
/// 2. any ```` ``` ```` fence exists: content between the first two fences;
/// 3. no fence: `raw` unchanged.
///
/// A fence without a closing marker yields everything after it.
///
/// # Errors
/// [`ExtractionError::EmptyBlock`] if the fenced content is blank.
///
/// # Example
/// ```
/// use planner::extract_json_block;
/// assert_eq!(extract_json_block("```json\n{}\n```").unwrap(), "\n{}\n");
/// assert_eq!(extract_json_block("{}").unwrap(), "{}");
/// ```
pub fn extract_json_block(raw: &str) -> Result<&str, ExtractionError> {
    if let Some(start) = raw.find(JSON_FENCE) {
        return non_blank(up_to_fence(&raw[start + JSON_FENCE.len()..]), JSON_FENCE);
    }
    if let Some(start) = raw.find(FENCE) {
        return non_blank(up_to_fence(&raw[start + FENCE.len()..]), FENCE);
    }
    Ok(raw)
}

fn up_to_fence(s: &str) -> &str {
    match s.find(FENCE) {
        Some(end) => &s[..end],
        None => s,
    }
}

fn non_blank<'a>(block: &'a str, fence: &'static str) -> Result<&'a str, ExtractionError> {
    if block.trim().is_empty() {
        Err(ExtractionError::EmptyBlock { fence })
    } else {
        Ok(block)
    }
}
