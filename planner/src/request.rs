//! Request payload for `POST /api/generate-plan`.

use serde::{Deserialize, Serialize};

/// Study-plan request. Every field is optional; the prompt builder fills
/// defaults for whatever is missing.
///
/// # Example
/// ```
/// use planner::PlanRequest;
/// let req: PlanRequest = serde_json::from_str(r#"{"topic":"Calculus","hours":"1.5","days":""}"#).unwrap();
/// assert_eq!(req.topic.as_deref(), Some("Calculus"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub syllabus: Option<String>,
    /// Hours per day; the browser client sends it as a string.
    #[serde(default)]
    pub hours: Option<FlexValue>,
    /// Number of days; rendered verbatim into the prompt.
    #[serde(default)]
    pub days: Option<FlexValue>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
}

/// A JSON number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlexValue {
    Number(serde_json::Number),
    Text(String),
}

impl FlexValue {
    /// Numeric view; strings are trimmed and parsed, non-numeric text is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FlexValue::Number(n) => n.as_f64(),
            FlexValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Empty string, or numeric zero. Both mean "not provided".
    pub fn is_unset(&self) -> bool {
        match self {
            FlexValue::Number(n) => n.as_f64() == Some(0.0),
            FlexValue::Text(s) => s.trim().is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_strings_numbers_nulls_and_missing() {
        let req: PlanRequest = serde_json::from_str(
            r#"{"topic":"Rust","hours":2,"days":"7","level":null,"extra":true}"#,
        )
        .unwrap();
        assert_eq!(req.hours.as_ref().and_then(FlexValue::as_f64), Some(2.0));
        assert_eq!(req.days, Some(FlexValue::Text("7".into())));
        assert_eq!(req.level, None);
        assert_eq!(req.goal, None);
        assert_eq!(req.syllabus, None);
    }

    #[test]
    fn empty_object_is_valid() {
        let req: PlanRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req, PlanRequest::default());
    }

    #[test]
    fn unset_values() {
        assert!(FlexValue::Text("  ".into()).is_unset());
        assert!(FlexValue::Number(0u64.into()).is_unset());
        assert!(!FlexValue::Text("abc".into()).is_unset());
        assert_eq!(FlexValue::Text("abc".into()).as_f64(), None);
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(serde_json::from_str::<PlanRequest>(r#"{"topic":true}"#).is_err());
    }
}
