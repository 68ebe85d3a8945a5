//! Prompt builder: request fields + adaptive scheduling rules + output shape.

use crate::request::{FlexValue, PlanRequest};

/// Minutes per day when `hours` is missing, blank, zero or not a number.
pub const DEFAULT_DAILY_MINUTES: i64 = 60;

/// Days in the plan when `days` is missing, blank or zero.
pub const DEFAULT_TOTAL_DAYS: &str = "5";

const NOT_SPECIFIED: &str = "Not specified";

/// Shape of one plan unit plus the trailing `focus_areas` key.
///
/// Kept as a template fragment: the model copies structure, not values.
const OUTPUT_EXAMPLE: &str = r#"  "plan": [
    {
      "unit_title": "Day X / Time Range: [Sub-Topic Name]",
      "duration": "Specific Duration (e.g. 45 Mins, 2 Hours)",
      "intensity": "High/Medium",
      "important": true,
      "description": "Short summary for the card.",
      "subtopics": ["Detail 1", "Detail 2"],
      "detailed_guide": "A comprehensive breakdown. Explain the 'Why', 'How', and 'What' for this specific topic. Include formulas, key thinkers, or specific debate points. Make this at least 3-4 sentences."
    }
  ],
  "focus_areas": ["Critical Node 1", "Critical Node 2"],"#;

/// Renders the full instruction prompt for one request.
///
/// Total and deterministic: missing fields fall back to defaults, and the
/// same input always yields byte-identical output. User text is interpolated
/// as-is.
///
/// # Example
/// ```
/// use planner::{PlanRequest, build_prompt};
/// let p = build_prompt(&PlanRequest::default());
/// assert!(p.contains("Timeframe: 5 days (approx 60 mins/day)"));
/// ```
pub fn build_prompt(req: &PlanRequest) -> String {
    let topic = text_or(req.topic.as_deref(), NOT_SPECIFIED);
    let syllabus = text_or(req.syllabus.as_deref(), "");
    let goal = text_or(req.goal.as_deref(), NOT_SPECIFIED);
    let level = text_or(req.level.as_deref(), NOT_SPECIFIED);
    let daily_minutes = daily_minutes(req.hours.as_ref());
    let total_days = total_days(req.days.as_ref());

    format!(
        r#"IDENTITY: You are STUDY PLAN GUIDE, an elite cognitive architecture.

USER PROFILE:
- Target: {topic}
- Context: {syllabus}
- Goal: {goal}
- Level: {level}
- Timeframe: {total_days} days (approx {daily_minutes} mins/day)

MISSION:
Create a highly granular, sub-topic wise learning checklist.

ADAPTIVE INSTRUCTIONS (CRITICAL):
1. **IF TIMEFRAME = 1 DAY**:
   - Ignore "Day X". Use specific timestamps (e.g., "09:00 - 09:45: Topic A").
   - Fill the single day completely with sub-topics.
2. **IF TIMEFRAME > 1 DAY**:
   - Structure by Day (e.g., "Day 1 [09:00-11:00]: Topic A").
   - Ensure every single day from Day 1 to Day {total_days} is covered.

STRICT RULES:
1. **SUB-TOPIC GRANULARITY**: Do NOT output broad blocks like "Day 1: Algebra". You MUST break it down: "Day 1: Linear Equations (1h)", "Day 1: Quadratic Forms (1h)".
2. **TIMING**: Assign specific duration to EACH sub-topic.
3. **COVERAGE**: 100% Syllabus coverage.
4. **DETAILS**: The `detailed_guide` field MUST be populated with rich, specific educational content for the sidebar.

OUTPUT JSON:
{{
{OUTPUT_EXAMPLE}
  "strategy_notes": "Specific advice.",
  "adaptation_rule": "Calibration note."
}}
"#
    )
}

/// `round(hours * 60)`, or [`DEFAULT_DAILY_MINUTES`] when hours are unusable.
pub(crate) fn daily_minutes(hours: Option<&FlexValue>) -> i64 {
    hours
        .filter(|h| !h.is_unset())
        .and_then(FlexValue::as_f64)
        .map(|h| (h * 60.0).round())
        .filter(|m| m.is_finite())
        .map(|m| m as i64)
        .unwrap_or(DEFAULT_DAILY_MINUTES)
}

/// Days as given (number or text), or [`DEFAULT_TOTAL_DAYS`].
pub(crate) fn total_days(days: Option<&FlexValue>) -> String {
    match days.filter(|d| !d.is_unset()) {
        Some(FlexValue::Number(n)) => n.to_string(),
        Some(FlexValue::Text(s)) => s.trim().to_string(),
        None => DEFAULT_TOTAL_DAYS.to_string(),
    }
}

fn text_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => fallback,
    }
}
