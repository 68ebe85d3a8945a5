/// Represents the provider (backend) used for generation.
///
/// Only Google Gemini is wired today; new backends are added by extending
/// this enum and the matching service module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Google Generative Language API (`generateContent`).
    Gemini,
}
