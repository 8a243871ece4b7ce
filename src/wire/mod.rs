use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

/// ========================================
/// Pipeline data model + response decoding
/// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatType {
    Coding,
    Creative,
    Analytical,
    Conversational,
    Academic,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

impl FormatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatType::Coding => "coding",
            FormatType::Creative => "creative",
            FormatType::Analytical => "analytical",
            FormatType::Conversational => "conversational",
            FormatType::Academic => "academic",
            FormatType::Other => "other",
        }
    }
}

impl ComplexityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityLevel::Low => "low",
            ComplexityLevel::Medium => "medium",
            ComplexityLevel::High => "high",
        }
    }
}

/// Structured requirements derived from the raw context + prompt by the
/// analysis stage. The minimal shape (fast variant) carries only the first
/// four fields; the rich shape adds the optional sequences, which default to
/// empty rather than absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextAnalysis {
    pub domain: String,
    pub critical_requirements: Vec<String>,
    pub format_type: FormatType,
    pub complexity_level: ComplexityLevel,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub success_criteria: Vec<String>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub format_requirements: Vec<String>,
}

impl ContextAnalysis {
    /// Fixed substitute used whenever the analysis response fails to decode.
    pub fn fallback() -> Self {
        Self {
            domain: "general".into(),
            critical_requirements: vec![
                "improve clarity".into(),
                "add structure".into(),
                "enhance specificity".into(),
            ],
            format_type: FormatType::Other,
            complexity_level: ComplexityLevel::Medium,
            constraints: Vec::new(),
            success_criteria: Vec::new(),
            risk_factors: Vec::new(),
            format_requirements: Vec::new(),
        }
    }

    /// Trims every string field in place; caps critical_requirements at
    /// `max_requirements` when given (the minimal shape keeps at most 3).
    pub fn normalize(&mut self, max_requirements: Option<usize>) {
        self.domain = self.domain.trim().to_string();
        for list in [
            &mut self.critical_requirements,
            &mut self.constraints,
            &mut self.success_criteria,
            &mut self.risk_factors,
            &mut self.format_requirements,
        ] {
            for s in list.iter_mut() {
                *s = s.trim().to_string();
            }
        }
        if let Some(cap) = max_requirements {
            self.critical_requirements.truncate(cap);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One turn of the context-gathering dialog. The full ordered history is
/// owned by the caller and passed in whole on every call; no session state
/// lives on this side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Question(String),
    Complete,
}

/// Final aggregate handed back to the caller. Every field is populated,
/// possibly with a documented fallback literal; a partially-filled result is
/// never returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImprovementResult {
    pub analysis: ContextAnalysis,
    pub improved_prompt: String,
    pub explanation: String,
    pub considerations: String,
    pub validation_report: String,
}

/// Strict decode with a safe default: try the raw body as-is, then the first
/// embedded JSON object, then give up and return `fallback`. Parse failures
/// are reported to the caller only as a diagnostic string; they never
/// propagate.
pub fn decode_or_default<T: DeserializeOwned>(raw: &str, fallback: T) -> (T, Option<String>) {
    match serde_json::from_str::<T>(raw) {
        Ok(v) => (v, None),
        Err(first_err) => {
            if let Some(obj) = extract_first_json_object(raw) {
                if let Ok(v) = serde_json::from_str::<T>(obj) {
                    return (v, None);
                }
            }
            (fallback, Some(format!("{first_err}; raw: {raw}")))
        }
    }
}

/// First balanced top-level `{...}` slice of `s`, or None. Brace depth is
/// tracked bytewise; braces are ASCII so the slice bounds are always char
/// boundaries.
pub fn extract_first_json_object(s: &str) -> Option<&str> {
    let mut start = None;
    let mut depth = 0usize;

    for (i, &b) in s.as_bytes().iter().enumerate() {
        match b {
            b'{' => {
                start.get_or_insert(i);
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return start.map(|st| &s[st..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
