use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Static per-model metadata: capability tags, optimal uses, context window,
/// reliability score, and a free-text considerations paragraph that goes
/// verbatim into LLM guidance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProfile {
    pub id: String,
    pub capabilities: Vec<String>,
    pub optimal_uses: Vec<String>,
    pub context_window: u64,
    pub reliability: f64,
    pub considerations: String,
}

impl ModelProfile {
    /// Profile returned for an empty or unknown model id (the "general
    /// purpose" choice). Considerations is a fixed literal; the rest is
    /// empty/default.
    pub fn general_purpose(id: &str) -> Self {
        Self {
            id: id.to_string(),
            capabilities: Vec::new(),
            optimal_uses: Vec::new(),
            context_window: 0,
            reliability: 0.0,
            considerations: "General purpose model".into(),
        }
    }

    /// First line of the considerations paragraph, used as the compact
    /// "Model note" in the improvement instruction.
    pub fn considerations_first_line(&self) -> &str {
        self.considerations.lines().next().unwrap_or("")
    }
}

/// Read-only knowledge table, built once at startup and shared by lookup.
pub struct ModelCatalog {
    profiles: HashMap<String, ModelProfile>,
}

impl ModelCatalog {
    /// Pure lookup: exact key match, never fails. Unknown keys fall back to
    /// the general-purpose profile.
    pub fn lookup(&self, id: &str) -> ModelProfile {
        self.profiles
            .get(id)
            .cloned()
            .unwrap_or_else(|| ModelProfile::general_purpose(id))
    }

    pub fn known_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.profiles.keys().map(|s| s.as_str()).collect();
        ids.sort();
        ids
    }

    pub fn builtin() -> Self {
        let mut profiles = HashMap::new();
        let mut add = |id: &str,
                       capabilities: &[&str],
                       optimal_uses: &[&str],
                       context_window: u64,
                       reliability: f64,
                       considerations: &str| {
            profiles.insert(
                id.to_string(),
                ModelProfile {
                    id: id.to_string(),
                    capabilities: capabilities.iter().map(|s| s.to_string()).collect(),
                    optimal_uses: optimal_uses.iter().map(|s| s.to_string()).collect(),
                    context_window,
                    reliability,
                    considerations: considerations.trim().to_string(),
                },
            );
        };

        add(
            "gpt-4o",
            &["Multimodal", "advanced reasoning", "200+ languages", "real-time knowledge"],
            &["Complex tasks", "image understanding", "multilingual content", "code generation"],
            128_000,
            0.96,
            r#"- Superior performance in most non-English languages
- Strong at reasoning through complex problems visually
- Performs best with clear, focused instructions
- More cost-effective than o1 models for general tasks"#,
        );
        add(
            "gpt-4o-mini",
            &["Multimodal", "speed", "cost-effectiveness", "multilingual"],
            &["Routine tasks", "image understanding", "high-volume applications"],
            128_000,
            0.90,
            r#"- Excellent cost-to-performance ratio for everyday tasks
- Comparable in many tasks to older GPT-4 versions
- Strong at code generation and factual answers
- Best for applications requiring frequent API calls"#,
        );
        add(
            "gpt-4.5",
            &["Advanced reasoning", "creative generation", "factual grounding"],
            &["Creative writing", "advanced problem-solving", "strategic analysis"],
            128_000,
            0.97,
            r#"- Represents OpenAI's latest model improvements
- Stronger than GPT-4o in creative and subjective tasks
- Enhanced ability to follow complex instructions precisely
- Improved factual accuracy with reduced hallucinations"#,
        );
        add(
            "o3-mini",
            &["Specialized reasoning", "step-by-step problem-solving", "text-only processing"],
            &["Mathematics", "coding challenges", "logical reasoning tasks"],
            200_000,
            0.99,
            r#"- Takes longer to respond but provides more methodical answers
- Excels at tasks requiring formal reasoning and precision
- Often works better with explicit reasoning instructions
- More factually accurate than general-purpose models"#,
        );
        add(
            "o1",
            &["Expert reasoning", "multimodal understanding", "precise problem-solving"],
            &["Complex technical work", "mathematical proofs", "detailed analysis"],
            200_000,
            0.98,
            r#"- Designed for maximum reasoning capability, not speed
- Often benefits from being asked to solve step by step
- Provides detailed explanations of its reasoning process
- Consider the cost tradeoff for simpler tasks"#,
        );
        add(
            "claude-3.5-sonnet",
            &["Balanced performance", "long context", "coding excellence", "tool use"],
            &["Software development", "research synthesis", "document analysis"],
            200_000,
            0.97,
            r#"- Strong technical accuracy while maintaining approachable tone
- Excellent at understanding and working within guidelines
- Native computer/tool use capabilities for complex tasks
- Maintains context awareness across very lengthy exchanges"#,
        );
        add(
            "claude-3.7-sonnet",
            &["Advanced reasoning", "nuanced understanding", "extended thinking mode"],
            &["Complex reasoning tasks", "sensitive content moderation", "thorough analysis"],
            200_000,
            0.98,
            r#"- Latest model with superior reasoning capabilities
- Includes an "extended thinking" mode for complex problems
- More factually accurate than previous Claude models
- Excels at carefully weighing evidence and uncertainties"#,
        );
        add(
            "claude-3-haiku",
            &["Speed", "cost-effectiveness", "general-purpose"],
            &["Chat applications", "content moderation", "summarization"],
            200_000,
            0.92,
            r#"- Fastest Claude model with good balance of quality and speed
- Consider for high-volume, time-sensitive applications
- Strong at following specific tonal and formatting guidance
- May struggle with complex reasoning tasks"#,
        );
        add(
            "gemini-1.5-pro",
            &["Long-context reasoning", "multimodal", "multilingual"],
            &["Video analysis", "large document processing", "complex research"],
            2_000_000,
            0.94,
            r#"- Industry-leading 2M token context window
- Excellent for tasks requiring integration of many documents
- Can process video, audio, and images natively
- Consider using more structured prompts for best results"#,
        );
        add(
            "gemini-2.0-pro",
            &["Advanced reasoning", "knowledge-intensive tasks", "coding"],
            &["Software development", "complex problem-solving", "technical analysis"],
            2_000_000,
            0.96,
            r#"- Google's most advanced model to date
- Exceptional coding capabilities with strong reasoning
- Can use tools like Search and code execution
- Performs best with clear, structured instructions"#,
        );
        add(
            "gemini-2.0-flash",
            &["Fast responses", "good reasoning", "multimodal"],
            &["Real-time applications", "interactive experiences", "general tasks"],
            1_000_000,
            0.93,
            r#"- Optimized for latency-sensitive applications
- Twice as fast as Gemini 1.5 Pro with comparable quality
- Strong balance between performance and efficiency
- Consider for user-facing applications requiring speed"#,
        );
        add(
            "mistral-large-2",
            &["Balanced performance", "multilingual", "instruction following"],
            &["Enterprise applications", "customer service", "content generation"],
            32_000,
            0.95,
            r#"- Mistral AI's latest enterprise-grade model
- Strong at following precise instructions and constraints
- Excels at maintaining consistent tone and voice
- Good balance of reasoning and creative capabilities"#,
        );
        add(
            "llama-3.1-405b",
            &["Open weights", "strong reasoning", "multilingual"],
            &["Enterprise deployments", "customized applications", "research"],
            128_000,
            0.94,
            r#"- Meta's largest and most capable open model
- Comparable to closed-source models in many benchmarks
- Can be fine-tuned for specific use cases
- Requires structured prompting for best results"#,
        );
        add(
            "llama-3.2-1b",
            &["Efficiency", "compact size", "on-device deployment"],
            &["Edge devices", "mobile applications", "embedded systems"],
            128_000,
            0.81,
            r#"- Extremely efficient for size-constrained deployments
- Can run on devices with limited resources
- Best for simpler, well-defined tasks
- Performs better with explicit instruction formats"#,
        );

        Self { profiles }
    }
}
