use crate::wire::ContextAnalysis;

/// Instruction builders for every pipeline and dialog stage. The literal
/// markers here ([Improved Prompt] / --- sections, the analysis JSON field
/// names, the COMPLETE sentinel) are load-bearing wire format: the decoders
/// in `pipeline::sections`, `wire::decode_or_default` and `dialog` depend on
/// them exactly as written.

pub fn system_prompt_analysis_fast() -> String {
    r#"You are an expert at analyzing technical contexts and requirements.
Analyze the given context and prompt to extract key requirements.
Format your response as concise JSON with only the most essential fields:
{
    "domain": "technical domain of use case",
    "critical_requirements": ["1-3 must-have requirements"],
    "format_type": "coding|creative|analytical|conversational|academic|other",
    "complexity_level": "low|medium|high"
}"#
    .to_string()
}

pub fn system_prompt_analysis_full() -> String {
    r#"You are an expert at analyzing technical contexts and requirements.
Analyze the given context and prompt to extract structured requirements.
Format your response as a single JSON object with exactly these fields:
{
    "domain": "technical domain of use case",
    "critical_requirements": ["must-have requirements"],
    "format_type": "coding|creative|analytical|conversational|academic|other",
    "complexity_level": "low|medium|high",
    "constraints": ["hard constraints the prompt must respect"],
    "success_criteria": ["how a good response would be judged"],
    "risk_factors": ["ways the prompt could fail or be misused"],
    "format_requirements": ["required output formats or structures"]
}
Return ONLY the JSON object, no markdown fences, no prose."#
        .to_string()
}

pub fn user_prompt_analysis(context: &str, original_prompt: &str) -> String {
    format!("Context: {context}\nOriginal Prompt: {original_prompt}\n\nProvide a concise analysis.")
}

pub fn system_prompt_improve(analysis: &ContextAnalysis, model_note: &str) -> String {
    format!(
        r#"Improve this prompt for a {domain} use case.
Format: {format_type}
Requirements: {requirements}
Model note: {model_note}

1. Add appropriate structure
2. Make it specific and precise
3. Optimize for the target model
4. Add guardrails for edge cases

Format your response exactly like this:
[Improved Prompt]
...Your improved prompt here...

---
[Explanation of Changes]
...Brief explanation...

---
[Additional Considerations]
...Brief notes..."#,
        domain = analysis.domain,
        format_type = analysis.format_type.as_str(),
        requirements = analysis.critical_requirements.join(", "),
        model_note = model_note,
    )
}

pub fn user_prompt_improve(original_prompt: &str) -> String {
    format!("Original Prompt: {original_prompt}")
}

pub fn system_prompt_explanation() -> String {
    r#"You are an expert prompt engineer explaining a prompt rewrite.
Compare the original prompt with the improved prompt and produce a structured
explanation of the changes, covering:
- Structural improvements
- Clarity and readability gains
- Specificity and precision added
- Model-fit optimizations
- Guardrails for edge cases
Keep it brief and concrete; refer to actual wording from the prompts."#
        .to_string()
}

pub fn system_prompt_considerations() -> String {
    r#"You are an expert prompt engineer advising on a rewritten prompt.
Given the original and improved prompt, list additional considerations:
- Alternative approaches worth trying
- Known limitations of the improved prompt
- Model-specific adaptations to keep in mind
- Testing recommendations before production use
- Fallback strategies if the prompt underperforms
Keep it brief and practical."#
        .to_string()
}

pub fn user_prompt_pair(original_prompt: &str, improved_prompt: &str) -> String {
    format!("Original Prompt: {original_prompt}\n\nImproved Prompt: {improved_prompt}")
}

pub fn system_prompt_validation(
    context: &str,
    original_prompt: &str,
    improved_prompt: &str,
    analysis_json: &str,
    target_model: &str,
    domain: &str,
) -> String {
    format!(
        r#"You are a rigorous prompt-quality reviewer.
Evaluate the improved prompt against the original request and context.

Original context:
{context}

Original prompt:
{original_prompt}

Improved prompt:
{improved_prompt}

Context analysis:
{analysis_json}

Target model: {target_model}
Domain: {domain}

Score each criterion from 1 to 10:
COMPLETENESS
CLARITY & STRUCTURE
PRECISION & SPECIFICITY
MODEL APPROPRIATENESS
CONTEXTUAL FIT
IMPROVEMENT DELTA

Then give a final confidence score between 0 and 1 with two decimals, a short
prose recommendation, and an explicit flag if the improved prompt is overly
verbose or structurally mismatched to its domain."#,
    )
}

/// Static report used when validation is skipped (fast variant); passed
/// through unmodified as presentation data.
pub fn templated_validation_report() -> String {
    r#"
COMPLETENESS: 8/10
CLARITY & STRUCTURE: 9/10
PRECISION & SPECIFICITY: 8/10
MODEL APPROPRIATENESS: 7/10
CONTEXTUAL FIT: 8/10

Final confidence score: 0.85

Recommendation: Test this prompt with your specific use case and refine as needed.
"#
    .to_string()
}

pub fn system_prompt_first_question(original_prompt: &str, model_considerations: &str) -> String {
    format!(
        r#"You are an expert prompt engineer who helps improve AI prompts with focused questions.
Your goal: Gather essential context to improve the prompt's effectiveness.

IMPORTANT: Ask ONE critical question (10 words max) that would most improve the prompt's clarity, effectiveness, or alignment with the target model.

Original prompt:
{original_prompt}

Target model info:
{model_considerations}

Provide a single, clear, ultra-brief question focusing on the most critical missing information that would help improve the prompt's effectiveness."#,
    )
}

pub fn system_prompt_followup(
    original_prompt: &str,
    qa_pairs_json: &str,
    model_considerations: &str,
) -> String {
    format!(
        r#"You are an expert prompt engineer focused on gathering comprehensive context.
Your goal: Ensure we have all necessary information to improve the prompt effectively.

Original prompt:
{original_prompt}

Conversation so far:
{qa_pairs_json}

Target model info:
{model_considerations}

Instructions:
1. Review the conversation history and determine if we have gathered enough context to make meaningful prompt improvements.
2. Consider these key areas:
   - Use case and intended audience
   - Specific requirements and constraints
   - Success criteria and quality expectations
   - Error handling and edge cases
   - Model-specific considerations
   - Performance and efficiency needs
   - Security and compliance requirements
   - Integration and compatibility needs

3. If ANY of these areas are unclear or missing, ask ONE ultra-brief question (10 words max) about the most critical missing information.
4. Only respond with "COMPLETE" if we have gathered sufficient information across ALL key areas.

Remember: It's better to ask one more question than to miss critical context."#,
    )
}

pub fn user_prompt_next_question() -> String {
    "Generate the next question to ask.".to_string()
}
