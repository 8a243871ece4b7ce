/// Decoder for the improver's three-section response contract:
///
/// ```text
/// [Improved Prompt]
/// ...
/// ---
/// [Explanation of Changes]
/// ...
/// ---
/// [Additional Considerations]
/// ...
/// ```
///
/// The layout is owned by the prompt text, not a real protocol, so all
/// parsing of it lives here. Fewer than three sections is valid; missing
/// trailing fields stay empty and are resolved by the fallback generators.

pub const NO_IMPROVED_PROMPT: &str = "No improved prompt provided.";

const DELIMITER: &str = "---";
const LABEL_IMPROVED: &str = "[Improved Prompt]";
const LABEL_EXPLANATION: &str = "[Explanation of Changes]";
const LABEL_CONSIDERATIONS: &str = "[Additional Considerations]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections {
    pub improved_prompt: String,
    pub explanation: String,
    pub considerations: String,
}

fn strip_label(section: &str, label: &str) -> String {
    section.trim().replace(label, "").trim().to_string()
}

pub fn split_sections(raw: &str) -> Sections {
    let parts: Vec<&str> = raw.split(DELIMITER).collect();

    let improved = parts
        .first()
        .map(|s| strip_label(s, LABEL_IMPROVED))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NO_IMPROVED_PROMPT.to_string());

    let explanation = parts
        .get(1)
        .map(|s| strip_label(s, LABEL_EXPLANATION))
        .unwrap_or_default();

    let considerations = parts
        .get(2)
        .map(|s| strip_label(s, LABEL_CONSIDERATIONS))
        .unwrap_or_default();

    Sections { improved_prompt: improved, explanation, considerations }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_the_full_three_section_layout() {
        let raw = "[Improved Prompt]\nFoo\n---\n[Explanation of Changes]\nBar\n---\n[Additional Considerations]\nBaz";
        let s = split_sections(raw);
        assert_eq!(s.improved_prompt, "Foo");
        assert_eq!(s.explanation, "Bar");
        assert_eq!(s.considerations, "Baz");
    }

    #[test]
    fn no_delimiters_keeps_everything_as_the_improved_prompt() {
        let raw = "[Improved Prompt]\nWrite a detailed technical blog post.";
        let s = split_sections(raw);
        assert_eq!(s.improved_prompt, "Write a detailed technical blog post.");
        assert_eq!(s.explanation, "");
        assert_eq!(s.considerations, "");
    }

    #[test]
    fn two_sections_leave_considerations_empty() {
        let raw = "[Improved Prompt]\nFoo\n---\n[Explanation of Changes]\nBar";
        let s = split_sections(raw);
        assert_eq!(s.improved_prompt, "Foo");
        assert_eq!(s.explanation, "Bar");
        assert_eq!(s.considerations, "");
    }

    #[test]
    fn empty_first_section_yields_the_fallback_literal() {
        for raw in ["", "[Improved Prompt]", "   \n  "] {
            let s = split_sections(raw);
            assert_eq!(s.improved_prompt, NO_IMPROVED_PROMPT, "raw: {raw:?}");
        }
    }

    #[test]
    fn label_only_sections_are_empty_not_the_label_text() {
        let raw = "[Improved Prompt]\nFoo\n---\n[Explanation of Changes]\n---\n[Additional Considerations]\n";
        let s = split_sections(raw);
        assert_eq!(s.improved_prompt, "Foo");
        assert_eq!(s.explanation, "");
        assert_eq!(s.considerations, "");
    }
}
