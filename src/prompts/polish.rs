//! Article polishing prompts.
//!
//! Templates carry a single `{text}` placeholder for the article body.

/// Prompt version shipped with the crate
pub const DEFAULT_VERSION: &str = "v1";

/// Dermatology letter polishing prompt
/// Placeholders: {text}
pub const POLISH_PROMPT_V1: &str = r#"
Act as a professional writer with extensive expertise in dermatology. 
Your task is to enhance the readability and flow of a letter without subheadings, 
approximately 500 words long, ensuring it sounds like it was written by a native speaker. 
While improving the writing style, maintain the original meaning and intent of the text. 
Here is the letter:
{text}
"#;

/// Substitute the article text into a template
pub fn build_polish_prompt(template: &str, text: &str) -> String {
    template.replace("{text}", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_polish_prompt() {
        let prompt = build_polish_prompt(POLISH_PROMPT_V1, "Dear editor, psoriasis.");
        assert!(prompt.contains("expertise in dermatology"));
        assert!(prompt.contains("Here is the letter:\nDear editor, psoriasis.\n"));
        assert!(!prompt.contains("{text}"));
    }
}
