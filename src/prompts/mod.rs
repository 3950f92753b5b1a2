//! Prompt module for LLM-based operations.
//!
//! Templates are registered by version label in a [`PromptBook`]; the
//! polishing client picks one version at construction time.

pub mod polish;

pub use polish::*;

use crate::error::{PipelineError, Result};

/// Versioned prompt templates, in registration order
#[derive(Debug, Clone)]
pub struct PromptBook {
    templates: Vec<(String, String)>,
}

impl PromptBook {
    /// Book holding the shipped versions
    pub fn new() -> Self {
        let mut book = Self {
            templates: Vec::new(),
        };
        book.add_prompt(DEFAULT_VERSION, POLISH_PROMPT_V1);
        book
    }

    /// Raw template for a version
    pub fn template(&self, version: &str) -> Result<&str> {
        self.templates
            .iter()
            .find(|(v, _)| v == version)
            .map(|(_, t)| t.as_str())
            .ok_or_else(|| {
                PipelineError::Config(format!("Prompt version '{}' not found.", version))
            })
    }

    /// Render a version with the given text
    pub fn get_prompt(&self, version: &str, text: &str) -> Result<String> {
        Ok(build_polish_prompt(self.template(version)?, text))
    }

    /// Register a template, replacing any existing one with the same label
    pub fn add_prompt(&mut self, version: &str, template: &str) {
        match self.templates.iter_mut().find(|(v, _)| v == version) {
            Some(entry) => entry.1 = template.to_string(),
            None => self
                .templates
                .push((version.to_string(), template.to_string())),
        }
    }

    pub fn list_versions(&self) -> Vec<&str> {
        self.templates.iter().map(|(v, _)| v.as_str()).collect()
    }
}

impl Default for PromptBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_book() -> Result<()> {
        let book = PromptBook::new();
        assert_eq!(book.list_versions(), vec!["v1"]);
        assert!(book.get_prompt("v1", "Body.")?.contains("Body."));
        Ok(())
    }

    #[test]
    fn test_unknown_version() {
        let book = PromptBook::new();
        assert!(matches!(
            book.get_prompt("v9", "x"),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_add_and_replace() -> Result<()> {
        let mut book = PromptBook::new();
        book.add_prompt("v2", "Shorten: {text}");
        book.add_prompt("v1", "Rewrite: {text}");

        assert_eq!(book.list_versions(), vec!["v1", "v2"]);
        assert_eq!(book.get_prompt("v1", "abc")?, "Rewrite: abc");
        assert_eq!(book.get_prompt("v2", "abc")?, "Shorten: abc");
        Ok(())
    }
}
