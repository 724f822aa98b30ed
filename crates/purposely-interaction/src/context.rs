//! Caller-supplied coaching context injected into prompts.

use serde::{Deserialize, Serialize};

/// Profile facts the generator should tailor content to.
///
/// Everything is optional; an empty context produces generic content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub focus_areas: Vec<String>,
}

impl ProfileContext {
    /// Renders the context as short prompt lines; empty when nothing is
    /// known about the user.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        if let Some(style) = &self.attachment_style {
            lines.push(format!("Attachment style: {}", style));
        }
        if let Some(status) = &self.relationship_status {
            lines.push(format!("Relationship status: {}", status));
        }
        if !self.focus_areas.is_empty() {
            lines.push(format!("Focus areas: {}", self.focus_areas.join(", ")));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_context_renders_empty() {
        assert_eq!(ProfileContext::default().summary(), "");
    }

    #[test]
    fn test_summary_lines() {
        let context = ProfileContext {
            attachment_style: Some("anxious".to_string()),
            relationship_status: Some("dating".to_string()),
            focus_areas: vec!["trust".to_string(), "communication".to_string()],
        };
        let summary = context.summary();
        assert!(summary.contains("Attachment style: anxious"));
        assert!(summary.contains("Focus areas: trust, communication"));
    }
}
