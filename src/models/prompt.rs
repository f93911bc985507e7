use serde::{Deserialize, Serialize};

/// Which button the user pressed on a follow-up prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowupChoice {
    Yes,
    No,
}

/// A two-choice question the assistant asks after answering.
///
/// The labels come straight from the server and are untrusted. The prompt is
/// handed to the render sink as data; choosing an option re-submits the chosen
/// label verbatim as the next user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowupPrompt {
    pub prompt_text: String,
    pub yes_label: String,
    pub no_label: String,
}

impl FollowupPrompt {
    pub fn new(
        prompt_text: impl Into<String>,
        yes_label: impl Into<String>,
        no_label: impl Into<String>,
    ) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            yes_label: yes_label.into(),
            no_label: no_label.into(),
        }
    }

    /// The text to submit for the given choice
    pub fn label(&self, choice: FollowupChoice) -> &str {
        match choice {
            FollowupChoice::Yes => &self.yes_label,
            FollowupChoice::No => &self.no_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_for_choice() {
        let prompt = FollowupPrompt::new("Did that help?", "Yes, thanks", "No, I need more help");
        assert_eq!(prompt.label(FollowupChoice::Yes), "Yes, thanks");
        assert_eq!(prompt.label(FollowupChoice::No), "No, I need more help");
    }

    #[test]
    fn test_labels_are_kept_verbatim() {
        let prompt = FollowupPrompt::new("?", "<b>yes</b>", "no & more");
        assert_eq!(prompt.label(FollowupChoice::Yes), "<b>yes</b>");
        assert_eq!(prompt.label(FollowupChoice::No), "no & more");
    }
}
