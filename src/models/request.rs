use serde::{Deserialize, Serialize};

use crate::config::ChatConfig;

/// Visitor details forwarded with every question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
}

impl RequestMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }
}

/// Request body for the streaming chat-agent endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// Conversation this question belongs to
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
    /// The question, prefixed with the product label when one is configured
    pub question: String,
    pub metadata: RequestMetadata,
    pub document_retriever: bool,
    pub followup_rating: bool,
    pub full_source: bool,
    /// Always true; the core only speaks the streaming protocol
    pub stream: bool,
    pub context_items: u32,
    pub human_escalation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
}

impl ChatRequest {
    /// Build a request from the client configuration
    pub fn from_config(config: &ChatConfig, conversation_id: &str, question: &str) -> Self {
        Self {
            conversation_id: conversation_id.to_string(),
            question: config.format_question(question),
            metadata: config.metadata.clone(),
            document_retriever: config.document_retriever,
            followup_rating: config.followup_rating,
            full_source: config.full_source,
            stream: true,
            context_items: config.context_items,
            human_escalation: config.human_escalation,
            image_urls: None,
        }
    }

    /// Attach uploaded image URLs (builder pattern)
    pub fn with_image_urls(mut self, urls: Vec<String>) -> Self {
        self.image_urls = if urls.is_empty() { None } else { Some(urls) };
        self
    }
}
