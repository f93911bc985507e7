//! Client configuration.
//!
//! Values that differ between deployments of the hosted assistant live here
//! rather than in the protocol code: which bot to talk to, the request flags,
//! how stream tokens are joined, and which framing the splitter expects.

use std::str::FromStr;

use crate::error::ChatError;
use crate::models::RequestMetadata;
use crate::sse::Framing;

/// Default API host for the hosted assistant
pub const DEFAULT_API_BASE: &str = "https://api.docsbot.ai";

/// Configuration for [`ChatClient`](crate::client::ChatClient).
///
/// # Example
///
/// ```ignore
/// use docchat::config::ChatConfig;
///
/// let config = ChatConfig::new("team-id", "bot-id")
///     .with_product("Acme Router")
///     .with_full_source(false);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Scheme and host of the API, without a trailing slash
    pub api_base: String,
    pub team_id: String,
    pub bot_id: String,
    /// Product label prepended to every question as `"{product}: {question}"`
    pub product: Option<String>,
    pub metadata: RequestMetadata,
    pub document_retriever: bool,
    pub followup_rating: bool,
    /// Ask the server for full source documents (deployments disagree on this)
    pub full_source: bool,
    pub context_items: u32,
    pub human_escalation: bool,
    /// Inserted between consecutive stream tokens (default: nothing)
    pub token_separator: String,
    /// Wire framing the splitter should expect
    pub framing: Framing,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            team_id: String::new(),
            bot_id: String::new(),
            product: None,
            metadata: RequestMetadata::default(),
            document_retriever: true,
            followup_rating: true,
            full_source: true,
            context_items: 5,
            human_escalation: false,
            token_separator: String::new(),
            framing: Framing::Auto,
        }
    }
}

impl ChatConfig {
    /// Create a config for the given team and bot with default flags.
    pub fn new(team_id: impl Into<String>, bot_id: impl Into<String>) -> Self {
        Self {
            team_id: team_id.into(),
            bot_id: bot_id.into(),
            ..Self::default()
        }
    }

    /// Override the API host (useful for tests and self-hosted proxies).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    pub fn with_metadata(mut self, metadata: RequestMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_full_source(mut self, full_source: bool) -> Self {
        self.full_source = full_source;
        self
    }

    pub fn with_context_items(mut self, context_items: u32) -> Self {
        self.context_items = context_items;
        self
    }

    pub fn with_token_separator(mut self, separator: impl Into<String>) -> Self {
        self.token_separator = separator.into();
        self
    }

    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    /// Full URL of the streaming chat-agent endpoint.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/teams/{}/bots/{}/chat-agent",
            self.api_base, self.team_id, self.bot_id
        )
    }

    /// Apply the product prefix, if any.
    pub fn format_question(&self, question: &str) -> String {
        match &self.product {
            Some(product) if !product.is_empty() => format!("{}: {}", product, question),
            _ => question.to_string(),
        }
    }

    /// Build a config from `DOCCHAT_*` environment variables.
    ///
    /// Unset variables keep their defaults. A variable that is set but cannot
    /// be parsed is an error rather than being silently ignored.
    pub fn from_env() -> Result<Self, ChatError> {
        let mut config = Self::default();

        if let Ok(base) = std::env::var("DOCCHAT_API_BASE") {
            config = config.with_api_base(base);
        }
        if let Ok(team_id) = std::env::var("DOCCHAT_TEAM_ID") {
            config.team_id = team_id;
        }
        if let Ok(bot_id) = std::env::var("DOCCHAT_BOT_ID") {
            config.bot_id = bot_id;
        }
        if let Ok(product) = std::env::var("DOCCHAT_PRODUCT") {
            config.product = Some(product);
        }
        if let Ok(value) = std::env::var("DOCCHAT_FULL_SOURCE") {
            config.full_source = parse_bool("DOCCHAT_FULL_SOURCE", &value)?;
        }
        if let Ok(separator) = std::env::var("DOCCHAT_TOKEN_SEPARATOR") {
            config.token_separator = separator;
        }
        if let Ok(value) = std::env::var("DOCCHAT_FRAMING") {
            config.framing = Framing::from_str(&value)?;
        }

        Ok(config)
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ChatError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ChatError::Config {
            message: format!("{} must be a boolean, got '{}'", name, other),
        }),
    }
}
