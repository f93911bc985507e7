//! HTML render sink.
//!
//! Materializes conversation turns as HTML fragments. Bot answers are
//! markdown and go through `pulldown_cmark`; raw HTML in an answer is shown as
//! text, never passed through, and `javascript:`-style link targets are
//! neutralized. Every piece of server-provided text (answers, source titles,
//! follow-up labels) reaches the output only through the HTML writer's own
//! escaping.
//!
//! Each turn keeps one surface keyed by [`TurnId`]. An update re-renders the
//! whole turn from its full content and replaces the surface, so rendering
//! the same content twice yields the same document.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use pulldown_cmark::{html, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd};

use crate::models::{ConversationTurn, FollowupPrompt, Sender, Source, TurnId};
use crate::traits::RenderSink;

/// Shown while the assistant is producing an answer
pub const TYPING_INDICATOR_HTML: &str = "<div class=\"typing\">Agent is typing...</div>";

const BLOCKED_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

/// Render markdown to HTML with raw HTML escaped.
///
/// Handles incomplete markdown (an unterminated code fence mid-stream, say)
/// without failing; the next full re-render fixes it up.
pub fn render_markdown_html(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn is_blocked_url(url: &str) -> bool {
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCKED_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_blocked_url(&url) {
        tracing::debug!("Neutralized link target with blocked scheme");
        CowStr::Borrowed("#")
    } else {
        url
    }
}

/// Escape text for an HTML body context
fn escape_text(text: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, std::iter::once(Event::Text(CowStr::Borrowed(text))));
    out
}

fn render_sources(sources: &[Source]) -> String {
    let mut events: Vec<Event<'_>> = vec![Event::Start(Tag::List(None))];
    for source in sources {
        events.push(Event::Start(Tag::Item));
        match source.url.as_deref() {
            Some(url) if !is_blocked_url(url) => {
                events.push(Event::Start(Tag::Link {
                    link_type: LinkType::Inline,
                    dest_url: CowStr::Borrowed(url),
                    title: CowStr::Borrowed(""),
                    id: CowStr::Borrowed(""),
                }));
                events.push(Event::Text(CowStr::Borrowed(&source.title)));
                events.push(Event::End(TagEnd::Link));
            }
            _ => events.push(Event::Text(CowStr::Borrowed(&source.title))),
        }
        events.push(Event::End(TagEnd::Item));
    }
    events.push(Event::End(TagEnd::List(false)));

    let mut out = String::from("<div class=\"sources\">");
    html::push_html(&mut out, events.into_iter());
    out.push_str("</div>");
    out
}

/// Render one turn to its HTML surface
pub fn render_turn_html(turn: &ConversationTurn) -> String {
    match turn.sender {
        Sender::User => format!(
            "<div class=\"message user\"><p>{}</p></div>",
            escape_text(&turn.content)
        ),
        Sender::Bot => {
            let mut out = String::from("<div class=\"message bot\">");
            out.push_str(&render_markdown_html(&turn.content));
            if !turn.sources.is_empty() {
                out.push_str(&render_sources(&turn.sources));
            }
            out.push_str("</div>");
            out
        }
    }
}

/// Render a follow-up prompt with its two buttons
pub fn render_followup_html(prompt: &FollowupPrompt) -> String {
    format!(
        "<div class=\"followup\"><p>{}</p>\
<button class=\"followup-yes\" data-choice=\"yes\">{}</button>\
<button class=\"followup-no\" data-choice=\"no\">{}</button></div>",
        escape_text(&prompt.prompt_text),
        escape_text(&prompt.yes_label),
        escape_text(&prompt.no_label),
    )
}

#[derive(Debug, Default)]
struct Surface {
    blocks: Vec<String>,
    turns: HashMap<TurnId, usize>,
    typing: bool,
    renders: usize,
}

/// Render sink that keeps an HTML document of the conversation.
#[derive(Debug, Default)]
pub struct HtmlRenderSink {
    surface: Mutex<Surface>,
}

impl HtmlRenderSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn surface(&self) -> MutexGuard<'_, Surface> {
        self.surface.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current HTML for one turn
    pub fn turn_html(&self, id: TurnId) -> Option<String> {
        let surface = self.surface();
        surface
            .turns
            .get(&id)
            .and_then(|&index| surface.blocks.get(index).cloned())
    }

    /// The whole conversation, typing indicator last
    pub fn document(&self) -> String {
        let surface = self.surface();
        let mut out = surface.blocks.concat();
        if surface.typing {
            out.push_str(TYPING_INDICATOR_HTML);
        }
        out
    }

    /// Number of turn renders performed
    pub fn render_count(&self) -> usize {
        self.surface().renders
    }

    pub fn is_typing(&self) -> bool {
        self.surface().typing
    }

    /// Show a user turn that was recorded outside an exchange callback.
    pub fn show_turn(&self, turn: &ConversationTurn) {
        self.on_turn_updated(turn, true);
    }
}

impl RenderSink for HtmlRenderSink {
    fn on_turn_updated(&self, turn: &ConversationTurn, _is_final: bool) {
        let html = render_turn_html(turn);
        let mut surface = self.surface();
        surface.renders += 1;
        match surface.turns.get(&turn.id).copied() {
            Some(index) => surface.blocks[index] = html,
            None => {
                let index = surface.blocks.len();
                surface.blocks.push(html);
                surface.turns.insert(turn.id, index);
            }
        }
    }

    fn on_followup_prompt(&self, prompt: &FollowupPrompt) {
        let html = render_followup_html(prompt);
        self.surface().blocks.push(html);
    }

    fn on_typing(&self, active: bool) {
        self.surface().typing = active;
    }

    fn on_exchange_failed(&self, message: &str) {
        let html = format!("<div class=\"message error\">{}</div>", escape_text(message));
        let mut surface = self.surface();
        surface.typing = false;
        surface.blocks.push(html);
    }
}
