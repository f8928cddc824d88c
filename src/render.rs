// Chat message rendering.
//
// Messages use the Discord webhook/message JSON shape (`content` plus
// `embeds`), which is also what the command endpoint hands back to the
// gateway adapter.

use serde::{Deserialize, Serialize};

use crate::commands::{Entry, ListingKind, Reply};
use crate::config::Config;
use crate::fields::Field;

pub const SOURCE_FOOTER: &str = "Source: tapsim.gg";
const MISSING: &str = "N/A";

const HELP_LINES: &[(&str, &str)] = &[
    ("!hatches", "Show eggs/hatches list"),
    ("!hatches <egg>", "Search eggs by name"),
    ("!value <pet>", "Value lookup"),
    ("!search <name>", "Search pets/items"),
    ("!topvalues", "Top 10 values"),
    ("!enchants", "Show enchants list"),
    ("!snipes", "Show plaza snipes"),
    ("!ads", "Show latest trade ads"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// A rich chat embed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub footer: EmbedFooter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// An outgoing chat message: plain text, embeds, or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

impl OutgoingMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embeds: Vec::new(),
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
        }
    }
}

/// Format a number for display: thousands separators, no trailing `.0`,
/// at most two decimals. Magnitude is never clamped.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let mut out = String::new();
    if value < 0.0 && (whole != "0" || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Renders replies with the configured emoji markup.
#[derive(Debug, Clone)]
pub struct Renderer {
    pub click_emoji: String,
    pub token_emoji: String,
}

impl Renderer {
    pub fn new(click_emoji: impl Into<String>, token_emoji: impl Into<String>) -> Self {
        Self {
            click_emoji: click_emoji.into(),
            token_emoji: token_emoji.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.click_emoji.clone(), config.token_emoji.clone())
    }

    pub fn render(&self, reply: &Reply) -> OutgoingMessage {
        match reply {
            Reply::Help => OutgoingMessage::embed(self.help()),
            Reply::Listing { kind, entries } => OutgoingMessage::embed(Embed {
                title: title_for(*kind).to_string(),
                description: self.describe(*kind, entries),
                footer: footer(SOURCE_FOOTER),
                timestamp: None,
            }),
            Reply::NotFound { kind, query } => OutgoingMessage::text(match query {
                Some(q) => format!("❌ No match found for **{q}**."),
                None => format!("❌ No {} found.", kind.noun()),
            }),
            Reply::Usage { usage } => OutgoingMessage::text(format!("❌ Use: `{usage}`")),
            Reply::Unavailable { kind } => OutgoingMessage::text(format!(
                "❌ API error fetching {}. Try again in a minute.",
                kind.noun()
            )),
        }
    }

    /// The periodic hatch post.
    pub fn auto_hatch(&self, entries: &[Entry], interval_minutes: u64) -> OutgoingMessage {
        OutgoingMessage::embed(Embed {
            title: "🥚 Tap Sim — Auto Hatch Update".to_string(),
            description: self.describe(ListingKind::Hatches, entries),
            footer: footer(&format!(
                "Updated every {interval_minutes} minutes | tapsim.gg"
            )),
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
        })
    }

    fn help(&self) -> Embed {
        let description = std::iter::once("Here are all commands:".to_string())
            .chain(
                HELP_LINES
                    .iter()
                    .map(|(cmd, what)| format!("**{cmd}** → {what}")),
            )
            .collect::<Vec<_>>()
            .join("\n");
        Embed {
            title: "📌 Tap Sim Bot Commands".to_string(),
            description,
            footer: footer(SOURCE_FOOTER),
            timestamp: None,
        }
    }

    fn emoji_for(&self, field: Field) -> &str {
        match field {
            Field::TokenValue => &self.token_emoji,
            _ => &self.click_emoji,
        }
    }

    fn amount(&self, kind: ListingKind, value: Option<f64>) -> String {
        let shown = value.map(format_number).unwrap_or_else(|| MISSING.to_string());
        match kind.value_field() {
            Some(field) => format!("{} **{}**", self.emoji_for(field), shown),
            None => format!("**{shown}**"),
        }
    }

    fn describe(&self, kind: ListingKind, entries: &[Entry]) -> String {
        let detail = |e: &Entry, label: &str| {
            e.details
                .iter()
                .find(|d| d.label == label)
                .and_then(|d| d.text.clone())
                .unwrap_or_else(|| MISSING.to_string())
        };

        let (lines, sep): (Vec<String>, &str) = match kind {
            ListingKind::Hatches => (
                entries
                    .iter()
                    .map(|e| format!("**{}**\nPrice: {}", e.name, self.amount(kind, e.value)))
                    .collect(),
                "\n\n",
            ),
            ListingKind::ValueLookup => (
                entries
                    .iter()
                    .map(|e| {
                        format!(
                            "**{}**\n\nValue: {}\nExist: **{}**",
                            e.name,
                            self.amount(kind, e.value),
                            detail(e, "Exist")
                        )
                    })
                    .collect(),
                "\n\n",
            ),
            ListingKind::TopValues => (
                entries
                    .iter()
                    .map(|e| {
                        format!(
                            "**{}. {}**\nValue: {}",
                            e.rank,
                            e.name,
                            self.amount(kind, e.value)
                        )
                    })
                    .collect(),
                "\n\n",
            ),
            ListingKind::Search | ListingKind::Enchants => (
                entries
                    .iter()
                    .map(|e| format!("**{}** → {}", e.name, self.amount(kind, e.value)))
                    .collect(),
                "\n",
            ),
            ListingKind::Snipes => (
                entries
                    .iter()
                    .map(|e| {
                        format!(
                            "**{}**\nPrice: {}\nPercent: **{}**",
                            e.name,
                            self.amount(kind, e.value),
                            detail(e, "Percent")
                        )
                    })
                    .collect(),
                "\n\n",
            ),
            ListingKind::Ads => (
                entries
                    .iter()
                    .map(|e| {
                        format!(
                            "**Offering:** {}\n**Wanting:** {}",
                            detail(e, "Offering"),
                            detail(e, "Wanting")
                        )
                    })
                    .collect(),
                "\n\n",
            ),
        };
        lines.join(sep)
    }
}

fn title_for(kind: ListingKind) -> &'static str {
    match kind {
        ListingKind::Hatches => "🥚 Tap Sim — Eggs / Hatches",
        ListingKind::ValueLookup => "💎 Tap Sim — Value Lookup",
        ListingKind::Search => "🔎 Tap Sim — Search Results",
        ListingKind::TopValues => "🏆 Tap Sim — Top 10 Values",
        ListingKind::Enchants => "✨ Tap Sim — Enchants",
        ListingKind::Snipes => "🎯 Tap Sim — Plaza Snipes",
        ListingKind::Ads => "📢 Tap Sim — Latest Trade Ads",
    }
}

fn footer(text: &str) -> EmbedFooter {
    EmbedFooter {
        text: text.to_string(),
    }
}
