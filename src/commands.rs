// Chat command parsing and execution.
//
// Each command fetches a fresh payload, normalizes it, and either fuzzy
// matches or ranks the records. The result is a transport-neutral `Reply`;
// turning it into a chat message is `render`'s job.

use std::cmp::Ordering;

use crate::fields::{resolve_name, resolve_number, resolve_string, Field};
use crate::matcher::find_matches;
use crate::metrics;
use crate::normalize::{extract_records, Record};
use crate::upstream::{Endpoint, RecordSource};

/// Prefix that marks a chat message as a command.
pub const COMMAND_PREFIX: char = '!';

/// Entries shown by leaderboard-style commands.
pub const LEADERBOARD_SIZE: usize = 10;
const SNIPES_SHOWN: usize = 5;
const ADS_SHOWN: usize = 3;
const VALUE_LOOKUP_ITEMS: u32 = 200;
const SEARCH_ITEMS: u32 = 300;

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Egg leaderboard, or a fuzzy egg search when a query is given.
    Hatches { query: Option<String> },
    Value { query: String },
    Search { query: String },
    TopValues,
    Enchants,
    Snipes,
    Ads,
}

impl Command {
    /// Parse a raw chat message. Returns `None` for anything that is not a
    /// known command (no prefix, empty, unknown command word).
    pub fn parse(content: &str) -> Option<Command> {
        let body = content.trim().strip_prefix(COMMAND_PREFIX)?;
        let mut words = body.split_whitespace();
        let name = words.next()?.to_lowercase();
        let query = words.collect::<Vec<_>>().join(" ");

        let command = match name.as_str() {
            "help" => Command::Help,
            "hatches" => Command::Hatches {
                query: (!query.is_empty()).then_some(query),
            },
            "value" => Command::Value { query },
            "search" => Command::Search { query },
            "topvalues" => Command::TopValues,
            "enchants" => Command::Enchants,
            "snipes" => Command::Snipes,
            "ads" => Command::Ads,
            _ => return None,
        };
        Some(command)
    }

    /// Command word, used as a metric label.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Hatches { .. } => "hatches",
            Command::Value { .. } => "value",
            Command::Search { .. } => "search",
            Command::TopValues => "topvalues",
            Command::Enchants => "enchants",
            Command::Snipes => "snipes",
            Command::Ads => "ads",
        }
    }
}

/// What a listing shows; decides the title and unit when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Hatches,
    ValueLookup,
    Search,
    TopValues,
    Enchants,
    Snipes,
    Ads,
}

impl ListingKind {
    /// The numeric field displayed next to each entry.
    pub fn value_field(&self) -> Option<Field> {
        match self {
            ListingKind::Hatches | ListingKind::Snipes => Some(Field::Cost),
            ListingKind::ValueLookup
            | ListingKind::Search
            | ListingKind::TopValues
            | ListingKind::Enchants => Some(Field::TokenValue),
            ListingKind::Ads => None,
        }
    }

    /// Plural noun for error messages.
    pub fn noun(&self) -> &'static str {
        match self {
            ListingKind::Hatches => "eggs",
            ListingKind::ValueLookup | ListingKind::Search => "items",
            ListingKind::TopValues => "top values",
            ListingKind::Enchants => "enchants",
            ListingKind::Snipes => "snipes",
            ListingKind::Ads => "ads",
        }
    }
}

/// Extra labelled text shown under an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Detail {
    pub label: &'static str,
    pub text: Option<String>,
}

/// One ranked line of a reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// 1-based position in the listing.
    pub rank: usize,
    pub name: String,
    pub value: Option<f64>,
    pub details: Vec<Detail>,
}

/// Transport-neutral answer to a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Help,
    Listing {
        kind: ListingKind,
        entries: Vec<Entry>,
    },
    /// The lookup ran but nothing matched.
    NotFound {
        kind: ListingKind,
        query: Option<String>,
    },
    /// The command needs an argument.
    Usage { usage: &'static str },
    /// Upstream failed; the user should try again later.
    Unavailable { kind: ListingKind },
}

impl Reply {
    /// Metric label for this outcome.
    pub fn outcome(&self) -> &'static str {
        match self {
            Reply::Help | Reply::Listing { .. } => "ok",
            Reply::NotFound { .. } => "not_found",
            Reply::Usage { .. } => "usage",
            Reply::Unavailable { .. } => "unavailable",
        }
    }
}

/// Stable sort by `field`, highest first; records without the field go last.
pub fn rank_by(mut records: Vec<Record>, field: Field, limit: usize) -> Vec<Record> {
    records.sort_by(|a, b| {
        match (resolve_number(a, field), resolve_number(b, field)) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
    records.truncate(limit);
    records
}

/// Turn records into numbered entries for `kind`.
pub fn to_entries<'a, I>(records: I, kind: ListingKind) -> Vec<Entry>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| Entry {
            rank: i + 1,
            name: resolve_name(record),
            value: kind.value_field().and_then(|f| resolve_number(record, f)),
            details: details_for(record, kind),
        })
        .collect()
}

fn details_for(record: &Record, kind: ListingKind) -> Vec<Detail> {
    let number = |label, field| Detail {
        label,
        text: resolve_number(record, field).map(crate::render::format_number),
    };
    let text = |label, field| Detail {
        label,
        text: resolve_string(record, field),
    };
    match kind {
        ListingKind::ValueLookup => vec![number("Exist", Field::Exist)],
        ListingKind::Snipes => vec![Detail {
            label: "Percent",
            text: resolve_number(record, Field::Percent)
                .map(|p| format!("{}%", crate::render::format_number(p))),
        }],
        ListingKind::Ads => vec![
            text("Offering", Field::Offering),
            text("Wanting", Field::Wanting),
        ],
        _ => Vec::new(),
    }
}

/// Execute a command against `source`.
pub async fn execute<S: RecordSource>(source: &S, command: &Command) -> Reply {
    let reply = match command {
        Command::Help => Reply::Help,
        Command::Hatches { query } => hatches(source, query.as_deref()).await,
        Command::Value { query } => value_lookup(source, query).await,
        Command::Search { query } => search(source, query).await,
        Command::TopValues => {
            listing(source, Endpoint::TopValues, ListingKind::TopValues, |records| {
                rank_by(records, Field::TokenValue, LEADERBOARD_SIZE)
            })
            .await
        }
        Command::Enchants => {
            listing(source, Endpoint::Enchants, ListingKind::Enchants, |mut records| {
                records.truncate(LEADERBOARD_SIZE);
                records
            })
            .await
        }
        Command::Snipes => {
            listing(source, Endpoint::Snipes, ListingKind::Snipes, |mut records| {
                records.truncate(SNIPES_SHOWN);
                records
            })
            .await
        }
        Command::Ads => {
            listing(source, Endpoint::Ads, ListingKind::Ads, |mut records| {
                records.truncate(ADS_SHOWN);
                records
            })
            .await
        }
    };

    metrics::COMMANDS_TOTAL
        .with_label_values(&[command.name(), reply.outcome()])
        .inc();
    tracing::debug!(command = command.name(), outcome = reply.outcome(), "Handled command");
    reply
}

async fn fetch_records<S: RecordSource>(source: &S, endpoint: Endpoint) -> Option<Vec<Record>> {
    match source.fetch(endpoint).await {
        Ok(payload) => Some(extract_records(&payload)),
        Err(e) => {
            tracing::warn!(endpoint = endpoint.label(), "Command fetch failed: {e}");
            None
        }
    }
}

async fn listing<S, F>(source: &S, endpoint: Endpoint, kind: ListingKind, select: F) -> Reply
where
    S: RecordSource,
    F: FnOnce(Vec<Record>) -> Vec<Record>,
{
    let Some(records) = fetch_records(source, endpoint).await else {
        return Reply::Unavailable { kind };
    };
    let shown = select(records);
    if shown.is_empty() {
        return Reply::NotFound { kind, query: None };
    }
    Reply::Listing {
        kind,
        entries: to_entries(&shown, kind),
    }
}

async fn hatches<S: RecordSource>(source: &S, query: Option<&str>) -> Reply {
    let kind = ListingKind::Hatches;
    let Some(records) = fetch_records(source, Endpoint::Eggs).await else {
        return Reply::Unavailable { kind };
    };

    let entries = match query {
        Some(q) => to_entries(find_matches(&records, q), kind),
        None => to_entries(&rank_by(records, Field::Cost, LEADERBOARD_SIZE), kind),
    };

    if entries.is_empty() {
        Reply::NotFound {
            kind,
            query: query.map(str::to_string),
        }
    } else {
        Reply::Listing { kind, entries }
    }
}

async fn value_lookup<S: RecordSource>(source: &S, query: &str) -> Reply {
    let kind = ListingKind::ValueLookup;
    if query.trim().is_empty() {
        return Reply::Usage {
            usage: "!value <pet name>",
        };
    }
    let Some(records) = fetch_records(source, Endpoint::Items { limit: VALUE_LOOKUP_ITEMS }).await
    else {
        return Reply::Unavailable { kind };
    };

    // Tiers never mix, so the first match is the best one available.
    match find_matches(&records, query).into_iter().next() {
        Some(best) => Reply::Listing {
            kind,
            entries: to_entries([best], kind),
        },
        None => Reply::NotFound {
            kind,
            query: Some(query.to_string()),
        },
    }
}

async fn search<S: RecordSource>(source: &S, query: &str) -> Reply {
    let kind = ListingKind::Search;
    if query.trim().is_empty() {
        return Reply::Usage {
            usage: "!search <name>",
        };
    }
    let Some(records) = fetch_records(source, Endpoint::Items { limit: SEARCH_ITEMS }).await else {
        return Reply::Unavailable { kind };
    };

    let matches = find_matches(&records, query);
    if matches.is_empty() {
        Reply::NotFound {
            kind,
            query: Some(query.to_string()),
        }
    } else {
        Reply::Listing {
            kind,
            entries: to_entries(matches, kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("!help"), Some(Command::Help));
        assert_eq!(Command::parse("  !HATCHES  "), Some(Command::Hatches { query: None }));
        assert_eq!(
            Command::parse("!hatches golden   egg"),
            Some(Command::Hatches {
                query: Some("golden egg".into())
            })
        );
        assert_eq!(
            Command::parse("!value Huge Cat"),
            Some(Command::Value {
                query: "Huge Cat".into()
            })
        );
        assert_eq!(
            Command::parse("!search"),
            Some(Command::Search { query: "".into() })
        );
        assert_eq!(Command::parse("!topvalues"), Some(Command::TopValues));
        assert_eq!(Command::parse("!snipes extra words"), Some(Command::Snipes));
    }

    #[test]
    fn test_parse_ignores_non_commands() {
        assert_eq!(Command::parse("hello"), None);
        assert_eq!(Command::parse("!"), None);
        assert_eq!(Command::parse("!dance"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_rank_by_is_stable_and_puts_absent_last() {
        let records: Vec<Record> = vec![
            json!({"name": "none"}),
            json!({"name": "low", "value": 1}),
            json!({"name": "high-a", "value": "9"}),
            json!({"name": "high-b", "value": 9}),
        ]
        .into_iter()
        .map(Record::new)
        .collect();

        let ranked = rank_by(records, Field::TokenValue, 3);
        let names: Vec<String> = ranked.iter().map(resolve_name).collect();
        assert_eq!(names, vec!["high-a", "high-b", "low"]);
    }

    #[test]
    fn test_to_entries_numbers_and_details() {
        let records = vec![
            Record::new(json!({"itemName": "Cat", "price": 50, "percent": 62.5})),
            Record::new(json!({"itemName": "Dog", "price": "n/a"})),
        ];
        let entries = to_entries(&records, ListingKind::Snipes);
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[0].name, "Cat");
        assert_eq!(entries[0].value, Some(50.0));
        assert_eq!(entries[0].details[0].text.as_deref(), Some("62.5%"));
        assert_eq!(entries[1].rank, 2);
        assert_eq!(entries[1].value, None);
        assert_eq!(entries[1].details[0].text, None);
    }

    #[test]
    fn test_reply_outcomes() {
        assert_eq!(Reply::Help.outcome(), "ok");
        assert_eq!(
            Reply::Unavailable {
                kind: ListingKind::Ads
            }
            .outcome(),
            "unavailable"
        );
        assert_eq!(Reply::Usage { usage: "!value" }.outcome(), "usage");
    }
}
