//! `key=value` filter arguments for the listing commands.
//!
//! Arguments are tokenized against a table of recognized keys. Every
//! recognized key ends up in the [`Filters`] set, `None` when absent. A record
//! matches when every present filter equals the corresponding field.

use crate::{Group, Quest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use vishnu_error::{ParseError, ParseErrorKind};

/// Filter values keyed by recognized key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    values: BTreeMap<String, Option<String>>,
}

impl Filters {
    /// Value for `key`, if it was supplied.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_deref())
    }

    /// True when no filter was supplied.
    pub fn is_empty(&self) -> bool {
        self.values.values().all(Option::is_none)
    }

    /// Recognized keys, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    fn integer(&self, key: &str) -> Result<Option<i32>, ParseError> {
        self.get(key)
            .map(|raw| {
                raw.parse().map_err(|_| {
                    ParseError::new(ParseErrorKind::InvalidInteger {
                        field: key.to_string(),
                        value: raw.to_string(),
                    })
                })
            })
            .transpose()
    }

    fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }
}

/// Tokenize `args` into a filter set over `recognized` keys.
///
/// Each whitespace-separated token must be `key=value` with a recognized key
/// and a non-empty value. When a key repeats, its first value wins.
///
/// # Examples
///
/// ```
/// use vishnu_core::parse_filters;
///
/// let filters = parse_filters(&["tier=3", "creator=alice"], &["id", "tier", "creator"]).unwrap();
/// assert_eq!(filters.get("tier"), Some("3"));
/// assert_eq!(filters.get("id"), None);
///
/// assert!(parse_filters(&["tier"], &["tier"]).is_err());
/// ```
pub fn parse_filters<S: AsRef<str>>(args: &[S], recognized: &[&str]) -> Result<Filters, ParseError> {
    let mut values: BTreeMap<String, Option<String>> =
        recognized.iter().map(|k| (k.to_string(), None)).collect();

    for token in args.iter().flat_map(|a| a.as_ref().split_whitespace()) {
        let (key, value) = token
            .split_once('=')
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .ok_or_else(|| ParseError::new(ParseErrorKind::FilterToken(token.to_string())))?;

        let slot = values.get_mut(key).ok_or_else(|| {
            ParseError::new(ParseErrorKind::UnknownFilterKey {
                key: key.to_string(),
                expected: recognized.iter().map(|k| k.to_string()).collect(),
            })
        })?;

        if slot.is_none() {
            *slot = Some(value.to_string());
        } else {
            debug!(key, value, "Ignoring repeated filter key");
        }
    }

    Ok(Filters { values })
}

/// Filters accepted by `questlist`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestFilter {
    /// Exact quest id
    pub id: Option<i32>,
    /// Exact tier
    pub tier: Option<String>,
    /// Exact creator
    pub creator: Option<String>,
}

impl QuestFilter {
    /// Keys recognized by `questlist`.
    pub const KEYS: [&'static str; 3] = ["id", "tier", "creator"];

    /// Parse `questlist` arguments.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, ParseError> {
        let filters = parse_filters(args, &Self::KEYS)?;
        Ok(Self {
            id: filters.integer("id")?,
            tier: filters.text("tier"),
            creator: filters.text("creator"),
        })
    }

    /// Open quests matching every supplied filter.
    pub fn matches(&self, quest: &Quest) -> bool {
        !quest.completed()
            && self.id.is_none_or(|id| *quest.id() == id)
            && self.tier.as_deref().is_none_or(|t| quest.tier() == t)
            && self.creator.as_deref().is_none_or(|c| quest.creator() == c)
    }
}

/// Filters accepted by `grouplist`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupFilter {
    /// Exact group id
    pub id: Option<i32>,
    /// Exact creator
    pub creator: Option<String>,
}

impl GroupFilter {
    /// Keys recognized by `grouplist`.
    pub const KEYS: [&'static str; 2] = ["id", "creator"];

    /// Parse `grouplist` arguments.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, ParseError> {
        let filters = parse_filters(args, &Self::KEYS)?;
        Ok(Self {
            id: filters.integer("id")?,
            creator: filters.text("creator"),
        })
    }

    /// Groups matching every supplied filter.
    pub fn matches(&self, group: &Group) -> bool {
        self.id.is_none_or(|id| *group.id() == id)
            && self.creator.as_deref().is_none_or(|c| group.creator() == c)
    }
}
