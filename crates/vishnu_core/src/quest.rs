//! Quest records and the validation applied before one is stored.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use vishnu_error::{ParseError, ParseErrorKind, QuestError, QuestErrorKind, VishnuResult};

/// Descriptions must have strictly fewer words than this.
pub const DESCRIPTION_WORD_LIMIT: usize = 100;

/// A stored quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Quest {
    /// Store-assigned id, increasing
    id: i32,
    /// Guild the quest belongs to
    guild_id: i64,
    /// Tier, one of the configured quest tiers
    tier: String,
    /// Free text description
    description: String,
    /// Display name of the person who posted it
    creator: String,
    /// Completed quests are hidden from listings
    completed: bool,
}

impl Quest {
    /// Assemble a quest from stored fields.
    pub fn from_parts(
        id: i32,
        guild_id: i64,
        tier: impl Into<String>,
        description: impl Into<String>,
        creator: impl Into<String>,
        completed: bool,
    ) -> Self {
        Self {
            id,
            guild_id,
            tier: tier.into(),
            description: description.into(),
            creator: creator.into(),
            completed,
        }
    }

    /// Mark completed or open again. Setting the current value is a no-op.
    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }
}

/// A validated quest that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct NewQuest {
    guild_id: i64,
    tier: String,
    description: String,
    creator: String,
}

impl NewQuest {
    /// Validate `questadd` arguments.
    ///
    /// `words` is the description split on whitespace; it is rejoined with
    /// single spaces.
    ///
    /// # Errors
    ///
    /// - [`QuestErrorKind::InvalidTier`] if `tier` is not in `valid_tiers`
    /// - [`QuestErrorKind::DescriptionTooLong`] if the description has
    ///   [`DESCRIPTION_WORD_LIMIT`] words or more
    /// - [`ParseErrorKind::MissingArgument`] if the description is empty
    pub fn validate<S: AsRef<str>>(
        guild_id: i64,
        tier: &str,
        words: &[S],
        creator: &str,
        valid_tiers: &[String],
    ) -> VishnuResult<Self> {
        if !valid_tiers.iter().any(|t| t == tier) {
            return Err(QuestError::new(QuestErrorKind::InvalidTier {
                tier: tier.to_string(),
                valid: valid_tiers.to_vec(),
            })
            .into());
        }

        let words: Vec<&str> = words
            .iter()
            .flat_map(|w| w.as_ref().split_whitespace())
            .collect();

        if words.is_empty() {
            return Err(ParseError::new(ParseErrorKind::MissingArgument {
                command: "questadd".to_string(),
                argument: "description".to_string(),
            })
            .into());
        }

        if words.len() >= DESCRIPTION_WORD_LIMIT {
            return Err(QuestError::new(QuestErrorKind::DescriptionTooLong {
                count: words.len(),
                limit: DESCRIPTION_WORD_LIMIT,
            })
            .into());
        }

        Ok(Self {
            guild_id,
            tier: tier.to_string(),
            description: words.join(" "),
            creator: creator.to_string(),
        })
    }

    /// Turn into a stored quest once the store has assigned an id.
    pub fn into_quest(self, id: i32) -> Quest {
        Quest {
            id,
            guild_id: self.guild_id,
            tier: self.tier,
            description: self.description,
            creator: self.creator,
            completed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vishnu_error::VishnuErrorKind;

    fn tiers() -> Vec<String> {
        vec!["1".to_string(), "2".to_string(), "3".to_string()]
    }

    #[test]
    fn test_validate_joins_words() {
        let quest = NewQuest::validate(1, "3", &["Slay", "the", "dragon"], "alice", &tiers()).unwrap();
        assert_eq!(quest.description(), "Slay the dragon");
        assert_eq!(quest.tier(), "3");

        let stored = quest.into_quest(5);
        assert_eq!(*stored.id(), 5);
        assert!(!stored.completed());
    }

    #[test]
    fn test_invalid_tier() {
        let err = NewQuest::validate(1, "9", &["anything"], "alice", &tiers()).unwrap_err();
        match err.kind() {
            VishnuErrorKind::Quest(e) => {
                assert!(matches!(e.kind(), QuestErrorKind::InvalidTier { tier, .. } if tier == "9"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_word_limit_is_exclusive() {
        let ok: Vec<String> = (0..DESCRIPTION_WORD_LIMIT - 1).map(|i| format!("w{}", i)).collect();
        assert!(NewQuest::validate(1, "1", &ok, "alice", &tiers()).is_ok());

        let too_long: Vec<String> = (0..DESCRIPTION_WORD_LIMIT).map(|i| format!("w{}", i)).collect();
        let err = NewQuest::validate(1, "1", &too_long, "alice", &tiers()).unwrap_err();
        match err.kind() {
            VishnuErrorKind::Quest(e) => assert!(matches!(
                e.kind(),
                QuestErrorKind::DescriptionTooLong { count: 100, .. }
            )),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_description_is_missing_argument() {
        let empty: [&str; 0] = [];
        let err = NewQuest::validate(1, "1", &empty, "alice", &tiers()).unwrap_err();
        assert!(matches!(err.kind(), VishnuErrorKind::Parse(_)));
    }
}
