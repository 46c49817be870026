//! Chat command handlers.
//!
//! | Command | Handler |
//! |---------|---------|
//! | `roll` | [`RollCommand`] |
//! | `questadd`, `questdel`, `questlist` | [`QuestAddCommand`], [`QuestDelCommand`], [`QuestListCommand`] |
//! | `questcomplete`, `questuncomplete` | [`QuestCompletionCommand`] |
//! | `groupadd`, `grouplist`, `groupjoin`, `groupclose` | [`GroupAddCommand`], [`GroupListCommand`], [`GroupJoinCommand`], [`GroupCloseCommand`] |

mod dice;
mod group;
mod quest;

pub use dice::RollCommand;
pub use group::{GroupAddCommand, GroupCloseCommand, GroupJoinCommand, GroupListCommand};
pub use quest::{QuestAddCommand, QuestCompletionCommand, QuestDelCommand, QuestListCommand};

use vishnu_error::{ParseError, ParseErrorKind};

fn required<'a>(args: &'a [String], index: usize, command: &str, argument: &str) -> Result<&'a str, ParseError> {
    args.get(index).map(String::as_str).ok_or_else(|| {
        ParseError::new(ParseErrorKind::MissingArgument {
            command: command.to_string(),
            argument: argument.to_string(),
        })
    })
}

fn record_id(args: &[String], command: &str) -> Result<i32, ParseError> {
    let raw = required(args, 0, command, "id")?;
    raw.parse().map_err(|_| {
        ParseError::new(ParseErrorKind::InvalidInteger {
            field: "id".to_string(),
            value: raw.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_record_id_parses_multi_digit() {
        assert_eq!(record_id(&args(&["128"]), "questdel").unwrap(), 128);
    }

    #[test]
    fn test_record_id_errors() {
        let missing = record_id(&[], "questdel").unwrap_err();
        assert!(matches!(missing.kind, ParseErrorKind::MissingArgument { .. }));

        let junk = record_id(&args(&["seven"]), "questdel").unwrap_err();
        assert!(matches!(junk.kind, ParseErrorKind::InvalidInteger { .. }));
    }
}
