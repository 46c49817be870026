//! Offline dice rolling.

use vishnu_core::{DEFAULT_MAX_DICE, DiceRoller};

/// Roll each expression, returning one printable block per expression.
///
/// A malformed expression produces its error text in place of a result.
pub fn roll(expressions: &[String], seed: Option<u64>) -> Vec<String> {
    let roller = match seed {
        Some(seed) => DiceRoller::seeded(seed, DEFAULT_MAX_DICE),
        None => DiceRoller::from_entropy(DEFAULT_MAX_DICE),
    };

    expressions
        .iter()
        .map(|expression| match roller.roll(expression) {
            Ok(outcome) => format!("{}\n{}", expression, outcome),
            Err(e) => e.user_message(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exprs(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_seeded_rolls_repeat() {
        let expressions = exprs(&["3d8", "1d20+5"]);
        assert_eq!(roll(&expressions, Some(42)), roll(&expressions, Some(42)));
    }

    #[test]
    fn test_malformed_expression_reports_error() {
        let lines = roll(&exprs(&["2d6", "d6"]), Some(1));
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("2d6\nYou rolled: "));
        assert!(lines[1].contains("`d6` is not a valid roll"));
    }
}
