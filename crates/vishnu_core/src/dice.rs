//! Dice expressions of the form `NdM` or `NdM+K`.
//!
//! A token is parsed into a [`DiceExpression`] and rolled against a
//! [`RandomSource`]. Every draw falls in `[1, sides]`, both ends inclusive.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use vishnu_core::dice::evaluate;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let outcome = evaluate("3d8+4", &mut rng).unwrap();
//! assert_eq!(outcome.draws().len(), 3);
//! assert!(outcome.draws().iter().all(|d| (1..=8).contains(d)));
//! ```

use derive_getters::Getters;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use regex::Regex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{LazyLock, Mutex, PoisonError};
use tracing::{debug, instrument};
use vishnu_error::{ParseError, ParseErrorKind};

/// Dice count accepted by [`evaluate`] and [`DiceRoller`] unless configured otherwise.
pub const DEFAULT_MAX_DICE: u32 = 100;

static DICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)d(\d+)(?:\+(\d+))?$").expect("dice grammar is a valid regex")
});

/// Source of uniformly distributed integers.
pub trait RandomSource {
    /// Draw an integer in `[low, high_inclusive]`.
    fn next_int(&mut self, low: u32, high_inclusive: u32) -> u32;
}

impl RandomSource for StdRng {
    fn next_int(&mut self, low: u32, high_inclusive: u32) -> u32 {
        self.gen_range(low..=high_inclusive)
    }
}

impl RandomSource for ThreadRng {
    fn next_int(&mut self, low: u32, high_inclusive: u32) -> u32 {
        self.gen_range(low..=high_inclusive)
    }
}

/// Replays a fixed sequence of values, clamped into the requested range.
///
/// Once the script runs out every draw returns `low`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    values: VecDeque<u32>,
}

impl ScriptedRolls {
    /// Create a source that replays `values` in order.
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedRolls {
    fn next_int(&mut self, low: u32, high_inclusive: u32) -> u32 {
        self.values
            .pop_front()
            .map(|v| v.clamp(low, high_inclusive))
            .unwrap_or(low)
    }
}

/// A parsed `NdM+K` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Getters)]
pub struct DiceExpression {
    /// Number of dice
    count: u32,
    /// Faces per die, at least 2
    sides: u32,
    /// Flat bonus added to the sum
    modifier: i64,
}

impl DiceExpression {
    /// Parse a token without limiting the number of dice.
    pub fn parse(token: &str) -> Result<Self, ParseError> {
        Self::parse_bounded(token, u32::MAX)
    }

    /// Parse a token, rejecting more than `max_dice` dice.
    #[instrument(level = "debug")]
    pub fn parse_bounded(token: &str, max_dice: u32) -> Result<Self, ParseError> {
        let malformed = || ParseError::new(ParseErrorKind::DiceToken(token.to_string()));

        let captures = DICE_PATTERN.captures(token).ok_or_else(malformed)?;

        let count: u32 = captures[1].parse().map_err(|_| malformed())?;
        let sides: u32 = captures[2].parse().map_err(|_| malformed())?;
        let modifier: i64 = match captures.get(3) {
            Some(m) => m.as_str().parse().map_err(|_| malformed())?,
            None => 0,
        };

        if sides < 2 {
            return Err(ParseError::new(ParseErrorKind::DieSides {
                token: token.to_string(),
                sides,
            }));
        }

        if count > max_dice {
            return Err(ParseError::new(ParseErrorKind::TooManyDice {
                count,
                max: max_dice,
            }));
        }

        debug!(count, sides, modifier, "Parsed dice expression");
        Ok(Self {
            count,
            sides,
            modifier,
        })
    }

    /// Roll with the thread-local generator.
    pub fn roll(&self) -> RollOutcome {
        self.roll_with(&mut rand::thread_rng())
    }

    /// Roll with a specific source (useful for testing).
    pub fn roll_with<R: RandomSource + ?Sized>(&self, source: &mut R) -> RollOutcome {
        let draws: Vec<u32> = (0..self.count)
            .map(|_| source.next_int(1, self.sides))
            .collect();

        let sum: i64 = draws.iter().map(|&d| i64::from(d)).sum();

        RollOutcome {
            draws,
            modifier: self.modifier,
            total: sum.saturating_add(self.modifier),
        }
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifier == 0 {
            write!(f, "{}d{}", self.count, self.sides)
        } else {
            write!(f, "{}d{}+{}", self.count, self.sides, self.modifier)
        }
    }
}

/// Result of rolling a [`DiceExpression`].
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct RollOutcome {
    /// Individual die results, in draw order
    draws: Vec<u32>,
    /// Modifier that was added
    modifier: i64,
    /// Sum of draws plus modifier
    total: i64,
}

impl fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.draws.is_empty() {
            write!(f, "You rolled no dice.\nYour total is {}", self.total)
        } else {
            let draws: Vec<String> = self.draws.iter().map(u32::to_string).collect();
            write!(
                f,
                "You rolled: {}.\nYour total is {}",
                draws.join(", "),
                self.total
            )
        }
    }
}

/// Parse and roll `token` in one step.
///
/// Tokens asking for more than [`DEFAULT_MAX_DICE`] dice are rejected with
/// [`ParseErrorKind::TooManyDice`]
/// even though they are otherwise well formed. Use [`DiceRoller`] for a
/// configured limit.
pub fn evaluate<R: RandomSource + ?Sized>(
    token: &str,
    source: &mut R,
) -> Result<RollOutcome, ParseError> {
    Ok(DiceExpression::parse_bounded(token, DEFAULT_MAX_DICE)?.roll_with(source))
}

/// Shared roller used by the chat handlers.
///
/// The source sits behind a short-lived lock so concurrent commands can share it.
pub struct DiceRoller {
    source: Mutex<Box<dyn RandomSource + Send>>,
    max_dice: u32,
}

impl DiceRoller {
    /// Roller seeded from the operating system.
    pub fn from_entropy(max_dice: u32) -> Self {
        Self::with_source(StdRng::from_entropy(), max_dice)
    }

    /// Deterministic roller for tests and replays.
    pub fn seeded(seed: u64, max_dice: u32) -> Self {
        Self::with_source(StdRng::seed_from_u64(seed), max_dice)
    }

    /// Roller drawing from an arbitrary source.
    pub fn with_source(source: impl RandomSource + Send + 'static, max_dice: u32) -> Self {
        Self {
            source: Mutex::new(Box::new(source)),
            max_dice,
        }
    }

    /// Maximum dice per expression.
    pub fn max_dice(&self) -> u32 {
        self.max_dice
    }

    /// Parse and roll a token.
    pub fn roll(&self, token: &str) -> Result<RollOutcome, ParseError> {
        let expression = DiceExpression::parse_bounded(token, self.max_dice)?;
        let mut source = self.source.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(expression.roll_with(&mut **source))
    }
}

impl fmt::Debug for DiceRoller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiceRoller")
            .field("max_dice", &self.max_dice)
            .finish_non_exhaustive()
    }
}
