//! Core types for the Vishnu tabletop bot.
//!
//! This crate holds everything that does not need a chat connection or a
//! database:
//!
//! - [`dice`] - `NdM+K` expressions, injectable random sources, roll outcomes
//! - [`filter`] - `key=value` filter arguments and their record predicates
//! - [`quest`] / [`group`] - record models, quest validation, group capacity
//! - [`config`] - the bot configuration loaded once at startup

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod dice;
pub mod filter;
pub mod group;
pub mod quest;

pub use config::{BotConfig, BotConfigBuilder, StoreSettings, StoreSettingsBuilder};
pub use dice::{DEFAULT_MAX_DICE, DiceExpression, DiceRoller, RandomSource, RollOutcome, ScriptedRolls, evaluate};
pub use filter::{Filters, GroupFilter, QuestFilter, parse_filters};
pub use group::{Capacity, CapacityState, Group, NewGroup};
pub use quest::{DESCRIPTION_WORD_LIMIT, NewQuest, Quest};
