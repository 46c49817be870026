//! Command-line interface module.

mod commands;
mod roll;
mod run;

pub use commands::{Cli, Commands};
pub use roll::roll;
pub use run::{migrate, run_bot};
