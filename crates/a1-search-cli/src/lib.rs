//! Command-line front end for [`a1_search`].
//!
//! ```text
//! a1-search search --records players.json -q curry -f name --sort hotness --desc
//! a1-search suggest --records players.json --field team bos
//! a1-search stats --records props.json --field props.confidence
//! ```
//!
//! Records files hold a JSON array of objects. Output is styled text by
//! default; `--output json|yaml|csv` serializes the result instead.

pub mod cli;
pub mod commands;
pub mod config;
pub mod output;
pub mod source;

pub use cli::Cli;
pub use commands::run;
pub use config::Config;
pub use output::{OutputError, OutputMode};
pub use source::JsonFileSource;
