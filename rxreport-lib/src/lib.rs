//! Reaction-rate comparison reports and the HTML post-processing they need.
//!
//! The centre of the crate is [`inline_styles`], which turns the
//! identifier-keyed `<style>` blocks of a styled table into inline `style`
//! attributes. [`notebook::write_notebook`] wraps the result in a notebook
//! and [`report`] produces the tables in the first place.

pub mod dom;
pub mod error;
pub mod inliner;
pub mod notebook;
pub mod parser;
pub mod report;
pub mod style;

pub use error::{Error, Result};
pub use inliner::{inline_styles, inline_styles_with, InlineOptions, InlineReport};
pub use style::inline_style::MergePolicy;
pub use style::rule_parser::CssMode;

/// Initialise `env_logger` at `level` unless `RUST_LOG` says otherwise.
pub fn init_logger(level: log::LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}
