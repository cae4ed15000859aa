pub mod batch;
pub mod compute;
pub mod server;

use conjugacy_core::{Delimiter, EngineConfig, ParseOptions, TieBreak};

/// Parse a delimiter flag, exiting with a diagnostic on bad input.
pub fn parse_options(delimiter: &str) -> ParseOptions {
    match delimiter.parse::<Delimiter>() {
        Ok(delimiter) => ParseOptions { delimiter },
        Err(e) => {
            eprintln!("Invalid --delimiter: {e}");
            std::process::exit(2);
        }
    }
}

/// Parse a tie-break flag into an engine config.
/// Unknown values fall back to the stable input-order tie-break.
pub fn engine_config(tie_break: &str) -> EngineConfig {
    let tie_break = tie_break.parse::<TieBreak>().unwrap_or_else(|e| {
        log::warn!("{e}; using input-order");
        TieBreak::InputOrder
    });
    EngineConfig { tie_break }
}
