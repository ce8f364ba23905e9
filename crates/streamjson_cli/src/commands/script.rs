//! Script command implementation.

use super::build::render;
use super::ops::{Op, OpError};
use std::path::Path;
use streamjson_core::Config;

/// Parses a script: one operation per line, blank lines and `#` comments
/// skipped. Errors carry the 1-based line number.
pub fn parse_script(text: &str) -> Result<Vec<Op>, String> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| {
            line.parse()
                .map_err(|err: OpError| format!("line {number}: {err}"))
        })
        .collect()
}

/// Runs the script command.
pub fn run(config: Config, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let ops = parse_script(&text)?;
    println!("{}", render(config, &ops)?);
    Ok(())
}
