//! Build command implementation.

use super::ops::{parse_all, Op};
use streamjson_core::{Config, StreamJson};
use tracing::info;

/// Applies `ops` to a fresh buffer created from `config` and returns its text.
pub fn render(config: Config, ops: &[Op]) -> Result<String, Box<dyn std::error::Error>> {
    let mut buffer = StreamJson::with_config(config)?;
    for op in ops {
        op.apply(&mut buffer)?;
    }

    if let Some(meta) = buffer.metadata() {
        info!(
            size = meta.size,
            members = meta.entries,
            backend = meta.backend,
            "built object"
        );
    }
    let text = buffer.contents();
    buffer.close();
    Ok(text)
}

/// Runs the build command.
pub fn run(config: Config, ops: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let ops = parse_all(ops)?;
    println!("{}", render(config, &ops)?);
    Ok(())
}
