//! Workspace formatting.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use xshell::{cmd, Shell};

/// Format every workspace member in place.
pub fn run() -> Result<()> {
    let sh = Shell::new()?;

    cmd!(sh, "cargo fmt --all")
        .run()
        .context("Formatting failed")?;

    println!("{}", "✓ Workspace formatted".green());
    Ok(())
}
