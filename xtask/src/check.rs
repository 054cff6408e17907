//! Workspace-wide quality checks.
//!
//! This module runs all automated quality checks across the entire workspace.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use xshell::{cmd, Shell};

/// Run all checks (non-CI mode - warnings are reported but don't fail)
pub fn run(ci_mode: bool) -> Result<()> {
    let sh = Shell::new()?;

    println!();
    println!("{}", "Relief Quality Check".bold());
    println!("{}", "====================".bold());
    println!();

    let mut all_passed = true;

    // 1. Formatting
    println!("{}", "Checking formatting...".dimmed());
    let fmt_result = run_fmt_check(&sh);
    report_result("Formatting", &fmt_result);
    if fmt_result.is_err() {
        all_passed = false;
    }

    // 2. Clippy
    println!("{}", "Running clippy...".dimmed());
    let clippy_result = run_clippy(&sh);
    report_result("Clippy", &clippy_result);
    if clippy_result.is_err() {
        all_passed = false;
    }

    // 3. Tests
    println!("{}", "Running tests...".dimmed());
    let test_result = run_tests(&sh);
    report_result("Tests", &test_result);
    if test_result.is_err() {
        all_passed = false;
    }

    // 4. Documentation
    println!("{}", "Building documentation...".dimmed());
    let doc_result = run_doc_check(&sh);
    report_result("Documentation", &doc_result);
    if doc_result.is_err() {
        all_passed = false;
    }

    // 5. Safety scan
    println!("{}", "Scanning for safety violations...".dimmed());
    let safety_result = run_safety_scan();
    report_result("Safety", &safety_result);
    if safety_result.is_err() {
        all_passed = false;
    }

    println!();

    if all_passed {
        println!("{}", "✓ All checks passed!".green().bold());
        Ok(())
    } else if ci_mode {
        println!("{}", "✗ Some checks failed.".red().bold());
        std::process::exit(1);
    } else {
        println!("{}", "⚠ Some checks failed. Fix before committing.".yellow());
        Ok(())
    }
}

/// Run full CI suite
pub fn run_ci() -> Result<()> {
    let sh = Shell::new()?;

    println!();
    println!("{}", "Relief CI Suite".bold());
    println!("{}", "===============".bold());
    println!();

    let mut failures = Vec::new();

    // 1. Formatting (must be exact)
    println!("{}", "Step 1/5: Checking formatting...".cyan());
    if let Err(e) = run_fmt_check(&sh) {
        failures.push(format!("Formatting: {e}"));
        println!("  {} Formatting check failed", "✗".red());
    } else {
        println!("  {} Formatting OK", "✓".green());
    }

    // 2. Clippy with all features
    println!("{}", "Step 2/5: Running clippy...".cyan());
    if let Err(e) = run_clippy(&sh) {
        failures.push(format!("Clippy: {e}"));
        println!("  {} Clippy failed", "✗".red());
    } else {
        println!("  {} Clippy OK", "✓".green());
    }

    // 3. Tests with all features
    println!("{}", "Step 3/5: Running tests...".cyan());
    if let Err(e) = run_tests(&sh) {
        failures.push(format!("Tests: {e}"));
        println!("  {} Tests failed", "✗".red());
    } else {
        println!("  {} Tests OK", "✓".green());
    }

    // 4. Documentation build
    println!("{}", "Step 4/5: Building docs...".cyan());
    if let Err(e) = run_doc_check(&sh) {
        failures.push(format!("Documentation: {e}"));
        println!("  {} Documentation failed", "✗".red());
    } else {
        println!("  {} Documentation OK", "✓".green());
    }

    // 5. Safety scan
    println!("{}", "Step 5/5: Safety scan...".cyan());
    if let Err(e) = run_safety_scan() {
        failures.push(format!("Safety: {e}"));
        println!("  {} Safety scan failed", "✗".red());
    } else {
        println!("  {} Safety scan OK", "✓".green());
    }

    println!();

    if failures.is_empty() {
        println!("{}", "═══════════════════════════════════════".green());
        println!("{}", "  ✓ CI PASSED - Ready to push".green().bold());
        println!("{}", "═══════════════════════════════════════".green());
        Ok(())
    } else {
        println!("{}", "═══════════════════════════════════════".red());
        println!("{}", "  ✗ CI FAILED".red().bold());
        println!("{}", "═══════════════════════════════════════".red());
        println!();
        println!("Failures:");
        for f in &failures {
            println!("  - {}", f.red());
        }
        std::process::exit(1);
    }
}

fn report_result(name: &str, result: &Result<()>) {
    match result {
        Ok(()) => println!("  {} {}", "✓".green(), name),
        Err(e) => println!("  {} {} - {}", "✗".red(), name, e),
    }
}

fn run_fmt_check(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo fmt --all -- --check")
        .run()
        .context("Formatting check failed")?;
    Ok(())
}

fn run_clippy(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo clippy --all-targets --all-features -- -D warnings")
        .run()
        .context("Clippy check failed")?;
    Ok(())
}

fn run_tests(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo test --all-features")
        .run()
        .context("Tests failed")?;
    Ok(())
}

fn run_doc_check(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo doc --no-deps --all-features")
        .env("RUSTDOCFLAGS", "-D warnings")
        .run()
        .context("Documentation build failed")?;
    Ok(())
}

/// Scan library sources for unwrap/expect outside test modules.
///
/// Inline `#[cfg(test)]` modules sit at the bottom of each file, so
/// everything from that marker down is test code and exempt.
fn run_safety_scan() -> Result<()> {
    let mut violations = Vec::new();
    scan_dir(Path::new("relief"), &mut violations)?;

    if violations.is_empty() {
        return Ok(());
    }

    for violation in &violations {
        println!("    {violation}");
    }
    anyhow::bail!(
        "Found {} unwrap/expect calls in library code",
        violations.len()
    );
}

fn scan_dir(dir: &Path, violations: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name == "tests" || name == "benches" || name == "target" {
                continue;
            }
            scan_dir(&path, violations)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            scan_file(&path, violations)?;
        }
    }
    Ok(())
}

fn scan_file(path: &Path, violations: &mut Vec<String>) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let library_part = content.split("#[cfg(test)]").next().unwrap_or(&content);

    for (number, line) in (1..).zip(library_part.lines()) {
        let code = line.trim();
        if code.starts_with("//") {
            continue;
        }
        if code.contains(".unwrap(") || code.contains(".expect(") {
            violations.push(format!("{}:{number}: {code}", path.display()));
        }
    }
    Ok(())
}
