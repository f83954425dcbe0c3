//! Terminal output utilities
//!
//! Consistent colored status lines, key/value listings and section headers
//! for the CLI. Structured log events are emitted separately by
//! `core::logging`; nothing here goes through `tracing`.

use colored::Colorize;

/// Colored terminal output for command handlers
///
/// All methods are associated functions writing straight to stdout, except
/// [`Display::error`] which writes to stderr.
pub struct Display;

impl Display {
	/// Print a bold header underlined to its own width
	///
	/// # Arguments
	/// * `text` - Header text
	pub fn header(text: &str) {
		println!("\n{}", text.bold().cyan());
		println!("{}", "─".repeat(text.chars().count()).cyan());
	}

	/// Print a green check mark followed by `message`
	///
	/// # Arguments
	/// * `message` - What succeeded
	pub fn success(message: &str) {
		println!("{} {}", "✓".green().bold(), message);
	}

	/// Print a red cross followed by `message` on stderr
	///
	/// # Arguments
	/// * `message` - What failed, usually including the error text
	pub fn error(message: &str) {
		eprintln!("{} {}", "✗".red().bold(), message.red());
	}

	/// Print a yellow warning line
	///
	/// # Arguments
	/// * `message` - Warning text
	pub fn warning(message: &str) {
		println!("{} {}", "⚠".yellow().bold(), message.yellow());
	}

	pub fn info(message: &str) {
		println!("{} {}", "ℹ".blue().bold(), message);
	}

	/// Print an indented `key: value` line
	///
	/// # Arguments
	/// * `key` - Label, printed bold
	/// * `value` - Value as it should appear
	pub fn kv(key: &str, value: &str) {
		println!("  {} {}", format!("{key}:").bold(), value);
	}

	/// Print a section title with an arrow prefix
	///
	/// # Arguments
	/// * `title` - Section title
	pub fn section(title: &str) {
		println!("\n{}", format!("▸ {title}").bold());
	}

	/// A passed check: label, then the observed value
	///
	/// # Arguments
	/// * `label` - What was read, e.g. `totalStakedFor(carl)`
	/// * `value` - The value the chain returned
	pub fn check(label: &str, value: &str) {
		println!("    {} {} = {}", "✓".green(), label, value.bold());
	}

	/// Print a numbered "Next Steps" section
	///
	/// # Arguments
	/// * `steps` - Suggestions, in the order to follow them
	pub fn next_steps(steps: &[&str]) {
		Self::section("Next Steps");
		for (i, step) in steps.iter().enumerate() {
			println!("  {}. {}", i + 1, step);
		}
	}
}
