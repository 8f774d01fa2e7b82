//! CLI console utilities

use colored::*;

/// CLI console for formatted output.
///
/// Documents (rendered JSON, diffs, log lines) go to stdout; status markers
/// are colored and skipped by pipes that only want the document.
pub struct CLIConsole {
    verbose: bool,
}

impl CLIConsole {
    /// Create a new CLI console
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print an info message (verbose only)
    pub fn info(&self, message: &str) {
        if self.verbose {
            eprintln!("{} {}", "ℹ".blue().bold(), message);
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    /// Print a plain line
    pub fn print(&self, message: &str) {
        println!("{}", message);
    }

    /// Verification step that passed
    pub fn ok(&self, message: &str) {
        println!("{} {}", "OK:".green().bold(), message);
    }

    /// Verification step that failed
    pub fn ng(&self, message: &str) {
        println!("{} {}", "NG:".red().bold(), message);
    }

    /// Aligned `label value` row
    pub fn field(&self, label: &str, value: &str) {
        println!("{:<9} {}", format!("{}:", label).bold(), value);
    }

    /// Print a separator
    pub fn print_separator(&self) {
        println!("{}", "---".dimmed());
    }

    /// Print a unified diff, coloring added and removed lines
    pub fn print_diff(&self, diff: &str) {
        for (index, line) in diff.lines().enumerate() {
            println!("{}", colorize_diff_line(index, line));
        }
    }
}

/// Only the first two lines are the `---`/`+++` file header; later lines
/// starting with `--` or `++` are removals and additions of such text.
fn colorize_diff_line(index: usize, line: &str) -> ColoredString {
    if index < 2 && (line.starts_with("---") || line.starts_with("+++")) {
        line.bold()
    } else if line.starts_with("@@") {
        line.cyan()
    } else if line.starts_with('+') {
        line.green()
    } else if line.starts_with('-') {
        line.red()
    } else {
        line.normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_diff_line_keeps_text() {
        colored::control::set_override(false);
        for (index, line) in ["--- remote", "+++ local", "@@ -1,3 +1,3 @@", "+a", "-b", " c"]
            .into_iter()
            .enumerate()
        {
            assert_eq!(colorize_diff_line(index, line).to_string(), line);
        }
    }

    #[test]
    fn test_header_styled_by_position() {
        assert_eq!(colorize_diff_line(0, "--- remote"), "--- remote".bold());
        assert_eq!(colorize_diff_line(1, "+++ local"), "+++ local".bold());
        assert_eq!(colorize_diff_line(4, "---separator"), "---separator".red());
        assert_eq!(colorize_diff_line(5, "+++counter"), "+++counter".green());
        assert_eq!(colorize_diff_line(6, "--flag"), "--flag".red());
    }
}
