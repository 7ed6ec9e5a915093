use console::style;

/// Human-facing terminal output for the maintenance commands.
///
/// Never used by `serve`: stdout belongs to the MCP transport there.
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Aligned `label  value` line inside a section
    pub fn field(&self, label: &str, value: &str) {
        println!("  {:<12} {}", style(label).dim(), value);
    }

    /// Candidate path marker: `→` for the chosen one, `·` otherwise
    pub fn candidate(&self, path: &str, exists: bool, chosen: bool) {
        let marker = if chosen {
            style("→").green().to_string()
        } else if exists {
            style("·").yellow().to_string()
        } else {
            style("·").dim().to_string()
        };
        let label = if exists {
            path.to_string()
        } else {
            style(path).dim().to_string()
        };
        println!("  {} {}", marker, label);
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
