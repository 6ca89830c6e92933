use crate::highlight::SyntaxHighlighter;

/// Where user-facing diagnostics go. Everything is written to stderr.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    quiet: bool,
    debug: bool,
    highlighter: SyntaxHighlighter,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(false, false, true)
    }
}

impl Reporter {
    pub fn new(quiet: bool, debug: bool, color: bool) -> Self {
        Self {
            quiet,
            debug,
            highlighter: SyntaxHighlighter::new(color),
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// User errors. Always shown, quiet or not.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.highlighter.highlight_error(message));
    }

    pub fn debug(&self, message: &str) {
        if self.debug {
            eprintln!("{}", self.highlighter.highlight_hint(&format!("esh: debug: {}", message)));
        }
    }
}
