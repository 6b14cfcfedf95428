//! Terminal output.
//!
//! Command results (rendered HTML, keyword lists, the dictionary) go to
//! stdout so they can be piped. Status messages go to stderr, colored when
//! stderr is a terminal.

use std::io;

use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    results: Term,
    messages: Term,
    green: Style,
    yellow: Style,
    red: Style,
    heading: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            results: Term::stdout(),
            messages: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            heading: Style::new().cyan().bold(),
        }
    }

    /// Write command output to stdout verbatim.
    pub(crate) fn result(&self, text: &str) -> io::Result<()> {
        self.results.write_str(text)?;
        self.results.flush()
    }

    /// Write one line of command output to stdout.
    pub(crate) fn result_line(&self, line: &str) -> io::Result<()> {
        self.results.write_line(line)
    }

    pub(crate) fn info(&self, msg: &str) {
        let _ = self.messages.write_line(msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.styled(&self.green, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.styled(&self.yellow, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.styled(&self.red, msg);
    }

    pub(crate) fn heading(&self, msg: &str) {
        self.styled(&self.heading, msg);
    }

    fn styled(&self, style: &Style, msg: &str) {
        let _ = self
            .messages
            .write_line(&style.apply_to(msg).for_stderr().to_string());
    }
}
