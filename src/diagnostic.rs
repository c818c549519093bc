/// A pipeline diagnostic (hard error or accumulated warning).
///
/// `location` carries the compiler-assigned `src` attribute of the node the
/// diagnostic refers to (`"start:length:file"`), or `"-"` for diagnostics
/// with no node context.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: String,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Diagnostic {
    pub fn error(message: String, location: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message,
            location: location.into(),
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn warning(message: String, location: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message,
            location: location.into(),
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    /// Render the diagnostic to stderr.
    pub fn render(&self, filename: &str) {
        let kind = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        eprintln!(
            "{}: {} ({} [src:{}])",
            kind, self.message, filename, self.location
        );
        for note in &self.notes {
            eprintln!("  note: {}", note);
        }
        if let Some(help) = &self.help {
            eprintln!("  help: {}", help);
        }
    }
}

/// Render a list of diagnostics.
pub fn render_diagnostics(diagnostics: &[Diagnostic], filename: &str) {
    for diag in diagnostics {
        diag.render(filename);
    }
}
