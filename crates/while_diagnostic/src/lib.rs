mod render;
pub mod sources;
pub mod span;

pub use termcolor;
use termcolor::{Color, ColorSpec};

use self::sources::SourceId;
use self::span::Span;

/// An error report: a message, the places in the source it points at, and
/// trailing notes.
#[derive(Debug, Clone, Default)]
pub struct Diagnostic {
    pub message: Option<String>,
    pub snippets: Vec<Snippet>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_snippet(mut self, snippet: Snippet) -> Self {
        self.snippets.push(snippet);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Snippet {
    pub label: String,
    pub source_id: SourceId,
    pub span: Span,
}

impl Snippet {
    pub fn primary(label: impl Into<String>, source_id: SourceId, span: impl Into<Span>) -> Self {
        Self {
            label: label.into(),
            source_id,
            span: span.into(),
        }
    }
}

/// Converts an error into a [`Diagnostic`] pointing into the given source.
pub trait IntoDiagnostic {
    fn into_diagnostic(self, source_id: SourceId) -> Diagnostic;
}

#[derive(Debug)]
pub struct Config {
    pub context_size: usize,

    pub error_color: ColorSpec,
    pub subtle: ColorSpec,

    pub gutter: &'static str,
    pub underline: &'static str,
    pub underline_after: &'static str,
}

impl Default for Config {
    fn default() -> Self {
        let mut error_color = ColorSpec::new();
        error_color.set_fg(Some(Color::Red));
        error_color.set_bold(true);

        let mut subtle = ColorSpec::new();
        subtle.set_italic(true);
        subtle.set_dimmed(true);

        Self {
            context_size: 1,

            error_color,
            subtle,

            gutter: "│",
            underline: "^",
            underline_after: " ",
        }
    }
}
