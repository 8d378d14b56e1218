use std::io;

use while_diagnostic::sources::SourceMap;
use while_diagnostic::termcolor::{ColorChoice, StandardStream};
use while_diagnostic::{Config, Diagnostic};

pub trait DiagnosticEmitter {
    fn emit_diagnostic(&mut self, diagnostic: Diagnostic, sources: &SourceMap) -> io::Result<()>;
}

impl DiagnosticEmitter for Vec<Diagnostic> {
    fn emit_diagnostic(&mut self, diagnostic: Diagnostic, _sources: &SourceMap) -> io::Result<()> {
        self.push(diagnostic);
        Ok(())
    }
}

pub struct PrettyDiagnosticEmitter {
    pub stream: StandardStream,
    pub config: Config,
}

impl Default for PrettyDiagnosticEmitter {
    fn default() -> Self {
        Self {
            stream: StandardStream::stderr(ColorChoice::Auto),
            config: Config::default(),
        }
    }
}

impl DiagnosticEmitter for PrettyDiagnosticEmitter {
    fn emit_diagnostic(&mut self, diagnostic: Diagnostic, sources: &SourceMap) -> io::Result<()> {
        diagnostic.write_to_stream(sources, &self.config, &mut self.stream)
    }
}
