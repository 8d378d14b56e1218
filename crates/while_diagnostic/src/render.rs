use std::io;

use termcolor::WriteColor;
use unicode_width::UnicodeWidthStr;

use super::sources::{SourceFile, SourceMap};
use super::{Config, Diagnostic, Snippet};

const TAB: &str = "    ";

impl Diagnostic {
    pub fn write_to_stream(
        &self,
        sources: &SourceMap,
        config: &Config,
        stream: &mut impl WriteColor,
    ) -> io::Result<()> {
        DiagnosticWriter {
            diagnostic: self,
            sources,
            stream,
            config,
        }
        .draw_all()
    }
}

struct DiagnosticWriter<'stream, 'a, W: WriteColor> {
    diagnostic: &'a Diagnostic,
    sources: &'a SourceMap,

    stream: &'stream mut W,
    config: &'a Config,
}

impl<W: WriteColor> DiagnosticWriter<'_, '_, W> {
    fn draw_all(mut self) -> io::Result<()> {
        self.draw_header()?;

        for snippet in &self.diagnostic.snippets {
            // snippets into unknown sources are dropped rather than failing the whole report
            let Some(source) = self.sources.get(snippet.source_id) else {
                continue;
            };
            self.draw_snippet(source, snippet)?;
        }

        for note in &self.diagnostic.notes {
            self.stream.set_color(&self.config.subtle)?;
            write!(self.stream, "= note:")?;
            self.stream.reset()?;
            writeln!(self.stream, " {note}")?;
        }

        writeln!(self.stream)?;

        Ok(())
    }

    fn draw_header(&mut self) -> io::Result<()> {
        self.stream.set_color(&self.config.error_color)?;
        write!(self.stream, "Error:")?;
        self.stream.reset()?;

        match &self.diagnostic.message {
            Some(message) => writeln!(self.stream, " {message}"),
            None => writeln!(self.stream),
        }
    }

    fn draw_snippet(&mut self, source: &SourceFile, snippet: &Snippet) -> io::Result<()> {
        let start = snippet.span.start.min(source.text().len());

        let (Some(line), Some((line_num, col_num))) =
            (source.line_index(start), source.line_col(start))
        else {
            return Ok(());
        };

        let first = line.saturating_sub(self.config.context_size);
        let last = (line + self.config.context_size).min(source.num_lines() - 1);
        let line_num_width = 1 + (last + 1).ilog10() as usize;

        self.stream.set_color(&self.config.subtle)?;
        write!(self.stream, "In {}:{line_num}:{col_num}", source.name())?;
        if let Some(path) = source.path() {
            write!(self.stream, " ({}:{line_num}:{col_num})", path.display())?;
        }
        writeln!(self.stream)?;
        self.stream.reset()?;

        for index in first..=last {
            let line_str = source.line(index).unwrap_or_default();

            self.draw_gutter(Some(index + 1), line_num_width)?;
            writeln!(self.stream, "{}", line_str.replace('\t', TAB))?;

            if index != line {
                continue;
            }

            let line_start = source.line_start(index).unwrap_or_default();
            let before = &source.text()[line_start..start];
            let offset = str_width(before);

            // clip to the first line of the span, but always underline something
            let remaining = line_str.len().saturating_sub(start - line_start);
            let underline_len = snippet.span.len().min(remaining).max(1);

            self.draw_gutter(None, line_num_width)?;
            self.stream.set_color(&self.config.error_color)?;

            write!(self.stream, "{:<offset$}", "")?;
            for _ in 0..underline_len {
                write!(self.stream, "{}", self.config.underline)?;
            }
            writeln!(
                self.stream,
                "{}{}",
                self.config.underline_after, snippet.label
            )?;

            self.stream.reset()?;
        }

        Ok(())
    }

    fn draw_gutter(&mut self, line: Option<usize>, line_num_width: usize) -> io::Result<()> {
        self.stream.set_color(&self.config.subtle)?;

        match line {
            Some(line) => write!(self.stream, "{line:>line_num_width$}")?,
            None => write!(self.stream, "{:>line_num_width$}", "")?,
        }
        write!(self.stream, " {} ", self.config.gutter)?;

        self.stream.reset()
    }
}

fn str_width(s: &str) -> usize {
    let num_tabs = s.chars().filter(|&ch| ch == '\t').count();
    s.width() + num_tabs * TAB.len()
}
