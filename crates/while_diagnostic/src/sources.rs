use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(usize);

/// A loaded program text, with its line starts precomputed.
#[derive(Debug)]
pub struct SourceFile {
    name: String,
    path: Option<PathBuf>,
    text: String,

    line_breaks: Vec<usize>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_breaks = text
            .char_indices()
            .filter_map(|(i, ch)| (ch == '\n').then_some(i))
            .collect();

        Self {
            name: name.into(),
            path: None,
            text,
            line_breaks,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// One-based line and column of a byte offset. Columns count bytes.
    pub fn line_col(&self, byte: usize) -> Option<(usize, usize)> {
        let line = self.line_index(byte)?;
        let col = byte - self.line_start(line)?;

        Some((line + 1, col + 1))
    }

    pub fn line_index(&self, byte: usize) -> Option<usize> {
        if byte > self.text.len() {
            return None;
        }

        match self.line_breaks.binary_search(&byte) {
            Ok(line) | Err(line) => Some(line),
        }
    }

    pub fn line_start(&self, line: usize) -> Option<usize> {
        match line {
            0 => Some(0),
            _ => self.line_breaks.get(line - 1).map(|&byte| byte + 1),
        }
    }

    pub fn line(&self, line: usize) -> Option<&str> {
        let start = self.line_start(line)?;
        let end = self.line_start(line + 1).unwrap_or(self.text.len());

        let s = &self.text[start..end];
        let s = s.strip_suffix('\n').unwrap_or(s);
        let s = s.strip_suffix('\r').unwrap_or(s);

        Some(s)
    }

    pub fn num_lines(&self) -> usize {
        1 + self.line_breaks.len()
    }
}

#[derive(Debug, Default)]
pub struct SourceMap {
    sources: Vec<SourceFile>,
}

impl SourceMap {
    pub fn insert(&mut self, source: SourceFile) -> SourceId {
        self.sources.push(source);
        SourceId(self.sources.len() - 1)
    }

    pub fn get(&self, id: SourceId) -> Option<&SourceFile> {
        self.sources.get(id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{SourceFile, SourceMap};

    fn file(text: &str) -> SourceFile {
        SourceFile::new("test", text)
    }

    #[test]
    fn line_col() {
        let src = file("x0 := x0 + 1;\nx1 := x1 - 1");
        assert_eq!(src.line_col(0), Some((1, 1)));
        assert_eq!(src.line_col(13), Some((1, 14)));
        assert_eq!(src.line_col(14), Some((2, 1)));
        assert_eq!(src.line_col(src.text().len()), Some((2, 13)));
        assert_eq!(src.line_col(src.text().len() + 1), None);
    }

    #[test]
    fn lines() {
        let src = file("WHILE x1 != 0 DO\r\n  x1 := x1 - 1\r\nEND\n");
        assert_eq!(src.num_lines(), 4);
        assert_eq!(src.line(0), Some("WHILE x1 != 0 DO"));
        assert_eq!(src.line(1), Some("  x1 := x1 - 1"));
        assert_eq!(src.line(2), Some("END"));
        assert_eq!(src.line(3), Some(""));
        assert_eq!(src.line(4), None);
    }

    #[test]
    fn empty_source() {
        let src = file("");
        assert_eq!(src.num_lines(), 1);
        assert_eq!(src.line(0), Some(""));
        assert_eq!(src.line_col(0), Some((1, 1)));
    }

    #[test]
    fn source_map_ids() {
        let mut sources = SourceMap::default();
        let a = sources.insert(file("a"));
        let b = sources.insert(file("b").with_path("b.while"));

        assert_ne!(a, b);
        assert_eq!(sources.get(a).map(SourceFile::text), Some("a"));
        assert_eq!(
            sources.get(b).and_then(SourceFile::path),
            Some(std::path::Path::new("b.while"))
        );
    }
}
