//! Line-oriented source text builder.

use super::traits::IndentStyle;

/// Accumulates generated source text line by line at a tracked depth.
#[derive(Debug, Clone)]
pub struct SourceWriter {
    out: String,
    indent: IndentStyle,
    depth: usize,
}

impl SourceWriter {
    /// Create an empty writer.
    pub fn new(indent: IndentStyle) -> Self {
        Self {
            out: String::new(),
            indent,
            depth: 0,
        }
    }

    /// Append one line at the current depth. Empty lines carry no indentation.
    pub fn line(&mut self, s: impl AsRef<str>) {
        let s = s.as_ref();
        if !s.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(self.indent.as_str());
            }
            self.out.push_str(s);
        }
        self.out.push('\n');
    }

    /// Append an empty line.
    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Append every line of `text` at the current depth.
    pub fn lines(&mut self, text: &str) {
        for line in text.lines() {
            self.line(line);
        }
    }

    /// Append `// ` comment lines for `text`, one per source line.
    pub fn comment(&mut self, prefix: &str, text: &str) {
        for line in text.lines() {
            if line.trim().is_empty() {
                self.line(prefix.trim_end());
            } else {
                self.line(format!("{} {}", prefix, line.trim_end()));
            }
        }
    }

    /// Increase depth.
    pub fn indent(&mut self) {
        self.depth += 1;
    }

    /// Decrease depth.
    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Append `{` and increase depth.
    pub fn open_block(&mut self) {
        self.line("{");
        self.indent();
    }

    /// Decrease depth and append `close`, e.g. `}` or `};`.
    pub fn close_block(&mut self, close: &str) {
        self.dedent();
        self.line(close);
    }

    /// Indentation string for one level.
    pub fn unit(&self) -> &'static str {
        self.indent.as_str()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Consume the writer and return the text.
    pub fn finish(self) -> String {
        self.out
    }
}
