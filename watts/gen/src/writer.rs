//! Indentation-aware line accumulation.
//!
//! [`IndentWriter`] is the only place that turns an indent depth into
//! leading spaces. The block tree hands each child its own writer and splices
//! the rendered child back verbatim.

/// Accumulates lines prefixed with a fixed number of spaces.
///
/// ## Examples
///
/// ```
/// use watts_gen::writer::IndentWriter;
///
/// let mut writer = IndentWriter::with_indent(4);
/// writer.append_line("let x = 1;");
/// writer.append_line("");
/// writer.append_without_indent("        nested();\n");
///
/// assert_eq!(writer.into_string(), "    let x = 1;\n\n        nested();\n");
/// ```
#[derive(Debug, Default, Clone)]
pub struct IndentWriter {
    indent: usize,
    buffer: String,
}

impl IndentWriter {
    /// Creates a writer whose lines start with `indent` spaces.
    pub fn with_indent(indent: usize) -> Self {
        Self {
            indent,
            buffer: String::new(),
        }
    }

    /// The current indent depth, in spaces.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Writes `text` at the current indent followed by a line break.
    ///
    /// Empty text produces a bare line break without trailing spaces.
    pub fn append_line(&mut self, text: &str) {
        if !text.is_empty() {
            self.buffer.extend(std::iter::repeat_n(' ', self.indent));
            self.buffer.push_str(text);
        }
        self.buffer.push('\n');
    }

    /// Writes pre-rendered text verbatim.
    pub fn append_without_indent(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Consumes the writer and returns the accumulated text.
    pub fn into_string(self) -> String {
        self.buffer
    }
}
