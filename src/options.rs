use crate::constants::MAX_NESTING_DEPTH;

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Maximum Array/Table nesting depth accepted before the parse aborts.
    pub max_depth: usize,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_NESTING_DEPTH,
        }
    }
}

/// Formatting flags carried by each write scope.
///
/// `multi_line` breaks children onto indented lines, `comma` separates
/// siblings with commas, `quoted` renders string values quoted and escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub multi_line: bool,
    pub comma: bool,
    pub quoted: bool,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for compact single-line output.
    pub fn inline() -> Self {
        Self::default().with_multi_line(false).with_comma(true)
    }

    pub fn with_multi_line(mut self, multi_line: bool) -> Self {
        self.multi_line = multi_line;
        self
    }

    pub fn with_comma(mut self, comma: bool) -> Self {
        self.comma = comma;
        self
    }

    pub fn with_quoted(mut self, quoted: bool) -> Self {
        self.quoted = quoted;
        self
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            multi_line: true,
            comma: false,
            quoted: true,
        }
    }
}
