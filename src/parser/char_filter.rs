/// `CharFilter` - Iterator that filters out strings and comments
///
/// Wraps a string iterator and maintains state about whether we're inside
/// string literals (single-quoted, double-quoted, or template) or comments
/// (`//` line comments, `/* */` block comments). It's used throughout the
/// codebase to ensure we only inspect actual code, never string contents or
/// comment text - a bare `import(` inside a template literal must not be
/// mistaken for a dynamic import call.
///
/// Block comment and string state can be carried across physical lines via
/// [`CharFilter::with_state`] / [`CharFilter::scan_state`]; line comment state
/// always dies at the end of the line that opened it.

/// Type of string delimiter we're currently inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringDelimiter {
    #[default]
    None,
    Single,   // '...'
    Double,   // "..."
    Template, // `...`
}

/// Scanner state that survives a line boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanState {
    pub string: StringDelimiter,
    pub block_comment: bool,
}

impl ScanState {
    /// True when the scanner is inside neither a string nor a block comment.
    #[must_use]
    pub fn is_code(&self) -> bool {
        self.string == StringDelimiter::None && !self.block_comment
    }
}

/// Iterator adapter that filters out strings and comments
///
/// Yields (position, character) pairs for only the actual code, skipping
/// string contents and comment text according to the filter flags.
pub struct CharFilter<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    state: ScanState,
    in_line_comment: bool,
    escape_pending: bool,
    close_pending: bool,
    filter_comments: bool,
    filter_strings: bool,
}

impl<'a> CharFilter<'a> {
    /// Create a new `CharFilter`
    ///
    /// # Arguments
    /// * `content` - The string to iterate over
    /// * `filter_comments` - Whether to filter out comment text
    /// * `filter_strings` - Whether to filter out string contents
    #[must_use]
    pub fn new(content: &'a str, filter_comments: bool, filter_strings: bool) -> Self {
        Self::with_state(content, filter_comments, filter_strings, ScanState::default())
    }

    /// Create a `CharFilter` resuming from a carried state (for multiline
    /// template literals and block comments).
    #[must_use]
    pub fn with_state(
        content: &'a str,
        filter_comments: bool,
        filter_strings: bool,
        state: ScanState,
    ) -> Self {
        Self {
            chars: content.char_indices().peekable(),
            state,
            in_line_comment: false,
            escape_pending: false,
            close_pending: false,
            filter_comments,
            filter_strings,
        }
    }

    /// Check if we're currently inside a string
    #[must_use]
    pub fn instring(&self) -> bool {
        self.state.string != StringDelimiter::None
    }

    /// Get the carry-over scanner state (string delimiter + block comment).
    ///
    /// Meaningful once the iterator has been driven to the end of the line;
    /// pass the result to [`CharFilter::with_state`] for the next line.
    #[must_use]
    pub fn scan_state(&self) -> ScanState {
        self.state
    }

    /// Get the filtered content as a string
    ///
    /// Pre-allocates the result string based on the input size for efficiency.
    pub fn filter_all(&mut self) -> String {
        let size_hint = self.chars.size_hint().0;
        let mut result = String::with_capacity(size_hint);
        for (_, c) in self.by_ref() {
            result.push(c);
        }
        result
    }

    /// Peek at the next character without consuming
    fn peek_next_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }
}

impl Iterator for CharFilter<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (pos, c) = self.chars.next()?;

            // The '/' terminating a block comment when comments pass through
            if self.close_pending {
                self.close_pending = false;
                self.state.block_comment = false;
                return Some((pos, c));
            }

            // A character escaped by a backslash inside a string is always
            // string content, even when it is the delimiter character.
            if self.escape_pending {
                self.escape_pending = false;
                if self.filter_strings {
                    continue;
                }
                return Some((pos, c));
            }

            if self.state.block_comment {
                if c == '*' && self.peek_next_char() == Some('/') {
                    if self.filter_comments {
                        self.chars.next();
                        self.state.block_comment = false;
                        continue;
                    }
                    self.close_pending = true;
                    return Some((pos, c));
                }
                if self.filter_comments {
                    continue;
                }
                return Some((pos, c));
            }

            if self.in_line_comment {
                if c == '\n' {
                    // The newline terminates the comment but is itself code
                    self.in_line_comment = false;
                    return Some((pos, c));
                }
                if self.filter_comments {
                    continue;
                }
                return Some((pos, c));
            }

            if self.state.string != StringDelimiter::None {
                if c == '\\' {
                    self.escape_pending = true;
                    if self.filter_strings {
                        continue;
                    }
                    return Some((pos, c));
                }
                let closes = matches!(
                    (c, self.state.string),
                    ('\'', StringDelimiter::Single)
                        | ('"', StringDelimiter::Double)
                        | ('`', StringDelimiter::Template)
                );
                if closes {
                    self.state.string = StringDelimiter::None;
                }
                if self.filter_strings {
                    continue;
                }
                return Some((pos, c));
            }

            // Code context: check for string and comment openers
            match c {
                '\'' => {
                    self.state.string = StringDelimiter::Single;
                    if self.filter_strings {
                        continue;
                    }
                    return Some((pos, c));
                }
                '"' => {
                    self.state.string = StringDelimiter::Double;
                    if self.filter_strings {
                        continue;
                    }
                    return Some((pos, c));
                }
                '`' => {
                    self.state.string = StringDelimiter::Template;
                    if self.filter_strings {
                        continue;
                    }
                    return Some((pos, c));
                }
                '/' => match self.peek_next_char() {
                    Some('/') => {
                        self.in_line_comment = true;
                        if self.filter_comments {
                            self.chars.next();
                            continue;
                        }
                        return Some((pos, c));
                    }
                    Some('*') => {
                        self.state.block_comment = true;
                        if self.filter_comments {
                            self.chars.next();
                            continue;
                        }
                        return Some((pos, c));
                    }
                    _ => return Some((pos, c)),
                },
                _ => return Some((pos, c)),
            }
        }
    }
}
