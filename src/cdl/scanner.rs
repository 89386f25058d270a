//! Quote-aware text scanning: comment stripping, section markers and
//! statement splitting.

/// A separator-delimited piece of CDL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Statement<'a> {
    /// Trimmed statement text.
    pub(crate) text: &'a str,
    /// Byte offset of `text` in the scanned source.
    pub(crate) offset: usize,
}

/// Tracks whether the cursor is inside a `"..."` literal.
#[derive(Debug, Default)]
struct QuoteState {
    in_string: bool,
    escaped: bool,
}

impl QuoteState {
    /// Feed one character; returns true if it belongs to a string literal.
    fn feed(&mut self, c: char) -> bool {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == '"' {
                self.in_string = false;
            }
            true
        } else if c == '"' {
            self.in_string = true;
            true
        } else {
            false
        }
    }
}

/// Remove `//` comments outside string literals. Newlines are kept so byte
/// offsets still map to the same line numbers.
pub(crate) fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quotes = QuoteState::default();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if !quotes.feed(c) && c == '/' && chars.peek() == Some(&'/') {
            for rest in chars.by_ref() {
                if rest == '\n' {
                    out.push('\n');
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }

    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Find a section marker such as `variables:` at or after `from`, outside
/// string literals and not glued to surrounding identifiers.
pub(crate) fn find_marker(text: &str, marker: &str, from: usize) -> Option<usize> {
    let mut quotes = QuoteState::default();
    let mut prev: Option<char> = None;

    for (i, c) in text.char_indices() {
        let quoted = quotes.feed(c);
        if !quoted && i >= from && text[i..].starts_with(marker) {
            let before_ok = prev.map_or(true, |p| !is_word_char(p));
            let after_ok = text[i + marker.len()..]
                .chars()
                .next()
                .map_or(true, |n| !is_word_char(n));
            if before_ok && after_ok {
                return Some(i);
            }
        }
        prev = Some(c);
    }

    None
}

/// Byte offset of the closing `}` of the file, if the text ends with one
/// outside string literals.
pub(crate) fn closing_brace(text: &str) -> Option<usize> {
    let trimmed = text.trim_end();
    if !trimmed.ends_with('}') {
        return None;
    }
    let mut quotes = QuoteState::default();
    let mut last = None;
    for (i, c) in trimmed.char_indices() {
        if !quotes.feed(c) && c == '}' {
            last = Some(i);
        }
    }
    last.filter(|&i| i + 1 == trimmed.len())
}

/// Split `text[start..end]` on any of `separators` outside string literals.
/// Empty statements are dropped.
pub(crate) fn statements<'a>(
    text: &'a str,
    start: usize,
    end: usize,
    separators: &[char],
) -> Vec<Statement<'a>> {
    let mut out = Vec::new();
    let mut quotes = QuoteState::default();
    let mut piece_start = start;

    let push = move |from: usize, to: usize, out: &mut Vec<Statement<'a>>| {
        let raw = &text[from..to];
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            let lead = raw.len() - raw.trim_start().len();
            out.push(Statement {
                text: trimmed,
                offset: from + lead,
            });
        }
    };

    for (i, c) in text[start..end].char_indices() {
        if !quotes.feed(c) && separators.contains(&c) {
            push(piece_start, start + i, &mut out);
            piece_start = start + i + c.len_utf8();
        }
    }
    push(piece_start, end, &mut out);

    out
}

/// 1-based line number of a byte offset.
pub(crate) fn line_at(text: &str, offset: usize) -> usize {
    text[..offset.min(text.len())].matches('\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_are_stripped_outside_strings() {
        let text = "a = 1 ; // trailing\n:url = \"http://example.org\" ;";
        let clean = strip_comments(text);
        assert_eq!(clean, "a = 1 ; \n:url = \"http://example.org\" ;");
    }

    #[test]
    fn markers_respect_word_boundaries_and_quotes() {
        let text = r#":comment = "data: raw" ; my_variables:units = "m" ; variables: data:"#;
        let var = find_marker(text, "variables:", 0).unwrap();
        assert_eq!(&text[var..var + 10], "variables:");
        let data = find_marker(text, "data:", var).unwrap();
        assert!(data > var);
        assert_eq!(find_marker(text, "dimensions:", 0), None);
    }

    #[test]
    fn statements_split_outside_quotes() {
        let text = r#"a:x = "1;2" ; b ;  ; c"#;
        let parts: Vec<_> = statements(text, 0, text.len(), &[';'])
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(parts, [r#"a:x = "1;2""#, "b", "c"]);
    }

    #[test]
    fn statement_offsets_map_to_lines() {
        let text = "x ;\n\n  y ;";
        let parts = statements(text, 0, text.len(), &[';']);
        assert_eq!(line_at(text, parts[0].offset), 1);
        assert_eq!(line_at(text, parts[1].offset), 3);
    }

    #[test]
    fn closing_brace_is_found_only_at_end() {
        assert_eq!(closing_brace("a { b }\n"), Some(6));
        assert_eq!(closing_brace("a { b } c"), None);
        assert_eq!(closing_brace(r#"x = "}""#), None);
    }
}
