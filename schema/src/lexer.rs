//! Lexer and statement splitter shared by the text parsers
//!
//! All scanning here is quote-aware: parentheses, separators and comment
//! markers inside a quoted span (`'...'`, `"..."` or `` `...` ``) are inert.
//! Doubled quotes inside a span (`'it''s'`) need no special casing, since
//! they close and immediately reopen the span.

use std::borrow::Cow;
use std::ops::Range;
use std::str::CharIndices;

/// Quote characters recognized in SQL text
pub const SQL_QUOTES: &[char] = &['\'', '"', '`'];

/// Iterator over the `(offset, char)` pairs of `text` that sit outside any
/// quoted span. Quote characters themselves are never yielded.
struct Unquoted<'a> {
    chars: CharIndices<'a>,
    quotes: &'a [char],
    open: Option<char>,
}

impl<'a> Unquoted<'a> {
    fn new(text: &'a str, quotes: &'a [char]) -> Self {
        Self {
            chars: text.char_indices(),
            quotes,
            open: None,
        }
    }
}

impl Iterator for Unquoted<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<Self::Item> {
        for (i, c) in self.chars.by_ref() {
            match self.open {
                Some(q) => {
                    if c == q {
                        self.open = None;
                    }
                }
                None if self.quotes.contains(&c) => self.open = Some(c),
                None => return Some((i, c)),
            }
        }
        None
    }
}

/// Remove `--` line comments and `/* */` block comments.
///
/// Line comments keep their terminating newline. An unterminated block
/// comment swallows the rest of the input.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    let mut open: Option<char> = None;

    while let Some((i, c)) = chars.next() {
        if let Some(q) = open {
            if c == q {
                open = None;
            }
            out.push(c);
            continue;
        }
        match c {
            '-' if text[i..].starts_with("--") => {
                match text[i..].find('\n') {
                    Some(nl) => {
                        while chars.peek().is_some_and(|&(j, _)| j < i + nl) {
                            chars.next();
                        }
                    }
                    None => break,
                }
            }
            '/' if text[i..].starts_with("/*") => match text[i + 2..].find("*/") {
                Some(end) => {
                    let resume = i + 2 + end + 2;
                    while chars.peek().is_some_and(|&(j, _)| j < resume) {
                        chars.next();
                    }
                    out.push(' ');
                }
                None => break,
            },
            c if SQL_QUOTES.contains(&c) => {
                open = Some(c);
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

/// Split a script into statements at top-level `;`.
///
/// Comments are stripped first. A `;` nested in parentheses or inside a
/// quoted literal never splits. Returned statements are trimmed and non-empty.
pub fn split_statements(text: &str) -> Vec<String> {
    let text = strip_comments(text);
    split_top_level(&text, ';')
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Split `text` on `sep` wherever it occurs at parenthesis depth zero and
/// outside quotes. Parts are trimmed; empty parts are dropped.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in Unquoted::new(text, SQL_QUOTES) {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Byte range of the content between the first unquoted `open` in `text`
/// and its matching `close`. `None` when there is no opener or it is never
/// closed.
pub fn enclosed(text: &str, open: char, close: char, quotes: &[char]) -> Option<Range<usize>> {
    let mut depth = 0usize;
    let mut start = None;

    for (i, c) in Unquoted::new(text, quotes) {
        if c == open {
            if depth == 0 && start.is_none() {
                start = Some(i + c.len_utf8());
            }
            depth += 1;
        } else if c == close && start.is_some() {
            depth -= 1;
            if depth == 0 {
                return start.map(|s| s..i);
            }
        }
    }
    None
}

/// Content of the outermost parenthesized group, quote-aware
pub fn paren_body(text: &str) -> Option<&str> {
    enclosed(text, '(', ')', SQL_QUOTES).map(|r| &text[r])
}

/// Token classes produced by [`tokenize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare word: identifier, keyword, number or operator run
    Word,
    /// Identifier quoted with the given character (`"` or `` ` ``)
    Quoted(char),
    /// Single-quoted string literal
    Str,
    LParen,
    RParen,
}

/// One token, borrowing its raw text from the statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Source text including any quotes
    pub raw: &'a str,
    /// Byte offset of `raw` in the tokenized statement
    pub start: usize,
}

impl<'a> Token<'a> {
    pub fn end(&self) -> usize {
        self.start + self.raw.len()
    }

    /// Token value with surrounding quotes removed and doubled quotes collapsed
    pub fn value(&self) -> Cow<'a, str> {
        let q = match self.kind {
            TokenKind::Quoted(q) => q,
            TokenKind::Str => '\'',
            _ => return Cow::Borrowed(self.raw),
        };
        let inner = self.raw.strip_prefix(q).unwrap_or(self.raw);
        let inner = inner.strip_suffix(q).unwrap_or(inner);
        let doubled: String = [q, q].iter().collect();
        if inner.contains(&doubled) {
            Cow::Owned(inner.replace(&doubled, &q.to_string()))
        } else {
            Cow::Borrowed(inner)
        }
    }

    /// Quote character this token was written with, if any
    pub fn quote(&self) -> Option<char> {
        match self.kind {
            TokenKind::Quoted(q) => Some(q),
            TokenKind::Str => Some('\''),
            _ => None,
        }
    }

    /// Case-insensitive keyword match against a bare word
    pub fn is_word(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Word && self.raw.eq_ignore_ascii_case(keyword)
    }

    /// Identifier-like: a bare word or a quoted identifier
    pub fn is_ident(&self) -> bool {
        matches!(self.kind, TokenKind::Word | TokenKind::Quoted(_))
    }
}

/// Tokenize one statement. Whitespace only separates tokens.
pub fn tokenize(stmt: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut chars = stmt.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '\'' => TokenKind::Str,
            '"' | '`' => TokenKind::Quoted(c),
            _ => TokenKind::Word,
        };

        let end = match kind {
            TokenKind::LParen | TokenKind::RParen => {
                chars.next();
                start + 1
            }
            TokenKind::Str | TokenKind::Quoted(_) => {
                chars.next();
                let mut end = stmt.len();
                while let Some((i, ch)) = chars.next() {
                    if ch == c {
                        if chars.peek().is_some_and(|&(_, n)| n == c) {
                            chars.next();
                            continue;
                        }
                        end = i + ch.len_utf8();
                        break;
                    }
                }
                end
            }
            TokenKind::Word => {
                let mut end = stmt.len();
                while let Some(&(i, ch)) = chars.peek() {
                    if ch.is_whitespace() || matches!(ch, '(' | ')' | '\'' | '"' | '`') {
                        end = i;
                        break;
                    }
                    chars.next();
                }
                end
            }
        };

        tokens.push(Token {
            kind,
            raw: &stmt[start..end],
            start,
        });
    }
    tokens
}

/// Index of the token closing the group opened at `open_idx`
pub fn matching_paren(tokens: &[Token<'_>], open_idx: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate().skip(open_idx) {
        match tok.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
