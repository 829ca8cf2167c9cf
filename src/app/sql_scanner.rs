//! Lexical scanner used by table extraction.
//!
//! Two stages, each independently testable:
//! - [`normalize_statement`] drops line and block comments and collapses
//!   whitespace runs to a single space, leaving quoted text untouched.
//! - [`tokenize`] splits normalized text into words, literals, and the
//!   punctuation that terminates an identifier (`,` `(` `)` `;`).
//!
//! Quoted identifiers (`"..."`, `` `...` ``) and string literals (`'...'`,
//! `E'...'`, `$$...$$`, `$tag$...$tag$`) are kept whole, so keywords or
//! comment markers inside them are never seen by the extractor.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare or quoted identifier, keyword, or any other unbroken run.
    Word,
    /// Single-quoted or dollar-quoted string literal.
    Literal,
    Punctuation(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    fn word(text: String) -> Self {
        let kind = if is_literal_start(&text) {
            TokenKind::Literal
        } else {
            TokenKind::Word
        };
        Self { kind, text }
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// Case-insensitive keyword test. Quoted words never match.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.is_word() && self.text.eq_ignore_ascii_case(keyword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InSingleQuote,
    InEscapeString,
    InDoubleQuote,
    InBacktick,
    InDollarQuote,
    InLineComment,
    InBlockComment,
}

fn is_literal_start(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some('\'') => true,
        Some('E' | 'e') => chars.next() == Some('\''),
        Some('$') => dollar_tag(&chars).is_some(),
        _ => false,
    }
}

fn continues_identifier(out: &str) -> bool {
    out.chars()
        .next_back()
        .is_some_and(|prev| prev.is_alphanumeric() || prev == '_' || prev == '$')
}

/// Tag of a `$tag$` delimiter whose opening `$` was just consumed. A tag
/// cannot start with a digit, so `$1` parameters never open one.
fn dollar_tag<I>(rest: &I) -> Option<String>
where
    I: Iterator<Item = char> + Clone,
{
    let mut tag = String::new();
    for c in rest.clone() {
        if c == '$' {
            return Some(tag);
        }
        let valid = c == '_' || c.is_alphabetic() || (c.is_ascii_digit() && !tag.is_empty());
        if !valid {
            return None;
        }
        tag.push(c);
    }
    None
}

/// Moves the delimiter tail (`tag$`) from `chars` to `out`.
fn take_delimiter_tail(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    out: &mut String,
    tag: &str,
) {
    for _ in 0..=tag.chars().count() {
        if let Some(c) = chars.next() {
            out.push(c);
        }
    }
}

fn is_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '(' | ')' | ';')
}

/// An `E` or `e` that directly opens an escape string, i.e. not the tail of a
/// longer identifier such as `name'`.
fn opens_escape_string(out: &str) -> bool {
    let mut rev = out.chars().rev();
    match rev.next() {
        Some('E' | 'e') => !rev
            .next()
            .is_some_and(|prev| prev.is_alphanumeric() || prev == '_'),
        _ => false,
    }
}

pub fn normalize_statement(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut state = ScanState::Normal;
    let mut dollar_delimiter = String::new();
    let mut pending_space = false;

    while let Some(c) = chars.next() {
        match state {
            ScanState::Normal => {
                if c == '-' && chars.peek() == Some(&'-') {
                    chars.next();
                    state = ScanState::InLineComment;
                    pending_space = true;
                    continue;
                }
                if c == '/' && chars.peek() == Some(&'*') {
                    chars.next();
                    state = ScanState::InBlockComment;
                    pending_space = true;
                    continue;
                }
                if c.is_whitespace() {
                    pending_space = true;
                    continue;
                }
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                if c == '$'
                    && !continues_identifier(&out)
                    && let Some(tag) = dollar_tag(&chars)
                {
                    out.push(c);
                    take_delimiter_tail(&mut chars, &mut out, &tag);
                    dollar_delimiter = tag;
                    state = ScanState::InDollarQuote;
                    continue;
                }
                state = match c {
                    '\'' if opens_escape_string(&out) => ScanState::InEscapeString,
                    '\'' => ScanState::InSingleQuote,
                    '"' => ScanState::InDoubleQuote,
                    '`' => ScanState::InBacktick,
                    _ => ScanState::Normal,
                };
                out.push(c);
            }
            ScanState::InSingleQuote | ScanState::InDoubleQuote | ScanState::InBacktick => {
                out.push(c);
                let quote = match state {
                    ScanState::InSingleQuote => '\'',
                    ScanState::InDoubleQuote => '"',
                    _ => '`',
                };
                if c == quote {
                    // Doubled quote is an escaped quote, not the end.
                    if chars.peek() == Some(&quote) {
                        out.push(quote);
                        chars.next();
                    } else {
                        state = ScanState::Normal;
                    }
                }
            }
            ScanState::InEscapeString => {
                out.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == '\'' {
                    if chars.peek() == Some(&'\'') {
                        out.push('\'');
                        chars.next();
                    } else {
                        state = ScanState::Normal;
                    }
                }
            }
            ScanState::InDollarQuote => {
                out.push(c);
                if c == '$' && dollar_tag(&chars).as_deref() == Some(dollar_delimiter.as_str()) {
                    take_delimiter_tail(&mut chars, &mut out, &dollar_delimiter);
                    state = ScanState::Normal;
                }
            }
            ScanState::InLineComment => {
                if c == '\n' {
                    state = ScanState::Normal;
                }
            }
            ScanState::InBlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = ScanState::Normal;
                }
            }
        }
    }

    out
}

/// Splits already-normalized text into tokens. Whitespace is dropped.
pub fn tokenize(normalized: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = normalized.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if is_boundary(c) {
            chars.next();
            tokens.push(Token {
                kind: TokenKind::Punctuation(c),
                text: c.to_string(),
            });
            continue;
        }

        let mut word = String::new();
        while let Some(&c) = chars.peek() {
            if is_boundary(c) {
                break;
            }
            chars.next();
            let opens_dollar_quote = c == '$' && !continues_identifier(&word);
            word.push(c);
            if opens_dollar_quote && let Some(tag) = dollar_tag(&chars) {
                take_delimiter_tail(&mut chars, &mut word, &tag);
                consume_dollar_quoted(&mut chars, &mut word, &tag);
                continue;
            }
            if matches!(c, '"' | '`' | '\'') {
                let escapes = c == '\'' && opens_escape_string(&word[..word.len() - 1]);
                consume_quoted(&mut chars, &mut word, c, escapes);
            }
        }
        tokens.push(Token::word(word));
    }

    tokens
}

fn consume_quoted(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    word: &mut String,
    quote: char,
    backslash_escapes: bool,
) {
    while let Some(c) = chars.next() {
        word.push(c);
        if backslash_escapes && c == '\\' {
            if let Some(escaped) = chars.next() {
                word.push(escaped);
            }
            continue;
        }
        if c == quote {
            if chars.peek() == Some(&quote) {
                word.push(quote);
                chars.next();
                continue;
            }
            return;
        }
    }
}

fn consume_dollar_quoted(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    word: &mut String,
    tag: &str,
) {
    while let Some(c) = chars.next() {
        word.push(c);
        if c == '$' && dollar_tag(&*chars).as_deref() == Some(tag) {
            take_delimiter_tail(chars, word, tag);
            return;
        }
    }
}

/// Normalizes then tokenizes raw statement text.
pub fn scan(text: &str) -> Vec<Token> {
    tokenize(&normalize_statement(text))
}
