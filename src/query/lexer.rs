//! First pass: split a raw query into terms and top-level operators.

/// Lexical token. Terms keep their surrounding whitespace; the parser trims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Token<'a> {
    Term(&'a str),
    And,
    Or,
}

/// Where the scanner is relative to the current term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Only whitespace seen since the last operator.
    TermStart,
    /// Ordinary term text; `&` and `|` are operators.
    Plain,
    /// Inside a `"phrase"`.
    Quoted,
    /// Inside a `/regex/`.
    Regex,
    /// Just after a backslash inside a regex.
    RegexEscape,
    /// Inside a `[...]` class of a regex, at the given nesting depth. A `/`
    /// here is literal.
    RegexClass(u32),
    /// Just after a backslash inside a regex class.
    RegexClassEscape(u32),
}

/// Result of lexing: the token stream and whether input ended inside an
/// unterminated phrase or regex.
#[derive(Debug)]
pub(super) struct Lexed<'a> {
    pub tokens: Vec<Token<'a>>,
    pub unterminated: bool,
}

/// Split `input` at top-level `&` and `|`.
///
/// A term whose first non-blank character is `"` or `/` is protected until the
/// matching close, so operators inside phrases and regexes stay literal. A
/// regex closes at the first `/` that is neither escaped nor inside a `[...]`
/// class. An unterminated span runs to the end of input.
pub(super) fn lex(input: &str) -> Lexed<'_> {
    let mut tokens = Vec::new();
    let mut state = State::TermStart;
    let mut start = 0;

    for (i, ch) in input.char_indices() {
        state = match (state, ch) {
            (State::TermStart, c) if c.is_whitespace() => State::TermStart,
            (State::TermStart, '"') => State::Quoted,
            (State::TermStart, '/') => State::Regex,
            (State::TermStart | State::Plain, '&' | '|') => {
                tokens.push(Token::Term(&input[start..i]));
                tokens.push(if ch == '&' { Token::And } else { Token::Or });
                start = i + ch.len_utf8();
                State::TermStart
            }
            (State::TermStart | State::Plain, _) => State::Plain,
            (State::Quoted, '"') | (State::Regex, '/') => State::Plain,
            (State::Quoted, _) => State::Quoted,
            (State::Regex, '\\') => State::RegexEscape,
            (State::Regex, '[') => State::RegexClass(1),
            (State::Regex | State::RegexEscape, _) => State::Regex,
            (State::RegexClass(depth), '\\') => State::RegexClassEscape(depth),
            (State::RegexClass(depth), '[') => State::RegexClass(depth.saturating_add(1)),
            (State::RegexClass(1), ']') => State::Regex,
            (State::RegexClass(depth), ']') => State::RegexClass(depth - 1),
            (State::RegexClass(depth) | State::RegexClassEscape(depth), _) => {
                State::RegexClass(depth)
            }
        };
    }

    tokens.push(Token::Term(&input[start..]));

    Lexed {
        tokens,
        unterminated: matches!(
            state,
            State::Quoted
                | State::Regex
                | State::RegexEscape
                | State::RegexClass(_)
                | State::RegexClassEscape(_)
        ),
    }
}
