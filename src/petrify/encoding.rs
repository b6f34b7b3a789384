//! Encoding of ordinary text into Petrify-accepted labels.
//!
//! Characters that are significant to Petrify are replaced by upper-case
//! tokens. The encoding is incomplete: only the characters below are covered.

const TABLE: [(char, &str); 6] = [
    ('{', "LBRACE"),
    ('}', "RBRACE"),
    ('.', "DOT"),
    ('(', "LPAREN"),
    (')', "RPAREN"),
    ('/', "SLASH"),
];

/// Encode a string into the Petrify-accepted format.
pub fn encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match TABLE.iter().find(|(reserved, _)| *reserved == c) {
            Some((_, token)) => out.push_str(token),
            None => out.push(c),
        }
    }
    out
}

/// Decode a Petrify-encoded string back into ordinary text.
///
/// Tokens are matched left to right; no token is a prefix of another.
pub fn decode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(c) = rest.chars().next() {
        match TABLE.iter().find(|(_, token)| rest.starts_with(token)) {
            Some((reserved, token)) => {
                out.push(*reserved);
                rest = &rest[token.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}
