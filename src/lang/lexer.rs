//! Tokenizer for the demo grammar
//!
//! Whitespace and comments are trivia: they are attached to the following
//! token as its leading span, so every token knows both its full start
//! (including trivia) and its content offset (after trivia). Violation
//! anchors use the content offset.

use super::ParseError;

/// Keywords of the demo grammar
const KEYWORDS: &[&str] = &[
    "as",
    "break",
    "case",
    "default",
    "else",
    "extension",
    "fallthrough",
    "func",
    "if",
    "import",
    "init",
    "let",
    "return",
    "switch",
    "try",
    "var",
];

/// Two-character operators recognized as single tokens
const DOUBLE_OPS: &[&str] = &["->", "==", "!=", "<=", ">=", "??", "&&", "||"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Operator,
    Number,
    Str,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Content start, after leading trivia
    pub offset: usize,
    /// Start of leading trivia
    pub full_start: usize,
    /// End of the token text
    pub end: usize,
}

impl Token {
    pub fn is_keyword(&self, kw: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == kw
    }

    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }
}

pub fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    loop {
        let trivia_start = pos;
        pos = skip_trivia(source, pos)?;

        if pos >= source.len() {
            tokens.push(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                offset: pos,
                full_start: trivia_start,
                end: pos,
            });
            break;
        }

        let start = pos;
        let ch = char_at(source, pos);

        let (kind, end) = if ch.is_alphabetic() || ch == '_' {
            let end = scan_while(source, pos, |c| c.is_alphanumeric() || c == '_');
            let kind = if KEYWORDS.contains(&&source[start..end]) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            (kind, end)
        } else if ch.is_ascii_digit() {
            (TokenKind::Number, scan_number(source, pos))
        } else if ch == '"' {
            (TokenKind::Str, scan_string(source, pos)?)
        } else {
            let two = source.get(pos..pos + 2);
            let end = match two {
                Some(op) if DOUBLE_OPS.contains(&op) => pos + 2,
                _ => pos + ch.len_utf8(),
            };
            (TokenKind::Operator, end)
        };

        tokens.push(Token {
            kind,
            text: source[start..end].to_string(),
            offset: start,
            full_start: trivia_start,
            end,
        });
        pos = end;
    }

    Ok(tokens)
}

fn char_at(source: &str, pos: usize) -> char {
    source[pos..].chars().next().unwrap_or('\0')
}

fn scan_while<F: Fn(char) -> bool>(source: &str, mut pos: usize, pred: F) -> usize {
    while pos < source.len() {
        let ch = char_at(source, pos);
        if !pred(ch) {
            break;
        }
        pos += ch.len_utf8();
    }
    pos
}

fn scan_number(source: &str, pos: usize) -> usize {
    let mut end = scan_while(source, pos, |c| c.is_ascii_digit() || c == '_');
    // Fractional part, but not a `..` range operator
    if source[end..].starts_with('.')
        && source[end + 1..].chars().next().is_some_and(|c| c.is_ascii_digit())
    {
        end = scan_while(source, end + 1, |c| c.is_ascii_digit() || c == '_');
    }
    end
}

fn scan_string(source: &str, start: usize) -> Result<usize, ParseError> {
    let mut pos = start + 1;
    while pos < source.len() {
        match char_at(source, pos) {
            '\\' => {
                pos += 1;
                if pos < source.len() {
                    pos += char_at(source, pos).len_utf8();
                }
            }
            '"' => return Ok(pos + 1),
            c => pos += c.len_utf8(),
        }
    }
    Err(ParseError::UnterminatedString { offset: start })
}

/// Skip whitespace, line comments and block comments. Returns the offset
/// of the next token start.
fn skip_trivia(source: &str, mut pos: usize) -> Result<usize, ParseError> {
    loop {
        let before = pos;
        pos = scan_while(source, pos, |c| c.is_whitespace());

        if source[pos..].starts_with("//") {
            pos = scan_while(source, pos, |c| c != '\n');
        } else if source[pos..].starts_with("/*") {
            let comment_start = pos;
            match source[pos + 2..].find("*/") {
                Some(idx) => pos = pos + 2 + idx + 2,
                None => {
                    return Err(ParseError::UnterminatedComment {
                        offset: comment_start,
                    })
                }
            }
        }

        if pos == before {
            return Ok(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let tokens = lex("extension Foo").unwrap();
        assert!(tokens[0].is_keyword("extension"));
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "Foo");
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    }

    #[test]
    fn test_cast_tokens_split() {
        // `as!` is the keyword followed by a bang operator
        let tokens = lex("x as! Int").unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["x", "as", "!", "Int", ""]);
        assert!(tokens[1].is_keyword("as"));
        assert!(tokens[2].is_operator("!"));
    }

    #[test]
    fn test_trivia_attached_to_following_token() {
        let tokens = lex("  // lead\n  foo").unwrap();
        assert_eq!(tokens[0].text, "foo");
        assert_eq!(tokens[0].full_start, 0);
        assert_eq!(tokens[0].offset, 12);
    }

    #[test]
    fn test_block_comment_trivia() {
        let tokens = lex("/* note */ x").unwrap();
        assert_eq!(tokens[0].text, "x");
        assert_eq!(tokens[0].offset, 11);
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert_eq!(
            lex("a /* never closed"),
            Err(ParseError::UnterminatedComment { offset: 2 })
        );
    }

    #[test]
    fn test_string_literal() {
        let tokens = lex(r#"print("two")"#).unwrap();
        assert_eq!(tokens[2].kind, TokenKind::Str);
        assert_eq!(tokens[2].text, "\"two\"");
    }

    #[test]
    fn test_string_escape() {
        let tokens = lex(r#""a\"b""#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].end, 6);
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            lex("\"open"),
            Err(ParseError::UnterminatedString { offset: 0 })
        );
    }

    #[test]
    fn test_double_operators() {
        let tokens = lex("a -> b != c").unwrap();
        assert!(tokens[1].is_operator("->"));
        assert!(tokens[3].is_operator("!="));
    }

    #[test]
    fn test_numbers() {
        let tokens = lex("1 2.5 1_000").unwrap();
        assert_eq!(
            tokens.iter().take(3).map(|t| t.text.as_str()).collect::<Vec<_>>(),
            vec!["1", "2.5", "1_000"]
        );
        assert_eq!(kinds("1 2.5")[0], TokenKind::Number);
    }

    #[test]
    fn test_empty_source() {
        let tokens = lex("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }
}
