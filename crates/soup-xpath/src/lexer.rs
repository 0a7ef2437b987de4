//! Expression tokenizer
//!
//! Applies the XPath 1.0 lexical disambiguation rules: when the previous
//! token can end an operand, `*` is the multiplication operator and the
//! names `and`, `or`, `div`, `mod` are operators. A name followed by `(` is
//! a function name or a node type, a name followed by `::` is an axis.

use crate::error::{Result, XPathError};

const NODE_TYPES: &[&str] = &["comment", "text", "processing-instruction", "node"];

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Dot,
    DotDot,
    At,
    Comma,
    ColonColon,
    Slash,
    DoubleSlash,
    Pipe,
    Plus,
    Minus,
    /// Multiplication operator
    Multiply,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    Div,
    Mod,
    Number(f64),
    Literal(String),
    /// `*` used as a name test
    Wildcard,
    Name(String),
    FunctionName(String),
    NodeType(String),
    AxisName(String),
    Variable(String),
}

impl Token {
    /// Whether this token can be the last token of an operand
    fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::RightParen
                | Token::RightBracket
                | Token::Dot
                | Token::DotDot
                | Token::Number(_)
                | Token::Literal(_)
                | Token::Wildcard
                | Token::Name(_)
                | Token::Variable(_)
        )
    }
}

/// A token with its byte offset in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// Tokenize a whole expression
pub fn tokenize(input: &str) -> Result<Vec<Spanned>> {
    Lexer::new(input).run()
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<Spanned>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_at(&self, skip: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(skip)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn operator_context(&self) -> bool {
        self.tokens.last().is_some_and(|t| t.token.ends_operand())
    }

    fn push(&mut self, token: Token, offset: usize) {
        self.tokens.push(Spanned { token, offset });
    }

    fn run(mut self) -> Result<Vec<Spanned>> {
        while let Some(c) = self.peek() {
            let start = self.pos;
            if is_xml_space(c) {
                self.pos += c.len_utf8();
                continue;
            }

            let (token, len) = match c {
                '(' => (Token::LeftParen, 1),
                ')' => (Token::RightParen, 1),
                '[' => (Token::LeftBracket, 1),
                ']' => (Token::RightBracket, 1),
                '@' => (Token::At, 1),
                ',' => (Token::Comma, 1),
                '|' => (Token::Pipe, 1),
                '+' => (Token::Plus, 1),
                '-' => (Token::Minus, 1),
                '=' => (Token::Equal, 1),
                '/' if self.rest().starts_with("//") => (Token::DoubleSlash, 2),
                '/' => (Token::Slash, 1),
                ':' if self.rest().starts_with("::") => (Token::ColonColon, 2),
                '!' if self.rest().starts_with("!=") => (Token::NotEqual, 2),
                '<' if self.rest().starts_with("<=") => (Token::LessEqual, 2),
                '<' => (Token::Less, 1),
                '>' if self.rest().starts_with(">=") => (Token::GreaterEqual, 2),
                '>' => (Token::Greater, 1),
                '*' if self.operator_context() => (Token::Multiply, 1),
                '*' => (Token::Wildcard, 1),
                '.' if self.rest().starts_with("..") => (Token::DotDot, 2),
                '.' if self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) => {
                    let token = self.number();
                    self.push(token, start);
                    continue;
                }
                '.' => (Token::Dot, 1),
                '"' | '\'' => {
                    let token = self.literal(c)?;
                    self.push(token, start);
                    continue;
                }
                '$' => {
                    self.pos += 1;
                    let name = self.name();
                    if name.is_empty() {
                        return Err(XPathError::syntax("expected variable name after '$'", start));
                    }
                    self.push(Token::Variable(name.to_string()), start);
                    continue;
                }
                d if d.is_ascii_digit() => {
                    let token = self.number();
                    self.push(token, start);
                    continue;
                }
                n if is_name_start(n) => {
                    let token = self.name_token();
                    self.push(token, start);
                    continue;
                }
                other => {
                    return Err(XPathError::syntax(
                        format!("unexpected character '{other}'"),
                        start,
                    ));
                }
            };
            self.pos += len;
            self.push(token, start);
        }
        Ok(self.tokens)
    }

    fn number(&mut self) -> Token {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if self.pos < bytes.len() && bytes[self.pos] == b'.' {
            self.pos += 1;
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
        }
        let text = &self.input[start..self.pos];
        Token::Number(text.parse().unwrap_or(f64::NAN))
    }

    fn literal(&mut self, quote: char) -> Result<Token> {
        let start = self.pos;
        let body = &self.input[start + 1..];
        match body.find(quote) {
            Some(end) => {
                self.pos = start + 1 + end + 1;
                Ok(Token::Literal(body[..end].to_string()))
            }
            None => Err(XPathError::syntax("unterminated string literal", start)),
        }
    }

    /// Consume an NCName, or a QName when a prefix is followed by a name
    fn name(&mut self) -> &'a str {
        let start = self.pos;
        let Some(first) = self.peek() else {
            return "";
        };
        if !is_name_start(first) {
            return "";
        }
        self.pos += first.len_utf8();
        self.consume_name_chars();
        if self.peek() == Some(':') && self.peek_at(1).is_some_and(is_name_start) {
            self.pos += 1;
            self.consume_name_chars();
        }
        &self.input[start..self.pos]
    }

    fn consume_name_chars(&mut self) {
        while let Some(c) = self.peek() {
            if !is_name_char(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn name_token(&mut self) -> Token {
        let operator_context = self.operator_context();
        let name = self.name();

        if operator_context {
            match name {
                "and" => return Token::And,
                "or" => return Token::Or,
                "div" => return Token::Div,
                "mod" => return Token::Mod,
                _ => {}
            }
        }

        let after = self.rest().trim_start_matches(is_xml_space);
        if after.starts_with("::") {
            return Token::AxisName(name.to_string());
        }
        if after.starts_with('(') {
            if NODE_TYPES.contains(&name) {
                return Token::NodeType(name.to_string());
            }
            return Token::FunctionName(name.to_string());
        }
        Token::Name(name.to_string())
    }
}

fn is_xml_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c == '-' || c == '.' || c.is_numeric() || c == '\u{b7}'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input)
            .expect("tokenize")
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn test_star_disambiguation() {
        assert_eq!(
            tokens("*[2 * 3]"),
            vec![
                Token::Wildcard,
                Token::LeftBracket,
                Token::Number(2.0),
                Token::Multiply,
                Token::Number(3.0),
                Token::RightBracket,
            ]
        );
    }

    #[test]
    fn test_operator_names() {
        assert_eq!(
            tokens("and or div"),
            vec![
                Token::Name("and".into()),
                Token::Or,
                Token::Name("div".into()),
            ]
        );
    }

    #[test]
    fn test_function_axis_and_node_type() {
        assert_eq!(
            tokens("child::text() | count (a)"),
            vec![
                Token::AxisName("child".into()),
                Token::ColonColon,
                Token::NodeType("text".into()),
                Token::LeftParen,
                Token::RightParen,
                Token::Pipe,
                Token::FunctionName("count".into()),
                Token::LeftParen,
                Token::Name("a".into()),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn test_dots_and_numbers() {
        assert_eq!(
            tokens("../.5"),
            vec![Token::DotDot, Token::Slash, Token::Number(0.5)]
        );
    }

    #[test]
    fn test_hyphenated_names() {
        assert_eq!(
            tokens("@accept-charset"),
            vec![Token::At, Token::Name("accept-charset".into())]
        );
    }

    #[test]
    fn test_unterminated_literal() {
        let err = tokenize("a[@id='x]").unwrap_err();
        assert_eq!(
            err,
            XPathError::Syntax {
                message: "unterminated string literal".into(),
                position: 6,
            }
        );
    }
}
