//! Recursive-descent parser producing [`Expr`]
//!
//! Function names and arities are checked here, so an expression that
//! parses can only fail at evaluation time by producing the wrong type.

use crate::ast::{Axis, BinaryOp, Expr, NodeTest, Step};
use crate::error::{Result, XPathError};
use crate::lexer::{tokenize, Spanned, Token};

/// Supported functions with their (min, max) argument counts
const FUNCTIONS: &[(&str, usize, Option<usize>, &str)] = &[
    ("last", 0, Some(0), "0"),
    ("position", 0, Some(0), "0"),
    ("count", 1, Some(1), "1"),
    ("name", 0, Some(1), "0 or 1"),
    ("local-name", 0, Some(1), "0 or 1"),
    ("string", 0, Some(1), "0 or 1"),
    ("concat", 2, None, "at least 2"),
    ("contains", 2, Some(2), "2"),
    ("starts-with", 2, Some(2), "2"),
    ("normalize-space", 0, Some(1), "0 or 1"),
    ("string-length", 0, Some(1), "0 or 1"),
    ("boolean", 1, Some(1), "1"),
    ("not", 1, Some(1), "1"),
    ("true", 0, Some(0), "0"),
    ("false", 0, Some(0), "0"),
    ("number", 0, Some(1), "0 or 1"),
];

/// Parse an expression string
pub fn parse(input: &str) -> Result<Expr> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.len(),
    };
    let expr = parser.expr()?;
    if let Some(extra) = parser.tokens.get(parser.pos) {
        return Err(XPathError::syntax(
            format!("unexpected token {:?}", extra.token),
            extra.offset,
        ));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |s| s.offset)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|s| s.token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token, what: &str) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn error(&self, message: String) -> XPathError {
        XPathError::syntax(message, self.offset())
    }

    fn expr(&mut self) -> Result<Expr> {
        self.or_expr()
    }

    fn binary_level(
        &mut self,
        next: fn(&mut Self) -> Result<Expr>,
        ops: &[(Token, BinaryOp)],
    ) -> Result<Expr> {
        let mut left = next(self)?;
        'outer: loop {
            for (token, op) in ops {
                if self.eat(token) {
                    let right = next(self)?;
                    left = Expr::Binary {
                        op: *op,
                        left: Box::new(left),
                        right: Box::new(right),
                    };
                    continue 'outer;
                }
            }
            return Ok(left);
        }
    }

    fn or_expr(&mut self) -> Result<Expr> {
        self.binary_level(Self::and_expr, &[(Token::Or, BinaryOp::Or)])
    }

    fn and_expr(&mut self) -> Result<Expr> {
        self.binary_level(Self::equality_expr, &[(Token::And, BinaryOp::And)])
    }

    fn equality_expr(&mut self) -> Result<Expr> {
        self.binary_level(
            Self::relational_expr,
            &[
                (Token::Equal, BinaryOp::Equal),
                (Token::NotEqual, BinaryOp::NotEqual),
            ],
        )
    }

    fn relational_expr(&mut self) -> Result<Expr> {
        self.binary_level(
            Self::additive_expr,
            &[
                (Token::LessEqual, BinaryOp::LessEqual),
                (Token::Less, BinaryOp::Less),
                (Token::GreaterEqual, BinaryOp::GreaterEqual),
                (Token::Greater, BinaryOp::Greater),
            ],
        )
    }

    fn additive_expr(&mut self) -> Result<Expr> {
        self.binary_level(
            Self::multiplicative_expr,
            &[
                (Token::Plus, BinaryOp::Add),
                (Token::Minus, BinaryOp::Subtract),
            ],
        )
    }

    fn multiplicative_expr(&mut self) -> Result<Expr> {
        self.binary_level(
            Self::unary_expr,
            &[
                (Token::Multiply, BinaryOp::Multiply),
                (Token::Div, BinaryOp::Div),
                (Token::Mod, BinaryOp::Mod),
            ],
        )
    }

    fn unary_expr(&mut self) -> Result<Expr> {
        if self.eat(&Token::Minus) {
            let operand = self.unary_expr()?;
            return Ok(Expr::Negate(Box::new(operand)));
        }
        self.union_expr()
    }

    fn union_expr(&mut self) -> Result<Expr> {
        let mut left = self.path_expr()?;
        while self.eat(&Token::Pipe) {
            let right = self.path_expr()?;
            left = Expr::Union(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn path_expr(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(
                Token::LeftParen
                | Token::Literal(_)
                | Token::Number(_)
                | Token::FunctionName(_)
                | Token::Variable(_),
            ) => self.filter_expr(),
            Some(Token::Slash) => {
                self.pos += 1;
                let steps = if self.at_step_start() {
                    self.relative_path()?
                } else {
                    Vec::new()
                };
                Ok(Expr::Path {
                    absolute: true,
                    steps,
                })
            }
            Some(Token::DoubleSlash) => {
                self.pos += 1;
                let mut steps = vec![Step::new(Axis::DescendantOrSelf, NodeTest::Node)];
                steps.extend(self.relative_path()?);
                Ok(Expr::Path {
                    absolute: true,
                    steps,
                })
            }
            _ if self.at_step_start() => Ok(Expr::Path {
                absolute: false,
                steps: self.relative_path()?,
            }),
            Some(token) => Err(self.error(format!("unexpected token {token:?}"))),
            None => Err(self.error("unexpected end of expression".to_string())),
        }
    }

    fn filter_expr(&mut self) -> Result<Expr> {
        let primary = self.primary_expr()?;
        let predicates = self.predicates()?;

        let mut steps = Vec::new();
        if self.eat(&Token::Slash) {
            steps = self.relative_path()?;
        } else if self.eat(&Token::DoubleSlash) {
            steps.push(Step::new(Axis::DescendantOrSelf, NodeTest::Node));
            steps.extend(self.relative_path()?);
        }

        if predicates.is_empty() && steps.is_empty() {
            return Ok(primary);
        }
        Ok(Expr::Filter {
            primary: Box::new(primary),
            predicates,
            steps,
        })
    }

    fn primary_expr(&mut self) -> Result<Expr> {
        let offset = self.offset();
        match self.advance() {
            Some(Token::LeftParen) => {
                let inner = self.expr()?;
                self.expect(&Token::RightParen, "')'")?;
                Ok(inner)
            }
            Some(Token::Literal(s)) => Ok(Expr::String(s)),
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::FunctionName(name)) => self.function_call(name, offset),
            Some(Token::Variable(name)) => Err(XPathError::Unsupported(format!(
                "variable reference ${name}"
            ))),
            _ => Err(XPathError::syntax("expected primary expression", offset)),
        }
    }

    fn function_call(&mut self, name: String, offset: usize) -> Result<Expr> {
        let Some(&(_, min, max, expected)) = FUNCTIONS.iter().find(|f| f.0 == name) else {
            tracing::trace!("rejecting unknown function at offset {offset}");
            return Err(XPathError::UnknownFunction(name));
        };

        self.expect(&Token::LeftParen, "'('")?;
        let mut args = Vec::new();
        if !self.eat(&Token::RightParen) {
            loop {
                args.push(self.expr()?);
                if self.eat(&Token::Comma) {
                    continue;
                }
                self.expect(&Token::RightParen, "',' or ')'")?;
                break;
            }
        }

        if args.len() < min || max.is_some_and(|max| args.len() > max) {
            return Err(XPathError::Arity {
                name,
                expected,
                found: args.len(),
            });
        }
        Ok(Expr::Function { name, args })
    }

    fn predicates(&mut self) -> Result<Vec<Expr>> {
        let mut predicates = Vec::new();
        while self.eat(&Token::LeftBracket) {
            predicates.push(self.expr()?);
            self.expect(&Token::RightBracket, "']'")?;
        }
        Ok(predicates)
    }

    fn at_step_start(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Token::Dot
                    | Token::DotDot
                    | Token::At
                    | Token::AxisName(_)
                    | Token::Name(_)
                    | Token::Wildcard
                    | Token::NodeType(_)
            )
        )
    }

    fn relative_path(&mut self) -> Result<Vec<Step>> {
        let mut steps = vec![self.step()?];
        loop {
            if self.eat(&Token::Slash) {
                steps.push(self.step()?);
            } else if self.eat(&Token::DoubleSlash) {
                steps.push(Step::new(Axis::DescendantOrSelf, NodeTest::Node));
                steps.push(self.step()?);
            } else {
                return Ok(steps);
            }
        }
    }

    fn step(&mut self) -> Result<Step> {
        if self.eat(&Token::Dot) {
            return Ok(Step::new(Axis::SelfAxis, NodeTest::Node));
        }
        if self.eat(&Token::DotDot) {
            return Ok(Step::new(Axis::Parent, NodeTest::Node));
        }

        let axis = match self.peek() {
            Some(Token::At) => {
                self.pos += 1;
                Axis::Attribute
            }
            Some(Token::AxisName(name)) => {
                let offset = self.offset();
                let axis = match Axis::from_name(name) {
                    Some(axis) => axis,
                    None if name == "namespace" => {
                        return Err(XPathError::Unsupported("namespace axis".to_string()));
                    }
                    None => {
                        return Err(XPathError::syntax(format!("unknown axis '{name}'"), offset));
                    }
                };
                self.pos += 1;
                self.expect(&Token::ColonColon, "'::'")?;
                axis
            }
            _ => Axis::Child,
        };

        let test = self.node_test()?;
        let predicates = self.predicates()?;
        Ok(Step {
            axis,
            test,
            predicates,
        })
    }

    fn node_test(&mut self) -> Result<NodeTest> {
        let offset = self.offset();
        match self.advance() {
            Some(Token::Wildcard) => Ok(NodeTest::Wildcard),
            Some(Token::Name(name)) => Ok(NodeTest::Name(name)),
            Some(Token::NodeType(kind)) => {
                self.expect(&Token::LeftParen, "'('")?;
                let test = match kind.as_str() {
                    "node" => NodeTest::Node,
                    "text" => NodeTest::Text,
                    "comment" => NodeTest::Comment,
                    _ => {
                        let target = match self.peek() {
                            Some(Token::Literal(target)) => Some(target.clone()),
                            _ => None,
                        };
                        if target.is_some() {
                            self.pos += 1;
                        }
                        NodeTest::ProcessingInstruction(target)
                    }
                };
                self.expect(&Token::RightParen, "')'")?;
                Ok(test)
            }
            _ => Err(XPathError::syntax("expected node test", offset)),
        }
    }
}
