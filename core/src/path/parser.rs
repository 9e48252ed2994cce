//! Recursive-descent parser for path expressions.
//!
//! Path grammar:
//! - `path    := "" | "$" tail | step tail`
//! - `tail    := ("." step | "[" indices "]")*`
//! - `step    := ident | 'quoted' | ident "(" args ")" | ident "{" expr "}"`
//!
//! Closure bodies use ordinary precedence: `||` < `&&` < comparison <
//! `+ -` < `* / %` < unary `! -` < postfix steps.

use serde_json::Value;

use super::ast::{Aggregate, BinaryOp, Expr, Method};
use super::lexer::{tokenize, Token, TokenKind};
use super::ParseError;

/// Parse a path expression into an expression tree rooted at the document.
pub fn parse_path(source: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: source.len(),
    };
    let expr = parser.path()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(parser.unexpected(token.clone(), "end of path")),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        match self.next() {
            Some(token) if token.kind == kind => Ok(token),
            Some(token) => Err(self.unexpected(token, expected)),
            None => Err(ParseError::UnexpectedEnd {
                offset: self.end,
                expected: expected.to_string(),
            }),
        }
    }

    fn unexpected(&self, token: Token, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            offset: token.offset,
            found: token.kind.describe(),
            expected: expected.to_string(),
        }
    }

    fn path(&mut self) -> Result<Expr, ParseError> {
        let mut expr = Expr::Root;
        let mut needs_dot = self.eat(&TokenKind::Dollar);

        while self.peek().is_some() {
            if self.eat(&TokenKind::LBracket) {
                expr = self.index(expr)?;
            } else {
                if needs_dot {
                    self.expect(TokenKind::Dot, "`.` or `[`")?;
                }
                expr = self.step(expr)?;
            }
            needs_dot = true;
        }

        Ok(expr)
    }

    /// One named step applied to `target`: field access, method call,
    /// aggregate or closure.
    fn step(&mut self, target: Expr) -> Result<Expr, ParseError> {
        let token = match self.next() {
            Some(token) => token,
            None => {
                return Err(ParseError::UnexpectedEnd {
                    offset: self.end,
                    expected: "field name".to_string(),
                })
            }
        };
        let Token { kind, offset } = token;
        let name = match kind {
            TokenKind::Ident(name) => name,
            TokenKind::Str(name) => {
                return Ok(Expr::FieldAccess {
                    target: Box::new(target),
                    name,
                })
            }
            kind => return Err(self.unexpected(Token { kind, offset }, "field name")),
        };

        match self.peek_kind() {
            Some(TokenKind::LBrace) => {
                self.pos += 1;
                let body = self.expr()?;
                self.expect(TokenKind::RBrace, "`}`")?;
                let target = Box::new(target);
                let body = Box::new(body);
                match name.as_str() {
                    "findAll" => Ok(Expr::Filter {
                        target,
                        predicate: body,
                        first: false,
                    }),
                    "find" => Ok(Expr::Filter {
                        target,
                        predicate: body,
                        first: true,
                    }),
                    "collect" => Ok(Expr::Project {
                        target,
                        mapping: body,
                    }),
                    _ => Err(ParseError::UnknownFunction { offset, name }),
                }
            }
            Some(TokenKind::LParen) => {
                self.pos += 1;
                let args = self.args()?;
                self.call(target, name, offset, args)
            }
            _ => Ok(Expr::FieldAccess {
                target: Box::new(target),
                name,
            }),
        }
    }

    fn call(&self, target: Expr, name: String, offset: usize, args: Vec<Expr>) -> Result<Expr, ParseError> {
        if let Some(function) = Aggregate::from_name(&name) {
            if !args.is_empty() {
                return Err(ParseError::WrongArity {
                    offset,
                    name,
                    expected: 0,
                    found: args.len(),
                });
            }
            return Ok(Expr::Aggregate {
                target: Box::new(target),
                function,
            });
        }

        let Some(method) = Method::from_name(&name) else {
            return Err(ParseError::UnknownFunction { offset, name });
        };
        if args.len() != method.arity() {
            return Err(ParseError::WrongArity {
                offset,
                name,
                expected: method.arity(),
                found: args.len(),
            });
        }
        Ok(Expr::MethodCall {
            target: Box::new(target),
            method,
            args,
        })
    }

    /// Arguments after an opening `(`, consuming the closing `)`.
    fn args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen, "`,` or `)`")?;
            return Ok(args);
        }
    }

    /// Index list after an opening `[`, consuming the closing `]`.
    fn index(&mut self, target: Expr) -> Result<Expr, ParseError> {
        let mut indices = Vec::new();
        loop {
            let negative = self.eat(&TokenKind::Minus);
            match self.next() {
                Some(Token {
                    kind: TokenKind::Int(int),
                    ..
                }) => indices.push(if negative { -int } else { int }),
                Some(token) => return Err(self.unexpected(token, "integer index")),
                None => {
                    return Err(ParseError::UnexpectedEnd {
                        offset: self.end,
                        expected: "integer index".to_string(),
                    })
                }
            }
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RBracket, "`,` or `]`")?;
            return Ok(Expr::Index {
                target: Box::new(target),
                indices,
            });
        }
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        self.or()
    }

    fn or(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.and()?;
        while self.eat(&TokenKind::OrOr) {
            let rhs = self.and()?;
            lhs = binary(BinaryOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.comparison()?;
        while self.eat(&TokenKind::AndAnd) {
            let rhs = self.comparison()?;
            lhs = binary(BinaryOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn comparison(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.additive()?;
        let op = match self.peek_kind() {
            Some(TokenKind::EqEq) => BinaryOp::Eq,
            Some(TokenKind::NotEq) => BinaryOp::Ne,
            Some(TokenKind::Lt) => BinaryOp::Lt,
            Some(TokenKind::Le) => BinaryOp::Le,
            Some(TokenKind::Gt) => BinaryOp::Gt,
            Some(TokenKind::Ge) => BinaryOp::Ge,
            _ => return Ok(lhs),
        };
        self.pos += 1;
        let rhs = self.additive()?;
        Ok(binary(op, lhs, rhs))
    }

    fn additive(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.multiplicative()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                Some(TokenKind::Percent) => BinaryOp::Mod,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&TokenKind::Bang) {
            return Ok(Expr::Not(Box::new(self.unary()?)));
        }
        if self.eat(&TokenKind::Minus) {
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        let mut expr = self.primary()?;
        loop {
            if self.eat(&TokenKind::Dot) {
                expr = self.step(expr)?;
            } else if self.eat(&TokenKind::LBracket) {
                expr = self.index(expr)?;
            } else {
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let Some(token) = self.next() else {
            return Err(ParseError::UnexpectedEnd {
                offset: self.end,
                expected: "expression".to_string(),
            });
        };
        match token.kind {
            TokenKind::Int(int) => Ok(Expr::Literal(Value::from(int))),
            TokenKind::Float(float) => Ok(Expr::Literal(
                serde_json::Number::from_f64(float).map_or(Value::Null, Value::Number),
            )),
            TokenKind::Str(text) => Ok(Expr::Literal(Value::String(text))),
            TokenKind::Dollar => Ok(Expr::Root),
            TokenKind::LParen => {
                let inner = self.expr()?;
                self.expect(TokenKind::RParen, "`)`")?;
                Ok(inner)
            }
            TokenKind::Ident(name) => match name.as_str() {
                "it" => Ok(Expr::It),
                "true" => Ok(Expr::Literal(Value::Bool(true))),
                "false" => Ok(Expr::Literal(Value::Bool(false))),
                "null" => Ok(Expr::Literal(Value::Null)),
                _ => Err(ParseError::UnknownIdentifier {
                    offset: token.offset,
                    name,
                }),
            },
            kind => Err(self.unexpected(Token { kind, offset: token.offset }, "expression")),
        }
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::BinaryOp {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
