//! Constant expression evaluation
//!
//! Values of `#define` lines, explicit enumerator values and array lengths
//! are small integer expressions. This module evaluates exactly that subset:
//! integer literals, references to previously defined constants, unary
//! `+ - ~`, and the binary operators `| ^ & << >> + - * / // %` with C
//! precedence and parentheses. Division floors toward negative infinity.

use thiserror::Error;

/// Constant expression errors. Always fatal for the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstEvalError {
    #[error("unknown constant '{0}'")]
    UnknownConstant(String),
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("invalid integer literal '{0}'")]
    InvalidLiteral(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("arithmetic overflow")]
    Overflow,
}

/// Source of named constant values.
pub trait ConstantLookup {
    fn constant(&self, name: &str) -> Option<i64>;
}

impl ConstantLookup for indexmap::IndexMap<String, i64> {
    fn constant(&self, name: &str) -> Option<i64> {
        self.get(name).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number(i64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Tilde,
    Or,
    Xor,
    And,
    LeftShift,
    RightShift,
    LeftParen,
    RightParen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Or,
    Xor,
    And,
    LeftShift,
    RightShift,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnaryOp {
    Plus,
    Minus,
    Tilde,
}

#[derive(Debug)]
enum Expr {
    Number(i64),
    Identifier(String),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Unary(UnaryOp, Box<Expr>),
}

/// Evaluate `text` against the constants known so far.
pub fn evaluate(text: &str, constants: &dyn ConstantLookup) -> Result<i64, ConstEvalError> {
    let tokens = tokenize(text)?;
    let mut parser = ExpressionParser { tokens: &tokens, pos: 0 };
    let expr = parser.parse_expression()?;
    if let Some(tok) = parser.tokens.get(parser.pos) {
        return Err(ConstEvalError::UnexpectedToken(format!("{:?}", tok)));
    }
    expr.evaluate(constants)
}

/// Rewrite a C length expression into the host language spelling.
///
/// `a][b` (a flattened two-dimensional size) becomes a product and `/`
/// becomes floor division.
pub fn host_expression(text: &str) -> String {
    let text = text.replace("][", " * ");
    if text.contains('/') && !text.contains("//") {
        text.replace('/', "//")
    } else {
        text
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, ConstEvalError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if c.is_ascii_digit() {
            let start = i;
            while i < bytes.len() && (bytes[i] as char).is_ascii_alphanumeric() {
                i += 1;
            }
            tokens.push(Token::Number(parse_literal(&text[start..i])?));
            continue;
        }
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < bytes.len() && ((bytes[i] as char).is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            tokens.push(Token::Ident(text[start..i].to_string()));
            continue;
        }
        let next = bytes.get(i + 1).map(|b| *b as char);
        let (tok, width) = match (c, next) {
            ('<', Some('<')) => (Token::LeftShift, 2),
            ('>', Some('>')) => (Token::RightShift, 2),
            // Floor division written in host syntax
            ('/', Some('/')) => (Token::Slash, 2),
            ('+', _) => (Token::Plus, 1),
            ('-', _) => (Token::Minus, 1),
            ('*', _) => (Token::Star, 1),
            ('/', _) => (Token::Slash, 1),
            ('%', _) => (Token::Percent, 1),
            ('~', _) => (Token::Tilde, 1),
            ('|', _) => (Token::Or, 1),
            ('^', _) => (Token::Xor, 1),
            ('&', _) => (Token::And, 1),
            ('(', _) => (Token::LeftParen, 1),
            (')', _) => (Token::RightParen, 1),
            _ => return Err(ConstEvalError::UnexpectedToken(c.to_string())),
        };
        tokens.push(tok);
        i += width;
    }
    Ok(tokens)
}

/// Parse a C integer literal: decimal, `0x` hex or leading-zero octal, with
/// any `u`/`l` suffix ignored.
fn parse_literal(text: &str) -> Result<i64, ConstEvalError> {
    let digits = text.trim_end_matches(['u', 'U', 'l', 'L']);
    let parsed = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else if digits.len() > 1 && digits.starts_with('0') {
        i64::from_str_radix(&digits[1..], 8)
    } else {
        digits.parse::<i64>()
    };
    parsed.map_err(|_| ConstEvalError::InvalidLiteral(text.to_string()))
}

/// Precedence-climbing parser over the token list
struct ExpressionParser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> ExpressionParser<'a> {
    fn parse_expression(&mut self) -> Result<Expr, ConstEvalError> {
        self.parse_bitwise_or()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn binary_level(
        &mut self,
        ops: &[(Token, BinaryOp)],
        next: fn(&mut Self) -> Result<Expr, ConstEvalError>,
    ) -> Result<Expr, ConstEvalError> {
        let mut left = next(self)?;
        while let Some(tok) = self.peek() {
            let Some((_, op)) = ops.iter().find(|(t, _)| t == tok) else {
                break;
            };
            let op = *op;
            self.pos += 1;
            let right = next(self)?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_bitwise_or(&mut self) -> Result<Expr, ConstEvalError> {
        self.binary_level(&[(Token::Or, BinaryOp::Or)], Self::parse_bitwise_xor)
    }

    fn parse_bitwise_xor(&mut self) -> Result<Expr, ConstEvalError> {
        self.binary_level(&[(Token::Xor, BinaryOp::Xor)], Self::parse_bitwise_and)
    }

    fn parse_bitwise_and(&mut self) -> Result<Expr, ConstEvalError> {
        self.binary_level(&[(Token::And, BinaryOp::And)], Self::parse_shift)
    }

    fn parse_shift(&mut self) -> Result<Expr, ConstEvalError> {
        self.binary_level(
            &[(Token::LeftShift, BinaryOp::LeftShift), (Token::RightShift, BinaryOp::RightShift)],
            Self::parse_additive,
        )
    }

    fn parse_additive(&mut self) -> Result<Expr, ConstEvalError> {
        self.binary_level(
            &[(Token::Plus, BinaryOp::Plus), (Token::Minus, BinaryOp::Minus)],
            Self::parse_multiplicative,
        )
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ConstEvalError> {
        self.binary_level(
            &[
                (Token::Star, BinaryOp::Star),
                (Token::Slash, BinaryOp::Slash),
                (Token::Percent, BinaryOp::Percent),
            ],
            Self::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> Result<Expr, ConstEvalError> {
        let op = match self.peek() {
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Minus,
            Some(Token::Tilde) => UnaryOp::Tilde,
            _ => return self.parse_primary(),
        };
        self.pos += 1;
        let operand = self.parse_unary()?;
        Ok(Expr::Unary(op, Box::new(operand)))
    }

    fn parse_primary(&mut self) -> Result<Expr, ConstEvalError> {
        let tok = self.peek().cloned().ok_or(ConstEvalError::UnexpectedEnd)?;
        self.pos += 1;
        match tok {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::Ident(name) => Ok(Expr::Identifier(name)),
            Token::LeftParen => {
                let inner = self.parse_expression()?;
                match self.peek() {
                    Some(Token::RightParen) => {
                        self.pos += 1;
                        Ok(inner)
                    }
                    Some(other) => Err(ConstEvalError::UnexpectedToken(format!("{:?}", other))),
                    None => Err(ConstEvalError::UnexpectedEnd),
                }
            }
            other => Err(ConstEvalError::UnexpectedToken(format!("{:?}", other))),
        }
    }
}

impl Expr {
    fn evaluate(&self, constants: &dyn ConstantLookup) -> Result<i64, ConstEvalError> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Identifier(name) => constants
                .constant(name)
                .ok_or_else(|| ConstEvalError::UnknownConstant(name.clone())),
            Expr::Unary(op, operand) => {
                let o = operand.evaluate(constants)?;
                match op {
                    UnaryOp::Plus => Ok(o),
                    UnaryOp::Minus => o.checked_neg().ok_or(ConstEvalError::Overflow),
                    UnaryOp::Tilde => Ok(!o),
                }
            }
            Expr::Binary(op, left, right) => {
                let l = left.evaluate(constants)?;
                let r = right.evaluate(constants)?;
                match op {
                    BinaryOp::Or => Ok(l | r),
                    BinaryOp::Xor => Ok(l ^ r),
                    BinaryOp::And => Ok(l & r),
                    BinaryOp::LeftShift => u32::try_from(r)
                        .ok()
                        .and_then(|s| l.checked_shl(s))
                        .ok_or(ConstEvalError::Overflow),
                    BinaryOp::RightShift => u32::try_from(r)
                        .ok()
                        .and_then(|s| l.checked_shr(s))
                        .ok_or(ConstEvalError::Overflow),
                    BinaryOp::Plus => l.checked_add(r).ok_or(ConstEvalError::Overflow),
                    BinaryOp::Minus => l.checked_sub(r).ok_or(ConstEvalError::Overflow),
                    BinaryOp::Star => l.checked_mul(r).ok_or(ConstEvalError::Overflow),
                    BinaryOp::Slash => floor_div(l, r),
                    BinaryOp::Percent => {
                        let q = floor_div(l, r)?;
                        Ok(l - q * r)
                    }
                }
            }
        }
    }
}

fn floor_div(l: i64, r: i64) -> Result<i64, ConstEvalError> {
    if r == 0 {
        return Err(ConstEvalError::DivisionByZero);
    }
    let q = l.checked_div(r).ok_or(ConstEvalError::Overflow)?;
    if l % r != 0 && ((l < 0) != (r < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}
