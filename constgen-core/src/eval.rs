//! Constant integer expression evaluator.
//!
//! Deliberately small: integer literals, parentheses and the C operators
//! that show up in header constants. Anything else (identifiers, casts,
//! comparisons, floating point) is a malformed expression.
//!
//! Precedence, loosest first:
//!
//! ```text
//! |   ^   &   << >>   + -   * / %   unary - + ~ !   ( )
//! ```

use crate::error::{ConstgenError, ConstgenResult};

/// Maximum nesting of parentheses and unary operators.
const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Int(i128),
    Op(Op),
    LParen,
    RParen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Or,
    Xor,
    And,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Not,
    LogicalNot,
}

/// Evaluate `expression` to an integer.
pub fn evaluate(expression: &str) -> ConstgenResult<i128> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
        source: expression,
    };
    let value = parser.parse_or()?;
    if parser.pos != tokens.len() {
        return Err(parser.error("unexpected trailing tokens"));
    }
    Ok(value)
}

fn tokenize(expression: &str) -> ConstgenResult<Vec<Token>> {
    let bytes = expression.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b' ' | b'\t' | b'\r' | b'\n' => i += 1,
            b'0'..=b'9' => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
                    i += 1;
                }
                tokens.push(Token::Int(parse_literal(&expression[start..i], expression)?));
            }
            b'(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            b'<' | b'>' => {
                if bytes.get(i + 1) != Some(&c) {
                    return Err(ConstgenError::malformed(
                        expression,
                        "comparison operators are not supported",
                    ));
                }
                tokens.push(Token::Op(if c == b'<' { Op::Shl } else { Op::Shr }));
                i += 2;
            }
            _ => {
                let op = match c {
                    b'|' => Op::Or,
                    b'^' => Op::Xor,
                    b'&' => Op::And,
                    b'+' => Op::Add,
                    b'-' => Op::Sub,
                    b'*' => Op::Mul,
                    b'/' => Op::Div,
                    b'%' => Op::Rem,
                    b'~' => Op::Not,
                    b'!' => Op::LogicalNot,
                    _ => {
                        let rest: String = expression[i..].chars().take(16).collect();
                        return Err(ConstgenError::malformed(
                            expression,
                            format!("unexpected input at '{}'", rest),
                        ));
                    }
                };
                // `||`, `&&` and `!=` are logical/comparison forms
                if (matches!(op, Op::Or | Op::And) && bytes.get(i + 1) == Some(&c))
                    || (op == Op::LogicalNot && bytes.get(i + 1) == Some(&b'='))
                {
                    return Err(ConstgenError::malformed(
                        expression,
                        "logical and comparison operators are not supported",
                    ));
                }
                tokens.push(Token::Op(op));
                i += 1;
            }
        }
    }

    Ok(tokens)
}

/// Parse a C integer literal: decimal, `0x` hex, `0b` binary or
/// leading-zero octal. Suffixes must already be stripped.
fn parse_literal(text: &str, expression: &str) -> ConstgenResult<i128> {
    let (digits, radix) = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        (hex, 16)
    } else if let Some(bin) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        (bin, 2)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };

    i128::from_str_radix(digits, radix).map_err(|_| {
        ConstgenError::malformed(expression, format!("invalid integer literal '{}'", text))
    })
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    source: &'a str,
}

impl Parser<'_> {
    fn error(&self, message: impl Into<String>) -> ConstgenError {
        ConstgenError::malformed(self.source, message)
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    /// Consume the next token if it is one of `ops`.
    fn eat_op(&mut self, ops: &[Op]) -> Option<Op> {
        match self.peek() {
            Some(Token::Op(op)) if ops.contains(&op) => {
                self.pos += 1;
                Some(op)
            }
            _ => None,
        }
    }

    fn parse_or(&mut self) -> ConstgenResult<i128> {
        let mut lhs = self.parse_xor()?;
        while self.eat_op(&[Op::Or]).is_some() {
            lhs |= self.parse_xor()?;
        }
        Ok(lhs)
    }

    fn parse_xor(&mut self) -> ConstgenResult<i128> {
        let mut lhs = self.parse_and()?;
        while self.eat_op(&[Op::Xor]).is_some() {
            lhs ^= self.parse_and()?;
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> ConstgenResult<i128> {
        let mut lhs = self.parse_shift()?;
        while self.eat_op(&[Op::And]).is_some() {
            lhs &= self.parse_shift()?;
        }
        Ok(lhs)
    }

    fn parse_shift(&mut self) -> ConstgenResult<i128> {
        let mut lhs = self.parse_additive()?;
        while let Some(op) = self.eat_op(&[Op::Shl, Op::Shr]) {
            let rhs = self.parse_additive()?;
            let amount = u32::try_from(rhs)
                .ok()
                .filter(|n| *n < i128::BITS)
                .ok_or_else(|| self.error(format!("shift amount {} out of range", rhs)))?;
            lhs = if op == Op::Shl {
                lhs.checked_shl(amount)
                    .filter(|v| v >> amount == lhs)
                    .ok_or_else(|| self.error("shift overflow"))?
            } else {
                lhs >> amount
            };
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> ConstgenResult<i128> {
        let mut lhs = self.parse_multiplicative()?;
        while let Some(op) = self.eat_op(&[Op::Add, Op::Sub]) {
            let rhs = self.parse_multiplicative()?;
            lhs = if op == Op::Add {
                lhs.checked_add(rhs)
            } else {
                lhs.checked_sub(rhs)
            }
            .ok_or_else(|| self.error("arithmetic overflow"))?;
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> ConstgenResult<i128> {
        let mut lhs = self.parse_unary()?;
        while let Some(op) = self.eat_op(&[Op::Mul, Op::Div, Op::Rem]) {
            let rhs = self.parse_unary()?;
            if op != Op::Mul && rhs == 0 {
                return Err(self.error("division by zero"));
            }
            lhs = match op {
                Op::Mul => lhs.checked_mul(rhs),
                Op::Div => lhs.checked_div(rhs),
                _ => lhs.checked_rem(rhs),
            }
            .ok_or_else(|| self.error("arithmetic overflow"))?;
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> ConstgenResult<i128> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("expression nested too deeply"));
        }
        self.depth += 1;
        let value = self.parse_unary_inner();
        self.depth -= 1;
        value
    }

    fn parse_unary_inner(&mut self) -> ConstgenResult<i128> {
        match self.eat_op(&[Op::Sub, Op::Add, Op::Not, Op::LogicalNot]) {
            Some(Op::Sub) => self
                .parse_unary()?
                .checked_neg()
                .ok_or_else(|| self.error("arithmetic overflow")),
            Some(Op::Add) => self.parse_unary(),
            Some(Op::Not) => Ok(!self.parse_unary()?),
            Some(_) => Ok(i128::from(self.parse_unary()? == 0)),
            None => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> ConstgenResult<i128> {
        match self.peek() {
            Some(Token::Int(value)) => {
                self.pos += 1;
                Ok(value)
            }
            Some(Token::LParen) => {
                self.pos += 1;
                let value = self.parse_or()?;
                if self.peek() != Some(Token::RParen) {
                    return Err(self.error("missing closing parenthesis"));
                }
                self.pos += 1;
                Ok(value)
            }
            Some(token) => Err(self.error(format!("unexpected token {:?}", token))),
            None => Err(self.error("unexpected end of expression")),
        }
    }
}
