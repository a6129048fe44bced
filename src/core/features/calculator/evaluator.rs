//! Precedence-climbing evaluator over the whitelisted token set

use std::fmt;
use std::str::FromStr;

use crate::shared::errors::{CommandError, CommandResult};

use super::tokenizer::{sanitize, tokenize, Token};

/// Parenthesis/unary nesting limit
const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 1,
            Operator::Multiply | Operator::Divide => 2,
        }
    }

    fn from_token(token: Token) -> Option<Self> {
        match token {
            Token::Plus => Some(Operator::Add),
            Token::Minus => Some(Operator::Subtract),
            Token::Star => Some(Operator::Multiply),
            Token::Slash => Some(Operator::Divide),
            _ => None,
        }
    }

    pub fn apply(&self, lhs: f64, rhs: f64) -> CommandResult<f64> {
        match self {
            Operator::Add => Ok(lhs + rhs),
            Operator::Subtract => Ok(lhs - rhs),
            Operator::Multiply => Ok(lhs * rhs),
            Operator::Divide => {
                if rhs == 0.0 {
                    return Err(CommandError::DivisionByZero);
                }
                Ok(lhs / rhs)
            }
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Operator::Add),
            "-" | "−" => Ok(Operator::Subtract),
            "*" | "×" => Ok(Operator::Multiply),
            "/" | "÷" => Ok(Operator::Divide),
            other => Err(CommandError::InvalidInput(format!("Unknown operator: {}", other))),
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0, depth: 0 }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn enter(&mut self) -> CommandResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CommandError::InvalidExpression("Expression is nested too deeply".to_string()));
        }
        Ok(())
    }

    fn parse(mut self) -> CommandResult<f64> {
        let value = self.parse_binary(1)?;
        match self.peek() {
            None => Ok(value),
            Some(Token::RParen) => Err(CommandError::InvalidExpression("Unbalanced ')'".to_string())),
            Some(token) => Err(CommandError::InvalidExpression(format!("Unexpected {:?}", token))),
        }
    }

    fn parse_binary(&mut self, min_precedence: u8) -> CommandResult<f64> {
        let mut lhs = self.parse_unary()?;

        while let Some(op) = self.peek().and_then(Operator::from_token) {
            if op.precedence() < min_precedence {
                break;
            }
            self.next();
            // Left associative: the right side only takes tighter operators
            let rhs = self.parse_binary(op.precedence() + 1)?;
            lhs = op.apply(lhs, rhs)?;
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> CommandResult<f64> {
        match self.peek() {
            Some(Token::Minus) => {
                self.next();
                self.enter()?;
                let value = self.parse_unary()?;
                self.depth -= 1;
                Ok(-value)
            }
            Some(Token::Plus) => {
                self.next();
                self.enter()?;
                let value = self.parse_unary()?;
                self.depth -= 1;
                Ok(value)
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> CommandResult<f64> {
        match self.next() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LParen) => {
                self.enter()?;
                let value = self.parse_binary(1)?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(CommandError::InvalidExpression("Missing ')'".to_string())),
                }
            }
            Some(token) => Err(CommandError::InvalidExpression(format!("Unexpected {:?}", token))),
            None => Err(CommandError::InvalidExpression("Unexpected end of expression".to_string())),
        }
    }
}

/// Evaluate an arithmetic expression
///
/// The character whitelist runs before any parsing, so nothing outside
/// digits, `+ - * /`, parentheses and the decimal point is ever interpreted.
pub fn evaluate(expression: &str) -> CommandResult<f64> {
    let cleaned = sanitize(expression)?;
    let tokens = tokenize(&cleaned)?;
    let result = Parser::new(tokens).parse()?;

    if !result.is_finite() {
        return Err(CommandError::InvalidExpression("Invalid calculation result".to_string()));
    }

    tracing::debug!("[evaluate] {} = {}", cleaned, result);
    Ok(result)
}
