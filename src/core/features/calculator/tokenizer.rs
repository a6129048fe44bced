use crate::shared::errors::{CommandError, CommandResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.')
}

/// Strip whitespace, map the display glyphs to ASCII operators and reject
/// anything outside `[0-9+\-*/().]`.
pub fn sanitize(expression: &str) -> CommandResult<String> {
    let cleaned: String = expression
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '×' => '*',
            '÷' => '/',
            '−' => '-',
            other => other,
        })
        .collect();

    let rejected: String = cleaned.chars().filter(|c| !is_allowed(*c)).collect();
    if !rejected.is_empty() {
        return Err(CommandError::InvalidCharacters(rejected));
    }

    if cleaned.is_empty() {
        return Err(CommandError::InvalidExpression("Empty expression".to_string()));
    }

    Ok(cleaned)
}

/// Split a sanitized expression into tokens
pub fn tokenize(cleaned: &str) -> CommandResult<Vec<Token>> {
    let bytes = cleaned.as_bytes();
    let mut tokens = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let token = match bytes[i] {
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'0'..=b'9' | b'.' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                let literal = &cleaned[start..i];
                tokens.push(Token::Number(parse_number(literal)?));
                continue;
            }
            other => {
                return Err(CommandError::InvalidCharacters((other as char).to_string()));
            }
        };
        tokens.push(token);
        i += 1;
    }

    Ok(tokens)
}

fn parse_number(literal: &str) -> CommandResult<f64> {
    let dots = literal.matches('.').count();
    if dots > 1 || literal == "." {
        return Err(CommandError::InvalidExpression(format!("Malformed number '{}'", literal)));
    }
    match literal.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(CommandError::InvalidExpression(format!("Number out of range: {}", literal))),
        Err(_) => Err(CommandError::InvalidExpression(format!("Malformed number '{}'", literal))),
    }
}
