use std::fmt;
use std::str::FromStr;

use crate::shared::errors::{CommandError, CommandResult};

/// Largest n whose factorial fits in an f64
const MAX_FACTORIAL: u32 = 170;

/// Single-argument functions applied to the display value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScientificFunction {
    Sin,
    Cos,
    Tan,
    Log,
    Ln,
    Sqrt,
    Square,
    Factorial,
    Reciprocal,
}

impl ScientificFunction {
    pub const ALL: [ScientificFunction; 9] = [
        ScientificFunction::Sin,
        ScientificFunction::Cos,
        ScientificFunction::Tan,
        ScientificFunction::Log,
        ScientificFunction::Ln,
        ScientificFunction::Sqrt,
        ScientificFunction::Square,
        ScientificFunction::Factorial,
        ScientificFunction::Reciprocal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScientificFunction::Sin => "sin",
            ScientificFunction::Cos => "cos",
            ScientificFunction::Tan => "tan",
            ScientificFunction::Log => "log",
            ScientificFunction::Ln => "ln",
            ScientificFunction::Sqrt => "sqrt",
            ScientificFunction::Square => "square",
            ScientificFunction::Factorial => "factorial",
            ScientificFunction::Reciprocal => "reciprocal",
        }
    }

    /// Trigonometric functions take degrees.
    pub fn apply(&self, value: f64) -> CommandResult<f64> {
        if !value.is_finite() {
            return Err(CommandError::NonFiniteInput(value.to_string()));
        }

        let result = match self {
            ScientificFunction::Sin => value.to_radians().sin(),
            ScientificFunction::Cos => value.to_radians().cos(),
            ScientificFunction::Tan => value.to_radians().tan(),
            ScientificFunction::Log => {
                if value <= 0.0 {
                    return Err(CommandError::DomainError("Invalid input for logarithm".to_string()));
                }
                value.log10()
            }
            ScientificFunction::Ln => {
                if value <= 0.0 {
                    return Err(CommandError::DomainError("Invalid input for natural logarithm".to_string()));
                }
                value.ln()
            }
            ScientificFunction::Sqrt => {
                if value < 0.0 {
                    return Err(CommandError::DomainError("Invalid input for square root".to_string()));
                }
                value.sqrt()
            }
            ScientificFunction::Square => value * value,
            ScientificFunction::Factorial => factorial(value)?,
            ScientificFunction::Reciprocal => {
                if value == 0.0 {
                    return Err(CommandError::DivisionByZero);
                }
                1.0 / value
            }
        };

        if !result.is_finite() {
            return Err(CommandError::DomainError("Result is out of range".to_string()));
        }
        Ok(result)
    }
}

impl fmt::Display for ScientificFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScientificFunction {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sin" => Ok(ScientificFunction::Sin),
            "cos" => Ok(ScientificFunction::Cos),
            "tan" => Ok(ScientificFunction::Tan),
            "log" => Ok(ScientificFunction::Log),
            "ln" => Ok(ScientificFunction::Ln),
            "sqrt" | "√" => Ok(ScientificFunction::Sqrt),
            "square" | "x²" | "x^2" => Ok(ScientificFunction::Square),
            "factorial" | "x!" | "n!" => Ok(ScientificFunction::Factorial),
            "reciprocal" | "1/x" => Ok(ScientificFunction::Reciprocal),
            other => Err(CommandError::InvalidInput(format!("Unknown function: {}", other))),
        }
    }
}

/// Iterative n! for non-negative integers
pub fn factorial(value: f64) -> CommandResult<f64> {
    if value < 0.0 || value.fract() != 0.0 {
        return Err(CommandError::DomainError(
            "Factorial only works with non-negative integers".to_string(),
        ));
    }
    if value > MAX_FACTORIAL as f64 {
        return Err(CommandError::DomainError("Factorial result is too large".to_string()));
    }

    let n = value as u32;
    Ok((2..=n).fold(1.0, |acc, k| acc * k as f64))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn value(&self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }
}

impl FromStr for Constant {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pi" | "PI" | "π" => Ok(Constant::Pi),
            "e" => Ok(Constant::E),
            other => Err(CommandError::InvalidInput(format!("Unknown constant: {}", other))),
        }
    }
}
