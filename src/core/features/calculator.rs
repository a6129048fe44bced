//! Calculator feature
//!
//! Expressions go through a character whitelist, a tokenizer and a
//! precedence-climbing evaluator; nothing is ever handed to a general
//! purpose interpreter. [`Calculator`] layers the keypad state machine,
//! scientific functions, memory and history on top.

pub mod engine;
pub mod evaluator;
pub mod history;
pub mod scientific;
pub mod tokenizer;

pub use engine::{format_display, Calculator, InputState};
pub use evaluator::{evaluate, Operator};
pub use history::{CalculationHistory, MAX_HISTORY_SIZE};
pub use scientific::{factorial, Constant, ScientificFunction};

use crate::shared::errors::CommandResult;

/// Evaluate a one-off expression without a calculator instance
pub fn evaluate_expression(expression: &str) -> CommandResult<f64> {
    evaluate(expression)
}
