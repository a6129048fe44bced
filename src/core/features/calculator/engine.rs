//! Basic/scientific calculator state machine

use std::sync::Arc;

use crate::shared::errors::{CommandError, CommandResult};
use crate::shared::notify::{Notifier, TracingNotifier};
use crate::shared::types::{CalculatorSnapshot, HistoryEntry, NotificationKind};

use super::evaluator::{evaluate, Operator};
use super::history::CalculationHistory;
use super::scientific::{Constant, ScientificFunction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    /// Digits extend the display
    Entering,
    /// The next digit starts a fresh number
    WaitingForOperand,
}

/// Shortest round-trip decimal form, never "-0"
pub fn format_display(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

pub struct Calculator {
    display: String,
    previous_operand: String,
    pending_operator: Option<Operator>,
    state: InputState,
    memory: f64,
    history: CalculationHistory,
    notifier: Arc<dyn Notifier>,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(Arc::new(TracingNotifier))
    }
}

impl Calculator {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            display: "0".to_string(),
            previous_operand: String::new(),
            pending_operator: None,
            state: InputState::Entering,
            memory: 0.0,
            history: CalculationHistory::new(),
            notifier,
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn previous_operand(&self) -> &str {
        &self.previous_operand
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending_operator
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn memory(&self) -> f64 {
        self.memory
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.entries()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn snapshot(&self) -> CalculatorSnapshot {
        CalculatorSnapshot {
            display: self.display.clone(),
            previous_operand: self.previous_operand.clone(),
            pending_operator: self.pending_operator.map(|op| op.symbol().to_string()),
            awaiting_new_operand: self.state == InputState::WaitingForOperand,
            memory: self.memory,
            history: self.history.entries(),
        }
    }

    pub fn input_digit(&mut self, digit: char) -> CommandResult<()> {
        if !digit.is_ascii_digit() {
            return self.fail(CommandError::InvalidInput(format!("Not a digit: {}", digit)));
        }

        match self.state {
            InputState::WaitingForOperand => {
                self.display = digit.to_string();
                self.state = InputState::Entering;
            }
            InputState::Entering => {
                if self.display == "0" {
                    self.display = digit.to_string();
                } else {
                    self.display.push(digit);
                }
            }
        }
        Ok(())
    }

    pub fn input_decimal(&mut self) {
        match self.state {
            InputState::WaitingForOperand => {
                self.display = "0.".to_string();
                self.state = InputState::Entering;
            }
            InputState::Entering => {
                if !self.display.contains('.') {
                    self.display.push('.');
                }
            }
        }
    }

    pub fn backspace(&mut self) {
        if self.state == InputState::WaitingForOperand {
            return;
        }
        self.display.pop();
        if self.display.is_empty() || self.display == "-" {
            self.display = "0".to_string();
        }
    }

    /// Resolve any pending operation, then wait for the right-hand operand of `next`
    pub fn perform_operation(&mut self, next: Operator) -> CommandResult<()> {
        let input = self.current_value()?;

        if self.previous_operand.is_empty() {
            self.previous_operand = format_display(input);
        } else if self.pending_operator.is_some() {
            self.resolve_pending(input)?;
        }

        self.pending_operator = Some(next);
        self.state = InputState::WaitingForOperand;
        Ok(())
    }

    /// `=`; does nothing without a pending operation
    pub fn equals(&mut self) -> CommandResult<()> {
        if self.pending_operator.is_none() || self.previous_operand.is_empty() {
            return Ok(());
        }

        let input = self.current_value()?;
        self.resolve_pending(input)?;

        self.pending_operator = None;
        self.previous_operand.clear();
        self.state = InputState::WaitingForOperand;
        Ok(())
    }

    /// Back to the initial display; memory and history are kept
    pub fn clear(&mut self) {
        self.display = "0".to_string();
        self.previous_operand.clear();
        self.pending_operator = None;
        self.state = InputState::Entering;
    }

    pub fn apply_function(&mut self, function: ScientificFunction) -> CommandResult<()> {
        let input = self.current_value()?;
        let result = match function.apply(input) {
            Ok(result) => result,
            Err(e) => return self.fail(e),
        };

        let formatted = format_display(result);
        self.history
            .record(format!("{}({})", function.name(), self.display), formatted.clone());
        tracing::debug!("[Calculator] {}({}) = {}", function, self.display, formatted);

        self.display = formatted;
        self.state = InputState::WaitingForOperand;
        Ok(())
    }

    /// Evaluate a typed expression and show its result
    pub fn evaluate_expression(&mut self, expression: &str) -> CommandResult<f64> {
        let result = match evaluate(expression) {
            Ok(result) => result,
            Err(e) => return self.fail(e),
        };

        let formatted = format_display(result);
        self.history.record(expression.trim(), formatted.clone());
        self.display = formatted;
        self.state = InputState::WaitingForOperand;
        Ok(result)
    }

    pub fn insert_constant(&mut self, constant: Constant) {
        self.display = format_display(constant.value());
        self.state = InputState::WaitingForOperand;
    }

    pub fn memory_store(&mut self) -> CommandResult<()> {
        self.memory = self.current_value()?;
        self.info(&format!("Stored: {}", self.display));
        Ok(())
    }

    pub fn memory_recall(&mut self) {
        self.display = format_display(self.memory);
        self.state = InputState::WaitingForOperand;
    }

    pub fn memory_clear(&mut self) {
        self.memory = 0.0;
        self.info("Memory cleared");
    }

    pub fn memory_add(&mut self) -> CommandResult<()> {
        self.memory += self.current_value()?;
        self.info(&format!("Added {} to memory", self.display));
        Ok(())
    }

    /// Dispatch a keypad label to the matching operation
    pub fn press(&mut self, key: &str) -> CommandResult<()> {
        let key = key.trim();

        let mut chars = key.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_digit() {
                return self.input_digit(c);
            }
        }

        match key {
            "." => self.input_decimal(),
            "=" => self.equals()?,
            "C" | "AC" | "clear" => self.clear(),
            "⌫" | "backspace" => self.backspace(),
            "MS" => self.memory_store()?,
            "MR" => self.memory_recall(),
            "MC" => self.memory_clear(),
            "M+" => self.memory_add()?,
            _ => {
                if let Ok(op) = key.parse::<Operator>() {
                    self.perform_operation(op)?;
                } else if let Ok(constant) = key.parse::<Constant>() {
                    self.insert_constant(constant);
                } else {
                    match key.parse::<ScientificFunction>() {
                        Ok(function) => self.apply_function(function)?,
                        Err(_) => {
                            return self.fail(CommandError::InvalidInput(format!("Unknown key: {}", key)));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn resolve_pending(&mut self, input: f64) -> CommandResult<()> {
        let Some(op) = self.pending_operator else {
            return Ok(());
        };

        let previous = match self.previous_operand.parse::<f64>() {
            Ok(value) => value,
            Err(_) => return self.fail(CommandError::NonFiniteInput(self.previous_operand.clone())),
        };

        let result = match op.apply(previous, input) {
            Ok(result) if result.is_finite() => result,
            Ok(_) => {
                return self.fail(CommandError::InvalidExpression("Invalid calculation result".to_string()));
            }
            Err(e) => return self.fail(e),
        };

        let formatted = format_display(result);
        self.history.record(
            format!("{} {} {}", self.previous_operand, op, self.display),
            formatted.clone(),
        );
        tracing::debug!("[Calculator] {} {} {} = {}", self.previous_operand, op, self.display, formatted);

        self.display = formatted.clone();
        self.previous_operand = formatted;
        Ok(())
    }

    fn current_value(&self) -> CommandResult<f64> {
        match self.display.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => self.fail(CommandError::NonFiniteInput(self.display.clone())),
        }
    }

    fn info(&self, message: &str) {
        self.notifier.notify(NotificationKind::Info, message);
    }

    fn fail<T>(&self, err: CommandError) -> CommandResult<T> {
        self.notifier.notify(NotificationKind::Error, &err.to_string());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::notify::RecordingNotifier;

    fn calculator() -> (Calculator, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        (Calculator::new(Arc::new(notifier.clone())), notifier)
    }

    fn press_all(calc: &mut Calculator, keys: &[&str]) {
        for key in keys {
            calc.press(key).unwrap();
        }
    }

    #[test]
    fn test_initial_state() {
        let (calc, _) = calculator();
        let snap = calc.snapshot();
        assert_eq!(snap.display, "0");
        assert_eq!(snap.previous_operand, "");
        assert!(snap.pending_operator.is_none());
        assert!(!snap.awaiting_new_operand);
        assert_eq!(snap.memory, 0.0);
        assert!(snap.history.is_empty());
    }

    #[test]
    fn test_digit_entry_replaces_leading_zero() {
        let (mut calc, _) = calculator();
        press_all(&mut calc, &["0", "0", "7", "2"]);
        assert_eq!(calc.display(), "72");
    }

    #[test]
    fn test_decimal_once() {
        let (mut calc, _) = calculator();
        press_all(&mut calc, &["1", ".", "5", "."]);
        assert_eq!(calc.display(), "1.5");
        press_all(&mut calc, &["+", "."]);
        assert_eq!(calc.display(), "0.");
        assert_eq!(calc.state(), InputState::Entering);
    }

    #[test]
    fn test_simple_operation() {
        let (mut calc, _) = calculator();
        press_all(&mut calc, &["1", "2", "+", "3", "="]);
        assert_eq!(calc.display(), "15");
        assert_eq!(calc.previous_operand(), "");
        assert!(calc.pending_operator().is_none());
        assert_eq!(calc.state(), InputState::WaitingForOperand);

        let history = calc.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].expression, "12 + 3");
        assert_eq!(history[0].result, "15");
    }

    #[test]
    fn test_chained_operator_resolves_pending() {
        let (mut calc, _) = calculator();
        press_all(&mut calc, &["2", "+", "3", "×"]);
        assert_eq!(calc.display(), "5");
        assert_eq!(calc.previous_operand(), "5");
        assert_eq!(calc.pending_operator(), Some(Operator::Multiply));

        press_all(&mut calc, &["4", "="]);
        assert_eq!(calc.display(), "20");
        assert_eq!(calc.history().len(), 2);
        assert_eq!(calc.history()[0].expression, "5 * 4");
    }

    #[test]
    fn test_operator_while_waiting_still_resolves() {
        let (mut calc, _) = calculator();
        press_all(&mut calc, &["3", "+", "+"]);
        // 3 + 3 with the display reused as the right operand
        assert_eq!(calc.display(), "6");
        assert_eq!(calc.pending_operator(), Some(Operator::Add));
    }

    #[test]
    fn test_equals_without_pending_is_noop() {
        let (mut calc, notifier) = calculator();
        press_all(&mut calc, &["9", "="]);
        assert_eq!(calc.display(), "9");
        assert_eq!(calc.state(), InputState::Entering);
        assert!(calc.history().is_empty());
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn test_division_by_zero_leaves_state() {
        let (mut calc, notifier) = calculator();
        press_all(&mut calc, &["8", "÷", "0"]);
        let before = calc.snapshot();

        assert_eq!(calc.equals().unwrap_err(), CommandError::DivisionByZero);

        let after = calc.snapshot();
        assert_eq!(after.display, before.display);
        assert_eq!(after.previous_operand, "8");
        assert_eq!(after.pending_operator.as_deref(), Some("/"));
        assert!(after.history.is_empty());

        let notes = notifier.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Error);
    }

    #[test]
    fn test_float_display() {
        let (mut calc, _) = calculator();
        press_all(&mut calc, &["0", ".", "1", "+", "0", ".", "2", "="]);
        assert_eq!(calc.display(), "0.30000000000000004");

        press_all(&mut calc, &["C", "1", "÷", "2", "="]);
        assert_eq!(calc.display(), "0.5");
    }

    #[test]
    fn test_negative_zero_displays_as_zero() {
        assert_eq!(format_display(-0.0), "0");
        let (mut calc, _) = calculator();
        calc.evaluate_expression("-0*5").unwrap();
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn test_backspace() {
        let (mut calc, _) = calculator();
        press_all(&mut calc, &["1", "2", "⌫"]);
        assert_eq!(calc.display(), "1");
        calc.backspace();
        assert_eq!(calc.display(), "0");

        calc.evaluate_expression("0-5").unwrap();
        // results are not editable
        calc.backspace();
        assert_eq!(calc.display(), "-5");
    }

    #[test]
    fn test_backspace_lone_sign() {
        let (mut calc, _) = calculator();
        calc.evaluate_expression("0-7").unwrap();
        calc.press("5").unwrap();
        assert_eq!(calc.display(), "5");

        calc.evaluate_expression("0-7").unwrap();
        calc.state = InputState::Entering;
        calc.backspace();
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn test_clear_keeps_memory_and_history() {
        let (mut calc, _) = calculator();
        press_all(&mut calc, &["4", "MS", "+", "1", "=", "5", "+"]);
        calc.clear();

        let snap = calc.snapshot();
        assert_eq!(snap.display, "0");
        assert_eq!(snap.previous_operand, "");
        assert!(snap.pending_operator.is_none());
        assert!(!snap.awaiting_new_operand);
        assert_eq!(snap.memory, 4.0);
        assert_eq!(snap.history.len(), 1);
    }

    #[test]
    fn test_memory_operations() {
        let (mut calc, notifier) = calculator();
        press_all(&mut calc, &["7", "MS", "C", "3", "M+"]);
        assert_eq!(calc.memory(), 10.0);

        press_all(&mut calc, &["C", "MR"]);
        assert_eq!(calc.display(), "10");
        assert_eq!(calc.state(), InputState::WaitingForOperand);

        calc.memory_clear();
        assert_eq!(calc.memory(), 0.0);

        let messages: Vec<String> = notifier.notifications().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["Stored: 7", "Added 3 to memory", "Memory cleared"]);
    }

    #[test]
    fn test_scientific_function() {
        let (mut calc, _) = calculator();
        press_all(&mut calc, &["5", "x!"]);
        assert_eq!(calc.display(), "120");
        assert_eq!(calc.state(), InputState::WaitingForOperand);
        assert_eq!(calc.history()[0].expression, "factorial(5)");

        press_all(&mut calc, &["1", "6", "sqrt"]);
        assert_eq!(calc.display(), "4");
    }

    #[test]
    fn test_scientific_error_leaves_state() {
        let (mut calc, notifier) = calculator();
        press_all(&mut calc, &["0"]);
        let err = calc.apply_function(ScientificFunction::Log).unwrap_err();
        assert!(matches!(err, CommandError::DomainError(_)));
        assert_eq!(calc.display(), "0");
        assert!(calc.history().is_empty());
        assert_eq!(notifier.notifications()[0].message, err.to_string());
    }

    #[test]
    fn test_constants() {
        let (mut calc, _) = calculator();
        calc.press("π").unwrap();
        assert_eq!(calc.display(), std::f64::consts::PI.to_string());
        calc.press("e").unwrap();
        assert_eq!(calc.display(), std::f64::consts::E.to_string());
        assert_eq!(calc.state(), InputState::WaitingForOperand);
    }

    #[test]
    fn test_evaluate_expression_records_history() {
        let (mut calc, _) = calculator();
        assert_eq!(calc.evaluate_expression(" 2 + 3 * 4 ").unwrap(), 14.0);
        assert_eq!(calc.display(), "14");
        assert_eq!(calc.history()[0].expression, "2 + 3 * 4");
    }

    #[test]
    fn test_evaluate_expression_error_notifies() {
        let (mut calc, notifier) = calculator();
        let err = calc.evaluate_expression("2+a").unwrap_err();
        assert!(matches!(err, CommandError::InvalidCharacters(_)));
        assert_eq!(calc.display(), "0");
        assert_eq!(notifier.notifications().len(), 1);
    }

    #[test]
    fn test_history_keeps_ten_newest() {
        let (mut calc, _) = calculator();
        for i in 1..=15 {
            calc.evaluate_expression(&format!("{}+0", i)).unwrap();
        }
        let results: Vec<String> = calc.history().into_iter().map(|e| e.result).collect();
        let expected: Vec<String> = (6..=15).rev().map(|i| i.to_string()).collect();
        assert_eq!(results, expected);

        calc.clear_history();
        assert!(calc.history().is_empty());
    }

    #[test]
    fn test_unknown_key() {
        let (mut calc, notifier) = calculator();
        assert!(matches!(calc.press("%"), Err(CommandError::InvalidInput(_))));
        assert_eq!(notifier.notifications().len(), 1);
    }
}
