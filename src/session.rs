use crate::error_handling::*;
use crate::evaluating::{evaluate, AngleMode};
use crate::parsing::parse;
use std::collections::VecDeque;

/// Entries kept by `history` before the oldest is evicted.
pub const HISTORY_CAPACITY: usize = 20;
/// Decimal digits printed by default and the largest accepted setting.
pub const DEFAULT_PRECISION: usize = 12;
pub const MAX_PRECISION: usize = 50;
/// Trig works in radians until `mode deg` says otherwise.
pub const DEFAULT_ANGLE_MODE: AngleMode = AngleMode::radians;

pub struct Session {
    pub last_answer: f64,
    pub memory: f64,
    pub angle_mode: AngleMode,
    pub precision: usize,
    pub history: VecDeque<(String, f64)>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            last_answer: 0.0,
            memory: 0.0,
            angle_mode: DEFAULT_ANGLE_MODE,
            precision: DEFAULT_PRECISION,
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Parses and evaluates one statement. Only a successful evaluation
    /// touches the session: it becomes `ans` and lands in the history.
    pub fn evaluate_line(&mut self, input: &str) -> Result<f64> {
        let node = parse(input)?;
        let value = evaluate(&node, self)?;

        self.last_answer = value;
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back((input.trim().into(), value));
        Ok(value)
    }

    pub fn set_angle_mode(&mut self, argument: &str) -> Result<()> {
        self.angle_mode = match argument {
            "deg" => AngleMode::degrees,
            "rad" => AngleMode::radians,
            _ => return Err(CalcError::value("mode must be 'deg' or 'rad'".into())),
        };
        Ok(())
    }

    pub fn set_precision(&mut self, argument: &str) -> Result<()> {
        let precision = argument.parse().map_err(|_| {
            CalcError::value(format!("precision must be a non-negative integer, got '{argument}'"))
        })?;
        if precision > MAX_PRECISION {
            return Err(CalcError::value(format!("precision must be at most {MAX_PRECISION}")));
        }
        self.precision = precision;
        Ok(())
    }

    /// `m+`/`m-`: shifts the memory register by an expression, or by `ans`
    /// when the expression is omitted.
    pub fn shift_memory(&mut self, argument: &str, subtracts: bool) -> Result<f64> {
        let delta = if argument.trim().is_empty() {
            self.last_answer
        } else {
            let node = parse(argument)?;
            evaluate(&node, self)?
        };
        if subtracts {
            self.memory -= delta;
        } else {
            self.memory += delta;
        }
        Ok(self.memory)
    }

    pub fn clear_memory(&mut self) {
        self.memory = 0.0;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
