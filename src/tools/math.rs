//! Arithmetic and descriptive-statistics tools.

use crate::error::{Result, RostraError};

/// Evaluate a simple arithmetic expression.
///
/// Only digits, `+ - * /`, parentheses, `.` and spaces are allowed; anything
/// else is rejected with a descriptive error rather than a panic. Standard
/// operator precedence applies, so `2+2*5` evaluates to 12.
pub fn calculator(expr: &str) -> Result<String> {
    if expr.is_empty() || !expr.chars().all(|c| "0123456789+-*/(). ".contains(c)) {
        return Err(RostraError::tool(
            "calculator",
            "only digits, + - * /, parentheses and spaces are supported",
        ));
    }
    let mut parser = Parser::new(expr);
    let value = parser.parse_expr()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(RostraError::tool(
            "calculator",
            format!("unexpected trailing input at position {}", parser.pos),
        ));
    }
    Ok(format!("result: {}", format_number(value)))
}

/// Mean, population standard deviation, min and max of a sample.
pub fn quick_stats(numbers: &[f64]) -> Result<String> {
    if numbers.is_empty() {
        return Err(RostraError::tool("quick_stats", "empty input list"));
    }
    let n = numbers.len() as f64;
    let mean = numbers.iter().sum::<f64>() / n;
    let variance = numbers.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let min = numbers.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = numbers.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Ok(format!(
        "mean={mean:.3}, std={:.3}, min={}, max={}",
        variance.sqrt(),
        format_number(min),
        format_number(max),
    ))
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Recursive-descent parser over the allowed arithmetic subset.
struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
        }
    }

    fn parse_expr(&mut self) -> Result<f64> {
        let mut value = self.parse_term()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some('+') => {
                    self.pos += 1;
                    value += self.parse_term()?;
                }
                Some('-') => {
                    self.pos += 1;
                    value -= self.parse_term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn parse_term(&mut self) -> Result<f64> {
        let mut value = self.parse_factor()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some('*') => {
                    self.pos += 1;
                    value *= self.parse_factor()?;
                }
                Some('/') => {
                    self.pos += 1;
                    let divisor = self.parse_factor()?;
                    if divisor == 0.0 {
                        return Err(RostraError::tool("calculator", "division by zero"));
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn parse_factor(&mut self) -> Result<f64> {
        self.skip_ws();
        match self.peek() {
            Some('-') => {
                self.pos += 1;
                Ok(-self.parse_factor()?)
            }
            Some('(') => {
                self.pos += 1;
                let value = self.parse_expr()?;
                self.skip_ws();
                if self.peek() != Some(')') {
                    return Err(RostraError::tool("calculator", "unbalanced parentheses"));
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(),
            _ => Err(RostraError::tool(
                "calculator",
                format!("expected a number at position {}", self.pos),
            )),
        }
    }

    fn parse_number(&mut self) -> Result<f64> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse()
            .map_err(|_| RostraError::tool("calculator", format!("invalid number: {text}")))
    }

    fn skip_ws(&mut self) {
        while self.peek() == Some(' ') {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}
