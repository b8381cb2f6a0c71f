//! # Console Output
//!
//! ANSI color palette and the user-facing message templates.

use std::fmt;

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Set of colors used when rendering status and error messages
///
/// A disabled palette renders every value unchanged, which keeps log files
/// and tests free of escape codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Palette that emits ANSI escape codes
    pub fn ansi() -> Self {
        Self::new(true)
    }

    /// Palette that emits no escape codes
    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn red<T: fmt::Display>(&self, value: T) -> Painted<T> {
        self.paint(RED, value)
    }

    pub fn green<T: fmt::Display>(&self, value: T) -> Painted<T> {
        self.paint(GREEN, value)
    }

    pub fn yellow<T: fmt::Display>(&self, value: T) -> Painted<T> {
        self.paint(YELLOW, value)
    }

    pub fn cyan<T: fmt::Display>(&self, value: T) -> Painted<T> {
        self.paint(CYAN, value)
    }

    fn paint<T: fmt::Display>(&self, color: &'static str, value: T) -> Painted<T> {
        Painted {
            color: if self.enabled { Some(color) } else { None },
            value,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::ansi()
    }
}

/// A value wrapped in an optional color
pub struct Painted<T> {
    color: Option<&'static str>,
    value: T,
}

impl<T: fmt::Display> fmt::Display for Painted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.color {
            Some(color) => write!(f, "{}{}{}", color, self.value, RESET),
            None => write!(f, "{}", self.value),
        }
    }
}

/// Final message printed after a successful run, e.g. "3 SEO images generated!"
pub fn success_message(palette: &Palette, count: usize, label: &str) -> String {
    format!("{} {} generated!", palette.green(count), label)
}
