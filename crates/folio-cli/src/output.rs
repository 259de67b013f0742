//! Command results, rendered either for people or as JSON.

use serde::Serialize;
use serde_json::Value;

/// What a command produced. The caller decides how to print it.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub human: String,
    pub json: Value,
    pub exit_code: i32,
}

impl Outcome {
    /// Successful outcome with a text rendering and a structured payload.
    pub fn new(human: impl Into<String>, payload: &impl Serialize) -> crate::Result<Self> {
        Ok(Self {
            human: human.into(),
            json: serde_json::to_value(payload)?,
            exit_code: 0,
        })
    }

    #[must_use]
    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// Text to print on stdout.
    pub fn render(&self, json: bool) -> crate::Result<String> {
        if json {
            Ok(serde_json::to_string_pretty(&self.json)?)
        } else {
            Ok(self.human.clone())
        }
    }
}
