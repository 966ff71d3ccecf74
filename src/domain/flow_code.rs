//! FlowCode: the append-only audit string `S<1-5> P<1-3> X`.
//!
//! ```text
//! flow      ::= token*
//! token     ::= phase | process | error
//! phase     ::= "S" digit15
//! process   ::= "P" digit13
//! error     ::= "X"
//! ```
//! Parse is total: any invalid input is a parse error. The stream is
//! append-only and never mutated retroactively.

use crate::error::ObotError;

/// A single decoded flow-code token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowToken {
    PhaseEntry(u8),
    ProcessEntry(u8),
    Error,
}

/// The append-only flow code. Internally a `String`; callers never see a
/// mutation API beyond the two append operations and `mark_error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FlowCode(String);

impl FlowCode {
    pub fn new() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn append_phase(&mut self, phase_id: u8) {
        debug_assert!((1..=5).contains(&phase_id));
        self.0.push('S');
        self.0.push_str(&phase_id.to_string());
    }

    pub fn append_process(&mut self, process_id: u8) {
        debug_assert!((1..=3).contains(&process_id));
        self.0.push('P');
        self.0.push_str(&process_id.to_string());
    }

    pub fn append_error(&mut self) {
        self.0.push('X');
    }

    /// Parse the flow code into its sequence of tokens. Total: any
    /// malformed substring is a parse error, never a silent skip.
    pub fn parse(&self) -> Result<Vec<FlowToken>, ObotError> {
        parse(&self.0)
    }
}

impl std::fmt::Display for FlowCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn parse(input: &str) -> Result<Vec<FlowToken>, ObotError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            'X' => {
                tokens.push(FlowToken::Error);
                i += 1;
            }
            'S' | 'P' => {
                let is_phase = chars[i] == 'S';
                let digit = chars.get(i + 1).copied().ok_or_else(|| {
                    ObotError::Parse(format!("truncated token at offset {i}: expected a digit after '{}'", chars[i]))
                })?;
                let n = digit.to_digit(10).ok_or_else(|| {
                    ObotError::Parse(format!("non-digit '{digit}' at offset {}", i + 1))
                })? as u8;
                if is_phase {
                    if !(1..=5).contains(&n) {
                        return Err(ObotError::Parse(format!("phase digit out of range 1..5: {n}")));
                    }
                    tokens.push(FlowToken::PhaseEntry(n));
                } else {
                    if !(1..=3).contains(&n) {
                        return Err(ObotError::Parse(format!("process digit out of range 1..3: {n}")));
                    }
                    tokens.push(FlowToken::ProcessEntry(n));
                }
                i += 2;
            }
            other => return Err(ObotError::Parse(format!("unexpected character '{other}' at offset {i}"))),
        }
    }
    Ok(tokens)
}
