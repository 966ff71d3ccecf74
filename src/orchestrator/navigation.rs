//! The Navigation Rule Table: which process ids may follow which, and when
//! a phase may be terminated.

use crate::error::NavigationError;

/// `from -> {to...}`, `can_terminate_phase`. `from == 0` is the initial
/// (pre-phase) state.
pub fn permitted_next(from: u8) -> &'static [u8] {
    match from {
        0 => &[1],
        1 => &[1, 2],
        2 => &[1, 2, 3],
        3 => &[2, 3],
        _ => &[],
    }
}

pub fn can_terminate_phase(from: u8) -> bool {
    from == 3
}

pub fn is_valid_navigation(from: u8, to: u8) -> bool {
    permitted_next(from).contains(&to)
}

/// Validate a process transition, returning a `NavigationError` carrying
/// `{from, to, phase, rationale}` on failure.
pub fn validate_transition(from: u8, to: u8, phase: u8) -> Result<(), NavigationError> {
    if is_valid_navigation(from, to) {
        return Ok(());
    }
    let allowed = permitted_next(from);
    let rationale = if allowed.is_empty() {
        format!("from P{from} allowed: {{}} (no further transitions)")
    } else {
        let list = allowed.iter().map(|p| format!("P{p}")).collect::<Vec<_>>().join(", ");
        format!("from P{from} allowed: {{{list}}}")
    };
    Err(NavigationError { from, to, phase, rationale })
}
