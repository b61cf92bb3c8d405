use thiserror::Error;

/// Recoverable errors raised at the outer surfaces of the sandbox.
///
/// The simulation core itself never fails: occupied spawns, absent deletes and
/// empty queries are silent no-ops.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CellspaceError {
    #[error("unknown rule `{0}`")]
    UnknownRule(String),
    #[error("invalid frame size {width}x{height}")]
    InvalidFrameSize { width: u32, height: u32 },
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let e = CellspaceError::UnknownRule("glider".into());
        assert_eq!(e.to_string(), "unknown rule `glider`");

        let e = CellspaceError::InvalidFrameSize {
            width: 0,
            height: 10,
        };
        assert!(e.to_string().contains("0x10"));
    }
}
