use thiserror::Error;

/// The crate-wide error taxonomy.
///
/// Every variant corresponds to a row of the error table: construction
/// failures and width mismatches fail fast at the call site, while
/// `SignalRedriven`/`MultiBlock`/`UninitializedSignal` surface either
/// during elaboration (building the net graph) or at the offending tick.
/// Invalid bits (`x`/`z`) are never represented here; they are a
/// value-level concept carried by [`crate::LogicValue`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("construction error: {0}")]
    Construction(String),

    #[error("width mismatch: expected {expected}, got {actual}")]
    WidthMismatch { expected: usize, actual: usize },

    #[error("index error: {0}")]
    IndexError(String),

    #[error("invalid truncation: {0}")]
    InvalidTruncation(String),

    #[error("invalid value operation: {0}")]
    InvalidValueOperation(String),

    #[error("signal redriven: {0}")]
    SignalRedriven(String),

    #[error("uninitialized signal: {0}")]
    UninitializedSignal(String),

    #[error("illegal configuration: {0}")]
    IllegalConfiguration(String),

    #[error("conditional reused across blocks: {0}")]
    MultiBlock(String),

    #[error("port rules violation: {0}")]
    PortRulesViolation(String),

    #[error("unsupported type: {0}")]
    NonSupportedType(String),
}

/// Crate-wide result alias, mirroring `celox::SimulatorError`'s role in
/// the teacher repository.
pub type Result<T> = std::result::Result<T, Error>;
