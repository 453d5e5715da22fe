use thiserror::Error;

/// Errors raised by the card and its editor.
///
/// Rendering never fails: missing or odd host data degrades to placeholders. Only binding a
/// config and explicit editor operations report errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CardError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("order {order} is out of range, expected 1 to {max}")]
    OrderOutOfRange { order: u8, max: u8 },

    #[error("sensor position {index} is out of range, the card has {len} sensors")]
    PositionOutOfRange { index: usize, len: usize },
}
