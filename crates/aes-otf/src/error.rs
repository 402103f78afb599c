//! Error type for the cipher core.

use thiserror::Error;

/// All errors the cipher core can produce.
///
/// The core is pure computation; the only failure surface is parameter
/// validation for the round-oriented entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CipherError {
    /// Encryption was requested over a round count outside `1..=10`.
    #[error("round count {0} is outside the supported range 1..=10")]
    RoundCount(usize),
    /// A key-schedule step was requested for a round index outside `0..=9`;
    /// the schedule has exactly ten transitions.
    #[error("round index {0} is outside the supported range 0..=9")]
    RoundIndex(usize),
}
