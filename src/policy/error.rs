use thiserror::Error;

/// Why a policy operation declined to act.
///
/// These are control signals, not faults: callers treat them as "nothing
/// happened" and carry on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum StateChangeError {
    #[error("requested state equals current state")]
    StateUnchanged,
    #[error("window is not allowed to perform this operation")]
    InvalidCaller,
    #[error("window is not managed")]
    NotManaged,
}
