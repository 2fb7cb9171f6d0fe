use thiserror::Error;

/// The error type for the [`crate::ScanActor`].
///
/// Failed scan steps are never reported here; they are logged and retried. Only conditions that
/// prevent the loop from running at all end the actor with an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanActorError {
    /// The configured scan interval is zero.
    #[error("Scan interval must be non-zero")]
    ZeroInterval,
}
