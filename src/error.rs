use thiserror::Error;

/// Boxed error reported by an input provider.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error types for driving a machine to completion.
#[derive(Error, Debug)]
pub enum DriveError {
    /// The driver answered this many awaits in a row without seeing an emit
    /// or a halt, reaching its configured fuel.
    #[error("machine stalled after {steps} steps without output")]
    Stalled { steps: usize },

    /// The provider hit an error and reported its channel as exhausted.
    #[error("input provider failed")]
    Provider(#[source] BoxError),
}
