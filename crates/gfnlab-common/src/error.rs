use thiserror::Error;

/// Failure causes of one GFN evaluation.
///
/// Every variant is reported to the user inline; none of them is fatal to
/// the process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GfnError {
    /// A non-empty weight field is not a number. `position` is 1-based,
    /// matching the `w1..w6` form fields.
    #[error("could not convert weight w{position} to a number: '{value}'")]
    Parse { position: usize, value: String },

    #[error("Total weight is zero. Please enter valid weights.")]
    ZeroWeight,

    /// Chart rendering or email dispatch failed after a successful
    /// computation.
    #[error("Could not send the result: {0}")]
    Notification(String),
}

impl GfnError {
    /// True for failures that happen after the report was computed.
    pub fn is_notification(&self) -> bool {
        matches!(self, GfnError::Notification(_))
    }
}

pub type Result<T> = std::result::Result<T, GfnError>;
