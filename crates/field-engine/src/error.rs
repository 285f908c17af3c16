//! Error types for field-engine operations.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// Malformed or out-of-range input (time of day, weekday token, counts).
    #[error("Validation error: {0}")]
    Validation(String),

    /// An availability response that does not have the expected shape.
    #[error("Data shape error: {0}")]
    DataShape(String),

    /// No eligible field was free at the primary time or any alternate.
    #[error("{}", no_availability_message(primary, alternates))]
    NoAvailability {
        primary: String,
        alternates: Vec<String>,
    },

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

pub type Result<T> = std::result::Result<T, FieldError>;

fn no_availability_message(primary: &str, alternates: &[String]) -> String {
    if alternates.is_empty() {
        return format!("No fields available at {}", primary);
    }
    format!(
        "No fields available at {} or any alternate times: {}",
        primary,
        alternates.join(", ")
    )
}
