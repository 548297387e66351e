use platelens_core::error::CoreError;
use platelens_core::types::DishId;

/// Domain errors surfaced by session operations.
///
/// Every gateway-facing operation catches underlying transport and
/// protocol failures and re-raises one of these, carrying a
/// human-readable message that names the affected dish where one exists.
/// Raw `reqwest`/serde errors never cross this boundary.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Input failed validation before any gateway contact.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// Menu parsing failed -- gateway failure or uninterpretable output.
    #[error("Failed to parse the menu: {0}")]
    Parse(String),

    /// Image synthesis failed for a dish.
    #[error("Failed to generate an image for {dish}: {reason}")]
    Generation { dish: String, reason: String },

    /// Image editing failed for a dish.
    #[error("Failed to edit the image for {dish}: {reason}")]
    Edit { dish: String, reason: String },

    /// Edit requested before any image exists for the dish. The gateway
    /// is never contacted in this case.
    #[error("No image has been generated for {dish} yet")]
    NoBaseImage { dish: String },

    /// The dish id is not part of the current session.
    #[error("No dish with id {0} in the current session")]
    UnknownDish(DishId),

    /// Another generate or edit job is already in flight for the dish.
    #[error("Another job is already running for {dish}")]
    Busy { dish: String },
}
