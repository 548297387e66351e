//! Dish entities and menu-text validation.
//!
//! A [`ParsedDish`] is the raw `{name, description}` pair the gateway
//! extracts from menu text. A [`Dish`] is the session-side entity: the
//! same data plus the synthetic [`DishId`] that keys every session map.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DishId;

/// Maximum accepted menu text length, in characters.
///
/// Generous enough for a multi-page menu; anything larger is almost
/// certainly a mis-paste and would blow the gateway's context anyway.
pub const MAX_MENU_TEXT_CHARS: usize = 20_000;

/// A dish as extracted by the gateway: display name plus free-text
/// description. The description may be empty.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ParsedDish {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A dish entity in the current session.
///
/// Created in bulk when a parse succeeds and immutable thereafter. The
/// `id` is assigned at parse time and is unique per entity even when two
/// dishes share a display name.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Dish {
    pub id: DishId,
    pub name: String,
    pub description: String,
}

impl Dish {
    /// Promote a gateway-parsed dish to a session entity with a fresh
    /// synthetic id.
    pub fn from_parsed(parsed: ParsedDish) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            name: parsed.name,
            description: parsed.description,
        }
    }
}

/// Validate raw menu text before it is sent to the gateway.
///
/// Rules:
/// - Must contain at least one non-whitespace character.
/// - Must not exceed [`MAX_MENU_TEXT_CHARS`] characters.
pub fn validate_menu_text(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(
            "Menu text must not be empty".to_string(),
        ));
    }
    if text.chars().count() > MAX_MENU_TEXT_CHARS {
        return Err(CoreError::Validation(format!(
            "Menu text must not exceed {MAX_MENU_TEXT_CHARS} characters"
        )));
    }
    Ok(())
}
