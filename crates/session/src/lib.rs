//! Session orchestration for the menu photography service.
//!
//! One [`SessionManager`](manager::SessionManager) owns all state for a
//! browser session -- the parsed dish list, the per-dish image cache, and
//! the per-dish job flags -- and drives the four operations (parse,
//! generate, edit, generate-all) against a
//! [`MenuGateway`](platelens_gemini::MenuGateway) implementation. The
//! presentation layer reads state exclusively
//! through [`SessionSnapshot`](state::SessionSnapshot).

pub mod error;
pub mod manager;
pub mod state;

pub use error::SessionError;
pub use manager::{BatchOutcome, SessionManager};
pub use state::{JobState, SessionSnapshot};
