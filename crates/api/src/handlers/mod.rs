//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the [`SessionManager`](platelens_session::SessionManager)
//! in shared state and map errors via [`AppError`](crate::error::AppError).

pub mod dishes;
pub mod menu;
pub mod session;
pub mod styles;
