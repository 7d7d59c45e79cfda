//! Service handlers for bridge messages.
//!
//! This module groups async handlers that operate on the shared `AppContext`.
//! Each handler applies one message to the controller and lets the context
//! publish the resulting side effects.

pub mod config_service;
pub mod log_service;
pub mod mail_service;
pub mod panel_service;

/// Represents a type that is used in all handlers as an application context.
pub(crate) type AppContextHandle = std::sync::Arc<crate::app::AppContext>;
