//! Notification controller runtime and public API surface.
//!
//! This crate owns the applet's state machine and the log scrollback, routes
//! bridge messages to service handlers, and launches the commands the
//! controller decides to fire.

mod app;
pub mod config;
pub mod controller;
pub mod launcher;
pub mod log_store;
mod runtime;
mod services;
pub mod state;

pub use crate::controller::{Action, NotificationController, Outcome};
pub use crate::launcher::{ActionLauncher, CommandLauncher, LaunchError};
pub use crate::log_store::LogStore;
pub use crate::runtime::{Backend, run};
pub use crate::state::NotificationState;
