//! Trellis
//!
//! Server-side component tree for stateful web UIs: connector identity,
//! dirty tracking and the flush cycle that sends changes to the client.
//!
//! # Example
//! ```rust,ignore
//! use trellis::{Application, Config};
//! use trellis::ui::{ContainerKind, NodeId};
//!
//! let app = Application::new(Config::default());
//! app.with_ui(|ui| {
//!     let layout = ui.create_container(ContainerKind::VerticalLayout);
//!     ui.set_content(NodeId::ROOT, Some(layout))
//! })??;
//! let (json, summary) = app.flush_json(Vec::new())?;
//! ```

mod application;
mod config;

pub use application::Application;
pub use config::{Config, ConfigError};

// Re-export sub-crates for advanced usage
pub use trellis_sync as sync;
pub use trellis_ui as ui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
