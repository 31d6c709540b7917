//! # aynorica-renderer
//!
//! Tera-based renderer that turns an Aynorica registry into the Markdown
//! network report.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use aynorica_core::{NodeId, Registry};
//! use aynorica_renderer::NetworkRenderer;
//!
//! fn print_network(registry: &Registry, current: Option<&NodeId>) {
//!     if let Ok(renderer) = NetworkRenderer::new() {
//!         if let Ok(report) = renderer.render(registry, current) {
//!             println!("{report}");
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::{NetworkContext, NodeCtx, NodeMarker};
pub use engine::{render_network, NetworkRenderer};
pub use error::RenderError;
