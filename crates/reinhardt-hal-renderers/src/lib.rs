//! Response renderers for HAL documents
//!
//! ## Example
//!
//! ```
//! use reinhardt_hal_renderers::{HalJsonRenderer, Renderer};
//!
//! let renderer = HalJsonRenderer::new();
//! assert_eq!(renderer.media_type(), "application/hal+json");
//! assert_eq!(renderer.format(), Some("hal"));
//! ```

pub mod hal_json;
pub mod renderer;

pub use hal_json::HalJsonRenderer;
pub use renderer::{RenderError, RenderResult, Renderer, RendererContext};
