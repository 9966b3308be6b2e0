//! # Stencil - Template Layout Editor
//!
//! Stencil places text fields and image placeholders on top of a template
//! background. Items are stored in the background image's own pixel space;
//! the editor shows them on a canvas that fits the image inside a container
//! and converts every drag or resize back into image space.
//!
//! ## Quick Start
//!
//! ```
//! use stencil::geometry::{Size, fit_within};
//! use stencil::template::Template;
//!
//! let template = Template::from_json(r#"{
//!     "id": "badge",
//!     "name": "Conference badge",
//!     "backgroundImageUrl": "https://cdn.example/badge.png",
//!     "items": [
//!         { "id": "name", "type": "text", "label": "Full Name", "x": 120, "y": 80 },
//!         { "id": "photo", "type": "image", "x": 40, "y": 300, "width": 200, "height": 200 }
//!     ]
//! }"#)?;
//! template.validate()?;
//!
//! // A 1600x1200 background shown in an 800x600 container.
//! let fit = fit_within(Size::new(1600.0, 1200.0), Size::new(800.0, 600.0)).unwrap();
//! assert_eq!(fit.scale, 0.5);
//! assert_eq!(fit.to_canvas(template.items[1].y), 150.0);
//! # Ok::<(), stencil::StencilError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`template`] | Template and layout item model, JSON wire format |
//! | [`geometry`] | Sizes, rects, and the image-to-canvas fit |
//! | [`scene`] | Scene capability trait and the built-in [`scene::Surface`] |
//! | [`background`] | Background image sources (HTTP, static) |
//! | [`editor`] | The layout editor: rebuilds and commit propagation |
//! | [`host`] | Async host wiring loads and container resizes |
//! | [`preview`] | Frame rasterizer and PNG output |
//! | [`server`] | HTTP preview/commit API |
//! | [`error`] | Error types |

pub mod background;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod host;
pub mod preview;
pub mod scene;
pub mod server;
pub mod template;

pub use error::StencilError;
