//! Render tree composition for zero.
//!
//! This crate turns a route table and a location into a render tree:
//! - `compose` - Location boundary, theme, router boundary, shell, routes
//! - `AppShell` - Optional user-supplied wrapper around the page output
//! - `try_render` - Error isolation used at every boundary
//! - `Document` - Full HTML page around a composed tree

mod boundary;
mod compose;
mod document;
mod shell;

pub use boundary::*;
pub use compose::*;
pub use document::*;
pub use shell::*;
