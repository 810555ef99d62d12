//! Core vocabulary for the zero site generator.
//!
//! This crate provides the fundamental types and traits shared by every
//! stage of the pipeline:
//! - `Node` - The render tree produced by page components
//! - `Component` trait - The capability a page module must expose to be routed
//! - `Props` - Key-value data handed to components
//! - `SiteOptions` - The recognized configuration surface

mod component;
mod error;
mod node;
mod options;

pub use component::*;
pub use error::*;
pub use node::*;
pub use options::*;
