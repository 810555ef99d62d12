//! Filesystem-shaped routing for the zero site generator.
//!
//! Page modules are named like files; their names become routes:
//!
//! ```text
//! pages/
//! ├── index.md        -> /
//! ├── about.md        -> /about
//! ├── _draft.md       (ignored, leading underscore)
//! └── blog/
//!     ├── index.md    -> /blog/
//!     └── hello.md    -> /blog/hello
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use zero_router::prelude::*;
//!
//! let records = discover(&source, options.match_pattern.as_deref())?;
//! let routes = build_routes(records, &IndexName::from_filename(None)).await?;
//!
//! if let Some(route) = routes.find("/about") {
//!     println!("{} renders {}", route.path, route.source);
//! }
//! ```

pub mod prelude;

mod builder;
mod discovery;
mod error;
mod matcher;
mod route;
mod source;

pub use builder::*;
pub use discovery::*;
pub use error::*;
pub use matcher::*;
pub use route::*;
pub use source::*;
