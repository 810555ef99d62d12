//! zero site entry point.
//!
//! Ties the pipeline together: pages are discovered from a `PageSource`,
//! turned into a route table, then either rendered once or mounted into a
//! live document that follows navigation and hot updates.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use zero_app::prelude::*;
//!
//! let site = Site::new(Arc::new(source)).with_options(options);
//!
//! match site.start(Runtime::detect(None, false)).await? {
//!     Started::Rendered(tree) => println!("{}", tree.to_html()),
//!     Started::Mounted(mounted) => mounted.watch(changes, || site.routes()).await,
//! }
//! ```

pub mod prelude;
mod app;
mod error;
mod mount;
mod server;

pub use app::*;
pub use error::*;
pub use mount::*;
pub use server::*;
