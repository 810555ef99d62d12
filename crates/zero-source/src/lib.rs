//! Filesystem page source for zero.
//!
//! ```text
//! pages/
//! ├── _app.html        application shell (not a page)
//! ├── index.md         /
//! ├── about.html       /about
//! └── blog/
//!     ├── index.md     /blog/
//!     ├── hello.md     /blog/hello
//!     └── hello.json   data file named by `data: hello.json`
//! ```
//!
//! Pages may start with a YAML (`---`) or TOML (`+++`) front-matter block.
//! Its keys become route props, and `{{ key }}` placeholders in the page
//! body are filled from the merged props at render time.

mod error;
mod front_matter;
mod page;
mod shell;
mod source;
mod watcher;

pub use error::*;
pub use front_matter::*;
pub use page::*;
pub use shell::*;
pub use source::*;
pub use watcher::*;
