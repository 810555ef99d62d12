//! Prelude for convenient imports.
//!
//! ```rust,ignore
//! use zero_app::prelude::*;
//! ```

pub use zero_core::{Component, Node, Props, SiteOptions};
pub use zero_render::{AppShell, RenderMode, ShellContext, Template};
pub use zero_router::prelude::*;

pub use crate::{
    DocumentOptions, HydrationData, LiveDocument, MemoryDocument, MountError, MountStrategy,
    Mounted, Runtime, Site, SiteError, Started,
};
