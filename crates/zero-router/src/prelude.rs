//! Prelude for convenient imports.
//!
//! ```rust,ignore
//! use zero_router::prelude::*;
//! ```

pub use crate::{
    build_routes, discover, match_route, BuildError, DiscoveryError, IndexName, Module,
    ModuleRecord, PageSource, Route, RouteTable, StaticSource,
};
