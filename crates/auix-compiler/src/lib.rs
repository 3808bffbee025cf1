//! auix-compiler - Layout expansion and view compilation
//!
//! Takes the registered resources and their declared layouts and produces a
//! [`CompiledSite`]: frozen [`ViewConfig`]s for the index, form and show
//! views of every resource, their preloads, merged action sets and the
//! route table. Compilation happens once; every runtime view instance
//! shares the result read-only.

pub mod compile;
pub mod expand;
pub mod preload;
pub mod registry;
pub mod routes;
pub mod view;

pub use compile::{compile, CompileOptions, CompiledSite};
pub use expand::{collect_overrides, Expander, IndexColumns};
pub use preload::PreloadGraph;
pub use registry::{RegisteredResource, ResourceConfig, ResourceRegistry};
pub use routes::{action_path, LiveAction, Route, RouteTable};
pub use view::{CompiledResource, ViewConfig, ViewNode, ViewTag};
