//! # auix-core - Core Domain Types
//!
//! Foundation crate for auix. Provides the field model, schema
//! introspection, the layout tree builder, the action system, the routing
//! stack codec, and the markup tree renderers produce.
//!
//! This crate has **zero internal dependencies**.
//!
//! ## Public API
//!
//! ### Fields (`field`, `parser`, `schema`)
//! - [`Field`] - One UI-facing column/input descriptor
//! - [`FieldOverrides`] - Partial field attributes, last applied wins
//! - [`SchemaDef`] - Backend entity description consumed by [`parse_resource()`]
//!
//! ### Layouts (`layout`)
//! - [`LayoutBuilder`] - Block-structured builder for index/form/show trees
//! - [`LayoutTree`] - Arena of layout nodes
//! - [`LayoutSpec`] - Declared layouts of one resource
//!
//! ### Actions (`actions`)
//! - [`ActionGroup`] - Closed set of placements
//! - [`ActionSet`] - Ordered actions per group
//! - [`ActionModification`] - add/insert/replace/remove, applied in fixed order
//!
//! ### Data (`record`, `markup`, `routing_stack`)
//! - [`Record`], [`Params`], [`ChangeSet`] - Values exchanged with backends
//! - [`Markup`] - HTML tree produced by renderers
//! - [`RoutingStack`] - Back-navigation stack carried in the URL
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with configuration vs recoverable classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use auix_core::prelude::*;
//! ```

pub mod actions;
pub mod error;
pub mod field;
pub mod layout;
pub mod logging;
pub mod markup;
pub mod parser;
pub mod preload;
pub mod prelude;
pub mod record;
pub mod routing_stack;
pub mod schema;
pub mod types;

pub use actions::{
    Action, ActionComponent, ActionContext, ActionGroup, ActionModification, ActionOp, ActionSet,
    DefaultActions, Replacement,
};
pub use error::{Error, Result, ResultExt};
pub use field::{
    label_for, AssociationData, CustomRenderer, EmbedData, Field, FieldData, FieldKind,
    FieldOverrides, FieldType, HtmlType, LabelFn, OptionLabel, RelatedResource, SelectOption,
};
pub use layout::{
    ContainerOpts, LayoutBuilder, LayoutNode, LayoutSpec, LayoutTag, LayoutTree, NodeId,
    SectionsBuilder, SectionsId, TabId,
};
pub use markup::{Element, Markup};
pub use parser::{parse_resource, ParsedResource, DISABLED_BY_CONVENTION, OMITTED_BY_CONVENTION};
pub use preload::{Preload, PreloadEntry};
pub use record::{ChangeAction, ChangeSet, FieldError, Params, Record, RecordId};
pub use routing_stack::{NavigationKind, RoutingEntry, RoutingStack};
pub use schema::{singularize, Attribute, HasSchema, NativeType, SchemaDef};
pub use types::{FieldKey, ResourceName, ViewKind};
