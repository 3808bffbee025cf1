//! # auix-connector - Backend CRUD connectors
//!
//! The views talk to backends only through [`CrudGateway`]. Two backend
//! styles implement it, wrapped in the [`Connector`] sum type:
//!
//! - [`DirectConnector`] - typed context functions, bound by naming
//!   convention with explicit overrides
//! - [`ActionConnector`] - named actions of a [`ResourceDomain`]
//!
//! [`MemoryStore`] is an in-memory backend offering both styles.
//!
//! Depends on [`auix_core`] for records, change sets and errors.

pub mod action;
pub mod connector;
pub mod direct;
pub mod gateway;
pub mod memory;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use action::{ActionConnector, ActionKind, ActionNames, ReadQuery, ResourceDomain};
pub use connector::{Connector, ConnectorKind};
pub use direct::{ContextFn, ContextFunctions, DirectConnector, DirectOverrides, Operation};
pub use gateway::{CrudGateway, ListOptions, Page, PageInfo, SaveResult};
pub use memory::{MemoryDomain, MemoryStore};
