//! Resource/action style connector.
//!
//! The backend exposes named actions per resource (`read`, `create`,
//! `update`, `destroy`, or custom names). The connector maps each CRUD
//! operation onto one of those actions.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use auix_core::prelude::*;
use auix_core::{ChangeSet, Params, Preload, Record, RecordId, ResourceName};

use crate::gateway::{CrudGateway, ListOptions, Page, SaveResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Read,
    Create,
    Update,
    Destroy,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Read,
        ActionKind::Create,
        ActionKind::Update,
        ActionKind::Destroy,
    ];

    pub fn default_name(&self) -> &'static str {
        match self {
            ActionKind::Read => "read",
            ActionKind::Create => "create",
            ActionKind::Update => "update",
            ActionKind::Destroy => "destroy",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_name())
    }
}

/// What a read action is asked for.
#[derive(Debug, Clone)]
pub enum ReadQuery {
    List(ListOptions),
    ById { id: RecordId, preload: Preload },
}

/// A backend offering named actions for one resource.
pub trait ResourceDomain: Send + Sync {
    fn read(&self, action: &str, query: &ReadQuery) -> Result<Page>;

    fn validate(&self, record: &Record, params: &Params) -> ChangeSet;

    fn build(&self, attrs: &Params, preload: &Preload) -> Record;

    fn create(&self, action: &str, params: &Params) -> Result<SaveResult>;

    fn update(&self, action: &str, record: &Record, params: &Params) -> Result<SaveResult>;

    fn destroy(&self, action: &str, record: &Record) -> Result<Record>;
}

/// Action names used for each operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionNames {
    pub read: String,
    pub create: String,
    pub update: String,
    pub destroy: String,
}

impl Default for ActionNames {
    fn default() -> Self {
        Self {
            read: ActionKind::Read.default_name().to_string(),
            create: ActionKind::Create.default_name().to_string(),
            update: ActionKind::Update.default_name().to_string(),
            destroy: ActionKind::Destroy.default_name().to_string(),
        }
    }
}

impl ActionNames {
    pub fn with(mut self, kind: ActionKind, name: impl Into<String>) -> Self {
        let name = name.into();
        match kind {
            ActionKind::Read => self.read = name,
            ActionKind::Create => self.create = name,
            ActionKind::Update => self.update = name,
            ActionKind::Destroy => self.destroy = name,
        }
        self
    }
}

#[derive(Clone)]
pub struct ActionConnector {
    resource: ResourceName,
    domain: Arc<dyn ResourceDomain>,
    names: ActionNames,
}

impl fmt::Debug for ActionConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionConnector")
            .field("resource", &self.resource)
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

impl ActionConnector {
    pub fn new(resource: impl Into<ResourceName>, domain: Arc<dyn ResourceDomain>) -> Self {
        Self {
            resource: resource.into(),
            domain,
            names: ActionNames::default(),
        }
    }

    pub fn with_names(mut self, names: ActionNames) -> Self {
        self.names = names;
        self
    }

    pub fn names(&self) -> &ActionNames {
        &self.names
    }
}

impl CrudGateway for ActionConnector {
    fn list(&self, opts: &ListOptions) -> Result<Page> {
        trace!("{}: {} (list)", self.resource, self.names.read);
        self.domain
            .read(&self.names.read, &ReadQuery::List(opts.clone()))
    }

    fn get(&self, id: &RecordId, preload: &Preload) -> Result<Option<Record>> {
        let query = ReadQuery::ById {
            id: id.clone(),
            preload: preload.clone(),
        };
        let page = self.domain.read(&self.names.read, &query)?;
        Ok(page.entries.into_iter().next())
    }

    fn change(&self, record: &Record, params: &Params) -> ChangeSet {
        self.domain.validate(record, params)
    }

    fn new_record(&self, attrs: &Params, preload: &Preload) -> Record {
        self.domain.build(attrs, preload)
    }

    fn create(&self, params: &Params) -> Result<SaveResult> {
        self.domain.create(&self.names.create, params)
    }

    fn update(&self, record: &Record, params: &Params) -> Result<SaveResult> {
        self.domain.update(&self.names.update, record, params)
    }

    fn delete(&self, record: &Record) -> Result<Record> {
        self.domain.destroy(&self.names.destroy, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{seeded_store, PRODUCTS};

    #[test]
    fn test_default_names() {
        let names = ActionNames::default();
        assert_eq!(names.read, "read");
        assert_eq!(names.destroy, "destroy");
    }

    #[test]
    fn test_custom_action_names_are_used() {
        let store = seeded_store();
        let domain = store
            .domain(PRODUCTS)
            .with_action("archive", ActionKind::Destroy);
        let connector = ActionConnector::new("product", Arc::new(domain))
            .with_names(ActionNames::default().with(ActionKind::Destroy, "archive"));

        let record = connector
            .get(&RecordId::new("1"), &Preload::none())
            .unwrap()
            .unwrap();
        connector.delete(&record).unwrap();
        assert_eq!(store.count(PRODUCTS).unwrap(), 1);
    }

    #[test]
    fn test_unknown_action_is_backend_error() {
        let store = seeded_store();
        let connector = ActionConnector::new("product", Arc::new(store.domain(PRODUCTS)))
            .with_names(ActionNames::default().with(ActionKind::Read, "search"));
        let err = connector.list(&ListOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Backend { .. }));
    }

    #[test]
    fn test_get_missing_is_none() {
        let connector = ActionConnector::new("product", Arc::new(seeded_store().domain(PRODUCTS)));
        assert!(connector
            .get(&RecordId::new("99"), &Preload::none())
            .unwrap()
            .is_none());
    }
}
