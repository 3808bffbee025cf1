//! The two backend styles behind one gateway.

use std::fmt;

use auix_core::prelude::*;
use auix_core::{ChangeSet, Params, Preload, Record, RecordId};

use crate::action::ActionConnector;
use crate::direct::DirectConnector;
use crate::gateway::{CrudGateway, ListOptions, Page, SaveResult};

/// Binds a resource to one backend style.
#[derive(Debug, Clone)]
pub enum Connector {
    Direct(DirectConnector),
    Action(ActionConnector),
}

impl Connector {
    pub fn kind(&self) -> ConnectorKind {
        match self {
            Connector::Direct(_) => ConnectorKind::Direct,
            Connector::Action(_) => ConnectorKind::Action,
        }
    }

    fn gateway(&self) -> &dyn CrudGateway {
        match self {
            Connector::Direct(c) => c,
            Connector::Action(c) => c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorKind {
    Direct,
    Action,
}

impl fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorKind::Direct => f.write_str("direct"),
            ConnectorKind::Action => f.write_str("action"),
        }
    }
}

impl From<DirectConnector> for Connector {
    fn from(c: DirectConnector) -> Self {
        Connector::Direct(c)
    }
}

impl From<ActionConnector> for Connector {
    fn from(c: ActionConnector) -> Self {
        Connector::Action(c)
    }
}

impl CrudGateway for Connector {
    fn list(&self, opts: &ListOptions) -> Result<Page> {
        self.gateway().list(opts)
    }

    fn to_page(&self, opts: &ListOptions, page_number: usize) -> Result<Page> {
        self.gateway().to_page(opts, page_number)
    }

    fn get(&self, id: &RecordId, preload: &Preload) -> Result<Option<Record>> {
        self.gateway().get(id, preload)
    }

    fn change(&self, record: &Record, params: &Params) -> ChangeSet {
        self.gateway().change(record, params)
    }

    fn new_record(&self, attrs: &Params, preload: &Preload) -> Record {
        self.gateway().new_record(attrs, preload)
    }

    fn create(&self, params: &Params) -> Result<SaveResult> {
        self.gateway().create(params)
    }

    fn update(&self, record: &Record, params: &Params) -> Result<SaveResult> {
        self.gateway().update(record, params)
    }

    fn delete(&self, record: &Record) -> Result<Record> {
        self.gateway().delete(record)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::direct::DirectOverrides;
    use crate::test_utils::{seeded_store, PRODUCTS};

    #[test]
    fn test_both_styles_see_the_same_data() {
        let store = seeded_store();
        let schema = store.schema(PRODUCTS).unwrap();
        let direct: Connector = DirectConnector::resolve(
            &"product".into(),
            &schema,
            &store.context_functions(PRODUCTS).unwrap(),
            &DirectOverrides::new(),
        )
        .unwrap()
        .into();
        let action: Connector = ActionConnector::new("product", Arc::new(store.domain(PRODUCTS))).into();

        assert_eq!(direct.kind(), ConnectorKind::Direct);
        assert_eq!(action.kind(), ConnectorKind::Action);

        let created = direct
            .create(&Params::from_pairs([("name", "Washer"), ("price", "0.05")]))
            .unwrap()
            .unwrap();
        let id = created.id().unwrap();
        let fetched = action.get(&id, &Preload::none()).unwrap().unwrap();
        assert_eq!(fetched.display_value("name"), "Washer");
    }

    #[test]
    fn test_to_page_keeps_options() {
        let store = seeded_store();
        let action: Connector = ActionConnector::new("product", Arc::new(store.domain(PRODUCTS))).into();
        let opts = ListOptions::default().order_by("name").page_size(1);
        let second = action.to_page(&opts, 2).unwrap();
        assert_eq!(second.info.page_number, 2);
        assert_eq!(second.entries[0].display_value("name"), "Widget");
    }
}
