//! Direct "context function" style connector.
//!
//! A backend context is a table of named, typed functions. Each CRUD
//! operation is bound to one of them at registration time: an explicit
//! override name if given, otherwise the conventional name derived from the
//! schema (`list_products`, `get_product`, `create_product`, ...). A missing
//! function, or one with the wrong shape, is a configuration error.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use auix_core::prelude::*;
use auix_core::{ChangeSet, Params, Preload, Record, RecordId, ResourceName, SchemaDef};

use crate::gateway::{CrudGateway, ListOptions, Page, SaveResult};

/// A CRUD operation of the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    List,
    Get,
    Change,
    New,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::List,
        Operation::Get,
        Operation::Change,
        Operation::New,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Change => "change",
            Operation::New => "new",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// `list_<source>` for listing, `<op>_<singular>` otherwise.
    pub fn conventional_name(&self, source: &str, singular: &str) -> String {
        match self {
            Operation::List => format!("list_{}", source),
            op => format!("{}_{}", op.as_str(), singular),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type ListFn = Arc<dyn Fn(&ListOptions) -> Result<Page> + Send + Sync>;
pub type GetFn = Arc<dyn Fn(&RecordId, &Preload) -> Result<Option<Record>> + Send + Sync>;
pub type ChangeFn = Arc<dyn Fn(&Record, &Params) -> ChangeSet + Send + Sync>;
pub type NewFn = Arc<dyn Fn(&Params, &Preload) -> Record + Send + Sync>;
pub type CreateFn = Arc<dyn Fn(&Params) -> Result<SaveResult> + Send + Sync>;
pub type UpdateFn = Arc<dyn Fn(&Record, &Params) -> Result<SaveResult> + Send + Sync>;
pub type DeleteFn = Arc<dyn Fn(&Record) -> Result<Record> + Send + Sync>;

/// A context function, tagged with the operation shape it implements.
#[derive(Clone)]
pub enum ContextFn {
    List(ListFn),
    Get(GetFn),
    Change(ChangeFn),
    New(NewFn),
    Create(CreateFn),
    Update(UpdateFn),
    Delete(DeleteFn),
}

impl ContextFn {
    pub fn list(f: impl Fn(&ListOptions) -> Result<Page> + Send + Sync + 'static) -> Self {
        ContextFn::List(Arc::new(f))
    }

    pub fn get(
        f: impl Fn(&RecordId, &Preload) -> Result<Option<Record>> + Send + Sync + 'static,
    ) -> Self {
        ContextFn::Get(Arc::new(f))
    }

    pub fn change(f: impl Fn(&Record, &Params) -> ChangeSet + Send + Sync + 'static) -> Self {
        ContextFn::Change(Arc::new(f))
    }

    pub fn new_record(f: impl Fn(&Params, &Preload) -> Record + Send + Sync + 'static) -> Self {
        ContextFn::New(Arc::new(f))
    }

    pub fn create(f: impl Fn(&Params) -> Result<SaveResult> + Send + Sync + 'static) -> Self {
        ContextFn::Create(Arc::new(f))
    }

    pub fn update(
        f: impl Fn(&Record, &Params) -> Result<SaveResult> + Send + Sync + 'static,
    ) -> Self {
        ContextFn::Update(Arc::new(f))
    }

    pub fn delete(f: impl Fn(&Record) -> Result<Record> + Send + Sync + 'static) -> Self {
        ContextFn::Delete(Arc::new(f))
    }

    pub fn operation(&self) -> Operation {
        match self {
            ContextFn::List(_) => Operation::List,
            ContextFn::Get(_) => Operation::Get,
            ContextFn::Change(_) => Operation::Change,
            ContextFn::New(_) => Operation::New,
            ContextFn::Create(_) => Operation::Create,
            ContextFn::Update(_) => Operation::Update,
            ContextFn::Delete(_) => Operation::Delete,
        }
    }
}

impl fmt::Debug for ContextFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextFn::{}(..)", self.operation())
    }
}

/// The named functions of one backend context.
#[derive(Debug, Clone, Default)]
pub struct ContextFunctions {
    functions: BTreeMap<String, ContextFn>,
}

impl ContextFunctions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, function: ContextFn) {
        self.functions.insert(name.into(), function);
    }

    pub fn with(mut self, name: impl Into<String>, function: ContextFn) -> Self {
        self.register(name, function);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ContextFn> {
        self.functions.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

/// Explicit function names, taking precedence over convention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectOverrides {
    names: BTreeMap<Operation, String>,
}

impl DirectOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, operation: Operation, function: impl Into<String>) -> Self {
        self.names.insert(operation, function.into());
        self
    }

    pub fn get(&self, operation: Operation) -> Option<&str> {
        self.names.get(&operation).map(String::as_str)
    }
}

/// CRUD gateway bound to resolved context functions.
#[derive(Clone)]
pub struct DirectConnector {
    resource: ResourceName,
    bound: BTreeMap<Operation, String>,
    list: ListFn,
    get: GetFn,
    change: ChangeFn,
    new: NewFn,
    create: CreateFn,
    update: UpdateFn,
    delete: DeleteFn,
}

impl fmt::Debug for DirectConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectConnector")
            .field("resource", &self.resource)
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}

struct Resolver<'a> {
    resource: &'a ResourceName,
    schema: &'a SchemaDef,
    functions: &'a ContextFunctions,
    overrides: &'a DirectOverrides,
    bound: BTreeMap<Operation, String>,
}

impl Resolver<'_> {
    fn resolve<T>(&mut self, op: Operation, pick: fn(&ContextFn) -> Option<T>) -> Result<T> {
        let name = match self.overrides.get(op) {
            Some(name) => name.to_string(),
            None => op.conventional_name(&self.schema.source, &self.schema.singular()),
        };
        let function = self.functions.get(&name).ok_or_else(|| Error::MissingOperation {
            resource: self.resource.to_string(),
            operation: op.to_string(),
            function: name.clone(),
        })?;
        let typed = pick(function).ok_or_else(|| Error::OperationSignature {
            resource: self.resource.to_string(),
            function: name.clone(),
            expected: op.to_string(),
        })?;
        trace!("{}: {} bound to '{}'", self.resource, op, name);
        self.bound.insert(op, name);
        Ok(typed)
    }
}

impl DirectConnector {
    /// Bind every operation of `resource` against `functions`.
    pub fn resolve(
        resource: &ResourceName,
        schema: &SchemaDef,
        functions: &ContextFunctions,
        overrides: &DirectOverrides,
    ) -> Result<Self> {
        let mut resolver = Resolver {
            resource,
            schema,
            functions,
            overrides,
            bound: BTreeMap::new(),
        };

        let list = resolver.resolve(Operation::List, |f| match f {
            ContextFn::List(g) => Some(g.clone()),
            _ => None,
        })?;
        let get = resolver.resolve(Operation::Get, |f| match f {
            ContextFn::Get(g) => Some(g.clone()),
            _ => None,
        })?;
        let change = resolver.resolve(Operation::Change, |f| match f {
            ContextFn::Change(g) => Some(g.clone()),
            _ => None,
        })?;
        let new = resolver.resolve(Operation::New, |f| match f {
            ContextFn::New(g) => Some(g.clone()),
            _ => None,
        })?;
        let create = resolver.resolve(Operation::Create, |f| match f {
            ContextFn::Create(g) => Some(g.clone()),
            _ => None,
        })?;
        let update = resolver.resolve(Operation::Update, |f| match f {
            ContextFn::Update(g) => Some(g.clone()),
            _ => None,
        })?;
        let delete = resolver.resolve(Operation::Delete, |f| match f {
            ContextFn::Delete(g) => Some(g.clone()),
            _ => None,
        })?;

        debug!("Direct connector for '{}' resolved", resource);

        Ok(Self {
            resource: resource.clone(),
            bound: resolver.bound,
            list,
            get,
            change,
            new,
            create,
            update,
            delete,
        })
    }

    /// Function name bound to an operation.
    pub fn function_name(&self, operation: Operation) -> Option<&str> {
        self.bound.get(&operation).map(String::as_str)
    }
}

impl CrudGateway for DirectConnector {
    fn list(&self, opts: &ListOptions) -> Result<Page> {
        (self.list)(opts)
    }

    fn get(&self, id: &RecordId, preload: &Preload) -> Result<Option<Record>> {
        (self.get)(id, preload)
    }

    fn change(&self, record: &Record, params: &Params) -> ChangeSet {
        (self.change)(record, params)
    }

    fn new_record(&self, attrs: &Params, preload: &Preload) -> Record {
        (self.new)(attrs, preload)
    }

    fn create(&self, params: &Params) -> Result<SaveResult> {
        (self.create)(params)
    }

    fn update(&self, record: &Record, params: &Params) -> Result<SaveResult> {
        (self.update)(record, params)
    }

    fn delete(&self, record: &Record) -> Result<Record> {
        (self.delete)(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{seeded_store, PRODUCTS};

    fn product() -> ResourceName {
        ResourceName::new("product")
    }

    #[test]
    fn test_conventional_names() {
        assert_eq!(
            Operation::List.conventional_name("products", "product"),
            "list_products"
        );
        assert_eq!(
            Operation::Get.conventional_name("products", "product"),
            "get_product"
        );
        assert_eq!(
            Operation::New.conventional_name("categories", "category"),
            "new_category"
        );
    }

    #[test]
    fn test_resolves_by_convention() {
        let store = seeded_store();
        let schema = store.schema(PRODUCTS).unwrap();
        let functions = store.context_functions(PRODUCTS).unwrap();
        let connector =
            DirectConnector::resolve(&product(), &schema, &functions, &DirectOverrides::new())
                .unwrap();
        assert_eq!(connector.function_name(Operation::Delete), Some("delete_product"));
        assert_eq!(connector.list(&ListOptions::default()).unwrap().entries.len(), 2);
    }

    #[test]
    fn test_override_wins_over_convention() {
        let store = seeded_store();
        let schema = store.schema(PRODUCTS).unwrap();
        let functions = store.context_functions(PRODUCTS).unwrap().with(
            "list_nothing",
            ContextFn::list(|_| Ok(Page::default())),
        );
        let overrides = DirectOverrides::new().with(Operation::List, "list_nothing");
        let connector = DirectConnector::resolve(&product(), &schema, &functions, &overrides).unwrap();
        assert_eq!(connector.function_name(Operation::List), Some("list_nothing"));
        assert!(connector.list(&ListOptions::default()).unwrap().entries.is_empty());
    }

    #[test]
    fn test_missing_function_is_configuration_error() {
        let store = seeded_store();
        let schema = store.schema(PRODUCTS).unwrap();
        let functions = ContextFunctions::new();
        let err = DirectConnector::resolve(&product(), &schema, &functions, &DirectOverrides::new())
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, Error::MissingOperation { ref function, .. } if function == "list_products"));
    }

    #[test]
    fn test_wrong_shape_is_signature_error() {
        let store = seeded_store();
        let schema = store.schema(PRODUCTS).unwrap();
        let functions = store
            .context_functions(PRODUCTS)
            .unwrap()
            .with("get_product", ContextFn::delete(|r| Ok(r.clone())));
        let err = DirectConnector::resolve(&product(), &schema, &functions, &DirectOverrides::new())
            .unwrap_err();
        assert!(matches!(err, Error::OperationSignature { ref expected, .. } if expected == "get"));
    }
}
