//! # In-memory backend
//!
//! A small relational store keyed by schema source. Backs the demo site and
//! the test suites; exposes itself both as a set of context functions for
//! the [`DirectConnector`](crate::DirectConnector) and as a
//! [`ResourceDomain`] for the [`ActionConnector`](crate::ActionConnector).

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde_json::{Number, Value};

use auix_core::prelude::*;
use auix_core::{
    ChangeAction, ChangeSet, NativeType, Params, Preload, Record, RecordId, SchemaDef,
};

use crate::action::{ActionKind, ReadQuery, ResourceDomain};
use crate::direct::{ContextFn, ContextFunctions, Operation};
use crate::gateway::{ListOptions, Page, PageInfo, SaveResult};

const BLANK: &str = "can't be blank";
const INVALID: &str = "is invalid";

struct Table {
    schema: SchemaDef,
    required: Vec<String>,
    rows: Vec<Record>,
    next_id: u64,
}

impl Table {
    fn position(&self, id: &RecordId) -> Option<usize> {
        self.rows.iter().position(|r| r.id().as_ref() == Some(id))
    }

    fn next_id(&mut self) -> Value {
        let n = self.next_id;
        self.next_id += 1;
        match self.schema.attribute(&self.schema.primary_key) {
            Some(attr) if attr.native == NativeType::BinaryId => {
                Value::String(format!("00000000-0000-0000-0000-{:012x}", n))
            }
            _ => Value::Number(n.into()),
        }
    }

    /// Cast and validate `params` against `data`.
    fn change(&self, data: &Record, params: &Params) -> ChangeSet {
        let mut changes = Params::new();
        let mut errors = Vec::new();

        for (key, value) in params.iter() {
            let Some(attr) = self.schema.attribute(key) else {
                trace!("Ignoring unknown parameter '{}' for '{}'", key, self.schema.source);
                continue;
            };
            if key == &self.schema.primary_key {
                continue;
            }
            match cast(&attr.native, value) {
                Some(Ok(value)) => changes.insert(key.clone(), value),
                Some(Err(message)) => {
                    changes.insert(key.clone(), value.clone());
                    errors.push((key.clone(), message));
                }
                None => {}
            }
        }

        let mut change_set = ChangeSet::new(data.clone(), changes);
        for (key, message) in errors {
            change_set.add_error(key, message);
        }
        let applied = change_set.applied();
        for key in &self.required {
            if is_blank(applied.get(key)) && change_set.errors_for(key).is_empty() {
                change_set.add_error(key.as_str(), BLANK);
            }
        }
        change_set
    }
}

#[derive(Default)]
struct Inner {
    tables: BTreeMap<String, Table>,
}

impl Inner {
    fn table(&self, source: &str) -> Result<&Table> {
        self.tables
            .get(source)
            .ok_or_else(|| Error::backend(format!("no table '{}'", source)))
    }

    fn table_mut(&mut self, source: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(source)
            .ok_or_else(|| Error::backend(format!("no table '{}'", source)))
    }

    fn table_for_entity(&self, entity: &str) -> Option<&Table> {
        self.tables.values().find(|t| t.schema.entity == entity)
    }

    /// Attach preloaded associations to `record`.
    fn preload_into(&self, schema: &SchemaDef, record: &mut Record, preload: &Preload) {
        for entry in preload.entries() {
            let Some(attr) = schema.attribute(entry.field.as_str()) else {
                continue;
            };
            let nested = Preload(entry.nested.clone());
            match &attr.native {
                NativeType::HasMany {
                    related,
                    owner_key,
                    related_key,
                } => {
                    let Some(table) = self.table_for_entity(related) else {
                        warn!("Cannot preload '{}': no table for {}", entry.field, related);
                        continue;
                    };
                    let owner = record.display_value(owner_key);
                    let rows: Vec<Value> = table
                        .rows
                        .iter()
                        .filter(|r| !owner.is_empty() && r.display_value(related_key) == owner)
                        .map(|r| {
                            let mut row = r.clone();
                            self.preload_into(&table.schema, &mut row, &nested);
                            Value::Object(row.into_map())
                        })
                        .collect();
                    record.set(entry.field.as_str(), Value::Array(rows));
                }
                NativeType::BelongsTo {
                    related,
                    owner_key,
                    related_key,
                }
                | NativeType::HasOne {
                    related,
                    owner_key,
                    related_key,
                } => {
                    let Some(table) = self.table_for_entity(related) else {
                        warn!("Cannot preload '{}': no table for {}", entry.field, related);
                        continue;
                    };
                    let owner = record.display_value(owner_key);
                    let found = table
                        .rows
                        .iter()
                        .find(|r| !owner.is_empty() && r.display_value(related_key) == owner)
                        .map(|r| {
                            let mut row = r.clone();
                            self.preload_into(&table.schema, &mut row, &nested);
                            Value::Object(row.into_map())
                        });
                    record.set(entry.field.as_str(), found.unwrap_or(Value::Null));
                }
                _ => {}
            }
        }
    }
}

/// Shared in-memory store. Cloning shares the data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::backend("memory store lock poisoned"))
    }

    /// Create an empty table for `schema`, keyed by its source.
    pub fn register(&self, schema: SchemaDef) -> Result<()> {
        let mut inner = self.lock()?;
        if inner.tables.contains_key(&schema.source) {
            return Err(Error::DuplicateResource {
                name: schema.source.clone(),
            });
        }
        debug!("Registered memory table '{}'", schema.source);
        inner.tables.insert(
            schema.source.clone(),
            Table {
                schema,
                required: Vec::new(),
                rows: Vec::new(),
                next_id: 1,
            },
        );
        Ok(())
    }

    /// Mark attributes that must not be blank on save.
    pub fn require(&self, source: &str, keys: &[&str]) -> Result<()> {
        let mut inner = self.lock()?;
        let table = inner.table_mut(source)?;
        table.required.extend(keys.iter().map(|k| k.to_string()));
        Ok(())
    }

    pub fn schema(&self, source: &str) -> Result<SchemaDef> {
        Ok(self.lock()?.table(source)?.schema.clone())
    }

    /// Insert a row as-is, assigning an id when missing.
    pub fn seed(&self, source: &str, record: Record) -> Result<Record> {
        let mut inner = self.lock()?;
        let table = inner.table_mut(source)?;
        let mut record = record;
        if record.id().is_none() {
            let id = table.next_id();
            record.set(table.schema.primary_key.clone(), id);
        }
        table.rows.push(record.clone());
        Ok(record)
    }

    pub fn count(&self, source: &str) -> Result<usize> {
        Ok(self.lock()?.table(source)?.rows.len())
    }

    // ─────────────────────────────────────────────────────────
    // CRUD
    // ─────────────────────────────────────────────────────────

    pub fn list(&self, source: &str, opts: &ListOptions) -> Result<Page> {
        let inner = self.lock()?;
        let table = inner.table(source)?;

        let mut rows: Vec<&Record> = table
            .rows
            .iter()
            .filter(|r| {
                opts.filters
                    .iter()
                    .all(|(key, value)| r.display_value(key) == display(value))
            })
            .collect();

        if let Some(key) = &opts.order_by {
            rows.sort_by(|a, b| compare_values(a.get(key.as_str()), b.get(key.as_str())));
        }

        let total = rows.len();
        let page = opts.page.max(1);
        let window: Vec<&Record> = if opts.page_size == 0 {
            rows
        } else {
            rows.into_iter()
                .skip((page - 1).saturating_mul(opts.page_size))
                .take(opts.page_size)
                .collect()
        };

        let entries = window
            .into_iter()
            .map(|r| {
                let mut row = r.clone();
                inner.preload_into(&table.schema, &mut row, &opts.preload);
                row
            })
            .collect();

        Ok(Page {
            entries,
            info: PageInfo::for_total(page, opts.page_size, total),
        })
    }

    pub fn get(&self, source: &str, id: &RecordId, preload: &Preload) -> Result<Option<Record>> {
        let inner = self.lock()?;
        let table = inner.table(source)?;
        Ok(table.position(id).map(|i| {
            let mut row = table.rows[i].clone();
            inner.preload_into(&table.schema, &mut row, preload);
            row
        }))
    }

    pub fn change(&self, source: &str, record: &Record, params: &Params) -> ChangeSet {
        match self.lock() {
            Ok(inner) => match inner.table(source) {
                Ok(table) => table.change(record, params),
                Err(e) => {
                    warn!("change on {}: {}", source, e);
                    ChangeSet::new(record.clone(), params.clone())
                }
            },
            Err(e) => {
                warn!("change on {}: {}", source, e);
                ChangeSet::new(record.clone(), params.clone())
            }
        }
    }

    /// Blank record with every attribute present, overlaid by `attrs`.
    pub fn new_record(&self, source: &str, attrs: &Params, preload: &Preload) -> Record {
        let Ok(inner) = self.lock() else {
            return Record::new().merged(attrs);
        };
        let Ok(table) = inner.table(source) else {
            return Record::new().merged(attrs);
        };
        let mut record = Record::new();
        for attr in &table.schema.attributes {
            let blank = match attr.native {
                NativeType::HasMany { .. } | NativeType::EmbedsMany(_) => Value::Array(Vec::new()),
                _ => Value::Null,
            };
            record.set(attr.name.clone(), blank);
        }
        let mut record = record.merged(attrs);
        inner.preload_into(&table.schema, &mut record, preload);
        record
    }

    pub fn create(&self, source: &str, params: &Params) -> Result<SaveResult> {
        let mut inner = self.lock()?;
        let table = inner.table_mut(source)?;

        let change_set = table
            .change(&Record::new(), params)
            .with_action(ChangeAction::Insert);
        if !change_set.is_valid() {
            debug!("create on {} rejected: {} errors", source, change_set.errors.len());
            return Ok(Err(change_set));
        }

        let mut record = change_set.applied();
        let id = table.next_id();
        record.set(table.schema.primary_key.clone(), id);
        stamp(&table.schema, &mut record, true);
        table.rows.push(record.clone());
        info!("Created {} {}", source, record.display_value("id"));
        Ok(Ok(record))
    }

    pub fn update(&self, source: &str, record: &Record, params: &Params) -> Result<SaveResult> {
        let mut inner = self.lock()?;
        let table = inner.table_mut(source)?;

        let id = record
            .id()
            .ok_or_else(|| Error::backend(format!("update on {} without id", source)))?;
        let position = table
            .position(&id)
            .ok_or_else(|| Error::backend(format!("{} {} not found", source, id)))?;

        let change_set = table
            .change(&table.rows[position], params)
            .with_action(ChangeAction::Update);
        if !change_set.is_valid() {
            return Ok(Err(change_set));
        }

        let mut updated = change_set.applied();
        stamp(&table.schema, &mut updated, false);
        table.rows[position] = updated.clone();
        info!("Updated {} {}", source, id);
        Ok(Ok(updated))
    }

    pub fn delete(&self, source: &str, record: &Record) -> Result<Record> {
        let mut inner = self.lock()?;
        let table = inner.table_mut(source)?;
        let id = record
            .id()
            .ok_or_else(|| Error::backend(format!("delete on {} without id", source)))?;
        let position = table
            .position(&id)
            .ok_or_else(|| Error::backend(format!("{} {} not found", source, id)))?;
        info!("Deleted {} {}", source, id);
        Ok(table.rows.remove(position))
    }

    // ─────────────────────────────────────────────────────────
    // Connector surfaces
    // ─────────────────────────────────────────────────────────

    /// Context functions named by convention for one table
    /// (`list_products`, `get_product`, ...).
    pub fn context_functions(&self, source: &str) -> Result<ContextFunctions> {
        let schema = self.schema(source)?;
        let singular = schema.singular();
        let name = |op: Operation| op.conventional_name(&schema.source, &singular);
        let src = source.to_string();

        let mut functions = ContextFunctions::new();
        {
            let (store, src) = (self.clone(), src.clone());
            functions.register(
                name(Operation::List),
                ContextFn::list(move |opts| store.list(&src, opts)),
            );
        }
        {
            let (store, src) = (self.clone(), src.clone());
            functions.register(
                name(Operation::Get),
                ContextFn::get(move |id, preload| store.get(&src, id, preload)),
            );
        }
        {
            let (store, src) = (self.clone(), src.clone());
            functions.register(
                name(Operation::Change),
                ContextFn::change(move |record, params| store.change(&src, record, params)),
            );
        }
        {
            let (store, src) = (self.clone(), src.clone());
            functions.register(
                name(Operation::New),
                ContextFn::new_record(move |attrs, preload| store.new_record(&src, attrs, preload)),
            );
        }
        {
            let (store, src) = (self.clone(), src.clone());
            functions.register(
                name(Operation::Create),
                ContextFn::create(move |params| store.create(&src, params)),
            );
        }
        {
            let (store, src) = (self.clone(), src.clone());
            functions.register(
                name(Operation::Update),
                ContextFn::update(move |record, params| store.update(&src, record, params)),
            );
        }
        {
            let store = self.clone();
            functions.register(
                name(Operation::Delete),
                ContextFn::delete(move |record| store.delete(&src, record)),
            );
        }
        Ok(functions)
    }

    /// Resource/action view of one table.
    pub fn domain(&self, source: &str) -> MemoryDomain {
        MemoryDomain::new(self.clone(), source)
    }
}

/// [`ResourceDomain`] over one memory table. Knows the default action
/// names plus any registered custom ones.
#[derive(Debug, Clone)]
pub struct MemoryDomain {
    store: MemoryStore,
    source: String,
    actions: BTreeMap<String, ActionKind>,
}

impl MemoryDomain {
    pub fn new(store: MemoryStore, source: impl Into<String>) -> Self {
        let actions = ActionKind::ALL
            .into_iter()
            .map(|kind| (kind.default_name().to_string(), kind))
            .collect();
        Self {
            store,
            source: source.into(),
            actions,
        }
    }

    pub fn with_action(mut self, name: impl Into<String>, kind: ActionKind) -> Self {
        self.actions.insert(name.into(), kind);
        self
    }

    fn check(&self, action: &str, kind: ActionKind) -> Result<()> {
        match self.actions.get(action) {
            Some(k) if *k == kind => Ok(()),
            Some(k) => Err(Error::backend(format!(
                "action '{}' on {} is a {} action, not {}",
                action, self.source, k, kind
            ))),
            None => Err(Error::backend(format!(
                "{} has no action '{}'",
                self.source, action
            ))),
        }
    }
}

impl ResourceDomain for MemoryDomain {
    fn read(&self, action: &str, query: &ReadQuery) -> Result<Page> {
        self.check(action, ActionKind::Read)?;
        match query {
            ReadQuery::List(opts) => self.store.list(&self.source, opts),
            ReadQuery::ById { id, preload } => {
                let entries: Vec<Record> =
                    self.store.get(&self.source, id, preload)?.into_iter().collect();
                let info = PageInfo::for_total(1, 0, entries.len());
                Ok(Page { entries, info })
            }
        }
    }

    fn validate(&self, record: &Record, params: &Params) -> ChangeSet {
        self.store.change(&self.source, record, params)
    }

    fn build(&self, attrs: &Params, preload: &Preload) -> Record {
        self.store.new_record(&self.source, attrs, preload)
    }

    fn create(&self, action: &str, params: &Params) -> Result<SaveResult> {
        self.check(action, ActionKind::Create)?;
        self.store.create(&self.source, params)
    }

    fn update(&self, action: &str, record: &Record, params: &Params) -> Result<SaveResult> {
        self.check(action, ActionKind::Update)?;
        self.store.update(&self.source, record, params)
    }

    fn destroy(&self, action: &str, record: &Record) -> Result<Record> {
        self.check(action, ActionKind::Destroy)?;
        self.store.delete(&self.source, record)
    }
}

// ─────────────────────────────────────────────────────────────────
// Casting helpers
// ─────────────────────────────────────────────────────────────────

/// Cast a submitted value. `None` means the attribute is not castable from
/// parameters (to-many associations) and is dropped.
fn cast(native: &NativeType, value: &Value) -> Option<std::result::Result<Value, &'static str>> {
    let text = match value {
        Value::String(s) => Some(s.trim()),
        _ => None,
    };
    if text == Some("") {
        return Some(Ok(Value::Null));
    }
    let cast = match native {
        NativeType::Id | NativeType::Integer => match (value, text) {
            (Value::Number(n), _) if n.is_i64() || n.is_u64() => Ok(value.clone()),
            (_, Some(s)) => s.parse::<i64>().map(Value::from).map_err(|_| INVALID),
            _ => Err(INVALID),
        },
        NativeType::Float => match (value, text) {
            (Value::Number(_), _) => Ok(value.clone()),
            (_, Some(s)) => s
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or(INVALID),
            _ => Err(INVALID),
        },
        NativeType::Decimal => match (value, text) {
            (Value::Number(n), _) => Ok(Value::String(n.to_string())),
            (_, Some(s)) if s.parse::<f64>().is_ok() => Ok(Value::String(s.to_string())),
            _ => Err(INVALID),
        },
        NativeType::Boolean => match (value, text) {
            (Value::Bool(_), _) => Ok(value.clone()),
            (_, Some("true" | "on" | "1")) => Ok(Value::Bool(true)),
            (_, Some("false" | "off" | "0")) => Ok(Value::Bool(false)),
            _ => Err(INVALID),
        },
        NativeType::Enum(values) => match text {
            Some(s) if values.iter().any(|(_, v)| v == s) => Ok(Value::String(s.to_string())),
            _ => Err(INVALID),
        },
        NativeType::HasMany { .. } => return None,
        _ => Ok(value.clone()),
    };
    Some(cast)
}

fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let num = |v: Option<&Value>| match v {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.parse::<f64>().ok(),
        _ => None,
    };
    match (num(a), num(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => {
            let text = |v: Option<&Value>| match v {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            text(a).cmp(&text(b))
        }
    }
}

fn stamp(schema: &SchemaDef, record: &mut Record, inserted: bool) {
    let now = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string();
    if inserted && schema.attribute("inserted_at").is_some() {
        record.set("inserted_at", now.clone());
    }
    if schema.attribute("updated_at").is_some() {
        record.set("updated_at", now);
    }
}
