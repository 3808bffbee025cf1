//! # Layout Expansion Engine
//!
//! Compiles registered resources and their declared layouts into a frozen
//! [`CompiledSite`]:
//!
//! 1. synthesize missing layouts (show mirrors a declared form)
//! 2. expand index trees to get every resource's columns
//! 3. expand all trees, resolving associations against those columns
//! 4. compute preloads up to the configured depth
//! 5. merge container action modifications onto the template defaults
//!
//! Omitted fields are stripped during expansion. The whole pass is pure.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use auix_core::layout::{default_detail, default_index};
use auix_core::prelude::*;
use auix_core::{
    label_for, DefaultActions, FieldType, LayoutSpec, LayoutTag, LayoutTree, ResourceName,
    SectionsId, TabId, ViewKind,
};

use crate::expand::{Expander, IndexColumns};
use crate::preload::PreloadGraph;
use crate::registry::{RegisteredResource, ResourceRegistry};
use crate::routes::{LiveAction, Route, RouteTable};
use crate::view::{CompiledResource, ViewConfig, ViewNode, ViewTag};

/// Global compile options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// How many association levels preloads nest.
    pub preload_depth: usize,
    /// Prefix of every route, e.g. `/admin`.
    pub base_path: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            preload_depth: 1,
            base_path: String::new(),
        }
    }
}

/// Every compiled resource plus the route table. Shared read-only by all
/// view instances.
#[derive(Debug, Clone)]
pub struct CompiledSite {
    resources: BTreeMap<ResourceName, Arc<CompiledResource>>,
    routes: RouteTable,
    options: CompileOptions,
}

impl CompiledSite {
    pub fn resource(&self, name: &ResourceName) -> Result<&Arc<CompiledResource>> {
        self.resources
            .get(name)
            .ok_or_else(|| Error::unknown_resource(name.as_str()))
    }

    pub fn resources(&self) -> impl Iterator<Item = &Arc<CompiledResource>> {
        self.resources.values()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn resolve(&self, path: &str) -> Result<Route> {
        self.routes.resolve(path)
    }

    pub fn path_for(
        &self,
        resource: &ResourceName,
        action: LiveAction,
        id: Option<&auix_core::RecordId>,
    ) -> Option<String> {
        self.routes.path_for(resource, action, id)
    }
}

/// The three trees a resource compiles, declared or synthesized.
struct Trees {
    index: LayoutTree,
    form: LayoutTree,
    show: LayoutTree,
}

impl Trees {
    fn get(&self, view: ViewKind) -> &LayoutTree {
        match view {
            ViewKind::Index => &self.index,
            ViewKind::Form => &self.form,
            ViewKind::Show => &self.show,
        }
    }
}

/// Compile every registered resource.
///
/// Fails on configuration errors: layouts for unknown resources, unknown
/// field keys, malformed trees, action groups not allowed in a view.
pub fn compile(
    registry: &ResourceRegistry,
    specs: &[LayoutSpec],
    defaults: &dyn DefaultActions,
    options: &CompileOptions,
) -> Result<CompiledSite> {
    let mut declared: BTreeMap<ResourceName, &LayoutSpec> = BTreeMap::new();
    for spec in specs {
        registry.require(&spec.resource)?;
        spec.validate()?;
        if declared.insert(spec.resource.clone(), spec).is_some() {
            return Err(Error::layout(
                spec.resource.as_str(),
                "layouts declared more than once",
            ));
        }
    }

    // 1. Default synthesis.
    let trees: BTreeMap<ResourceName, Trees> = registry
        .iter()
        .map(|resource| {
            let spec = declared.get(&resource.name).copied();
            (resource.name.clone(), synthesize(resource, spec))
        })
        .collect();

    // 2. Index columns, before association resolution.
    let mut columns = IndexColumns::new();
    for resource in registry.iter() {
        let index = Expander::new(registry, resource).expand(&trees[&resource.name].index)?;
        columns.insert(
            resource.name.clone(),
            index.fields().into_iter().cloned().collect(),
        );
    }

    // 3. Full expansion.
    let mut expanded: BTreeMap<ResourceName, BTreeMap<ViewKind, ViewNode>> = BTreeMap::new();
    let mut graph = PreloadGraph::new();
    for resource in registry.iter() {
        let expander = Expander::new(registry, resource).with_columns(&columns);
        let mut views = BTreeMap::new();
        for view in ViewKind::ALL {
            let root = expander.expand(trees[&resource.name].get(view))?;
            graph.collect(&resource.name, &root);
            views.insert(view, root);
        }
        expanded.insert(resource.name.clone(), views);
    }

    // 4-5. Preloads, actions, routes.
    let mut routes = RouteTable::new();
    let mut resources = BTreeMap::new();
    for resource in registry.iter() {
        let preload = graph.preload_for(&resource.name, options.preload_depth);
        let path = format!("{}/{}", options.base_path.trim_end_matches('/'), resource.plural);
        let Some(mut views) = expanded.remove(&resource.name) else {
            continue;
        };
        let resource_trees = &trees[&resource.name];

        let mut build = |view: ViewKind| -> Arc<ViewConfig> {
            let root = views
                .remove(&view)
                .unwrap_or_else(|| ViewNode::new(ViewTag::Inline));
            let tree = resource_trees.get(view);
            Arc::new(ViewConfig {
                kind: view,
                resource: resource.name.clone(),
                title: view_title(resource, tree, view),
                path: path.clone(),
                actions: merged_actions(tree, defaults),
                preload: preload.clone(),
                renders_one_to_many: renders_one_to_many(&root),
                default_tabs: default_tabs(tree),
                root,
            })
        };
        let index = build(ViewKind::Index);
        let form = build(ViewKind::Form);
        let show = build(ViewKind::Show);

        if resource.embedded_in.is_none() {
            routes.add(resource.name.clone(), path.clone())?;
        }

        debug!(
            "Compiled '{}': {} index columns, preload depth {}",
            resource.name,
            index.root.children.len(),
            preload.depth()
        );

        resources.insert(
            resource.name.clone(),
            Arc::new(CompiledResource {
                name: resource.name.clone(),
                title: resource.title.clone(),
                plural: resource.plural.clone(),
                path,
                embedded_in: resource.embedded_in.clone(),
                connector: resource.connector.clone(),
                fields: resource.fields.clone(),
                order_by: resource.order_by.clone(),
                preload,
                index,
                form,
                show,
            }),
        );
    }

    info!("Compiled {} resources", resources.len());

    Ok(CompiledSite {
        resources,
        routes,
        options: options.clone(),
    })
}

fn synthesize(resource: &RegisteredResource, spec: Option<&LayoutSpec>) -> Trees {
    let keys = resource.visible_keys();
    let declared = |view: ViewKind| spec.and_then(|s| s.tree(view)).cloned();

    let index = declared(ViewKind::Index).unwrap_or_else(|| default_index(&resource.name, &keys));
    let form = declared(ViewKind::Form)
        .unwrap_or_else(|| default_detail(ViewKind::Form, &resource.name, &keys));
    let show = match (declared(ViewKind::Show), declared(ViewKind::Form)) {
        (Some(show), _) => show,
        (None, Some(form)) => {
            trace!("Deriving show layout of '{}' from its form", resource.name);
            form.relabel(ViewKind::Show)
        }
        (None, None) => default_detail(ViewKind::Show, &resource.name, &keys),
    };
    Trees { index, form, show }
}

fn merged_actions(tree: &LayoutTree, defaults: &dyn DefaultActions) -> auix_core::ActionSet {
    let mut actions = defaults.default_actions(tree.view());
    let modifications: Vec<_> = tree
        .preorder()
        .into_iter()
        .flat_map(|id| tree.node(id).opts.actions.iter().cloned())
        .collect();
    actions.apply_all(&modifications);
    actions
}

/// Whether any to-many table appears anywhere in the form tree.
///
/// Sections are not consulted: a table behind a tab that is not current
/// still counts, so a create always moves on to the edit route where the
/// table can be filled.
fn renders_one_to_many(root: &ViewNode) -> bool {
    root.fields()
        .iter()
        .any(|f| matches!(f.field_type, FieldType::HasMany | FieldType::EmbedsMany))
}

fn default_tabs(tree: &LayoutTree) -> BTreeMap<SectionsId, TabId> {
    tree.preorder()
        .into_iter()
        .filter_map(|id| match &tree.node(id).tag {
            LayoutTag::Section {
                sections_id,
                tab_id,
                default: true,
                ..
            } => Some((sections_id.clone(), tab_id.clone())),
            _ => None,
        })
        .collect()
}

fn view_title(resource: &RegisteredResource, tree: &LayoutTree, view: ViewKind) -> String {
    if let Some(title) = &tree.root().opts.title {
        return title.clone();
    }
    match view {
        ViewKind::Index => label_for(&resource.plural),
        ViewKind::Form | ViewKind::Show => resource.title.clone(),
    }
}
