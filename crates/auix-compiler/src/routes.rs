//! # Route table
//!
//! Standard resource routes, all served by the index view's
//! parameter-driven state except the show family:
//!
//! | Path | Live action |
//! |---|---|
//! | `/<plural>` | [`LiveAction::Index`] |
//! | `/<plural>/new` | [`LiveAction::New`] |
//! | `/<plural>/:id/edit` | [`LiveAction::Edit`] |
//! | `/<plural>/:id` | [`LiveAction::Show`] |
//! | `/<plural>/:id/show/edit` | [`LiveAction::ShowEdit`] |

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use auix_core::prelude::*;
use auix_core::{Params, RecordId, ResourceName, ViewKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveAction {
    Index,
    New,
    Edit,
    Show,
    ShowEdit,
}

impl LiveAction {
    /// The view that mounts for this action.
    pub fn view(&self) -> ViewKind {
        match self {
            LiveAction::Index | LiveAction::New | LiveAction::Edit => ViewKind::Index,
            LiveAction::Show | LiveAction::ShowEdit => ViewKind::Show,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LiveAction::Index => "index",
            LiveAction::New => "new",
            LiveAction::Edit => "edit",
            LiveAction::Show => "show",
            LiveAction::ShowEdit => "show_edit",
        }
    }
}

impl fmt::Display for LiveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved request path.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub resource: ResourceName,
    pub action: LiveAction,
    pub id: Option<RecordId>,
    /// Decoded query parameters.
    pub query: Params,
}

#[derive(Debug, Clone)]
struct RouteEntry {
    resource: ResourceName,
    prefix: String,
    pattern: Regex,
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the five routes of a resource under `prefix` (e.g. `/products`).
    pub fn add(&mut self, resource: ResourceName, prefix: impl Into<String>) -> Result<()> {
        let prefix = prefix.into();
        if self.entries.iter().any(|e| e.prefix == prefix) {
            return Err(Error::config(format!(
                "route prefix '{}' of '{}' is already taken",
                prefix, resource
            )));
        }
        let pattern = Regex::new(&format!(
            r"^{}(?:/(?P<new>new)|/(?P<id>[^/]+)(?P<rest>/edit|/show/edit)?)?/?$",
            regex::escape(&prefix)
        ))
        .map_err(|e| Error::config(format!("route pattern for '{}': {}", resource, e)))?;
        self.entries.push(RouteEntry {
            resource,
            prefix,
            pattern,
        });
        Ok(())
    }

    /// Resolve a path with an optional query string.
    pub fn resolve(&self, path: &str) -> Result<Route> {
        let (path_part, query) = match path.split_once('?') {
            Some((p, q)) => (p, q),
            None => (path, ""),
        };
        let query = Params::from_pairs(
            url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        );

        for entry in &self.entries {
            let Some(caps) = entry.pattern.captures(path_part) else {
                continue;
            };
            let id = caps.name("id").map(|m| RecordId::new(m.as_str()));
            let action = match (caps.name("new"), &id, caps.name("rest").map(|m| m.as_str())) {
                (Some(_), _, _) => LiveAction::New,
                (None, None, _) => LiveAction::Index,
                (None, Some(_), None) => LiveAction::Show,
                (None, Some(_), Some("/edit")) => LiveAction::Edit,
                (None, Some(_), Some(_)) => LiveAction::ShowEdit,
            };
            trace!("{} resolved to {} {}", path, entry.resource, action);
            return Ok(Route {
                resource: entry.resource.clone(),
                action,
                id,
                query,
            });
        }
        Err(Error::route_not_found(path_part))
    }

    /// Path for an action on a resource.
    pub fn path_for(
        &self,
        resource: &ResourceName,
        action: LiveAction,
        id: Option<&RecordId>,
    ) -> Option<String> {
        let entry = self.entries.iter().find(|e| &e.resource == resource)?;
        action_path(&entry.prefix, action, id)
    }

    /// `(pattern, resource, action)` rows for listing.
    pub fn describe(&self) -> Vec<(String, ResourceName, LiveAction)> {
        self.entries
            .iter()
            .flat_map(|e| {
                [
                    (e.prefix.clone(), LiveAction::Index),
                    (format!("{}/new", e.prefix), LiveAction::New),
                    (format!("{}/:id/edit", e.prefix), LiveAction::Edit),
                    (format!("{}/:id", e.prefix), LiveAction::Show),
                    (format!("{}/:id/show/edit", e.prefix), LiveAction::ShowEdit),
                ]
                .into_iter()
                .map(|(path, action)| (path, e.resource.clone(), action))
            })
            .collect()
    }
}

/// Path of `action` under a resource prefix. `None` when the action needs
/// an id and none is given.
pub fn action_path(prefix: &str, action: LiveAction, id: Option<&RecordId>) -> Option<String> {
    let path = match (action, id) {
        (LiveAction::Index, _) => prefix.to_string(),
        (LiveAction::New, _) => format!("{}/new", prefix),
        (LiveAction::Edit, Some(id)) => format!("{}/{}/edit", prefix, id),
        (LiveAction::Show, Some(id)) => format!("{}/{}", prefix, id),
        (LiveAction::ShowEdit, Some(id)) => format!("{}/{}/show/edit", prefix, id),
        (_, None) => return None,
    };
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        let mut table = RouteTable::new();
        table.add("product".into(), "/products").unwrap();
        table
            .add("product_transaction".into(), "/product_transactions")
            .unwrap();
        table
    }

    #[test]
    fn test_resolve_every_action() {
        let table = table();
        let cases = [
            ("/products", LiveAction::Index, None),
            ("/products/new", LiveAction::New, None),
            ("/products/7/edit", LiveAction::Edit, Some("7")),
            ("/products/7", LiveAction::Show, Some("7")),
            ("/products/7/show/edit", LiveAction::ShowEdit, Some("7")),
        ];
        for (path, action, id) in cases {
            let route = table.resolve(path).unwrap();
            assert_eq!(route.resource.as_str(), "product", "{}", path);
            assert_eq!(route.action, action, "{}", path);
            assert_eq!(route.id.as_ref().map(RecordId::as_str), id, "{}", path);
        }
    }

    #[test]
    fn test_prefix_does_not_shadow_longer_resource() {
        let route = table().resolve("/product_transactions/3").unwrap();
        assert_eq!(route.resource.as_str(), "product_transaction");
    }

    #[test]
    fn test_query_is_decoded() {
        let route = table().resolve("/products?_stack=abc%3D&page=2").unwrap();
        assert_eq!(route.query.get_str("_stack"), Some("abc="));
        assert_eq!(route.query.get_str("page"), Some("2"));
    }

    #[test]
    fn test_unknown_path() {
        let err = table().resolve("/orders").unwrap_err();
        assert!(matches!(err, Error::RouteNotFound { .. }));
        assert!(table().resolve("/products/1/delete/now").is_err());
    }

    #[test]
    fn test_path_for() {
        let table = table();
        let id = RecordId::new("5");
        let product = ResourceName::new("product");
        assert_eq!(
            table.path_for(&product, LiveAction::ShowEdit, Some(&id)).as_deref(),
            Some("/products/5/show/edit")
        );
        assert_eq!(table.path_for(&product, LiveAction::Edit, None), None);
    }

    #[test]
    fn test_duplicate_prefix() {
        let mut table = table();
        assert!(table.add("other".into(), "/products").is_err());
    }
}
