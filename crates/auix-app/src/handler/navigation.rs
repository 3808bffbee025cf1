//! Routing stack handlers: mount, params, forward and back navigation

use auix_compiler::{action_path, CompiledResource, LiveAction, Route};
use auix_core::prelude::*;
use auix_core::{NavigationKind, Params, RecordId, RoutingEntry, RoutingStack};

use super::{index, UpdateAction, UpdateResult};
use crate::message::Message;
use crate::state::{IndexMode, Redirect, Screen, ShowMode, ViewState};

/// `path` with `stack` encoded into the `param` query parameter. An empty
/// stack adds nothing.
pub fn with_stack(path: &str, stack: &RoutingStack, param: &str) -> String {
    if stack.is_empty() {
        return path.to_string();
    }
    match stack.encode() {
        Ok(encoded) => {
            let sep = if path.contains('?') { '&' } else { '?' };
            format!("{}{}{}={}", path, sep, param, encoded)
        }
        Err(e) => {
            warn!("Dropping routing stack from {}: {}", path, e);
            path.to_string()
        }
    }
}

pub(crate) fn handle_mount(
    state: &mut ViewState,
    resource: &CompiledResource,
    route: Route,
) -> UpdateResult {
    debug!("Mounting {} {}", state.resource, route.action);
    match &mut state.screen {
        Screen::Index(index) => {
            index.list_options = index::list_options(resource, &state.settings);
            let opts = index.list_options.clone();
            state.pending_route = Some(route);
            UpdateResult::action(UpdateAction::List { opts })
        }
        Screen::Show(_) => UpdateResult::message(Message::HandleParams { route }),
    }
}

pub(crate) fn handle_params(
    state: &mut ViewState,
    resource: &CompiledResource,
    route: Route,
) -> UpdateResult {
    if route.resource != state.resource || route.action.view() != state.screen.kind() {
        warn!(
            "{} {} cannot be handled by a {} {} instance",
            route.resource,
            route.action,
            state.resource,
            state.screen.kind()
        );
        return UpdateResult::none();
    }

    let param = state.settings.routing.stack_param.clone();
    if let Some(encoded) = route.query.get_str(&param) {
        state.stack = RoutingStack::decode(encoded);
    }

    state.path = action_path(&resource.path, route.action, route.id.as_ref())
        .unwrap_or_else(|| resource.path.clone());
    state.live_action = route.action;
    state.form = None;

    match (&mut state.screen, route.action, route.id) {
        (Screen::Index(index), LiveAction::Index, _) => {
            index.mode = IndexMode::Listing;
            UpdateResult::none()
        }
        (Screen::Index(index), LiveAction::New, _) => {
            index.mode = IndexMode::Creating;
            UpdateResult::action(UpdateAction::NewRecord {
                attrs: business_params(&route.query, &param),
                preload: resource.preload.clone(),
            })
        }
        (Screen::Index(index), LiveAction::Edit, Some(id)) => {
            index.mode = IndexMode::Editing;
            get(resource, id)
        }
        (Screen::Show(show), LiveAction::Show, Some(id)) => {
            show.mode = ShowMode::Viewing;
            get(resource, id)
        }
        (Screen::Show(show), LiveAction::ShowEdit, Some(id)) => {
            show.mode = ShowMode::Editing;
            get(resource, id)
        }
        (_, action, _) => {
            debug!("No params to apply for {}", action);
            UpdateResult::none()
        }
    }
}

fn get(resource: &CompiledResource, id: RecordId) -> UpdateResult {
    UpdateResult::action(UpdateAction::Get {
        id,
        preload: resource.preload.clone(),
    })
}

/// Push the current path, then go to `to`.
pub(crate) fn handle_navigate(
    state: &mut ViewState,
    kind: NavigationKind,
    to: String,
) -> UpdateResult {
    let current = state.path.clone();
    state.stack.push(RoutingEntry { kind, path: current });
    state.redirect = Some(Redirect {
        kind,
        to: with_stack(&to, &state.stack, &state.settings.routing.stack_param),
    });
    UpdateResult::none()
}

pub(crate) fn handle_row_clicked(
    state: &mut ViewState,
    resource: &CompiledResource,
    id: RecordId,
) -> UpdateResult {
    match action_path(&resource.path, LiveAction::Show, Some(&id)) {
        Some(to) => handle_navigate(state, NavigationKind::Navigate, to),
        None => UpdateResult::none(),
    }
}

/// Pop the stack; an empty stack leads to the resource index.
pub(crate) fn handle_back(state: &mut ViewState, resource: &CompiledResource) -> UpdateResult {
    let fallback = match state.screen {
        Screen::Index(_) => RoutingEntry::patch(resource.path.clone()),
        Screen::Show(_) => RoutingEntry::navigate(resource.path.clone()),
    };
    let entry = state.stack.pop_or(fallback);
    trace!("Back to {} ({} left on stack)", entry.path, state.stack.len());
    state.redirect = Some(Redirect {
        kind: entry.kind,
        to: with_stack(&entry.path, &state.stack, &state.settings.routing.stack_param),
    });
    UpdateResult::none()
}

/// Patch to the edit route of a just-created record.
pub(crate) fn advance_to_edit(state: &mut ViewState, resource: &CompiledResource, id: &RecordId) {
    let action = match state.screen {
        Screen::Index(_) => LiveAction::Edit,
        Screen::Show(_) => LiveAction::ShowEdit,
    };
    if let Some(to) = action_path(&resource.path, action, Some(id)) {
        state.redirect = Some(Redirect {
            kind: NavigationKind::Patch,
            to: with_stack(&to, &state.stack, &state.settings.routing.stack_param),
        });
    }
}

/// Query params minus the routing stack.
pub(crate) fn business_params(query: &Params, stack_param: &str) -> Params {
    let mut params = query.clone();
    params.remove(stack_param);
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_stack_empty_adds_nothing() {
        assert_eq!(with_stack("/products", &RoutingStack::new(), "_stack"), "/products");
    }

    #[test]
    fn test_with_stack_round_trips() {
        let mut stack = RoutingStack::new();
        stack.push(RoutingEntry::navigate("/products"));
        let url = with_stack("/products/1?tab=a", &stack, "_stack");
        let (_, encoded) = url.split_once("&_stack=").unwrap();
        assert_eq!(RoutingStack::decode(encoded), stack);
    }

    #[test]
    fn test_business_params_drop_stack() {
        let query = Params::new().with("_stack", "abc").with("product_id", "1");
        let params = business_params(&query, "_stack");
        assert!(params.get("_stack").is_none());
        assert_eq!(params.get_str("product_id"), Some("1"));
    }
}
