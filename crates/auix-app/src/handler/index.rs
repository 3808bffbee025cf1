//! Index page handlers: listing, paging, row deletion, stream updates

use auix_compiler::CompiledResource;
use auix_connector::{ListOptions, Page};
use auix_core::prelude::*;
use auix_core::{Record, RecordId};

use super::{navigation, UpdateAction, UpdateResult};
use crate::config::Settings;
use crate::message::Message;
use crate::state::{Screen, ViewState};

pub(crate) fn list_options(resource: &CompiledResource, settings: &Settings) -> ListOptions {
    ListOptions {
        page: 1,
        page_size: settings.ui.page_size,
        order_by: resource.order_by.clone(),
        preload: resource.index.preload.clone(),
        ..ListOptions::default()
    }
}

pub(crate) fn handle_listed(state: &mut ViewState, page: Page) -> UpdateResult {
    let Some(index) = state.index_mut() else {
        return UpdateResult::none();
    };
    debug!(
        "Listed {} rows (page {}/{})",
        page.entries.len(),
        page.info.page_number,
        page.info.total_pages
    );
    index.stream = page.entries;
    index.page_info = page.info;

    match state.pending_route.take() {
        Some(route) => UpdateResult::message(Message::HandleParams { route }),
        None => UpdateResult::none(),
    }
}

pub(crate) fn handle_paginate(state: &mut ViewState, page: usize) -> UpdateResult {
    let Some(index) = state.index_mut() else {
        return UpdateResult::none();
    };
    // Past the last known page the backend would only return an empty one.
    let page = page.clamp(1, index.page_info.total_pages.max(1));
    index.list_options.page = page;
    UpdateResult::action(UpdateAction::ToPage {
        opts: index.list_options.clone(),
        page,
    })
}

pub(crate) fn handle_delete(state: &mut ViewState, id: RecordId) -> UpdateResult {
    let record = match &state.screen {
        Screen::Index(index) => index.stream.iter().find(|r| r.id().as_ref() == Some(&id)),
        Screen::Show(show) => show.record.as_ref().filter(|r| r.id().as_ref() == Some(&id)),
    };
    match record {
        Some(record) => UpdateResult::action(UpdateAction::Delete {
            record: record.clone(),
        }),
        None => {
            warn!("Delete of unknown {} {}", state.resource, id);
            UpdateResult::none()
        }
    }
}

pub(crate) fn handle_deleted(
    state: &mut ViewState,
    resource: &CompiledResource,
    record: Record,
) -> UpdateResult {
    state.flash_info(format!("{} deleted", resource.title));
    match &mut state.screen {
        Screen::Index(index) => {
            index.remove(&record);
            UpdateResult::none()
        }
        Screen::Show(show) => {
            show.record = None;
            navigation::handle_back(state, resource)
        }
    }
}

/// A child form saved `record`.
pub(crate) fn handle_saved(state: &mut ViewState, record: Record) -> UpdateResult {
    match &mut state.screen {
        Screen::Index(index) => index.upsert(record),
        Screen::Show(show) => {
            if show.record.as_ref().map(Record::id) == Some(record.id()) {
                show.record = Some(record);
            }
        }
    }
    UpdateResult::none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::IndexState;
    use auix_connector::PageInfo;
    use auix_core::ViewKind;

    #[test]
    fn test_paginate_clamps_to_first_page() {
        let mut state = ViewState::new("product".into(), ViewKind::Index, Settings::default());
        let result = handle_paginate(&mut state, 0);
        assert!(matches!(result.action, Some(UpdateAction::ToPage { page: 1, .. })));
    }

    #[test]
    fn test_listed_without_pending_route() {
        let mut state = ViewState::new("product".into(), ViewKind::Index, Settings::default());
        let page = Page {
            entries: vec![Record::new().with("id", 1)],
            info: PageInfo::for_total(1, 20, 1),
        };
        let result = handle_listed(&mut state, page);
        assert!(result.message.is_none());
        let index: &IndexState = state.index().unwrap();
        assert_eq!(index.stream.len(), 1);
        assert_eq!(index.page_info.total_entries, 1);
    }

    #[test]
    fn test_delete_unknown_row_is_ignored() {
        let mut state = ViewState::new("product".into(), ViewKind::Index, Settings::default());
        let result = handle_delete(&mut state, RecordId::new("9"));
        assert!(result.action.is_none());
    }
}
