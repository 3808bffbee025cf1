//! Tab switching for sections blocks

use auix_compiler::{CompiledResource, ViewTag};
use auix_core::prelude::*;
use auix_core::{SectionsId, TabId};

use super::UpdateResult;
use crate::state::ViewState;

pub(crate) fn handle_switch_section(
    state: &mut ViewState,
    resource: &CompiledResource,
    sections_id: SectionsId,
    tab_id: TabId,
) -> UpdateResult {
    let view = state.active_view(resource);
    let known = view.root.find_all(&|node| {
        matches!(
            &node.tag,
            ViewTag::Section { sections_id: s, tab_id: t, .. } if *s == sections_id && *t == tab_id
        )
    });
    if known.is_empty() {
        debug!("Ignoring switch to unknown tab {} of {}", tab_id, sections_id);
        return UpdateResult::none();
    }
    trace!("Switching {} to {}", sections_id, tab_id);
    state.tabs.switch(sections_id, tab_id);
    UpdateResult::none()
}
