//! Record loading for the show page and the edit overlays

use auix_compiler::{CompiledResource, LiveAction};
use auix_core::prelude::*;
use auix_core::{Params, Record, RecordId};

use super::{UpdateAction, UpdateResult};
use crate::state::{FormMode, FormState, IndexMode, Screen, ShowMode, ViewState};

/// A record requested by `Get` arrived. A missing record degrades to the
/// empty state with a flash instead of failing the view.
pub(crate) fn handle_loaded(
    state: &mut ViewState,
    resource: &CompiledResource,
    id: RecordId,
    record: Option<Record>,
) -> UpdateResult {
    let Some(record) = record else {
        warn!("{} {} not found", resource.name, id);
        match &mut state.screen {
            Screen::Index(index) => index.mode = IndexMode::Listing,
            Screen::Show(show) => {
                show.mode = ShowMode::Viewing;
                show.record = None;
            }
        }
        state.form = None;
        state.flash_error(format!("{} {} not found", resource.title, id));
        return UpdateResult::none();
    };

    if let Screen::Show(show) = &mut state.screen {
        show.record = Some(record.clone());
    }

    match state.live_action {
        LiveAction::Edit | LiveAction::ShowEdit => {
            state.form = Some(FormState::new(FormMode::Edit, record.clone()));
            UpdateResult::action(UpdateAction::Change {
                record,
                params: Params::new(),
            })
        }
        _ => UpdateResult::none(),
    }
}
