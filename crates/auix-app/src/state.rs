//! Per-instance view state
//!
//! Owned exclusively by one view instance; nothing here is shared.

use std::collections::BTreeMap;
use std::sync::Arc;

use auix_compiler::{CompiledResource, LiveAction, Route, ViewConfig};
use auix_connector::{ListOptions, PageInfo};
use auix_core::{
    ChangeSet, FieldKey, NavigationKind, Params, Record, ResourceName, RoutingStack, SectionsId,
    TabId, ViewKind,
};

use crate::config::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexMode {
    #[default]
    Listing,
    Editing,
    Creating,
}

#[derive(Debug, Clone, Default)]
pub struct IndexState {
    pub mode: IndexMode,
    /// Rows of the current page, in backend order.
    pub stream: Vec<Record>,
    pub page_info: PageInfo,
    pub list_options: ListOptions,
}

impl IndexState {
    /// Replace the row with the same id, or append.
    pub fn upsert(&mut self, record: Record) {
        let id = record.id();
        match self.stream.iter_mut().find(|r| id.is_some() && r.id() == id) {
            Some(row) => *row = record,
            None => self.stream.push(record),
        }
    }

    pub fn remove(&mut self, record: &Record) {
        let id = record.id();
        self.stream.retain(|r| r.id() != id);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowMode {
    #[default]
    Viewing,
    Editing,
}

#[derive(Debug, Clone, Default)]
pub struct ShowState {
    pub mode: ShowMode,
    pub record: Option<Record>,
}

/// The page an instance renders.
#[derive(Debug, Clone)]
pub enum Screen {
    Index(IndexState),
    Show(ShowState),
}

impl Screen {
    pub fn kind(&self) -> ViewKind {
        match self {
            Screen::Index(_) => ViewKind::Index,
            Screen::Show(_) => ViewKind::Show,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    New,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Validating,
    Saving,
    Saved,
    Errored,
}

/// The form overlay of an index or show page.
#[derive(Debug, Clone)]
pub struct FormState {
    pub mode: FormMode,
    pub status: FormStatus,
    pub record: Record,
    pub change_set: ChangeSet,
    /// Last submitted params, kept across failed saves.
    pub params: Params,
}

impl FormState {
    pub fn new(mode: FormMode, record: Record) -> Self {
        Self {
            mode,
            status: FormStatus::Validating,
            change_set: ChangeSet::new(record.clone(), Params::new()),
            record,
            params: Params::new(),
        }
    }

    /// The values the inputs show: the record with the submitted params.
    pub fn values(&self) -> Record {
        self.change_set.applied()
    }
}

/// Selected tab per sections block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabState(BTreeMap<SectionsId, TabId>);

impl TabState {
    pub fn switch(&mut self, sections_id: SectionsId, tab_id: TabId) {
        self.0.insert(sections_id, tab_id);
    }

    /// The explicit selection, else the view's default tab.
    pub fn current<'a>(&'a self, sections_id: &SectionsId, view: &'a ViewConfig) -> Option<&'a TabId> {
        self.0
            .get(sections_id)
            .or_else(|| view.default_tabs.get(sections_id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

/// Navigation the host should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub kind: NavigationKind,
    /// Target path, with the encoded stack in the query when non-empty.
    pub to: String,
}

/// State of one view instance.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub resource: ResourceName,
    pub screen: Screen,
    pub live_action: LiveAction,
    /// Current path, without query.
    pub path: String,
    pub stack: RoutingStack,
    pub tabs: TabState,
    pub form: Option<FormState>,
    /// Related rows offered by to-one selects, per field.
    pub options: BTreeMap<FieldKey, Vec<Record>>,
    pub flash: Option<Flash>,
    pub redirect: Option<Redirect>,
    pub settings: Settings,
    /// Route whose params apply once the initial listing arrives.
    pub(crate) pending_route: Option<Route>,
}

impl ViewState {
    pub fn new(resource: ResourceName, kind: ViewKind, settings: Settings) -> Self {
        let screen = match kind {
            ViewKind::Show => Screen::Show(ShowState::default()),
            ViewKind::Index | ViewKind::Form => Screen::Index(IndexState::default()),
        };
        Self {
            resource,
            live_action: match screen {
                Screen::Index(_) => LiveAction::Index,
                Screen::Show(_) => LiveAction::Show,
            },
            screen,
            path: String::new(),
            stack: RoutingStack::new(),
            tabs: TabState::default(),
            form: None,
            options: BTreeMap::new(),
            flash: None,
            redirect: None,
            settings,
            pending_route: None,
        }
    }

    pub fn index(&self) -> Option<&IndexState> {
        match &self.screen {
            Screen::Index(index) => Some(index),
            Screen::Show(_) => None,
        }
    }

    pub fn index_mut(&mut self) -> Option<&mut IndexState> {
        match &mut self.screen {
            Screen::Index(index) => Some(index),
            Screen::Show(_) => None,
        }
    }

    pub fn show(&self) -> Option<&ShowState> {
        match &self.screen {
            Screen::Show(show) => Some(show),
            Screen::Index(_) => None,
        }
    }

    pub fn show_mut(&mut self) -> Option<&mut ShowState> {
        match &mut self.screen {
            Screen::Show(show) => Some(show),
            Screen::Index(_) => None,
        }
    }

    pub fn flash_info(&mut self, message: impl Into<String>) {
        self.set_flash(FlashKind::Info, message.into());
    }

    pub fn flash_error(&mut self, message: impl Into<String>) {
        self.set_flash(FlashKind::Error, message.into());
    }

    fn set_flash(&mut self, kind: FlashKind, message: String) {
        if self.settings.ui.show_flash {
            self.flash = Some(Flash { kind, message });
        }
    }

    /// The view currently on screen: the form while one is open, else the
    /// page itself.
    pub fn active_view<'a>(&self, resource: &'a CompiledResource) -> &'a Arc<ViewConfig> {
        if self.form.is_some() {
            &resource.form
        } else {
            resource.view(self.screen.kind())
        }
    }

    pub fn take_redirect(&mut self) -> Option<Redirect> {
        self.redirect.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_replaces_by_id_and_appends_new() {
        let mut index = IndexState::default();
        index.upsert(Record::new().with("id", 1).with("name", "Widget"));
        index.upsert(Record::new().with("id", 2).with("name", "Bolt"));
        index.upsert(Record::new().with("id", 1).with("name", "Gadget"));

        let names: Vec<String> = index.stream.iter().map(|r| r.display_value("name")).collect();
        assert_eq!(names, vec!["Gadget", "Bolt"]);

        index.remove(&Record::new().with("id", 1));
        assert_eq!(index.stream.len(), 1);
    }

    #[test]
    fn test_flash_respects_setting() {
        let mut settings = Settings::default();
        settings.ui.show_flash = false;
        let mut state = ViewState::new("product".into(), ViewKind::Index, settings);
        state.flash_error("nope");
        assert!(state.flash.is_none());

        let mut state = ViewState::new("product".into(), ViewKind::Index, Settings::default());
        state.flash_info("Saved");
        assert_eq!(state.flash.as_ref().map(|f| f.kind), Some(FlashKind::Info));
    }
}
