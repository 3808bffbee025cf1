//! Component library
//!
//! Every visual element the dispatcher emits goes through a [`Components`]
//! slot. [`BasicComponents`] produces plain semantic HTML with the classes
//! from [`crate::theme`]; a template swaps in its own implementation to
//! restyle every generated view at once.

use auix_app::Flash;
use auix_connector::PageInfo;
use auix_core::{Element, HtmlType, Markup, NavigationKind, SectionsId, SelectOption, TabId};

use crate::theme;

/// A client event bound to an element, sent back as a [`Message`].
///
/// [`Message`]: auix_app::Message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: &'static str,
    pub values: Vec<(&'static str, String)>,
}

impl Event {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            values: Vec::new(),
        }
    }

    pub fn value(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.values.push((key, value.into()));
        self
    }

    /// Bind this event to `element` as `data-event` plus one `data-*` per value.
    pub fn bind(&self, element: Element) -> Element {
        self.values.iter().fold(
            element.attr("data-event", self.name),
            |el, (key, value)| el.attr(format!("data-{}", key), value.as_str()),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Primary,
    Secondary,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Inline,
    Stacked,
    Group,
    Section,
}

/// Everything an input slot needs to draw one field.
#[derive(Debug, Clone, Default)]
pub struct InputProps {
    pub id: String,
    pub name: String,
    pub label: String,
    pub value: String,
    pub html_type: Option<HtmlType>,
    pub placeholder: String,
    pub step: Option<String>,
    pub required: bool,
    pub disabled: bool,
    pub readonly: bool,
    pub errors: Vec<String>,
}

impl InputProps {
    fn is_checked(&self) -> bool {
        matches!(self.value.as_str(), "true" | "on" | "1")
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableRow {
    pub id: Option<String>,
    pub cells: Vec<Markup>,
    pub actions: Markup,
    pub click: Option<Event>,
}

#[derive(Debug, Clone, Default)]
pub struct TableProps {
    pub id: String,
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
    /// Reserve a trailing column for row actions.
    pub row_actions: bool,
    pub empty_text: String,
}

/// Component slots used by the renderer.
pub trait Components: Send + Sync {
    fn button(&self, label: &str, event: &Event, kind: ButtonKind) -> Markup;

    fn submit(&self, label: &str) -> Markup;

    fn link(&self, label: &str, to: &str, kind: NavigationKind) -> Markup;

    fn input(&self, props: &InputProps) -> Markup;

    fn select(&self, props: &InputProps, options: &[SelectOption]) -> Markup;

    fn table(&self, props: TableProps) -> Markup;

    fn modal(&self, title: &str, body: Markup) -> Markup;

    fn tab_button(&self, label: &str, sections_id: &SectionsId, tab_id: &TabId, active: bool)
        -> Markup;

    fn tab_strip(&self, buttons: Vec<Markup>) -> Markup;

    fn container(&self, kind: ContainerKind, title: Option<&str>, children: Vec<Markup>) -> Markup;

    fn heading(&self, title: &str, subtitle: Option<&str>, actions: Markup) -> Markup;

    fn error_summary(&self, errors: &[String]) -> Markup;

    fn action_bar(&self, actions: Vec<Markup>) -> Markup;

    fn form(&self, id: &str, body: Vec<Markup>) -> Markup;

    fn flash(&self, flash: &Flash) -> Markup;

    fn pagination(&self, info: &PageInfo) -> Markup;

    fn page(&self, children: Vec<Markup>) -> Markup;

    /// Read-only value in a table cell or an inert field.
    fn text(&self, value: &str) -> Markup {
        Markup::text(value)
    }
}

/// Plain semantic HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicComponents;

impl BasicComponents {
    fn field_wrapper(&self, props: &InputProps, control: Element) -> Markup {
        Element::new("div")
            .class(theme::FIELD)
            .child(
                Element::new("label")
                    .attr("for", props.id.as_str())
                    .class(theme::LABEL)
                    .text(props.label.as_str()),
            )
            .child(control)
            .children(props.errors.iter().map(|e| {
                Element::new("p")
                    .class(theme::FIELD_ERROR)
                    .text(e.as_str())
                    .into()
            }))
            .into()
    }

    fn control_class(props: &InputProps) -> &'static str {
        if props.errors.is_empty() {
            theme::INPUT
        } else {
            theme::INPUT_ERROR
        }
    }
}

impl Components for BasicComponents {
    fn button(&self, label: &str, event: &Event, kind: ButtonKind) -> Markup {
        event
            .bind(
                Element::new("button")
                    .attr("type", "button")
                    .class(theme::button(kind)),
            )
            .text(label)
            .into()
    }

    fn submit(&self, label: &str) -> Markup {
        Element::new("button")
            .attr("type", "submit")
            .class(theme::button(ButtonKind::Primary))
            .text(label)
            .into()
    }

    fn link(&self, label: &str, to: &str, kind: NavigationKind) -> Markup {
        let kind = match kind {
            NavigationKind::Navigate => "navigate",
            NavigationKind::Patch => "patch",
        };
        Event::new("navigate")
            .value("kind", kind)
            .value("to", to)
            .bind(Element::new("a").attr("href", to).class(theme::LINK))
            .text(label)
            .into()
    }

    fn input(&self, props: &InputProps) -> Markup {
        let html_type = props.html_type.unwrap_or(HtmlType::Text);
        if html_type == HtmlType::Hidden {
            return Element::new("input")
                .attr("type", "hidden")
                .attr("id", props.id.as_str())
                .attr("name", props.name.as_str())
                .attr("value", props.value.as_str())
                .into();
        }

        let control = match html_type {
            HtmlType::Textarea => Element::new("textarea").text(props.value.as_str()),
            HtmlType::Checkbox => Element::new("input")
                .attr("type", "checkbox")
                .attr("value", "true")
                .flag("checked", props.is_checked()),
            other => {
                let el = Element::new("input")
                    .attr("type", other.input_type())
                    .attr("value", props.value.as_str());
                match &props.step {
                    Some(step) => el.attr("step", step.as_str()),
                    None => el,
                }
            }
        };
        let mut control = control
            .attr("id", props.id.as_str())
            .attr("name", props.name.as_str())
            .class(Self::control_class(props));
        if !props.placeholder.is_empty() && html_type != HtmlType::Checkbox {
            control = control.attr("placeholder", props.placeholder.as_str());
        }
        let control = control
            .flag("required", props.required)
            .flag("disabled", props.disabled)
            .flag("readonly", props.readonly);
        self.field_wrapper(props, control)
    }

    fn select(&self, props: &InputProps, options: &[SelectOption]) -> Markup {
        let blank = if props.required {
            Markup::Empty
        } else {
            Element::new("option").attr("value", "").into()
        };
        let control = Element::new("select")
            .attr("id", props.id.as_str())
            .attr("name", props.name.as_str())
            .class(Self::control_class(props))
            .flag("required", props.required)
            .flag("disabled", props.disabled || props.readonly)
            .child(blank)
            .children(options.iter().map(|o| {
                Element::new("option")
                    .attr("value", o.value.as_str())
                    .flag("selected", o.value == props.value)
                    .text(o.label.as_str())
                    .into()
            }));
        self.field_wrapper(props, control)
    }

    fn table(&self, props: TableProps) -> Markup {
        let width = props.columns.len() + usize::from(props.row_actions);
        let head = Element::new("tr")
            .children(
                props
                    .columns
                    .iter()
                    .map(|c| Element::new("th").text(c.as_str()).into()),
            )
            .child(if props.row_actions {
                Element::new("th").into()
            } else {
                Markup::Empty
            });

        let rows: Vec<Markup> = if props.rows.is_empty() {
            vec![Element::new("tr")
                .child(
                    Element::new("td")
                        .attr("colspan", width.to_string())
                        .class(theme::EMPTY)
                        .text(props.empty_text.as_str()),
                )
                .into()]
        } else {
            props
                .rows
                .into_iter()
                .map(|row| {
                    let mut tr = Element::new("tr");
                    if let Some(id) = &row.id {
                        tr = tr.attr("id", format!("{}-{}", props.id, id));
                    }
                    tr = tr.class(theme::ROW);
                    if let Some(click) = &row.click {
                        tr = click.bind(tr);
                    }
                    let actions = if props.row_actions {
                        Element::new("td")
                            .class(theme::ROW_ACTIONS)
                            .child(row.actions)
                            .into()
                    } else {
                        Markup::Empty
                    };
                    tr.children(row.cells.into_iter().map(|c| Element::new("td").child(c).into()))
                        .child(actions)
                        .into()
                })
                .collect()
        };

        Element::new("table")
            .attr("id", props.id.as_str())
            .class(theme::TABLE)
            .child(Element::new("thead").child(head))
            .child(Element::new("tbody").children(rows))
            .into()
    }

    fn modal(&self, title: &str, body: Markup) -> Markup {
        Element::new("div")
            .class(theme::MODAL)
            .attr("role", "dialog")
            .child(Element::new("h2").class(theme::TITLE).text(title))
            .child(body)
            .into()
    }

    fn tab_button(
        &self,
        label: &str,
        sections_id: &SectionsId,
        tab_id: &TabId,
        active: bool,
    ) -> Markup {
        Event::new("switch_section")
            .value("sections-id", sections_id.to_string())
            .value("tab-id", tab_id.to_string())
            .bind(
                Element::new("button")
                    .attr("type", "button")
                    .class(if active { theme::TAB_ACTIVE } else { theme::TAB }),
            )
            .text(label)
            .into()
    }

    fn tab_strip(&self, buttons: Vec<Markup>) -> Markup {
        Element::new("nav")
            .class(theme::TABS)
            .children(buttons)
            .into()
    }

    fn container(&self, kind: ContainerKind, title: Option<&str>, children: Vec<Markup>) -> Markup {
        let heading = match title {
            Some(title) if !title.is_empty() => {
                Element::new("h3").class(theme::TITLE).text(title).into()
            }
            _ => Markup::Empty,
        };
        Element::new("div")
            .class(theme::container(kind))
            .child(heading)
            .children(children)
            .into()
    }

    fn heading(&self, title: &str, subtitle: Option<&str>, actions: Markup) -> Markup {
        let subtitle = match subtitle {
            Some(s) => Element::new("p").class(theme::SUBTITLE).text(s).into(),
            None => Markup::Empty,
        };
        Element::new("header")
            .class(theme::HEADER)
            .child(Element::new("h1").class(theme::TITLE).text(title))
            .child(subtitle)
            .child(actions)
            .into()
    }

    fn error_summary(&self, errors: &[String]) -> Markup {
        if errors.is_empty() {
            return Markup::Empty;
        }
        Element::new("ul")
            .class(theme::ERROR_SUMMARY)
            .children(
                errors
                    .iter()
                    .map(|e| Element::new("li").text(e.as_str()).into()),
            )
            .into()
    }

    fn action_bar(&self, actions: Vec<Markup>) -> Markup {
        let actions = Markup::fragment(actions);
        if actions.is_empty() {
            return Markup::Empty;
        }
        Element::new("div")
            .class(theme::ACTIONS)
            .child(actions)
            .into()
    }

    fn form(&self, id: &str, body: Vec<Markup>) -> Markup {
        Element::new("form")
            .attr("id", id)
            .class(theme::FORM)
            .attr("data-change", "validate")
            .attr("data-submit", "save")
            .children(body)
            .into()
    }

    fn flash(&self, flash: &Flash) -> Markup {
        Event::new("dismiss_flash")
            .bind(
                Element::new("div")
                    .class(theme::flash(flash.kind))
                    .attr("role", "alert"),
            )
            .text(flash.message.as_str())
            .into()
    }

    fn pagination(&self, info: &PageInfo) -> Markup {
        if info.total_pages <= 1 {
            return Markup::Empty;
        }
        let page = info.page_number;
        let prev = if page > 1 {
            self.button(
                "Previous",
                &Event::new("paginate").value("page", (page - 1).to_string()),
                ButtonKind::Secondary,
            )
        } else {
            Markup::Empty
        };
        let next = if page < info.total_pages {
            self.button(
                "Next",
                &Event::new("paginate").value("page", (page + 1).to_string()),
                ButtonKind::Secondary,
            )
        } else {
            Markup::Empty
        };
        Element::new("nav")
            .class(theme::PAGINATION)
            .child(prev)
            .child(Element::new("span").text(format!("Page {} of {}", page, info.total_pages)))
            .child(next)
            .into()
    }

    fn page(&self, children: Vec<Markup>) -> Markup {
        Element::new("main")
            .class(theme::PAGE)
            .children(children)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_binds_data_attributes() {
        let el = Event::new("delete")
            .value("id", "3")
            .bind(Element::new("button"));
        assert_eq!(el.get_attr("data-event"), Some("delete"));
        assert_eq!(el.get_attr("data-id"), Some("3"));
    }

    #[test]
    fn test_input_marks_errors() {
        let props = InputProps {
            id: "product_name".into(),
            name: "name".into(),
            label: "Name".into(),
            errors: vec!["can't be blank".into()],
            ..Default::default()
        };
        let markup = BasicComponents.input(&props);
        let input = &markup.find_by_tag("input")[0];
        assert!(input.has_class("auix-input-error"));
        assert_eq!(markup.find_by_tag("p")[0].text_content(), "can't be blank");
    }

    #[test]
    fn test_checkbox_checked_from_value() {
        let props = InputProps {
            name: "active".into(),
            value: "true".into(),
            html_type: Some(HtmlType::Checkbox),
            ..Default::default()
        };
        let markup = BasicComponents.input(&props);
        assert_eq!(
            markup.find_by_tag("input")[0].get_attr("checked"),
            Some("")
        );
    }

    #[test]
    fn test_select_marks_current_option() {
        let props = InputProps {
            name: "product_id".into(),
            value: "2".into(),
            ..Default::default()
        };
        let options = [SelectOption::new("Widget", "1"), SelectOption::new("Bolt", "2")];
        let markup = BasicComponents.select(&props, &options);
        let selected: Vec<String> = markup
            .find_all(&|e| e.tag == "option" && e.get_attr("selected").is_some())
            .iter()
            .map(|e| e.text_content())
            .collect();
        assert_eq!(selected, vec!["Bolt"]);
        // Leading blank option for optional selects.
        assert_eq!(markup.find_by_tag("option").len(), 3);
    }

    #[test]
    fn test_empty_table_spans_all_columns() {
        let markup = BasicComponents.table(TableProps {
            id: "products".into(),
            columns: vec!["Name".into()],
            row_actions: true,
            empty_text: "No products".into(),
            ..Default::default()
        });
        let cell = &markup.find_by_tag("td")[0];
        assert_eq!(cell.get_attr("colspan"), Some("2"));
        assert_eq!(cell.text_content(), "No products");
    }

    #[test]
    fn test_pagination_hidden_for_single_page() {
        let info = PageInfo::for_total(1, 20, 3);
        assert!(BasicComponents.pagination(&info).is_empty());
        let info = PageInfo::for_total(2, 1, 3);
        let nav = BasicComponents.pagination(&info);
        assert_eq!(nav.find_by_tag("button").len(), 2);
        assert!(nav.text_content().contains("Page 2 of 3"));
    }
}
