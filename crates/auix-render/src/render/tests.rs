//! Renderer tests over the seeded product/transaction site.

use std::sync::Arc;

use auix_app::test_utils::product_registry;
use auix_app::{Message, Settings, ViewInstance};
use auix_compiler::{compile, CompileOptions, CompiledSite, ViewNode, ViewTag};
use auix_connector::test_utils::seeded_store;
use auix_core::{
    Element, Field, FieldOverrides, FieldType, LayoutBuilder, LayoutSpec, Markup, Params, Record,
    SectionsId, TabId,
};
use insta::assert_snapshot;

use super::*;
use crate::components::BasicComponents;
use crate::template::BasicTemplate;
use crate::view::render_view;

fn transaction_index(keys: &[&str]) -> LayoutSpec {
    LayoutSpec::new("product_transaction").index(
        LayoutBuilder::index("product_transaction")
            .fields(keys.iter().copied())
            .build(),
    )
}

fn site(specs: &[LayoutSpec]) -> Arc<CompiledSite> {
    let registry = product_registry(&seeded_store()).unwrap();
    Arc::new(compile(&registry, specs, &BasicTemplate, &CompileOptions::default()).unwrap())
}

fn mount_with(specs: &[LayoutSpec], path: &str) -> ViewInstance {
    ViewInstance::mount(site(specs), path, Settings::default()).unwrap()
}

fn mount(path: &str) -> ViewInstance {
    mount_with(&[transaction_index(&["type", "quantity"])], path)
}

fn page(instance: &ViewInstance) -> Markup {
    render_view(instance.site(), instance.state(), &BasicComponents).unwrap()
}

fn texts(elements: &[&Element]) -> Vec<String> {
    elements.iter().map(|e| e.text_content()).collect()
}

fn table<'m>(markup: &'m Markup, id: &str) -> &'m Element {
    markup
        .find_all(&|e| e.tag == "table" && e.get_attr("id") == Some(id))
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("no table {}", id))
}

fn input<'m>(markup: &'m Markup, name: &str) -> Option<&'m Element> {
    markup
        .find_all(&|e| {
            matches!(e.tag.as_str(), "input" | "select" | "textarea")
                && e.get_attr("name") == Some(name)
        })
        .into_iter()
        .next()
}

// ─────────────────────────────────────────────────────────
// Index
// ─────────────────────────────────────────────────────────

#[test]
fn test_index_renders_columns_and_rows() {
    let instance = mount("/products");
    let markup = page(&instance);
    let products: Markup = table(&markup, "products").clone().into();

    assert_eq!(
        texts(&products.find_by_tag("th")),
        vec!["Id", "Name", "Price", "Product Transactions", ""]
    );
    let rows = products.find_all(&|e| e.has_class("auix-row"));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get_attr("id"), Some("products-1"));
    assert_eq!(rows[0].get_attr("data-event"), Some("row_clicked"));
    assert!(rows[0].text_content().contains("Widget"));
    assert!(rows[1].text_content().contains("Bolt"));
}

#[test]
fn test_index_row_and_header_actions() {
    let instance = mount("/products");
    let markup = page(&instance);

    let header = &markup.find_by_tag("header")[0];
    let new_link = Markup::from((*header).clone());
    assert_eq!(
        new_link.find_by_tag("a")[0].get_attr("href"),
        Some("/products/new")
    );

    let row: Markup = markup
        .find_all(&|e| e.get_attr("id") == Some("products-1"))[0]
        .clone()
        .into();
    assert_eq!(row.find_by_tag("a")[0].get_attr("href"), Some("/products/1/edit"));
    let delete = &row.find_by_tag("button")[0];
    assert_eq!(delete.get_attr("data-event"), Some("delete"));
    assert_eq!(delete.get_attr("data-id"), Some("1"));
}

#[test]
fn test_index_hides_foreign_key_behind_belongs_to_column() {
    let instance = mount_with(&[], "/product_transactions");
    let markup = page(&instance);
    let transactions = Markup::from(table(&markup, "product_transactions").clone());
    let headers = texts(&transactions.find_by_tag("th"));
    assert!(headers.contains(&"Product".to_string()));
    assert!(!headers.contains(&"Product Id".to_string()));
}

// ─────────────────────────────────────────────────────────
// Form overlay
// ─────────────────────────────────────────────────────────

#[test]
fn test_new_route_renders_form_modal() {
    let instance = mount("/products/new");
    let markup = page(&instance);

    let modal = markup.find_all(&|e| e.has_class("auix-modal"));
    assert_eq!(modal.len(), 1);
    assert_eq!(markup.find_by_tag("h2")[0].text_content(), "New Product");

    let form = &markup.find_by_tag("form")[0];
    assert_eq!(form.get_attr("id"), Some("product-form"));
    assert_eq!(form.get_attr("data-submit"), Some("save"));

    assert!(input(&markup, "name").is_some());
    assert_eq!(
        input(&markup, "price").and_then(|e| e.get_attr("step")),
        Some("0.01")
    );
    assert_eq!(
        input(&markup, "id").and_then(|e| e.get_attr("disabled")),
        Some("")
    );
    let submit = markup.find_all(&|e| e.get_attr("type") == Some("submit"));
    assert_eq!(texts(&submit), vec!["Save"]);
}

#[test]
fn test_failed_save_shows_errors_and_keeps_params() {
    let mut instance = mount("/products/new");
    instance.dispatch(Message::Save {
        params: Params::from_pairs([("price", "1.00")]),
    });
    let markup = page(&instance);

    let summary = markup.find_all(&|e| e.has_class("auix-error-summary"));
    assert_eq!(summary[0].text_content(), "Name can't be blank");

    let name = input(&markup, "name").unwrap();
    assert!(name.has_class("auix-input-error"));
    assert_eq!(input(&markup, "price").and_then(|e| e.get_attr("value")), Some("1.00"));
}

#[test]
fn test_belongs_to_select_lists_loaded_options() {
    let instance = mount("/product_transactions/new?product_id=2");
    let markup = page(&instance);

    // The foreign key is drawn once, as the select.
    let named = markup.find_all(&|e| e.get_attr("name") == Some("product_id"));
    assert_eq!(named.len(), 1);

    let field = markup.find_all(&|e| {
        e.has_class("auix-field")
            && !Markup::from(e.clone())
                .find_all(&|c| c.get_attr("name") == Some("product_id"))
                .is_empty()
    })[0]
        .clone();
    assert_snapshot!(Markup::from(field).to_html(), @r#"<div class="auix-field"><label for="product_transaction_product_id" class="auix-label">Product</label><select id="product_transaction_product_id" name="product_id" class="auix-input"><option value></option><option value="1">Widget</option><option value="2" selected>Bolt</option></select></div>"#);
}

// ─────────────────────────────────────────────────────────
// Show
// ─────────────────────────────────────────────────────────

#[test]
fn test_show_is_read_only_with_related_table() {
    let instance = mount("/products/1");
    let markup = page(&instance);

    let inputs = markup.find_by_tag("input");
    assert!(!inputs.is_empty());
    assert!(inputs.iter().all(|e| e.get_attr("disabled").is_some()));

    let related: Markup = table(&markup, "product-product_transactions").clone().into();
    assert_eq!(texts(&related.find_by_tag("th")), vec!["Type", "Quantity", ""]);
    let rows = related.find_all(&|e| e.has_class("auix-row"));
    assert_eq!(rows.len(), 2);

    let mut types: Vec<String> = rows
        .iter()
        .map(|row| Markup::from((*row).clone()).find_by_tag("td")[0].text_content())
        .collect();
    types.sort();
    assert_eq!(types, vec!["In", "Out"]);

    let links = related.find_by_tag("a");
    assert!(links
        .iter()
        .all(|a| a.get_attr("href").is_some_and(|h| h.starts_with("/product_transactions/"))));
}

#[test]
fn test_related_table_rejects_back_references() {
    let instance = mount_with(
        &[transaction_index(&["type", "quantity", "product_id", "product"])],
        "/products/1",
    );
    let markup = page(&instance);
    let related: Markup = table(&markup, "product-product_transactions").clone().into();
    assert_eq!(texts(&related.find_by_tag("th")), vec!["Type", "Quantity", ""]);
}

#[test]
fn test_show_missing_record_renders_empty_state() {
    let instance = mount("/products/99");
    let markup = page(&instance);
    assert!(markup.text_content().contains("Product 99 not found"));
    assert!(markup.text_content().contains("No product loaded"));
    assert!(markup.find_by_tag("table").is_empty());
}

// ─────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────

fn sectioned() -> LayoutSpec {
    LayoutSpec::new("product").form(
        LayoutBuilder::form("product")
            .sections(|s| {
                s.section("Main", |b| b.field("name"))
                    .section("Prices", |b| b.field("price"))
            })
            .build(),
    )
}

#[test]
fn test_sections_render_tab_strip_and_current_tab_only() {
    let mut instance = mount_with(&[sectioned()], "/products/1/edit");
    let markup = page(&instance);

    let strip: Markup = markup.find_by_tag("nav")[0].clone().into();
    assert_snapshot!(strip.to_html(), @r#"<nav class="auix-tabs"><button type="button" class="auix-tab auix-tab-active" data-event="switch_section" data-sections-id="product-form-sections-0" data-tab-id="product-form-sections-0-tab-0">Main</button><button type="button" class="auix-tab" data-event="switch_section" data-sections-id="product-form-sections-0" data-tab-id="product-form-sections-0-tab-1">Prices</button></nav>"#);
    assert!(input(&markup, "name").is_some());
    assert!(input(&markup, "price").is_none());

    instance.dispatch(Message::SwitchSection {
        sections_id: SectionsId::new("product-form-sections-0"),
        tab_id: TabId::new("product-form-sections-0-tab-1"),
    });
    let markup = page(&instance);
    assert!(input(&markup, "name").is_none());
    assert_eq!(
        input(&markup, "price").and_then(|e| e.get_attr("value")),
        Some("9.99")
    );
}

// ─────────────────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────────────────

#[test]
fn test_container_tag_outside_its_view_renders_nothing() {
    let instance = mount("/products/new");
    let site = instance.site();
    let resource = instance.resource();
    let ctx = RenderContext::new(
        &BasicComponents,
        site,
        resource,
        &resource.form,
        instance.state(),
    );
    assert_eq!(render(&ctx, &ViewNode::new(ViewTag::Index)), Markup::Empty);
    assert_eq!(render(&ctx, &ViewNode::new(ViewTag::Show)), Markup::Empty);
}

#[test]
fn test_custom_renderer_bypasses_defaults() {
    let instance = mount("/products/new");
    let resource = instance.resource();
    let ctx = RenderContext::new(
        &BasicComponents,
        instance.site(),
        resource,
        &resource.form,
        instance.state(),
    )
    .with_record(Record::new().with("name", "Widget"));

    let mut field = Field::new("product", "name", FieldType::String);
    field.apply(&FieldOverrides::new().omitted(true).renderer(|field, record| {
        Markup::text(format!("{}: {}", field.label, record.display_value("name")))
    }));
    assert_eq!(render_field(&ctx, &field), Markup::text("Name: Widget"));

    field.renderer = None;
    assert_eq!(render_field(&ctx, &field), Markup::Empty);
}

#[test]
fn test_unresolved_association_and_embed_render_nothing() {
    let instance = mount("/products/new");
    let resource = instance.resource();
    let ctx = RenderContext::new(
        &BasicComponents,
        instance.site(),
        resource,
        &resource.form,
        instance.state(),
    );

    let owner = Field::new("product_transaction", "product", FieldType::BelongsTo);
    assert_eq!(render_field(&ctx, &owner), Markup::Empty);
    let embed = Field::new("product", "dimensions", FieldType::EmbedsOne);
    assert_eq!(render_field(&ctx, &embed), Markup::Empty);
}

#[test]
fn test_render_inner_elements_skips_rejected_fields() {
    let instance = mount("/products/new");
    let resource = instance.resource();
    let ctx = RenderContext::new(
        &BasicComponents,
        instance.site(),
        resource,
        &resource.form,
        instance.state(),
    )
    .rejecting(["name".into()]);

    let mut node = ViewNode::new(ViewTag::Stacked);
    node.children = ["name", "price"]
        .into_iter()
        .map(|key| {
            ViewNode::new(ViewTag::Field(Box::new(Field::new(
                "product",
                key,
                FieldType::String,
            ))))
        })
        .collect();
    let rendered = Markup::fragment(render_inner_elements(&ctx, &node));
    assert!(input(&rendered, "name").is_none());
    assert!(input(&rendered, "price").is_some());
}
