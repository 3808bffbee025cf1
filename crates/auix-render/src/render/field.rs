//! Field rendering
//!
//! A custom renderer replaces everything. Otherwise omitted fields render
//! nothing, associations and embeds get selects or nested tables, and
//! scalars branch on their html type.

use auix_compiler::{ViewNode, ViewTag};
use auix_core::prelude::*;
use auix_core::{
    ActionGroup, AssociationData, Field, FieldData, FieldKey, FieldKind, FieldType, HtmlType,
    Markup, Record, RelatedResource, SelectOption, ViewKind,
};

use super::{render_inner_elements, FieldMode, RenderContext};
use crate::components::{ContainerKind, InputProps, TableProps, TableRow};

/// Action groups of a nested table: header, row, footer.
type TableGroups = (ActionGroup, ActionGroup, ActionGroup);

const ONE_TO_MANY: TableGroups = (
    ActionGroup::OneToManyHeader,
    ActionGroup::OneToManyRow,
    ActionGroup::OneToManyFooter,
);

const EMBEDS_MANY: TableGroups = (
    ActionGroup::EmbedsManyHeader,
    ActionGroup::EmbedsManyRow,
    ActionGroup::EmbedsManyNewEntry,
);

pub fn render_field(ctx: &RenderContext<'_>, field: &Field) -> Markup {
    if let Some(renderer) = &field.renderer {
        return renderer.render(field, &ctx.record);
    }
    if field.omitted {
        return Markup::Empty;
    }
    match ctx.mode {
        FieldMode::Cell => render_cell(ctx, field),
        FieldMode::Input => match field.kind() {
            FieldKind::Association => render_association(ctx, field),
            FieldKind::Embed => render_embed(ctx, field),
            FieldKind::Scalar => render_scalar(ctx, field),
        },
    }
}

// ─────────────────────────────────────────────────────────
// Inputs
// ─────────────────────────────────────────────────────────

fn input_props(ctx: &RenderContext<'_>, field: &Field, key: &FieldKey) -> InputProps {
    let name = match &ctx.name_prefix {
        Some(prefix) => format!("{}[{}]", prefix, key),
        None => key.to_string(),
    };
    let mut errors = Vec::new();
    if let Some(cs) = ctx.change_set {
        errors.extend(cs.errors_for(key.as_str()).into_iter().map(str::to_string));
        // Belongs-to errors may be reported on the association itself.
        if *key != field.key {
            errors.extend(cs.errors_for(field.key.as_str()).into_iter().map(str::to_string));
        }
    }
    InputProps {
        id: format!("{}_{}", ctx.resource.name, name.replace(['[', ']'], "_")),
        name,
        label: field.label.clone(),
        value: ctx.record.display_value(key.as_str()),
        html_type: Some(if field.hidden {
            HtmlType::Hidden
        } else {
            field.html_type
        }),
        placeholder: field.placeholder.clone(),
        step: match &field.data {
            FieldData::Number { step } => Some(step.clone()),
            _ => None,
        },
        required: field.required,
        // Show pages never accept edits.
        disabled: field.disabled || ctx.view.kind == ViewKind::Show,
        readonly: field.readonly,
        errors,
    }
}

fn render_scalar(ctx: &RenderContext<'_>, field: &Field) -> Markup {
    let mut props = input_props(ctx, field, &field.key);
    match field.html_type {
        HtmlType::Select if !field.hidden => {
            let options: &[SelectOption] = match &field.data {
                FieldData::Select { options } => options.as_slice(),
                _ => &[],
            };
            ctx.components.select(&props, options)
        }
        HtmlType::Unimplemented => {
            // Inert until a renderer or html type override is declared.
            props.html_type = Some(HtmlType::Text);
            props.disabled = true;
            ctx.components.input(&props)
        }
        _ => ctx.components.input(&props),
    }
}

fn render_association(ctx: &RenderContext<'_>, field: &Field) -> Markup {
    let Some(data) = field.data.association() else {
        warn!(
            "Association {}.{} has no linkage; rendering nothing",
            field.resource, field.key
        );
        return Markup::Empty;
    };
    match field.field_type {
        FieldType::BelongsTo => {
            let props = input_props(ctx, field, &data.owner_key);
            ctx.components.select(&props, &to_one_options(ctx, field, data))
        }
        FieldType::HasOne => {
            let mut props = input_props(ctx, field, &field.key);
            props.value = ctx
                .record
                .related_one(&field.key)
                .and_then(|r| r.id())
                .map(|id| id.to_string())
                .unwrap_or_default();
            props.disabled = true;
            ctx.components.select(&props, &to_one_options(ctx, field, data))
        }
        _ => {
            let back_refs = back_references(data, field.data.related_resource());
            related_table(
                ctx,
                field,
                ctx.record.related_many(&field.key),
                ONE_TO_MANY,
                back_refs,
            )
        }
    }
}

/// Static options win; otherwise the related rows loaded for this field.
fn to_one_options(
    ctx: &RenderContext<'_>,
    field: &Field,
    data: &AssociationData,
) -> Vec<SelectOption> {
    if let Some(options) = &data.static_options {
        return options.clone();
    }
    let value_key = match field.field_type {
        FieldType::BelongsTo => data.related_key.as_str(),
        _ => "id",
    };
    ctx.state
        .options
        .get(&field.key)
        .map(|rows| {
            rows.iter()
                .map(|row| {
                    SelectOption::new(
                        data.option_label.label_for(row),
                        row.display_value(value_key),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Columns of the related side that point back at the owner.
fn back_references(data: &AssociationData, related: Option<&RelatedResource>) -> Vec<FieldKey> {
    let mut keys = vec![data.related_key.clone()];
    if let Some(related) = related {
        keys.extend(
            related
                .fields
                .iter()
                .filter(|f| {
                    f.data
                        .association()
                        .is_some_and(|d| d.owner_key == data.related_key)
                })
                .map(|f| f.key.clone()),
        );
    }
    keys
}

fn render_embed(ctx: &RenderContext<'_>, field: &Field) -> Markup {
    let Some(related) = field.data.related_resource() else {
        warn!(
            "Embed {}.{} has no sub-resource; rendering nothing",
            field.resource, field.key
        );
        return Markup::Empty;
    };
    match field.field_type {
        FieldType::EmbedsMany => related_table(
            ctx,
            field,
            ctx.record.related_many(&field.key),
            EMBEDS_MANY,
            Vec::new(),
        ),
        _ => {
            let mut node = ViewNode::new(ViewTag::Stacked);
            node.children = related
                .fields
                .iter()
                .map(|f| ViewNode::new(ViewTag::Field(Box::new(f.clone()))))
                .collect();
            let embedded = ctx
                .record
                .related_one(&field.key)
                .unwrap_or_else(Record::new);
            let nested = ctx.nested_under(&field.key).with_record(embedded);
            ctx.components.container(
                ContainerKind::Group,
                Some(&field.label),
                render_inner_elements(&nested, &node),
            )
        }
    }
}

/// A titled table over related rows, with the view's actions for `groups`.
fn related_table(
    ctx: &RenderContext<'_>,
    field: &Field,
    rows: Vec<Record>,
    groups: TableGroups,
    reject: Vec<FieldKey>,
) -> Markup {
    let Some(related) = field.data.related_resource() else {
        warn!(
            "{}.{} has no related resource to tabulate",
            field.resource, field.key
        );
        return Markup::Empty;
    };
    let (header, row_group, footer) = groups;
    let nested = ctx.rejecting(reject).in_cells();
    let columns = nested.columns(&related.fields);
    let action_ctx = ctx.related_action_context(&related.name, &field.key);

    let rows = rows
        .into_iter()
        .map(|row| {
            let row_ctx = nested.with_record(row.clone());
            TableRow {
                id: row.id().map(|id| id.to_string()),
                cells: columns.iter().map(|f| render_field(&row_ctx, f)).collect(),
                actions: ctx.actions(row_group, &action_ctx.clone().with_record(row)),
                click: None,
            }
        })
        .collect();

    let table = ctx.components.table(TableProps {
        id: format!("{}-{}", ctx.resource.name, field.key),
        columns: columns.iter().map(|f| f.label.clone()).collect(),
        rows,
        row_actions: !ctx.view.actions.get(row_group).is_empty(),
        empty_text: format!("No {}", field.label.to_lowercase()),
    });
    ctx.components.container(
        ContainerKind::Group,
        Some(&field.label),
        vec![
            ctx.actions(header, &action_ctx),
            table,
            ctx.actions(footer, &action_ctx),
        ],
    )
}

// ─────────────────────────────────────────────────────────
// Table cells
// ─────────────────────────────────────────────────────────

fn render_cell(ctx: &RenderContext<'_>, field: &Field) -> Markup {
    let record = &ctx.record;
    let text = match (&field.field_type, &field.data) {
        (FieldType::BelongsTo, FieldData::Association(data)) => {
            let owner_value = record.display_value(data.owner_key.as_str());
            record
                .related_one(&field.key)
                .map(|related| data.option_label.label_for(&related))
                .or_else(|| option_label(ctx, field, data, &owner_value))
                .unwrap_or(owner_value)
        }
        (FieldType::HasOne, FieldData::Association(data)) => record
            .related_one(&field.key)
            .map(|related| data.option_label.label_for(&related))
            .unwrap_or_default(),
        (FieldType::HasMany | FieldType::EmbedsMany, _) => {
            record.related_many(&field.key).len().to_string()
        }
        (FieldType::EmbedsOne, _) => String::new(),
        (_, FieldData::Select { options }) => {
            let value = record.display_value(field.key.as_str());
            options
                .iter()
                .find(|o| o.value == value)
                .map(|o| o.label.clone())
                .unwrap_or(value)
        }
        _ => record.display_value(field.key.as_str()),
    };
    ctx.components.text(&text)
}

/// Label of the loaded or static option whose value is `value`.
fn option_label(
    ctx: &RenderContext<'_>,
    field: &Field,
    data: &AssociationData,
    value: &str,
) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    to_one_options(ctx, field, data)
        .into_iter()
        .find(|o| o.value == value)
        .map(|o| o.label)
}
