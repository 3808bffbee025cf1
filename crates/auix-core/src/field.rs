//! # Field Model
//!
//! Normalized per-field metadata used by layouts and renderers.
//!
//! - [`Field`] - One UI-facing column/input descriptor
//! - [`FieldType`] - Semantic data type, classified by [`FieldKind`]
//! - [`HtmlType`] - Rendering hint for inputs
//! - [`FieldData`] - Type-specific extra metadata (options, linkage)
//! - [`FieldOverrides`] - Partial field, merged last-applied-wins

use std::fmt;
use std::sync::Arc;

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

use crate::markup::Markup;
use crate::record::Record;
use crate::types::{FieldKey, ResourceName};

// ============================================================================
// FieldType
// ============================================================================

/// Exactly one of these classifies every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Scalar,
    Association,
    Embed,
}

/// Semantic data type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Id,
    BinaryId,
    String,
    Text,
    Integer,
    Float,
    Decimal,
    Boolean,
    Date,
    Time,
    NaiveDatetime,
    UtcDatetime,
    Enum,
    Map,
    Array,
    BelongsTo,
    HasOne,
    HasMany,
    EmbedsOne,
    EmbedsMany,
    Unsupported(String),
}

impl FieldType {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldType::BelongsTo | FieldType::HasOne | FieldType::HasMany => {
                FieldKind::Association
            }
            FieldType::EmbedsOne | FieldType::EmbedsMany => FieldKind::Embed,
            _ => FieldKind::Scalar,
        }
    }

    pub fn is_association(&self) -> bool {
        self.kind() == FieldKind::Association
    }

    pub fn is_one_to_many(&self) -> bool {
        matches!(self, FieldType::HasMany)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::Integer | FieldType::Float | FieldType::Decimal
        )
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            FieldType::Date | FieldType::Time | FieldType::NaiveDatetime | FieldType::UtcDatetime
        )
    }

    /// Fixed type → html type table.
    pub fn default_html_type(&self) -> HtmlType {
        match self {
            FieldType::Id | FieldType::BinaryId | FieldType::String => HtmlType::Text,
            FieldType::Text => HtmlType::Textarea,
            FieldType::Integer | FieldType::Float | FieldType::Decimal => HtmlType::Number,
            FieldType::Boolean => HtmlType::Checkbox,
            FieldType::Enum => HtmlType::Select,
            FieldType::Date => HtmlType::Date,
            FieldType::Time => HtmlType::Time,
            FieldType::NaiveDatetime | FieldType::UtcDatetime => HtmlType::DatetimeLocal,
            FieldType::Map
            | FieldType::Array
            | FieldType::BelongsTo
            | FieldType::HasOne
            | FieldType::HasMany
            | FieldType::EmbedsOne
            | FieldType::EmbedsMany
            | FieldType::Unsupported(_) => HtmlType::Unimplemented,
        }
    }

    /// Default `(length, precision, scale)`.
    pub fn default_dimensions(&self) -> (Option<u32>, Option<u32>, Option<u32>) {
        match self {
            FieldType::Id => (Some(20), Some(20), Some(0)),
            FieldType::BinaryId => (Some(36), None, None),
            FieldType::String => (Some(255), None, None),
            FieldType::Text => (Some(1000), None, None),
            FieldType::Integer => (Some(10), Some(10), Some(0)),
            FieldType::Float => (Some(12), Some(10), Some(2)),
            FieldType::Decimal => (Some(12), Some(10), Some(2)),
            FieldType::Boolean => (Some(1), None, None),
            FieldType::Date => (Some(10), None, None),
            FieldType::Time => (Some(8), None, None),
            FieldType::NaiveDatetime | FieldType::UtcDatetime => (Some(20), None, None),
            _ => (None, None, None),
        }
    }

    /// Default input placeholder for this type, given the field label.
    pub fn default_placeholder(&self, label: &str) -> String {
        match self {
            FieldType::Id | FieldType::Integer => "0".to_string(),
            FieldType::Float | FieldType::Decimal => "0.00".to_string(),
            FieldType::BinaryId => "00000000-0000-0000-0000-000000000000".to_string(),
            FieldType::Date => "YYYY-MM-DD".to_string(),
            FieldType::Time => "HH:MM:SS".to_string(),
            FieldType::NaiveDatetime | FieldType::UtcDatetime => {
                "YYYY-MM-DD HH:MM:SS".to_string()
            }
            FieldType::String | FieldType::Text | FieldType::Enum => label.to_string(),
            _ => String::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Id => "id",
            FieldType::BinaryId => "binary_id",
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Decimal => "decimal",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::NaiveDatetime => "naive_datetime",
            FieldType::UtcDatetime => "utc_datetime",
            FieldType::Enum => "enum",
            FieldType::Map => "map",
            FieldType::Array => "array",
            FieldType::BelongsTo => "belongs_to",
            FieldType::HasOne => "has_one",
            FieldType::HasMany => "has_many",
            FieldType::EmbedsOne => "embeds_one",
            FieldType::EmbedsMany => "embeds_many",
            FieldType::Unsupported(name) => name,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// HtmlType
// ============================================================================

/// Rendering hint for a field's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HtmlType {
    Text,
    Textarea,
    Number,
    Checkbox,
    Select,
    Date,
    Time,
    DatetimeLocal,
    Hidden,
    Unimplemented,
}

impl HtmlType {
    /// Value of the `type` attribute for `<input>` based types.
    pub fn input_type(&self) -> &'static str {
        match self {
            HtmlType::Text | HtmlType::Textarea | HtmlType::Select | HtmlType::Unimplemented => {
                "text"
            }
            HtmlType::Number => "number",
            HtmlType::Checkbox => "checkbox",
            HtmlType::Date => "date",
            HtmlType::Time => "time",
            HtmlType::DatetimeLocal => "datetime-local",
            HtmlType::Hidden => "hidden",
        }
    }
}

// ============================================================================
// FieldData
// ============================================================================

/// One `<option>` of a select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Computes the option label of a related row.
#[derive(Clone)]
pub struct LabelFn(pub Arc<dyn Fn(&Record) -> String + Send + Sync>);

impl LabelFn {
    pub fn new(f: impl Fn(&Record) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, record: &Record) -> String {
        (self.0)(record)
    }
}

impl fmt::Debug for LabelFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LabelFn(..)")
    }
}

/// How a to-one selector labels the related rows.
#[derive(Debug, Clone)]
pub enum OptionLabel {
    /// Use one column of the related row.
    Key(FieldKey),
    /// Compute the label.
    Fn(LabelFn),
}

impl OptionLabel {
    pub fn label_for(&self, record: &Record) -> String {
        match self {
            OptionLabel::Key(key) => record.display_value(key.as_str()),
            OptionLabel::Fn(f) => f.call(record),
        }
    }
}

impl Default for OptionLabel {
    fn default() -> Self {
        OptionLabel::Key(FieldKey::new("name"))
    }
}

/// A sibling resource as seen from an association field: enough to render a
/// related-records table without re-declaring its columns.
#[derive(Debug, Clone)]
pub struct RelatedResource {
    pub name: ResourceName,
    pub title: String,
    /// Expanded index columns of the sibling resource.
    pub fields: Vec<Field>,
    pub order_by: Option<FieldKey>,
}

impl RelatedResource {
    pub fn field_keys(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.key.as_str()).collect()
    }
}

/// Linkage of an association field.
#[derive(Debug, Clone)]
pub struct AssociationData {
    /// Backend entity the association points to.
    pub related: String,
    /// Key on the related side (`id` for belongs-to, the foreign key otherwise).
    pub related_key: FieldKey,
    /// Key on the owning side (the foreign key for belongs-to, `id` otherwise).
    pub owner_key: FieldKey,
    /// Sibling resource, injected during layout expansion.
    pub resource: Option<Box<RelatedResource>>,
    pub option_label: OptionLabel,
    /// Fixed options; when set no rows are loaded.
    pub static_options: Option<Vec<SelectOption>>,
}

impl AssociationData {
    pub fn new(
        related: impl Into<String>,
        related_key: impl Into<FieldKey>,
        owner_key: impl Into<FieldKey>,
    ) -> Self {
        Self {
            related: related.into(),
            related_key: related_key.into(),
            owner_key: owner_key.into(),
            resource: None,
            option_label: OptionLabel::default(),
            static_options: None,
        }
    }
}

/// Linkage of an embedded field.
#[derive(Debug, Clone)]
pub struct EmbedData {
    /// The synthesized sub-resource (`<parent>__<field>`).
    pub related: ResourceName,
    pub owner: ResourceName,
    pub resource: Option<Box<RelatedResource>>,
}

/// Type-specific extra metadata.
#[derive(Debug, Clone, Default)]
pub enum FieldData {
    #[default]
    None,
    Select {
        options: Vec<SelectOption>,
    },
    Number {
        step: String,
    },
    Association(AssociationData),
    Embed(EmbedData),
}

impl FieldData {
    pub fn association(&self) -> Option<&AssociationData> {
        match self {
            FieldData::Association(data) => Some(data),
            _ => None,
        }
    }

    pub fn association_mut(&mut self) -> Option<&mut AssociationData> {
        match self {
            FieldData::Association(data) => Some(data),
            _ => None,
        }
    }

    pub fn embed(&self) -> Option<&EmbedData> {
        match self {
            FieldData::Embed(data) => Some(data),
            _ => None,
        }
    }

    /// Sibling resource injected for associations and embeds.
    pub fn related_resource(&self) -> Option<&RelatedResource> {
        match self {
            FieldData::Association(data) => data.resource.as_deref(),
            FieldData::Embed(data) => data.resource.as_deref(),
            _ => None,
        }
    }

    pub fn set_related_resource(&mut self, related: RelatedResource) {
        match self {
            FieldData::Association(data) => data.resource = Some(Box::new(related)),
            FieldData::Embed(data) => data.resource = Some(Box::new(related)),
            _ => {}
        }
    }
}

// ============================================================================
// CustomRenderer
// ============================================================================

/// Replaces every default rendering decision for a field.
#[derive(Clone)]
pub struct CustomRenderer(Arc<dyn Fn(&Field, &Record) -> Markup + Send + Sync>);

impl CustomRenderer {
    pub fn new(f: impl Fn(&Field, &Record) -> Markup + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn render(&self, field: &Field, record: &Record) -> Markup {
        (self.0)(field, record)
    }
}

impl fmt::Debug for CustomRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomRenderer(..)")
    }
}

// ============================================================================
// Field
// ============================================================================

/// One UI-facing column/input descriptor.
#[derive(Debug, Clone)]
pub struct Field {
    pub key: FieldKey,
    pub resource: ResourceName,
    pub field_type: FieldType,
    pub html_type: HtmlType,
    pub label: String,
    pub placeholder: String,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub required: bool,
    pub readonly: bool,
    pub disabled: bool,
    pub hidden: bool,
    /// Excluded from every generated view and form payload.
    pub omitted: bool,
    pub filterable: bool,
    pub renderer: Option<CustomRenderer>,
    pub data: FieldData,
}

impl Field {
    /// A field with the type's defaults and a label derived from the key.
    pub fn new(
        resource: impl Into<ResourceName>,
        key: impl Into<FieldKey>,
        field_type: FieldType,
    ) -> Self {
        let key = key.into();
        let label = label_for(key.as_str());
        let (length, precision, scale) = field_type.default_dimensions();
        let data = match field_type {
            FieldType::Integer | FieldType::Id => FieldData::Number {
                step: "1".to_string(),
            },
            FieldType::Float | FieldType::Decimal => FieldData::Number {
                step: "0.01".to_string(),
            },
            _ => FieldData::None,
        };
        Self {
            placeholder: field_type.default_placeholder(&label),
            html_type: field_type.default_html_type(),
            filterable: field_type.kind() == FieldKind::Scalar,
            resource: resource.into(),
            key,
            label,
            length,
            precision,
            scale,
            required: false,
            readonly: false,
            disabled: false,
            hidden: false,
            omitted: false,
            renderer: None,
            data,
            field_type,
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.field_type.kind()
    }

    /// Whether the field accepts user edits.
    pub fn is_editable(&self) -> bool {
        !(self.disabled || self.readonly || self.omitted)
    }

    /// Overlay overrides; set attributes win.
    pub fn apply(&mut self, overrides: &FieldOverrides) {
        if let Some(v) = &overrides.label {
            self.label = v.clone();
        }
        if let Some(v) = &overrides.placeholder {
            self.placeholder = v.clone();
        }
        if let Some(v) = overrides.length {
            self.length = Some(v);
        }
        if let Some(v) = overrides.precision {
            self.precision = Some(v);
        }
        if let Some(v) = overrides.scale {
            self.scale = Some(v);
        }
        if let Some(v) = overrides.required {
            self.required = v;
        }
        if let Some(v) = overrides.readonly {
            self.readonly = v;
        }
        if let Some(v) = overrides.disabled {
            self.disabled = v;
        }
        if let Some(v) = overrides.hidden {
            self.hidden = v;
        }
        if let Some(v) = overrides.omitted {
            self.omitted = v;
        }
        if let Some(v) = overrides.filterable {
            self.filterable = v;
        }
        if let Some(v) = overrides.html_type {
            self.html_type = v;
        }
        if let Some(v) = &overrides.renderer {
            self.renderer = Some(v.clone());
        }
        if let Some(options) = &overrides.options {
            match &mut self.data {
                FieldData::Association(data) => data.static_options = Some(options.clone()),
                data => {
                    *data = FieldData::Select {
                        options: options.clone(),
                    }
                }
            }
        }
        if let Some(label) = &overrides.option_label {
            if let Some(data) = self.data.association_mut() {
                data.option_label = label.clone();
            }
        }
        if let Some(step) = &overrides.step {
            if let FieldData::Number { step: s } = &mut self.data {
                *s = step.clone();
            }
        }
    }
}

/// Title-cased label for a key: `unit_price` → `Unit Price`.
pub fn label_for(key: &str) -> String {
    key.replace("__", "_").to_case(Case::Title)
}

// ============================================================================
// FieldOverrides
// ============================================================================

/// Partial field attributes, declared per resource or inline in a layout.
#[derive(Debug, Clone, Default)]
pub struct FieldOverrides {
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub required: Option<bool>,
    pub readonly: Option<bool>,
    pub disabled: Option<bool>,
    pub hidden: Option<bool>,
    pub omitted: Option<bool>,
    pub filterable: Option<bool>,
    pub html_type: Option<HtmlType>,
    pub renderer: Option<CustomRenderer>,
    pub options: Option<Vec<SelectOption>>,
    pub option_label: Option<OptionLabel>,
    pub step: Option<String>,
}

macro_rules! override_setters {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            pub fn $name(mut self, value: impl Into<$ty>) -> Self {
                self.$name = Some(value.into());
                self
            }
        )*
    };
}

impl FieldOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    override_setters! {
        label: String,
        placeholder: String,
        length: u32,
        precision: u32,
        scale: u32,
        required: bool,
        readonly: bool,
        disabled: bool,
        hidden: bool,
        omitted: bool,
        filterable: bool,
        html_type: HtmlType,
        step: String,
    }

    pub fn renderer(mut self, f: impl Fn(&Field, &Record) -> Markup + Send + Sync + 'static) -> Self {
        self.renderer = Some(CustomRenderer::new(f));
        self
    }

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn option_label(mut self, label: OptionLabel) -> Self {
        self.option_label = Some(label);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.placeholder.is_none()
            && self.length.is_none()
            && self.precision.is_none()
            && self.scale.is_none()
            && self.required.is_none()
            && self.readonly.is_none()
            && self.disabled.is_none()
            && self.hidden.is_none()
            && self.omitted.is_none()
            && self.filterable.is_none()
            && self.html_type.is_none()
            && self.renderer.is_none()
            && self.options.is_none()
            && self.option_label.is_none()
            && self.step.is_none()
    }

    /// Merge `later` onto `self`; attributes set in `later` win.
    pub fn merge(&mut self, later: &FieldOverrides) {
        macro_rules! take {
            ($($name:ident),*) => {
                $(
                    if later.$name.is_some() {
                        self.$name = later.$name.clone();
                    }
                )*
            };
        }
        take!(
            label,
            placeholder,
            length,
            precision,
            scale,
            required,
            readonly,
            disabled,
            hidden,
            omitted,
            filterable,
            html_type,
            renderer,
            options,
            option_label,
            step
        );
    }

    pub fn merged(mut self, later: &FieldOverrides) -> Self {
        self.merge(later);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification_is_exclusive() {
        assert_eq!(FieldType::String.kind(), FieldKind::Scalar);
        assert_eq!(FieldType::HasMany.kind(), FieldKind::Association);
        assert_eq!(FieldType::BelongsTo.kind(), FieldKind::Association);
        assert_eq!(FieldType::EmbedsMany.kind(), FieldKind::Embed);
        assert_eq!(
            FieldType::Unsupported("point".into()).kind(),
            FieldKind::Scalar
        );
    }

    #[test]
    fn test_html_type_table() {
        assert_eq!(FieldType::String.default_html_type(), HtmlType::Text);
        assert_eq!(FieldType::Decimal.default_html_type(), HtmlType::Number);
        assert_eq!(FieldType::Boolean.default_html_type(), HtmlType::Checkbox);
        assert_eq!(FieldType::Enum.default_html_type(), HtmlType::Select);
        assert_eq!(
            FieldType::UtcDatetime.default_html_type(),
            HtmlType::DatetimeLocal
        );
        assert_eq!(
            FieldType::HasMany.default_html_type(),
            HtmlType::Unimplemented
        );
    }

    #[test]
    fn test_new_field_defaults() {
        let field = Field::new("product", "unit_price", FieldType::Decimal);
        assert_eq!(field.label, "Unit Price");
        assert_eq!(field.placeholder, "0.00");
        assert_eq!(field.length, Some(12));
        assert_eq!(field.precision, Some(10));
        assert_eq!(field.scale, Some(2));
        assert!(field.filterable);
        assert!(matches!(field.data, FieldData::Number { ref step } if step == "0.01"));
    }

    #[test]
    fn test_apply_overrides() {
        let mut field = Field::new("product", "name", FieldType::String);
        field.apply(&FieldOverrides::new().label("Product name").required(true));
        assert_eq!(field.label, "Product name");
        assert!(field.required);
        assert!(!field.disabled);
    }

    #[test]
    fn test_merge_later_wins() {
        let first = FieldOverrides::new().label("a").disabled(true);
        let second = FieldOverrides::new().label("b");
        let merged = first.merged(&second);
        assert_eq!(merged.label.as_deref(), Some("b"));
        assert_eq!(merged.disabled, Some(true));
    }

    #[test]
    fn test_static_options_on_association() {
        let mut field = Field::new("product_transaction", "product", FieldType::BelongsTo);
        field.data = FieldData::Association(AssociationData::new("Product", "id", "product_id"));
        field.apply(&FieldOverrides::new().options(vec![SelectOption::new("A", "1")]));
        let data = field.data.association().unwrap();
        assert_eq!(data.static_options.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_label_for_embedded_name() {
        assert_eq!(label_for("product__embeds_many"), "Product Embeds Many");
    }
}
