//! # Resource registry
//!
//! Resource declarations (name, schema, connector, resource-level field
//! overrides) and the parsed field maps the expansion engine resolves layout
//! keys against. Embedded structures are registered as resources of their
//! own, named `<parent>__<field>`.

use auix_connector::Connector;
use auix_core::prelude::*;
use auix_core::{
    label_for, parse_resource, Field, FieldKey, FieldOverrides, FieldType, ParsedResource,
    ResourceName, SchemaDef,
};

/// Declaration of one resource.
#[derive(Debug, Clone)]
pub struct ResourceConfig {
    pub name: ResourceName,
    pub schema: Option<SchemaDef>,
    pub connector: Option<Connector>,
    /// Resource-level overrides, in declaration order.
    pub fields: Vec<(FieldKey, FieldOverrides)>,
    /// Fields with no schema attribute behind them.
    pub virtual_fields: Vec<(FieldKey, FieldType)>,
    pub order_by: Option<FieldKey>,
    pub title: Option<String>,
    /// Route segment; defaults to the schema source or `<name>s`.
    pub plural: Option<String>,
}

impl ResourceConfig {
    pub fn new(name: impl Into<ResourceName>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            connector: None,
            fields: Vec::new(),
            virtual_fields: Vec::new(),
            order_by: None,
            title: None,
            plural: None,
        }
    }

    pub fn schema(mut self, schema: SchemaDef) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn connector(mut self, connector: impl Into<Connector>) -> Self {
        self.connector = Some(connector.into());
        self
    }

    pub fn field(mut self, key: impl Into<FieldKey>, overrides: FieldOverrides) -> Self {
        self.fields.push((key.into(), overrides));
        self
    }

    /// Declare a field the schema does not have (typically rendered by a
    /// custom renderer).
    pub fn virtual_field(
        mut self,
        key: impl Into<FieldKey>,
        field_type: FieldType,
        overrides: FieldOverrides,
    ) -> Self {
        let key = key.into();
        self.virtual_fields.push((key.clone(), field_type));
        self.fields.push((key, overrides));
        self
    }

    pub fn order_by(mut self, key: impl Into<FieldKey>) -> Self {
        self.order_by = Some(key.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn plural(mut self, plural: impl Into<String>) -> Self {
        self.plural = Some(plural.into());
        self
    }
}

/// A resource after its schema has been parsed.
#[derive(Debug, Clone)]
pub struct RegisteredResource {
    pub name: ResourceName,
    /// Backend entity name used to match association targets.
    pub entity: Option<String>,
    pub embedded_in: Option<ResourceName>,
    pub connector: Option<Connector>,
    /// Parsed fields with resource-level overrides applied, in declaration
    /// order.
    pub fields: Vec<Field>,
    pub order_by: Option<FieldKey>,
    pub title: String,
    pub plural: String,
}

impl RegisteredResource {
    pub fn field(&self, key: &FieldKey) -> Option<&Field> {
        self.fields.iter().find(|f| &f.key == key)
    }

    /// Keys of every field not omitted, in declaration order.
    pub fn visible_keys(&self) -> Vec<FieldKey> {
        self.fields
            .iter()
            .filter(|f| !f.omitted)
            .map(|f| f.key.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    resources: Vec<RegisteredResource>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register a resource together with its embedded
    /// sub-resources.
    pub fn register(&mut self, config: ResourceConfig) -> Result<()> {
        let parsed = parse_resource(&config.name, config.schema.as_ref());
        let plural = config
            .plural
            .clone()
            .or_else(|| config.schema.as_ref().map(|s| s.source.clone()))
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| format!("{}s", config.name));
        let title = config
            .title
            .clone()
            .unwrap_or_else(|| label_for(config.name.as_str()));

        let mut flat = parsed.flatten().into_iter();
        let Some(root) = flat.next() else {
            return Ok(());
        };

        let mut fields = root.fields;
        for (key, field_type) in &config.virtual_fields {
            if fields.iter().any(|f| &f.key == key) {
                return Err(Error::config(format!(
                    "virtual field '{}' of '{}' shadows a schema attribute",
                    key, config.name
                )));
            }
            fields.push(Field::new(config.name.clone(), key.clone(), field_type.clone()));
        }
        for (key, overrides) in &config.fields {
            let field = fields
                .iter_mut()
                .find(|f| &f.key == key)
                .ok_or_else(|| Error::unknown_field(config.name.as_str(), key.as_str()))?;
            field.apply(overrides);
        }

        self.insert(RegisteredResource {
            name: root.name,
            entity: root.entity,
            embedded_in: None,
            connector: config.connector,
            fields,
            order_by: config.order_by,
            title,
            plural,
        })?;

        for sub in flat {
            self.insert(sub_resource(sub))?;
        }
        Ok(())
    }

    fn insert(&mut self, resource: RegisteredResource) -> Result<()> {
        if self.get(&resource.name).is_some() {
            return Err(Error::DuplicateResource {
                name: resource.name.to_string(),
            });
        }
        debug!(
            "Registered resource '{}' with {} fields",
            resource.name,
            resource.fields.len()
        );
        self.resources.push(resource);
        Ok(())
    }

    pub fn get(&self, name: &ResourceName) -> Option<&RegisteredResource> {
        self.resources.iter().find(|r| &r.name == name)
    }

    pub fn require(&self, name: &ResourceName) -> Result<&RegisteredResource> {
        self.get(name)
            .ok_or_else(|| Error::unknown_resource(name.as_str()))
    }

    /// The top-level resource whose schema entity is `entity`.
    pub fn by_entity(&self, entity: &str) -> Option<&RegisteredResource> {
        self.resources
            .iter()
            .find(|r| r.embedded_in.is_none() && r.entity.as_deref() == Some(entity))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredResource> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

fn sub_resource(parsed: ParsedResource) -> RegisteredResource {
    let title = label_for(parsed.name.as_str());
    let plural = parsed.name.to_string();
    RegisteredResource {
        name: parsed.name,
        entity: parsed.entity,
        embedded_in: parsed.embedded_in,
        connector: None,
        fields: parsed.fields,
        order_by: None,
        title,
        plural,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auix_core::NativeType;

    fn product_schema() -> SchemaDef {
        SchemaDef::new("Product", "products")
            .attr("name", NativeType::String)
            .attr("price", NativeType::Decimal)
            .embeds_many(
                "embeds_many",
                SchemaDef::embedded("Lot").attr("code", NativeType::String),
            )
            .timestamps()
    }

    #[test]
    fn test_register_applies_resource_overrides() {
        let mut registry = ResourceRegistry::new();
        registry
            .register(
                ResourceConfig::new("product")
                    .schema(product_schema())
                    .field("price", FieldOverrides::new().label("Unit Price").required(true)),
            )
            .unwrap();
        let product = registry.require(&"product".into()).unwrap();
        let price = product.field(&"price".into()).unwrap();
        assert_eq!(price.label, "Unit Price");
        assert!(price.required);
        assert_eq!(product.plural, "products");
        assert_eq!(product.title, "Product");
    }

    #[test]
    fn test_register_embedded_sub_resource() {
        let mut registry = ResourceRegistry::new();
        registry
            .register(ResourceConfig::new("product").schema(product_schema()))
            .unwrap();
        let sub = registry.require(&"product__embeds_many".into()).unwrap();
        assert_eq!(sub.embedded_in.as_ref().unwrap().as_str(), "product");
        assert!(sub.field(&"code".into()).is_some());
        assert!(registry.by_entity("Lot").is_none());
        assert_eq!(registry.by_entity("Product").unwrap().name.as_str(), "product");
    }

    #[test]
    fn test_duplicate_resource_is_rejected() {
        let mut registry = ResourceRegistry::new();
        registry.register(ResourceConfig::new("product")).unwrap();
        let err = registry.register(ResourceConfig::new("product")).unwrap_err();
        assert!(matches!(err, Error::DuplicateResource { .. }));
    }

    #[test]
    fn test_override_of_unknown_field_fails() {
        let mut registry = ResourceRegistry::new();
        let err = registry
            .register(
                ResourceConfig::new("product")
                    .schema(product_schema())
                    .field("colour", FieldOverrides::new().label("Colour")),
            )
            .unwrap_err();
        assert!(matches!(err, Error::UnknownField { .. }));
    }

    #[test]
    fn test_virtual_field_is_appended() {
        let mut registry = ResourceRegistry::new();
        registry
            .register(
                ResourceConfig::new("product")
                    .schema(product_schema())
                    .virtual_field("margin", FieldType::Decimal, FieldOverrides::new().readonly(true)),
            )
            .unwrap();
        let product = registry.require(&"product".into()).unwrap();
        assert_eq!(product.fields.last().unwrap().key.as_str(), "margin");
        assert!(product.fields.last().unwrap().readonly);
    }

    #[test]
    fn test_no_schema_registers_empty_resource() {
        let mut registry = ResourceRegistry::new();
        registry.register(ResourceConfig::new("note")).unwrap();
        let note = registry.require(&"note".into()).unwrap();
        assert!(note.fields.is_empty());
        assert_eq!(note.plural, "notes");
    }
}
