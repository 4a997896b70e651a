// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-product record assembly

use crate::error::{ExportError, Result};
use crate::flatten::flatten;
use crate::relations::RelationIndex;
use ifc_json_geometry::GeometryRouter;
use ifc_json_model::{AttributeValue, DecodedEntity, IfcModel};
use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Attributes never copied into a record
const EXCLUDED_ATTRIBUTES: [&str; 3] = ["OwnerHistory", "ObjectPlacement", "Representation"];

/// Product attribute index of `Representation`
const REPRESENTATION: usize = 6;

/// One exported product
///
/// Field order: `id`, `type`, attributes in declaration order,
/// `documentReferences`, `quantityData`, `points`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// `OverallHeight` -> `overallHeight`
pub fn lower_camel(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// JSON form of an attribute, `None` when the attribute carries nothing
///
/// Falsy values are dropped: unset, derived, empty strings, empty lists,
/// zero and `false`.
pub fn attribute_json(value: &AttributeValue) -> Option<Value> {
    match value {
        AttributeValue::Null | AttributeValue::Derived => None,
        AttributeValue::String(s) if s.is_empty() => None,
        AttributeValue::List(items) if items.is_empty() => None,
        AttributeValue::Integer(0) | AttributeValue::Bool(false) => None,
        AttributeValue::Float(f) if *f == 0.0 => None,
        AttributeValue::TypedValue(_, args) if args.len() == 1 => attribute_json(&args[0]),
        other => Some(to_json(other)),
    }
}

fn to_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::Null | AttributeValue::Derived => Value::Null,
        AttributeValue::EntityRef(id) => Value::String(id.to_string()),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Integer(i) => Value::from(*i),
        AttributeValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        AttributeValue::String(s) => Value::String(s.clone()),
        AttributeValue::Enum(e) if e == "U" => Value::String("UNKNOWN".to_string()),
        AttributeValue::Enum(e) => Value::String(e.clone()),
        AttributeValue::List(items) => Value::Array(items.iter().map(to_json).collect()),
        AttributeValue::TypedValue(_, args) => match args.as_slice() {
            [single] => to_json(single),
            many => Value::Array(many.iter().map(to_json).collect()),
        },
    }
}

/// Builds records from products
pub struct RecordAssembler<'a> {
    model: &'a dyn IfcModel,
    relations: &'a RelationIndex,
    router: &'a GeometryRouter,
}

impl<'a> RecordAssembler<'a> {
    pub fn new(
        model: &'a dyn IfcModel,
        relations: &'a RelationIndex,
        router: &'a GeometryRouter,
    ) -> Self {
        Self {
            model,
            relations,
            router,
        }
    }

    /// Assemble the record for `product`
    ///
    /// Returns `None` for products without a representation. Geometry
    /// failures are returned as [`ExportError::Geometry`].
    pub fn assemble(&self, product: &DecodedEntity) -> Result<Option<Record>> {
        if product.get_ref(REPRESENTATION).is_none() {
            return Ok(None);
        }

        let resolver = self.model.resolver();
        let mut fields = Map::new();
        fields.insert("id".to_string(), Value::from(product.id.0));
        fields.insert(
            "type".to_string(),
            Value::String(product.ifc_type.name().to_string()),
        );

        for attribute in self.model.declared_attributes(product) {
            if EXCLUDED_ATTRIBUTES.iter().any(|name| attribute.name == *name) {
                continue;
            }
            if let Some(value) = attribute_json(attribute.value) {
                fields.insert(lower_camel(&attribute.name), value);
            }
        }

        let documents = self.relations.document_references(resolver, product.id)?;
        if !documents.is_empty() {
            fields.insert("documentReferences".to_string(), Value::from(documents));
        }

        let quantities = self.relations.quantity_data(resolver, product.id)?;
        if !quantities.is_empty() {
            fields.insert("quantityData".to_string(), Value::Object(quantities));
        }

        let mesh = self
            .router
            .process_product(product, resolver)
            .map_err(|e| ExportError::geometry(product.id, e))?;
        let (coords, indices) = mesh.into_buffers();
        let triangles = flatten(&coords, &indices)?;
        fields.insert("points".to_string(), serde_json::to_value(triangles)?);

        Ok(Some(Record(fields)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_json_model::EntityId;

    #[test]
    fn test_lower_camel() {
        assert_eq!(lower_camel("GlobalId"), "globalId");
        assert_eq!(lower_camel("PredefinedType"), "predefinedType");
        assert_eq!(lower_camel("x"), "x");
        assert_eq!(lower_camel(""), "");
    }

    #[test]
    fn test_attribute_json_filters_empty_values() {
        assert_eq!(attribute_json(&AttributeValue::Null), None);
        assert_eq!(attribute_json(&AttributeValue::Derived), None);
        assert_eq!(attribute_json(&AttributeValue::String(String::new())), None);
        assert_eq!(attribute_json(&AttributeValue::List(vec![])), None);

        assert_eq!(attribute_json(&AttributeValue::Integer(0)), None);
        assert_eq!(attribute_json(&AttributeValue::Float(0.0)), None);
        assert_eq!(attribute_json(&AttributeValue::Float(-0.0)), None);
        assert_eq!(attribute_json(&AttributeValue::Bool(false)), None);
        assert_eq!(
            attribute_json(&AttributeValue::TypedValue("IFCBOOLEAN".into(), vec![AttributeValue::Bool(false)])),
            None
        );

        assert_eq!(attribute_json(&AttributeValue::Integer(3)), Some(Value::from(3)));
        assert_eq!(attribute_json(&AttributeValue::Float(0.5)), Some(Value::from(0.5)));
        assert_eq!(attribute_json(&AttributeValue::Bool(true)), Some(Value::Bool(true)));
    }

    #[test]
    fn test_attribute_json_conversions() {
        assert_eq!(
            attribute_json(&AttributeValue::EntityRef(EntityId(42))),
            Some(Value::String("#42".into()))
        );
        assert_eq!(
            attribute_json(&AttributeValue::Enum("NOTDEFINED".into())),
            Some(Value::String("NOTDEFINED".into()))
        );
        assert_eq!(
            attribute_json(&AttributeValue::Enum("U".into())),
            Some(Value::String("UNKNOWN".into()))
        );
        assert_eq!(
            attribute_json(&AttributeValue::TypedValue(
                "IFCLABEL".into(),
                vec![AttributeValue::String("x".into())]
            )),
            Some(Value::String("x".into()))
        );
        assert_eq!(
            attribute_json(&AttributeValue::TypedValue(
                "IFCLABEL".into(),
                vec![AttributeValue::String(String::new())]
            )),
            None
        );
        assert_eq!(
            attribute_json(&AttributeValue::List(vec![
                AttributeValue::Float(1.5),
                AttributeValue::Null
            ])),
            Some(serde_json::json!([1.5, null]))
        );
    }
}
