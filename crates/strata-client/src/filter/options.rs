//! Filter expression trees.
//!
//! A [`FilterOptions`] value maps field names to leaf conditions or nested
//! relation filters, at whatever depth the caller writes out. Model graphs
//! may be cyclic (product -> category -> product); the expression itself is
//! always a finite caller-authored tree, so recursion terminates by
//! construction. Boolean composition lives alongside the named fields via
//! the `$and`, `$or`, and `not` keys.

use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::condition::FilterCondition;

/// One entry in a filter tree: a leaf condition on a field, or a nested
/// filter over a relation's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterEntry {
    Condition(FilterCondition),
    Relation(FilterOptions),
}

impl From<FilterCondition> for FilterEntry {
    fn from(condition: FilterCondition) -> Self {
        FilterEntry::Condition(condition)
    }
}

impl From<FilterOptions> for FilterEntry {
    fn from(filter: FilterOptions) -> Self {
        FilterEntry::Relation(filter)
    }
}

/// A recursive filter expression.
///
/// Field entries are kept in insertion order so the serialized query string
/// is byte-identical for identically built expressions. An empty value means
/// "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    fields: IndexMap<String, FilterEntry>,
    and: Vec<FilterOptions>,
    or: Vec<FilterOptions>,
    not: Vec<FilterOptions>,
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain a field with a leaf condition. Works for scalar fields and
    /// for array fields, where the condition applies to the element type.
    pub fn field(
        mut self,
        name: impl Into<String>,
        condition: impl Into<FilterCondition>,
    ) -> Self {
        self.fields
            .insert(name.into(), FilterEntry::Condition(condition.into()));
        self
    }

    /// Constrain a relation field with a nested filter over its own fields.
    pub fn relation(mut self, name: impl Into<String>, filter: FilterOptions) -> Self {
        self.fields.insert(name.into(), FilterEntry::Relation(filter));
        self
    }

    /// Require every branch to match (`$and`). Branch order is preserved.
    pub fn and(mut self, branches: impl IntoIterator<Item = FilterOptions>) -> Self {
        self.and.extend(branches);
        self
    }

    /// Require any branch to match (`$or`). Branch order is preserved.
    pub fn or(mut self, branches: impl IntoIterator<Item = FilterOptions>) -> Self {
        self.or.extend(branches);
        self
    }

    /// Require every branch to *not* match (`not`). Branch order is preserved.
    pub fn not(mut self, branches: impl IntoIterator<Item = FilterOptions>) -> Self {
        self.not.extend(branches);
        self
    }

    /// True when no field entries and no composition branches are present.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.and.is_empty() && self.or.is_empty() && self.not.is_empty()
    }

    /// Field entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &FilterEntry)> {
        self.fields.iter().map(|(name, entry)| (name.as_str(), entry))
    }
}

impl Serialize for FilterOptions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = self.fields.len()
            + usize::from(!self.and.is_empty())
            + usize::from(!self.or.is_empty())
            + usize::from(!self.not.is_empty());
        let mut map = serializer.serialize_map(Some(len))?;
        for (name, entry) in &self.fields {
            map.serialize_entry(name, entry)?;
        }
        if !self.and.is_empty() {
            map.serialize_entry("$and", &self.and)?;
        }
        if !self.or.is_empty() {
            map.serialize_entry("$or", &self.or)?;
        }
        if !self.not.is_empty() {
            map.serialize_entry("not", &self.not)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FilterOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OptionsVisitor;

        impl<'de> Visitor<'de> for OptionsVisitor {
            type Value = FilterOptions;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of field filters and $and/$or/not branches")
            }

            fn visit_map<A>(self, mut access: A) -> Result<FilterOptions, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut options = FilterOptions::default();
                while let Some(key) = access.next_key::<String>()? {
                    match key.as_str() {
                        "$and" => options.and = access.next_value()?,
                        "$or" => options.or = access.next_value()?,
                        "not" => options.not = access.next_value()?,
                        name if name.starts_with('$') => {
                            return Err(de::Error::custom(format_args!(
                                "unknown filter key `{name}`; expected a field name, `$and`, `$or`, or `not`"
                            )));
                        }
                        _ => {
                            let entry = access.next_value::<FilterEntry>()?;
                            options.fields.insert(key, entry);
                        }
                    }
                }
                Ok(options)
            }
        }

        deserializer.deserialize_map(OptionsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::condition::{BoolCondition, NumberCondition, StringCondition};

    #[test]
    fn test_field_condition_wire_shape() {
        let filter = FilterOptions::new()
            .field("name", StringCondition::new().contains("laptop").starts_with("Mac"));

        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(json, r#"{"name":{"$contains":"laptop","$startsWith":"Mac"}}"#);
    }

    #[test]
    fn test_nested_relation_filter() {
        let filter = FilterOptions::new().relation(
            "category",
            FilterOptions::new()
                .field("name", StringCondition::new().eq("Electronics"))
                .field("isActive", BoolCondition::new().eq(true)),
        );

        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(
            json,
            r#"{"category":{"name":{"$eq":"Electronics"},"isActive":{"$eq":true}}}"#
        );
    }

    #[test]
    fn test_deeply_nested_relations() {
        let filter = FilterOptions::new().relation(
            "category",
            FilterOptions::new().relation(
                "children",
                FilterOptions::new()
                    .field("name", StringCondition::new().contains("Mobile"))
                    .relation(
                        "products",
                        FilterOptions::new()
                            .field("product_status", StringCondition::new().eq("active")),
                    ),
            ),
        );

        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(
            json,
            r#"{"category":{"children":{"name":{"$contains":"Mobile"},"products":{"product_status":{"$eq":"active"}}}}}"#
        );
    }

    #[test]
    fn test_boolean_composition_preserves_order() {
        let filter = FilterOptions::new()
            .and([
                FilterOptions::new().field("product_status", StringCondition::new().eq("active")),
                FilterOptions::new().field("price", NumberCondition::new().gte(100u64)),
            ])
            .or([
                FilterOptions::new().field("name", StringCondition::new().contains("laptop")),
                FilterOptions::new().field("name", StringCondition::new().contains("desktop")),
            ]);

        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["$and"][0]["product_status"]["$eq"], "active");
        assert_eq!(json["$and"][1]["price"]["$gte"], 100);
        assert_eq!(json["$or"][0]["name"]["$contains"], "laptop");
        assert_eq!(json["$or"][1]["name"]["$contains"], "desktop");
    }

    #[test]
    fn test_not_composition() {
        let filter = FilterOptions::new()
            .field("product_status", StringCondition::new().is_in(["active", "inactive"]))
            .not([FilterOptions::new()
                .field("tags", StringCondition::new().contains("deprecated"))]);

        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(
            json,
            r#"{"product_status":{"$in":["active","inactive"]},"not":[{"tags":{"$contains":"deprecated"}}]}"#
        );
    }

    #[test]
    fn test_identical_construction_is_byte_identical() {
        let build = || {
            FilterOptions::new()
                .field("price", NumberCondition::new().between(100u64, 1000u64).gte(50u64))
                .relation(
                    "category",
                    FilterOptions::new().field("name", StringCondition::new().eq("Electronics")),
                )
        };
        assert_eq!(
            serde_json::to_string(&build()).unwrap(),
            serde_json::to_string(&build()).unwrap()
        );
    }

    #[test]
    fn test_empty_filter_serializes_to_empty_map() {
        let filter = FilterOptions::new();
        assert!(filter.is_empty());
        assert_eq!(serde_json::to_string(&filter).unwrap(), "{}");
    }

    #[test]
    fn test_round_trip() {
        let filter = FilterOptions::new()
            .field("name", StringCondition::new().containsi("electron"))
            .relation(
                "category",
                FilterOptions::new().field("isActive", BoolCondition::new().eq(true)),
            )
            .or([FilterOptions::new().field("price", NumberCondition::new().lt(10u64))]);

        let json = serde_json::to_string(&filter).unwrap();
        let back: FilterOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(filter, back);
    }

    #[test]
    fn test_unknown_dollar_key_rejected() {
        let result = serde_json::from_str::<FilterOptions>(r#"{"$xor": []}"#);
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("$xor"), "unexpected message: {message}");
    }

    #[test]
    fn test_unknown_operator_in_field_rejected() {
        let result =
            serde_json::from_str::<FilterOptions>(r#"{"price": {"$betwen": [1, 2]}}"#);
        assert!(result.is_err());
    }
}
