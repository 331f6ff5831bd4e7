//! Populate expression model.
//!
//! A populate expression selects which relation fields (and sub-relations)
//! the server should include in a response instead of returning bare
//! identifiers. On the wire a relation maps either to `true` (populate with
//! all default fields) or to a nested `{"populate": {...}}` object narrowing
//! the selection one level down, recursively. Loop-back selections (a
//! variant's parent product's categories) are fine: the expression is a
//! finite caller-authored tree.

use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Selection for a single relation field.
#[derive(Debug, Clone, PartialEq)]
pub enum PopulateEntry {
    /// Populate the relation with all of its default fields (`true`).
    All,
    /// Populate the relation, narrowing which of *its* relations to include.
    Nested(PopulateOptions),
}

impl Serialize for PopulateEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PopulateEntry::All => serializer.serialize_bool(true),
            PopulateEntry::Nested(options) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("populate", options)?;
                map.end()
            }
        }
    }
}

/// A recursive populate expression.
///
/// Relation entries are kept in insertion order so serialization is
/// deterministic. An empty value populates nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulateOptions {
    relations: IndexMap<String, PopulateEntry>,
}

impl PopulateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate a relation with all of its default fields.
    pub fn relation(mut self, name: impl Into<String>) -> Self {
        self.relations.insert(name.into(), PopulateEntry::All);
        self
    }

    /// Populate a relation, restricting which of its own relations to
    /// include.
    pub fn nested(mut self, name: impl Into<String>, options: PopulateOptions) -> Self {
        self.relations
            .insert(name.into(), PopulateEntry::Nested(options));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Relation entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &PopulateEntry)> {
        self.relations.iter().map(|(name, entry)| (name.as_str(), entry))
    }
}

impl Serialize for PopulateOptions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.relations.len()))?;
        for (name, entry) in &self.relations {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PopulateOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        /// Wire form of one relation entry. `false` is accepted and treated
        /// as "do not populate", matching its meaning on the server.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum WireEntry {
            Flag(bool),
            Nested { populate: PopulateOptions },
        }

        struct PopulateVisitor;

        impl<'de> Visitor<'de> for PopulateVisitor {
            type Value = PopulateOptions;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of relation names to `true` or nested populate maps")
            }

            fn visit_map<A>(self, mut access: A) -> Result<PopulateOptions, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut options = PopulateOptions::default();
                while let Some(name) = access.next_key::<String>()? {
                    match access.next_value::<WireEntry>()? {
                        WireEntry::Flag(true) => {
                            options.relations.insert(name, PopulateEntry::All);
                        }
                        WireEntry::Flag(false) => {}
                        WireEntry::Nested { populate } => {
                            options
                                .relations
                                .insert(name, PopulateEntry::Nested(populate));
                        }
                    }
                }
                Ok(options)
            }
        }

        deserializer.deserialize_map(PopulateVisitor)
    }
}
