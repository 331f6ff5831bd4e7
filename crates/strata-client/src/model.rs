//! Wire models: response envelopes and write payloads.
//!
//! Envelopes are deliberately forgiving: the dispatcher never interprets
//! HTTP status codes, so an error-shaped body must still deserialize (empty
//! `data`, populated `error`) and reach the caller intact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Document header fields shared by every CMS content type. Flatten it into
/// model structs:
///
/// ```
/// use serde::Deserialize;
/// use strata_client::BaseDocument;
///
/// #[derive(Debug, Deserialize)]
/// struct Product {
///     #[serde(flatten)]
///     base: BaseDocument,
///     name: String,
///     price: f64,
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseDocument {
    /// Numeric row identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Stable string identifier used in resource URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,

    /// Present on localized content types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// Pagination block of the response `meta`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub page_size: u64,
    #[serde(default)]
    pub page_count: u64,
    #[serde(default)]
    pub total: u64,
}

/// Response metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Error body returned by the CMS. Never interpreted client-side; callers
/// inspect it after the envelope comes back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Envelope for list reads: `data` is an array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListResponse<T> {
    #[serde(default)]
    pub data: Vec<T>,

    #[serde(default)]
    pub meta: Meta,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

/// Envelope for single-resource calls: `data` is one document, or absent on
/// error-shaped bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct SingleResponse<T> {
    #[serde(default)]
    pub data: Option<T>,

    #[serde(default)]
    pub meta: Meta,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

/// Write-payload envelope for create/update calls: `{ "data": ... }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrudRequest<T> {
    pub data: T,
}

impl<T> CrudRequest<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Value of a relation field in a write payload: a single identifier, a
/// list of identifiers, or one of the three reference-mutation directives.
///
/// `connect` adds references, `disconnect` removes them, `set` replaces the
/// reference list wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationRef {
    One(String),
    Many(Vec<String>),
    Connect { connect: Vec<String> },
    Disconnect { disconnect: Vec<String> },
    Set { set: Vec<String> },
}

impl RelationRef {
    pub fn one(id: impl Into<String>) -> Self {
        RelationRef::One(id.into())
    }

    pub fn many<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RelationRef::Many(ids.into_iter().map(Into::into).collect())
    }

    pub fn connect<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RelationRef::Connect {
            connect: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn disconnect<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RelationRef::Disconnect {
            disconnect: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn set<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RelationRef::Set {
            set: ids.into_iter().map(Into::into).collect(),
        }
    }
}
