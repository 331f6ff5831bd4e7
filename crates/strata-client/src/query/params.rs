//! Request parameter assembly.
//!
//! [`RequestParameters`] is the full surface a single call can carry:
//! method, extra headers, cache policy, free-form query parameters, filter
//! and populate expressions, pagination, sort, and an optional JSON body.
//! The dispatcher folds everything into one ordered parameter map before the
//! interceptor chain runs.

use indexmap::IndexMap;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::filter::FilterOptions;
use crate::populate::PopulateOptions;
use crate::query::encode::to_query_value;

/// Page selection for list requests. Offset (`start`/`limit`) and paged
/// (`page`/`pageSize`) styles are both supported; the server rejects mixes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
}

impl PaginationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: u64) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

/// Cache directive attached to the outgoing request as a `Cache-Control`
/// header. Reads use [`CachePolicy::NoStore`] so stale CMS content never
/// shadows an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CachePolicy {
    NoStore,
    NoCache,
}

impl CachePolicy {
    pub fn directive(self) -> &'static str {
        match self {
            CachePolicy::NoStore => "no-store",
            CachePolicy::NoCache => "no-cache",
        }
    }
}

/// Everything one outgoing call carries before dispatch.
#[derive(Debug, Clone, Default)]
pub struct RequestParameters {
    pub method: Method,
    pub headers: IndexMap<String, String>,
    pub cache: Option<CachePolicy>,
    /// Free-form query parameters merged ahead of the structured ones.
    pub parameters: Map<String, Value>,
    pub filters: Option<FilterOptions>,
    pub pagination: Option<PaginationParams>,
    pub populate: Option<PopulateOptions>,
    /// Sort expressions in `field:direction` form, e.g. `price:asc`.
    pub sort: Vec<String>,
    pub body: Option<Value>,
}

impl RequestParameters {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_cache(mut self, policy: CachePolicy) -> Self {
        self.cache = Some(policy);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_filters(mut self, filters: FilterOptions) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationParams) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_populate(mut self, populate: PopulateOptions) -> Self {
        self.populate = Some(populate);
        self
    }

    pub fn with_sort<I, S>(mut self, sort: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort = sort.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a JSON body; it is sent verbatim (after interceptors).
    pub fn with_body<T: Serialize>(mut self, body: &T) -> Result<Self, Error> {
        self.body = Some(to_query_value(body)?);
        Ok(self)
    }

    /// Fold free-form parameters, pagination, populate, sort, and filters
    /// into one ordered map. The order is fixed so equal inputs serialize to
    /// byte-identical query strings.
    pub fn merged_params(&self) -> Result<Map<String, Value>, Error> {
        let mut merged = self.parameters.clone();
        if let Some(pagination) = &self.pagination {
            merged.insert("pagination".to_string(), to_query_value(pagination)?);
        }
        if let Some(populate) = &self.populate {
            merged.insert("populate".to_string(), to_query_value(populate)?);
        }
        if !self.sort.is_empty() {
            merged.insert("sort".to_string(), Value::from(self.sort.clone()));
        }
        if let Some(filters) = &self.filters {
            merged.insert("filters".to_string(), to_query_value(filters)?);
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::StringCondition;
    use crate::query::encode::encode;

    #[test]
    fn test_pagination_wire_names() {
        let pagination = PaginationParams::new().page(2).page_size(25);
        let json = serde_json::to_string(&pagination).unwrap();
        assert_eq!(json, r#"{"page":2,"pageSize":25}"#);
    }

    #[test]
    fn test_merge_order_is_fixed() {
        let parameters = RequestParameters::get()
            .with_param("locale", "en")
            .with_filters(FilterOptions::new().field("name", StringCondition::new().eq("x")))
            .with_pagination(PaginationParams::new().page(1))
            .with_sort(["price:asc"]);

        let merged = parameters.merged_params().unwrap();
        let keys: Vec<_> = merged.keys().cloned().collect();
        assert_eq!(keys, ["locale", "pagination", "sort", "filters"]);

        let query = encode(&merged).unwrap();
        assert_eq!(
            query,
            "locale=en&pagination[page]=1&sort[0]=price%3Aasc&filters[name][$eq]=x"
        );
    }

    #[test]
    fn test_empty_parameters_merge_to_empty() {
        let merged = RequestParameters::get().merged_params().unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_cache_directives() {
        assert_eq!(CachePolicy::NoStore.directive(), "no-store");
        assert_eq!(CachePolicy::NoCache.directive(), "no-cache");
    }
}
