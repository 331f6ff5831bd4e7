//! Generic CRUD service over one content-type endpoint.
//!
//! One [`GenericService`] instance owns a base URL, an optional bearer
//! token, a reqwest client, and its interceptor chain; instances are fully
//! independent unless the caller shares one. Dispatch is a thin pipeline:
//! merge parameters, fold through the chain, encode the query string, send,
//! parse JSON. Non-2xx responses are not special-cased - the parsed
//! envelope comes back with its `error` field for the caller to inspect.

use indexmap::IndexMap;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::ServiceConfig;
use crate::error::Error;
use crate::filter::FilterOptions;
use crate::interceptor::{Interceptor, InterceptorChain, RequestOptions};
use crate::model::{CrudRequest, ListResponse, SingleResponse};
use crate::populate::PopulateOptions;
use crate::query::{encode, CachePolicy, RequestParameters};

/// A token is attached only when it carries a real value. `"0"` and
/// `"undefined"` are what an unset env var looks like after a stringly
/// round trip, and must not become an `Authorization` header.
fn is_usable_token(token: &str) -> bool {
    !token.is_empty() && token != "0" && token != "undefined"
}

/// Typed CRUD client for a single content-type endpoint.
///
/// `T` is the document model for reads; write payloads are independently
/// typed so partial-update shapes (with [`crate::RelationRef`] fields)
/// don't have to mirror the read model.
pub struct GenericService<T> {
    base_url: String,
    token: Option<String>,
    default_headers: IndexMap<String, String>,
    client: Client,
    chain: InterceptorChain,
    _model: PhantomData<fn() -> T>,
}

impl<T> Clone for GenericService<T> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            default_headers: self.default_headers.clone(),
            client: self.client.clone(),
            chain: self.chain.clone(),
            _model: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> GenericService<T> {
    /// Create a service for `base_url` with no token.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            default_headers: IndexMap::new(),
            client: Client::new(),
            chain: InterceptorChain::new(),
            _model: PhantomData,
        }
    }

    /// Create a service that sends `Authorization: Bearer <token>`.
    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let mut service = Self::new(base_url);
        service.token = Some(token.into());
        service
    }

    /// Build a service from a validated [`ServiceConfig`].
    pub fn from_config(config: ServiceConfig) -> Result<Self, Error> {
        config.validate()?;
        let mut builder = Client::builder();
        if let Some(timeout_secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let client = builder.build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token,
            default_headers: config.headers,
            client,
            chain: InterceptorChain::new(),
            _model: PhantomData,
        })
    }

    /// Register an interceptor. Duplicate registrations of the same
    /// instance are ignored (see [`InterceptorChain::register`]).
    pub fn add_interceptor(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.chain.register(interceptor);
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List documents, optionally populating relations and filtering.
    pub async fn find_many(
        &self,
        relations: Option<&PopulateOptions>,
        filters: Option<&FilterOptions>,
    ) -> Result<ListResponse<T>, Error> {
        let mut parameters = RequestParameters::get().with_cache(CachePolicy::NoStore);
        if let Some(relations) = relations {
            parameters = parameters.with_populate(relations.clone());
        }
        if let Some(filters) = filters {
            parameters = parameters.with_filters(filters.clone());
        }
        self.request(None, parameters).await
    }

    /// List documents with the full parameter surface: pagination, sort,
    /// free-form query parameters, filters, populate.
    pub async fn query(
        &self,
        mut parameters: RequestParameters,
    ) -> Result<ListResponse<T>, Error> {
        parameters.method = Method::GET;
        if parameters.cache.is_none() {
            parameters.cache = Some(CachePolicy::NoStore);
        }
        self.request(None, parameters).await
    }

    /// Fetch one document by its string identifier.
    pub async fn find_one(
        &self,
        document_id: &str,
        relations: Option<&PopulateOptions>,
    ) -> Result<SingleResponse<T>, Error> {
        let mut parameters = RequestParameters::get().with_cache(CachePolicy::NoStore);
        if let Some(relations) = relations {
            parameters = parameters.with_populate(relations.clone());
        }
        self.request(Some(document_id), parameters).await
    }

    /// Delete one document by its string identifier.
    pub async fn delete_one(&self, document_id: &str) -> Result<SingleResponse<T>, Error> {
        self.request(Some(document_id), RequestParameters::new(Method::DELETE))
            .await
    }

    /// Update one document. Relation fields in the payload take
    /// [`crate::RelationRef`] values (id, ids, connect/disconnect/set).
    pub async fn update<B: Serialize>(
        &self,
        document_id: &str,
        payload: &CrudRequest<B>,
    ) -> Result<SingleResponse<T>, Error> {
        let parameters = RequestParameters::new(Method::PUT).with_body(payload)?;
        self.request(Some(document_id), parameters).await
    }

    /// Create a document.
    pub async fn create<B: Serialize>(
        &self,
        payload: &CrudRequest<B>,
    ) -> Result<SingleResponse<T>, Error> {
        let parameters = RequestParameters::new(Method::POST).with_body(payload)?;
        self.request(None, parameters).await
    }

    /// Low-level dispatch: build the merged options, run the interceptor
    /// chain, encode the query string, attach the bearer token and cache
    /// directive, send, and parse the JSON body into `R`.
    ///
    /// This is the full pipeline behind every CRUD verb; it is public so
    /// callers can reach endpoints the typed verbs don't model.
    pub async fn request<R: DeserializeOwned>(
        &self,
        document_id: Option<&str>,
        parameters: RequestParameters,
    ) -> Result<R, Error> {
        let url = match document_id {
            Some(id) => format!("{}/{}", self.base_url, id),
            None => self.base_url.clone(),
        };

        let mut options = RequestOptions::new(parameters.method.clone());
        options
            .headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        for (name, value) in &self.default_headers {
            options.headers.insert(name.clone(), value.clone());
        }
        for (name, value) in &parameters.headers {
            options.headers.insert(name.clone(), value.clone());
        }
        options.params = parameters.merged_params()?;
        options.body = parameters.body.clone();

        let mut options = self.chain.run(options).await?;

        if let Some(token) = self.token.as_deref().filter(|token| is_usable_token(token)) {
            options
                .headers
                .insert("Authorization".to_string(), format!("Bearer {token}"));
        }
        if let Some(cache) = parameters.cache {
            options
                .headers
                .insert("Cache-Control".to_string(), cache.directive().to_string());
        }

        let query = encode(&options.params)?;
        let url = if query.is_empty() {
            url
        } else {
            format!("{url}?{query}")
        };

        debug!(method = %options.method, url = %url, "dispatching request");

        let mut request = self.client.request(options.method.clone(), &url);
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.body {
            request =
                request.body(serde_json::to_string(body).map_err(|e| Error::Encode(e.to_string()))?);
        }

        let response = request.send().await?;
        let text = response.text().await?;
        Ok(serde_json::from_str::<R>(&text)?)
    }
}
