//! Interceptor pipeline.
//!
//! Interceptors are asynchronous transforms applied to an outgoing request's
//! options before serialization and dispatch: attach headers, stamp params,
//! rewrite bodies. The chain is a strict left fold in registration order -
//! each interceptor sees the previous one's output, and the first failure
//! aborts the call. Interceptors own headers, params, body, and method; the
//! target URL and the transport stay with the dispatcher.

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::Method;
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

use crate::error::Error;

/// Mutable request state threaded through the interceptor chain.
///
/// Created fresh per outgoing call from the merged parameters, then frozen
/// into the outbound request once the chain completes. `params` holds the
/// still-nested parameter tree; bracket encoding happens after the chain.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: IndexMap<String, String>,
    pub params: Map<String, Value>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: IndexMap::new(),
            params: Map::new(),
            body: None,
        }
    }

    /// Insert or replace a header.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Insert or replace a (possibly nested) query parameter.
    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.params.insert(key.into(), value.into());
    }
}

/// An asynchronous transform over [`RequestOptions`].
///
/// Returning `Err` aborts the chain and fails the triggering call with the
/// error untouched.
#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn intercept(&self, options: RequestOptions) -> Result<RequestOptions, Error>;
}

/// Adapter turning an async closure into an [`Interceptor`].
///
/// ```
/// use std::sync::Arc;
/// use strata_client::{FnInterceptor, InterceptorChain, RequestOptions};
///
/// let mut chain = InterceptorChain::new();
/// chain.register(Arc::new(FnInterceptor::new(
///     |mut options: RequestOptions| async move {
///         options.set_header("X-Request-Source", "storefront");
///         Ok(options)
///     },
/// )));
/// ```
pub struct FnInterceptor<F>(F);

impl<F> FnInterceptor<F> {
    pub fn new(transform: F) -> Self {
        Self(transform)
    }
}

#[async_trait]
impl<F, Fut> Interceptor for FnInterceptor<F>
where
    F: Fn(RequestOptions) -> Fut + Send + Sync,
    Fut: Future<Output = Result<RequestOptions, Error>> + Send,
{
    async fn intercept(&self, options: RequestOptions) -> Result<RequestOptions, Error> {
        (self.0)(options).await
    }
}

/// Ordered chain of interceptors owned by one service instance.
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor. Registering the same instance twice (pointer
    /// identity) is a no-op with a warning, so one transform never runs
    /// twice per dispatch.
    pub fn register(&mut self, interceptor: Arc<dyn Interceptor>) {
        if self
            .interceptors
            .iter()
            .any(|existing| Arc::ptr_eq(existing, &interceptor))
        {
            warn!("interceptor already registered, ignoring duplicate registration");
            return;
        }
        self.interceptors.push(interceptor);
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Fold the options through every interceptor in registration order,
    /// awaiting each step. The first `Err` propagates to the caller.
    pub async fn run(&self, mut options: RequestOptions) -> Result<RequestOptions, Error> {
        for interceptor in &self.interceptors {
            options = interceptor.intercept(options).await?;
        }
        Ok(options)
    }
}

impl std::fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("len", &self.interceptors.len())
            .finish()
    }
}
