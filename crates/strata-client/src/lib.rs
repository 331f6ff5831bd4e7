//! Typed client for Strapi-style headless CMS REST APIs.
//!
//! The crate builds query parameters from typed expression values - filters,
//! relation population, pagination, sorting - serializes them into the CMS's
//! bracket-nested query-string grammar, and issues HTTP requests through an
//! async interceptor pipeline, returning typed response envelopes.
//!
//! # Example
//!
//! ```no_run
//! use serde::Deserialize;
//! use strata_client::{
//!     BaseDocument, FilterOptions, GenericService, NumberCondition, PopulateOptions,
//!     StringCondition,
//! };
//!
//! #[derive(Debug, Deserialize)]
//! struct Product {
//!     #[serde(flatten)]
//!     base: BaseDocument,
//!     name: String,
//!     price: f64,
//! }
//!
//! # async fn demo() -> Result<(), strata_client::Error> {
//! let service: GenericService<Product> =
//!     GenericService::new("https://cms.example.com/api/products");
//!
//! let filters = FilterOptions::new()
//!     .field("name", StringCondition::new().containsi("laptop"))
//!     .field("price", NumberCondition::new().between(100u64, 1000u64))
//!     .relation(
//!         "category",
//!         FilterOptions::new().field("name", StringCondition::new().eq("Electronics")),
//!     );
//! let populate = PopulateOptions::new().relation("category");
//!
//! let products = service.find_many(Some(&populate), Some(&filters)).await?;
//! for product in &products.data {
//!     println!("{} - {}", product.name, product.price);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module structure
//!
//! - [`filter`] - filter expression model (`$eq`, `$contains`, `$and`, ...)
//! - [`populate`] - relation population expressions
//! - [`query`] - parameter assembly and bracket-nested encoding
//! - [`interceptor`] - async request-option transform chain
//! - [`service`] - the CRUD dispatcher
//! - [`model`] - response envelopes and write payloads
//! - [`config`] - service configuration
//! - [`error`] - the crate error type

pub mod config;
pub mod error;
pub mod filter;
pub mod interceptor;
pub mod model;
pub mod populate;
pub mod query;
pub mod service;

pub use config::ServiceConfig;
pub use error::Error;
pub use filter::{
    BoolCondition, DateCondition, FilterCondition, FilterEntry, FilterOptions, NumberCondition,
    StringCondition,
};
pub use interceptor::{FnInterceptor, Interceptor, InterceptorChain, RequestOptions};
pub use model::{
    BaseDocument, CrudRequest, ListResponse, Meta, Pagination, RelationRef, ResponseError,
    SingleResponse,
};
pub use populate::{PopulateEntry, PopulateOptions};
pub use service::GenericService;
pub use query::{CachePolicy, PaginationParams, RequestParameters};
