//! Filter expression model.
//!
//! Filters are declarative client-side values translated by the server into
//! query predicates. The model has two layers:
//!
//! - `condition` - per-field operator sets, split by semantic type so
//!   string-only predicates stay off numeric/date/boolean fields
//! - `options` - the recursive tree combining field conditions, nested
//!   relation filters, and `$and`/`$or`/`not` composition
//!
//! Expressions serialize into the `filters[...]` family of bracket-nested
//! query parameters (see [`crate::query`]).

mod condition;
mod options;

pub use condition::{
    BoolCondition, DateCondition, FilterCondition, NumberCondition, StringCondition,
};
pub use options::{FilterEntry, FilterOptions};
