//! Search settings and result shaping for the query tools.
//!
//! - [`Settings`] - Validated endpoint and authentication
//! - [`SearchRequest`] - EQL or Lucene request body
//! - [`run_query`] - Backend call, projection and rendering
//!
//! No network client ships here; callers provide a [`SearchBackend`].

mod query;
mod settings;

pub use query::{
    DEFAULT_BEFORE, DEFAULT_SINCE, DEFAULT_SIZE, EQL_DEFAULT_INDEX, LUCENE_DEFAULT_INDEX,
    QueryKind, SearchBackend, SearchRequest, SearchResponse, project, render, run_query,
};
pub use settings::{
    ApiKey, CONFIG_GROUP, Connection, Credentials, DEFAULT_ENVIRONMENT, RawSettings, Settings,
    choose_entry,
};
