//! Data acquisition: transport, payload parsing, normalization, source resolution

pub mod backend;
pub mod endpoints;
pub mod feeds;
pub mod http;
pub mod payload;
pub mod provider;
pub mod record;
pub mod resolver;
pub mod scripted;

pub use backend::Backend;
pub use endpoints::{normalize_name, normalize_ticker, Endpoints};
pub use feeds::FeedFetcher;
pub use http::HttpTransport;
pub use payload::Health;
pub use provider::{DataError, HttpResponse, SourceTag, Transport};
pub use record::{normalize_batch, normalize_record, Field, FieldSchema, RawRecord};
pub use resolver::{PriceSeries, SourceResolver};
pub use scripted::ScriptedTransport;
