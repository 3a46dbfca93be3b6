// The core module contains all pure logic.
// Each concern gets its own submodule.

#[path = "links/link_resolver.rs"]
pub mod links;

#[path = "columns/column_codec.rs"]
pub mod columns;

#[path = "gateway/gateway.rs"]
pub mod gateway;

#[path = "tabular/table_builder.rs"]
pub mod tabular;

#[path = "slides/slide_requests.rs"]
pub mod slides;
