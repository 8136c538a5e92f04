//! Resolves REST requests to resources: content negotiation, route matching
//! with priorities, parameter binding and response finalization.

pub use config::Config;
pub use dispatcher::Dispatcher;
pub use request::Request;
pub use resource::{Fallback, Handler, Input, Operation, Resource, Role};
pub use response::Response;
pub use router::{Registration, ResourceLoader, RouteTable};
pub use status_code_registry::ReasonPhrase;
pub use transport::{HttpWriter, Sent, Transport};

pub mod candidates;
pub mod conditional;
pub mod config;
pub mod content_encoding;
pub mod dispatcher;
pub mod mimetypes;
pub mod negotiation;
pub mod request;
pub mod resource;
pub mod response;
pub mod router;
pub mod status_code_registry;
pub mod transport;

#[cfg(test)]
#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
