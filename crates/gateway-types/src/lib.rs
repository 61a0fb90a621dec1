//! Shared types for the chain gateway.
//!
//! Every crate in the workspace speaks in terms of these types: the chain and
//! operation identifiers a caller selects, the wire-level call an adapter builds,
//! the raw response the transport hands back, and the normalized result that is
//! the only thing a caller ever sees.

pub mod chains;
pub mod errors;
pub mod operations;
pub mod request;
pub mod result;
pub mod spec;

pub use chains::{ChainId, WireStyle};
pub use errors::{GatewayError, Result};
pub use operations::Operation;
pub use request::{HttpMethod, RawResponse, Request, WireCall};
pub use result::{ErrorKind, NormalizedError, NormalizedResult, Payload};
pub use spec::{AdapterSpec, RouteTemplate};
