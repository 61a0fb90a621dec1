//! The chain gateway.
//!
//! [`Gateway`] is the single entry point callers use: it resolves a request's
//! chain through the registry, has the adapter build the wire call, runs it
//! through the shared transport, and hands back a normalized result. Expected
//! failures of any kind come back as data, never as `Err`.

pub mod builder;
pub mod error;
pub mod gateway;
pub mod settings;

pub use builder::GatewayBuilder;
pub use error::CoreError;
pub use gateway::{Gateway, InvocationState};
pub use settings::GatewaySettings;
