//! Chain adapters for the gateway.
//!
//! Each supported chain family gets one [`ChainAdapter`] implementation that
//! turns a logical operation into a wire call and the raw response back into
//! a normalized result. Everything else in the gateway is chain-agnostic.
//!
//! # Architecture
//!
//! - `adapter`: the `ChainAdapter` trait and the faults adapters report
//! - `normalizer`: maps those faults (and gateway-level conditions) onto the
//!   shared error taxonomy
//! - `numeric`: hex/decimal quantity normalization
//! - `jsonrpc`: JSON-RPC 2.0 envelope shared by the EVM and Solana adapters
//! - `implementations`: concrete adapters per wire style
//! - `factory`: builds the right adapter for an `AdapterSpec`
//! - `registry`: the immutable chain id to adapter table

pub mod adapter;
pub mod factory;
pub mod jsonrpc;
pub mod normalizer;
pub mod numeric;
pub mod params;
pub mod registry;

pub mod implementations;

pub use adapter::{AdapterError, ChainAdapter, ResponseFault};
pub use factory::create_adapter;
pub use normalizer::Condition;
pub use registry::{ChainRegistry, RegistryBuilder, RegistryError};

pub use implementations::{AptosAdapter, EvmAdapter, SolanaAdapter, SuiAdapter};
