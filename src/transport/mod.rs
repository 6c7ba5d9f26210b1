//! Transport module - endpoint handles and gadget configuration.
//!
//! - [`EndpointSet`] owns the three FunctionFS endpoint files for the life
//!   of the process.
//! - [`config`] builds the descriptor and string blobs the kernel expects
//!   during the one-time handshake on ep0.

pub mod config;
mod endpoints;

pub use endpoints::EndpointSet;
