//! # Ports Layer

pub mod inbound;
pub mod outbound;

pub use inbound::GateValidatorApi;
pub use outbound::AuthorityClient;
