//! CompletionGateway trait definition.
//!
//! The gateway is the external text-generation service consumed
//! synchronously, one request per conversational turn. Uses native async
//! fn in traits (RPITIT, Rust 2024 edition). Implementations live in
//! parley-infra.

use parley_types::error::GatewayError;
use parley_types::gateway::ChatTurn;

/// Trait for completion gateway backends.
///
/// One ordered sequence of role-tagged turns in, one text reply out.
/// No streaming, no retries; a failure is surfaced to the caller, who
/// may resubmit.
pub trait CompletionGateway: Send + Sync {
    /// Submit the conversation and return the generated reply.
    fn complete(
        &self,
        turns: &[ChatTurn],
    ) -> impl std::future::Future<Output = Result<String, GatewayError>> + Send;
}
