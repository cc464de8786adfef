//! Host-facing solver contract
//!
//! The webhook host owns request transport and dispatch; it calls into a
//! [`Solver`] for each challenge. The host may call `present` and `clean_up`
//! concurrently for different challenges, including several for the same
//! hostname.

use async_trait::async_trait;

use crate::challenge::ChallengeRequest;
use crate::config::HostConfig;
use crate::shutdown::ShutdownSignal;

/// A DNS-01 challenge solver
#[async_trait]
pub trait Solver: Send + Sync {
    /// Stable name the host uses to tell solvers apart
    fn name(&self) -> &'static str;

    /// Ensure the TXT record for `request` exists
    ///
    /// Must be safe to call again with the same request. Errors are returned
    /// to the host, which is expected to retry.
    async fn present(&self, request: &ChallengeRequest) -> crate::Result<()>;

    /// Delete the TXT record created for `request`, and only that record
    ///
    /// Succeeds without changes if the record is already gone.
    async fn clean_up(&self, request: &ChallengeRequest) -> crate::Result<()>;

    /// Called once by the host before serving any request
    async fn initialize(
        &mut self,
        host: &HostConfig,
        shutdown: ShutdownSignal,
    ) -> crate::Result<()>;
}
