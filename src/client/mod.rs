pub mod http;
pub mod types;

use async_trait::async_trait;

pub use http::HttpDispatcher;
pub use types::*;

/// Sends API requests on behalf of the scenario runner.
///
/// Implementations never fail: anything that prevents a response from being
/// obtained comes back as [`Dispatch::Failed`].
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Dispatch;
}
