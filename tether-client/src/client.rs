use crate::ApiRequest;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tether_types::ApiResult;

/// Performs one request against the object store.
///
/// Implementations own transport, authentication headers, timeouts and retry
/// policy. A timeout surfaces as [`ApiError::Network`].
///
/// [`ApiError::Network`]: tether_types::ApiError::Network
#[async_trait]
pub trait Client: Send + Sync {
    /// Sends `request` and returns the result payload, already unwrapped
    /// from any response envelope.
    async fn request(&self, request: ApiRequest) -> ApiResult<Value>;
}

#[async_trait]
impl<C: Client + ?Sized> Client for Arc<C> {
    async fn request(&self, request: ApiRequest) -> ApiResult<Value> {
        (**self).request(request).await
    }
}
