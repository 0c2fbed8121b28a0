//! External value producer interface.

use std::future::Future;

use async_trait::async_trait;

use crate::error::BoxError;

/// Computes the value for a logical input on a cache miss.
///
/// The cache is agnostic to how the value is produced (network call,
/// model inference, ...). Implemented for any
/// `Fn(String) -> impl Future<Output = Result<V, BoxError>>`.
#[async_trait]
pub trait ValueProducer<V>: Send + Sync {
    async fn produce(&self, input: &str) -> Result<V, BoxError>;
}

#[async_trait]
impl<V, F, Fut> ValueProducer<V> for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<V, BoxError>> + Send,
    V: Send + 'static,
{
    async fn produce(&self, input: &str) -> Result<V, BoxError> {
        (self)(input.to_owned()).await
    }
}
