use std::future::Future;
use std::time::Duration;

/// Poll an async connect function until it succeeds.
///
/// Used at service startup for resources that may come up after us
/// (e.g. the backend REST API).
pub async fn wait_for_resource_async<F, Fut, T, E>(
    mut connect: F,
    poll_interval_ms: u64,
    resource_name: &str,
) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    loop {
        match connect().await {
            Ok(resource) => {
                tracing::info!("{} connected", resource_name);
                return resource;
            }
            Err(e) => {
                tracing::debug!("Waiting for {} ({})", resource_name, e);
                tokio::time::sleep(Duration::from_millis(poll_interval_ms)).await;
            }
        }
    }
}
