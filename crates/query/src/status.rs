//! Query lifecycle shared by every state holder

use serde::Serialize;
use std::fmt;
use std::future::Future;
use tracing::warn;

/// Where a query is in its fetch lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    /// Nothing requested yet, or cleared
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The latest request succeeded
    Ready,
    /// The latest request failed; see the state's `error`
    Error,
}

impl QueryStatus {
    /// True while a request is in flight
    #[must_use]
    pub fn is_loading(self) -> bool {
        self == Self::Loading
    }

    /// True once the latest request finished, either way
    #[must_use]
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Ready | Self::Error)
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// Tag identifying one fetch.
///
/// Advanced under the state lock whenever a request starts or the state is
/// reset; a completion applies only if its tag is still current.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub(crate) struct Generation(u64);

impl Generation {
    pub(crate) fn advance(&mut self) -> Self {
        self.0 += 1;
        *self
    }

    pub(crate) fn value(self) -> u64 {
        self.0
    }
}

/// Drive a fetch to completion on its own task.
///
/// The caller still waits for it, but dropping the caller's future does not
/// cancel the fetch, so a query that entered `Loading` always settles.
pub(crate) async fn run_detached<F>(fetch: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Err(e) = tokio::spawn(fetch).await {
        warn!(error = %e, "Fetch task did not complete");
    }
}
