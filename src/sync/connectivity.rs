use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::store::DocumentStore;

/// Whether the client believes it can reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkStatus {
    #[default]
    Online,
    Offline,
}

impl std::fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkStatus::Online => write!(f, "online"),
            NetworkStatus::Offline => write!(f, "offline"),
        }
    }
}

/// A connectivity change reported by the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    Online,
    Offline,
}

/// Ping the store, treating a timeout like any other failure.
pub async fn check_connection<S>(store: &S, timeout: Duration) -> NetworkStatus
where
    S: DocumentStore + ?Sized,
{
    match tokio::time::timeout(timeout, store.ping()).await {
        Ok(Ok(())) => NetworkStatus::Online,
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "Store ping failed");
            NetworkStatus::Offline
        }
        Err(_) => {
            tracing::debug!(timeout_ms = timeout.as_millis() as u64, "Store ping timed out");
            NetworkStatus::Offline
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RemoteDocumentStore;

    use crate::store::InMemoryDocumentStore;

    #[test]
    fn test_status_display() {
        assert_eq!(NetworkStatus::Online.to_string(), "online");
        assert_eq!(NetworkStatus::Offline.to_string(), "offline");
        assert_eq!(NetworkStatus::default(), NetworkStatus::Online);
    }

    #[tokio::test]
    async fn test_unreachable_store_is_offline() {
        let store = RemoteDocumentStore::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        assert_eq!(
            check_connection(&store, Duration::from_secs(2)).await,
            NetworkStatus::Offline
        );
    }

    #[tokio::test]
    async fn test_local_store_is_online() {
        let store = InMemoryDocumentStore::new();
        assert_eq!(
            check_connection(&store, Duration::from_millis(100)).await,
            NetworkStatus::Online
        );
    }
}
