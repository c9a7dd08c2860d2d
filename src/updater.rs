//! A single resolve, compare, publish and persist pass.

use crate::detector::IpDetector;
use crate::error::Result;
use crate::providers::{ChangeBatch, PublishReceipt, Publisher};
use crate::record::RecordSet;
use crate::state::StateStore;

/// Result of an update run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Address matches the cache; nothing was published.
    Unchanged { ip: String },
    /// Upsert was accepted and the cache now holds `ip`.
    Updated { ip: String, receipt: PublishReceipt },
}

/// Sequences detection, cache comparison, publishing and cache update.
pub struct Updater<'a, P: Publisher + ?Sized> {
    detector: &'a IpDetector,
    store: &'a StateStore,
    publisher: &'a P,
}

impl<'a, P: Publisher + ?Sized> Updater<'a, P> {
    pub fn new(detector: &'a IpDetector, store: &'a StateStore, publisher: &'a P) -> Self {
        Self {
            detector,
            store,
            publisher,
        }
    }

    /// Run one pass for `record_set`.
    ///
    /// The cache is only written after the provider accepted the batch. If
    /// that write fails the error is returned even though the records were
    /// already changed; the next run will publish again.
    pub async fn run(&self, record_set: RecordSet) -> Result<Outcome> {
        let ip = self.detector.detect().await?;

        if self.store.read().matches(&ip) {
            tracing::info!("current IP address is {}; nothing to do", ip);
            return Ok(Outcome::Unchanged { ip });
        }

        let record_set = record_set.with_value(ip.as_str());
        let batch = ChangeBatch::upsert(&record_set);
        let receipt = self.publisher.publish(&batch).await?;
        tracing::info!("current IP address is {}; upsert request sent", ip);
        tracing::debug!(
            "{} change {} is {}",
            self.publisher.name(),
            receipt.change_id,
            receipt.status
        );

        self.store.write(&ip)?;

        Ok(Outcome::Updated { ip, receipt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DynDnsError;
    use crate::providers::MockPublisher;
    use crate::state::{CachedAddress, STATE_FILE_NAME};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn echo_server(ip: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!("{}\n", ip)))
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn record_set() -> RecordSet {
        RecordSet::new(["a.example.com", "b.example.com"], "A", 300, "Z123EXAMPLE").unwrap()
    }

    fn receipt() -> PublishReceipt {
        PublishReceipt {
            change_id: "/change/C1".to_string(),
            status: "PENDING".to_string(),
            timestamp: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_unchanged_address_skips_publish() {
        let server = echo_server("1.2.3.4").await;
        let detector = IpDetector::with_service(server.uri());
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join(STATE_FILE_NAME));
        store.write("1.2.3.4").unwrap();

        let mut publisher = MockPublisher::new();
        publisher.expect_publish().never();
        publisher.expect_name().return_const("mock");

        let outcome = Updater::new(&detector, &store, &publisher)
            .run(record_set())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Unchanged {
                ip: "1.2.3.4".to_string()
            }
        );
        assert_eq!(store.read(), CachedAddress::Present("1.2.3.4".to_string()));
    }

    #[tokio::test]
    async fn test_changed_address_publishes_and_persists() {
        let server = echo_server("5.6.7.8").await;
        let detector = IpDetector::with_service(server.uri());
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join(STATE_FILE_NAME));
        store.write("1.2.3.4").unwrap();

        let mut publisher = MockPublisher::new();
        publisher
            .expect_publish()
            .withf(|batch| {
                batch.hosted_zone_id() == "Z123EXAMPLE"
                    && batch.changes().len() == 2
                    && batch.changes().iter().all(|c| c.value == "5.6.7.8")
            })
            .times(1)
            .returning(|_| Ok(receipt()));
        publisher.expect_name().return_const("mock");

        let outcome = Updater::new(&detector, &store, &publisher)
            .run(record_set())
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Updated { ref ip, .. } if ip == "5.6.7.8"));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "5.6.7.8");
    }

    #[tokio::test]
    async fn test_first_run_publishes() {
        let server = echo_server("9.9.9.9").await;
        let detector = IpDetector::with_service(server.uri());
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join(STATE_FILE_NAME));

        let mut publisher = MockPublisher::new();
        publisher
            .expect_publish()
            .times(1)
            .returning(|_| Ok(receipt()));
        publisher.expect_name().return_const("mock");

        let outcome = Updater::new(&detector, &store, &publisher)
            .run(record_set())
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Updated { .. }));
        assert_eq!(store.read(), CachedAddress::Present("9.9.9.9".to_string()));
    }

    #[tokio::test]
    async fn test_publish_failure_keeps_cache() {
        let server = echo_server("5.6.7.8").await;
        let detector = IpDetector::with_service(server.uri());
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join(STATE_FILE_NAME));
        store.write("1.2.3.4").unwrap();

        let mut publisher = MockPublisher::new();
        publisher
            .expect_publish()
            .times(1)
            .returning(|_| Err(DynDnsError::Provider("throttled".to_string())));

        let err = Updater::new(&detector, &store, &publisher)
            .run(record_set())
            .await
            .unwrap_err();

        assert!(matches!(err, DynDnsError::Provider(_)));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "1.2.3.4");
    }

    #[tokio::test]
    async fn test_cache_write_failure_after_publish() {
        let server = echo_server("5.6.7.8").await;
        let detector = IpDetector::with_service(server.uri());
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("missing").join(STATE_FILE_NAME));

        let mut publisher = MockPublisher::new();
        publisher
            .expect_publish()
            .times(1)
            .returning(|_| Ok(receipt()));
        publisher.expect_name().return_const("mock");

        let err = Updater::new(&detector, &store, &publisher)
            .run(record_set())
            .await
            .unwrap_err();

        assert!(matches!(err, DynDnsError::StateWrite { .. }));
    }

    #[tokio::test]
    async fn test_detection_failure_skips_publish() {
        let detector = IpDetector::with_service("http://127.0.0.1:1/".to_string());
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join(STATE_FILE_NAME));

        let mut publisher = MockPublisher::new();
        publisher.expect_publish().never();

        let err = Updater::new(&detector, &store, &publisher)
            .run(record_set())
            .await
            .unwrap_err();

        assert!(matches!(err, DynDnsError::IpDetection(_)));
        assert_eq!(store.read(), CachedAddress::Absent);
    }
}
