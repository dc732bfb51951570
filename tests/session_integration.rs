// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for sessions, polling and the registry using wiremock.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wordclock_lib::catalog::{WordCatalog, WordCatalogEntry};
use wordclock_lib::entity::{EntityId, WordKind};
use wordclock_lib::event::WordClockEvent;
use wordclock_lib::service::SetWordColor;
use wordclock_lib::session::{DeviceSessionConfig, DeviceSessionRegistry, SessionOptions};
use wordclock_lib::types::{Brightness, DeviceAddress, RgbColor};
use wordclock_lib::{DeviceError, Error, ValueError};

/// Matches the raw query string, for `/ewstatus/?<id>` which has no key.
struct RawQuery(&'static str);

impl wiremock::Match for RawQuery {
    fn matches(&self, request: &wiremock::Request) -> bool {
        request.url.query() == Some(self.0)
    }
}

const SCENARIO_STATUS: &str =
    "R-Time=0 G-Time=0 B-Time=0 R-Back=110 G-Back=140 B-Back=255 INTENSITY=25";

/// Long enough that no automatic tick interferes with a test.
const QUIET_INTERVAL: Duration = Duration::from_secs(3600);

fn test_catalog() -> WordCatalog {
    WordCatalog::builtin()
        .with_language(
            "Test",
            [
                WordCatalogEntry::new(1, "ONE"),
                WordCatalogEntry::new(2, "TWO"),
                WordCatalogEntry::new(3, "THREE"),
            ],
        )
        .with_language(
            "English",
            [
                WordCatalogEntry::new(1, "ALARM"),
                WordCatalogEntry::new(20, "PARTY"),
            ],
        )
}

fn config_for(server: &MockServer) -> DeviceSessionConfig {
    DeviceSessionConfig::new(DeviceAddress::from(*server.address()))
        .with_polling_interval(QUIET_INTERVAL)
        .with_word_kind(WordKind::Light)
}

fn word_id(server: &MockServer, word: u32) -> EntityId {
    EntityId::for_word(&DeviceAddress::from(*server.address()), word)
}

fn time_id(server: &MockServer) -> EntityId {
    EntityId::for_light(
        &DeviceAddress::from(*server.address()),
        wordclock_lib::protocol::codec::Channel::Time,
    )
}

async fn mount_ok(server: &MockServer, endpoint: &str) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SCENARIO_STATUS))
        .mount(server)
        .await;
}

async fn next_matching(
    rx: &mut broadcast::Receiver<WordClockEvent>,
    predicate: impl Fn(&WordClockEvent) -> bool,
) -> WordClockEvent {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = rx.recv().await.unwrap();
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .unwrap()
}

// ============================================================================
// Polling
// ============================================================================

mod polling {
    use super::*;

    #[tokio::test]
    async fn tick_isolates_failing_entity() {
        let mock_server = MockServer::start().await;
        mount_status(&mock_server).await;
        for id in ["1", "2"] {
            Mock::given(method("GET"))
                .and(path("/ewstatus/"))
                .and(RawQuery(id))
                .respond_with(ResponseTemplate::new(200).set_body_string("1"))
                .mount(&mock_server)
                .await;
        }
        // Word 3 is not mocked: the device answers 404.

        let registry = DeviceSessionRegistry::with_catalog(test_catalog());
        let session_id = registry
            .add_session(config_for(&mock_server).with_language("Test"))
            .await
            .unwrap();

        let report = registry.poll_now(session_id).await.unwrap();

        assert_eq!(report.refreshed, 4);
        assert_eq!(report.failed, 1);
        assert!(registry.entity_state(&word_id(&mock_server, 1)).await.unwrap().is_on);
        assert!(registry.entity_state(&word_id(&mock_server, 2)).await.unwrap().is_on);
        assert!(!registry.entity_state(&word_id(&mock_server, 3)).await.unwrap().is_on);

        registry.shutdown().await;
    }

    #[tokio::test]
    async fn polling_runs_on_its_own() {
        let mock_server = MockServer::start().await;
        mount_status(&mock_server).await;

        let catalog = WordCatalog::new("None");
        let registry = DeviceSessionRegistry::with_catalog(catalog);
        let session_id = registry
            .add_session(config_for(&mock_server).with_polling_interval(Duration::from_secs(1)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(1600)).await;

        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests.iter().any(|r| r.url.path() == "/status"));
        let ids = registry.entity_ids(session_id).await.unwrap();
        assert_eq!(ids.len(), 2);
        assert!(registry.entity_state(&ids[1]).await.unwrap().is_on);

        registry.shutdown().await;
    }

    #[tokio::test]
    async fn interval_change_reschedules_and_polls_once() {
        let mock_server = MockServer::start().await;
        mount_status(&mock_server).await;

        let registry = DeviceSessionRegistry::with_catalog(WordCatalog::new("None"));
        let session_id = registry.add_session(config_for(&mock_server)).await.unwrap();
        let mut events = registry.subscribe();

        registry
            .update_options(
                session_id,
                SessionOptions::new().with_polling_interval(Duration::from_secs(1800)),
            )
            .await
            .unwrap();
        registry
            .update_options(
                session_id,
                SessionOptions::new().with_polling_interval(Duration::from_secs(900)),
            )
            .await
            .unwrap();

        let session = registry.session(session_id).await.unwrap();
        assert_eq!(session.coordinator().active_task_count(), 1);
        assert_eq!(
            session.coordinator().interval().await,
            Some(Duration::from_secs(900))
        );
        assert_eq!(
            registry.session_config(session_id).await.unwrap().polling_time,
            900
        );

        let event = next_matching(&mut events, |e| {
            matches!(e, WordClockEvent::PollingRescheduled { .. })
        })
        .await;
        assert_eq!(
            event,
            WordClockEvent::polling_rescheduled(session_id, Duration::from_secs(1800))
        );

        let status_polls = mock_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.url.path() == "/status")
            .count();
        assert_eq!(status_polls, 4);

        registry.shutdown().await;
    }

    #[tokio::test]
    async fn zero_interval_change_is_rejected() {
        let mock_server = MockServer::start().await;
        let registry = DeviceSessionRegistry::new();
        let session_id = registry.add_session(config_for(&mock_server)).await.unwrap();

        let result = registry
            .update_options(
                session_id,
                SessionOptions::new()
                    .with_language("Klingon")
                    .with_polling_interval(Duration::ZERO),
            )
            .await;

        assert!(matches!(
            result,
            Err(Error::Value(ValueError::ZeroPollingInterval))
        ));
        let config = registry.session_config(session_id).await.unwrap();
        assert_eq!(config.language, "German");
        assert_eq!(config.polling_interval(), QUIET_INTERVAL);

        registry.shutdown().await;
    }
}

// ============================================================================
// Reconfiguration
// ============================================================================

mod reconfiguration {
    use super::*;

    #[tokio::test]
    async fn language_change_replaces_only_words() {
        let mock_server = MockServer::start().await;
        mount_ok(&mock_server, "/config").await;

        let registry = DeviceSessionRegistry::with_catalog(test_catalog());
        let session_id = registry.add_session(config_for(&mock_server)).await.unwrap();
        let mut events = registry.subscribe();

        registry
            .turn_on(&time_id(&mock_server), Some(RgbColor::new(1, 2, 3)), None)
            .await
            .unwrap();
        let time_before = registry.entity(&time_id(&mock_server)).await.unwrap();

        registry
            .update_options(session_id, SessionOptions::new().with_language("English"))
            .await
            .unwrap();

        let time_after = registry.entity(&time_id(&mock_server)).await.unwrap();
        assert!(time_after.same_instance(&time_before));
        assert_eq!(
            registry.entity_state(&time_id(&mock_server)).await.unwrap().color,
            Some(RgbColor::new(1, 2, 3))
        );

        let ids = registry.entity_ids(session_id).await.unwrap();
        assert_eq!(ids.len(), 4);
        assert!(ids.contains(&word_id(&mock_server, 20)));
        assert!(!ids.contains(&word_id(&mock_server, 2)));
        assert!(registry.entity(&word_id(&mock_server, 2)).await.is_none());
        assert!(registry.entity(&word_id(&mock_server, 20)).await.is_some());

        let event = next_matching(&mut events, |e| {
            matches!(e, WordClockEvent::EntitiesReplaced { .. })
        })
        .await;
        let WordClockEvent::EntitiesReplaced { removed, added, .. } = event else {
            unreachable!();
        };
        assert_eq!(removed.len(), 12);
        assert_eq!(added, vec![word_id(&mock_server, 1), word_id(&mock_server, 20)]);

        registry.shutdown().await;
    }

    #[tokio::test]
    async fn unknown_language_falls_back_to_default() {
        let mock_server = MockServer::start().await;
        let registry = DeviceSessionRegistry::new();
        let session_id = registry
            .add_session(config_for(&mock_server).with_language("Klingon"))
            .await
            .unwrap();

        assert_eq!(registry.entity_ids(session_id).await.unwrap().len(), 14);

        registry.shutdown().await;
    }

    #[tokio::test]
    async fn same_language_is_a_no_op() {
        let mock_server = MockServer::start().await;
        let registry = DeviceSessionRegistry::new();
        let session_id = registry.add_session(config_for(&mock_server)).await.unwrap();
        let word = registry.entity(&word_id(&mock_server, 1)).await.unwrap();

        registry
            .update_options(session_id, SessionOptions::new().with_language("German"))
            .await
            .unwrap();

        let after = registry.entity(&word_id(&mock_server, 1)).await.unwrap();
        assert!(after.same_instance(&word));

        registry.shutdown().await;
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn concurrent_removal_tears_down_once() {
        let mock_server = MockServer::start().await;
        let registry = Arc::new(DeviceSessionRegistry::new());
        let session_id = registry.add_session(config_for(&mock_server)).await.unwrap();
        let session = registry.session(session_id).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.remove_session(session_id).await })
            })
            .collect();

        let mut removed = 0;
        for handle in handles {
            if handle.await.unwrap() {
                removed += 1;
            }
        }

        assert_eq!(removed, 1);
        assert!(session.is_closed());
        assert_eq!(session.coordinator().active_task_count(), 0);
        assert_eq!(registry.session_count().await, 0);
    }

    #[tokio::test]
    async fn duplicate_address_is_rejected() {
        let mock_server = MockServer::start().await;
        let registry = DeviceSessionRegistry::new();
        registry.add_session(config_for(&mock_server)).await.unwrap();

        let result = registry
            .add_session(config_for(&mock_server).with_language("English"))
            .await;

        assert!(matches!(
            result,
            Err(Error::Device(DeviceError::DuplicateAddress(_)))
        ));
        assert_eq!(registry.session_count().await, 1);

        registry.shutdown().await;
    }

    #[tokio::test]
    async fn removed_address_can_be_added_again() {
        let mock_server = MockServer::start().await;
        let registry = DeviceSessionRegistry::new();
        let first = registry.add_session(config_for(&mock_server)).await.unwrap();
        registry.remove_session(first).await;

        let second = registry.add_session(config_for(&mock_server)).await.unwrap();
        assert_ne!(first, second);

        registry.shutdown().await;
        assert!(registry.session_ids().await.is_empty());
    }

    #[tokio::test]
    async fn device_info_describes_clock() {
        let mock_server = MockServer::start().await;
        let registry = DeviceSessionRegistry::new();
        let session_id = registry.add_session(config_for(&mock_server)).await.unwrap();

        let info = registry.device_info(session_id).await.unwrap();
        assert_eq!(info.manufacturer, "AWSW");
        assert_eq!(info.model, "WordClock");
        assert_eq!(info.configuration_url, "http://127.0.0.1");

        registry.shutdown().await;
    }
}

// ============================================================================
// Service
// ============================================================================

mod service {
    use super::*;

    #[tokio::test]
    async fn set_word_color_on_word_light() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ew/"))
            .and(RawQuery("ew3=1&R=10&G=20&B=30"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let registry = DeviceSessionRegistry::new();
        registry.add_session(config_for(&mock_server)).await.unwrap();

        registry
            .set_word_color(SetWordColor::new(
                word_id(&mock_server, 3),
                RgbColor::new(10, 20, 30),
            ))
            .await
            .unwrap();

        let state = registry.entity_state(&word_id(&mock_server, 3)).await.unwrap();
        assert!(state.is_on);
        assert_eq!(state.color, Some(RgbColor::new(10, 20, 30)));

        registry.shutdown().await;
    }

    #[tokio::test]
    async fn call_service_on_time_light_clamps_values() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/config"))
            .and(RawQuery(
                "R-Time=255&G-Time=0&B-Time=12&INTENSITY=50&INTENSITYviaWEB=1",
            ))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let registry = DeviceSessionRegistry::new();
        registry.add_session(config_for(&mock_server)).await.unwrap();

        registry
            .call_service(&serde_json::json!({
                "entity_id": time_id(&mock_server),
                "rgb_color": [300, -1, 12],
                "brightness": 400,
            }))
            .await
            .unwrap();

        let state = registry.entity_state(&time_id(&mock_server)).await.unwrap();
        assert_eq!(state.brightness, Some(Brightness::MAX));

        registry.shutdown().await;
    }

    #[tokio::test]
    async fn unknown_entity_is_reported() {
        let registry = DeviceSessionRegistry::new();

        let result = registry
            .set_word_color(SetWordColor::new("wordclock_10_0_0_5_word_3", RgbColor::new(1, 1, 1)))
            .await;

        assert!(matches!(
            result,
            Err(Error::EntityNotFound(id)) if id.as_str() == "wordclock_10_0_0_5_word_3"
        ));
    }

    #[tokio::test]
    async fn switch_target_is_rejected_without_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let registry = DeviceSessionRegistry::new();
        registry
            .add_session(config_for(&mock_server).with_word_kind(WordKind::Switch))
            .await
            .unwrap();

        let result = registry
            .set_word_color(SetWordColor::new(word_id(&mock_server, 3), RgbColor::new(1, 1, 1)))
            .await;

        assert!(matches!(result, Err(Error::CapabilityNotSupported)));
        assert!(!registry.entity_state(&word_id(&mock_server, 3)).await.unwrap().is_on);

        registry.shutdown().await;
    }

    #[tokio::test]
    async fn malformed_payload_is_parse_error() {
        let registry = DeviceSessionRegistry::new();
        let result = registry
            .call_service(&serde_json::json!({ "rgb_color": [1, 2, 3] }))
            .await;
        assert!(matches!(result, Err(Error::Parse(_))));
    }
}
