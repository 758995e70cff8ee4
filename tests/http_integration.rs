// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP protocol and poll loop using wiremock.

use std::time::Duration;

use opengarage_lib::{
    ControllerSettings, Device, DeviceError, DeviceEvent, DoorCommand, Error, HttpClient,
    VehiclePresence,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> ControllerSettings {
    ControllerSettings::new(server.uri().replace("http://", ""), "opendoor")
}

fn status_body(door: u8, dist: f64, vehicle: u8, rssi: i64) -> serde_json::Value {
    serde_json::json!({
        "door": door,
        "dist": dist,
        "vehicle": vehicle,
        "rssi": rssi
    })
}

async fn mount_status(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/jc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ============================================================================
// HttpClient Tests
// ============================================================================

mod http_client {
    use super::*;

    #[tokio::test]
    async fn fetch_status_parses_snapshot() {
        let mock_server = MockServer::start().await;
        mount_status(&mock_server, status_body(0, 50.0, 1, -60)).await;

        let client = HttpClient::new(&settings_for(&mock_server)).unwrap();
        let snapshot = client.fetch_status().await.unwrap();

        assert!(snapshot.door_state().is_closed());
        assert_eq!(snapshot.vehicle_presence(), VehiclePresence::Present);
        assert_eq!(snapshot.rssi, -60);
    }

    #[tokio::test]
    async fn send_command_includes_device_key_and_flag() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cc"))
            .and(query_param("dkey", "opendoor"))
            .and(query_param("close", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": 1
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HttpClient::new(&settings_for(&mock_server)).unwrap();
        let result = client.send_command(DoorCommand::Close).await.unwrap();

        assert!(result.is_success());
    }

    #[tokio::test]
    async fn fetch_status_fails_on_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/jc"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new(&settings_for(&mock_server)).unwrap();
        let err = client.fetch_status().await.unwrap_err();

        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn fetch_status_fails_on_invalid_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/jc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new(&settings_for(&mock_server)).unwrap();
        assert!(client.fetch_status().await.is_err());
    }
}

// ============================================================================
// Poll Loop and Availability Tests
// ============================================================================

mod polling {
    use super::*;

    #[tokio::test]
    async fn poll_once_reconciles_snapshot() {
        let mock_server = MockServer::start().await;
        mount_status(&mock_server, status_body(0, 50.0, 0, -60)).await;

        let device = Device::new(settings_for(&mock_server)).unwrap();
        device.poll_once().await.unwrap();

        let state = device.state();
        assert_eq!(state.door_closed(), Some(true));
        assert_eq!(state.distance(), Some(50.0));
        assert!(device.is_available());
    }

    #[tokio::test]
    async fn poll_failure_marks_device_unavailable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/jc"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let device = Device::new(settings_for(&mock_server)).unwrap();
        let mut events = device.subscribe();

        assert!(device.poll_once().await.is_err());

        assert!(!device.is_available());
        let reason = device.unavailable_reason().unwrap();
        assert!(reason.contains("500"));

        assert_eq!(
            events.recv().await.unwrap(),
            DeviceEvent::AvailabilityChanged {
                available: false,
                reason: Some(reason),
            }
        );
    }

    #[tokio::test]
    async fn successful_poll_restores_availability() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/jc"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        mount_status(&mock_server, status_body(0, 50.0, 0, -60)).await;

        let device = Device::new(settings_for(&mock_server)).unwrap();

        assert!(device.poll_once().await.is_err());
        assert!(!device.is_available());

        let mut events = device.subscribe();
        device.poll_once().await.unwrap();

        assert!(device.is_available());
        assert!(device.unavailable_reason().is_none());
        assert_eq!(
            events.recv().await.unwrap(),
            DeviceEvent::AvailabilityChanged {
                available: true,
                reason: None,
            }
        );
    }

    #[tokio::test]
    async fn poll_loop_repolls_at_polling_rate() {
        let mock_server = MockServer::start().await;
        mount_status(&mock_server, status_body(0, 50.0, 0, -60)).await;

        let settings = settings_for(&mock_server).with_polling_rate(Duration::from_millis(100));
        let device = Device::new(settings).unwrap();

        device.start_polling();
        tokio::time::sleep(Duration::from_millis(350)).await;
        device.stop_polling();

        let polls = mock_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.url.path() == "/jc")
            .count();
        assert!(polls >= 2, "expected repeated polls, got {polls}");
    }

    #[tokio::test]
    async fn poll_completion_clears_in_flight_flag() {
        let mock_server = MockServer::start().await;
        mount_status(&mock_server, status_body(0, 50.0, 0, -60)).await;

        let device = Device::new(settings_for(&mock_server)).unwrap();

        // Sequential polls all run; a stuck in-flight flag would turn the
        // second call into a no-op and leave the state cache empty.
        device.poll_once().await.unwrap();
        device.poll_once().await.unwrap();

        assert_eq!(
            mock_server
                .received_requests()
                .await
                .unwrap()
                .iter()
                .filter(|r| r.url.path() == "/jc")
                .count(),
            2
        );
    }
}

// ============================================================================
// State Reconciliation Tests
// ============================================================================

mod reconciliation {
    use super::*;

    #[tokio::test]
    async fn door_opening_fires_exactly_one_event() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/jc"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(status_body(0, 50.0, 0, -60)),
            )
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        mount_status(&mock_server, status_body(1, 50.0, 0, -60)).await;

        let device = Device::new(settings_for(&mock_server)).unwrap();
        device.poll_once().await.unwrap();

        let mut events = device.subscribe();
        device.poll_once().await.unwrap();

        assert_eq!(device.state().door_closed(), Some(false));
        assert_eq!(events.recv().await.unwrap(), DeviceEvent::DoorOpened);
        assert!(
            events.try_recv().is_err(),
            "distance/vehicle/rssi must not fire"
        );
    }

    #[tokio::test]
    async fn identical_snapshot_fires_nothing() {
        let mock_server = MockServer::start().await;
        mount_status(&mock_server, status_body(1, 80.0, 1, -55)).await;

        let device = Device::new(settings_for(&mock_server)).unwrap();
        device.poll_once().await.unwrap();

        let state_before = device.state();
        let mut events = device.subscribe();

        device.poll_once().await.unwrap();

        assert_eq!(device.state(), state_before);
        assert!(events.try_recv().is_err());
    }
}

// ============================================================================
// Command Dispatch Tests
// ============================================================================

mod door_commands {
    use super::*;

    #[tokio::test]
    async fn accepted_command_resolves() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cc"))
            .and(query_param("open", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": 1
            })))
            .mount(&mock_server)
            .await;

        let device = Device::new(settings_for(&mock_server)).unwrap();
        device.send_door_command(DoorCommand::Open).await.unwrap();
    }

    #[tokio::test]
    async fn rejected_command_carries_result_code() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": 0
            })))
            .mount(&mock_server)
            .await;

        let device = Device::new(settings_for(&mock_server)).unwrap();
        let err = device.send_door_command(DoorCommand::Close).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Device(DeviceError::CommandRejected { code: 0 })
        ));
    }

    #[tokio::test]
    async fn network_failure_propagates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cc"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let device = Device::new(settings_for(&mock_server)).unwrap();
        let err = device.send_door_command(DoorCommand::Open).await.unwrap_err();

        assert!(matches!(err, Error::Protocol(_)));
    }

    #[tokio::test]
    async fn debounced_command_never_reaches_the_network() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": 1
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let device = Device::new(settings_for(&mock_server)).unwrap();

        device.set_door_closed(true).await.unwrap();
        let err = device.set_door_closed(false).await.unwrap_err();

        assert!(matches!(err, Error::Device(DeviceError::DebounceActive)));
        // wiremock verifies the expect(1) on drop
    }

    #[tokio::test]
    async fn set_door_closed_fires_deprecated_trigger() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": 1
            })))
            .mount(&mock_server)
            .await;

        let device = Device::new(settings_for(&mock_server)).unwrap();
        let mut events = device.subscribe();

        device.set_door_closed(true).await.unwrap();

        assert_eq!(events.recv().await.unwrap(), DeviceEvent::DoorClosed);
    }

    #[tokio::test]
    async fn accepted_command_defers_polling_by_open_close_time() {
        let mock_server = MockServer::start().await;
        mount_status(&mock_server, status_body(0, 50.0, 0, -60)).await;

        Mock::given(method("GET"))
            .and(path("/cc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": 1
            })))
            .mount(&mock_server)
            .await;

        let settings = settings_for(&mock_server)
            .with_polling_rate(Duration::from_millis(100))
            .with_open_close_time(Duration::from_millis(600));
        let device = Device::new(settings).unwrap();

        device.start_polling();
        tokio::time::sleep(Duration::from_millis(50)).await;

        device.send_door_command(DoorCommand::Open).await.unwrap();
        let polls_at_command = poll_count(&mock_server).await;

        // Well before open_close_time: the pending poll was cancelled
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(poll_count(&mock_server).await, polls_at_command);

        // After open_close_time: polling resumed
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(poll_count(&mock_server).await > polls_at_command);

        device.stop_polling();
    }

    async fn poll_count(server: &MockServer) -> usize {
        server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.url.path() == "/jc")
            .count()
    }
}
