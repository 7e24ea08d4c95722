// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the broker session using mockforge-mqtt.
//!
//! Bridge tests also stand up a wiremock light so that messages can be
//! followed from the broker to the light's state endpoint.

use std::sync::Arc;
use std::time::Duration;

use elgato_mqtt::protocol::MqttBroker;
use elgato_mqtt::{Bridge, BridgeConfig, Error, LightCommand, ProtocolError};
use mockforge_mqtt::broker::MqttConfig;
use mockforge_mqtt::start_mqtt_server;
use rumqttc::{AsyncClient, MqttOptions, QoS};
use serde_json::json;
use tokio::time::sleep;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const STATE_PATH: &str = "/elgato/lights";

/// Helper to find an available port for testing.
fn get_test_port() -> u16 {
    use std::sync::atomic::{AtomicU16, Ordering};
    static PORT_COUNTER: AtomicU16 = AtomicU16::new(18950);
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Returns a port nothing is listening on.
fn closed_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Starts a mock MQTT broker on the given port.
async fn start_mock_broker(port: u16) {
    let config = MqttConfig {
        port,
        host: "127.0.0.1".to_string(),
        ..Default::default()
    };

    tokio::spawn(async move {
        let _ = start_mqtt_server(config).await;
    });

    // Give the broker time to bind and accept connections
    sleep(Duration::from_millis(500)).await;
}

/// Connects a second client used to publish control values.
async fn start_publisher(port: u16) -> AsyncClient {
    let mut options = MqttOptions::new("publisher", "127.0.0.1", port);
    options.set_keep_alive(Duration::from_secs(30));
    let (client, mut eventloop) = AsyncClient::new(options, 10);

    tokio::spawn(async move {
        while eventloop.poll().await.is_ok() {}
    });

    client
}

fn single_light(on: u8, brightness: i32, temperature: i32) -> serde_json::Value {
    json!({
        "numberOfLights": 1,
        "lights": [{ "on": on, "brightness": brightness, "temperature": temperature }]
    })
}

/// Starts a light answering `GET` with `current` and expecting one `PUT` of
/// `written`.
async fn start_mock_light(current: serde_json::Value, written: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(current))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(STATE_PATH))
        .and(body_json(written.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(written))
        .expect(1)
        .mount(&server)
        .await;
    server
}

async fn puts(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == "PUT")
        .collect()
}

/// Waits until the light has received at least one `PUT`.
async fn wait_for_put(server: &MockServer) -> Vec<Request> {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let puts = puts(server).await;
            if !puts.is_empty() {
                return puts;
            }
            sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .expect("light never received a PUT")
}

fn bridge_config(light: &MockServer, broker_port: u16) -> BridgeConfig {
    BridgeConfig::new(
        light.address().to_string().parse().unwrap(),
        format!("127.0.0.1:{broker_port}").parse().unwrap(),
        "office/light",
    )
    .unwrap()
}

// ============================================================================
// Broker session
// ============================================================================

mod broker_session {
    use super::*;

    #[tokio::test]
    async fn connect_to_broker() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let broker = MqttBroker::builder()
            .host("127.0.0.1")
            .port(port)
            .build()
            .await
            .unwrap();

        assert!(broker.is_connected());
        assert!(broker.client_id().starts_with("elgato_mqtt_"));
    }

    #[tokio::test]
    async fn client_ids_are_unique() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let first = MqttBroker::builder().host("127.0.0.1").port(port).build().await.unwrap();
        let second = MqttBroker::builder().host("127.0.0.1").port(port).build().await.unwrap();

        assert_ne!(first.client_id(), second.client_id());
    }

    #[tokio::test]
    async fn unreachable_broker_times_out() {
        let result = MqttBroker::builder()
            .host("127.0.0.1")
            .port(closed_port())
            .connection_timeout(Duration::from_millis(500))
            .reconnect_delay(Duration::from_millis(50))
            .build()
            .await;

        assert!(matches!(result, Err(ProtocolError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn bind_registers_topic() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let broker = MqttBroker::builder()
            .host("127.0.0.1")
            .port(port)
            .build()
            .await
            .unwrap();

        broker
            .bind("office/light/brightness", Arc::new(|_: f64| {}))
            .await
            .unwrap();

        assert!(broker.router().is_bound("office/light/brightness"));
        assert_eq!(broker.router().len(), 1);
    }

    #[tokio::test]
    async fn disconnect_marks_session_closed() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let broker = MqttBroker::builder()
            .host("127.0.0.1")
            .port(port)
            .build()
            .await
            .unwrap();

        broker.disconnect().await.unwrap();

        assert!(!broker.is_connected());
    }
}

// ============================================================================
// Bridge wiring
// ============================================================================

mod bridge {
    use super::*;

    #[tokio::test]
    async fn binds_all_control_topics() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let config = BridgeConfig::new(
            "127.0.0.1:9123".parse().unwrap(),
            format!("127.0.0.1:{port}").parse().unwrap(),
            "office/light",
        )
        .unwrap();

        let bridge = Bridge::start(config).await.unwrap();

        assert_eq!(
            bridge.broker().router().topics(),
            vec![
                "office/light/brightness".to_string(),
                "office/light/onoff".to_string(),
                "office/light/temperature".to_string(),
            ]
        );

        bridge.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_broker_fails_startup() {
        let config = BridgeConfig::new(
            "127.0.0.1:9123".parse().unwrap(),
            format!("127.0.0.1:{}", closed_port()).parse().unwrap(),
            "office/light",
        )
        .unwrap()
        .with_connection_timeout(Duration::from_millis(500));

        let result = Bridge::start(config).await;

        assert!(matches!(
            result,
            Err(Error::Protocol(ProtocolError::ConnectionFailed(_)))
        ));
    }

    #[tokio::test]
    async fn published_value_reaches_light() {
        let port = get_test_port();
        start_mock_broker(port).await;
        let light = start_mock_light(single_light(1, 40, 213), single_light(1, 100, 213)).await;

        let bridge = Bridge::start(bridge_config(&light, port)).await.unwrap();
        let publisher = start_publisher(port).await;
        sleep(Duration::from_millis(500)).await;

        // Bad payloads are dropped without stopping later deliveries.
        publisher
            .publish("office/light/onoff", QoS::AtLeastOnce, false, "notanumber")
            .await
            .unwrap();
        publisher
            .publish("office/light/onoff", QoS::AtLeastOnce, false, vec![0xff, 0xfe])
            .await
            .unwrap();
        publisher
            .publish("office/light/brightness", QoS::AtLeastOnce, false, "1.0")
            .await
            .unwrap();

        let puts = wait_for_put(&light).await;
        assert_eq!(puts.len(), 1);

        bridge.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn shutdown_applies_queued_commands() {
        let port = get_test_port();
        start_mock_broker(port).await;
        let light = start_mock_light(single_light(1, 40, 213), single_light(0, 40, 213)).await;

        let bridge = Bridge::start(bridge_config(&light, port)).await.unwrap();
        bridge.light().submit(LightCommand::SetPower(false)).unwrap();
        bridge.shutdown().await.unwrap();

        assert_eq!(puts(&light).await.len(), 1);
    }
}
