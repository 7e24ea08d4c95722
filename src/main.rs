// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command line entry point of the bridge.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use elgato_mqtt::{Bridge, BridgeConfig, HostAddress};
use tracing_subscriber::EnvFilter;

/// Control an Elgato Key Light via MQTT.
///
/// Subscribes to `<prefix>/brightness` (0.0 - 1.0), `<prefix>/temperature`
/// (0.0 - 1.0) and `<prefix>/onoff` (0 = off, other = on).
#[derive(Parser, Debug)]
#[command(name = "elgato-mqtt")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Light address, e.g. 192.168.1.100:9123.
    light: HostAddress,

    /// MQTT broker address, e.g. 192.168.1.200:1883.
    broker: HostAddress,

    /// Topic prefix, e.g. office/light.
    topic_prefix: String,

    /// Seconds to wait for the broker to accept the connection.
    #[arg(long, default_value_t = 10)]
    connect_timeout: u64,

    /// Seconds to wait for each HTTP request to the light.
    #[arg(long, default_value_t = 10)]
    request_timeout: u64,

    /// MQTT keep-alive interval in seconds.
    #[arg(long, default_value_t = 30)]
    keep_alive: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "elgato-mqtt stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> elgato_mqtt::Result<()> {
    let config = BridgeConfig::new(args.light, args.broker, args.topic_prefix)?
        .with_connection_timeout(Duration::from_secs(args.connect_timeout))
        .with_request_timeout(Duration::from_secs(args.request_timeout))
        .with_keep_alive(Duration::from_secs(args.keep_alive));

    tracing::info!(
        light = %config.light(),
        broker = %config.broker(),
        prefix = %config.topic_prefix(),
        "Starting elgato-mqtt"
    );

    let bridge = Bridge::start(config).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutting down");
    bridge.shutdown().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_arguments() {
        let args = Args::try_parse_from([
            "elgato-mqtt",
            "192.168.1.100:9123",
            "192.168.1.200:1883",
            "office/light",
        ])
        .unwrap();

        assert_eq!(args.light.host(), "192.168.1.100");
        assert_eq!(args.broker.port(), 1883);
        assert_eq!(args.topic_prefix, "office/light");
        assert_eq!(args.connect_timeout, 10);
    }

    #[test]
    fn missing_argument_is_an_error() {
        let result = Args::try_parse_from(["elgato-mqtt", "192.168.1.100:9123", "broker:1883"]);
        assert!(result.is_err());
    }

    #[test]
    fn malformed_address_is_an_error() {
        let result = Args::try_parse_from(["elgato-mqtt", "bad", "broker:1883", "office/light"]);
        assert!(result.is_err());

        let result =
            Args::try_parse_from(["elgato-mqtt", "light:9123", "broker:-1", "office/light"]);
        assert!(result.is_err());
    }
}
