// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Network address of the light or the broker.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// A validated `<host>:<port>` pair.
///
/// The host is never blank and the port is always positive. The only way to
/// obtain a `HostAddress` from text is [`FromStr`].
///
/// # Examples
///
/// ```
/// use elgato_mqtt::types::HostAddress;
///
/// let addr: HostAddress = "192.168.1.100:9123".parse().unwrap();
/// assert_eq!(addr.host(), "192.168.1.100");
/// assert_eq!(addr.port(), 9123);
///
/// assert!("192.168.1.100".parse::<HostAddress>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostAddress {
    host: String,
    port: u16,
}

impl HostAddress {
    /// Returns the host name or IP address.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for HostAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split(':').collect();
        let [host, port] = segments.as_slice() else {
            return Err(ParseError::SegmentCount(s.to_string()));
        };

        if host.trim().is_empty() {
            return Err(ParseError::BlankHost);
        }

        let port: i64 = port
            .parse()
            .map_err(|_| ParseError::MalformedPort(port.to_string()))?;
        if port <= 0 {
            return Err(ParseError::NonPositivePort(port));
        }
        let port = u16::try_from(port).map_err(|_| ParseError::MalformedPort(port.to_string()))?;

        Ok(Self {
            host: (*host).to_string(),
            port,
        })
    }
}

impl fmt::Display for HostAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_address() {
        let addr: HostAddress = "192.168.1.100:9123".parse().unwrap();
        assert_eq!(addr.host(), "192.168.1.100");
        assert_eq!(addr.port(), 9123);
    }

    #[test]
    fn parse_hostname() {
        let addr: HostAddress = "broker.local:1883".parse().unwrap();
        assert_eq!(addr.host(), "broker.local");
        assert_eq!(addr.port(), 1883);
    }

    #[test]
    fn missing_separator() {
        assert_eq!(
            "bad".parse::<HostAddress>(),
            Err(ParseError::SegmentCount("bad".to_string()))
        );
    }

    #[test]
    fn blank_host() {
        assert_eq!(":1883".parse::<HostAddress>(), Err(ParseError::BlankHost));
        assert_eq!("  :1883".parse::<HostAddress>(), Err(ParseError::BlankHost));
    }

    #[test]
    fn negative_port() {
        assert_eq!(
            "host:-1".parse::<HostAddress>(),
            Err(ParseError::NonPositivePort(-1))
        );
    }

    #[test]
    fn zero_port() {
        assert_eq!(
            "host:0".parse::<HostAddress>(),
            Err(ParseError::NonPositivePort(0))
        );
    }

    #[test]
    fn malformed_port() {
        assert_eq!(
            "host:abc".parse::<HostAddress>(),
            Err(ParseError::MalformedPort("abc".to_string()))
        );
        assert_eq!(
            "host:".parse::<HostAddress>(),
            Err(ParseError::MalformedPort(String::new()))
        );
    }

    #[test]
    fn extra_segment_is_rejected() {
        assert_eq!(
            "host:1:2".parse::<HostAddress>(),
            Err(ParseError::SegmentCount("host:1:2".to_string()))
        );
        assert_eq!(
            "::1:1883".parse::<HostAddress>(),
            Err(ParseError::SegmentCount("::1:1883".to_string()))
        );
    }

    #[test]
    fn port_out_of_range() {
        assert_eq!(
            "host:70000".parse::<HostAddress>(),
            Err(ParseError::MalformedPort("70000".to_string()))
        );
    }

    #[test]
    fn display_round_trip() {
        let addr: HostAddress = "10.0.0.2:9123".parse().unwrap();
        assert_eq!(addr.to_string(), "10.0.0.2:9123");
    }
}
