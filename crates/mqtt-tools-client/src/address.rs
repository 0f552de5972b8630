//! Broker address parsing.

use crate::error::ClientError;
use std::fmt;
use url::Url;

/// Port used when an address does not name one.
pub const DEFAULT_PORT: u16 = 1883;

/// A broker host and port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerAddr {
    /// Host name or IP address
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl fmt::Display for BrokerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Parse a comma-separated list of broker URLs.
///
/// Entries are trimmed and empty entries skipped.
///
/// # Errors
///
/// Returns error if any entry is invalid or the list names no server.
///
/// # Examples
///
/// ```
/// use mqtt_tools_client::parse_server_list;
///
/// let servers = parse_server_list("tcp://a:1884, b").unwrap();
/// assert_eq!(servers[0].to_string(), "a:1884");
/// assert_eq!(servers[1].to_string(), "b:1883");
/// ```
pub fn parse_server_list(input: &str) -> Result<Vec<BrokerAddr>, ClientError> {
    let servers = input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_broker_url)
        .collect::<Result<Vec<_>, _>>()?;

    if servers.is_empty() {
        return Err(ClientError::InvalidUrl(format!("{input:?}: no servers given")));
    }

    Ok(servers)
}

/// Parse one broker URL into host and port.
///
/// Accepts `tcp://host[:port]`, `mqtt://host[:port]` and bare `host[:port]`.
///
/// # Errors
///
/// Returns error on an unsupported scheme, a missing host or a bad port.
pub fn parse_broker_url(input: &str) -> Result<BrokerAddr, ClientError> {
    let invalid = |reason: String| ClientError::InvalidUrl(format!("{input}: {reason}"));

    let url = if input.contains("://") {
        Url::parse(input)
    } else {
        Url::parse(&format!("tcp://{input}"))
    }
    .map_err(|e| invalid(e.to_string()))?;

    if !matches!(url.scheme(), "tcp" | "mqtt") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(BrokerAddr {
            host: host.to_string(),
            port: url.port().unwrap_or(DEFAULT_PORT),
        }),
        _ => Err(invalid("missing host".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tcp_url() {
        let addr = parse_broker_url("tcp://localhost:1883").unwrap();
        assert_eq!(addr.host, "localhost");
        assert_eq!(addr.port, 1883);
    }

    #[test]
    fn parse_mqtt_url_custom_port() {
        let addr = parse_broker_url("mqtt://broker.example.com:8883").unwrap();
        assert_eq!(addr.host, "broker.example.com");
        assert_eq!(addr.port, 8883);
    }

    #[test]
    fn parse_default_port() {
        let addr = parse_broker_url("tcp://broker.example.com").unwrap();
        assert_eq!(addr.port, DEFAULT_PORT);

        let addr = parse_broker_url("10.0.0.7").unwrap();
        assert_eq!(addr.host, "10.0.0.7");
        assert_eq!(addr.port, DEFAULT_PORT);
    }

    #[test]
    fn parse_bare_host_port() {
        let addr = parse_broker_url("localhost:1884").unwrap();
        assert_eq!(addr.to_string(), "localhost:1884");
    }

    #[test]
    fn reject_tls_scheme() {
        let err = parse_broker_url("mqtts://localhost:8883").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'mqtts'"));
    }

    #[test]
    fn reject_bad_port() {
        assert!(parse_broker_url("localhost:abc").is_err());
        assert!(parse_broker_url("localhost:70000").is_err());
        assert!(parse_broker_url("a:1:2").is_err());
        assert!(parse_broker_url(":1883").is_err());
    }

    #[test]
    fn bare_and_prefixed_forms_agree() {
        let pairs = [
            ("broker", "tcp://broker"),
            ("broker:1884", "mqtt://broker:1884"),
        ];
        for (bare, prefixed) in pairs {
            assert_eq!(
                parse_broker_url(bare).unwrap(),
                parse_broker_url(prefixed).unwrap()
            );
        }
    }

    #[test]
    fn server_list_keeps_order() {
        let servers = parse_server_list("tcp://one:1, two:2 ,,three").unwrap();
        let rendered: Vec<String> = servers.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["one:1", "two:2", "three:1883"]);
    }

    #[test]
    fn server_list_empty() {
        assert!(parse_server_list("").is_err());
        assert!(parse_server_list(" , ").is_err());
    }

    #[test]
    fn server_list_reports_bad_entry() {
        let err = parse_server_list("good:1883,http://bad").unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }
}
