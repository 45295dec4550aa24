use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Proto {
    Http,
    Https,
    Socks4,
    Socks5,
    Connect80,
    Connect25,
}

impl fmt::Display for Proto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Proto::Http => write!(f, "HTTP"),
            Proto::Https => write!(f, "HTTPS"),
            Proto::Socks4 => write!(f, "SOCKS4"),
            Proto::Socks5 => write!(f, "SOCKS5"),
            Proto::Connect80 => write!(f, "CONNECT:80"),
            Proto::Connect25 => write!(f, "CONNECT:25"),
        }
    }
}

/// The protocol family most HTTP listing sources advertise.
pub fn http_family() -> Vec<Proto> {
    vec![Proto::Http, Proto::Connect80, Proto::Https, Proto::Connect25]
}

/// One (host, port) pair advertised by a source, tagged with the
/// protocols the source declares for its whole list.
///
/// Identity is `(host, port)` only: protocols never participate in
/// equality or hashing, so inserting a duplicate key into a
/// `HashSet<EndpointRecord>` is a no-op and the first-seen record wins.
#[derive(Debug, Clone)]
pub struct EndpointRecord {
    pub host: String,
    pub port: String,
    pub protocols: Vec<Proto>,
}

impl PartialEq for EndpointRecord {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host && self.port == other.port
    }
}

impl Eq for EndpointRecord {}

impl Hash for EndpointRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.host.hash(state);
        self.port.hash(state);
    }
}

impl fmt::Display for EndpointRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let protos: Vec<String> = self.protocols.iter().map(|p| p.to_string()).collect();
        write!(f, "{}:{} [{}]", self.host, self.port, protos.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn identity_ignores_protocols() {
        let a = EndpointRecord {
            host: "10.0.0.1".into(),
            port: "8080".into(),
            protocols: http_family(),
        };
        let b = EndpointRecord {
            host: "10.0.0.1".into(),
            port: "8080".into(),
            protocols: vec![Proto::Socks5],
        };
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);
        // first-seen protocols win
        assert_eq!(set.iter().next().unwrap().protocols, http_family());
    }

    #[test]
    fn different_ports_are_distinct() {
        let mut set = HashSet::new();
        for port in ["80", "8080"] {
            set.insert(EndpointRecord {
                host: "10.0.0.1".into(),
                port: port.into(),
                protocols: vec![],
            });
        }
        assert_eq!(set.len(), 2);
    }
}
