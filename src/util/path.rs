//! Actor addressing across process and cluster boundaries.
//!
//! A [`NodeAddress`] identifies one member of a cluster by its canonical
//! transport endpoint; an [`ActorPath`] identifies one actor within a system,
//! optionally anchored to a node, using the wire syntax from the external
//! interfaces contract: `pekko://<system>@<host>:<port>/<segments...>`.

// Layer 1: Standard library imports
use std::fmt::{self, Display};
use std::net::SocketAddr;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

/// The canonical endpoint of one cluster member.
///
/// `uid` distinguishes successive incarnations of a member that rejoins after
/// being removed from the same `(system, host, port)` triple — the cluster
/// ring orders members by `(address, uid)`, never by address alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeAddress {
    pub system: &'static str,
    pub socket: SocketAddr,
    pub uid: u64,
}

impl NodeAddress {
    pub fn new(system: &'static str, socket: SocketAddr, uid: u64) -> Self {
        Self {
            system,
            socket,
            uid,
        }
    }
}

impl Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pekko://{}@{}", self.system, self.socket)
    }
}

/// Ordering by the canonical ring order: `(address, uid)`.
impl PartialOrd for NodeAddress {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeAddress {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.socket, self.uid).cmp(&(other.socket, other.uid))
    }
}

/// A location-transparent actor path.
///
/// `node` is `None` for actors whose home member is not yet known to the
/// caller (e.g. a freshly constructed shard entity reference before the
/// coordinator resolves its shard's home); `segments` are the `/`-separated,
/// URL-safe path components below `user/` (the user guardian is implicit).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorPath {
    pub node: Option<NodeAddress>,
    pub segments: Vec<String>,
}

impl ActorPath {
    pub fn new(node: Option<NodeAddress>, segments: Vec<String>) -> Self {
        Self { node, segments }
    }

    /// Construct a child path by appending one segment.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self {
            node: self.node,
            segments,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// `true` if this path names an actor hosted on `node`.
    pub fn is_local_to(&self, node: &NodeAddress) -> bool {
        self.node.as_ref() == Some(node)
    }
}

impl Display for ActorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Some(node) => write!(f, "{node}/{}", self.segments.join("/")),
            None => write!(f, "pekko://unbound/{}", self.segments.join("/")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn node(port: u16, uid: u64) -> NodeAddress {
        NodeAddress::new(
            "test-system",
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port),
            uid,
        )
    }

    #[test]
    fn node_ordering_is_by_address_then_uid() {
        let a = node(2551, 1);
        let b = node(2551, 2);
        let c = node(2552, 0);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn path_display_matches_external_syntax() {
        let n = node(2551, 7);
        let path = ActorPath::new(Some(n), vec!["user".into(), "echo".into(), "e1".into()]);
        let text = path.to_string();
        assert!(text.starts_with("pekko://test-system@127.0.0.1:2551/"));
        assert!(text.ends_with("user/echo/e1"));
    }

    #[test]
    fn child_extends_segments_without_mutating_parent() {
        let root = ActorPath::new(None, vec!["user".into()]);
        let child = root.child("worker-1");
        assert_eq!(root.segments, vec!["user"]);
        assert_eq!(child.segments, vec!["user", "worker-1"]);
        assert_eq!(child.name(), Some("worker-1"));
    }

    #[test]
    fn is_local_to_checks_node_identity() {
        let n1 = node(2551, 1);
        let n2 = node(2552, 1);
        let path = ActorPath::new(Some(n1), vec!["user".into()]);
        assert!(path.is_local_to(&n1));
        assert!(!path.is_local_to(&n2));
    }
}
