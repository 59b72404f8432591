// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions and the kind/family/link-role lookup tables.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// The kind of a placed network element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Classical internet exchange
    InternetExchange,
    /// Classical end host
    ClassicalHost,
    /// Classical router
    ClassicalRouter,
    /// Classical network container
    ClassicalNetwork,
    /// Classical-to-quantum converter
    C2qConverter,
    /// Quantum-to-classical converter
    Q2cConverter,
    /// Quantum end host
    QuantumHost,
    /// Quantum repeater
    QuantumRepeater,
    /// Quantum adapter bridging one classical and one quantum peer
    QuantumAdapter,
    /// Security zone container
    Zone,
}

/// Compatibility class of a node kind, governing which pairs may be
/// linked directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// Classical networking element
    Classical,
    /// Quantum networking element
    Quantum,
    /// Element that straddles both families (adapters, converters, containers)
    Hybrid,
}

/// How a node kind participates in link construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRole {
    /// Ordinary endpoint; links to same-family elementary kinds
    Elementary,
    /// Cross-family bridge; links to one elementary node of each family
    Bridge {
        /// Whether the bridge records its neighbors as bound side peers
        binds_peers: bool,
    },
    /// Container (zone, network); never a link endpoint
    Container,
}

impl NodeKind {
    /// All node kinds, in serialization order
    pub fn all() -> &'static [NodeKind] {
        &[
            NodeKind::InternetExchange,
            NodeKind::ClassicalHost,
            NodeKind::ClassicalRouter,
            NodeKind::ClassicalNetwork,
            NodeKind::C2qConverter,
            NodeKind::Q2cConverter,
            NodeKind::QuantumHost,
            NodeKind::QuantumRepeater,
            NodeKind::QuantumAdapter,
            NodeKind::Zone,
        ]
    }

    /// Family this kind belongs to
    pub fn family(self) -> Family {
        match self {
            NodeKind::InternetExchange
            | NodeKind::ClassicalHost
            | NodeKind::ClassicalRouter
            | NodeKind::ClassicalNetwork => Family::Classical,
            NodeKind::QuantumHost | NodeKind::QuantumRepeater => Family::Quantum,
            NodeKind::C2qConverter
            | NodeKind::Q2cConverter
            | NodeKind::QuantumAdapter
            | NodeKind::Zone => Family::Hybrid,
        }
    }

    /// Link-construction role of this kind
    pub fn link_role(self) -> LinkRole {
        match self {
            NodeKind::InternetExchange
            | NodeKind::ClassicalHost
            | NodeKind::ClassicalRouter
            | NodeKind::QuantumHost
            | NodeKind::QuantumRepeater => LinkRole::Elementary,
            NodeKind::QuantumAdapter => LinkRole::Bridge { binds_peers: true },
            NodeKind::C2qConverter | NodeKind::Q2cConverter => {
                LinkRole::Bridge { binds_peers: false }
            }
            NodeKind::ClassicalNetwork | NodeKind::Zone => LinkRole::Container,
        }
    }

    /// Default-name prefix for this kind
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::InternetExchange => "InternetExchange",
            NodeKind::ClassicalHost => "ClassicalHost",
            NodeKind::ClassicalRouter => "ClassicalRouter",
            NodeKind::ClassicalNetwork => "ClassicalNetwork",
            NodeKind::C2qConverter => "C2QConverter",
            NodeKind::Q2cConverter => "Q2CConverter",
            NodeKind::QuantumHost => "QuantumHost",
            NodeKind::QuantumRepeater => "QuantumRepeater",
            NodeKind::QuantumAdapter => "QuantumAdapter",
            NodeKind::Zone => "Zone",
        }
    }

    /// Wire name of this kind (matches the topology document `type` field)
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::InternetExchange => "internet_exchange",
            NodeKind::ClassicalHost => "classical_host",
            NodeKind::ClassicalRouter => "classical_router",
            NodeKind::ClassicalNetwork => "classical_network",
            NodeKind::C2qConverter => "c2q_converter",
            NodeKind::Q2cConverter => "q2c_converter",
            NodeKind::QuantumHost => "quantum_host",
            NodeKind::QuantumRepeater => "quantum_repeater",
            NodeKind::QuantumAdapter => "quantum_adapter",
            NodeKind::Zone => "zone",
        }
    }

    /// Parse a topology document `type` string
    pub fn parse(s: &str) -> Option<NodeKind> {
        NodeKind::all().iter().copied().find(|k| k.as_str() == s)
    }

    /// Whether this kind is an ordinary (non-bridge, non-container) endpoint
    pub fn is_elementary(self) -> bool {
        self.link_role() == LinkRole::Elementary
    }

    /// Default bounding size for newly placed nodes of this kind
    pub fn default_size(self) -> [f32; 2] {
        match self {
            NodeKind::Zone => [400.0, 300.0],
            NodeKind::ClassicalNetwork => [240.0, 180.0],
            _ => [64.0, 64.0],
        }
    }

    /// Check if a direct link between two kinds is permitted.
    ///
    /// Elementary kinds link within their own family; bridges (adapters
    /// and converters) link to one elementary node of either family but
    /// never to another bridge; containers are never endpoints.
    pub fn can_link_to(self, other: NodeKind) -> bool {
        match (self.link_role(), other.link_role()) {
            (LinkRole::Container, _) | (_, LinkRole::Container) => false,
            (LinkRole::Bridge { .. }, LinkRole::Bridge { .. }) => false,
            (LinkRole::Bridge { .. }, LinkRole::Elementary)
            | (LinkRole::Elementary, LinkRole::Bridge { .. }) => true,
            (LinkRole::Elementary, LinkRole::Elementary) => self.family() == other.family(),
        }
    }
}

/// A placed network element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Globally unique display name
    pub name: String,
    /// Node kind
    pub kind: NodeKind,
    /// Top-left position on the canvas
    pub position: [f32; 2],
    /// Bounding size
    pub size: [f32; 2],
}

impl Node {
    /// Create a new node with the kind's default size
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            kind,
            position: [0.0, 0.0],
            size: kind.default_size(),
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Set the bounding size
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = [width, height];
        self
    }

    /// Family of this node's kind
    pub fn family(&self) -> Family {
        self.kind.family()
    }

    /// Center of the node's bounding box
    pub fn center(&self) -> [f32; 2] {
        [
            self.position[0] + self.size[0] / 2.0,
            self.position[1] + self.size[1] / 2.0,
        ]
    }

    /// Whether a point lies inside the node's bounding box
    pub fn contains(&self, point: [f32; 2]) -> bool {
        point[0] >= self.position[0]
            && point[0] <= self.position[0] + self.size[0]
            && point[1] >= self.position[1]
            && point[1] <= self.position[1] + self.size[1]
    }
}
