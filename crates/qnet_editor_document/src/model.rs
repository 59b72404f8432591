// SPDX-License-Identifier: MIT OR Apache-2.0
//! Serde models for the canonical topology document.
//!
//! Field names and nesting follow the simulation backend's schema:
//! world -> zones -> networks (hosts, connections) and zone-level
//! adapters. Adapter peer fields are camelCase on the wire; everything
//! else is snake_case.

use serde::{Deserialize, Serialize};

/// Zone `type` value for node-backed zones
pub const ZONE_TYPE_SECURE: &str = "SECURE";
/// Zone `type` value for the synthesized catch-all zone; never
/// materialized as a node on import
pub const ZONE_TYPE_DEFAULT: &str = "DEFAULT";
/// Network `address` marker for synthesized (non-node-backed) groups
pub const NETWORK_ADDRESS_AUTO: &str = "auto";
/// Network `type` for classical networks
pub const NETWORK_TYPE_CLASSICAL: &str = "CLASSICAL_NETWORK";
/// Network `type` for quantum networks
pub const NETWORK_TYPE_QUANTUM: &str = "QUANTUM_NETWORK";

/// Serialization-only connection defaults (not used by the live model)
pub const DEFAULT_BANDWIDTH: u32 = 1000;
/// Default link latency, in ms
pub const DEFAULT_LATENCY: u32 = 10;
/// Default noise model label
pub const DEFAULT_NOISE_MODEL: &str = "default";

/// Root document: the entire editable world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldDocument {
    /// World name
    pub name: String,
    /// Canvas size
    pub size: [f32; 2],
    /// Ordered zones
    pub zones: Vec<ZoneDocument>,
}

/// A security zone containing networks and adapters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDocument {
    /// Zone name
    pub name: String,
    /// Zone type (`SECURE`, or `DEFAULT` for the synthesized zone)
    #[serde(rename = "type")]
    pub zone_type: String,
    /// Zone bounding size
    pub size: [f32; 2],
    /// Zone top-left position
    pub position: [f32; 2],
    /// Networks inside this zone
    pub networks: Vec<NetworkDocument>,
    /// Adapters placed in this zone
    pub adapters: Vec<AdapterDocument>,
}

/// A network holding hosts and their connections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDocument {
    /// Network name
    pub name: String,
    /// `CLASSICAL_NETWORK` or `QUANTUM_NETWORK`
    #[serde(rename = "type")]
    pub network_type: String,
    /// Network address (`auto` marks a synthesized group)
    #[serde(default)]
    pub address: String,
    /// Network location
    pub location: [f32; 2],
    /// Hosts inside this network
    pub hosts: Vec<HostDocument>,
    /// Connections attached to this network
    pub connections: Vec<ConnectionDocument>,
}

/// A placed host inside a network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostDocument {
    /// Host name
    pub name: String,
    /// Node kind wire name, e.g. `classical_host`
    #[serde(rename = "type")]
    pub host_type: String,
    /// Host address
    #[serde(default)]
    pub address: String,
    /// Host top-left position
    pub location: [f32; 2],
}

/// A committed link between two named endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDocument {
    /// Originating endpoint name
    #[serde(rename = "from")]
    pub from_node: String,
    /// Target endpoint name
    #[serde(rename = "to")]
    pub to_node: String,
    /// Link bandwidth (serialization-only default)
    pub bandwidth: u32,
    /// Link latency in ms (serialization-only default)
    pub latency: u32,
    /// Geometric length in km, derived at export time
    pub length: f32,
    /// Fiber loss in dB/km
    pub loss_per_km: f32,
    /// Noise model label (serialization-only default)
    pub noise_model: String,
    /// Connection display name
    pub name: String,
}

/// A quantum adapter bridging a classical and a quantum network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterDocument {
    /// Adapter name
    pub name: String,
    /// Node kind wire name (`quantum_adapter`)
    #[serde(rename = "type")]
    pub adapter_type: String,
    /// Adapter address
    #[serde(default)]
    pub address: String,
    /// Adapter top-left position
    pub location: [f32; 2],
    /// Bound quantum-side peer name, empty when unbound
    #[serde(rename = "quantumHost", default)]
    pub quantum_host: String,
    /// Bound classical-side peer name, empty when unbound
    #[serde(rename = "classicalHost", default)]
    pub classical_host: String,
    /// Network containing the classical peer, empty when unresolved
    #[serde(rename = "classicalNetwork", default)]
    pub classical_network: String,
    /// Network containing the quantum peer, empty when unresolved
    #[serde(rename = "quantumNetwork", default)]
    pub quantum_network: String,
}

impl WorldDocument {
    /// Iterate over every host name in the document
    pub fn host_names(&self) -> impl Iterator<Item = &str> {
        self.zones.iter().flat_map(|zone| {
            zone.networks
                .iter()
                .flat_map(|net| net.hosts.iter().map(|h| h.name.as_str()))
                .chain(zone.adapters.iter().map(|a| a.name.as_str()))
        })
    }

    /// Iterate over every connection entry in the document
    pub fn connections(&self) -> impl Iterator<Item = &ConnectionDocument> {
        self.zones
            .iter()
            .flat_map(|zone| zone.networks.iter().flat_map(|net| net.connections.iter()))
    }
}
