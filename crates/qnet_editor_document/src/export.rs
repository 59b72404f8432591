// SPDX-License-Identifier: MIT OR Apache-2.0
//! Export: live graph -> canonical topology document.
//!
//! Grouping is geometric: a node belongs to the zone (and, within it,
//! the network) whose bounding box contains its center. Nodes outside
//! every container are normalized into synthesized default groups so no
//! placed node is ever dropped from the document. Quantum hosts always
//! serialize under a synthesized per-zone quantum network, since the
//! canvas has no quantum-network container kind.
//!
//! In-progress (uncommitted) drag edges live outside the graph model
//! entirely, so an export can never emit a dangling connection.

use crate::model::{
    AdapterDocument, ConnectionDocument, HostDocument, NetworkDocument, WorldDocument,
    ZoneDocument, DEFAULT_BANDWIDTH, DEFAULT_LATENCY, DEFAULT_NOISE_MODEL, NETWORK_ADDRESS_AUTO,
    NETWORK_TYPE_CLASSICAL, NETWORK_TYPE_QUANTUM, ZONE_TYPE_DEFAULT, ZONE_TYPE_SECURE,
};
use indexmap::IndexMap;
use qnet_editor_graph::{Family, Graph, LinkRole, Node, NodeKind};

/// Canvas-to-serialization distance scale: 100 px equals 1 km
pub const PX_PER_KM: f32 = 100.0;

/// Name of the synthesized catch-all zone
const DEFAULT_ZONE: &str = "default_zone";

/// Zone slot: an index into the node-backed zones, or the lazily
/// created default zone.
type Slot = Option<usize>;

struct ZoneBuilder {
    name: String,
    zone_type: String,
    size: [f32; 2],
    position: [f32; 2],
    // Networks keyed by name; IndexMap keeps document order stable.
    networks: IndexMap<String, NetworkDocument>,
    adapters: Vec<AdapterDocument>,
}

impl ZoneBuilder {
    fn contains(&self, point: [f32; 2]) -> bool {
        point[0] >= self.position[0]
            && point[0] <= self.position[0] + self.size[0]
            && point[1] >= self.position[1]
            && point[1] <= self.position[1] + self.size[1]
    }
}

struct WorldBuilder {
    zones: Vec<ZoneBuilder>,
    default_zone: Option<ZoneBuilder>,
    canvas: [f32; 2],
}

impl WorldBuilder {
    fn slot_of(&self, point: [f32; 2]) -> Slot {
        self.zones.iter().position(|z| z.contains(point))
    }

    fn zone_mut(&mut self, slot: Slot) -> &mut ZoneBuilder {
        match slot {
            Some(idx) => &mut self.zones[idx],
            None => self.default_zone.get_or_insert_with(|| ZoneBuilder {
                name: DEFAULT_ZONE.to_owned(),
                zone_type: ZONE_TYPE_DEFAULT.to_owned(),
                size: self.canvas,
                position: [0.0, 0.0],
                networks: IndexMap::new(),
                adapters: Vec::new(),
            }),
        }
    }

    fn zone_label(&self, slot: Slot) -> &str {
        match slot {
            Some(idx) => &self.zones[idx].name,
            None => DEFAULT_ZONE,
        }
    }

    /// Network entry under `slot`, created as a synthesized group when
    /// absent
    fn group_mut(&mut self, slot: Slot, name: &str, network_type: &str) -> &mut NetworkDocument {
        let zone = self.zone_mut(slot);
        let location = zone.position;
        zone.networks
            .entry(name.to_owned())
            .or_insert_with(|| NetworkDocument {
                name: name.to_owned(),
                network_type: network_type.to_owned(),
                address: NETWORK_ADDRESS_AUTO.to_owned(),
                location,
                hosts: Vec::new(),
                connections: Vec::new(),
            })
    }

    fn finish(self, graph: &Graph) -> WorldDocument {
        let mut zones: Vec<ZoneDocument> = self.zones.into_iter().map(finish_zone).collect();
        if let Some(zone) = self.default_zone {
            zones.push(finish_zone(zone));
        }
        WorldDocument {
            name: graph.name.clone(),
            size: self.canvas,
            zones,
        }
    }
}

fn finish_zone(zone: ZoneBuilder) -> ZoneDocument {
    ZoneDocument {
        name: zone.name,
        zone_type: zone.zone_type,
        size: zone.size,
        position: zone.position,
        networks: zone.networks.into_values().collect(),
        adapters: zone.adapters,
    }
}

/// Export the live graph as a topology document.
///
/// `canvas` is the canvas size recorded at the document root.
/// Connection lengths are derived from endpoint centers at export time,
/// so they reflect node movement since commit.
pub fn export(graph: &Graph, canvas: [f32; 2]) -> WorldDocument {
    let mut world = WorldBuilder {
        zones: graph
            .nodes()
            .filter(|n| n.kind == NodeKind::Zone)
            .map(|n| ZoneBuilder {
                name: n.name.clone(),
                zone_type: ZONE_TYPE_SECURE.to_owned(),
                size: n.size,
                position: n.position,
                networks: IndexMap::new(),
                adapters: Vec::new(),
            })
            .collect(),
        default_zone: None,
        canvas,
    };

    // Node-backed classical networks, placed into their containing zone.
    let mut network_slot: IndexMap<String, Slot> = IndexMap::new();
    for node in graph.nodes().filter(|n| n.kind == NodeKind::ClassicalNetwork) {
        let slot = world.slot_of(node.center());
        let zone = world.zone_mut(slot);
        zone.networks.insert(
            node.name.clone(),
            NetworkDocument {
                name: node.name.clone(),
                network_type: NETWORK_TYPE_CLASSICAL.to_owned(),
                address: String::new(),
                location: node.position,
                hosts: Vec::new(),
                connections: Vec::new(),
            },
        );
        network_slot.insert(node.name.clone(), slot);
    }

    // Endpoint name -> (zone slot, network name), filled while placing
    // hosts and read back for connections and adapter peer networks.
    let mut host_slot: IndexMap<String, (Slot, String)> = IndexMap::new();
    let mut adapter_nodes: Vec<(Node, Slot)> = Vec::new();

    for node in graph.nodes() {
        if node.kind.link_role() == LinkRole::Container {
            continue;
        }
        let own_slot = world.slot_of(node.center());
        if node.kind == NodeKind::QuantumAdapter {
            adapter_nodes.push((node.clone(), own_slot));
            continue;
        }

        let (slot, net_name, net_type) = if node.family() == Family::Quantum {
            let name = format!("{}-quantum", world.zone_label(own_slot));
            (own_slot, name, NETWORK_TYPE_QUANTUM)
        } else {
            // Containing node-backed network wins; its entry lives in
            // the network's own zone.
            let containing = graph
                .nodes()
                .filter(|n| n.kind == NodeKind::ClassicalNetwork)
                .find(|n| n.contains(node.center()));
            match containing {
                Some(net) => {
                    let slot = network_slot.get(&net.name).copied().unwrap_or(own_slot);
                    (slot, net.name.clone(), NETWORK_TYPE_CLASSICAL)
                }
                None => {
                    let name = format!("{}-classical", world.zone_label(own_slot));
                    (own_slot, name, NETWORK_TYPE_CLASSICAL)
                }
            }
        };
        world.group_mut(slot, &net_name, net_type).hosts.push(HostDocument {
            name: node.name.clone(),
            host_type: node.kind.as_str().to_owned(),
            address: String::new(),
            location: node.position,
        });
        host_slot.insert(node.name.clone(), (slot, net_name));
    }

    // Committed connections, attached to the originating endpoint's
    // network (falling back to the target's for adapter-anchored links).
    for conn in graph.connections() {
        let (Some(from), Some(to)) = (graph.node(conn.from), graph.node(conn.to)) else {
            continue;
        };
        let Some((slot, net_name)) = host_slot
            .get(&from.name)
            .or_else(|| host_slot.get(&to.name))
            .cloned()
        else {
            tracing::warn!(from = %from.name, to = %to.name, "connection without a network group; skipped");
            continue;
        };
        let [fx, fy] = from.center();
        let [tx, ty] = to.center();
        let length = ((tx - fx).powi(2) + (ty - fy).powi(2)).sqrt() / PX_PER_KM;
        world
            .group_mut(slot, &net_name, NETWORK_TYPE_CLASSICAL)
            .connections
            .push(ConnectionDocument {
                from_node: from.name.clone(),
                to_node: to.name.clone(),
                bandwidth: DEFAULT_BANDWIDTH,
                latency: DEFAULT_LATENCY,
                length,
                loss_per_km: conn.loss_per_km,
                noise_model: DEFAULT_NOISE_MODEL.to_owned(),
                name: format!("{}-{}", from.name, to.name),
            });
    }

    // Adapter entries carry their bound peers and the peers' networks.
    for (node, slot) in adapter_nodes {
        let peer = |family: Family| {
            graph
                .adapter_peer(node.id, family)
                .map(|n| n.name.clone())
                .unwrap_or_default()
        };
        let peer_network = |name: &str| {
            host_slot
                .get(name)
                .map(|(_, net)| net.clone())
                .unwrap_or_default()
        };
        let quantum_host = peer(Family::Quantum);
        let classical_host = peer(Family::Classical);
        let entry = AdapterDocument {
            name: node.name.clone(),
            adapter_type: node.kind.as_str().to_owned(),
            address: String::new(),
            location: node.position,
            quantum_network: peer_network(&quantum_host),
            classical_network: peer_network(&classical_host),
            quantum_host,
            classical_host,
        };
        world.zone_mut(slot).adapters.push(entry);
    }

    tracing::debug!(
        nodes = graph.node_count(),
        connections = graph.connection_count(),
        "topology exported"
    );
    world.finish(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qnet_editor_graph::NodeKind;

    #[test]
    fn test_adapter_entry_records_both_peers() {
        let mut graph = Graph::new("lab");
        let qa = graph.add_node_named("QA1", NodeKind::QuantumAdapter, [300.0, 300.0]).unwrap();
        let qh = graph.add_node_named("QH1", NodeKind::QuantumHost, [0.0, 300.0]).unwrap();
        let ch = graph.add_node_named("CH1", NodeKind::ClassicalHost, [600.0, 300.0]).unwrap();
        graph.add_connection(qa, qh).unwrap();
        graph.add_connection(qa, ch).unwrap();

        let world = export(&graph, [1920.0, 1080.0]);
        let adapters: Vec<_> = world.zones.iter().flat_map(|z| z.adapters.iter()).collect();
        assert_eq!(adapters.len(), 1);
        assert_eq!(adapters[0].quantum_host, "QH1");
        assert_eq!(adapters[0].classical_host, "CH1");
        assert!(!adapters[0].quantum_network.is_empty());
        assert!(!adapters[0].classical_network.is_empty());
    }

    #[test]
    fn test_length_reflects_positions_at_export_time() {
        let mut graph = Graph::new("lab");
        let a = graph.add_node_named("CH1", NodeKind::ClassicalHost, [0.0, 0.0]).unwrap();
        let b = graph.add_node_named("CH2", NodeKind::ClassicalHost, [300.0, 0.0]).unwrap();
        graph.add_connection(a, b).unwrap();

        let before = export(&graph, [1000.0, 1000.0]);
        graph.move_node(b, [600.0, 0.0]).unwrap();
        let after = export(&graph, [1000.0, 1000.0]);

        let length = |world: &WorldDocument| world.connections().next().unwrap().length;
        assert!((length(&before) - 3.0).abs() < 1e-4);
        assert!((length(&after) - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_containment_grouping() {
        let mut graph = Graph::new("lab");
        let zone = graph.add_node_named("Z1", NodeKind::Zone, [0.0, 0.0]).unwrap();
        graph.resize_node(zone, [1000.0, 1000.0]).unwrap();
        let net = graph.add_node_named("N1", NodeKind::ClassicalNetwork, [100.0, 100.0]).unwrap();
        graph.resize_node(net, [400.0, 400.0]).unwrap();
        graph.add_node_named("CH1", NodeKind::ClassicalHost, [200.0, 200.0]).unwrap();
        // Outside the zone entirely.
        graph.add_node_named("CH2", NodeKind::ClassicalHost, [1500.0, 1500.0]).unwrap();

        let world = export(&graph, [2000.0, 2000.0]);
        assert_eq!(world.size, [2000.0, 2000.0]);
        assert_eq!(world.zones.len(), 2);
        assert_eq!(world.zones[0].name, "Z1");
        assert_eq!(world.zones[0].networks[0].name, "N1");
        assert_eq!(world.zones[0].networks[0].hosts[0].name, "CH1");
        assert_eq!(world.zones[1].zone_type, ZONE_TYPE_DEFAULT);
        let orphan_net = &world.zones[1].networks[0];
        assert_eq!(orphan_net.address, NETWORK_ADDRESS_AUTO);
        assert_eq!(orphan_net.hosts[0].name, "CH2");
    }

    #[test]
    fn test_export_resolves_renamed_endpoints() {
        let mut graph = Graph::new("lab");
        let a = graph.add_node_named("CH1", NodeKind::ClassicalHost, [0.0, 0.0]).unwrap();
        let b = graph.add_node_named("CH2", NodeKind::ClassicalHost, [300.0, 0.0]).unwrap();
        graph.add_connection(a, b).unwrap();
        graph.rename_node(a, "edge-host").unwrap();

        let world = export(&graph, [1000.0, 1000.0]);
        let conn = world.connections().next().unwrap();
        assert_eq!(conn.from_node, "edge-host");
        assert_eq!(conn.name, "edge-host-CH2");
    }

    #[test]
    fn test_quantum_hosts_grouped_per_zone() {
        let mut graph = Graph::new("lab");
        let zone = graph.add_node_named("Z1", NodeKind::Zone, [0.0, 0.0]).unwrap();
        graph.resize_node(zone, [1000.0, 1000.0]).unwrap();
        let q1 = graph.add_node_named("QH1", NodeKind::QuantumHost, [100.0, 100.0]).unwrap();
        let q2 = graph.add_node_named("QH2", NodeKind::QuantumHost, [400.0, 100.0]).unwrap();
        graph.add_connection(q1, q2).unwrap();

        let world = export(&graph, [2000.0, 2000.0]);
        assert_eq!(world.zones.len(), 1);
        let net = &world.zones[0].networks[0];
        assert_eq!(net.network_type, NETWORK_TYPE_QUANTUM);
        assert_eq!(net.hosts.len(), 2);
        assert_eq!(net.connections.len(), 1);
    }
}
