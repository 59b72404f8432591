// SPDX-License-Identifier: MIT OR Apache-2.0
//! Simulation event stream payloads.
//!
//! The backend emits one JSON object per event. Kinds the editor does
//! not recognize are preserved as [`EventKind::Other`] rather than
//! dropped, so a newer backend never breaks an older editor.

use serde::{Deserialize, Serialize};

/// Well-known simulation event kinds, with a passthrough for the rest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    /// A host handed data to its network stack
    DataSent,
    /// A host delivered data to the application layer
    DataReceived,
    /// A packet left a node
    PacketTransmitted,
    /// A packet arrived at a node
    PacketReceived,
    /// A QKD key exchange started
    QkdInitiated,
    /// An adapter delivered classical data across the boundary
    ClassicalDataReceived,
    /// Any kind this editor does not know about
    Other(String),
}

impl EventKind {
    /// Wire name for this kind
    pub fn as_str(&self) -> &str {
        match self {
            Self::DataSent => "data_sent",
            Self::DataReceived => "data_received",
            Self::PacketTransmitted => "packet_transmitted",
            Self::PacketReceived => "packet_received",
            Self::QkdInitiated => "qkd_initiated",
            Self::ClassicalDataReceived => "classical_data_received",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for EventKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "data_sent" => Self::DataSent,
            "data_received" => Self::DataReceived,
            "packet_transmitted" => Self::PacketTransmitted,
            "packet_received" => Self::PacketReceived,
            "qkd_initiated" => Self::QkdInitiated,
            "classical_data_received" => Self::ClassicalDataReceived,
            _ => Self::Other(name),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_owned()
    }
}

/// One event from a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// What happened
    pub event_type: EventKind,
    /// Node the event occurred at
    pub node: String,
    /// Simulation time, in seconds
    pub timestamp: f64,
    /// Kind-specific payload fields
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_kind_round_trip() {
        let kind: EventKind = "qkd_initiated".to_owned().into();
        assert_eq!(kind, EventKind::QkdInitiated);
        assert_eq!(String::from(kind), "qkd_initiated");
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let text = r#"{"event_type":"entanglement_swap","node":"QR1","timestamp":1.5}"#;
        let event: SimulationEvent = serde_json::from_str(text).unwrap();
        assert_eq!(event.event_type, EventKind::Other("entanglement_swap".into()));
        assert!(event.data.is_empty());

        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["event_type"], "entanglement_swap");
    }
}
