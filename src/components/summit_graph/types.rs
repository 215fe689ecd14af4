use std::collections::HashMap;

use serde::Deserialize;

/// Externally assigned summit identity.
pub type SummitId = String;

/// Label text for a summit.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SummitData {
	pub title: String,
	pub description: String,
}

/// Center and radius in graph space.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct SummitGeometry {
	pub x: f64,
	pub y: f64,
	pub r: f64,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Role {
	pub name: String,
	pub identity: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SummitRoles {
	#[serde(default)]
	pub roles: Vec<Role>,
}

/// A directed, weighted edge as it appears on the wire.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ConnectionUpdate {
	pub from: SummitId,
	pub to: SummitId,
	pub value: f64,
}

/// Connections keyed by the summit on the other end. The key is only a hint;
/// each entry names its own endpoints.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SummitConnections {
	#[serde(default)]
	pub to: HashMap<SummitId, ConnectionUpdate>,
	#[serde(default)]
	pub from: HashMap<SummitId, ConnectionUpdate>,
}

impl SummitConnections {
	/// Every entry from both maps, in a stable order.
	pub fn entries(&self) -> Vec<&ConnectionUpdate> {
		let mut to: Vec<_> = self.to.iter().collect();
		let mut from: Vec<_> = self.from.iter().collect();
		to.sort_by(|a, b| a.0.cmp(b.0));
		from.sort_by(|a, b| a.0.cmp(b.0));
		to.into_iter().chain(from).map(|(_, c)| c).collect()
	}
}

/// One inbound message describing a single summit.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SummitUpdate {
	pub id: SummitId,
	#[serde(default)]
	pub data: Option<SummitData>,
	pub geometry: SummitGeometry,
	#[serde(default)]
	pub roles: Option<SummitRoles>,
	#[serde(default)]
	pub connections: Option<SummitConnections>,
}
