use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use log::debug;

use super::geometry::Circle;
use super::types::{ConnectionUpdate, SummitData, SummitGeometry, SummitId};

/// A graph node as last reported by the stream.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summit {
	pub id: SummitId,
	pub title: String,
	pub description: String,
	pub x: Option<f64>,
	pub y: Option<f64>,
	pub r: Option<f64>,
	/// Ids this summit points at.
	pub outgoing: BTreeSet<SummitId>,
	/// Ids pointing at this summit.
	pub incoming: BTreeSet<SummitId>,
}

impl Summit {
	fn new(id: &str) -> Self {
		Self {
			id: id.to_owned(),
			..Default::default()
		}
	}

	/// Current circle, once a geometry update has arrived.
	pub fn circle(&self) -> Option<Circle> {
		Some(Circle::new(self.x?, self.y?, self.r?))
	}
}

/// Which geometry fields an update actually changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeometryChange {
	pub x: bool,
	pub y: bool,
	pub r: bool,
}

impl GeometryChange {
	pub fn any(self) -> bool {
		self.x || self.y || self.r
	}
}

fn update_field(field: &mut Option<f64>, value: f64) -> bool {
	if *field == Some(value) {
		return false;
	}
	*field = Some(value);
	true
}

/// Ordered (from, to) pair identifying a connection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionKey {
	pub from: SummitId,
	pub to: SummitId,
}

impl ConnectionKey {
	pub fn new(from: &str, to: &str) -> Self {
		Self {
			from: from.to_owned(),
			to: to.to_owned(),
		}
	}
}

/// A directed, weighted edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
	pub from: SummitId,
	pub to: SummitId,
	pub value: f64,
}

impl Connection {
	pub fn key(&self) -> ConnectionKey {
		ConnectionKey::new(&self.from, &self.to)
	}
}

/// Owns every summit and every connection.
///
/// Connections live in a single table; summits only keep the ids of their
/// neighbours, so both traversal directions resolve to the same entry.
#[derive(Debug, Default)]
pub struct SummitStore {
	summits: HashMap<SummitId, Summit>,
	connections: HashMap<ConnectionKey, Connection>,
}

impl SummitStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the summit for `id`, creating an empty one on first sight.
	/// The flag is true when the summit was just created.
	pub fn get_or_create(&mut self, id: &str) -> (&mut Summit, bool) {
		match self.summits.entry(id.to_owned()) {
			Entry::Occupied(entry) => (entry.into_mut(), false),
			Entry::Vacant(entry) => (entry.insert(Summit::new(id)), true),
		}
	}

	pub fn summit(&self, id: &str) -> Option<&Summit> {
		self.summits.get(id)
	}

	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.summits.len()
	}

	#[cfg(test)]
	pub fn is_empty(&self) -> bool {
		self.summits.is_empty()
	}

	/// Stores the description and title; true when the title changed.
	pub fn apply_data(&mut self, id: &str, data: &SummitData) -> bool {
		let (summit, _) = self.get_or_create(id);
		summit.description.clone_from(&data.description);
		if summit.title == data.title {
			return false;
		}
		summit.title.clone_from(&data.title);
		true
	}

	pub fn apply_geometry(&mut self, id: &str, geometry: &SummitGeometry) -> GeometryChange {
		let (summit, _) = self.get_or_create(id);
		GeometryChange {
			x: update_field(&mut summit.x, geometry.x),
			y: update_field(&mut summit.y, geometry.y),
			r: update_field(&mut summit.r, geometry.r),
		}
	}

	/// Inserts or updates a connection. Returns it only when it is new or its
	/// weight changed. Connections naming an unknown summit are dropped.
	pub fn apply_connection(&mut self, update: &ConnectionUpdate) -> Option<&Connection> {
		if !self.summits.contains_key(&update.from) || !self.summits.contains_key(&update.to) {
			debug!(
				"dropping connection {} -> {}: unknown endpoint",
				update.from, update.to
			);
			return None;
		}

		let key = ConnectionKey::new(&update.from, &update.to);
		let changed = match self.connections.get_mut(&key) {
			Some(existing) if existing.value == update.value => false,
			Some(existing) => {
				existing.value = update.value;
				true
			}
			None => {
				if let Some(from) = self.summits.get_mut(&update.from) {
					from.outgoing.insert(update.to.clone());
				}
				if let Some(to) = self.summits.get_mut(&update.to) {
					to.incoming.insert(update.from.clone());
				}
				self.connections.insert(
					key.clone(),
					Connection {
						from: update.from.clone(),
						to: update.to.clone(),
						value: update.value,
					},
				);
				true
			}
		};

		if changed {
			self.connections.get(&key)
		} else {
			None
		}
	}

	pub fn connection(&self, from: &str, to: &str) -> Option<&Connection> {
		self.connections.get(&ConnectionKey::new(from, to))
	}

	#[cfg(test)]
	pub fn connection_count(&self) -> usize {
		self.connections.len()
	}

	/// Connections leaving `id`, via its outgoing index.
	pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
		let summit = self.summits.get(id);
		summit
			.into_iter()
			.flat_map(|s| s.outgoing.iter().map(move |to| (s.id.as_str(), to.as_str())))
			.filter_map(|(from, to)| self.connection(from, to))
	}

	/// Connections arriving at `id`, via its incoming index.
	pub fn incoming<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
		let summit = self.summits.get(id);
		summit
			.into_iter()
			.flat_map(|s| s.incoming.iter().map(move |from| (from.as_str(), s.id.as_str())))
			.filter_map(|(from, to)| self.connection(from, to))
	}

	/// Every connection touching `id`; a self-loop is yielded once.
	pub fn incident<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
		self.outgoing(id)
			.chain(self.incoming(id).filter(move |c| c.from != id))
	}
}
