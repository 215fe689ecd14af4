use std::collections::BTreeSet;

use log::debug;

use super::error::Result;
use super::render::RenderBinding;
use super::state::{ConnectionKey, GeometryChange, SummitStore};
use super::surface::Surface;
use super::types::{SummitConnections, SummitId, SummitRoles, SummitUpdate};

/// What a single update ended up touching.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
	pub created: bool,
	pub title_changed: bool,
	pub geometry: GeometryChange,
	pub connections_changed: usize,
	pub ribbons_redrawn: usize,
}

/// Applies summit updates to the store and mirrors real changes onto the
/// render binding.
///
/// The store is updated even when a surface call fails. Whatever could not be
/// drawn is remembered and drawn again on the next update, since repeating
/// the same message no longer reports a change.
pub struct GraphDispatcher<S: Surface> {
	store: SummitStore,
	binding: RenderBinding<S>,
	stale_summits: BTreeSet<SummitId>,
	stale_ribbons: BTreeSet<ConnectionKey>,
}

impl<S: Surface> GraphDispatcher<S> {
	pub fn new(binding: RenderBinding<S>) -> Self {
		Self {
			store: SummitStore::new(),
			binding,
			stale_summits: BTreeSet::new(),
			stale_ribbons: BTreeSet::new(),
		}
	}

	#[cfg(test)]
	pub fn store(&self) -> &SummitStore {
		&self.store
	}

	#[cfg(test)]
	pub fn binding(&self) -> &RenderBinding<S> {
		&self.binding
	}

	/// Decodes one raw message and applies it.
	pub fn handle_message(&mut self, raw: &str) -> Result<UpdateReport> {
		let update: SummitUpdate = serde_json::from_str(raw)?;
		self.apply(&update)
	}

	/// Applies data, geometry, roles and connections in that order, then
	/// redraws each dirty ribbon once. Returns the first surface error after
	/// every step has run.
	pub fn apply(&mut self, update: &SummitUpdate) -> Result<UpdateReport> {
		let id = update.id.as_str();
		let mut report = UpdateReport::default();
		let mut failure = None;
		let mut dirty = BTreeSet::new();
		let stale = self.stale_summits.remove(id);

		report.created = self.store.get_or_create(id).1;

		if let Some(data) = &update.data {
			report.title_changed = self.store.apply_data(id, data);
		}

		report.geometry = self.store.apply_geometry(id, &update.geometry);
		let moved = report.geometry.any() || stale;
		if moved {
			dirty.extend(self.store.incident(id).map(|c| c.key()));
		}

		if report.created || report.title_changed || moved {
			if let Err(err) = self.draw_summit(id, report.title_changed || stale, moved) {
				self.stale_summits.insert(id.to_owned());
				failure.get_or_insert(err);
			}
		}

		if let Some(roles) = &update.roles {
			self.apply_roles(id, roles);
		}

		if let Some(connections) = &update.connections {
			report.connections_changed = self.apply_connections(connections, &mut dirty);
		}

		dirty.append(&mut self.stale_ribbons);
		for key in dirty {
			match self.redraw_ribbon(&key) {
				Ok(true) => report.ribbons_redrawn += 1,
				Ok(false) => {}
				Err(err) => {
					self.stale_ribbons.insert(key);
					failure.get_or_insert(err);
				}
			}
		}

		debug!(
			"applied update for {id}: created={} title={} geometry={:?} connections={} ribbons={}",
			report.created,
			report.title_changed,
			report.geometry,
			report.connections_changed,
			report.ribbons_redrawn
		);
		match failure {
			Some(err) => Err(err),
			None => Ok(report),
		}
	}

	fn draw_summit(&mut self, id: &str, title: bool, moved: bool) -> Result<()> {
		let Some(summit) = self.store.summit(id) else {
			return Ok(());
		};
		self.binding.bind_summit(id)?;
		if title {
			self.binding.set_title(id, &summit.title)?;
		}
		if moved {
			self.binding.redraw_summit(summit)?;
		}
		Ok(())
	}

	fn apply_roles(&self, id: &str, roles: &SummitRoles) {
		for role in &roles.roles {
			debug!("ignoring role {} ({}) for {id}", role.name, role.identity);
		}
	}

	fn apply_connections(
		&mut self,
		connections: &SummitConnections,
		dirty: &mut BTreeSet<ConnectionKey>,
	) -> usize {
		let mut changed = 0;
		for entry in connections.entries() {
			if let Some(connection) = self.store.apply_connection(entry) {
				dirty.insert(connection.key());
				changed += 1;
			}
		}
		changed
	}

	fn redraw_ribbon(&mut self, key: &ConnectionKey) -> Result<bool> {
		let store = &self.store;
		let (Some(connection), Some(from), Some(to)) = (
			store.connection(&key.from, &key.to),
			store.summit(&key.from),
			store.summit(&key.to),
		) else {
			return Ok(false);
		};
		Ok(self.binding.redraw_connection(from, to, connection)?)
	}
}
