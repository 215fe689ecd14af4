use std::collections::HashMap;

use log::debug;

use super::color::{connection_color, summit_color};
use super::error::SurfaceError;
use super::geometry::ribbon_path;
use super::state::{Connection, ConnectionKey, Summit};
use super::surface::Surface;
use super::types::SummitId;

/// Elements kept for one summit. The circle is fixed after creation and
/// only the group and label are touched again.
#[derive(Clone, Debug)]
pub struct SummitHandle<H> {
	pub g: H,
	pub text: H,
}

/// Keeps one persistent handle per summit and per ordered connection.
pub struct RenderBinding<S: Surface> {
	surface: S,
	connection_layer: S::Handle,
	summit_layer: S::Handle,
	summits: HashMap<SummitId, SummitHandle<S::Handle>>,
	connections: HashMap<ConnectionKey, S::Handle>,
}

impl<S: Surface> RenderBinding<S> {
	/// Creates the connection and summit layers under `root`. Connections are
	/// appended first so they render underneath the circles.
	pub fn new(mut surface: S, root: &S::Handle) -> Result<Self, SurfaceError> {
		let connection_layer = surface.create_element("g")?;
		surface.set_attribute(&connection_layer, "class", "connections")?;
		let summit_layer = surface.create_element("g")?;
		surface.set_attribute(&summit_layer, "class", "summits")?;
		surface.append_child(root, &connection_layer)?;
		surface.append_child(root, &summit_layer)?;

		Ok(Self {
			surface,
			connection_layer,
			summit_layer,
			summits: HashMap::new(),
			connections: HashMap::new(),
		})
	}

	#[cfg(test)]
	pub fn surface(&self) -> &S {
		&self.surface
	}

	#[cfg(test)]
	pub fn surface_mut(&mut self) -> &mut S {
		&mut self.surface
	}

	#[cfg(test)]
	pub fn summit_handle(&self, id: &str) -> Option<&SummitHandle<S::Handle>> {
		self.summits.get(id)
	}

	#[cfg(test)]
	pub fn connection_handle(&self, from: &str, to: &str) -> Option<&S::Handle> {
		self.connections.get(&ConnectionKey::new(from, to))
	}

	/// Creates the group, circle and label for `id` unless they exist.
	pub fn bind_summit(&mut self, id: &str) -> Result<&SummitHandle<S::Handle>, SurfaceError> {
		if !self.summits.contains_key(id) {
			let handle = self.create_summit(id)?;
			self.summits.insert(id.to_owned(), handle);
		}
		Ok(&self.summits[id])
	}

	fn create_summit(&mut self, id: &str) -> Result<SummitHandle<S::Handle>, SurfaceError> {
		let fill = summit_color(id);
		let s = &mut self.surface;
		let circle = s.create_element("circle")?;
		s.set_attributes(
			&circle,
			&[
				("cx", "0"),
				("cy", "0"),
				("r", "1"),
				("stroke", "none"),
				("fill", fill.as_str()),
			],
		)?;
		let text = s.create_element("text")?;
		s.set_attributes(
			&text,
			&[
				("x", "0"),
				("y", "0"),
				("class", "summit-title"),
				("text-anchor", "middle"),
				("dominant-baseline", "central"),
			],
		)?;
		let g = s.create_element("g")?;
		s.set_attributes(&g, &[("class", "summit"), ("data-summit", id)])?;
		s.append_child(&g, &circle)?;
		s.append_child(&g, &text)?;
		s.append_child(&self.summit_layer, &g)?;
		debug!("bound summit {id}");

		Ok(SummitHandle { g, text })
	}

	pub fn set_title(&mut self, id: &str, title: &str) -> Result<(), SurfaceError> {
		let text = self.bind_summit(id)?.text.clone();
		self.surface.set_text(&text, title)
	}

	/// Moves and scales the summit group. Returns false while the summit has
	/// no geometry yet.
	pub fn redraw_summit(&mut self, summit: &Summit) -> Result<bool, SurfaceError> {
		let Some(circle) = summit.circle() else {
			return Ok(false);
		};
		let g = self.bind_summit(&summit.id)?.g.clone();
		let transform = format!(
			"translate({} {}) scale({})",
			circle.center.x, circle.center.y, circle.r
		);
		self.surface.set_attribute(&g, "transform", &transform)?;
		Ok(true)
	}

	/// Replaces the ribbon path for `connection`. Nothing is written when
	/// either endpoint lacks geometry or the centers coincide.
	pub fn redraw_connection(
		&mut self,
		from: &Summit,
		to: &Summit,
		connection: &Connection,
	) -> Result<bool, SurfaceError> {
		let path = match (from.circle(), to.circle()) {
			(Some(a), Some(b)) => ribbon_path(a, b, connection.value),
			_ => None,
		};
		let Some(path) = path else {
			debug!(
				"skipping ribbon {} -> {}: no usable geometry",
				connection.from, connection.to
			);
			return Ok(false);
		};

		let handle = self.bind_connection(connection)?;
		self.surface.set_attribute(&handle, "d", &path)?;
		Ok(true)
	}

	fn bind_connection(&mut self, connection: &Connection) -> Result<S::Handle, SurfaceError> {
		let key = connection.key();
		if let Some(handle) = self.connections.get(&key) {
			return Ok(handle.clone());
		}

		let fill = connection_color(&connection.from);
		let path = self.surface.create_element("path")?;
		self.surface.set_attributes(
			&path,
			&[
				("class", "connection"),
				("stroke", "none"),
				("fill", fill.as_str()),
			],
		)?;
		self.surface.append_child(&self.connection_layer, &path)?;
		self.connections.insert(key, path.clone());
		Ok(path)
	}
}

#[cfg(test)]
mod tests {
	use super::super::surface::recording::RecordingSurface;
	use super::*;

	fn binding() -> RenderBinding<RecordingSurface> {
		let mut surface = RecordingSurface::default();
		let root = surface.create_element("g").unwrap();
		RenderBinding::new(surface, &root).unwrap()
	}

	fn placed(id: &str, x: f64, y: f64, r: f64) -> Summit {
		Summit {
			id: id.into(),
			x: Some(x),
			y: Some(y),
			r: Some(r),
			..Default::default()
		}
	}

	fn edge(from: &str, to: &str, value: f64) -> Connection {
		Connection {
			from: from.into(),
			to: to.into(),
			value,
		}
	}

	#[test]
	fn summit_elements_are_created_once() {
		let mut b = binding();
		b.bind_summit("a").unwrap();
		b.bind_summit("a").unwrap();
		b.set_title("a", "Alpha").unwrap();

		let s = b.surface();
		assert_eq!(s.creates("circle"), 1);
		assert_eq!(s.creates("text"), 1);
		let text = b.summit_handle("a").unwrap().text;
		assert_eq!(s.text.get(&text).map(String::as_str), Some("Alpha"));
		let circle = s.tags.iter().position(|t| t == "circle").unwrap();
		assert_eq!(s.attribute(circle, "fill"), Some(summit_color("a").as_str()));
	}

	#[test]
	fn transform_translates_then_scales() {
		let mut b = binding();
		assert!(b.redraw_summit(&placed("a", 3.0, -1.5, 2.0)).unwrap());
		let g = b.summit_handle("a").unwrap().g;
		assert_eq!(b.surface().attribute(g, "transform"), Some("translate(3 -1.5) scale(2)"));
	}

	#[test]
	fn summit_without_geometry_is_not_positioned() {
		let mut b = binding();
		let summit = Summit {
			id: "a".into(),
			..Default::default()
		};
		assert!(!b.redraw_summit(&summit).unwrap());
		assert_eq!(b.surface().attribute_writes("transform"), 0);
	}

	#[test]
	fn ribbon_path_is_reused_across_redraws() {
		let mut b = binding();
		let (a, c) = (placed("a", 0.0, 0.0, 1.0), placed("b", 3.0, 0.0, 1.0));
		assert!(b.redraw_connection(&a, &c, &edge("a", "b", 0.5)).unwrap());
		assert!(b.redraw_connection(&a, &c, &edge("a", "b", 0.9)).unwrap());

		let s = b.surface();
		assert_eq!(s.creates("path"), 1);
		assert_eq!(s.attribute_writes("d"), 2);
		let path = *b.connection_handle("a", "b").unwrap();
		assert_eq!(s.attribute(path, "fill"), Some(connection_color("a").as_str()));
		let expected = ribbon_path(a.circle().unwrap(), c.circle().unwrap(), 0.9).unwrap();
		assert_eq!(s.attribute(path, "d"), Some(expected.as_str()));
	}

	#[test]
	fn degenerate_ribbon_writes_nothing() {
		let mut b = binding();
		let (a, c) = (placed("a", 1.0, 1.0, 1.0), placed("b", 1.0, 1.0, 2.0));
		assert!(!b.redraw_connection(&a, &c, &edge("a", "b", 0.5)).unwrap());
		let unplaced = Summit {
			id: "c".into(),
			..Default::default()
		};
		assert!(!b.redraw_connection(&a, &unplaced, &edge("a", "c", 0.5)).unwrap());
		assert_eq!(b.surface().creates("path"), 0);
		assert_eq!(b.surface().attribute_writes("d"), 0);
	}
}
