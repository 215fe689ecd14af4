//! The scene graph that summits and ribbons are drawn into.

use web_sys::{Document, Element};

use super::error::SurfaceError;

/// Namespace every created element lives in.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Retained-mode drawing target. Handles stay valid for the life of the
/// surface and are mutated in place.
pub trait Surface {
	type Handle: Clone;

	fn create_element(&mut self, tag: &str) -> Result<Self::Handle, SurfaceError>;

	fn set_attribute(
		&mut self,
		handle: &Self::Handle,
		name: &str,
		value: &str,
	) -> Result<(), SurfaceError>;

	/// Replaces the element's text content.
	fn set_text(&mut self, handle: &Self::Handle, text: &str) -> Result<(), SurfaceError>;

	fn append_child(
		&mut self,
		parent: &Self::Handle,
		child: &Self::Handle,
	) -> Result<(), SurfaceError>;

	fn set_attributes(
		&mut self,
		handle: &Self::Handle,
		attributes: &[(&str, &str)],
	) -> Result<(), SurfaceError> {
		for (name, value) in attributes {
			self.set_attribute(handle, name, value)?;
		}
		Ok(())
	}
}

/// SVG elements in the browser DOM.
pub struct DomSurface {
	document: Document,
}

impl DomSurface {
	pub fn new(document: Document) -> Self {
		Self { document }
	}
}

impl Surface for DomSurface {
	type Handle = Element;

	fn create_element(&mut self, tag: &str) -> Result<Element, SurfaceError> {
		Ok(self.document.create_element_ns(Some(SVG_NS), tag)?)
	}

	fn set_attribute(
		&mut self,
		handle: &Element,
		name: &str,
		value: &str,
	) -> Result<(), SurfaceError> {
		Ok(handle.set_attribute(name, value)?)
	}

	fn set_text(&mut self, handle: &Element, text: &str) -> Result<(), SurfaceError> {
		handle.set_text_content(Some(text));
		Ok(())
	}

	fn append_child(&mut self, parent: &Element, child: &Element) -> Result<(), SurfaceError> {
		parent.append_child(child)?;
		Ok(())
	}
}
