//! Ribbon geometry between two circles.
//!
//! All points are first computed on the unit circle in a local frame whose
//! x-axis runs along the connecting line, then scaled and translated into
//! world space per endpoint.

use std::fmt::Write;
use std::ops::{Add, Mul, Neg, Sub};

/// sin(60°): distance of the anchor points from the connecting axis.
const SIDE: f64 = 0.866_025_403_784_438_6;

/// Point or direction in graph space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
	pub x: f64,
	pub y: f64,
}

impl Vec2 {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn length(self) -> f64 {
		self.x.hypot(self.y)
	}

	/// Unit vector in the same direction, or `None` for a zero or
	/// non-finite vector.
	pub fn normalize(self) -> Option<Self> {
		let len = self.length();
		if !len.is_finite() || len <= f64::EPSILON {
			return None;
		}
		Some(Self::new(self.x / len, self.y / len))
	}

	/// Counter-clockwise quarter turn.
	pub fn rot90(self) -> Self {
		Self::new(-self.y, self.x)
	}

	/// Clockwise quarter turn.
	pub fn rot90_inv(self) -> Self {
		Self::new(self.y, -self.x)
	}
}

impl Add for Vec2 {
	type Output = Self;

	fn add(self, rhs: Self) -> Self {
		Self::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Vec2 {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self {
		Self::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Vec2 {
	type Output = Self;

	fn mul(self, rhs: f64) -> Self {
		Self::new(self.x * rhs, self.y * rhs)
	}
}

impl Neg for Vec2 {
	type Output = Self;

	fn neg(self) -> Self {
		Self::new(-self.x, -self.y)
	}
}

/// A summit outline: center and radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
	pub center: Vec2,
	pub r: f64,
}

impl Circle {
	pub const fn new(x: f64, y: f64, r: f64) -> Self {
		Self {
			center: Vec2::new(x, y),
			r,
		}
	}

	fn to_world(self, p: Vec2) -> Vec2 {
		p * self.r + self.center
	}
}

/// Anchor and control points of one end of a ribbon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RibbonEnd {
	pub s0: Vec2,
	pub s1: Vec2,
	pub tail0: Vec2,
	pub tail1: Vec2,
}

impl RibbonEnd {
	fn map(self, frame: Circle) -> Self {
		Self {
			s0: frame.to_world(self.s0),
			s1: frame.to_world(self.s1),
			tail0: frame.to_world(self.tail0),
			tail1: frame.to_world(self.tail1),
		}
	}
}

impl Neg for RibbonEnd {
	type Output = Self;

	fn neg(self) -> Self {
		Self {
			s0: -self.s0,
			s1: -self.s1,
			tail0: -self.tail0,
			tail1: -self.tail1,
		}
	}
}

/// World-space outline of a connection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ribbon {
	pub origin: Vec2,
	pub anchor: Vec2,
	pub from: RibbonEnd,
	pub to: RibbonEnd,
}

/// Displacement factor applied to the control points for a weight.
pub fn control_offset(value: f64) -> f64 {
	1.0 - value
}

/// Local-frame points on the near side of the unit circle for direction `n`.
fn local_end(n: Vec2, value: f64) -> RibbonEnd {
	let half = n * 0.5;
	let side = n.rot90() * SIDE;
	let (s0, s1) = (half + side, half - side);
	let k = control_offset(value);
	RibbonEnd {
		s0,
		s1,
		tail0: s0 + s0.rot90() * k,
		tail1: s1 + s1.rot90_inv() * k,
	}
}

/// Computes the ribbon from `from` to `to`. Returns `None` when the centers
/// coincide or any input is non-finite.
pub fn ribbon(from: Circle, to: Circle, value: f64) -> Option<Ribbon> {
	if !(from.r.is_finite() && to.r.is_finite() && value.is_finite()) {
		return None;
	}
	let n = (to.center - from.center).normalize()?;
	let local = local_end(n, value);
	let anchor = to.center - n * to.r;

	Some(Ribbon {
		origin: from.center,
		anchor,
		from: local.map(from),
		to: (-local).map(Circle { center: anchor, r: to.r }),
	})
}

impl Ribbon {
	/// SVG path description of the closed ribbon outline.
	pub fn path_data(&self) -> String {
		let (f, t) = (&self.from, &self.to);
		let mut d = String::with_capacity(192);
		let _ = write!(d, "M {} {}", self.origin.x, self.origin.y);
		let _ = write!(d, " L {} {}", f.s1.x, f.s1.y);
		let _ = write!(
			d,
			" C {} {} {} {} {} {}",
			f.tail1.x, f.tail1.y, t.tail0.x, t.tail0.y, t.s0.x, t.s0.y
		);
		let _ = write!(d, " L {} {}", self.anchor.x, self.anchor.y);
		let _ = write!(d, " L {} {}", t.s1.x, t.s1.y);
		let _ = write!(
			d,
			" C {} {} {} {} {} {}",
			t.tail1.x, t.tail1.y, f.tail0.x, f.tail0.y, f.s0.x, f.s0.y
		);
		d.push_str(" Z");
		d
	}
}

pub fn ribbon_path(from: Circle, to: Circle, value: f64) -> Option<String> {
	ribbon(from, to, value).map(|r| r.path_data())
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	const EPS: f64 = 1e-12;

	fn close(a: Vec2, b: Vec2) -> bool {
		(a - b).length() < EPS
	}

	#[test]
	fn horizontal_pair_matches_hand_computed_points() {
		let a = Circle::new(0.0, 0.0, 1.0);
		let b = Circle::new(3.0, 0.0, 1.0);
		let rib = ribbon(a, b, 1.0).expect("distinct centers");
		let h = 0.75_f64.sqrt();

		assert!(close(rib.from.s0, Vec2::new(0.5, h)));
		assert!(close(rib.from.s1, Vec2::new(0.5, -h)));
		assert!(close(rib.anchor, Vec2::new(2.0, 0.0)));
		assert!(close(rib.to.s0, Vec2::new(1.5, -h)));
		assert!(close(rib.to.s1, Vec2::new(1.5, h)));
		assert_eq!(rib.origin, Vec2::new(0.0, 0.0));
	}

	#[test]
	fn full_weight_puts_controls_on_anchors() {
		let rib = ribbon(Circle::new(-2.0, 1.0, 0.5), Circle::new(4.0, -3.0, 2.0), 1.0).unwrap();
		for end in [rib.from, rib.to] {
			assert!(close(end.tail0, end.s0));
			assert!(close(end.tail1, end.s1));
		}
	}

	#[test]
	fn zero_weight_rotates_controls_a_full_radius_away() {
		let rib = ribbon(Circle::new(0.0, 0.0, 1.0), Circle::new(5.0, 0.0, 1.0), 0.0).unwrap();
		let h = 0.75_f64.sqrt();
		// s0 = (0.5, h); rot90(s0) = (-h, 0.5)
		assert!(close(rib.from.tail0, Vec2::new(0.5 - h, h + 0.5)));
		// s1 = (0.5, -h); rot90_inv(s1) = (-h, -0.5)
		assert!(close(rib.from.tail1, Vec2::new(0.5 - h, -h - 0.5)));
	}

	#[test]
	fn radius_scales_the_from_side() {
		let rib = ribbon(Circle::new(1.0, 1.0, 2.0), Circle::new(1.0, 9.0, 1.0), 1.0).unwrap();
		// n = (0, 1), side = (-h, 0)
		let h = 0.75_f64.sqrt();
		assert!(close(rib.from.s0, Vec2::new(1.0 - 2.0 * h, 2.0)));
		assert!(close(rib.anchor, Vec2::new(1.0, 8.0)));
	}

	#[test]
	fn coincident_centers_are_degenerate() {
		let c = Circle::new(2.0, 2.0, 1.0);
		assert!(ribbon(c, c, 0.5).is_none());
		assert!(ribbon_path(c, Circle::new(2.0, 2.0, 3.0), 0.5).is_none());
	}

	#[test]
	fn non_finite_inputs_are_degenerate() {
		let a = Circle::new(0.0, 0.0, 1.0);
		assert!(ribbon(a, Circle::new(f64::NAN, 0.0, 1.0), 0.5).is_none());
		assert!(ribbon(a, Circle::new(1.0, 0.0, f64::INFINITY), 0.5).is_none());
		assert!(ribbon(a, Circle::new(1.0, 0.0, 1.0), f64::NAN).is_none());
	}

	#[test]
	fn path_has_expected_command_sequence() {
		let d = ribbon_path(Circle::new(0.0, 0.0, 1.0), Circle::new(3.0, 0.0, 1.0), 1.0).unwrap();
		let commands: Vec<&str> = d
			.split_whitespace()
			.filter(|tok| tok.chars().all(|c| c.is_ascii_alphabetic()))
			.collect();
		assert_eq!(commands, ["M", "L", "C", "L", "L", "C", "Z"]);
		assert!(d.starts_with("M 0 0 L 0.5 -0.866"));
		assert!(!d.contains("NaN"));
	}

	proptest! {
		#[test]
		fn path_is_deterministic(
			x0 in -100.0f64..100.0, y0 in -100.0f64..100.0, r0 in 0.01f64..10.0,
			x1 in -100.0f64..100.0, y1 in -100.0f64..100.0, r1 in 0.01f64..10.0,
			v in 0.0f64..=1.0,
		) {
			let (a, b) = (Circle::new(x0, y0, r0), Circle::new(x1, y1, r1));
			prop_assert_eq!(ribbon_path(a, b, v), ribbon_path(a, b, v));
		}

		#[test]
		fn control_offset_decreases_with_weight(v in 0.0f64..1.0, dv in 0.001f64..1.0) {
			let w = (v + dv).min(1.0);
			prop_assert!(control_offset(w) < control_offset(v));
			prop_assert!(control_offset(w) >= 0.0);
		}

		#[test]
		fn anchors_sit_on_the_from_circle(
			dx in -50.0f64..50.0, dy in -50.0f64..50.0, r in 0.1f64..5.0, v in 0.0f64..=1.0,
		) {
			prop_assume!(dx.hypot(dy) > 1e-3);
			let from = Circle::new(1.0, -2.0, r);
			let rib = ribbon(from, Circle::new(1.0 + dx, -2.0 + dy, 1.0), v).unwrap();
			for p in [rib.from.s0, rib.from.s1] {
				prop_assert!(((p - from.center).length() - r).abs() < 1e-9);
			}
		}
	}
}
