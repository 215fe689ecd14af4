use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const SATURATIONS: [f64; 3] = [0.35, 0.5, 0.65];

pub const SUMMIT_LIGHTNESS: f64 = 0.4;
pub const CONNECTION_LIGHTNESS: f64 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
	pub h: f64,
	pub s: f64,
	pub l: f64,
}

impl Hsl {
	/// Hue and saturation picked from a hash of `id`; lightness is fixed by
	/// the caller so that one identity always maps to one hue.
	pub fn for_identity(id: &str, lightness: f64) -> Self {
		let mut hasher = DefaultHasher::new();
		id.hash(&mut hasher);
		Self::from_hash(hasher.finish(), lightness)
	}

	fn from_hash(hash: u64, lightness: f64) -> Self {
		Self {
			h: (hash % 360) as f64,
			s: SATURATIONS[((hash / 360) % SATURATIONS.len() as u64) as usize],
			l: lightness.clamp(0.0, 1.0),
		}
	}

	pub fn to_rgb(self) -> (u8, u8, u8) {
		let c = (1.0 - (2.0 * self.l - 1.0).abs()) * self.s;
		let hp = self.h / 60.0;
		let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
		let (r, g, b) = match hp as u32 {
			0 => (c, x, 0.0),
			1 => (x, c, 0.0),
			2 => (0.0, c, x),
			3 => (0.0, x, c),
			4 => (x, 0.0, c),
			_ => (c, 0.0, x),
		};
		let m = self.l - c / 2.0;
		let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
		(channel(r), channel(g), channel(b))
	}

	pub fn to_hex(self) -> String {
		let (r, g, b) = self.to_rgb();
		format!("#{r:02x}{g:02x}{b:02x}")
	}
}

/// Fill for a summit's circle.
pub fn summit_color(id: &str) -> String {
	Hsl::for_identity(id, SUMMIT_LIGHTNESS).to_hex()
}

/// Fill for a connection leaving `from_id`: same hue as the summit, lighter.
pub fn connection_color(from_id: &str) -> String {
	Hsl::for_identity(from_id, CONNECTION_LIGHTNESS).to_hex()
}
