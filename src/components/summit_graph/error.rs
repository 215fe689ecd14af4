use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, UpdateError>;

/// A scene-graph call that the rendering surface rejected.
#[derive(Debug, Error)]
#[error("surface error: {message}")]
pub struct SurfaceError {
	pub message: String,
}

impl SurfaceError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

impl From<JsValue> for SurfaceError {
	fn from(value: JsValue) -> Self {
		Self::new(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

/// Why an inbound message could not be applied.
#[derive(Debug, Error)]
pub enum UpdateError {
	#[error("malformed summit update: {0}")]
	Decode(#[from] serde_json::Error),

	#[error(transparent)]
	Surface(#[from] SurfaceError),
}

/// Failure while mounting the view or opening the update socket.
#[derive(Debug, Error)]
pub enum StartError {
	#[error(transparent)]
	Surface(#[from] SurfaceError),

	#[error("could not open socket {url}: {message}")]
	Socket { url: String, message: String },
}
