use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, Event, HtmlDivElement, MessageEvent, WebSocket};

use super::dispatch::GraphDispatcher;
use super::error::{StartError, SurfaceError};
use super::render::RenderBinding;
use super::surface::{DomSurface, Surface};

/// Endpoint used when no `url` prop is given.
pub const DEFAULT_SOCKET_URL: &str = "ws://localhost:3030/v1";
/// Graph units to pixels.
pub const DEFAULT_SCALE: f64 = 100.0;

type SharedDispatcher = Rc<RefCell<Option<GraphDispatcher<DomSurface>>>>;

/// Open socket plus the callbacks that must outlive it.
struct LiveSocket {
	socket: WebSocket,
	_on_message: Closure<dyn FnMut(MessageEvent)>,
	_on_close: Closure<dyn FnMut(CloseEvent)>,
	_on_error: Closure<dyn FnMut(Event)>,
}

/// Live SVG view of the summit stream at `url`.
#[component]
pub fn SummitGraph(
	#[prop(into, default = DEFAULT_SOCKET_URL.to_string())] url: String,
	#[prop(default = DEFAULT_SCALE)] scale: f64,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let dispatcher: SharedDispatcher = Rc::new(RefCell::new(None));
	let socket: Rc<RefCell<Option<LiveSocket>>> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		let Some(container) = container_ref.get() else {
			return;
		};
		if dispatcher.borrow().is_some() {
			return;
		}

		let mounted = mount(&container, scale).map_err(StartError::from).and_then(|binding| {
			*dispatcher.borrow_mut() = Some(GraphDispatcher::new(binding));
			connect(&url, dispatcher.clone())
		});
		match mounted {
			Ok(live) => {
				info!("summit graph connected to {url}");
				*socket.borrow_mut() = Some(live);
			}
			Err(err) => warn!("summit graph failed to start: {err}"),
		}
	});

	view! {
		<div
			node_ref=container_ref
			class="summit-graph"
			style="width: 100vw; height: 100vh; overflow: hidden;"
		/>
	}
}

/// Builds the `<svg>` root and the centered, scaled graph group inside
/// `container`.
fn mount(container: &HtmlDivElement, scale: f64) -> Result<RenderBinding<DomSurface>, SurfaceError> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| SurfaceError::new("no document to mount into"))?;
	let mut surface = DomSurface::new(document);

	let svg = surface.create_element("svg")?;
	surface.set_attribute(&svg, "style", "width: 100%; height: 100%;")?;
	let graph = surface.create_element("g")?;
	let (tx, ty) = (
		container.client_width() as f64 / 2.0,
		container.client_height() as f64 / 2.0,
	);
	surface.set_attribute(&graph, "transform", &format!("translate({tx} {ty}) scale({scale})"))?;
	surface.append_child(&svg, &graph)?;
	container.append_child(&svg)?;

	RenderBinding::new(surface, &graph)
}

fn connect(url: &str, dispatcher: SharedDispatcher) -> Result<LiveSocket, StartError> {
	let socket = WebSocket::new(url).map_err(|err| StartError::Socket {
		url: url.to_owned(),
		message: SurfaceError::from(err).message,
	})?;

	let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
		let Ok(text) = ev.data().dyn_into::<js_sys::JsString>() else {
			warn!("ignoring non-text frame");
			return;
		};
		let raw = String::from(text);
		debug!("received summit update");
		if let Some(graph) = dispatcher.borrow_mut().as_mut() {
			if let Err(err) = graph.handle_message(&raw) {
				warn!("dropped summit update: {err}");
			}
		}
	});
	socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

	let closed_url = url.to_owned();
	let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |ev: CloseEvent| {
		warn!("socket {closed_url} closed (code {})", ev.code());
	});
	socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

	let on_error = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
		warn!("socket error: {}", ev.type_());
	});
	socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));

	Ok(LiveSocket {
		socket,
		_on_message: on_message,
		_on_close: on_close,
		_on_error: on_error,
	})
}

impl Drop for LiveSocket {
	fn drop(&mut self) {
		self.socket.set_onmessage(None);
		self.socket.set_onclose(None);
		self.socket.set_onerror(None);
		let _ = self.socket.close();
	}
}
