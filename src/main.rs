use leptos::mount::mount_to_body;
use summit_graph::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}
