mod events;
mod mouse_click;
mod render;
mod state;

// Re-export public types
pub use state::{App, InitialValues};
