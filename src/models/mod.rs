mod config;
mod events;
mod rect;

pub use config::*;
pub use events::*;
pub use rect::WindowRect;
