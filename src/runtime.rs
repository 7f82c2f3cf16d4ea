mod config;
mod error;
mod events;
mod frame;
mod session;


pub use config::{ConfigError, ViewerConfig};
pub use error::{AppError, Result};
pub use events::{EventQueue, InputEvent};
pub use frame::FrameSnapshot;
pub use session::{SLOT_CAPACITY, Session};
