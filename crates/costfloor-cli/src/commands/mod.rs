pub mod calibrate;
pub mod config;
pub mod hash;
pub mod misc;
pub mod verify;

pub use calibrate::handle_calibrate;
pub use config::{handle_config_init, handle_config_show};
pub use hash::handle_hash;
pub use misc::handle_completions;
pub use verify::handle_verify;
