pub mod load;
pub mod types;

pub use load::{default_config_path, load, reset, save};
pub use types::{AutoAcceptConfig, HookMode};
