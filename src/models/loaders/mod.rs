pub mod json_loader;
pub mod toml_loader;

pub use json_loader::{load_json_list, save_json_list};
pub use toml_loader::{load_settings, save_settings};
