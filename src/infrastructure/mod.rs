//! Platform paths for configuration and trace data.

pub mod paths;

pub use paths::{config_dir, config_path, data_dir, expand_tilde, CONFIG_FILE_NAME};
