pub mod environment;
pub mod paths;

pub use environment::{CONFIG_ENV_VAR, config_path};
pub use paths::{STDIN_PATH, SnapshotFormat, format_path_with_tilde, load_snapshot, validate_file_size};
