use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming a configuration file
pub const CONFIG_ENV_VAR: &str = "CHAT_TRANSCRIPT_CONFIG";

/// Locate the configuration file to load, if any
///
/// Lookup order: the explicit path, then `$CHAT_TRANSCRIPT_CONFIG`, then
/// `<config dir>/chat-transcript/config.toml` when that file exists. `None` means the
/// built-in defaults apply.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    config_path_internal(explicit, env::var_os(CONFIG_ENV_VAR).map(PathBuf::from), dirs::config_dir())
}

/// Lookup with the environment inputs passed in (for testing)
pub(crate) fn config_path_internal(
    explicit: Option<&Path>,
    from_env: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(path) = from_env
        && !path.as_os_str().is_empty()
    {
        return Some(path);
    }

    config_dir.map(|dir| dir.join("chat-transcript").join("config.toml")).filter(|path| path.is_file())
}
