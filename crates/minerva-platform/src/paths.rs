use std::fs;
use std::path::PathBuf;

const APP_NAME: &str = "minerva";

/// Returns the platform-specific configuration directory for Minerva.
///
/// - macOS: `~/Library/Application Support/minerva`
/// - Linux: `$XDG_CONFIG_HOME/minerva` (defaults to `~/.config/minerva`)
/// - Windows: `%APPDATA%\minerva`
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .expect("could not determine config directory")
        .join(APP_NAME)
}

/// Returns the platform-specific data directory for Minerva.
///
/// - macOS: `~/Library/Application Support/minerva`
/// - Linux: `$XDG_DATA_HOME/minerva` (defaults to `~/.local/share/minerva`)
/// - Windows: `%APPDATA%\minerva`
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .expect("could not determine data directory")
        .join(APP_NAME)
}

/// Returns the path to the persisted session record.
///
/// Located at `data_dir()/session.json`.
pub fn session_file() -> PathBuf {
    data_dir().join("session.json")
}

/// Returns the path to the log directory.
///
/// Located at `data_dir()/logs`.
pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Creates all Minerva directories if they do not already exist.
pub fn ensure_dirs() -> Result<(), std::io::Error> {
    fs::create_dir_all(config_dir())?;
    fs::create_dir_all(data_dir())?;
    fs::create_dir_all(log_dir())?;
    Ok(())
}
