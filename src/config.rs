use std::path::PathBuf;

/// Environment variable naming the data file when no argument is given.
pub const DATA_ENV: &str = "TRACER_DATA";

/// Startup settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// File to load at startup; the user can still open another one.
    pub data_path: Option<PathBuf>,
}

impl Settings {
    /// Resolve from the process arguments and environment.
    pub fn from_env() -> Self {
        Self::resolve(std::env::args().skip(1), std::env::var_os(DATA_ENV).map(PathBuf::from))
    }

    /// First positional argument wins over the environment variable.
    pub fn resolve(mut args: impl Iterator<Item = String>, env_path: Option<PathBuf>) -> Self {
        let data_path = args
            .next()
            .filter(|a| !a.is_empty())
            .map(PathBuf::from)
            .or(env_path);
        Settings { data_path }
    }
}
