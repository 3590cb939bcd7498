//! Server settings loaded from the environment.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CASE: &str = "case.json";

#[derive(Clone, Debug, PartialEq)]
pub struct ServerSettings {
    /// Case file served and saved by the API (from SPH_INOUT_CASE)
    pub case_path: PathBuf,
    /// Port for HTTP API (from SPH_INOUT_PORT)
    pub port: u16,
    /// Allowed CORS origins (from SPH_INOUT_CORS_ORIGINS, comma-separated).
    /// Any origin is allowed when unset.
    pub cors_origins: Option<Vec<String>>,
}

impl ServerSettings {
    pub fn from_env() -> Self {
        let case_path = std::env::var("SPH_INOUT_CASE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CASE));

        let port = std::env::var("SPH_INOUT_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let cors_origins = std::env::var("SPH_INOUT_CORS_ORIGINS")
            .ok()
            .map(|s| s.split(',').map(|s| s.trim().to_string()).collect());

        Self {
            case_path,
            port,
            cors_origins,
        }
    }

    /// Command line values take precedence over the environment.
    pub fn with_overrides(mut self, case_path: Option<PathBuf>, port: Option<u16>) -> Self {
        if let Some(case_path) = case_path {
            self.case_path = case_path;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            case_path: PathBuf::from(DEFAULT_CASE),
            port: DEFAULT_PORT,
            cors_origins: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_values() {
        let settings = ServerSettings::default().with_overrides(None, Some(8080));
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.case_path, PathBuf::from(DEFAULT_CASE));
    }
}
