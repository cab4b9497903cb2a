/// Address the backend listens on in local development.
const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Build-time configuration. Trunk compiles the app to wasm ahead of time,
/// so the backend address is baked in at build time; set the `API_BASE_URL`
/// environment variable when invoking `trunk build` to point elsewhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the backend API server.
    pub api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Configuration from the build environment, falling back to the local
    /// development default when `API_BASE_URL` is unset or blank.
    pub fn from_env() -> Self {
        Self::from_override(option_env!("API_BASE_URL"))
    }

    fn from_override(base_url: Option<&str>) -> Self {
        match base_url.map(str::trim) {
            Some(url) if !url.is_empty() => Self {
                api_base_url: url.to_string(),
            },
            _ => Self::default(),
        }
    }
}
