//! Client configuration: where the calculation service lives and how the
//! drawing surface is sized.
//!
//! Defaults can be overridden from the environment:
//!
//! | Variable                | Field                  |
//! |-------------------------|------------------------|
//! | `PILECAP_SERVICE_URL`   | `service_url`          |
//! | `PILECAP_TIMEOUT_SECS`  | `request_timeout_secs` |
//! | `PILECAP_CANVAS_WIDTH`  | `canvas_width`         |
//! | `PILECAP_CANVAS_HEIGHT` | `canvas_height`        |

use serde::{Deserialize, Serialize};

use crate::geometry::CanvasSize;

pub const ENV_SERVICE_URL: &str = "PILECAP_SERVICE_URL";
pub const ENV_TIMEOUT_SECS: &str = "PILECAP_TIMEOUT_SECS";
pub const ENV_CANVAS_WIDTH: &str = "PILECAP_CANVAS_WIDTH";
pub const ENV_CANVAS_HEIGHT: &str = "PILECAP_CANVAS_HEIGHT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub service_url: String,
    pub request_timeout_secs: u64,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            service_url: "http://localhost:8002".to_string(),
            request_timeout_secs: 10,
            canvas_width: 600.0,
            canvas_height: 500.0,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`. Values that do not parse are ignored
    /// with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ClientConfig::default();

        if let Some(url) = lookup(ENV_SERVICE_URL) {
            let url = url.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                config.service_url = url.to_string();
            } else {
                tracing::warn!(key = ENV_SERVICE_URL, value = url, "ignoring service URL without http(s) scheme");
            }
        }

        if let Some(secs) = parsed(&lookup, ENV_TIMEOUT_SECS, |v: &u64| *v > 0) {
            config.request_timeout_secs = secs;
        }
        if let Some(w) = parsed(&lookup, ENV_CANVAS_WIDTH, |v: &f64| v.is_finite() && *v > 0.0) {
            config.canvas_width = w;
        }
        if let Some(h) = parsed(&lookup, ENV_CANVAS_HEIGHT, |v: &f64| v.is_finite() && *v > 0.0) {
            config.canvas_height = h;
        }

        config
    }

    pub fn canvas(&self) -> CanvasSize {
        CanvasSize::new(self.canvas_width, self.canvas_height)
    }
}

fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    accept: impl Fn(&T) -> bool,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) if accept(&v) => Some(v),
        _ => {
            tracing::warn!(key, value = %raw, "ignoring invalid configuration value");
            None
        }
    }
}
