//! Opt-in tracing for sylva benchmarks and tools.
//!
//! Nothing is installed unless `SYLVA_LOG` or `RUST_LOG` is set.
//!
//! `SYLVA_LOG` accepts either full `EnvFilter` directives or a bare level.
//! A bare level applies to the sylva crates only and everything else stays
//! at `warn`, so `SYLVA_LOG=trace` shows node cache traffic without drowning
//! it in criterion output. `RUST_LOG` is used verbatim.
//!
//! `SYLVA_LOG_FORMAT` picks the output: `text` (default), `tree` or `json`.
//! All output goes to stderr.
//!
//! ```bash
//! SYLVA_LOG=trace SYLVA_LOG_FORMAT=tree cargo bench -p sylva-syntax
//! ```

use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Crates a bare `SYLVA_LOG` level applies to.
pub const SYLVA_TARGETS: &[&str] = &["sylva_common", "sylva_syntax", "sylva_collections", "sylva_ide"];

/// Level for everything outside [`SYLVA_TARGETS`] when `SYLVA_LOG` is a bare level.
const OTHER_TARGETS_LEVEL: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    /// Indented spans via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON.
    Json,
}

impl LogFormat {
    /// Unknown names fall back to `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// What [`init_tracing`] would install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directives.
    pub directives: String,
}

impl TracingConfig {
    /// Resolve the config from the values of `SYLVA_LOG`, `RUST_LOG` and
    /// `SYLVA_LOG_FORMAT`. `None` when neither log variable is set.
    pub fn from_vars(sylva_log: Option<&str>, rust_log: Option<&str>, format: Option<&str>) -> Option<Self> {
        let directives = match (sylva_log, rust_log) {
            (Some(sylva), _) => sylva_directives(sylva),
            (None, Some(rust)) => rust.to_string(),
            (None, None) => return None,
        };
        Some(TracingConfig {
            format: format.map(LogFormat::parse).unwrap_or_default(),
            directives,
        })
    }

    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok();
        Self::from_vars(
            var("SYLVA_LOG").as_deref(),
            var("RUST_LOG").as_deref(),
            var("SYLVA_LOG_FORMAT").as_deref(),
        )
    }

    fn layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let filter = EnvFilter::builder().parse_lossy(&self.directives);
        match self.format {
            LogFormat::Text => fmt::layer().with_writer(std::io::stderr).with_filter(filter).boxed(),
            LogFormat::Tree => tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_filter(filter)
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_filter(filter)
                .boxed(),
        }
    }
}

/// Expand a bare level to per-crate directives; anything else passes through.
fn sylva_directives(value: &str) -> String {
    let value = value.trim();
    match value.parse::<LevelFilter>() {
        Ok(level) if level == LevelFilter::OFF => "off".to_string(),
        Ok(level) => {
            let level = level.to_string().to_ascii_lowercase();
            let mut directives = OTHER_TARGETS_LEVEL.to_string();
            for target in SYLVA_TARGETS {
                directives.push_str(&format!(",{target}={level}"));
            }
            directives
        }
        Err(_) => value.to_string(),
    }
}

/// Install the global subscriber described by the environment.
///
/// A no-op when no log variable is set. Later calls keep the first
/// subscriber, so every bench may call this.
pub fn init_tracing() {
    let Some(config) = TracingConfig::from_env() else {
        return;
    };
    let _ = Registry::default().with(config.layer()).try_init();
}

#[cfg(test)]
#[path = "../tests/tracing_config_tests.rs"]
mod tests;
