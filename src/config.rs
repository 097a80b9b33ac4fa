//! Command-line configuration for imgcheck.
//!
//! Options come from command-line arguments via clap, with environment
//! variables using the `IMGCHECK_` prefix as fallback.
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use imgcheck::config::Config;
//!
//! let config = Config::parse();
//! config.validate()?;
//! let settings = config.settings();
//! ```
//!
//! # Environment Variables
//!
//! - `IMGCHECK_IDENTIFY` - Identify formats only (default: false)
//! - `IMGCHECK_THREADS` - Worker count (default: CPU count x 8)
//! - `IMGCHECK_KNOWN_EXTENSIONS_ONLY` - Skip files with unknown extensions
//! - `IMGCHECK_QUIET` - Suppress result lines for files that are OK
//! - `IMGCHECK_TIFF_BASELINE` - Check TIFF files against the baseline profile
//! - `IMGCHECK_LOG_LEVEL` - Log level filter

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::format::{DecoderSettings, FieldSchema, ProcessMode};
use crate::messages::EnglishCatalog;

// =============================================================================
// Default Values
// =============================================================================

/// Default log filter.
pub const DEFAULT_LOG_FILTER: &str = "imgcheck=info";

/// Log filter used with `--verbose`.
pub const VERBOSE_LOG_FILTER: &str = "imgcheck=debug";

/// Accepted values for `--log-level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// =============================================================================
// CLI Arguments
// =============================================================================

/// imgcheck - Structural validator for TIFF and JPEG files.
///
/// Prints one result line per file: path, format, status and the warnings
/// or errors found.
#[derive(Parser, Debug, Clone)]
#[command(name = "imgcheck")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Files and directories to check. Directories are walked recursively.
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    // =========================================================================
    // Decoding
    // =========================================================================
    /// Only identify the format of each file.
    #[arg(short, long, default_value_t = false, env = "IMGCHECK_IDENTIFY")]
    pub identify: bool,

    /// Check the first TIFF directory against the baseline profile.
    #[arg(long, default_value_t = false, env = "IMGCHECK_TIFF_BASELINE")]
    pub tiff_baseline: bool,

    // =========================================================================
    // Dispatch
    // =========================================================================
    /// Number of worker threads.
    ///
    /// Defaults to the CPU count times 8, capped at the number of files.
    #[arg(short = 'j', long, env = "IMGCHECK_THREADS")]
    pub threads: Option<usize>,

    /// Only check files whose extension a supported format uses.
    #[arg(short, long, default_value_t = false, env = "IMGCHECK_KNOWN_EXTENSIONS_ONLY")]
    pub known_extensions_only: bool,

    // =========================================================================
    // Output
    // =========================================================================
    /// Suppress result lines for files that are OK.
    #[arg(short, long, default_value_t = false, env = "IMGCHECK_QUIET")]
    pub quiet: bool,

    /// Print one JSON object per file instead of a tab-separated line.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    // =========================================================================
    // Logging
    // =========================================================================
    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, env = "IMGCHECK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.paths.is_empty() {
            return Err("At least one file or directory is required".to_string());
        }

        if self.threads == Some(0) {
            return Err("threads must be greater than 0".to_string());
        }

        if let Some(level) = &self.log_level {
            if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(format!(
                    "log_level must be one of {}, got '{}'",
                    LOG_LEVELS.join(", "),
                    level
                ));
            }
        }

        Ok(())
    }

    /// Tracing filter directive for this configuration.
    ///
    /// An explicit log level wins over `--verbose`.
    pub fn log_filter(&self) -> String {
        match &self.log_level {
            Some(level) => format!("imgcheck={}", level.to_ascii_lowercase()),
            None if self.verbose => VERBOSE_LOG_FILTER.to_string(),
            None => DEFAULT_LOG_FILTER.to_string(),
        }
    }

    /// Build the decoder settings shared by all workers.
    pub fn settings(&self) -> DecoderSettings {
        DecoderSettings {
            mode: if self.identify {
                ProcessMode::Identify
            } else {
                ProcessMode::Check
            },
            tiff_baseline: self.tiff_baseline,
            schema: Arc::new(FieldSchema::new()),
            messages: Arc::new(EnglishCatalog::new()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
