//! Construction-time parameters for [`DecodePipeline`](crate::DecodePipeline).

use crate::error::{Result, ScanError};
use crate::models::{Symbology, SymbologySet};
use crate::utils::binarization::{DEFAULT_BIAS, DEFAULT_WINDOW_DIVISOR};

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Enabled symbology families
    pub symbologies: SymbologySet,
    /// Consecutive frames a string must top before it is emitted (>= 1)
    pub stability_window: usize,
    /// Bounding-box overlap above which the weaker region is dropped, in [0, 1]
    pub region_overlap_merge_threshold: f32,
    /// Bias subtracted from the local mean during binarization
    pub binarization_bias: i32,
    /// Frame width divided by this gives the binarization window side
    pub window_divisor: usize,
    /// Relative tolerance on linear guard run widths, in (0, 1)
    pub linear_guard_tolerance: f32,
    /// Stop the pipeline after the first emitted event
    pub stop_after_emit: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            symbologies: SymbologySet::all(),
            stability_window: 1,
            region_overlap_merge_threshold: 0.5,
            binarization_bias: DEFAULT_BIAS,
            window_divisor: DEFAULT_WINDOW_DIVISOR,
            linear_guard_tolerance: 0.15,
            stop_after_emit: false,
        }
    }
}

impl ScanConfig {
    /// Check every parameter; the pipeline refuses to build otherwise
    pub fn validate(&self) -> Result<()> {
        if self.symbologies.is_empty() {
            return Err(ScanError::Configuration(
                "at least one symbology must be enabled".into(),
            ));
        }
        if self.stability_window < 1 {
            return Err(ScanError::Configuration(format!(
                "stability window must be >= 1, got {}",
                self.stability_window
            )));
        }
        if !(0.0..=1.0).contains(&self.region_overlap_merge_threshold) {
            return Err(ScanError::Configuration(format!(
                "overlap merge threshold must lie in [0, 1], got {}",
                self.region_overlap_merge_threshold
            )));
        }
        if self.window_divisor < 1 {
            return Err(ScanError::Configuration("window divisor must be >= 1".into()));
        }
        let tol = self.linear_guard_tolerance;
        if !(tol > 0.0 && tol < 1.0) {
            return Err(ScanError::Configuration(format!(
                "linear guard tolerance must lie in (0, 1), got {tol}"
            )));
        }
        Ok(())
    }

    /// Defaults overlaid with `FRAMESCAN_*` environment variables.
    ///
    /// Unparseable values fall back to the default; the result is not validated.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            symbologies: parse_symbologies(&lookup, "FRAMESCAN_SYMBOLOGIES", defaults.symbologies),
            stability_window: parse_env(
                &lookup,
                "FRAMESCAN_STABILITY_WINDOW",
                defaults.stability_window,
            ),
            region_overlap_merge_threshold: parse_env(
                &lookup,
                "FRAMESCAN_OVERLAP_THRESHOLD",
                defaults.region_overlap_merge_threshold,
            ),
            binarization_bias: parse_env(
                &lookup,
                "FRAMESCAN_BINARIZATION_BIAS",
                defaults.binarization_bias,
            ),
            window_divisor: parse_env(&lookup, "FRAMESCAN_WINDOW_DIVISOR", defaults.window_divisor),
            linear_guard_tolerance: parse_env(
                &lookup,
                "FRAMESCAN_GUARD_TOLERANCE",
                defaults.linear_guard_tolerance,
            ),
            stop_after_emit: parse_env_bool_u8(
                &lookup,
                "FRAMESCAN_STOP_AFTER_EMIT",
                defaults.stop_after_emit,
            ),
        }
    }
}

fn parse_env<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> T {
    lookup(name)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: bool) -> bool {
    lookup(name)
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

fn parse_symbologies(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: SymbologySet,
) -> SymbologySet {
    lookup(name)
        .and_then(|v| {
            v.split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse::<Symbology>().ok())
                .collect::<Option<SymbologySet>>()
        })
        .unwrap_or(default)
}
