//! Net weight policy.
//!
//! Collapses a net's classification into the single scalar that scales its
//! attraction force. Critical nets (power, clock) always outweigh plain
//! multi-pin nets, and wider copper pulls harder.

use crate::model::NetInfo;
use placer_config::PlacementConfig;

/// Weight of an unremarkable two-pin net.
pub const BASE_WEIGHT: f64 = 1.0;

/// Extra weight per pin beyond the second.
pub const PER_EXTRA_PIN: f64 = 0.25;

/// Upper bound on the multi-pin multiplier.
pub const MAX_MULTI_PIN_FACTOR: f64 = 2.0;

/// Multiplier for power and clock nets.
pub const CRITICAL_NET_FACTOR: f64 = 2.5;

/// Trace width at which the width multiplier starts growing.
pub const REFERENCE_TRACE_WIDTH: f64 = 0.25;

/// Upper bound on the trace-width multiplier.
pub const MAX_TRACE_FACTOR: f64 = 2.0;

/// Computes the attraction weight of a net.
///
/// Always returns [`BASE_WEIGHT`] when net weighting is disabled. Absent or
/// nonsensical metadata (zero pins, NaN widths) falls back to the base case.
pub fn net_weight(info: &NetInfo, config: &PlacementConfig) -> f64 {
    if !config.enable_net_weighting {
        return BASE_WEIGHT;
    }

    let mut weight = BASE_WEIGHT;

    if let Some(pins) = info.pin_count {
        if pins > 2 {
            let extra = f64::from(pins - 2);
            weight *= (1.0 + PER_EXTRA_PIN * extra).min(MAX_MULTI_PIN_FACTOR);
        }
    }

    if info.is_power || info.is_clock {
        weight *= CRITICAL_NET_FACTOR;
    }

    if let Some(width) = info.trace_width {
        if width.is_finite() && width > 0.0 {
            let ratio = (width / REFERENCE_TRACE_WIDTH).max(1.0);
            weight *= ratio.sqrt().min(MAX_TRACE_FACTOR);
        }
    }

    weight
}
