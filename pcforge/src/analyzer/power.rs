//! Power budget estimation.
//!
//! The estimate counts CPU and GPU TDP plus a fixed allowance for the rest
//! of the system (motherboard, memory, storage, fans). The PSU rule uses
//! [`PowerBudget::estimate`] directly, so there is one formula.

use serde::{Deserialize, Serialize};

use crate::build::Build;

/// Baseline draw for everything that is not CPU or GPU (W).
pub const SYSTEM_OVERHEAD_W: f64 = 75.0;

/// PSU capacity expected above the estimated draw before the headroom
/// warning goes away (W).
pub const PSU_SAFETY_MARGIN_W: f64 = 100.0;

/// Fraction of cooler capacity above which CPU TDP draws a headroom warning.
pub const THERMAL_HEADROOM_RATIO: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerBudget {
    pub cpu_draw: f64,
    pub gpu_draw: f64,
    pub system_overhead: f64,
    pub total: f64,
}

impl PowerBudget {
    pub fn estimate(build: &Build) -> Self {
        let cpu_draw = build.cpu().map(|cpu| cpu.tdp).unwrap_or(0.0);
        let gpu_draw = build.gpu().map(|gpu| gpu.tdp).unwrap_or(0.0);
        Self {
            cpu_draw,
            gpu_draw,
            system_overhead: SYSTEM_OVERHEAD_W,
            total: cpu_draw + gpu_draw + SYSTEM_OVERHEAD_W,
        }
    }

    /// Estimated draw as a share of PSU capacity, capped at 100.
    /// `None` without a positive PSU rating.
    pub fn psu_load_percent(&self, psu_wattage: f64) -> Option<u8> {
        if psu_wattage.is_nan() || psu_wattage <= 0.0 {
            return None;
        }
        let percent = (self.total / psu_wattage * 100.0).round().min(100.0);
        Some(percent as u8)
    }
}

/// Estimate the power draw of `build`.
pub fn estimate(build: &Build) -> PowerBudget {
    PowerBudget::estimate(build)
}
