// src/metrics/evm.rs — Earned value formulas
//
// All functions are pure. Inputs are cumulative-to-date figures in one
// currency; BAC is the budget at completion.

use serde::{Deserialize, Serialize};

use super::health::{classify, HealthStatus};

/// Cumulative-to-date base figures. Named fields keep the four amounts
/// from being swapped at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvmInputs {
    /// Budget at completion.
    pub bac: f64,
    /// Earned value.
    pub ev: f64,
    /// Actual cost.
    pub ac: f64,
    /// Planned value.
    pub pv: f64,
}

/// Point-in-time earned value figures for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmSnapshot {
    pub bac: f64,
    pub pv: f64,
    pub ev: f64,
    pub ac: f64,
    pub sv: f64,
    pub cv: f64,
    pub spi: f64,
    pub cpi: f64,
    pub tcpi: f64,
    pub eac: f64,
    pub etc: f64,
    pub vac: f64,
    pub health_score: u8,
    pub status: HealthStatus,
}

impl EvmSnapshot {
    /// Derive every index and forecast from the four base figures.
    pub fn compute(inputs: EvmInputs) -> Self {
        let EvmInputs { bac, ev, ac, pv } = inputs;
        let spi = spi(ev, pv);
        let cpi = cpi(ev, ac);
        let eac = eac(bac, ev, ac, cpi);
        Self {
            bac,
            pv,
            ev,
            ac,
            sv: ev - pv,
            cv: ev - ac,
            spi,
            cpi,
            tcpi: tcpi(bac, ev, ac),
            eac,
            etc: eac - ac,
            vac: bac - eac,
            health_score: health_score(spi, cpi),
            status: classify(spi, cpi),
        }
    }
}

/// Schedule performance index. Nothing planned yet counts as on schedule.
pub fn spi(ev: f64, pv: f64) -> f64 {
    if pv == 0.0 {
        1.0
    } else {
        ev / pv
    }
}

/// Cost performance index. Nothing spent yet counts as on budget.
pub fn cpi(ev: f64, ac: f64) -> f64 {
    if ac == 0.0 {
        1.0
    } else {
        ev / ac
    }
}

/// Estimate at completion, `bac / cpi`. With no earned value the index is
/// meaningless, so the remaining work is assumed to cost its budget.
pub fn eac(bac: f64, ev: f64, ac: f64, cpi: f64) -> f64 {
    if cpi <= 0.0 {
        ac + (bac - ev)
    } else {
        bac / cpi
    }
}

/// To-complete performance index against BAC. Returns exactly 1.0 once the
/// budget is exhausted (`bac - ac <= 0`).
pub fn tcpi(bac: f64, ev: f64, ac: f64) -> f64 {
    let remaining_funds = bac - ac;
    if remaining_funds <= 0.0 {
        return 1.0;
    }
    (bac - ev) / remaining_funds
}

/// 0–100 score: each index contributes `index * 50`, clamped to 0..=100,
/// and the two contributions are averaged.
pub fn health_score(spi: f64, cpi: f64) -> u8 {
    let s = (spi * 50.0).clamp(0.0, 100.0);
    let c = (cpi * 50.0).clamp(0.0, 100.0);
    let score = ((s + c) / 2.0).round();
    if score.is_nan() {
        0
    } else {
        score as u8
    }
}
