// src/metrics/health.rs — SPI/CPI health classification and portfolio rollup

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{PortfolioSummary, Project};

/// Both indices at or above this are on track.
pub const ON_TRACK_THRESHOLD: f64 = 0.95;
/// Either index below this is critical.
pub const CRITICAL_THRESHOLD: f64 = 0.85;

/// Share of critical projects that makes the whole portfolio critical.
pub const PORTFOLIO_CRITICAL_SHARE: f64 = 0.3;
/// Share of at-risk projects that puts the portfolio at risk.
pub const PORTFOLIO_AT_RISK_SHARE: f64 = 0.4;

/// Health of a single project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    OnTrack,
    AtRisk,
    Critical,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::OnTrack => "on_track",
            HealthStatus::AtRisk => "at_risk",
            HealthStatus::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::OnTrack => "On Track",
            HealthStatus::AtRisk => "At Risk",
            HealthStatus::Critical => "Critical",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health of a whole portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortfolioStatus {
    OnTrack,
    AtRisk,
    Critical,
}

impl PortfolioStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortfolioStatus::OnTrack => "ON_TRACK",
            PortfolioStatus::AtRisk => "AT_RISK",
            PortfolioStatus::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for PortfolioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a project from its schedule and cost performance indices.
///
/// Critical wins over on-track: a project far ahead on cost but far behind
/// on schedule is still critical.
pub fn classify(spi: f64, cpi: f64) -> HealthStatus {
    if spi < CRITICAL_THRESHOLD || cpi < CRITICAL_THRESHOLD {
        HealthStatus::Critical
    } else if spi >= ON_TRACK_THRESHOLD && cpi >= ON_TRACK_THRESHOLD {
        HealthStatus::OnTrack
    } else {
        HealthStatus::AtRisk
    }
}

/// Roll project counts up into a portfolio status. An empty portfolio is on
/// track.
pub fn portfolio_status(on_track: u32, at_risk: u32, critical: u32) -> PortfolioStatus {
    let total = on_track + at_risk + critical;
    if total == 0 {
        return PortfolioStatus::OnTrack;
    }
    let total = f64::from(total);

    if f64::from(critical) / total >= PORTFOLIO_CRITICAL_SHARE {
        PortfolioStatus::Critical
    } else if critical > 0 || f64::from(at_risk) / total >= PORTFOLIO_AT_RISK_SHARE {
        PortfolioStatus::AtRisk
    } else {
        PortfolioStatus::OnTrack
    }
}

/// Count projects by status and derive the portfolio rollup.
pub fn summarize(projects: &[Project]) -> PortfolioSummary {
    let mut on_track = 0u32;
    let mut at_risk = 0u32;
    let mut critical = 0u32;
    for p in projects {
        match p.status {
            HealthStatus::OnTrack => on_track += 1,
            HealthStatus::AtRisk => at_risk += 1,
            HealthStatus::Critical => critical += 1,
        }
    }

    let (average_spi, average_cpi) = if projects.is_empty() {
        (0.0, 0.0)
    } else {
        let n = projects.len() as f64;
        (
            projects.iter().map(|p| p.spi).sum::<f64>() / n,
            projects.iter().map(|p| p.cpi).sum::<f64>() / n,
        )
    };

    PortfolioSummary {
        total_projects: on_track + at_risk + critical,
        on_track,
        at_risk,
        critical,
        portfolio_status: portfolio_status(on_track, at_risk, critical),
        average_spi: round2(average_spi),
        average_cpi: round2(average_cpi),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, spi: f64, cpi: f64) -> Project {
        Project {
            id: id.into(),
            name: id.into(),
            percent_complete: 50.0,
            spi,
            cpi,
            status: classify(spi, cpi),
            planned_finish: None,
            data_date: None,
        }
    }

    #[test]
    fn test_both_high_is_on_track() {
        for (spi, cpi) in [(0.95, 0.95), (1.0, 1.2), (1.5, 0.95), (3.0, 3.0)] {
            assert_eq!(classify(spi, cpi), HealthStatus::OnTrack, "{spi}/{cpi}");
        }
    }

    #[test]
    fn test_either_low_is_critical_even_if_other_high() {
        assert_eq!(classify(0.5, 2.0), HealthStatus::Critical);
        assert_eq!(classify(2.0, 0.5), HealthStatus::Critical);
        assert_eq!(classify(0.8499, 0.99), HealthStatus::Critical);
    }

    #[test]
    fn test_middle_band_is_at_risk() {
        assert_eq!(classify(0.85, 0.85), HealthStatus::AtRisk);
        assert_eq!(classify(0.94, 1.0), HealthStatus::AtRisk);
        assert_eq!(classify(1.0, 0.9499), HealthStatus::AtRisk);
    }

    #[test]
    fn test_nan_is_at_risk() {
        assert_eq!(classify(f64::NAN, 1.0), HealthStatus::AtRisk);
    }

    #[test]
    fn test_empty_portfolio_on_track() {
        assert_eq!(portfolio_status(0, 0, 0), PortfolioStatus::OnTrack);
    }

    #[test]
    fn test_portfolio_critical_share() {
        // 3 of 10 critical = 0.3
        assert_eq!(portfolio_status(7, 0, 3), PortfolioStatus::Critical);
        assert_eq!(portfolio_status(8, 0, 2), PortfolioStatus::AtRisk);
    }

    #[test]
    fn test_portfolio_at_risk_share() {
        assert_eq!(portfolio_status(6, 4, 0), PortfolioStatus::AtRisk);
        assert_eq!(portfolio_status(7, 3, 0), PortfolioStatus::OnTrack);
    }

    #[test]
    fn test_any_critical_is_at_least_at_risk() {
        assert_eq!(portfolio_status(99, 0, 1), PortfolioStatus::AtRisk);
    }

    #[test]
    fn test_summarize_counts_and_averages() {
        let projects = vec![
            project("a", 1.0, 1.0),
            project("b", 0.9, 0.9),
            project("c", 0.8, 1.0),
        ];
        let s = summarize(&projects);
        assert_eq!(s.total_projects, 3);
        assert_eq!((s.on_track, s.at_risk, s.critical), (1, 1, 1));
        assert_eq!(s.portfolio_status, PortfolioStatus::Critical);
        assert_eq!(s.average_spi, 0.9);
        assert_eq!(s.average_cpi, 0.97);
    }

    #[test]
    fn test_summarize_empty() {
        let s = summarize(&[]);
        assert_eq!(s.total_projects, 0);
        assert_eq!(s.portfolio_status, PortfolioStatus::OnTrack);
    }

    #[test]
    fn test_status_serializes() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::OnTrack).unwrap(),
            "\"on_track\""
        );
        assert_eq!(
            serde_json::to_string(&PortfolioStatus::AtRisk).unwrap(),
            "\"AT_RISK\""
        );
    }
}
