// src/cli/gantt.rs — `orion gantt`: export a project's chart to SVG or JSON

use std::path::PathBuf;

use crate::cli::repository;
use crate::data::{DataMode, PortfolioRepository, Scope};
use crate::gantt::{GanttChart, TimelineScale};
use crate::infra::config::Config;
use crate::infra::paths;

pub async fn run_gantt(
    config: &Config,
    tenant: &str,
    mode: DataMode,
    project: &str,
    scale: Option<TimelineScale>,
    format: &str,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let svg = match format {
        "svg" => true,
        "json" => false,
        other => anyhow::bail!("Unknown format '{other}' (expected svg or json)"),
    };
    let scale = scale.unwrap_or(config.gantt.default_scale);

    let repo = repository(config)?;
    let activities = repo.activities(&Scope::new(tenant, mode), project).await?;
    if activities.is_empty() {
        anyhow::bail!("No activities found for project '{project}'");
    }

    let chart = GanttChart::build(project, activities, scale, config.gantt.padding_days);
    let body = if svg {
        chart.to_svg()
    } else {
        serde_json::to_string_pretty(&chart)?
    };

    let path = match output {
        Some(p) => PathBuf::from(p),
        None => {
            paths::ensure_dirs().await?;
            paths::exports_dir().join(format!("{project}-{scale}.{format}"))
        }
    };
    tokio::fs::write(&path, body).await?;

    let critical = chart.activities.iter().filter(|a| a.is_critical).count();
    println!(
        "  {} activities ({} critical), {} dependencies, {:.0}x{:.0} px at {} scale",
        chart.activities.len(),
        critical,
        chart.layout.dependencies.len(),
        chart.layout.width,
        chart.layout.height,
        scale
    );
    println!("  Wrote {}", path.display());
    Ok(())
}
