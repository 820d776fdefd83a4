// src/gantt/mod.rs — Gantt chart geometry and rendering

pub mod layout;
pub mod scale;
pub mod svg;

use serde::{Deserialize, Serialize};

use crate::model::GanttActivity;
pub use layout::{layout, GanttLayout};
pub use scale::TimelineScale;

/// Activities plus their computed geometry, as served by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttChart {
    pub project_id: String,
    pub activities: Vec<GanttActivity>,
    pub layout: GanttLayout,
}

impl GanttChart {
    pub fn build(
        project_id: impl Into<String>,
        activities: Vec<GanttActivity>,
        scale: TimelineScale,
        padding_days: i64,
    ) -> Self {
        let layout = layout::layout(&activities, scale, padding_days);
        Self {
            project_id: project_id.into(),
            activities,
            layout,
        }
    }

    pub fn to_svg(&self) -> String {
        svg::render(&self.layout, &self.activities)
    }
}
