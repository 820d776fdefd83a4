// src/onboarding/p6.rs — Primavera P6 EPPM REST probe and project listing

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use super::{base_url, describe_status, describe_transport, join, Probe, PROBE_TIMEOUT};
use crate::infra::errors::OrionError;
use crate::model::P6Project;
use crate::settings::ConnectionInput;

const PROJECT_FIELDS: &str = "ObjectId,Id,Name,Status,StartDate,FinishDate";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct P6ProjectRow {
    object_id: i64,
    id: String,
    name: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    finish_date: Option<String>,
}

impl P6ProjectRow {
    fn into_project(self) -> P6Project {
        P6Project {
            object_id: self.object_id,
            id: self.id,
            name: self.name,
            status: self.status.unwrap_or_else(|| "Unknown".into()),
            start_date: self.start_date.as_deref().and_then(p6_date),
            finish_date: self.finish_date.as_deref().and_then(p6_date),
        }
    }
}

/// P6 timestamps look like `2025-01-15T08:00:00`; only the date is kept.
fn p6_date(s: &str) -> Option<NaiveDate> {
    s.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

fn projects_request(
    http: &Client,
    input: &ConnectionInput,
) -> Result<reqwest::RequestBuilder, OrionError> {
    let url = join(&base_url(&input.host)?, &["p6ws", "restapi", "project"]);
    let mut query = vec![("Fields", PROJECT_FIELDS.to_string())];
    if let Some(db) = input.database.as_deref().filter(|d| !d.trim().is_empty()) {
        query.push(("DatabaseName", db.trim().to_string()));
    }
    Ok(http
        .get(url)
        .query(&query)
        .basic_auth(input.username.trim(), input.password.as_deref())
        .timeout(PROBE_TIMEOUT))
}

pub(super) async fn probe(http: &Client, input: &ConnectionInput) -> Result<Probe, OrionError> {
    let request = projects_request(http, input)?;
    let resp = match request.send().await {
        Ok(r) => r,
        Err(e) => return Ok(Err(describe_transport("P6", &e))),
    };
    let status = resp.status();
    if !status.is_success() {
        return Ok(Err(describe_status("P6", status)));
    }
    let visible = resp
        .json::<Vec<serde_json::Value>>()
        .await
        .map(|v| v.len())
        .unwrap_or(0);
    Ok(Ok(format!(
        "Connected to Primavera P6 ({visible} projects visible)"
    )))
}

/// Projects the P6 user can see, ordered by id.
pub async fn list_projects(
    http: &Client,
    input: &ConnectionInput,
) -> Result<Vec<P6Project>, OrionError> {
    input.validate()?;
    let resp = projects_request(http, input)?.send().await?;
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(OrionError::Backend {
            table: "p6ws/restapi/project".into(),
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        });
    }
    let rows: Vec<P6ProjectRow> =
        serde_json::from_str(&body).map_err(|source| OrionError::Decode {
            table: "p6ws/restapi/project".into(),
            source,
        })?;
    let mut projects: Vec<P6Project> = rows.into_iter().map(P6ProjectRow::into_project).collect();
    projects.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(projects)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_mapping() {
        let json = r#"[{"ObjectId":4501,"Id":"LNG-T3","Name":"Train 3",
            "Status":"Active","StartDate":"2024-03-01T08:00:00","FinishDate":null}]"#;
        let rows: Vec<P6ProjectRow> = serde_json::from_str(json).unwrap();
        let p = rows.into_iter().next().unwrap().into_project();
        assert_eq!(p.object_id, 4501);
        assert_eq!(p.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(p.finish_date.is_none());
    }

    #[test]
    fn test_bad_dates_dropped() {
        assert!(p6_date("soon").is_none());
        assert!(p6_date("2025-13-01T00:00:00").is_none());
    }
}
