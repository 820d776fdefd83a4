// src/onboarding/sap.rs — SAP ICF ping probe

use reqwest::Client;

use super::{base_url, describe_status, describe_transport, join, Probe, PROBE_TIMEOUT};
use crate::infra::errors::OrionError;
use crate::settings::ConnectionInput;

const DEFAULT_CLIENT: &str = "100";

/// `GET /sap/public/ping?sap-client=NNN` with basic auth.
pub(super) async fn probe(http: &Client, input: &ConnectionInput) -> Result<Probe, OrionError> {
    let url = join(&base_url(&input.host)?, &["sap", "public", "ping"]);
    let client = input
        .client
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CLIENT);

    let resp = match http
        .get(url)
        .query(&[("sap-client", client)])
        .basic_auth(input.username.trim(), input.password.as_deref())
        .timeout(PROBE_TIMEOUT)
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => return Ok(Err(describe_transport("SAP", &e))),
    };

    let status = resp.status();
    if !status.is_success() {
        return Ok(Err(describe_status("SAP", status)));
    }
    Ok(Ok(format!("Connected to SAP (client {client})")))
}
