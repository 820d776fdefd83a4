// src/cli/serve.rs — `orion serve`

use crate::api::{self, ApiState};
use crate::data::DataMode;
use crate::infra::config::Config;
use crate::infra::paths;

pub async fn run_serve(
    config: Config,
    host: Option<String>,
    port: Option<u16>,
    mode: Option<DataMode>,
) -> anyhow::Result<()> {
    paths::ensure_dirs().await?;

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let supabase = config.supabase.credentials().is_some();

    let state = ApiState::from_config(config)?;
    if let Some(mode) = mode {
        state.data_mode.set(mode);
    }

    tracing::info!(
        supabase,
        data_mode = %state.data_mode.get(),
        settings = %paths::db_path().display(),
        "Starting ORION API v{}",
        env!("CARGO_PKG_VERSION")
    );
    api::start_server(&host, port, state).await
}
