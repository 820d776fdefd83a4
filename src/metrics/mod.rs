// src/metrics/mod.rs — Derived project metrics (health, EVM, formatting)

pub mod evm;
pub mod format;
pub mod health;

pub use evm::{EvmInputs, EvmSnapshot};
pub use health::{classify, portfolio_status, summarize, HealthStatus, PortfolioStatus};
