// src/data/mod.rs — Data access: mode resolution, table routing and repositories

pub mod mock;
pub mod mode;
pub mod remote;
pub mod repository;
pub mod rows;
pub mod supabase;
pub mod tables;

pub use mock::MockRepository;
pub use mode::{resolve_mode, DataMode, DataModeSwitch};
pub use remote::OrionClient;
pub use repository::{DataSource, PortfolioRepository, Scope};
pub use supabase::{SupabaseClient, SupabaseRepository};
