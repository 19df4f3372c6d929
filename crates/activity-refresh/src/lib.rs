mod all;
mod background;
mod error;
mod providers;
mod single;
mod sweep;

pub use all::{refresh_all_accounts, BulkRefreshOutcome, BulkRefreshStatus};
pub use background::{BackgroundTasks, InlineBackgroundTasks, TokioBackgroundTasks};
pub use error::RefreshError;
pub use providers::ProviderRegistry;
pub use single::{refresh_single_account, SingleRefreshStatus};
pub use sweep::{run_sweep, run_sweep_loop, SweepReport, DEFAULT_SWEEP_INTERVAL};
