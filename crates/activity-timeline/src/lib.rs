mod assemble;
mod error;
mod filter;
mod loader;
mod window;

pub use assemble::assemble_profile_timeline;
pub use error::TimelineError;
pub use filter::apply_account_filters;
pub use loader::{load_account, LoadedAccount};
pub use window::{apply_window, Window};
