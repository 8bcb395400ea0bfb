pub mod config;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod search;
pub mod session;
pub mod types;

pub use config::SearchConfig;
pub use debounce::Debouncer;
pub use error::LoadError;
pub use filter::{Filter, FilterController, FilterState, SearchMode};
pub use loader::{IndexLoader, IndexSlot, IndexSource};
pub use search::{CategoryIndex, QueryEngine, ResultSet, WildcardPattern};
pub use session::SearchSession;
pub use types::{Category, SearchIndexItem, SearchIndexSnapshot};
