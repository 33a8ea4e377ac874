pub mod anonymizer;
pub mod api;
pub mod auth;
pub mod client;
pub mod data_classifier;
pub mod models;
pub mod settings;
pub mod table_sort;
pub mod utils;
pub mod watcher;

pub use anonymizer::{stable_index, Anonymizer, DemoMode, LookupTable};
pub use settings::Settings;
