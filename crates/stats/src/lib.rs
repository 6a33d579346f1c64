pub mod derive;
pub mod model;

pub use derive::derive_stats;
pub use model::{StatKind, StatsSummary};
