pub mod color;
pub mod config;
pub mod cost;
pub mod currency;
pub mod display;
pub mod error;
pub mod hardware;
pub mod models;
pub mod recommend;
pub mod saved;
pub mod system;
pub mod validate;
pub mod wizard;

pub use config::Config;
pub use cost::{CostBreakdown, CostData, SelfHostingCost, UsagePreset, UsageProfile};
pub use currency::{Currency, CurrencyTable};
pub use error::{Error, Result};
pub use hardware::HardwareComparison;
pub use models::{AiModel, LocalModel, ModelCategory, ModelDatabase};
pub use recommend::{Answers, RawAnswers, ScoredCandidate, recommend};
pub use saved::{FileStore, KeyValueStore, MemoryStore, SavedComparison, SavedComparisons};
pub use wizard::{Question, Wizard};
