use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color;
use crate::error::Result;
use crate::models::read_json;
use crate::validate::{self, Diagnostic};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareSpec {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl HardwareSpec {
    pub fn display_color(&self) -> &str {
        color::sanitize_color_or_default(&self.color)
    }
}

/// Throughput of one model across hardware, keyed by [`HardwareSpec::id`].
/// Values are tokens/sec, or a string such as `"N/A"` when it doesn't run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwarePerformance {
    pub model: String,
    #[serde(flatten)]
    pub results: BTreeMap<String, Value>,
}

impl HardwarePerformance {
    pub fn tokens_per_second(&self, hardware_id: &str) -> Option<f64> {
        self.results.get(hardware_id).and_then(Value::as_f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HardwareCategory {
    #[serde(rename = "Unified Memory")]
    UnifiedMemory,
    #[serde(rename = "Consumer GPU")]
    ConsumerGpu,
    #[serde(rename = "Data Center GPU")]
    DataCenterGpu,
}

impl HardwareCategory {
    pub fn label(&self) -> &'static str {
        match self {
            HardwareCategory::UnifiedMemory => "Unified Memory",
            HardwareCategory::ConsumerGpu => "Consumer GPU",
            HardwareCategory::DataCenterGpu => "Data Center GPU",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareDetails {
    pub name: String,
    /// GB.
    pub memory: f64,
    /// GB/s.
    pub bandwidth: f64,
    /// Watts.
    pub power: f64,
    /// USD.
    pub price: f64,
    #[serde(rename = "pricePerGB")]
    pub price_per_gb: f64,
    pub category: HardwareCategory,
}

/// The three parallel arrays behind the hardware comparison view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareComparison {
    pub all_hardware: Vec<HardwareSpec>,
    pub performance_data: Vec<HardwarePerformance>,
    pub specs: Vec<HardwareDetails>,
}

const HARDWARE_JSON: &str = include_str!("../data/hardware.json");

impl HardwareComparison {
    pub fn embedded() -> (Self, Vec<Diagnostic>) {
        let value = serde_json::from_str(HARDWARE_JSON).unwrap_or(Value::Null);
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> (Self, Vec<Diagnostic>) {
        let validated = validate::validate_hardware_data(value);
        (validated.data, validated.diagnostics)
    }

    pub fn load(path: Option<&Path>) -> Result<(Self, Vec<Diagnostic>)> {
        match path {
            Some(path) => Ok(Self::from_value(&read_json(path)?)),
            None => Ok(Self::embedded()),
        }
    }

    /// Hardware ranked by memory cost, cheapest per GB first.
    pub fn by_price_per_gb(&self) -> Vec<&HardwareDetails> {
        let mut specs: Vec<&HardwareDetails> = self.specs.iter().collect();
        specs.sort_by(|a, b| a.price_per_gb.total_cmp(&b.price_per_gb));
        specs
    }
}
