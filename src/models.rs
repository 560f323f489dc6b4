use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color;
use crate::error::{Error, Result};
use crate::validate::{self, Diagnostic};

/// Licensing class of a hosted or downloadable model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelCategory {
    Proprietary,
    #[serde(rename = "Open Source")]
    OpenSource,
}

impl ModelCategory {
    pub const ALL: [ModelCategory; 2] = [ModelCategory::Proprietary, ModelCategory::OpenSource];

    pub fn label(&self) -> &'static str {
        match self {
            ModelCategory::Proprietary => "Proprietary",
            ModelCategory::OpenSource => "Open Source",
        }
    }
}

/// Lowercase with spaces, dashes and underscores removed, so
/// `"Open Source"`, `"open-source"` and `"opensource"` compare equal.
fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl FromStr for ModelCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Self::ALL
            .into_iter()
            .find(|c| normalize_label(c.label()) == wanted)
            .ok_or_else(|| "expected one of: proprietary, open-source".to_string())
    }
}

/// Capability sub-scores, each on a 0-10 scale.
///
/// The recommendation weights (`15 * coding`, `20 * reasoning`, ...) assume
/// this scale. Chart code that wants percentages multiplies by ten.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    pub cleverness: f64,
    pub coding: f64,
    pub reasoning: f64,
    pub creative: f64,
    pub factual: f64,
    pub math: f64,
}

impl Capabilities {
    pub const FIELDS: [&'static str; 6] =
        ["cleverness", "coding", "reasoning", "creative", "factual", "math"];

    /// Scores rescaled to 0-100 for percentage displays.
    pub fn as_percentages(&self) -> [(&'static str, f64); 6] {
        [
            ("cleverness", self.cleverness * 10.0),
            ("coding", self.coding * 10.0),
            ("reasoning", self.reasoning * 10.0),
            ("creative", self.creative * 10.0),
            ("factual", self.factual * 10.0),
            ("math", self.math * 10.0),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareRequirements {
    #[serde(rename = "minVRAM")]
    pub min_vram: String,
    #[serde(rename = "recommendedGPU")]
    pub recommended_gpu: String,
    #[serde(rename = "minRAM")]
    pub min_ram: String,
    #[serde(rename = "storageSize")]
    pub storage_size: String,
}

/// A hosted or open-weights model with benchmark and pricing metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiModel {
    pub name: String,
    pub provider: String,
    pub category: ModelCategory,
    /// Billions of parameters.
    pub parameters: f64,
    /// USD per million tokens; zero means free.
    #[serde(rename = "costPer1M")]
    pub cost_per_1m: f64,
    pub speed_tokens: f64,
    #[serde(rename = "benchmarkMMLU")]
    pub benchmark_mmlu: f64,
    pub benchmark_human_eval: f64,
    /// Thousands of tokens.
    pub context_window: f64,
    /// 0-10.
    pub quality: f64,
    pub color: String,
    pub capabilities: Capabilities,
    #[serde(default)]
    pub hardware_required: Option<HardwareRequirements>,
}

impl AiModel {
    pub fn is_free(&self) -> bool {
        self.cost_per_1m == 0.0
    }

    pub fn display_color(&self) -> &str {
        color::sanitize_color_or_default(&self.color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocalCategory {
    General,
    Coding,
    Vision,
    Reasoning,
    Multilingual,
    Uncensored,
    Tools,
}

impl LocalCategory {
    pub const VARIANTS: [LocalCategory; 7] = [
        LocalCategory::General,
        LocalCategory::Coding,
        LocalCategory::Vision,
        LocalCategory::Reasoning,
        LocalCategory::Multilingual,
        LocalCategory::Uncensored,
        LocalCategory::Tools,
    ];

    /// Wire names, as accepted by the local model validator.
    pub const ALL: [&'static str; 7] = [
        "General",
        "Coding",
        "Vision",
        "Reasoning",
        "Multilingual",
        "Uncensored",
        "Tools",
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LocalCategory::General => "General",
            LocalCategory::Coding => "Coding",
            LocalCategory::Vision => "Vision",
            LocalCategory::Reasoning => "Reasoning",
            LocalCategory::Multilingual => "Multilingual",
            LocalCategory::Uncensored => "Uncensored",
            LocalCategory::Tools => "Tools",
        }
    }
}

impl FromStr for LocalCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Self::VARIANTS
            .into_iter()
            .find(|c| normalize_label(c.label()) == wanted)
            .ok_or_else(|| format!("expected one of: {}", Self::ALL.join(", ").to_lowercase()))
    }
}

fn not_available() -> String {
    "N/A".to_string()
}

/// A model packaged for running on local hardware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalModel {
    pub name: String,
    pub provider: String,
    pub parameters: f64,
    pub category: LocalCategory,
    /// GB.
    #[serde(rename = "minRAM")]
    pub min_ram: f64,
    /// GB.
    #[serde(rename = "recommendedRAM")]
    pub recommended_ram: f64,
    #[serde(rename = "minVRAM", default = "not_available")]
    pub min_vram: String,
    #[serde(default = "not_available")]
    pub storage_size: String,
    #[serde(default)]
    pub context_window: f64,
    #[serde(default)]
    pub quantization: String,
    #[serde(default)]
    pub use_case: String,
    #[serde(default)]
    pub description: String,
    pub color: String,
    pub features: Vec<String>,
}

impl LocalModel {
    pub fn min_vram_gb(&self) -> Option<f64> {
        parse_size_gb(&self.min_vram)
    }
}

/// Parse sizes like `"8GB"`, `"4.1 GB"`, `"512MB"` or `"1TB"` into GB.
/// `"N/A"` and anything unparseable yield `None`.
pub fn parse_size_gb(size: &str) -> Option<f64> {
    let upper = size.trim().to_uppercase();
    let (number, scale) = if let Some(n) = upper.strip_suffix("TB") {
        (n, 1024.0)
    } else if let Some(n) = upper.strip_suffix("GB") {
        (n, 1.0)
    } else if let Some(n) = upper.strip_suffix("MB") {
        (n, 1.0 / 1024.0)
    } else {
        (upper.as_str(), 1.0)
    };
    let value: f64 = number.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value * scale)
    } else {
        None
    }
}

const MODELS_JSON: &str = include_str!("../data/models.json");
const LOCAL_MODELS_JSON: &str = include_str!("../data/local_models.json");

/// Read-only catalog of hosted and local models.
///
/// Built once and passed to whatever needs it; nothing here is global.
#[derive(Debug, Clone, Default)]
pub struct ModelDatabase {
    models: Vec<AiModel>,
    local_models: Vec<LocalModel>,
    diagnostics: Vec<Diagnostic>,
}

impl ModelDatabase {
    /// Later records with an already-seen name are dropped.
    pub fn new(models: Vec<AiModel>, local_models: Vec<LocalModel>) -> Self {
        ModelDatabase {
            models: dedupe_by_name(models, |m| &m.name),
            local_models: dedupe_by_name(local_models, |m| &m.name),
            diagnostics: Vec::new(),
        }
    }

    /// The datasets compiled into the binary, filtered through the validators.
    pub fn embedded() -> Self {
        Self::from_values(&parse_embedded(MODELS_JSON), &parse_embedded(LOCAL_MODELS_JSON))
    }

    /// Build from untyped JSON documents. Invalid records are dropped.
    pub fn from_values(models: &Value, local_models: &Value) -> Self {
        let ai = validate::validate_ai_models_data(models);
        let local = validate::validate_local_models_data(local_models);

        let mut diagnostics = ai.diagnostics;
        diagnostics.extend(local.diagnostics);

        ModelDatabase {
            models: dedupe_by_name(ai.models, |m| &m.name),
            local_models: dedupe_by_name(local.models, |m| &m.name),
            diagnostics,
        }
    }

    /// Load from optional override files, falling back to the embedded copy
    /// for any path not given.
    pub fn load(models_path: Option<&Path>, local_models_path: Option<&Path>) -> Result<Self> {
        let models = match models_path {
            Some(path) => read_json(path)?,
            None => parse_embedded(MODELS_JSON),
        };
        let local = match local_models_path {
            Some(path) => read_json(path)?,
            None => parse_embedded(LOCAL_MODELS_JSON),
        };
        Ok(Self::from_values(&models, &local))
    }

    pub fn models_in_category(&self, category: ModelCategory) -> Vec<&AiModel> {
        self.models.iter().filter(|m| m.category == category).collect()
    }

    pub fn local_models_in_category(&self, category: LocalCategory) -> Vec<&LocalModel> {
        self.local_models
            .iter()
            .filter(|m| m.category == category)
            .collect()
    }

    pub fn get_all_models(&self) -> &[AiModel] {
        &self.models
    }

    pub fn local_models(&self) -> &[LocalModel] {
        &self.local_models
    }

    /// Diagnostics produced while validating the source data.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn get(&self, name: &str) -> Option<&AiModel> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn find_model(&self, query: &str) -> Vec<&AiModel> {
        let query_lower = query.to_lowercase();
        self.models
            .iter()
            .filter(|m| {
                m.name.to_lowercase().contains(&query_lower)
                    || m.provider.to_lowercase().contains(&query_lower)
            })
            .collect()
    }

    /// Resolve exact names, in the order given.
    pub fn by_names(&self, names: &[String]) -> Result<Vec<&AiModel>> {
        names
            .iter()
            .map(|name| self.get(name).ok_or_else(|| Error::UnknownModel(name.clone())))
            .collect()
    }

    pub fn local_models_fitting_system(
        &self,
        available_ram_gb: f64,
        vram_gb: Option<f64>,
    ) -> Vec<&LocalModel> {
        self.local_models
            .iter()
            .filter(|m| {
                let ram_ok = m.min_ram <= available_ram_gb;
                match (m.min_vram_gb(), vram_gb) {
                    (Some(min_vram), Some(system_vram)) => ram_ok && min_vram <= system_vram,
                    // Wants a GPU we don't have; needs full recommended RAM on CPU
                    (Some(_), None) => ram_ok && available_ram_gb >= m.recommended_ram,
                    (None, _) => ram_ok,
                }
            })
            .collect()
    }
}

/// Most models a side-by-side comparison holds.
pub const MAX_COMPARE: usize = 4;

/// Winning value per compared metric: lowest price, highest everything
/// else. `None` only for an empty selection. Every model equal to the
/// winner counts as best.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BestValues {
    pub cost_per_1m: Option<f64>,
    pub benchmark_mmlu: Option<f64>,
    pub benchmark_human_eval: Option<f64>,
    pub speed_tokens: Option<f64>,
    pub context_window: Option<f64>,
}

impl BestValues {
    pub fn is_best(best: Option<f64>, value: f64) -> bool {
        best == Some(value)
    }
}

pub fn best_values(models: &[&AiModel]) -> BestValues {
    fn pick(models: &[&AiModel], field: fn(&AiModel) -> f64, better: fn(f64, f64) -> f64) -> Option<f64> {
        models.iter().map(|m| field(*m)).reduce(better)
    }

    BestValues {
        cost_per_1m: pick(models, |m| m.cost_per_1m, f64::min),
        benchmark_mmlu: pick(models, |m| m.benchmark_mmlu, f64::max),
        benchmark_human_eval: pick(models, |m| m.benchmark_human_eval, f64::max),
        speed_tokens: pick(models, |m| m.speed_tokens, f64::max),
        context_window: pick(models, |m| m.context_window, f64::max),
    }
}

fn parse_embedded(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::error!(error = %e, "embedded dataset is not valid JSON");
        Value::Null
    })
}

pub fn read_json(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

/// Names are the catalog key; later duplicates are dropped.
fn dedupe_by_name<T>(items: Vec<T>, name: impl Fn(&T) -> &String) -> Vec<T> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            let fresh = seen.insert(name(item).clone());
            if !fresh {
                tracing::warn!(name = %name(item), "duplicate model name, keeping first");
            }
            fresh
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn test_model(name: &str, category: ModelCategory, cost_per_1m: f64) -> AiModel {
        AiModel {
            name: name.to_string(),
            provider: "Test".to_string(),
            category,
            parameters: 7.0,
            cost_per_1m,
            speed_tokens: 50.0,
            benchmark_mmlu: 70.0,
            benchmark_human_eval: 60.0,
            context_window: 32.0,
            quality: 7.0,
            color: "#123456".to_string(),
            capabilities: Capabilities {
                cleverness: 7.0,
                coding: 7.0,
                reasoning: 7.0,
                creative: 7.0,
                factual: 7.0,
                math: 7.0,
            },
            hardware_required: None,
        }
    }

    fn test_local(name: &str, min_ram: f64, min_vram: &str) -> LocalModel {
        LocalModel {
            name: name.to_string(),
            provider: "Test".to_string(),
            parameters: 7.0,
            category: LocalCategory::General,
            min_ram,
            recommended_ram: min_ram * 2.0,
            min_vram: min_vram.to_string(),
            storage_size: "4GB".to_string(),
            context_window: 8.0,
            quantization: "Q4_0".to_string(),
            use_case: String::new(),
            description: String::new(),
            color: "#123456".to_string(),
            features: vec![],
        }
    }

    #[test]
    fn test_embedded_data_is_clean() {
        let db = ModelDatabase::embedded();
        assert!(!db.get_all_models().is_empty());
        assert!(!db.local_models().is_empty());
        assert!(db.diagnostics().is_empty());
        assert_eq!(db.get("GPT-4").map(|m| m.cost_per_1m), Some(30.0));
        assert_eq!(db.get("Claude 3.5 Sonnet").map(|m| m.cost_per_1m), Some(3.0));
        assert!(db.get_all_models().iter().any(|m| m.is_free()));
    }

    #[test]
    fn test_category_wire_names() {
        let json = serde_json::to_string(&ModelCategory::OpenSource).unwrap();
        assert_eq!(json, "\"Open Source\"");
    }

    #[test]
    fn test_parse_size_gb() {
        assert_eq!(parse_size_gb("8GB"), Some(8.0));
        assert_eq!(parse_size_gb("4.1GB"), Some(4.1));
        assert_eq!(parse_size_gb("512MB"), Some(0.5));
        assert_eq!(parse_size_gb("1TB"), Some(1024.0));
        assert_eq!(parse_size_gb("N/A"), None);
        assert_eq!(parse_size_gb(""), None);
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let mut first = serde_json::to_value(test_model("Dup", ModelCategory::Proprietary, 1.0)).unwrap();
        let second = serde_json::to_value(test_model("Dup", ModelCategory::Proprietary, 2.0)).unwrap();
        first["provider"] = Value::from("First");
        let data = serde_json::json!({ "models": [first, second] });
        let db = ModelDatabase::from_values(&data, &Value::Null);
        assert_eq!(db.get_all_models().len(), 1);
        assert_eq!(db.get("Dup").map(|m| m.provider.as_str()), Some("First"));
    }

    #[test]
    fn test_find_and_by_names() {
        let db = ModelDatabase::new(
            vec![
                test_model("Alpha", ModelCategory::Proprietary, 1.0),
                test_model("Beta", ModelCategory::OpenSource, 0.0),
            ],
            vec![],
        );
        assert_eq!(db.find_model("alp").len(), 1);
        assert_eq!(db.find_model("test").len(), 2);

        let picked = db.by_names(&["Beta".to_string(), "Alpha".to_string()]).unwrap();
        assert_eq!(picked[0].name, "Beta");
        assert!(matches!(
            db.by_names(&["Gamma".to_string()]),
            Err(Error::UnknownModel(n)) if n == "Gamma"
        ));
    }

    #[test]
    fn test_new_drops_duplicate_names() {
        let mut second = test_model("Dup", ModelCategory::OpenSource, 0.0);
        second.provider = "Second".to_string();
        let db = ModelDatabase::new(
            vec![test_model("Dup", ModelCategory::Proprietary, 1.0), second],
            vec![test_local("dup", 4.0, "N/A"), test_local("dup", 8.0, "N/A")],
        );
        assert_eq!(db.get_all_models().len(), 1);
        assert_eq!(db.get("Dup").map(|m| m.provider.as_str()), Some("Test"));
        assert_eq!(db.local_models().len(), 1);
        assert_eq!(db.local_models()[0].min_ram, 4.0);
    }

    #[test]
    fn test_models_in_category() {
        let db = ModelDatabase::new(
            vec![
                test_model("Closed", ModelCategory::Proprietary, 5.0),
                test_model("Open A", ModelCategory::OpenSource, 0.0),
                test_model("Open B", ModelCategory::OpenSource, 0.0),
            ],
            vec![],
        );
        let open: Vec<_> = db
            .models_in_category(ModelCategory::OpenSource)
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(open, vec!["Open A", "Open B"]);
        assert_eq!(db.models_in_category(ModelCategory::Proprietary).len(), 1);

        let empty = ModelDatabase::new(vec![test_model("Open", ModelCategory::OpenSource, 0.0)], vec![]);
        assert!(empty.models_in_category(ModelCategory::Proprietary).is_empty());
    }

    #[test]
    fn test_local_models_in_category() {
        let mut coder = test_local("coder", 8.0, "6GB");
        coder.category = LocalCategory::Coding;
        let db = ModelDatabase::new(vec![], vec![test_local("chat", 4.0, "N/A"), coder]);

        let coding: Vec<_> = db
            .local_models_in_category(LocalCategory::Coding)
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(coding, vec!["coder"]);
        assert!(db.local_models_in_category(LocalCategory::Uncensored).is_empty());
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("proprietary".parse::<ModelCategory>(), Ok(ModelCategory::Proprietary));
        assert_eq!("Open Source".parse::<ModelCategory>(), Ok(ModelCategory::OpenSource));
        assert_eq!("open-source".parse::<ModelCategory>(), Ok(ModelCategory::OpenSource));
        assert!("closed".parse::<ModelCategory>().is_err());

        assert_eq!("coding".parse::<LocalCategory>(), Ok(LocalCategory::Coding));
        assert_eq!("Multilingual".parse::<LocalCategory>(), Ok(LocalCategory::Multilingual));
        assert!("".parse::<LocalCategory>().is_err());
        assert!("audio".parse::<LocalCategory>().is_err());
    }

    #[test]
    fn test_best_values_pick_cheapest_and_highest() {
        let mut cheap = test_model("Cheap", ModelCategory::Proprietary, 0.5);
        cheap.speed_tokens = 150.0;
        let mut smart = test_model("Smart", ModelCategory::Proprietary, 30.0);
        smart.benchmark_mmlu = 88.0;
        smart.benchmark_human_eval = 85.0;
        smart.context_window = 128.0;

        let best = best_values(&[&cheap, &smart]);
        assert_eq!(best.cost_per_1m, Some(0.5));
        assert_eq!(best.benchmark_mmlu, Some(88.0));
        assert_eq!(best.benchmark_human_eval, Some(85.0));
        assert_eq!(best.speed_tokens, Some(150.0));
        assert_eq!(best.context_window, Some(128.0));
        assert!(BestValues::is_best(best.cost_per_1m, cheap.cost_per_1m));
        assert!(!BestValues::is_best(best.cost_per_1m, smart.cost_per_1m));
    }

    #[test]
    fn test_best_values_ties_and_empty() {
        let a = test_model("A", ModelCategory::OpenSource, 0.0);
        let b = test_model("B", ModelCategory::OpenSource, 0.0);
        let best = best_values(&[&a, &b]);
        // Both share every metric, so both are best
        assert!(BestValues::is_best(best.cost_per_1m, a.cost_per_1m));
        assert!(BestValues::is_best(best.cost_per_1m, b.cost_per_1m));
        assert!(BestValues::is_best(best.speed_tokens, b.speed_tokens));

        let none = best_values(&[]);
        assert_eq!(none, BestValues::default());
        assert!(!BestValues::is_best(none.cost_per_1m, 0.0));
    }

    #[test]
    fn test_local_fit_filter() {
        let db = ModelDatabase::new(
            vec![],
            vec![
                test_local("small", 4.0, "N/A"),
                test_local("gpu", 8.0, "8GB"),
                test_local("big", 64.0, "40GB"),
            ],
        );

        let with_gpu: Vec<_> = db
            .local_models_fitting_system(16.0, Some(12.0))
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(with_gpu, vec!["small", "gpu"]);

        // CPU only: "gpu" needs its recommended 16 GB
        let cpu_only: Vec<_> = db
            .local_models_fitting_system(12.0, None)
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(cpu_only, vec!["small"]);
    }
}
