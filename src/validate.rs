//! Shape checks that sit between raw JSON and the typed domain.
//!
//! `serde_json::Value` is only allowed to exist here. Every function is
//! total: bad input yields `false` or an empty collection plus diagnostics,
//! never an error or a panic.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::cost::{HostingKind, OperationalCosts, SelfHostingHardware, UsagePreset};
use crate::currency::Currency;
use crate::hardware::HardwareComparison;
use crate::models::{AiModel, Capabilities, LocalCategory, LocalModel};

/// One rejected record or structure, as logged.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: &'static str,
    /// Position in the source array, when the problem is a single element.
    pub index: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    fn structure(kind: &'static str, message: impl Into<String>) -> Self {
        let d = Diagnostic {
            kind,
            index: None,
            message: message.into(),
        };
        tracing::error!(kind, message = %d.message, "invalid data structure");
        d
    }

    fn element(kind: &'static str, index: usize, record: &Value, message: impl Into<String>) -> Self {
        let d = Diagnostic {
            kind,
            index: Some(index),
            message: message.into(),
        };
        tracing::error!(kind, index, message = %d.message, record = %record, "invalid record");
        d
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{} at index {}: {}", self.kind, i, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// Accepted records in source order, plus what was rejected.
#[derive(Debug, Clone)]
pub struct ValidatedModels<T> {
    pub models: Vec<T>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Default for ValidatedModels<T> {
    fn default() -> Self {
        ValidatedModels {
            models: Vec::new(),
            diagnostics: Vec::new(),
        }
    }
}

fn is_str(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).is_some_and(Value::is_string)
}

fn is_num(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).is_some_and(Value::is_number)
}

fn is_positive_num(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_f64).is_some_and(|v| v > 0.0)
}

fn has_capabilities(obj: &Map<String, Value>) -> bool {
    match obj.get("capabilities").and_then(Value::as_object) {
        Some(caps) => Capabilities::FIELDS.iter().all(|f| is_num(caps, f)),
        None => false,
    }
}

fn has_hardware_requirements(obj: &Map<String, Value>) -> bool {
    match obj.get("hardwareRequired") {
        None | Some(Value::Null) => true,
        Some(Value::Object(hw)) => ["minVRAM", "recommendedGPU", "minRAM", "storageSize"]
            .iter()
            .all(|f| is_str(hw, f)),
        Some(_) => false,
    }
}

/// Hosted/open-weights model record predicate.
pub fn validate_ai_model(model: &Value) -> bool {
    let Some(obj) = model.as_object() else {
        return false;
    };
    is_str(obj, "name")
        && is_str(obj, "provider")
        && matches!(
            obj.get("category").and_then(Value::as_str),
            Some("Proprietary") | Some("Open Source")
        )
        && [
            "parameters",
            "costPer1M",
            "speedTokens",
            "benchmarkMMLU",
            "benchmarkHumanEval",
            "contextWindow",
            "quality",
        ]
        .iter()
        .all(|f| is_num(obj, f))
        && is_str(obj, "color")
        && has_capabilities(obj)
        && has_hardware_requirements(obj)
}

/// Local model record predicate.
pub fn validate_local_model(model: &Value) -> bool {
    let Some(obj) = model.as_object() else {
        return false;
    };
    is_str(obj, "name")
        && is_str(obj, "provider")
        && is_num(obj, "parameters")
        && obj
            .get("category")
            .and_then(Value::as_str)
            .is_some_and(|c| LocalCategory::ALL.contains(&c))
        && is_num(obj, "minRAM")
        && is_num(obj, "recommendedRAM")
        && is_str(obj, "color")
        && obj
            .get("features")
            .and_then(Value::as_array)
            .is_some_and(|fs| fs.iter().all(Value::is_string))
}

/// Filter `data[field]` element-wise through `predicate`, then narrow each
/// accepted element to `T`.
fn validate_collection<T: DeserializeOwned>(
    data: &Value,
    field: &str,
    kind: &'static str,
    predicate: fn(&Value) -> bool,
) -> ValidatedModels<T> {
    let Some(items) = data.get(field).and_then(Value::as_array) else {
        return ValidatedModels {
            models: Vec::new(),
            diagnostics: vec![Diagnostic::structure(
                kind,
                format!("expected an object with a `{}` array", field),
            )],
        };
    };

    let mut out = ValidatedModels::default();
    for (index, item) in items.iter().enumerate() {
        if !predicate(item) {
            out.diagnostics
                .push(Diagnostic::element(kind, index, item, "missing or mistyped fields"));
            continue;
        }
        match serde_json::from_value::<T>(item.clone()) {
            Ok(model) => out.models.push(model),
            Err(e) => out
                .diagnostics
                .push(Diagnostic::element(kind, index, item, e.to_string())),
        }
    }
    out
}

pub fn validate_ai_models_data(data: &Value) -> ValidatedModels<AiModel> {
    validate_collection(data, "models", "AI model", validate_ai_model)
}

pub fn validate_local_models_data(data: &Value) -> ValidatedModels<LocalModel> {
    validate_collection(data, "models", "local model", validate_local_model)
}

#[derive(Debug, Clone, Default)]
pub struct ValidatedHardware {
    pub data: HardwareComparison,
    pub diagnostics: Vec<Diagnostic>,
}

/// All-or-nothing: if any of the three arrays is missing or malformed the
/// whole bundle is replaced with three empty arrays.
pub fn validate_hardware_data(data: &Value) -> ValidatedHardware {
    const KIND: &str = "hardware";

    if data.is_null() {
        return ValidatedHardware {
            data: HardwareComparison::default(),
            diagnostics: vec![Diagnostic::structure(KIND, "hardware data is null")],
        };
    }

    let errors: Vec<&str> = ["allHardware", "performanceData", "specs"]
        .into_iter()
        .filter(|field| !data.get(*field).is_some_and(Value::is_array))
        .collect();
    if !errors.is_empty() {
        let message = errors
            .iter()
            .map(|f| format!("{} is not an array", f))
            .collect::<Vec<_>>()
            .join(", ");
        return ValidatedHardware {
            data: HardwareComparison::default(),
            diagnostics: vec![Diagnostic::structure(KIND, message)],
        };
    }

    match serde_json::from_value::<HardwareComparison>(data.clone()) {
        Ok(bundle) => ValidatedHardware {
            data: bundle,
            diagnostics: Vec::new(),
        },
        Err(e) => ValidatedHardware {
            data: HardwareComparison::default(),
            diagnostics: vec![Diagnostic::structure(KIND, e.to_string())],
        },
    }
}

pub fn validate_usage_preset(preset: &Value) -> bool {
    let Some(obj) = preset.as_object() else {
        return false;
    };
    is_str(obj, "id")
        && is_str(obj, "name")
        && is_str(obj, "description")
        && obj.get("tokensPerDay").is_some_and(Value::is_u64)
        && obj.get("requestsPerDay").is_some_and(Value::is_u64)
}

pub fn validate_currency(currency: &Value) -> bool {
    let Some(obj) = currency.as_object() else {
        return false;
    };
    is_str(obj, "symbol")
        && is_str(obj, "name")
        && is_str(obj, "code")
        && is_positive_num(obj, "rate")
        && matches!(
            obj.get("position").and_then(Value::as_str),
            Some("before") | Some("after")
        )
        && obj.get("decimalPlaces").is_some_and(Value::is_u64)
}

/// Owned hardware needs numeric `upfrontCost` and `monthlyPower`; cloud
/// hardware only needs a name.
pub fn validate_self_hosting_hardware(hardware: &Value) -> bool {
    let Some(obj) = hardware.as_object() else {
        return false;
    };
    if !is_str(obj, "name") {
        return false;
    }
    let optional_num = |key: &str| obj.get(key).is_none_or(Value::is_number);
    let is_cloud = obj.get("isCloud").and_then(Value::as_bool).unwrap_or(false);
    if is_cloud {
        optional_num("monthlyCloudCost") && optional_num("tokensPerSecond")
    } else {
        is_num(obj, "upfrontCost") && is_num(obj, "monthlyPower") && optional_num("tokensPerSecond")
    }
}

pub fn validate_operational_costs(costs: &Value) -> bool {
    let Some(obj) = costs.as_object() else {
        return false;
    };
    is_num(obj, "powerCostPerKwh")
        && is_positive_num(obj, "depreciationYears")
        && is_num(obj, "maintenanceMonthly")
        && is_num(obj, "internetMonthly")
}

pub fn validate_presets_data(items: &Value) -> ValidatedModels<UsagePreset> {
    let wrapped = serde_json::json!({ "usagePresets": items });
    validate_collection(&wrapped, "usagePresets", "usage preset", validate_usage_preset)
}

/// Narrow self-hosting hardware records into [`SelfHostingHardware`].
pub fn validate_self_hosting_data(items: &Value) -> ValidatedModels<SelfHostingHardware> {
    const KIND: &str = "self-hosting hardware";

    let Some(items) = items.as_array() else {
        return ValidatedModels {
            models: Vec::new(),
            diagnostics: vec![Diagnostic::structure(KIND, "expected an array")],
        };
    };

    let mut out = ValidatedModels::default();
    for (index, item) in items.iter().enumerate() {
        if !validate_self_hosting_hardware(item) {
            out.diagnostics
                .push(Diagnostic::element(KIND, index, item, "missing or mistyped cost fields"));
            continue;
        }
        let num = |key: &str| item.get(key).and_then(Value::as_f64);
        let is_cloud = item.get("isCloud").and_then(Value::as_bool).unwrap_or(false);
        let kind = if is_cloud {
            HostingKind::Cloud {
                monthly_cloud_cost: num("monthlyCloudCost").unwrap_or(0.0),
            }
        } else {
            // validated above
            HostingKind::Owned {
                upfront_cost: num("upfrontCost").unwrap_or_default(),
                monthly_power: num("monthlyPower").unwrap_or_default(),
            }
        };
        out.models.push(SelfHostingHardware {
            name: item
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            kind,
            tokens_per_second: num("tokensPerSecond"),
        });
    }
    out
}

pub fn narrow_operational_costs(costs: &Value) -> Option<OperationalCosts> {
    if !validate_operational_costs(costs) {
        return None;
    }
    serde_json::from_value(costs.clone()).ok()
}

/// Narrow a currency table, dropping malformed entries.
pub fn validate_currencies_data(table: &Value) -> (Vec<Currency>, Vec<Diagnostic>) {
    const KIND: &str = "currency";

    let Some(obj) = table.as_object() else {
        return (
            Vec::new(),
            vec![Diagnostic::structure(KIND, "expected an object keyed by currency code")],
        );
    };

    let mut currencies = Vec::new();
    let mut diagnostics = Vec::new();
    for (index, (code, entry)) in obj.iter().enumerate() {
        if !validate_currency(entry) {
            diagnostics.push(Diagnostic::element(KIND, index, entry, format!("{} is malformed", code)));
            continue;
        }
        match serde_json::from_value::<Currency>(entry.clone()) {
            // The table key is authoritative; a mismatched code could
            // shadow another entry, USD included
            Ok(c) if c.code != *code => diagnostics.push(Diagnostic::element(
                KIND,
                index,
                entry,
                format!("{} entry has code {}", code, c.code),
            )),
            Ok(c) => currencies.push(c),
            Err(e) => diagnostics.push(Diagnostic::element(KIND, index, entry, e.to_string())),
        }
    }
    (currencies, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_record() -> Value {
        json!({
            "name": "Test Model",
            "provider": "Test",
            "category": "Open Source",
            "parameters": 7,
            "costPer1M": 0,
            "speedTokens": 50,
            "benchmarkMMLU": 70.5,
            "benchmarkHumanEval": 60,
            "contextWindow": 32,
            "quality": 7,
            "color": "#123456",
            "capabilities": {
                "cleverness": 7, "coding": 7, "reasoning": 7,
                "creative": 7, "factual": 7, "math": 7
            },
            "hardwareRequired": null
        })
    }

    #[test]
    fn test_ai_model_predicate() {
        assert!(validate_ai_model(&valid_record()));
        assert!(!validate_ai_model(&Value::Null));
        assert!(!validate_ai_model(&json!("GPT-4")));
        assert!(!validate_ai_model(&json!({ "name": "X" })));

        let mut bad_category = valid_record();
        bad_category["category"] = json!("OpenSource");
        assert!(!validate_ai_model(&bad_category));

        let mut stringly = valid_record();
        stringly["costPer1M"] = json!("5");
        assert!(!validate_ai_model(&stringly));

        let mut no_hw = valid_record();
        no_hw.as_object_mut().unwrap().remove("hardwareRequired");
        assert!(validate_ai_model(&no_hw));
    }

    #[test]
    fn test_null_collection() {
        let result = validate_ai_models_data(&Value::Null);
        assert!(result.models.is_empty());
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].index, None);
    }

    #[test]
    fn test_collection_keeps_valid_in_order() {
        let mut second = valid_record();
        second["name"] = json!("Second");
        let data = json!({ "models": [valid_record(), { "name": "X" }, second] });

        let result = validate_ai_models_data(&data);
        let names: Vec<_> = result.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Test Model", "Second"]);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].index, Some(1));
    }

    #[test]
    fn test_models_field_must_be_array() {
        let result = validate_ai_models_data(&json!({ "models": {} }));
        assert!(result.models.is_empty());
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn test_local_model_predicate() {
        let record = json!({
            "name": "phi3:mini",
            "provider": "Microsoft",
            "parameters": 3.8,
            "category": "General",
            "minRAM": 4,
            "recommendedRAM": 8,
            "color": "#00a4ef",
            "features": ["CPU friendly"]
        });
        assert!(validate_local_model(&record));

        let result = validate_local_models_data(&json!({ "models": [record.clone()] }));
        assert_eq!(result.models.len(), 1);
        assert_eq!(result.models[0].min_vram, "N/A");

        let mut bad = record.clone();
        bad["features"] = json!("CPU friendly");
        assert!(!validate_local_model(&bad));

        let mut bad = record;
        bad["category"] = json!("Gaming");
        assert!(!validate_local_model(&bad));
    }

    #[test]
    fn test_hardware_bundle_all_or_nothing() {
        let result = validate_hardware_data(&Value::Null);
        assert!(result.data.all_hardware.is_empty());
        assert!(result.data.performance_data.is_empty());
        assert!(result.data.specs.is_empty());
        assert_eq!(result.diagnostics.len(), 1);

        let partial = json!({ "allHardware": [], "performanceData": [], "specs": "nope" });
        let result = validate_hardware_data(&partial);
        assert!(result.data.specs.is_empty());
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].message.contains("specs"));

        let ok = json!({
            "allHardware": [{ "id": "a", "name": "A", "color": "#000000" }],
            "performanceData": [{ "model": "M", "a": 10 }],
            "specs": []
        });
        let result = validate_hardware_data(&ok);
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.data.all_hardware.len(), 1);
        assert_eq!(result.data.performance_data[0].tokens_per_second("a"), Some(10.0));
    }

    #[test]
    fn test_self_hosting_records() {
        let items = json!([
            { "name": "Box", "upfrontCost": 3000, "monthlyPower": 200 },
            { "name": "Broken box", "upfrontCost": 3000 },
            { "name": "Cloud", "isCloud": true },
            { "name": "Cloud 2", "isCloud": true, "monthlyCloudCost": 500 }
        ]);
        let result = validate_self_hosting_data(&items);
        assert_eq!(result.models.len(), 3);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].index, Some(1));
        assert_eq!(
            result.models[1].kind,
            HostingKind::Cloud { monthly_cloud_cost: 0.0 }
        );
    }

    #[test]
    fn test_operational_costs_need_positive_depreciation() {
        let good = json!({
            "powerCostPerKwh": 0.15, "depreciationYears": 3,
            "maintenanceMonthly": 20, "internetMonthly": 10
        });
        assert!(narrow_operational_costs(&good).is_some());

        let mut zero = good.clone();
        zero["depreciationYears"] = json!(0);
        assert!(narrow_operational_costs(&zero).is_none());
    }

    #[test]
    fn test_currency_predicate() {
        let usd = json!({
            "symbol": "$", "name": "US Dollar", "code": "USD",
            "rate": 1, "position": "before", "decimalPlaces": 2
        });
        assert!(validate_currency(&usd));

        let mut bad = usd.clone();
        bad["rate"] = json!(0);
        assert!(!validate_currency(&bad));

        let mut bad = usd;
        bad["position"] = json!("middle");
        assert!(!validate_currency(&bad));
    }

    #[test]
    fn test_currency_code_must_match_key() {
        let table = json!({
            "USD": { "symbol": "$", "name": "US Dollar", "code": "USD", "rate": 1, "position": "before", "decimalPlaces": 2 },
            "EUR": { "symbol": "€", "name": "Euro", "code": "USD", "rate": 0.92, "position": "before", "decimalPlaces": 2 }
        });
        let (currencies, diagnostics) = validate_currencies_data(&table);

        assert_eq!(currencies.len(), 1);
        assert_eq!(currencies[0].code, "USD");
        assert_eq!(currencies[0].rate, 1.0);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("EUR"));
    }
}
