use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::currency::CurrencyTable;
use crate::error::{Error, Result};
use crate::models::{AiModel, read_json};
use crate::validate::{self, Diagnostic};

pub const DAYS_PER_MONTH: f64 = 30.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;
const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// A named token/request volume offered as a shortcut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsagePreset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tokens_per_day: u64,
    pub requests_per_day: u64,
}

impl UsagePreset {
    pub fn is_custom(&self) -> bool {
        self.id == "custom"
    }

    pub fn profile(&self) -> UsageProfile {
        UsageProfile {
            tokens_per_day: self.tokens_per_day,
            requests_per_day: self.requests_per_day,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageProfile {
    pub tokens_per_day: u64,
    pub requests_per_day: u64,
}

pub fn monthly_api_cost(tokens_per_day: u64, cost_per_1m: f64) -> f64 {
    let tokens_in_millions = tokens_per_day as f64 * DAYS_PER_MONTH / TOKENS_PER_MILLION;
    cost_per_1m * tokens_in_millions
}

pub fn yearly_api_cost(monthly: f64) -> f64 {
    monthly * MONTHS_PER_YEAR
}

/// Caller must ensure `requests_per_day > 0`; zero yields infinity or NaN.
pub fn cost_per_request(monthly: f64, requests_per_day: u64) -> f64 {
    monthly / (requests_per_day as f64 * DAYS_PER_MONTH)
}

/// Presentation rounding, half away from zero.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Unrounded API spend for one model at one usage profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub model: String,
    pub monthly_cost: f64,
    pub yearly_cost: f64,
    /// `None` when the profile has no requests.
    pub cost_per_request: Option<f64>,
}

impl CostBreakdown {
    pub fn for_model(model: &AiModel, profile: &UsageProfile) -> Self {
        let monthly_cost = monthly_api_cost(profile.tokens_per_day, model.cost_per_1m);
        let cost_per_request = if profile.requests_per_day > 0 {
            Some(cost_per_request(monthly_cost, profile.requests_per_day))
        } else {
            None
        };
        CostBreakdown {
            model: model.name.clone(),
            monthly_cost,
            yearly_cost: yearly_api_cost(monthly_cost),
            cost_per_request,
        }
    }

    pub fn for_models(models: &[&AiModel], profile: &UsageProfile) -> Vec<Self> {
        models.iter().map(|m| Self::for_model(m, profile)).collect()
    }

    /// Cents for monthly/yearly, four places per request.
    pub fn rounded(&self) -> Self {
        CostBreakdown {
            model: self.model.clone(),
            monthly_cost: round_to(self.monthly_cost, 2),
            yearly_cost: round_to(self.yearly_cost, 2),
            cost_per_request: self.cost_per_request.map(|c| round_to(c, 4)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostingKind {
    /// Rented instance billed monthly.
    Cloud { monthly_cloud_cost: f64 },
    /// Bought outright: depreciation plus power and overheads.
    Owned { upfront_cost: f64, monthly_power: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelfHostingHardware {
    pub name: String,
    pub kind: HostingKind,
    pub tokens_per_second: Option<f64>,
}

impl SelfHostingHardware {
    pub fn is_cloud(&self) -> bool {
        matches!(self.kind, HostingKind::Cloud { .. })
    }

    pub fn upfront_cost(&self) -> f64 {
        match self.kind {
            HostingKind::Cloud { .. } => 0.0,
            HostingKind::Owned { upfront_cost, .. } => upfront_cost,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalCosts {
    pub power_cost_per_kwh: f64,
    /// Always > 0 once validated.
    pub depreciation_years: f64,
    pub maintenance_monthly: f64,
    pub internet_monthly: f64,
}

/// Monthly USD cost of running `hardware`.
pub fn self_hosting_monthly_cost(hardware: &SelfHostingHardware, ops: &OperationalCosts) -> f64 {
    match hardware.kind {
        HostingKind::Cloud { monthly_cloud_cost } => monthly_cloud_cost,
        HostingKind::Owned {
            upfront_cost,
            monthly_power,
        } => {
            monthly_power * ops.power_cost_per_kwh
                + upfront_cost / (ops.depreciation_years * MONTHS_PER_YEAR)
                + ops.maintenance_monthly
                + ops.internet_monthly
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelfHostingCost {
    pub name: String,
    pub upfront: f64,
    pub monthly: f64,
    pub yearly: f64,
    pub tokens_per_second: Option<f64>,
    pub is_cloud: bool,
}

impl SelfHostingCost {
    pub fn compute(hardware: &SelfHostingHardware, ops: &OperationalCosts) -> Self {
        let monthly = self_hosting_monthly_cost(hardware, ops);
        SelfHostingCost {
            name: hardware.name.clone(),
            upfront: hardware.upfront_cost(),
            monthly,
            yearly: monthly * MONTHS_PER_YEAR,
            tokens_per_second: hardware.tokens_per_second,
            is_cloud: hardware.is_cloud(),
        }
    }
}

/// Months until self-hosting pays back its upfront cost, or `None` if it
/// never does at these monthly rates.
pub fn break_even_months(upfront: f64, api_monthly: f64, hosting_monthly: f64) -> Option<f64> {
    let savings = api_monthly - hosting_monthly;
    if savings > 0.0 {
        Some(upfront / savings)
    } else {
        None
    }
}

const COST_DATA_JSON: &str = include_str!("../data/cost_calculator.json");

/// Presets, currencies and self-hosting assumptions behind the calculator.
#[derive(Debug, Clone)]
pub struct CostData {
    pub presets: Vec<UsagePreset>,
    pub currencies: CurrencyTable,
    pub hardware: Vec<SelfHostingHardware>,
    pub operational: OperationalCosts,
    pub tips: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CostData {
    pub fn embedded() -> Result<Self> {
        Self::from_value(&serde_json::from_str(COST_DATA_JSON)?)
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_value(&read_json(path)?),
            None => Self::embedded(),
        }
    }

    /// Bad presets, currencies and hardware rows are dropped with a
    /// diagnostic. Missing operational costs or a table without USD make
    /// the whole document unusable.
    pub fn from_value(value: &Value) -> Result<Self> {
        let presets = validate::validate_presets_data(
            value.get("usagePresets").unwrap_or(&Value::Null),
        );
        let (currencies, currency_diagnostics) =
            validate::validate_currencies_data(value.get("currencies").unwrap_or(&Value::Null));
        let self_hosting = value.get("selfHostingCosts").unwrap_or(&Value::Null);
        let hardware =
            validate::validate_self_hosting_data(self_hosting.get("hardware").unwrap_or(&Value::Null));
        let operational = validate::narrow_operational_costs(
            self_hosting.get("operationalCosts").unwrap_or(&Value::Null),
        )
        .ok_or_else(|| Error::InvalidData {
            kind: "cost",
            reason: "operationalCosts missing or depreciationYears not positive".to_string(),
        })?;

        let tips = value
            .get("tips")
            .and_then(Value::as_array)
            .map(|tips| {
                tips.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let mut diagnostics = presets.diagnostics;
        diagnostics.extend(currency_diagnostics);
        diagnostics.extend(hardware.diagnostics);

        Ok(CostData {
            presets: presets.models,
            currencies: CurrencyTable::new(currencies)?,
            hardware: hardware.models,
            operational,
            tips,
            diagnostics,
        })
    }

    pub fn preset(&self, id: &str) -> Result<&UsagePreset> {
        self.presets
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::UnknownPreset(id.to_string()))
    }

    pub fn self_hosting_costs(&self) -> Vec<SelfHostingCost> {
        self.hardware
            .iter()
            .map(|hw| SelfHostingCost::compute(hw, &self.operational))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelCategory;
    use crate::models::tests::test_model;

    fn ops() -> OperationalCosts {
        OperationalCosts {
            power_cost_per_kwh: 0.15,
            depreciation_years: 3.0,
            maintenance_monthly: 20.0,
            internet_monthly: 10.0,
        }
    }

    #[test]
    fn test_monthly_api_cost() {
        assert_eq!(monthly_api_cost(100_000, 30.0), 90.0);
        assert_eq!(monthly_api_cost(500_000, 3.0), 45.0);
        assert_eq!(yearly_api_cost(monthly_api_cost(500_000, 3.0)), 540.0);
    }

    #[test]
    fn test_free_models_cost_nothing() {
        for tokens in [0, 1, 1_000_000, 50_000_000] {
            assert_eq!(monthly_api_cost(tokens, 0.0), 0.0);
        }
    }

    #[test]
    fn test_cost_per_request() {
        // $45/month over 500 requests/day = 15,000 requests
        assert_eq!(cost_per_request(45.0, 500), 0.003);
    }

    #[test]
    fn test_breakdown_guards_zero_requests() {
        let model = test_model("Paid", ModelCategory::Proprietary, 3.0);
        let b = CostBreakdown::for_model(
            &model,
            &UsageProfile {
                tokens_per_day: 500_000,
                requests_per_day: 0,
            },
        );
        assert_eq!(b.monthly_cost, 45.0);
        assert_eq!(b.yearly_cost, 540.0);
        assert_eq!(b.cost_per_request, None);
    }

    #[test]
    fn test_rounding_is_presentation_only() {
        let model = test_model("Odd", ModelCategory::Proprietary, 0.333);
        let raw = CostBreakdown::for_model(
            &model,
            &UsageProfile {
                tokens_per_day: 100_000,
                requests_per_day: 7,
            },
        );
        let rounded = raw.rounded();
        assert_eq!(rounded.monthly_cost, 1.0);
        assert_ne!(raw.monthly_cost, rounded.monthly_cost);
        assert_eq!(rounded.cost_per_request, Some(0.0048));
    }

    #[test]
    fn test_self_hosting_paths() {
        let owned = SelfHostingHardware {
            name: "Box".to_string(),
            kind: HostingKind::Owned {
                upfront_cost: 3600.0,
                monthly_power: 200.0,
            },
            tokens_per_second: Some(50.0),
        };
        // 200 * 0.15 + 3600 / 36 + 20 + 10
        assert!((self_hosting_monthly_cost(&owned, &ops()) - 160.0).abs() < 1e-9);

        let cloud = SelfHostingHardware {
            name: "Rented".to_string(),
            kind: HostingKind::Cloud {
                monthly_cloud_cost: 880.0,
            },
            tokens_per_second: None,
        };
        let cost = SelfHostingCost::compute(&cloud, &ops());
        assert_eq!(cost.monthly, 880.0);
        assert_eq!(cost.yearly, 880.0 * 12.0);
        assert_eq!(cost.upfront, 0.0);
        assert!(cost.is_cloud);
    }

    #[test]
    fn test_break_even() {
        assert_eq!(break_even_months(3000.0, 400.0, 100.0), Some(10.0));
        assert_eq!(break_even_months(3000.0, 100.0, 100.0), None);
        assert_eq!(break_even_months(3000.0, 50.0, 100.0), None);
    }

    #[test]
    fn test_embedded_cost_data() {
        let data = CostData::embedded().unwrap();
        assert!(data.diagnostics.is_empty());
        assert!(!data.presets.is_empty());
        assert!(!data.tips.is_empty());
        assert_eq!(data.preset("startup").unwrap().tokens_per_day, 500_000);
        assert!(data.preset("custom").unwrap().is_custom());
        assert!(matches!(data.preset("nope"), Err(Error::UnknownPreset(_))));
        assert_eq!(data.currencies.get("XYZ").code, "USD");
        assert!(data.self_hosting_costs().iter().all(|c| c.monthly.is_finite()));
    }

    #[test]
    fn test_cost_data_requires_operational_costs() {
        let value = serde_json::json!({
            "usagePresets": [],
            "currencies": { "USD": {
                "symbol": "$", "name": "US Dollar", "code": "USD",
                "rate": 1, "position": "before", "decimalPlaces": 2
            }},
            "selfHostingCosts": { "hardware": [] }
        });
        assert!(matches!(
            CostData::from_value(&value),
            Err(Error::InvalidData { kind: "cost", .. })
        ));
    }
}
