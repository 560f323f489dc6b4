use colored::*;
use tabled::{Table, Tabled, settings::Style};

use crate::cost::{CostBreakdown, SelfHostingCost, UsagePreset, UsageProfile, break_even_months};
use crate::currency::{
    Currency, convert_currency, format_currency, format_currency_with_code, format_small_currency,
};
use crate::hardware::HardwareComparison;
use crate::models::{AiModel, BestValues, LocalModel, best_values};
use crate::recommend::ScoredCandidate;
use crate::saved::SavedComparison;
use crate::system::SystemSpecs;
use crate::validate::Diagnostic;

#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "Model")]
    name: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Type")]
    category: String,
    #[tabled(rename = "Params")]
    params: String,
    #[tabled(rename = "$/1M")]
    cost: String,
    #[tabled(rename = "Tok/s")]
    speed: String,
    #[tabled(rename = "MMLU")]
    mmlu: String,
    #[tabled(rename = "HumanEval")]
    human_eval: String,
    #[tabled(rename = "Context")]
    context: String,
    #[tabled(rename = "Quality")]
    quality: String,
}

impl ModelRow {
    fn from_model(m: &AiModel) -> Self {
        ModelRow {
            name: m.name.clone(),
            provider: m.provider.clone(),
            category: m.category.label().to_string(),
            params: format!("{}B", m.parameters),
            cost: if m.is_free() {
                "free".to_string()
            } else {
                format!("{:.2}", m.cost_per_1m)
            },
            speed: format!("{:.0}", m.speed_tokens),
            mmlu: format!("{:.1}", m.benchmark_mmlu),
            human_eval: format!("{:.1}", m.benchmark_human_eval),
            context: format!("{}K", m.context_window),
            quality: format!("{}/10", m.quality),
        }
    }
}

pub fn display_all_models(models: &[&AiModel]) {
    println!("\n{}", "=== AI Models ===".bold().cyan());
    println!("Total models: {}\n", models.len());

    let rows: Vec<ModelRow> = models.iter().map(|m| ModelRow::from_model(m)).collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
}

pub fn display_search_results(models: &[&AiModel], query: &str) {
    if models.is_empty() {
        println!("\n{}", format!("No models found matching '{}'", query).yellow());
        return;
    }

    println!("\n{}", format!("=== Search Results for '{}' ===", query).bold().cyan());
    println!("Found {} model(s)\n", models.len());

    let rows: Vec<ModelRow> = models.iter().map(|m| ModelRow::from_model(m)).collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
}

#[derive(Tabled)]
struct CapabilityRow {
    #[tabled(rename = "Model")]
    name: String,
    #[tabled(rename = "Clever")]
    cleverness: f64,
    #[tabled(rename = "Coding")]
    coding: f64,
    #[tabled(rename = "Reasoning")]
    reasoning: f64,
    #[tabled(rename = "Creative")]
    creative: f64,
    #[tabled(rename = "Factual")]
    factual: f64,
    #[tabled(rename = "Math")]
    math: f64,
}

fn mark_best(cell: String, best: Option<f64>, value: f64) -> String {
    if BestValues::is_best(best, value) {
        cell.bold().green().to_string()
    } else {
        cell
    }
}

/// Best value per metric is shown in bold green.
pub fn display_comparison(models: &[&AiModel]) {
    println!("\n{}", "=== Model Comparison ===".bold().cyan());
    let best = best_values(models);
    let rows: Vec<ModelRow> = models
        .iter()
        .map(|m| {
            let mut row = ModelRow::from_model(m);
            row.cost = mark_best(row.cost, best.cost_per_1m, m.cost_per_1m);
            row.speed = mark_best(row.speed, best.speed_tokens, m.speed_tokens);
            row.mmlu = mark_best(row.mmlu, best.benchmark_mmlu, m.benchmark_mmlu);
            row.human_eval = mark_best(row.human_eval, best.benchmark_human_eval, m.benchmark_human_eval);
            row.context = mark_best(row.context, best.context_window, m.context_window);
            row
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));

    println!("\n{}", "Capabilities (0-10)".bold().underline());
    let caps: Vec<CapabilityRow> = models
        .iter()
        .map(|m| CapabilityRow {
            name: m.name.clone(),
            cleverness: m.capabilities.cleverness,
            coding: m.capabilities.coding,
            reasoning: m.capabilities.reasoning,
            creative: m.capabilities.creative,
            factual: m.capabilities.factual,
            math: m.capabilities.math,
        })
        .collect();
    println!("{}", Table::new(caps).with(Style::rounded()));

    for m in models {
        if let Some(hw) = &m.hardware_required {
            println!(
                "  {}: {} VRAM, {} RAM, {} disk ({})",
                m.name.bold(),
                hw.min_vram,
                hw.min_ram,
                hw.storage_size,
                hw.recommended_gpu
            );
        }
    }
}

#[derive(Tabled)]
struct LocalRow {
    #[tabled(rename = "Fits")]
    fits: String,
    #[tabled(rename = "Model")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Params")]
    params: String,
    #[tabled(rename = "RAM min/rec")]
    ram: String,
    #[tabled(rename = "VRAM")]
    vram: String,
    #[tabled(rename = "Disk")]
    storage: String,
    #[tabled(rename = "Quant")]
    quant: String,
    #[tabled(rename = "Features")]
    features: String,
}

/// `fitting` marks rows that run on the detected system, when known.
pub fn display_local_models(models: &[&LocalModel], fitting: Option<&[&LocalModel]>) {
    println!("\n{}", "=== Local Models ===".bold().cyan());
    println!("Total models: {}\n", models.len());

    let rows: Vec<LocalRow> = models
        .iter()
        .map(|m| LocalRow {
            fits: match fitting {
                Some(fit) if fit.iter().any(|f| f.name == m.name) => "yes".to_string(),
                Some(_) => "no".to_string(),
                None => "-".to_string(),
            },
            name: m.name.clone(),
            category: m.category.label().to_string(),
            params: format!("{}B", m.parameters),
            ram: format!("{:.0}/{:.0} GB", m.min_ram, m.recommended_ram),
            vram: m.min_vram.clone(),
            storage: m.storage_size.clone(),
            quant: m.quantization.clone(),
            features: m.features.join(", "),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
}

pub fn display_system(specs: &SystemSpecs) {
    println!("\n{}", "=== System Specifications ===".bold().cyan());
    println!("{}", specs.summary());
}

pub fn display_recommendations(results: &[ScoredCandidate]) {
    if results.is_empty() {
        println!(
            "\n{}",
            "No models match these answers. Try a wider budget or deployment.".yellow()
        );
        return;
    }

    println!("\n{}", "=== Recommended Models ===".bold().cyan());
    for (rank, c) in results.iter().enumerate() {
        println!(
            "\n{} {} {}",
            format!("#{}", rank + 1).bold(),
            c.name.bold().green(),
            format!("(score {:.1})", c.score).dimmed()
        );
        println!(
            "   {} | {} | ${:.2}/1M | {}K context",
            c.model.provider,
            c.model.category.label(),
            c.model.cost_per_1m,
            c.model.context_window
        );
        for reason in &c.reasons {
            println!("   {} {}", "+".green(), reason);
        }
    }
    println!();
}

#[derive(Tabled)]
struct CostRow {
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Monthly")]
    monthly: String,
    #[tabled(rename = "Yearly")]
    yearly: String,
    #[tabled(rename = "Per Request")]
    per_request: String,
}

pub fn display_costs(costs: &[CostBreakdown], profile: &UsageProfile, currency: &Currency) {
    println!("\n{}", "=== API Cost Estimate ===".bold().cyan());
    println!(
        "{} tokens/day, {} requests/day, in {}\n",
        profile.tokens_per_day, profile.requests_per_day, currency.code
    );

    let rows: Vec<CostRow> = costs
        .iter()
        .map(|c| CostRow {
            model: c.model.clone(),
            monthly: format_currency(convert_currency(c.monthly_cost, currency), currency),
            yearly: format_currency(convert_currency(c.yearly_cost, currency), currency),
            per_request: c
                .cost_per_request
                .map(|r| format_small_currency(r, currency))
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));

    if let Some(cheapest) = costs
        .iter()
        .min_by(|a, b| a.monthly_cost.total_cmp(&b.monthly_cost))
    {
        println!(
            "Cheapest: {} at {}/month",
            cheapest.model.bold(),
            format_currency_with_code(convert_currency(cheapest.monthly_cost, currency), currency)
        );
    }
}

#[derive(Tabled)]
struct HostingRow {
    #[tabled(rename = "Hardware")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Upfront")]
    upfront: String,
    #[tabled(rename = "Monthly")]
    monthly: String,
    #[tabled(rename = "Yearly")]
    yearly: String,
    #[tabled(rename = "Tok/s")]
    speed: String,
    #[tabled(rename = "Break-even")]
    break_even: String,
}

/// `api_monthly` is the USD API spend to compare against, if any.
pub fn display_self_hosting(costs: &[SelfHostingCost], currency: &Currency, api_monthly: Option<f64>) {
    println!("\n{}", "=== Self-Hosting Costs ===".bold().cyan());

    let convert = |usd: f64| format_currency(convert_currency(usd, currency), currency);
    let rows: Vec<HostingRow> = costs
        .iter()
        .map(|c| HostingRow {
            name: c.name.clone(),
            kind: (if c.is_cloud { "cloud" } else { "owned" }).to_string(),
            upfront: convert(c.upfront),
            monthly: convert(c.monthly),
            yearly: convert(c.yearly),
            speed: c
                .tokens_per_second
                .map(|t| format!("{:.0}", t))
                .unwrap_or_else(|| "-".to_string()),
            break_even: match api_monthly.map(|api| break_even_months(c.upfront, api, c.monthly)) {
                Some(Some(months)) => format!("{:.1} months", months),
                Some(None) => "never".to_string(),
                None => "-".to_string(),
            },
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    println!(
        "{}",
        "Self-hosting becomes cost-effective when monthly API costs exceed the hardware's monthly cost."
            .dimmed()
    );
}

#[derive(Tabled)]
struct HardwareRow {
    #[tabled(rename = "Hardware")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Bandwidth")]
    bandwidth: String,
    #[tabled(rename = "Power")]
    power: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "$/GB")]
    price_per_gb: String,
}

pub fn display_hardware(bundle: &HardwareComparison) {
    if bundle.specs.is_empty() {
        println!("\n{}", "No hardware data available.".yellow());
        return;
    }

    println!("\n{}", "=== Hardware Comparison ===".bold().cyan());
    let rows: Vec<HardwareRow> = bundle
        .by_price_per_gb()
        .into_iter()
        .map(|h| HardwareRow {
            name: h.name.clone(),
            category: h.category.label().to_string(),
            memory: format!("{:.0} GB", h.memory),
            bandwidth: format!("{:.0} GB/s", h.bandwidth),
            power: format!("{:.0} W", h.power),
            price: format!("${:.0}", h.price),
            price_per_gb: format!("{:.2}", h.price_per_gb),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));

    if !bundle.performance_data.is_empty() {
        println!("\n{}", "Tokens/sec by model".bold().underline());
        for perf in &bundle.performance_data {
            let cells: Vec<String> = bundle
                .all_hardware
                .iter()
                .map(|hw| match perf.tokens_per_second(&hw.id) {
                    Some(tps) => format!("{}: {:.0}", hw.name, tps),
                    None => format!("{}: n/a", hw.name),
                })
                .collect();
            println!("  {}  {}", perf.model.bold(), cells.join(" | "));
        }
    }
}

pub fn display_presets(presets: &[UsagePreset]) {
    println!("\n{}", "=== Usage Presets ===".bold().cyan());
    for p in presets {
        if p.is_custom() {
            println!("  {:<12} {}", p.id.bold(), p.description);
        } else {
            println!(
                "  {:<12} {} ({}K tokens/day, {} requests/day)",
                p.id.bold(),
                p.description,
                p.tokens_per_day / 1000,
                p.requests_per_day
            );
        }
    }
}

pub fn display_saved(list: &[SavedComparison]) {
    if list.is_empty() {
        println!("\n{}", "No saved comparisons.".yellow());
        return;
    }
    println!("\n{}", "=== Saved Comparisons ===".bold().cyan());
    for c in list {
        println!(
            "  {} {} {}",
            c.name.bold(),
            c.models.join(", "),
            c.date.format("%Y-%m-%d %H:%M").to_string().dimmed()
        );
    }
}

pub fn display_validation_report(kind: &str, accepted: usize, diagnostics: &[Diagnostic]) {
    let status = if diagnostics.is_empty() {
        "OK".green().bold()
    } else {
        "ISSUES".yellow().bold()
    };
    println!(
        "\n{} {}: {} accepted, {} rejected",
        status,
        kind,
        accepted,
        diagnostics.len()
    );
    for d in diagnostics {
        println!("  {} {}", "-".red(), d);
    }
}
