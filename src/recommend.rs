//! Questionnaire-driven model recommendation.
//!
//! Each candidate starts at zero and passes through five rule groups in a
//! fixed order: use case, budget, priority, context, deployment. Every group
//! adds to the score and may append a reason. `Budget::Free` is the one
//! exception: a paid model has its score reset to zero, wiping out what the
//! use-case group already added, and the remaining groups are skipped so
//! nothing can lift it back above zero. Candidates at or below zero are
//! dropped.
//!
//! Capability sub-scores are on a 0-10 scale (see [`Capabilities`]).
//!
//! [`Capabilities`]: crate::models::Capabilities

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{AiModel, ModelCategory};

/// Number of candidates returned by [`recommend`].
pub const TOP_N: usize = 5;

/// Generates a questionnaire enum with its wire value and menu label.
macro_rules! answer_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => ($value:literal, $label:literal)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn value(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// `None` for anything outside the option list.
            pub fn from_answer(value: &str) -> Option<Self> {
                match value {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.value())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_answer(s).ok_or_else(|| {
                    let options: Vec<&str> = Self::ALL.iter().map(|v| v.value()).collect();
                    format!("expected one of: {}", options.join(", "))
                })
            }
        }
    };
}

answer_enum!(
    /// What the model is primarily for.
    UseCase {
        Coding => ("coding", "Software Development & Coding"),
        Chat => ("chat", "Conversational AI / Chatbot"),
        Writing => ("writing", "Content Creation & Writing"),
        Analysis => ("analysis", "Data Analysis & Research"),
        Support => ("support", "Customer Support"),
        Reasoning => ("reasoning", "Complex Reasoning & Problem Solving"),
    }
);

answer_enum!(
    Budget {
        Free => ("free", "Free / Open Source Only"),
        Low => ("low", "Budget-Conscious (under $5/1M tokens)"),
        Medium => ("medium", "Moderate ($5-15/1M tokens)"),
        High => ("high", "Premium Performance"),
    }
);

answer_enum!(
    Priority {
        Speed => ("speed", "Speed & Low Latency"),
        Quality => ("quality", "Output Quality"),
        Balance => ("balance", "Balanced"),
        Cost => ("cost", "Cost Efficiency"),
    }
);

answer_enum!(
    ContextNeeds {
        Small => ("small", "Small Context (8-32K)"),
        Medium => ("medium", "Medium Context (32-128K)"),
        Large => ("large", "Large Context (128K+)"),
    }
);

answer_enum!(
    Deployment {
        Cloud => ("cloud", "Cloud API"),
        Local => ("local", "Self-Hosted"),
        Either => ("either", "No Preference"),
    }
);

/// Five raw answers exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnswers {
    pub use_case: String,
    pub budget: String,
    pub priority: String,
    pub context_needs: String,
    pub deployment: String,
}

/// A completed questionnaire. `None` means the submitted value was not one
/// of the options; that rule group then contributes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answers {
    pub use_case: Option<UseCase>,
    pub budget: Option<Budget>,
    pub priority: Option<Priority>,
    pub context_needs: Option<ContextNeeds>,
    pub deployment: Option<Deployment>,
}

impl Answers {
    pub fn new(
        use_case: UseCase,
        budget: Budget,
        priority: Priority,
        context_needs: ContextNeeds,
        deployment: Deployment,
    ) -> Self {
        Answers {
            use_case: Some(use_case),
            budget: Some(budget),
            priority: Some(priority),
            context_needs: Some(context_needs),
            deployment: Some(deployment),
        }
    }

    pub fn from_raw(raw: &RawAnswers) -> Self {
        Answers {
            use_case: UseCase::from_answer(&raw.use_case),
            budget: Budget::from_answer(&raw.budget),
            priority: Priority::from_answer(&raw.priority),
            context_needs: ContextNeeds::from_answer(&raw.context_needs),
            deployment: Deployment::from_answer(&raw.deployment),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub name: String,
    pub score: f64,
    pub reasons: Vec<String>,
    pub model: AiModel,
}

/// Running total for one candidate while the rule groups are applied.
struct Tally {
    score: f64,
    reasons: Vec<String>,
    excluded: bool,
}

impl Tally {
    fn add(&mut self, delta: f64) {
        self.score += delta;
    }

    fn reason(&mut self, reason: &str) {
        self.reasons.push(reason.to_string());
    }
}

fn score_use_case(model: &AiModel, use_case: UseCase, t: &mut Tally) {
    let caps = &model.capabilities;
    match use_case {
        UseCase::Coding => {
            t.add(caps.coding * 15.0);
            if caps.coding >= 9.0 {
                t.reason("Excellent coding capabilities");
            }
            t.add(model.benchmark_human_eval * 0.5);
        }
        UseCase::Chat => {
            t.add(caps.creative * 10.0);
            t.add(caps.factual * 10.0);
            if model.context_window >= 32.0 {
                t.reason("Good context for conversations");
            }
        }
        UseCase::Writing => {
            t.add(caps.creative * 15.0);
            t.add(caps.cleverness * 10.0);
            if caps.creative >= 9.0 {
                t.reason("Strong creative writing skills");
            }
        }
        UseCase::Analysis => {
            t.add(caps.reasoning * 15.0);
            t.add(caps.factual * 10.0);
            t.add(caps.math * 10.0);
            if model.benchmark_mmlu >= 85.0 {
                t.reason("High benchmark scores for analysis");
            }
        }
        UseCase::Support => {
            t.add(caps.factual * 15.0);
            t.add(model.speed_tokens * 0.3);
            if model.speed_tokens >= 80.0 {
                t.reason("Fast response times for customers");
            }
        }
        UseCase::Reasoning => {
            t.add(caps.reasoning * 20.0);
            t.add(caps.math * 10.0);
            if caps.reasoning >= 9.0 {
                t.reason("Exceptional reasoning abilities");
            }
        }
    }
}

fn score_budget(model: &AiModel, budget: Budget, t: &mut Tally) {
    match budget {
        Budget::Free => {
            if model.cost_per_1m == 0.0 {
                t.add(100.0);
                t.reason("Completely free to use");
            } else {
                // Hard exclusion: discards everything accumulated so far
                t.score = 0.0;
                t.excluded = true;
            }
        }
        Budget::Low => {
            if model.cost_per_1m <= 5.0 {
                t.add(50.0);
                t.reason("Budget-friendly pricing");
            } else {
                t.add(-30.0);
            }
        }
        Budget::Medium => {
            if model.cost_per_1m > 5.0 && model.cost_per_1m <= 15.0 {
                t.add(30.0);
            }
        }
        Budget::High => {
            t.add(model.quality * 10.0);
            if model.quality >= 9.0 {
                t.reason("Premium quality model");
            }
        }
    }
}

fn score_priority(model: &AiModel, priority: Priority, t: &mut Tally) {
    match priority {
        Priority::Speed => {
            t.add(model.speed_tokens * 0.8);
            if model.speed_tokens >= 100.0 {
                t.reason("Very fast inference speed");
            }
        }
        Priority::Quality => {
            t.add(model.quality * 15.0);
            t.add(model.benchmark_mmlu * 0.5);
        }
        Priority::Balance => t.add(model.speed_tokens * 0.3 + model.quality * 8.0),
        Priority::Cost => {
            if model.cost_per_1m == 0.0 {
                t.add(80.0);
            } else {
                t.add((100.0 / model.cost_per_1m) * 5.0);
            }
        }
    }
}

fn score_context(model: &AiModel, context: ContextNeeds, t: &mut Tally) {
    let window = model.context_window;
    match context {
        ContextNeeds::Small => {
            if window >= 8.0 {
                t.add(20.0);
            }
        }
        ContextNeeds::Medium => {
            if (32.0..128.0).contains(&window) {
                t.add(30.0);
            } else if window >= 32.0 {
                t.add(20.0);
            }
        }
        ContextNeeds::Large => {
            if window >= 128.0 {
                t.add(50.0);
                t.reason("Large context window for long documents");
            }
        }
    }
}

fn score_deployment(model: &AiModel, deployment: Deployment, t: &mut Tally) {
    match deployment {
        Deployment::Cloud => {
            if model.category == ModelCategory::Proprietary {
                t.add(30.0);
                t.reason("Easy cloud API access");
            }
        }
        Deployment::Local => {
            if model.category == ModelCategory::OpenSource {
                t.add(40.0);
                t.reason("Can be self-hosted for privacy");
            }
        }
        Deployment::Either => t.add(10.0),
    }
}

/// Score one candidate. The rule-group order matters; see the module docs.
pub fn score_model(model: &AiModel, answers: &Answers) -> ScoredCandidate {
    let mut tally = Tally {
        score: 0.0,
        reasons: Vec::new(),
        excluded: false,
    };

    if let Some(use_case) = answers.use_case {
        score_use_case(model, use_case, &mut tally);
    }
    if let Some(budget) = answers.budget {
        score_budget(model, budget, &mut tally);
    }
    if tally.excluded {
        return ScoredCandidate {
            name: model.name.clone(),
            score: 0.0,
            reasons: tally.reasons,
            model: model.clone(),
        };
    }
    if let Some(priority) = answers.priority {
        score_priority(model, priority, &mut tally);
    }
    if let Some(context) = answers.context_needs {
        score_context(model, context, &mut tally);
    }
    if let Some(deployment) = answers.deployment {
        score_deployment(model, deployment, &mut tally);
    }

    ScoredCandidate {
        name: model.name.clone(),
        score: tally.score,
        reasons: tally.reasons,
        model: model.clone(),
    }
}

/// Score every model, drop non-positive scores, and return the best
/// [`TOP_N`] highest first. Equal scores keep catalog order.
pub fn recommend(models: &[AiModel], answers: &Answers) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = models
        .iter()
        .map(|m| score_model(m, answers))
        .filter(|c| c.score > 0.0)
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(TOP_N);

    tracing::debug!(
        candidates = models.len(),
        returned = scored.len(),
        top = scored.first().map(|c| c.name.as_str()),
        "scored recommendations"
    );
    scored
}
