mod tui_app;
mod tui_events;
mod tui_ui;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use aicompare::cost::{CostBreakdown, CostData, UsageProfile};
use aicompare::currency::{Currency, CurrencyTable, get_currency};
use aicompare::display;
use aicompare::hardware::HardwareComparison;
use aicompare::models::{self, LocalCategory, MAX_COMPARE, ModelCategory, ModelDatabase};
use aicompare::recommend::{self, Answers, Budget, ContextNeeds, Deployment, Priority, UseCase};
use aicompare::saved::{FileStore, SavedComparisons};
use aicompare::system::SystemSpecs;
use aicompare::validate;
use aicompare::{Config, Result};

#[derive(Parser)]
#[command(name = "aicompare")]
#[command(about = "Compare AI models, estimate their cost and get a recommendation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to <config dir>/aicompare/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Display currency code, e.g. EUR
    #[arg(long, global = true)]
    currency: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all hosted and open-weight models
    Models {
        /// Only this category: proprietary or open-source
        #[arg(long)]
        category: Option<ModelCategory>,
    },

    /// List models you can run yourself
    Local {
        /// Show only models that fit this machine
        #[arg(long)]
        fits: bool,
        /// Only this category, e.g. coding or vision
        #[arg(long)]
        category: Option<LocalCategory>,
    },

    /// Search models by name or provider
    Search {
        /// Search query
        query: String,
    },

    /// Compare up to four models side by side
    Compare {
        /// Exact model names
        #[arg(required = true, num_args = 1..=MAX_COMPARE)]
        names: Vec<String>,
    },

    /// Score the catalog against your answers
    Recommend {
        #[arg(long)]
        use_case: UseCase,
        #[arg(long)]
        budget: Budget,
        #[arg(long)]
        priority: Priority,
        #[arg(long)]
        context: ContextNeeds,
        #[arg(long)]
        deployment: Deployment,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Estimate API cost for a usage profile
    Cost {
        /// Usage preset id (see `presets`)
        #[arg(long, default_value = "startup", conflicts_with = "tokens")]
        preset: String,
        /// Tokens per day
        #[arg(long, requires = "requests")]
        tokens: Option<u64>,
        /// Requests per day
        #[arg(long, requires = "tokens")]
        requests: Option<u64>,
        /// Limit to these model names
        #[arg(long, num_args = 1..)]
        models: Vec<String>,
    },

    /// Monthly cost of running models on your own hardware
    SelfHost {
        /// Compare against this model's API cost for the break-even column
        #[arg(long)]
        model: Option<String>,
        /// Usage preset for the API side of the comparison
        #[arg(long, default_value = "startup")]
        preset: String,
    },

    /// Hardware tokens/second and price per GB of memory
    Hardware,

    /// Show this machine's specifications
    System,

    /// List usage presets
    Presets,

    /// Check a dataset file and report rejected entries
    Validate {
        #[arg(value_enum)]
        kind: DatasetKind,
        file: PathBuf,
    },

    /// Manage saved comparisons
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
}

#[derive(Subcommand)]
enum SavedAction {
    /// List saved comparisons
    List,
    /// Save a set of models under a name
    Save {
        name: String,
        #[arg(required = true)]
        models: Vec<String>,
    },
    /// Delete a saved comparison
    Delete { name: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum DatasetKind {
    Models,
    LocalModels,
    Hardware,
    Cost,
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_models(config: &Config) -> Result<ModelDatabase> {
    ModelDatabase::load(
        config.datasets.models.as_deref(),
        config.datasets.local_models.as_deref(),
    )
}

/// Look up `code`, warning when it falls back to USD.
fn pick_currency<'a>(table: &'a CurrencyTable, code: &str) -> &'a Currency {
    let currency = get_currency(code, table);
    if currency.code != code {
        let known: Vec<&str> = table.codes().collect();
        tracing::warn!(code, ?known, "unknown currency, showing USD");
    }
    currency
}

fn run_command(command: Commands, config: &Config, currency_code: &str) -> Result<()> {
    match command {
        Commands::Models { category } => {
            let db = load_models(config)?;
            let models = match category {
                Some(category) => db.models_in_category(category),
                None => db.get_all_models().iter().collect(),
            };
            display::display_all_models(&models);
        }

        Commands::Local { fits, category } => {
            let db = load_models(config)?;
            let all = match category {
                Some(category) => db.local_models_in_category(category),
                None => db.local_models().iter().collect(),
            };
            if fits {
                let specs = SystemSpecs::detect();
                display::display_system(&specs);
                let fitting =
                    db.local_models_fitting_system(specs.available_ram_gb, specs.gpu_vram_gb);
                display::display_local_models(&all, Some(fitting.as_slice()));
            } else {
                display::display_local_models(&all, None);
            }
        }

        Commands::Search { query } => {
            let db = load_models(config)?;
            let results = db.find_model(&query);
            display::display_search_results(&results, &query);
        }

        Commands::Compare { names } => {
            let db = load_models(config)?;
            let selected = db.by_names(&names)?;
            display::display_comparison(&selected);
        }

        Commands::Recommend {
            use_case,
            budget,
            priority,
            context,
            deployment,
            json,
        } => {
            let db = load_models(config)?;
            let answers = Answers::new(use_case, budget, priority, context, deployment);
            let results = recommend::recommend(db.get_all_models(), &answers);
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                display::display_recommendations(&results);
            }
        }

        Commands::Cost {
            preset,
            tokens,
            requests,
            models,
        } => {
            let db = load_models(config)?;
            let data = CostData::load(config.datasets.cost_data.as_deref())?;
            let profile = match (tokens, requests) {
                (Some(tokens_per_day), Some(requests_per_day)) => UsageProfile {
                    tokens_per_day,
                    requests_per_day,
                },
                _ => data.preset(&preset)?.profile(),
            };
            let selected = if models.is_empty() {
                db.get_all_models().iter().collect()
            } else {
                db.by_names(&models)?
            };
            let costs = CostBreakdown::for_models(&selected, &profile);
            let currency = pick_currency(&data.currencies, currency_code);
            display::display_costs(&costs, &profile, currency);
        }

        Commands::SelfHost { model, preset } => {
            let data = CostData::load(config.datasets.cost_data.as_deref())?;
            let api_monthly = match model {
                Some(name) => {
                    let db = load_models(config)?;
                    let selected = db.by_names(&[name])?;
                    let profile = data.preset(&preset)?.profile();
                    Some(CostBreakdown::for_model(selected[0], &profile).monthly_cost)
                }
                None => None,
            };
            let currency = pick_currency(&data.currencies, currency_code);
            display::display_self_hosting(&data.self_hosting_costs(), currency, api_monthly);
            for tip in &data.tips {
                println!("  * {}", tip);
            }
        }

        Commands::Hardware => {
            let (bundle, _) = HardwareComparison::load(config.datasets.hardware.as_deref())?;
            display::display_hardware(&bundle);
        }

        Commands::System => {
            display::display_system(&SystemSpecs::detect());
        }

        Commands::Presets => {
            let data = CostData::load(config.datasets.cost_data.as_deref())?;
            display::display_presets(&data.presets);
        }

        Commands::Validate { kind, file } => run_validate(kind, &file)?,

        Commands::Saved { action } => {
            let store = FileStore::new(config.resolved_store_path()?);
            tracing::debug!(path = %store.path().display(), "saved comparisons store");
            let mut saved = SavedComparisons::new(store);
            match action {
                SavedAction::List => display::display_saved(&saved.list()?),
                SavedAction::Save { name, models } => {
                    let db = load_models(config)?;
                    db.by_names(&models)?;
                    let entry = saved.save(&name, models)?;
                    println!("Saved '{}' ({} models)", entry.name, entry.models.len());
                }
                SavedAction::Delete { name } => {
                    if saved.delete(&name)? {
                        println!("Deleted '{}'", name);
                    } else {
                        println!("No saved comparison named '{}'", name);
                    }
                }
            }
        }
    }
    Ok(())
}

fn run_validate(kind: DatasetKind, file: &Path) -> Result<()> {
    let value = models::read_json(file)?;
    match kind {
        DatasetKind::Models => {
            let result = validate::validate_ai_models_data(&value);
            display::display_validation_report("models", result.models.len(), &result.diagnostics);
        }
        DatasetKind::LocalModels => {
            let result = validate::validate_local_models_data(&value);
            display::display_validation_report(
                "local models",
                result.models.len(),
                &result.diagnostics,
            );
        }
        DatasetKind::Hardware => {
            let result = validate::validate_hardware_data(&value);
            display::display_validation_report(
                "hardware",
                result.data.all_hardware.len(),
                &result.diagnostics,
            );
        }
        DatasetKind::Cost => {
            let data = CostData::from_value(&value)?;
            let accepted = data.presets.len() + data.hardware.len() + data.currencies.iter().count();
            display::display_validation_report("cost data", accepted, &data.diagnostics);
        }
    }
    Ok(())
}

fn run_tui(config: &Config) -> Result<()> {
    let db = load_models(config)?;
    let store = config.resolved_store_path().ok().map(FileStore::new);

    // Setup terminal
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;

    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = tui_app::App::new(db.get_all_models().to_vec(), store);

    let result = (|| -> Result<()> {
        loop {
            terminal.draw(|frame| tui_ui::draw(frame, &mut app))?;
            tui_events::handle_events(&mut app)?;
            if app.should_quit {
                return Ok(());
            }
        }
    })();

    // Restore terminal
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn main() {
    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(code) = cli.currency {
        config.currency = code;
    }

    init_logging(&config.log_level);
    tracing::debug!(?config, "loaded configuration");

    let currency = config.currency.clone();
    let result = match cli.command {
        Some(command) => run_command(command, &config, &currency),
        // Default: launch the recommendation wizard
        None => run_tui(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
