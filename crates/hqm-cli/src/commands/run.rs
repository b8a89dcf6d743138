use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use hqm_config::secrets::resolve_api_token;
use hqm_config::{ConfigError, HqmConfig};
use hqm_md::{load_universe, BatchFetcher, IexCloudProvider, QuoteProvider};
use hqm_rank::{rank_and_size, Micros};
use hqm_report::{write_report, ReportStyle};

/// Command-line overrides for `hqm run`. `None` keeps the config value.
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub config_paths: Vec<String>,
    pub universe: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub budget: Option<f64>,
    pub top: Option<usize>,
    pub batch_size: Option<usize>,
    pub concurrency: Option<usize>,
    pub base_url: Option<String>,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub config_hash: String,
    pub report_path: PathBuf,
    pub universe: usize,
    pub batches: usize,
    pub zero_filled_fields: usize,
    pub selected: usize,
    pub per_instrument_budget: Micros,
    pub invested: Micros,
}

impl RunSummary {
    pub fn print(&self) {
        println!("config_hash={}", self.config_hash);
        println!("report_path={}", self.report_path.display());
        println!("universe={}", self.universe);
        println!("batches={}", self.batches);
        println!("zero_filled_fields={}", self.zero_filled_fields);
        println!("selected={}", self.selected);
        println!("per_instrument_budget={}", self.per_instrument_budget);
        println!("invested={}", self.invested);
    }
}

/// Fold CLI flags over the layered config, then re-validate.
pub fn apply_overrides(settings: &mut HqmConfig, args: &RunArgs) -> Result<(), ConfigError> {
    if let Some(p) = &args.universe {
        settings.universe.path = p.display().to_string();
    }
    if let Some(p) = &args.output {
        settings.report.path = p.display().to_string();
    }
    if let Some(b) = args.budget {
        settings.portfolio.budget = b;
    }
    if let Some(n) = args.top {
        settings.selection.top_n = n;
    }
    if let Some(n) = args.batch_size {
        settings.fetch.batch_size = n;
    }
    if let Some(n) = args.concurrency {
        settings.fetch.concurrency = n;
    }
    if let Some(url) = &args.base_url {
        settings.api.base_url = url.clone();
    }
    settings.validate()
}

/// Layered config with CLI flags folded in, and the hash of that result.
pub fn effective_settings(args: &RunArgs) -> Result<(HqmConfig, String)> {
    let loaded = super::load_config(&args.config_paths)?;
    let mut settings = loaded.settings;
    apply_overrides(&mut settings, args).context("invalid run settings")?;
    let config_hash = settings.config_hash().context("hashing run settings failed")?;
    Ok((settings, config_hash))
}

pub async fn run(args: RunArgs) -> Result<RunSummary> {
    let (settings, config_hash) = effective_settings(&args)?;

    tracing::info!(
        config_hash = %config_hash,
        universe = %settings.universe.path,
        report = %settings.report.path,
        "hqm run starting"
    );

    let token = resolve_api_token(&settings).context("resolving API token failed")?;

    let provider = match settings.fetch.timeout_secs {
        Some(secs) => IexCloudProvider::with_timeout(
            token.expose().to_string(),
            settings.api.base_url.clone(),
            Duration::from_secs(secs),
        )
        .context("building HTTP client failed")?,
        None => IexCloudProvider::new(token.expose().to_string(), settings.api.base_url.clone()),
    };

    run_with_provider(&settings, config_hash, provider).await
}

/// Everything after token resolution; the provider is injected.
pub async fn run_with_provider<P: QuoteProvider>(
    settings: &HqmConfig,
    config_hash: String,
    provider: P,
) -> Result<RunSummary> {
    let universe_path = Path::new(&settings.universe.path);
    let tickers = load_universe(universe_path)
        .with_context(|| format!("loading universe '{}' failed", universe_path.display()))?;

    let fetcher = BatchFetcher::new(provider, settings.fetch.batch_size)
        .with_concurrency(settings.fetch.concurrency);
    let outcome = fetcher
        .fetch_all(&tickers)
        .await
        .context("fetching quotes failed")?;

    let budget = Micros::from_decimal(settings.portfolio.budget).ok_or_else(|| {
        ConfigError::Invalid(format!(
            "portfolio.budget {} is out of range",
            settings.portfolio.budget
        ))
    })?;

    let universe = outcome.quotes.len();
    let portfolio = rank_and_size(outcome.quotes, settings.selection.top_n, budget)
        .context("ranking universe failed")?;

    let report_path = PathBuf::from(&settings.report.path);
    write_report(
        &portfolio,
        &report_path,
        &settings.report.sheet_name,
        &ReportStyle::default(),
    )
    .context("writing report failed")?;

    Ok(RunSummary {
        config_hash,
        report_path,
        universe,
        batches: outcome.batches,
        zero_filled_fields: outcome.zero_filled_fields,
        selected: portfolio.len(),
        per_instrument_budget: portfolio.per_instrument_budget,
        invested: portfolio.invested,
    })
}
