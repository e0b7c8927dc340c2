use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use stylematch::service::ProductMatch;
use stylematch::{
    AppConfig, Catalog, Category, RankQuery, RankingEngine, RegionSelector, SearchFilters,
    TextEmbedding, VisualEmbedding,
};
use stylematch_vision::PoseDetection;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Garment region selection and hybrid product ranking
#[derive(Parser, Debug)]
#[command(name = "stylematch")]
#[command(about = "Visual and textual product matching for fashion search", long_about = None)]
struct Args {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank a catalog against precomputed query embeddings
    Rank {
        /// JSON array of catalog items
        #[arg(long)]
        catalog: PathBuf,
        /// JSON rank request
        #[arg(long)]
        request: PathBuf,
    },
    /// Select the crop region for a serialized pose detection
    Region {
        #[arg(long)]
        detection: PathBuf,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
    },
    /// Complementary matches per category from precomputed embeddings
    Look {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        request: PathBuf,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum WeightPolicy {
    Category,
    #[default]
    Look,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RankRequest {
    visual: Option<VisualEmbedding>,
    text: Option<TextEmbedding>,
    negative: Option<TextEmbedding>,
    filters: SearchFilters,
    top_k: Option<usize>,
    policy: WeightPolicy,
    /// Look targets; empty means the default set
    categories: Vec<Category>,
    source_category: Option<Category>,
}

impl RankRequest {
    fn query<'a>(&'a self, engine: &RankingEngine) -> RankQuery<'a> {
        let config = engine.config();
        let weights = match self.policy {
            WeightPolicy::Category => config.category_weights,
            WeightPolicy::Look => config.look_weights,
        };
        RankQuery::new()
            .with_visual(self.visual.as_ref())
            .with_text(self.text.as_ref())
            .with_negative(self.negative.as_ref())
            .with_filters(self.filters.clone())
            .with_weights(weights)
            .with_top_k(self.top_k.unwrap_or(config.default_top_k))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {:?}", path))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(command: Command, config: AppConfig) -> anyhow::Result<()> {
    match command {
        Command::Rank { catalog, request } => {
            let catalog = Catalog::load_json(&catalog, config.catalog)?;
            let request: RankRequest = read_json(&request)?;
            let engine = RankingEngine::new(config.ranking);

            let matches: Vec<ProductMatch> = engine
                .rank_catalog(&catalog, &request.query(&engine))?
                .into_iter()
                .map(ProductMatch::from)
                .collect();
            info!("Ranked {} items, returning {}", catalog.len(), matches.len());
            print_json(&matches)
        }
        Command::Region {
            detection,
            category,
            width,
            height,
        } => {
            let person: PoseDetection = read_json(&detection)?;
            let category = category.map(|c| c.parse::<Category>()).transpose()?;
            let selector = RegionSelector::new(config.region);
            let selected = selector.select(
                &person.detection.bbox,
                &person.keypoints,
                category,
                width,
                height,
            );
            print_json(&selected)
        }
        Command::Look { catalog, request } => {
            let catalog = Catalog::load_json(&catalog, config.catalog)?;
            let request: RankRequest = read_json(&request)?;
            let engine = RankingEngine::new(config.ranking);

            let looks = catalog.with_items(|items| {
                engine.shop_the_look(
                    items,
                    &request.query(&engine),
                    &request.categories,
                    request.source_category,
                )
            })?;
            let output: Vec<stylematch::service::LookGroup> =
                looks.into_iter().map(Into::into).collect();
            print_json(&output)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting stylematch v{}", env!("CARGO_PKG_VERSION"));
    let config = AppConfig::load(args.config.as_deref())?;

    let result = run(args.command, config);
    if let Err(e) = &result {
        match e.downcast_ref::<stylematch::Error>() {
            Some(err) if err.is_client_error() => error!("Rejected input: {}", err),
            Some(err) => error!("Internal error: {}", err),
            None => error!("{:#}", e),
        }
    }
    result
}
