use anyhow::{Context, Result, anyhow, bail};
use catalog::{CandidateItem, CatalogGateway, InMemoryCatalog, MediaId, MediaType, genres};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use engine::{RecommendationEngine, RecommendationSet, Resolution, Settings};
use learning::{FeedbackValue, PreferenceLearningState, merge_states};
use profiler::{CinematicProfiler, KnownTitles};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use resolver::ConfidenceLevel;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// cinematch - find titles like the one you loved
#[derive(Parser)]
#[command(name = "cinematch")]
#[command(about = "Reference-based movie and series recommendations that learn from feedback", long_about = None)]
struct Cli {
    /// Path to the catalog dump (JSON array of records)
    #[arg(short, long, default_value = "data/catalog.json")]
    catalog: PathBuf,

    /// Curated known-title profiles to use instead of the built-in table
    #[arg(long)]
    known_titles: Option<PathBuf>,

    /// Settings file with `engine` and `learning` sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Learning state file, created on first feedback
    #[arg(short, long, default_value = "cinematch-state.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum MediaKind {
    Movie,
    Series,
}

impl From<MediaKind> for MediaType {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Movie => MediaType::Movie,
            MediaKind::Series => MediaType::Series,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a message to a catalog title and show the confidence breakdown
    Resolve {
        /// e.g. "movies like Baahubali (2015)"
        message: String,
    },

    /// Show the cinematic profile and filter rules of the referenced title
    Profile { message: String },

    /// Recommend titles like the referenced one
    Recommend {
        message: String,

        /// Number of recommendations to show (defaults to the engine setting)
        #[arg(long)]
        limit: Option<usize>,

        /// Show the score breakdown for each recommendation
        #[arg(long)]
        explain: bool,
    },

    /// Record like / dislike / neutral feedback on a title
    Feedback {
        #[arg(long)]
        id: MediaId,

        #[arg(long, value_enum, default_value = "movie")]
        media_type: MediaKind,

        /// like, dislike or neutral
        #[arg(long)]
        value: String,

        /// Reference title the feedback was given under
        #[arg(long)]
        reference: Option<MediaId>,
    },

    /// Delete the feedback recorded for a title
    Forget {
        #[arg(long)]
        id: MediaId,

        #[arg(long, value_enum, default_value = "movie")]
        media_type: MediaKind,
    },

    /// Show learned preferences
    Preferences {
        /// How many likes and dislikes to list
        #[arg(long, default_value = "5")]
        top: usize,
    },

    /// Merge another state file into the current one
    Merge {
        /// State whose records lose on conflict
        other: PathBuf,

        /// Where to write the merged state (defaults to --state)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Simulate a session with random feedback and concurrent requests
    Simulate {
        /// Random feedback records to generate
        #[arg(long, default_value = "30")]
        feedback: usize,

        /// Recommendation requests to run
        #[arg(long, default_value = "50")]
        requests: usize,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Loaded catalog plus the engine built on it
struct App {
    catalog: Arc<InMemoryCatalog>,
    engine: RecommendationEngine,
    settings: Settings,
    config_given: bool,
}

impl App {
    fn pool(&self) -> Vec<CandidateItem> {
        self.catalog.all_items().into_iter().cloned().collect()
    }

    fn item(&self, id: MediaId, media_type: MediaType) -> Result<&CandidateItem> {
        self.catalog
            .get_item(id, media_type)
            .ok_or_else(|| anyhow!("{} {} is not in the catalog", media_type, id))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let app = build_app(&cli)?;

    match cli.command {
        Commands::Resolve { message } => handle_resolve(&app, &message).await?,
        Commands::Profile { message } => handle_profile(&app, &message).await?,
        Commands::Recommend {
            message,
            limit,
            explain,
        } => handle_recommend(&app, &cli.state, &message, limit, explain).await?,
        Commands::Feedback {
            id,
            media_type,
            value,
            reference,
        } => handle_feedback(&app, &cli.state, id, media_type.into(), &value, reference)?,
        Commands::Forget { id, media_type } => handle_forget(&app, &cli.state, id, media_type.into())?,
        Commands::Preferences { top } => handle_preferences(&app, &cli.state, top)?,
        Commands::Merge { other, output } => {
            handle_merge(&app, &cli.state, &other, output.as_deref().unwrap_or(&cli.state))?
        }
        Commands::Simulate {
            feedback,
            requests,
            seed,
        } => handle_simulate(&app, feedback, requests, seed).await?,
    }

    Ok(())
}

fn build_app(cli: &Cli) -> Result<App> {
    let start = Instant::now();
    let catalog = InMemoryCatalog::load_from_file(&cli.catalog)
        .with_context(|| format!("Failed to load catalog from {}", cli.catalog.display()))?;
    println!(
        "{} Loaded {} titles in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );

    let known_titles = match &cli.known_titles {
        Some(path) => KnownTitles::load_from_file(path)
            .with_context(|| format!("Failed to load known titles from {}", path.display()))?,
        None => KnownTitles::builtin(),
    };
    let settings = match &cli.config {
        Some(path) => Settings::load_from_file(path)?,
        None => Settings::default(),
    };

    let catalog = Arc::new(catalog);
    let gateway: Arc<dyn CatalogGateway> = catalog.clone();
    let engine = RecommendationEngine::new(
        gateway,
        CinematicProfiler::new(Arc::new(known_titles)),
        settings.engine,
    );

    Ok(App {
        catalog,
        engine,
        settings,
        config_given: cli.config.is_some(),
    })
}

fn load_state(app: &App, path: &Path) -> Result<PreferenceLearningState> {
    if !path.exists() {
        return Ok(PreferenceLearningState::new(app.settings.learning));
    }
    let mut state = PreferenceLearningState::load_from_file(path)
        .with_context(|| format!("Failed to load learning state from {}", path.display()))?;
    if app.config_given {
        state.set_config(app.settings.learning, Utc::now());
    }
    Ok(state)
}

fn save_state(state: &PreferenceLearningState, path: &Path) -> Result<()> {
    state
        .save_to_file(path)
        .with_context(|| format!("Failed to save learning state to {}", path.display()))
}

/// Handle the 'resolve' command
async fn handle_resolve(app: &App, message: &str) -> Result<()> {
    let resolution = resolve(app, message).await?;
    print_resolution(&resolution);
    Ok(())
}

/// Handle the 'profile' command
async fn handle_profile(app: &App, message: &str) -> Result<()> {
    let resolution = resolve(app, message).await?;
    print_resolution(&resolution);
    let Some(resolved) = &resolution.resolved else {
        return Ok(());
    };

    let analysis = app.engine.analyze(resolved).await;
    let profile = &analysis.reference.profile;
    let culture = &analysis.reference.culture;

    println!();
    println!("{}", "Cinematic profile:".bold().blue());
    println!("{}Industry: {} ({})", "• ".green(), culture.industry, culture.language);
    println!("{}Narrative scale: {}", "• ".green(), profile.narrative_scale);
    println!("{}Storytelling style: {}", "• ".green(), profile.storytelling_style);
    println!("{}Audience: {}", "• ".green(), profile.audience_type);
    println!("{}Mass appeal: {}", "• ".green(), profile.mass_appeal_score);
    println!("{}Production scale: {}", "• ".green(), profile.production_scale);
    println!("{}Era: {}", "• ".green(), profile.release_era);
    let themes: Vec<&str> = profile.themes.iter().map(|t| t.as_str()).collect();
    println!("{}Themes: {}", "• ".green(), themes.join(", "));
    if analysis.details.is_none() {
        println!("{}", "  (details unavailable, profiled from search metadata)".dimmed());
    }

    println!();
    println!("{}", "Filter rules:".bold().blue());
    println!("{}", serde_json::to_string_pretty(&analysis.rules)?);
    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    app: &App,
    state_path: &Path,
    message: &str,
    limit: Option<usize>,
    explain: bool,
) -> Result<()> {
    let state = load_state(app, state_path)?;
    let outcome = app
        .engine
        .recommend(message, app.pool(), &state)
        .await?
        .ok_or_else(|| anyhow!("No title found in '{}'", message))?;

    print_resolution(&outcome.resolution);
    let Some(set) = outcome.recommendations else {
        return Ok(());
    };
    println!();
    print_recommendations(&set, limit.unwrap_or(app.settings.engine.candidate_limit), explain);
    Ok(())
}

/// Handle the 'feedback' command
fn handle_feedback(
    app: &App,
    state_path: &Path,
    id: MediaId,
    media_type: MediaType,
    value: &str,
    reference: Option<MediaId>,
) -> Result<()> {
    let feedback: FeedbackValue = value.parse()?;
    let item = app.item(id, media_type)?;

    let mut state = load_state(app, state_path)?;
    state.record_feedback(app.engine.feedback_target(item), feedback, reference, Utc::now());
    save_state(&state, state_path)?;

    println!(
        "{} Recorded {:?} for {} ({} likes, {} dislikes)",
        "✓".green(),
        feedback,
        item.display_title().bold(),
        state.total_likes(),
        state.total_dislikes()
    );
    Ok(())
}

/// Handle the 'forget' command
fn handle_forget(app: &App, state_path: &Path, id: MediaId, media_type: MediaType) -> Result<()> {
    let mut state = load_state(app, state_path)?;
    if !state.remove_feedback(id, media_type, Utc::now()) {
        println!("No feedback recorded for {} {}", media_type, id);
        return Ok(());
    }
    save_state(&state, state_path)?;

    let title = app
        .catalog
        .get_item(id, media_type)
        .map(|item| item.display_title())
        .unwrap_or_else(|| format!("{} {}", media_type, id));
    println!("{} Forgot feedback for {}", "✓".green(), title);
    Ok(())
}

/// Handle the 'preferences' command
fn handle_preferences(app: &App, state_path: &Path, top: usize) -> Result<()> {
    let state = load_state(app, state_path)?;
    println!("{}", "Learned preferences:".bold().blue());
    println!(
        "{}{} likes, {} dislikes, {} records",
        "• ".cyan(),
        state.total_likes(),
        state.total_dislikes(),
        state.history().len()
    );
    if state.feedback_count() < state.config().min_feedback_threshold {
        println!(
            "{}Personalization starts after {} likes or dislikes",
            "• ".cyan(),
            state.config().min_feedback_threshold
        );
    }

    let preferences = state.top_preferences(top);
    println!("Likes:");
    for (key, weight) in &preferences.liked {
        println!("  {} {} ({})", format!("{:+.2}", weight).green(), key.label(), key);
    }
    println!("Dislikes:");
    for (key, weight) in &preferences.disliked {
        println!("  {} {} ({})", format!("{:+.2}", weight).red(), key.label(), key);
    }
    Ok(())
}

/// Handle the 'merge' command
fn handle_merge(app: &App, state_path: &Path, other: &Path, output: &Path) -> Result<()> {
    let primary = load_state(app, state_path)?;
    if !other.exists() {
        bail!("State file {} does not exist", other.display());
    }
    let secondary = load_state(app, other)?;

    let merged = merge_states(&primary, &secondary, Utc::now());
    save_state(&merged, output)?;
    println!(
        "{} Merged {} + {} records into {} ({})",
        "✓".green(),
        primary.history().len(),
        secondary.history().len(),
        merged.history().len(),
        output.display()
    );
    Ok(())
}

/// Handle the 'simulate' command
async fn handle_simulate(app: &App, feedback: usize, requests: usize, seed: Option<u64>) -> Result<()> {
    let pool = app.pool();
    if pool.is_empty() {
        bail!("The catalog is empty");
    }
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    // Random feedback, mostly likes
    let start = Instant::now();
    let mut state = PreferenceLearningState::new(app.settings.learning);
    for _ in 0..feedback {
        let item = &pool[rng.random_range(0..pool.len())];
        let roll: f64 = rng.random();
        let value = if roll < 0.6 {
            FeedbackValue::Like
        } else if roll < 0.9 {
            FeedbackValue::Dislike
        } else {
            FeedbackValue::Neutral
        };
        state.record_feedback(app.engine.feedback_target(item), value, None, Utc::now());
    }
    println!(
        "{} Recorded {} feedback events ({} titles) in {:?}",
        "✓".green(),
        feedback,
        state.history().len(),
        start.elapsed()
    );

    // Concurrent requests against random reference titles
    let state = Arc::new(state);
    let pool = Arc::new(pool);
    let mut handles = Vec::with_capacity(requests);
    for _ in 0..requests {
        let reference = &pool[rng.random_range(0..pool.len())];
        let message = format!("movies like {}", reference.title);
        let engine = app.engine.clone();
        let state = state.clone();
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            let start = Instant::now();
            engine.recommend(&message, pool.as_ref().clone(), &state).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let total_start = Instant::now();
    let mut timings: Vec<Duration> = Vec::with_capacity(handles.len());
    for handle in handles {
        timings.push(handle.await.context("Simulated request panicked")??);
    }
    let wall_time = total_start.elapsed();
    if timings.is_empty() {
        return Ok(());
    }

    timings.sort();
    let total: Duration = timings.iter().sum();
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    println!("{}", "Simulation results:".bold().blue());
    println!("Requests: {}", timings.len());
    println!("Wall time: {:?}", wall_time);
    println!("Average latency: {:?}", total / timings.len() as u32);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!(
        "Throughput: {:.2} requests/second",
        timings.len() as f64 / wall_time.as_secs_f64()
    );
    Ok(())
}

async fn resolve(app: &App, message: &str) -> Result<Resolution> {
    app.engine
        .resolve_message(message)
        .await
        .ok_or_else(|| anyhow!("No title found in '{}'", message))
}

fn print_resolution(resolution: &Resolution) {
    let reference = &resolution.reference;
    let confidence = &resolution.confidence;

    match reference.year {
        Some(year) => println!("{} {} ({})", "Reference:".bold(), reference.title, year),
        None => println!("{} {}", "Reference:".bold(), reference.title),
    }
    if let Some(resolved) = &resolution.resolved {
        println!(
            "{} {} [{} {}]",
            "Best match:".bold(),
            resolved.item.display_title().bold(),
            resolved.media_type,
            resolved.item.id
        );
    }

    let level = format!("{:?}", confidence.level);
    let level = match confidence.level {
        ConfidenceLevel::Exact | ConfidenceLevel::High => level.green(),
        ConfidenceLevel::Medium => level.yellow(),
        ConfidenceLevel::Low | ConfidenceLevel::Ambiguous => level.red(),
    };
    println!("{} {} ({}/100)", "Confidence:".bold(), level, confidence.score);
    let factors = &confidence.factors;
    println!(
        "  title {} · year {} · popularity {} · uniqueness {} · relevance {}",
        factors.title_match, factors.year_match, factors.popularity, factors.uniqueness, factors.relevance
    );
    if let Some(badge) = &confidence.badge {
        println!("  {}", badge.cyan());
    }
    if let Some(message) = &confidence.message {
        println!("{}", message);
    }
}

fn print_recommendations(set: &RecommendationSet, limit: usize, explain: bool) {
    println!(
        "{} ({} filters, {} of {} titles matched)",
        "Recommendations:".bold().blue(),
        format!("{:?}", set.mode).to_lowercase(),
        set.matched,
        set.considered
    );
    if set.recommendations.is_empty() {
        println!("Nothing in the catalog matches this reference yet.");
        return;
    }

    for (index, rec) in set.recommendations.iter().take(limit).enumerate() {
        let item = &rec.candidate.item;
        let genre_names = item
            .genre_ids
            .iter()
            .map(|g| genres::name(*g))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{}. {} [{}] {} - Score: {:.1}",
            (index + 1).to_string().green(),
            item.display_title(),
            genre_names,
            rec.candidate.culture.language,
            rec.score.final_score
        );
        if explain {
            println!(
                "   similarity {:.1} · preference {:+.1} · exploration {:+.1} · confidence {:?}",
                rec.score.reference_score,
                rec.score.preference_adjustment,
                rec.score.exploration_bonus,
                rec.score.confidence
            );
            if !rec.score.explanation.is_empty() {
                println!("   {}", rec.score.explanation.join("; ").dimmed());
            }
        }
    }
}
