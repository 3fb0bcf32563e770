use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Args;
use roster_config::AppConfig;
use roster_db::contacts::models::ContactSnapshotFilter;
use roster_db::contacts::pg_repository::PgContactRepository;
use roster_db::contacts::repositories::ContactRepository;
use roster_db::review::models::{CandidateStatus, MergeCandidateFilter};
use roster_db::review::pg_repository::PgMergeCandidateRepository;
use roster_db::review::repositories::MergeCandidateRepository;
use roster_matching::{calibrate, CandidatePair, ContactRecord, MatchingConfig, Matcher};
use sqlx::PgPool;
use uuid::Uuid;

use crate::report::{self, ReportFormat};
use crate::source;

#[derive(Debug, Clone, Args)]
pub struct MatchingArgs {
    /// TOML file with weights, threshold and min_defined_subscores
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Minimum composite score of a reported pair (inclusive)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Minimum number of sub-scores both records must define
    #[arg(long = "min-defined")]
    pub min_defined: Option<usize>,
}

#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Write the report here instead of stdout
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// Contacts CSV with a header row
    #[arg(
        long,
        value_name = "PATH",
        conflicts_with_all = ["from_db", "since", "limit"],
        required_unless_present = "from_db"
    )]
    pub input: Option<PathBuf>,

    /// Read a snapshot of the contacts table instead of a CSV
    #[arg(long)]
    pub from_db: bool,

    /// Only contacts updated at or after this RFC 3339 instant (with --from-db)
    #[arg(long)]
    pub since: Option<DateTime<Utc>>,

    /// Maximum number of contacts to read (with --from-db)
    #[arg(long)]
    pub limit: Option<i64>,

    #[command(flatten)]
    pub matching: MatchingArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Queue the candidates in the review table
    #[arg(long)]
    pub persist: bool,

    /// Give up if scoring takes longer than this many seconds
    #[arg(long, value_name = "SECONDS", conflicts_with = "exhaustive")]
    pub max_seconds: Option<u64>,

    /// Compare every pair without pruning
    #[arg(long)]
    pub exhaustive: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CalibrateArgs {
    /// Contacts CSV with a header row
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,

    /// CSV of left_id,right_id,is_duplicate
    #[arg(long, value_name = "PATH")]
    pub labels: PathBuf,

    #[command(flatten)]
    pub matching: MatchingArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ReviewListArgs {
    #[arg(long, value_enum, default_value = "pending")]
    pub status: StatusArg,

    #[arg(long)]
    pub min_score: Option<f64>,

    #[arg(long, default_value_t = 50)]
    pub limit: i64,

    #[arg(long, default_value_t = 0)]
    pub offset: i64,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ReviewResolveArgs {
    /// Merge candidate id
    pub id: Uuid,

    #[arg(long, value_enum)]
    pub status: ResolutionArg,

    /// Who made the call
    #[arg(long)]
    pub reviewer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StatusArg {
    Pending,
    Merged,
    Dismissed,
}

impl From<StatusArg> for CandidateStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Pending => Self::Pending,
            StatusArg::Merged => Self::Merged,
            StatusArg::Dismissed => Self::Dismissed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ResolutionArg {
    Merged,
    Dismissed,
}

impl From<ResolutionArg> for CandidateStatus {
    fn from(value: ResolutionArg) -> Self {
        match value {
            ResolutionArg::Merged => Self::Merged,
            ResolutionArg::Dismissed => Self::Dismissed,
        }
    }
}

/// Environment defaults, replaced by a TOML file if given, then flag overrides.
pub fn resolve_matching_config(
    app: &AppConfig,
    args: &MatchingArgs,
) -> anyhow::Result<MatchingConfig> {
    let mut config: MatchingConfig = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading matching config {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("parsing matching config {}", path.display()))?
        }
        None => app.matching.clone(),
    };
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(min_defined) = args.min_defined {
        config.min_defined_subscores = min_defined;
    }
    Ok(config)
}

fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    Ok(writer)
}

async fn connect(app: &AppConfig) -> anyhow::Result<PgPool> {
    let url = app.require_database_url()?;
    Ok(roster_db::create_pool(url).await?)
}

pub async fn scan(app: &AppConfig, args: ScanArgs) -> anyhow::Result<()> {
    let matcher = Matcher::new(resolve_matching_config(app, &args.matching)?)?;

    let pool = if args.from_db || args.persist {
        Some(connect(app).await?)
    } else {
        None
    };

    let records: Vec<ContactRecord> = match (&args.input, &pool) {
        (Some(path), _) => source::load_contacts(path)?,
        (None, Some(pool)) => {
            PgContactRepository::new(pool.clone())
                .snapshot(ContactSnapshotFilter {
                    updated_since: args.since,
                    limit: args.limit,
                })
                .await?
        }
        (None, None) => anyhow::bail!("either --input or --from-db is required"),
    };

    let started = Instant::now();
    let deadline = args.max_seconds.map(|s| started + Duration::from_secs(s));
    let exhaustive = args.exhaustive;
    let contact_count = records.len();

    let candidates: Vec<CandidatePair> = tokio::task::spawn_blocking(move || {
        if exhaustive {
            return Ok(matcher.find_candidates_exhaustive(&records));
        }
        matcher
            .enumerate(&records, || deadline.is_some_and(|d| Instant::now() >= d))
            .map(|run| run.candidates)
    })
    .await
    .context("scoring task failed")??;

    tracing::info!(
        contacts = contact_count,
        candidates = candidates.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "duplicate scan completed"
    );

    let mut out = open_output(args.output.output.as_deref())?;
    report::write_candidates(&mut out, args.output.format, &candidates)?;
    out.flush()?;

    if args.persist {
        if let Some(pool) = pool {
            let run_id = Uuid::new_v4();
            let inserted = PgMergeCandidateRepository::new(pool)
                .record_run(run_id, &candidates)
                .await?;
            tracing::info!(%run_id, inserted, "queued candidates for review");
        }
    }

    Ok(())
}

pub fn calibrate_labels(app: &AppConfig, args: CalibrateArgs) -> anyhow::Result<()> {
    let matcher = Matcher::new(resolve_matching_config(app, &args.matching)?)?;
    let records = source::load_contacts(&args.input)?;
    let labels = source::load_labels(&args.labels)?;

    let candidates = matcher.find_candidates(&records);
    let report = calibrate(&candidates, &labels);
    tracing::info!(
        candidates = candidates.len(),
        labels = labels.len(),
        precision = ?report.precision,
        recall = ?report.recall,
        "calibration completed"
    );

    let mut out = open_output(args.output.output.as_deref())?;
    report::write_calibration(&mut out, args.output.format, &report)?;
    out.flush()?;
    Ok(())
}

pub async fn migrate(app: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(app).await?;
    roster_db::apply_schema(&pool).await?;
    Ok(())
}

pub async fn review_list(app: &AppConfig, args: ReviewListArgs) -> anyhow::Result<()> {
    let pool = connect(app).await?;
    let rows = PgMergeCandidateRepository::new(pool)
        .list(MergeCandidateFilter {
            status: Some(args.status.into()),
            min_score: args.min_score,
            limit: Some(args.limit),
            offset: Some(args.offset),
        })
        .await?;

    let mut out = open_output(args.output.output.as_deref())?;
    report::write_review_queue(&mut out, args.output.format, &rows)?;
    out.flush()?;
    Ok(())
}

pub async fn review_resolve(app: &AppConfig, args: ReviewResolveArgs) -> anyhow::Result<()> {
    let pool = connect(app).await?;
    PgMergeCandidateRepository::new(pool)
        .resolve(args.id, args.status.into(), &args.reviewer)
        .await?;
    Ok(())
}
