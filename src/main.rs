mod error;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::error::CliError;
use crate::input::discover_submissions;
use crate::input::names::{NameTable, load_name_table};
use crate::model::profile::{TaskProfile, TieBreak};
use crate::pipeline::stage1_tables::{Stage1Input, run_stage1};
use crate::pipeline::stage2_ranks::run_stage2;
use crate::pipeline::stage3_aggregate::{AggregateOptions, summarize};
use crate::pipeline::stage4_report::{Stage4Input, write_reports};

#[derive(Parser, Debug)]
#[command(name = "kira-subrank", version)]
#[command(about = "Rank challenge submissions by per-sample metric ranks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank a set of submission metric tables
    Run(RunArgs),
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Directory with one metrics CSV (.csv or .csv.gz) per submission
    #[arg(long, required_unless_present = "submission", conflicts_with = "submission")]
    input: Option<PathBuf>,

    /// Metrics CSV of one submission (repeatable)
    #[arg(long, value_name = "CSV")]
    submission: Vec<PathBuf>,

    /// Scoring profile
    #[arg(long, value_enum, default_value_t = ProfileArg::Lesionwise)]
    profile: ProfileArg,

    /// Tab-separated `id<TAB>display name` table
    #[arg(long)]
    names: Option<PathBuf>,

    /// Column holding case ids used to verify row alignment
    #[arg(long)]
    key_column: Option<String>,

    /// Number of submissions in the top list
    #[arg(long)]
    top: Option<usize>,

    /// Ordering of submissions with equal scores
    #[arg(long, value_enum, default_value_t = TieBreakArg::Id)]
    tie_break: TieBreakArg,

    /// Directory for summary.json, report.txt, metric_means.tsv and ranks.tsv
    #[arg(long)]
    out: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ProfileArg {
    /// Per-region Dice and NSD (lesion-wise segmentation)
    Lesionwise,
    /// Flat SSIM, PSNR and MSE composite (inpainting)
    Inpainting,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum TieBreakArg {
    /// Lexicographic by submission id
    Id,
    /// Order the submissions were given in
    Input,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Roster {
    Directory(PathBuf),
    Files(Vec<PathBuf>),
}

#[derive(Debug, Clone)]
struct RunConfig {
    roster: Roster,
    profile: TaskProfile,
    tie_break: TieBreak,
    names_path: Option<PathBuf>,
    out_dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    let Command::Run(args) = cli.command;
    logging::init_tracing(args.verbose);

    if let Err(err) = run(&args) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: &RunArgs) -> Result<(), CliError> {
    let config = build_config(args)?;
    let paths = resolve_roster(&config.roster)?;
    tracing::info!(
        submissions = paths.len(),
        profile = %config.profile.name,
        "analyzing submissions"
    );

    let tables = run_stage1(&Stage1Input {
        paths: &paths,
        profile: &config.profile,
    })?;
    let ranks = run_stage2(&tables, &config.profile)?;
    for metric in &ranks.metrics {
        tracing::debug!(metric = %metric.metric, direction = ?metric.direction, "ranked metric");
    }
    tracing::info!(metrics = ranks.metrics.len(), "ranked metric columns");

    let summary = summarize(
        &ranks.means,
        &config.profile.partition,
        &AggregateOptions {
            top_n: config.profile.top_n,
            tie_break: config.tie_break,
        },
    )?;
    if !summary.categories.is_empty() {
        tracing::info!(categories = ?summary.categories, "discovered categories");
    }

    let names = match &config.names_path {
        Some(path) => load_name_table(path)?,
        None => NameTable::default(),
    };
    if !names.is_empty() {
        tracing::debug!(entries = names.len(), "loaded name table");
    }

    let stage4 = Stage4Input {
        profile_name: &config.profile.name,
        tables: &tables,
        ranks: &ranks,
        summary: &summary,
        names: &names,
    };
    print!("{}", stage4.report_text());

    if let Some(out_dir) = &config.out_dir {
        write_reports(&stage4, out_dir)?;
    }
    Ok(())
}

fn build_config(args: &RunArgs) -> Result<RunConfig, CliError> {
    let roster = match (&args.input, args.submission.is_empty()) {
        (Some(dir), true) => Roster::Directory(dir.clone()),
        (None, false) => Roster::Files(args.submission.clone()),
        (Some(_), false) => {
            return Err(CliError::Args(
                "use either --input or --submission, not both".to_string(),
            ));
        }
        (None, true) => {
            return Err(CliError::Args(
                "missing --input or --submission".to_string(),
            ));
        }
    };

    let mut profile = match args.profile {
        ProfileArg::Lesionwise => TaskProfile::lesionwise_v1(),
        ProfileArg::Inpainting => TaskProfile::inpainting_v1(),
    };
    if let Some(key) = &args.key_column {
        profile.key_column = key.clone();
    }
    if let Some(top) = args.top {
        if top == 0 {
            return Err(CliError::Args("--top must be at least 1".to_string()));
        }
        profile.top_n = top;
    }

    let tie_break = match args.tie_break {
        TieBreakArg::Id => TieBreak::SubmissionId,
        TieBreakArg::Input => TieBreak::InputOrder,
    };

    Ok(RunConfig {
        roster,
        profile,
        tie_break,
        names_path: args.names.clone(),
        out_dir: args.out.clone(),
    })
}

fn resolve_roster(roster: &Roster) -> Result<Vec<PathBuf>, CliError> {
    match roster {
        Roster::Directory(dir) => Ok(discover_submissions(dir)?),
        Roster::Files(paths) => Ok(paths.clone()),
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
