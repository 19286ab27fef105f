mod registry;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use registry::init_logging;
use thiserror::Error;
use tracefixture_core::{Error as CoreError, FixtureConfig, FixtureTable, load_config};
use tracefixture_eval::{CheckOptions, EvalError, IntegrityChecker, render_report};
use tracefixture_generate::{
    GenerateOptions, GenerationEngine, GenerationError, GenerationReport, TableReport,
};

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("integrity error: {0}")]
    Eval(#[from] EvalError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "tracefixture",
    version,
    about = "Cross-referenced issue tracker, wiki and change-management CSV fixtures"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the five fixture CSV files.
    Generate(GenerateArgs),
    /// Verify the referential integrity of an existing fixture directory.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// TOML config file; flags below override its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output directory (defaults to the working directory).
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Date standing in for "today" (YYYY-MM-DD).
    #[arg(long, value_name = "YYYY-MM-DD")]
    reference_date: Option<NaiveDate>,
    /// Number of unique issues.
    #[arg(long)]
    issues: Option<usize>,
    /// Number of wiki pages.
    #[arg(long)]
    pages: Option<usize>,
    /// Number of unique change requests.
    #[arg(long)]
    change_requests: Option<usize>,
    /// Number of change tasks.
    #[arg(long)]
    change_tasks: Option<usize>,
    /// Number of issue activity entries.
    #[arg(long)]
    activities: Option<usize>,
    /// Size of the user roster.
    #[arg(long)]
    users: Option<usize>,
    /// Write generation_report.json to this path.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Append JSON log lines to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Fixture directory to check.
    #[arg(default_value = ".")]
    dir: PathBuf,
    /// Exit with an error when any violation is found.
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// Write integrity_report.json to this path.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Number of violations listed in the printed summary.
    #[arg(long, default_value_t = 20)]
    max_examples: usize,
    /// Append JSON log lines to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Check(args) => run_check(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    init_logging(args.log_file.as_deref())?;

    let options = generate_options(&args)?;
    tracing::info!(event = "generation_started", out_dir = %options.out_dir.display());

    let result = GenerationEngine::new(options).run()?;
    for line in generation_lines(&result.report) {
        println!("{line}");
    }

    tracing::info!(
        event = "generation_finished",
        run_id = %result.report.run_id,
        seed = result.report.seed,
        duration_ms = result.report.duration_ms
    );
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), CliError> {
    init_logging(args.log_file.as_deref())?;
    check_dataset(&args, &mut io::stdout().lock())
}

/// Print the summary first; `--strict` only decides the exit status.
fn check_dataset(args: &CheckArgs, out: &mut impl Write) -> Result<(), CliError> {
    let checker = IntegrityChecker::new(CheckOptions {
        strict: false,
        report_path: args.report.clone(),
    });
    let report = checker.run(&args.dir)?;
    writeln!(out, "{}", render_report(&report, args.max_examples))?;

    if args.strict && !report.is_clean() {
        return Err(EvalError::Violations(report.violations.len() as u64).into());
    }
    Ok(())
}

/// Config file (or defaults) with command-line overrides applied.
fn generate_options(args: &GenerateArgs) -> Result<GenerateOptions, CliError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => FixtureConfig::default(),
    };
    apply_overrides(&mut config, args);

    let mut options = GenerateOptions::from_config(&config);
    options.report_path = args.report.clone();
    Ok(options)
}

fn apply_overrides(config: &mut FixtureConfig, args: &GenerateArgs) {
    if let Some(out) = &args.out {
        config.out_dir = out.clone();
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(date) = args.reference_date {
        config.reference_date = Some(date);
    }
    if let Some(users) = args.users {
        config.users = users;
    }

    let counts = &mut config.counts;
    let overrides = [
        (&mut counts.issues, args.issues),
        (&mut counts.wiki_pages, args.pages),
        (&mut counts.change_requests, args.change_requests),
        (&mut counts.change_tasks, args.change_tasks),
        (&mut counts.issue_activities, args.activities),
    ];
    for (slot, value) in overrides {
        if let Some(value) = value {
            *slot = value;
        }
    }
}

/// One line per table in generation order: its summary, or why it was skipped.
fn generation_lines(report: &GenerationReport) -> Vec<String> {
    FixtureTable::GENERATION_ORDER
        .into_iter()
        .filter_map(|table| match report.table(table) {
            Some(written) => Some(summary_line(written)),
            None if report.skipped.contains(&table) => Some(skipped_line(table)),
            None => None,
        })
        .collect()
}

fn summary_line(table: &TableReport) -> String {
    let file = file_label(&table.file);
    let unique = match table.table {
        FixtureTable::Issues => Some("JIRA issues"),
        FixtureTable::ChangeRequests => Some("CRs"),
        _ => None,
    };
    match unique {
        Some(label) => format!(
            "Generated {file} with {} data rows ({} unique {label}).",
            table.rows_written, table.base_rows
        ),
        None => format!("Generated {file} with {} data rows.", table.rows_written),
    }
}

fn skipped_line(table: FixtureTable) -> String {
    let missing = match table {
        FixtureTable::ChangeTasks => "CR_IDs",
        FixtureTable::IssueActivities => "JIRA_IDs",
        _ => "upstream ids",
    };
    format!("Cannot generate {}: No {missing} available.", table.file_name())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_generate(args: &[&str]) -> GenerateArgs {
        let cli = Cli::try_parse_from(args).expect("parse args");
        match cli.command {
            Command::Generate(args) => args,
            Command::Check(_) => panic!("expected generate"),
        }
    }

    #[test]
    fn bare_generate_keeps_default_counts() {
        let args = parse_generate(&["tracefixture", "generate"]);
        let options = generate_options(&args).expect("options");

        assert_eq!(options.out_dir, PathBuf::from("."));
        assert_eq!(options.counts.issues, 72);
        assert_eq!(options.counts.wiki_pages, 23);
        assert_eq!(options.counts.change_requests, 22);
        assert_eq!(options.counts.change_tasks, 18);
        assert_eq!(options.counts.issue_activities, 35);
        assert!(options.seed.is_none());
        assert!(options.report_path.is_none());
    }

    #[test]
    fn flags_override_config_file() {
        let mut path = std::env::temp_dir();
        path.push(format!("tracefixture_cli_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "seed = 3\nusers = 12\n\n[counts]\nissues = 10\nwiki_pages = 4\n",
        )
        .expect("write config");

        let config = path.to_string_lossy().into_owned();
        let args = parse_generate(&[
            "tracefixture",
            "generate",
            "--config",
            config.as_str(),
            "--seed",
            "9",
            "--pages",
            "6",
            "--reference-date",
            "2024-05-02",
            "--out",
            "fixtures",
        ]);
        let options = generate_options(&args).expect("options");

        assert_eq!(options.seed, Some(9));
        assert_eq!(options.users, 12);
        assert_eq!(options.counts.issues, 10);
        assert_eq!(options.counts.wiki_pages, 6);
        assert_eq!(options.counts.change_requests, 22);
        assert_eq!(options.out_dir, PathBuf::from("fixtures"));
        assert_eq!(
            options.reference_time,
            NaiveDate::from_ymd_opt(2024, 5, 2).and_then(|date| date.and_hms_opt(0, 0, 0))
        );
    }

    #[test]
    fn malformed_reference_date_is_rejected() {
        let result = Cli::try_parse_from([
            "tracefixture",
            "generate",
            "--reference-date",
            "05/02/2024",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn check_defaults_to_working_directory() {
        let cli = Cli::try_parse_from(["tracefixture", "check", "--strict"]).expect("parse");
        match cli.command {
            Command::Check(args) => {
                assert_eq!(args.dir, PathBuf::from("."));
                assert!(args.strict);
                assert_eq!(args.max_examples, 20);
            }
            Command::Generate(_) => panic!("expected check"),
        }
    }

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("tracefixture_cli_{label}_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn check_args(dir: &Path, strict: bool) -> CheckArgs {
        CheckArgs {
            dir: dir.to_path_buf(),
            strict,
            report: None,
            max_examples: 20,
            log_file: None,
        }
    }

    #[test]
    fn strict_check_prints_violations_before_failing() {
        let dir = temp_dir("strict");
        let header = FixtureTable::ChangeTasks.header().join(",");
        std::fs::write(
            dir.join(FixtureTable::ChangeTasks.file_name()),
            format!("{header}\nCTASK001,CR-FS-999,Ada_L,2024-05-01 09:30,2024-05-01 11:30,Fix\n"),
        )
        .expect("write tasks");

        let mut out = Vec::new();
        let err = check_dataset(&check_args(&dir, true), &mut out).expect_err("strict fails");
        assert!(matches!(err, CliError::Eval(EvalError::Violations(1))));

        let printed = String::from_utf8(out).expect("utf8 output");
        assert!(printed.contains("- missing_upstream: 1"), "{printed}");
        assert!(printed.contains("[missing_upstream] CR_CTasks.csv"), "{printed}");
    }

    #[test]
    fn lenient_check_prints_and_succeeds() {
        let dir = temp_dir("lenient");
        let mut out = Vec::new();
        check_dataset(&check_args(&dir, false), &mut out).expect("check passes");
        let printed = String::from_utf8(out).expect("utf8 output");
        assert!(printed.contains("No violations found."));
    }

    #[test]
    fn generation_lines_keep_table_order() {
        let reference_time = NaiveDate::from_ymd_opt(2024, 7, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid time");
        let mut report = GenerationReport::new("run".to_string(), 1, reference_time);
        for (table, rows) in [
            (FixtureTable::Issues, 72),
            (FixtureTable::WikiPages, 23),
            (FixtureTable::ChangeRequests, 0),
            (FixtureTable::IssueActivities, 35),
        ] {
            report.record_table(TableReport {
                table,
                file: PathBuf::from(table.file_name()),
                rows_requested: rows,
                base_rows: rows,
                rows_written: rows,
                bytes_written: 0,
            });
        }
        report.record_skipped(
            FixtureTable::ChangeTasks,
            tracefixture_generate::GenerationIssue {
                level: "warning".to_string(),
                code: "empty_upstream_pool".to_string(),
                message: "no change requests".to_string(),
                table: Some(FixtureTable::ChangeTasks),
            },
        );

        let lines = generation_lines(&report);
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[3],
            "Cannot generate CR_CTasks.csv: No CR_IDs available."
        );
        assert_eq!(lines[4], "Generated JIRA_Activities.csv with 35 data rows.");
    }

    #[test]
    fn summary_lines_follow_table_kind() {
        let issues = TableReport {
            table: FixtureTable::Issues,
            file: PathBuf::from("out/JIRA_Issues_Detailed.csv"),
            rows_requested: 72,
            base_rows: 72,
            rows_written: 151,
            bytes_written: 0,
        };
        assert_eq!(
            summary_line(&issues),
            "Generated JIRA_Issues_Detailed.csv with 151 data rows (72 unique JIRA issues)."
        );

        let tasks = TableReport {
            table: FixtureTable::ChangeTasks,
            file: PathBuf::from("CR_CTasks.csv"),
            rows_requested: 18,
            base_rows: 18,
            rows_written: 18,
            bytes_written: 0,
        };
        assert_eq!(summary_line(&tasks), "Generated CR_CTasks.csv with 18 data rows.");
        assert_eq!(
            skipped_line(FixtureTable::IssueActivities),
            "Cannot generate JIRA_Activities.csv: No JIRA_IDs available."
        );
    }
}
