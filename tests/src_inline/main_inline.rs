use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_subrank_main_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_lesionwise(dir: &Path, id: &str, et: f64, wt: f64) {
    let mut csv = String::from("Label");
    for region in ["ET", "WT"] {
        for metric in ["LesionWise_Dice_", "LesionWise_NSD_1.0_", "LesionWise_NSD_0.5_"] {
            csv.push_str(&format!(",{metric}{region}"));
        }
        csv.push_str(&format!(",Num_TP_{region}"));
    }
    csv.push('\n');
    for case in ["case_1", "case_2"] {
        csv.push_str(case);
        for v in [et, wt] {
            csv.push_str(&format!(",{v},{v},{v},1"));
        }
        csv.push('\n');
    }
    fs::write(dir.join(format!("{id}.csv")), csv).unwrap();
}

fn parse_run(args: &[&str]) -> RunArgs {
    let mut argv = vec!["kira-subrank", "run"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    let Command::Run(run) = cli.command;
    run
}

#[test]
fn test_parse_defaults() {
    let args = parse_run(&["--input", "SSA"]);
    assert_eq!(args.input, Some(PathBuf::from("SSA")));
    assert_eq!(args.profile, ProfileArg::Lesionwise);
    assert_eq!(args.tie_break, TieBreakArg::Id);
    assert!(args.out.is_none());

    let config = build_config(&args).unwrap();
    assert_eq!(config.roster, Roster::Directory(PathBuf::from("SSA")));
    assert_eq!(config.profile.name, "lesionwise");
    assert_eq!(config.profile.top_n, 10);
    assert_eq!(config.tie_break, TieBreak::SubmissionId);
}

#[test]
fn test_parse_repeated_submissions() {
    let args = parse_run(&[
        "--submission",
        "INPT/1.csv",
        "--submission",
        "INPT/2.csv",
        "--profile",
        "inpainting",
        "--tie-break",
        "input",
        "--top",
        "3",
        "--key-column",
        "CaseID",
    ]);
    let config = build_config(&args).unwrap();
    assert_eq!(
        config.roster,
        Roster::Files(vec![PathBuf::from("INPT/1.csv"), PathBuf::from("INPT/2.csv")])
    );
    assert_eq!(config.profile.name, "inpainting");
    assert_eq!(config.profile.top_n, 3);
    assert_eq!(config.profile.key_column, "CaseID");
    assert_eq!(config.tie_break, TieBreak::InputOrder);
}

#[test]
fn test_parse_requires_roster() {
    assert!(Cli::try_parse_from(["kira-subrank", "run"]).is_err());
    assert!(
        Cli::try_parse_from([
            "kira-subrank",
            "run",
            "--input",
            "dir",
            "--submission",
            "a.csv"
        ])
        .is_err()
    );
}

#[test]
fn test_top_zero_rejected() {
    let args = parse_run(&["--input", "SSA", "--top", "0"]);
    assert!(matches!(build_config(&args), Err(CliError::Args(_))));
}

#[test]
fn test_unknown_profile_rejected() {
    assert!(
        Cli::try_parse_from(["kira-subrank", "run", "--input", "d", "--profile", "ocr"]).is_err()
    );
}

#[test]
fn test_run_end_to_end() {
    let dir = make_temp_dir();
    let input = dir.join("SSA");
    fs::create_dir_all(&input).unwrap();
    write_lesionwise(&input, "9752810", 0.8, 0.8);
    write_lesionwise(&input, "9754422", 0.9, 0.9);
    write_lesionwise(&input, "9754423", 0.9, 0.7);
    let names = dir.join("names.tsv");
    fs::write(&names, "9754422\tmodel + PP_cc\n").unwrap();
    let out = dir.join("out");

    let args = parse_run(&[
        "--input",
        input.to_str().unwrap(),
        "--names",
        names.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ]);
    run(&args).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("summary.json")).unwrap()).unwrap();
    assert_eq!(json["mode"], "categorized");
    assert_eq!(json["categories"], serde_json::json!(["ET", "WT"]));
    assert_eq!(json["best_overall"]["id"], "9754422");
    assert_eq!(json["best_overall"]["score"], 1.0);
    assert_eq!(json["best_per_category"]["ET"]["id"], "9754422");
    assert_eq!(json["ordering"][1]["id"], "9752810");
    assert_eq!(json["ordering"][2]["id"], "9754423");
    assert_eq!(json["ordering"][2]["score"], 2.0);

    let report = fs::read_to_string(out.join("report.txt")).unwrap();
    assert!(report.contains("Best overall: '9754422:model + PP_cc' with mean score 1.0000"));
}

#[test]
fn test_run_reports_missing_input_dir() {
    let dir = make_temp_dir();
    let args = parse_run(&["--input", dir.join("absent").to_str().unwrap()]);
    assert!(matches!(run(&args), Err(CliError::Input(_))));
}
