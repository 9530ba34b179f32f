use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::model::profile::TaskProfile;
use crate::model::table::MetricColumn;
use crate::pipeline::stage2_ranks::run_stage2;
use crate::pipeline::stage3_aggregate::{AggregateOptions, summarize};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_subrank_stage4_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn table(id: &str, ssim: &[f64], psnr: &[f64], mse: &[f64]) -> MetricTable {
    let column = |name: &str, values: &[f64]| MetricColumn {
        name: name.to_string(),
        values: values.to_vec(),
    };
    MetricTable {
        id: id.to_string(),
        source: PathBuf::from(format!("{id}.csv")),
        columns: vec![
            column("SSIM", ssim),
            column("PSNR", psnr),
            column("MSE", mse),
        ],
        keys: Some(vec!["c1".to_string(), "c2".to_string()]),
    }
}

#[test]
fn test_write_reports_outputs() {
    let profile = TaskProfile::inpainting_v1();
    let tables = vec![
        table("1", &[0.9, 0.8], &[30.0, 29.0], &[0.01, 0.02]),
        table("2", &[0.7, 0.6], &[25.0, 24.0], &[0.05, 0.04]),
    ];
    let ranks = run_stage2(&tables, &profile).unwrap();
    let summary = summarize(&ranks.means, &profile.partition, &AggregateOptions::default()).unwrap();
    let names = NameTable::from_pairs([("1", "model 1")]);

    let input = Stage4Input {
        profile_name: &profile.name,
        tables: &tables,
        ranks: &ranks,
        summary: &summary,
        names: &names,
    };
    let out_dir = make_temp_dir().join("out");
    write_reports(&input, &out_dir).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("summary.json")).unwrap()).unwrap();
    assert_eq!(json["tool"]["name"], "kira-subrank");
    assert_eq!(json["profile"], "inpainting");
    assert_eq!(json["n_submissions"], 2);
    assert_eq!(json["mode"], "flat");
    assert_eq!(json["best_overall"]["id"], "1");
    assert_eq!(json["best_overall"]["score"], 1.0);
    assert_eq!(json["display_names"]["1"], "model 1");
    assert_eq!(json["ordering"][1]["id"], "2");

    let report = fs::read_to_string(out_dir.join("report.txt")).unwrap();
    assert!(report.contains("Best overall: '1:model 1' with mean score 1.0000"));

    let means = fs::read_to_string(out_dir.join("metric_means.tsv")).unwrap();
    let lines: Vec<&str> = means.lines().collect();
    assert_eq!(lines[0], "position\tsubmission\tcomposite\tSSIM\tPSNR\tMSE");
    assert_eq!(lines[1], "1\t1\t1.0000\t1.0000\t1.0000\t1.0000");
    assert_eq!(lines[2], "2\t2\t2.0000\t2.0000\t2.0000\t2.0000");

    let ranks_tsv = fs::read_to_string(out_dir.join("ranks.tsv")).unwrap();
    let lines: Vec<&str> = ranks_tsv.lines().collect();
    assert_eq!(lines.len(), 1 + 2 * 3 * 2);
    assert_eq!(lines[1], "1\tSSIM\tc1\t0.9\t1");
    assert!(lines.contains(&"2\tMSE\tc2\t0.04\t2"));
}

#[test]
fn test_report_text_without_names() {
    let profile = TaskProfile::inpainting_v1();
    let tables = vec![
        table("b", &[0.9, 0.8], &[30.0, 29.0], &[0.01, 0.02]),
        table("a", &[0.9, 0.8], &[30.0, 29.0], &[0.01, 0.02]),
    ];
    let ranks = run_stage2(&tables, &profile).unwrap();
    let summary = summarize(&ranks.means, &profile.partition, &AggregateOptions::default()).unwrap();
    let names = NameTable::default();
    let input = Stage4Input {
        profile_name: &profile.name,
        tables: &tables,
        ranks: &ranks,
        summary: &summary,
        names: &names,
    };
    let text = input.report_text();
    assert!(text.contains("1. a with mean score 1.0000"));
    assert!(text.contains("2. b with mean score 1.0000"));
    assert!(!text.contains("Categories:"));
}
