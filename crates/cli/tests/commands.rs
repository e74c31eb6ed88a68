//! Commands run end to end against a temporary database.

use std::fs;
use std::path::Path;

use clap::Parser;
use llm_leaderboard_cli::{run, Cli};

const CATALOG: &str = r#"
[models.alpha]
name = "Alpha"
provider = "OpenAI"

[models.beta]
name = "Beta"
provider = "Meta"
"#;

const RESULTS: &str = "\
task_id,task_name,prompt_text,task_group,model_key,output_text,tokens,quality_score
t1,Task 1,Prompt 1,programming,alpha,fn main() {},12,9
t1,Task 1,Prompt 1,programming,beta,print(1),4,6.5
";

fn cli(dir: &Path, args: &[&str]) -> Cli {
    let database = format!("sqlite://{}", dir.join("db/results.db").display());
    let catalog = dir.join("models.toml").display().to_string();
    let mut argv = vec!["leaderboard", "--database", database.as_str(), "--catalog", catalog.as_str()];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("models.toml"), CATALOG).unwrap();
    fs::write(dir.path().join("results.csv"), RESULTS).unwrap();
    dir
}

#[tokio::test]
async fn init_import_and_report() {
    let dir = workspace();
    let csv = dir.path().join("results.csv").display().to_string();
    let reports = dir.path().join("out").display().to_string();

    run(cli(dir.path(), &["init"])).await.unwrap();
    assert!(dir.path().join("db/results.db").exists());

    run(cli(dir.path(), &["import", &csv])).await.unwrap();
    run(cli(dir.path(), &["--json", "leaderboard", "-f", "provider=Meta"])).await.unwrap();
    run(cli(dir.path(), &["compare", "beta"])).await.unwrap();
    run(cli(dir.path(), &["report", "--output", &reports, "--model", "alpha"]))
        .await
        .unwrap();

    let summary = fs::read_to_string(dir.path().join("out/summary.md")).unwrap();
    assert!(summary.contains("| 1 | Alpha | OpenAI | 1 | 9.00 |"));
    let comparison = fs::read_to_string(dir.path().join("out/comparison.md")).unwrap();
    assert!(comparison.contains("**Alpha**"));
}

#[tokio::test]
async fn dry_run_writes_nothing() {
    let dir = workspace();
    let csv = dir.path().join("results.csv").display().to_string();

    run(cli(dir.path(), &["import", "--dry-run", &csv])).await.unwrap();
    assert!(!dir.path().join("db").exists());
}

#[tokio::test]
async fn reset_requires_confirmation() {
    let dir = workspace();
    let err = run(cli(dir.path(), &["reset"])).await.unwrap_err();
    assert!(err.to_string().contains("--yes"));

    run(cli(dir.path(), &["reset", "--yes"])).await.unwrap();
}

#[tokio::test]
async fn rejects_unsupported_files() {
    let dir = workspace();
    let txt = dir.path().join("results.txt").display().to_string();
    let err = run(cli(dir.path(), &["import", &txt])).await.unwrap_err();
    assert!(err.to_string().contains("allowed: csv, xlsx"));
}

#[tokio::test]
async fn imports_xlsx_workbooks() {
    let dir = workspace();
    let path = dir.path().join("results.xlsx");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    let rows = [
        ["task_id", "task_name", "prompt_text", "task_group", "model_key", "quality_score"],
        ["t1", "Task 1", "Prompt 1", "programming", "beta", "7.5"],
    ];
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.write_string(r as u32, c as u16, *value).unwrap();
        }
    }
    workbook.save(&path).unwrap();

    let xlsx = path.display().to_string();
    run(cli(dir.path(), &["import", &xlsx])).await.unwrap();
    run(cli(dir.path(), &["report", "--output", dir.path().join("out").to_str().unwrap()]))
        .await
        .unwrap();

    let summary = fs::read_to_string(dir.path().join("out/summary.md")).unwrap();
    assert!(summary.contains("| 1 | Beta | Meta | 1 | 7.50 |"));
}

#[tokio::test]
async fn deleting_missing_task_fails() {
    let dir = workspace();
    run(cli(dir.path(), &["init"])).await.unwrap();
    let err = run(cli(dir.path(), &["tasks", "delete", "nope"])).await.unwrap_err();
    assert!(err.to_string().contains("not found"));
}
