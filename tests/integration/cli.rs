use anyhow::Result;
use predicates::prelude::*;

use tfdeps_cli::analyzer::root_label;
use tfdeps_cli::tree::NamedNode;

use crate::common::{TestWorkspace, label, module_block};

fn workspace_with_one_module() -> Result<(TestWorkspace, String, std::path::PathBuf)> {
    let ws = TestWorkspace::new()?;
    let network = ws.repo("network")?;
    network.write_module("vpc", "")?;
    network.commit_and_tag("v1")?;
    let url = network.url();
    let entry = ws.write_live("prod/main.tf", &module_block("vpc", &url, "vpc", "v1"))?;
    Ok((ws, url, entry))
}

#[test]
fn test_analyze_text_report() -> Result<()> {
    let (ws, url, entry) = workspace_with_one_module()?;

    let expected = format!(
        "{}\n  {}\n    No further dependencies\n",
        root_label(&entry),
        label(&url, "vpc", "v1")
    );
    ws.tfdeps("analyze", &entry).assert().success().stdout(expected);
    assert_eq!(ws.scratch_runs(), 0);
    Ok(())
}

#[test]
fn test_analyze_json_report() -> Result<()> {
    let (ws, url, entry) = workspace_with_one_module()?;

    let output = ws.tfdeps("analyze", &entry).args(["--format", "json"]).output()?;
    assert!(output.status.success());

    let node: NamedNode = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        node,
        NamedNode::with_children(root_label(&entry), vec![NamedNode::leaf(label(&url, "vpc", "v1"))])
    );
    Ok(())
}

#[test]
fn test_analyze_tree_report() -> Result<()> {
    let (ws, url, entry) = workspace_with_one_module()?;

    ws.tfdeps("analyze", &entry)
        .args(["--format", "tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("└── {}", label(&url, "vpc", "v1"))));
    Ok(())
}

#[test]
fn test_analyze_writes_dot_graph() -> Result<()> {
    let (ws, url, entry) = workspace_with_one_module()?;
    let graph = ws.path().join("out").join("deps.dot");

    ws.tfdeps("analyze", &entry).arg("--graph").arg(&graph).assert().success();

    let dot = std::fs::read_to_string(&graph)?;
    assert!(dot.starts_with("digraph"));
    assert!(dot.contains(&label(&url, "vpc", "v1")));
    assert!(dot.contains("0 -> 1"));
    Ok(())
}

#[test]
fn test_analyze_keep_scratch_flag() -> Result<()> {
    let (ws, _, entry) = workspace_with_one_module()?;
    ws.tfdeps("analyze", &entry).arg("--keep-scratch").assert().success();
    assert_eq!(ws.scratch_runs(), 1);
    Ok(())
}

#[test]
fn test_analyze_missing_file_fails() -> Result<()> {
    let ws = TestWorkspace::new()?;
    ws.tfdeps("analyze", &ws.path().join("live/none/main.tf"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Cannot read entry file"));
    Ok(())
}

#[test]
fn test_failed_fetch_still_succeeds() -> Result<()> {
    let ws = TestWorkspace::new()?;
    let url = ws.repo_url("ghost");
    let entry = ws.write_live("main.tf", &module_block("ghost", &url, "vpc", "v1"))?;

    ws.tfdeps("analyze", &entry)
        .assert()
        .success()
        .stdout(predicate::str::contains("ERROR DOWNLOADING"))
        .stderr(predicate::str::contains(url));
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() -> Result<()> {
    let (ws, _, entry) = workspace_with_one_module()?;
    let config = ws.path().join("tfdeps.toml");
    std::fs::write(&config, "max_depht = 3\n")?;

    ws.tfdeps("analyze", &entry)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
    Ok(())
}

#[test]
fn test_scan_report() -> Result<()> {
    let (ws, url, entry) = workspace_with_one_module()?;
    let empty = ws.write_live("dev/main.tf", "locals {}\n")?;

    ws.tfdeps("scan", &ws.path().join("live"))
        .assert()
        .success()
        .stdout(predicate::str::contains(root_label(&entry)))
        .stdout(predicate::str::contains(label(&url, "vpc", "v1")))
        .stdout(predicate::str::contains(format!(
            "No dependencies found for file: {}",
            empty.display()
        )))
        .stdout(predicate::str::contains(
            "2 file(s) scanned: 1 with dependencies, 1 without, 0 failed",
        ));
    Ok(())
}

#[test]
fn test_scan_json_is_an_array() -> Result<()> {
    let (ws, _, entry) = workspace_with_one_module()?;

    let output = ws.tfdeps("scan", &ws.path().join("live")).args(["--format", "json"]).output()?;
    assert!(output.status.success());

    let nodes: Vec<NamedNode> = serde_json::from_slice(&output.stdout)?;
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].label, root_label(&entry));
    Ok(())
}
