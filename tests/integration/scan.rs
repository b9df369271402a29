use anyhow::Result;

use tfdeps_cli::analyzer::{analyze_directory, root_label};
use tfdeps_cli::models::ResolutionOutcome;

use crate::common::{TestWorkspace, module_block};

#[tokio::test]
async fn test_scan_directory() -> Result<()> {
    let ws = TestWorkspace::new()?;
    let network = ws.repo("network")?;
    network.write_module("vpc", "")?;
    network.commit_and_tag("v1")?;
    let block = module_block("vpc", &network.url(), "vpc", "v1");

    let a = ws.write_live("a/main.tf", &block)?;
    let b = ws.write_live("b/terragrunt.hcl", &block)?;
    let c = ws.write_live("c/main.tf", "resource \"null_resource\" \"x\" {}\n")?;
    ws.write_live("a/.terraform/modules/vpc/main.tf", &block)?;
    ws.write_live("b/.terragrunt-cache/abc/terragrunt.hcl", &block)?;

    let report = analyze_directory(&ws.path().join("live"), &ws.options()).await?;

    assert_eq!(report.files_scanned(), 3);
    let labels: Vec<_> = report.trees.iter().map(|t| t.root_label.clone()).collect();
    assert_eq!(labels, vec![root_label(&a), root_label(&b)]);
    assert_eq!(report.skipped, vec![c]);
    assert!(report.failed.is_empty());

    for tree in &report.trees {
        assert_eq!(tree.outcome.children().len(), 1);
        assert_eq!(tree.outcome.children()[0].1, ResolutionOutcome::NoDependencies);
    }
    assert_eq!(ws.scratch_runs(), 0);
    Ok(())
}

#[tokio::test]
async fn test_scan_keeps_going_after_fetch_failures() -> Result<()> {
    let ws = TestWorkspace::new()?;
    ws.write_live(
        "broken/main.tf",
        &module_block("ghost", &ws.repo_url("ghost"), "vpc", "v1"),
    )?;
    let network = ws.repo("network")?;
    network.write_module("vpc", "")?;
    network.commit_and_tag("v1")?;
    ws.write_live("ok/main.tf", &module_block("vpc", &network.url(), "vpc", "v1"))?;

    let report = analyze_directory(&ws.path().join("live"), &ws.options()).await?;

    assert_eq!(report.trees.len(), 2);
    assert_eq!(report.trees[0].failures().len(), 1);
    assert!(report.trees[1].failures().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_scan_empty_directory() -> Result<()> {
    let ws = TestWorkspace::new()?;
    let report = analyze_directory(&ws.path().join("live"), &ws.options()).await?;
    assert_eq!(report.files_scanned(), 0);
    Ok(())
}
