use anyhow::Result;

use tfdeps_cli::analyzer::{AnalyzeOptions, analyze_file, root_label};
use tfdeps_cli::models::{DependencyRef, ResolutionOutcome};
use tfdeps_cli::resolver::ResolverOptions;
use tfdeps_cli::tree::{project, render_text};

use crate::common::{TestWorkspace, label, module_block};

#[tokio::test]
async fn test_single_hop_report() -> Result<()> {
    let ws = TestWorkspace::new()?;
    let network = ws.repo("network")?;
    network.write_module("modules/vpc", "variable \"cidr\" {}\n")?;
    network.commit_and_tag("v1")?;

    let entry = ws.write_live(
        "prod/main.tf",
        &module_block("vpc", &network.url(), "modules/vpc", "v1"),
    )?;

    let tree = analyze_file(&entry, &ws.options()).await?;

    assert_eq!(tree.root_label, root_label(&entry));
    assert_eq!(
        render_text(&project(&tree), 0),
        vec![
            root_label(&entry),
            format!("  {}", label(&network.url(), "modules/vpc", "v1")),
            "    No further dependencies".to_string(),
        ]
    );
    assert_eq!(ws.scratch_runs(), 0, "scratch root should be purged");
    Ok(())
}

#[tokio::test]
async fn test_transitive_chain() -> Result<()> {
    let ws = TestWorkspace::new()?;

    let lib = ws.repo("lib")?;
    lib.write_module("naming", "")?;
    lib.commit_and_tag("v3")?;

    let network = ws.repo("network")?;
    network.write_module("modules/vpc", &module_block("naming", &lib.url(), "naming", "v3"))?;
    network.commit_and_tag("v1")?;

    let app = ws.repo("app")?;
    app.write_module("svc", &module_block("vpc", &network.url(), "modules/vpc", "v1"))?;
    app.commit_and_tag("v2")?;

    let entry = ws.write_live("main.tf", &module_block("svc", &app.url(), "svc", "v2"))?;
    let tree = analyze_file(&entry, &ws.options()).await?;

    let app_ref = DependencyRef::new(app.url(), "svc", "v2");
    let net_ref = DependencyRef::new(network.url(), "modules/vpc", "v1");
    let lib_ref = DependencyRef::new(lib.url(), "naming", "v3");

    let app_outcome = tree.outcome.get(&app_ref).expect("app resolved");
    let net_outcome = app_outcome.get(&net_ref).expect("network resolved");
    assert_eq!(net_outcome.get(&lib_ref), Some(&ResolutionOutcome::NoDependencies));
    assert_eq!(tree.dependency_count(), 3);
    assert!(tree.failures().is_empty());

    let lines = render_text(&project(&tree), 0);
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[3], format!("      {}", label(&lib.url(), "naming", "v3")));
    assert_eq!(lines[4], "        No further dependencies");
    Ok(())
}

#[tokio::test]
async fn test_pinned_ref_is_honored() -> Result<()> {
    let ws = TestWorkspace::new()?;

    let lib = ws.repo("lib")?;
    lib.write_module("tags", "")?;
    lib.commit_and_tag("v1")?;

    let network = ws.repo("network")?;
    network.write_module("vpc", "")?;
    network.commit_and_tag("v1")?;
    network.write_module("vpc", &module_block("tags", &lib.url(), "tags", "v1"))?;
    network.commit_and_tag("v2")?;

    let entry = ws.write_live(
        "main.tf",
        &format!(
            "{}{}",
            module_block("old", &network.url(), "vpc", "v1"),
            module_block("new", &network.url(), "vpc", "v2")
        ),
    )?;
    let tree = analyze_file(&entry, &ws.options()).await?;

    let v1 = DependencyRef::new(network.url(), "vpc", "v1");
    let v2 = DependencyRef::new(network.url(), "vpc", "v2");
    assert_eq!(tree.outcome.get(&v1), Some(&ResolutionOutcome::NoDependencies));
    assert_eq!(
        tree.outcome.get(&v2).map(ResolutionOutcome::children).map(<[_]>::len),
        Some(1)
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_fetch_is_confined_to_its_branch() -> Result<()> {
    let ws = TestWorkspace::new()?;
    let network = ws.repo("network")?;
    network.write_module("vpc", "")?;
    network.commit_and_tag("v1")?;

    let entry = ws.write_live(
        "main.tf",
        &format!(
            "{}{}{}",
            module_block("missing_ref", &network.url(), "vpc", "v9"),
            module_block("missing_dir", &network.url(), "nope", "v1"),
            module_block("ok", &network.url(), "vpc", "v1")
        ),
    )?;
    let tree = analyze_file(&entry, &ws.options()).await?;

    let children = tree.outcome.children();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].1, ResolutionOutcome::FetchFailed);
    assert_eq!(children[1].1, ResolutionOutcome::FetchFailed);
    assert_eq!(children[2].1, ResolutionOutcome::NoDependencies);
    assert_eq!(tree.failures().len(), 2);

    let lines = render_text(&project(&tree), 0);
    assert_eq!(lines[2], "    ERROR DOWNLOADING");
    assert_eq!(lines[3], "      No further dependencies");
    Ok(())
}

#[tokio::test]
async fn test_missing_repository_is_fetch_failure() -> Result<()> {
    let ws = TestWorkspace::new()?;
    let entry = ws.write_live(
        "main.tf",
        &module_block("ghost", &ws.repo_url("does-not-exist"), "vpc", "v1"),
    )?;

    let tree = analyze_file(&entry, &ws.options()).await?;
    assert_eq!(
        tree.outcome.children().first().map(|(_, outcome)| outcome),
        Some(&ResolutionOutcome::FetchFailed)
    );
    Ok(())
}

#[tokio::test]
async fn test_terragrunt_module_and_nested_lookup() -> Result<()> {
    let ws = TestWorkspace::new()?;

    let lib = ws.repo("lib")?;
    lib.write_module("modules/network/vpc", "")?;
    lib.commit_and_tag("v1")?;

    let stack = ws.repo("stack")?;
    stack.write_terragrunt_module(
        "live/vpc",
        &format!(
            "terraform {{\n{}\n}}\n",
            tfdeps_cli::test_utils::source_line(&lib.url(), "vpc", "v1")
        ),
    )?;
    stack.commit_and_tag("v1")?;

    let entry = ws.write_live("terragrunt.hcl", &module_block("stack", &stack.url(), "live/vpc", "v1"))?;
    let tree = analyze_file(&entry, &ws.options()).await?;

    let stack_ref = DependencyRef::new(stack.url(), "live/vpc", "v1");
    let lib_ref = DependencyRef::new(lib.url(), "vpc", "v1");
    let stack_outcome = tree.outcome.get(&stack_ref).expect("stack resolved");
    // "vpc" is found at modules/network/vpc by walking the clone
    assert_eq!(stack_outcome.get(&lib_ref), Some(&ResolutionOutcome::NoDependencies));
    Ok(())
}

#[tokio::test]
async fn test_parallel_reused_clones_match_sequential() -> Result<()> {
    let ws = TestWorkspace::new()?;

    let shared = ws.repo("shared")?;
    shared.write_module("a", "")?;
    shared.write_module("b", "")?;
    shared.commit_and_tag("v1")?;

    let app = ws.repo("app")?;
    app.write_module(
        "svc",
        &format!(
            "{}{}",
            module_block("a", &shared.url(), "a", "v1"),
            module_block("b", &shared.url(), "b", "v1")
        ),
    )?;
    app.commit_and_tag("v1")?;

    let entry = ws.write_live(
        "main.tf",
        &format!(
            "{}{}",
            module_block("svc", &app.url(), "svc", "v1"),
            module_block("direct", &shared.url(), "b", "v1")
        ),
    )?;

    let sequential = analyze_file(&entry, &ws.options()).await?;
    let parallel = analyze_file(
        &entry,
        &AnalyzeOptions {
            reuse_clones: true,
            resolver: ResolverOptions {
                max_parallel: 4,
                ..ResolverOptions::default()
            },
            ..ws.options()
        },
    )
    .await?;

    assert_eq!(sequential, parallel);
    assert_eq!(project(&sequential), project(&parallel));
    Ok(())
}

#[tokio::test]
async fn test_keep_scratch_retains_clones() -> Result<()> {
    let ws = TestWorkspace::new()?;
    let network = ws.repo("network")?;
    network.write_module("vpc", "")?;
    network.commit_and_tag("v1")?;

    let entry = ws.write_live("main.tf", &module_block("vpc", &network.url(), "vpc", "v1"))?;
    analyze_file(
        &entry,
        &AnalyzeOptions {
            keep_scratch: true,
            ..ws.options()
        },
    )
    .await?;

    assert_eq!(ws.scratch_runs(), 1);
    let run_dir = std::fs::read_dir(ws.scratch_dir())?.next().expect("run dir")?.path();
    let clones: Vec<_> = std::fs::read_dir(&run_dir)?.collect::<Result<_, _>>()?;
    assert_eq!(clones.len(), 1);
    assert!(clones[0].path().join("vpc").join("main.tf").is_file());
    Ok(())
}

#[tokio::test]
async fn test_repeated_analysis_is_identical() -> Result<()> {
    let ws = TestWorkspace::new()?;
    let network = ws.repo("network")?;
    network.write_module("vpc", "")?;
    network.commit_and_tag("v1")?;
    let entry = ws.write_live("main.tf", &module_block("vpc", &network.url(), "vpc", "v1"))?;

    let first = analyze_file(&entry, &ws.options()).await?;
    let second = analyze_file(&entry, &ws.options()).await?;
    assert_eq!(first, second);
    Ok(())
}
