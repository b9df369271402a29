use anyhow::Result;

use tfdeps_cli::analyzer::{AnalyzeOptions, analyze_file};
use tfdeps_cli::models::{DependencyRef, ResolutionOutcome};
use tfdeps_cli::resolver::ResolverOptions;
use tfdeps_cli::tree::{project, render_text};

use crate::common::{TestWorkspace, label, module_block};

#[tokio::test]
async fn test_mutual_references_terminate() -> Result<()> {
    let ws = TestWorkspace::new()?;
    let a_url = ws.repo_url("a");
    let b_url = ws.repo_url("b");

    let a = ws.repo("a")?;
    a.write_module("m", &module_block("b", &b_url, "m", "v1"))?;
    a.commit_and_tag("v1")?;

    let b = ws.repo("b")?;
    b.write_module("m", &module_block("a", &a_url, "m", "v1"))?;
    b.commit_and_tag("v1")?;

    let entry = ws.write_live("main.tf", &module_block("a", &a_url, "m", "v1"))?;
    let tree = analyze_file(&entry, &ws.options()).await?;

    let a_ref = DependencyRef::new(&a_url, "m", "v1");
    let b_ref = DependencyRef::new(&b_url, "m", "v1");

    // a -> b -> a is cut when a re-enters the active path
    let after_a = tree.outcome.get(&a_ref).expect("a resolved");
    let after_b = after_a.get(&b_ref).expect("b resolved");
    assert_eq!(after_b.get(&a_ref), Some(&ResolutionOutcome::CycleDetected));
    assert_eq!(tree.failures().len(), 1);

    let lines = render_text(&project(&tree), 0);
    assert_eq!(
        lines[1..],
        [
            format!("  {}", label(&a_url, "m", "v1")),
            format!("    {}", label(&b_url, "m", "v1")),
            format!("      {}", label(&a_url, "m", "v1")),
            "        CIRCULAR DEPENDENCY".to_string(),
            "          No further dependencies".to_string(),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_self_reference() -> Result<()> {
    let ws = TestWorkspace::new()?;
    let url = ws.repo_url("loop");
    let repo = ws.repo("loop")?;
    repo.write_module("m", &module_block("me", &url, "m", "v1"))?;
    repo.commit_and_tag("v1")?;

    let entry = ws.write_live("main.tf", &module_block("loop", &url, "m", "v1"))?;
    let tree = analyze_file(&entry, &ws.options()).await?;

    let dep = DependencyRef::new(&url, "m", "v1");
    let first = tree.outcome.get(&dep).expect("resolved once");
    assert_eq!(first.get(&dep), Some(&ResolutionOutcome::CycleDetected));
    Ok(())
}

#[tokio::test]
async fn test_depth_limit() -> Result<()> {
    let ws = TestWorkspace::new()?;
    let urls: Vec<String> = (0..3).map(|i| ws.repo_url(&format!("level{i}"))).collect();

    for (i, url) in urls.iter().enumerate() {
        let repo = ws.repo(&format!("level{i}"))?;
        let content = urls
            .get(i + 1)
            .map(|next| module_block("next", next, "m", "v1"))
            .unwrap_or_default();
        repo.write_module("m", &content)?;
        repo.commit_and_tag("v1")?;
        assert_eq!(&repo.url(), url);
    }

    let entry = ws.write_live("main.tf", &module_block("top", &urls[0], "m", "v1"))?;
    let options = AnalyzeOptions {
        resolver: ResolverOptions {
            max_depth: 2,
            ..ResolverOptions::default()
        },
        ..ws.options()
    };
    let tree = analyze_file(&entry, &options).await?;

    let level0 = tree.outcome.get(&DependencyRef::new(&urls[0], "m", "v1")).expect("level 0");
    let level1 = level0.get(&DependencyRef::new(&urls[1], "m", "v1")).expect("level 1");
    assert_eq!(
        level1.get(&DependencyRef::new(&urls[2], "m", "v1")),
        Some(&ResolutionOutcome::DepthLimitReached)
    );

    let unlimited = analyze_file(&entry, &ws.options()).await?;
    assert!(unlimited.failures().is_empty());
    Ok(())
}
