//! Pattern library build command.

use std::path::PathBuf;

use anyhow::Result;
use swatchkit_static::{BuildError, BuildReport, BuildSettings, SiteBuilder};
use swatchkit_tokens::GENERATED_FILES;
use swatchkit_watch::WatchLoop;

/// Run the build command, then keep rebuilding when `watch` is set.
pub async fn run(settings: BuildSettings, watch: bool) -> Result<()> {
    tracing::info!("Building pattern library...");
    tracing::debug!("Source: {}", settings.source_dir.display());
    tracing::debug!("Output: {}", settings.out_dir.display());

    match build(&settings) {
        Ok(_) => {}
        Err(e @ (BuildError::SourceNotFound(_) | BuildError::UnsafeOutputDir { .. })) => {
            return Err(e.into());
        }
        Err(e) if watch => tracing::error!("Build failed: {}", e),
        Err(e) => return Err(e.into()),
    }

    if !watch {
        return Ok(());
    }

    let watcher = WatchLoop::new(watch_roots(&settings), &settings.out_dir).with_filter(|filter| {
        let mut filter = filter.ignore_file(settings.tokens_css_file());
        if settings.token_docs {
            for file in GENERATED_FILES {
                filter = filter.ignore_file(settings.token_docs_dir.join(file));
            }
        }
        filter
    });

    tracing::info!("Watching for changes (Ctrl-C to stop)...");
    watcher.run(|| build(&settings).map(|_| ())).await?;

    Ok(())
}

fn build(settings: &BuildSettings) -> Result<BuildReport, BuildError> {
    let report = SiteBuilder::new(settings).build()?;

    tracing::info!(
        "Built {} swatches in {} sections ({} tokens) in {}ms",
        report.swatches,
        report.sections,
        report.tokens,
        report.duration_ms
    );
    if !report.warnings.is_empty() {
        tracing::warn!("{} token warning(s)", report.warnings.len());
    }
    tracing::info!("Output: {}", report.output_dir.display());

    Ok(report)
}

/// Source, token and CSS directories, without nested duplicates.
fn watch_roots(settings: &BuildSettings) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();

    for dir in [&settings.source_dir, &settings.tokens_dir, &settings.css_dir] {
        if roots.iter().any(|root| dir.starts_with(root)) {
            continue;
        }
        roots.retain(|root| !root.starts_with(dir));
        roots.push(dir.clone());
    }

    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_roots_are_collapsed() {
        let settings = BuildSettings::new("/work");
        assert_eq!(
            watch_roots(&settings),
            vec![PathBuf::from("/work/swatchkit"), PathBuf::from("/work/css")]
        );

        let settings = BuildSettings::new("/work")
            .with_source_dir("ui/patterns")
            .with_tokens_dir("ui");
        assert_eq!(
            watch_roots(&settings),
            vec![PathBuf::from("/work/ui"), PathBuf::from("/work/css")]
        );
    }
}
