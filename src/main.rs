//! Wiring & DI. Entry point: load config, build adapters, run the pipeline.
//! No business logic here; phases run strictly in order:
//! scan -> extract/aggregate -> resolve names -> plan -> download.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vk_grab::adapters::fs::scanner;
use vk_grab::adapters::http::{ReqwestFetcher, VkNameResolver};
use vk_grab::domain::{CorpusBundle, DownloadSummary, OwnerIdSet};
use vk_grab::ports::{FetchPort, NameResolverPort};
use vk_grab::shared::config::AppConfig;
use vk_grab::usecases::{planner, CorpusAggregator, DownloadEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // a malformed environment value must abort, not degrade to defaults
    let cfg = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "configuration could not be loaded");
            anyhow::bail!("{}", e);
        }
    };
    let settings = match cfg.validate() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            anyhow::bail!("{}", e);
        }
    };

    // --- Scan + extract: one bundle per scan directory ---
    let aggregator = CorpusAggregator::new(settings.filter);
    let mut bundles: Vec<CorpusBundle> = Vec::new();
    let mut owner_ids = OwnerIdSet::new();
    for path in &settings.paths {
        let scan = scanner::scan_dir(path).await;
        info!(
            path = %scan.root.display(),
            count = scan.files.len(),
            "json files taken from directory"
        );
        let (bundle, ids) = aggregator.aggregate(&scan).await;
        if !bundle.has_content() {
            continue;
        }
        owner_ids.extend(ids);
        bundles.push(bundle);
    }

    // --- Optional name resolution: completes before planning begins ---
    let names: HashMap<i64, String> = if settings.resolve_names {
        let resolver = VkNameResolver::new();
        resolver.resolve(&owner_ids).await
    } else {
        HashMap::new()
    };

    // --- Plan + download ---
    let mut tasks = Vec::new();
    for bundle in &bundles {
        tasks.extend(planner::plan(bundle, &settings.folder_policy, &names));
    }

    let fetcher: Arc<dyn FetchPort> = Arc::new(ReqwestFetcher::new());
    let engine = DownloadEngine::new(fetcher, settings.download_limit);
    let summary: DownloadSummary = engine.run(tasks).await;

    info!(
        downloaded = summary.downloaded,
        skipped = summary.skipped,
        failed = summary.failed,
        "run finished"
    );
    if !summary.is_success() {
        anyhow::bail!(
            "{}/{} photos were not downloaded",
            summary.failed,
            summary.total()
        );
    }
    Ok(())
}
