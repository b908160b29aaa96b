use anyhow::Result;
use taxi_etl::{
    config::Settings,
    fetch::{FetchConfig, Fetcher},
    logging::init_tracing,
    storage::StorageRegistry,
    upload::Uploader,
    write::LocalWriter,
    DatasetId, Pipeline,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    init_tracing()?;
    info!("startup");

    // ─── 2) resolve the storage target before touching the network ───
    let settings = Settings::from_env();
    info!(
        registry = %settings.storage_config.display(),
        target = %settings.storage_target,
        "configuration"
    );
    let registry = StorageRegistry::load(&settings.storage_config)?;
    let target = registry.resolve(&settings.storage_target)?.connect().await?;

    // ─── 3) build the steps ──────────────────────────────────────────
    let pipeline = Pipeline::new(
        Fetcher::new(FetchConfig::default())?,
        LocalWriter::new("."),
        Uploader::new(target),
    );

    // ─── 4) run the one dataset this job handles ─────────────────────
    let id = DatasetId::new("green", 2020, 1);
    let summary = pipeline.run(&id).await?;

    info!(
        dataset = %summary.dataset,
        rows = summary.rows,
        columns = summary.columns,
        file = %summary.local_path.display(),
        object = %summary.object_key,
        bytes = summary.bytes,
        "all done"
    );
    Ok(())
}
