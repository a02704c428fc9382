use std::path::Path;

use anyhow::Context;
use tracing::info;
use warpgrid_weather::{Scaler, ScalerFile, WeatherScaler};

/// Load the scaler file and build a scaler from it.
fn load(path: &Path) -> anyhow::Result<WeatherScaler> {
    let config = ScalerFile::from_file(path)?.into_scaler_config()?;
    let scaler = WeatherScaler::new(config)
        .with_context(|| format!("invalid scaler file {}", path.display()))?;
    Ok(scaler)
}

pub async fn check(path: &Path) -> anyhow::Result<()> {
    let scaler = load(path)?;
    let result = scaler.is_active().await;
    scaler.close().await;

    let active = result.context("checking trigger activity")?;
    info!(active, threshold = scaler.config().threshold, "trigger checked");
    println!("{}", if active { "active" } else { "inactive" });
    Ok(())
}

pub async fn metrics(path: &Path, name: &str) -> anyhow::Result<()> {
    let scaler = load(path)?;
    let result = scaler.get_metrics(name).await;
    scaler.close().await;

    let samples = result.context("reading trigger metrics")?;
    println!("{}", serde_json::to_string_pretty(&samples)?);
    Ok(())
}

pub fn spec(path: &Path) -> anyhow::Result<()> {
    let scaler = load(path)?;
    println!("{}", serde_json::to_string_pretty(&scaler.metric_spec())?);
    Ok(())
}
