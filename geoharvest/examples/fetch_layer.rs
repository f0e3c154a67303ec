//! Downloads one of the `gebieden` area layers and writes it to stdout as CSV, in the shape a bulk loader expects.
//!
//! ```sh
//! cargo run --example fetch_layer -- buurt > buurt.csv
//! ```

use anyhow::bail;
use geoharvest::layer::loader::DEFAULT_INDEX_COLUMN;
use geoharvest::presets::{GebiedenLayer, DEFAULT_ENDPOINT};
use geoharvest::service::http::ReqwestClient;
use geoharvest::{LayerFetcher, WfsEndpoint};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let name = std::env::args().nth(1).unwrap_or_else(|| "stadsdeel".into());
    let Some(preset) = GebiedenLayer::ALL
        .into_iter()
        .find(|preset| preset.layer_name() == name)
    else {
        bail!("unknown layer {name}, expected one of stadsdeel, buurtcombinatie, buurt");
    };

    let endpoint = WfsEndpoint::new(DEFAULT_ENDPOINT)?;
    let fetcher = LayerFetcher::new(ReqwestClient::new()?);

    let layer = preset.fetch(&fetcher, &endpoint)?;
    layer.write_csv(std::io::stdout().lock(), DEFAULT_INDEX_COLUMN)?;

    Ok(())
}
