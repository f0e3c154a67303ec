//! Prints the names of all layers published by a WFS service.
//!
//! ```sh
//! cargo run --example list_layers -- https://map.data.amsterdam.nl/maps/gebieden
//! ```

use geoharvest::presets::DEFAULT_ENDPOINT;
use geoharvest::service::http::ReqwestClient;
use geoharvest::service::list_layers;
use geoharvest::WfsEndpoint;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    let endpoint = WfsEndpoint::new(&url)?;

    let layers = list_layers(&ReqwestClient::new()?, &endpoint)?;
    println!("{} layers available at {endpoint}", layers.len());

    Ok(())
}
