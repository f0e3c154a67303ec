use std::collections::VecDeque;
use std::sync::Mutex;

use reqwest::Url;

use crate::error::HarvestError;
use crate::service::http::{HttpClient, HttpResponse};

/// Client returning prepared responses in order and recording every requested url.
pub struct ScriptedHttpClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HarvestError>>>,
    requests: Mutex<Vec<Url>>,
}

impl ScriptedHttpClient {
    pub fn new(responses: impl IntoIterator<Item = Result<HttpResponse, HarvestError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(vec![]),
        }
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn get(&self, url: &Url) -> Result<HttpResponse, HarvestError> {
        self.requests.lock().unwrap().push(url.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request: {url}"))
    }
}

/// Three boroughs in the shape the gebieden service returns them.
pub fn feature_collection_json() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "features": [
        {
          "type": "Feature",
          "geometry": {"type": "Polygon", "coordinates": [[[121000.0, 487000.0], [122000.0, 487000.0], [122000.0, 488000.0], [121000.0, 487000.0]]]},
          "properties": {"code": "A", "id": 1, "naam": "Centrum", "display": "Centrum"}
        },
        {
          "type": "Feature",
          "geometry": {"type": "Polygon", "coordinates": [[[117000.0, 486000.0], [118000.0, 486000.0], [118000.0, 487000.0], [117000.0, 486000.0]]]},
          "properties": {"code": "E", "id": 2, "naam": "West", "display": "West"}
        },
        {
          "type": "Feature",
          "geometry": null,
          "properties": {"code": "T", "id": 3, "naam": "Zuidoost", "display": "Zuidoost"}
        }
      ]
    }"#
}

pub fn feature_collection() -> geojson::FeatureCollection {
    feature_collection_json()
        .parse::<geojson::GeoJson>()
        .and_then(geojson::FeatureCollection::try_from)
        .unwrap()
}
