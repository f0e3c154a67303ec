use std::num::NonZeroU32;
use std::time::Duration;

use bytes::Bytes;
use geojson::{FeatureCollection, GeoJson};
use log::{debug, info, warn};

use crate::error::HarvestError;
use crate::service::http::HttpClient;
use crate::service::{LayerDescriptor, WfsEndpoint};

/// How many times a `GetFeature` request is attempted and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: NonZeroU32,
    backoff: Duration,
}

impl RetryPolicy {
    /// Pause between two attempts used by default.
    pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(3);

    /// Creates a policy with the default backoff. Returns `None` if `max_attempts` is zero.
    pub fn new(max_attempts: u32) -> Option<Self> {
        Some(Self {
            max_attempts: NonZeroU32::new(max_attempts)?,
            backoff: Self::DEFAULT_BACKOFF,
        })
    }

    /// Replaces the pause between attempts.
    pub fn with_backoff(self, backoff: Duration) -> Self {
        Self { backoff, ..self }
    }

    /// Maximum number of requests issued for one fetch.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.get()
    }

    /// Pause between attempts.
    pub fn backoff(&self) -> Duration {
        self.backoff
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: NonZeroU32::MIN.saturating_add(2),
            backoff: Self::DEFAULT_BACKOFF,
        }
    }
}

/// State of a fetch. A fetch starts as `Pending` and ends in one of the other states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    /// No successful or terminal response yet.
    Pending,
    /// The service answered with `200 OK`.
    Succeeded,
    /// Every allowed attempt failed.
    Exhausted,
    /// The service rejected the layer name. Repeating the request would not help.
    Rejected,
}

/// Data returned by a successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchPayload {
    /// Parsed GeoJSON response.
    Features(FeatureCollection),
    /// Response body in any other format, as received.
    Raw(Bytes),
}

/// Outcome of [`LayerFetcher::fetch_layer`].
///
/// Failures are reported as data: the caller decides whether an exhausted or rejected fetch is fatal.
#[derive(Debug)]
pub struct FetchResult {
    attempts: u32,
    state: FetchState,
    outcome: Result<FetchPayload, HarvestError>,
}

impl FetchResult {
    /// Whether a payload is available.
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Number of requests issued.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Terminal state of the request loop. A `Succeeded` state with an error means the response body could not be
    /// parsed.
    pub fn state(&self) -> FetchState {
        self.state
    }

    /// Payload of a successful fetch.
    pub fn payload(&self) -> Option<&FetchPayload> {
        self.outcome.as_ref().ok()
    }

    /// Error of a failed fetch.
    pub fn error(&self) -> Option<&HarvestError> {
        self.outcome.as_ref().err()
    }

    /// Converts into a `Result`, e.g. to propagate the failure with `?`.
    pub fn into_result(self) -> Result<FetchPayload, HarvestError> {
        self.outcome
    }

    /// Returns the feature collection, failing if the fetch failed or the payload is raw data.
    pub fn into_features(self) -> Result<FeatureCollection, HarvestError> {
        match self.outcome? {
            FetchPayload::Features(collection) => Ok(collection),
            FetchPayload::Raw(_) => Err(HarvestError::Parse(
                "response was not requested as GeoJSON".into(),
            )),
        }
    }
}

/// Issues `GetFeature` requests with bounded retries.
///
/// The fetcher blocks the calling thread for the whole fetch, including the pauses between attempts.
#[derive(Debug, Clone)]
pub struct LayerFetcher<C> {
    client: C,
    policy: RetryPolicy,
}

impl<C: HttpClient> LayerFetcher<C> {
    /// Creates a fetcher with the default retry policy (3 attempts, 3 seconds apart).
    pub fn new(client: C) -> Self {
        Self {
            client,
            policy: RetryPolicy::default(),
        }
    }

    /// Replaces the retry policy.
    pub fn with_retry_policy(self, policy: RetryPolicy) -> Self {
        Self { policy, ..self }
    }

    /// Retry policy of the fetcher.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    /// HTTP client used by the fetcher.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Retrieves one layer from the service.
    ///
    /// * `200` ends the fetch. GeoJSON and JSON bodies are parsed into a [`FeatureCollection`], other formats are
    ///   returned as is.
    /// * `400` means the layer name is wrong. The fetch ends as [`FetchState::Rejected`] without retrying.
    /// * Any other status or a transport error is retried after the policy backoff until the attempts run out.
    pub fn fetch_layer(&self, endpoint: &WfsEndpoint, descriptor: &LayerDescriptor) -> FetchResult {
        let query = descriptor.query();
        let params: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let url = endpoint.request_url(&params);

        info!(
            "Requesting data from {endpoint}, layer: {}",
            descriptor.name()
        );

        let mut attempts = 0;
        let mut last_status = None;
        let mut state = FetchState::Pending;
        let mut body = Bytes::new();

        while state == FetchState::Pending {
            attempts += 1;
            match self.client.get(&url) {
                Ok(response) => {
                    debug!("Attempt {attempts}: HTTP {}", response.status);
                    match response.status {
                        200 => {
                            body = response.body;
                            state = FetchState::Succeeded;
                        }
                        400 => {
                            info!(
                                "Incorrect layer name: {}, please correct the layer name",
                                descriptor.name()
                            );
                            state = FetchState::Rejected;
                        }
                        status => {
                            warn!(
                                "Request for layer {} failed with HTTP {status} (attempt {attempts})",
                                descriptor.name()
                            );
                            last_status = Some(status);
                        }
                    }
                }
                Err(err) => {
                    warn!(
                        "Request for layer {} failed: {err} (attempt {attempts})",
                        descriptor.name()
                    );
                    last_status = None;
                }
            }

            if state == FetchState::Pending {
                if attempts >= self.policy.max_attempts() {
                    state = FetchState::Exhausted;
                } else {
                    std::thread::sleep(self.policy.backoff());
                }
            }
        }

        let outcome = match state {
            FetchState::Succeeded => decode_payload(descriptor, body),
            FetchState::Rejected => Err(HarvestError::InvalidLayerName(
                descriptor.name().to_string(),
            )),
            _ => Err(HarvestError::RetriesExhausted {
                attempts,
                last_status,
            }),
        };

        FetchResult {
            attempts,
            state,
            outcome,
        }
    }
}

fn decode_payload(
    descriptor: &LayerDescriptor,
    body: Bytes,
) -> Result<FetchPayload, HarvestError> {
    if !descriptor.output_format().is_geojson() {
        return Ok(FetchPayload::Raw(body));
    }

    let collection = parse_feature_collection(&body)?;
    info!("{} features returned.", collection.features.len());

    Ok(FetchPayload::Features(collection))
}

fn parse_feature_collection(body: &[u8]) -> Result<FeatureCollection, HarvestError> {
    let text = std::str::from_utf8(body)
        .map_err(|err| HarvestError::Parse(format!("response is not valid UTF-8: {err}")))?;
    let geojson: GeoJson = text.parse()?;

    Ok(FeatureCollection::try_from(geojson)?)
}
