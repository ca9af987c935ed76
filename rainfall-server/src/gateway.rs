//! Cached station lookups against the flood-monitoring API.
//!
//! [`RainfallGateway`] turns an upstream HTTP exchange into an [`Outcome`].
//! Every upstream status, including errors, becomes a typed outcome that is
//! cached per station; only a body the parser cannot handle escapes as
//! [`GatewayError`].
//!
//! When the request never completes (connection refused, timeout) there is
//! no upstream status to preserve. The gateway answers `502` or `504` and
//! does not cache the result, so the next lookup tries upstream again.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::cache::{CachedOutcome, ResultCache};
use crate::domain::{
    ErrorDetail, ErrorEnvelope, Outcome, ReadingCountLimit, ReadingSet, StationId,
    is_success_status,
};
use crate::upstream::{ReadingsResponse, UpstreamClient, UpstreamError, UpstreamResponse};

const NO_READINGS: &str = "No readings found for the specified stationId.";
const STATION_NOT_FOUND: &str = "Cannot find provided station id.";
const STATION_ID_PROPERTY: &str = "stationId";

/// Errors that escape the gateway instead of becoming an [`Outcome`].
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Upstream sent a success status with a body that is not a readings list
    #[error("malformed upstream body for station {station}: {message}")]
    MalformedBody { station: StationId, message: String },
}

/// Why a cache fill produced no outcome.
#[derive(Debug)]
enum LookupFault {
    Transport(UpstreamError),
    MalformedBody(String),
}

/// Upstream error statuses the gateway knows how to describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpstreamFailure {
    BadRequest,
    NotFound,
    InternalServerError,
    Unexpected,
}

impl UpstreamFailure {
    fn from_status(status: u16) -> Self {
        match status {
            400 => UpstreamFailure::BadRequest,
            404 => UpstreamFailure::NotFound,
            500 => UpstreamFailure::InternalServerError,
            _ => UpstreamFailure::Unexpected,
        }
    }

    fn envelope(self) -> ErrorEnvelope {
        match self {
            UpstreamFailure::BadRequest => ErrorEnvelope::new("Bad request")
                .with_detail(ErrorDetail::new(STATION_ID_PROPERTY, STATION_NOT_FOUND)),
            UpstreamFailure::NotFound => {
                ErrorEnvelope::new("No readings found for the specified stationId")
                    .with_detail(ErrorDetail::new(STATION_ID_PROPERTY, STATION_NOT_FOUND))
            }
            UpstreamFailure::InternalServerError => ErrorEnvelope::new("Internal server error"),
            UpstreamFailure::Unexpected => ErrorEnvelope::new("An unexpected error occurred"),
        }
    }
}

/// Convert an upstream response into an outcome.
///
/// Success responses with no readings are reported as `404`. Error statuses
/// are passed through unchanged with a message describing them.
fn interpret(response: UpstreamResponse) -> Result<Outcome, LookupFault> {
    if !is_success_status(response.status) {
        let envelope = UpstreamFailure::from_status(response.status).envelope();
        return Ok(Outcome::failure(response.status, envelope));
    }

    let parsed: ReadingsResponse = serde_json::from_str(&response.body)
        .map_err(|e| LookupFault::MalformedBody(e.to_string()))?;
    let readings = ReadingSet::from(parsed);

    if readings.is_empty() {
        return Ok(Outcome::failure(404, ErrorEnvelope::new(NO_READINGS)));
    }

    Ok(Outcome::success(readings))
}

/// Outcome for a request that never got an HTTP response.
fn transport_failure(err: &UpstreamError) -> Outcome {
    if err.is_timeout() {
        Outcome::failure(504, ErrorEnvelope::new("Upstream service timed out"))
    } else {
        Outcome::failure(502, ErrorEnvelope::new("Upstream service unavailable"))
    }
}

/// Looks up rainfall readings by station, consulting the cache first.
pub struct RainfallGateway {
    upstream: Arc<dyn UpstreamClient>,
    cache: ResultCache,
}

impl RainfallGateway {
    /// Create a gateway over the given upstream client and cache.
    pub fn new(upstream: Arc<dyn UpstreamClient>, cache: ResultCache) -> Self {
        Self { upstream, cache }
    }

    /// Look up readings for a station.
    ///
    /// A cached outcome is returned as-is, whatever its status. On a miss,
    /// upstream is called once and the resulting outcome is cached for the
    /// cache's TTL. Concurrent misses for the same station share one
    /// upstream call.
    ///
    /// The `limit` only affects the upstream request made on a miss; cached
    /// outcomes are keyed by station alone.
    pub async fn lookup(
        &self,
        station: &StationId,
        limit: ReadingCountLimit,
    ) -> Result<CachedOutcome, GatewayError> {
        if let Some(cached) = self.cache.get(station).await {
            debug!(%station, status = cached.status(), "cache hit");
            return Ok(cached);
        }

        debug!(%station, %limit, "cache miss");

        let fetched = self
            .cache
            .get_or_try_insert_with(station.clone(), self.fetch(station, limit))
            .await;

        match fetched {
            Ok(outcome) => Ok(outcome),
            Err(fault) => match fault.as_ref() {
                LookupFault::Transport(err) => {
                    warn!(%station, error = %err, "upstream request failed");
                    Ok(Arc::new(transport_failure(err)))
                }
                LookupFault::MalformedBody(message) => {
                    error!(%station, %message, "could not parse upstream readings");
                    Err(GatewayError::MalformedBody {
                        station: station.clone(),
                        message: message.clone(),
                    })
                }
            },
        }
    }

    async fn fetch(
        &self,
        station: &StationId,
        limit: ReadingCountLimit,
    ) -> Result<CachedOutcome, LookupFault> {
        let response = self
            .upstream
            .fetch_readings(station, limit)
            .await
            .map_err(LookupFault::Transport)?;

        let outcome = interpret(response)?;
        debug!(%station, status = outcome.status(), "caching outcome");

        Ok(Arc::new(outcome))
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &ResultCache {
        &self.cache
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};

    use super::test_support::FakeUpstream;
    use super::*;
    use crate::cache::CacheConfig;

    const TWO_READINGS: &str = r#"{"items": [
        {"dateTime": "2024-03-15T10:15:00Z", "value": 0.4},
        {"dateTime": "2024-03-15T10:00:00Z", "value": 0.2}
    ]}"#;

    fn gateway(upstream: Arc<FakeUpstream>) -> RainfallGateway {
        RainfallGateway::new(upstream, ResultCache::new(&CacheConfig::default()))
    }

    fn station(s: &str) -> StationId {
        StationId::parse(s).unwrap()
    }

    #[tokio::test]
    async fn readings_are_returned_in_upstream_order() {
        let upstream = Arc::new(FakeUpstream::responding(200, TWO_READINGS));
        let gateway = gateway(upstream.clone());

        let outcome = gateway
            .lookup(&station("3680"), ReadingCountLimit(2))
            .await
            .unwrap();

        assert_eq!(outcome.status(), 200);
        assert!(outcome.error().is_none());

        let items = outcome.data().unwrap().items();
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].date_time,
            Utc.with_ymd_and_hms(2024, 3, 15, 10, 15, 0).unwrap()
        );
        assert_eq!(items[0].value, 0.4);
        assert_eq!(items[1].value, 0.2);
        assert_eq!(upstream.last_limit(), Some(ReadingCountLimit(2)));
    }

    #[tokio::test]
    async fn empty_items_become_not_found() {
        let upstream = Arc::new(FakeUpstream::responding(200, r#"{"items": []}"#));
        let gateway = gateway(upstream);

        let outcome = gateway
            .lookup(&station("3680"), ReadingCountLimit::DEFAULT)
            .await
            .unwrap();

        assert_eq!(outcome.status(), 404);
        assert!(outcome.data().is_none());
        let error = outcome.error().unwrap();
        assert_eq!(error.message, "No readings found for the specified stationId.");
        assert!(error.detail.is_empty());
    }

    #[tokio::test]
    async fn upstream_bad_request() {
        let upstream = Arc::new(FakeUpstream::responding(400, ""));
        let gateway = gateway(upstream);

        let outcome = gateway
            .lookup(&station("3680"), ReadingCountLimit::DEFAULT)
            .await
            .unwrap();

        assert_eq!(outcome.status(), 400);
        let error = outcome.error().unwrap();
        assert_eq!(error.message, "Bad request");
        assert_eq!(
            error.detail,
            vec![ErrorDetail::new("stationId", "Cannot find provided station id.")]
        );
    }

    #[tokio::test]
    async fn upstream_not_found() {
        let upstream = Arc::new(FakeUpstream::responding(404, ""));
        let gateway = gateway(upstream);

        let outcome = gateway
            .lookup(&station("1"), ReadingCountLimit::DEFAULT)
            .await
            .unwrap();

        assert_eq!(outcome.status(), 404);
        let error = outcome.error().unwrap();
        assert_eq!(error.message, "No readings found for the specified stationId");
        assert_eq!(
            error.detail,
            vec![ErrorDetail::new("stationId", "Cannot find provided station id.")]
        );
    }

    #[tokio::test]
    async fn upstream_internal_server_error() {
        let upstream = Arc::new(FakeUpstream::responding(500, "<html>oops</html>"));
        let gateway = gateway(upstream);

        let outcome = gateway
            .lookup(&station("3680"), ReadingCountLimit::DEFAULT)
            .await
            .unwrap();

        assert_eq!(outcome.status(), 500);
        let error = outcome.error().unwrap();
        assert_eq!(error.message, "Internal server error");
        assert!(error.detail.is_empty());
    }

    #[tokio::test]
    async fn other_statuses_are_preserved() {
        for status in [401, 403, 418, 429, 502, 503] {
            let upstream = Arc::new(FakeUpstream::responding(status, ""));
            let gateway = gateway(upstream);

            let outcome = gateway
                .lookup(&station("3680"), ReadingCountLimit::DEFAULT)
                .await
                .unwrap();

            assert_eq!(outcome.status(), status);
            let error = outcome.error().unwrap();
            assert_eq!(error.message, "An unexpected error occurred");
            assert!(error.detail.is_empty());
        }
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let upstream = Arc::new(FakeUpstream::responding(200, TWO_READINGS));
        let gateway = gateway(upstream.clone());

        let first = gateway
            .lookup(&station("3680"), ReadingCountLimit::DEFAULT)
            .await
            .unwrap();
        let second = gateway
            .lookup(&station("3680"), ReadingCountLimit::DEFAULT)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test]
    async fn errors_are_cached_too() {
        let upstream = Arc::new(FakeUpstream::responding(404, ""));
        let gateway = gateway(upstream.clone());

        let first = gateway
            .lookup(&station("3680"), ReadingCountLimit::DEFAULT)
            .await
            .unwrap();
        let second = gateway
            .lookup(&station("3680"), ReadingCountLimit(50))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(second.status(), 404);
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test]
    async fn stations_are_cached_independently() {
        let upstream = Arc::new(FakeUpstream::responding(200, TWO_READINGS));
        let gateway = gateway(upstream.clone());

        gateway
            .lookup(&station("3680"), ReadingCountLimit::DEFAULT)
            .await
            .unwrap();
        gateway
            .lookup(&station("E7050"), ReadingCountLimit::DEFAULT)
            .await
            .unwrap();

        assert_eq!(upstream.calls(), 2);
    }

    #[tokio::test]
    async fn expired_entry_triggers_new_upstream_call() {
        let upstream = Arc::new(FakeUpstream::responding(200, TWO_READINGS));
        let cache = ResultCache::new(&CacheConfig::new(Duration::from_millis(50)));
        let gateway = RainfallGateway::new(upstream.clone(), cache);

        gateway
            .lookup(&station("3680"), ReadingCountLimit::DEFAULT)
            .await
            .unwrap();
        assert_eq!(upstream.calls(), 1);

        tokio::time::sleep(Duration::from_millis(120)).await;

        gateway
            .lookup(&station("3680"), ReadingCountLimit::DEFAULT)
            .await
            .unwrap();
        assert_eq!(upstream.calls(), 2);
    }

    #[tokio::test]
    async fn transport_failure_is_bad_gateway_and_not_cached() {
        let upstream = Arc::new(FakeUpstream::failing());
        let gateway = gateway(upstream.clone());

        let outcome = gateway
            .lookup(&station("3680"), ReadingCountLimit::DEFAULT)
            .await
            .unwrap();

        assert_eq!(outcome.status(), 502);
        assert_eq!(
            outcome.error().unwrap().message,
            "Upstream service unavailable"
        );

        gateway
            .lookup(&station("3680"), ReadingCountLimit::DEFAULT)
            .await
            .unwrap();
        assert_eq!(upstream.calls(), 2);
        assert!(gateway.cache().get(&station("3680")).await.is_none());
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let upstream = Arc::new(FakeUpstream::responding(200, "not json"));
        let gateway = gateway(upstream.clone());

        let result = gateway
            .lookup(&station("3680"), ReadingCountLimit::DEFAULT)
            .await;

        assert!(matches!(result, Err(GatewayError::MalformedBody { .. })));
        assert!(gateway.cache().get(&station("3680")).await.is_none());
    }

    #[tokio::test]
    async fn error_statuses_skip_body_parsing() {
        // Upstream error pages are HTML; only 2xx bodies are parsed
        let upstream = Arc::new(FakeUpstream::responding(503, "<html></html>"));
        let gateway = gateway(upstream);

        let outcome = gateway
            .lookup(&station("3680"), ReadingCountLimit::DEFAULT)
            .await
            .unwrap();

        assert_eq!(outcome.status(), 503);
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_upstream_call() {
        let upstream = Arc::new(
            FakeUpstream::responding(200, TWO_READINGS).with_delay(Duration::from_millis(50)),
        );
        let gateway = Arc::new(gateway(upstream.clone()));
        let id = station("3680");

        let lookups = (0..8).map(|_| gateway.lookup(&id, ReadingCountLimit::DEFAULT));
        let outcomes = futures::future::join_all(lookups).await;

        assert_eq!(upstream.calls(), 1);
        for outcome in outcomes {
            assert_eq!(outcome.unwrap().status(), 200);
        }
    }

    #[test]
    fn failure_table_is_total() {
        assert_eq!(UpstreamFailure::from_status(400), UpstreamFailure::BadRequest);
        assert_eq!(UpstreamFailure::from_status(404), UpstreamFailure::NotFound);
        assert_eq!(
            UpstreamFailure::from_status(500),
            UpstreamFailure::InternalServerError
        );
        assert_eq!(UpstreamFailure::from_status(0), UpstreamFailure::Unexpected);
        assert_eq!(UpstreamFailure::from_status(999), UpstreamFailure::Unexpected);
    }
}
