//! HTTP adapter for the cauldron network API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::FetchError;
use crate::model::{Depot, LevelSnapshot, NetworkInfo, NetworkSnapshot, Point, TransportTicket};
use crate::traits::SnapshotSource;

const CAULDRONS_PATH: &str = "/api/Information/cauldrons";
const MARKET_PATH: &str = "/api/Information/market";
const NETWORK_PATH: &str = "/api/Information/network";
const DATA_PATH: &str = "/api/Data";
const TICKETS_PATH: &str = "/api/Tickets";

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Observation window used for fill-rate estimation.
    pub lookback_minutes: i64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://hackutd2025.eog.systems".to_string(),
            timeout_secs: 30,
            lookback_minutes: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    config: SourceConfig,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(config: SourceConfig) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Level observations between two unix timestamps, inclusive.
    pub fn fetch_levels(&self, start: i64, end: i64) -> Result<Vec<LevelSnapshot>, FetchError> {
        self.get_json("levels", DATA_PATH, &[("start_date", start), ("end_date", end)])
    }

    /// Transport tickets; accepts both the wrapped and the bare-array body.
    pub fn fetch_tickets(&self) -> Result<Vec<TransportTicket>, FetchError> {
        let body: TicketsResponse = self.get_json("tickets", TICKETS_PATH, &[])?;
        Ok(match body {
            TicketsResponse::Wrapped { transport_tickets } => transport_tickets,
            TicketsResponse::Bare(tickets) => tickets,
        })
    }

    /// Snapshot whose observation window ends at `now` (unix seconds).
    pub fn fetch_snapshot_at(&self, now: i64) -> Result<NetworkSnapshot, FetchError> {
        let start = now - self.config.lookback_minutes * 60;

        let ((points, depot), (network, levels)) = rayon::join(
            || {
                rayon::join(
                    || self.get_json::<Vec<Point>>("cauldrons", CAULDRONS_PATH, &[]),
                    || self.get_json::<Depot>("market", MARKET_PATH, &[]),
                )
            },
            || {
                rayon::join(
                    || self.get_json::<NetworkInfo>("network", NETWORK_PATH, &[]),
                    || self.fetch_levels(start, now),
                )
            },
        );

        let levels = levels?;
        if levels.is_empty() {
            return Err(FetchError::NoLevelData);
        }

        let snapshot = NetworkSnapshot::new(points?, depot?, network?.edges, levels);
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn get_json<T>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, i64)],
    ) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        debug!(endpoint, %url, "fetching");

        self.client
            .get(url)
            .query(query)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<T>())
            .map_err(|source| FetchError::Request { endpoint, source })
    }
}

impl SnapshotSource for HttpSource {
    fn fetch_snapshot(&self) -> Result<NetworkSnapshot, FetchError> {
        self.fetch_snapshot_at(chrono::Utc::now().timestamp())
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TicketsResponse {
    Wrapped { transport_tickets: Vec<TransportTicket> },
    Bare(Vec<TransportTicket>),
}
