use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use crate::{
    client::WeatherApi,
    error::ValidationError,
    model::AppState,
    query::Query,
    store::WeatherStore,
};

/// Wires the pipeline together: validated input drives `FETCH_START`,
/// the client call is the only suspension point, and the settled result
/// returns to the store tagged with its request token.
#[derive(Debug)]
pub struct WeatherController {
    store: Arc<WeatherStore>,
    client: Box<dyn WeatherApi>,
}

impl WeatherController {
    pub fn new(store: Arc<WeatherStore>, client: Box<dyn WeatherApi>) -> Self {
        Self { store, client }
    }

    /// Validate raw input and, if well-formed, run one fetch to
    /// completion. Validation errors are returned directly and never
    /// touch the store.
    pub async fn submit_query(
        &self,
        raw_city: Option<&str>,
        raw_lat: Option<f64>,
        raw_lon: Option<f64>,
    ) -> Result<(), ValidationError> {
        let query = Query::validate(raw_city, raw_lat, raw_lon)?;
        self.submit(query).await;
        Ok(())
    }

    /// Run one fetch for an already-validated query.
    pub async fn submit(&self, query: Query) {
        let searched_city = query.searched_city().map(str::to_owned);
        let token = self.store.begin_fetch(searched_city);

        let result = self.client.fetch_weather(&query).await;

        if !self.store.complete_fetch(token, result) {
            debug!(?query, "query superseded before its fetch settled");
        }
    }

    /// Reset the dashboard (user cleared the search).
    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn store(&self) -> Arc<WeatherStore> {
        Arc::clone(&self.store)
    }

    /// Snapshot of the canonical state.
    pub fn state(&self) -> AppState {
        self.store.state()
    }

    /// Subscription for views that re-render on every transition.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.store.subscribe()
    }
}
