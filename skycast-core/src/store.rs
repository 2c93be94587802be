use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::debug;

use crate::{
    error::FetchError,
    model::{AppState, LocationInfo, WeatherData, WeatherPayload},
};

/// The total action vocabulary of the store.
///
/// Being an enum, an unrecognized action is unrepresentable: integration
/// bugs that would dispatch a stray action name surface at compile time
/// instead of being silently ignored at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Begin a fetch. Clears any previously displayed data immediately,
    /// so a prior query's results can never show under the new query.
    FetchStart { searched_city: Option<String> },
    /// Apply a successful payload wholesale, preserving `searched_city`.
    FetchSuccess { payload: WeatherPayload },
    /// Record a failure message and empty out the weather data.
    FetchError { message: String },
    /// Reset to the initial empty state unconditionally.
    ClearData,
}

/// Pure transition function: no I/O, same input pair always yields the
/// same output. This is what makes the store testable without a network.
pub fn reduce(state: &AppState, action: Action) -> AppState {
    match action {
        Action::FetchStart { searched_city } => {
            debug!(?searched_city, "reducer: fetch start");
            AppState {
                loading: true,
                error: None,
                location: LocationInfo {
                    searched_city,
                    ..LocationInfo::default()
                },
                weather_data: WeatherData::default(),
            }
        }
        Action::FetchSuccess { payload } => {
            debug!("reducer: fetch success");
            AppState {
                loading: false,
                error: None,
                location: LocationInfo {
                    searched_city: state.location.searched_city.clone(),
                    ..payload.location
                },
                weather_data: WeatherData {
                    current: Some(payload.current),
                    forecast_list: payload.forecast_list,
                    air_quality: payload.air_quality,
                },
            }
        }
        Action::FetchError { message } => {
            debug!(%message, "reducer: fetch error");
            AppState {
                loading: false,
                error: Some(message),
                location: LocationInfo {
                    searched_city: state.location.searched_city.clone(),
                    ..LocationInfo::default()
                },
                weather_data: WeatherData::default(),
            }
        }
        Action::ClearData => {
            debug!("reducer: clear data");
            AppState::default()
        }
    }
}

/// Monotonic generation counter distinguishing in-flight fetches, so a
/// slow response to an old query cannot overwrite a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Single-writer state container. The one `AppState` instance lives
/// inside a watch channel: `dispatch` is the only mutation path, readers
/// get snapshots or a subscription, never a mutable reference.
#[derive(Debug)]
pub struct WeatherStore {
    state_tx: watch::Sender<AppState>,
    generation: AtomicU64,
}

impl WeatherStore {
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(AppState::default());
        Self {
            state_tx,
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current canonical state.
    pub fn state(&self) -> AppState {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to state transitions; each dispatch publishes the new
    /// state to all receivers.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state_tx.subscribe()
    }

    /// Apply an action through the reducer and publish the result.
    pub fn dispatch(&self, action: Action) {
        let current = self.state_tx.borrow().clone();
        let next = reduce(&current, action);
        self.state_tx.send_replace(next);
    }

    /// Register a new fetch: bumps the generation and dispatches
    /// `FetchStart`. The returned token must be handed back through
    /// [`complete_fetch`](Self::complete_fetch).
    pub fn begin_fetch(&self, searched_city: Option<String>) -> RequestToken {
        let token = RequestToken(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
        self.dispatch(Action::FetchStart { searched_city });
        token
    }

    /// Deliver the settled result of the fetch identified by `token`.
    ///
    /// Returns false, leaving the state untouched, when a newer
    /// `begin_fetch` has superseded the token; stale results are
    /// discarded rather than cancelled.
    pub fn complete_fetch(
        &self,
        token: RequestToken,
        result: Result<WeatherPayload, FetchError>,
    ) -> bool {
        if token != self.latest_token() {
            debug!(?token, "discarding stale fetch result");
            return false;
        }

        match result {
            Ok(payload) => self.dispatch(Action::FetchSuccess { payload }),
            Err(err) => self.dispatch(Action::FetchError {
                message: err.to_string(),
            }),
        }
        true
    }

    /// The most recently issued token.
    pub fn latest_token(&self) -> RequestToken {
        RequestToken(self.generation.load(Ordering::SeqCst))
    }

    /// Reset to the initial empty state (user cleared the search).
    pub fn clear(&self) {
        self.dispatch(Action::ClearData);
    }
}

impl Default for WeatherStore {
    fn default() -> Self {
        Self::new()
    }
}
