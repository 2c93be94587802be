use crate::error::ValidationError;

/// A validated user query: either a city name or a coordinate pair,
/// never both. This is the only shape the client accepts, so an
/// unvalidated search can never start a fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl Query {
    /// Turn raw form input into a well-formed query.
    ///
    /// A provided city string wins over coordinates. Pure: no side
    /// effects, no I/O.
    pub fn validate(
        raw_city: Option<&str>,
        raw_lat: Option<f64>,
        raw_lon: Option<f64>,
    ) -> Result<Self, ValidationError> {
        if let Some(city) = raw_city {
            let trimmed = city.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::EmptyQuery);
            }
            return Ok(Query::City(trimmed.to_string()));
        }

        match (raw_lat, raw_lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Ok(Query::Coordinates { lat, lon })
            }
            (Some(_), Some(_)) => Err(ValidationError::InvalidCoordinates),
            _ => Err(ValidationError::MissingInput),
        }
    }

    /// The city string to echo back through the store, if any.
    pub fn searched_city(&self) -> Option<&str> {
        match self {
            Query::City(name) => Some(name),
            Query::Coordinates { .. } => None,
        }
    }

    /// Request parameters for the backend endpoint: `city` or
    /// `lat` + `lon`, never both.
    pub fn request_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Query::City(name) => vec![("city", name.clone())],
            Query::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }
}
