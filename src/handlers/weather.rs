use super::AppState;
use crate::weather::{ExternalApiResponse, DEFAULT_CITY};
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    #[serde(default = "default_city")]
    pub city: String,
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

/// GET /external-api/weather?city=London
pub async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Json<ExternalApiResponse> {
    Json(state.weather.fetch(&params.city).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_params_default_city() {
        let params: WeatherParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.city, "London");
    }
}
