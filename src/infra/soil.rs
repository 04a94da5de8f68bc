//! ISRIC SIS-India gridded soil property lookup.

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;
use crate::domain::{Coordinates, SoilProperty, SoilValue};
use crate::infra::http::build_client;

const GRIDDED_URL: &str = "https://rest-sisindia.isric.org/sisindia/v1.0/properties/query/gridded";

#[derive(Debug, Error)]
pub enum SoilClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no soil data for this location")]
    NoData,
}

#[derive(Clone)]
pub struct SoilClient {
    http: Client,
    gridded_url: Url,
}

impl SoilClient {
    pub fn new(config: &AppConfig) -> Result<Self, SoilClientError> {
        Ok(Self {
            http: build_client(config.request_timeout)?,
            gridded_url: Url::parse(GRIDDED_URL)?,
        })
    }

    pub async fn properties(&self, at: Coordinates) -> Result<Vec<SoilProperty>, SoilClientError> {
        let url = self.request_url(at);
        debug!(%url, "requesting soil properties");
        let response = self.http.get(url).send().await?.error_for_status()?;
        let payload: GriddedDto = response.json().await?;
        payload.into_properties()
    }

    fn request_url(&self, at: Coordinates) -> Url {
        let mut url = self.gridded_url.clone();
        url.query_pairs_mut()
            .append_pair("lat", &at.latitude.to_string())
            .append_pair("lon", &at.longitude.to_string());
        url
    }
}

#[derive(Debug, Deserialize)]
struct GriddedDto {
    #[serde(default)]
    features: Vec<FeatureDto>,
}

#[derive(Debug, Deserialize)]
struct FeatureDto {
    properties: FeaturePropertiesDto,
}

#[derive(Debug, Deserialize)]
struct FeaturePropertiesDto {
    #[serde(default)]
    soil_properties: Option<Map<String, Value>>,
}

impl GriddedDto {
    fn into_properties(self) -> Result<Vec<SoilProperty>, SoilClientError> {
        let values = self
            .features
            .into_iter()
            .next()
            .and_then(|feature| feature.properties.soil_properties)
            .ok_or(SoilClientError::NoData)?;

        Ok(values
            .into_iter()
            .filter_map(|(code, value)| {
                let value = match value {
                    Value::Number(number) => SoilValue::Number(number.as_f64()?),
                    Value::String(text) => SoilValue::Text(text),
                    Value::Null => return None,
                    other => SoilValue::Text(other.to_string()),
                };
                Some(SoilProperty { code, value })
            })
            .collect())
    }
}
