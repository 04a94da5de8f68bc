//! Client for the EcoKisan market data service (`{base}/market/...`).

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, Date};
use tracing::debug;

use crate::config::AppConfig;
use crate::domain::{
    CommodityOption, FetchError, GeographyOption, MarketDataSource, MarketOption, MarketQuery,
    PriceQuery, PriceRecord,
};
use crate::infra::http::{build_client, f64_from_json, string_from_json};

const MARKET_PATH: &str = "market/";
const QUERY_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Error)]
pub enum MarketClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("could not format date: {0}")]
    Date(#[from] time::error::Format),
    #[error("unreadable price date: {0}")]
    DateParse(#[from] time::error::Parse),
}

impl From<MarketClientError> for FetchError {
    fn from(error: MarketClientError) -> Self {
        FetchError::new(error)
    }
}

#[derive(Clone)]
pub struct MarketClient {
    http: Client,
    base_url: Url,
}

impl MarketClient {
    pub fn new(config: &AppConfig) -> Result<Self, MarketClientError> {
        let base_url = Url::parse(&config.api_base_url)?.join(MARKET_PATH)?;
        let http = build_client(config.request_timeout)?;
        Ok(Self { http, base_url })
    }

    pub async fn get_geographies(&self) -> Result<Vec<GeographyOption>, MarketClientError> {
        let url = self.url("geographies")?;
        let rows: Vec<GeographyDto> = self.fetch_json(self.http.get(url)).await?;
        Ok(rows.into_iter().map(GeographyOption::from).collect())
    }

    pub async fn get_commodities(&self) -> Result<Vec<CommodityOption>, MarketClientError> {
        let url = self.url("commodities")?;
        let rows: Vec<CommodityDto> = self.fetch_json(self.http.get(url)).await?;
        Ok(rows.into_iter().map(CommodityOption::from).collect())
    }

    pub async fn get_markets(
        &self,
        query: &MarketQuery,
    ) -> Result<Vec<MarketOption>, MarketClientError> {
        let url = self.url("markets")?;
        let body = MarketsBody::from(query);
        let rows: Vec<MarketDto> = self.fetch_json(self.http.post(url).json(&body)).await?;
        Ok(rows.into_iter().map(MarketOption::from).collect())
    }

    pub async fn get_prices(&self, query: &PriceQuery) -> Result<Vec<PriceRecord>, MarketClientError> {
        let url = self.url("prices")?;
        let body = PricesBody::try_from(query)?;
        let rows: Vec<PriceDto> = self.fetch_json(self.http.post(url).json(&body)).await?;
        rows.into_iter().map(PriceRecord::try_from).collect()
    }

    async fn fetch_json<T>(&self, builder: RequestBuilder) -> Result<T, MarketClientError>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await?.error_for_status()?;
        debug!(url = %response.url(), status = %response.status(), "market service responded");
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

#[async_trait]
impl MarketDataSource for MarketClient {
    async fn geographies(&self) -> Result<Vec<GeographyOption>, FetchError> {
        Ok(self.get_geographies().await?)
    }

    async fn commodities(&self) -> Result<Vec<CommodityOption>, FetchError> {
        Ok(self.get_commodities().await?)
    }

    async fn markets(&self, query: &MarketQuery) -> Result<Vec<MarketOption>, FetchError> {
        Ok(self.get_markets(query).await?)
    }

    async fn prices(&self, query: &PriceQuery) -> Result<Vec<PriceRecord>, FetchError> {
        Ok(self.get_prices(query).await?)
    }
}

pub fn format_query_date(date: Date) -> Result<String, time::error::Format> {
    date.format(QUERY_DATE)
}

#[derive(Debug, Deserialize)]
struct GeographyDto {
    #[serde(deserialize_with = "string_from_json")]
    census_state_id: String,
    census_state_name: String,
    #[serde(deserialize_with = "string_from_json")]
    census_district_id: String,
    census_district_name: String,
}

impl From<GeographyDto> for GeographyOption {
    fn from(dto: GeographyDto) -> Self {
        GeographyOption::new(
            dto.census_state_id,
            dto.census_state_name,
            dto.census_district_id,
            dto.census_district_name,
        )
    }
}

#[derive(Debug, Deserialize)]
struct CommodityDto {
    #[serde(deserialize_with = "string_from_json")]
    commodity_id: String,
    commodity_name: String,
}

impl From<CommodityDto> for CommodityOption {
    fn from(dto: CommodityDto) -> Self {
        CommodityOption::new(dto.commodity_id, dto.commodity_name)
    }
}

#[derive(Debug, Deserialize)]
struct MarketDto {
    #[serde(deserialize_with = "string_from_json")]
    market_id: String,
    market_name: String,
}

impl From<MarketDto> for MarketOption {
    fn from(dto: MarketDto) -> Self {
        MarketOption::new(dto.market_id, dto.market_name)
    }
}

#[derive(Debug, Deserialize)]
struct PriceDto {
    date: String,
    #[serde(deserialize_with = "f64_from_json")]
    min_price: f64,
    #[serde(deserialize_with = "f64_from_json")]
    max_price: f64,
    #[serde(deserialize_with = "f64_from_json")]
    modal_price: f64,
}

impl TryFrom<PriceDto> for PriceRecord {
    type Error = MarketClientError;

    /// Accepts `YYYY-MM-DD` or an ISO timestamp; the time part is dropped.
    fn try_from(dto: PriceDto) -> Result<Self, Self::Error> {
        let day = dto.date.split_once('T').map_or(dto.date.as_str(), |(day, _)| day);
        Ok(Self {
            date: Date::parse(day, QUERY_DATE)?,
            min_price: dto.min_price,
            max_price: dto.max_price,
            modal_price: dto.modal_price,
        })
    }
}

#[derive(Debug, Serialize, PartialEq)]
struct MarketsBody<'a> {
    commodity_id: &'a str,
    state_id: &'a str,
    district_id: &'a str,
    indicator: &'static str,
}

impl<'a> From<&'a MarketQuery> for MarketsBody<'a> {
    fn from(query: &'a MarketQuery) -> Self {
        Self {
            commodity_id: &query.commodity_id,
            state_id: &query.state_id,
            district_id: &query.district_id,
            indicator: "price",
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
struct PricesBody<'a> {
    commodity_id: &'a str,
    state_id: &'a str,
    district_id: [&'a str; 1],
    market_id: [&'a str; 1],
    from_date: String,
    to_date: String,
}

impl<'a> TryFrom<&'a PriceQuery> for PricesBody<'a> {
    type Error = time::error::Format;

    fn try_from(query: &'a PriceQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            commodity_id: &query.commodity_id,
            state_id: &query.state_id,
            district_id: [&query.district_id],
            market_id: [&query.market_id],
            from_date: format_query_date(query.from_date)?,
            to_date: format_query_date(query.to_date)?,
        })
    }
}
