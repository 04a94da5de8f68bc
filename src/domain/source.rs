//! Async seam between the selection pipeline and whatever serves market data.

use async_trait::async_trait;
use tracing::{info, warn};

use super::entities::{CommodityOption, GeographyOption, MarketOption, PriceRecord};
use super::pipeline::{
    Completion, FetchError, InitialFetches, MarketQuery, MarketRequest, PriceQuery, PriceRequest,
    SelectionError, SelectionPipeline,
};

#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn geographies(&self) -> Result<Vec<GeographyOption>, FetchError>;
    async fn commodities(&self) -> Result<Vec<CommodityOption>, FetchError>;
    async fn markets(&self, query: &MarketQuery) -> Result<Vec<MarketOption>, FetchError>;
    async fn prices(&self, query: &PriceQuery) -> Result<Vec<PriceRecord>, FetchError>;
}

pub async fn load_geographies<S>(source: &S) -> Result<Vec<GeographyOption>, FetchError>
where
    S: MarketDataSource + ?Sized,
{
    let result = source.geographies().await;
    match &result {
        Ok(options) => info!(count = options.len(), "loaded geographies"),
        Err(err) => warn!(error = %err, "failed to fetch geographies"),
    }
    result
}

pub async fn load_commodities<S>(source: &S) -> Result<Vec<CommodityOption>, FetchError>
where
    S: MarketDataSource + ?Sized,
{
    let result = source.commodities().await;
    match &result {
        Ok(options) => info!(count = options.len(), "loaded commodities"),
        Err(err) => warn!(error = %err, "failed to fetch commodities"),
    }
    result
}

pub async fn load_markets<S>(source: &S, query: &MarketQuery) -> Result<Vec<MarketOption>, FetchError>
where
    S: MarketDataSource + ?Sized,
{
    let result = source.markets(query).await;
    match &result {
        Ok(options) => info!(
            commodity = %query.commodity_id,
            district = %query.district_id,
            count = options.len(),
            "loaded markets"
        ),
        Err(err) => warn!(
            commodity = %query.commodity_id,
            district = %query.district_id,
            error = %err,
            "failed to fetch markets"
        ),
    }
    result
}

pub async fn load_prices<S>(source: &S, query: &PriceQuery) -> Result<Vec<PriceRecord>, FetchError>
where
    S: MarketDataSource + ?Sized,
{
    let result = source.prices(query).await;
    match &result {
        Ok(records) => info!(
            commodity = %query.commodity_id,
            market = %query.market_id,
            from = %query.from_date,
            to = %query.to_date,
            count = records.len(),
            "loaded prices"
        ),
        Err(err) => warn!(
            commodity = %query.commodity_id,
            market = %query.market_id,
            error = %err,
            "failed to fetch prices"
        ),
    }
    result
}

/// Somewhere a driver can apply completions to a pipeline: the pipeline
/// itself, or a UI signal wrapping one.
pub trait PipelineHandle {
    fn update<R>(&mut self, apply: impl FnOnce(&mut SelectionPipeline) -> R) -> R;
}

impl PipelineHandle for SelectionPipeline {
    fn update<R>(&mut self, apply: impl FnOnce(&mut SelectionPipeline) -> R) -> R {
        apply(self)
    }
}

const SOURCE_UNAVAILABLE: &str = "market data source unavailable";

fn unavailable() -> FetchError {
    FetchError::new(SOURCE_UNAVAILABLE)
}

/// Completes the two fetches issued by [`SelectionPipeline::initialize`].
/// Without a source both stages fail closed.
pub async fn run_initial_load<H, S>(handle: &mut H, source: Option<&S>, init: InitialFetches)
where
    H: PipelineHandle + ?Sized,
    S: MarketDataSource + ?Sized,
{
    let (geographies, commodities) = match source {
        Some(source) => tokio::join!(load_geographies(source), load_commodities(source)),
        None => (Err(unavailable()), Err(unavailable())),
    };
    handle.update(|pipeline| {
        pipeline.complete_geographies(init.geographies, geographies);
        pipeline.complete_commodities(init.commodities, commodities);
    });
}

/// The markets fetch a selection change asks for, if any. Rejected
/// selections are logged and dropped.
pub fn market_request(
    selected: Result<Option<MarketRequest>, SelectionError>,
) -> Option<MarketRequest> {
    match selected {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "ignoring selection");
            None
        }
    }
}

pub async fn run_market_refresh<H, S>(
    handle: &mut H,
    source: Option<&S>,
    request: MarketRequest,
) -> Completion
where
    H: PipelineHandle + ?Sized,
    S: MarketDataSource + ?Sized,
{
    let result = match source {
        Some(source) => load_markets(source, &request.query).await,
        None => Err(unavailable()),
    };
    handle.update(|pipeline| pipeline.complete_markets(request.ticket, result))
}

/// Runs a query started with [`SelectionPipeline::begin_price_query`].
pub async fn run_price_query<H, S>(
    handle: &mut H,
    source: Option<&S>,
    request: PriceRequest,
) -> Completion
where
    H: PipelineHandle + ?Sized,
    S: MarketDataSource + ?Sized,
{
    let result = match source {
        Some(source) => load_prices(source, &request.query).await,
        None => Err(unavailable()),
    };
    handle.update(|pipeline| pipeline.complete_prices(request.ticket, result))
}
