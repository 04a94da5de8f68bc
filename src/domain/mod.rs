//! Domain logic: the crop price selection pipeline plus the small pieces of
//! state behind the weather, soil and account screens.

pub mod app_state;
pub mod auth;
pub mod entities;
pub mod pipeline;
pub mod soil;
pub mod source;
pub mod weather;

#[allow(unused_imports)]
pub use app_state::{AppState, PersistedState};
#[allow(unused_imports)]
pub use auth::{AuthSession, OtpFlow, OtpStep, SignupForm};
#[allow(unused_imports)]
pub use entities::{
    CommodityId, CommodityOption, DistrictId, GeographyOption, MarketId, MarketOption,
    PriceRecord, PriceRow, SelectOption, SelectionLabels, StateId,
};
#[allow(unused_imports)]
pub use pipeline::{
    Completion, FetchError, FetchTicket, MarketQuery, MarketRequest, PriceQuery, PriceRequest,
    SelectionError, SelectionPipeline, Stage, StageStatus,
};
#[allow(unused_imports)]
pub use soil::{Coordinates, SoilProperty, SoilValue};
#[allow(unused_imports)]
pub use source::{MarketDataSource, PipelineHandle};
#[allow(unused_imports)]
pub use weather::{DailyWeather, HourlyTemperature, TodayWeather, WeatherIcon, WeatherReport};
