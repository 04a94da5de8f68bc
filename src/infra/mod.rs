pub mod auth;
pub mod http;
pub mod market;
pub mod soil;
pub mod weather;

pub use auth::{AuthClient, AuthClientError, AuthResponse};
pub use market::{MarketClient, MarketClientError};
pub use soil::{SoilClient, SoilClientError};
pub use weather::{WeatherClient, WeatherClientError};
