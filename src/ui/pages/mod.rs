pub mod account;
pub mod crop_prices;
pub mod home;
pub mod market_hub;
pub mod soil;
pub mod weather;

pub use account::{ForgotPasswordPage, LoginPage, SignupPage};
pub use crop_prices::CropPricesPage;
pub use home::HomePage;
pub use market_hub::MarketHubPage;
pub use soil::SoilPage;
pub use weather::WeatherPage;
