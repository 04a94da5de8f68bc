//! Irrigation advice derived from daily weather figures.

use time::{Date, Duration};

/// Days shown in the "past week" summary.
pub const ARCHIVE_DAYS: i64 = 7;
/// Daily maximum (°C) above which a day is flagged as hot.
pub const HOT_DAY_CELSIUS: f64 = 35.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeatherIcon {
    Sunny,
    PartlyCloudy,
    Pouring,
}

impl WeatherIcon {
    pub fn for_rain(rain_mm: f64) -> Self {
        if rain_mm > 5.0 {
            WeatherIcon::Pouring
        } else if rain_mm > 0.0 {
            WeatherIcon::PartlyCloudy
        } else {
            WeatherIcon::Sunny
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            WeatherIcon::Sunny => "☀️",
            WeatherIcon::PartlyCloudy => "⛅",
            WeatherIcon::Pouring => "🌧️",
        }
    }
}

pub fn rain_note(rain_mm: f64) -> &'static str {
    if rain_mm > 5.0 {
        "Reduce irrigation"
    } else if rain_mm == 0.0 {
        "Irrigation needed"
    } else {
        "Light showers"
    }
}

pub fn day_note(rain_mm: f64, max_temp: f64) -> &'static str {
    if max_temp > HOT_DAY_CELSIUS {
        "Hot day, increased irrigation needed"
    } else if rain_mm > 10.0 {
        "Heavy rainfall, good soil moisture"
    } else if rain_mm > 0.0 {
        "Light showers, moderate irrigation"
    } else {
        "Dry day, irrigation needed"
    }
}

/// Archive range for the past-week table: the seven days before `today`.
pub fn archive_window(today: Date) -> (Date, Date) {
    let end = today.previous_day().unwrap_or(today);
    let start = end
        .checked_sub(Duration::days(ARCHIVE_DAYS - 1))
        .unwrap_or(end);
    (start, end)
}

#[derive(Clone, Debug, PartialEq)]
pub struct DailyWeather {
    pub date: String,
    pub max_temp: f64,
    pub min_temp: f64,
    pub rain_mm: f64,
}

impl DailyWeather {
    pub fn is_hot(&self) -> bool {
        self.max_temp > HOT_DAY_CELSIUS
    }

    pub fn note(&self) -> &'static str {
        day_note(self.rain_mm, self.max_temp)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TodayWeather {
    pub date: String,
    pub max_temp: f64,
    pub min_temp: f64,
    pub rain_mm: f64,
    pub humidity_pct: Option<f64>,
    pub wind_kmh: Option<f64>,
}

impl TodayWeather {
    pub fn icon(&self) -> WeatherIcon {
        WeatherIcon::for_rain(self.rain_mm)
    }

    pub fn rain_note(&self) -> &'static str {
        rain_note(self.rain_mm)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HourlyTemperature {
    /// `HH:MM` local time.
    pub time: String,
    pub celsius: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeatherReport {
    pub past_days: Vec<DailyWeather>,
    pub today: Option<TodayWeather>,
    pub hourly: Vec<HourlyTemperature>,
}

impl WeatherReport {
    pub fn hottest_day(&self) -> Option<&DailyWeather> {
        self.past_days
            .iter()
            .max_by(|a, b| a.max_temp.total_cmp(&b.max_temp))
    }

    pub fn total_rain_mm(&self) -> f64 {
        self.past_days.iter().map(|day| day.rain_mm).sum()
    }
}
