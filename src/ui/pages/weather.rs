use dioxus::prelude::*;
use time::OffsetDateTime;
use tracing::warn;

use crate::config::AppConfig;
use crate::domain::{Coordinates, HourlyTemperature, WeatherReport};
use crate::infra::WeatherClient;
use crate::ui::components::{push_toast, CoordinateFields, StatCard, ToastKind, ToastMessage};
use crate::ui::theme;

/// Bar heights in percent, scaled between the coolest and hottest hour.
pub fn bar_heights(hours: &[HourlyTemperature]) -> Vec<f64> {
    let coolest = hours.iter().map(|h| h.celsius).fold(f64::INFINITY, f64::min);
    let hottest = hours
        .iter()
        .map(|h| h.celsius)
        .fold(f64::NEG_INFINITY, f64::max);
    let span = hottest - coolest;
    hours
        .iter()
        .map(|h| {
            if span > 0.0 {
                10.0 + (h.celsius - coolest) / span * 90.0
            } else {
                50.0
            }
        })
        .collect()
}

fn format_optional(value: Option<f64>, unit: &str) -> String {
    value
        .map(|value| format!("{value:.0}{unit}"))
        .unwrap_or_else(|| "n/a".to_string())
}

#[component]
pub fn WeatherPage() -> Element {
    let config = use_context::<AppConfig>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let defaults = Coordinates::default();
    let latitude = use_signal(|| defaults.latitude.to_string());
    let longitude = use_signal(|| defaults.longitude.to_string());
    let mut target = use_signal(|| defaults);

    let client = use_hook(move || match WeatherClient::new(&config) {
        Ok(client) => Some(client),
        Err(err) => {
            warn!(error = %err, "failed to build weather client");
            None
        }
    });

    let report = use_resource(move || {
        let client = client.clone();
        let at = target();
        async move {
            let client = client.ok_or_else(|| "Weather service unavailable.".to_string())?;
            let today = OffsetDateTime::now_utc().date();
            client.report(at, today).await.map_err(|err| {
                warn!(error = %err, "weather lookup failed");
                "Failed to fetch weather data.".to_string()
            })
        }
    });

    let on_load = move |_| match Coordinates::parse(&latitude(), &longitude()) {
        Ok(at) => target.set(at),
        Err(err) => push_toast(toasts, ToastKind::Error, err.to_string()),
    };

    let body = match &*report.read() {
        None => rsx! { p { class: theme::MUTED, "Fetching weather data..." } },
        Some(Err(message)) => rsx! { p { class: "error-text", "{message}" } },
        Some(Ok(report)) => rsx! { WeatherDetails { report: report.clone() } },
    };

    rsx! {
        h2 { class: theme::PAGE_TITLE, "🌦 Farmer Weather Dashboard" }
        div { class: theme::CARD,
            CoordinateFields { latitude, longitude }
            button { class: theme::btn_primary(), onclick: on_load, "Load weather" }
        }
        {body}
    }
}

#[component]
fn WeatherDetails(report: WeatherReport) -> Element {
    let heights = bar_heights(&report.hourly);
    let hourly_caption = match (report.hourly.first(), report.hourly.last()) {
        (Some(first), Some(last)) => format!("{} to {}", first.time, last.time),
        _ => "No hourly data".to_string(),
    };
    let total_rain = format!("{:.1} mm", report.total_rain_mm());
    let hottest = report
        .hottest_day()
        .map(|day| format!("Hottest: {} ({:.1}°C)", day.date, day.max_temp));

    rsx! {
        if let Some(today) = report.today.clone() {
            div { class: "stat-grid",
                StatCard {
                    icon: today.icon().emoji(),
                    title: "Today",
                    value: today.date.clone(),
                    caption: format!("Max: {}°C | Min: {}°C", today.max_temp, today.min_temp),
                }
                StatCard {
                    icon: "🌧️",
                    title: "Rain",
                    value: format!("{} mm", today.rain_mm),
                    caption: today.rain_note().to_string(),
                }
                StatCard { icon: "💧", title: "Humidity", value: format_optional(today.humidity_pct, "%") }
                StatCard { icon: "🌬️", title: "Wind", value: format_optional(today.wind_kmh, " km/h") }
            }
        }
        div { class: theme::CARD,
            h3 { class: theme::CARD_TITLE, "Hourly Temperature Forecast" }
            div { class: "bar-chart",
                for (hour, height) in report.hourly.iter().zip(heights) {
                    div {
                        key: "{hour.time}",
                        class: "bar",
                        title: "{hour.time}: {hour.celsius}°C",
                        style: "height: {height:.0}%",
                    }
                }
            }
            p { class: theme::MUTED, "{hourly_caption}" }
        }
        div { class: theme::CARD,
            h3 { class: theme::CARD_TITLE, "Past 7 Days" }
            table { class: "data-table",
                thead {
                    tr {
                        th { "Date" }
                        th { "Max (°C)" }
                        th { "Min (°C)" }
                        th { "Rain (mm)" }
                        th { "Note" }
                    }
                }
                tbody {
                    for day in report.past_days.iter() {
                        tr { key: "{day.date}", class: theme::weather_row(day.is_hot()),
                            td { "{day.date}" }
                            td { "{day.max_temp}" }
                            td { "{day.min_temp}" }
                            td { "{day.rain_mm}" }
                            td { "{day.note()}" }
                        }
                    }
                }
            }
            p { class: theme::MUTED, "Total rain: {total_rain}" }
            if let Some(hottest) = hottest {
                p { class: theme::MUTED, "{hottest}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour(time: &str, celsius: f64) -> HourlyTemperature {
        HourlyTemperature {
            time: time.into(),
            celsius,
        }
    }

    #[test]
    fn bars_scale_between_extremes() {
        let heights = bar_heights(&[hour("00:00", 20.0), hour("01:00", 25.0), hour("02:00", 30.0)]);
        assert_eq!(heights, vec![10.0, 55.0, 100.0]);
    }

    #[test]
    fn flat_series_renders_mid_height() {
        assert_eq!(bar_heights(&[hour("00:00", 22.0), hour("01:00", 22.0)]), vec![50.0, 50.0]);
        assert!(bar_heights(&[]).is_empty());
    }

    #[test]
    fn missing_readings_show_placeholder() {
        assert_eq!(format_optional(Some(71.4), "%"), "71%");
        assert_eq!(format_optional(None, " km/h"), "n/a");
    }
}
