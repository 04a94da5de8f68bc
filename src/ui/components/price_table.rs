use dioxus::prelude::*;

use crate::domain::PriceRow;
use crate::ui::components::stat_card::StatCard;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceSummary {
    pub lowest_min: f64,
    pub highest_max: f64,
    pub average_modal: f64,
}

/// Range and average over the fetched rows; `None` when there are no rows.
pub fn summarize_prices(rows: &[PriceRow]) -> Option<PriceSummary> {
    if rows.is_empty() {
        return None;
    }
    let lowest_min = rows
        .iter()
        .map(|row| row.record.min_price)
        .fold(f64::INFINITY, f64::min);
    let highest_max = rows
        .iter()
        .map(|row| row.record.max_price)
        .fold(f64::NEG_INFINITY, f64::max);
    let average_modal =
        rows.iter().map(|row| row.record.modal_price).sum::<f64>() / rows.len() as f64;
    Some(PriceSummary {
        lowest_min,
        highest_max,
        average_modal,
    })
}

/// Prices are rupees per quintal.
pub fn format_rupees(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("₹{value:.0}")
    } else {
        format!("₹{value:.2}")
    }
}

#[component]
pub fn PriceTable(rows: Vec<PriceRow>) -> Element {
    if rows.is_empty() {
        return rsx! {
            p { class: "muted", "No price records yet. Pick a market and fetch prices." }
        };
    }

    let count = rows.len();
    let summary = summarize_prices(&rows);

    rsx! {
        if let Some(summary) = summary {
            div { class: "stat-grid",
                StatCard { icon: "⬇️", title: "Lowest min", value: format_rupees(summary.lowest_min) }
                StatCard { icon: "⬆️", title: "Highest max", value: format_rupees(summary.highest_max) }
                StatCard {
                    icon: "⚖️",
                    title: "Average modal",
                    value: format_rupees(summary.average_modal),
                    caption: format!("over {count} days"),
                }
            }
        }
        div { class: "card",
            table { class: "data-table",
                thead {
                    tr {
                        th { "Date" }
                        th { "Commodity" }
                        th { "State" }
                        th { "District" }
                        th { "Market" }
                        th { "Min Price" }
                        th { "Max Price" }
                        th { "Modal Price" }
                    }
                }
                tbody {
                    for (index, row) in rows.into_iter().enumerate() {
                        tr { key: "{index}",
                            td { "{row.record.date}" }
                            td { "{row.labels.commodity}" }
                            td { "{row.labels.state}" }
                            td { "{row.labels.district}" }
                            td { "{row.labels.market}" }
                            td { {format_rupees(row.record.min_price)} }
                            td { {format_rupees(row.record.max_price)} }
                            td { {format_rupees(row.record.modal_price)} }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::domain::{PriceRecord, SelectionLabels};

    fn row(min_price: f64, max_price: f64, modal_price: f64) -> PriceRow {
        PriceRow {
            record: PriceRecord {
                date: date!(2025 - 06 - 30),
                min_price,
                max_price,
                modal_price,
            },
            labels: SelectionLabels::default(),
        }
    }

    #[test]
    fn summary_spans_all_rows() {
        let rows = vec![row(1900.0, 2100.0, 2000.0), row(1850.0, 2250.0, 2100.0)];
        assert_eq!(
            summarize_prices(&rows),
            Some(PriceSummary {
                lowest_min: 1850.0,
                highest_max: 2250.0,
                average_modal: 2050.0,
            })
        );
        assert_eq!(summarize_prices(&[]), None);
    }

    #[test]
    fn rupees_drop_zero_paise() {
        assert_eq!(format_rupees(2150.0), "₹2150");
        assert_eq!(format_rupees(2150.5), "₹2150.50");
    }
}
