//! Crop price lookup: the geography → commodity → market cascade plus the
//! 30-day price query.
//!
//! All state lives in a [`SelectionPipeline`] signal. Handlers apply the user
//! event synchronously, then spawn whatever fetch the pipeline hands back;
//! completions go back through the pipeline with their ticket so stale
//! responses are dropped there.

use dioxus::prelude::*;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::source::{market_request, run_initial_load, run_market_refresh, run_price_query};
use crate::domain::{
    Completion, MarketRequest, PipelineHandle, SelectionError, SelectionLabels,
    SelectionPipeline, StageStatus,
};
use crate::infra::MarketClient;
use crate::ui::components::{
    choices, push_toast, PriceTable, SelectField, ToastKind, ToastMessage,
};
use crate::ui::theme;

impl PipelineHandle for Signal<SelectionPipeline> {
    fn update<R>(&mut self, apply: impl FnOnce(&mut SelectionPipeline) -> R) -> R {
        self.with_mut(apply)
    }
}

pub fn selection_summary(labels: &SelectionLabels) -> String {
    format!(
        "Selected: State - {}, District - {}, Commodity - {}, Market - {}",
        labels.state, labels.district, labels.commodity, labels.market
    )
}

pub fn market_placeholder(status: StageStatus) -> &'static str {
    match status {
        StageStatus::Empty => "Pick a district and commodity first",
        StageStatus::Loading => "Loading markets...",
        StageStatus::Ready => "Select a market...",
    }
}

/// Toast shown once a price query settles, given how many records it left.
pub fn price_notice(completion: Completion, records: usize) -> Option<(ToastKind, &'static str)> {
    match completion {
        Completion::Applied if records == 0 => {
            Some((ToastKind::Info, "No prices reported for this market."))
        }
        Completion::Applied | Completion::Superseded => None,
        Completion::Cleared => Some((ToastKind::Warning, "Could not fetch prices. Try again.")),
    }
}

fn start_initial_load(mut pipeline: Signal<SelectionPipeline>, client: Option<MarketClient>) {
    let init = pipeline.with_mut(|p| p.initialize());
    spawn(async move {
        run_initial_load(&mut pipeline, client.as_ref(), init).await;
    });
}

fn dispatch_market_refresh(
    mut pipeline: Signal<SelectionPipeline>,
    client: Option<MarketClient>,
    selected: Result<Option<MarketRequest>, SelectionError>,
) {
    let Some(request) = market_request(selected) else {
        return;
    };
    spawn(async move {
        run_market_refresh(&mut pipeline, client.as_ref(), request).await;
    });
}

fn dispatch_price_query(
    mut pipeline: Signal<SelectionPipeline>,
    client: Option<MarketClient>,
    toasts: Signal<Vec<ToastMessage>>,
) {
    let today = OffsetDateTime::now_utc().date();
    let Some(request) = pipeline.with_mut(|p| p.begin_price_query(today)) else {
        return;
    };

    spawn(async move {
        let completion = run_price_query(&mut pipeline, client.as_ref(), request).await;
        let records = pipeline.with(|p| p.prices().len());
        if let Some((kind, text)) = price_notice(completion, records) {
            push_toast(toasts, kind, text);
        }
    });
}

#[component]
pub fn CropPricesPage() -> Element {
    let config = use_context::<AppConfig>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let pipeline = use_signal(SelectionPipeline::new);

    let client = use_hook(move || match MarketClient::new(&config) {
        Ok(client) => Some(client),
        Err(err) => {
            warn!(error = %err, "failed to build market client");
            push_toast(toasts, ToastKind::Error, "Failed to initialise market client.");
            None
        }
    });

    use_hook({
        let client = client.clone();
        move || {
            info!("loading districts and commodities");
            start_initial_load(pipeline, client);
        }
    });

    let on_geography = {
        let client = client.clone();
        move |value: Option<String>| {
            let mut pipeline = pipeline;
            let selected = pipeline.with_mut(|p| p.select_geography(value.as_deref()));
            dispatch_market_refresh(pipeline, client.clone(), selected);
        }
    };

    let on_commodity = {
        let client = client.clone();
        move |value: Option<String>| {
            let mut pipeline = pipeline;
            let selected = pipeline.with_mut(|p| p.select_commodity(value.as_deref()));
            dispatch_market_refresh(pipeline, client.clone(), selected);
        }
    };

    let on_market = move |value: Option<String>| {
        let mut pipeline = pipeline;
        if let Err(err) = pipeline.with_mut(|p| p.select_market(value.as_deref())) {
            warn!(error = %err, "ignoring selection");
        }
    };

    let on_fetch = move |_| dispatch_price_query(pipeline, client.clone(), toasts);

    let view = pipeline.read();
    let geography_choices = choices(view.geography().options());
    let geography_selected = view.geography().selection().map(str::to_string);
    let commodity_choices = choices(view.commodity().options());
    let commodity_selected = view.commodity().selection().map(str::to_string);
    let market_choices = choices(view.market().options());
    let market_selected = view.market().selection().map(str::to_string);
    let market_status = view.market().status();
    let upstream_ready = geography_selected.is_some() && commodity_selected.is_some();
    let summary = selection_summary(&view.selection_labels());
    let busy = view.is_busy();
    let can_fetch = view.can_fetch_prices() && !busy;
    let rows = view.price_rows();
    drop(view);

    rsx! {
        h2 { class: theme::PAGE_TITLE, "Crop Prices" }
        div { class: theme::CARD,
            SelectField {
                heading: "Agri Geographies",
                placeholder: "Select a state/district...",
                choices: geography_choices,
                selected: geography_selected,
                onchange: on_geography,
            }
            SelectField {
                heading: "Agri Commodities",
                placeholder: "Select a commodity...",
                choices: commodity_choices,
                selected: commodity_selected,
                onchange: on_commodity,
            }
            SelectField {
                heading: "Agri Markets",
                placeholder: market_placeholder(market_status),
                choices: market_choices,
                selected: market_selected,
                disabled: !upstream_ready,
                onchange: on_market,
            }
            p { class: "summary", "{summary}" }
            button {
                class: theme::btn_primary(),
                disabled: !can_fetch,
                onclick: on_fetch,
                if busy { "Fetching..." } else { "Fetch Prices" }
            }
        }
        PriceTable { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reads_none_until_selected() {
        assert_eq!(
            selection_summary(&SelectionLabels::default()),
            "Selected: State - None, District - None, Commodity - None, Market - None"
        );
    }

    #[test]
    fn price_notice_follows_completion() {
        assert_eq!(price_notice(Completion::Applied, 3), None);
        assert_eq!(
            price_notice(Completion::Applied, 0).map(|(kind, _)| kind),
            Some(ToastKind::Info)
        );
        assert_eq!(
            price_notice(Completion::Cleared, 0).map(|(kind, _)| kind),
            Some(ToastKind::Warning)
        );
        assert_eq!(price_notice(Completion::Superseded, 0), None);
    }

    #[test]
    fn market_placeholder_tracks_stage_status() {
        assert_eq!(market_placeholder(StageStatus::Loading), "Loading markets...");
        assert_ne!(
            market_placeholder(StageStatus::Empty),
            market_placeholder(StageStatus::Ready)
        );
    }
}
