//! Cascading selection state for the crop price lookup.
//!
//! Geography and Commodity are independent stages; Market depends on both.
//! The terminal price query needs all three. Every fetch is handed out as a
//! [`FetchTicket`] carrying a per-stage sequence number, and a completion is
//! only applied while its ticket is still the one pending for that stage.
//! Applying a completion consumes the ticket. Nothing in here performs I/O: callers run the returned requests and
//! feed the outcomes back through the `complete_*` methods.

use std::fmt;

use thiserror::Error;
use time::{Date, Duration};
use tracing::debug;

use super::entities::{
    CommodityId, CommodityOption, DistrictId, GeographyOption, MarketId, MarketOption,
    PriceRecord, PriceRow, SelectOption, SelectionLabels, StateId,
};

/// Days covered by a price query, ending on the query date.
pub const PRICE_LOOKBACK_DAYS: i64 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Geography,
    Commodity,
    Market,
}

impl Stage {
    /// Stages whose selections this stage's option set is derived from.
    pub fn upstream(self) -> &'static [Stage] {
        match self {
            Stage::Geography | Stage::Commodity => &[],
            Stage::Market => &[Stage::Geography, Stage::Commodity],
        }
    }

    /// Stages invalidated (transitively) when this stage's selection changes.
    pub fn dependents(self) -> &'static [Stage] {
        match self {
            Stage::Geography | Stage::Commodity => &[Stage::Market],
            Stage::Market => &[],
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Geography => "geography",
            Stage::Commodity => "commodity",
            Stage::Market => "market",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StageStatus {
    #[default]
    Empty,
    Loading,
    Ready,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FetchTarget {
    Stage(Stage),
    Prices,
}

/// Proof of dispatch for one fetch. Completions must present it back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    target: FetchTarget,
    seq: u64,
}

impl FetchTicket {
    pub fn target(&self) -> FetchTarget {
        self.target
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Outcome of feeding a completion back into the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The fetch failed and the stage was cleared.
    Cleared,
    /// A newer fetch was issued after this one; the result was dropped.
    Superseded,
}

/// Failure of a fetch, already reduced to its display text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FetchError(String);

impl FetchError {
    pub fn new(message: impl fmt::Display) -> Self {
        Self(message.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("{stage} has no option with value {value:?}")]
    UnknownOption { stage: Stage, value: String },
}

/// Inputs for the markets lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketQuery {
    pub commodity_id: CommodityId,
    pub state_id: StateId,
    pub district_id: DistrictId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketRequest {
    pub ticket: FetchTicket,
    pub query: MarketQuery,
}

/// Inputs for the price history lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceQuery {
    pub commodity_id: CommodityId,
    pub state_id: StateId,
    pub district_id: DistrictId,
    pub market_id: MarketId,
    pub from_date: Date,
    pub to_date: Date,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceRequest {
    pub ticket: FetchTicket,
    pub query: PriceQuery,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitialFetches {
    pub geographies: FetchTicket,
    pub commodities: FetchTicket,
}

/// `[today - 30 days, today]`.
pub fn price_window(today: Date) -> (Date, Date) {
    let from = today
        .checked_sub(Duration::days(PRICE_LOOKBACK_DAYS))
        .unwrap_or(Date::MIN);
    (from, today)
}

#[derive(Clone, Debug)]
pub struct StageState<T> {
    stage: Stage,
    options: Vec<T>,
    selection: Option<String>,
    status: StageStatus,
    latest: u64,
    pending: Option<u64>,
}

impl<T: SelectOption> StageState<T> {
    fn new(stage: Stage) -> Self {
        Self {
            stage,
            options: Vec::new(),
            selection: None,
            status: StageStatus::Empty,
            latest: 0,
            pending: None,
        }
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn selected_option(&self) -> Option<&T> {
        let selected = self.selection.as_deref()?;
        self.options.iter().find(|option| option.value() == selected)
    }

    pub fn status(&self) -> StageStatus {
        self.status
    }

    fn issue(&mut self) -> FetchTicket {
        self.latest += 1;
        self.pending = Some(self.latest);
        self.status = StageStatus::Loading;
        FetchTicket {
            target: FetchTarget::Stage(self.stage),
            seq: self.latest,
        }
    }

    /// Drops options and selection and orphans any fetch in flight.
    fn reset(&mut self) {
        self.latest += 1;
        self.pending = None;
        self.options.clear();
        self.selection = None;
        self.status = StageStatus::Empty;
    }

    fn select(&mut self, value: Option<&str>) -> Result<bool, SelectionError> {
        if let Some(value) = value {
            if !self.options.iter().any(|option| option.value() == value) {
                return Err(SelectionError::UnknownOption {
                    stage: self.stage,
                    value: value.to_string(),
                });
            }
        }
        if self.selection.as_deref() == value {
            return Ok(false);
        }
        self.selection = value.map(str::to_string);
        Ok(true)
    }

    fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<T>, FetchError>,
    ) -> Completion {
        if ticket.target != FetchTarget::Stage(self.stage) || self.pending != Some(ticket.seq) {
            debug!(
                stage = %self.stage,
                seq = ticket.seq,
                latest = self.latest,
                "discarding superseded option fetch"
            );
            return Completion::Superseded;
        }
        self.pending = None;

        // A fresh option set always starts unselected.
        self.selection = None;
        match result {
            Ok(options) => {
                self.options = options;
                self.status = StageStatus::Ready;
                Completion::Applied
            }
            Err(_) => {
                self.options.clear();
                self.status = StageStatus::Empty;
                Completion::Cleared
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct SelectionPipeline {
    geography: StageState<GeographyOption>,
    commodity: StageState<CommodityOption>,
    market: StageState<MarketOption>,
    prices: Vec<PriceRecord>,
    price_labels: SelectionLabels,
    pending_labels: SelectionLabels,
    price_seq: u64,
    price_pending: Option<u64>,
}

impl Default for SelectionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionPipeline {
    pub fn new() -> Self {
        Self {
            geography: StageState::new(Stage::Geography),
            commodity: StageState::new(Stage::Commodity),
            market: StageState::new(Stage::Market),
            prices: Vec::new(),
            price_labels: SelectionLabels::default(),
            pending_labels: SelectionLabels::default(),
            price_seq: 0,
            price_pending: None,
        }
    }

    /// Issues the two unconditional fetches for the independent stages.
    pub fn initialize(&mut self) -> InitialFetches {
        InitialFetches {
            geographies: self.geography.issue(),
            commodities: self.commodity.issue(),
        }
    }

    pub fn geography(&self) -> &StageState<GeographyOption> {
        &self.geography
    }

    pub fn commodity(&self) -> &StageState<CommodityOption> {
        &self.commodity
    }

    pub fn market(&self) -> &StageState<MarketOption> {
        &self.market
    }

    pub fn status(&self, stage: Stage) -> StageStatus {
        match stage {
            Stage::Geography => self.geography.status(),
            Stage::Commodity => self.commodity.status(),
            Stage::Market => self.market.status(),
        }
    }

    pub fn select_geography(
        &mut self,
        district_id: Option<&str>,
    ) -> Result<Option<MarketRequest>, SelectionError> {
        if !self.geography.select(district_id)? {
            return Ok(None);
        }
        Ok(self.upstream_changed(Stage::Geography))
    }

    pub fn select_commodity(
        &mut self,
        commodity_id: Option<&str>,
    ) -> Result<Option<MarketRequest>, SelectionError> {
        if !self.commodity.select(commodity_id)? {
            return Ok(None);
        }
        Ok(self.upstream_changed(Stage::Commodity))
    }

    pub fn select_market(&mut self, market_id: Option<&str>) -> Result<(), SelectionError> {
        self.market.select(market_id).map(|_| ())
    }

    fn upstream_changed(&mut self, changed: Stage) -> Option<MarketRequest> {
        for dependent in changed.dependents() {
            match dependent {
                Stage::Geography => self.geography.reset(),
                Stage::Commodity => self.commodity.reset(),
                Stage::Market => self.market.reset(),
            }
        }
        self.refresh_markets()
    }

    /// Issues a markets fetch when both upstream selections resolve. Market
    /// has already been reset by the caller, so an unmet precondition just
    /// leaves it empty.
    fn refresh_markets(&mut self) -> Option<MarketRequest> {
        let geography = self.geography.selected_option()?;
        let commodity_id = self.commodity.selection()?.to_string();
        let query = MarketQuery {
            commodity_id,
            state_id: geography.state_id.clone(),
            district_id: geography.district_id.clone(),
        };
        let ticket = self.market.issue();
        Some(MarketRequest { ticket, query })
    }

    pub fn complete_geographies(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<GeographyOption>, FetchError>,
    ) -> Completion {
        let completion = self.geography.complete(ticket, result);
        if completion != Completion::Superseded {
            self.market.reset();
        }
        completion
    }

    pub fn complete_commodities(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<CommodityOption>, FetchError>,
    ) -> Completion {
        let completion = self.commodity.complete(ticket, result);
        if completion != Completion::Superseded {
            self.market.reset();
        }
        completion
    }

    pub fn complete_markets(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<MarketOption>, FetchError>,
    ) -> Completion {
        self.market.complete(ticket, result)
    }

    pub fn can_fetch_prices(&self) -> bool {
        self.geography.selected_option().is_some()
            && self.commodity.selection().is_some()
            && self.market.selection().is_some()
    }

    /// Starts a price query for `today`'s window, or does nothing when any
    /// selection is unresolved.
    pub fn begin_price_query(&mut self, today: Date) -> Option<PriceRequest> {
        if !self.can_fetch_prices() {
            return None;
        }
        let geography = self.geography.selected_option()?;
        let commodity_id = self.commodity.selection()?.to_string();
        let market_id = self.market.selection()?.to_string();
        let (from_date, to_date) = price_window(today);
        let query = PriceQuery {
            commodity_id,
            state_id: geography.state_id.clone(),
            district_id: geography.district_id.clone(),
            market_id,
            from_date,
            to_date,
        };

        self.pending_labels = self.selection_labels();
        self.price_seq += 1;
        self.price_pending = Some(self.price_seq);
        Some(PriceRequest {
            ticket: FetchTicket {
                target: FetchTarget::Prices,
                seq: self.price_seq,
            },
            query,
        })
    }

    /// Replaces the records wholesale on success, clears them on failure.
    /// The busy flag drops once the latest query has completed either way.
    pub fn complete_prices(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<PriceRecord>, FetchError>,
    ) -> Completion {
        if ticket.target != FetchTarget::Prices || self.price_pending != Some(ticket.seq) {
            debug!(
                seq = ticket.seq,
                latest = self.price_seq,
                "discarding superseded price query"
            );
            return Completion::Superseded;
        }

        self.price_pending = None;
        match result {
            Ok(records) => {
                self.prices = records;
                self.price_labels = self.pending_labels.clone();
                Completion::Applied
            }
            Err(_) => {
                self.prices.clear();
                Completion::Cleared
            }
        }
    }

    /// True while the latest price query has not completed.
    pub fn is_busy(&self) -> bool {
        self.price_pending.is_some()
    }

    pub fn prices(&self) -> &[PriceRecord] {
        &self.prices
    }

    /// Price records annotated with the selection active when they were
    /// queried.
    pub fn price_rows(&self) -> Vec<PriceRow> {
        self.prices
            .iter()
            .map(|record| PriceRow {
                record: record.clone(),
                labels: self.price_labels.clone(),
            })
            .collect()
    }

    /// Names of the current selections.
    pub fn selection_labels(&self) -> SelectionLabels {
        let mut labels = SelectionLabels::default();
        if let Some(geo) = self.geography.selected_option() {
            labels.state = geo.state_name.clone();
            labels.district = geo.district_name.clone();
        }
        if let Some(commodity) = self.commodity.selected_option() {
            labels.commodity = commodity.name.clone();
        }
        if let Some(market) = self.market.selected_option() {
            labels.market = market.name.clone();
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn geographies() -> Vec<GeographyOption> {
        vec![
            GeographyOption::new("S1", "State One", "D1", "District One"),
            GeographyOption::new("S2", "State Two", "D2", "District Two"),
        ]
    }

    fn commodities() -> Vec<CommodityOption> {
        vec![
            CommodityOption::new("C1", "Wheat"),
            CommodityOption::new("C2", "Onion"),
        ]
    }

    fn loaded() -> SelectionPipeline {
        let mut pipeline = SelectionPipeline::new();
        let init = pipeline.initialize();
        pipeline.complete_geographies(init.geographies, Ok(geographies()));
        pipeline.complete_commodities(init.commodities, Ok(commodities()));
        pipeline
    }

    /// Pipeline with D1/C1 selected and markets `[M1]` loaded.
    fn with_markets() -> SelectionPipeline {
        let mut pipeline = loaded();
        assert!(pipeline.select_geography(Some("D1")).unwrap().is_none());
        let request = pipeline.select_commodity(Some("C1")).unwrap().unwrap();
        pipeline.complete_markets(request.ticket, Ok(vec![MarketOption::new("M1", "Mkt1")]));
        pipeline
    }

    fn record(date: Date, modal: f64) -> PriceRecord {
        PriceRecord {
            date,
            min_price: modal - 100.0,
            max_price: modal + 100.0,
            modal_price: modal,
        }
    }

    #[test]
    fn initialize_loads_independent_stages() {
        let mut pipeline = SelectionPipeline::new();
        assert_eq!(pipeline.status(Stage::Geography), StageStatus::Empty);

        let init = pipeline.initialize();
        assert_eq!(init.geographies.target(), FetchTarget::Stage(Stage::Geography));
        assert_eq!(init.commodities.target(), FetchTarget::Stage(Stage::Commodity));
        assert_eq!(pipeline.status(Stage::Geography), StageStatus::Loading);
        assert_eq!(pipeline.status(Stage::Commodity), StageStatus::Loading);
        assert_eq!(pipeline.status(Stage::Market), StageStatus::Empty);

        pipeline.complete_geographies(init.geographies, Ok(geographies()));
        assert_eq!(pipeline.status(Stage::Geography), StageStatus::Ready);
        assert_eq!(pipeline.geography().options().len(), 2);
    }

    #[test]
    fn failed_initial_fetch_leaves_stage_empty() {
        let mut pipeline = SelectionPipeline::new();
        let init = pipeline.initialize();
        let outcome =
            pipeline.complete_commodities(init.commodities, Err(FetchError::new("offline")));
        assert_eq!(outcome, Completion::Cleared);
        assert!(pipeline.commodity().options().is_empty());
        assert_eq!(pipeline.status(Stage::Commodity), StageStatus::Empty);
    }

    #[test]
    fn nothing_selected_keeps_markets_empty_and_prices_gated() {
        let mut pipeline = loaded();
        assert!(pipeline.market().options().is_empty());
        assert_eq!(pipeline.status(Stage::Market), StageStatus::Empty);
        assert!(!pipeline.can_fetch_prices());
        assert!(pipeline.begin_price_query(date!(2025 - 06 - 30)).is_none());
        assert!(!pipeline.is_busy());
    }

    #[test]
    fn both_upstream_selections_issue_one_market_fetch() {
        let mut pipeline = loaded();
        assert!(pipeline.select_geography(Some("D1")).unwrap().is_none());
        let request = pipeline.select_commodity(Some("C1")).unwrap().unwrap();
        assert_eq!(
            request.query,
            MarketQuery {
                commodity_id: "C1".into(),
                state_id: "S1".into(),
                district_id: "D1".into(),
            }
        );
        assert_eq!(pipeline.status(Stage::Market), StageStatus::Loading);

        let outcome =
            pipeline.complete_markets(request.ticket, Ok(vec![MarketOption::new("M1", "Mkt1")]));
        assert_eq!(outcome, Completion::Applied);
        assert_eq!(pipeline.market().options()[0].label(), "Mkt1");
        assert_eq!(pipeline.market().options()[0].value(), "M1");
        assert_eq!(pipeline.market().selection(), None);
        assert_eq!(pipeline.status(Stage::Market), StageStatus::Ready);
    }

    #[test]
    fn price_query_covers_trailing_thirty_days() {
        let mut pipeline = with_markets();
        pipeline.select_market(Some("M1")).unwrap();
        let request = pipeline.begin_price_query(date!(2025 - 06 - 30)).unwrap();
        assert_eq!(request.query.from_date, date!(2025 - 05 - 31));
        assert_eq!(request.query.to_date, date!(2025 - 06 - 30));
        assert_eq!(request.query.district_id, "D1");
        assert_eq!(request.query.market_id, "M1");
        assert_eq!(request.query.commodity_id, "C1");
        assert_eq!(request.query.state_id, "S1");
        assert!(pipeline.is_busy());
    }

    #[test]
    fn upstream_change_clears_market_before_refetch_resolves() {
        let mut pipeline = with_markets();
        pipeline.select_market(Some("M1")).unwrap();

        let request = pipeline.select_geography(Some("D2")).unwrap().unwrap();
        assert_eq!(pipeline.market().selection(), None);
        assert!(pipeline.market().options().is_empty());
        assert_eq!(pipeline.status(Stage::Market), StageStatus::Loading);
        assert_eq!(request.query.state_id, "S2");
    }

    #[test]
    fn clearing_upstream_empties_market_without_request() {
        let mut pipeline = with_markets();
        pipeline.select_market(Some("M1")).unwrap();

        assert!(pipeline.select_commodity(None).unwrap().is_none());
        assert!(pipeline.market().options().is_empty());
        assert_eq!(pipeline.market().selection(), None);
        assert_eq!(pipeline.status(Stage::Market), StageStatus::Empty);
    }

    #[test]
    fn fetch_in_flight_is_orphaned_when_upstream_cleared() {
        let mut pipeline = loaded();
        pipeline.select_geography(Some("D1")).unwrap();
        let request = pipeline.select_commodity(Some("C1")).unwrap().unwrap();
        pipeline.select_geography(None).unwrap();

        let outcome =
            pipeline.complete_markets(request.ticket, Ok(vec![MarketOption::new("M1", "Mkt1")]));
        assert_eq!(outcome, Completion::Superseded);
        assert!(pipeline.market().options().is_empty());
        assert_eq!(pipeline.status(Stage::Market), StageStatus::Empty);
    }

    #[test]
    fn later_trigger_wins_even_when_it_resolves_first() {
        let mut pipeline = loaded();
        pipeline.select_geography(Some("D1")).unwrap();
        let first = pipeline.select_commodity(Some("C1")).unwrap().unwrap();
        let second = pipeline.select_commodity(Some("C2")).unwrap().unwrap();
        assert!(second.ticket.seq() > first.ticket.seq());

        let applied =
            pipeline.complete_markets(second.ticket, Ok(vec![MarketOption::new("M2", "Onion Mkt")]));
        let stale =
            pipeline.complete_markets(first.ticket, Ok(vec![MarketOption::new("M1", "Wheat Mkt")]));

        assert_eq!(applied, Completion::Applied);
        assert_eq!(stale, Completion::Superseded);
        let values: Vec<_> = pipeline.market().options().iter().map(|m| m.value()).collect();
        assert_eq!(values, vec!["M2"]);
    }

    #[test]
    fn stale_failure_does_not_clear_newer_options() {
        let mut pipeline = loaded();
        pipeline.select_geography(Some("D1")).unwrap();
        let first = pipeline.select_commodity(Some("C1")).unwrap().unwrap();
        let second = pipeline.select_commodity(Some("C2")).unwrap().unwrap();

        pipeline.complete_markets(second.ticket, Ok(vec![MarketOption::new("M2", "Onion Mkt")]));
        let outcome = pipeline.complete_markets(first.ticket, Err(FetchError::new("timeout")));

        assert_eq!(outcome, Completion::Superseded);
        assert_eq!(pipeline.market().options().len(), 1);
    }

    #[test]
    fn refreshed_markets_never_keep_previous_selection() {
        let mut pipeline = with_markets();
        pipeline.select_market(Some("M1")).unwrap();

        let request = pipeline.select_geography(Some("D2")).unwrap().unwrap();
        pipeline.complete_markets(request.ticket, Ok(vec![MarketOption::new("M1", "Mkt1")]));

        assert_eq!(pipeline.market().selection(), None);
        assert!(!pipeline.can_fetch_prices());
    }

    #[test]
    fn market_fetch_failure_fails_closed() {
        let mut pipeline = loaded();
        pipeline.select_geography(Some("D1")).unwrap();
        let request = pipeline.select_commodity(Some("C1")).unwrap().unwrap();

        let outcome = pipeline.complete_markets(request.ticket, Err(FetchError::new("500")));
        assert_eq!(outcome, Completion::Cleared);
        assert!(pipeline.market().options().is_empty());
        assert_eq!(pipeline.status(Stage::Market), StageStatus::Empty);
    }

    #[test]
    fn unknown_option_is_rejected_without_side_effects() {
        let mut pipeline = with_markets();
        pipeline.select_market(Some("M1")).unwrap();

        let err = pipeline.select_geography(Some("D9")).unwrap_err();
        assert_eq!(
            err,
            SelectionError::UnknownOption {
                stage: Stage::Geography,
                value: "D9".into()
            }
        );
        assert_eq!(pipeline.geography().selection(), Some("D1"));
        assert_eq!(pipeline.market().selection(), Some("M1"));
        assert!(pipeline.select_market(Some("M9")).is_err());
    }

    #[test]
    fn reselecting_same_value_is_not_a_change() {
        let mut pipeline = with_markets();
        pipeline.select_market(Some("M1")).unwrap();

        assert!(pipeline.select_geography(Some("D1")).unwrap().is_none());
        assert_eq!(pipeline.market().selection(), Some("M1"));
        assert_eq!(pipeline.status(Stage::Market), StageStatus::Ready);
    }

    #[test]
    fn consecutive_price_queries_replace_rather_than_merge() {
        let mut pipeline = with_markets();
        pipeline.select_market(Some("M1")).unwrap();

        let first = pipeline.begin_price_query(date!(2025 - 06 - 30)).unwrap();
        pipeline.complete_prices(first.ticket, Ok(vec![record(date!(2025 - 06 - 01), 2000.0)]));
        assert!(!pipeline.is_busy());

        let second = pipeline.begin_price_query(date!(2025 - 07 - 01)).unwrap();
        pipeline.complete_prices(
            second.ticket,
            Ok(vec![record(date!(2025 - 06 - 30), 2100.0), record(date!(2025 - 07 - 01), 2150.0)]),
        );

        let dates: Vec<_> = pipeline.prices().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date!(2025 - 06 - 30), date!(2025 - 07 - 01)]);
    }

    #[test]
    fn price_failure_clears_records_and_busy_flag() {
        let mut pipeline = with_markets();
        pipeline.select_market(Some("M1")).unwrap();
        let first = pipeline.begin_price_query(date!(2025 - 06 - 30)).unwrap();
        pipeline.complete_prices(first.ticket, Ok(vec![record(date!(2025 - 06 - 01), 2000.0)]));

        let second = pipeline.begin_price_query(date!(2025 - 06 - 30)).unwrap();
        let outcome = pipeline.complete_prices(second.ticket, Err(FetchError::new("bad json")));
        assert_eq!(outcome, Completion::Cleared);
        assert!(pipeline.prices().is_empty());
        assert!(!pipeline.is_busy());
    }

    #[test]
    fn older_price_query_cannot_clear_busy_of_newer_one() {
        let mut pipeline = with_markets();
        pipeline.select_market(Some("M1")).unwrap();
        let first = pipeline.begin_price_query(date!(2025 - 06 - 30)).unwrap();
        let second = pipeline.begin_price_query(date!(2025 - 06 - 30)).unwrap();

        let outcome = pipeline.complete_prices(first.ticket, Ok(vec![record(date!(2025 - 06 - 01), 1.0)]));
        assert_eq!(outcome, Completion::Superseded);
        assert!(pipeline.is_busy());
        assert!(pipeline.prices().is_empty());

        pipeline.complete_prices(second.ticket, Ok(vec![record(date!(2025 - 06 - 02), 2.0)]));
        assert!(!pipeline.is_busy());
        assert_eq!(pipeline.prices().len(), 1);
    }

    #[test]
    fn selection_change_keeps_prices_until_next_query() {
        let mut pipeline = with_markets();
        pipeline.select_market(Some("M1")).unwrap();
        let request = pipeline.begin_price_query(date!(2025 - 06 - 30)).unwrap();
        pipeline.complete_prices(request.ticket, Ok(vec![record(date!(2025 - 06 - 01), 2000.0)]));

        let refetch = pipeline.select_commodity(Some("C2")).unwrap();
        assert!(refetch.is_some());
        assert!(pipeline.market().options().is_empty());
        assert_eq!(pipeline.market().selection(), None);
        assert_eq!(pipeline.prices().len(), 1);

        let rows = pipeline.price_rows();
        assert_eq!(rows[0].labels.commodity, "Wheat");
        assert_eq!(rows[0].labels.market, "Mkt1");
        assert_eq!(pipeline.selection_labels().commodity, "Onion");
        assert_eq!(pipeline.selection_labels().market, "None");
    }

    #[test]
    fn price_ticket_is_not_accepted_for_markets() {
        let mut pipeline = with_markets();
        pipeline.select_market(Some("M1")).unwrap();
        let request = pipeline.begin_price_query(date!(2025 - 06 - 30)).unwrap();

        let outcome = pipeline.complete_markets(request.ticket, Ok(Vec::new()));
        assert_eq!(outcome, Completion::Superseded);
        assert_eq!(pipeline.market().options().len(), 1);
    }

    #[test]
    fn completed_market_ticket_cannot_be_applied_twice() {
        let mut pipeline = loaded();
        pipeline.select_geography(Some("D1")).unwrap();
        let request = pipeline.select_commodity(Some("C1")).unwrap().unwrap();
        let markets = vec![MarketOption::new("M1", "Mkt1")];

        let first = pipeline.complete_markets(request.ticket, Ok(markets.clone()));
        assert_eq!(first, Completion::Applied);
        pipeline.select_market(Some("M1")).unwrap();

        let replay = pipeline.complete_markets(request.ticket, Ok(markets));
        assert_eq!(replay, Completion::Superseded);
        assert_eq!(pipeline.market().selection(), Some("M1"));

        let failed_replay = pipeline.complete_markets(request.ticket, Err(FetchError::new("late")));
        assert_eq!(failed_replay, Completion::Superseded);
        assert_eq!(pipeline.market().options().len(), 1);
    }

    #[test]
    fn completed_price_ticket_cannot_be_applied_twice() {
        let mut pipeline = with_markets();
        pipeline.select_market(Some("M1")).unwrap();
        let request = pipeline.begin_price_query(date!(2025 - 06 - 30)).unwrap();
        pipeline.complete_prices(request.ticket, Ok(vec![record(date!(2025 - 06 - 01), 2000.0)]));

        let replay = pipeline.complete_prices(request.ticket, Err(FetchError::new("late")));
        assert_eq!(replay, Completion::Superseded);
        assert_eq!(pipeline.prices().len(), 1);
        assert!(!pipeline.is_busy());
    }

    #[test]
    fn stage_graph_declares_market_dependencies() {
        assert_eq!(Stage::Market.upstream(), &[Stage::Geography, Stage::Commodity]);
        assert!(Stage::Geography.upstream().is_empty());
        assert_eq!(Stage::Commodity.dependents(), &[Stage::Market]);
        assert!(Stage::Market.dependents().is_empty());
    }

    #[test]
    fn window_crosses_month_and_year_boundaries() {
        assert_eq!(
            price_window(date!(2025 - 01 - 15)),
            (date!(2024 - 12 - 16), date!(2025 - 01 - 15))
        );
        assert_eq!(
            price_window(date!(2024 - 03 - 01)),
            (date!(2024 - 01 - 31), date!(2024 - 03 - 01))
        );
    }
}
