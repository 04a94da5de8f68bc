use serde::{Deserialize, Serialize};
use time::Date;

/// Census district identifier; doubles as the value of a geography option.
pub type DistrictId = String;
/// Census state identifier derived from the selected district.
pub type StateId = String;
/// Identifier for commodities returned by the market service.
pub type CommodityId = String;
/// Identifier for markets (mandis) returned by the market service.
pub type MarketId = String;

/// Minimal capability shared by every selectable dropdown item.
pub trait SelectOption {
    fn label(&self) -> &str;
    fn value(&self) -> &str;
}

/// A state/district pair. The district id is the selectable value, the
/// state id is carried along because downstream lookups need it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeographyOption {
    pub district_id: DistrictId,
    pub district_name: String,
    pub state_id: StateId,
    pub state_name: String,
    label: String,
}

impl GeographyOption {
    pub fn new(
        state_id: impl Into<StateId>,
        state_name: impl Into<String>,
        district_id: impl Into<DistrictId>,
        district_name: impl Into<String>,
    ) -> Self {
        let state_name = state_name.into();
        let district_name = district_name.into();
        Self {
            label: format!("{state_name} - {district_name}"),
            district_id: district_id.into(),
            district_name,
            state_id: state_id.into(),
            state_name,
        }
    }
}

impl SelectOption for GeographyOption {
    fn label(&self) -> &str {
        &self.label
    }

    fn value(&self) -> &str {
        &self.district_id
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommodityOption {
    pub commodity_id: CommodityId,
    pub name: String,
}

impl CommodityOption {
    pub fn new(commodity_id: impl Into<CommodityId>, name: impl Into<String>) -> Self {
        Self {
            commodity_id: commodity_id.into(),
            name: name.into(),
        }
    }
}

impl SelectOption for CommodityOption {
    fn label(&self) -> &str {
        &self.name
    }

    fn value(&self) -> &str {
        &self.commodity_id
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketOption {
    pub market_id: MarketId,
    pub name: String,
}

impl MarketOption {
    pub fn new(market_id: impl Into<MarketId>, name: impl Into<String>) -> Self {
        Self {
            market_id: market_id.into(),
            name: name.into(),
        }
    }
}

impl SelectOption for MarketOption {
    fn label(&self) -> &str {
        &self.name
    }

    fn value(&self) -> &str {
        &self.market_id
    }
}

/// One day of wholesale prices for the queried commodity/market.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceRecord {
    pub date: Date,
    pub min_price: f64,
    pub max_price: f64,
    pub modal_price: f64,
}

/// Human-readable names for the active selections; `"None"` when unset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionLabels {
    pub state: String,
    pub district: String,
    pub commodity: String,
    pub market: String,
}

impl Default for SelectionLabels {
    fn default() -> Self {
        let none = || "None".to_string();
        Self {
            state: none(),
            district: none(),
            commodity: none(),
            market: none(),
        }
    }
}

/// A price record annotated with the selection it is displayed against.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceRow {
    pub record: PriceRecord,
    pub labels: SelectionLabels,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geography_label_joins_state_and_district() {
        let geo = GeographyOption::new("S1", "Punjab", "D1", "Ludhiana");
        assert_eq!(geo.label(), "Punjab - Ludhiana");
        assert_eq!(geo.value(), "D1");
        assert_eq!(geo.state_id, "S1");
    }
}
