pub mod coordinate_fields;
pub mod price_table;
pub mod select_field;
pub mod stat_card;
pub mod tile_card;
pub mod toast;

pub use coordinate_fields::CoordinateFields;
pub use price_table::PriceTable;
pub use select_field::{choices, SelectField};
pub use stat_card::StatCard;
pub use tile_card::TileCard;
pub use toast::{push_toast, Toast, ToastKind, ToastMessage};
