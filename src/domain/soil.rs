use thiserror::Error;

/// Geographic centre of India, used before the user picks a point.
pub const DEFAULT_LATITUDE: f64 = 20.5937;
pub const DEFAULT_LONGITUDE: f64 = 78.9629;

const PROPERTY_NAMES: &[(&str, &str)] = &[
    ("B", "Boron"),
    ("Cu", "Copper"),
    ("EC", "Electrical Conductivity"),
    ("Fe", "Iron"),
    ("K", "Potassium"),
    ("Mn", "Manganese"),
    ("N", "Nitrogen"),
    ("OC", "Organic Carbon"),
    ("P", "Phosphorus"),
    ("pH", "pH"),
    ("S", "Sulfur"),
    ("Zn", "Zinc"),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("latitude must be a number between -90 and 90")]
    Latitude,
    #[error("longitude must be a number between -180 and 180")]
    Longitude,
}

impl Default for Coordinates {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
        }
    }
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude);
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parses user-typed latitude/longitude fields.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, CoordinateError> {
        let lat = latitude
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateError::Latitude)?;
        let lon = longitude
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateError::Longitude)?;
        Self::new(lat, lon)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SoilValue {
    Number(f64),
    Text(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SoilProperty {
    pub code: String,
    pub value: SoilValue,
}

impl SoilProperty {
    /// Full name for known nutrient codes, the raw code otherwise.
    pub fn name(&self) -> &str {
        PROPERTY_NAMES
            .iter()
            .find(|(code, _)| *code == self.code)
            .map(|(_, name)| *name)
            .unwrap_or(self.code.as_str())
    }

    pub fn display_value(&self) -> String {
        match &self.value {
            SoilValue::Number(value) => format!("{value:.2}"),
            SoilValue::Text(text) => text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_get_names() {
        let property = SoilProperty {
            code: "OC".into(),
            value: SoilValue::Number(0.456),
        };
        assert_eq!(property.name(), "Organic Carbon");
        assert_eq!(property.display_value(), "0.46");

        let unknown = SoilProperty {
            code: "Mo".into(),
            value: SoilValue::Text("n/a".into()),
        };
        assert_eq!(unknown.name(), "Mo");
        assert_eq!(unknown.display_value(), "n/a");
    }

    #[test]
    fn coordinates_are_range_checked() {
        assert!(Coordinates::parse(" 30.9 ", "75.85").is_ok());
        assert_eq!(Coordinates::parse("91", "75"), Err(CoordinateError::Latitude));
        assert_eq!(Coordinates::parse("30", "east"), Err(CoordinateError::Longitude));
        assert_eq!(Coordinates::default().latitude, DEFAULT_LATITUDE);
    }
}
