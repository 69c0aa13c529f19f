use std::fmt;

use serde::Serialize;

/// The canonical columns of a property table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Neighborhood,
    Area,
    Price,
    Classification,
    PropertyType,
}

// Synonyms are stored already normalized (see `normalize_header`).
const NEIGHBORHOOD: &[&str] = &[
    "neighborhood_name",
    "neighborhoodname",
    "neighborhood",
    "neighbourhood_name",
    "neighbourhood",
    "district",
    "الحي",
];
const AREA: &[&str] = &[
    "area",
    "area(sqm)",
    "area(m2)",
    "area_sqm",
    "area_m2",
    "size",
    "المساحة",
];
const PRICE: &[&str] = &[
    "price_in_sar",
    "price",
    "price(sar)",
    "price_sar",
    "priceinsar",
    "السعر",
];
const CLASSIFICATION: &[&str] = &["classification_name", "classification", "التصنيف"];
const PROPERTY_TYPE: &[&str] = &[
    "property_type_name",
    "property_type",
    "propertytype",
    "type",
    "نوع_العقار",
];

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Neighborhood,
        Column::Area,
        Column::Price,
        Column::Classification,
        Column::PropertyType,
    ];

    /// The canonical field name.
    pub fn name(self) -> &'static str {
        match self {
            Column::Neighborhood => "neighborhood_name",
            Column::Area => "area",
            Column::Price => "price_in_SAR",
            Column::Classification => "classification_name",
            Column::PropertyType => "property_type_name",
        }
    }

    /// Every normalized header accepted for this column.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            Column::Neighborhood => NEIGHBORHOOD,
            Column::Area => AREA,
            Column::Price => PRICE,
            Column::Classification => CLASSIFICATION,
            Column::PropertyType => PROPERTY_TYPE,
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, Column::Neighborhood | Column::Area | Column::Price)
    }

    /// Resolves a raw header into its canonical column, if any.
    pub fn from_header(header: &str) -> Option<Self> {
        let normalized = normalize_header(header);
        Self::ALL
            .into_iter()
            .find(|column| column.synonyms().contains(&normalized.as_str()))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lower-cases a header and strips every whitespace character, so `" Price (SAR) "` and
/// `"price(sar)"` compare equal.
pub fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Where each canonical column lives in a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    positions: [Option<usize>; 5],
}

impl ColumnMap {
    /// Maps a header row. When several headers resolve to the same column the first one wins.
    pub fn from_headers<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut map = Self::default();
        for (idx, header) in headers.into_iter().enumerate() {
            if let Some(column) = Column::from_header(header) {
                map.positions[column as usize].get_or_insert(idx);
            }
        }

        map
    }

    pub fn get(&self, column: Column) -> Option<usize> {
        self.positions[column as usize]
    }

    /// Returns the first required column that's missing.
    pub fn first_missing(&self) -> Option<Column> {
        Column::ALL
            .into_iter()
            .find(|&column| column.is_required() && self.get(column).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_case_and_whitespace_insensitive() {
        assert_eq!(Column::from_header(" Price (SAR) "), Some(Column::Price));
        assert_eq!(Column::from_header("PRICE"), Some(Column::Price));
        assert_eq!(Column::from_header("price_in_SAR"), Some(Column::Price));
        assert_eq!(Column::from_header(" AREA "), Some(Column::Area));
        assert_eq!(Column::from_header("Area (sqm)"), Some(Column::Area));
        assert_eq!(
            Column::from_header("Neighborhood Name"),
            Some(Column::Neighborhood)
        );
        assert_eq!(
            Column::from_header("neighborhood_name"),
            Some(Column::Neighborhood)
        );
        assert_eq!(Column::from_header("rooms"), None);
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        assert_eq!(
            Column::from_header("\u{feff}neighborhood_name"),
            Some(Column::Neighborhood)
        );
    }

    #[test]
    fn column_map_finds_positions() {
        let map = ColumnMap::from_headers(["id", "Price", "neighborhood", "area", "price_sar"]);

        assert_eq!(map.get(Column::Price), Some(1));
        assert_eq!(map.get(Column::Neighborhood), Some(2));
        assert_eq!(map.get(Column::Area), Some(3));
        assert_eq!(map.get(Column::Classification), None);
        assert_eq!(map.first_missing(), None);
    }

    #[test]
    fn column_map_reports_missing_required_columns() {
        let map = ColumnMap::from_headers(["neighborhood", "classification"]);
        assert_eq!(map.first_missing(), Some(Column::Area));
    }
}
