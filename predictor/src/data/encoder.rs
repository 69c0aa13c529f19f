use std::{collections::HashMap, sync::Arc};

use super::Table;

/// Bidirectional mapping between neighborhood names and their integer codes.
///
/// Codes are assigned in order of first appearance, starting at 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborhoodEncoding {
    names: Vec<String>,
    codes: HashMap<String, usize>,
}

impl NeighborhoodEncoding {
    /// Factorizes `names`, returning the encoding and the code of every name in order.
    pub fn factorize<'a, I>(names: I) -> (Self, Vec<usize>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut encoding = Self::default();
        let codes = names.into_iter().map(|name| encoding.intern(name)).collect();
        (encoding, codes)
    }

    fn intern(&mut self, name: &str) -> usize {
        if let Some(&code) = self.codes.get(name) {
            return code;
        }

        let code = self.names.len();
        self.names.push(name.to_string());
        self.codes.insert(name.to_string(), code);
        code
    }

    pub fn code(&self, name: &str) -> Option<usize> {
        self.codes.get(name).copied()
    }

    pub fn name(&self, code: usize) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates `(code, name)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().map(String::as_str).enumerate()
    }
}

/// A `Table` plus the columns derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedTable {
    table: Arc<Table>,
    encoding: Option<NeighborhoodEncoding>,
    neighborhood_codes: Option<Vec<usize>>,
    price_per_area: Option<Vec<f64>>,
}

impl EncodedTable {
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The neighborhood encoding, `None` if the table has no neighborhoods.
    pub fn encoding(&self) -> Option<&NeighborhoodEncoding> {
        self.encoding.as_ref()
    }

    pub fn neighborhood_codes(&self) -> Option<&[usize]> {
        self.neighborhood_codes.as_deref()
    }

    /// `price / area` per row, `None` unless the table has both columns.
    pub fn price_per_area(&self) -> Option<&[f64]> {
        self.price_per_area.as_deref()
    }
}

/// Derives the neighborhood codes and the price per area of `table`.
///
/// Columns that can't be derived are left out, this never fails.
pub fn encode(table: Arc<Table>) -> EncodedTable {
    let (encoding, neighborhood_codes) = match table.neighborhoods() {
        Some(names) => {
            let (encoding, codes) = NeighborhoodEncoding::factorize(names.iter().map(String::as_str));
            (Some(encoding), Some(codes))
        }
        None => (None, None),
    };

    // Areas are validated positive when the table is built.
    let price_per_area = match (table.prices(), table.areas()) {
        (Some(prices), Some(areas)) => {
            Some(prices.iter().zip(areas).map(|(p, a)| p / a).collect())
        }
        _ => None,
    };

    log::debug!(
        "encoded {} rows into {} neighborhoods",
        table.len(),
        encoding.as_ref().map_or(0, NeighborhoodEncoding::len)
    );

    EncodedTable {
        table,
        encoding,
        neighborhood_codes,
        price_per_area,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_table;

    #[test]
    fn codes_follow_first_appearance() {
        let (encoding, codes) = NeighborhoodEncoding::factorize(["b", "a", "b", "c", "a"]);

        assert_eq!(codes, vec![0, 1, 0, 2, 1]);
        assert_eq!(encoding.code("a"), Some(1));
        assert_eq!(encoding.name(2), Some("c"));
        assert_eq!(encoding.code("z"), None);
        assert_eq!(
            encoding.iter().collect::<Vec<_>>(),
            vec![(0, "b"), (1, "a"), (2, "c")]
        );
    }

    #[test]
    fn encoding_the_sample_twice_gives_the_same_codes() {
        let table = Arc::new(sample_table().unwrap());
        let a = encode(Arc::clone(&table));
        let b = encode(table);

        assert_eq!(a, b);
        assert_eq!(
            a.neighborhood_codes().unwrap(),
            &[0, 1, 1, 2, 3, 4, 5, 5, 5, 5, 5]
        );
        assert_eq!(a.encoding().unwrap().len(), 6);
    }

    #[test]
    fn every_name_gets_exactly_one_code() {
        let table = Arc::new(sample_table().unwrap());
        let encoded = encode(Arc::clone(&table));
        let encoding = encoded.encoding().unwrap();
        let names = table.neighborhoods().unwrap();

        for (name, &code) in names.iter().zip(encoded.neighborhood_codes().unwrap()) {
            assert_eq!(encoding.code(name), Some(code));
            assert_eq!(encoding.name(code), Some(name.as_str()));
        }
    }

    #[test]
    fn price_per_area_divides_price_by_area() {
        let encoded = encode(Arc::new(sample_table().unwrap()));
        let table = encoded.table();
        let ppa = encoded.price_per_area().unwrap();

        for (i, row) in table.rows().enumerate() {
            let expected = row.price_in_sar.unwrap() / row.area.unwrap();
            assert!((ppa[i] - expected).abs() <= f64::EPSILON * expected.abs());
        }
    }

    #[test]
    fn missing_columns_are_skipped() {
        let table = Table::builder()
            .areas(vec![100.0, 200.0])
            .prices(vec![1.0, 2.0])
            .build()
            .unwrap();
        let encoded = encode(Arc::new(table));

        assert!(encoded.encoding().is_none());
        assert!(encoded.neighborhood_codes().is_none());
        assert_eq!(encoded.price_per_area(), Some(&[0.01, 0.01][..]));

        let table = Table::builder()
            .neighborhoods(vec!["a".into()])
            .areas(vec![100.0])
            .build()
            .unwrap();
        assert!(encode(Arc::new(table)).price_per_area().is_none());
    }
}
