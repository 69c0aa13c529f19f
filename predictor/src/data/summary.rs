use serde::Serialize;

use super::{NeighborhoodEncoding, Table};

/// Descriptive statistics of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation, `NaN` for a single value.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Describes `values`, `None` if there are none.
pub fn describe(values: &[f64]) -> Option<Describe> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);

    Some(Describe {
        count: values.len(),
        mean,
        std: var.sqrt(),
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Linear interpolation between the closest ranks of an already sorted, non empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// The smallest and largest area in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaBounds {
    pub min: f64,
    pub max: f64,
}

impl AreaBounds {
    pub fn of(table: &Table) -> Option<Self> {
        let areas = table.areas()?;
        let stats = describe(areas)?;
        Some(Self {
            min: stats.min,
            max: stats.max,
        })
    }

    pub fn contains(&self, area: f64) -> bool {
        area >= self.min && area <= self.max
    }
}

/// The mean price of one neighborhood.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborhoodPrice {
    pub neighborhood: String,
    pub count: usize,
    pub average_price: f64,
}

/// Averages the price per neighborhood, in first-seen order.
pub fn average_price_by_neighborhood(table: &Table) -> Option<Vec<NeighborhoodPrice>> {
    let names = table.neighborhoods()?;
    let prices = table.prices()?;

    let (encoding, codes) = NeighborhoodEncoding::factorize(names.iter().map(String::as_str));
    let mut totals = vec![(0usize, 0.0); encoding.len()];
    for (&code, &price) in codes.iter().zip(prices) {
        totals[code].0 += 1;
        totals[code].1 += price;
    }

    let averages = encoding
        .iter()
        .zip(totals)
        .map(|((_, name), (count, total))| NeighborhoodPrice {
            neighborhood: name.to_string(),
            count,
            average_price: total / count as f64,
        })
        .collect();

    Some(averages)
}

/// Everything the dataset view shows about a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub price: Option<Describe>,
    pub area: Option<Describe>,
    pub price_per_area: Option<Describe>,
    pub area_bounds: Option<AreaBounds>,
    pub by_neighborhood: Option<Vec<NeighborhoodPrice>>,
}

impl DatasetSummary {
    /// Summarizes `table`, `price_per_area` being the derived column if it exists.
    pub fn new(table: &Table, price_per_area: Option<&[f64]>) -> Self {
        Self {
            rows: table.len(),
            price: table.prices().and_then(describe),
            area: table.areas().and_then(describe),
            price_per_area: price_per_area.and_then(describe),
            area_bounds: AreaBounds::of(table),
            by_neighborhood: average_price_by_neighborhood(table),
        }
    }
}
