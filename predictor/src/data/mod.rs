mod cache;
mod columns;
mod encoder;
mod loader;
mod sample;
mod summary;
mod table;

pub use cache::TableCache;
pub use columns::{Column, ColumnMap, normalize_header};
pub use encoder::{EncodedTable, NeighborhoodEncoding, encode};
pub use loader::{load, read_csv};
pub use sample::{sample_records, sample_table};
pub use summary::{
    AreaBounds, DatasetSummary, Describe, NeighborhoodPrice, average_price_by_neighborhood,
    describe,
};
pub use table::{PropertyRecord, Row, Table, TableBuilder};
