pub mod loader;
pub mod series;

pub use loader::{clean_prices, filter_by_symbol, load_csv, parse_date, PriceRecord};
pub use series::{PricePoint, PriceSeries, SeriesError, SignalSeries};
