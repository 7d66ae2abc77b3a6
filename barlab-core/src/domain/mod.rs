//! Domain types: bars and ordered bar series.

pub mod bar;
pub mod series;

pub use bar::Bar;
pub use series::BarSeries;
