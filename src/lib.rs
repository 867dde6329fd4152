//! Layout and coloring for calendar heatmaps
//!
//! Given a date range and a sparse list of dated counts, `calheat` works out
//! where each day's square goes in a grid of weeks, which value (if any) each
//! square shows, and what color to fill it with.  Drawing is left to the
//! caller: everything here is plain data.
//!
//! ```
//! use calheat::{DateValue, Heatmap, HeatmapConfig};
//! use time::macros::date;
//!
//! let values = vec![
//!     DateValue::new(date!(2016 - 04 - 01), 2.0),
//!     DateValue::new(date!(2016 - 04 - 08), 6.0),
//! ];
//! let heatmap = Heatmap::new(date!(2016 - 04 - 09), values, HeatmapConfig::default())?;
//! for cell in heatmap.cells() {
//!     let _fill = heatmap.fill_color_at(cell.index);
//! }
//! assert_eq!(heatmap.layout().week_count(), 29);
//! # Ok::<(), calheat::Error>(())
//! ```
pub mod cache;
pub mod color;
pub mod error;
pub mod heatmap;
pub mod layout;
pub mod selection;
pub mod value;

pub use crate::cache::{CellAttributes, Diagnostic, ScaleBounds, ValueIndexCache, EMPTY_FILL};
pub use crate::color::{interpolate, ColorScale, Rgb};
pub use crate::error::{ColorParseError, Error, InputDataError};
pub use crate::heatmap::{Heatmap, HeatmapConfig};
pub use crate::layout::{GridCell, GridLayout, MonthLabel, Orientation, Point, ViewBox};
pub use crate::selection::{DragRange, DragSelection};
pub use crate::value::{parse_date, CellCallbacks, DateValue, TooltipAttrs, ValueFn};
