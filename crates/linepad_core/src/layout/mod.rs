//! Line measurement, styling, and the windowed layout cache.

mod cache;
mod measure;
mod raw;
mod source;
mod style;

pub use cache::{CacheStats, LayoutCache};
pub use measure::{SubLine, TextLayout, TextMeasurer};
pub use raw::RawLayout;
pub use source::{
    height_units, resolve_span, units_below, units_to_height, LayoutSource, LineEntry,
    HEIGHT_UNITS_PER_PX,
};
pub use style::{Alignment, FontMetrics, Insets, LineStyle, Theme, ThemeLookup};
