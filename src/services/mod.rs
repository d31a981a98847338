//! Services for date math, layout and display derivation

pub mod calendar;
pub mod derive;
pub mod events;
pub mod geometry;
pub mod range;
pub mod scale;
pub mod value_cache;

pub use calendar::{Calendar, CanonicalDate, Zone};
pub use derive::{Derivations, TooltipAttrs, TooltipMap};
pub use events::{CellEventKind, EventHandlers};
pub use geometry::Geometry;
pub use range::{PaddedRange, RangeSource};
pub use scale::{ColorScale, ScaleLevel};
pub use value_cache::{CacheKey, ValueCache};
