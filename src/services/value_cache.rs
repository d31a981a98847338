//! Day-index lookup table for values
//!
//! Built in one pass over the values and invalidated through an explicit
//! [`CacheKey`] instead of diffing inputs.

use super::calendar::{Calendar, Zone};
use super::derive::{Derivations, TooltipMap};
use super::range::PaddedRange;
use crate::types::{HeatmapValue, Result};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Everything a cache depends on. `revision` covers the values and the
/// derivation functions; the padded start covers range and week start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheKey {
    pub revision: u64,
    pub padded_start: NaiveDate,
    pub zone: Zone,
}

/// Derived display data for one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellDisplay {
    pub class_name: String,
    pub title: Option<String>,
    pub tooltip_attrs: TooltipMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Position of the value in the caller's slice
    pub position: usize,
    pub display: CellDisplay,
}

#[derive(Debug, Clone)]
pub struct ValueCache {
    key: CacheKey,
    entries: HashMap<i64, CacheEntry>,
    empty: CellDisplay,
}

impl ValueCache {
    /// Index every value by its day offset from the padded start.
    ///
    /// Values landing on the same day overwrite each other in slice order.
    pub fn build<V: HeatmapValue>(
        values: &[V],
        range: &PaddedRange,
        calendar: &Calendar,
        derivations: &Derivations<V>,
        revision: u64,
    ) -> Result<Self> {
        let mut entries = HashMap::with_capacity(values.len());
        for (position, value) in values.iter().enumerate() {
            let date = calendar.local_date(calendar.normalize(value.date())?);
            let index = range.index_of(date);
            entries.insert(
                index,
                CacheEntry {
                    position,
                    display: CellDisplay {
                        class_name: derivations.class_for(Some(value)),
                        title: derivations.title_for(Some(value)),
                        tooltip_attrs: derivations.tooltip_for(Some(value)),
                    },
                },
            );
        }

        let empty = CellDisplay {
            class_name: derivations.class_for(None),
            title: derivations.title_for(None),
            tooltip_attrs: derivations.tooltip_for(None),
        };

        Ok(Self {
            key: CacheKey {
                revision,
                padded_start: range.padded_start,
                zone: calendar.zone(),
            },
            entries,
            empty,
        })
    }

    pub fn key(&self) -> CacheKey {
        self.key
    }

    pub fn entry(&self, index: i64) -> Option<&CacheEntry> {
        self.entries.get(&index)
    }

    /// Position in the values slice of the value shown at `index`
    pub fn position(&self, index: i64) -> Option<usize> {
        self.entry(index).map(|e| e.position)
    }

    /// Display data for `index`, falling back to the empty-cell derivation
    pub fn display(&self, index: i64) -> &CellDisplay {
        self.entry(index).map(|e| &e.display).unwrap_or(&self.empty)
    }

    pub fn class_name(&self, index: i64) -> &str {
        &self.display(index).class_name
    }

    pub fn title(&self, index: i64) -> Option<&str> {
        self.display(index).title.as_deref()
    }

    pub fn tooltip_attrs(&self, index: i64) -> &TooltipMap {
        &self.display(index).tooltip_attrs
    }

    /// Number of occupied day indices
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
