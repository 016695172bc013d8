//! Tab Layout
//!
//! Fits an odd number of equal-width tabs into a span so that no tab is
//! wider than a maximum. Counts grow in steps of two, which keeps the first
//! and last segment of every edge on the same side of the alternation.

use fingerbox_core::Tolerance;
use serde::{Deserialize, Serialize};

use crate::error::{BoxError, BoxResult};

/// Upper bound on the tab count of a single edge.
pub const MAX_TAB_COUNT: usize = 1_000_000;

/// How the maximum tab size is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabScale {
    /// `max_tab_size` is a length.
    Absolute,
    /// `max_tab_size` is a multiple of the material thickness.
    #[default]
    Thickness,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TabSizing {
    pub max_tab_size: f64,
    pub scale: TabScale,
}

impl TabSizing {
    pub fn absolute(max_tab_size: f64) -> Self {
        Self {
            max_tab_size,
            scale: TabScale::Absolute,
        }
    }

    pub fn thickness_multiple(multiple: f64) -> Self {
        Self {
            max_tab_size: multiple,
            scale: TabScale::Thickness,
        }
    }

    /// Maximum tab length for a given material thickness.
    pub fn resolve(&self, material_thickness: f64) -> f64 {
        match self.scale {
            TabScale::Absolute => self.max_tab_size,
            TabScale::Thickness => self.max_tab_size * material_thickness,
        }
    }
}

impl Default for TabSizing {
    fn default() -> Self {
        Self::thickness_multiple(2.0)
    }
}

/// Tab count and size for one span. `tab_count` is odd and
/// `tab_count * tab_size == span` up to rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TabLayout {
    tab_count: usize,
    tab_size: f64,
}

impl TabLayout {
    pub fn compute(span: f64, max_tab_size: f64) -> BoxResult<Self> {
        Self::compute_with_tolerance(span, max_tab_size, &Tolerance::default())
    }

    /// Smallest odd tab count whose tab size does not exceed `max_tab_size`.
    pub fn compute_with_tolerance(
        span: f64,
        max_tab_size: f64,
        tolerance: &Tolerance,
    ) -> BoxResult<Self> {
        if !span.is_finite() || span <= 0.0 {
            return Err(BoxError::invalid_dimension("span", span));
        }
        if !max_tab_size.is_finite() || max_tab_size <= 0.0 {
            return Err(BoxError::invalid_dimension("max_tab_size", max_tab_size));
        }

        let ratio = span / max_tab_size;
        if !ratio.is_finite() || ratio > MAX_TAB_COUNT as f64 {
            return Err(BoxError::invalid_dimension("max_tab_size", max_tab_size));
        }

        let mut tab_count = 1;
        let mut tab_size = span;

        while !tolerance.at_most(tab_size, max_tab_size) {
            tab_count += 2;
            tab_size = span / tab_count as f64;
        }

        Ok(Self {
            tab_count,
            tab_size,
        })
    }

    pub fn tab_count(&self) -> usize {
        self.tab_count
    }

    pub fn tab_size(&self) -> f64 {
        self.tab_size
    }

    pub fn span(&self) -> f64 {
        self.tab_count as f64 * self.tab_size
    }

    /// Start and end of tab `index` along the span.
    pub fn tab_bounds(&self, index: usize) -> (f64, f64) {
        (
            index as f64 * self.tab_size,
            (index + 1) as f64 * self.tab_size,
        )
    }

    pub fn tab_centre(&self, index: usize) -> f64 {
        let (start, end) = self.tab_bounds(index);
        (start + end) / 2.0
    }

    /// `(index, start, end)` for every tab in order.
    pub fn tabs(&self) -> impl Iterator<Item = (usize, f64, f64)> + '_ {
        (0..self.tab_count).map(|i| {
            let (start, end) = self.tab_bounds(i);
            (i, start, end)
        })
    }
}

/// Tab layout for `span` with tabs no larger than `max_tab_size`.
pub fn compute_tab_layout(span: f64, max_tab_size: f64) -> BoxResult<TabLayout> {
    TabLayout::compute(span, max_tab_size)
}
