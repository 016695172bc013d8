//! Panel Partitioner
//!
//! A panel sketch is its outline plus one rectangle per tab along each
//! jointed edge. The kernel splits that drawing into profiles: one frame
//! profile (the body of the panel) and one profile per tab cell. The
//! partitioner keeps the frame and the tab cells the alternation marks as
//! solid; the rest become slots for the mating panel.

use fingerbox_core::{Point2, Tolerance};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BoxError, BoxResult};
use crate::kernel::PlanarProfile;
use crate::tab_layout::TabLayout;

/// Which tab indices protrude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alternation {
    /// Odd indices are solid; both ends of the edge are slots.
    #[default]
    OddSolid,
    /// Even indices are solid; mates with `OddSolid`.
    EvenSolid,
}

impl Alternation {
    pub fn is_solid(self, index: usize) -> bool {
        match self {
            Alternation::OddSolid => index % 2 == 1,
            Alternation::EvenSolid => index % 2 == 0,
        }
    }

    pub fn complement(self) -> Self {
        match self {
            Alternation::OddSolid => Alternation::EvenSolid,
            Alternation::EvenSolid => Alternation::OddSolid,
        }
    }
}

/// Sketch axis a tab row runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowDirection {
    AlongU,
    AlongV,
}

/// A row of tab cells: tabs are laid out from 0 along `direction`, and the
/// row's mid-line sits at `centre` on the other sketch axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TabRow {
    pub direction: RowDirection,
    pub centre: f64,
}

impl TabRow {
    pub fn along_u(centre: f64) -> Self {
        Self {
            direction: RowDirection::AlongU,
            centre,
        }
    }

    pub fn along_v(centre: f64) -> Self {
        Self {
            direction: RowDirection::AlongV,
            centre,
        }
    }

    fn along(&self, p: &Point2) -> f64 {
        match self.direction {
            RowDirection::AlongU => p.x,
            RowDirection::AlongV => p.y,
        }
    }

    fn across(&self, p: &Point2) -> f64 {
        match self.direction {
            RowDirection::AlongU => p.y,
            RowDirection::AlongV => p.x,
        }
    }
}

/// What a profile is within its panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileRole {
    /// Not in any tab row; always kept.
    Frame,
    /// Cell `index` of tab row `row`.
    Tab {
        row: usize,
        index: usize,
        solid: bool,
    },
}

impl ProfileRole {
    pub fn is_selected(&self) -> bool {
        match self {
            ProfileRole::Frame => true,
            ProfileRole::Tab { solid, .. } => *solid,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PanelPartitioner {
    layout: TabLayout,
    rows: Vec<TabRow>,
    alternation: Alternation,
    tolerance: Tolerance,
}

impl PanelPartitioner {
    pub fn new(layout: TabLayout) -> Self {
        Self {
            layout,
            rows: Vec::new(),
            alternation: Alternation::default(),
            tolerance: Tolerance::default(),
        }
    }

    pub fn with_row(mut self, row: TabRow) -> Self {
        self.rows.push(row);
        self
    }

    pub fn with_alternation(mut self, alternation: Alternation) -> Self {
        self.alternation = alternation;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn layout(&self) -> &TabLayout {
        &self.layout
    }

    /// Classify a profile by its centroid. `None` means the centroid lies on a
    /// tab row but matches none of its tab positions.
    pub fn classify(&self, centroid: &Point2) -> Option<ProfileRole> {
        let Some((row_index, row)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| self.tolerance.approx_eq(row.across(centroid), row.centre))
        else {
            return Some(ProfileRole::Frame);
        };

        // Tab centres are a tab apart: only the cell under `along` and its
        // neighbours can match.
        let along = row.along(centroid);
        let count = self.layout.tab_count();
        let cell = (along / self.layout.tab_size()).floor();
        if count == 0 || !cell.is_finite() {
            return None;
        }
        let cell = cell.clamp(0.0, (count - 1) as f64) as usize;
        (cell.saturating_sub(1)..=(cell + 1).min(count - 1))
            .find(|&i| self.tolerance.approx_eq(along, self.layout.tab_centre(i)))
            .map(|index| ProfileRole::Tab {
                row: row_index,
                index,
                solid: self.alternation.is_solid(index),
            })
    }

    /// Profiles to extrude, in input order.
    pub fn select(&self, panel: &str, profiles: &[PlanarProfile]) -> BoxResult<Vec<PlanarProfile>> {
        let mut selected = Vec::new();

        for profile in profiles {
            let role = self
                .classify(&profile.centroid)
                .ok_or_else(|| BoxError::PartitionMismatch {
                    panel: panel.to_string(),
                    u: profile.centroid.x,
                    v: profile.centroid.y,
                })?;

            debug!(
                "Panel '{}': profile {} at ({:.4}, {:.4}) is {:?}",
                panel, profile.index, profile.centroid.x, profile.centroid.y, role
            );

            if role.is_selected() {
                selected.push(*profile);
            }
        }

        Ok(selected)
    }
}

/// Solid profiles of a panel with a single tab row along its sketch u axis,
/// occupying `[0, panel_depth]` on v, odd tabs solid.
pub fn select_solid_profiles(
    profiles: &[PlanarProfile],
    layout: &TabLayout,
    panel_depth: f64,
) -> BoxResult<Vec<PlanarProfile>> {
    PanelPartitioner::new(*layout)
        .with_row(TabRow::along_u(panel_depth / 2.0))
        .select("panel", profiles)
}
