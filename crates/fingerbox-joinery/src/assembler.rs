//! Box Assembler
//!
//! Drives a geometry kernel through a complete box build: a base panel with
//! tab rows along both long edges, one side panel with a tab row along its
//! bottom edge, a second occurrence of that side at the opposite wall, and
//! the rigid joints between them.
//!
//! Working frame: X runs across the width, Y along the length and Z up the
//! height.

use fingerbox_core::{Axis, PlaneName, Point2, Rect2, RigidTransform, Tolerance};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::edge_filter::edges_along_axis;
use crate::edge_matcher::{find_joint, JointSpec};
use crate::error::{BoxError, BoxResult};
use crate::kernel::{GeometryKernel, JointHandle, OccurrenceId};
use crate::partition::{Alternation, PanelPartitioner, TabRow};
use crate::tab_layout::{TabLayout, TabSizing};

pub const BASE_PANEL: &str = "Base";
pub const SIDE_PANEL: &str = "Side";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxDimensions {
    pub width: f64,
    pub length: f64,
    pub height: f64,
    pub material_thickness: f64,
}

impl Default for BoxDimensions {
    fn default() -> Self {
        Self {
            width: 20.0,
            length: 30.0,
            height: 10.0,
            material_thickness: 0.3,
        }
    }
}

impl BoxDimensions {
    pub fn new(width: f64, length: f64, height: f64, material_thickness: f64) -> Self {
        Self {
            width,
            length,
            height,
            material_thickness,
        }
    }

    /// Every dimension must be finite and positive, and the panels must leave
    /// room for the material: `width > 2 * thickness`, `height > thickness`.
    pub fn validate(&self) -> BoxResult<()> {
        let fields = [
            ("width", self.width),
            ("length", self.length),
            ("height", self.height),
            ("material_thickness", self.material_thickness),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(BoxError::invalid_dimension(name, value));
            }
        }

        let inner_width = self.width - 2.0 * self.material_thickness;
        if inner_width <= 0.0 {
            return Err(BoxError::invalid_dimension(
                "width - 2 * material_thickness",
                inner_width,
            ));
        }
        let wall_height = self.height - self.material_thickness;
        if wall_height <= 0.0 {
            return Err(BoxError::invalid_dimension(
                "height - material_thickness",
                wall_height,
            ));
        }
        Ok(())
    }

    /// Distance between the two side walls.
    pub fn side_spacing(&self) -> f64 {
        self.width - self.material_thickness
    }
}

/// A joint the assembler created.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedJoint {
    pub handle: JointHandle,
    pub first: OccurrenceId,
    pub second: OccurrenceId,
    pub axis: Axis,
    pub spec: JointSpec,
}

/// Everything one [`BoxAssembler::assemble`] call produced.
#[derive(Debug)]
pub struct AssembledBox {
    pub container: OccurrenceId,
    pub base: OccurrenceId,
    pub side: OccurrenceId,
    pub opposite_side: OccurrenceId,
    pub layout: TabLayout,
    pub joints: Vec<PlacedJoint>,
    /// Joints whose panels had no coincident edges. The panels still exist.
    pub skipped_joints: Vec<BoxError>,
}

impl AssembledBox {
    pub fn panels(&self) -> [OccurrenceId; 3] {
        [self.base, self.side, self.opposite_side]
    }

    pub fn is_complete(&self) -> bool {
        self.skipped_joints.is_empty()
    }
}

/// Sketch and partition plan for one panel.
struct PanelPlan {
    name: &'static str,
    plane: PlaneName,
    outline: Rect2,
    tabs: Vec<Rect2>,
    partitioner: PanelPartitioner,
}

#[derive(Debug, Clone)]
pub struct BoxAssembler {
    name: String,
    dimensions: BoxDimensions,
    tab_sizing: TabSizing,
    tolerance: Tolerance,
}

impl BoxAssembler {
    pub fn new(name: impl Into<String>, dimensions: BoxDimensions) -> Self {
        Self {
            name: name.into(),
            dimensions,
            tab_sizing: TabSizing::default(),
            tolerance: Tolerance::default(),
        }
    }

    pub fn with_tab_sizing(mut self, tab_sizing: TabSizing) -> Self {
        self.tab_sizing = tab_sizing;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensions(&self) -> &BoxDimensions {
        &self.dimensions
    }

    pub fn tab_sizing(&self) -> &TabSizing {
        &self.tab_sizing
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// Layout of the tabs along the box length, shared by the base and the
    /// sides so their fingers interlock.
    pub fn tab_layout(&self) -> BoxResult<TabLayout> {
        let max_tab_size = self
            .tab_sizing
            .resolve(self.dimensions.material_thickness);
        TabLayout::compute_with_tolerance(self.dimensions.length, max_tab_size, &self.tolerance)
    }

    /// Build the box under `parent`.
    ///
    /// A joint whose panels share no coincident edge is logged and recorded
    /// in [`AssembledBox::skipped_joints`]; every other failure aborts the
    /// assembly.
    pub fn assemble<K: GeometryKernel>(
        &self,
        kernel: &mut K,
        parent: OccurrenceId,
    ) -> BoxResult<AssembledBox> {
        self.tolerance.validate()?;
        self.dimensions.validate()?;
        let layout = self.tab_layout()?;

        info!(
            "Assembling box '{}' ({} x {} x {}, thickness {}): {} tabs of {:.4}",
            self.name,
            self.dimensions.width,
            self.dimensions.length,
            self.dimensions.height,
            self.dimensions.material_thickness,
            layout.tab_count(),
            layout.tab_size()
        );

        let container = kernel
            .add_component(parent, &self.name)
            .map_err(BoxError::kernel(format!("creating container '{}'", self.name)))?;

        let base = self.build_panel(kernel, container, self.base_plan(&layout))?;
        let side = self.build_panel(kernel, container, self.side_plan(&layout))?;

        let spacing = self.dimensions.side_spacing();
        let opposite_side = kernel
            .add_instance(container, side, RigidTransform::translation(spacing, 0.0, 0.0))
            .map_err(BoxError::kernel(format!(
                "placing the opposite '{}' panel",
                SIDE_PANEL
            )))?;
        info!("Placed opposite side {} at x = {}", opposite_side, spacing);

        let mut joints = Vec::new();
        let mut skipped_joints = Vec::new();
        let pairs = [
            (base, side, Axis::Z, 0.0),
            (side, opposite_side, Axis::X, -spacing),
        ];
        for (first, second, axis, offset) in pairs {
            match self.join(kernel, first, second, axis, offset) {
                Ok(joint) => joints.push(joint),
                Err(err) if err.is_recoverable() => {
                    warn!("Skipping joint: {}", err);
                    skipped_joints.push(err);
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            "Box '{}' assembled: 3 panels, {} joints, {} skipped",
            self.name,
            joints.len(),
            skipped_joints.len()
        );

        Ok(AssembledBox {
            container,
            base,
            side,
            opposite_side,
            layout,
            joints,
            skipped_joints,
        })
    }

    /// Base on XY: the full width x length outline with a tab row inside each
    /// long edge. Its even tabs protrude into the sides' slots.
    fn base_plan(&self, layout: &TabLayout) -> PanelPlan {
        let BoxDimensions { width, length, .. } = self.dimensions;
        let t = self.dimensions.material_thickness;

        let mut tabs = Vec::with_capacity(layout.tab_count() * 2);
        for (_, start, end) in layout.tabs() {
            tabs.push(rect(0.0, start, t, end));
            tabs.push(rect(width - t, start, width, end));
        }

        PanelPlan {
            name: BASE_PANEL,
            plane: PlaneName::Xy,
            outline: rect(0.0, 0.0, width, length),
            tabs,
            partitioner: PanelPartitioner::new(*layout)
                .with_row(TabRow::along_v(t / 2.0))
                .with_row(TabRow::along_v(width - t / 2.0))
                .with_alternation(Alternation::EvenSolid)
                .with_tolerance(self.tolerance),
        }
    }

    /// Side on YZ: length x height with a tab row along its bottom edge.
    fn side_plan(&self, layout: &TabLayout) -> PanelPlan {
        let BoxDimensions { length, height, .. } = self.dimensions;
        let t = self.dimensions.material_thickness;

        PanelPlan {
            name: SIDE_PANEL,
            plane: PlaneName::Yz,
            outline: rect(0.0, 0.0, length, height),
            tabs: layout
                .tabs()
                .map(|(_, start, end)| rect(start, 0.0, end, t))
                .collect(),
            partitioner: PanelPartitioner::new(*layout)
                .with_row(TabRow::along_u(t / 2.0))
                .with_alternation(Alternation::OddSolid)
                .with_tolerance(self.tolerance),
        }
    }

    fn build_panel<K: GeometryKernel>(
        &self,
        kernel: &mut K,
        container: OccurrenceId,
        plan: PanelPlan,
    ) -> BoxResult<OccurrenceId> {
        let sketching = || BoxError::kernel(format!("sketching panel '{}'", plan.name));

        let occurrence = kernel
            .add_component(container, plan.name)
            .map_err(BoxError::kernel(format!("creating panel '{}'", plan.name)))?;
        let plane = kernel
            .construction_plane(occurrence, plan.plane)
            .map_err(BoxError::kernel(format!(
                "reading the {} plane of panel '{}'",
                plan.plane, plan.name
            )))?;

        let sketch = kernel
            .create_sketch(occurrence, &plane)
            .map_err(sketching())?;
        for r in std::iter::once(&plan.outline).chain(plan.tabs.iter()) {
            kernel
                .add_rectangle(sketch, r.min, r.max)
                .map_err(sketching())?;
        }
        let profiles = kernel.profiles(sketch).map_err(sketching())?;

        let selected = plan.partitioner.select(plan.name, &profiles)?;
        kernel
            .extrude(&selected, self.dimensions.material_thickness)
            .map_err(BoxError::kernel(format!("extruding panel '{}'", plan.name)))?;

        info!(
            "Built panel '{}' on {}: {} of {} profiles extruded",
            plan.name,
            plan.plane,
            selected.len(),
            profiles.len()
        );
        Ok(occurrence)
    }

    fn join<K: GeometryKernel>(
        &self,
        kernel: &mut K,
        first: OccurrenceId,
        second: OccurrenceId,
        axis: Axis,
        offset: f64,
    ) -> BoxResult<PlacedJoint> {
        let first_name = kernel
            .component_name(first)
            .map_err(BoxError::kernel("naming the first joint panel"))?;
        let second_name = kernel
            .component_name(second)
            .map_err(BoxError::kernel("naming the second joint panel"))?;

        let edges_a = kernel
            .edges(first)
            .map_err(BoxError::kernel(format!("reading edges of '{}'", first_name)))?;
        let edges_b = kernel
            .edges(second)
            .map_err(BoxError::kernel(format!("reading edges of '{}'", second_name)))?;
        let along_a = edges_along_axis(&edges_a, axis, &self.tolerance);
        let along_b = edges_along_axis(&edges_b, axis, &self.tolerance);
        debug!(
            "{} edges along {} on '{}', {} on '{}'",
            along_a.len(),
            axis,
            first_name,
            along_b.len(),
            second_name
        );

        let Some(spec) = find_joint(&along_a, &along_b, offset, &self.tolerance) else {
            return Err(BoxError::JointNotFound {
                first: first_name,
                second: second_name,
                axis,
                offset,
            });
        };

        let handle = match kernel.create_rigid_joint(first, second, &spec) {
            Ok(handle) => handle,
            Err(source) => {
                return Err(BoxError::JointCreation {
                    first: first_name,
                    second: second_name,
                    axis,
                    offset,
                    source,
                })
            }
        };

        info!(
            "Joined '{}' and '{}' along {} (offset {}, flipped {})",
            first_name, second_name, axis, offset, spec.flipped
        );
        Ok(PlacedJoint {
            handle,
            first,
            second,
            axis,
            spec,
        })
    }
}

fn rect(u0: f64, v0: f64, u1: f64, v1: f64) -> Rect2 {
    Rect2::from_corners(Point2::new(u0, v0), Point2::new(u1, v1))
}
