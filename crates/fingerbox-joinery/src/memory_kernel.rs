//! In-memory geometry kernel
//!
//! A self-contained implementation of every kernel collaborator, for running
//! and testing the box builder without a CAD host. Sketches hold axis-aligned
//! rectangles; bodies are unions of boxes and keep only their edges.

use fingerbox_core::{
    ConstructionPlane, DirectedEdge, PlaneName, Point2, Point3, Rect2, RigidTransform, Tolerance,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use crate::edge_matcher::JointSpec;
use crate::error::{KernelError, KernelResult};
use crate::kernel::{
    BodyEdgeEnumerator, BodyId, ComponentId, ComponentTree, ExtrudeEngine, GeometryFrameProvider,
    JointEngine, JointHandle, OccurrenceId, PlanarProfile, SketchBuilder, SketchId,
};

/// A joint accepted by the kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct JointRecord {
    pub handle: JointHandle,
    pub first: OccurrenceId,
    pub second: OccurrenceId,
    pub spec: JointSpec,
}

#[derive(Debug, Clone)]
struct Component {
    id: ComponentId,
    name: String,
    bodies: Vec<Body>,
}

#[derive(Debug, Clone)]
struct Body {
    id: BodyId,
    edges: Vec<DirectedEdge>,
}

#[derive(Debug, Clone)]
struct Occurrence {
    id: OccurrenceId,
    component: ComponentId,
    parent: Option<OccurrenceId>,
    transform: RigidTransform,
}

#[derive(Debug, Clone)]
struct Sketch {
    component: ComponentId,
    plane: ConstructionPlane,
    rectangles: Vec<Rect2>,
}

/// A closed region of a sketch: the grid cells it covers.
#[derive(Debug, Clone)]
struct Region {
    cells: Vec<Rect2>,
    area: f64,
    centroid: Point2,
}

impl Region {
    fn from_cells(cells: Vec<Rect2>) -> Self {
        let area: f64 = cells.iter().map(Rect2::area).sum();
        let (sum_u, sum_v) = cells.iter().fold((0.0, 0.0), |(u, v), cell| {
            let c = cell.centroid();
            (u + c.x * cell.area(), v + c.y * cell.area())
        });
        Self {
            centroid: Point2::new(sum_u / area, sum_v / area),
            area,
            cells,
        }
    }

    fn bounds(&self) -> Option<Rect2> {
        let (first, rest) = self.cells.split_first()?;
        Some(rest.iter().fold(*first, |acc, cell| acc.union(cell)))
    }

    fn matches(&self, profile: &PlanarProfile, tolerance: &Tolerance) -> bool {
        tolerance.approx_eq_point2(&self.centroid, &profile.centroid)
            && tolerance.approx_eq(self.area, profile.area)
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryKernel {
    tolerance: Tolerance,
    root: OccurrenceId,
    components: Vec<Component>,
    occurrences: Vec<Occurrence>,
    sketches: Vec<Sketch>,
    joints: Vec<JointRecord>,
    next_body: u64,
}

impl InMemoryKernel {
    pub fn new(tolerance: Tolerance) -> Self {
        let component = ComponentId::new();
        let root = OccurrenceId::new();
        Self {
            tolerance,
            root,
            components: vec![Component {
                id: component,
                name: "Root".to_string(),
                bodies: Vec::new(),
            }],
            occurrences: vec![Occurrence {
                id: root,
                component,
                parent: None,
                transform: RigidTransform::identity(),
            }],
            sketches: Vec::new(),
            joints: Vec::new(),
            next_body: 0,
        }
    }

    /// The top-level occurrence every tree starts from.
    pub fn root(&self) -> OccurrenceId {
        self.root
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    pub fn joints(&self) -> &[JointRecord] {
        &self.joints
    }

    /// Occurrences placed directly under `parent`, in creation order.
    pub fn children(&self, parent: OccurrenceId) -> Vec<OccurrenceId> {
        self.occurrences
            .iter()
            .filter(|o| o.parent == Some(parent))
            .map(|o| o.id)
            .collect()
    }

    pub fn component_of(&self, occurrence: OccurrenceId) -> KernelResult<ComponentId> {
        Ok(self.occurrence(occurrence)?.component)
    }

    pub fn body_count(&self, occurrence: OccurrenceId) -> KernelResult<usize> {
        Ok(self.bodies(occurrence)?.len())
    }

    /// Bodies of the component behind `occurrence`, in extrusion order.
    pub fn bodies(&self, occurrence: OccurrenceId) -> KernelResult<Vec<BodyId>> {
        let component = self.component(self.component_of(occurrence)?)?;
        Ok(component.bodies.iter().map(|body| body.id).collect())
    }

    /// Edges of a single body, in the component's local frame.
    pub fn body_edges(
        &self,
        occurrence: OccurrenceId,
        body: BodyId,
    ) -> KernelResult<Vec<DirectedEdge>> {
        let component = self.component(self.component_of(occurrence)?)?;
        component
            .bodies
            .iter()
            .find(|b| b.id == body)
            .map(|b| b.edges.clone())
            .ok_or_else(|| {
                KernelError::InvalidGeometry(format!("{} is not a body of {}", body, occurrence))
            })
    }

    /// Placement of `occurrence` relative to the root.
    pub fn world_transform(&self, occurrence: OccurrenceId) -> KernelResult<RigidTransform> {
        let data = self.occurrence(occurrence)?;
        let mut transform = data.transform;
        let mut parent = data.parent;
        while let Some(id) = parent {
            let data = self.occurrence(id)?;
            transform = data.transform * transform;
            parent = data.parent;
        }
        Ok(transform)
    }

    fn occurrence(&self, id: OccurrenceId) -> KernelResult<&Occurrence> {
        self.occurrences
            .iter()
            .find(|o| o.id == id)
            .ok_or(KernelError::UnknownOccurrence(id))
    }

    fn component(&self, id: ComponentId) -> KernelResult<&Component> {
        self.components
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| KernelError::InvalidGeometry(format!("missing {}", id)))
    }

    fn component_mut(&mut self, id: ComponentId) -> KernelResult<&mut Component> {
        self.components
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| KernelError::InvalidGeometry(format!("missing {}", id)))
    }

    fn sketch(&self, id: SketchId) -> KernelResult<&Sketch> {
        usize::try_from(id.0)
            .ok()
            .and_then(|i| self.sketches.get(i))
            .ok_or(KernelError::UnknownSketch(id))
    }

    fn sketch_mut(&mut self, id: SketchId) -> KernelResult<&mut Sketch> {
        usize::try_from(id.0)
            .ok()
            .and_then(|i| self.sketches.get_mut(i))
            .ok_or(KernelError::UnknownSketch(id))
    }

    fn place(
        &mut self,
        parent: OccurrenceId,
        component: ComponentId,
        transform: RigidTransform,
    ) -> OccurrenceId {
        let id = OccurrenceId::new();
        self.occurrences.push(Occurrence {
            id,
            component,
            parent: Some(parent),
            transform,
        });
        id
    }
}

impl Default for InMemoryKernel {
    fn default() -> Self {
        Self::new(Tolerance::default())
    }
}

impl ComponentTree for InMemoryKernel {
    fn add_component(&mut self, parent: OccurrenceId, name: &str) -> KernelResult<OccurrenceId> {
        self.occurrence(parent)?;

        let component = ComponentId::new();
        self.components.push(Component {
            id: component,
            name: name.to_string(),
            bodies: Vec::new(),
        });
        let occurrence = self.place(parent, component, RigidTransform::identity());
        debug!("Created component '{}' as {}", name, occurrence);
        Ok(occurrence)
    }

    fn add_instance(
        &mut self,
        parent: OccurrenceId,
        source: OccurrenceId,
        transform: RigidTransform,
    ) -> KernelResult<OccurrenceId> {
        self.occurrence(parent)?;
        let component = self.occurrence(source)?.component;

        let occurrence = self.place(parent, component, transform);
        debug!("Placed instance of {} as {}", source, occurrence);
        Ok(occurrence)
    }

    fn component_name(&self, occurrence: OccurrenceId) -> KernelResult<String> {
        let component = self.component(self.component_of(occurrence)?)?;
        Ok(component.name.clone())
    }
}

impl GeometryFrameProvider for InMemoryKernel {
    fn construction_plane(
        &self,
        occurrence: OccurrenceId,
        name: PlaneName,
    ) -> KernelResult<ConstructionPlane> {
        self.occurrence(occurrence)?;
        Ok(ConstructionPlane::standard(name))
    }
}

impl SketchBuilder for InMemoryKernel {
    fn create_sketch(
        &mut self,
        occurrence: OccurrenceId,
        plane: &ConstructionPlane,
    ) -> KernelResult<SketchId> {
        let component = self.component_of(occurrence)?;
        let id = SketchId(self.sketches.len() as u64);
        self.sketches.push(Sketch {
            component,
            plane: *plane,
            rectangles: Vec::new(),
        });
        Ok(id)
    }

    fn add_rectangle(
        &mut self,
        sketch: SketchId,
        origin: Point2,
        corner: Point2,
    ) -> KernelResult<PlanarProfile> {
        let tolerance = self.tolerance;
        let rect = Rect2::from_corners(origin, corner);
        let finite = [rect.min.x, rect.min.y, rect.max.x, rect.max.y]
            .iter()
            .all(|c| c.is_finite());
        if !finite || tolerance.approx_zero(rect.width()) || tolerance.approx_zero(rect.height()) {
            return Err(KernelError::InvalidGeometry(format!(
                "degenerate rectangle from ({}, {}) to ({}, {})",
                origin.x, origin.y, corner.x, corner.y
            )));
        }

        let data = self.sketch_mut(sketch)?;
        data.rectangles.push(rect);
        Ok(PlanarProfile::new(
            sketch,
            data.rectangles.len() - 1,
            rect.centroid(),
            rect.area(),
        ))
    }

    fn profiles(&self, sketch: SketchId) -> KernelResult<Vec<PlanarProfile>> {
        let data = self.sketch(sketch)?;
        Ok(arrange(&data.rectangles, &self.tolerance)
            .iter()
            .enumerate()
            .map(|(index, region)| PlanarProfile::new(sketch, index, region.centroid, region.area))
            .collect())
    }
}

impl ExtrudeEngine for InMemoryKernel {
    fn extrude(&mut self, profiles: &[PlanarProfile], depth: f64) -> KernelResult<BodyId> {
        let tolerance = self.tolerance;
        let Some(first) = profiles.first() else {
            return Err(KernelError::InvalidGeometry(
                "no profiles to extrude".to_string(),
            ));
        };
        if !depth.is_finite() || depth <= 0.0 || tolerance.approx_zero(depth) {
            return Err(KernelError::InvalidGeometry(format!(
                "extrusion depth {} must be positive",
                depth
            )));
        }
        if profiles.iter().any(|p| p.sketch != first.sketch) {
            return Err(KernelError::InvalidGeometry(
                "profiles span more than one sketch".to_string(),
            ));
        }

        let sketch = self.sketch(first.sketch)?;
        let regions = arrange(&sketch.rectangles, &tolerance);
        let plane = sketch.plane;
        let component = sketch.component;

        let mut edges = EdgeSet::default();
        for profile in profiles {
            let region = regions
                .get(profile.index)
                .filter(|r| r.matches(profile, &tolerance))
                .or_else(|| regions.iter().find(|r| r.matches(profile, &tolerance)))
                .ok_or(KernelError::StaleProfile {
                    sketch: profile.sketch,
                    index: profile.index,
                    centroid: profile.centroid,
                })?;

            let boxes = match region.bounds() {
                Some(bounds) if tolerance.approx_eq(bounds.area(), region.area) => vec![bounds],
                _ => region.cells.clone(),
            };
            for rect in &boxes {
                for edge in box_edges(&plane, rect, depth) {
                    edges.insert(edge);
                }
            }
        }

        let id = BodyId(self.next_body);
        self.next_body += 1;
        let edges = edges.into_edges();
        let edge_count = edges.len();
        self.component_mut(component)?.bodies.push(Body { id, edges });

        info!(
            "Extruded {} profiles by {} into {} ({} edges)",
            profiles.len(),
            depth,
            id,
            edge_count
        );
        Ok(id)
    }
}

impl BodyEdgeEnumerator for InMemoryKernel {
    fn edges(&self, occurrence: OccurrenceId) -> KernelResult<Vec<DirectedEdge>> {
        let component = self.component(self.component_of(occurrence)?)?;
        Ok(component
            .bodies
            .iter()
            .flat_map(|body| body.edges.iter().copied())
            .collect())
    }
}

impl JointEngine for InMemoryKernel {
    fn create_rigid_joint(
        &mut self,
        first: OccurrenceId,
        second: OccurrenceId,
        spec: &JointSpec,
    ) -> KernelResult<JointHandle> {
        if first == second {
            return Err(KernelError::JointRejected(
                "cannot join an occurrence to itself".to_string(),
            ));
        }
        let first_world = self.world_transform(first)?;
        let second_world = self.world_transform(second)?;

        let finite = spec.anchor_a.iter().all(|c| c.is_finite())
            && spec.anchor_b.iter().all(|c| c.is_finite())
            && spec.direction.iter().all(|c| c.is_finite())
            && spec.offset.is_finite();
        if !finite {
            return Err(KernelError::JointRejected(
                "joint geometry is not finite".to_string(),
            ));
        }

        // The first anchor must sit `offset` along the joint direction from the second.
        let anchor_a = first_world.transform_point(&spec.anchor_a);
        let anchor_b = second_world.transform_point(&spec.anchor_b);
        let direction = first_world.transform_vector(&spec.direction);
        let expected = anchor_b + direction * spec.offset;
        if !self.tolerance.approx_eq_point3(&anchor_a, &expected) {
            return Err(KernelError::JointRejected(format!(
                "anchor ({}, {}, {}) is not {} from ({}, {}, {}) along ({}, {}, {})",
                anchor_a.x,
                anchor_a.y,
                anchor_a.z,
                spec.offset,
                anchor_b.x,
                anchor_b.y,
                anchor_b.z,
                direction.x,
                direction.y,
                direction.z
            )));
        }

        let handle = JointHandle::new();
        self.joints.push(JointRecord {
            handle,
            first,
            second,
            spec: *spec,
        });
        info!("Created rigid joint {} between {} and {}", handle, first, second);
        Ok(handle)
    }
}

/// The 12 edges of `rect` extruded by `depth` along the plane normal,
/// oriented along +u, +v and +normal.
fn box_edges(plane: &ConstructionPlane, rect: &Rect2, depth: f64) -> Vec<DirectedEdge> {
    let lift = plane.normal() * depth;
    let at = |u: f64, v: f64, top: bool| {
        let p = plane.to_world(&Point2::new(u, v));
        if top {
            p + lift
        } else {
            p
        }
    };
    let (u0, u1, v0, v1) = (rect.min.x, rect.max.x, rect.min.y, rect.max.y);

    let mut edges = Vec::with_capacity(12);
    for top in [false, true] {
        for v in [v0, v1] {
            edges.push(DirectedEdge::new(at(u0, v, top), at(u1, v, top)));
        }
        for u in [u0, u1] {
            edges.push(DirectedEdge::new(at(u, v0, top), at(u, v1, top)));
        }
    }
    for (u, v) in [(u0, v0), (u1, v0), (u1, v1), (u0, v1)] {
        edges.push(DirectedEdge::new(at(u, v, false), at(u, v, true)));
    }
    edges
}

fn point_key(p: &Point3) -> [u64; 3] {
    // `+ 0.0` folds -0.0 into 0.0
    [
        (p.x + 0.0).to_bits(),
        (p.y + 0.0).to_bits(),
        (p.z + 0.0).to_bits(),
    ]
}

/// Edges in insertion order, each kept once whichever way it runs.
///
/// Box corners are built from the shared grid coordinates of one
/// arrangement, so coincident edges of neighbouring boxes are bit-identical.
#[derive(Debug, Default)]
struct EdgeSet {
    edges: Vec<DirectedEdge>,
    seen: HashSet<([u64; 3], [u64; 3])>,
}

impl EdgeSet {
    fn insert(&mut self, edge: DirectedEdge) {
        let (start, end) = (point_key(&edge.start), point_key(&edge.end));
        if self.seen.contains(&(end, start)) || !self.seen.insert((start, end)) {
            return;
        }
        self.edges.push(edge);
    }

    fn into_edges(self) -> Vec<DirectedEdge> {
        self.edges
    }
}

/// Sorted coordinates with values within tolerance of each other merged.
fn distinct_coordinates(values: impl Iterator<Item = f64>, tolerance: &Tolerance) -> Vec<f64> {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    let mut distinct: Vec<f64> = Vec::with_capacity(values.len());
    for value in values {
        match distinct.last() {
            Some(&last) if tolerance.approx_eq(last, value) => {}
            _ => distinct.push(value),
        }
    }
    distinct
}

/// Index of the sorted coordinate nearest `value`, the lower one on ties.
fn snap(coordinates: &[f64], value: f64) -> usize {
    match coordinates.partition_point(|&c| c < value) {
        0 => 0,
        i if i == coordinates.len() => i - 1,
        i if value - coordinates[i - 1] <= coordinates[i] - value => i - 1,
        i => i,
    }
}

fn find_root(parent: &mut [usize], mut k: usize) -> usize {
    while parent[k] != k {
        parent[k] = parent[parent[k]];
        k = parent[k];
    }
    k
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let (ra, rb) = (find_root(parent, a), find_root(parent, b));
    if ra != rb {
        parent[rb.max(ra)] = rb.min(ra);
    }
}

/// Split overlapping rectangles into the closed regions their outlines
/// enclose.
///
/// The distinct u and v coordinates form a grid; a grid cell belongs to the
/// sketch when some rectangle covers it, and two neighbouring cells are one
/// region unless a rectangle outline runs between them. Regions are ordered
/// by their first cell, scanning u then v.
fn arrange(rectangles: &[Rect2], tolerance: &Tolerance) -> Vec<Region> {
    let us = distinct_coordinates(rectangles.iter().flat_map(|r| [r.min.x, r.max.x]), tolerance);
    let vs = distinct_coordinates(rectangles.iter().flat_map(|r| [r.min.y, r.max.y]), tolerance);
    if us.len() < 2 || vs.len() < 2 {
        return Vec::new();
    }

    // [u_min, u_max, v_min, v_max] as grid line indices
    let snapped: Vec<[usize; 4]> = rectangles
        .iter()
        .map(|r| {
            [
                snap(&us, r.min.x),
                snap(&us, r.max.x),
                snap(&vs, r.min.y),
                snap(&vs, r.max.y),
            ]
        })
        .collect();

    let (nu, nv) = (us.len() - 1, vs.len() - 1);
    let cell = |i: usize, j: usize| i * nv + j;

    // Corner marks whose 2D prefix sum counts the rectangles covering a cell
    let stride = nv + 1;
    let mut coverage = vec![0i64; (nu + 1) * stride];
    // u_outline[line * nv + j]: an outline runs on grid line u = `line` across
    // cell row j; v_outline[line * nu + i] likewise on v = `line` across column i.
    let mut u_outline = vec![false; (nu + 1) * nv];
    let mut v_outline = vec![false; (nv + 1) * nu];
    for &[u0, u1, v0, v1] in &snapped {
        for j in v0..v1 {
            u_outline[u0 * nv + j] = true;
            u_outline[u1 * nv + j] = true;
        }
        for i in u0..u1 {
            v_outline[v0 * nu + i] = true;
            v_outline[v1 * nu + i] = true;
        }
        if u0 < u1 && v0 < v1 {
            coverage[u0 * stride + v0] += 1;
            coverage[u1 * stride + v0] -= 1;
            coverage[u0 * stride + v1] -= 1;
            coverage[u1 * stride + v1] += 1;
        }
    }
    for i in 0..=nu {
        for j in 0..=nv {
            let mut count = coverage[i * stride + j];
            if i > 0 {
                count += coverage[(i - 1) * stride + j];
            }
            if j > 0 {
                count += coverage[i * stride + j - 1];
            }
            if i > 0 && j > 0 {
                count -= coverage[(i - 1) * stride + j - 1];
            }
            coverage[i * stride + j] = count;
        }
    }
    let inside: Vec<bool> = (0..nu * nv)
        .map(|k| coverage[(k / nv) * stride + k % nv] > 0)
        .collect();

    let mut parent: Vec<usize> = (0..nu * nv).collect();
    for i in 0..nu {
        for j in 0..nv {
            if !inside[cell(i, j)] {
                continue;
            }
            if i + 1 < nu && inside[cell(i + 1, j)] && !u_outline[(i + 1) * nv + j] {
                union(&mut parent, cell(i, j), cell(i + 1, j));
            }
            if j + 1 < nv && inside[cell(i, j + 1)] && !v_outline[(j + 1) * nu + i] {
                union(&mut parent, cell(i, j), cell(i, j + 1));
            }
        }
    }

    let mut groups: Vec<Vec<Rect2>> = Vec::new();
    let mut group_of_root: HashMap<usize, usize> = HashMap::new();
    for i in 0..nu {
        for j in 0..nv {
            let k = cell(i, j);
            if !inside[k] {
                continue;
            }
            let root = find_root(&mut parent, k);
            let group = *group_of_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[group].push(Rect2 {
                min: Point2::new(us[i], vs[j]),
                max: Point2::new(us[i + 1], vs[j + 1]),
            });
        }
    }

    groups.into_iter().map(Region::from_cells).collect()
}
