use fingerbox_core::{
    ConstructionPlane, DirectedEdge, PlaneName, Point2, RigidTransform,
};
use fingerbox_joinery::{
    BodyEdgeEnumerator, BodyId, ComponentTree, ExtrudeEngine, GeometryFrameProvider,
    InMemoryKernel, JointEngine, JointHandle, JointSpec, KernelError, KernelResult, OccurrenceId,
    PlanarProfile, SketchBuilder, SketchId,
};

/// Failure injected by [`FaultyKernel`].
#[derive(Debug, Clone)]
pub enum Fault {
    /// Every joint request is refused.
    RejectJoints,
    /// Edges of the named component are reported lifted off the sketch
    /// plane, so nothing else lines up with them.
    LiftEdgesOf(String),
    /// The first extrusion fails.
    FailExtrude,
}

/// An [`InMemoryKernel`] that misbehaves in one specific way.
pub struct FaultyKernel {
    pub inner: InMemoryKernel,
    fault: Fault,
}

impl FaultyKernel {
    pub fn new(fault: Fault) -> Self {
        Self {
            inner: InMemoryKernel::default(),
            fault,
        }
    }

    pub fn root(&self) -> OccurrenceId {
        self.inner.root()
    }
}

impl ComponentTree for FaultyKernel {
    fn add_component(&mut self, parent: OccurrenceId, name: &str) -> KernelResult<OccurrenceId> {
        self.inner.add_component(parent, name)
    }

    fn add_instance(
        &mut self,
        parent: OccurrenceId,
        source: OccurrenceId,
        transform: RigidTransform,
    ) -> KernelResult<OccurrenceId> {
        self.inner.add_instance(parent, source, transform)
    }

    fn component_name(&self, occurrence: OccurrenceId) -> KernelResult<String> {
        self.inner.component_name(occurrence)
    }
}

impl GeometryFrameProvider for FaultyKernel {
    fn construction_plane(
        &self,
        occurrence: OccurrenceId,
        name: PlaneName,
    ) -> KernelResult<ConstructionPlane> {
        self.inner.construction_plane(occurrence, name)
    }
}

impl SketchBuilder for FaultyKernel {
    fn create_sketch(
        &mut self,
        occurrence: OccurrenceId,
        plane: &ConstructionPlane,
    ) -> KernelResult<SketchId> {
        self.inner.create_sketch(occurrence, plane)
    }

    fn add_rectangle(
        &mut self,
        sketch: SketchId,
        origin: Point2,
        corner: Point2,
    ) -> KernelResult<PlanarProfile> {
        self.inner.add_rectangle(sketch, origin, corner)
    }

    fn profiles(&self, sketch: SketchId) -> KernelResult<Vec<PlanarProfile>> {
        self.inner.profiles(sketch)
    }
}

impl ExtrudeEngine for FaultyKernel {
    fn extrude(&mut self, profiles: &[PlanarProfile], depth: f64) -> KernelResult<BodyId> {
        if matches!(self.fault, Fault::FailExtrude) {
            return Err(KernelError::InvalidGeometry("no profiles".to_string()));
        }
        self.inner.extrude(profiles, depth)
    }
}

impl BodyEdgeEnumerator for FaultyKernel {
    fn edges(&self, occurrence: OccurrenceId) -> KernelResult<Vec<DirectedEdge>> {
        let edges = self.inner.edges(occurrence)?;
        if let Fault::LiftEdgesOf(name) = &self.fault {
            if *name == self.inner.component_name(occurrence)? {
                let lift = RigidTransform::translation(0.0, 0.0, 100.0);
                return Ok(edges.iter().map(|e| e.transformed(&lift)).collect());
            }
        }
        Ok(edges)
    }
}

impl JointEngine for FaultyKernel {
    fn create_rigid_joint(
        &mut self,
        first: OccurrenceId,
        second: OccurrenceId,
        spec: &JointSpec,
    ) -> KernelResult<JointHandle> {
        if matches!(self.fault, Fault::RejectJoints) {
            return Err(KernelError::JointRejected(
                "host refused the joint".to_string(),
            ));
        }
        self.inner.create_rigid_joint(first, second, spec)
    }
}
