use fingerbox_core::{Axis, Point3, Tolerance};
use fingerbox_joinery::{
    BoxAssembler, BoxDimensions, BoxError, ComponentTree, InMemoryKernel, KernelError,
    OccurrenceId, TabSizing,
};
use std::error::Error;

use crate::support::{Fault, FaultyKernel};

fn assembler(thickness: f64) -> BoxAssembler {
    BoxAssembler::new("Box", BoxDimensions::new(20.0, 30.0, 10.0, thickness))
}

#[test]
fn test_reference_box() {
    let mut kernel = InMemoryKernel::default();
    let root = kernel.root();
    let assembled = assembler(0.3).assemble(&mut kernel, root).unwrap();

    assert_eq!(kernel.children(root), vec![assembled.container]);
    assert_eq!(kernel.children(assembled.container).len(), 3);
    for panel in assembled.panels() {
        assert_eq!(kernel.body_count(panel).unwrap(), 1);
    }
    assert_eq!(
        kernel.component_of(assembled.side).unwrap(),
        kernel.component_of(assembled.opposite_side).unwrap()
    );

    assert_eq!(assembled.joints.len(), 2);
    assert!(assembled.skipped_joints.is_empty());
    assert_eq!(kernel.joints().len(), 2);

    // 2 x thickness maximum: 30 / 51 is the first odd split under 0.6
    assert_eq!(assembled.layout.tab_count(), 51);
    assert!(assembled.layout.tab_size() <= 0.6);
}

#[test]
fn test_opposite_side_is_placed_across_the_width() {
    let mut kernel = InMemoryKernel::default();
    let root = kernel.root();
    let assembled = assembler(0.3).assemble(&mut kernel, root).unwrap();

    let world = kernel.world_transform(assembled.opposite_side).unwrap();
    let origin = world.transform_point(&Point3::origin());
    assert!(Tolerance::default().approx_eq_point3(&origin, &Point3::new(19.7, 0.0, 0.0)));
}

#[test]
fn test_joints_are_consistent_in_the_world_frame() {
    let mut kernel = InMemoryKernel::default();
    let root = kernel.root();
    let assembled = assembler(0.3).assemble(&mut kernel, root).unwrap();
    let tol = Tolerance::default();

    for joint in &assembled.joints {
        let first = kernel.world_transform(joint.first).unwrap();
        let second = kernel.world_transform(joint.second).unwrap();
        let a = first.transform_point(&joint.spec.anchor_a);
        let b = second.transform_point(&joint.spec.anchor_b);
        let direction = first.transform_vector(&joint.spec.direction);
        assert!(tol.approx_eq_point3(&a, &(b + direction * joint.spec.offset)));
    }

    let axes: Vec<Axis> = assembled.joints.iter().map(|j| j.axis).collect();
    assert_eq!(axes, vec![Axis::Z, Axis::X]);
    assert_eq!(assembled.joints[0].spec.offset, 0.0);
    assert!((assembled.joints[1].spec.offset + 19.7).abs() < 1e-12);
}

#[test]
fn test_thickness_changes_tabs_and_offsets() {
    let mut kernel = InMemoryKernel::default();
    let root = kernel.root();
    let thin = assembler(0.3).assemble(&mut kernel, root).unwrap();
    let thick = assembler(0.5).assemble(&mut kernel, root).unwrap();

    assert_ne!(thin.layout.tab_size(), thick.layout.tab_size());
    assert_eq!(thin.layout.tab_count() % 2, 1);
    assert_eq!(thick.layout.tab_count() % 2, 1);

    assert_ne!(thin.joints[0].spec.anchor_a, thick.joints[0].spec.anchor_a);
    assert!((thin.joints[1].spec.offset + 19.7).abs() < 1e-12);
    assert!((thick.joints[1].spec.offset + 19.5).abs() < 1e-12);
    assert_eq!(kernel.joints().len(), 4);
}

#[test]
fn test_absolute_tab_size_ignores_thickness() {
    let mut kernel = InMemoryKernel::default();
    let root = kernel.root();
    let a = assembler(0.3)
        .with_tab_sizing(TabSizing::absolute(2.0))
        .assemble(&mut kernel, root)
        .unwrap();
    let b = assembler(0.5)
        .with_tab_sizing(TabSizing::absolute(2.0))
        .assemble(&mut kernel, root)
        .unwrap();

    assert_eq!(a.layout, b.layout);
    assert_eq!(a.layout.tab_count(), 15);
    assert_eq!(a.joints.len(), 2);
    assert_eq!(b.joints.len(), 2);
}

#[test]
fn test_assembles_thousands_of_tabs() {
    let mut kernel = InMemoryKernel::default();
    let root = kernel.root();
    let assembled = assembler(0.3)
        .with_tab_sizing(TabSizing::absolute(0.01))
        .assemble(&mut kernel, root)
        .unwrap();

    assert_eq!(assembled.layout.tab_count(), 3001);
    assert!(assembled.is_complete());
    assert_eq!(assembled.joints.len(), 2);
    for panel in assembled.panels() {
        assert_eq!(kernel.body_count(panel).unwrap(), 1);
    }
}

#[test]
fn test_missing_joint_is_skipped_with_context() {
    let mut kernel = FaultyKernel::new(Fault::LiftEdgesOf("Side".to_string()));
    let root = kernel.root();
    let assembled = assembler(0.3).assemble(&mut kernel, root).unwrap();

    assert!(!assembled.is_complete());
    assert_eq!(assembled.joints.len(), 1);
    assert_eq!(assembled.joints[0].axis, Axis::X);

    assert_eq!(assembled.skipped_joints.len(), 1);
    let skipped = &assembled.skipped_joints[0];
    assert!(skipped.is_recoverable());
    assert_eq!(
        skipped.to_string(),
        "No coincident Z edges between 'Base' and 'Side' (offset 0)"
    );
}

#[test]
fn test_rejected_joint_is_fatal() {
    let mut kernel = FaultyKernel::new(Fault::RejectJoints);
    let root = kernel.root();
    let err = assembler(0.3).assemble(&mut kernel, root).unwrap_err();

    match &err {
        BoxError::JointCreation {
            first,
            second,
            axis,
            offset,
            source,
        } => {
            assert_eq!(first, "Base");
            assert_eq!(second, "Side");
            assert_eq!(*axis, Axis::Z);
            assert_eq!(*offset, 0.0);
            assert!(matches!(source, KernelError::JointRejected(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.source().is_some());
    assert!(kernel.inner.joints().is_empty());
}

#[test]
fn test_kernel_failure_names_the_step() {
    let mut kernel = FaultyKernel::new(Fault::FailExtrude);
    let root = kernel.root();
    let err = assembler(0.3).assemble(&mut kernel, root).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Geometry kernel failed while extruding panel 'Base': Invalid geometry: no profiles"
    );
    assert!(!err.is_recoverable());
}

#[test]
fn test_unknown_parent_is_fatal() {
    let mut kernel = InMemoryKernel::default();
    let parent = OccurrenceId::new();
    let err = assembler(0.3).assemble(&mut kernel, parent).unwrap_err();

    assert!(matches!(
        err,
        BoxError::Kernel {
            source: KernelError::UnknownOccurrence(id),
            ..
        } if id == parent
    ));
    assert!(kernel.children(kernel.root()).is_empty());
}

#[test]
fn test_container_takes_the_box_name() {
    let mut kernel = InMemoryKernel::default();
    let root = kernel.root();
    let assembled = BoxAssembler::new("Drawer", BoxDimensions::default())
        .assemble(&mut kernel, root)
        .unwrap();

    assert_eq!(kernel.component_name(assembled.container).unwrap(), "Drawer");
    assert_eq!(kernel.component_name(assembled.base).unwrap(), "Base");
}

#[test]
fn test_invalid_tolerance_is_rejected() {
    let mut kernel = InMemoryKernel::default();
    let root = kernel.root();
    let tolerance = Tolerance {
        absolute: -1.0,
        relative: 0.0,
    };
    let err = assembler(0.3)
        .with_tolerance(tolerance)
        .assemble(&mut kernel, root)
        .unwrap_err();
    assert!(matches!(err, BoxError::Geometry(_)));
}
