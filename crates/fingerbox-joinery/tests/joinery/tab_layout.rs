use fingerbox_joinery::{compute_tab_layout, BoxError, TabLayout};
use fingerbox_core::Tolerance;
use proptest::prelude::*;

#[test]
fn test_worked_examples() {
    let layout = compute_tab_layout(30.0, 2.0).unwrap();
    assert_eq!((layout.tab_count(), layout.tab_size()), (15, 2.0));

    let layout = compute_tab_layout(10.0, 3.0).unwrap();
    assert_eq!((layout.tab_count(), layout.tab_size()), (5, 2.0));
}

#[test]
fn test_tolerance_decides_the_limit() {
    // 10 / 3 overshoots 3.3 by 0.033
    let loose = Tolerance::new(0.05, 0.0).unwrap();
    let layout = TabLayout::compute_with_tolerance(10.0, 3.3, &loose).unwrap();
    assert_eq!(layout.tab_count(), 3);

    let strict = Tolerance::new(0.0, 0.0).unwrap();
    let layout = TabLayout::compute_with_tolerance(10.0, 3.3, &strict).unwrap();
    assert_eq!(layout.tab_count(), 5);
}

#[test]
fn test_invalid_dimension_names_the_input() {
    let err = compute_tab_layout(-5.0, 2.0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid dimension 'span': -5 (must be finite and greater than zero)"
    );
    assert!(matches!(
        compute_tab_layout(5.0, 0.0),
        Err(BoxError::InvalidDimension { ref name, .. }) if name == "max_tab_size"
    ));
}

proptest! {
    #[test]
    fn layout_is_odd_and_within_limit(span in 0.01f64..1000.0, max in 0.01f64..100.0) {
        let layout = compute_tab_layout(span, max).unwrap();
        prop_assert_eq!(layout.tab_count() % 2, 1);
        prop_assert!(layout.tab_size() > 0.0);
        prop_assert!(Tolerance::default().at_most(layout.tab_size(), max));
        prop_assert!((layout.span() - span).abs() <= 1e-9 * span.max(1.0));
    }

    #[test]
    fn layout_uses_the_smallest_count(span in 0.01f64..1000.0, max in 0.01f64..100.0) {
        let layout = compute_tab_layout(span, max).unwrap();
        if layout.tab_count() > 1 {
            let fewer = span / (layout.tab_count() - 2) as f64;
            prop_assert!(fewer > max);
        }
    }

    #[test]
    fn non_positive_inputs_are_rejected(span in -100.0f64..=0.0, max in 0.01f64..10.0) {
        prop_assert!(compute_tab_layout(span, max).is_err());
        prop_assert!(compute_tab_layout(max, span).is_err());
    }
}
