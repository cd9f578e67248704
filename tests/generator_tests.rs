mod support;

use gridbin::{
    Axis, BinSpec, Feature, GridProfile, RowDivision, SpecError, float_types::Real, generate,
    generate_with_profile,
};

use crate::support::{approx_eq, assert_exact_bounds, assert_solid, bounds, spec};

#[test]
fn two_by_three_with_one_divider() {
    let spec = spec(2, 3, 1, 1.0, 1, 0);
    let model = generate(&spec).expect("valid spec generates");

    assert_exact_bounds(&model, 84.0, 126.0, 7.0);
    assert_solid(model.mesh());

    let layout = model.layout();
    assert_eq!(layout.cells.len(), 2);
    assert_eq!(layout.cells[0].width(), layout.cells[1].width());

    // cell centres are open, the divider between them is solid
    let z = 0.5 * (layout.cavity_floor + 7.0);
    for cell in &layout.cells {
        let [x, y] = cell.center();
        assert!(!model.contains_point([x, y, z]), "cell at {x},{y} is filled");
    }
    let divider_x = layout.divider_centres_x(0)[0];
    assert!(model.contains_point([divider_x, 63.1, z]));
    // the floor below a cell is solid
    assert!(model.contains_point([20.3, 30.7, layout.floor_z + 0.4]));
}

#[test]
fn one_unit_with_a_divider_is_rejected() {
    let err = BinSpec::new(1, 1, 1, 1.0, 1, 0).unwrap_err();
    assert!(err.is_invalid_spec());
    assert!(matches!(
        err.spec_error(),
        Some(SpecError::TooManyDividers { count: 1, max: 0, .. })
    ));
}

#[test]
fn ratios_move_the_dividers() {
    let spec = BinSpec::builder(3, 1, 2)
        .dividers(2, 0)
        .x_ratios([1.0, 2.0, 1.0])
        .build()
        .expect("valid");
    let model = generate(&spec).expect("generates");
    assert_solid(model.mesh());
    let layout = model.layout();
    let z = 0.5 * (layout.cavity_floor + 14.0);

    // 122 mm free: 30.5, 61, 30.5
    let dividers = layout.divider_centres_x(0);
    assert_eq!(dividers.len(), 2);
    assert!(approx_eq(dividers[0], 32.0, 1e-9));
    assert!(approx_eq(dividers[1], 94.0, 1e-9));
    for x in dividers {
        assert!(model.contains_point([x, 21.3, z]), "no divider at x = {x}");
    }
    // where equal thirds would put a divider, the wide middle cell is open
    assert!(!model.contains_point([42.2, 21.3, z]));
    for cell in &layout.cells {
        let [x, y] = cell.center();
        assert!(!model.contains_point([x, y, z]));
    }
}

#[test]
fn rows_are_carved_along_y() {
    let spec = spec(1, 2, 2, 1.0, 0, 1);
    let model = generate(&spec).expect("generates");
    assert_solid(model.mesh());
    let layout = model.layout();
    let z = 0.5 * (layout.cavity_floor + 14.0);

    assert_eq!(layout.divider_centres_y(), vec![42.0]);
    assert!(model.contains_point([21.3, 42.0, z]));
    assert!(!model.contains_point([21.3, 21.0, z]));
    assert!(!model.contains_point([21.3, 63.0, z]));
}

#[test]
fn each_row_keeps_its_own_split() {
    let spec = BinSpec::builder(2, 2, 2)
        .dividers(0, 1)
        .row_divisions([RowDivision::Equal(2), RowDivision::Ratios(vec![1.0, 3.0])])
        .build()
        .expect("valid");
    let model = generate(&spec).expect("generates");
    assert_solid(model.mesh());
    let layout = model.layout();
    let z = 0.5 * (layout.cavity_floor + 14.0);
    let spans = layout.row_spans();
    let [(front_y0, front_y1), (back_y0, back_y1)] = spans[..] else {
        panic!("expected two rows");
    };
    let front = 0.5 * (front_y0 + front_y1);
    let back = 0.5 * (back_y0 + back_y1);

    // front row: 40.5 + 40.5, back row: 20.25 + 60.75
    assert!(model.contains_point([42.0, front, z]));
    assert!(!model.contains_point([21.75, front, z]));
    assert!(model.contains_point([21.75, back, z]));
    assert!(!model.contains_point([42.0, back, z]));
    assert_eq!(layout.divider_centres_x(1), vec![21.75]);
}

#[test]
fn sliver_cells_are_rejected_before_geometry() {
    let err = BinSpec::builder(2, 2, 3)
        .dividers(1, 1)
        .x_ratios([1e-9, 1.0])
        .build()
        .unwrap_err();
    assert!(matches!(
        err.spec_error(),
        Some(SpecError::NoCavity { axis: Axis::X, .. })
    ));
}

#[test]
fn thick_walls_are_rejected() {
    for wall in [21.0, 25.0] {
        let err = BinSpec::new(2, 2, 3, wall, 0, 0).unwrap_err();
        assert!(err.is_invalid_spec(), "wall {wall} accepted");
    }
}

#[test]
fn bounds_are_exact_for_assorted_specs() {
    let cases: [(BinSpec, [Real; 3]); 3] = [
        (spec(1, 1, 1, 1.0, 0, 0), [42.0, 42.0, 7.0]),
        (spec(3, 1, 2, 1.6, 2, 0), [126.0, 42.0, 14.0]),
        (spec(1, 2, 3, 0.8, 0, 1), [42.0, 84.0, 21.0]),
    ];
    for (spec, [w, d, h]) in cases {
        let model = generate(&spec).expect("generates");
        assert_exact_bounds(&model, w, d, h);
    }
}

#[test]
fn bounds_stay_exact_with_every_feature() {
    let spec = BinSpec::builder(2, 1, 6)
        .wall_thickness(1.2)
        .dividers(1, 0)
        .finger_scoop(true)
        .label_ledge(true)
        .stacking_lip(true)
        .magnet_holes(true)
        .build()
        .expect("valid");
    let model = generate(&spec).expect("generates");
    assert_exact_bounds(&model, 84.0, 42.0, 42.0);
    assert_solid(model.mesh());

    for feature in [
        Feature::Shell,
        Feature::Base,
        Feature::Cavity,
        Feature::Lip,
        Feature::FingerScoop,
        Feature::LabelLedge,
        Feature::MagnetHole,
    ] {
        assert!(
            model.polygons_with(feature).next().is_some(),
            "no {feature:?} faces"
        );
    }
    assert!(model.polygons_with(Feature::ScrewHole).next().is_none());
}

#[test]
fn generation_is_deterministic() {
    let spec = BinSpec::builder(2, 1, 3)
        .dividers(1, 0)
        .label_ledge(true)
        .screw_holes(true)
        .build()
        .expect("valid");
    let a = generate(&spec).expect("generates");
    let b = generate(&spec).expect("generates");
    assert_eq!(a.mesh().polygons, b.mesh().polygons);
    assert_eq!(a.layout(), b.layout());
}

#[test]
fn holes_open_the_underside() {
    let plain = generate(&spec(1, 1, 2, 1.0, 0, 0)).expect("generates");
    let drilled = generate(
        &BinSpec::builder(1, 1, 2)
            .magnet_holes(true)
            .build()
            .expect("valid"),
    )
    .expect("generates");

    let hole = drilled.layout().holes[0];
    let probe = [hole[0] + 0.3, hole[1] - 0.2, 1.0];
    assert!(plain.contains_point(probe));
    assert!(!drilled.contains_point(probe));
    assert!(drilled.volume() < plain.volume());
    // pockets are blind
    assert!(drilled.contains_point([hole[0] + 0.3, hole[1] - 0.2, 3.5]));
}

#[test]
fn screw_holes_go_deeper_than_magnets() {
    let screwed = generate(
        &BinSpec::builder(1, 1, 2)
            .screw_holes(true)
            .magnet_holes(true)
            .build()
            .expect("valid"),
    )
    .expect("generates");
    let [x, y] = screwed.layout().holes[0];
    assert!(!screwed.contains_point([x + 0.1, y + 0.2, 4.0]));
    assert!(screwed.polygons_with(Feature::ScrewHole).next().is_some());
    assert!(screwed.polygons_with(Feature::MagnetHole).next().is_none());
}

#[test]
fn stacking_lip_lowers_dividers() {
    let spec = BinSpec::builder(2, 1, 5)
        .dividers(1, 0)
        .stacking_lip(true)
        .build()
        .expect("valid");
    let model = generate(&spec).expect("generates");
    let layout = model.layout();
    let lip = layout.lip.expect("lip fits");
    let x = layout.divider_centres_x(0)[0];

    assert!(model.contains_point([x, 21.3, lip.floor - 0.5]));
    assert!(!model.contains_point([x, 21.3, lip.floor + 0.5]));
    // the outer rim still reaches the top
    assert!(model.contains_point([0.1, 21.3, lip.top - 0.05]));
    assert_eq!(bounds(&model)[5], 35.0);
}

#[test]
fn short_bins_skip_features_that_do_not_fit() {
    let spec = BinSpec::builder(1, 1, 1)
        .label_ledge(true)
        .stacking_lip(true)
        .build()
        .expect("valid");
    let model = generate(&spec).expect("generates");
    assert!(model.layout().lip.is_none());
    assert!(model.layout().ledge.is_none());
    assert!(model.polygons_with(Feature::Lip).next().is_none());
    assert!(model.polygons_with(Feature::LabelLedge).next().is_none());
    assert_exact_bounds(&model, 42.0, 42.0, 7.0);
}

#[test]
fn custom_profile_changes_the_grid() {
    let profile = GridProfile {
        pitch: 50.0,
        height_unit: 10.0,
        ..GridProfile::default()
    };
    let spec = BinSpec::builder(2, 1, 2)
        .build_for(&profile)
        .expect("valid for this profile");
    let model = generate_with_profile(&spec, &profile).expect("generates");
    assert_exact_bounds(&model, 100.0, 50.0, 20.0);
}

#[test]
fn profile_is_validated_before_geometry() {
    let spec = spec(1, 1, 2, 1.0, 0, 0);
    let profile = GridProfile {
        circle_segments: 2,
        ..GridProfile::default()
    };
    let err = generate_with_profile(&spec, &profile).unwrap_err();
    assert!(matches!(
        err.spec_error(),
        Some(SpecError::InvalidProfile(_))
    ));
}
