//! Ground-plane behavior of the field engine: image symmetry over a
//! perfect conductor, reflection-coefficient limits and the
//! Sommerfeld/Norton correction paths.

use nec2_fields::{
    EngineOptions, FieldEngine, GroundModel, GroundPlane, Segment, SolvedCurrents,
    SommerfeldComponents, SommerfeldTable, Structure,
};
use num_complex::Complex64;

fn monopole_at(z: f64) -> Structure {
    Structure {
        segments: vec![Segment {
            midpoint: [0.0, 0.0, z],
            direction: [0.0, 0.0, 1.0],
            length: 0.1,
            radius: 1.0e-3,
            connection1: 0,
            connection2: 0,
        }],
        patches: Vec::new(),
        wavelength: 1.0,
    }
}

fn engine<'a>(
    structure: &'a Structure,
    currents: &'a SolvedCurrents,
    ground: GroundModel,
    table: Option<&'a dyn SommerfeldTable>,
) -> FieldEngine<'a> {
    FieldEngine::new(structure, currents, ground, table, EngineOptions::default()).unwrap()
}

#[test]
fn perfect_ground_doubles_the_vertical_field_at_the_surface() {
    let structure = monopole_at(0.5);
    let currents = SolvedCurrents::unit_constant(1);
    let free = engine(&structure, &currents, GroundModel::FreeSpace, None);
    let grounded = engine(
        &structure,
        &currents,
        GroundModel::Plane(GroundPlane::perfect()),
        None,
    );

    // at a point on the ground plane the image geometry is the mirror of
    // the direct ray, so the vertical fields add and the tangential
    // fields cancel
    let point = [5.0, 0.0, 0.0];
    let e_free = free.electric_field(point);
    let e_gnd = grounded.electric_field(point);

    let doubled = 2.0 * e_free[2];
    assert!(
        (e_gnd[2] - doubled).norm() <= 1.0e-12 * doubled.norm(),
        "Ez grounded {}, doubled free-space {}",
        e_gnd[2],
        doubled
    );
    assert!(
        e_gnd[0].norm() <= 1.0e-12 * e_gnd[2].norm(),
        "tangential Ex {}",
        e_gnd[0]
    );
    assert!(e_gnd[1].norm() <= 1.0e-12 * e_gnd[2].norm());
}

#[test]
fn zero_impedance_finite_ground_is_a_perfect_conductor() {
    let structure = monopole_at(0.5);
    let currents = SolvedCurrents::unit_constant(1);
    let perfect = engine(
        &structure,
        &currents,
        GroundModel::Plane(GroundPlane::perfect()),
        None,
    );
    let finite = engine(
        &structure,
        &currents,
        GroundModel::Plane(GroundPlane::finite(Complex64::new(0.0, 0.0), None)),
        None,
    );

    for point in [[5.0, 0.0, 0.0], [3.0, 2.0, 0.7], [0.4, -0.6, 0.2]] {
        let a = perfect.electric_field(point);
        let b = finite.electric_field(point);
        for axis in 0..3 {
            assert!(
                (a[axis] - b[axis]).norm() <= 1.0e-12 * a[axis].norm().max(1.0e-30),
                "point {point:?} axis {axis}: perfect {}, finite {}",
                a[axis],
                b[axis]
            );
        }
    }
}

#[test]
fn tangential_field_of_a_horizontal_wire_vanishes_on_a_perfect_ground() {
    let structure = Structure {
        segments: vec![Segment {
            midpoint: [0.0, 0.0, 0.25],
            direction: [1.0, 0.0, 0.0],
            length: 0.1,
            radius: 1.0e-3,
            connection1: 0,
            connection2: 0,
        }],
        patches: Vec::new(),
        wavelength: 1.0,
    };
    let currents = SolvedCurrents::unit_constant(1);
    let grounded = engine(
        &structure,
        &currents,
        GroundModel::Plane(GroundPlane::perfect()),
        None,
    );

    let e = grounded.electric_field([0.3, 0.2, 0.0]);
    let scale = e[2].norm();
    assert!(e[0].norm() <= 1.0e-12 * scale, "Ex {}", e[0]);
    assert!(e[1].norm() <= 1.0e-12 * scale, "Ey {}", e[1]);
    assert!(scale > 0.0);
}

struct ZeroTable;

impl SommerfeldTable for ZeroTable {
    fn fields(&self, _r: f64, _theta: f64) -> SommerfeldComponents {
        SommerfeldComponents::default()
    }
}

#[test]
fn sommerfeld_ground_with_a_null_table_reduces_to_the_scaled_image() {
    // with a unity image ratio and a table returning zero the
    // Sommerfeld path must reproduce the perfect-ground image term in
    // the near region where the table is integrated
    let structure = monopole_at(0.1);
    let currents = SolvedCurrents::unit_constant(1);
    let table = ZeroTable;
    let perfect = engine(
        &structure,
        &currents,
        GroundModel::Plane(GroundPlane::perfect()),
        None,
    );
    let sommerfeld = engine(
        &structure,
        &currents,
        GroundModel::Plane(GroundPlane::sommerfeld_norton(
            Complex64::new(0.3, -0.1),
            Complex64::new(1.0, 0.0),
        )),
        Some(&table),
    );

    let point = [0.2, 0.0, 0.05];
    let a = perfect.electric_field(point);
    let b = sommerfeld.electric_field(point);
    for axis in 0..3 {
        assert!(
            (a[axis] - b[axis]).norm() <= 1.0e-12 * a[axis].norm().max(1.0e-30),
            "axis {axis}: perfect {}, sommerfeld {}",
            a[axis],
            b[axis]
        );
    }
}

#[test]
fn norton_surface_wave_branch_stays_finite_at_range() {
    let structure = monopole_at(0.1);
    let currents = SolvedCurrents::unit_constant(1);
    let table = ZeroTable;
    let sommerfeld = engine(
        &structure,
        &currents,
        GroundModel::Plane(GroundPlane::sommerfeld_norton(
            Complex64::new(0.3, -0.1),
            Complex64::new(0.8, 0.05),
        )),
        Some(&table),
    );

    // beyond the interpolation region the asymptotic Norton field
    // equations take over
    let e = sommerfeld.electric_field([2.0, 0.0, 0.1]);
    for axis in 0..3 {
        assert!(
            e[axis].re.is_finite() && e[axis].im.is_finite(),
            "axis {axis}: {}",
            e[axis]
        );
    }
    assert!(e.iter().any(|c| c.norm() > 0.0));
}

#[test]
fn finite_ground_weakens_the_reflected_field() {
    let structure = monopole_at(0.5);
    let currents = SolvedCurrents::unit_constant(1);
    let perfect = engine(
        &structure,
        &currents,
        GroundModel::Plane(GroundPlane::perfect()),
        None,
    );
    // a strongly lossy ground, far from the zero-impedance limit
    let finite = engine(
        &structure,
        &currents,
        GroundModel::Plane(GroundPlane::finite(Complex64::new(0.5, -0.3), None)),
        None,
    );

    let point = [5.0, 0.0, 0.0];
    let ez_perfect = perfect.electric_field(point)[2].norm();
    let ez_finite = finite.electric_field(point)[2].norm();
    assert!(
        ez_finite < ez_perfect,
        "finite {ez_finite}, perfect {ez_perfect}"
    );
}
