//! Superposition of per-element fields at a point (legacy `nefld` and
//! `nhfld`).

use crate::common::constants::{
    ALIGNMENT_COSINE, CPLX_00, DEFAULT_LUMPED_THRESHOLD, PATCH_CONNECTION_SENTINEL,
    RADIUS_MATCH_TOLERANCE,
};
use crate::domain::context::{PatchSource, SourceContext};
use crate::domain::currents::SolvedCurrents;
use crate::domain::errors::FieldError;
use crate::domain::geometry::{Segment, SegmentEndKind, Structure};
use crate::domain::ground::{GroundKind, GroundModel, SommerfeldTable};
use crate::kernels::hfield::segment_h_field;
use crate::kernels::patch::{patch_h_field, patch_unit_e_field};
use crate::kernels::segment::segment_electric_field;
use num_complex::Complex64;

/// Evaluation options applied to every segment source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Use the extended thin-wire kernel (legacy `iexk`, the EK card).
    pub extended_thin_wire: bool,
    /// Separation in wavelengths beyond which sources are treated as
    /// lumped current elements (legacy `rkh`, the RKH card).
    pub lumped_threshold: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            extended_thin_wire: false,
            lumped_threshold: DEFAULT_LUMPED_THRESHOLD,
        }
    }
}

/// Near-field evaluator over a solved structure. Holds only shared
/// immutable state, so one engine can be sampled from several threads.
pub struct FieldEngine<'a> {
    structure: &'a Structure,
    currents: &'a SolvedCurrents,
    ground: GroundModel,
    table: Option<&'a dyn SommerfeldTable>,
    options: EngineOptions,
}

impl<'a> FieldEngine<'a> {
    pub fn new(
        structure: &'a Structure,
        currents: &'a SolvedCurrents,
        ground: GroundModel,
        table: Option<&'a dyn SommerfeldTable>,
        options: EngineOptions,
    ) -> Result<Self, FieldError> {
        if !(structure.wavelength.is_finite() && structure.wavelength > 0.0) {
            return Err(FieldError::InvalidWavelength {
                value: structure.wavelength,
            });
        }
        if currents.segment_count() != structure.segments.len() || !currents.is_consistent() {
            return Err(FieldError::SegmentCurrentMismatch {
                expected: structure.segments.len(),
                actual: currents.segment_count(),
            });
        }
        for (i, segment) in structure.segments.iter().enumerate() {
            for (end, code) in [(1u8, segment.connection1), (2u8, segment.connection2)] {
                // codes above the sentinel are patch attachments and
                // never index the segment table
                if code != 0
                    && code <= PATCH_CONNECTION_SENTINEL
                    && code.unsigned_abs() as usize > structure.segments.len()
                {
                    return Err(FieldError::InvalidConnection {
                        segment: i + 1,
                        end,
                        code,
                        count: structure.segments.len(),
                    });
                }
            }
        }
        if currents.patch.len() != structure.patches.len() {
            return Err(FieldError::PatchCurrentMismatch {
                expected: structure.patches.len(),
                actual: currents.patch.len(),
            });
        }
        if table.is_none()
            && matches!(
                ground.plane().map(|p| p.kind),
                Some(GroundKind::SommerfeldNorton)
            )
        {
            return Err(FieldError::MissingSommerfeldTable);
        }

        Ok(Self {
            structure,
            currents,
            ground,
            table,
            options,
        })
    }

    pub fn structure(&self) -> &Structure {
        self.structure
    }

    pub fn ground(&self) -> &GroundModel {
        &self.ground
    }

    /// E field at a point given in wavelengths (legacy `nefld`).
    pub fn electric_field(&self, point: [f64; 3]) -> [Complex64; 3] {
        let mut acc = [CPLX_00; 3];
        let ax = self.on_wire_radius(point);

        for (i, segment) in self.structure.segments.iter().enumerate() {
            let mut ctx = SourceContext::from_segment(segment);
            ctx.extended_thin_wire = self.options.extended_thin_wire;
            ctx.lumped_threshold = self.options.lumped_threshold;
            if ctx.extended_thin_wire {
                ctx.end1 = classify_end(&self.structure.segments, i, End::One);
                ctx.end2 = classify_end(&self.structure.segments, i, End::Two);
            }
            let triple =
                segment_electric_field(&ctx, &self.ground, self.table, point, ax, false);
            triple.accumulate_weighted(
                &mut acc,
                self.currents.constant[i],
                self.currents.sine[i],
                self.currents.cosine[i],
            );
        }

        for (i, patch) in self.structure.patches.iter().enumerate() {
            let source = PatchSource::from_patch(patch);
            let (acx, bcx) = project_patch_current(patch, &self.currents.patch[i]);
            for image in 0..self.ground.image_count() {
                let pair = patch_unit_e_field(&source, &self.ground, image == 1, point);
                for axis in 0..3 {
                    acc[axis] += acx * pair.t1[axis] + bcx * pair.t2[axis];
                }
            }
        }

        acc
    }

    /// H field at a point given in wavelengths (legacy `nhfld`).
    pub fn magnetic_field(&self, point: [f64; 3]) -> [Complex64; 3] {
        let mut acc = [CPLX_00; 3];
        let ax = self.on_wire_radius(point);

        for (i, segment) in self.structure.segments.iter().enumerate() {
            let ctx = SourceContext::from_segment(segment);
            let triple = segment_h_field(&ctx, &self.ground, point, ax);
            triple.accumulate_weighted(
                &mut acc,
                self.currents.constant[i],
                self.currents.sine[i],
                self.currents.cosine[i],
            );
        }

        for (i, patch) in self.structure.patches.iter().enumerate() {
            let source = PatchSource::from_patch(patch);
            let (acx, bcx) = project_patch_current(patch, &self.currents.patch[i]);
            let pair = patch_h_field(&source, &self.ground, point);
            for axis in 0..3 {
                acc[axis] += acx * pair.t1[axis] + bcx * pair.t2[axis];
            }
        }

        acc
    }

    /// Radius of the wire the observation point lies on, zero elsewhere.
    /// A point is on a wire when its axial projection falls within the
    /// segment and its radial offset is inside 0.9 of the radius squared.
    fn on_wire_radius(&self, point: [f64; 3]) -> f64 {
        for segment in &self.structure.segments {
            let dx = point[0] - segment.midpoint[0];
            let dy = point[1] - segment.midpoint[1];
            let dz = point[2] - segment.midpoint[2];
            let zp =
                segment.direction[0] * dx + segment.direction[1] * dy + segment.direction[2] * dz;
            if zp.abs() > 0.5001 * segment.length {
                continue;
            }
            let rho2 = dx * dx + dy * dy + dz * dz - zp * zp;
            if rho2 > 0.9 * segment.radius * segment.radius {
                continue;
            }
            return segment.radius;
        }
        0.0
    }
}

fn project_patch_current(
    patch: &crate::domain::geometry::Patch,
    current: &[Complex64; 3],
) -> (Complex64, Complex64) {
    let acx = patch.tangent1[0] * current[0]
        + patch.tangent1[1] * current[1]
        + patch.tangent1[2] * current[2];
    let bcx = patch.tangent2[0] * current[0]
        + patch.tangent2[1] * current[1]
        + patch.tangent2[2] * current[2];
    (acx, bcx)
}

enum End {
    One,
    Two,
}

/// Classify one end of a segment for the extended thin-wire kernel
/// (legacy `ind1`/`ind2` setup in `nefld`).
fn classify_end(segments: &[Segment], index: usize, which: End) -> SegmentEndKind {
    let segment = &segments[index];
    let ix = index as i32 + 1;
    let code = match which {
        End::One => segment.connection1,
        End::Two => segment.connection2,
    };

    if code > PATCH_CONNECTION_SENTINEL {
        return SegmentEndKind::Junction;
    }
    if code == 0 {
        return SegmentEndKind::Open;
    }

    if code < 0 {
        // joined to the same-numbered end of the neighbor
        let other = (-code - 1) as usize;
        let back = match which {
            End::One => segments[other].connection1,
            End::Two => segments[other].connection2,
        };
        if back != -ix {
            return SegmentEndKind::Junction;
        }
        return alignment(segment, &segments[other]);
    }

    if code == ix {
        // segment closes on itself; continuous only when vertical
        let horizontal =
            segment.direction[0] * segment.direction[0] + segment.direction[1] * segment.direction[1];
        return if horizontal > 1.0e-8 {
            SegmentEndKind::Junction
        } else {
            SegmentEndKind::Continuous
        };
    }

    let other = (code - 1) as usize;
    let back = match which {
        End::One => segments[other].connection2,
        End::Two => segments[other].connection1,
    };
    if back != ix {
        return SegmentEndKind::Junction;
    }
    alignment(segment, &segments[other])
}

fn alignment(segment: &Segment, other: &Segment) -> SegmentEndKind {
    let cosine = (segment.direction[0] * other.direction[0]
        + segment.direction[1] * other.direction[1]
        + segment.direction[2] * other.direction[2])
        .abs();
    if cosine < ALIGNMENT_COSINE
        || (other.radius / segment.radius - 1.0).abs() > RADIUS_MATCH_TOLERANCE
    {
        SegmentEndKind::Junction
    } else {
        SegmentEndKind::Continuous
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_end, End, EngineOptions, FieldEngine};
    use crate::domain::currents::SolvedCurrents;
    use crate::domain::errors::FieldError;
    use crate::domain::geometry::{Segment, SegmentEndKind, Structure};
    use crate::domain::ground::{GroundModel, GroundPlane};
    use num_complex::Complex64;

    fn vertical_segment(z: f64, icon1: i32, icon2: i32) -> Segment {
        Segment {
            midpoint: [0.0, 0.0, z],
            direction: [0.0, 0.0, 1.0],
            length: 0.1,
            radius: 1.0e-3,
            connection1: icon1,
            connection2: icon2,
        }
    }

    fn two_segment_column() -> Vec<Segment> {
        // segment 1 below segment 2, joined end-two to end-one
        vec![vertical_segment(0.05, 0, 2), vertical_segment(0.15, 1, 0)]
    }

    #[test]
    fn open_and_continuous_ends_are_classified() {
        let segments = two_segment_column();
        assert_eq!(classify_end(&segments, 0, End::One), SegmentEndKind::Open);
        assert_eq!(
            classify_end(&segments, 0, End::Two),
            SegmentEndKind::Continuous
        );
        assert_eq!(
            classify_end(&segments, 1, End::One),
            SegmentEndKind::Continuous
        );
        assert_eq!(classify_end(&segments, 1, End::Two), SegmentEndKind::Open);
    }

    #[test]
    fn bent_junction_is_not_continuous() {
        let mut segments = two_segment_column();
        segments[1].direction = [1.0, 0.0, 0.0];
        segments[1].midpoint = [0.05, 0.0, 0.1];
        assert_eq!(
            classify_end(&segments, 0, End::Two),
            SegmentEndKind::Junction
        );
    }

    #[test]
    fn radius_step_is_a_junction() {
        let mut segments = two_segment_column();
        segments[1].radius *= 1.5;
        assert_eq!(
            classify_end(&segments, 0, End::Two),
            SegmentEndKind::Junction
        );
    }

    #[test]
    fn patch_attachment_code_is_a_junction() {
        let mut segments = two_segment_column();
        segments[0].connection2 = 10001;
        assert_eq!(
            classify_end(&segments, 0, End::Two),
            SegmentEndKind::Junction
        );
    }

    #[test]
    fn engine_rejects_mismatched_currents() {
        let structure = Structure {
            segments: two_segment_column(),
            patches: Vec::new(),
            wavelength: 1.0,
        };
        let currents = SolvedCurrents::unit_constant(1);
        let err = FieldEngine::new(
            &structure,
            &currents,
            GroundModel::FreeSpace,
            None,
            EngineOptions::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, FieldError::SegmentCurrentMismatch { .. }));
    }

    #[test]
    fn dangling_connection_code_is_rejected() {
        let structure = Structure {
            segments: vec![vertical_segment(0.05, 0, 7)],
            patches: Vec::new(),
            wavelength: 1.0,
        };
        let currents = SolvedCurrents::unit_constant(1);
        let err = FieldEngine::new(
            &structure,
            &currents,
            GroundModel::FreeSpace,
            None,
            EngineOptions {
                extended_thin_wire: true,
                ..EngineOptions::default()
            },
        )
        .err()
        .unwrap();
        assert_eq!(
            err,
            FieldError::InvalidConnection {
                segment: 1,
                end: 2,
                code: 7,
                count: 1,
            }
        );
    }

    #[test]
    fn sommerfeld_ground_without_table_is_rejected() {
        let structure = Structure {
            segments: two_segment_column(),
            patches: Vec::new(),
            wavelength: 1.0,
        };
        let currents = SolvedCurrents::unit_constant(2);
        let plane = GroundPlane::sommerfeld_norton(
            Complex64::new(0.2, -0.1),
            Complex64::new(0.8, 0.05),
        );
        let err = FieldEngine::new(
            &structure,
            &currents,
            GroundModel::Plane(plane),
            None,
            EngineOptions::default(),
        )
        .err()
        .unwrap();
        assert_eq!(err, FieldError::MissingSommerfeldTable);
    }

    #[test]
    fn on_wire_point_picks_up_the_wire_radius() {
        let structure = Structure {
            segments: two_segment_column(),
            patches: Vec::new(),
            wavelength: 1.0,
        };
        let currents = SolvedCurrents::unit_constant(2);
        let engine = FieldEngine::new(
            &structure,
            &currents,
            GroundModel::FreeSpace,
            None,
            EngineOptions::default(),
        )
        .unwrap();
        assert_eq!(engine.on_wire_radius([0.0, 0.0, 0.05]), 1.0e-3);
        assert_eq!(engine.on_wire_radius([0.3, 0.0, 0.05]), 0.0);
    }
}
