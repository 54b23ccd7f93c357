//! Algebraic separation test for ellipsoid pairs.
//!
//! Two ellipsoids are compared through the characteristic polynomial of
//! their quadric pencil `det(lambda A + B) = 0`, a quartic in `lambda`:
//! - two distinct negative real roots means the ellipsoids are separated,
//! - a repeated negative real root means they touch externally,
//! - anything else means their interiors overlap.
//!
//! Each ellipsoid is a canonical quadric `diag(1/a^2, 1/b^2, 1/c^2, -1)`
//! pushed through its affine embedding. The quartic coefficients come out
//! in closed form; roots are eigenvalues of the companion matrix.

use nalgebra::{Complex, Matrix4, Vector4};

use crate::error::{PackError, PackResult};
use crate::simulation::states::Ellipsoid;

/// Contact state of an ellipsoid pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separation {
    Separated,
    Touching,
    Overlapping,
}

impl Separation {
    /// True for every state the resolver has to act on.
    pub fn needs_resolution(&self) -> bool {
        !matches!(self, Separation::Separated)
    }
}

/// Classifies the contact state of a pair.
///
/// Roots with imaginary part within `tolerance` count as real; two negative
/// real roots closer than `tolerance` count as repeated. Fails if the
/// embedding is singular or the coefficients come out non-finite.
pub fn separation_state(
    first: &Ellipsoid,
    second: &Ellipsoid,
    tolerance: f64,
) -> PackResult<Separation> {
    let coeffs = pencil_coefficients(first, second)?;
    let roots = quartic_roots(&coeffs);

    // the pencil of two ellipsoids always carries two positive roots;
    // contact is read off the remaining pair
    let mut negative: Vec<f64> = roots
        .iter()
        .filter(|r| r.im.abs() <= tolerance && r.re < 0.0)
        .map(|r| r.re)
        .collect();

    if negative.len() == 2 {
        negative.sort_by(f64::total_cmp);
        if negative[1] - negative[0] > tolerance {
            Ok(Separation::Separated)
        } else {
            Ok(Separation::Touching)
        }
    } else {
        Ok(Separation::Overlapping)
    }
}

/// Coefficients `[t4, t3, t2, t1, t0]` of the pencil quartic.
pub fn pencil_coefficients(first: &Ellipsoid, second: &Ellipsoid) -> PackResult<[f64; 5]> {
    let a_quadric = canonical_quadric(first);
    let b_quadric = canonical_quadric(second);
    let a_embed = world_embedding(first);
    let b_embed = world_embedding(second);

    // embedding of `first` seen from the canonical frame of `second`
    let aux = b_embed
        .lu()
        .solve(&a_embed)
        .ok_or_else(|| PackError::Numerical("singular embedding matrix".into()))?;
    let b = aux.transpose() * b_quadric * aux;

    let (a00, a11, a22) = (a_quadric[(0, 0)], a_quadric[(1, 1)], a_quadric[(2, 2)]);
    let (b00, b01, b02, b03) = (b[(0, 0)], b[(0, 1)], b[(0, 2)], b[(0, 3)]);
    let (b10, b11, b12, b13) = (b[(1, 0)], b[(1, 1)], b[(1, 2)], b[(1, 3)]);
    let (b20, b21, b22, b23) = (b[(2, 0)], b[(2, 1)], b[(2, 2)], b[(2, 3)]);
    let (b30, b31, b32, b33) = (b[(3, 0)], b[(3, 1)], b[(3, 2)], b[(3, 3)]);

    let t4 = -a00 * a11 * a22;
    let t3 = a00 * a11 * b22 + a00 * a22 * b11 + a11 * a22 * b00 - a00 * a11 * a22 * b33;
    let t2 = a00 * b12 * b21 - a00 * b11 * b22 - a11 * b00 * b22 + a11 * b02 * b20
        - a22 * b00 * b11
        + a22 * b01 * b10
        + a00 * a11 * b22 * b33
        - a00 * a11 * b23 * b32
        + a00 * a22 * b11 * b33
        - a00 * a22 * b13 * b31
        + a11 * a22 * b00 * b33
        - a11 * a22 * b03 * b30;
    let t1 = b00 * b11 * b22 - b00 * b12 * b21 - b01 * b10 * b22 + b01 * b12 * b20
        + b02 * b10 * b21
        - b02 * b11 * b20
        - a00 * b11 * b22 * b33
        + a00 * b11 * b23 * b32
        + a00 * b12 * b21 * b33
        - a00 * b12 * b23 * b31
        - a00 * b13 * b21 * b32
        + a00 * b13 * b22 * b31
        - a11 * b00 * b22 * b33
        + a11 * b00 * b23 * b32
        + a11 * b02 * b20 * b33
        - a11 * b02 * b23 * b30
        - a11 * b03 * b20 * b32
        + a11 * b03 * b22 * b30
        - a22 * b00 * b11 * b33
        + a22 * b00 * b13 * b31
        + a22 * b01 * b10 * b33
        - a22 * b01 * b13 * b30
        - a22 * b03 * b10 * b31
        + a22 * b03 * b11 * b30;
    let t0 = b00 * b11 * b22 * b33 - b00 * b11 * b23 * b32 - b00 * b12 * b21 * b33
        + b00 * b12 * b23 * b31
        + b00 * b13 * b21 * b32
        - b00 * b13 * b22 * b31
        - b01 * b10 * b22 * b33
        + b01 * b10 * b23 * b32
        + b01 * b12 * b20 * b33
        - b01 * b12 * b23 * b30
        - b01 * b13 * b20 * b32
        + b01 * b13 * b22 * b30
        + b02 * b10 * b21 * b33
        - b02 * b10 * b23 * b31
        - b02 * b11 * b20 * b33
        + b02 * b11 * b23 * b30
        + b02 * b13 * b20 * b31
        - b02 * b13 * b21 * b30
        - b03 * b10 * b21 * b32
        + b03 * b10 * b22 * b31
        + b03 * b11 * b20 * b32
        - b03 * b11 * b22 * b30
        - b03 * b12 * b20 * b31
        + b03 * b12 * b21 * b30;

    let coeffs = [t4, t3, t2, t1, t0];
    if coeffs.iter().any(|c| !c.is_finite()) {
        return Err(PackError::Numerical(
            "non-finite characteristic coefficients".into(),
        ));
    }
    Ok(coeffs)
}

/// All four roots of the quartic via its companion matrix.
///
/// `t4` is nonzero for any pair of proper ellipsoids, so the monic
/// normalization is safe.
pub fn quartic_roots(coeffs: &[f64; 5]) -> [Complex<f64>; 4] {
    let [t4, t3, t2, t1, t0] = *coeffs;
    let (c3, c2, c1, c0) = (t3 / t4, t2 / t4, t1 / t4, t0 / t4);
    #[rustfmt::skip]
    let companion = Matrix4::new(
        -c3, -c2, -c1, -c0,
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
    );
    let eigen = companion.complex_eigenvalues();
    [eigen[0], eigen[1], eigen[2], eigen[3]]
}

/// Canonical quadric `diag(1/a^2, 1/b^2, 1/c^2, -1)`.
fn canonical_quadric(e: &Ellipsoid) -> Matrix4<f64> {
    Matrix4::from_diagonal(&Vector4::new(
        1.0 / (e.semi_axes.x * e.semi_axes.x),
        1.0 / (e.semi_axes.y * e.semi_axes.y),
        1.0 / (e.semi_axes.z * e.semi_axes.z),
        -1.0,
    ))
}

/// Affine embedding `[R | c; 0 | 1]` of an ellipsoid frame.
fn world_embedding(e: &Ellipsoid) -> Matrix4<f64> {
    let mut m = Matrix4::identity();
    m.fixed_view_mut::<3, 3>(0, 0).copy_from(&e.orientation);
    m.fixed_view_mut::<3, 1>(0, 3).copy_from(&e.center);
    m
}
