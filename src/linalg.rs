//! Small dense solves for the nodal velocity systems.

use glam::{DMat3, DVec3};
use nalgebra::{DMatrix, DVector};

use crate::Dimensionality;

const RELATIVE_TOLERANCE: f64 = 1e-12;

/// Solve `matrix * u = rhs` in the leading `dimensionality x dimensionality` block.
///
/// Returns `None` if the system is (numerically) singular.
pub fn solve(matrix: DMat3, rhs: DVec3, dimensionality: Dimensionality) -> Option<DVec3> {
    let scale = frobenius_norm(matrix).powi(dimensionality.count() as i32);
    let matrix = dimensionality.pad(matrix);
    let determinant = matrix.determinant();
    if !(determinant.abs() > RELATIVE_TOLERANCE * scale) {
        return None;
    }
    let mut u = matrix.inverse() * rhs;
    if dimensionality == Dimensionality::TwoD {
        u.z = 0.;
    }
    Some(u)
}

/// Solve `matrix * u = rhs` subject to `n . u = 0` for every `n` in `constraints`.
///
/// The constraints are enforced with Lagrange multipliers, i.e. the square system
/// `[[M, S], [S^T, 0]] [u; lambda] = [rhs; 0]` is solved, with `S` the matrix whose
/// columns are the constraint normals. A column pivoted QR decomposition is used;
/// if it reveals a rank deficient system (e.g. parallel constraints), the minimum
/// norm least squares solution is computed from an SVD instead.
pub fn solve_constrained(
    matrix: DMat3,
    rhs: DVec3,
    constraints: &[DVec3],
    dimensionality: Dimensionality,
) -> Option<DVec3> {
    let n = dimensionality.count();
    let size = n + constraints.len();

    let mut a = DMatrix::<f64>::zeros(size, size);
    let mut b = DVector::<f64>::zeros(size);
    for i in 0..n {
        for j in 0..n {
            a[(i, j)] = matrix.col(j)[i];
        }
        for (k, normal) in constraints.iter().enumerate() {
            a[(i, n + k)] = normal[i];
            a[(n + k, i)] = normal[i];
        }
        b[i] = rhs[i];
    }

    let solution = match solve_qr(a.clone(), &b) {
        Some(solution) => solution,
        None => solve_svd(a, &b)?,
    };

    let mut u = DVec3::ZERO;
    for i in 0..n {
        u[i] = solution[i];
    }
    u.is_finite().then_some(u)
}

fn solve_qr(a: DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    let qr = a.col_piv_qr();
    let diagonal = qr.r().diagonal().abs();
    let max = diagonal.max();
    if !(diagonal.min() > RELATIVE_TOLERANCE * max) {
        return None;
    }
    qr.solve(b)
}

fn solve_svd(a: DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = a.svd(true, true);
    let eps = RELATIVE_TOLERANCE * svd.singular_values.max();
    if !(eps > 0.) {
        return None;
    }
    svd.solve(b, eps).ok()
}

fn frobenius_norm(matrix: DMat3) -> f64 {
    (matrix.x_axis.length_squared() + matrix.y_axis.length_squared() + matrix.z_axis.length_squared())
        .sqrt()
}
