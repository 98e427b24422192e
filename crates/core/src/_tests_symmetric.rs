#![cfg(test)]

use super::symmetric::SymmetricMatrix;

fn sample() -> SymmetricMatrix {
    SymmetricMatrix {
        m00: 4.0,
        m11: 3.0,
        m22: 2.5,
        m01: 0.5,
        m02: -0.25,
        m12: 0.75,
    }
}

fn dense_product(a: &SymmetricMatrix, b: &SymmetricMatrix) -> [[f64; 3]; 3] {
    let (a, b) = (a.to_array(), b.to_array());
    let mut out = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            out[i][j] = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

#[test]
fn default_is_identity() {
    assert_eq!(SymmetricMatrix::default(), SymmetricMatrix::identity());
    assert_eq!(SymmetricMatrix::identity().diagonal(), [1.0, 1.0, 1.0]);
}

#[test]
fn determinant_matches_dense_expansion() {
    let m = sample();
    let a = m.to_array();
    let dense = a[0][0] * (a[1][1] * a[2][2] - a[1][2] * a[2][1])
        - a[0][1] * (a[1][0] * a[2][2] - a[1][2] * a[2][0])
        + a[0][2] * (a[1][0] * a[2][1] - a[1][1] * a[2][0]);
    assert!((m.determinant() - dense).abs() < 1e-12);
}

#[test]
fn inverse_times_matrix_is_identity() {
    let m = sample();
    let product = dense_product(&m, &m.inverse());
    for i in 0..3 {
        for j in 0..3 {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!((product[i][j] - expected).abs() < 1e-12, "({i}, {j})");
        }
    }
}

#[test]
fn isotropic_inverse_is_reciprocal() {
    let inv = SymmetricMatrix::isotropic(4.0).inverse();
    assert!(inv.max_abs_diff(&SymmetricMatrix::isotropic(0.25)) < 1e-15);
}

#[test]
fn interface_tensor_eigenvalues() {
    let normal = [0.6, 0.0, 0.8];
    let t = SymmetricMatrix::interface_tensor(6.0, 2.0, normal);
    let along = t.mul_vec(normal);
    let tangent = t.mul_vec([0.8, 0.0, -0.6]);
    for axis in 0..3 {
        assert!((along[axis] - 2.0 * normal[axis]).abs() < 1e-12);
    }
    assert!((tangent[0] - 4.8).abs() < 1e-12 && (tangent[2] + 3.6).abs() < 1e-12);
    assert!((t.mul_vec([0.0, 1.0, 0.0])[1] - 6.0).abs() < 1e-12);
    assert!((t.trace() - 14.0).abs() < 1e-12);
}
