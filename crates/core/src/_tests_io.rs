#![cfg(test)]

use super::backend::TransformKind;
use super::geometry::GeometricObject;
use super::io::{ConfigError, JobConfig};
use super::polarization::Polarization;

const SAMPLE: &str = r#"
k_points = [[0.0, 0.0, 0.0], [0.5, 0.0, 0.0]]

[operator]
num_bands = 8
transform = "complex"
polarization = "TM"

[operator.grid]
nx = 32
ny = 32

[geometry]
eps_bg = 1.0

[geometry.lattice]
r1 = [1.0, 0.0, 0.0]
r2 = [0.0, 1.0, 0.0]
r3 = [0.0, 0.0, 1.0]

[[geometry.objects]]
type = "cylinder"
center = [0.0, 0.0, 0.0]
radius = 0.2
epsilon = 12.0

[dielectric]
mesh_size = [4, 4, 1]
"#;

#[test]
fn parses_documented_example() {
    let config = JobConfig::from_toml_str(SAMPLE).expect("sample should parse");
    assert_eq!(config.operator.grid.nx, 32);
    assert_eq!(config.operator.grid.nz, 1);
    assert_eq!(config.operator.num_bands, 8);
    assert_eq!(config.operator.fft_bands(), 8);
    assert_eq!(config.operator.transform, TransformKind::Complex);
    assert_eq!(config.operator.polarization, Polarization::TM);
    assert_eq!(config.dielectric.mesh_size, [4, 4, 1]);
    assert_eq!(config.geometry.objects.len(), 1);
    match &config.geometry.objects[0] {
        GeometricObject::Cylinder { axis, height, .. } => {
            assert_eq!(*axis, [0.0, 0.0, 1.0]);
            assert!(height.is_none());
        }
        other => panic!("expected a cylinder, got {other:?}"),
    }
}

#[test]
fn k_points_convert_through_reciprocal_basis() {
    let config = JobConfig::from_toml_str(SAMPLE).expect("sample should parse");
    let ks = config.cartesian_k_points();
    assert_eq!(ks.len(), 2);
    assert!((ks[1][0] - std::f64::consts::PI).abs() < 1e-12);
    assert!(ks[1][1].abs() < 1e-12);
}

#[test]
fn omitted_sections_take_defaults() {
    let src = r#"
[operator]
num_bands = 2
grid = { nx = 4 }

[geometry.lattice]
r1 = [1.0, 0.0, 0.0]
r2 = [0.0, 1.0, 0.0]
r3 = [0.0, 0.0, 1.0]
"#;
    let config = JobConfig::from_toml_str(src).expect("minimal config should parse");
    assert_eq!(config.dielectric.mesh_size, [3, 3, 3]);
    assert_eq!(config.geometry.eps_bg, 1.0);
    assert!(config.k_points.is_empty());
    assert_eq!(config.operator.polarization, Polarization::None);
}

#[test]
fn rejects_zero_mesh_entry() {
    let src = SAMPLE.replace("mesh_size = [4, 4, 1]", "mesh_size = [4, 0, 1]");
    let err = JobConfig::from_toml_str(&src).expect_err("zero mesh entry");
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn rejects_non_positive_permittivity() {
    let src = SAMPLE.replace("epsilon = 12.0", "epsilon = -1.0");
    assert!(matches!(
        JobConfig::from_toml_str(&src),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn rejects_degenerate_lattice() {
    let src = SAMPLE.replace("r2 = [0.0, 1.0, 0.0]", "r2 = [2.0, 0.0, 0.0]");
    assert!(matches!(
        JobConfig::from_toml_str(&src),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn reports_toml_syntax_errors() {
    assert!(matches!(
        JobConfig::from_toml_str("[operator"),
        Err(ConfigError::Toml(_))
    ));
}
