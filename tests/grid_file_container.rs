use gridfield::ndarray::{s, Array2, Array3};
use gridfield::{
    write_grid_file, Encoding, Error, Field2D, Field3D, GridFile, MemorySource, Subdomain,
    SubdomainConfig, Target,
};

use std::fs;
use std::io::BufWriter;
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("gridfield_{}_{name}.grd", std::process::id()))
}

fn write(name: &str, source: &MemorySource, encoding: Encoding) -> PathBuf {
    let _ = env_logger::builder().is_test(true).try_init();

    let path = temp_path(name);
    let file = fs::File::create(&path).unwrap();
    write_grid_file(BufWriter::new(file), source, encoding).unwrap();
    path
}

fn equilibrium() -> (Subdomain, MemorySource, Array2<f64>, Array3<f64>) {
    let mesh = Subdomain::new(SubdomainConfig::serial(4, 4, 2, 1, 1)).unwrap();

    // x guards stored, y guards not
    let rxy = Array2::from_shape_fn((6, 4), |(x, y)| 1. + 0.1 * x as f64 + 0.01 * y as f64);
    let te = Array3::from_shape_fn((6, 6, 2), |(x, y, z)| (x * 100 + y * 10 + z) as f64);

    let mut source = MemorySource::new();
    source.add_attribute("", "title", "circular equilibrium");
    source.add_attribute("Rxy", "units", "m");
    source.add_int("nx", 6);
    source.add_int("nz", 2);
    source.add_reals("psi", vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
    source.add_field2d("Rxy", &rxy);
    source.add_field3d("Te0", &te);

    (mesh, source, rxy, te)
}

#[test]
fn load_from_ascii_file() {
    let (mesh, source, rxy, te) = equilibrium();
    let path = write("ascii", &source, Encoding::Ascii);

    let mut grid = GridFile::open_path(&path).unwrap();
    assert_eq!(grid.filename(), path.display().to_string());
    assert_eq!(grid.get_string("title").as_deref(), Some("circular equilibrium"));
    assert_eq!(grid.get_int("nx"), Some(6));
    assert_eq!(grid.get_reals("psi", 2, 4), Some(vec![0.5, 0.6]));

    let mut field = Field2D::default();
    assert!(grid.get_field(&mesh, &mut field, "Rxy", 0.0).unwrap());
    assert_eq!(field.slice(s![.., 1..5]), rxy.view());
    assert_eq!(field.slice(s![.., 0]), rxy.slice(s![.., 0]));
    assert_eq!(field.slice(s![.., 5]), rxy.slice(s![.., 3]));

    let mut volume = Field3D::default();
    assert!(grid
        .get(&mesh, Target::Field3D(&mut volume), "Te0", 0.0)
        .unwrap());
    assert_eq!(volume.view(), te.view());

    drop(grid);
    fs::remove_file(path).unwrap();
}

#[test]
fn load_from_binary_file() {
    let (mesh, source, rxy, _) = equilibrium();
    let path = write("binary", &source, Encoding::Base64);

    let mut grid = GridFile::open_path(&path).unwrap();
    let mut field = Field2D::default();
    assert!(grid.get_field(&mesh, &mut field, "Rxy", 0.0).unwrap());
    assert_eq!(field.slice(s![.., 1..5]), rxy.view());

    assert!(!grid.get_field(&mesh, &mut field, "Bpxy", 0.25).unwrap());
    assert!(field.iter().all(|x| *x == 0.25));

    drop(grid);
    fs::remove_file(path).unwrap();
}

#[test]
fn missing_file_cannot_be_opened() {
    let result = GridFile::open_path(temp_path("does_not_exist"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let path = temp_path("malformed");
    fs::write(
        &path,
        r#"<?xml version="1.0"?><GridFile version="2.0" byte_order="LittleEndian"></GridFile>"#,
    )
    .unwrap();

    let result = GridFile::open_path(&path);
    assert!(matches!(result, Err(Error::Parse(_))));

    fs::remove_file(path).unwrap();
}
