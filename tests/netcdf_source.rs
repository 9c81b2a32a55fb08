//! Reading a real netCDF-4 file through `NetcdfSource`.

use h5lens::data::{DataSource, NetcdfSource, Value};
use h5lens::slicing::parse_dims;
use h5lens::workspace::FileWorkspace;
use std::path::Path;

fn write_sample(path: &Path) {
    let mut file = netcdf::create(path).unwrap();
    file.add_attribute("title", "sample").unwrap();
    file.add_dimension("y", 3).unwrap();
    file.add_dimension("x", 4).unwrap();

    let data: Vec<f64> = (0..12).map(f64::from).collect();
    let mut grid = file.add_variable::<f64>("grid", &["y", "x"]).unwrap();
    grid.put_attribute("units", "K").unwrap();
    grid.put_values(&data, ..).unwrap();

    let mut group = file.add_group("obs").unwrap();
    group.add_dimension("n", 5).unwrap();
    let mut counts = group.add_variable::<i32>("counts", &["n"]).unwrap();
    counts.put_values(&[1, 2, 3, 4, 5], ..).unwrap();
}

fn sample() -> (tempfile::TempDir, NetcdfSource) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.nc");
    write_sample(&path);
    let source = NetcdfSource::open(&path).unwrap();
    (dir, source)
}

#[test]
fn hierarchy_and_metadata() {
    let (_dir, source) = sample();
    assert_eq!(source.name(), "sample.nc");

    let root = source.root().unwrap();
    assert!(root.is_group());
    assert!(root.attributes.iter().any(|a| a.name == "title" && a.value == "sample"));

    let paths: Vec<String> = source.children("/").unwrap().into_iter().map(|n| n.path).collect();
    assert_eq!(paths, vec!["/grid".to_string(), "/obs".to_string()]);

    let grid = source.node("/grid").unwrap();
    let info = grid.dataset_info().unwrap();
    assert_eq!(info.shape, vec![3, 4]);
    assert_eq!(info.dim_names, vec!["y".to_string(), "x".to_string()]);
    assert_eq!(info.type_name, "float64");
    assert!(grid.attributes.iter().any(|a| a.name == "units" && a.value == "K"));

    let nested: Vec<String> = source.children("/obs").unwrap().into_iter().map(|n| n.path).collect();
    assert_eq!(nested, vec!["/obs/counts".to_string()]);
}

#[test]
fn slices_are_read_through_dimension_specs() {
    let (_dir, source) = sample();

    let row = source.read_slice("/grid", parse_dims(&["1", "1:3"]).entries()).unwrap();
    assert_eq!(row.shape(), &[2]);
    assert_eq!(row.iter().cloned().collect::<Vec<_>>(), vec![Value::Float(5.0), Value::Float(6.0)]);

    let counts = source.read_slice("/obs/counts", parse_dims(&["::2"]).entries()).unwrap();
    assert_eq!(
        counts.iter().cloned().collect::<Vec<_>>(),
        vec![Value::Int(1), Value::Int(3), Value::Int(5)]
    );
}

#[test]
fn strided_and_backward_windows_read_only_their_elements() {
    let (_dir, source) = sample();

    let window = source.read_slice("/grid", parse_dims(&["0:3:2", "3:0:-2"]).entries()).unwrap();
    assert_eq!(window.shape(), &[2, 2]);
    assert_eq!(
        window.iter().cloned().collect::<Vec<_>>(),
        vec![Value::Float(3.0), Value::Float(1.0), Value::Float(11.0), Value::Float(9.0)]
    );

    let column = source.read_slice("/grid", parse_dims(&[":", "-1"]).entries()).unwrap();
    assert_eq!(
        column.iter().cloned().collect::<Vec<_>>(),
        vec![Value::Float(3.0), Value::Float(7.0), Value::Float(11.0)]
    );

    let empty = source.read_slice("/grid", parse_dims(&["2:1", ":"]).entries()).unwrap();
    assert_eq!(empty.shape(), &[0, 4]);
}

#[test]
fn missing_nodes_and_groups_are_errors() {
    let (_dir, source) = sample();
    assert!(source.node("/nope").is_err());
    assert!(source.read_slice("/obs", &[]).is_err());
}

#[test]
fn workspace_opens_files_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.nc");
    write_sample(&path);

    let mut ws = FileWorkspace::open(&path).unwrap();
    assert_eq!(ws.name(), "sample.nc");
    assert_eq!(ws.path(), Some(path.as_path()));
    ws.select_node("/grid").unwrap();
    assert_eq!(ws.active_tab().unwrap().view.size(), (3, 4));
}
