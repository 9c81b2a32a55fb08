//! End-to-end slicing behaviour through the public view and workspace APIs.

use h5lens::data::{DataSource, MemorySource, Node};
use h5lens::slicing::{parse_dims, parse_token, validate_token, DimEntry, DimRange};
use h5lens::view::{ImageAdapter, Pixel, PlotAdapter, TableAdapter, ViewAdapter};
use h5lens::workspace::{FileWorkspace, TabKind};

fn tokens(t: &[&str]) -> Vec<String> {
    t.iter().map(|s| s.to_string()).collect()
}

fn node(src: &MemorySource, path: &str) -> Node {
    src.node(path).unwrap()
}

#[test]
fn tokens_parse_to_indices_and_ranges() {
    assert_eq!(parse_token("5"), Some(DimEntry::Index(5)));
    assert_eq!(parse_token("-1"), Some(DimEntry::Index(-1)));
    assert_eq!(
        parse_token("2:10:3"),
        Some(DimEntry::Range(DimRange::new(Some(2), Some(10), Some(3))))
    );
    assert_eq!(
        parse_token(":"),
        Some(DimEntry::Range(DimRange::new(None, None, None)))
    );
    assert_eq!(parse_token("abc"), None);
}

#[test]
fn unparseable_tokens_are_dropped() {
    let spec = parse_dims(&tokens(&["0", "x", ":"]));
    assert_eq!(spec.len(), 2);
    assert_eq!(spec.get(0).and_then(DimEntry::as_index), Some(0));
    assert!(spec.get(1).is_some_and(DimEntry::is_range));
}

#[test]
fn index_validation_is_bounded_by_extent() {
    assert!(validate_token("7", 8));
    assert!(!validate_token("8", 8));
    assert!(!validate_token("-1", 8));
    assert!(validate_token("100:200", 8));
}

#[test]
fn stack_defaults_to_first_frame() {
    let src = MemorySource::new("t").with_floats("/cube", &[5, 10, 20], |i| i[0] as f64);
    let mut table = TableAdapter::new();
    table.bind(&src, &node(&src, "/cube"));
    assert_eq!(table.dims(), &tokens(&["0", ":", ":"])[..]);
    assert_eq!((table.row_count(), table.column_count()), (10, 20));

    let mut image = ImageAdapter::new();
    image.bind(&src, &node(&src, "/cube"));
    assert_eq!(image.dims(), &tokens(&["0", ":", ":"])[..]);
    assert_eq!((image.row_count(), image.column_count()), (10, 20));
    assert_eq!(image.frame().map(|f| (f.index, f.count)), Some((0, 5)));
}

#[test]
fn colour_trailing_axis_keeps_every_axis() {
    let src = MemorySource::new("t")
        .with_floats("/rgb", &[10, 20, 3], |i| i[2] as f64)
        .with_floats("/rgba", &[4, 6, 4], |_| 1.0);

    let mut image = ImageAdapter::new();
    image.bind(&src, &node(&src, "/rgb"));
    assert_eq!(image.dims(), &tokens(&[":", ":", ":"])[..]);
    assert!(image.is_color());
    assert_eq!((image.row_count(), image.column_count()), (10, 20));
    assert!(matches!(image.value_at(0, 0), Some(Pixel::Rgb(_))));

    image.bind(&src, &node(&src, "/rgba"));
    assert_eq!((image.row_count(), image.column_count()), (4, 6));
    assert!(matches!(image.value_at(3, 5), Some(Pixel::Rgba(_))));
    assert!(image.frame().is_none());
}

#[test]
fn rebinding_is_repeatable() {
    let src = MemorySource::new("t").with_floats("/m", &[6, 9], |i| (i[0] * 9 + i[1]) as f64);
    let m = node(&src, "/m");

    let mut table = TableAdapter::new();
    table.bind(&src, &m);
    let first = table.to_tsv();
    let counts = (table.row_count(), table.column_count());
    table.bind(&src, &m);
    assert_eq!((table.row_count(), table.column_count()), counts);
    assert_eq!(table.to_tsv(), first);
}

#[test]
fn fixing_a_matrix_row_keeps_a_single_row() {
    let src = MemorySource::new("t").with_floats("/m", &[8, 8], |i| (i[0] * 8 + i[1]) as f64);
    let mut table = TableAdapter::new();
    table.bind(&src, &node(&src, "/m"));
    assert_eq!((table.row_count(), table.column_count()), (8, 8));

    table.set_dims(&src, &tokens(&["3", ":"]));
    assert_eq!((table.row_count(), table.column_count()), (1, 8));
    assert_eq!(table.row_label(0).as_deref(), Some("3"));
    assert_eq!(table.value_at(0, 1).as_deref(), Some("25.0"));
}

#[test]
fn plot_follows_first_axis() {
    let src = MemorySource::new("t").with_floats("/curve", &[40, 2], |i| (i[0] * (i[1] + 1)) as f64);
    let mut plot = PlotAdapter::new();
    plot.bind(&src, &node(&src, "/curve"));
    assert!(plot.is_available());
    assert_eq!(plot.value_at(4, 0), Some(4.0));
}

#[test]
fn workspace_edits_are_bounded_by_extent() {
    let src = MemorySource::new("t").with_floats("/m", &[8, 8], |_| 0.0);
    let mut ws = FileWorkspace::new(Box::new(src)).unwrap();
    ws.select_node("/m").unwrap();

    assert!(!ws.edit_dim(0, "8"));
    assert_eq!(ws.dims().tokens(), &tokens(&[":", ":"])[..]);
    assert!(ws.edit_dim(0, "7"));
    assert_eq!(ws.dims().tokens(), &tokens(&["7", ":"])[..]);
    assert_eq!(ws.active_tab().unwrap().view.size(), (1, 8));
}

#[test]
fn each_tab_keeps_its_own_node_and_spec() {
    let src = MemorySource::demo();
    let mut ws = FileWorkspace::new(Box::new(src)).unwrap();

    ws.select_node("/fields/temperature").unwrap();
    assert!(ws.edit_dim(1, "2:10"));
    let table_dims = ws.dims().tokens().to_vec();

    ws.add_tab(TabKind::Image).unwrap();
    ws.select_node("/images/gradient").unwrap();
    let image_dims = ws.dims().tokens().to_vec();
    assert_eq!(image_dims, tokens(&[":", ":", ":"]));

    ws.switch_tab(0);
    assert_eq!(ws.dims().tokens(), &table_dims[..]);
    assert_eq!(ws.details().path, "/fields/temperature");

    ws.switch_tab(1);
    assert_eq!(ws.dims().tokens(), &image_dims[..]);
    assert_eq!(ws.details().path, "/images/gradient");
}

#[test]
fn oversized_step_keeps_a_single_row() {
    let src = MemorySource::new("t").with_floats("/m", &[8, 8], |i| (i[0] * 8 + i[1]) as f64);
    let mut ws = FileWorkspace::new(Box::new(src)).unwrap();
    ws.select_node("/m").unwrap();

    assert!(ws.edit_dim(0, "1::9223372036854775807"));
    let tab = ws.active_tab().unwrap();
    assert!(tab.view.is_available());
    assert_eq!(tab.view.size(), (1, 8));
}
