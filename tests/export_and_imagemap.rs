use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use blockchart::data::SharedPieDataset;
use blockchart::export::{SvgExporter, VectorExporter, save_jpeg, save_png};
use blockchart::factory::create_pie_chart;
use blockchart::imagemap::{entities_json, write_image_map};
use blockchart::{
    Chart, ChartError, ChartRenderingInfo, ChartResult, DefaultPieDataset, ExporterRegistry,
    ImageFormat,
};
use tempfile::tempdir;

fn pie() -> Chart {
    let mut ds = DefaultPieDataset::new();
    ds.set_value("A", Some(1.0));
    ds.set_value("B", Some(3.0));
    let ds: SharedPieDataset = Rc::new(RefCell::new(ds));
    create_pie_chart(Some("Share"), ds, true)
}

#[test]
fn png_and_jpeg_files_decode() {
    let dir = tempdir().unwrap();
    let mut chart = pie();

    let png = dir.path().join("pie.png");
    save_png(&mut chart, &png, 320, 240, None).unwrap();
    let img = image::open(&png).unwrap();
    assert_eq!((img.width(), img.height()), (320, 240));

    let jpg = dir.path().join("pie.jpg");
    save_jpeg(&mut chart, &jpg, 320, 240, 80, None).unwrap();
    let img = image::open(&jpg).unwrap();
    assert_eq!((img.width(), img.height()), (320, 240));
}

#[test]
fn svg_export_collects_entities() {
    let mut chart = pie();
    let mut info = ChartRenderingInfo::new();
    let svg = SvgExporter
        .render_string(&mut chart, 400.0, 300.0, Some(&mut info))
        .unwrap();
    assert!(svg.contains("<svg"));
    let tooltips: Vec<&str> = info
        .entities()
        .unwrap()
        .iter()
        .filter_map(|e| e.tooltip.as_deref())
        .collect();
    assert!(tooltips.contains(&"A: (1, 25%)"));
    assert!(tooltips.contains(&"B: (3, 75%)"));
}

#[test]
fn image_map_lists_newest_first() {
    let mut chart = pie();
    let mut info = ChartRenderingInfo::new();
    SvgExporter
        .render_string(&mut chart, 400.0, 300.0, Some(&mut info))
        .unwrap();
    let html = write_image_map("pie", &info);
    assert!(html.starts_with("<map id=\"pie\" name=\"pie\">"));
    assert!(html.contains("shape=\"poly\""));
    let a = html.find("A: (1, 25%)").unwrap();
    let b = html.find("B: (3, 75%)").unwrap();
    assert!(b < a);
}

#[test]
fn entity_dump_is_json() {
    let mut chart = pie();
    let mut info = ChartRenderingInfo::new();
    SvgExporter
        .render_string(&mut chart, 400.0, 300.0, Some(&mut info))
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&entities_json(&info).unwrap()).unwrap();
    let list = json.as_array().unwrap();
    assert_eq!(list[0]["kind"], "chart");
    assert!(list.iter().any(|e| e["kind"] == "pie_section" && e["key"] == "B"));
}

struct FakePdf;

impl VectorExporter for FakePdf {
    fn format(&self) -> ImageFormat {
        ImageFormat::Pdf
    }

    fn export(&self, _chart: &mut Chart, _w: f64, _h: f64, path: &Path) -> ChartResult<()> {
        std::fs::write(path, b"%PDF-1.4\n")?;
        Ok(())
    }
}

#[test]
fn pdf_needs_a_registered_exporter() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pie.pdf");
    let mut chart = pie();

    let mut registry = ExporterRegistry::new();
    assert!(matches!(
        registry.save(&mut chart, &path, 400, 300),
        Err(ChartError::Unavailable(_))
    ));
    assert!(!path.exists());

    registry.register(Box::new(FakePdf));
    registry.save(&mut chart, &path, 400, 300).unwrap();
    assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
}

#[test]
fn registry_writes_svg_by_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pie.svg");
    ExporterRegistry::new()
        .save(&mut pie(), &path, 400, 300)
        .unwrap();
    assert!(std::fs::read_to_string(&path).unwrap().contains("<svg"));
}

#[test]
fn unwritable_paths_report_io_errors() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("no_such_dir");
    let mut chart = pie();

    let png = save_png(&mut chart, missing.join("out.png"), 100, 100, None).unwrap_err();
    assert!(matches!(png, ChartError::Io(_)), "got {png:?}");

    let jpg = save_jpeg(&mut chart, missing.join("out.jpg"), 100, 100, 90, None).unwrap_err();
    assert!(matches!(jpg, ChartError::Io(_)), "got {jpg:?}");
}
