use std::cell::RefCell;
use std::rc::Rc;

use blockchart::axis::NumberAxis;
use blockchart::chart::SharedPlot;
use blockchart::data::{SharedPieDataset, SharedXyDataset};
use blockchart::entity::EntityKind;
use blockchart::factory::create_pie_chart;
use blockchart::geom::{Rect, Size2D};
use blockchart::plot::XyLineAndShapeRenderer;
use blockchart::{
    Chart, ChartViewport, DefaultPieDataset, XyPlot, XySeries, XySeriesCollection,
};

fn setup(width: u32, height: u32) -> (Rc<RefCell<XyPlot>>, ChartViewport) {
    let mut s = XySeries::new("S1");
    for i in 0..=10 {
        s.add(i as f64, Some((i * i) as f64)).unwrap();
    }
    let mut c = XySeriesCollection::new();
    c.add_series(s);
    let ds: SharedXyDataset = Rc::new(RefCell::new(c));
    let mut domain = NumberAxis::new(Some("x".into()));
    domain.set_auto_range_includes_zero(false);
    let plot = Rc::new(RefCell::new(XyPlot::new(
        Some(ds),
        domain,
        NumberAxis::new(Some("y".into())),
        XyLineAndShapeRenderer::new(true, true),
    )));
    let shared: SharedPlot = plot.clone();
    let chart = Chart::new(Some("Squares"), shared, false);
    (plot, ChartViewport::new(chart, width, height))
}

fn first_item_center(vp: &ChartViewport) -> (f64, f64) {
    let e = vp
        .info()
        .entities()
        .unwrap()
        .iter()
        .find(|e| matches!(e.kind, EntityKind::XyItem { item: 5, .. }))
        .unwrap();
    let b = e.area.bounds();
    (b.center_x(), b.center_y())
}

#[test]
fn image_is_cached_until_something_changes() {
    let (_plot, mut vp) = setup(600, 400);
    assert!(vp.is_dirty());
    let img = vp.image().unwrap();
    assert_eq!((img.width(), img.height()), (600, 400));
    assert_eq!(img.pixel(0, 0), 0xFFFF_FFFF);
    vp.image().unwrap();
    assert_eq!(vp.render_count(), 1);
    assert!(!vp.is_dirty());

    vp.resize(640, 400);
    vp.image().unwrap();
    assert_eq!(vp.render_count(), 2);
}

#[test]
fn entity_lookup_respects_scaling() {
    let (_plot, mut vp) = setup(600, 400);
    vp.set_draw_limits(Size2D::new(300.0, 200.0), Size2D::new(600.0, 400.0));
    vp.image().unwrap();
    let (cx, cy) = first_item_center(&vp);
    assert!(matches!(
        vp.entity_at(cx, cy).map(|e| &e.kind),
        Some(EntityKind::XyItem { item: 5, .. })
    ));
    assert_eq!(vp.tooltip_at(cx, cy), Some("S1: (5, 25)"));

    // twice the screen, same drawing size: screen points are halved
    vp.resize(1200, 800);
    assert_eq!(vp.draw_size(), Size2D::new(600.0, 400.0));
    vp.image().unwrap();
    let (cx2, cy2) = first_item_center(&vp);
    assert!((cx2 - cx).abs() < 1e-9 && (cy2 - cy).abs() < 1e-9);
    assert_eq!(vp.tooltip_at(cx * 2.0, cy * 2.0), Some("S1: (5, 25)"));
    let p = vp.screen_to_chart(cx * 2.0, cy * 2.0);
    assert!((p.x - cx).abs() < 1e-9);
}

#[test]
fn clicks_reach_mouse_listeners() {
    let (_plot, mut vp) = setup(600, 400);
    vp.image().unwrap();
    let (cx, cy) = first_item_center(&vp);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    vp.add_mouse_listener(move |e| sink.borrow_mut().push(e.entity.clone()));
    let event = vp.handle_click(cx, cy);
    assert!(event.entity.is_some());
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn zoom_to_rect_narrows_the_domain_and_restore_undoes_it() {
    let (plot, mut vp) = setup(600, 400);
    vp.image().unwrap();
    let before = plot.borrow().domain_axis().range();
    let data = vp.info().plot_info.data_area;

    vp.zoom_to_rect(Rect::new(data.x, data.y, data.width / 2.0, data.height));
    assert!(vp.is_dirty());
    let zoomed = plot.borrow().domain_axis().range();
    assert!((zoomed.lower() - before.lower()).abs() < 1e-6);
    assert!((zoomed.length() - before.length() / 2.0).abs() < 1e-6);
    vp.image().unwrap();
    assert_eq!(vp.render_count(), 2);

    vp.restore_auto_bounds();
    vp.image().unwrap();
    let restored = plot.borrow().domain_axis().range();
    assert!((restored.lower() - before.lower()).abs() < 1e-9);
    assert!((restored.upper() - before.upper()).abs() < 1e-9);
}

#[test]
fn tiny_drags_do_not_zoom() {
    let (plot, mut vp) = setup(600, 400);
    vp.image().unwrap();
    let before = plot.borrow().domain_axis().range();
    let data = vp.info().plot_info.data_area;
    vp.zoom_to_rect(Rect::new(data.x + 10.0, data.y + 10.0, 2.0, 50.0));
    assert!(!vp.is_dirty());
    assert_eq!(plot.borrow().domain_axis().range(), before);
}

#[test]
fn pan_shifts_without_resizing() {
    let (plot, mut vp) = setup(600, 400);
    vp.image().unwrap();
    let before = plot.borrow().domain_axis().range();
    let data = vp.info().plot_info.data_area;
    // dragging right by a tenth of the data area moves the window left
    vp.pan(data.width / 10.0, 0.0);
    let after = plot.borrow().domain_axis().range();
    assert!((after.length() - before.length()).abs() < 1e-6);
    assert!((after.lower() - (before.lower() - before.length() / 10.0)).abs() < 1e-6);
}

#[test]
fn zoom_about_keeps_the_anchor_value() {
    let (plot, mut vp) = setup(600, 400);
    vp.image().unwrap();
    let data = vp.info().plot_info.data_area;
    let before = plot.borrow().domain_axis().range();
    let (x, y) = (data.center_x(), data.center_y());
    vp.zoom_about(x, y, 0.5);
    let after = plot.borrow().domain_axis().range();
    assert!((after.length() - before.length() * 0.5).abs() < 1e-6);
    assert!((after.central_value() - before.central_value()).abs() < 1e-6);
}

#[test]
fn gestures_on_a_pie_leave_the_image_alone() {
    let mut ds = DefaultPieDataset::new();
    ds.set_value("A", Some(1.0));
    ds.set_value("B", Some(2.0));
    let ds: SharedPieDataset = Rc::new(RefCell::new(ds));
    let mut vp = ChartViewport::new(create_pie_chart(Some("Pie"), ds, true), 600, 400);
    vp.image().unwrap();
    assert!(!vp.is_dirty());

    vp.zoom_about(300.0, 200.0, 0.5);
    vp.pan(20.0, 10.0);
    vp.zoom_to_rect(Rect::new(100.0, 100.0, 200.0, 150.0));
    vp.restore_auto_bounds();
    assert!(!vp.is_dirty());
    vp.image().unwrap();
    assert_eq!(vp.render_count(), 1);
}
