use std::cell::RefCell;
use std::rc::Rc;

use blockchart::block::{
    Block, BlockContainer, BlockParams, BorderArrangement, ColorBlock, EmptyBlock, ItemEntity,
    LabelBlock, RectangleConstraint,
};
use blockchart::canvas::{DrawOp, RecordingCanvas};
use blockchart::data::SharedXyDataset;
use blockchart::entity::EntityKind;
use blockchart::factory::create_line_chart;
use blockchart::geom::{Rect, RectangleEdge, Shape, Size2D};
use blockchart::legend::{LegendItem, LegendItemCollection, LegendItemSource, SortOrder};
use blockchart::paint::{BLACK, FontSpec, office_color};
use blockchart::text::HeuristicTextMeasurer;
use blockchart::{
    Chart, ChartRenderingInfo, LegendTitle, PlotOrientation, TextTitle, Title, XySeries,
    XySeriesCollection,
};

fn line_chart(title: Option<&str>, legend: bool) -> Chart {
    let mut s = XySeries::new("S1");
    s.add(1.0, Some(2.0)).unwrap();
    s.add(2.0, Some(5.0)).unwrap();
    s.add(3.0, Some(3.0)).unwrap();
    let mut c = XySeriesCollection::new();
    c.add_series(s);
    let ds: SharedXyDataset = Rc::new(RefCell::new(c));
    create_line_chart(title, Some("x"), Some("y"), ds, PlotOrientation::Vertical, legend)
}

fn items(labels: &[&str]) -> Rc<dyn LegendItemSource> {
    Rc::new(
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| LegendItem::new(*l, office_color(i)).with_series(*l, i))
            .collect::<LegendItemCollection>(),
    )
}

#[test]
fn basic_chart_draw() {
    let mut chart = line_chart(Some("Title"), false);
    let mut canvas = RecordingCanvas::new();
    let mut info = ChartRenderingInfo::new();
    let area = Rect::new(0.0, 0.0, 400.0, 300.0);
    chart.draw(&mut canvas, area, Some(&mut info)).unwrap();

    assert_eq!(info.chart_area, area);
    let entities = info.entities().unwrap();
    let first = entities.get(0).unwrap();
    assert_eq!(first.kind, EntityKind::Chart);
    assert_eq!(first.area, Shape::Rect(area));

    let title = chart.title().unwrap().bounds();
    assert_eq!(title.y, 5.0);
    assert!(title.height > 0.0);
    assert!(entities.iter().any(|e| matches!(
        &e.kind,
        EntityKind::Title { text: Some(t) } if t == "Title"
    )));

    let plot_area = info.plot_info.plot_area;
    assert!((plot_area.height - (300.0 - title.height - 10.0)).abs() < 1e-9);
    assert!((plot_area.y - (5.0 + title.height)).abs() < 1e-9);
    assert_eq!(plot_area.width, 390.0);
    assert_eq!(
        entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::XyItem { .. }))
            .count(),
        3
    );
}

#[test]
fn draw_without_entities_still_records_areas() {
    let mut chart = line_chart(Some("Title"), true);
    let mut info = ChartRenderingInfo::without_entities();
    chart
        .draw(
            &mut RecordingCanvas::new(),
            Rect::new(0.0, 0.0, 400.0, 300.0),
            Some(&mut info),
        )
        .unwrap();
    assert!(info.entities().is_none());
    assert!(info.plot_info.data_area.width > 0.0);
}

#[test]
fn titles_only_ever_shrink_the_area() {
    let mut canvas = RecordingCanvas::new();
    let mut area = Rect::new(0.0, 0.0, 400.0, 300.0);
    for edge in [
        RectangleEdge::Top,
        RectangleEdge::Left,
        RectangleEdge::Bottom,
        RectangleEdge::Right,
        RectangleEdge::Top,
    ] {
        let mut text = TextTitle::new(format!("{edge} title"));
        text.title_mut().set_position(edge);
        let mut title = Title::from(text);
        let before = area;
        Chart::draw_title(&mut title, &mut canvas, &mut area, false).unwrap();
        assert!(area.width <= before.width && area.height <= before.height);
        assert!(area.min_x() >= before.min_x() && area.max_x() <= before.max_x());
        assert!(area.min_y() >= before.min_y() && area.max_y() <= before.max_y());
    }
    assert!(area.width < 400.0 && area.height < 300.0);
}

#[test]
fn zero_area_skips_the_title() {
    let mut canvas = RecordingCanvas::new();
    let mut title = Title::from(TextTitle::new("Hidden"));
    let mut area = Rect::new(10.0, 10.0, 0.0, 100.0);
    let result = Chart::draw_title(&mut title, &mut canvas, &mut area, true).unwrap();
    assert!(result.is_none());
    assert_eq!(area, Rect::new(10.0, 10.0, 0.0, 100.0));
    assert!(canvas.ops().is_empty());
}

#[test]
fn entities_pass_through_only_when_requested() {
    let mut canvas = RecordingCanvas::new();
    let mut title = Title::from(LegendTitle::new(items(&["A", "B"])));
    let mut area = Rect::new(0.0, 0.0, 400.0, 300.0);
    let with = Chart::draw_title(&mut title, &mut canvas, &mut area, true)
        .unwrap()
        .unwrap();
    let found = with.entities.unwrap();
    assert_eq!(
        found
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::LegendItem { .. }))
            .count(),
        2
    );

    let mut area = Rect::new(0.0, 0.0, 400.0, 300.0);
    let without = Chart::draw_title(&mut title, &mut canvas, &mut area, false)
        .unwrap()
        .unwrap();
    assert!(without.entities.is_none());
}

#[test]
fn empty_legend_takes_no_space() {
    let mut legend = LegendTitle::new(Rc::new(LegendItemCollection::new()));
    let size = legend.arrange(&HeuristicTextMeasurer, &RectangleConstraint::NONE);
    assert_eq!(size, Size2D::ZERO);
    assert!(legend.item_container().is_empty());

    let mut title = Title::from(legend);
    let mut area = Rect::new(0.0, 0.0, 200.0, 100.0);
    Chart::draw_title(&mut title, &mut RecordingCanvas::new(), &mut area, true).unwrap();
    assert_eq!(area, Rect::new(0.0, 0.0, 200.0, 100.0));
}

#[test]
fn legend_sort_order() {
    let m = HeuristicTextMeasurer;
    let mut legend = LegendTitle::new(items(&["A", "B"]));
    legend.arrange(&m, &RectangleConstraint::NONE);
    let labels: Vec<&str> = legend.items().iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, ["A", "B"]);

    legend.set_sort_order(SortOrder::Descending);
    legend.arrange(&m, &RectangleConstraint::NONE);
    let labels: Vec<&str> = legend.items().iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, ["B", "A"]);
}

#[test]
fn descending_reverses_sources_too() {
    let m = HeuristicTextMeasurer;
    let mut legend = LegendTitle::new(items(&["A", "B"]));
    legend.add_source(items(&["C", "D"]));
    legend.set_sort_order(SortOrder::Descending);
    legend.arrange(&m, &RectangleConstraint::NONE);
    let labels: Vec<&str> = legend.items().iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, ["D", "C", "B", "A"]);
}

#[test]
fn legend_on_the_right_stacks_items() {
    let m = HeuristicTextMeasurer;
    let mut legend = LegendTitle::new(items(&["Alpha", "Beta", "Gamma"]));
    legend.title_mut().set_position(RectangleEdge::Right);
    legend.arrange(&m, &RectangleConstraint::NONE);
    let ys: Vec<f64> = legend
        .item_container()
        .children()
        .iter()
        .map(|c| c.block.bounds().y)
        .collect();
    assert_eq!(ys.len(), 3);
    assert!(ys.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn zero_width_blocks_draw_nothing() {
    let m = HeuristicTextMeasurer;
    let params = BlockParams::with_entities(true);
    let area = Rect::new(10.0, 10.0, 0.0, 50.0);

    let mut container = BlockContainer::with_arrangement(BorderArrangement::new());
    container.add(ColorBlock::new(BLACK, 20.0, 20.0));
    container.set_entity(Some(ItemEntity {
        kind: EntityKind::Block {
            id: Some("box".into()),
        },
        tooltip: Some("box".into()),
        url: None,
    }));
    container.arrange(&m, &RectangleConstraint::NONE);

    let mut legend = LegendTitle::new(items(&["A", "B"]));
    legend.arrange(&m, &RectangleConstraint::NONE);

    let mut blocks: Vec<Box<dyn Block>> = vec![
        Box::new(EmptyBlock::new(20.0, 20.0)),
        Box::new(LabelBlock::new("label", FontSpec::sans(12.0), BLACK)),
        Box::new(container),
        Box::new(TextTitle::new("title")),
        Box::new(legend),
    ];
    for block in blocks.iter_mut() {
        let mut canvas = RecordingCanvas::new();
        let result = block.draw(&mut canvas, area, &params).unwrap();
        assert!(result.entities.is_none_or(|e| e.is_empty()));
        assert!(canvas.ops().is_empty(), "{:?}", canvas.ops());
        assert_eq!(block.bounds(), area);
    }
}

#[test]
fn titles_legend_items_and_plot_are_grouped() {
    let mut chart = line_chart(Some("Title"), true);
    let mut canvas = RecordingCanvas::new();
    chart
        .draw(&mut canvas, Rect::new(0.0, 0.0, 400.0, 300.0), None)
        .unwrap();
    let begins: Vec<&str> = canvas
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::BeginElement(id) => Some(id.as_str()),
            _ => None,
        })
        .collect();
    let ends = canvas
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::EndElement))
        .count();
    assert_eq!(begins, ["title", "legend", "legend_item", "plot"]);
    assert_eq!(ends, begins.len());
}
