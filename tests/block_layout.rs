use blockchart::block::{
    Block, BlockContainer, BlockFrame, BlockInsets, BlockParams, BorderArrangement,
    CenterArrangement, ColorBlock, ColumnArrangement, EmptyBlock, FlowArrangement,
    GridArrangement, LengthConstraintType, Range, RectangleConstraint,
};
use blockchart::canvas::{DrawOp, RecordingCanvas};
use blockchart::geom::{Rect, RectangleEdge, RectangleInsets, Size2D};
use blockchart::paint::{BLACK, GRAY};
use blockchart::text::HeuristicTextMeasurer;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn insets() -> BlockInsets {
    BlockInsets {
        margin: RectangleInsets::new(1.0, 2.0, 3.0, 4.0),
        frame: BlockFrame::line(1.5, BLACK),
        padding: RectangleInsets::uniform(2.0),
    }
}

#[test]
fn trim_then_extend_restores_the_total() {
    let insets = insets();
    for total in [20.0, 57.5, 300.0] {
        let w = insets.trim_to_content_width(total);
        let h = insets.trim_to_content_height(total);
        assert!(close(insets.calculate_total_width(w), total));
        assert!(close(insets.calculate_total_height(h), total));
    }
}

#[test]
fn relative_insets_round_trip() {
    let insets = BlockInsets {
        margin: RectangleInsets::relative(0.1, 0.05, 0.1, 0.05),
        ..BlockInsets::default()
    };
    let content = insets.trim_to_content_width(200.0);
    assert!(close(content, 180.0));
    assert!(close(insets.calculate_total_width(content), 200.0));
}

#[test]
fn trimming_clamps_at_zero() {
    let insets = insets();
    assert_eq!(insets.trim_to_content_width(3.0), 0.0);
    assert_eq!(insets.trim_to_content_height(0.0), 0.0);
}

#[test]
fn column_stacks_children() {
    let m = HeuristicTextMeasurer;
    let mut c = BlockContainer::with_arrangement(ColumnArrangement::default());
    for w in [10.0, 40.0, 25.0] {
        c.add(EmptyBlock::new(w, 12.0));
    }
    let size = c.arrange(&m, &RectangleConstraint::NONE);
    assert_eq!(size, Size2D::new(40.0, 36.0));
    let ys: Vec<f64> = c.children().iter().map(|ch| ch.block.bounds().y).collect();
    assert_eq!(ys, vec![0.0, 12.0, 24.0]);
}

#[test]
fn empty_column_is_zero_sized() {
    let m = HeuristicTextMeasurer;
    let mut c = BlockContainer::with_arrangement(ColumnArrangement::default());
    assert_eq!(c.arrange(&m, &RectangleConstraint::NONE), Size2D::ZERO);
}

#[test]
fn arrange_is_idempotent() {
    let m = HeuristicTextMeasurer;
    let mut c = BlockContainer::with_arrangement(FlowArrangement::default());
    for w in [30.0, 50.0, 20.0, 60.0] {
        c.add(EmptyBlock::new(w, 10.0));
    }
    let constraint = RectangleConstraint::NONE
        .to_fixed_width(100.0)
        .to_unconstrained_height();
    let first = c.arrange(&m, &constraint);
    let bounds: Vec<_> = c.children().iter().map(|ch| ch.block.bounds()).collect();
    let second = c.arrange(&m, &constraint);
    let again: Vec<_> = c.children().iter().map(|ch| ch.block.bounds()).collect();
    assert_eq!(first, second);
    assert_eq!(bounds, again);
    assert_eq!(first.width, 100.0);
}

#[test]
fn range_width_clamps_natural_size() {
    let m = HeuristicTextMeasurer;
    let mut block = EmptyBlock::new(500.0, 500.0);
    let constraint = RectangleConstraint::NONE.to_range_width(Range::new(0.0, 200.0).unwrap());
    assert_eq!(constraint.width_type(), LengthConstraintType::Range);
    assert_eq!(block.arrange(&m, &constraint), Size2D::new(200.0, 500.0));
}

#[test]
fn fixed_and_none_constraints() {
    let c = RectangleConstraint::new(120.0, 80.0).unwrap();
    assert_eq!(
        c.calculate_constrained_size(Size2D::new(10.0, 500.0)),
        Size2D::new(120.0, 80.0)
    );
    assert_eq!(
        RectangleConstraint::NONE.calculate_constrained_size(Size2D::new(7.0, 9.0)),
        Size2D::new(7.0, 9.0)
    );
}

#[test]
fn bad_constraints_are_rejected() {
    assert!(Range::new(5.0, 1.0).is_err());
    assert!(RectangleConstraint::new(-1.0, 10.0).is_err());
}

#[test]
fn grid_uses_largest_cell() {
    let m = HeuristicTextMeasurer;
    let mut c = BlockContainer::with_arrangement(GridArrangement::new(2, 2).unwrap());
    c.add(EmptyBlock::new(10.0, 5.0));
    c.add(EmptyBlock::new(30.0, 8.0));
    c.add(EmptyBlock::new(20.0, 4.0));
    let size = c.arrange(&m, &RectangleConstraint::NONE);
    assert_eq!(size, Size2D::new(60.0, 16.0));
    assert_eq!(c.children()[2].block.bounds().y, 8.0);
}

/// Top, bottom, left, right, then the unkeyed center child.
fn five_slots() -> BlockContainer {
    let mut c = BlockContainer::with_arrangement(BorderArrangement::new());
    c.add_with_key(EmptyBlock::new(100.0, 10.0), RectangleEdge::Top);
    c.add_with_key(EmptyBlock::new(80.0, 5.0), RectangleEdge::Bottom);
    c.add_with_key(EmptyBlock::new(20.0, 30.0), RectangleEdge::Left);
    c.add_with_key(EmptyBlock::new(10.0, 40.0), RectangleEdge::Right);
    c.add(EmptyBlock::new(70.0, 50.0));
    c
}

fn bounds(c: &BlockContainer) -> Vec<Rect> {
    c.children().iter().map(|ch| ch.block.bounds()).collect()
}

#[test]
fn border_unconstrained() {
    let m = HeuristicTextMeasurer;
    let mut c = five_slots();
    assert_eq!(c.arrange(&m, &RectangleConstraint::NONE), Size2D::new(100.0, 65.0));
    assert_eq!(
        bounds(&c),
        vec![
            Rect::new(0.0, 0.0, 100.0, 10.0),
            Rect::new(0.0, 60.0, 100.0, 5.0),
            Rect::new(0.0, 10.0, 20.0, 50.0),
            Rect::new(90.0, 10.0, 10.0, 50.0),
            Rect::new(20.0, 10.0, 70.0, 50.0),
        ]
    );
}

#[test]
fn border_fixed_width() {
    let m = HeuristicTextMeasurer;
    let mut c = five_slots();
    let constraint = RectangleConstraint::NONE.to_fixed_width(120.0);
    assert_eq!(c.arrange(&m, &constraint), Size2D::new(120.0, 65.0));
    let b = bounds(&c);
    assert_eq!(b[0], Rect::new(0.0, 0.0, 120.0, 10.0));
    assert_eq!(b[1], Rect::new(0.0, 60.0, 120.0, 5.0));
    assert_eq!(b[3], Rect::new(110.0, 10.0, 10.0, 50.0));
    assert_eq!(b[4], Rect::new(20.0, 10.0, 90.0, 50.0));
}

#[test]
fn border_fixed_both() {
    let m = HeuristicTextMeasurer;
    let mut c = five_slots();
    let constraint = RectangleConstraint::new(150.0, 100.0).unwrap();
    assert_eq!(c.arrange(&m, &constraint), Size2D::new(150.0, 100.0));
    let b = bounds(&c);
    assert_eq!(b[1], Rect::new(0.0, 95.0, 150.0, 5.0));
    assert_eq!(b[2], Rect::new(0.0, 10.0, 20.0, 85.0));
    assert_eq!(b[4], Rect::new(20.0, 10.0, 120.0, 85.0));

    let mut c = five_slots();
    let zero = RectangleConstraint::new(0.0, 0.0).unwrap();
    assert_eq!(c.arrange(&m, &zero), Size2D::ZERO);
    assert!(bounds(&c).iter().all(|r| r.is_empty()));
}

#[test]
fn border_fixed_width_ranged_height() {
    let m = HeuristicTextMeasurer;
    let mut c = five_slots();
    let constraint = RectangleConstraint::NONE
        .to_fixed_width(120.0)
        .to_range_height(Range::new(0.0, 40.0).unwrap());
    assert_eq!(c.arrange(&m, &constraint), Size2D::new(120.0, 40.0));
    let b = bounds(&c);
    assert_eq!(b[1], Rect::new(0.0, 35.0, 120.0, 5.0));
    assert_eq!(b[4], Rect::new(20.0, 10.0, 90.0, 25.0));
}

#[test]
fn border_ranged_both() {
    let m = HeuristicTextMeasurer;
    let mut c = five_slots();
    let constraint = RectangleConstraint::ranged(
        Range::new(0.0, 80.0).unwrap(),
        Range::new(0.0, 40.0).unwrap(),
    );
    assert_eq!(c.arrange(&m, &constraint), Size2D::new(80.0, 40.0));
    assert_eq!(
        bounds(&c),
        vec![
            Rect::new(0.0, 0.0, 80.0, 10.0),
            Rect::new(0.0, 35.0, 80.0, 5.0),
            Rect::new(0.0, 10.0, 20.0, 25.0),
            Rect::new(70.0, 10.0, 10.0, 25.0),
            Rect::new(20.0, 10.0, 50.0, 25.0),
        ]
    );
}

#[test]
fn border_replaced_child_is_not_drawn() {
    let m = HeuristicTextMeasurer;
    let mut c = BlockContainer::with_arrangement(BorderArrangement::new());
    c.add(ColorBlock::new(GRAY, 30.0, 30.0));
    c.add(ColorBlock::new(BLACK, 20.0, 10.0));
    let size = c.arrange(&m, &RectangleConstraint::NONE);
    assert_eq!(size, Size2D::new(20.0, 10.0));
    assert_eq!(c.children()[0].block.bounds(), Rect::default());

    let mut canvas = RecordingCanvas::new();
    c.draw(
        &mut canvas,
        Rect::new(5.0, 5.0, size.width, size.height),
        &BlockParams::with_entities(false),
    )
    .unwrap();
    let fills: Vec<&DrawOp> = canvas
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::Fill { .. }))
        .collect();
    assert_eq!(fills.len(), 1);
    assert!(matches!(fills[0], DrawOp::Fill { paint, .. } if *paint == BLACK));
}

#[test]
fn center_places_child_in_the_middle() {
    let m = HeuristicTextMeasurer;
    let mut c = BlockContainer::with_arrangement(CenterArrangement::new());
    c.add(EmptyBlock::new(40.0, 20.0));
    c.add(EmptyBlock::new(5.0, 5.0));

    let fixed = RectangleConstraint::new(100.0, 60.0).unwrap();
    assert_eq!(c.arrange(&m, &fixed), Size2D::new(100.0, 60.0));
    assert_eq!(bounds(&c), vec![Rect::new(30.0, 20.0, 40.0, 20.0), Rect::default()]);

    assert_eq!(c.arrange(&m, &RectangleConstraint::NONE), Size2D::new(40.0, 20.0));
    assert_eq!(c.children()[0].block.bounds(), Rect::new(0.0, 0.0, 40.0, 20.0));

    let narrow = RectangleConstraint::new(30.0, 60.0).unwrap();
    assert_eq!(c.arrange(&m, &narrow), Size2D::new(30.0, 60.0));
    assert_eq!(c.children()[0].block.bounds(), Rect::new(0.0, 20.0, 30.0, 20.0));
}

#[test]
fn flow_wraps_rows_under_a_fixed_width() {
    let m = HeuristicTextMeasurer;
    let mut c = BlockContainer::with_arrangement(FlowArrangement::default());
    for w in [60.0, 30.0, 60.0, 150.0, 40.0] {
        c.add(EmptyBlock::new(w, 11.0));
    }
    let size = c.arrange(&m, &RectangleConstraint::NONE.to_fixed_width(100.0));
    assert_eq!(size, Size2D::new(100.0, 50.0));
    assert_eq!(
        bounds(&c),
        vec![
            Rect::new(4.0, 0.0, 60.0, 11.0),
            Rect::new(66.0, 0.0, 30.0, 11.0),
            Rect::new(20.0, 13.0, 60.0, 11.0),
            // too wide for any row: cut to the full width
            Rect::new(0.0, 26.0, 100.0, 11.0),
            Rect::new(30.0, 39.0, 40.0, 11.0),
        ]
    );
}
