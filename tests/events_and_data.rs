use std::cell::RefCell;
use std::rc::Rc;

use blockchart::data::{KeyedValues2D, SharedCategoryDataset, read_category_csv, read_pie_csv, read_xy_csv};
use blockchart::event::{ChangeEvent, ChangeSource, ChartChangeType, Notifier};
use blockchart::factory::create_bar_chart;
use blockchart::{ChartError, DefaultCategoryDataset, PlotOrientation, TextTitle};

#[test]
fn listeners_run_newest_first() {
    let n = Notifier::new(ChangeSource::Chart);
    let order = Rc::new(RefCell::new(Vec::new()));
    for tag in ["first", "second", "third"] {
        let sink = order.clone();
        n.add_listener(move |_| sink.borrow_mut().push(tag));
    }
    n.fire_change();
    assert_eq!(order.borrow().as_slice(), &["third", "second", "first"]);
}

#[test]
fn suppressed_changes_collapse_into_one() {
    let n = Notifier::new(ChangeSource::Plot);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    n.add_listener(move |e: &ChangeEvent| sink.borrow_mut().push(e.kind));
    n.set_notify(false);
    for _ in 0..5 {
        n.fire_change();
    }
    assert!(seen.borrow().is_empty());
    n.set_notify(true);
    assert_eq!(seen.borrow().as_slice(), &[ChartChangeType::General]);
}

#[test]
fn cloned_notifier_starts_without_listeners() {
    let n = Notifier::new(ChangeSource::Title);
    n.add_listener(|_| {});
    let copy = n.clone();
    assert_eq!(n.listener_count(), 1);
    assert_eq!(copy.listener_count(), 0);
    assert_eq!(n.share().listener_count(), 1);
}

#[test]
fn chart_forwards_dataset_and_subtitle_changes() {
    let mut data = DefaultCategoryDataset::new();
    data.add_value(1.0, "S1", "C1");
    let data = Rc::new(RefCell::new(data));
    let shared: SharedCategoryDataset = data.clone();
    let mut chart = create_bar_chart(
        Some("Bars"),
        None,
        None,
        shared,
        PlotOrientation::Vertical,
        false,
    );
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    chart.add_change_listener(move |e| sink.borrow_mut().push((e.source, e.kind)));

    data.borrow_mut().add_value(2.0, "S1", "C2");
    chart.add_subtitle(TextTitle::new("sub"));
    if let Some(title) = chart.subtitle_mut(0).unwrap().as_text_mut() {
        title.set_text("changed");
    }

    let seen = seen.borrow();
    assert_eq!(seen[0], (ChangeSource::Dataset, ChartChangeType::DatasetUpdated));
    assert!(seen.len() >= 3);
    assert_eq!(seen.last(), Some(&(ChangeSource::Title, ChartChangeType::General)));
}

#[test]
fn removing_a_value_prunes_empty_rows_and_columns() {
    let mut t = KeyedValues2D::new();
    t.add_value(Some(1.0), "R1", "C1");
    t.add_value(Some(2.0), "R1", "C2");
    t.add_value(Some(3.0), "R2", "C2");

    t.remove_value("R2", "C2").unwrap();
    assert_eq!(t.row_keys(), ["R1"]);
    assert_eq!(t.column_keys(), ["C1", "C2"]);

    t.remove_value("R1", "C1").unwrap();
    assert_eq!(t.column_keys(), ["C2"]);
    assert_eq!(t.value_by_keys("R1", "C2").unwrap(), Some(2.0));

    assert!(matches!(
        t.remove_value("R9", "C2"),
        Err(ChartError::UnknownKey(ref k)) if k == "R9"
    ));
}

#[test]
fn csv_layouts_load() {
    let cat = read_category_csv("series,2020,2021\nA,1,2\nB,,4\n".as_bytes()).unwrap();
    assert_eq!(cat.row_keys(), ["A", "B"]);
    assert_eq!(cat.value_by_keys("B", "2020").unwrap(), None);
    assert_eq!(cat.value_by_keys("B", "2021").unwrap(), Some(4.0));

    let xy = read_xy_csv("series,x,y\nS,1,2\nS,2,\nT,1,5\n".as_bytes()).unwrap();
    use blockchart::data::XyDataset;
    assert_eq!(xy.series_count(), 2);
    assert_eq!(xy.item_count(0), 2);
    assert_eq!(xy.y(0, 1), None);

    let pie = read_pie_csv("key,value\nA,1\nB,3\n".as_bytes()).unwrap();
    use blockchart::data::PieDataset;
    assert_eq!(pie.item_count(), 2);

    assert!(matches!(
        read_pie_csv("key,value\nA,lots\n".as_bytes()),
        Err(ChartError::InvalidArgument(_))
    ));
}
