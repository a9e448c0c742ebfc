//! CSV loading and saving for the default datasets.
//!
//! * category: wide table, first header cell ignored, remaining header cells are
//!   column keys, first cell of each row is the row key;
//! * xy: long table `series,x,y`;
//! * pie: `key,value`.
//!
//! Empty cells are missing values.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

use super::{CategoryDataset, DefaultCategoryDataset, DefaultPieDataset, XySeries, XySeriesCollection};
use crate::error::{ChartError, ChartResult};

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(input)
}

fn parse_cell(cell: &str, line: usize) -> ChartResult<Option<f64>> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|_| ChartError::invalid(format!("line {line}: '{cell}' is not a number")))
}

fn field<'a>(record: &'a StringRecord, index: usize, line: usize) -> ChartResult<&'a str> {
    record
        .get(index)
        .ok_or_else(|| ChartError::invalid(format!("line {line}: missing column {}", index + 1)))
}

pub fn read_category_csv<R: Read>(input: R) -> ChartResult<DefaultCategoryDataset> {
    let mut rdr = reader(input);
    let columns: Vec<String> = rdr.headers()?.iter().skip(1).map(str::to_string).collect();
    let mut ds = DefaultCategoryDataset::new();
    ds.notifier().set_notify(false);
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let line = i + 2;
        let row_key = field(&record, 0, line)?.to_string();
        for (c, column) in columns.iter().enumerate() {
            let value = parse_cell(record.get(c + 1).unwrap_or(""), line)?;
            ds.set_value(value, &row_key, column);
        }
    }
    ds.notifier().set_notify(true);
    log::debug!(
        "loaded category dataset: {} rows x {} columns",
        ds.row_count(),
        ds.column_count()
    );
    Ok(ds)
}

pub fn load_category_csv<P: AsRef<Path>>(path: P) -> ChartResult<DefaultCategoryDataset> {
    read_category_csv(File::open(path)?)
}

pub fn read_xy_csv<R: Read>(input: R) -> ChartResult<XySeriesCollection> {
    let mut rdr = reader(input);
    let mut series: Vec<XySeries> = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let line = i + 2;
        let key = field(&record, 0, line)?;
        let x = parse_cell(field(&record, 1, line)?, line)?
            .ok_or_else(|| ChartError::invalid(format!("line {line}: x is required")))?;
        let y = parse_cell(record.get(2).unwrap_or(""), line)?;
        let at = match series.iter().position(|s| s.key() == key) {
            Some(at) => at,
            None => {
                series.push(XySeries::new(key));
                series.len() - 1
            }
        };
        series[at].add(x, y)?;
    }
    let mut collection = XySeriesCollection::new();
    for s in series {
        collection.add_series(s);
    }
    Ok(collection)
}

pub fn load_xy_csv<P: AsRef<Path>>(path: P) -> ChartResult<XySeriesCollection> {
    read_xy_csv(File::open(path)?)
}

pub fn read_pie_csv<R: Read>(input: R) -> ChartResult<DefaultPieDataset> {
    let mut rdr = reader(input);
    let mut ds = DefaultPieDataset::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let line = i + 2;
        let key = field(&record, 0, line)?;
        let value = parse_cell(record.get(1).unwrap_or(""), line)?;
        ds.set_value(key, value);
    }
    Ok(ds)
}

pub fn load_pie_csv<P: AsRef<Path>>(path: P) -> ChartResult<DefaultPieDataset> {
    read_pie_csv(File::open(path)?)
}

/// Save a category dataset as a wide table with header.
pub fn write_category_csv<P: AsRef<Path>>(ds: &dyn CategoryDataset, path: P) -> ChartResult<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    let mut header = vec![String::new()];
    header.extend((0..ds.column_count()).filter_map(|c| ds.column_key(c).map(str::to_string)));
    wtr.write_record(&header)?;
    for r in 0..ds.row_count() {
        let mut row = vec![ds.row_key(r).unwrap_or_default().to_string()];
        row.extend(
            (0..ds.column_count()).map(|c| ds.value(r, c).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{PieDataset, XyDataset};
    use tempfile::tempdir;

    #[test]
    fn category_round_trip_through_file() {
        let ds = read_category_csv("series,Q1,Q2\nA,1,2\nB,,4\n".as_bytes()).unwrap();
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.value(1, 0), None);
        let dir = tempdir().unwrap();
        let p = dir.path().join("cat.csv");
        write_category_csv(&ds, &p).unwrap();
        let back = load_category_csv(&p).unwrap();
        assert_eq!(back.column_keys(), ds.column_keys());
        assert_eq!(back.value(1, 1), Some(4.0));
    }

    #[test]
    fn xy_groups_by_series_in_first_seen_order() {
        let ds = read_xy_csv("series,x,y\nb,1,1\na,0,2\nb,0,3\n".as_bytes()).unwrap();
        assert_eq!(ds.series_key(0), Some("b"));
        assert_eq!(ds.item_count(0), 2);
        assert_eq!(ds.x(0, 0), Some(0.0));
    }

    #[test]
    fn bad_number_reports_line() {
        let err = read_pie_csv("key,value\nA,1\nB,abc\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn pie_keeps_order() {
        let ds = read_pie_csv("key,value\nX,3\nY,1\n".as_bytes()).unwrap();
        assert_eq!(ds.key(1), Some("Y"));
    }
}
