//! blockchart
//!
//! A small 2D charting library: charts are laid out as nested blocks (titles,
//! legends, the plot), drawn onto a [`Canvas`], and every drawn item can be
//! recorded as a hit-testable [`ChartEntity`]. Pairs with the `blockchart` CLI
//! and the `blockchart-viewer` desktop app.
//!
//! ### Features
//! - Block layout with border, column, flow and grid arrangements
//! - Text titles, legends and composite titles on any chart edge
//! - XY line, bar and pie plots with auto-ranging number axes
//! - PNG/JPEG/SVG export, HTML image maps and JSON entity dumps
//! - A buffered viewport with tooltips, zooming and panning
//!
//! ### Example
//! ```no_run
//! use std::{cell::RefCell, rc::Rc};
//! use blockchart::{ChartRenderingInfo, PlotOrientation, XySeries, XySeriesCollection};
//!
//! let mut series = XySeries::new("Population");
//! series.add(2010.0, Some(80.3))?;
//! series.add(2020.0, Some(83.2))?;
//! let mut data = XySeriesCollection::new();
//! data.add_series(series);
//!
//! let mut chart = blockchart::factory::create_line_chart(
//!     Some("Germany"),
//!     Some("Year"),
//!     Some("Millions"),
//!     Rc::new(RefCell::new(data)),
//!     PlotOrientation::Vertical,
//!     true,
//! );
//! let mut info = ChartRenderingInfo::new();
//! blockchart::export::save_png(&mut chart, "pop.png", 800, 600, Some(&mut info))?;
//! std::fs::write("pop.html", blockchart::imagemap::write_image_map("pop", &info))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod axis;
pub mod block;
pub mod canvas;
pub mod chart;
pub mod config;
pub mod data;
pub mod entity;
pub mod error;
pub mod event;
pub mod export;
pub mod factory;
pub mod geom;
pub mod imagemap;
pub mod legend;
pub mod paint;
pub mod plot;
pub mod text;
pub mod title;
pub mod viewport;

pub use canvas::Canvas;
pub use chart::Chart;
pub use config::ChartConfig;
pub use data::{DefaultCategoryDataset, DefaultPieDataset, XySeries, XySeriesCollection};
pub use entity::{ChartEntity, ChartRenderingInfo, EntityCollection};
pub use error::{ChartError, ChartResult};
pub use export::{ExporterRegistry, ImageFormat, RasterImage};
pub use factory::{ChartData, ChartKind};
pub use geom::{Rect, RectangleEdge, Size2D};
pub use plot::{CategoryPlot, PiePlot, Plot, PlotOrientation, XyPlot};
pub use title::{LegendTitle, TextTitle, Title};
pub use viewport::ChartViewport;
