use crate::color::{ColorScale, Rgb};
use crate::error::InputDataError;
use crate::layout::GridLayout;
use crate::value::{CellCallbacks, DateValue, TooltipAttrs};
use std::collections::BTreeMap;
use time::Date;

/// Fill color of cells that have no value
pub const EMPTY_FILL: Rgb = Rgb::new(0xee, 0xee, 0xee);

/// Everything a renderer needs to draw a cell that holds a value
#[derive(Clone, Debug, PartialEq)]
pub struct CellAttributes<M = ()> {
    pub value: DateValue<M>,
    pub class_name: String,
    pub title: Option<String>,
    pub fill_color: Rgb,
    pub tooltip_attrs: TooltipAttrs,
}

/// Caller-fixed ends of the count scale.  Whichever end is `None` is taken
/// from the values themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScaleBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// A non-fatal problem noticed while building a cache
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    /// The scale's minimum is not below its maximum, so every value is drawn
    /// in the minimum color
    DegenerateScale { min: f64, max: f64 },
    /// A value's date lies outside the grid; it was left out of the cache
    DroppedValue(InputDataError),
    /// More than one value landed on the same cell; the later one was kept
    DuplicateIndex { index: u32, date: Date },
}

/// The values of a heatmap keyed by grid index, with each cell's attributes
/// computed up front
///
/// A cache belongs to one layout and one set of values.  It is never patched:
/// when either changes, build a new one.
#[derive(Clone, Debug)]
pub struct ValueIndexCache<M = ()> {
    cells: BTreeMap<u32, CellAttributes<M>>,
    empty_class: String,
    empty_title: Option<String>,
    empty_tooltip_attrs: TooltipAttrs,
    bounds: Option<(f64, f64)>,
    diagnostics: Vec<Diagnostic>,
}

impl<M: Clone> ValueIndexCache<M> {
    pub fn build(
        values: &[DateValue<M>],
        layout: &GridLayout,
        scale: &ColorScale,
        bounds: ScaleBounds,
        callbacks: &CellCallbacks<M>,
    ) -> ValueIndexCache<M> {
        let resolved = resolve_bounds(values, bounds);
        let mut diagnostics = Vec::new();
        let percent_of = match resolved {
            Some((min, max)) if max > min => Some((min, max - min)),
            Some((min, max)) => {
                log::debug!("Degenerate count scale {min}..{max}; using minimum color");
                diagnostics.push(Diagnostic::DegenerateScale { min, max });
                None
            }
            None => None,
        };
        let (cells, diagnostics) = values.iter().fold(
            (BTreeMap::new(), diagnostics),
            |(mut cells, mut diagnostics), value| {
                let Some(index) = layout.index_for_date(value.date) else {
                    let err = InputDataError::OutOfRange {
                        date: value.date,
                        grid_start: layout.grid_start_date(),
                        grid_end: layout.grid_end_date(),
                    };
                    log::warn!("Dropping value: {err}");
                    diagnostics.push(Diagnostic::DroppedValue(err));
                    return (cells, diagnostics);
                };
                let percent = percent_of.map_or(0.0, |(min, span)| (value.count - min) / span);
                let attrs = CellAttributes {
                    value: value.clone(),
                    class_name: callbacks.class_for_value.resolve(Some(value)),
                    title: callbacks.title_for_value.resolve(Some(value)),
                    fill_color: scale.at(percent),
                    tooltip_attrs: callbacks.tooltip_data_attrs.resolve(Some(value)),
                };
                if cells.insert(index, attrs).is_some() {
                    log::warn!("More than one value for {}; keeping the last", value.date);
                    diagnostics.push(Diagnostic::DuplicateIndex {
                        index,
                        date: value.date,
                    });
                }
                (cells, diagnostics)
            },
        );
        log::debug!(
            "Built value cache: {} of {} values placed on {} cells",
            cells.len(),
            values.len(),
            layout.cell_count()
        );
        ValueIndexCache {
            cells,
            empty_class: callbacks.class_for_value.resolve(None),
            empty_title: callbacks.title_for_value.resolve(None),
            empty_tooltip_attrs: callbacks.tooltip_data_attrs.resolve(None),
            bounds: resolved,
            diagnostics,
        }
    }
}

impl<M> ValueIndexCache<M> {
    pub fn get(&self, index: u32) -> Option<&CellAttributes<M>> {
        self.cells.get(&index)
    }

    pub fn value_at(&self, index: u32) -> Option<&DateValue<M>> {
        self.get(index).map(|c| &c.value)
    }

    pub fn class_at(&self, index: u32) -> &str {
        self.get(index).map_or(&self.empty_class, |c| &c.class_name)
    }

    pub fn title_at(&self, index: u32) -> Option<&str> {
        match self.get(index) {
            Some(c) => c.title.as_deref(),
            None => self.empty_title.as_deref(),
        }
    }

    pub fn fill_color_at(&self, index: u32) -> Rgb {
        self.get(index).map_or(EMPTY_FILL, |c| c.fill_color)
    }

    pub fn tooltip_attrs_at(&self, index: u32) -> &TooltipAttrs {
        self.get(index)
            .map_or(&self.empty_tooltip_attrs, |c| &c.tooltip_attrs)
    }

    /// The `(min, max)` counts the colors were scaled between, or `None` if
    /// there was nothing to scale
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.bounds
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, u32, CellAttributes<M>> {
        self.cells.iter()
    }
}

impl<'a, M> IntoIterator for &'a ValueIndexCache<M> {
    type Item = (&'a u32, &'a CellAttributes<M>);
    type IntoIter = std::collections::btree_map::Iter<'a, u32, CellAttributes<M>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn resolve_bounds<M>(values: &[DateValue<M>], bounds: ScaleBounds) -> Option<(f64, f64)> {
    let counts = values.iter().map(|v| v.count).filter(|c| c.is_finite());
    let (lo, hi) = counts.fold(None, |acc: Option<(f64, f64)>, c| match acc {
        Some((lo, hi)) => Some((lo.min(c), hi.max(c))),
        None => Some((c, c)),
    })?;
    Some((bounds.min.unwrap_or(lo), bounds.max.unwrap_or(hi)))
}
