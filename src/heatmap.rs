use crate::cache::{ScaleBounds, ValueIndexCache};
use crate::color::{ColorScale, Rgb};
use crate::error::{Error, InputDataError};
use crate::layout::{GridCell, GridLayout, MonthLabel, Orientation};
use crate::selection::{DragRange, DragSelection};
use crate::value::{CellCallbacks, DateValue, TooltipAttrs};
use time::Date;

pub const DEFAULT_MIN_COLOR: &str = "#d6e685";

pub const DEFAULT_MAX_COLOR: &str = "#1e6823";

/// Display options for a heatmap.  The defaults show 200 days in horizontal
/// orientation with month labels and a green gradient.
#[derive(Clone, Debug)]
pub struct HeatmapConfig<M = ()> {
    /// Number of days back from the end date to show, the end date included
    pub num_days: i64,
    pub orientation: Orientation,
    /// Space between squares, in pixels
    pub gutter_size: u32,
    pub show_month_labels: bool,
    /// Whether to draw the days before the start date and after the end date
    /// that share a week with them
    pub show_out_of_range_days: bool,
    pub min_color: String,
    pub max_color: String,
    pub bounds: ScaleBounds,
    pub callbacks: CellCallbacks<M>,
}

impl<M: 'static> Default for HeatmapConfig<M> {
    fn default() -> Self {
        HeatmapConfig {
            num_days: 200,
            orientation: Orientation::Horizontal,
            gutter_size: 1,
            show_month_labels: true,
            show_out_of_range_days: false,
            min_color: String::from(DEFAULT_MIN_COLOR),
            max_color: String::from(DEFAULT_MAX_COLOR),
            bounds: ScaleBounds::default(),
            callbacks: CellCallbacks::default(),
        }
    }
}

/// A calendar heatmap: its layout, its values resolved to cells, and any drag
/// selection in progress
///
/// Every change of end date or values rebuilds the layout and the cache from
/// scratch and abandons the current drag selection.
#[derive(Clone, Debug)]
pub struct Heatmap<M = ()> {
    config: HeatmapConfig<M>,
    scale: ColorScale,
    values: Vec<DateValue<M>>,
    layout: GridLayout,
    cache: ValueIndexCache<M>,
    selection: DragSelection,
}

impl<M: Clone> Heatmap<M> {
    pub fn new(
        end_date: Date,
        values: Vec<DateValue<M>>,
        config: HeatmapConfig<M>,
    ) -> Result<Heatmap<M>, Error> {
        let scale = ColorScale::parse(&config.min_color, &config.max_color)?;
        let layout = Self::make_layout(&config, end_date)?;
        let cache = ValueIndexCache::build(&values, &layout, &scale, config.bounds, &config.callbacks);
        Ok(Heatmap {
            config,
            scale,
            values,
            layout,
            cache,
            selection: DragSelection::new(),
        })
    }

    fn make_layout(config: &HeatmapConfig<M>, end_date: Date) -> Result<GridLayout, Error> {
        Ok(GridLayout::new(end_date, config.num_days)?
            .orientation(config.orientation)
            .gutter_size(config.gutter_size)
            .show_month_labels(config.show_month_labels))
    }

    fn rebuild(&mut self, layout: GridLayout) {
        self.layout = layout;
        self.cache = ValueIndexCache::build(
            &self.values,
            &self.layout,
            &self.scale,
            self.config.bounds,
            &self.config.callbacks,
        );
        self.selection.clear();
    }

    pub fn set_values(&mut self, values: Vec<DateValue<M>>) {
        self.values = values;
        self.rebuild(self.layout);
    }

    /// Moves the end of the range.  On error the heatmap is left unchanged.
    pub fn set_end_date(&mut self, end_date: Date) -> Result<(), Error> {
        let layout = Self::make_layout(&self.config, end_date)?;
        self.rebuild(layout);
        Ok(())
    }

    /// Moves the end of the range by `days` (backwards if negative)
    pub fn scroll(&mut self, days: i64) -> Result<(), Error> {
        let end_date = self.layout.end_date();
        let new_end = i64::from(end_date.to_julian_day())
            .checked_add(days)
            .and_then(|jd| i32::try_from(jd).ok())
            .and_then(|jd| Date::from_julian_day(jd).ok())
            .ok_or(InputDataError::DateOverflow {
                end_date,
                num_days: self.layout.num_days(),
            })?;
        self.set_end_date(new_end)
    }
}

impl<M> Heatmap<M> {
    pub fn config(&self) -> &HeatmapConfig<M> {
        &self.config
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn cache(&self) -> &ValueIndexCache<M> {
        &self.cache
    }

    pub fn values(&self) -> &[DateValue<M>] {
        &self.values
    }

    pub fn color_scale(&self) -> ColorScale {
        self.scale
    }

    /// The cells to draw, honoring `show_out_of_range_days`
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.layout.cells(self.config.show_out_of_range_days)
    }

    pub fn month_labels(&self) -> Vec<MonthLabel> {
        self.layout.month_labels()
    }

    pub fn value_at(&self, index: u32) -> Option<&DateValue<M>> {
        self.cache.value_at(index)
    }

    pub fn class_at(&self, index: u32) -> &str {
        self.cache.class_at(index)
    }

    pub fn title_at(&self, index: u32) -> Option<&str> {
        self.cache.title_at(index)
    }

    pub fn fill_color_at(&self, index: u32) -> Rgb {
        self.cache.fill_color_at(index)
    }

    pub fn tooltip_attrs_at(&self, index: u32) -> &TooltipAttrs {
        self.cache.tooltip_attrs_at(index)
    }

    fn date_at(&self, index: u32) -> Option<Date> {
        self.value_at(index).map(|v| v.date)
    }

    pub fn selection(&self) -> &DragSelection {
        &self.selection
    }

    pub fn drag_press(&mut self, index: u32) {
        let date = self.date_at(index);
        self.selection.press(date);
    }

    pub fn drag_hover(&mut self, index: u32) {
        let date = self.date_at(index);
        self.selection.hover(date);
    }

    pub fn drag_release(&mut self, index: u32) -> Option<DragRange> {
        let date = self.date_at(index);
        self.selection.release(date)
    }

    /// Abandons any drag in progress without selecting anything
    pub fn cancel_drag(&mut self) {
        self.selection.clear();
    }

    /// True if a drag is in progress and the value in this cell falls within
    /// it
    pub fn is_dragged_over(&self, index: u32) -> bool {
        self.date_at(index)
            .is_some_and(|d| self.selection.contains(d))
    }
}
