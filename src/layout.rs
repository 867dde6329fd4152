//! Mapping a date range onto a grid of week columns (or rows) and the pixel
//! geometry a renderer needs to draw it
use crate::error::InputDataError;
use time::{Date, Duration, Month};

pub const DAYS_IN_WEEK: u32 = 7;

/// Side length of one day's square, in pixels
pub const SQUARE_SIZE: u32 = 10;

/// Space between the month labels and the squares, in pixels
pub const MONTH_LABEL_GUTTER_SIZE: u32 = 4;

pub static MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Whether weeks run left-to-right as columns (`Horizontal`) or top-to-bottom
/// as rows (`Vertical`)
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// A pixel offset from the origin of the enclosing group
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: u32, y: u32) -> Point {
        Point { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ViewBox {
    pub min_x: u32,
    pub min_y: u32,
    pub width: u32,
    pub height: u32,
}

/// A month name to draw above (or beside) a week
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MonthLabel {
    pub week_index: u32,
    pub month: Month,
    pub text: &'static str,
    pub position: Point,
}

/// A square to draw, with its place in the grid and its offset within its
/// week's group
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct GridCell {
    pub week_index: u32,
    pub day_index: u32,
    pub index: u32,
    pub position: Point,
}

/// The layout of a heatmap ending on `end_date` and covering `num_days` days
///
/// Weeks start on Sunday: day index 0 is Sunday and 6 is Saturday,
/// independent of locale.  Grid index 0 is the Sunday on or before the first
/// day in the range.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct GridLayout {
    end_date: Date,
    start_date: Date,
    grid_start: Date,
    grid_end: Date,
    num_days: u32,
    empty_days_at_start: u32,
    empty_days_at_end: u32,
    orientation: Orientation,
    gutter_size: u32,
    show_month_labels: bool,
}

impl GridLayout {
    /// Lays out `num_days` days ending on (and including) `end_date`.  A
    /// `num_days` of zero yields an empty grid; a negative count is rejected.
    pub fn new(end_date: Date, num_days: i64) -> Result<GridLayout, InputDataError> {
        let num_days =
            u32::try_from(num_days).map_err(|_| InputDataError::NegativeDayCount(num_days))?;
        let empty = GridLayout {
            end_date,
            start_date: end_date,
            grid_start: end_date,
            grid_end: end_date,
            num_days: 0,
            empty_days_at_start: 0,
            empty_days_at_end: 0,
            orientation: Orientation::default(),
            gutter_size: 1,
            show_month_labels: true,
        };
        if num_days == 0 {
            return Ok(empty);
        }
        let overflow = InputDataError::DateOverflow { end_date, num_days };
        let start_date = end_date
            .checked_sub(Duration::days(i64::from(num_days - 1)))
            .ok_or_else(|| overflow.clone())?;
        let empty_days_at_start = weekday_index(start_date);
        let empty_days_at_end = DAYS_IN_WEEK - 1 - weekday_index(end_date);
        let grid_start = start_date
            .checked_sub(Duration::days(i64::from(empty_days_at_start)))
            .ok_or_else(|| overflow.clone())?;
        // The end of the last week must be representable too, so that every
        // grid index maps to a date.
        let grid_end = end_date
            .checked_add(Duration::days(i64::from(empty_days_at_end)))
            .ok_or(overflow)?;
        Ok(GridLayout {
            start_date,
            grid_start,
            grid_end,
            num_days,
            empty_days_at_start,
            empty_days_at_end,
            ..empty
        })
    }

    pub fn orientation(mut self, orientation: Orientation) -> GridLayout {
        self.orientation = orientation;
        self
    }

    /// Sets the space between squares.  Pixel geometry saturates at
    /// `u32::MAX` when a gutter is too large to lay out.
    pub fn gutter_size(mut self, gutter_size: u32) -> GridLayout {
        self.gutter_size = gutter_size;
        self
    }

    pub fn show_month_labels(mut self, show: bool) -> GridLayout {
        self.show_month_labels = show;
        self
    }

    pub fn get_orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }

    pub fn end_date(&self) -> Date {
        self.end_date
    }

    /// The first day in the range, `num_days - 1` days before `end_date`.
    /// An empty range starts and ends on `end_date`.
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// The date at grid index 0
    pub fn grid_start_date(&self) -> Date {
        self.grid_start
    }

    /// The Saturday closing the last week, which is `end_date` itself for an
    /// empty grid
    pub fn grid_end_date(&self) -> Date {
        self.grid_end
    }

    pub fn num_days(&self) -> u32 {
        self.num_days
    }

    pub fn num_empty_days_at_start(&self) -> u32 {
        self.empty_days_at_start
    }

    pub fn num_empty_days_at_end(&self) -> u32 {
        self.empty_days_at_end
    }

    pub fn week_count(&self) -> u32 {
        (self.num_days + self.empty_days_at_start + self.empty_days_at_end).div_ceil(DAYS_IN_WEEK)
    }

    /// The number of grid cells, padding included
    pub fn cell_count(&self) -> u32 {
        self.week_count() * DAYS_IN_WEEK
    }

    /// Returns the grid index of `date`, or `None` if it falls outside the
    /// padded grid
    pub fn index_for_date(&self, date: Date) -> Option<u32> {
        let offset = (date - self.grid_start).whole_days();
        u32::try_from(offset)
            .ok()
            .filter(|&i| i < self.cell_count())
    }

    pub fn date_for_index(&self, index: u32) -> Option<Date> {
        if index < self.cell_count() {
            self.grid_start
                .checked_add(Duration::days(i64::from(index)))
        } else {
            None
        }
    }

    /// True if `index` is a day of the range rather than padding
    pub fn in_range(&self, index: u32) -> bool {
        index >= self.empty_days_at_start && index < self.empty_days_at_start + self.num_days
    }

    /// Returns the (week, day-of-week) position of a grid index
    pub fn week_and_day(index: u32) -> (u32, u32) {
        (index / DAYS_IN_WEEK, index % DAYS_IN_WEEK)
    }

    pub fn square_size_with_gutter(&self) -> u32 {
        SQUARE_SIZE.saturating_add(self.gutter_size)
    }

    pub fn week_width(&self) -> u32 {
        DAYS_IN_WEEK.saturating_mul(self.square_size_with_gutter())
    }

    pub fn month_label_size(&self) -> u32 {
        if !self.show_month_labels {
            0
        } else if self.is_horizontal() {
            SQUARE_SIZE + MONTH_LABEL_GUTTER_SIZE
        } else {
            2 * (SQUARE_SIZE + MONTH_LABEL_GUTTER_SIZE)
        }
    }

    /// Extent of the grid along the direction the weeks advance
    pub fn width(&self) -> u32 {
        self.week_count()
            .saturating_mul(self.square_size_with_gutter())
            .saturating_sub(self.gutter_size)
    }

    /// Extent of the grid across a week, month labels included
    pub fn height(&self) -> u32 {
        self.week_width()
            .saturating_add(self.month_label_size())
            .saturating_sub(self.gutter_size)
    }

    pub fn view_box(&self) -> ViewBox {
        let (width, height) = if self.is_horizontal() {
            (self.width(), self.height())
        } else {
            (self.height(), self.width())
        };
        ViewBox {
            min_x: 0,
            min_y: 0,
            width,
            height,
        }
    }

    /// Offset of the group holding all of the weeks
    pub fn all_weeks_offset(&self) -> Point {
        if self.is_horizontal() {
            Point::new(0, self.month_label_size())
        } else {
            Point::ORIGIN
        }
    }

    /// Offset of the group holding all of the month labels
    pub fn month_labels_offset(&self) -> Point {
        if self.is_horizontal() {
            Point::ORIGIN
        } else {
            Point::new(self.week_width().saturating_add(MONTH_LABEL_GUTTER_SIZE), 0)
        }
    }

    /// Offset of a week's group within the group of all weeks
    pub fn week_offset(&self, week_index: u32) -> Point {
        let along = week_index.saturating_mul(self.square_size_with_gutter());
        if self.is_horizontal() {
            Point::new(along, 0)
        } else {
            Point::new(0, along)
        }
    }

    /// Offset of a day's square within its week's group.  Days run down a
    /// week column when horizontal and across a week row when vertical.
    pub fn square_coordinates(&self, day_index: u32) -> Point {
        let across = day_index.saturating_mul(self.square_size_with_gutter());
        if self.is_horizontal() {
            Point::new(0, across)
        } else {
            Point::new(across, 0)
        }
    }

    /// Position of the month label for a week within the month label group
    pub fn month_label_coordinates(&self, week_index: u32) -> Point {
        if self.is_horizontal() {
            Point::new(
                week_index.saturating_mul(self.square_size_with_gutter()),
                self.month_label_size()
                    .saturating_sub(MONTH_LABEL_GUTTER_SIZE),
            )
        } else {
            Point::new(
                0,
                week_index
                    .saturating_add(1)
                    .saturating_mul(self.square_size_with_gutter())
                    .saturating_sub(2),
            )
        }
    }

    /// Returns the month labels to draw.  A week gets a label when the week
    /// after it begins within the first seven days of a month.  The last week
    /// never gets one, as it would run off the edge of the grid.
    pub fn month_labels(&self) -> Vec<MonthLabel> {
        if !self.show_month_labels {
            return Vec::new();
        }
        (0..self.week_count().saturating_sub(1))
            .filter_map(|week_index| {
                let next_week = self.date_for_index((week_index + 1) * DAYS_IN_WEEK)?;
                (next_week.day() <= 7).then(|| {
                    let month = next_week.month();
                    MonthLabel {
                        week_index,
                        month,
                        text: MONTH_LABELS[usize::from(u8::from(month) - 1)],
                        position: self.month_label_coordinates(week_index),
                    }
                })
            })
            .collect()
    }

    /// Iterates over the cells a renderer should draw, in index order.
    /// Padding cells before the start and after the end of the range are
    /// skipped unless `include_out_of_range` is set.
    pub fn cells(&self, include_out_of_range: bool) -> impl Iterator<Item = GridCell> + '_ {
        (0..self.cell_count())
            .filter(move |&i| include_out_of_range || self.in_range(i))
            .map(move |index| {
                let (week_index, day_index) = GridLayout::week_and_day(index);
                GridCell {
                    week_index,
                    day_index,
                    index,
                    position: self.square_coordinates(day_index),
                }
            })
    }
}

/// Day of the week counted from Sunday (0) to Saturday (6)
pub fn weekday_index(date: Date) -> u32 {
    u32::from(date.weekday().number_days_from_sunday())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::Month::*;

    #[test]
    fn test_scenario_200_days() {
        let layout = GridLayout::new(date!(2016 - 04 - 09), 200).unwrap();
        // 2016 is a leap year, so 199 days back lands on Wednesday the 23rd
        assert_eq!(layout.start_date(), date!(2015 - 09 - 23));
        assert_eq!(layout.num_empty_days_at_start(), 3);
        assert_eq!(layout.grid_start_date(), date!(2015 - 09 - 20));
        // 2016-04-09 was a Saturday
        assert_eq!(layout.num_empty_days_at_end(), 0);
        assert_eq!(layout.week_count(), 29);
        assert_eq!(layout.cell_count(), 203);
    }

    #[test]
    fn test_single_day() {
        let layout = GridLayout::new(date!(2023 - 11 - 16), 1).unwrap();
        assert_eq!(layout.start_date(), date!(2023 - 11 - 16));
        assert_eq!(layout.num_empty_days_at_start(), 4);
        assert_eq!(layout.num_empty_days_at_end(), 2);
        assert_eq!(layout.week_count(), 1);
        assert!(!layout.in_range(3));
        assert!(layout.in_range(4));
        assert!(!layout.in_range(5));
    }

    #[test]
    fn test_zero_days_is_empty() {
        let layout = GridLayout::new(date!(2023 - 11 - 16), 0).unwrap();
        assert_eq!(layout.week_count(), 0);
        assert_eq!(layout.cell_count(), 0);
        assert_eq!(layout.width(), 0);
        assert_eq!(layout.cells(true).count(), 0);
        assert!(layout.month_labels().is_empty());
        assert_eq!(layout.index_for_date(date!(2023 - 11 - 16)), None);
    }

    #[test]
    fn test_zero_days_at_end_of_time() {
        let layout = GridLayout::new(Date::MAX, 0).unwrap();
        assert_eq!(layout.start_date(), Date::MAX);
        assert_eq!(layout.grid_end_date(), Date::MAX);
        assert_eq!(layout.cell_count(), 0);
        assert!(GridLayout::new(Date::MAX, 1).is_err());
    }

    #[test]
    fn test_grid_end_includes_trailing_padding() {
        // 2016-04-06 was a Wednesday
        let layout = GridLayout::new(date!(2016 - 04 - 06), 30).unwrap();
        assert_eq!(layout.num_empty_days_at_end(), 3);
        assert_eq!(layout.grid_end_date(), date!(2016 - 04 - 09));
        assert_eq!(
            layout.date_for_index(layout.cell_count() - 1),
            Some(layout.grid_end_date())
        );
    }

    #[test]
    fn test_huge_gutter_saturates() {
        let layout = GridLayout::new(date!(2016 - 04 - 09), 200)
            .unwrap()
            .gutter_size(u32::MAX - 5);
        assert_eq!(layout.square_size_with_gutter(), u32::MAX);
        assert_eq!(layout.week_width(), u32::MAX);
        assert_eq!(layout.width(), 5);
        assert_eq!(layout.height(), 5);
        assert_eq!(layout.week_offset(3), Point::new(u32::MAX, 0));
        assert_eq!(layout.week_offset(0), Point::ORIGIN);
        assert_eq!(layout.square_coordinates(6), Point::new(0, u32::MAX));
        assert_eq!(layout.month_label_coordinates(2).x, u32::MAX);
        let vertical = layout.orientation(Orientation::Vertical);
        assert_eq!(vertical.month_labels_offset(), Point::new(u32::MAX, 0));
        assert_eq!(vertical.month_label_coordinates(2).y, u32::MAX - 2);
        assert_eq!(vertical.cells(false).count(), 200);
    }

    #[test]
    fn test_negative_days_rejected() {
        assert_eq!(
            GridLayout::new(date!(2023 - 11 - 16), -1),
            Err(InputDataError::NegativeDayCount(-1))
        );
    }

    #[test]
    fn test_overflow_rejected() {
        let end = Date::MIN.checked_add(Duration::days(2)).unwrap();
        assert_eq!(
            GridLayout::new(end, 10),
            Err(InputDataError::DateOverflow {
                end_date: end,
                num_days: 10
            })
        );
    }

    #[test]
    fn test_padding_fills_whole_weeks() {
        let mut end = date!(2023 - 12 - 31);
        for _ in 0..14 {
            for num_days in [1, 2, 6, 7, 8, 30, 31, 365, 366] {
                let layout = GridLayout::new(end, num_days).unwrap();
                let total = layout.num_empty_days_at_start()
                    + layout.num_days()
                    + layout.num_empty_days_at_end();
                assert_eq!(total % DAYS_IN_WEEK, 0, "end={end} num_days={num_days}");
                assert_eq!(layout.cell_count(), total);
                assert_eq!(weekday_index(layout.grid_start_date()), 0);
            }
            end = end.next_day().unwrap();
        }
    }

    #[test]
    fn test_index_date_round_trip() {
        let layout = GridLayout::new(date!(2016 - 04 - 09), 200).unwrap();
        assert_eq!(layout.index_for_date(date!(2015 - 09 - 20)), Some(0));
        assert_eq!(layout.index_for_date(date!(2015 - 09 - 23)), Some(3));
        assert_eq!(layout.index_for_date(date!(2016 - 04 - 09)), Some(202));
        assert_eq!(layout.index_for_date(date!(2015 - 09 - 19)), None);
        assert_eq!(layout.index_for_date(date!(2016 - 04 - 10)), None);
        for i in 0..layout.cell_count() {
            let d = layout.date_for_index(i).unwrap();
            assert_eq!(layout.index_for_date(d), Some(i));
        }
        assert_eq!(layout.date_for_index(203), None);
    }

    #[test]
    fn test_horizontal_geometry() {
        let layout = GridLayout::new(date!(2016 - 04 - 09), 200).unwrap();
        assert_eq!(layout.square_size_with_gutter(), 11);
        assert_eq!(layout.week_width(), 77);
        assert_eq!(layout.month_label_size(), 14);
        assert_eq!(layout.width(), 29 * 11 - 1);
        assert_eq!(layout.height(), 77 + 14 - 1);
        assert_eq!(
            layout.view_box(),
            ViewBox {
                min_x: 0,
                min_y: 0,
                width: 318,
                height: 90
            }
        );
        assert_eq!(layout.square_coordinates(3), Point::new(0, 33));
        assert_eq!(layout.week_offset(2), Point::new(22, 0));
        assert_eq!(layout.all_weeks_offset(), Point::new(0, 14));
        assert_eq!(layout.month_labels_offset(), Point::ORIGIN);
        assert_eq!(layout.month_label_coordinates(5), Point::new(55, 10));
    }

    #[test]
    fn test_vertical_geometry() {
        let layout = GridLayout::new(date!(2016 - 04 - 09), 200)
            .unwrap()
            .orientation(Orientation::Vertical)
            .gutter_size(2);
        assert_eq!(layout.square_size_with_gutter(), 12);
        assert_eq!(layout.month_label_size(), 28);
        assert_eq!(layout.width(), 29 * 12 - 2);
        assert_eq!(layout.height(), 84 + 28 - 2);
        assert_eq!(
            layout.view_box(),
            ViewBox {
                min_x: 0,
                min_y: 0,
                width: 110,
                height: 346
            }
        );
        assert_eq!(layout.square_coordinates(3), Point::new(36, 0));
        assert_eq!(layout.week_offset(2), Point::new(0, 24));
        assert_eq!(layout.all_weeks_offset(), Point::ORIGIN);
        assert_eq!(layout.month_labels_offset(), Point::new(88, 0));
        assert_eq!(layout.month_label_coordinates(0), Point::new(0, 10));
    }

    #[test]
    fn test_hidden_month_labels() {
        let layout = GridLayout::new(date!(2016 - 04 - 09), 200)
            .unwrap()
            .show_month_labels(false);
        assert_eq!(layout.month_label_size(), 0);
        assert_eq!(layout.height(), 76);
        assert!(layout.month_labels().is_empty());
    }

    #[test]
    fn test_month_labels() {
        // Range starts Monday 2024-01-01, so the grid starts the day before
        let layout = GridLayout::new(date!(2024 - 03 - 09), 69).unwrap();
        assert_eq!(layout.grid_start_date(), date!(2023 - 12 - 31));
        let labels = layout
            .month_labels()
            .into_iter()
            .map(|l| (l.week_index, l.month, l.text))
            .collect::<Vec<_>>();
        assert_eq!(
            labels,
            [
                (0, January, "Jan"),
                (4, February, "Feb"),
                (8, March, "Mar"),
            ]
        );
    }

    #[test]
    fn test_cells_skip_padding() {
        let layout = GridLayout::new(date!(2023 - 11 - 16), 3).unwrap();
        // Tue 14th .. Thu 16th
        let inner = layout.cells(false).map(|c| c.index).collect::<Vec<_>>();
        assert_eq!(inner, [2, 3, 4]);
        let all = layout.cells(true).collect::<Vec<_>>();
        assert_eq!(all.len(), 7);
        assert_eq!(
            all[6],
            GridCell {
                week_index: 0,
                day_index: 6,
                index: 6,
                position: Point::new(0, 66),
            }
        );
    }

    #[test]
    fn test_week_and_day() {
        assert_eq!(GridLayout::week_and_day(0), (0, 0));
        assert_eq!(GridLayout::week_and_day(6), (0, 6));
        assert_eq!(GridLayout::week_and_day(7), (1, 0));
        assert_eq!(GridLayout::week_and_day(202), (28, 6));
    }
}
