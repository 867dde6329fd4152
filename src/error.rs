use thiserror::Error;
use time::Date;

/// A problem with the dates or day count supplied to the heatmap
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum InputDataError {
    #[error("could not parse {input:?} as a date")]
    InvalidDate { input: String },

    #[error("number of days must not be negative, got {0}")]
    NegativeDayCount(i64),

    #[error("date range ending {end_date} and spanning {num_days} days does not fit in the calendar")]
    DateOverflow { end_date: Date, num_days: u32 },

    #[error("{date} lies outside the grid spanning {grid_start} to {grid_end}")]
    OutOfRange {
        date: Date,
        grid_start: Date,
        grid_end: Date,
    },
}

/// A color string that could not be resolved to an RGB triple
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("could not parse {input:?} as a color")]
pub struct ColorParseError {
    input: String,
}

impl ColorParseError {
    pub(crate) fn new<S: Into<String>>(input: S) -> ColorParseError {
        ColorParseError {
            input: input.into(),
        }
    }

    /// The offending color string, as given by the caller
    pub fn input(&self) -> &str {
        &self.input
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputDataError),

    #[error(transparent)]
    Color(#[from] ColorParseError),
}
