use crate::error::InputDataError;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use time::{
    format_description::{well_known::Rfc3339, FormatItem},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime,
};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

static YMD_HMS_FMT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// One data point of the heatmap: a day, its count, and whatever metadata the
/// caller wants to carry along to its callbacks
#[derive(Clone, Debug, PartialEq)]
pub struct DateValue<M = ()> {
    pub date: Date,
    pub count: f64,
    pub meta: M,
}

impl DateValue<()> {
    pub fn new(date: Date, count: f64) -> DateValue<()> {
        DateValue {
            date,
            count,
            meta: (),
        }
    }
}

impl<M> DateValue<M> {
    pub fn with_meta(date: Date, count: f64, meta: M) -> DateValue<M> {
        DateValue { date, count, meta }
    }
}

/// Parses a calendar date from `YYYY-MM-DD`, an RFC 3339 timestamp, or
/// `YYYY-MM-DD HH:MM:SS`.  Any time of day is discarded.
pub fn parse_date(s: &str) -> Result<Date, InputDataError> {
    let s = s.trim();
    Date::parse(s, &YMD_FMT)
        .or_else(|_| OffsetDateTime::parse(s, &Rfc3339).map(OffsetDateTime::date))
        .or_else(|_| PrimitiveDateTime::parse(s, &YMD_HMS_FMT).map(PrimitiveDateTime::date))
        .map_err(|_| InputDataError::InvalidDate {
            input: s.to_owned(),
        })
}

/// An attribute that is either fixed or computed from the value in a cell
/// (`None` for empty cells)
pub enum ValueFn<T, M = ()> {
    Static(T),
    Computed(Arc<dyn Fn(Option<&DateValue<M>>) -> T + Send + Sync>),
}

impl<T: Clone, M> ValueFn<T, M> {
    pub fn computed<F>(func: F) -> ValueFn<T, M>
    where
        F: Fn(Option<&DateValue<M>>) -> T + Send + Sync + 'static,
    {
        ValueFn::Computed(Arc::new(func))
    }

    pub fn resolve(&self, value: Option<&DateValue<M>>) -> T {
        match self {
            ValueFn::Static(t) => t.clone(),
            ValueFn::Computed(func) => func(value),
        }
    }
}

impl<T: Clone, M> Clone for ValueFn<T, M> {
    fn clone(&self) -> Self {
        match self {
            ValueFn::Static(t) => ValueFn::Static(t.clone()),
            ValueFn::Computed(func) => ValueFn::Computed(Arc::clone(func)),
        }
    }
}

impl<T: fmt::Debug, M> fmt::Debug for ValueFn<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueFn::Static(t) => f.debug_tuple("Static").field(t).finish(),
            ValueFn::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

pub type TooltipAttrs = BTreeMap<String, String>;

/// The caller-supplied per-cell attribute callbacks
#[derive(Clone, Debug)]
pub struct CellCallbacks<M = ()> {
    pub class_for_value: ValueFn<String, M>,
    pub title_for_value: ValueFn<Option<String>, M>,
    pub tooltip_data_attrs: ValueFn<TooltipAttrs, M>,
}

impl<M: 'static> Default for CellCallbacks<M> {
    fn default() -> Self {
        CellCallbacks {
            class_for_value: ValueFn::computed(|v: Option<&DateValue<M>>| {
                String::from(if v.is_some() {
                    "color-filled"
                } else {
                    "color-empty"
                })
            }),
            title_for_value: ValueFn::Static(None),
            tooltip_data_attrs: ValueFn::Static(TooltipAttrs::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_parse_date_forms() {
        assert_eq!(parse_date("2016-04-09"), Ok(date!(2016 - 04 - 09)));
        assert_eq!(parse_date(" 2016-04-09\n"), Ok(date!(2016 - 04 - 09)));
        assert_eq!(
            parse_date("2016-04-09T23:59:59Z"),
            Ok(date!(2016 - 04 - 09))
        );
        assert_eq!(
            parse_date("2016-04-09T00:30:00+05:00"),
            Ok(date!(2016 - 04 - 09))
        );
        assert_eq!(
            parse_date("2016-04-09 13:14:15"),
            Ok(date!(2016 - 04 - 09))
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        for bad in ["", "yesterday", "2016-13-01", "2016-02-30", "04/09/2016"] {
            assert_eq!(
                parse_date(bad),
                Err(InputDataError::InvalidDate {
                    input: bad.to_owned()
                }),
                "input: {bad:?}"
            );
        }
    }

    #[test]
    fn test_default_callbacks() {
        let cbs = CellCallbacks::<()>::default();
        let v = DateValue::new(date!(2016 - 04 - 09), 3.0);
        assert_eq!(cbs.class_for_value.resolve(Some(&v)), "color-filled");
        assert_eq!(cbs.class_for_value.resolve(None), "color-empty");
        assert_eq!(cbs.title_for_value.resolve(Some(&v)), None);
        assert!(cbs.tooltip_data_attrs.resolve(None).is_empty());
    }

    #[test]
    fn test_computed_sees_meta() {
        let title = ValueFn::<Option<String>, String>::computed(|v| {
            v.map(|v| format!("{}: {} on {}", v.meta, v.count, v.date))
        });
        let v = DateValue::with_meta(date!(2016 - 01 - 02), 4.0, String::from("commits"));
        assert_eq!(
            title.resolve(Some(&v)).as_deref(),
            Some("commits: 4 on 2016-01-02")
        );
        assert_eq!(title.resolve(None), None);
    }
}
