use calheat::{parse_date, DateValue, InputDataError};
use std::io::{self, BufRead};
use thiserror::Error;

/// A value read from a values file, carrying the optional title text given
/// after the count
pub(crate) type Record = DateValue<Option<String>>;

/// Reads one value per line in the form `DATE COUNT [TITLE...]`.  Blank lines
/// and lines starting with `#` are skipped.
pub(crate) fn read_values<R: BufRead>(reader: R) -> Result<Vec<Record>, LoadError> {
    let mut values = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = i + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        values.push(parse_line(line, lineno)?);
    }
    Ok(values)
}

fn parse_line(line: &str, lineno: usize) -> Result<Record, LoadError> {
    let (date, rest) = split_word(line);
    let (count, title) = split_word(rest);
    if count.is_empty() {
        return Err(LoadError::MissingCount { line: lineno });
    }
    let date = parse_date(date).map_err(|source| LoadError::Date {
        line: lineno,
        source,
    })?;
    let count = count
        .parse::<f64>()
        .ok()
        .filter(|c| c.is_finite())
        .ok_or_else(|| LoadError::Count {
            line: lineno,
            count: count.to_owned(),
        })?;
    let title = (!title.is_empty()).then(|| title.to_owned());
    Ok(DateValue::with_meta(date, count, title))
}

/// Title for a cell: the record's own text if it has one, else its count and
/// date
pub(crate) fn describe(value: Option<&Record>) -> Option<String> {
    value.map(|v| {
        v.meta
            .clone()
            .unwrap_or_else(|| format!("{} on {}", v.count, v.date))
    })
}

// Dates in "YYYY-MM-DD HH:MM:SS" form contain a space, so a second word that
// looks like a time of day is kept with the first.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    let Some(i) = s.find(char::is_whitespace) else {
        return (s, "");
    };
    let rest = s[i..].trim_start();
    let next_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let next = &rest[..next_len];
    let bytes = next.as_bytes();
    if bytes.len() == 8 && bytes.get(2) == Some(&b':') && bytes.get(5) == Some(&b':') {
        let end = s.len() - rest.len() + next_len;
        (&s[..end], rest[next_len..].trim_start())
    } else {
        (&s[..i], rest)
    }
}

#[derive(Debug, Error)]
pub(crate) enum LoadError {
    #[error("failed to read values")]
    Read(#[from] io::Error),
    #[error("line {line}: expected a date followed by a count")]
    MissingCount { line: usize },
    #[error("line {line}: {source}")]
    Date {
        line: usize,
        source: InputDataError,
    },
    #[error("line {line}: invalid count {count:?}")]
    Count { line: usize, count: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use time::macros::date;

    #[test]
    fn test_read_values() {
        let text = concat!(
            "# date count title\n",
            "2016-01-01 1\n",
            "\n",
            "2016-01-04   3.5   Deployed the new build\n",
            "2016-01-08T12:00:00Z 5\n",
            "2016-01-09 08:30:00 2 Late\n",
        );
        let values = read_values(Cursor::new(text)).unwrap();
        assert_eq!(
            values,
            [
                DateValue::with_meta(date!(2016 - 01 - 01), 1.0, None),
                DateValue::with_meta(
                    date!(2016 - 01 - 04),
                    3.5,
                    Some(String::from("Deployed the new build"))
                ),
                DateValue::with_meta(date!(2016 - 01 - 08), 5.0, None),
                DateValue::with_meta(date!(2016 - 01 - 09), 2.0, Some(String::from("Late"))),
            ]
        );
    }

    #[test]
    fn test_describe() {
        let titled = DateValue::with_meta(date!(2016 - 01 - 04), 3.0, Some(String::from("Busy")));
        assert_eq!(describe(Some(&titled)).as_deref(), Some("Busy"));
        let plain = DateValue::with_meta(date!(2016 - 01 - 04), 3.5, None);
        assert_eq!(
            describe(Some(&plain)).as_deref(),
            Some("3.5 on 2016-01-04")
        );
        assert_eq!(describe(None), None);
    }

    #[test]
    fn test_missing_count() {
        let r = read_values(Cursor::new("2016-01-01 1\n2016-01-02\n"));
        assert!(matches!(r, Err(LoadError::MissingCount { line: 2 })));
    }

    #[test]
    fn test_bad_date() {
        let r = read_values(Cursor::new("\n\n2016-13-01 1\n"));
        match r {
            Err(e @ LoadError::Date { line: 3, .. }) => assert_eq!(
                e.to_string(),
                "line 3: could not parse \"2016-13-01\" as a date"
            ),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_bad_count() {
        let r = read_values(Cursor::new("2016-01-01 lots\n"));
        assert!(matches!(
            r,
            Err(LoadError::Count { line: 1, ref count }) if count == "lots"
        ));
    }

    #[test]
    fn test_non_finite_count() {
        for bad in ["inf", "-infinity", "NaN"] {
            let r = read_values(Cursor::new(format!("2016-01-01 1\n2016-01-02 {bad}\n")));
            assert!(
                matches!(r, Err(LoadError::Count { line: 2, ref count }) if count == bad),
                "{bad}"
            );
        }
    }
}
