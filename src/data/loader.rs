// src/data/loader.rs
use crate::data::models::{MoodRecord, MoodSeries};
use crate::error::LoadError;
use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Day-first layouts tried in order; ISO stays year-first.
const DATE_FORMATS: &[&str] = &[
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d-%m-%y",
    "%d/%m/%y",
    "%Y-%m-%d",
    "%Y/%m/%d",
];

/// Reads the three-column (Date, MMI, Nifty) CSV into a sorted series
pub struct SeriesLoader;

impl SeriesLoader {
    /// Load and sort the series stored at `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<MoodSeries, LoadError> {
        let path = path.as_ref();
        info!("Loading MMI series from {}", path.display());

        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let series = Self::from_reader(file)?;
        if series.is_empty() {
            return Err(LoadError::Empty(path.to_path_buf()));
        }

        info!(
            "Loaded {} rows ({} .. {})",
            series.len(),
            series.dates[0],
            series.dates[series.len() - 1]
        );
        Ok(series)
    }

    /// Parse CSV content from any reader. The header row is required but
    /// its names are ignored; columns are mapped by position.
    pub fn from_reader<R: Read>(reader: R) -> Result<MoodSeries, LoadError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if headers.is_empty() {
            // No header row at all; `load` reports this as an empty file
            return Ok(MoodSeries::new());
        }
        if headers.len() != 3 {
            return Err(LoadError::ColumnCount {
                line: 1,
                found: headers.len(),
            });
        }
        debug!("Input columns {:?} mapped to (Date, MMI, Nifty)", headers);

        let mut records = Vec::new();
        for result in csv_reader.records() {
            let row = result?;
            records.push(parse_row(&row)?);
        }

        let series = MoodSeries::from_records(records);

        let duplicates = series.duplicate_dates();
        if !duplicates.is_empty() {
            warn!(
                "{} dates appear more than once (first: {}); rows kept in file order",
                duplicates.len(),
                duplicates[0]
            );
        }

        Ok(series)
    }
}

fn parse_row(row: &StringRecord) -> Result<MoodRecord, LoadError> {
    let line = row.position().map(|p| p.line()).unwrap_or(0);

    if row.len() != 3 {
        return Err(LoadError::ColumnCount {
            line,
            found: row.len(),
        });
    }

    let date = parse_day_first(&row[0]).ok_or_else(|| LoadError::Date {
        line,
        value: row[0].to_string(),
    })?;

    let mmi = match row[1].trim() {
        raw if is_missing(raw) => None,
        raw => Some(parse_number(raw).ok_or_else(|| LoadError::Number {
            line,
            column: "MMI",
            value: raw.to_string(),
        })?),
    };

    let nifty = parse_number(&row[2])
        .filter(|v| *v > 0.0)
        .ok_or_else(|| LoadError::Number {
            line,
            column: "Nifty",
            value: row[2].to_string(),
        })?;

    Ok(MoodRecord { date, mmi, nifty })
}

/// Case-sensitive missing-value markers common in spreadsheet and dataframe
/// exports.
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(raw: &str) -> bool {
    MISSING_MARKERS.contains(&raw)
}

fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a date with day-first precedence, ignoring any time-of-day part
pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split(['T', ' ']).next()?;

    // "12 Mar 2025" has spaces inside the date itself
    let candidates = [raw.trim(), date_part];

    candidates.iter().find_map(|candidate| {
        DATE_FORMATS.iter().find_map(|fmt| {
            NaiveDate::parse_from_str(candidate, fmt)
                .ok()
                // %Y happily reads "25" as year 25; leave two-digit years to %y
                .filter(|date| date.year() >= 100 || fmt.contains("%y"))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_day_first_layouts() {
        assert_eq!(parse_day_first("12-03-2025"), Some(ymd(2025, 3, 12)));
        assert_eq!(parse_day_first("12/03/2025"), Some(ymd(2025, 3, 12)));
        assert_eq!(parse_day_first("12-Mar-2025"), Some(ymd(2025, 3, 12)));
        assert_eq!(parse_day_first("12 Mar 2025"), Some(ymd(2025, 3, 12)));
        assert_eq!(parse_day_first("2025-03-12"), Some(ymd(2025, 3, 12)));
        assert_eq!(parse_day_first("12-03-2025 00:00:00"), Some(ymd(2025, 3, 12)));
        assert_eq!(parse_day_first("12-03-25"), Some(ymd(2025, 3, 12)));
        assert_eq!(parse_day_first("31-02-2025"), None);
        assert_eq!(parse_day_first("yesterday"), None);
    }

    #[test]
    fn loads_and_sorts_rows() {
        let csv = "Date,Market Mood Index,Nifty 50\n\
                   03-01-2024,50,110\n\
                   01-01-2024,80,100\n\
                   02-01-2024,20,105\n";

        let series = SeriesLoader::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(series.dates, vec![ymd(2024, 1, 1), ymd(2024, 1, 2), ymd(2024, 1, 3)]);
        assert_eq!(series.mmi, vec![Some(80.0), Some(20.0), Some(50.0)]);
        assert_eq!(series.nifty, vec![100.0, 105.0, 110.0]);
    }

    #[test]
    fn empty_mmi_cell_is_missing() {
        let csv = "Date,MMI,Nifty\n01-01-2024,,100\n02-01-2024,45.5,\"22,150.25\"\n";
        let series = SeriesLoader::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(series.mmi, vec![None, Some(45.5)]);
        assert_eq!(series.nifty, vec![100.0, 22150.25]);
    }

    #[test]
    fn missing_markers_are_missing() {
        let csv = "Date,MMI,Nifty\n\
                   01-01-2024,NaN,100\n\
                   02-01-2024,NA,101\n\
                   03-01-2024,N/A,102\n\
                   04-01-2024,null,103\n\
                   05-01-2024,#N/A,104\n\
                   06-01-2024,50,105\n";
        let series = SeriesLoader::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(series.mmi, vec![None, None, None, None, None, Some(50.0)]);
        assert_eq!(series.defined_mmi_count(), 1);

        // Matching is case-sensitive
        let csv = "Date,MMI,Nifty\n01-01-2024,NAN,100\n";
        let err = SeriesLoader::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Number { column: "MMI", .. }));
    }

    #[test]
    fn rejects_wrong_column_count() {
        let csv = "Date,MMI\n01-01-2024,50\n";
        let err = SeriesLoader::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::ColumnCount { found: 2, .. }));

        let csv = "Date,MMI,Nifty\n01-01-2024,50,100,7\n";
        let err = SeriesLoader::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::ColumnCount { line: 2, found: 4 }));
    }

    #[test]
    fn rejects_bad_values() {
        let csv = "Date,MMI,Nifty\nnot-a-date,50,100\n";
        let err = SeriesLoader::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Date { line: 2, .. }));

        let csv = "Date,MMI,Nifty\n01-01-2024,high,100\n";
        let err = SeriesLoader::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Number { column: "MMI", .. }));

        let csv = "Date,MMI,Nifty\n01-01-2024,50,-3\n";
        let err = SeriesLoader::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Number { column: "Nifty", .. }));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SeriesLoader::load(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }

    #[test]
    fn blank_file_is_empty() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let err = SeriesLoader::load(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Empty(_)));
    }

    #[test]
    fn header_only_file_is_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,MMI,Nifty").unwrap();

        let err = SeriesLoader::load(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Empty(_)));
    }
}
