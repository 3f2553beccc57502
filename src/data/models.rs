// src/data/models.rs
use chrono::NaiveDate;

/// One parsed CSV row before sorting
#[derive(Debug, Clone, PartialEq)]
pub struct MoodRecord {
    pub date: NaiveDate,
    /// Market Mood Index, `None` when the cell was empty
    pub mmi: Option<f64>,
    /// Nifty index level
    pub nifty: f64,
}

/// Date-sorted MMI / Nifty table, stored column by column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoodSeries {
    pub dates: Vec<NaiveDate>,
    pub mmi: Vec<Option<f64>>,
    pub nifty: Vec<f64>,
}

impl MoodSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from records, sorting ascending by date.
    ///
    /// The sort is stable, so rows sharing a date keep their file order.
    pub fn from_records(mut records: Vec<MoodRecord>) -> Self {
        records.sort_by_key(|r| r.date);

        let mut series = Self {
            dates: Vec::with_capacity(records.len()),
            mmi: Vec::with_capacity(records.len()),
            nifty: Vec::with_capacity(records.len()),
        };

        for record in records {
            series.push(record);
        }

        series
    }

    pub fn push(&mut self, record: MoodRecord) {
        self.dates.push(record.date);
        self.mmi.push(record.mmi);
        self.nifty.push(record.nifty);
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Calendar days between the first and last row
    pub fn elapsed_days(&self) -> Option<i64> {
        match (self.first_date(), self.last_date()) {
            (Some(first), Some(last)) => Some((last - first).num_days()),
            _ => None,
        }
    }

    /// Number of rows carrying an MMI value
    pub fn defined_mmi_count(&self) -> usize {
        self.mmi.iter().filter(|v| v.is_some()).count()
    }

    /// Dates that appear more than once (input is sorted, so duplicates are adjacent)
    pub fn duplicate_dates(&self) -> Vec<NaiveDate> {
        let mut duplicates: Vec<NaiveDate> = self
            .dates
            .windows(2)
            .filter(|w| w[0] == w[1])
            .map(|w| w[0])
            .collect();
        duplicates.dedup();
        duplicates
    }
}
