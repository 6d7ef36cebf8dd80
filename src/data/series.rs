use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("Dates must be strictly increasing: {current} follows {previous}")]
    UnorderedDates {
        previous: NaiveDate,
        current: NaiveDate,
    },
    #[error("Invalid close price {close} on {date}: must be finite and positive")]
    InvalidClose { date: NaiveDate, close: f64 },
    #[error("Got {dates} dates but {closes} closes")]
    LengthMismatch { dates: usize, closes: usize },
}

//a single daily closing price
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        PricePoint { date, close }
    }
}

//ordered daily closes, dates strictly increasing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    //creates a validated series
    pub fn new(points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        for point in &points {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(SeriesError::InvalidClose {
                    date: point.date,
                    close: point.close,
                });
            }
        }

        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::UnorderedDates {
                    previous: pair[0].date,
                    current: pair[1].date,
                });
            }
        }

        Ok(PriceSeries { points })
    }

    //builds a series from parallel date and close slices
    pub fn from_parts(dates: &[NaiveDate], closes: &[f64]) -> Result<Self, SeriesError> {
        if dates.len() != closes.len() {
            return Err(SeriesError::LengthMismatch {
                dates: dates.len(),
                closes: closes.len(),
            });
        }

        let points = dates
            .iter()
            .zip(closes)
            .map(|(&date, &close)| PricePoint::new(date, close))
            .collect();
        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    //restricts the series to an inclusive date window
    pub fn between(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> PriceSeries {
        let points = self
            .points
            .iter()
            .filter(|p| start.map_or(true, |s| p.date >= s))
            .filter(|p| end.map_or(true, |e| p.date <= e))
            .copied()
            .collect();

        //a subsequence of an ordered series stays ordered
        PriceSeries { points }
    }
}

//position signals, one per price date
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalSeries {
    values: Vec<f64>,
}

impl SignalSeries {
    pub fn new(values: Vec<f64>) -> Self {
        SignalSeries { values }
    }

    //the same signal repeated len times
    pub fn constant(value: f64, len: usize) -> Self {
        SignalSeries {
            values: vec![value; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }
}

impl From<Vec<f64>> for SignalSeries {
    fn from(values: Vec<f64>) -> Self {
        SignalSeries::new(values)
    }
}
