use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

//how missing per-period returns are treated by a computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingReturns {
    //missing entries count as a flat period (sums, compounding, drawdown)
    FillZero,
    //missing entries are dropped (mean and standard deviation)
    Exclude,
}

//per-period strategy returns aligned with the price dates
//the entry for the final date is always missing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnSeries {
    dates: Vec<NaiveDate>,
    values: Vec<Option<f64>>,
}

impl ReturnSeries {
    //only built by the engine, one value per price date
    pub(crate) fn new(dates: Vec<NaiveDate>, values: Vec<Option<f64>>) -> Self {
        assert_eq!(dates.len(), values.len(), "return dates and values must align");
        ReturnSeries { dates, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    //number of periods with a realized return
    pub fn observed_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    //returns with the given missing-value treatment applied
    pub fn treated(&self, treatment: MissingReturns) -> Vec<f64> {
        match treatment {
            MissingReturns::FillZero => self.values.iter().map(|v| v.unwrap_or(0.0)).collect(),
            MissingReturns::Exclude => self.values.iter().flatten().copied().collect(),
        }
    }
}

//a point on the cumulative return curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub date: NaiveDate,
    pub value: f64,
}

//growth of one unit of capital: cum[i] = prod(1 + r[k]) for k <= i
pub fn cumulative_returns(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |growth, r| {
            *growth *= 1.0 + r;
            Some(*growth)
        })
        .collect()
}

//running maximum of a series
pub fn running_max(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(f64::NEG_INFINITY, |peak, &v| {
            *peak = peak.max(v);
            Some(*peak)
        })
        .collect()
}

//relative decline from the running peak, always <= 0
//entries whose peak is zero are NaN
pub fn drawdowns(cumulative: &[f64]) -> Vec<f64> {
    cumulative
        .iter()
        .zip(running_max(cumulative))
        .map(|(&value, peak)| {
            if peak == 0.0 {
                f64::NAN
            } else {
                (value - peak) / peak
            }
        })
        .collect()
}

//deepest drawdown, 0 for an empty series, NaN if any drawdown is undefined
pub fn max_drawdown(drawdowns: &[f64]) -> f64 {
    if drawdowns.iter().any(|d| d.is_nan()) {
        return f64::NAN;
    }
    drawdowns.iter().copied().fold(0.0, f64::min)
}

//dated cumulative return curve with missing returns filled by zero
pub fn cumulative_curve(returns: &ReturnSeries) -> Vec<CumulativePoint> {
    let growth = cumulative_returns(&returns.treated(MissingReturns::FillZero));

    returns
        .dates()
        .iter()
        .zip(growth)
        .map(|(&date, value)| CumulativePoint { date, value })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_treatments() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = ReturnSeries::new(vec![date; 3], vec![Some(0.1), None, Some(-0.2)]);

        assert_eq!(series.treated(MissingReturns::FillZero), vec![0.1, 0.0, -0.2]);
        assert_eq!(series.treated(MissingReturns::Exclude), vec![0.1, -0.2]);
        assert_eq!(series.observed_count(), 2);
        assert_eq!(series.get(1), None);
    }

    #[test]
    fn test_curve_has_one_point_per_date() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates: Vec<_> = start.iter_days().take(3).collect();
        let series = ReturnSeries::new(dates.clone(), vec![Some(0.1), Some(0.2), None]);

        let curve = cumulative_curve(&series);
        assert_eq!(curve.len(), 3);
        assert_eq!(curve.iter().map(|p| p.date).collect::<Vec<_>>(), dates);
    }

    #[test]
    #[should_panic(expected = "must align")]
    fn test_misaligned_return_series_is_rejected() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ReturnSeries::new(vec![date], vec![Some(0.1), Some(0.2), None]);
    }

    #[test]
    fn test_cumulative_returns() {
        assert_close(&cumulative_returns(&[0.1, 0.1, 0.0]), &[1.1, 1.21, 1.21]);
        assert!(cumulative_returns(&[]).is_empty());
    }

    #[test]
    fn test_rolling_peak_resets_upward() {
        //a loss on the very first period sets the peak below one
        let cum = cumulative_returns(&[-0.1, 1.0 / 9.0]);
        assert_close(&cum, &[0.9, 1.0]);
        assert_close(&running_max(&cum), &[0.9, 1.0]);
        assert_close(&drawdowns(&cum), &[0.0, 0.0]);
        assert_eq!(max_drawdown(&drawdowns(&cum)), 0.0);
    }

    #[test]
    fn test_max_drawdown_peak_to_trough() {
        let cum = cumulative_returns(&[0.5, -0.5, 0.2, 0.0]);
        //1.5 -> 0.75 is the deepest decline
        assert!((max_drawdown(&drawdowns(&cum)) + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_peak_is_undefined() {
        let cum = cumulative_returns(&[-1.0, 0.5]);
        assert!(max_drawdown(&drawdowns(&cum)).is_nan());
    }
}
