//! Reading table operations: ordering, grouping and probe statistics
//!
//! Readings from many files arrive in archive order. Reports need them
//! ordered by `(transmitter, timestamp)` and split into one group per
//! transmitter, with max/min/mean of each probe's primary temperature.

use crate::types::Reading;

/// Rounded means equal to one of these mark a probe that is not connected
pub const DISABLED_SENTINELS: [f64; 2] = [-999.9, 999.9];

/// Decimal places kept for probe means
pub const MEAN_DECIMALS: i32 = 2;

/// Stable sort by `(transmitter, timestamp)`; equal keys keep input order
pub fn sort_readings(readings: &mut [Reading]) {
    readings.sort_by_key(|r| (r.transmitter, r.timestamp));
}

/// Split readings into per-transmitter groups, ascending by transmitter
///
/// The input is left untouched; each group owns a time-ordered copy.
pub fn group_by_transmitter(readings: &[Reading]) -> Vec<TransmitterGroup> {
    let mut sorted = readings.to_vec();
    sort_readings(&mut sorted);

    let mut groups = Vec::new();
    let mut run: Vec<Reading> = Vec::new();
    for reading in sorted {
        if run
            .last()
            .is_some_and(|prev| prev.transmitter != reading.transmitter)
        {
            groups.extend(TransmitterGroup::from_run(std::mem::take(&mut run)));
        }
        run.push(reading);
    }
    groups.extend(TransmitterGroup::from_run(run));
    groups
}

/// Round half to even at the given number of decimals
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// All readings of one transmitter, time-ordered
#[derive(Debug, Clone)]
pub struct TransmitterGroup {
    transmitter: u8,
    // never empty
    readings: Vec<Reading>,
    probe1: ProbeSummary,
    probe2: ProbeSummary,
}

impl TransmitterGroup {
    /// Build a group from a sorted run of readings sharing a transmitter
    fn from_run(readings: Vec<Reading>) -> Option<Self> {
        let first = readings.first()?;
        Some(Self {
            transmitter: first.transmitter,
            probe1: ProbeSummary::from_values(readings.iter().map(|r| r.probe1_temp))?,
            probe2: ProbeSummary::from_values(readings.iter().map(|r| r.probe2_temp))?,
            readings,
        })
    }

    pub fn transmitter(&self) -> u8 {
        self.transmitter
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Earliest reading of the group
    pub fn first(&self) -> &Reading {
        &self.readings[0]
    }

    /// Latest reading of the group
    pub fn last(&self) -> &Reading {
        &self.readings[self.readings.len() - 1]
    }

    pub fn probe1_summary(&self) -> &ProbeSummary {
        &self.probe1
    }

    pub fn probe2_summary(&self) -> &ProbeSummary {
        &self.probe2
    }
}

/// Summary statistics of one probe's temperature over a group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSummary {
    pub max: f64,
    pub min: f64,
    /// Mean rounded to `MEAN_DECIMALS` places
    pub mean: f64,
    /// Probe reports a sentinel value and is treated as not connected
    pub disabled: bool,
}

impl ProbeSummary {
    /// Compute max/min/mean; `None` when there are no values
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut iter = values.into_iter();
        let first = iter.next()?;

        let (mut max, mut min, mut sum, mut count) = (first, first, first, 1usize);
        for value in iter {
            max = max.max(value);
            min = min.min(value);
            sum += value;
            count += 1;
        }

        let mean = round_to(sum / count as f64, MEAN_DECIMALS);
        Some(Self {
            max,
            min,
            mean,
            disabled: DISABLED_SENTINELS.contains(&mean),
        })
    }
}
