//! Session-scoped prediction history.

use std::collections::BTreeMap;

use crate::charts::{DistributionSlice, TimelinePoint};
use crate::error::HistoryError;
use crate::models::{Disease, Outcome, PredictionRecord};

pub const CSV_HEADER: [&str; 4] = ["timestamp", "disease", "result", "details"];

/// Append-only, insertion-ordered list of completed assessments.
#[derive(Debug, Clone, Default)]
pub struct PredictionHistory {
    records: Vec<PredictionRecord>,
}

impl PredictionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: PredictionRecord) {
        self.records.push(record);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count_by_result(&self, result: Outcome) -> usize {
        self.records.iter().filter(|r| r.result == result).count()
    }

    /// Occurrences per disease; diseases never assessed are absent.
    pub fn count_by_disease(&self) -> BTreeMap<Disease, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.disease).or_insert(0) += 1;
        }
        counts
    }

    pub fn unique_diseases(&self) -> usize {
        self.count_by_disease().len()
    }

    /// The last `n` records, oldest first.
    pub fn recent(&self, n: i64) -> Result<&[PredictionRecord], HistoryError> {
        let n = usize::try_from(n).map_err(|_| HistoryError::NegativeCount(n))?;
        let start = self.records.len().saturating_sub(n);
        Ok(&self.records[start..])
    }

    /// Fraction of positive results, 0 for an empty history.
    pub fn positive_rate(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.count_by_result(Outcome::Positive) as f64 / self.records.len() as f64
    }

    /// Records ordered by timestamp, latest first. Ties keep the later append first.
    pub fn newest_first(&self) -> Vec<&PredictionRecord> {
        let mut sorted: Vec<_> = self.records.iter().rev().collect();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sorted
    }

    pub fn distribution(&self) -> Vec<DistributionSlice> {
        self.count_by_disease()
            .into_iter()
            .map(|(disease, count)| DistributionSlice { disease, count })
            .collect()
    }

    pub fn timeline(&self) -> Vec<TimelinePoint> {
        self.records
            .iter()
            .map(|r| TimelinePoint::new(r.timestamp, r.disease, r.result))
            .collect()
    }

    /// Serialises the whole history as CSV with a header row.
    pub fn export_csv(&self) -> Result<String, HistoryError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(CSV_HEADER)
            .map_err(|e| HistoryError::Export(e.to_string()))?;

        for record in &self.records {
            writer
                .write_record([
                    record.formatted_timestamp(),
                    record.disease.to_string(),
                    record.result.to_string(),
                    record.details.to_string(),
                ])
                .map_err(|e| HistoryError::Export(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| HistoryError::Export(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| HistoryError::Export(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Details, TIMESTAMP_FORMAT};
    use chrono::NaiveDateTime;

    fn record(disease: Disease, result: Outcome) -> PredictionRecord {
        PredictionRecord::new(disease, result, Details::default())
    }

    fn record_at(ts: &str, disease: Disease, result: Outcome) -> PredictionRecord {
        let timestamp = NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).unwrap();
        PredictionRecord::at(timestamp, disease, result, Details::default())
    }

    fn three_diseases() -> PredictionHistory {
        let mut history = PredictionHistory::new();
        history.append(record(Disease::Diabetes, Outcome::Negative));
        history.append(record(Disease::HeartDisease, Outcome::Positive));
        history.append(record(Disease::Parkinsons, Outcome::Positive));
        history
    }

    #[test]
    fn count_tracks_appends() {
        let mut history = PredictionHistory::new();
        for n in 1..=10 {
            history.append(record(Disease::Diabetes, Outcome::Negative));
            assert_eq!(history.count(), n);
        }
    }

    #[test]
    fn result_counts_sum_to_total() {
        let history = three_diseases();
        assert_eq!(
            history.count_by_result(Outcome::Positive) + history.count_by_result(Outcome::Negative),
            history.count()
        );
    }

    #[test]
    fn one_of_each_disease() {
        let history = three_diseases();
        let expected = BTreeMap::from([
            (Disease::Diabetes, 1),
            (Disease::HeartDisease, 1),
            (Disease::Parkinsons, 1),
        ]);
        assert_eq!(history.count_by_disease(), expected);
        assert!((history.positive_rate() - 2.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(history.unique_diseases(), 3);
    }

    #[test]
    fn empty_history_is_well_defined() {
        let history = PredictionHistory::new();
        assert_eq!(history.positive_rate(), 0.0);
        assert!(history.recent(5).unwrap().is_empty());
        assert_eq!(history.export_csv().unwrap(), "timestamp,disease,result,details\n");
        assert!(history.count_by_disease().is_empty());
    }

    #[test]
    fn recent_returns_last_records_in_order() {
        let history = three_diseases();

        let last_two = history.recent(2).unwrap();
        assert_eq!(last_two.len(), 2);
        assert_eq!(last_two[0].disease, Disease::HeartDisease);
        assert_eq!(last_two[1].disease, Disease::Parkinsons);

        assert_eq!(history.recent(10).unwrap().len(), 3);
        assert!(history.recent(0).unwrap().is_empty());
    }

    #[test]
    fn negative_recent_is_an_error() {
        let history = three_diseases();
        assert_eq!(history.recent(-1), Err(HistoryError::NegativeCount(-1)));
    }

    #[test]
    fn newest_first_orders_by_timestamp() {
        let mut history = PredictionHistory::new();
        history.append(record_at("2024-01-01 10:00:00", Disease::Diabetes, Outcome::Negative));
        history.append(record_at("2024-01-01 12:00:00", Disease::Parkinsons, Outcome::Positive));
        history.append(record_at("2024-01-01 11:00:00", Disease::HeartDisease, Outcome::Negative));

        let diseases: Vec<_> = history.newest_first().iter().map(|r| r.disease).collect();
        assert_eq!(
            diseases,
            vec![Disease::Parkinsons, Disease::HeartDisease, Disease::Diabetes]
        );
    }

    #[test]
    fn timeline_marks_positive_as_one() {
        let history = three_diseases();
        let values: Vec<_> = history.timeline().iter().map(|p| p.value).collect();
        assert_eq!(values, vec![0, 1, 1]);
    }

    #[test]
    fn csv_has_header_plus_one_line_per_record() {
        let mut history = PredictionHistory::new();
        history.append(PredictionRecord::new(
            Disease::Diabetes,
            Outcome::Positive,
            Details::new(vec![("glucose", 190.0), ("bmi", 35.2), ("age", 50.0)]),
        ));
        history.append(record(Disease::HeartDisease, Outcome::Negative));

        let csv = history.export_csv().unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.contains("glucose:190; bmi:35.2; age:50"));
    }

    #[test]
    fn clear_empties_history() {
        let mut history = three_diseases();
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.count(), 0);
    }
}
