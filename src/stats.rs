use crate::models::{
    EmotionCounts, EmotionSeries, Entry, JournalData, StatsResponse, TrendPoint, VocabularyItem,
};
use std::collections::{BTreeMap, BTreeSet};

pub fn build_stats(data: &JournalData, order: Option<&[String]>) -> StatsResponse {
    let default_order: Vec<String>;
    let order = match order {
        Some(order) => order,
        None => {
            default_order = data.emotions.iter().map(|item| item.name.clone()).collect();
            &default_order
        }
    };

    StatsResponse {
        levels: order.len(),
        trend: mood_trend(&data.entries, order),
        counts: emotion_counts(&data.entries, &data.emotions),
    }
}

/// Average rank per creation date, dates ascending.
///
/// Emotions missing from `order` are skipped; a date whose entries are all
/// unranked gets `None`.
pub fn mood_trend(entries: &[Entry], order: &[String]) -> Vec<TrendPoint> {
    let mut by_date: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for entry in entries {
        let (sum, count) = by_date.entry(date_key(entry)).or_default();
        if let Some(rank) = order.iter().position(|name| *name == entry.emotion) {
            *sum += rank as u64;
            *count += 1;
        }
    }

    by_date
        .into_iter()
        .map(|(date, (sum, count))| TrendPoint {
            date,
            average: (count > 0).then(|| sum as f64 / count as f64),
        })
        .collect()
}

/// Per-date occurrence counts for every vocabulary emotion, zero-filled,
/// followed by emotions that only survive in old entries.
pub fn emotion_counts(entries: &[Entry], emotions: &[VocabularyItem]) -> EmotionCounts {
    let mut by_date: BTreeMap<String, BTreeMap<&str, u64>> = BTreeMap::new();
    let mut retired: BTreeSet<&str> = BTreeSet::new();
    for entry in entries {
        *by_date
            .entry(date_key(entry))
            .or_default()
            .entry(entry.emotion.as_str())
            .or_default() += 1;
        if !emotions.iter().any(|item| item.name == entry.emotion) {
            retired.insert(entry.emotion.as_str());
        }
    }

    let names = emotions
        .iter()
        .map(|item| (item.name.as_str(), item.color.clone()))
        .chain(retired.into_iter().map(|name| (name, None)));

    let series = names
        .map(|(name, color)| EmotionSeries {
            emotion: name.to_string(),
            color,
            counts: by_date
                .values()
                .map(|counts| counts.get(name).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    EmotionCounts {
        dates: by_date.into_keys().collect(),
        series,
    }
}

fn date_key(entry: &Entry) -> String {
    entry.timestamp.date_naive().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(id: u64, day: u32, hour: u32, emotion: &str) -> Entry {
        Entry {
            id,
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap(),
            emotion: emotion.to_string(),
            intensity: None,
            blood_pressure: None,
            weight_kg: None,
            note: String::new(),
            tags: Vec::new(),
        }
    }

    fn order(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn trend_averages_ranks_per_date() {
        let entries = vec![entry(1, 1, 8, "Sad"), entry(2, 1, 20, "Neutral")];
        let trend = mood_trend(&entries, &order(&["Sad", "Neutral"]));
        assert_eq!(
            trend,
            vec![TrendPoint {
                date: "2024-01-01".to_string(),
                average: Some(0.5),
            }]
        );

        let trend = mood_trend(&entries, &order(&["Sad", "Calm", "Neutral"]));
        assert_eq!(trend[0].average, Some(1.0));
    }

    #[test]
    fn trend_skips_unranked_entries_instead_of_counting_zero() {
        let entries = vec![
            entry(1, 2, 8, "Happy"),
            entry(2, 2, 9, "Bored"),
            entry(3, 3, 9, "Bored"),
        ];
        let trend = mood_trend(&entries, &order(&["Sad", "Neutral", "Happy"]));
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].average, Some(2.0));
        assert_eq!(trend[1].date, "2024-01-03");
        assert_eq!(trend[1].average, None);
    }

    #[test]
    fn trend_dates_ascend_and_ignore_insertion_order() {
        let ranks = order(&["Very sad", "Sad", "Neutral", "Happy", "Very happy"]);
        let forward = vec![
            entry(1, 5, 9, "Happy"),
            entry(2, 1, 9, "Sad"),
            entry(3, 5, 10, "Very sad"),
            entry(4, 5, 11, "Neutral"),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let trend = mood_trend(&forward, &ranks);
        assert_eq!(trend, mood_trend(&backward, &ranks));
        assert_eq!(trend[0].date, "2024-01-01");
        assert_eq!(trend[1].date, "2024-01-05");
        assert_eq!(trend[1].average, Some(5.0 / 3.0));
    }

    #[test]
    fn counts_are_zero_filled_for_every_vocabulary_emotion() {
        let emotions = vec![
            VocabularyItem::new("Sad", Some("#3498db")),
            VocabularyItem::new("Happy", Some("#2ecc71")),
        ];
        let entries = vec![
            entry(1, 1, 9, "Happy"),
            entry(2, 1, 10, "Happy"),
            entry(3, 2, 9, "Sad"),
            entry(4, 2, 10, "Angry"),
        ];

        let counts = emotion_counts(&entries, &emotions);
        assert_eq!(counts.dates, ["2024-01-01", "2024-01-02"]);
        assert_eq!(counts.series.len(), 3);
        assert_eq!(counts.series[0].emotion, "Sad");
        assert_eq!(counts.series[0].counts, [0, 1]);
        assert_eq!(counts.series[1].color.as_deref(), Some("#2ecc71"));
        assert_eq!(counts.series[1].counts, [2, 0]);
        assert_eq!(counts.series[2].emotion, "Angry");
        assert_eq!(counts.series[2].color, None);
        assert_eq!(counts.series[2].counts, [0, 1]);
    }

    #[test]
    fn levels_ignore_retired_emotions() {
        let mut data = JournalData::default();
        data.entries = vec![entry(1, 1, 9, "Bored"), entry(2, 1, 10, "Sad")];

        let stats = build_stats(&data, None);
        assert_eq!(stats.counts.series.len(), 6);
        assert_eq!(stats.levels, 5);
    }

    #[test]
    fn build_stats_defaults_to_vocabulary_order_and_is_repeatable() {
        let mut data = JournalData::default();
        data.entries = vec![entry(1, 1, 9, "Very happy"), entry(2, 1, 10, "Neutral")];

        let first = build_stats(&data, None);
        assert_eq!(first.trend[0].average, Some(3.0));
        assert_eq!(first.counts.series.len(), 5);
        assert_eq!(first.levels, 5);
        assert_eq!(first, build_stats(&data, None));

        let custom = order(&["Neutral", "Very happy"]);
        let stats = build_stats(&data, Some(&custom));
        assert_eq!(stats.trend[0].average, Some(0.5));
        assert_eq!(stats.levels, 2);
    }
}
