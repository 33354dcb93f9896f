//! Metric aggregation over the query event log
//!
//! Pure functions deriving summary statistics, a daily trend series, and a
//! top-queries ranking from a slice of [`QueryEvent`]s. Nothing here keeps
//! running totals — every call recomputes from the full list, which keeps
//! consistency trivial at the event volumes a chat dashboard sees.
//!
//! Day bucketing uses the *local* calendar date (a dashboard's "today"),
//! not a rolling 24-hour window. The `*_on` variants take the reference
//! date explicitly so callers and tests control the clock; the plain
//! variants use today's local date.

use crate::types::{DailyPoint, Metrics, QueryEvent, QueryStat, Rating};
use chrono::{Datelike, Duration, Local, NaiveDate};
use std::collections::HashMap;

/// Default span of the daily trend series, in calendar days
pub const TREND_WINDOW_DAYS: usize = 7;

/// Default length of the top-queries ranking
pub const TOP_QUERIES_LIMIT: usize = 5;

/// Rating weight used for top-query quality averages
const POSITIVE_WEIGHT: f64 = 5.0;
const NEGATIVE_WEIGHT: f64 = 1.0;

/// Summary statistics over the whole log, relative to today's local date
pub fn summary(events: &[QueryEvent]) -> Metrics {
    summary_on(events, Local::now().date_naive())
}

/// Summary statistics relative to an explicit "today"
pub fn summary_on(events: &[QueryEvent], today: NaiveDate) -> Metrics {
    let positive_ratings = events
        .iter()
        .filter(|e| e.rating == Some(Rating::Positive))
        .count() as u64;
    let negative_ratings = events
        .iter()
        .filter(|e| e.rating == Some(Rating::Negative))
        .count() as u64;

    // A relevance score of exactly 0 marks a failed answer attempt and is
    // excluded from the average along with unscored events (see QueryEvent).
    let scored: Vec<f64> = events
        .iter()
        .filter_map(|e| e.relevance_score)
        .filter(|score| *score != 0.0)
        .collect();
    let average_relevance = if scored.is_empty() {
        0.0
    } else {
        round1(scored.iter().sum::<f64>() / scored.len() as f64)
    };

    let questions_today = events
        .iter()
        .filter(|e| local_date(e) == today)
        .count() as u64;

    let response_time = if events.is_empty() {
        0.0
    } else {
        round1(events.iter().map(|e| e.response_time).sum::<f64>() / events.len() as f64)
    };

    Metrics {
        total_questions: events.len() as u64,
        positive_ratings,
        negative_ratings,
        average_relevance,
        questions_today,
        response_time,
    }
}

/// Daily trend series for the last `window_days` days, ending today
pub fn daily_series(events: &[QueryEvent], window_days: usize) -> Vec<DailyPoint> {
    daily_series_on(events, window_days, Local::now().date_naive())
}

/// Daily trend series ending on an explicit date
///
/// Always returns exactly `window_days` contiguous entries, oldest first,
/// with zeroed counts for days without events. A `positive_rate` of 0
/// means "no signal" (no rated events that day), not "all negative".
pub fn daily_series_on(
    events: &[QueryEvent],
    window_days: usize,
    today: NaiveDate,
) -> Vec<DailyPoint> {
    (0..window_days)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset as i64);
            let day_events: Vec<&QueryEvent> =
                events.iter().filter(|e| local_date(e) == date).collect();

            let rated = day_events.iter().filter(|e| e.rating.is_some()).count();
            let positive = day_events
                .iter()
                .filter(|e| e.rating == Some(Rating::Positive))
                .count();
            let positive_rate = if rated > 0 {
                (positive as f64 / rated as f64 * 100.0).round() as u32
            } else {
                0
            };

            DailyPoint {
                date: day_label(date),
                questions: day_events.len() as u64,
                positive_rate,
            }
        })
        .collect()
}

/// Top queries by occurrence count, truncated to `limit`
///
/// Groups on exact string equality (case- and whitespace-sensitive).
/// Ordering is descending by count with ties kept in first-seen order:
/// groups accumulate in encounter order and the final sort is stable.
pub fn top_queries(events: &[QueryEvent], limit: usize) -> Vec<QueryStat> {
    struct Group {
        query: String,
        count: u64,
        rating_sum: f64,
        rated: u64,
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for event in events {
        let slot = *index.entry(event.query.as_str()).or_insert_with(|| {
            groups.push(Group {
                query: event.query.clone(),
                count: 0,
                rating_sum: 0.0,
                rated: 0,
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.count += 1;
        if let Some(rating) = event.rating {
            group.rating_sum += match rating {
                Rating::Positive => POSITIVE_WEIGHT,
                Rating::Negative => NEGATIVE_WEIGHT,
            };
            group.rated += 1;
        }
    }

    let mut stats: Vec<QueryStat> = groups
        .into_iter()
        .map(|g| QueryStat {
            query: g.query,
            count: g.count,
            avg_rating: if g.rated > 0 {
                g.rating_sum / g.rated as f64
            } else {
                0.0
            },
        })
        .collect();

    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats.truncate(limit);
    stats
}

/// Round to 1 decimal place
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Local calendar date an event falls on
fn local_date(event: &QueryEvent) -> NaiveDate {
    event.timestamp.with_timezone(&Local).date_naive()
}

/// Zero-padded `dd/mm` label
fn day_label(date: NaiveDate) -> String {
    format!("{:02}/{:02}", date.day(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(query: &str, response_time: f64, relevance_score: Option<f64>) -> QueryEvent {
        QueryEvent::new(query, response_time, relevance_score)
    }

    fn rated(mut e: QueryEvent, rating: Rating) -> QueryEvent {
        e.rating = Some(rating);
        e
    }

    fn days_ago(mut e: QueryEvent, days: i64) -> QueryEvent {
        e.timestamp = e.timestamp - Duration::days(days);
        e
    }

    /// Local date the freshly stamped test events fall on
    fn today_of(events: &[QueryEvent]) -> NaiveDate {
        local_date(&events[0])
    }

    // ─── Summary ─────────────────────────────────────────────────

    #[test]
    fn test_summary_empty_log() {
        let metrics = summary(&[]);
        assert_eq!(metrics, Metrics::default());
    }

    #[test]
    fn test_summary_counts_every_record() {
        let events = vec![
            event("a", 1.0, None),
            event("a", 1.0, None),
            event("b", 1.0, Some(50.0)),
        ];
        let metrics = summary_on(&events, today_of(&events));
        assert_eq!(metrics.total_questions, 3);
        assert_eq!(metrics.questions_today, 3);
    }

    #[test]
    fn test_summary_rating_counts() {
        let events = vec![
            rated(event("a", 1.0, None), Rating::Positive),
            rated(event("b", 1.0, None), Rating::Positive),
            rated(event("c", 1.0, None), Rating::Negative),
            event("d", 1.0, None),
        ];
        let metrics = summary_on(&events, today_of(&events));
        assert_eq!(metrics.positive_ratings, 2);
        assert_eq!(metrics.negative_ratings, 1);
        assert_eq!(metrics.satisfaction_rate(), 2.0 / 3.0 * 100.0);
    }

    #[test]
    fn test_summary_zero_relevance_excluded_from_average() {
        // Averages: relevance over the two nonzero scores, response time
        // over all three events.
        let events = vec![
            event("A", 1.0, Some(80.0)),
            event("A", 2.0, Some(0.0)),
            event("B", 1.5, Some(60.0)),
        ];
        let metrics = summary_on(&events, today_of(&events));
        assert_eq!(metrics.average_relevance, 70.0);
        assert_eq!(metrics.response_time, 1.5);
    }

    #[test]
    fn test_summary_all_relevance_absent_or_zero() {
        let events = vec![event("a", 1.0, None), event("b", 2.0, Some(0.0))];
        let metrics = summary_on(&events, today_of(&events));
        assert_eq!(metrics.average_relevance, 0.0);
    }

    #[test]
    fn test_summary_rounds_to_one_decimal() {
        let events = vec![
            event("a", 1.0, Some(70.0)),
            event("b", 1.0, Some(85.0)),
            event("c", 1.0, Some(92.0)),
        ];
        let metrics = summary_on(&events, today_of(&events));
        // (70 + 85 + 92) / 3 = 82.333...
        assert_eq!(metrics.average_relevance, 82.3);
    }

    #[test]
    fn test_summary_questions_today_excludes_older_days() {
        let events = vec![
            event("today", 1.0, None),
            days_ago(event("yesterday", 1.0, None), 1),
            days_ago(event("last week", 1.0, None), 7),
        ];
        let metrics = summary_on(&events, today_of(&events));
        assert_eq!(metrics.total_questions, 3);
        assert_eq!(metrics.questions_today, 1);
    }

    #[test]
    fn test_summary_is_idempotent() {
        let events = vec![
            rated(event("a", 1.3, Some(66.0)), Rating::Positive),
            event("b", 0.7, None),
        ];
        let today = today_of(&events);
        assert_eq!(summary_on(&events, today), summary_on(&events, today));
    }

    // ─── Daily series ────────────────────────────────────────────

    #[test]
    fn test_daily_series_empty_log_is_full_window() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let series = daily_series_on(&[], TREND_WINDOW_DAYS, today);

        assert_eq!(series.len(), 7);
        let labels: Vec<&str> = series.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(
            labels,
            vec!["04/03", "05/03", "06/03", "07/03", "08/03", "09/03", "10/03"]
        );
        assert!(series.iter().all(|p| p.questions == 0 && p.positive_rate == 0));
    }

    #[test]
    fn test_daily_series_spans_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let series = daily_series_on(&[], 4, today);
        let labels: Vec<&str> = series.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(labels, vec!["28/02", "29/02", "01/03", "02/03"]);
    }

    #[test]
    fn test_daily_series_buckets_by_day() {
        let events = vec![
            event("a", 1.0, None),
            event("b", 1.0, None),
            days_ago(event("c", 1.0, None), 1),
            days_ago(event("d", 1.0, None), 8), // outside the window
        ];
        let series = daily_series_on(&events, TREND_WINDOW_DAYS, today_of(&events));

        assert_eq!(series.len(), 7);
        assert_eq!(series[6].questions, 2); // today
        assert_eq!(series[5].questions, 1); // yesterday
        assert_eq!(series[..5].iter().map(|p| p.questions).sum::<u64>(), 0);
    }

    #[test]
    fn test_daily_series_positive_rate_over_rated_only() {
        let events = vec![
            rated(event("a", 1.0, None), Rating::Positive),
            rated(event("b", 1.0, None), Rating::Positive),
            rated(event("c", 1.0, None), Rating::Negative),
            event("d", 1.0, None), // unrated, counts toward questions only
        ];
        let series = daily_series_on(&events, 1, today_of(&events));

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].questions, 4);
        // round(2/3 * 100) = 67
        assert_eq!(series[0].positive_rate, 67);
    }

    #[test]
    fn test_daily_series_unrated_day_has_zero_rate() {
        let events = vec![event("a", 1.0, None), event("b", 1.0, None)];
        let series = daily_series_on(&events, 1, today_of(&events));
        assert_eq!(series[0].questions, 2);
        assert_eq!(series[0].positive_rate, 0);
    }

    // ─── Top queries ─────────────────────────────────────────────

    #[test]
    fn test_top_queries_orders_by_count() {
        // Interleaved insertion: A×3, B×2, C×1
        let events = vec![
            event("B", 1.0, None),
            event("A", 1.0, None),
            event("C", 1.0, None),
            event("A", 1.0, None),
            event("B", 1.0, None),
            event("A", 1.0, None),
        ];
        let stats = top_queries(&events, TOP_QUERIES_LIMIT);

        assert_eq!(stats.len(), 3);
        assert_eq!((stats[0].query.as_str(), stats[0].count), ("A", 3));
        assert_eq!((stats[1].query.as_str(), stats[1].count), ("B", 2));
        assert_eq!((stats[2].query.as_str(), stats[2].count), ("C", 1));
    }

    #[test]
    fn test_top_queries_ties_keep_first_seen_order() {
        let events = vec![
            event("later", 1.0, None),
            event("earlier", 1.0, None),
            event("later", 1.0, None),
            event("earlier", 1.0, None),
        ];
        let stats = top_queries(&events, TOP_QUERIES_LIMIT);
        assert_eq!(stats[0].query, "later");
        assert_eq!(stats[1].query, "earlier");
    }

    #[test]
    fn test_top_queries_truncates_to_limit() {
        let events: Vec<QueryEvent> =
            (0..10).map(|i| event(&format!("q{}", i), 1.0, None)).collect();
        let stats = top_queries(&events, TOP_QUERIES_LIMIT);
        assert_eq!(stats.len(), 5);
    }

    #[test]
    fn test_top_queries_avg_rating_over_rated_members() {
        let events = vec![
            rated(event("q", 1.0, None), Rating::Positive),
            rated(event("q", 1.0, None), Rating::Negative),
            event("q", 1.0, None),
        ];
        let stats = top_queries(&events, TOP_QUERIES_LIMIT);

        assert_eq!(stats[0].count, 3);
        // (5 + 1) / 2 — the unrated member counts toward count only
        assert_eq!(stats[0].avg_rating, 3.0);
    }

    #[test]
    fn test_top_queries_unrated_group_has_zero_rating() {
        let events = vec![event("q", 1.0, None), event("q", 1.0, None)];
        let stats = top_queries(&events, TOP_QUERIES_LIMIT);
        assert_eq!(stats[0].avg_rating, 0.0);
    }

    #[test]
    fn test_top_queries_grouping_is_exact_match() {
        let events = vec![
            event("What is RAG?", 1.0, None),
            event("what is rag?", 1.0, None),
            event("What is RAG? ", 1.0, None),
        ];
        let stats = top_queries(&events, TOP_QUERIES_LIMIT);
        assert_eq!(stats.len(), 3);
    }

    #[test]
    fn test_top_queries_empty_log() {
        assert!(top_queries(&[], TOP_QUERIES_LIMIT).is_empty());
    }
}
