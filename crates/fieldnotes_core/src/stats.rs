//! Concentration statistics and progress chart series.

use crate::model::{ConcentrationSession, ProgressEntry};
use crate::render::ChartSink;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)\s*([A-Za-z]*)").expect("valid duration regex"));

const CHART_LABEL_FORMAT: &str = "%b %d";

/// Minutes encoded by a free-text duration (`45 min`, `2 hr`).
///
/// Takes the leading integer; hour units multiply by 60. Text without a
/// leading integer counts as zero.
pub fn parse_duration_minutes(duration: &str) -> u32 {
    let Some(captures) = DURATION_RE.captures(duration) else {
        return 0;
    };
    let amount = captures
        .get(1)
        .and_then(|value| value.as_str().parse::<u32>().ok())
        .unwrap_or(0);
    let unit = captures
        .get(2)
        .map(|value| value.as_str().to_ascii_lowercase())
        .unwrap_or_default();

    if unit.starts_with('h') {
        amount.saturating_mul(60)
    } else {
        amount
    }
}

/// Summary shown above the concentration session list.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcentrationStats {
    pub today_minutes: u32,
    pub total_sessions: usize,
    /// Mean score over all sessions, rounded to one decimal.
    pub average_score: Option<f64>,
    /// Longest session by parsed minutes; the earliest wins ties.
    pub best_session: Option<ConcentrationSession>,
}

pub fn concentration_stats(
    sessions: &[ConcentrationSession],
    today: NaiveDate,
) -> ConcentrationStats {
    let today_minutes = sessions
        .iter()
        .filter(|session| session.date == today)
        .map(|session| parse_duration_minutes(&session.duration))
        .fold(0u32, u32::saturating_add);

    let average_score = if sessions.is_empty() {
        None
    } else {
        let total: u32 = sessions.iter().map(|session| u32::from(session.score)).sum();
        let mean = f64::from(total) / sessions.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    let mut best_session: Option<&ConcentrationSession> = None;
    for session in sessions {
        let minutes = parse_duration_minutes(&session.duration);
        let is_better = best_session
            .map(|best| minutes > parse_duration_minutes(&best.duration))
            .unwrap_or(true);
        if is_better {
            best_session = Some(session);
        }
    }

    ConcentrationStats {
        today_minutes,
        total_sessions: sessions.len(),
        average_score,
        best_session: best_session.cloned(),
    }
}

/// Labels and concentration scores derived from progress entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn draw(&self, sink: &mut dyn ChartSink) {
        sink.draw(&self.labels, &self.values);
    }
}

/// Builds the weekly concentration series in chronological order.
pub fn progress_chart_series(entries: &[ProgressEntry]) -> ChartSeries {
    let mut ordered: Vec<&ProgressEntry> = entries.iter().collect();
    ordered.sort_by_key(|entry| entry.week);

    ChartSeries {
        labels: ordered
            .iter()
            .map(|entry| entry.week.format(CHART_LABEL_FORMAT).to_string())
            .collect(),
        values: ordered
            .iter()
            .map(|entry| f64::from(entry.concentration_score))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_duration_minutes;

    #[test]
    fn parses_leading_integer_with_units() {
        assert_eq!(parse_duration_minutes("45 min"), 45);
        assert_eq!(parse_duration_minutes(" 90min"), 90);
        assert_eq!(parse_duration_minutes("2 hr"), 120);
        assert_eq!(parse_duration_minutes("1 hour"), 60);
        assert_eq!(parse_duration_minutes("30"), 30);
    }

    #[test]
    fn unparseable_duration_counts_as_zero() {
        assert_eq!(parse_duration_minutes("about an hour"), 0);
        assert_eq!(parse_duration_minutes(""), 0);
    }
}
