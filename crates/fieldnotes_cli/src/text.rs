//! Plain-text rendering for the terminal front end.

use fieldnotes_core::model::confidence_stars;
use fieldnotes_core::timer::{ToneError, TonePlayer};
use fieldnotes_core::{
    ChartSink, ConcentrationSession, Course, Insight, MentalModel, Paper, PomodoroSession,
    ProgressEntry, Read, Record, RenderSink, ResearchEntry, Skill,
};
use std::io::Write;
use std::marker::PhantomData;

/// One-line summary of a record for list output.
pub trait Describe {
    fn describe(&self) -> String;
}

impl Describe for ResearchEntry {
    fn describe(&self) -> String {
        let tags = if self.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", self.tags.join(", "))
        };
        format!(
            "{}{} {}",
            self.title,
            tags,
            confidence_stars(self.display_confidence())
        )
    }
}

impl Describe for MentalModel {
    fn describe(&self) -> String {
        match self.layers.len() {
            0 => self.name.clone(),
            layers => format!("{} ({layers} layers)", self.name),
        }
    }
}

impl Describe for ProgressEntry {
    fn describe(&self) -> String {
        format!(
            "week of {}: concentration {}/10",
            self.week.format("%Y-%m-%d"),
            self.concentration_score
        )
    }
}

impl Describe for ConcentrationSession {
    fn describe(&self) -> String {
        format!("{} {} score {}/10", self.date, self.duration, self.score)
    }
}

impl Describe for Paper {
    fn describe(&self) -> String {
        format!("{} <{}>", self.title, self.external_link)
    }
}

impl Describe for Skill {
    fn describe(&self) -> String {
        self.title.clone()
    }
}

impl Describe for PomodoroSession {
    fn describe(&self) -> String {
        let when = chrono::DateTime::from_timestamp_millis(self.date)
            .map(|instant| instant.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| self.date.to_string());
        format!("{when} {} min", self.duration_seconds / 60)
    }
}

macro_rules! describe_text {
    ($($name:ident),*) => {
        $(
            impl Describe for $name {
                fn describe(&self) -> String {
                    match &self.date {
                        Some(date) => format!("{} ({date})", self.title),
                        None => self.title.clone(),
                    }
                }
            }
        )*
    };
}

describe_text!(Course, Insight, Read);

/// Prints each rendered record as `position/total id description`.
pub struct StdoutSink<R> {
    _record: PhantomData<R>,
}

impl<R> Default for StdoutSink<R> {
    fn default() -> Self {
        Self {
            _record: PhantomData,
        }
    }
}

impl<R: Record + Describe> RenderSink<R> for StdoutSink<R> {
    fn clear(&mut self) {}

    fn append(&mut self, position: usize, total: usize, record: &R) {
        println!("{position}/{total}  {}  {}", record.id(), record.describe());
    }
}

/// Horizontal bar chart on stdout.
pub struct TextChart;

impl ChartSink for TextChart {
    fn draw(&mut self, labels: &[String], values: &[f64]) {
        for (label, value) in labels.iter().zip(values) {
            let width = value.max(0.0).round() as usize;
            println!("{label}  {} {value}", "#".repeat(width));
        }
    }
}

/// Terminal bell as the completion tone.
pub struct BellTone;

impl TonePlayer for BellTone {
    fn play(&mut self) -> Result<(), ToneError> {
        let mut stdout = std::io::stdout();
        stdout
            .write_all(b"\x07")
            .and_then(|()| stdout.flush())
            .map_err(|err| ToneError(err.to_string()))
    }
}
