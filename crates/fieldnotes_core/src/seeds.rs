//! Illustrative first-run sample data.
//!
//! Ids are derived from the clock so seeded records share the id space of
//! records added later.

use crate::clock::Clock;
use crate::model::{
    ConcentrationSession, Course, Insight, MentalModel, Paper, ProgressEntry, Read,
    ResearchEntry, Skill,
};

fn ids(clock: &dyn Clock) -> impl Iterator<Item = i64> {
    let base = clock.now_ms();
    (0..).map(move |offset| base + offset)
}

fn display_date(clock: &dyn Clock) -> String {
    clock.today().format("%-m/%-d/%Y").to_string()
}

pub fn research_entries(clock: &dyn Clock) -> Vec<ResearchEntry> {
    let mut ids = ids(clock);
    vec![ResearchEntry {
        id: ids.next().unwrap_or_default(),
        title: "Attention Is All You Need".to_string(),
        link: "https://arxiv.org/abs/1706.03762".to_string(),
        tags: vec!["transformers".to_string(), "nlp".to_string()],
        first_principles: "Sequence modelling only needs a way for each token to weigh every other token."
            .to_string(),
        mental_model: "Attention as a soft, differentiable dictionary lookup.".to_string(),
        confidence: 7,
        connections: "Memory networks, kernel smoothing.".to_string(),
        key_equations: r"$\mathrm{Attention}(Q,K,V)=\mathrm{softmax}\left(\frac{QK^T}{\sqrt{d_k}}\right)V$"
            .to_string(),
    }]
}

pub fn mental_models(clock: &dyn Clock) -> Vec<MentalModel> {
    let mut ids = ids(clock);
    vec![
        MentalModel {
            id: ids.next().unwrap_or_default(),
            name: "First Principles".to_string(),
            description: "Reduce a problem to what is known to be true, then rebuild.".to_string(),
            layers: vec![
                "Identify assumptions".to_string(),
                "Break down to fundamentals".to_string(),
                "Rebuild from the ground up".to_string(),
            ],
            research_application: "Question every modelling choice a paper takes for granted."
                .to_string(),
            example: "Deriving backpropagation from the chain rule alone.".to_string(),
        },
        MentalModel {
            id: ids.next().unwrap_or_default(),
            name: "Inversion".to_string(),
            description: "Ask what would guarantee failure, then avoid it.".to_string(),
            layers: vec![
                "State the goal".to_string(),
                "List what would make it fail".to_string(),
                "Remove those causes".to_string(),
            ],
            research_application: "Design ablations that would falsify the main claim."
                .to_string(),
            example: "Checking whether a benchmark gain disappears with a stronger baseline."
                .to_string(),
        },
    ]
}

pub fn progress_entries(clock: &dyn Clock) -> Vec<ProgressEntry> {
    let mut ids = ids(clock);
    vec![ProgressEntry {
        id: ids.next().unwrap_or_default(),
        week: clock.today(),
        quick_wins: "Finished the literature review outline.".to_string(),
        concentration_score: 7,
        endorphins_log: "Morning run, solved a tricky proof.".to_string(),
        milestones: "First draft of chapter one.".to_string(),
    }]
}

pub fn concentration_sessions(clock: &dyn Clock) -> Vec<ConcentrationSession> {
    let mut ids = ids(clock);
    vec![ConcentrationSession {
        id: ids.next().unwrap_or_default(),
        date: clock.today(),
        duration: "50 min".to_string(),
        score: 8,
        notes: "Deep reading, phone in another room.".to_string(),
    }]
}

pub fn papers(clock: &dyn Clock) -> Vec<Paper> {
    let mut ids = ids(clock);
    let now_ms = clock.now_ms();
    vec![Paper {
        id: ids.next().unwrap_or_default(),
        title: "Deep Residual Learning for Image Recognition".to_string(),
        external_link: "https://arxiv.org/abs/1512.03385".to_string(),
        date_added: now_ms,
    }]
}

pub fn skills(clock: &dyn Clock) -> Vec<Skill> {
    let mut ids = ids(clock);
    let now_ms = clock.now_ms();
    vec![Skill {
        id: ids.next().unwrap_or_default(),
        title: "Technical writing".to_string(),
        notes: "One page per day, edited the next morning.".to_string(),
        date_added: now_ms,
    }]
}

pub fn courses(clock: &dyn Clock) -> Vec<Course> {
    let mut ids = ids(clock);
    let mut course = Course::new("Course 1", "Course description and materials...");
    course.id = ids.next().unwrap_or_default();
    vec![course]
}

pub fn insights(clock: &dyn Clock) -> Vec<Insight> {
    let mut ids = ids(clock);
    let mut insight = Insight::new(
        "Read slowly, write quickly",
        "Summaries written right after reading stick better than highlights.",
    );
    insight.id = ids.next().unwrap_or_default();
    insight.date = Some(display_date(clock));
    vec![insight]
}

pub fn reads(clock: &dyn Clock) -> Vec<Read> {
    let mut ids = ids(clock);
    let mut read = Read::new(
        "Welcome to 2 Min Reads",
        "Share quick insights and reflections here. Each read auto-advances after 2 minutes.",
    );
    read.id = ids.next().unwrap_or_default();
    read.date = Some(display_date(clock));
    vec![read]
}
