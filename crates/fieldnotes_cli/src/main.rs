//! Terminal front end for the fieldnotes journal.
//!
//! # Responsibility
//! - Parse commands and map them onto `Journal` operations.
//! - Print rendered collections and pending notifications.

mod text;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use fieldnotes_core::model::{parse_layers, parse_tags};
use fieldnotes_core::timer::TimerState;
use fieldnotes_core::{
    init_logging, open_db, ConcentrationSession, Confirm, Course, FieldEdit, Insight, Journal,
    JournalConfig, MentalModel, NoopHook, NotificationKind, Page, Paper, ProgressEntry, Read,
    Record, RecordId, RenderSink, ResearchEntry, Skill, SqliteKeyValueStore, SystemClock,
};
use log::info;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use text::{BellTone, Describe, StdoutSink, TextChart};

#[derive(Parser)]
#[command(name = "fieldnotes")]
#[command(about = "Research journal: papers, mental models, progress and focus sessions")]
struct Cli {
    /// Config file; defaults to the platform config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Turn on edit mode for the home page (bio, courses, insights, reads)
    #[arg(long, global = true)]
    edit: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a page, seeding sample data on first use
    Init {
        /// home, research, progress or library
        #[arg(value_parser = parse_page)]
        page: Page,
    },
    /// List a collection in stored order
    List {
        #[arg(value_enum)]
        collection: Collection,
    },
    /// Add a record
    Add {
        #[command(subcommand)]
        record: AddCommand,
    },
    /// Set one field of a record
    Edit {
        #[arg(value_enum)]
        collection: Collection,
        id: RecordId,
        field: String,
        value: String,
    },
    /// Delete a record after confirmation
    Delete {
        #[arg(value_enum)]
        collection: Collection,
        id: RecordId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Filter research entries or mental models
    Search {
        #[arg(value_enum)]
        collection: Collection,
        query: String,
    },
    /// Run one 25-minute focus interval
    Focus,
    /// Concentration statistics and the weekly progress chart
    Stats,
    /// Export progress entries as JSON
    Export {
        /// Target directory; defaults to the configured export dir
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Show or replace the bio
    Bio { text: Option<String> },
}

#[derive(Subcommand)]
enum AddCommand {
    Research {
        title: String,
        #[arg(long, default_value = "")]
        link: String,
        /// Comma-separated
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long, default_value_t = 5)]
        confidence: u8,
    },
    Model {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// One layer per line
        #[arg(long, default_value = "")]
        layers: String,
    },
    Progress {
        /// Week start; defaults to today
        #[arg(long)]
        week: Option<NaiveDate>,
        #[arg(long)]
        score: u8,
        #[arg(long, default_value = "")]
        quick_wins: String,
    },
    Session {
        /// Free text such as `45 min`
        duration: String,
        #[arg(long)]
        score: u8,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Paper { title: String, link: String },
    Skill { title: String },
    Course { title: String },
    Insight { title: String, content: String },
    Read { title: String, content: String },
}

fn parse_page(value: &str) -> Result<Page, String> {
    Page::parse(value)
        .ok_or_else(|| format!("unknown page `{value}`; expected home|research|progress|library"))
}

#[derive(Clone, Copy, ValueEnum)]
enum Collection {
    Research,
    Models,
    Progress,
    Sessions,
    Pomodoro,
    Papers,
    Skills,
    Courses,
    Insights,
    Reads,
}

impl Collection {
    /// Page whose first load seeds this collection.
    fn page(self) -> Option<Page> {
        match self {
            Self::Research | Self::Models => Some(Page::Research),
            Self::Progress | Self::Sessions => Some(Page::Progress),
            Self::Papers | Self::Skills => Some(Page::Library),
            Self::Courses | Self::Insights | Self::Reads => Some(Page::Home),
            Self::Pomodoro => None,
        }
    }
}

impl AddCommand {
    fn page(&self) -> Page {
        match self {
            Self::Research { .. } | Self::Model { .. } => Page::Research,
            Self::Progress { .. } | Self::Session { .. } => Page::Progress,
            Self::Paper { .. } | Self::Skill { .. } => Page::Library,
            Self::Course { .. } | Self::Insight { .. } | Self::Read { .. } => Page::Home,
        }
    }
}

impl Commands {
    /// Page loaded before the command runs; `init` reports seeding itself.
    fn page(&self) -> Option<Page> {
        match self {
            Self::Init { .. } | Self::Focus => None,
            Self::List { collection }
            | Self::Edit { collection, .. }
            | Self::Delete { collection, .. }
            | Self::Search { collection, .. } => collection.page(),
            Self::Add { record } => Some(record.page()),
            Self::Stats | Self::Export { .. } => Some(Page::Progress),
            Self::Bio { .. } => Some(Page::Home),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => JournalConfig::load_or_default(path),
        None => JournalConfig::load(),
    };

    if let Err(err) = init_logging(config.log_level(), &config.log_dir()) {
        eprintln!("warning: logging disabled: {err}");
    }

    config
        .ensure_data_dir()
        .context("failed to create data directory")?;
    let conn = open_db(config.db_path()).context("failed to open journal database")?;
    let kv = SqliteKeyValueStore::new(&conn).with_quota(config.storage_quota_bytes);
    let clock = SystemClock;
    info!(
        "event=cli_start module=cli status=ok db={}",
        config.db_path().display()
    );
    let mut journal = Journal::open(&kv, &clock);
    if cli.edit {
        journal.set_edit_mode(true);
    }

    let outcome = run(cli.command, &mut journal, &config);
    print_notices(&mut journal);
    outcome
}

fn run(
    command: Commands,
    journal: &mut Journal<'_>,
    config: &JournalConfig,
) -> anyhow::Result<()> {
    if let Some(page) = command.page() {
        journal.initialize_page(page);
    }
    match command {
        Commands::Init { page } => {
            let seeded = journal.initialize_page(page);
            if seeded.is_empty() {
                println!("already initialized");
            } else {
                println!("seeded {}", seeded.join(", "));
            }
        }
        Commands::List { collection } => list(journal, collection),
        Commands::Add { record } => {
            if let Some(id) = add(journal, record) {
                println!("{id}");
            }
        }
        Commands::Edit {
            collection,
            id,
            field,
            value,
        } => edit(journal, collection, FieldEdit::new(id, field, value))?,
        Commands::Delete {
            collection,
            id,
            yes,
        } => {
            let mut confirm = |prompt: &str| yes || ask(prompt);
            delete(journal, collection, id, &mut confirm)?;
        }
        Commands::Search { collection, query } => {
            let matches = match collection {
                Collection::Research => print_records(&journal.research.search(&query)),
                Collection::Models => print_records(&journal.mental_models.search(&query)),
                _ => bail!("only research and models can be searched"),
            };
            println!("{matches} match(es)");
        }
        Commands::Focus => focus(journal)?,
        Commands::Stats => {
            let stats = journal.concentration_stats();
            println!("today: {} min", stats.today_minutes);
            println!("sessions: {}", stats.total_sessions);
            match stats.average_score {
                Some(average) => println!("average score: {average:.1}"),
                None => println!("average score: -"),
            }
            if let Some(best) = stats.best_session {
                println!("best session: {} on {}", best.duration, best.date);
            }
            journal.progress_series().draw(&mut TextChart);
        }
        Commands::Export { dir } => {
            let dir = dir.unwrap_or_else(|| config.export_dir());
            let path = journal.export_progress(&dir)?;
            println!("{}", path.display());
        }
        Commands::Bio { text } => match text {
            Some(value) => {
                if !journal.save_bio(&value) {
                    bail!("bio was not saved");
                }
            }
            None => println!("{}", journal.bio.load().unwrap_or_default()),
        },
    }
    Ok(())
}

fn list(journal: &mut Journal<'_>, collection: Collection) {
    match collection {
        Collection::Research => journal.research.attach(stdout_sink(), None),
        Collection::Models => journal
            .mental_models
            .attach(stdout_sink(), None),
        Collection::Progress => journal.progress.attach(stdout_sink(), None),
        Collection::Sessions => journal
            .concentration
            .attach(stdout_sink(), None),
        Collection::Papers => journal.papers.attach(stdout_sink(), None),
        Collection::Skills => journal.skills.attach(stdout_sink(), None),
        Collection::Courses => journal.courses.attach(stdout_sink(), None),
        Collection::Insights => journal.insights.attach(stdout_sink(), None),
        Collection::Reads => journal
            .reads
            .render(&mut StdoutSink::<Read>::default(), &mut NoopHook),
        Collection::Pomodoro => {
            print_records(journal.focus.sessions());
        }
    }
}

fn stdout_sink<'s, R: Record + Describe + 's>() -> Box<dyn RenderSink<R> + 's> {
    Box::new(StdoutSink::<R>::default())
}

/// Prints records through the stdout sink. Returns how many were printed.
fn print_records<R: Record + Describe>(records: &[R]) -> usize {
    let mut sink = StdoutSink::<R>::default();
    for (index, record) in records.iter().enumerate() {
        sink.append(index + 1, records.len(), record);
    }
    records.len()
}

fn add(journal: &mut Journal<'_>, record: AddCommand) -> Option<RecordId> {
    let clock = journal.clock();
    let notices = &mut journal.notices;
    match record {
        AddCommand::Research {
            title,
            link,
            tags,
            confidence,
        } => {
            let mut entry = ResearchEntry::new(title);
            entry.link = link;
            entry.tags = parse_tags(&tags);
            entry.confidence = confidence;
            journal.research.submit(entry, notices)
        }
        AddCommand::Model {
            name,
            description,
            layers,
        } => {
            let mut model = MentalModel::new(name);
            model.description = description;
            model.layers = parse_layers(&layers);
            journal.mental_models.submit(model, notices)
        }
        AddCommand::Progress {
            week,
            score,
            quick_wins,
        } => {
            let mut entry = ProgressEntry::new(week.unwrap_or_else(|| clock.today()), score);
            entry.quick_wins = quick_wins;
            journal.progress.submit(entry, notices)
        }
        AddCommand::Session {
            duration,
            score,
            date,
        } => {
            let session =
                ConcentrationSession::new(date.unwrap_or_else(|| clock.today()), duration, score);
            journal.concentration.submit(session, notices)
        }
        AddCommand::Paper { title, link } => {
            let paper = Paper {
                id: 0,
                title,
                external_link: link,
                date_added: clock.now_ms(),
            };
            journal.papers.submit(paper, notices)
        }
        AddCommand::Skill { title } => {
            let skill = Skill {
                id: 0,
                title,
                notes: String::new(),
                date_added: clock.now_ms(),
            };
            journal.skills.submit(skill, notices)
        }
        AddCommand::Course { title } => journal
            .courses
            .submit(Course::new(title, "Course description and materials..."), notices),
        AddCommand::Insight { title, content } => {
            let mut insight = Insight::new(title, content);
            insight.date = Some(clock.today().format("%-m/%-d/%Y").to_string());
            journal.insights.submit(insight, notices)
        }
        AddCommand::Read { title, content } => {
            let mut read = Read::new(title, content);
            read.date = Some(clock.today().format("%-m/%-d/%Y").to_string());
            journal.add_read(read)
        }
    }
}

fn edit(
    journal: &mut Journal<'_>,
    collection: Collection,
    edit: FieldEdit,
) -> anyhow::Result<()> {
    let (id, field) = (edit.id, edit.field.clone());
    let notices = &mut journal.notices;
    let (accepted, saved) = match collection {
        Collection::Research => (
            journal.research.input(edit),
            journal.research.blur(id, &field, notices),
        ),
        Collection::Models => (
            journal.mental_models.input(edit),
            journal.mental_models.blur(id, &field, notices),
        ),
        Collection::Progress => (
            journal.progress.input(edit),
            journal.progress.blur(id, &field, notices),
        ),
        Collection::Skills => (
            journal.skills.input(edit),
            journal.skills.blur(id, &field, notices),
        ),
        Collection::Courses => (
            journal.courses.input(edit),
            journal.courses.blur(id, &field, notices),
        ),
        Collection::Insights => (
            journal.insights.input(edit),
            journal.insights.blur(id, &field, notices),
        ),
        Collection::Reads => (
            journal.reads.input(edit),
            journal.reads.blur(id, &field, notices),
        ),
        Collection::Sessions | Collection::Papers | Collection::Pomodoro => {
            bail!("this collection has no editable fields")
        }
    };
    if !accepted {
        bail!("edit mode is off; rerun with --edit");
    }
    if !saved {
        bail!("edit was not saved");
    }
    Ok(())
}

fn delete(
    journal: &mut Journal<'_>,
    collection: Collection,
    id: RecordId,
    confirm: &mut dyn Confirm,
) -> anyhow::Result<()> {
    let notices = &mut journal.notices;
    match collection {
        Collection::Research => journal.research.delete(id, confirm, notices),
        Collection::Models => journal.mental_models.delete(id, confirm, notices),
        Collection::Progress => journal.progress.delete(id, confirm, notices),
        Collection::Sessions => journal.concentration.delete(id, confirm, notices),
        Collection::Papers => journal.papers.delete(id, confirm, notices),
        Collection::Skills => journal.skills.delete(id, confirm, notices),
        Collection::Courses => journal.courses.delete(id, confirm, notices),
        Collection::Insights => journal.insights.delete(id, confirm, notices),
        Collection::Reads | Collection::Pomodoro => {
            bail!("entries in this collection cannot be deleted")
        }
    };
    Ok(())
}

fn focus(journal: &mut Journal<'_>) -> anyhow::Result<()> {
    journal.focus.start();
    let mut tone = BellTone;
    let mut stdout = std::io::stdout();
    loop {
        std::thread::sleep(Duration::from_secs(1));
        let logged = journal.poll(&mut tone);
        write!(stdout, "\r{}", journal.focus.timer().readout())?;
        stdout.flush()?;
        if logged.is_some() || journal.focus.timer().state() == TimerState::Idle {
            writeln!(stdout)?;
            return Ok(());
        }
    }
}

fn ask(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
        Err(_) => false,
    }
}

fn print_notices(journal: &mut Journal<'_>) {
    for notice in journal.notices.drain() {
        match notice.kind {
            NotificationKind::Error => eprintln!("error: {}", notice.message),
            NotificationKind::Info | NotificationKind::Success => {
                eprintln!("{}", notice.message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{run, AddCommand, Collection, Commands};
    use fieldnotes_core::{
        Journal, JournalConfig, KeyValueStore, ManualClock, MemoryKeyValueStore, Page,
    };

    #[test]
    fn first_list_seeds_the_collection_page() {
        let kv = MemoryKeyValueStore::new();
        let clock = ManualClock::new(1_700_000_000_000);
        let mut journal = Journal::open(&kv, &clock);

        let listed = Commands::List {
            collection: Collection::Research,
        };
        run(listed, &mut journal, &JournalConfig::default()).unwrap();

        assert_eq!(journal.research.records().len(), 1);
        assert_eq!(journal.mental_models.records().len(), 2);
        assert!(kv.get("papers").unwrap().is_none());
    }

    #[test]
    fn first_add_keeps_the_samples() {
        let kv = MemoryKeyValueStore::new();
        let clock = ManualClock::new(1_700_000_000_000);
        let mut journal = Journal::open(&kv, &clock);

        let added = Commands::Add {
            record: AddCommand::Research {
                title: "My paper".to_string(),
                link: String::new(),
                tags: String::new(),
                confidence: 4,
            },
        };
        run(added, &mut journal, &JournalConfig::default()).unwrap();

        let titles: Vec<&str> = journal
            .research
            .records()
            .iter()
            .map(|entry| entry.title.as_str())
            .collect();
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[1], "My paper");

        let mut reopened = Journal::open(&kv, &clock);
        assert!(reopened.initialize_page(Page::Research).is_empty());
        assert_eq!(reopened.research.records().len(), 2);
    }

    #[test]
    fn home_edits_need_edit_mode() {
        let kv = MemoryKeyValueStore::new();
        let clock = ManualClock::new(1_700_000_000_000);
        let mut journal = Journal::open(&kv, &clock);
        journal.initialize_page(Page::Home);
        let id = journal.courses.records()[0].id;
        let rename = || Commands::Edit {
            collection: Collection::Courses,
            id,
            field: "title".to_string(),
            value: "Measure theory".to_string(),
        };

        assert!(run(rename(), &mut journal, &JournalConfig::default()).is_err());
        assert_eq!(journal.courses.records()[0].title, "Course 1");

        journal.set_edit_mode(true);
        run(rename(), &mut journal, &JournalConfig::default()).unwrap();
        assert_eq!(journal.courses.records()[0].title, "Measure theory");
    }
}
