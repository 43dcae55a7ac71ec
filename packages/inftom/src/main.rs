use std::{fs::File, sync::Mutex};

use chrono::Local;
use clap::Parser;
use colored::{ColoredString, Colorize};
use inftom_lib::{
    automaton::{
        dfa::DFA,
        runner::{RunOutcome, SerializableRunStatus},
        word::Word,
    },
    config::{GeneralConfig, LoggerConfig, RunConfig},
    logger::{LogLevel, level_filter},
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "inftom")]
#[command(version = "0.1")]
#[command(about = "Run words through a deterministic finite automaton", long_about = None)]
struct Args {
    /// The automaton, as a `.json` file.
    file: String,

    /// The words to run, e.g. `a,b,a`. Without any words, a summary of the
    /// automaton is printed instead.
    words: Vec<String>,

    #[arg(short, long)]
    config: Option<String>,

    /// Enable logging at the given level, overriding the config file.
    #[arg(short, long)]
    log_level: Option<LogLevel>,

    /// Include the visited states of every run in the output.
    #[arg(short, long)]
    trace: bool,

    /// Print the automaton in graphviz format.
    #[arg(short, long)]
    graphviz: bool,
}

#[derive(Debug, Serialize)]
struct RunReport {
    word: String,
    status: SerializableRunStatus,
    state: Option<String>,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
    states: Vec<&'a str>,
    alphabet: Vec<&'a str>,
    initial_state: &'a str,
    final_states: Vec<&'a str>,
    reachable_states: Vec<&'a str>,
    language_empty: bool,
    shortest_accepted_word: Option<String>,
}

fn init_tracing(config: &LoggerConfig) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level_filter(config))
        .with_target(false);

    if *config.get_log_file() {
        std::fs::create_dir_all("./logs")?;
        let path = format!(
            "./logs/inftom_run_{}.txt",
            Local::now().format("%Y-%m-%d_%H-%M-%S")
        );
        let file = File::create(path)?;
        colored::control::set_override(false);
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        builder.with_writer(std::io::stderr).init();
    }

    Ok(())
}

fn report(dfa: &DFA, word: &Word, trace: bool) -> RunReport {
    let (outcome, visited) = dfa.runner(word).run_with_trace();
    let outcome: RunOutcome<String> = dfa.named_outcome(outcome);
    let status = SerializableRunStatus::from(&outcome);

    tracing::info!("[{}] {:?}: {}", status_label(status), word.to_string(), outcome);

    RunReport {
        word: word.to_string(),
        status,
        state: outcome.state().cloned(),
        detail: outcome.to_string(),
        trace: trace.then(|| {
            visited
                .iter()
                .filter_map(|node| dfa.state_name(*node))
                .map(String::from)
                .collect()
        }),
    }
}

fn status_label(status: SerializableRunStatus) -> ColoredString {
    match status {
        SerializableRunStatus::Accepted => "ACC".bright_green(),
        SerializableRunStatus::Rejected => "REJ".bright_red(),
        SerializableRunStatus::InvalidWord => "INV".yellow(),
    }
}

fn summary(dfa: &DFA) -> Summary<'_> {
    Summary {
        states: dfa.states().collect(),
        alphabet: dfa.alphabet().iter().collect(),
        initial_state: dfa.initial_state(),
        final_states: dfa.final_states().collect(),
        reachable_states: dfa.reachable_states(),
        language_empty: dfa.is_language_empty(),
        shortest_accepted_word: dfa.shortest_accepted_word().map(|word| word.to_string()),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = RunConfig::from_optional_file(args.config.as_ref())?;
    if args.trace {
        config.set_trace(true);
    }
    if let Some(level) = args.log_level {
        let logger = config
            .get_logger()
            .clone()
            .with_enabled(true)
            .with_log_level(level);
        config.set_logger(logger);
    }

    init_tracing(config.logger())?;
    tracing::debug!("Logging at level {}", config.logger().get_log_level());

    let dfa = DFA::from_file(&args.file)?;
    tracing::info!("Loaded automaton from {}", args.file);

    if args.graphviz {
        print!("{}", dfa.to_graphviz());
        return Ok(());
    }

    if args.words.is_empty() {
        println!("{}", serde_json::to_string_pretty(&summary(&dfa))?);
        return Ok(());
    }

    let reports = args
        .words
        .iter()
        .map(|text| {
            let word = Word::parse(text, config.get_word_separator());
            report(&dfa, &word, *config.get_trace())
        })
        .collect::<Vec<_>>();

    println!("{}", serde_json::to_string_pretty(&reports)?);

    Ok(())
}

#[test]
fn test_status_label() {
    colored::control::set_override(false);

    assert_eq!(status_label(SerializableRunStatus::Accepted).to_string(), "ACC");
    assert_eq!(status_label(SerializableRunStatus::Rejected).to_string(), "REJ");
    assert_eq!(status_label(SerializableRunStatus::InvalidWord).to_string(), "INV");
}

#[test]
fn test_log_level_argument() {
    let args = Args::try_parse_from(["inftom", "dfa.json", "a,b", "-l", "dbg"]).unwrap();
    assert_eq!(args.log_level, Some(LogLevel::Debug));
    assert_eq!(args.words, vec!["a,b"]);

    assert!(Args::try_parse_from(["inftom", "dfa.json", "-l", "verbose"]).is_err());
}
