use clap::{Args, Parser, Subcommand};
use qa_conditions::{
    ConditionEngine, FormSpec, QuestionState, RequiredReport, Response, form_schema,
    responses_from_answers,
};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Inspect conditional question state",
    long_about = "Loads a form definition and answers, then reports which questions are visible, required and disabled"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Inputs {
    /// Path to the form definition JSON.
    #[arg(long, value_name = "SPEC")]
    spec: PathBuf,
    /// Optional JSON file containing answers keyed by question id.
    #[arg(long, value_name = "ANSWERS")]
    answers: Option<PathBuf>,
    /// Apply an answer after loading, in order (value parsed as JSON, falling back to text).
    #[arg(long = "set", value_name = "ID=VALUE")]
    updates: Vec<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the derived state of every question, or of a single one.
    State {
        #[command(flatten)]
        inputs: Inputs,
        /// Only report this question.
        #[arg(long, value_name = "ID")]
        question: Option<String>,
    },
    /// List visible question ids in form order.
    Visible {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// List the questions affected by a change to the given question's answer.
    Dependents {
        /// Path to the form definition JSON.
        #[arg(long, value_name = "SPEC")]
        spec: PathBuf,
        #[arg(long, value_name = "ID")]
        question: String,
    },
    /// Show how each condition of a question evaluated.
    Explain {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long, value_name = "ID")]
        question: String,
    },
    /// Report visible required questions that have no answer, and answers the form does not define.
    Missing {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// Print the JSON Schema of form definition files.
    Schema,
}

#[derive(Serialize)]
struct QuestionReport<'a> {
    id: &'a str,
    #[serde(flatten)]
    state: QuestionState,
}

fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::State { inputs, question } => run_state(inputs, question),
        Command::Visible { inputs } => run_visible(inputs),
        Command::Dependents { spec, question } => run_dependents(&spec, &question),
        Command::Explain { inputs, question } => run_explain(inputs, &question),
        Command::Missing { inputs } => run_missing(inputs),
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&form_schema())?);
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_state(inputs: Inputs, question: Option<String>) -> CliResult<()> {
    let (_, mut engine) = load_engine(&inputs)?;
    let output = match question {
        Some(id) => {
            let state = engine.question_state(&id);
            serde_json::to_value(QuestionReport { id: &id, state })?
        }
        None => serde_json::to_value(engine.states())?,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_visible(inputs: Inputs) -> CliResult<()> {
    let (_, mut engine) = load_engine(&inputs)?;
    for id in engine.visible_questions() {
        println!("{id}");
    }
    Ok(())
}

fn run_dependents(spec_path: &Path, question: &str) -> CliResult<()> {
    let spec = load_spec(spec_path)?;
    if spec.question(question).is_none() {
        return Err(format!("unknown question `{question}`").into());
    }
    let engine = ConditionEngine::from_form(&spec, &Value::Null);
    for id in engine.dependent_questions(question) {
        println!("{id}");
    }
    Ok(())
}

fn run_explain(inputs: Inputs, question: &str) -> CliResult<()> {
    let (spec, mut engine) = load_engine(&inputs)?;
    if spec.question(question).is_none() {
        return Err(format!("unknown question `{question}`").into());
    }
    let path = engine.evaluation_path(question);
    if path.is_empty() {
        println!("{question} has no conditions");
    }
    for line in path {
        println!("{line}");
    }
    let state = engine.question_state(question);
    println!(
        "=> visible={} required={} disabled={}",
        state.visible, state.required, state.disabled
    );
    Ok(())
}

fn run_missing(inputs: Inputs) -> CliResult<()> {
    let (_, mut engine) = load_engine(&inputs)?;
    let report = RequiredReport::from_engine(&mut engine);
    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.valid {
        Ok(())
    } else {
        Err("answers incomplete or not part of the form".into())
    }
}

fn load_engine(inputs: &Inputs) -> CliResult<(FormSpec, ConditionEngine)> {
    let spec = load_spec(&inputs.spec)?;
    let answers = match &inputs.answers {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Value::Object(Default::default()),
    };
    let mut engine = ConditionEngine::new(spec.questions.clone(), responses_from_answers(&answers));

    for update in &inputs.updates {
        let (id, value) = parse_update(update)?;
        debug!(question_id = %id, %value, "applying answer from command line");
        engine.update_response(&id, Response::new(value));
    }

    Ok((spec, engine))
}

fn load_spec(path: &Path) -> CliResult<FormSpec> {
    let text = fs::read_to_string(path)?;
    Ok(FormSpec::from_json_str(&text)?)
}

fn parse_update(raw: &str) -> CliResult<(String, Value)> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got `{raw}`"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing question id in `{raw}`").into());
    }
    let value = serde_json::from_str(value.trim())
        .unwrap_or_else(|_| Value::String(value.trim().to_string()));
    Ok((id.to_string(), value))
}
