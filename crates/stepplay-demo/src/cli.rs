use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use stepplay::prelude::*;
use stepplay::{
    ArrayForm, BinarySearch, BreadthFirstSearch, BubbleSort, ConfigError, DepthFirstSearch,
    GraphForm, HeapSort, MergeSort, MinimumSpanningTree, RadixSort, SearchForm, SlidingWindow,
    TopologicalSort, TwoPointers, ValidationError, WindowForm,
};

/// Host-side sleep between polls in `play` mode.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

#[derive(Debug, Parser)]
#[command(
    name = "stepplay-demo",
    about = "Play a classic algorithm step by step in the terminal",
    version
)]
pub struct Cli {
    /// Algorithm to play.
    #[arg(value_enum)]
    pub algorithm: Algorithm,

    /// Array input for sorts and searches.
    #[arg(long, default_value = "5 2 9 1 7 3 8 6")]
    pub array: String,

    /// Search target (binary search, two pointers).
    #[arg(long, default_value = "7")]
    pub target: String,

    /// Window size (sliding window).
    #[arg(long, default_value = "3")]
    pub size: String,

    /// Edge list, e.g. "A-B:4 A-C:1".
    #[arg(long, default_value = "A-B:4 A-C:1 B-C:2 B-D:5 C-D:8 D-E:3")]
    pub edges: String,

    /// Start node for DFS and BFS.
    #[arg(long, default_value = "A")]
    pub start: String,

    /// Tick interval override in milliseconds.
    #[arg(long = "speed-ms")]
    pub speed_ms: Option<u64>,

    /// Playback configuration file (`.toml` or `.json`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Auto-advance on a timer, or step manually without one.
    #[arg(long, value_enum, default_value_t = Mode::Play)]
    pub mode: Mode,

    /// Print the step log as JSONL after the run.
    #[arg(long)]
    pub jsonl: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    #[value(name = "bubble-sort")]
    BubbleSort,
    #[value(name = "heap-sort")]
    HeapSort,
    #[value(name = "merge-sort")]
    MergeSort,
    #[value(name = "radix-sort")]
    RadixSort,
    #[value(name = "binary-search")]
    BinarySearch,
    #[value(name = "two-pointers")]
    TwoPointers,
    #[value(name = "sliding-window")]
    SlidingWindow,
    Dfs,
    Bfs,
    #[value(name = "topo-sort")]
    TopoSort,
    Kruskal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Timer-driven playback on the wall clock.
    Play,
    /// Apply every step back to back.
    Step,
}

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("{0}")]
    Input(#[from] ValidationError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DemoError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Input(_) => 2,
            Self::Config(_) => 3,
            Self::Io(_) => 1,
        }
    }
}

pub fn run_from_env() -> Result<(), DemoError> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    run(&cli, &mut stdout.lock())
}

pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<(), DemoError> {
    let config = load_config(cli.config.as_deref(), cli.speed_ms)?;
    tracing::info!(
        algorithm = ?cli.algorithm,
        mode = ?cli.mode,
        speed_ms = config.speed_ms,
        "demo_start"
    );
    let array = ArrayForm::new(cli.array.as_str());
    let search = SearchForm::new(cli.array.as_str(), cli.target.as_str());
    let window = WindowForm::new(cli.array.as_str(), cli.size.as_str());
    let graph = GraphForm::new(cli.edges.as_str(), cli.start.as_str());

    match cli.algorithm {
        Algorithm::BubbleSort => drive_array(BubbleSort, &array, cli, config, out),
        Algorithm::HeapSort => drive_array(HeapSort, &array, cli, config, out),
        Algorithm::MergeSort => drive_array(MergeSort, &array, cli, config, out),
        Algorithm::RadixSort => drive_array(RadixSort, &array, cli, config, out),
        Algorithm::BinarySearch => drive_array(BinarySearch, &search, cli, config, out),
        Algorithm::TwoPointers => drive_array(TwoPointers, &search, cli, config, out),
        Algorithm::SlidingWindow => drive_array(SlidingWindow, &window, cli, config, out),
        Algorithm::Dfs => drive_graph(DepthFirstSearch, &graph, cli, config, out),
        Algorithm::Bfs => drive_graph(BreadthFirstSearch, &graph, cli, config, out),
        Algorithm::TopoSort => drive_graph(TopologicalSort, &graph, cli, config, out),
        Algorithm::Kruskal => drive_graph(MinimumSpanningTree, &graph, cli, config, out),
    }
}

fn drive_array<P: StepProducer, W: Write>(
    producer: P,
    input: &P::Input,
    cli: &Cli,
    config: PlaybackConfig,
    out: &mut W,
) -> Result<(), DemoError> {
    drive(producer, ArrayView::new(), input, ArrayView::render, cli, config, out)
}

fn drive_graph<P: StepProducer, W: Write>(
    producer: P,
    input: &P::Input,
    cli: &Cli,
    config: PlaybackConfig,
    out: &mut W,
) -> Result<(), DemoError> {
    drive(producer, GraphView::new(), input, GraphView::render, cli, config, out)
}

fn load_config(path: Option<&Path>, speed_ms: Option<u64>) -> Result<PlaybackConfig, DemoError> {
    let mut config = match path {
        Some(path) if path.extension().is_some_and(|ext| ext == "toml") => {
            PlaybackConfig::from_toml_file(path)?
        }
        Some(path) => PlaybackConfig::from_json_file(path)?,
        None => PlaybackConfig::default(),
    };
    if let Some(ms) = speed_ms {
        config = config.with_speed_ms(ms);
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors).into());
        }
    }
    Ok(config)
}

fn drive<P, A, W>(
    producer: P,
    applier: A,
    input: &P::Input,
    render: fn(&A) -> String,
    cli: &Cli,
    config: PlaybackConfig,
    out: &mut W,
) -> Result<(), DemoError>
where
    P: StepProducer,
    A: VisualApplier,
    W: Write,
{
    let mut player =
        PlaybackController::with_config(producer, applier, MonotonicClock::new(), config);
    match cli.mode {
        Mode::Step => {
            player.load(input)?;
            while player.step_forward().changed() {
                frame(&player, render, out)?;
            }
        }
        Mode::Play => {
            player.start(input)?;
            frame(&player, render, out)?;
            while player.state() != PlaybackState::Finished {
                if player.poll().changed() {
                    frame(&player, render, out)?;
                }
                thread::sleep(POLL_INTERVAL);
            }
        }
    }
    if cli.jsonl {
        writeln!(out, "{}", player.log().to_jsonl())?;
    }
    Ok(())
}

fn frame<P, A, W>(
    player: &PlaybackController<P, A>,
    render: fn(&A) -> String,
    out: &mut W,
) -> io::Result<()>
where
    P: StepProducer,
    A: VisualApplier,
    W: Write,
{
    writeln!(out, "{}", render(player.applier()))?;
    writeln!(out, "{}", player.status_line())?;
    writeln!(out)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["stepplay-demo"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("valid arguments")
    }

    fn output(cli: &Cli) -> String {
        let mut buf = Vec::new();
        run(cli, &mut buf).expect("run succeeds");
        String::from_utf8(buf).expect("utf8 output")
    }

    #[test]
    fn step_mode_ends_finished() {
        let cli = parse(&["bubble-sort", "--array", "3 1 2", "--mode", "step"]);
        let text = output(&cli);
        let last_status = text
            .lines()
            .filter(|l| l.contains(" · step "))
            .last()
            .expect("at least one frame");
        assert!(last_status.starts_with("Finished"), "{last_status}");
    }

    #[test]
    fn play_mode_runs_on_the_wall_clock() {
        let cli = parse(&[
            "binary-search",
            "--array",
            "1 3 5 7",
            "--target",
            "5",
            "--speed-ms",
            "10",
        ]);
        let text = output(&cli);
        assert!(text.contains("Playing"));
        assert!(text.contains("Finished"));
    }

    #[test]
    fn invalid_input_maps_to_exit_code_two() {
        let cli = parse(&["heap-sort", "--array", "1, two", "--mode", "step"]);
        let err = run(&cli, &mut Vec::new()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), ValidationError::InvalidArray.to_string());
    }

    #[test]
    fn out_of_range_speed_is_a_config_error() {
        let cli = parse(&["dfs", "--speed-ms", "0"]);
        let err = run(&cli, &mut Vec::new()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn json_config_file_is_honoured() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("playback.json");
        std::fs::write(&path, r#"{"limits": {"max_len": 2, "max_abs_value": 99}}"#)
            .expect("write config");
        let cli = parse(&[
            "merge-sort",
            "--array",
            "3 2 1",
            "--mode",
            "step",
            "--config",
            path.to_str().expect("utf8 path"),
        ]);
        let err = run(&cli, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, DemoError::Input(ValidationError::TooManyValues { max: 2 })));
    }

    #[test]
    fn jsonl_flag_appends_the_step_log() {
        let cli = parse(&["kruskal", "--mode", "step", "--jsonl"]);
        let text = output(&cli);
        assert!(text.lines().any(|l| l.starts_with('{') && l.contains("\"event\":\"step\"")));
    }
}
