mod logic;

use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;

use rogue_game::GameData;

use logic::{RunRecord, SimulationConfig, StrategyId, run_simulation, verify_determinism};

#[derive(Debug, Parser)]
#[command(name = "rogue-tester", version)]
#[command(about = "Headless QA harness for the Agent Rogue simulation core")]
struct Args {
    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Strategies to run (repeatable; defaults to all)
    #[arg(long, value_enum)]
    strategy: Vec<StrategyId>,

    /// Day cap per run before it is declared a timeout
    #[arg(long, default_value_t = 60)]
    max_days: u32,

    /// Replay every seed twice and fail on any divergence
    #[arg(long)]
    check_determinism: bool,

    /// Path to a JSON events/upgrades catalog (builtin content when omitted)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json"])]
    report: String,

    /// Optional path to write the report instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("{}", "🎮 Agent Rogue Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());

    let data = load_data(&args)?;
    let seeds = parse_seeds(&args.seeds)?;
    let strategies = if args.strategy.is_empty() {
        StrategyId::ALL.to_vec()
    } else {
        args.strategy.clone()
    };

    let start_time = Instant::now();
    let mut records: Vec<RunRecord> = Vec::new();

    for &strategy in &strategies {
        for &seed in &seeds {
            let config = SimulationConfig::new(strategy, seed).with_max_days(args.max_days);
            if args.check_determinism {
                if let Err(msg) = verify_determinism(config, &data) {
                    bail!("determinism check failed: {msg}");
                }
            }
            records.push(run_simulation(config, &data));
        }
    }
    log::info!(
        "finished {} runs across {} strategies",
        records.len(),
        strategies.len()
    );

    write_report(&args, &records, start_time)?;
    Ok(())
}

fn load_data(args: &Args) -> Result<GameData> {
    match &args.data {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            GameData::from_json(&json)
                .with_context(|| format!("invalid catalog in {}", path.display()))
        }
        None => Ok(GameData::builtin()),
    }
}

fn parse_seeds(raw: &str) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let seed = token
            .parse::<u64>()
            .with_context(|| format!("invalid seed: {token}"))?;
        seeds.push(seed);
    }
    if seeds.is_empty() {
        bail!("no seeds provided");
    }
    Ok(seeds)
}

fn write_report(args: &Args, records: &[RunRecord], start_time: Instant) -> Result<()> {
    let mut target = OutputTarget::new(args.output.clone())?;
    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(target.writer(), records)?,
        _ => {
            let duration = start_time.elapsed();
            logic::reports::generate_console_report(target.writer(), records, duration)?;
        }
    }
    target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_seeds_handles_csv_with_spaces() {
        let seeds = parse_seeds("1, 2,3 ,").unwrap();
        assert_eq!(seeds, vec![1, 2, 3]);
    }

    #[test]
    fn parse_seeds_rejects_garbage() {
        assert!(parse_seeds("one").is_err());
        assert!(parse_seeds("").is_err());
    }

    #[test]
    fn builtin_data_loads_without_a_path() {
        let args = Args {
            seeds: "1".to_string(),
            strategy: Vec::new(),
            max_days: 60,
            check_determinism: false,
            data: None,
            report: "console".to_string(),
            output: None,
        };
        let data = load_data(&args).unwrap();
        assert!(!data.events.is_empty());
        assert!(!data.upgrades.is_empty());
    }

    #[test]
    fn write_report_emits_json_to_file() {
        let temp = std::env::temp_dir().join("rogue-tester-report.json");
        let args = Args {
            seeds: "1".to_string(),
            strategy: Vec::new(),
            max_days: 60,
            check_determinism: false,
            data: None,
            report: "json".to_string(),
            output: Some(temp.clone()),
        };
        let data = GameData::builtin();
        let record = run_simulation(SimulationConfig::new(StrategyId::Balanced, 1), &data);
        write_report(&args, &[record], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("\"seed\": 1"));
    }
}
