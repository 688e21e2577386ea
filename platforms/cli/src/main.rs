use anyhow::{bail, Context};
use automata_engine::{
    missing_transitions, unreachable_states, AutomatonLoader, Dfa, Machine, Nfa, RunConfig,
    Step, TuringMachine, DEFAULT_STEP_BUDGET,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    Nfa,
    Dfa,
    Tm,
}

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The kind of automaton the definition describes
    #[clap(short, long, value_enum)]
    kind: Kind,

    /// The JSON definition file to load
    #[clap(short, long)]
    definition: PathBuf,

    /// An input word to run; repeat for several words
    #[clap(short, long)]
    input: Vec<String>,

    /// Print the DFA obtained by subset construction (NFA only)
    #[clap(long)]
    to_dfa: bool,

    /// Print each step of the execution
    #[clap(short, long)]
    trace: bool,

    /// Step budget for Turing Machines
    #[clap(short, long, default_value_t = DEFAULT_STEP_BUDGET)]
    max_steps: usize,

    /// Log at debug level unless RUST_LOG says otherwise
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.to_dfa && cli.kind != Kind::Nfa {
        bail!("--to-dfa requires --kind nfa");
    }

    match cli.kind {
        Kind::Nfa => run_nfa(&cli),
        Kind::Dfa => run_dfa(&cli),
        Kind::Tm => run_tm(&cli),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load<T: serde::de::DeserializeOwned>(cli: &Cli) -> anyhow::Result<T> {
    AutomatonLoader::load(&cli.definition)
        .with_context(|| format!("loading {}", cli.definition.display()))
}

fn run_nfa(cli: &Cli) -> anyhow::Result<()> {
    let nfa: Nfa = load(cli)?;
    warn_unreachable(unreachable_states(&nfa));

    if cli.to_dfa {
        let dfa = nfa.to_dfa()?;
        println!("{}", serde_json::to_string_pretty(&dfa)?);
    }

    for input in &cli.input {
        let trace = automata_engine::simulator::trace(&nfa, input)?;
        if cli.trace {
            for (i, active) in trace.steps.iter().enumerate() {
                let names: Vec<&str> = active.iter().map(String::as_str).collect();
                println!("  {:>3}  {{{}}}", i, names.join(","));
            }
        }
        println!("{:?}: {}", input, trace.verdict);
    }
    Ok(())
}

fn run_dfa(cli: &Cli) -> anyhow::Result<()> {
    let dfa: Dfa = load(cli)?;
    warn_unreachable(unreachable_states(&dfa));
    if !dfa.is_complete() {
        tracing::info!("transition function is partial, missing moves reject");
    }

    for input in &cli.input {
        let trace = dfa.trace(input)?;
        if cli.trace {
            println!("  {}", trace.path.join(" -> "));
        }
        println!("{:?}: {}", input, trace.verdict);
    }
    Ok(())
}

fn run_tm(cli: &Cli) -> anyhow::Result<()> {
    let tm: TuringMachine = load(cli)?;
    warn_unreachable(unreachable_states(&tm));
    for (state, symbol) in missing_transitions(&tm) {
        tracing::debug!(state = %state, %symbol, "no rule, reading it rejects");
    }

    let config = RunConfig {
        max_steps: cli.max_steps,
    };
    for input in &cli.input {
        let outcome = if cli.trace {
            let mut machine = Machine::new(&tm, input)?;
            println!("  {machine}");
            while !machine.is_halted() && machine.step_count() < config.max_steps {
                if let Step::Halt(halt) = machine.step() {
                    println!("  {machine}  {halt:?}");
                } else {
                    println!("  {machine}");
                }
            }
            machine.run(config.max_steps)
        } else {
            tm.run(input, &config)?
        };

        println!(
            "{:?}: {} after {} steps, tape {:?}",
            input,
            outcome.verdict,
            outcome.steps,
            outcome.tape_string()
        );
    }
    Ok(())
}

fn warn_unreachable(states: Vec<String>) {
    if !states.is_empty() {
        tracing::warn!(?states, "unreachable states");
    }
}
