//! epidemic — SIR-with-vaccination spread over a contact network.
//!
//! Loads an edge list, builds one `Person` per node, wires each person to
//! their graph neighbors, seeds a small fraction of infections, and runs the
//! two-phase model once per requested worker-thread count.  Per-run metrics
//! land in `<output>/threads-<n>/`; a scaling table is printed at the end.
//!
//! ```text
//! cargo run --release -p epidemic -- --rounds 100 --threads 1,2,4,8
//! ```

mod person;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, ensure};
use clap::Parser;
use log::info;

use ps_core::{AgentId, EngineConfig, SimRng};
use ps_engine::EngineBuilder;
use ps_network::{AdjacencyMap, GraphBuilder, RelationshipGraph, TopologyBuilder, load_edge_map};
use ps_output::{CsvMetricsWriter, PhaseMetricsObserver, ThreadPerformanceSummary};

use person::{DiseaseParams, Health, Person, census};

/// Contact-network epidemic on the phasesim engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Edge-list file (`source target` per line).  Defaults to the bundled
    /// sample network.
    #[arg(short, long)]
    edges: Option<PathBuf>,

    /// Worker-thread counts to run, comma separated.  The first is the
    /// speedup baseline.
    #[arg(short, long, value_delimiter = ',', default_value = "1,2,4")]
    threads: Vec<usize>,

    /// Rounds per run
    #[arg(short, long, default_value_t = 100)]
    rounds: u64,

    /// Treat the network as directed
    #[arg(long)]
    directed: bool,

    /// Add the reverse of every edge (directed networks only)
    #[arg(long)]
    symmetric: bool,

    #[arg(long, default_value_t = 0.05)]
    infection_rate: f64,

    #[arg(long, default_value_t = 0.1)]
    vaccination_rate: f64,

    #[arg(long, default_value_t = 0.1)]
    recovery_rate: f64,

    #[arg(long, default_value_t = 0.01)]
    waning_rate: f64,

    /// Fraction of the population infected at round 0 (at least one person)
    #[arg(long, default_value_t = 0.01)]
    initial_infected: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Abort a run if one phase takes longer than this many milliseconds
    #[arg(long)]
    phase_timeout_ms: Option<u64>,

    /// Directory for metrics CSV files
    #[arg(short, long, default_value = "output/epidemic")]
    output: PathBuf,
}

impl Args {
    fn params(&self) -> Result<DiseaseParams> {
        for (name, v) in [
            ("infection-rate", self.infection_rate),
            ("vaccination-rate", self.vaccination_rate),
            ("recovery-rate", self.recovery_rate),
            ("waning-rate", self.waning_rate),
            ("initial-infected", self.initial_infected),
        ] {
            ensure!((0.0..=1.0).contains(&v), "--{name} must be within [0, 1], got {v}");
        }
        Ok(DiseaseParams {
            infection_rate:   self.infection_rate,
            vaccination_rate: self.vaccination_rate,
            recovery_rate:    self.recovery_rate,
            waning_rate:      self.waning_rate,
        })
    }

    fn edges_path(&self) -> PathBuf {
        self.edges.clone().unwrap_or_else(|| {
            PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample_edges.txt"))
        })
    }
}

// ── Population setup ──────────────────────────────────────────────────────────

/// One person per node; person `i` carries `AgentId(i)` so edge-list ID `i`
/// resolves to them.
fn build_population(
    map:    &AdjacencyMap,
    args:   &Args,
    params: DiseaseParams,
) -> Result<(Vec<Arc<Person>>, RelationshipGraph)> {
    let n = map.node_count();
    let people: Vec<Arc<Person>> = (0..n)
        .map(|i| Arc::new(Person::new(AgentId(i as u32), args.seed, params)))
        .collect();

    let mut container = GraphBuilder::with_capacity(args.directed, n, map.edge_count());
    container.extend_nodes(people.iter().map(|p| p.id))?;
    let (graph, report) = TopologyBuilder::new(map, n, args.symmetric).populate_with_report(container)?;
    info!(
        "graph: {} nodes, {} distinct edges ({} reverse added)",
        graph.node_count(),
        graph.edge_count(),
        report.reverse_edges
    );

    for p in &people {
        let contacts = graph
            .adjacent(p.id)
            .into_iter()
            .filter_map(|id| people.get(id.index()).map(Arc::downgrade))
            .collect();
        p.connect(contacts);
    }

    let mut rng = SimRng::new(args.seed);
    let seeds = ((n as f64 * args.initial_infected).ceil() as usize).max(1);
    for i in rng.sample_indices(n, seeds) {
        people[i].set_health(Health::Infected);
    }

    Ok((people, graph))
}

fn print_census(label: &str, people: &[Arc<Person>]) {
    let counts = census(people);
    let cells: Vec<String> = Health::ALL
        .iter()
        .zip(counts)
        .map(|(h, c)| format!("{h:?}={c}"))
        .collect();
    println!("  {label:<8} {}", cells.join("  "));
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let params = args.params()?;
    ensure!(!args.threads.is_empty(), "--threads needs at least one value");

    let path = args.edges_path();
    let loaded = load_edge_map(&path).with_context(|| format!("loading {}", path.display()))?;
    ensure!(!loaded.map.is_empty(), "{} contains no edges", path.display());
    println!("{}", loaded.map.statistics_summary());
    println!(
        "  ({} lines, {} malformed, {} self-loops, parsed in {:?})",
        loaded.report.lines_processed,
        loaded.report.malformed_lines,
        loaded.report.self_loops,
        loaded.report.elapsed
    );
    println!();

    let mut perf = ThreadPerformanceSummary::new(args.threads[0]);

    for &threads in &args.threads {
        let (people, _graph) = build_population(&loaded.map, &args, params)?;

        let config = EngineConfig {
            num_threads:   Some(threads),
            phase_timeout: args.phase_timeout_ms.map(Duration::from_millis),
            total_rounds:  args.rounds,
            seed:          args.seed,
        };
        let mut engine = EngineBuilder::<Person>::new(config)
            .expected_agents(people.len())
            .build()?;
        for p in &people {
            engine.add_agent(Arc::clone(p))?;
        }

        let dir = args.output.join(format!("threads-{threads}"));
        let metrics = PhaseMetricsObserver::new(CsvMetricsWriter::new(&dir)?);
        let mut obs = (metrics, perf);

        println!("== {threads} worker threads ==");
        print_census("start", &people);
        let t0 = Instant::now();
        engine.run_to_end(&mut obs)?;
        let elapsed = t0.elapsed();
        print_census("end", &people);

        let stats = engine.stats().clone();
        engine.shutdown();

        let (mut metrics, p) = obs;
        perf = p;
        if let Some(e) = metrics.take_error() {
            eprintln!("metrics error: {e}");
        }
        println!(
            "  {} rounds, {} barriers, {} units ({} failed) in {:.3} s -> {}",
            stats.rounds_completed,
            stats.barriers,
            stats.dispatched,
            stats.failed,
            elapsed.as_secs_f64(),
            dir.display()
        );
        println!();
    }

    println!("{}", perf.render_table());
    Ok(())
}
