use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use kstep::{
    ClusteringSession, Domain, InitStrategy, Point, ScheduleExit, SessionConfig, SessionDriver,
    SessionSnapshot, kmeans,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Call step() a fixed number of times
    Step,
    /// Step once per auto-step period until converged
    Auto,
    /// Step once per run period until converged
    Run,
    /// Non-interactive k-means to convergence
    Batch,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DomainArg {
    /// [-10, 10]
    Symmetric,
    /// [0, 10]
    Positive,
}

impl From<DomainArg> for Domain {
    fn from(arg: DomainArg) -> Self {
        match arg {
            DomainArg::Symmetric => Domain::SYMMETRIC,
            DomainArg::Positive => Domain::POSITIVE,
        }
    }
}

/// Step-through k-means clustering over a random 2D point set
#[derive(Debug, Parser)]
#[command(name = "kstep", version)]
struct Args {
    /// JSON session config; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of clusters
    #[arg(short, long)]
    k: Option<usize>,

    /// random | farthest | kmeans++ | manual
    #[arg(short, long)]
    strategy: Option<InitStrategy>,

    /// Number of points to generate
    #[arg(short = 'n', long)]
    points: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum)]
    domain: Option<DomainArg>,

    #[arg(short, long, value_enum, default_value = "run")]
    mode: Mode,

    /// Steps to take in step mode
    #[arg(long, default_value_t = 10)]
    steps: usize,

    /// Manual centroid as X,Y (repeat once per cluster)
    #[arg(long = "pick", value_parser = parse_point)]
    picks: Vec<Point>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn parse_point(raw: &str) -> Result<Point, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("Expected X,Y but got: {}", raw))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("Invalid x in {}: {}", raw, e))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("Invalid y in {}: {}", raw, e))?;
    Ok(Point::new(x, y))
}

fn build_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };

    if let Some(k) = args.k {
        config.k = k;
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(n) = args.points {
        config.point_count = n;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(domain) = args.domain {
        config.domain = domain.into();
    }

    config.validate().context("Invalid session config")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = build_config(&args)?;
    let start_time = Instant::now();

    println!("=== kstep: step-through k-means ===\n");

    let mut session = ClusteringSession::new(config.clone())?;
    session.generate_points(config.point_count);
    println!(
        "✓ Generated {} points over [{}, {}]",
        session.points().len(),
        config.domain.min,
        config.domain.max
    );
    println!("  k={} strategy={}\n", config.k, config.strategy);

    if let Mode::Batch = args.mode {
        let seed = config.seed.unwrap_or(42);
        let result = kmeans(session.points(), config.k, config.strategy, 100, seed)
            .context("Batch clustering failed")?;

        println!(
            "✓ {} in {} iterations",
            if result.converged { "Converged" } else { "Stopped" },
            result.iterations
        );
        for cluster in &result.clusters {
            println!(
                "  Cluster {}: {} points, centroid ({:.3}, {:.3})",
                cluster.id,
                cluster.point_ids.len(),
                cluster.centroid.x,
                cluster.centroid.y
            );
        }
        if args.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        return Ok(());
    }

    if config.strategy == InitStrategy::Manual {
        if args.picks.len() < config.k {
            bail!(
                "Manual strategy needs {} --pick values, got {}",
                config.k,
                args.picks.len()
            );
        }
        for p in &args.picks {
            if !session.offer_point(*p) {
                println!("  Ignored pick ({}, {})", p.x, p.y);
            }
        }
        println!("✓ Manual centroids selected\n");
    }

    let mut driver = SessionDriver::new(session);

    match args.mode {
        Mode::Step => {
            for _ in 0..args.steps {
                let outcome = driver.step().await.context("Step failed")?;
                println!("  step {:>3} [{}]", outcome.step, outcome.state);
                if outcome.converged {
                    break;
                }
            }
        }
        Mode::Auto | Mode::Run => {
            if let Mode::Auto = args.mode {
                driver.start_auto_step().await;
            } else {
                driver.run_to_convergence().await;
            }

            match driver.wait().await.context("Scheduled run failed")? {
                ScheduleExit::Converged { steps } => println!("  Finished after {} steps", steps),
                ScheduleExit::Cancelled => println!("  Schedule cancelled"),
            }
        }
        Mode::Batch => {}
    }

    let snapshot = driver.snapshot().await;
    print_summary(&snapshot);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    println!(
        "\nTotal execution:      {:.3}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

fn print_summary(snapshot: &SessionSnapshot) {
    println!("\n=== Session {} ===", snapshot.session_id);
    println!("State:                {}", snapshot.state);
    println!("Step:                 {}", snapshot.step);

    if !snapshot.state.has_centroids() {
        println!("  No centroids yet ({} manual picks)", snapshot.manual_selection.len());
        return;
    }

    let mut sizes = vec![0usize; snapshot.centroids.len()];
    for &label in &snapshot.assignment {
        if let Some(size) = sizes.get_mut(label) {
            *size += 1;
        }
    }

    for (i, c) in snapshot.centroids.iter().enumerate() {
        println!(
            "  Cluster {}: ({:.3}, {:.3}) - {} points",
            i, c.x, c.y, sizes[i]
        );
    }
}
