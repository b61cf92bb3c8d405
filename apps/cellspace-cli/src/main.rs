use anyhow::Context;
use cellspace_rules::RuleCatalog;
use cellspace_sandbox::{Sandbox, SandboxConfig, Scenario};
use clap::{Args, Parser, Subcommand, ValueEnum};
use glam::Vec2;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cellspace-cli", about = "Voxel cellular automaton sandbox")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Sandbox config file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the camera render distance
    #[arg(long, global = true)]
    render_distance: Option<i32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the effective config
    Info,
    /// List the rule catalog
    Rules,
    /// Seed a scenario, run it and print a summary
    Run {
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Ticks to simulate
        #[arg(short, long, default_value = "10")]
        ticks: u64,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
        /// Also list the visible cells
        #[arg(long)]
        show: bool,
    },
    /// Seed a scenario, run it and write the frame as PNG
    Render {
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Ticks to simulate before rendering
        #[arg(short, long, default_value = "0")]
        ticks: u64,
        /// Output file
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
    },
    /// List the voxels under a screen point
    Pick {
        #[command(flatten)]
        scenario: ScenarioArgs,
        #[arg(short = 'x', long)]
        x: f32,
        #[arg(short = 'y', long)]
        y: f32,
    },
}

#[derive(Args)]
struct ScenarioArgs {
    /// Starting population
    #[arg(short, long, value_enum, default_value = "blinker")]
    scenario: ScenarioKind,
    /// RNG seed for the random scenario
    #[arg(long, default_value = "42")]
    seed: u64,
    /// Cells placed by the random scenario
    #[arg(long, default_value = "40")]
    count: usize,
    /// Half-width of the random scenario's square
    #[arg(long, default_value = "6")]
    radius: i32,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ScenarioKind {
    Empty,
    Blinker,
    Glider,
    Virus,
    Random,
}

impl ScenarioArgs {
    fn scenario(&self) -> Option<Scenario> {
        match self.scenario {
            ScenarioKind::Empty => None,
            ScenarioKind::Blinker => Some(Scenario::Blinker),
            ScenarioKind::Glider => Some(Scenario::Glider),
            ScenarioKind::Virus => Some(Scenario::Virus),
            ScenarioKind::Random => Some(Scenario::Random {
                seed: self.seed,
                count: self.count,
                radius: self.radius,
            }),
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<SandboxConfig> {
    let mut config = match &cli.config {
        Some(path) => SandboxConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SandboxConfig::default(),
    };
    if let Some(distance) = cli.render_distance {
        config.camera.render_distance = distance;
    }
    Ok(config)
}

fn build_sandbox(config: &SandboxConfig, args: &ScenarioArgs) -> anyhow::Result<Sandbox> {
    let mut sandbox = Sandbox::new(config).context("building sandbox")?;
    if let Some(scenario) = args.scenario() {
        sandbox.seed(&scenario)?;
    }
    Ok(sandbox)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = load_config(&cli)?;

    match &cli.command {
        Commands::Info => {
            println!("cellspace-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("rules: {}", RuleCatalog::standard().len());
            print!("{}", config.to_yaml()?);
        }
        Commands::Rules => {
            let catalog = RuleCatalog::standard();
            for name in catalog.names() {
                println!("{name:<24} {}", catalog.describe(name).unwrap_or_default());
            }
        }
        Commands::Run {
            scenario,
            ticks,
            json,
            show,
        } => {
            let mut sandbox = build_sandbox(&config, scenario)?;
            let reports = sandbox.run_ticks(*ticks);
            tracing::info!(cycles = reports.len(), "run complete");
            let summary = sandbox.summary();
            if *json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{summary}");
            }
            if *show {
                print!("{}", sandbox.render_text());
            }
        }
        Commands::Render {
            scenario,
            ticks,
            output,
            width,
            height,
        } => {
            config.width = width.unwrap_or(config.width);
            config.height = height.unwrap_or(config.height);
            let mut sandbox = build_sandbox(&config, scenario)?;
            sandbox.run_ticks(*ticks);
            let frame = sandbox.render();
            let image = image::RgbImage::from_raw(frame.width(), frame.height(), frame.to_rgb_bytes())
                .context("frame buffer does not match its size")?;
            image
                .save(output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!(
                "wrote {}x{} frame to {} ({} cells)",
                frame.width(),
                frame.height(),
                output.display(),
                sandbox.world().len()
            );
        }
        Commands::Pick { scenario, x, y } => {
            let sandbox = build_sandbox(&config, scenario)?;
            let voxels = sandbox.pick(Vec2::new(*x, *y));
            for voxel in &voxels {
                let c = voxel.coord;
                let occupant = sandbox
                    .world()
                    .cell_at(c)
                    .map(|cell| cell.kind().to_string())
                    .unwrap_or_else(|| "-".into());
                println!("({}, {}, {}) t={:.3} {occupant}", c.x, c.y, c.z, voxel.t);
            }
        }
    }

    Ok(())
}
