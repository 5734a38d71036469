// RRT-Connect demo
//
// Plans in one of a few canned scenarios and optionally plots both trees,
// the dynamic-domain box and the path.
//
// Usage:
//   cargo run --bin rrt_connect_demo -- --scenario gap --seed 7 --output gap.png
//   RUST_LOG=debug cargo run --bin rrt_connect_demo -- --scenario arm

use std::f64::consts::PI;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::info;
use nalgebra::DVector;

use rrt_connect::models::{BoxWorld, CircleObstacle, PlanarArm};
use rrt_connect::path_planning::DistributionType;
use rrt_connect::utils::Visualizer;
use rrt_connect::{Configuration, ConfigurationSpace, PlannerConfig, PlanningResult, RrtConnectPlanner};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scenario {
    /// Empty 2-D square
    Free,
    /// Wall splitting the square in two; unsolvable
    Wall,
    /// Wall with a narrow passage
    Gap,
    /// Three-link planar arm reaching around a circle
    Arm,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Distribution {
    Uniform,
    Normal,
}

/// Bidirectional RRT-Connect demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, value_enum, default_value = "gap")]
    scenario: Scenario,

    /// Sampler seed; entropy when absent
    #[arg(long)]
    seed: Option<u64>,

    /// Planner configuration as JSON; flags below override it
    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    duration_ms: Option<u64>,

    #[arg(long)]
    delta: Option<f64>,

    #[arg(long, value_enum)]
    distribution: Option<Distribution>,

    #[arg(long)]
    no_dynamic_domain: bool,

    #[arg(long)]
    no_weighted_metric: bool,

    #[arg(long)]
    no_goal_bias: bool,

    #[arg(long)]
    no_exhaustion: bool,

    /// Write a PNG of the search to this path
    #[arg(long)]
    output: Option<String>,
}

fn q2(x: f64, y: f64) -> Configuration {
    DVector::from_vec(vec![x, y])
}

fn planner_config(args: &Args) -> PlanningResult<PlannerConfig> {
    let mut config = match &args.config {
        Some(path) => PlannerConfig::from_json_file(path)?,
        None => PlannerConfig {
            delta: 0.1,
            duration: Duration::from_secs(5),
            ..Default::default()
        },
    };

    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(ms) = args.duration_ms {
        config.duration = Duration::from_millis(ms);
    }
    if let Some(delta) = args.delta {
        config.delta = delta;
    }
    if let Some(distribution) = args.distribution {
        config.distribution = match distribution {
            Distribution::Uniform => DistributionType::Uniform,
            Distribution::Normal => DistributionType::Normal,
        };
    }
    config.strategy.dynamic_domain &= !args.no_dynamic_domain;
    config.strategy.weighted_metric &= !args.no_weighted_metric;
    config.strategy.goal_bias &= !args.no_goal_bias;
    config.strategy.exhaustion &= !args.no_exhaustion;

    config.validate()?;
    Ok(config)
}

fn box_world(scenario: Scenario) -> BoxWorld {
    let world = BoxWorld::new(q2(0.0, 0.0), q2(10.0, 10.0));
    match scenario {
        Scenario::Wall => world.with_box(q2(4.0, 0.0), q2(6.0, 10.0)),
        Scenario::Gap => world
            .with_box(q2(4.0, 0.0), q2(6.0, 4.8))
            .with_box(q2(4.0, 5.2), q2(6.0, 10.0)),
        _ => world,
    }
}

fn plan<M: ConfigurationSpace>(
    config: PlannerConfig,
    model: &mut M,
    start: &Configuration,
    goal: &Configuration,
    vis: &mut Visualizer,
) -> PlanningResult<()> {
    let mut planner = RrtConnectPlanner::new(config)?;
    let report = planner.solve(model, start, goal);

    match report.path() {
        Some(path) => println!(
            "solved in {:?}: {} waypoints, length {:.3}, {} vertices",
            report.elapsed,
            path.len(),
            path.total_length(&*model),
            report.vertex_count()
        ),
        None => println!(
            "no path after {:?} ({:?}), {} vertices",
            report.elapsed,
            report.status,
            report.vertex_count()
        ),
    }
    println!("{:?}", report.stats);

    vis.draw(&report);
    Ok(())
}

fn main() -> PlanningResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = planner_config(&args)?;
    info!("scenario {:?}", args.scenario);

    let mut vis = Visualizer::new();
    match args.scenario {
        Scenario::Arm => {
            let mut arm = PlanarArm::new(vec![1.0, 0.8, 0.6])?
                .with_link_radius(0.05)
                .with_obstacle(CircleObstacle::new(1.2, 1.0, 0.35))
                .with_obstacle(CircleObstacle::new(-1.0, 1.3, 0.3));
            let start = DVector::from_vec(vec![0.0, 0.0, 0.0]);
            let goal = DVector::from_vec(vec![PI * 0.75, 0.3, -0.3]);

            vis.set_title("RRT-Connect: planar arm (joints 1 and 2)")
                .set_x_label("theta1 [rad]")
                .set_y_label("theta2 [rad]")
                .set_limits(arm.lower_bound(), arm.upper_bound());
            plan(config, &mut arm, &start, &goal, &mut vis)?;
        }
        scenario => {
            let mut world = box_world(scenario);
            vis.set_title(&format!("RRT-Connect: {:?}", scenario).to_lowercase())
                .set_limits(world.lower_bound(), world.upper_bound())
                .draw(&world);
            plan(config, &mut world, &q2(0.5, 5.0), &q2(9.5, 5.0), &mut vis)?;
        }
    }

    if let Some(output) = &args.output {
        vis.save_png(output, 800, 800)?;
        println!("plot saved to {}", output);
    }
    Ok(())
}
