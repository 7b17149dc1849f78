use grid_forager::{
    build_scenario, ForagerPolicy, OwnerStanding, PolicyConfig, PolicyProfile, RunnerMetrics,
    ScenarioConfig,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct CliOptions {
    profile: Option<PolicyProfile>,
    versus: Option<PolicyProfile>,
    seed: u64,
    rounds: Option<u32>,
    json: bool,
}

#[derive(Debug, Serialize)]
struct DemoSummary {
    seed: u64,
    rounds: u32,
    standings: Vec<OwnerStanding>,
    metrics: RunnerMetrics,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return;
    }
    let options = match parse_options(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            print_help();
            std::process::exit(1);
        }
    };

    let primary = match options.profile {
        Some(profile) => PolicyConfig::from_profile(profile),
        None => match PolicyConfig::from_default_sources() {
            Ok(config) => config,
            Err(err) => {
                eprintln!("failed to load policy config: {err}");
                std::process::exit(1);
            }
        },
    };
    let mut configs = vec![primary];
    if let Some(versus) = options.versus {
        let rival = format!("{}-rival", versus.as_str());
        configs.push(PolicyConfig::from_profile(versus).with_owner(rival));
    }

    let mut scenario_config = ScenarioConfig::with_seed(options.seed);
    if let Some(rounds) = options.rounds {
        scenario_config.rules.max_rounds = rounds;
    }
    for config in &mut configs {
        config.initial_population = scenario_config.robots_per_owner as u32;
        config.round_budget = scenario_config.rules.max_rounds;
        config.early_game_rounds = config.early_game_rounds.min(config.round_budget);
    }

    let owners: Vec<String> = configs.iter().map(|config| config.owner.clone()).collect();
    let scenario = match build_scenario(&scenario_config, &owners) {
        Ok(scenario) => scenario,
        Err(err) => {
            eprintln!("failed to build scenario: {err}");
            std::process::exit(1);
        }
    };

    let mut runner = scenario.into_runner::<ForagerPolicy>();
    for config in configs {
        runner.register(ForagerPolicy::new(config));
    }
    let metrics = runner.run();

    let summary = DemoSummary {
        seed: options.seed,
        rounds: runner.round(),
        standings: runner.standings(),
        metrics,
    };
    if options.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("failed to encode summary: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!("seed: {}", summary.seed);
    println!("rounds: {}", summary.rounds);
    for standing in &summary.standings {
        println!(
            "{}: robots={} energy={}",
            standing.owner, standing.robots, standing.energy
        );
    }
    println!("decisions: {}", summary.metrics.total_decisions);
    println!("spawns: {}", summary.metrics.spawns);
    println!("rejected: {}", summary.metrics.rejected);
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => options.json = true,
            "--seed" => options.seed = parse_number(iter.next(), "--seed")?,
            "--rounds" => options.rounds = Some(parse_number(iter.next(), "--rounds")?),
            "--versus" => {
                let value = iter.next().ok_or("--versus requires a profile")?;
                options.versus = Some(parse_profile(value)?);
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option: {flag}")),
            name => {
                if options.profile.is_some() {
                    return Err(format!("unexpected argument: {name}"));
                }
                options.profile = Some(parse_profile(name)?);
            }
        }
    }
    Ok(options)
}

fn parse_profile(name: &str) -> Result<PolicyProfile, String> {
    PolicyProfile::parse(name).ok_or_else(|| format!("unknown profile: {name}"))
}

fn parse_number<T: std::str::FromStr>(value: Option<&String>, flag: &str) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("{flag} requires a value"))?;
    value
        .parse()
        .map_err(|_| format!("invalid {flag} value: {value}"))
}

fn print_help() {
    println!("Usage: forager_demo [profile] [--seed N] [--rounds N] [--json] [--versus PROFILE]");
    println!("Available profiles: {}", PolicyProfile::variants().join(", "));
}
