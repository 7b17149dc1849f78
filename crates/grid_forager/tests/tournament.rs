use grid_forager::{
    build_scenario, ForagerPolicy, PolicyConfig, PolicyProfile, RobotBehavior, RunnerLogKind,
    ScenarioConfig, TournamentRunner,
};

fn runner_for(seed: u64, profiles: &[PolicyProfile]) -> TournamentRunner<ForagerPolicy> {
    let configs: Vec<PolicyConfig> = profiles
        .iter()
        .map(|profile| PolicyConfig::from_profile(*profile).with_owner(profile.as_str()))
        .collect();
    let owners: Vec<String> = configs.iter().map(|config| config.owner.clone()).collect();
    let scenario = build_scenario(&ScenarioConfig::with_seed(seed), &owners).expect("scenario");

    let mut runner = scenario.into_runner();
    for config in configs {
        runner.register(ForagerPolicy::new(config));
    }
    runner
}

#[test]
fn full_game_respects_energy_and_population_limits() {
    let mut runner = runner_for(11, &[PolicyProfile::Tuned, PolicyProfile::Classic]);
    let metrics = runner.run();

    assert_eq!(runner.round(), 50);
    assert_eq!(metrics.rounds_played, 50);
    assert!(runner.robots().iter().all(|robot| robot.energy >= 0));
    for standing in runner.standings() {
        assert!(standing.robots >= 10, "{} lost robots", standing.owner);
        assert!(standing.robots <= 100, "{} exceeded the cap", standing.owner);
    }
}

#[test]
fn same_seed_replays_identically() {
    let profiles = [PolicyProfile::Tuned, PolicyProfile::Classic];
    let mut first = runner_for(3, &profiles);
    let mut second = runner_for(3, &profiles);
    first.run();
    second.run();

    assert_eq!(first.standings(), second.standings());
    assert_eq!(first.metrics(), second.metrics());
    assert_eq!(first.robots(), second.robots());
}

#[test]
fn host_rounds_reach_classic_policy() {
    let mut runner = runner_for(5, &[PolicyProfile::Classic]);
    runner.run();

    let policy = runner.behavior("classic").expect("registered");
    assert_eq!(policy.round(), 49);
    assert_eq!(policy.owner(), "classic");
}

#[test]
fn every_decision_is_traced() {
    let mut runner = runner_for(9, &[PolicyProfile::Tuned]);
    runner.play_round();

    let decided: Vec<_> = runner
        .log()
        .iter()
        .filter_map(|entry| match &entry.kind {
            RunnerLogKind::RobotDecided { trace, .. } => Some(trace),
            _ => None,
        })
        .collect();
    assert_eq!(decided.len(), 10);
    assert!(decided.iter().all(|trace| trace.is_some()));
}
