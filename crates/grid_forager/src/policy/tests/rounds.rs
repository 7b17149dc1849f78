use super::*;

fn own_roster(count: usize) -> Vec<Robot> {
    (0..count)
        .map(|index| own_robot(index as i32 * 10, 50, 100))
        .collect()
}

#[test]
fn inferred_round_advances_after_whole_population() {
    let mut policy = tuned();
    let robots = own_roster(10);
    let map = map_with(Vec::new());

    for index in 0..10 {
        policy.decide(&robots, index, &map);
        let trace = policy.take_decision_trace().expect("trace");
        assert_eq!(trace.round, 0);
        assert_eq!(trace.robot_index, index);
    }
    assert_eq!(policy.round(), 1);
    assert_eq!(policy.state().rounds().actions_this_round(), 0);

    policy.decide(&robots, 0, &map);
    assert_eq!(policy.take_decision_trace().expect("trace").round, 1);
}

#[test]
fn spawn_mid_round_does_not_stretch_the_round() {
    let mut policy = tuned();
    let mut robots = own_roster(10);
    robots[0] = own_robot(0, 0, 500);
    let map = map_with(vec![station(1, 0, 100)]);

    assert!(matches!(
        policy.decide(&robots, 0, &map),
        RobotCommand::Spawn { .. }
    ));
    for index in 1..9 {
        policy.decide(&robots, index, &map);
    }
    assert_eq!(policy.round(), 0);
    policy.decide(&robots, 9, &map);
    assert_eq!(policy.round(), 1);
}

#[test]
fn host_rounds_drive_classic_profile() {
    let mut policy = classic();
    let robots = own_roster(1);
    let map = map_with(Vec::new());

    for _ in 0..25 {
        policy.decide(&robots, 0, &map);
    }
    assert_eq!(policy.round(), 0);

    policy.on_round_started(5);
    assert_eq!(policy.round(), 5);
    policy.on_round_started(3);
    assert_eq!(policy.round(), 5);
}

#[test]
fn inferred_profile_ignores_host_rounds() {
    let mut policy = tuned();
    policy.on_round_started(30);
    assert_eq!(policy.round(), 0);
}

#[test]
fn out_of_range_index_collects_without_counting() {
    let mut policy = tuned();
    let robots = own_roster(1);
    let map = map_with(Vec::new());

    assert_eq!(
        policy.try_decide(&robots, 7, &map),
        Err(PolicyError::RobotIndexOutOfRange { index: 7, len: 1 })
    );
    assert_eq!(policy.decide(&robots, 7, &map), RobotCommand::Collect);
    assert!(matches!(
        last_reason(&mut policy),
        DecisionReason::InvalidInput { .. }
    ));
    assert_eq!(policy.state().rounds().actions_this_round(), 0);
}
