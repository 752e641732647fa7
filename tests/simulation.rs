use careersim::stats::Accumulator;
use careersim::{Engine, SimConfig, SimError, Stage};

fn cfg(n_agt: usize, n_rep: usize, seed: u64) -> SimConfig {
    SimConfig {
        n_agt,
        n_rep,
        seed: Some(seed),
        ..SimConfig::default()
    }
}

#[test]
fn full_run_with_defaults_shape() {
    let averages = Engine::run(cfg(10, 1_000, 1)).unwrap();
    assert_eq!(averages.first_year().choice_shares().dim(), (10, 3));
    assert_eq!(averages.second_year().subj_utils().len(), 10);
    assert_eq!(averages.switch_shares().len(), 10);
}

#[test]
fn dominant_option_is_always_chosen() {
    let averages = Engine::run(SimConfig {
        n_opt: 2,
        n_agt: 1,
        n_rep: 1_000,
        std_dev: 0.0001,
        utils: vec![0.0, 10.0],
        cost_switch: 0.0,
        seed: None,
    })
    .unwrap();
    assert!(averages.first_year().choice_shares()[[0, 1]] > 0.999);
    assert!(averages.second_year().choice_shares()[[0, 1]] > 0.999);
}

#[test]
fn informed_agents_have_narrower_beliefs() {
    // Spread of the run-level average across repeated runs.
    let mut acc_few = Accumulator::new();
    let mut acc_many = Accumulator::new();
    let mut real_few = Accumulator::new();
    let mut real_many = Accumulator::new();
    for seed in 0..200 {
        let averages = Engine::run(SimConfig {
            n_opt: 3,
            n_agt: 5,
            n_rep: 100,
            std_dev: 2.0,
            utils: vec![1.0, 2.0, 3.0],
            cost_switch: 1.0,
            seed: Some(seed),
        })
        .unwrap();
        let subj = averages.first_year().subj_utils();
        acc_few.add(subj[0]);
        acc_many.add(subj[4]);
        let real = averages.first_year().real_utils();
        real_few.add(real[0]);
        real_many.add(real[4]);
    }
    let (few, many) = (acc_few.report(), acc_many.report());
    assert!(few.std_dev > many.std_dev, "{few:?} vs {many:?}");
    // Fewer peers make beliefs about the chosen option more optimistic.
    assert!(few.mean > many.mean, "{few:?} vs {many:?}");

    // More peers pick the best option more often, so they realize more.
    let (few, many) = (real_few.report(), real_many.report());
    assert!(many.mean > few.mean, "{few:?} vs {many:?}");
    assert!(few.std_dev > 0.0 && many.std_dev > 0.0);
}

#[test]
fn switching_falls_with_cost() {
    let switch_share = |cost_switch: f64| {
        let averages = Engine::run(SimConfig {
            cost_switch,
            ..cfg(5, 3_000, 2)
        })
        .unwrap();
        averages.switch_shares().mean().unwrap_or(0.0)
    };
    let free = switch_share(0.0);
    let costly = switch_share(2.0);
    assert!(free > costly, "{free} vs {costly}");
}

#[test]
fn out_of_order_call_is_rejected() {
    let mut engine = Engine::new(cfg(2, 10, 3)).unwrap();
    let err = engine.simulate_year_two().unwrap_err();
    assert_eq!(
        err.root_cause().downcast_ref::<SimError>(),
        Some(&SimError::OutOfOrder {
            step: "simulate_year_two",
            requires: "the first year",
        })
    );

    engine.simulate_year_one().unwrap();
    engine.simulate_year_two().unwrap();
    assert_eq!(engine.stage(), Stage::SecondYear);
}

#[test]
fn seeded_runs_are_bit_identical() {
    let averages_a = Engine::run(cfg(6, 800, 4)).unwrap();
    let averages_b = Engine::run(cfg(6, 800, 4)).unwrap();
    assert_eq!(averages_a, averages_b);

    let averages_c = Engine::run(cfg(6, 800, 5)).unwrap();
    assert_ne!(averages_a, averages_c);
}
