//! Per-trial reset behavior: decay monotonicity and the testing override.

mod common;

use common::{build_agent, learning_agent};
use smartcab::{AgentConfig, DecaySchedule};

#[test]
fn training_resets_decay_monotonically_to_zero() {
    let mut agent = learning_agent(1.0, 0.5, 1);

    let mut last_epsilon = agent.epsilon();
    let mut last_alpha = agent.alpha();
    for _ in 0..120 {
        agent.reset(None, false).unwrap();
        assert!(agent.epsilon() <= last_epsilon);
        assert!(agent.alpha() <= last_alpha);
        assert!(agent.epsilon() >= 0.0);
        assert!(agent.alpha() >= 0.0);
        last_epsilon = agent.epsilon();
        last_alpha = agent.alpha();
    }

    assert_eq!(agent.epsilon(), 0.0);
    assert_eq!(agent.alpha(), 0.0);
    assert_eq!(agent.trial(), 120);
}

#[test]
fn testing_reset_zeroes_rates_regardless_of_priors() {
    let mut agent = learning_agent(0.73, 0.42, 2);

    agent.reset(None, true).unwrap();
    assert_eq!(agent.epsilon(), 0.0);
    assert_eq!(agent.alpha(), 0.0);

    // A later testing reset keeps them at zero.
    agent.reset(None, true).unwrap();
    assert_eq!(agent.epsilon(), 0.0);
    assert_eq!(agent.alpha(), 0.0);
}

#[test]
fn geometric_schedule_decays_toward_floor() {
    let config = AgentConfig::new(true)
        .with_epsilon(1.0)
        .with_alpha(0.5)
        .with_decay(DecaySchedule::Geometric {
            factor: 0.5,
            floor: 0.05,
        })
        .with_seed(4);
    let mut agent = build_agent(config);

    let mut last = agent.epsilon();
    for _ in 0..10 {
        agent.reset(None, false).unwrap();
        assert!(agent.epsilon() <= last);
        last = agent.epsilon();
    }
    assert!((agent.epsilon() - 0.05).abs() < 1e-12);
}

#[test]
fn trial_counter_increments_once_per_reset() {
    let mut agent = learning_agent(1.0, 0.5, 6);
    assert_eq!(agent.trial(), 0);

    agent.reset(None, false).unwrap();
    agent.reset(None, false).unwrap();
    agent.reset(None, true).unwrap();
    assert_eq!(agent.trial(), 3);
}
