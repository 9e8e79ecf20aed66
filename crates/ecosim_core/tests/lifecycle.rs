mod common;

use common::{advance_to, biter_at, inert_at, WorldBuilder};
use ecosim_core::{DeathCause, EncounterStrategy, KernelConfig, LifeState};

fn certain_eating(strategy: EncounterStrategy) -> impl FnOnce(&mut KernelConfig) {
    move |c: &mut KernelConfig| {
        c.encounter.eat_success_floor = 1.0;
        c.encounter.strategy = strategy;
    }
}

#[test]
fn test_ageing_kills_on_the_tenth_firing() {
    let mut world = WorldBuilder::new().build();
    let life = inert_at(&mut world, 50.0, 50.0);

    world.run_until(900.0);
    assert!(life.is_alive());
    assert!((life.energy() - 10.0).abs() < 1e-9);

    world.run_until(1000.0);
    assert_eq!(life.state(), LifeState::Dead);
    assert_eq!(life.energy(), 0.0);
    assert_eq!(world.now(), 1000.0);
    assert_eq!(world.metrics.deaths(DeathCause::Age), 1);
    assert_eq!(world.pending_count(), 0);
}

#[test]
fn test_update_position_is_idempotent_within_min_delta() {
    let mut world = WorldBuilder::new().build();
    let life = inert_at(&mut world, 100.0, 100.0);
    world.set_course(&life, 0.5);
    world.set_speed(&life, 5.0);
    advance_to(&mut world, 10.0);

    world.update_position(&life);
    let pos = life.position();
    let energy = life.energy();
    assert!(pos.x > 100.0);

    world.update_position(&life);
    world.update_position(&life);
    assert_eq!(life.position(), pos);
    assert_eq!(life.energy(), energy);
}

#[test]
fn test_stationary_life_form_pays_nothing_to_stand_still() {
    let mut world = WorldBuilder::new().build();
    let life = inert_at(&mut world, 100.0, 100.0);
    advance_to(&mut world, 50.0);

    world.update_position(&life);
    assert_eq!(life.energy(), 100.0);
    assert_eq!(life.last_update(), 50.0);
}

#[test]
fn test_encounter_penalty_can_kill_both() {
    let mut world = WorldBuilder::new()
        .with_config(|c| c.encounter.penalty = 96.0)
        .build();
    let a = biter_at(&mut world, 100.0, 100.0);
    let b = biter_at(&mut world, 100.5, 100.0);

    world.resolve_encounter(&a, &b);
    assert!(!a.is_alive());
    assert!(!b.is_alive());
    assert_eq!(world.metrics.meals, 0);
    assert_eq!(world.metrics.deaths(DeathCause::Exhaustion), 2);
    assert!(world.space().is_empty());
}

#[test]
fn test_one_sided_eat() {
    let mut world = WorldBuilder::new()
        .with_config(certain_eating(EncounterStrategy::BigGuyWins))
        .build();
    let hunter = biter_at(&mut world, 100.0, 100.0);
    let prey = inert_at(&mut world, 100.5, 100.0);

    world.resolve_encounter(&prey, &hunter);
    assert_eq!(prey.state(), LifeState::Dead);
    assert!(hunter.is_alive());
    // penalty then eat cost
    assert!((hunter.energy() - 90.0).abs() < 1e-9);
}

#[test]
fn test_big_guy_wins() {
    let mut world = WorldBuilder::new()
        .with_config(certain_eating(EncounterStrategy::BigGuyWins))
        .build();
    let big = biter_at(&mut world, 100.0, 100.0);
    let small = biter_at(&mut world, 100.5, 100.0);
    world.gain_energy(&big, 50.0);

    world.resolve_encounter(&small, &big);
    assert!(big.is_alive());
    assert_eq!(small.state(), LifeState::Dead);
    assert_eq!(world.metrics.meals, 1);
}

#[test]
fn test_underdog_wins() {
    let mut world = WorldBuilder::new()
        .with_config(certain_eating(EncounterStrategy::UnderdogIsHere))
        .build();
    let big = biter_at(&mut world, 100.0, 100.0);
    let small = biter_at(&mut world, 100.5, 100.0);
    world.gain_energy(&big, 50.0);

    world.resolve_encounter(&big, &small);
    assert!(small.is_alive());
    assert_eq!(big.state(), LifeState::Dead);
}

#[test]
fn test_faster_and_slower_guy() {
    for (strategy, fast_survives) in [
        (EncounterStrategy::FasterGuyWins, true),
        (EncounterStrategy::SlowerGuyWins, false),
    ] {
        let mut world = WorldBuilder::new()
            .with_config(certain_eating(strategy))
            .build();
        let fast = biter_at(&mut world, 200.0, 200.0);
        let slow = biter_at(&mut world, 200.5, 200.0);
        world.set_speed(&fast, 3.0);

        world.resolve_encounter(&fast, &slow);
        assert_eq!(fast.is_alive(), fast_survives, "{strategy:?}");
        assert_eq!(slow.is_alive(), !fast_survives, "{strategy:?}");
    }
}

#[test]
fn test_mutual_eat_never_has_two_winners() {
    for seed in 0..32 {
        let mut world = WorldBuilder::new().with_seed(seed).build();
        let a = biter_at(&mut world, 100.0, 100.0);
        let b = biter_at(&mut world, 100.5, 100.0);
        world.resolve_encounter(&a, &b);
        assert!(a.is_alive() || b.is_alive(), "seed {seed}");
        assert!(world.metrics.meals <= 1);
    }
}

#[test]
fn test_even_money_picks_either_side() {
    let mut first_wins = 0;
    let mut second_wins = 0;
    for seed in 0..32 {
        let mut world = WorldBuilder::new()
            .with_seed(seed)
            .with_config(certain_eating(EncounterStrategy::EvenMoney))
            .build();
        let a = biter_at(&mut world, 100.0, 100.0);
        let b = biter_at(&mut world, 100.5, 100.0);
        world.resolve_encounter(&a, &b);

        assert_ne!(a.is_alive(), b.is_alive(), "seed {seed}");
        assert_eq!(world.metrics.meals, 1, "seed {seed}");
        if a.is_alive() {
            first_wins += 1;
        } else {
            second_wins += 1;
        }
    }
    assert!(first_wins > 0 && second_wins > 0, "{first_wins} vs {second_wins}");
}

#[test]
fn test_check_encounter_respects_distance() {
    let mut world = WorldBuilder::new()
        .with_config(certain_eating(EncounterStrategy::BigGuyWins))
        .build();
    let hunter = biter_at(&mut world, 100.0, 100.0);
    let far = inert_at(&mut world, 101.5, 100.0);

    world.check_encounter(&hunter);
    assert!(far.is_alive());
    assert_eq!(hunter.energy(), 100.0);
    assert_eq!(world.metrics.encounters, 0);

    let near = inert_at(&mut world, 100.0, 100.8);
    world.check_encounter(&hunter);
    assert_eq!(near.state(), LifeState::Dead);
    assert!(far.is_alive());
    assert_eq!(world.metrics.encounters, 1);
}

#[test]
fn test_second_eater_of_same_prey_gets_nothing() {
    let mut world = WorldBuilder::new().build();
    let first = inert_at(&mut world, 100.0, 100.0);
    let second = inert_at(&mut world, 102.0, 100.0);
    let prey = inert_at(&mut world, 101.0, 100.0);

    world.eat(&first, &prey);
    world.eat(&second, &prey);
    assert_eq!(prey.state(), LifeState::Dead);
    assert!((first.energy() - 95.0).abs() < 1e-9);
    assert_eq!(second.energy(), 100.0);
    assert_eq!(world.metrics.deaths(DeathCause::Eaten), 1);
}

#[test]
fn test_moving_into_a_neighbour_triggers_an_encounter() {
    let mut world = WorldBuilder::new()
        .with_config(certain_eating(EncounterStrategy::BigGuyWins))
        .build();
    let hunter = biter_at(&mut world, 100.0, 100.0);
    let prey = inert_at(&mut world, 120.0, 100.0);
    world.set_course(&hunter, 0.0);
    world.set_speed(&hunter, 1.0);

    world.run_until(30.0);
    assert_eq!(prey.state(), LifeState::Dead);
    assert!(hunter.is_alive());
    assert_eq!(world.space().check_invariants(), 1);
}
