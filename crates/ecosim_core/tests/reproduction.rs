mod common;

use common::{advance_to, inert_at, Inert, WorldBuilder};
use ecosim_core::{DeathCause, LifeState, Point};

#[test]
fn test_child_lands_in_the_ring() {
    let mut world = WorldBuilder::new().build();
    let parent = inert_at(&mut world, 250.0, 250.0);
    advance_to(&mut world, 2.0);

    let child = world.spawn(Box::new(Inert));
    world.reproduce(&parent, &child);

    assert!(child.is_alive());
    assert_eq!(world.population(), 2);
    let d = parent.position().distance(&child.position());
    assert!((1.0..=5.0).contains(&d), "child placed {d} away");
    assert!((parent.energy() - 47.5).abs() < 1e-9);
    assert!((child.energy() - 47.5).abs() < 1e-9);
    assert_eq!(parent.last_reproduction(), 2.0);
}

#[test]
fn test_child_avoids_a_third_party() {
    for seed in 0..16 {
        let mut world = WorldBuilder::new().with_seed(seed).build();
        let parent = inert_at(&mut world, 250.0, 250.0);
        let bystander = inert_at(&mut world, 253.0, 250.0);
        advance_to(&mut world, 2.0);

        let child = world.spawn(Box::new(Inert));
        world.reproduce(&parent, &child);

        if child.is_alive() {
            let d = bystander.position().distance(&child.position());
            assert!(d > 1.0, "seed {seed}: child {d} from bystander");
        } else {
            assert_eq!(child.state(), LifeState::Dormant);
            assert_eq!(world.metrics.abandoned_reproductions, 1);
        }
    }
}

#[test]
fn test_reproducing_too_soon_is_ignored() {
    let mut world = WorldBuilder::new().build();
    let parent = inert_at(&mut world, 250.0, 250.0);
    advance_to(&mut world, 2.0);
    let first = world.spawn(Box::new(Inert));
    world.reproduce(&parent, &first);
    assert!(first.is_alive());

    advance_to(&mut world, 2.5);
    let second = world.spawn(Box::new(Inert));
    world.reproduce(&parent, &second);
    assert_eq!(second.state(), LifeState::Dormant);
    assert_eq!(second.energy(), 100.0);
    assert!((parent.energy() - 47.5).abs() < 1e-9);
}

#[test]
fn test_saturated_neighbourhood_abandons_the_child() {
    let mut world = WorldBuilder::new().build();
    let mut parent = None;
    for x in 44..=56 {
        for y in 44..=56 {
            let life = inert_at(&mut world, f64::from(x), f64::from(y));
            if x == 50 && y == 50 {
                parent = Some(life);
            }
        }
    }
    let parent = parent.expect("grid covers the parent");
    assert_eq!(world.space().check_invariants(), 169);
    advance_to(&mut world, 2.0);

    let child = world.spawn(Box::new(Inert));
    world.reproduce(&parent, &child);

    assert_eq!(child.state(), LifeState::Dormant);
    assert!(parent.is_alive());
    assert!((parent.energy() - 47.5).abs() < 1e-9);
    assert!((child.energy() - 47.5).abs() < 1e-9);
    assert_eq!(world.population(), 169);
    assert_eq!(world.metrics.abandoned_reproductions, 1);
}

#[test]
fn test_poor_parent_and_child_both_die() {
    let mut world = WorldBuilder::new()
        .with_config(|c| c.reproduction.cost = 0.9)
        .build();
    let parent = inert_at(&mut world, 250.0, 250.0);
    advance_to(&mut world, 2.0);

    let child = world.spawn(Box::new(Inert));
    world.reproduce(&parent, &child);

    assert_eq!(parent.state(), LifeState::Dead);
    assert_eq!(child.state(), LifeState::Dead);
    assert_eq!(world.metrics.deaths(DeathCause::Stillborn), 1);
    assert_eq!(world.metrics.deaths(DeathCause::Exhaustion), 1);
    assert!(world.space().is_empty());
}

#[test]
#[should_panic(expected = "already been placed")]
fn test_child_must_be_dormant() {
    let mut world = WorldBuilder::new().build();
    let parent = inert_at(&mut world, 250.0, 250.0);
    let other = inert_at(&mut world, 200.0, 200.0);
    world.reproduce(&parent, &other);
}

#[test]
fn test_unplaced_children_leave_the_roster() {
    let mut world = WorldBuilder::new().build();
    let mut parent = None;
    for x in 44..=56 {
        for y in 44..=56 {
            let life = inert_at(&mut world, f64::from(x), f64::from(y));
            if x == 50 && y == 50 {
                parent = Some(life);
            }
        }
    }
    let parent = parent.expect("grid covers the parent");

    // abandoned, then rejected as too soon, then refused once the parent
    // has starved itself to death
    for attempt in 0..50 {
        advance_to(&mut world, 2.0 + f64::from(attempt / 2));
        let child = world.spawn(Box::new(Inert));
        world.reproduce(&parent, &child);
    }

    assert_eq!(parent.state(), LifeState::Dead);
    assert_eq!(world.metrics.abandoned_reproductions, 3);
    assert_eq!(world.population(), 168);
    assert_eq!(world.roster_len(), world.population());
    assert_eq!(world.living().len(), 168);
}

#[test]
fn test_abandoned_child_can_be_placed_later() {
    let mut world = WorldBuilder::new().build();
    let parent = inert_at(&mut world, 250.0, 250.0);
    advance_to(&mut world, 0.5);
    let child = world.spawn(Box::new(Inert));
    world.reproduce(&parent, &child);
    assert_eq!(child.state(), LifeState::Dormant);
    assert_eq!(world.roster_len(), 1);

    world.place(&child, Point::new(300.0, 300.0));
    assert_eq!(world.roster_len(), 2);
    assert_eq!(world.living().len(), 2);
}
