//! Timing behaviour of the run loop, driven by tokio's paused clock so every
//! interval boundary is deterministic.

use std::time::Duration;

use conway::{Cell, Pattern, Simulation, SimulationConfig, SimulationState};
use tokio::time::{sleep, timeout};

fn blinker_sim(interval_ms: u64, stop_when_settled: bool) -> Simulation {
    let sim = Simulation::new(SimulationConfig {
        cols: 5,
        rows: 5,
        interval_ms,
        seed: Some(11),
        stop_when_settled,
    })
    .unwrap();
    sim.load_pattern(Pattern::find("Blinker").unwrap());
    sim
}

fn generation(sim: &Simulation) -> u64 {
    sim.status().generation
}

#[tokio::test(start_paused = true)]
async fn start_steps_immediately_then_every_interval() {
    let mut sim = blinker_sim(100, false);
    sim.start();
    assert_eq!(generation(&sim), 1);
    assert_eq!(
        sim.live_cells(),
        vec![Cell::new(2, 1), Cell::new(2, 2), Cell::new(2, 3)]
    );

    sleep(Duration::from_millis(350)).await;
    assert_eq!(generation(&sim), 4);
    assert_eq!(sim.state(), SimulationState::Running);
}

#[tokio::test(start_paused = true)]
async fn stop_before_interval_cancels_pending_step() {
    let mut sim = blinker_sim(100, false);
    sim.start();
    let after_start = sim.live_cells();
    sim.stop();

    sleep(Duration::from_secs(1)).await;
    assert_eq!(generation(&sim), 1);
    assert_eq!(sim.live_cells(), after_start);
}

#[tokio::test(start_paused = true)]
async fn stop_between_steps_freezes_board() {
    let mut sim = blinker_sim(100, false);
    sim.start();
    sleep(Duration::from_millis(150)).await;
    assert_eq!(generation(&sim), 2);

    sim.stop();
    let frozen = sim.live_cells();
    sleep(Duration::from_secs(2)).await;
    assert_eq!(generation(&sim), 2);
    assert_eq!(sim.live_cells(), frozen);
}

#[tokio::test(start_paused = true)]
async fn interval_change_applies_from_next_tick() {
    let mut sim = blinker_sim(100, false);
    sim.start();

    // The step pending at t=100 keeps its original delay.
    sleep(Duration::from_millis(50)).await;
    sim.set_interval(300).unwrap();
    sleep(Duration::from_millis(100)).await;
    assert_eq!(generation(&sim), 2);

    // The one after it is scheduled 300 ms later, at t=400.
    sleep(Duration::from_millis(200)).await;
    assert_eq!(generation(&sim), 2);
    sleep(Duration::from_millis(100)).await;
    assert_eq!(generation(&sim), 3);
}

#[tokio::test(start_paused = true)]
async fn restart_does_not_revive_old_schedule() {
    let mut sim = blinker_sim(100, false);
    sim.start();
    sim.stop();
    sim.start();
    assert_eq!(generation(&sim), 2);

    sleep(Duration::from_millis(150)).await;
    assert_eq!(generation(&sim), 3);
}

#[tokio::test(start_paused = true)]
async fn edits_while_running_are_kept() {
    let mut sim = Simulation::new(SimulationConfig {
        cols: 8,
        rows: 8,
        interval_ms: 100,
        seed: None,
        stop_when_settled: false,
    })
    .unwrap();
    sim.start();
    assert!(sim.live_cells().is_empty());

    // A block drawn between steps survives the next step unchanged.
    for (x, y) in [(3, 3), (4, 3), (3, 4), (4, 4)] {
        sim.toggle(x, y);
    }
    sleep(Duration::from_millis(150)).await;
    assert_eq!(
        sim.live_cells(),
        vec![Cell::new(3, 3), Cell::new(4, 3), Cell::new(3, 4), Cell::new(4, 4)]
    );
    sim.stop();
}

#[tokio::test(start_paused = true)]
async fn settled_board_stops_when_configured() {
    let mut sim = blinker_sim(100, true);
    sim.start();
    assert_eq!(sim.state(), SimulationState::Running);

    sleep(Duration::from_millis(150)).await;
    let status = sim.status();
    assert_eq!(status.generation, 2);
    assert!(status.settled);
    assert_eq!(status.state, SimulationState::Stopped);

    sleep(Duration::from_secs(1)).await;
    assert_eq!(generation(&sim), 2);
}

#[tokio::test(start_paused = true)]
async fn still_life_stops_on_the_first_step() {
    let mut sim = Simulation::new(SimulationConfig {
        cols: 6,
        rows: 6,
        interval_ms: 100,
        seed: None,
        stop_when_settled: true,
    })
    .unwrap();
    for (x, y) in [(2, 2), (3, 2), (2, 3), (3, 3)] {
        sim.toggle(x, y);
    }
    sim.start();
    assert_eq!(sim.state(), SimulationState::Stopped);
    assert_eq!(generation(&sim), 1);
}

#[tokio::test(start_paused = true)]
async fn observers_see_each_generation() {
    let mut sim = blinker_sim(100, false);
    let mut snapshots = sim.subscribe();
    sim.start();

    let mut seen = Vec::new();
    while seen.len() < 3 {
        snapshots.changed().await.unwrap();
        seen.push(snapshots.borrow_and_update().generation);
    }
    assert_eq!(seen, vec![1, 2, 3]);
    assert_eq!(snapshots.borrow().population, 3);
    sim.stop();
}

#[tokio::test(start_paused = true)]
async fn dropping_the_simulation_ends_the_loop() {
    let mut sim = blinker_sim(100, false);
    let mut snapshots = sim.subscribe();
    sim.start();
    drop(sim);

    let closed = timeout(Duration::from_secs(5), async {
        while snapshots.changed().await.is_ok() {}
    })
    .await;
    assert!(closed.is_ok(), "sender outlived the simulation");
}
