#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots a headless Neon Snake session.
//!
//! The binary composes the session, the fixed-timestep clock, the input
//! router and a text presentation backend, then drives a deterministic demo
//! at a simulated 60 Hz frame cadence. A scripted key sequence steers the
//! snake so the full command surface is exercised without a window.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use neon_snake_core::{Command, Event, GameConfig, WELCOME_BANNER};
use neon_snake_rendering::{HudPresentation, RenderBackend, Scene};
use neon_snake_system_clock::{FixedTickClock, RenderInterpolation};
use neon_snake_system_input::{InputRouter, Key};
use neon_snake_world::{self as world, query, Session};

/// Simulated frame cadence of the headless demo loop.
const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Frames between presented scene summaries.
const PRESENT_EVERY: u32 = 30;

#[derive(Debug, Parser)]
#[command(name = "neon-snake", about = "Headless Neon Snake demo session")]
struct Args {
    /// Surface width in pixels.
    #[arg(long, default_value_t = 380)]
    width: i32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 380)]
    height: i32,

    /// Side length of a grid cell in pixels.
    #[arg(long, default_value_t = 20)]
    cell_size: i32,

    /// Seed for the session's random number generator.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of simulated frames to drive before exiting.
    #[arg(long, default_value_t = 1800)]
    frames: u32,
}

/// Presentation backend that prints scene summaries to standard output.
#[derive(Debug, Default)]
struct TextBackend;

impl RenderBackend for TextBackend {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        let food = scene
            .food
            .map(|food| format!("{:?} at ({}, {})", food.kind, food.position.x, food.position.y))
            .unwrap_or_else(|| "none".to_owned());
        println!(
            "[{:?}] score {} (best {}) | head ({:.0}, {:.0}) | food {}",
            scene.hud.state,
            scene.hud.score,
            scene.hud.high_score,
            scene.snake.head.x,
            scene.snake.head.y,
            food,
        );
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = GameConfig {
        cell_size: args.cell_size,
        surface_width: args.width,
        surface_height: args.height,
        ..GameConfig::default()
    };
    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }

    let mut session = Session::new(config).context("invalid game configuration")?;
    println!("{WELCOME_BANNER}");

    let router = InputRouter::default();
    let mut clock = FixedTickClock::new(query::tick_interval(&session));
    let mut interpolation = RenderInterpolation::default();
    let mut backend = TextBackend;

    let mut events = Vec::new();
    world::apply(&mut session, Command::Start, &mut events);
    report_events(&events);

    let mut now = Duration::ZERO;
    clock.reset(now);

    for frame in 0..args.frames {
        events.clear();
        now += FRAME_DURATION;
        interpolation.advance();

        world::apply(&mut session, Command::Tick { dt: FRAME_DURATION }, &mut events);

        if let Some(key) = scripted_key(frame) {
            if let Some(command) = router.key_command(query::state(&session), key) {
                world::apply(&mut session, command, &mut events);
            }
        }

        if clock.frame(now) {
            world::apply(&mut session, Command::Step, &mut events);
        }
        clock.observe(&events);
        interpolation.observe(&events);
        report_events(&events);

        if frame % PRESENT_EVERY == PRESENT_EVERY - 1 {
            backend.present(&compose_scene(&session, interpolation.factor()))?;
        }

        if query::state(&session).is_terminal() {
            break;
        }
    }

    backend.present(&compose_scene(&session, interpolation.factor()))?;
    println!(
        "demo finished in state {:?}, best score {}",
        query::state(&session),
        query::high_score(&session),
    );
    Ok(())
}

/// Key script that steers the snake in a widening rectangle.
fn scripted_key(frame: u32) -> Option<Key> {
    match frame % 240 {
        0 if frame > 0 => Some(Key::ArrowRight),
        60 => Some(Key::ArrowUp),
        120 => Some(Key::ArrowLeft),
        180 => Some(Key::ArrowDown),
        _ => None,
    }
}

fn compose_scene(session: &Session, interpolation: f32) -> Scene {
    let grid = query::grid(session);
    let view = query::snake_view(session);
    Scene::compose(
        &grid,
        view.cells(),
        query::food(session).map(|food| (food.cell, food.kind)),
        query::multiplier(session).map(|multiplier| multiplier.cell),
        HudPresentation {
            score: query::score(session),
            high_score: query::high_score(session),
            state: query::state(session),
        },
        interpolation,
    )
}

fn report_events(events: &[Event]) {
    for event in events {
        match event {
            Event::SessionStarted => println!("session started"),
            Event::SessionPaused => println!("session paused"),
            Event::SessionResumed => println!("session resumed"),
            Event::SessionRestarted => println!("session restarted"),
            Event::FoodSpawned { cell, kind } => {
                println!("{kind:?} food spawned at ({}, {})", cell.x(), cell.y());
            }
            Event::FoodConsumed {
                kind,
                points,
                score,
            } => println!("{kind:?} food consumed (+{points}), score {score}"),
            Event::MultiplierSpawned { cell } => {
                println!("multiplier spawned at ({}, {})", cell.x(), cell.y());
            }
            Event::MultiplierConsumed { .. } => println!("multiplier consumed, next food is worth x5"),
            Event::MultiplierExpired => println!("multiplier expired"),
            Event::SpeedRaised { interval } => println!("speed raised, step interval {interval:?}"),
            Event::SurfaceResized { columns, rows } => {
                println!("surface resized to {columns}x{rows} cells");
            }
            Event::GameWon { score } => println!("grid filled, game won with score {score}"),
            Event::GameLost { score } => println!("self collision, game over with score {score}"),
            Event::SnakeAdvanced { .. } => {}
        }
    }
}
