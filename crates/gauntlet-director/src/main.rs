//! Gauntlet Simulation Binary
//!
//! Drives a difficulty director with a scripted player for a configured
//! amount of play time and logs every decision it makes.

mod sim;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gauntlet_common::VERSION;
use gauntlet_director::{DifficultyDirector, DirectorConfig, DirectorEvent};

use sim::{Arena, ScriptedPlayer};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting Gauntlet difficulty simulation v{}", VERSION);

    // Load configuration
    let config = DirectorConfig::load()?;
    info!("Loaded configuration: {:?}", config);

    let settings = config.simulation.clone();
    let mut player = ScriptedPlayer::new(&settings, config.learning.seed);
    let mut director = DifficultyDirector::new(config)?;
    let mut arena = Arena::new(director.combat_tuning());

    let frame_rate = settings.frame_rate.max(1);
    let dt = 1.0 / frame_rate as f64;
    let frames = (settings.duration_secs * frame_rate as f64).ceil() as u64;
    info!(
        "Simulating {:.0}s at {} fps (realtime={}, skill={})",
        settings.duration_secs, frame_rate, settings.realtime, settings.player_skill
    );

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received shutdown signal");
                stop.store(true, Ordering::Relaxed);
            }
        });
    }

    let mut ticker = tokio::time::interval(Duration::from_secs_f64(dt));
    for frame in 0..frames {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        if settings.realtime {
            ticker.tick().await;
        } else if frame % frame_rate as u64 == 0 {
            tokio::task::yield_now().await;
        }

        player.step(&mut director, &mut arena, dt);
        director.tick(dt);

        for event in director.take_events() {
            match &event {
                DirectorEvent::DifficultyChanged { from, to, tuning } => {
                    let retuned = arena.retune(*tuning);
                    info!(%from, %to, retuned, "Enemies retuned");
                }
                DirectorEvent::Feedback { message } => info!("{}", message),
                other => debug!(event = other.name(), "Director event"),
            }
        }
    }

    let hud = director.hud();
    info!(
        level = %hud.difficulty_level,
        challenge = ?hud.challenge_status,
        deaths = player.deaths,
        "Simulation finished"
    );
    println!("{}", serde_json::to_string_pretty(&hud)?);
    debug!("Metrics:\n{}", director.render_metrics()?);

    Ok(())
}
