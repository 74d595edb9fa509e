//! Headless driver for the combat core.
//!
//! Loads the bundled (or a custom) content directory, drops an auto-playing
//! player into a zone and runs a fixed number of frames, then prints the
//! reward ledger as JSON on stdout.
//!
//! # Environment
//!
//! - `GRINDSTONE_CONTENT_DIR`: content directory, defaults to the bundled data
//! - `GRINDSTONE_ZONE`: start zone, defaults to `starter_zone`
//! - `GRINDSTONE_FRAMES`: frames to simulate at 60 fps
//! - `GRINDSTONE_SEED`: root seed
//! - `GRINDSTONE_LOG_DIR`: also write logs to `<dir>/sim.log`
//! - `RUST_LOG`: log filter
//!
//! ```bash
//! GRINDSTONE_FRAMES=3600 RUST_LOG=debug cargo run -p grindstone-sim
//! ```

use anyhow::{Context, Result};
use grindstone_content::ContentFactory;
use grindstone_core::{HitFlags, ItemInstance, Vec2};
use grindstone_runtime::{FrameInput, Session, SessionConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const FRAME_DT: f64 = 1.0 / 60.0;
const DEFAULT_FRAMES: u64 = 600;
/// Stop walking once the target is this close.
const ENGAGE_DISTANCE: f64 = 30.0;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    setup_logging()?;

    let factory = match std::env::var("GRINDSTONE_CONTENT_DIR") {
        Ok(dir) => ContentFactory::new(dir),
        Err(_) => ContentFactory::bundled(),
    };
    let content = factory
        .load()
        .with_context(|| format!("loading content from {}", factory.data_dir().display()))?;

    let mut config = SessionConfig::default();
    if let Some(seed) = read_env::<u64>("GRINDSTONE_SEED") {
        config.seed = seed;
    }
    if let Ok(zone) = std::env::var("GRINDSTONE_ZONE") {
        config.start_zone = zone;
    }
    let frames = read_env::<u64>("GRINDSTONE_FRAMES").unwrap_or(DEFAULT_FRAMES);

    let mut session = Session::builder(content.tables, content.config)
        .config(config)
        .active(ItemInstance::new("wooden_sword"))
        .build()?;

    let mut held = false;
    let mut defeats = 0u32;
    for _ in 0..frames {
        let input = autopilot(&session, held);
        held = input.primary_held;

        let report = session.tick(FRAME_DT, &input)?;
        if let Some(attack) = report.attack() {
            tracing::debug!(enemy = %attack.target, damage = attack.damage, crit = attack.flags.contains(HitFlags::CRIT), "swing");
        }
        if report.defeated {
            defeats += 1;
        }
        for event in &report.events {
            tracing::info!(?event, "session event");
        }
    }

    tracing::info!(
        frames,
        kills = session.ledger().total_kills(),
        defeats,
        zone = session.current_zone_id(),
        "simulation finished"
    );
    println!("{}", serde_json::to_string_pretty(session.ledger())?);
    Ok(())
}

/// Walk toward the nearest enemy and click at it every other frame.
fn autopilot(session: &Session, was_held: bool) -> FrameInput {
    let center = session.player().center();
    let nearest = session
        .zone()
        .enemies()
        .iter()
        .map(|enemy| enemy.center())
        .min_by(|a, b| center.distance(*a).total_cmp(&center.distance(*b)));

    let Some(target) = nearest else {
        return FrameInput::idle();
    };
    let offset = target - center;
    let direction = if offset.length() > ENGAGE_DISTANCE {
        offset.normalize_or_zero()
    } else {
        Vec2::ZERO
    };

    let input = FrameInput::aim_at(target).moving(direction);
    if was_held { input } else { input.holding() }
}

/// Log to stderr, and to `GRINDSTONE_LOG_DIR/sim.log` when set.
fn setup_logging() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let file_layer = match std::env::var_os("GRINDSTONE_LOG_DIR") {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            let file_appender = tracing_appender::rolling::never(&dir, "sim.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            // Leak the guard to keep the file writer alive
            std::mem::forget(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking_file)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(())
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    std::env::var(key).ok()?.parse().ok()
}
