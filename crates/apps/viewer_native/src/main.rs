mod config;
mod replay;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use controls::{InteractionController, TooltipCommand};
use foundation::time::{Clock, Millis};
use runtime::{FnTask, Frame, FrameScheduler};
use scene::Viewport;
use streaming::{DataCache, FeedSource, FeedUpdateLoop, TokioClock, source_for_endpoint};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ViewerConfig;
use crate::replay::{InputReplay, wait_for_markers};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless live-flight globe viewer")]
struct Args {
    /// JSON config file (camelCase keys, any subset)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Feed endpoint: http(s) URL or local snapshot path
    #[arg(long)]
    endpoint: Option<String>,

    #[arg(long)]
    cache_ttl_ms: Option<u64>,

    /// Refresh period; 0 fetches once
    #[arg(long)]
    refresh_ms: Option<u64>,

    /// Also render aircraft reported on the ground
    #[arg(long)]
    include_grounded: bool,

    /// JSON list of timed input events to replay
    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    #[arg(long, default_value_t = 720.0)]
    height: f64,

    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long)]
    duration_s: Option<f64>,
}

impl Args {
    fn apply(&self, cfg: &mut ViewerConfig) {
        if let Some(endpoint) = &self.endpoint {
            cfg.feed.endpoint = endpoint.clone();
        }
        if let Some(ttl) = self.cache_ttl_ms {
            cfg.feed.cache_ttl_millis = ttl;
        }
        if let Some(period) = self.refresh_ms {
            cfg.feed.refresh_period_millis = period;
        }
        if self.include_grounded {
            cfg.feed.airborne_only = false;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut cfg = ViewerConfig::load(args.config.as_deref())?;
    args.apply(&mut cfg);
    cfg.validate()?;

    let mut replay = match &args.input {
        Some(path) => InputReplay::load(path)?,
        None => InputReplay::default(),
    };

    let source = source_for_endpoint(&cfg.feed.endpoint, reqwest::Client::new());
    info!(source = %source.describe(), ttl_ms = cfg.feed.cache_ttl_millis, "feed configured");

    let cache = DataCache::new(source, cfg.feed.cache_ttl_millis);
    let feed_loop = FeedUpdateLoop::new(
        cache,
        cfg.feed.registry_options(),
        Duration::from_millis(cfg.feed.refresh_period_millis),
    );
    let mut markers = feed_loop.subscribe();
    let shutdown = CancellationToken::new();
    let clock = TokioClock::new();
    let loop_handle = tokio::spawn(feed_loop.run(clock, shutdown.clone()));
    let stop_at = args.duration_s.and_then(|s| {
        Instant::now().checked_add(Duration::from_millis((s.max(0.0) * 1000.0) as u64))
    });

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    if !replay.is_finished() {
        // Scripted picks are only meaningful against real markers.
        tokio::select! {
            _ = &mut ctrl_c => {
                shutdown.cancel();
                loop_handle.await?;
                return Ok(());
            }
            published = wait_for_markers(&mut markers, stop_at) => {
                if !published {
                    warn!("no markers published before replay start");
                }
            }
        }
    }

    let controller = Rc::new(RefCell::new(InteractionController::new(
        cfg.controls,
        Viewport::new(args.width, args.height),
    )));

    let mut scheduler = FrameScheduler::new();
    {
        let controller = Rc::clone(&controller);
        let markers = markers.clone();
        let log_every = args.fps.max(1.0).round() as u64;
        scheduler.add_task(FnTask::new("view_sampler", move |frame: Frame| {
            if frame.index % log_every != 0 {
                return;
            }
            let view = controller.borrow().view();
            let snap = markers.current();
            debug!(
                frame = frame.index,
                rot_x = view.orientation.x,
                rot_y = view.orientation.y,
                zoom = view.camera.z,
                generation = snap.generation(),
                markers = snap.len(),
                "view"
            );
        }));
    }

    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / args.fps.max(1.0)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let replay_start = clock.now();
    let mut frame = Frame::at_rate(args.fps);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("interrupted");
                break;
            }
            _ = ticker.tick() => {}
        }

        let now = clock.now();
        let elapsed = Millis(now.since(replay_start));
        let snap = markers.current();
        for cmd in replay.dispatch_due(elapsed, &mut controller.borrow_mut(), &snap) {
            log_tooltip(&cmd);
        }

        scheduler.run_frame(frame);
        frame = frame.next();

        if stop_at.is_some_and(|d| Instant::now() >= d) {
            break;
        }
    }

    shutdown.cancel();
    loop_handle.await?;
    info!(frames = scheduler.frames_run(), "viewer stopped");
    Ok(())
}

fn log_tooltip(cmd: &TooltipCommand) {
    match cmd {
        TooltipCommand::Show { x, y, text } => {
            info!(x, y, "tooltip: {}", text.replace('\n', " | "))
        }
        TooltipCommand::Hide => info!("tooltip hidden"),
    }
}
