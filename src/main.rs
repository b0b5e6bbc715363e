//! Headless demo: drops a few nested dots at different zoom depths,
//! bookmarks them, plays the tour at 60 fps, and persists the result.

use std::time::{Duration, Instant};

use deepzoom::camera::Viewport;
use deepzoom::config::EngineConfig;
use deepzoom::engine::{Action, EngineCore};
use deepzoom::persistence::{BlobStore, FileStore, MemoryStore};
use deepzoom::precision::{Scalar, Vector2};
use deepzoom::shape::{Shape, WorldRect};
use serde::{Deserialize, Serialize};

/// A filled circle, drawn as a log line.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Dot {
    center: Vector2,
    radius: Scalar,
}

impl Shape for Dot {
    type Canvas = Vec<String>;

    fn is_renderable(&self) -> bool {
        self.radius.is_positive()
    }

    fn intersects_with_screen(&self, x: f64, y: f64, viewport: &Viewport) -> bool {
        let world = viewport.screen_to_world(x, y);
        (&world - &self.center).magnitude_squared() <= &self.radius * &self.radius
    }

    fn move_by(&mut self, dx: &Scalar, dy: &Scalar) {
        self.center = &self.center + &Vector2::new(dx.clone(), dy.clone());
    }

    fn render(&self, canvas: &mut Vec<String>, viewport: &Viewport) {
        let p = viewport.world_to_screen(&self.center);
        let r = viewport.world_length_to_screen(&self.radius);
        canvas.push(format!("dot at ({:.1}, {:.1}) r={r:.1}px", p.x, p.y));
    }

    fn world_bounds(&self) -> WorldRect {
        let r = Vector2::new(self.radius.clone(), self.radius.clone());
        WorldRect::new(&self.center - &r, &self.center + &r)
    }

    fn to_descriptor(&self) -> serde_json::Value {
        serde_json::json!({ "center": self.center, "radius": self.radius })
    }

    fn from_descriptor(descriptor: &serde_json::Value) -> Option<Self> {
        match serde_json::from_value(descriptor.clone()) {
            Ok(dot) => Some(dot),
            Err(error) => {
                tracing::warn!(%error, "dot descriptor does not parse");
                None
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = EngineConfig::from_env()?;
    let mut engine: EngineCore<Dot> = EngineCore::new(config);
    engine.set_viewport(1280.0, 720.0);

    // Each dot sits inside the previous one, 1e-20 times smaller.
    let mut scale = Scalar::one();
    let step = Scalar::parse("1e-20")?;
    for depth in 0..4 {
        let center = Vector2::new(&scale * &Scalar::from(3), Scalar::zero());
        engine.add_shape(Dot { center: center.clone(), radius: scale.clone() });
        engine.camera.jump_to(center, &scale.scale(4.0));
        engine.add_bookmark(Some(format!("Depth {depth}").as_str()));
        scale = &scale * &step;
    }
    engine.camera.jump_to(Vector2::zero(), &Scalar::from(10));

    engine.play_tour();
    let start = Instant::now();
    let mut frames = tokio::time::interval(Duration::from_millis(16));
    loop {
        frames.tick().await;
        let now_ms = start.elapsed().as_secs_f64() * 1000.0;
        let actions = engine.frame(now_ms);
        for action in &actions {
            match action {
                Action::TourAdvanced { index } => {
                    tracing::info!(index, progress = ?engine.tour_progress().map(|p| p.to_string()), "tour advanced");
                }
                Action::Refiltered { activated, cached } => {
                    tracing::info!(activated, cached, "visibility pass");
                }
                _ => {}
            }
        }
        if actions.contains(&Action::TourEnded) {
            break;
        }
    }

    let mut canvas = Vec::new();
    engine.render(&mut canvas);
    for line in &canvas {
        tracing::info!("{line}");
    }

    let store: Box<dyn BlobStore> = match std::env::var("DEEPZOOM_SNAPSHOT_DIR") {
        Ok(dir) => Box::new(FileStore::new(dir)),
        Err(_) => Box::new(MemoryStore::new()),
    };
    engine.save_to(store.as_ref()).await?;
    tracing::info!(bookmarks = engine.bookmarks.len(), "snapshot saved");
    Ok(())
}
