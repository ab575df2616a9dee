//! World that loads in the background and is empty until it arrives

use std::path::PathBuf;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver};

use crate::core::types::{Result, Vec3};
use super::level::LevelDescription;
use super::static_world::StaticWorld;
use super::{RayHit, SolidId, World};

/// Load progress of a [`PendingWorld`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing requested; the world stays empty
    Idle,
    /// Waiting for the load task
    Loading,
    /// Geometry installed
    Loaded,
    /// Loader failed; the world stays empty
    Failed(String),
}

/// Geometry source that answers like an empty world until a level has been
/// delivered, then like that level.
///
/// Delivery happens over a channel so the loader can run anywhere; the
/// frame loop calls [`PendingWorld::poll`] once per tick to pick it up.
pub struct PendingWorld {
    world: Option<StaticWorld>,
    receiver: Option<UnboundedReceiver<Result<StaticWorld>>>,
    /// Runtime driving the load task, dropped once the result is in
    runtime: Option<Runtime>,
    status: LoadStatus,
}

impl PendingWorld {
    /// A world with nothing requested
    pub fn empty() -> Self {
        Self {
            world: None,
            receiver: None,
            runtime: None,
            status: LoadStatus::Idle,
        }
    }

    /// A world that is already loaded
    pub fn ready(world: StaticWorld) -> Self {
        Self {
            world: Some(world),
            receiver: None,
            runtime: None,
            status: LoadStatus::Loaded,
        }
    }

    /// Wait for a load result on `receiver`
    pub fn from_receiver(receiver: UnboundedReceiver<Result<StaticWorld>>) -> Self {
        Self {
            world: None,
            receiver: Some(receiver),
            runtime: None,
            status: LoadStatus::Loading,
        }
    }

    /// Load a level file on a dedicated tokio runtime
    pub fn spawn_load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let runtime = match Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("level-loader")
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                log::error!("Failed to create level loader runtime: {e}");
                let mut pending = Self::empty();
                pending.status = LoadStatus::Failed(e.to_string());
                return pending;
            }
        };

        let (tx, rx) = mpsc::unbounded_channel();
        runtime.spawn(async move {
            log::info!("Loading level from: {}", path.display());
            let result = LevelDescription::load_world(&path).await;
            if tx.send(result).is_err() {
                log::warn!("Level {} finished loading after its world was dropped", path.display());
            }
        });

        let mut pending = Self::from_receiver(rx);
        pending.runtime = Some(runtime);
        pending
    }

    /// Pick up a finished load, if any. Returns `true` when geometry was
    /// installed by this call.
    pub fn poll(&mut self) -> bool {
        let Some(receiver) = &mut self.receiver else {
            return false;
        };

        let received = receiver.try_recv();
        if !matches!(received, Err(TryRecvError::Empty)) {
            self.runtime = None;
        }

        match received {
            Ok(Ok(world)) => {
                log::info!("Level loaded: {} solids", world.len());
                self.receiver = None;
                self.install(world);
                true
            }
            Ok(Err(e)) => {
                log::error!("Error loading level: {e}");
                self.receiver = None;
                self.status = LoadStatus::Failed(e.to_string());
                false
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                log::error!("Level loader exited without a result");
                self.receiver = None;
                self.status = LoadStatus::Failed("loader disconnected".into());
                false
            }
        }
    }

    /// Replace the geometry directly
    pub fn install(&mut self, world: StaticWorld) {
        self.world = Some(world);
        self.status = LoadStatus::Loaded;
    }

    /// Current load status
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Whether geometry is available
    pub fn is_loaded(&self) -> bool {
        self.world.is_some()
    }

    /// The loaded geometry, if any
    pub fn loaded(&self) -> Option<&StaticWorld> {
        self.world.as_ref()
    }
}

impl Default for PendingWorld {
    fn default() -> Self {
        Self::empty()
    }
}

impl World for PendingWorld {
    fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        self.world.as_ref()?.intersect(origin, direction)
    }

    fn solid_name(&self, id: SolidId) -> Option<&str> {
        self.world.as_ref()?.solid_name(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;
    use crate::world::static_world::Shape;
    use std::io::Write;

    fn floor() -> StaticWorld {
        let mut world = StaticWorld::new();
        world.add_named("floor", Shape::plane(Vec3::Y, Vec3::ZERO).unwrap());
        world
    }

    #[test]
    fn test_empty_until_delivered() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut pending = PendingWorld::from_receiver(rx);

        assert!(!pending.poll());
        assert_eq!(pending.status(), &LoadStatus::Loading);
        assert!(pending.intersect(Vec3::Y, Vec3::NEG_Y).is_none());

        tx.send(Ok(floor())).unwrap();
        assert!(pending.poll());
        assert_eq!(pending.status(), &LoadStatus::Loaded);

        let hit = pending.intersect(Vec3::Y, Vec3::NEG_Y).unwrap();
        assert_eq!(pending.solid_name(hit.id), Some("floor"));

        // Nothing more to pick up
        assert!(!pending.poll());
    }

    #[test]
    fn test_failed_load_stays_empty() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut pending = PendingWorld::from_receiver(rx);
        tx.send(Err(Error::InvalidLevel("broken".into()))).unwrap();

        assert!(!pending.poll());
        assert!(matches!(pending.status(), LoadStatus::Failed(msg) if msg.contains("broken")));
        assert!(pending.intersect(Vec3::Y, Vec3::NEG_Y).is_none());
    }

    #[test]
    fn test_disconnected_loader() {
        let (tx, rx) = mpsc::unbounded_channel::<Result<StaticWorld>>();
        drop(tx);
        let mut pending = PendingWorld::from_receiver(rx);
        assert!(!pending.poll());
        assert!(matches!(pending.status(), LoadStatus::Failed(_)));
    }

    fn wait_for_load(pending: &mut PendingWorld) {
        for _ in 0..1000 {
            if pending.status() != &LoadStatus::Loading {
                return;
            }
            pending.poll();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
    }

    #[test]
    fn test_spawn_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut pending = PendingWorld::spawn_load(dir.path().join("missing.json"));

        wait_for_load(&mut pending);
        assert!(matches!(pending.status(), LoadStatus::Failed(_)));
        assert!(!pending.is_loaded());
    }

    #[test]
    fn test_spawn_load_level_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LevelDescription::demo().to_json().unwrap().as_bytes()).unwrap();
        let mut pending = PendingWorld::spawn_load(file.path());

        wait_for_load(&mut pending);
        assert_eq!(pending.status(), &LoadStatus::Loaded);
        let hit = pending.intersect(Vec3::new(0.0, 1.5, 5.0), Vec3::NEG_Y).unwrap();
        assert_eq!(pending.solid_name(hit.id), Some("floor"));
    }
}
