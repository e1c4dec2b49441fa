//! Bean simulation logic
//!
//! Drives an external physics world and visual surface. Nothing here
//! integrates motion or draws pixels:
//! - Single control thread, fixed physics step
//! - Seeded RNG only
//! - Body -> visual mapping owned by the scene

pub mod dims;
pub mod drag;
pub mod factory;
pub mod placement;
pub mod scene;
pub mod spawner;
pub mod stage;
pub mod sync;
pub mod timer;
pub mod walls;

pub use dims::{Dimensions, SizeRange, Viewport, derive_dimensions, size_range};
pub use drag::{DragController, GrabEvent};
pub use factory::BeanFactory;
pub use placement::{Occupant, Placement, find_free_position};
pub use scene::{BeanRecord, BeanRegistry, Scene};
pub use spawner::{SpawnPhase, SpawnScheduler};
pub use stage::{Stage, StageEvent};
pub use sync::{SyncReport, bean_transform, synchronize};
pub use timer::{Debounce, Interval};
pub use walls::{Walls, wall_rects};
