pub mod commands;
pub mod renderer;
pub mod scheduler;
pub mod state;
pub mod style;

pub use commands::{DrawCommand, Glow, Stroke};
pub use renderer::{render, SceneRenderer};
pub use scheduler::{FrameHost, FrameScheduler, FrameTick, SchedulerState};
pub use state::SceneState;
pub use style::{SceneStyle, Severity};
