pub mod config;
pub mod error;
pub mod model;
pub mod ui;

pub use config::EngineConfig;
pub use error::EngineError;
pub use model::{opposite_role, Dir, Mode, Role};
pub use ui::Ui;
