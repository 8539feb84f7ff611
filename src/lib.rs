#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod error;
pub mod overlay;
pub mod recognition;
pub mod scan;
pub mod session;
pub mod stroke;
pub mod surface;
pub mod typeset;
pub mod vars;

pub use app::CalcApp;
pub use error::CalcError;
pub use overlay::{OverlayEntry, OverlaySequencer};
pub use recognition::{RecognitionClient, RecognitionResult, RoundOutcome};
pub use session::Session;
pub use stroke::StrokeController;
pub use surface::{Surface, ToolConfig, ToolKind};
pub use typeset::{EguiTypesetter, TypesetSink};
pub use vars::VariableStore;
