pub mod run;

pub use run::{RunEvent, TaskPhase};
