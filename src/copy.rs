//! Planning and executing the copy.
//!
//! Every destination is resolved and checked for collisions before the
//! first file is touched; the orchestrator then copies and tags in play
//! order and aborts on the first failure.

mod orchestrator;
mod plan;
mod primitive;
mod progress;
mod tags;

pub use orchestrator::Orchestrator;
pub use plan::{CopyPlan, Planner};
pub use primitive::{ByteCopier, FsCopier};
pub use progress::{ConsoleProgress, Progress, Summary, count_report};
pub use tags::{LoftyCodec, TagCodec, TagUpdate};
