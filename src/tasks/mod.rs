//! Runtime pieces around the gait engine.
//!
//! - [`serial_link`]: Non-blocking command line reader and telemetry writer.
//! - [`control_task`]: The control loop that polls inputs, refreshes the
//!   obstacle distance and dispatches one gait per pass.
//!
//! The firmware binary wraps [`control_task::ControlLoop`] in an Embassy task.
pub mod control_task;
pub mod serial_link;
