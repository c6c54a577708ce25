//! Joint-space kinematics and gait sequencing.
//!
//! - [`conversion`] maps logical joint angles to physical servo angles.
//! - [`gait_engine`] implements the step primitive and the four gaits.
//!
//! Used by the control loop to execute locomotion commands.
pub mod conversion;
pub mod gait_engine;
