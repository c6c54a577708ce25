//! Core robot types and configuration.
//!
//! This module defines the main types and constants for the walker, including:
//! - [`commands`]: Locomotion command type and its text parser.
//! - [`config`]: Servo channel table plus timing and safety constants.
//! - [`leg`]: Leg enumeration and channel indexing helpers.
//! - [`joint`]: Joint enumeration and display helpers.
//! - `ledc`: ESP32 LEDC servo bring-up (`esp32` feature only).
//! - [`servo`]: PWM servo driver and the [`servo::Actuator`] seam.
//! - [`sonar`]: Ultrasonic range finder.
//! - [`state`]: Command/obstacle context shared by the control loop.
pub mod commands;
pub mod config;
pub mod joint;
pub mod leg;
#[cfg(feature = "esp32")]
pub mod ledc;
pub mod servo;
pub mod sonar;
pub mod state;
