//! Client-side monitor for a robotic media changer.
//!
//! The backend exposes changer operations as asynchronous jobs: an endpoint
//! returns a job descriptor that is either still running (poll again), a
//! redirect to the real polling URL, or terminal. [`changer_client`] drives
//! those chains and reconciles the terminal payloads into a [`SlotBoard`],
//! the one owned view of every slot's state.

pub mod changer_client;
pub mod config;
pub mod types;

pub use changer_client::{ChangerClient, SlotBoard};
pub use config::Config;
pub use types::MonitorError;
