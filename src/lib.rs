//! Rostra — scripted multi-persona debate orchestrator.
//!
//! A moderator and two three-member teams take turns under a fixed schedule.
//! Each turn prompts a text-generation service with the persona's identity, a
//! bounded summary of its private memory, and a sliding window of the global
//! transcript. The first speaker of each team routes its turn through a
//! rule-based think → fetch → respond path backed by small tool functions.
//!
//! # Quick Start
//!
//! ```no_run
//! use rostra::config::DebateConfig;
//! use rostra::react::ToolRunner;
//! use rostra::scheduler::{DebateRoster, DebateRunner};
//!
//! # async fn example() -> rostra::error::Result<()> {
//! let config = DebateConfig::from_env()?;
//! let generator = rostra::provider::create_generator(&config)?;
//! let tools = ToolRunner::new(&config);
//! let mut runner = DebateRunner::new(
//!     DebateRoster::standard(),
//!     generator,
//!     tools,
//!     config,
//!     "Is AI in education a net benefit?",
//! );
//! runner.run(|msg| println!("{}:\n{}", msg.speaker, msg.content)).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod persona;
pub mod provider;
pub mod react;
pub mod scheduler;
pub mod tools;
pub mod types;
