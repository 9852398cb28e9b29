//! # Events Module
//!
//! Progress reporting for long collage runs.
//!
//! The pipeline sends events through a channel; the CLI (or any other
//! front end) listens on the other end. Runs without a listener use
//! [`null_sender`].
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Pipeline(PipelineEvent::PhaseChanged { phase }) = event {
//!             eprintln!("{}", phase);
//!         }
//!     }
//! });
//!
//! let plan = pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
