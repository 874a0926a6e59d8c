//! Wayfinder Library
//!
//! Multimodal (speech, gesture, fusion) intent dispatch and confirmation
//! core for a voice-and-gesture map assistant.

pub mod assistant;
pub mod config;
pub mod confirmation;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod event;
pub mod executor;
pub mod gesture;
pub mod handlers;
pub mod idle;
pub mod intent;
pub mod registry;
pub mod router;
pub mod session;
pub mod speech;

pub use assistant::Assistant;
pub use config::Config;
pub use error::{AssistantError, AssistantResult};
pub use event::{Entities, Modality, RecognitionEvent};
pub use executor::{ActionExecutor, DryRunExecutor};
pub use intent::{IntentContext, IntentHandler, IntentResponse};
pub use registry::HandlerRegistry;
pub use router::IntentRouter;
pub use session::Session;
