//! PolkaAgents inference engines
//!
//! One `Engine` per agent kind, behind a common async trait:
//!
//! - **chatbot**: template-based conversational responses
//! - **translation**: phrasebook translation for the preloaded language pairs
//! - **sentiment**: lexicon scoring with negation handling
//! - **summarization**: frequency-based extractive summaries
//! - **job_application**: templated cover letters
//!
//! The builtin engines are deterministic and fully offline, which keeps the
//! whole marketplace loop runnable without model weights. `RemoteEngine`
//! forwards the same `/predict` contract to an external model server for
//! deployments that have one.

pub mod engines;
pub mod router;
pub mod types;

pub use engines::*;
pub use router::*;
pub use types::*;
