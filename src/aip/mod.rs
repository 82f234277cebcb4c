//! Client for the Vertex AI pipeline-job API.
//!
//! The launcher only initiates job lifecycles; queueing, scheduling,
//! retries and execution all belong to the remote service.

mod client;
mod job;

pub use client::AipClient;
pub use job::{JobState, PipelineJob, SubmittedJob};
