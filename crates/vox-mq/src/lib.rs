#![allow(clippy::must_use_candidate)]

//! Synchronous calls over an asynchronous message broker
//!
//! Turns "publish one job, later receive exactly one worker reply on a
//! shared channel" into "await one typed result within a time budget".
//! The pieces: a concurrent correlation registry keyed by UUID, a
//! single long-lived reply listener, a periodic timeout supervisor,
//! and the [`MqConnector`] facade callers go through.

mod broker;
mod client;
mod envelope;
mod error;
mod listener;
mod registry;
mod supervisor;

pub use broker::{Broker, BrokerError, channel::ChannelBroker, redis::RedisBroker};
pub use client::MqConnector;
pub use envelope::{ReplyEnvelope, ReplyOutcome, RequestEnvelope, SynthesisPayload};
pub use error::{MqError, Result};
