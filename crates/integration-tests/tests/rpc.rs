//! Connector-level scenarios over the in-process channel broker

mod harness;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use vox_config::BrokerConfig;
use vox_mq::{Broker, BrokerError, ChannelBroker, MqConnector, MqError, RequestEnvelope};

use harness::{config, worker};

fn broker_config() -> BrokerConfig {
    config::test_config().broker
}

#[tokio::test]
async fn correlated_reply_completes_within_milliseconds() {
    let broker = Arc::new(ChannelBroker::new());
    let broker_config = broker_config();
    worker::spawn_echo_worker(broker.clone(), &broker_config.request_destination("voiceA")).await;

    let connector = MqConnector::start(broker, broker_config).await.unwrap();

    let started = Instant::now();
    let (payload, correlation_id) = connector
        .call(&json!({ "text": "hello", "speaker": "voiceA" }), "voiceA", Duration::from_secs(5))
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(payload.text, "hello");
    assert_eq!(payload.sampling_rate, Some(22_050));
    assert!(!correlation_id.is_nil());
    assert_eq!(connector.pending(), 0);
}

#[tokio::test]
async fn timeout_fires_and_late_reply_is_dropped() {
    let broker = Arc::new(ChannelBroker::new());
    let broker_config = broker_config();
    worker::spawn_delayed_worker(
        broker.clone(),
        &broker_config.request_destination("mari"),
        Duration::from_millis(600),
    )
    .await;

    let connector = MqConnector::start(broker, broker_config).await.unwrap();

    let started = Instant::now();
    let result = connector
        .call(&json!({ "text": "tere" }), "mari", Duration::from_millis(200))
        .await;

    assert!(matches!(result, Err(MqError::Timeout)));
    // Deadline plus at most one sweep interval of slack
    assert!(started.elapsed() < Duration::from_millis(450));
    assert_eq!(connector.pending(), 0);

    // The late reply lands now; it must not disturb anything.
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(connector.pending(), 0);
}

struct UnreachableBroker;

#[async_trait]
impl Broker for UnreachableBroker {
    async fn publish(&self, destination: &str, _message: Vec<u8>) -> Result<(), BrokerError> {
        Err(BrokerError::Publish {
            destination: destination.to_owned(),
            reason: "connection refused".to_owned(),
        })
    }

    async fn subscribe(&self, _destination: &str) -> Result<mpsc::Receiver<Vec<u8>>, BrokerError> {
        let (_sender, receiver) = mpsc::channel(1);
        Ok(receiver)
    }
}

#[tokio::test]
async fn failing_publish_returns_transport_error_immediately() {
    let connector = MqConnector::start(Arc::new(UnreachableBroker), broker_config()).await.unwrap();

    let started = Instant::now();
    let result = connector
        .call(&json!({ "text": "tere" }), "mari", Duration::from_secs(30))
        .await;

    assert!(matches!(result, Err(MqError::Transport(_))));
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(connector.pending(), 0);
}

#[tokio::test]
async fn hundred_concurrent_calls_do_not_cross_talk() {
    let speakers = ["mari", "voiceA", "kalev", "vesta"];
    let broker = Arc::new(ChannelBroker::new());
    let broker_config = broker_config();
    for speaker in speakers {
        worker::spawn_echo_worker(broker.clone(), &broker_config.request_destination(speaker)).await;
    }

    let connector = MqConnector::start(broker, broker_config).await.unwrap();

    let mut calls = Vec::new();
    for i in 0..100 {
        let connector = Arc::clone(&connector);
        let speaker = speakers[i % speakers.len()];
        calls.push(tokio::spawn(async move {
            let text = format!("utterance-{i}");
            let (payload, id) = connector
                .call(&json!({ "text": text, "speaker": speaker }), speaker, Duration::from_secs(5))
                .await
                .unwrap();
            (text, payload, id)
        }));
    }

    let mut seen_ids = HashSet::new();
    for call in calls {
        let (text, payload, id) = call.await.unwrap();
        // Every caller gets exactly its own synthesis back
        assert_eq!(payload.text, text);
        assert!(seen_ids.insert(id), "correlation id reused");
    }

    assert_eq!(connector.pending(), 0);
    assert_eq!(connector.shutdown(), 0);
}

#[tokio::test]
async fn cancel_resolves_a_pending_call() {
    let broker = Arc::new(ChannelBroker::new());
    let broker_config = broker_config();
    // Act as the worker ourselves so we learn the correlation id
    // without ever replying.
    let mut jobs = broker.subscribe(&broker_config.request_destination("mari")).await.unwrap();

    let connector = MqConnector::start(broker, broker_config).await.unwrap();

    let pending_call = {
        let connector = Arc::clone(&connector);
        tokio::spawn(async move {
            connector
                .call(&json!({ "text": "tere" }), "mari", Duration::from_secs(30))
                .await
        })
    };

    let job: RequestEnvelope<Value> = serde_json::from_slice(&jobs.recv().await.unwrap()).unwrap();
    assert!(connector.cancel(job.correlation_id));
    assert!(!connector.cancel(job.correlation_id));

    assert!(matches!(pending_call.await.unwrap(), Err(MqError::Cancelled)));
    assert_eq!(connector.pending(), 0);
}
