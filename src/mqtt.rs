//! MQTT client for remote viewer commands
//!
//! Connects to an MQTT broker and subscribes to a topic.
//! Each payload carries one command in the socket text protocol, either as
//! plain text (`zoom 400 300`) or as JSON (`{"command": "zoom 400 300"}`).

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use rumqttc::{Client, Event, MqttOptions, Packet, QoS};
use serde::Deserialize;

use crate::config::MqttConfig;
use crate::control::Command;
use crate::error::MqttError;

const CLIENT_ID: &str = "fractal-explorer";

/// JSON format for incoming messages (optional)
#[derive(Deserialize)]
struct JsonMessage {
    command: String,
}

/// Decode one payload into a command
fn parse_payload(payload: &[u8]) -> Option<Command> {
    let text = std::str::from_utf8(payload).ok()?.trim();
    if text.is_empty() {
        return None;
    }
    // Try to parse as JSON, fall back to plain text
    match serde_json::from_str::<JsonMessage>(text) {
        Ok(json) => Command::parse(&json.command),
        Err(_) => Command::parse(text),
    }
}

/// MQTT client that receives commands in a background thread
pub struct MqttClient {
    receiver: Receiver<Command>,
    _thread: thread::JoinHandle<()>,
}

impl MqttClient {
    /// Create a new MQTT client and connect to the broker.
    /// Fails immediately if connection cannot be established.
    pub fn new(config: &MqttConfig) -> Result<Self, MqttError> {
        let mut options = MqttOptions::new(CLIENT_ID, config.host.as_str(), config.port);
        options.set_keep_alive(Duration::from_secs(30));

        let (client, mut connection) = Client::new(options, 10);

        client
            .subscribe(config.topic.as_str(), QoS::AtMostOnce)
            .map_err(|source| MqttError::Subscribe {
                topic: config.topic.clone(),
                source,
            })?;

        // Test connection by polling once - fail fast if broker unreachable
        let connect_error = |reason: String| MqttError::Connect {
            host: config.host.clone(),
            port: config.port,
            reason,
        };
        match connection.iter().next() {
            Some(Ok(_)) => {},
            Some(Err(e)) => return Err(connect_error(e.to_string())),
            None => return Err(connect_error("connection closed".into())),
        }

        let (sender, receiver) = mpsc::channel();
        let topic = config.topic.clone();

        let handle = thread::spawn(move || {
            // Keep the client alive for as long as the connection is polled
            let _client = client;
            Self::message_loop(connection, &sender, &topic);
        });

        info!(
            "MQTT: Connected to {}:{}, subscribed to '{}'",
            config.host, config.port, config.topic
        );

        Ok(Self {
            receiver,
            _thread: handle,
        })
    }

    fn message_loop(mut connection: rumqttc::Connection, sender: &Sender<Command>, topic: &str) {
        for event in connection.iter() {
            match event {
                Ok(Event::Incoming(Packet::Publish(publish))) if publish.topic == topic => {
                    match parse_payload(&publish.payload) {
                        Some(cmd) => {
                            debug!("MQTT command: {:?}", cmd);
                            if sender.send(cmd).is_err() {
                                // Main thread gone, exit
                                break;
                            }
                        },
                        None => warn!("MQTT: ignoring unrecognised payload on '{}'", topic),
                    }
                },
                Ok(_) => {},
                Err(e) => {
                    warn!("MQTT error: {}", e);
                    // Continue trying - connection may recover
                    thread::sleep(Duration::from_secs(1));
                },
            }
        }
    }

    /// Get any pending commands (non-blocking), oldest first
    pub fn poll(&self) -> Vec<Command> {
        self.receiver.try_iter().collect()
    }
}
