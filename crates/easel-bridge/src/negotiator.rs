//! Version handshake, run once at startup. Nothing else may start until it
//! lands in `Compatible`; a mismatch aborts initialization and is never
//! retried.

use serde_json::Value;
use tracing::{info, warn};

use easel_common::capabilities::Capabilities;
use easel_common::errors::{BridgeError, ProtocolError};
use easel_common::{Command, ProtocolReport};

use crate::bridge::Bridge;

/// Protocol version this controller speaks.
pub const PROTOCOL_VERSION: i64 = 1;
pub const MIN_SUPPORTED_VERSION: i64 = 1;
pub const MAX_SUPPORTED_VERSION: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegotiationState {
    #[default]
    Unstarted,
    Negotiating,
    Compatible,
    Incompatible,
}

#[derive(Default)]
pub struct Negotiator {
    state: NegotiationState,
}

impl Negotiator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    /// Query the peer's protocol version and decide compatibility.
    ///
    /// A peer that does not implement version reporting at all is treated as
    /// legacy and assumed compatible. A peer outside the supported range is
    /// fatal: the returned error must abort initialization.
    pub async fn negotiate(&mut self, bridge: &Bridge) -> Result<ProtocolReport, ProtocolError> {
        self.state = NegotiationState::Negotiating;

        let report = match bridge.send(Command::new("host", "getProtocolVersion")).await {
            Ok(value) => match parse_report(value) {
                Ok(report) => report,
                Err(err) => {
                    self.state = NegotiationState::Incompatible;
                    return Err(err);
                }
            },
            Err(err) if is_unimplemented(&err) => {
                warn!("peer does not report a protocol version, assuming legacy peer");
                ProtocolReport {
                    version: MIN_SUPPORTED_VERSION,
                    min_dart_version: MIN_SUPPORTED_VERSION,
                    max_dart_version: MAX_SUPPORTED_VERSION,
                }
            }
            Err(err) => {
                self.state = NegotiationState::Incompatible;
                return Err(ProtocolError::Handshake(err));
            }
        };

        if report.version < MIN_SUPPORTED_VERSION {
            self.state = NegotiationState::Incompatible;
            return Err(ProtocolError::TooOld {
                peer: report.version,
                min_supported: MIN_SUPPORTED_VERSION,
            });
        }
        if report.version > MAX_SUPPORTED_VERSION {
            self.state = NegotiationState::Incompatible;
            return Err(ProtocolError::TooNew {
                peer: report.version,
                max_supported: MAX_SUPPORTED_VERSION,
            });
        }

        info!(version = report.version, "protocol negotiated");
        self.state = NegotiationState::Compatible;
        Ok(report)
    }
}

/// Fetch the peer's capability report. Absent keys default.
pub async fn discover_capabilities(bridge: &Bridge) -> Result<Capabilities, BridgeError> {
    let value = bridge.send(Command::new("host", "getCapabilities")).await?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn parse_report(value: Value) -> Result<ProtocolReport, ProtocolError> {
    serde_json::from_value(value.clone())
        .map_err(|_| ProtocolError::MalformedReport(value.to_string()))
}

fn is_unimplemented(err: &BridgeError) -> bool {
    matches!(err.code(), Some("UNKNOWN_COMMAND") | Some("UNKNOWN_SERVICE"))
}
