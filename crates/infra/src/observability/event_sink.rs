use jiralink_core::{DispatchEvent, EventSink};
use jiralink_domain::{LogLevel, LoggingConfig};
use serde_json::Value;

/// Dispatches to the `tracing` macro matching a runtime [`LogLevel`].
macro_rules! event_at {
    ($level:expr, $($args:tt)+) => {
        match $level {
            LogLevel::Trace => tracing::trace!($($args)+),
            LogLevel::Debug => tracing::debug!($($args)+),
            LogLevel::Info => tracing::info!($($args)+),
            LogLevel::Warn => tracing::warn!($($args)+),
            LogLevel::Error => tracing::error!($($args)+),
        }
    };
}

/// [`EventSink`] that writes every event through `tracing`.
///
/// Events below the configured minimum level are dropped, as is everything
/// when logging is disabled. Each record carries the channel, the event name
/// and the request id so a full exchange can be correlated.
#[derive(Debug, Clone)]
pub struct TracingEventSink {
    channel: String,
    min_level: LogLevel,
    enabled: bool,
}

impl TracingEventSink {
    pub fn new(config: &LoggingConfig) -> Self {
        Self { channel: config.channel.clone(), min_level: config.level, enabled: config.enabled }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Whether an event at `level` would be written.
    pub fn is_enabled_for(&self, level: LogLevel) -> bool {
        self.enabled && level >= self.min_level
    }
}

impl EventSink for TracingEventSink {
    fn emit(&self, event: &DispatchEvent) {
        let level = event.level();
        if !self.is_enabled_for(level) {
            return;
        }

        let channel = self.channel.as_str();
        let name = event.name();
        let message = event.message();

        match event {
            DispatchEvent::Request { request_id, method, endpoint, params, body } => {
                let params = serde_json::to_string(params).unwrap_or_default();
                let body = Value::Object(body.clone());
                event_at!(
                    level,
                    channel,
                    event = name,
                    %request_id,
                    %method,
                    endpoint = %endpoint,
                    params = %params,
                    body = %body,
                    "{}",
                    message
                );
            }
            DispatchEvent::CacheHit { request_id, method, endpoint } => {
                event_at!(
                    level,
                    channel,
                    event = name,
                    %request_id,
                    %method,
                    endpoint = %endpoint,
                    "{}",
                    message
                );
            }
            DispatchEvent::Response { request_id, method, endpoint, status, elapsed } => {
                event_at!(
                    level,
                    channel,
                    event = name,
                    %request_id,
                    %method,
                    endpoint = %endpoint,
                    status = *status,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "{}",
                    message
                );
            }
            DispatchEvent::CacheStore { request_id, method, endpoint, ttl } => {
                event_at!(
                    level,
                    channel,
                    event = name,
                    %request_id,
                    %method,
                    endpoint = %endpoint,
                    ttl_seconds = ttl.as_secs(),
                    "{}",
                    message
                );
            }
            DispatchEvent::Error { request_id, method, endpoint, status, category, message: error } => {
                event_at!(
                    level,
                    channel,
                    event = name,
                    %request_id,
                    %method,
                    endpoint = %endpoint,
                    status = ?status,
                    category = %category,
                    error = %error,
                    "{}",
                    message
                );
            }
            DispatchEvent::Retry { request_id, method, endpoint, attempt, delay, reason } => {
                event_at!(
                    level,
                    channel,
                    event = name,
                    %request_id,
                    %method,
                    endpoint = %endpoint,
                    attempt = *attempt,
                    delay_ms = delay.as_millis() as u64,
                    reason = %reason,
                    "{}",
                    message
                );
            }
            DispatchEvent::UploadRequest { request_id, endpoint, file_name, size } => {
                event_at!(
                    level,
                    channel,
                    event = name,
                    %request_id,
                    endpoint = %endpoint,
                    file_name = %file_name,
                    size = *size,
                    "{}",
                    message
                );
            }
            DispatchEvent::UploadResponse { request_id, endpoint, file_name, status } => {
                event_at!(
                    level,
                    channel,
                    event = name,
                    %request_id,
                    endpoint = %endpoint,
                    file_name = %file_name,
                    status = *status,
                    "{}",
                    message
                );
            }
            DispatchEvent::UploadError { request_id, endpoint, file_name, message: error } => {
                event_at!(
                    level,
                    channel,
                    event = name,
                    %request_id,
                    endpoint = %endpoint,
                    file_name = %file_name,
                    error = %error,
                    "{}",
                    message
                );
            }
        }
    }
}
