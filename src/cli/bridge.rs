//! JSON-lines bridge exposing the recorder operations to another process
//!
//! One request per input line:
//! `{"id": 1, "method": "startRecording", "options": {"directory": "CACHE"}}`
//!
//! One response per request, in order:
//! `{"id": 1, "ok": true, "data": {"value": true}}` or
//! `{"id": 1, "ok": false, "error": {"code": "ALREADY_RECORDING", "message": "..."}}`

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::application::{VoiceRecorderError, VoiceRecorderPlugin};
use crate::domain::storage::RecordingOptions;

/// Code for a method name the bridge does not know
pub const UNKNOWN_METHOD: &str = "UNKNOWN_METHOD";
/// Code for a line that is not a valid request
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
/// Code for a result that could not be serialized
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

#[derive(Debug, Deserialize)]
struct BridgeRequest {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    options: Option<RecordingOptions>,
}

/// Failure half of a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeError {
    pub code: String,
    pub message: String,
}

impl BridgeError {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl From<VoiceRecorderError> for BridgeError {
    fn from(err: VoiceRecorderError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

/// One response line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub id: Value,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<BridgeError>,
}

impl BridgeResponse {
    fn from_result(id: Value, result: Result<Value, BridgeError>) -> Self {
        match result {
            Ok(data) => Self {
                id,
                ok: true,
                data: Some(data),
                error: None,
            },
            Err(error) => Self {
                id,
                ok: false,
                data: None,
                error: Some(error),
            },
        }
    }
}

fn to_data<T: Serialize>(result: Result<T, VoiceRecorderError>) -> Result<Value, BridgeError> {
    let value = result?;
    serde_json::to_value(value).map_err(|e| BridgeError::new(INTERNAL_ERROR, e.to_string()))
}

async fn dispatch<P>(
    plugin: &P,
    method: &str,
    options: Option<RecordingOptions>,
) -> Result<Value, BridgeError>
where
    P: VoiceRecorderPlugin + ?Sized,
{
    match method {
        "canDeviceVoiceRecord" => to_data(plugin.can_device_voice_record().await),
        "requestAudioRecordingPermission" => {
            to_data(plugin.request_audio_recording_permission().await)
        }
        "hasAudioRecordingPermission" => to_data(plugin.has_audio_recording_permission().await),
        "startRecording" => to_data(plugin.start_recording(options).await),
        "stopRecording" => to_data(plugin.stop_recording().await),
        "pauseRecording" => to_data(plugin.pause_recording().await),
        "resumeRecording" => to_data(plugin.resume_recording().await),
        "getCurrentStatus" => to_data(plugin.get_current_status().await),
        other => Err(BridgeError::new(
            UNKNOWN_METHOD,
            format!("Unknown method '{}'", other),
        )),
    }
}

/// Handle a single request line
pub async fn handle_line<P>(plugin: &P, line: &str) -> BridgeResponse
where
    P: VoiceRecorderPlugin + ?Sized,
{
    let raw: Value = match serde_json::from_str(line) {
        Ok(raw) => raw,
        Err(e) => {
            return BridgeResponse::from_result(
                Value::Null,
                Err(BridgeError::new(INVALID_REQUEST, e.to_string())),
            )
        }
    };

    let id = raw.get("id").cloned().unwrap_or(Value::Null);
    let request: BridgeRequest = match serde_json::from_value(raw) {
        Ok(request) => request,
        Err(e) => {
            return BridgeResponse::from_result(
                id,
                Err(BridgeError::new(INVALID_REQUEST, e.to_string())),
            )
        }
    };

    debug!(method = %request.method, "bridge request");
    let result = dispatch(plugin, &request.method, request.options).await;
    if let Err(ref error) = result {
        debug!(method = %request.method, code = %error.code, "bridge request failed");
    }

    BridgeResponse::from_result(request.id, result)
}

/// Serve requests until `input` reaches end of stream.
///
/// A recording still active when serving ends, at end of input or on an
/// I/O error, is stopped so the microphone is released; its result is
/// discarded.
pub async fn serve<P, R, W>(plugin: &P, input: R, mut output: W) -> std::io::Result<()>
where
    P: VoiceRecorderPlugin + ?Sized,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let served = answer_lines(plugin, input, &mut output).await;
    stop_active(plugin).await;
    served
}

async fn answer_lines<P, R, W>(plugin: &P, mut input: R, output: &mut W) -> std::io::Result<()>
where
    P: VoiceRecorderPlugin + ?Sized,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut raw = Vec::new();

    loop {
        raw.clear();
        if input.read_until(b'\n', &mut raw).await? == 0 {
            return Ok(());
        }

        let response = match std::str::from_utf8(&raw) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(plugin, line).await,
            Err(e) => {
                debug!(error = %e, "bridge line is not UTF-8");
                BridgeResponse::from_result(
                    Value::Null,
                    Err(BridgeError::new(INVALID_REQUEST, e.to_string())),
                )
            }
        };

        let mut encoded = serde_json::to_string(&response)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        encoded.push('\n');

        output.write_all(encoded.as_bytes()).await?;
        output.flush().await?;
    }
}

async fn stop_active<P>(plugin: &P)
where
    P: VoiceRecorderPlugin + ?Sized,
{
    if let Ok(current) = plugin.get_current_status().await {
        if current.status.is_active() {
            info!("bridge closing with an active recording, stopping it");
            if let Err(e) = plugin.stop_recording().await {
                warn!(code = e.code(), error = %e, "failed to stop recording on shutdown");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Mutex;

    use crate::domain::recording::{CurrentRecordingStatus, RecordingData, RecordingStatus};
    use crate::domain::response::GenericResponse;

    /// Minimal state machine standing in for a real recorder
    struct ScriptedPlugin {
        status: Mutex<RecordingStatus>,
        stops: Mutex<u32>,
    }

    impl ScriptedPlugin {
        fn new() -> Self {
            Self {
                status: Mutex::new(RecordingStatus::None),
                stops: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl VoiceRecorderPlugin for ScriptedPlugin {
        async fn can_device_voice_record(&self) -> Result<GenericResponse, VoiceRecorderError> {
            Ok(GenericResponse::success())
        }

        async fn request_audio_recording_permission(
            &self,
        ) -> Result<GenericResponse, VoiceRecorderError> {
            Ok(GenericResponse::success())
        }

        async fn has_audio_recording_permission(
            &self,
        ) -> Result<GenericResponse, VoiceRecorderError> {
            Ok(GenericResponse::success())
        }

        async fn start_recording(
            &self,
            _options: Option<RecordingOptions>,
        ) -> Result<GenericResponse, VoiceRecorderError> {
            let mut status = self.status.lock().await;
            if status.is_active() {
                return Err(VoiceRecorderError::AlreadyRecording);
            }
            *status = RecordingStatus::Recording;
            Ok(GenericResponse::success())
        }

        async fn stop_recording(&self) -> Result<RecordingData, VoiceRecorderError> {
            let mut status = self.status.lock().await;
            if !status.is_active() {
                return Err(VoiceRecorderError::RecordingHasNotStarted);
            }
            *status = RecordingStatus::None;
            *self.stops.lock().await += 1;
            Ok(RecordingData {
                record_data_base64: Some("CQkJ".into()),
                ms_duration: 1200,
                mime_type: "audio/flac".into(),
                uri: None,
            })
        }

        async fn pause_recording(&self) -> Result<GenericResponse, VoiceRecorderError> {
            let mut status = self.status.lock().await;
            match *status {
                RecordingStatus::Recording => {
                    *status = RecordingStatus::Paused;
                    Ok(GenericResponse::success())
                }
                RecordingStatus::Paused => Ok(GenericResponse::fail()),
                RecordingStatus::None => Err(VoiceRecorderError::RecordingHasNotStarted),
            }
        }

        async fn resume_recording(&self) -> Result<GenericResponse, VoiceRecorderError> {
            let mut status = self.status.lock().await;
            match *status {
                RecordingStatus::Paused => {
                    *status = RecordingStatus::Recording;
                    Ok(GenericResponse::success())
                }
                RecordingStatus::Recording => Ok(GenericResponse::fail()),
                RecordingStatus::None => Err(VoiceRecorderError::RecordingHasNotStarted),
            }
        }

        async fn get_current_status(&self) -> Result<CurrentRecordingStatus, VoiceRecorderError> {
            Ok(CurrentRecordingStatus::new(*self.status.lock().await))
        }
    }

    async fn call(plugin: &ScriptedPlugin, request: Value) -> Value {
        let response = handle_line(plugin, &request.to_string()).await;
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn status_round_trip() {
        let plugin = ScriptedPlugin::new();
        let response = call(&plugin, json!({"id": 1, "method": "getCurrentStatus"})).await;
        assert_eq!(
            response,
            json!({"id": 1, "ok": true, "data": {"status": "NONE"}})
        );
    }

    #[tokio::test]
    async fn recording_cycle_over_the_bridge() {
        let plugin = ScriptedPlugin::new();

        let started = call(
            &plugin,
            json!({"id": "a", "method": "startRecording", "options": {"directory": "CACHE"}}),
        )
        .await;
        assert_eq!(started["data"], json!({"value": true}));

        let paused = call(&plugin, json!({"id": "b", "method": "pauseRecording"})).await;
        assert_eq!(paused["data"], json!({"value": true}));

        let again = call(&plugin, json!({"id": "c", "method": "pauseRecording"})).await;
        assert_eq!(again["data"], json!({"value": false}));

        let stopped = call(&plugin, json!({"id": "d", "method": "stopRecording"})).await;
        assert_eq!(stopped["ok"], json!(true));
        assert_eq!(stopped["data"]["value"]["msDuration"], json!(1200));
        assert_eq!(stopped["data"]["value"]["mimeType"], json!("audio/flac"));
    }

    #[tokio::test]
    async fn failures_carry_codes() {
        let plugin = ScriptedPlugin::new();
        let response = call(&plugin, json!({"id": 7, "method": "stopRecording"})).await;
        assert_eq!(response["ok"], json!(false));
        assert_eq!(response["error"]["code"], json!("RECORDING_HAS_NOT_STARTED"));
        assert!(response.get("data").is_none());
    }

    #[tokio::test]
    async fn unknown_method_and_malformed_lines() {
        let plugin = ScriptedPlugin::new();

        let unknown = call(&plugin, json!({"id": 2, "method": "explode"})).await;
        assert_eq!(unknown["id"], json!(2));
        assert_eq!(unknown["error"]["code"], json!(UNKNOWN_METHOD));

        let garbage = handle_line(&plugin, "{not json").await;
        assert!(!garbage.ok);
        assert_eq!(garbage.id, Value::Null);
        assert_eq!(garbage.error.unwrap().code, INVALID_REQUEST);

        let missing_method = call(&plugin, json!({"id": 3})).await;
        assert_eq!(missing_method["id"], json!(3));
        assert_eq!(missing_method["error"]["code"], json!(INVALID_REQUEST));

        let bad_directory = call(
            &plugin,
            json!({"id": 4, "method": "startRecording", "options": {"directory": "MOON"}}),
        )
        .await;
        assert_eq!(bad_directory["error"]["code"], json!(INVALID_REQUEST));
    }

    #[tokio::test]
    async fn serve_answers_each_line_and_stops_on_eof() {
        let plugin = ScriptedPlugin::new();
        let input = concat!(
            "{\"id\":1,\"method\":\"startRecording\"}\n",
            "\n",
            "{\"id\":2,\"method\":\"getCurrentStatus\"}\n",
        );
        let mut output = Vec::new();

        serve(&plugin, input.as_bytes(), &mut output).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["data"], json!({"status": "RECORDING"}));

        // left running at EOF, so it was stopped
        assert_eq!(*plugin.stops.lock().await, 1);
        assert_eq!(*plugin.status.lock().await, RecordingStatus::None);
    }

    #[tokio::test]
    async fn non_utf8_line_is_answered_and_serving_continues() {
        let plugin = ScriptedPlugin::new();
        let mut input = Vec::new();
        input.extend_from_slice(b"{\"id\":1,\"method\":\"startRecording\"}\n");
        input.extend_from_slice(b"\xff\xfe\n");
        input.extend_from_slice(b"{\"id\":3,\"method\":\"getCurrentStatus\"}\n");
        let mut output = Vec::new();

        serve(&plugin, input.as_slice(), &mut output).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1]["id"], Value::Null);
        assert_eq!(lines[1]["error"]["code"], json!(INVALID_REQUEST));
        assert_eq!(lines[2]["data"], json!({"status": "RECORDING"}));
        assert_eq!(*plugin.status.lock().await, RecordingStatus::None);
    }

    #[tokio::test]
    async fn last_line_without_newline_is_served() {
        let plugin = ScriptedPlugin::new();
        let mut output = Vec::new();

        serve(&plugin, &b"{\"id\":9,\"method\":\"getCurrentStatus\"}"[..], &mut output)
            .await
            .unwrap();

        let response: Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(response["id"], json!(9));
    }

    #[tokio::test]
    async fn write_failure_still_stops_recording() {
        struct BrokenPipe;

        impl AsyncWrite for BrokenPipe {
            fn poll_write(
                self: std::pin::Pin<&mut Self>,
                _cx: &mut std::task::Context<'_>,
                _buf: &[u8],
            ) -> std::task::Poll<std::io::Result<usize>> {
                std::task::Poll::Ready(Err(std::io::ErrorKind::BrokenPipe.into()))
            }

            fn poll_flush(
                self: std::pin::Pin<&mut Self>,
                _cx: &mut std::task::Context<'_>,
            ) -> std::task::Poll<std::io::Result<()>> {
                std::task::Poll::Ready(Ok(()))
            }

            fn poll_shutdown(
                self: std::pin::Pin<&mut Self>,
                _cx: &mut std::task::Context<'_>,
            ) -> std::task::Poll<std::io::Result<()>> {
                std::task::Poll::Ready(Ok(()))
            }
        }

        let plugin = ScriptedPlugin::new();
        let input = "{\"id\":1,\"method\":\"startRecording\"}\n";

        let err = serve(&plugin, input.as_bytes(), BrokenPipe).await.unwrap_err();

        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
        assert_eq!(*plugin.stops.lock().await, 1);
        assert_eq!(*plugin.status.lock().await, RecordingStatus::None);
    }
}
