#![allow(dead_code)]

use async_trait::async_trait;
use relay_core::{build_router, AppState, GatewayConfig, GenerativeProvider, RemoteFile};
use relay_types::{ProviderError, Turn};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// What the stub does when asked to generate.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Reply with the text parts of the last turn joined by newlines.
    Echo,
    /// Fail every generate call.
    FailGenerate,
    /// Fail every upload call.
    FailUpload,
}

#[derive(Debug, Clone)]
pub struct GenerateCall {
    pub model: String,
    pub turns: Vec<Turn>,
}

#[derive(Debug, Clone)]
pub struct UploadCall {
    pub data: Vec<u8>,
    pub media_type: String,
    pub display_name: String,
}

pub struct StubProvider {
    behavior: Behavior,
    generate_calls: Mutex<Vec<GenerateCall>>,
    upload_calls: Mutex<Vec<UploadCall>>,
}

pub const STUB_FILE_URI: &str = "https://files.example/v1beta/files/stub-1";

impl StubProvider {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            generate_calls: Mutex::new(Vec::new()),
            upload_calls: Mutex::new(Vec::new()),
        })
    }

    pub fn generate_calls(&self) -> Vec<GenerateCall> {
        self.generate_calls.lock().unwrap().clone()
    }

    pub fn upload_calls(&self) -> Vec<UploadCall> {
        self.upload_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeProvider for StubProvider {
    async fn generate(&self, model: &str, turns: &[Turn]) -> Result<String, ProviderError> {
        self.generate_calls
            .lock()
            .unwrap()
            .push(GenerateCall { model: model.to_string(), turns: turns.to_vec() });

        if self.behavior == Behavior::FailGenerate {
            return Err(ProviderError::Upstream {
                status: 503,
                message: "Upstream server error (HTTP 503)".to_string(),
            });
        }

        let text = turns
            .last()
            .map(|turn| turn.parts.iter().filter_map(|p| p.as_text()).collect::<Vec<_>>().join("\n"))
            .unwrap_or_default();
        Ok(text)
    }

    async fn upload_file(
        &self,
        data: Vec<u8>,
        media_type: &str,
        display_name: &str,
    ) -> Result<RemoteFile, ProviderError> {
        self.upload_calls.lock().unwrap().push(UploadCall {
            data,
            media_type: media_type.to_string(),
            display_name: display_name.to_string(),
        });

        if self.behavior == Behavior::FailUpload {
            return Err(ProviderError::Network { message: "connection reset".to_string() });
        }

        Ok(RemoteFile {
            name: "files/stub-1".to_string(),
            uri: STUB_FILE_URI.to_string(),
            media_type: media_type.to_string(),
        })
    }
}

pub struct TestGateway {
    pub server: axum_test::TestServer,
    pub provider: Arc<StubProvider>,
    pub staging: tempfile::TempDir,
}

impl TestGateway {
    pub fn new(behavior: Behavior) -> Self {
        Self::with_config(behavior, |_| {})
    }

    pub fn with_config(behavior: Behavior, tweak: impl FnOnce(&mut GatewayConfig)) -> Self {
        let staging = tempfile::tempdir().unwrap();
        let mut config =
            GatewayConfig { staging_dir: staging.path().to_path_buf(), ..GatewayConfig::default() };
        tweak(&mut config);

        let provider = StubProvider::new(behavior);
        let state = AppState::new(provider.clone(), &config);
        let app = build_router(state, &config);

        Self { server: axum_test::TestServer::new(app).unwrap(), provider, staging }
    }

    /// Number of files left in the staging directory.
    pub fn staged_files(&self) -> usize {
        count_files(self.staging.path())
    }
}

pub fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}
