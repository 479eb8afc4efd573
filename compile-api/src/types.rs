use serde::{Deserialize, Serialize};
use std::fmt;

/// One compiler as advertised by `GET /api/list.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerDescriptor {
    pub name: String,
    #[serde(rename = "display-name")]
    pub display_name: String,
    pub language: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub templates: Vec<String>,
}

/// Body of `POST /api/compile.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileRequest {
    pub compiler: String,
    pub code: String,
    pub options: String,
    pub stdin: String,
    #[serde(rename = "compiler-option-raw")]
    pub compiler_option_raw: String,
    #[serde(rename = "runtime-option-raw")]
    pub runtime_option_raw: String,
    /// Persist the run remotely so a permalink comes back.
    pub save: bool,
}

impl CompileRequest {
    pub fn new(compiler: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            compiler: compiler.into(),
            code: code.into(),
            options: String::new(),
            stdin: String::new(),
            compiler_option_raw: String::new(),
            runtime_option_raw: String::new(),
            save: true,
        }
    }
}

/// How the remote program ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitStatus {
    Exited(String),
    Signaled(String),
    Unknown,
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Exited(code) => f.write_str(code),
            ExitStatus::Signaled(signal) => f.write_str(signal),
            ExitStatus::Unknown => f.write_str("unknown"),
        }
    }
}

/// Decoded response of `POST /api/compile.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCompileResult")]
pub struct CompileResult {
    pub status: ExitStatus,
    pub program_output: String,
    pub program_error: String,
    pub compiler_error: String,
    pub url: String,
}

/// Wire shape: the service omits empty outputs and reports either `status`
/// (string or number) or `signal`. A present `signal` key wins, even when empty.
#[derive(Debug, Deserialize)]
struct RawCompileResult {
    #[serde(default)]
    status: Option<serde_json::Value>,
    #[serde(default)]
    signal: Option<String>,
    #[serde(default)]
    program_output: String,
    #[serde(default)]
    program_error: String,
    #[serde(default)]
    compiler_error: String,
    #[serde(default)]
    url: String,
}

impl From<RawCompileResult> for CompileResult {
    fn from(raw: RawCompileResult) -> Self {
        let status = match (raw.signal, raw.status) {
            (Some(signal), _) => ExitStatus::Signaled(signal),
            (_, Some(serde_json::Value::String(code))) => ExitStatus::Exited(code),
            (_, Some(serde_json::Value::Number(code))) => ExitStatus::Exited(code.to_string()),
            _ => ExitStatus::Unknown,
        };

        Self {
            status,
            program_output: raw.program_output,
            program_error: raw.program_error,
            compiler_error: raw.compiler_error,
            url: raw.url,
        }
    }
}

/// Response of `GET /api/template/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub code: String,
}
