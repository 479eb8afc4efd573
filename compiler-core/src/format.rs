use compile_api::CompileRequest;
use regex::Regex;
use std::sync::LazyLock;

use crate::error::Error;

/// Opening fence, optional highlight tag on the same line, newline, a body
/// without backticks, closing fence.
static CODE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(.*)\n([^`]*)```").expect("valid code block pattern"));

/// Pull the code out of the first fenced block in a message.
///
/// The highlight-tag line is never part of the code, and a single trailing
/// line break before the closing fence is dropped.
pub fn extract_code(message: &str) -> Result<String, Error> {
    let captures = CODE_BLOCK_RE.captures(message).ok_or_else(|| {
        Error::MalformedInput("message does not contain a fenced code block".to_string())
    })?;

    let body = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
    let body = body
        .strip_suffix("\r\n")
        .or_else(|| body.strip_suffix('\n'))
        .unwrap_or(body);

    Ok(body.to_string())
}

/// Request body for running `code` on `compiler_name`, saved remotely so the
/// result gets a permalink.
pub fn build_compile_request(compiler_name: &str, code: &str) -> CompileRequest {
    CompileRequest::new(compiler_name, code)
}
