//! JSON request/response contract for driving a resolver from another
//! process, one message per line.
//!
//! ```text
//! {"type":"CHECK_URL","url":"https://www.nytimes.com/a"}   -> {"biasData":{...}}
//! {"type":"CHECK_SOURCE","source":"via Reuters"}           -> {"biasData":{...}}
//! {"type":"GET_ALTERNATIVES","excludeBias":"center"}      -> {"alternatives":[...]}
//! {"type":"PING"}                                          -> {"status":"PONG"}
//! ```

use bias_common::types::{BiasCategory, BiasRecord};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::resolver::BiasResolver;

pub const PONG: &str = "PONG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    CheckUrl {
        url: String,
    },
    CheckSource {
        source: String,
    },
    GetAlternatives {
        #[serde(rename = "excludeBias", default)]
        exclude_bias: BiasCategory,
    },
    Ping,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    BiasData {
        #[serde(rename = "biasData")]
        bias_data: BiasRecord,
    },
    Alternatives {
        alternatives: Vec<BiasRecord>,
    },
    Status {
        status: String,
    },
    Error {
        error: String,
    },
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            error: message.into(),
        }
    }
}

pub async fn handle(resolver: &mut BiasResolver, request: Request) -> Response {
    match request {
        Request::CheckUrl { url } => Response::BiasData {
            bias_data: resolver.resolve_by_url(&url).await,
        },
        Request::CheckSource { source } => Response::BiasData {
            bias_data: resolver.resolve_by_text(&source).await,
        },
        Request::GetAlternatives { exclude_bias } => Response::Alternatives {
            alternatives: resolver.alternatives(exclude_bias).await,
        },
        Request::Ping => Response::Status {
            status: PONG.to_string(),
        },
    }
}

/// Handle one JSON line. Malformed input becomes an error response.
pub async fn handle_json(resolver: &mut BiasResolver, line: &str) -> String {
    let response = match serde_json::from_str::<Request>(line) {
        Ok(request) => handle(resolver, request).await,
        Err(e) => {
            debug!(error = %e, "malformed request");
            Response::error(format!("malformed request: {}", e))
        }
    };
    serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"error":"could not encode response"}"#.to_string())
}

/// Answer newline-delimited requests from `reader` until end of input, one
/// response line per non-blank request line. Bytes that are not UTF-8 are
/// replaced rather than ending the session.
pub async fn serve<R, W>(resolver: &mut BiasResolver, mut reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut answered = 0usize;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = handle_json(resolver, line).await;
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        answered += 1;
    }
    debug!(answered, "request stream closed");
    Ok(())
}
