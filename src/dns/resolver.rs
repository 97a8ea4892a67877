//! TXT resolver abstraction and the hickory implementation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::TokioAsyncResolver;

use crate::config::DNS_TIMEOUT_SECS;
use crate::error_handling::ProbeFailure;

/// Resolves TXT records for a fully-qualified name.
///
/// Implementations return the raw answer text or a classified failure. They
/// must not touch shared mutable state so that probes stay independent.
pub trait TxtResolver: Send + Sync {
    /// Looks up TXT records for `name`.
    fn query_txt(&self, name: &str) -> impl Future<Output = Result<String, ProbeFailure>> + Send;
}

impl<T: TxtResolver> TxtResolver for Arc<T> {
    fn query_txt(&self, name: &str) -> impl Future<Output = Result<String, ProbeFailure>> + Send {
        self.as_ref().query_txt(name)
    }
}

impl TxtResolver for TokioAsyncResolver {
    async fn query_txt(&self, name: &str) -> Result<String, ProbeFailure> {
        match self.txt_lookup(name).await {
            Ok(lookup) => {
                let records: Vec<Vec<Vec<u8>>> = lookup
                    .iter()
                    .map(|txt| txt.iter().map(|bytes| bytes.to_vec()).collect())
                    .collect();
                if records.is_empty() {
                    return Err(ProbeFailure::NoRecords);
                }
                Ok(render_txt_answer(&records))
            }
            Err(e) => Err(classify_error(&e)),
        }
    }
}

/// Renders TXT records as `"seg1" "seg2"` lines, one line per record.
pub fn render_txt_answer(records: &[Vec<Vec<u8>>]) -> String {
    records
        .iter()
        .map(|segments| {
            segments
                .iter()
                .map(|bytes| format!("\"{}\"", String::from_utf8_lossy(bytes)))
                .collect::<Vec<String>>()
                .join(" ")
        })
        .collect::<Vec<String>>()
        .join("\n")
}

fn classify_error(e: &ResolveError) -> ProbeFailure {
    match e.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            if *response_code == ResponseCode::NXDomain {
                ProbeFailure::NxDomain
            } else {
                ProbeFailure::NoRecords
            }
        }
        ResolveErrorKind::Timeout => {
            ProbeFailure::Timeout(Duration::from_secs(DNS_TIMEOUT_SECS))
        }
        ResolveErrorKind::Proto(proto) => ProbeFailure::Malformed(proto.to_string()),
        _ => ProbeFailure::Transport(e.to_string()),
    }
}
