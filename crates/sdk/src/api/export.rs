use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::api::file::TotalSizeRequest;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::scope::Scope;

/// Progress callback: percentages in `[0, 100]`, reported monotonically.
pub type ProgressFn = Arc<dyn Fn(f64) + Send + Sync>;

/// Full-account export bundle. Operator-only.
#[derive(Debug, Clone)]
pub struct ExportOps {
    client: ApiClient,
    scope: Scope,
}

#[derive(Clone, Default)]
pub struct ExportParams {
    pub id: String,
    pub progress: Option<ProgressFn>,
    pub cancel: Option<CancellationToken>,
}

impl ExportOps {
    pub(crate) fn new(client: ApiClient, scope: Scope) -> Self {
        Self { client, scope }
    }

    /// Download the export bundle for `id`.
    ///
    /// Requires the admin scope outright; a nonzero scope is rejected no
    /// matter which bits it carries. Progress is reported against the
    /// account's total file size, starting with a single `0` so prior UI
    /// state resets before any forward progress.
    pub async fn export(&self, params: ExportParams) -> Result<Bytes, ApiError> {
        if !self.scope.is_admin() {
            return Err(ApiError::NotAllowed("EXPORT is not allowed.".to_string()));
        }

        let cancel = params.cancel.unwrap_or_default();
        let total = self
            .client
            .call_with_cancel(TotalSizeRequest, &cancel)
            .await?
            .total_size;

        let url = self.client.hosts().api.join(&format!("/export/{}", params.id))?;
        let send = self.client.http_client().post(url).send();
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(ApiError::Canceled),
            response = send => response?,
        };
        if !response.status().is_success() {
            return Err(ApiClient::remote_error(response).await);
        }

        let mut reporter = ProgressReporter::new(params.progress, total);
        reporter.reset();

        let mut body = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Err(ApiError::Canceled),
                chunk = body.next() => match chunk {
                    Some(chunk) => {
                        buffer.extend_from_slice(&chunk?);
                        reporter.advance(buffer.len() as u64);
                    }
                    None => break,
                },
            }
        }

        Ok(Bytes::from(buffer))
    }
}

/// Clamps to `[0, 100]` and never reports a lower value than the last.
struct ProgressReporter {
    callback: Option<ProgressFn>,
    total: u64,
    last: f64,
}

impl ProgressReporter {
    fn new(callback: Option<ProgressFn>, total: u64) -> Self {
        Self {
            callback,
            total,
            last: 0.0,
        }
    }

    fn reset(&mut self) {
        if let Some(callback) = &self.callback {
            callback(0.0);
        }
    }

    fn advance(&mut self, loaded: u64) {
        let Some(callback) = &self.callback else {
            return;
        };
        let percent = if self.total == 0 {
            100.0
        } else {
            (loaded as f64 / self.total as f64 * 100.0).min(100.0)
        };
        if percent > self.last {
            self.last = percent;
            callback(percent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn progress_is_monotonic_and_clamped() {
        let seen: Arc<Mutex<Vec<f64>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: ProgressFn = Arc::new(move |percent| sink.lock().push(percent));

        let mut reporter = ProgressReporter::new(Some(callback), 200);
        reporter.reset();
        reporter.advance(50);
        reporter.advance(40); // regressions are swallowed
        reporter.advance(100);
        reporter.advance(400); // clamped at 100

        let seen = seen.lock();
        assert_eq!(seen[0], 0.0);
        assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(*seen.last().unwrap(), 100.0);
    }

    #[test]
    fn zero_total_reports_full_progress() {
        let seen: Arc<Mutex<Vec<f64>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: ProgressFn = Arc::new(move |percent| sink.lock().push(percent));

        let mut reporter = ProgressReporter::new(Some(callback), 0);
        reporter.reset();
        reporter.advance(1);
        assert_eq!(*seen.lock(), vec![0.0, 100.0]);
    }
}
