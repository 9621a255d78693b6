//! Job orchestrator
//!
//! Drives one job through submit, poll and fetch, then downloads and stores
//! its primary artifact. Each call handles exactly one job and keeps no state
//! between calls, so independent jobs can run on separate tasks against the
//! same orchestrator.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tasklane_client::TaskClient;
use tasklane_core::domain::artifact::{DownloadedArtifact, JobResult};
use tasklane_core::domain::job::JobHandle;
use tasklane_core::domain::request::JobRequest;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{JobError, Phase, Result};
use crate::repository::{ArtifactRepository, JobRepository};
use crate::scheduler::policy::PollPolicy;
use crate::scheduler::state::{PollDecision, PollTracker};
use crate::service::{
    ArtifactStore, FsArtifactStore, FsInputReader, InputReader, PayloadBuilder, ResponseMode,
};

/// Outcome of submit/poll/fetch for one job
#[derive(Debug, Clone)]
pub struct JobReport {
    /// `None` when the backend answered the submission with the result
    pub handle: Option<JobHandle>,
    pub result: JobResult,
    /// Number of status polls performed
    pub polls: u32,
    pub submitted_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// A finished job with its primary artifact stored locally
#[derive(Debug, Clone)]
pub struct CompletedJob {
    pub report: JobReport,
    pub artifact: DownloadedArtifact,
}

/// Runs jobs through the full remote lifecycle
pub struct JobOrchestrator {
    jobs: Arc<dyn JobRepository>,
    artifacts: Arc<dyn ArtifactRepository>,
    inputs: Arc<dyn InputReader>,
    store: Arc<dyn ArtifactStore>,
    policy: PollPolicy,
}

impl JobOrchestrator {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        artifacts: Arc<dyn ArtifactRepository>,
        inputs: Arc<dyn InputReader>,
        store: Arc<dyn ArtifactStore>,
        policy: PollPolicy,
    ) -> Self {
        Self {
            jobs,
            artifacts,
            inputs,
            store,
            policy,
        }
    }

    /// Creates an orchestrator backed by HTTP and the local filesystem
    pub fn with_client(client: TaskClient, config: &Config) -> Self {
        let client = Arc::new(client);
        Self::new(
            client.clone(),
            client,
            Arc::new(FsInputReader::new()),
            Arc::new(FsArtifactStore::new(config.storage_dir.clone())),
            config.poll_policy,
        )
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Runs a job to completion and stores its primary artifact
    ///
    /// # Arguments
    /// * `payload` - Strategy that builds the submission
    /// * `destination` - Output path; `None` stores under a generated name
    pub async fn run(
        &self,
        payload: &dyn PayloadBuilder,
        destination: Option<&Path>,
    ) -> Result<CompletedJob> {
        let report = self.execute(payload).await?;
        let artifact = self.materialize(&report, destination).await?;

        Ok(CompletedJob { report, artifact })
    }

    /// Submits, polls and fetches without downloading anything
    pub async fn execute(&self, payload: &dyn PayloadBuilder) -> Result<JobReport> {
        let request = payload.build(self.inputs.as_ref())?;

        info!("Submitting {} job: {}", payload.name(), request.summary());
        self.execute_request(&request, payload.response_mode()).await
    }

    /// Submits an already-built request and drives it to a result
    pub async fn execute_request(
        &self,
        request: &JobRequest,
        mode: ResponseMode,
    ) -> Result<JobReport> {
        let submitted_at = Utc::now();

        if mode == ResponseMode::Immediate {
            let result = self
                .jobs
                .submit_immediate(request)
                .await
                .map_err(|e| JobError::from_client(Phase::Submit, None, e))?;

            info!(
                "Job answered immediately with {} artifact(s)",
                result.artifacts().len()
            );
            return Ok(JobReport {
                handle: None,
                result,
                polls: 0,
                submitted_at,
                completed_at: Utc::now(),
            });
        }

        let handle = self
            .jobs
            .submit(request)
            .await
            .map_err(|e| JobError::from_client(Phase::Submit, None, e))?;
        info!("Job submitted. Request ID: {}", handle);

        let polls = self.wait_for_completion(&handle).await?;

        let result = self
            .jobs
            .fetch_result(&handle)
            .await
            .map_err(|e| JobError::from_client(Phase::Fetch, Some(&handle), e))?;
        info!(
            "Job {} produced {} artifact(s)",
            handle,
            result.artifacts().len()
        );

        Ok(JobReport {
            handle: Some(handle),
            result,
            polls,
            submitted_at,
            completed_at: Utc::now(),
        })
    }

    /// Polls until the job completes; returns the number of polls made
    async fn wait_for_completion(&self, handle: &JobHandle) -> Result<u32> {
        let mut tracker = PollTracker::new(self.policy.max_attempts);

        loop {
            let status = self
                .jobs
                .poll_status(handle)
                .await
                .map_err(|e| JobError::from_client(Phase::Poll, Some(handle), e))?;

            match tracker.observe(&status) {
                PollDecision::Continue => {
                    let delay = self.policy.delay_after(tracker.attempts());
                    debug!(
                        "Job {} status: {}, waiting {:?} ({}/{})",
                        handle,
                        status,
                        delay,
                        tracker.attempts(),
                        tracker.max_attempts()
                    );
                    tokio::time::sleep(delay).await;
                }
                PollDecision::Completed => {
                    info!(
                        "Job {} completed after {} poll(s)",
                        handle,
                        tracker.attempts()
                    );
                    return Ok(tracker.attempts());
                }
                PollDecision::Failed => {
                    warn!("Job {} reported FAILED", handle);
                    return Err(JobError::JobFailed {
                        handle: handle.clone(),
                    });
                }
                PollDecision::Unrecognized(raw) => {
                    warn!("Job {} reported unknown status {:?}", handle, raw);
                    return Err(JobError::protocol(
                        Phase::Poll,
                        Some(handle),
                        format!("Unknown task status: {}", raw),
                    ));
                }
                PollDecision::Exhausted => {
                    warn!(
                        "Job {} still running after {} polls, giving up",
                        handle,
                        tracker.attempts()
                    );
                    return Err(JobError::TimedOut {
                        handle: handle.clone(),
                        attempts: tracker.attempts(),
                        budget: self.policy.budget(),
                    });
                }
            }
        }
    }

    /// Downloads the primary artifact and hands it to the store
    async fn materialize(
        &self,
        report: &JobReport,
        destination: Option<&Path>,
    ) -> Result<DownloadedArtifact> {
        let url = report.result.primary().url();

        let bytes = self
            .artifacts
            .download(url)
            .await
            .map_err(|e| JobError::from_client(Phase::Download, report.handle.as_ref(), e))?;

        let path = self.store.persist(&bytes, destination, url)?;
        info!("Saved artifact {} to {}", url, path.display());

        Ok(DownloadedArtifact {
            path,
            source_url: url.to_string(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tasklane_client::ClientError;
    use tasklane_core::domain::artifact::ArtifactLocator;
    use tasklane_core::domain::job::{JobRoutes, JobStatus};

    use crate::service::{ProcessPayload, UpscalePayload};

    // =========================================================================
    // Fakes
    // =========================================================================

    #[derive(Default)]
    struct FakeBackend {
        statuses: Mutex<VecDeque<std::result::Result<JobStatus, ClientError>>>,
        submit_error: Mutex<Option<ClientError>>,
        fetch_error: Mutex<Option<ClientError>>,
        submits: AtomicU32,
        polls: AtomicU32,
        fetches: AtomicU32,
    }

    impl FakeBackend {
        fn with_statuses(statuses: Vec<JobStatus>) -> Self {
            let backend = Self::default();
            *backend.statuses.lock().unwrap() = statuses.into_iter().map(Ok).collect();
            backend
        }

        fn result() -> JobResult {
            JobResult::new(vec![
                ArtifactLocator::Record {
                    url: "http://cdn/out.png".to_string(),
                    content_type: Some("image/png".to_string()),
                    file_name: None,
                },
                ArtifactLocator::Url("http://cdn/extra.png".to_string()),
            ])
            .unwrap()
        }
    }

    #[async_trait]
    impl JobRepository for FakeBackend {
        async fn submit(&self, _request: &JobRequest) -> tasklane_client::Result<JobHandle> {
            self.submits.fetch_add(1, Ordering::SeqCst);
            match self.submit_error.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(JobHandle::new("abc123")),
            }
        }

        async fn submit_immediate(
            &self,
            _request: &JobRequest,
        ) -> tasklane_client::Result<JobResult> {
            self.submits.fetch_add(1, Ordering::SeqCst);
            Ok(Self::result())
        }

        async fn poll_status(&self, handle: &JobHandle) -> tasklane_client::Result<JobStatus> {
            assert_eq!(handle.as_str(), "abc123");
            self.polls.fetch_add(1, Ordering::SeqCst);
            self.statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(JobStatus::InProgress))
        }

        async fn fetch_result(&self, _handle: &JobHandle) -> tasklane_client::Result<JobResult> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match self.fetch_error.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(Self::result()),
            }
        }
    }

    struct FakeArtifacts {
        bodies: HashMap<String, Vec<u8>>,
        downloads: AtomicU32,
    }

    #[async_trait]
    impl ArtifactRepository for FakeArtifacts {
        async fn download(&self, url: &str) -> tasklane_client::Result<Vec<u8>> {
            self.downloads.fetch_add(1, Ordering::SeqCst);
            self.bodies
                .get(url)
                .cloned()
                .ok_or_else(|| ClientError::api_error(404, "not found"))
        }
    }

    struct MemoryInputs;

    impl InputReader for MemoryInputs {
        fn read(&self, path: &Path) -> Result<Vec<u8>> {
            if path == Path::new("/in/cat.png") {
                Ok(b"CAT".to_vec())
            } else {
                Err(JobError::input(format!("File not found: {}", path.display())))
            }
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        written: Mutex<Vec<(PathBuf, Vec<u8>)>>,
    }

    impl ArtifactStore for MemoryStore {
        fn persist(
            &self,
            bytes: &[u8],
            destination: Option<&Path>,
            _source_url: &str,
        ) -> Result<PathBuf> {
            let path = destination
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("/storage/generated.png"));
            self.written
                .lock()
                .unwrap()
                .push((path.clone(), bytes.to_vec()));
            Ok(path)
        }
    }

    struct Harness {
        backend: Arc<FakeBackend>,
        artifacts: Arc<FakeArtifacts>,
        store: Arc<MemoryStore>,
        orchestrator: JobOrchestrator,
    }

    fn harness(backend: FakeBackend) -> Harness {
        let backend = Arc::new(backend);
        let artifacts = Arc::new(FakeArtifacts {
            bodies: HashMap::from([("http://cdn/out.png".to_string(), b"OUTPUT".to_vec())]),
            downloads: AtomicU32::new(0),
        });
        let store = Arc::new(MemoryStore::default());
        let orchestrator = JobOrchestrator::new(
            backend.clone(),
            artifacts.clone(),
            Arc::new(MemoryInputs),
            store.clone(),
            PollPolicy::new(Duration::from_millis(1), 60),
        );

        Harness {
            backend,
            artifacts,
            store,
            orchestrator,
        }
    }

    fn payload() -> ProcessPayload {
        ProcessPayload::new("/in/cat.png", "add a hat")
    }

    fn transient_then_completed(n: usize) -> Vec<JobStatus> {
        let mut statuses: Vec<JobStatus> = (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    JobStatus::Pending
                } else {
                    JobStatus::InProgress
                }
            })
            .collect();
        statuses.push(JobStatus::Completed);
        statuses
    }

    // =========================================================================
    // Polling loop
    // =========================================================================

    #[tokio::test]
    async fn test_polls_n_plus_one_times_below_budget() {
        for n in [0usize, 1, 2, 30, 59] {
            let h = harness(FakeBackend::with_statuses(transient_then_completed(n)));

            let report = h.orchestrator.execute(&payload()).await.unwrap();

            assert_eq!(report.polls, n as u32 + 1, "n = {}", n);
            assert_eq!(h.backend.polls.load(Ordering::SeqCst), n as u32 + 1);
            assert_eq!(h.backend.fetches.load(Ordering::SeqCst), 1);
            assert_eq!(report.handle, Some(JobHandle::new("abc123")));
            assert_eq!(report.result.primary().url(), "http://cdn/out.png");
        }
    }

    #[tokio::test]
    async fn test_times_out_after_exactly_max_attempts() {
        for n in [60usize, 61, 90] {
            let h = harness(FakeBackend::with_statuses(transient_then_completed(n)));

            let err = h.orchestrator.execute(&payload()).await.unwrap_err();

            assert_eq!(err.kind(), ErrorKind::Timeout, "n = {}", n);
            assert_eq!(h.backend.polls.load(Ordering::SeqCst), 60);
            assert_eq!(h.backend.fetches.load(Ordering::SeqCst), 0);
            match err {
                JobError::TimedOut {
                    handle, attempts, ..
                } => {
                    assert_eq!(handle.as_str(), "abc123");
                    assert_eq!(attempts, 60);
                }
                other => panic!("expected timeout, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_failed_status_terminates_immediately() {
        let h = harness(FakeBackend::with_statuses(vec![
            JobStatus::Pending,
            JobStatus::InProgress,
            JobStatus::Failed,
            JobStatus::Completed,
        ]));

        let err = h.orchestrator.execute(&payload()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::JobFailure);
        assert_eq!(err.handle(), Some(&JobHandle::new("abc123")));
        assert_eq!(h.backend.polls.load(Ordering::SeqCst), 3);
        assert_eq!(h.backend.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_status_is_protocol_error() {
        let h = harness(FakeBackend::with_statuses(vec![
            JobStatus::Pending,
            JobStatus::Unknown("CANCELLED".to_string()),
        ]));

        let err = h.orchestrator.execute(&payload()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert_eq!(err.phase(), Phase::Poll);
        assert!(err.to_string().contains("Unknown task status: CANCELLED"));
        assert_eq!(h.backend.polls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_poll_transport_error_is_not_retried() {
        let backend = FakeBackend::default();
        backend.statuses.lock().unwrap().extend([
            Ok(JobStatus::Pending),
            Err(ClientError::api_error(503, "unavailable")),
            Ok(JobStatus::Completed),
        ]);
        let h = harness(backend);

        let err = h.orchestrator.execute(&payload()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.phase(), Phase::Poll);
        assert_eq!(h.backend.polls.load(Ordering::SeqCst), 2);
    }

    // =========================================================================
    // Submit / fetch / input
    // =========================================================================

    #[tokio::test]
    async fn test_submit_failure_propagates_without_polling() {
        let backend = FakeBackend::default();
        *backend.submit_error.lock().unwrap() = Some(ClientError::api_error(401, "bad token"));
        let h = harness(backend);

        let err = h.orchestrator.execute(&payload()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.phase(), Phase::Submit);
        assert!(err.handle().is_none());
        assert_eq!(h.backend.submits.load(Ordering::SeqCst), 1);
        assert_eq!(h.backend.polls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_input_fails_before_submit() {
        let h = harness(FakeBackend::with_statuses(vec![JobStatus::Completed]));

        let err = h
            .orchestrator
            .run(&ProcessPayload::new("/in/missing.png", "x"), None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Input);
        assert_eq!(h.backend.submits.load(Ordering::SeqCst), 0);
        assert_eq!(h.backend.polls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_protocol_error_carries_handle() {
        let backend = FakeBackend::with_statuses(vec![JobStatus::Completed]);
        *backend.fetch_error.lock().unwrap() =
            Some(ClientError::ParseError("No images found in result".to_string()));
        let h = harness(backend);

        let err = h.orchestrator.execute(&payload()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert_eq!(err.phase(), Phase::Fetch);
        assert_eq!(err.handle(), Some(&JobHandle::new("abc123")));
    }

    #[tokio::test]
    async fn test_immediate_mode_skips_polling() {
        struct ImmediatePayload;

        impl PayloadBuilder for ImmediatePayload {
            fn name(&self) -> &str {
                "immediate"
            }

            fn routes(&self) -> JobRoutes {
                JobRoutes::default()
            }

            fn response_mode(&self) -> ResponseMode {
                ResponseMode::Immediate
            }

            fn build(&self, _inputs: &dyn InputReader) -> Result<JobRequest> {
                Ok(JobRequest::json(serde_json::json!({})))
            }
        }

        let h = harness(FakeBackend::default());
        let completed = h.orchestrator.run(&ImmediatePayload, None).await.unwrap();

        assert!(completed.report.handle.is_none());
        assert_eq!(completed.report.polls, 0);
        assert_eq!(h.backend.polls.load(Ordering::SeqCst), 0);
        assert_eq!(h.backend.fetches.load(Ordering::SeqCst), 0);
        assert_eq!(completed.artifact.bytes, b"OUTPUT");
    }

    // =========================================================================
    // Materialization
    // =========================================================================

    #[tokio::test]
    async fn test_run_downloads_primary_artifact_only() {
        let h = harness(FakeBackend::with_statuses(vec![
            JobStatus::InProgress,
            JobStatus::InProgress,
            JobStatus::Completed,
        ]));
        let destination = PathBuf::from("/out/result.png");

        let completed = h
            .orchestrator
            .run(&payload(), Some(&destination))
            .await
            .unwrap();

        assert_eq!(completed.artifact.path, destination);
        assert_eq!(completed.artifact.source_url, "http://cdn/out.png");
        assert_eq!(completed.artifact.bytes, b"OUTPUT");
        assert_eq!(completed.report.result.artifacts().len(), 2);
        assert_eq!(completed.report.polls, 3);
        assert!(completed.report.completed_at >= completed.report.submitted_at);
        assert_eq!(h.artifacts.downloads.load(Ordering::SeqCst), 1);

        let written = h.store.written.lock().unwrap();
        assert_eq!(written.as_slice(), &[(destination, b"OUTPUT".to_vec())]);
    }

    #[tokio::test]
    async fn test_download_failure_is_transport_error() {
        let h = harness(FakeBackend::with_statuses(vec![JobStatus::Completed]));
        let orchestrator = JobOrchestrator::new(
            h.backend.clone(),
            Arc::new(FakeArtifacts {
                bodies: HashMap::new(),
                downloads: AtomicU32::new(0),
            }),
            Arc::new(MemoryInputs),
            h.store.clone(),
            PollPolicy::new(Duration::from_millis(1), 60),
        );

        let err = orchestrator.run(&payload(), None).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.phase(), Phase::Download);
        assert!(h.store.written.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_execute_does_not_download() {
        let h = harness(FakeBackend::with_statuses(vec![JobStatus::Completed]));

        let report = h
            .orchestrator
            .execute(&UpscalePayload::new("http://cdn/in.png"))
            .await
            .unwrap();

        assert_eq!(report.polls, 1);
        assert_eq!(h.artifacts.downloads.load(Ordering::SeqCst), 0);
    }
}
