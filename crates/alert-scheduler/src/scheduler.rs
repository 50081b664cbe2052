//! The pacing scheduler.
//!
//! A [`Scheduler`] runs exactly one job and is consumed by doing so. Each
//! job is a single sequential loop: generate an alert, publish it, record
//! metrics, report progress, then check the deadline, size and cancellation
//! before the next one.

use crate::classify::{classify_publish_error, Disposition};
use crate::error::JobError;
use crate::metrics::{MetricsRecorder, NoopMetrics};
use crate::mode::{JobMode, Pacing};
use crate::progress::{ProgressFn, ProgressObserver};
use crate::report::{achieved_rate, JobReport, ReportingConfig};
use alert_generator::AlertSampler;
use alert_publisher::{PublishError, Publisher};
use alert_types::Alert;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Which alert opens the load loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lead {
    /// Every alert is sampled
    Sampled,
    /// Alert 0 is the canonical test alert
    TestAlert,
}

/// Why a single publish did not succeed.
enum Stop {
    Cancelled,
    Failed(PublishError),
}

/// Drives an [`AlertSampler`] and a [`Publisher`] through one job.
pub struct Scheduler {
    sampler: AlertSampler,
    publisher: Arc<dyn Publisher>,
    metrics: Arc<dyn MetricsRecorder>,
    progress: ProgressObserver,
    reporting: ReportingConfig,
}

impl Scheduler {
    /// Create a scheduler with no-op metrics and no progress callback.
    pub fn new(sampler: AlertSampler, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            sampler,
            publisher,
            metrics: Arc::new(NoopMetrics),
            progress: ProgressObserver::default(),
            reporting: ReportingConfig::default(),
        }
    }

    /// Record metrics through `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Invoke `callback` with the cumulative count after every successful publish.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        self.progress = ProgressObserver::new(Box::new(callback) as ProgressFn);
        self
    }

    /// Override the periodic log intervals.
    pub fn with_reporting(mut self, reporting: ReportingConfig) -> Self {
        self.reporting = reporting;
        self
    }

    /// Run the job described by `mode`.
    pub async fn run(
        self,
        mode: JobMode,
        cancel: CancellationToken,
    ) -> Result<JobReport, JobError> {
        info!(mode = mode.name(), seed = self.sampler.seed(), "Starting job");
        match mode {
            JobMode::Load(pacing) => self.run_paced(pacing, Lead::Sampled, &cancel).await,
            JobMode::Test(pacing) => self.run_paced(pacing, Lead::TestAlert, &cancel).await,
            JobMode::Process(pacing) => self.process(pacing, cancel).await,
            JobMode::Single(alert) => self.send_single(alert, cancel).await,
        }
    }

    /// Publish exactly `count` sampled alerts without pacing.
    pub async fn run_burst(
        self,
        count: u64,
        cancel: CancellationToken,
    ) -> Result<JobReport, JobError> {
        self.run_paced(Pacing::Burst { count }, Lead::Sampled, &cancel)
            .await
    }

    /// Publish sampled alerts at `rate` per second until `duration` elapses.
    pub async fn run_continuous(
        self,
        rate: f64,
        duration: Duration,
        cancel: CancellationToken,
    ) -> Result<JobReport, JobError> {
        self.run_paced(Pacing::Continuous { rate, duration }, Lead::Sampled, &cancel)
            .await
    }

    /// Like [`Scheduler::run_burst`] / [`Scheduler::run_continuous`], but the
    /// first alert is always the canonical test alert.
    pub async fn run_test(
        self,
        pacing: Pacing,
        cancel: CancellationToken,
    ) -> Result<JobReport, JobError> {
        self.run_paced(pacing, Lead::TestAlert, &cancel).await
    }

    /// Publish the boilerplate canary, then run `pacing` with sampled alerts.
    ///
    /// A boilerplate failure aborts the job before any load is generated.
    /// The boilerplate alert is recorded in metrics but not counted in
    /// [`JobReport::sent`] and not reported to the progress callback.
    pub async fn process(
        mut self,
        pacing: Pacing,
        cancel: CancellationToken,
    ) -> Result<JobReport, JobError> {
        let start = Instant::now();
        let alert = Alert::boilerplate();

        if cancel.is_cancelled() {
            warn!("Job cancelled before boilerplate alert was sent");
            return Ok(JobReport::cancelled(0, start.elapsed()));
        }

        info!(alert_id = %alert.id, "Publishing boilerplate alert");
        match self.publish_one(&alert, &cancel).await {
            Ok(()) => {
                info!(
                    alert_id = %alert.id,
                    severity = %alert.severity,
                    source = %alert.source,
                    name = %alert.name,
                    "Boilerplate alert published"
                );
            }
            Err(Stop::Cancelled) => {
                warn!("Job cancelled while publishing boilerplate alert");
                return Ok(JobReport::cancelled(0, start.elapsed()));
            }
            Err(Stop::Failed(source)) => {
                error!(alert_id = %alert.id, error = %source, "Boilerplate alert failed; aborting job");
                return Err(JobError::Boilerplate {
                    alert_id: alert.id,
                    source,
                });
            }
        }

        self.run_paced_inner(pacing, Lead::Sampled, &cancel).await
    }

    /// Publish one caller-specified alert.
    pub async fn send_single(
        self,
        alert: Alert,
        cancel: CancellationToken,
    ) -> Result<JobReport, JobError> {
        let start = Instant::now();

        if cancel.is_cancelled() {
            warn!("Job cancelled before alert was sent");
            return Ok(JobReport::cancelled(0, start.elapsed()));
        }

        match self.publish_one(&alert, &cancel).await {
            Ok(()) => {
                self.progress.notify(1);
                log_first_alert(&alert);
                Ok(JobReport::completed(1, start.elapsed()))
            }
            Err(Stop::Cancelled) => {
                warn!(alert_id = %alert.id, "Job cancelled while publishing alert");
                Ok(JobReport::cancelled(0, start.elapsed()))
            }
            Err(Stop::Failed(source)) => Err(self.publish_failure(&alert, 0, source)),
        }
    }

    async fn run_paced(
        mut self,
        pacing: Pacing,
        lead: Lead,
        cancel: &CancellationToken,
    ) -> Result<JobReport, JobError> {
        self.run_paced_inner(pacing, lead, cancel).await
    }

    async fn run_paced_inner(
        &mut self,
        pacing: Pacing,
        lead: Lead,
        cancel: &CancellationToken,
    ) -> Result<JobReport, JobError> {
        match pacing {
            Pacing::Burst { count } => self.burst_loop(count, lead, cancel).await,
            Pacing::Continuous { rate, duration } => {
                self.continuous_loop(rate, duration, lead, cancel).await
            }
        }
    }

    async fn burst_loop(
        &mut self,
        count: u64,
        lead: Lead,
        cancel: &CancellationToken,
    ) -> Result<JobReport, JobError> {
        let start = Instant::now();
        let mut sent: u64 = 0;

        info!(count, "Starting burst");

        for index in 0..count {
            if cancel.is_cancelled() {
                let elapsed = start.elapsed();
                warn!(sent, requested = count, "Burst cancelled");
                return Ok(JobReport::cancelled(sent, elapsed));
            }

            let alert = self.next_alert(index, lead);
            match self.publish_one(&alert, cancel).await {
                Ok(()) => {}
                Err(Stop::Cancelled) => {
                    warn!(sent, requested = count, "Burst cancelled during publish");
                    return Ok(JobReport::cancelled(sent, start.elapsed()));
                }
                Err(Stop::Failed(source)) => {
                    return Err(self.publish_failure(&alert, index, source));
                }
            }

            sent += 1;
            self.progress.notify(sent);

            if sent == 1 {
                log_first_alert(&alert);
            }

            let every = self.reporting.burst_log_every;
            if every > 0 && sent % every == 0 {
                let elapsed = start.elapsed();
                info!(
                    sent,
                    requested = count,
                    rate = %format!("{:.2}", achieved_rate(sent, elapsed)),
                    "Burst progress"
                );
            }
        }

        let elapsed = start.elapsed();
        let report = JobReport::completed(sent, elapsed);
        info!(
            "Burst complete: {} alerts in {:?} ({:.2} alerts/sec)",
            sent,
            elapsed,
            report.rate()
        );
        Ok(report)
    }

    async fn continuous_loop(
        &mut self,
        rate: f64,
        duration: Duration,
        lead: Lead,
        cancel: &CancellationToken,
    ) -> Result<JobReport, JobError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(JobError::InvalidRate(rate));
        }

        let tick_every = Duration::try_from_secs_f64(1.0 / rate)
            .map_err(|_| JobError::InvalidRate(rate))?
            .max(Duration::from_nanos(1));
        let start = Instant::now();
        // A duration past the clock's range never expires
        let deadline = start.checked_add(duration);
        let mut last_log = start;
        let mut sent: u64 = 0;

        let mut ticker = interval(tick_every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            rate,
            ?duration,
            ?tick_every,
            "Starting continuous generation"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!(sent, "Continuous generation cancelled");
                    return Ok(JobReport::cancelled(sent, start.elapsed()).with_target_rate(rate));
                }
                _ = ticker.tick() => {}
            }

            let now = Instant::now();
            if deadline.is_some_and(|deadline| now > deadline) {
                break;
            }

            let alert = self.next_alert(sent, lead);
            match self.publish_one(&alert, cancel).await {
                Ok(()) => {}
                Err(Stop::Cancelled) => {
                    warn!(sent, "Continuous generation cancelled during publish");
                    return Ok(JobReport::cancelled(sent, start.elapsed()).with_target_rate(rate));
                }
                Err(Stop::Failed(source)) => {
                    return Err(self.publish_failure(&alert, sent, source));
                }
            }

            sent += 1;
            self.progress.notify(sent);

            if sent == 1 {
                log_first_alert(&alert);
            }

            if now.duration_since(last_log) >= self.reporting.continuous_log_every {
                let elapsed = now.duration_since(start);
                info!(
                    sent,
                    target_rate = rate,
                    actual_rate = %format!("{:.2}", achieved_rate(sent, elapsed)),
                    "Continuous progress"
                );
                last_log = now;
            }
        }

        let elapsed = start.elapsed();
        let report = JobReport::completed(sent, elapsed).with_target_rate(rate);
        info!(
            "Continuous generation complete: {} alerts in {:?} ({:.2} alerts/sec, target {:.2})",
            sent,
            elapsed,
            report.rate(),
            rate
        );
        Ok(report)
    }

    fn next_alert(&mut self, index: u64, lead: Lead) -> Alert {
        if index == 0 && lead == Lead::TestAlert {
            let alert = Alert::test();
            info!(alert_id = %alert.id, "Sending canonical test alert");
            alert
        } else {
            self.sampler.next_alert()
        }
    }

    /// Publish one alert, racing the call against cancellation.
    async fn publish_one(&self, alert: &Alert, cancel: &CancellationToken) -> Result<(), Stop> {
        let started = Instant::now();

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PublishError::Cancelled),
            result = self.publisher.publish(alert) => result,
        };

        match result {
            Ok(()) => {
                self.metrics.record_published();
                self.metrics.record_processed(started.elapsed());
                debug!(alert_id = %alert.id, "Alert published");
                Ok(())
            }
            Err(err) => match classify_publish_error(err, cancel) {
                Disposition::Cancelled => Err(Stop::Cancelled),
                Disposition::Failed(err) => {
                    self.metrics.record_error();
                    Err(Stop::Failed(err))
                }
            },
        }
    }

    fn publish_failure(&self, alert: &Alert, index: u64, source: PublishError) -> JobError {
        error!(
            index,
            alert_id = %alert.id,
            severity = %alert.severity,
            source = %alert.source,
            name = %alert.name,
            error = %source,
            "Failed to publish alert; aborting job"
        );
        JobError::Publish {
            index,
            alert_id: alert.id,
            source,
        }
    }
}

/// Full field dump of the first alert of a job, used for smoke checks.
fn log_first_alert(alert: &Alert) {
    info!(
        alert_id = %alert.id,
        schema_version = alert.schema_version,
        event_timestamp = alert.event_timestamp,
        severity = %alert.severity,
        source = %alert.source,
        name = %alert.name,
        context = ?alert.context,
        "First alert sent"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::CounterMetrics;
    use alert_generator::SamplerConfig;
    use alert_publisher::{MemoryPublisher, ScriptedFailure};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;
    use tokio_test::assert_ok;

    fn single_valued_sampler() -> AlertSampler {
        AlertSampler::new(&SamplerConfig::new("HIGH:100", "api:100", "error:100").with_seed(42))
            .unwrap()
    }

    fn mixed_sampler(seed: u64) -> AlertSampler {
        AlertSampler::new(
            &SamplerConfig::new(
                "HIGH:20,MEDIUM:30,LOW:50",
                "api:40,db:35,cache:25",
                "timeout:40,error:40,slow_query:20",
            )
            .with_seed(seed),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_burst_publishes_exactly_n() {
        let publisher = Arc::new(MemoryPublisher::new());
        let report = Scheduler::new(single_valued_sampler(), publisher.clone())
            .run_burst(25, CancellationToken::new())
            .await
            .unwrap();

        assert!(report.is_completed());
        assert_eq!(report.sent, 25);
        assert_eq!(publisher.len().await, 25);
    }

    #[tokio::test]
    async fn test_burst_of_zero_completes_immediately() {
        let publisher = Arc::new(MemoryPublisher::new());
        let report = Scheduler::new(single_valued_sampler(), publisher.clone())
            .run_burst(0, CancellationToken::new())
            .await
            .unwrap();

        assert!(report.is_completed());
        assert_eq!(report.sent, 0);
        assert_eq!(publisher.calls(), 0);
    }

    #[tokio::test]
    async fn test_burst_already_cancelled() {
        let publisher = Arc::new(MemoryPublisher::new());
        let token = CancellationToken::new();
        token.cancel();

        let report = Scheduler::new(single_valued_sampler(), publisher.clone())
            .run_burst(10, token)
            .await
            .unwrap();

        assert!(report.is_cancelled());
        assert_eq!(report.sent, 0);
        assert_eq!(publisher.calls(), 0);
    }

    #[tokio::test]
    async fn test_burst_cancelled_mid_run() {
        let publisher = Arc::new(MemoryPublisher::new());
        let token = CancellationToken::new();
        let cancel_at = token.clone();

        let report = Scheduler::new(single_valued_sampler(), publisher.clone())
            .with_progress(move |n| {
                if n == 3 {
                    cancel_at.cancel();
                }
            })
            .run_burst(100, token)
            .await
            .unwrap();

        assert!(report.is_cancelled());
        assert_eq!(report.sent, 3);
        assert_eq!(publisher.len().await, 3);
    }

    #[tokio::test]
    async fn test_publish_failure_aborts_job() {
        let publisher = Arc::new(
            MemoryPublisher::new().with_failure_at(2, ScriptedFailure::Reject("broker down".into())),
        );
        let metrics = Arc::new(CounterMetrics::new());

        let err = Scheduler::new(single_valued_sampler(), publisher.clone())
            .with_metrics(metrics.clone())
            .run_burst(10, CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            JobError::Publish { index, source, .. } => {
                assert_eq!(index, 2);
                assert!(matches!(source, PublishError::Rejected(_)));
            }
            other => panic!("Expected publish failure, got {other:?}"),
        }
        // No skip-and-continue after the failure
        assert_eq!(publisher.calls(), 3);
        assert_eq!(publisher.len().await, 2);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.published, 2);
        assert_eq!(snapshot.errors, 1);
    }

    #[tokio::test]
    async fn test_publisher_cancellation_error_is_cancelled() {
        let publisher =
            Arc::new(MemoryPublisher::new().with_failure_at(1, ScriptedFailure::Cancel));
        let metrics = Arc::new(CounterMetrics::new());

        let report = Scheduler::new(single_valued_sampler(), publisher.clone())
            .with_metrics(metrics.clone())
            .run_burst(10, CancellationToken::new())
            .await
            .unwrap();

        assert!(report.is_cancelled());
        assert_eq!(report.sent, 1);
        assert_eq!(metrics.snapshot().errors, 0);
    }

    #[tokio::test]
    async fn test_progress_called_once_per_publish() {
        let publisher = Arc::new(MemoryPublisher::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_cb = seen.clone();

        Scheduler::new(single_valued_sampler(), publisher)
            .with_progress(move |n| seen_cb.lock().unwrap().push(n))
            .run_burst(5, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_progress_not_called_for_failed_publish() {
        let publisher =
            Arc::new(MemoryPublisher::new().with_failure_at(0, ScriptedFailure::Reject("x".into())));
        let calls = Arc::new(AtomicU64::new(0));
        let calls_cb = calls.clone();

        let result = Scheduler::new(single_valued_sampler(), publisher)
            .with_progress(move |_| {
                calls_cb.fetch_add(1, Ordering::SeqCst);
            })
            .run_burst(5, CancellationToken::new())
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_metrics_recorded_per_alert() {
        let publisher = Arc::new(MemoryPublisher::new());
        let metrics = Arc::new(CounterMetrics::new());

        Scheduler::new(single_valued_sampler(), publisher)
            .with_metrics(metrics.clone())
            .run_burst(7, CancellationToken::new())
            .await
            .unwrap();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.published, 7);
        assert_eq!(snapshot.processed, 7);
        assert_eq!(snapshot.errors, 0);
    }

    #[tokio::test]
    async fn test_test_burst_sends_canonical_alert_first() {
        for seed in [1, 42, 9999] {
            let publisher = Arc::new(MemoryPublisher::new());
            Scheduler::new(mixed_sampler(seed), publisher.clone())
                .run_test(Pacing::Burst { count: 20 }, CancellationToken::new())
                .await
                .unwrap();

            let alerts = publisher.alerts().await;
            assert_eq!(alerts.len(), 20);
            assert!(alerts[0].is_test());
            // Later alerts come from the distributions, which never yield test values
            assert!(alerts[1..].iter().all(|a| !a.is_test()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_test_continuous_sends_canonical_alert_first() {
        let publisher = Arc::new(MemoryPublisher::new());
        let report = Scheduler::new(mixed_sampler(42), publisher.clone())
            .run_test(
                Pacing::Continuous {
                    rate: 20.0,
                    duration: Duration::from_millis(500),
                },
                CancellationToken::new(),
            )
            .await
            .unwrap();

        let alerts = publisher.alerts().await;
        assert!(report.is_completed());
        assert!(alerts.len() >= 2);
        assert!(alerts[0].is_test());
        assert!(!alerts[1].is_test());
    }

    #[tokio::test(start_paused = true)]
    async fn test_continuous_respects_deadline() {
        let publisher = Arc::new(MemoryPublisher::new());
        let start = Instant::now();

        let report = Scheduler::new(single_valued_sampler(), publisher.clone())
            .run_continuous(10.0, Duration::from_secs(1), CancellationToken::new())
            .await
            .unwrap();

        assert!(report.is_completed());
        // Ticks at 0, 100, ..., 1000 ms publish; the tick after the deadline stops
        assert!((10..=11).contains(&report.sent), "sent {}", report.sent);
        assert_eq!(publisher.len().await as u64, report.sent);
        assert!(start.elapsed() <= Duration::from_millis(1200));
        assert!((report.rate() - 10.0).abs() < 1.5, "rate {}", report.rate());
        assert_eq!(report.target_rate, Some(10.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_continuous_cancelled_during_tick_wait() {
        let publisher = Arc::new(MemoryPublisher::new());
        let token = CancellationToken::new();

        let scheduler = Scheduler::new(single_valued_sampler(), publisher.clone());
        let job = tokio::spawn(scheduler.run_continuous(
            1.0,
            Duration::from_secs(60),
            token.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(2500)).await;
        token.cancel();

        let report = job.await.unwrap().unwrap();
        assert!(report.is_cancelled());
        assert!((2..=3).contains(&report.sent), "sent {}", report.sent);
        assert!(report.elapsed < Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_preempts_slow_publish() {
        let publisher = Arc::new(MemoryPublisher::new().with_delay(Duration::from_secs(10)));
        let token = CancellationToken::new();

        let scheduler = Scheduler::new(single_valued_sampler(), publisher.clone());
        let job = tokio::spawn(scheduler.run_burst(5, token.clone()));

        tokio::time::sleep(Duration::from_secs(1)).await;
        token.cancel();

        let report = job.await.unwrap().unwrap();
        assert!(report.is_cancelled());
        assert_eq!(report.sent, 0);
        assert!(publisher.is_empty().await);
    }

    #[tokio::test]
    async fn test_continuous_rejects_invalid_rate() {
        let publisher = Arc::new(MemoryPublisher::new());
        let result = Scheduler::new(single_valued_sampler(), publisher)
            .run_continuous(0.0, Duration::from_secs(1), CancellationToken::new())
            .await;

        assert!(matches!(result, Err(JobError::InvalidRate(r)) if r == 0.0));
    }

    #[tokio::test]
    async fn test_process_sends_boilerplate_first() {
        let publisher = Arc::new(MemoryPublisher::new());
        let report = Scheduler::new(single_valued_sampler(), publisher.clone())
            .process(Pacing::Burst { count: 5 }, CancellationToken::new())
            .await
            .unwrap();

        let alerts = publisher.alerts().await;
        assert_eq!(report.sent, 5);
        assert_eq!(alerts.len(), 6);
        assert!(alerts[0].is_boilerplate());
        assert!(alerts[1..].iter().all(|a| a.matches("HIGH", "api", "error")));
    }

    #[tokio::test]
    async fn test_process_boilerplate_failure_aborts() {
        let publisher =
            Arc::new(MemoryPublisher::new().with_failure_at(0, ScriptedFailure::Reject("down".into())));
        let err = Scheduler::new(single_valued_sampler(), publisher.clone())
            .process(Pacing::Burst { count: 5 }, CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, JobError::Boilerplate { .. }));
        assert_eq!(publisher.calls(), 1);
        assert!(publisher.is_empty().await);
    }

    #[tokio::test]
    async fn test_process_with_zero_burst_sends_only_boilerplate() {
        let publisher = Arc::new(MemoryPublisher::new());
        let report = Scheduler::new(single_valued_sampler(), publisher.clone())
            .run(
                JobMode::Process(Pacing::Burst { count: 0 }),
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(report.sent, 0);
        let alerts = publisher.alerts().await;
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].is_boilerplate());
    }

    #[tokio::test]
    async fn test_send_single() {
        let publisher = Arc::new(MemoryPublisher::new());
        let alert = alert_generator::custom_alert("CRITICAL", "payments", "card_declined");
        let id = alert.id;

        let report = Scheduler::new(single_valued_sampler(), publisher.clone())
            .run(JobMode::Single(alert), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.sent, 1);
        let alerts = publisher.alerts().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_continuous_publish_failure_aborts_job() {
        let publisher = Arc::new(
            MemoryPublisher::new().with_failure_at(2, ScriptedFailure::Reject("broker down".into())),
        );
        let metrics = Arc::new(CounterMetrics::new());

        let err = Scheduler::new(single_valued_sampler(), publisher.clone())
            .with_metrics(metrics.clone())
            .run_continuous(10.0, Duration::from_secs(5), CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            JobError::Publish { index, source, .. } => {
                assert_eq!(index, 2);
                assert!(matches!(source, PublishError::Rejected(_)));
            }
            other => panic!("Expected publish failure, got {other:?}"),
        }
        assert_eq!(publisher.calls(), 3);
        assert_eq!(publisher.len().await, 2);
        assert_eq!(metrics.snapshot().errors, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_continuous_publisher_cancellation_is_cancelled() {
        let publisher =
            Arc::new(MemoryPublisher::new().with_failure_at(1, ScriptedFailure::Cancel));
        let metrics = Arc::new(CounterMetrics::new());

        let report = assert_ok!(
            Scheduler::new(single_valued_sampler(), publisher.clone())
                .with_metrics(metrics.clone())
                .run_continuous(10.0, Duration::from_secs(5), CancellationToken::new())
                .await
        );

        assert!(report.is_cancelled());
        assert_eq!(report.sent, 1);
        assert_eq!(report.target_rate, Some(10.0));
        assert_eq!(metrics.snapshot().errors, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_process_continuous_sends_boilerplate_first() {
        let publisher = Arc::new(MemoryPublisher::new());
        let report = assert_ok!(
            Scheduler::new(single_valued_sampler(), publisher.clone())
                .run(
                    JobMode::Process(Pacing::Continuous {
                        rate: 10.0,
                        duration: Duration::from_secs(1),
                    }),
                    CancellationToken::new(),
                )
                .await
        );

        assert!(report.is_completed());
        assert!((10..=11).contains(&report.sent), "sent {}", report.sent);

        let alerts = publisher.alerts().await;
        assert_eq!(alerts.len() as u64, report.sent + 1);
        assert!(alerts[0].is_boilerplate());
        assert!(alerts[1..].iter().all(|a| a.matches("HIGH", "api", "error")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_boilerplate_in_flight() {
        let publisher = Arc::new(MemoryPublisher::new().with_delay(Duration::from_secs(10)));
        let metrics = Arc::new(CounterMetrics::new());
        let token = CancellationToken::new();

        let scheduler = Scheduler::new(single_valued_sampler(), publisher.clone())
            .with_metrics(metrics.clone());
        let job = tokio::spawn(scheduler.process(Pacing::Burst { count: 5 }, token.clone()));

        tokio::time::sleep(Duration::from_secs(1)).await;
        token.cancel();

        let report = assert_ok!(job.await.unwrap());
        assert!(report.is_cancelled());
        assert_eq!(report.sent, 0);
        assert_eq!(publisher.calls(), 1);
        assert!(publisher.is_empty().await);
        assert_eq!(metrics.snapshot().errors, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_continuous_duration_beyond_clock_range() {
        let publisher = Arc::new(MemoryPublisher::new());
        let token = CancellationToken::new();
        let cancel_at = token.clone();

        let report = assert_ok!(
            Scheduler::new(single_valued_sampler(), publisher.clone())
                .with_progress(move |n| {
                    if n == 5 {
                        cancel_at.cancel();
                    }
                })
                .run_continuous(10.0, Duration::from_secs(u64::MAX), token)
                .await
        );

        assert!(report.is_cancelled());
        assert_eq!(report.sent, 5);
        assert_eq!(publisher.len().await, 5);
    }

    #[tokio::test]
    async fn test_continuous_rejects_rate_too_small_for_tick() {
        let publisher = Arc::new(MemoryPublisher::new());
        let result = Scheduler::new(single_valued_sampler(), publisher.clone())
            .run_continuous(1e-30, Duration::from_secs(1), CancellationToken::new())
            .await;

        assert!(matches!(result, Err(JobError::InvalidRate(r)) if r == 1e-30));
        assert_eq!(publisher.calls(), 0);
    }
}
