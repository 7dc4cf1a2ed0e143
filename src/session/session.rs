use super::config::SessionConfig;
use super::dispatcher::{AnalysisDispatcher, CycleOutcome};
use super::state::{ConnectionTracker, CycleStatus};
use super::stats::{SessionEvent, SessionSnapshot};
use super::warnings::WarningLog;
use crate::analyzer::AnalyzerClient;
use crate::auth::SessionStore;
use crate::capture::{CaptureBackendFactory, CaptureResource, EncodedFrame, FrameCodec};
use crate::error::FrameError;
use anyhow::Result;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Engine state, mutated only by the cycle-completion step.
struct EngineState {
    warnings: WarningLog,
    connection: ConnectionTracker,
    emotion: Option<String>,
    cycles_completed: u64,
    ticks_dropped: u64,
}

impl EngineState {
    fn new() -> Self {
        Self {
            warnings: WarningLog::new(),
            connection: ConnectionTracker::new(),
            emotion: None,
            cycles_completed: 0,
            ticks_dropped: 0,
        }
    }
}

/// A live proctoring session.
///
/// Owns the capture resource and drives the analysis dispatcher on a fixed
/// cadence. At most one dispatch cycle is in flight at any time; ticks that
/// land while a cycle is pending are dropped. Teardown bumps a generation
/// counter so an in-flight cycle may finish but can no longer mutate state.
pub struct ProctorSession {
    /// Session configuration
    config: SessionConfig,

    /// External credential slot (token + user identity)
    store: SessionStore,

    dispatcher: Arc<AnalysisDispatcher>,

    codec: FrameCodec,

    /// Exclusive owner of the camera/microphone handle
    capture: Arc<Mutex<CaptureResource>>,

    state: Arc<Mutex<EngineState>>,

    /// Whether the tick loop is running
    active: Arc<AtomicBool>,

    /// Bumped on teardown; stale cycles discard their outcome
    generation: Arc<AtomicU64>,

    /// Single-flight guard for dispatch cycles
    cycle_in_flight: Arc<AtomicBool>,

    /// Handle for the tick task
    tick_handle: Arc<Mutex<Option<JoinHandle<()>>>>,

    /// UI-facing event channel (alerts, auth expiry, teardown)
    events: broadcast::Sender<SessionEvent>,

    /// When the session object was created
    started_at: chrono::DateTime<Utc>,
}

impl ProctorSession {
    /// Create a new session. Does not touch the device; `start` does.
    pub fn new(config: SessionConfig, store: SessionStore) -> Result<Self> {
        info!("Creating proctoring session: {}", config.session_id);

        let client = AnalyzerClient::new(config.analyzers.clone())?;
        let (events, _) = broadcast::channel(32);

        Ok(Self {
            codec: FrameCodec::new(config.jpeg_quality),
            dispatcher: Arc::new(AnalysisDispatcher::new(client)),
            store,
            capture: Arc::new(Mutex::new(CaptureResource::new())),
            state: Arc::new(Mutex::new(EngineState::new())),
            active: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(AtomicU64::new(0)),
            cycle_in_flight: Arc::new(AtomicBool::new(false)),
            tick_handle: Arc::new(Mutex::new(None)),
            events,
            started_at: Utc::now(),
            config,
        })
    }

    /// Acquire the capture device and begin ticking.
    pub async fn start(&self) -> Result<()> {
        if self.active.swap(true, Ordering::SeqCst) {
            warn!("Proctoring session already started");
            return Ok(());
        }

        info!("Starting proctoring session: {}", self.config.session_id);

        match self.acquire_and_spawn().await {
            Ok(()) => {
                info!("Proctoring session started");
                Ok(())
            }
            Err(e) => {
                self.active.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    async fn acquire_and_spawn(&self) -> Result<()> {
        let backend =
            CaptureBackendFactory::create(self.config.source.clone(), self.config.capture.clone())?;

        self.capture.lock().await.acquire(backend).await?;

        let ctx = TickContext {
            session_id: self.config.session_id.clone(),
            store: self.store.clone(),
            dispatcher: Arc::clone(&self.dispatcher),
            codec: self.codec,
            capture: Arc::clone(&self.capture),
            state: Arc::clone(&self.state),
            active: Arc::clone(&self.active),
            generation: Arc::clone(&self.generation),
            in_flight: Arc::clone(&self.cycle_in_flight),
            events: self.events.clone(),
            tick_interval: self.config.tick_interval,
            redirect_delay: self.config.auth_redirect_delay,
            my_generation: self.generation.load(Ordering::SeqCst),
        };

        let handle = tokio::spawn(ctx.run());

        {
            let mut slot = self.tick_handle.lock().await;
            *slot = Some(handle);
        }

        Ok(())
    }

    /// Tear the session down: stop the timer, release the device, tell the
    /// UI the session is over. Safe to call multiple times; an in-flight
    /// dispatch is allowed to finish but its outcome is discarded.
    pub async fn end(&self) -> SessionSnapshot {
        if !self.active.swap(false, Ordering::SeqCst) {
            return self.snapshot().await;
        }

        info!("Ending proctoring session: {}", self.config.session_id);

        // Anything still in flight now belongs to a previous generation
        self.generation.fetch_add(1, Ordering::SeqCst);

        // The timer stops before the device is touched
        if let Some(handle) = self.tick_handle.lock().await.take() {
            handle.abort();
        }

        self.capture.lock().await.release().await;

        let _ = self.events.send(SessionEvent::Ended);

        info!("Proctoring session ended");
        self.snapshot().await
    }

    /// Tear down and immediately retry acquisition; the recovery path for
    /// device errors.
    pub async fn reconnect(&self) -> Result<()> {
        info!("Reconnecting proctoring session: {}", self.config.session_id);
        self.end().await;
        self.start().await
    }

    /// Toggle the video track without tearing down the tick loop or the
    /// device handle.
    pub async fn set_video_enabled(&self, enabled: bool) {
        self.capture.lock().await.set_video_enabled(enabled);
    }

    /// Toggle the audio track without tearing down the tick loop or the
    /// device handle.
    pub async fn set_audio_enabled(&self, enabled: bool) {
        self.capture.lock().await.set_audio_enabled(enabled);
    }

    /// Subscribe to UI-facing session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Current read-only view of the session.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let (video_enabled, audio_enabled, capture_error) = {
            let capture = self.capture.lock().await;
            (
                capture.video_enabled(),
                capture.audio_enabled(),
                capture.last_error().map(|e| e.to_string()),
            )
        };

        let state = self.state.lock().await;

        SessionSnapshot {
            session_id: self.config.session_id.clone(),
            active: self.active.load(Ordering::SeqCst),
            connection: state.connection.state(),
            video_enabled,
            audio_enabled,
            warnings: state.warnings.current(),
            emotion: state.emotion.clone(),
            started_at: self.started_at,
            cycles_completed: state.cycles_completed,
            ticks_dropped: state.ticks_dropped,
            capture_error,
        }
    }
}

/// Everything the tick task needs, cloneable into spawned cycle tasks.
#[derive(Clone)]
struct TickContext {
    session_id: String,
    store: SessionStore,
    dispatcher: Arc<AnalysisDispatcher>,
    codec: FrameCodec,
    capture: Arc<Mutex<CaptureResource>>,
    state: Arc<Mutex<EngineState>>,
    active: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
    in_flight: Arc<AtomicBool>,
    events: broadcast::Sender<SessionEvent>,
    tick_interval: Duration,
    redirect_delay: Duration,
    my_generation: u64,
}

impl TickContext {
    async fn run(self) {
        debug!("Tick loop started for session {}", self.session_id);

        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if !self.active.load(Ordering::SeqCst)
                || self.generation.load(Ordering::SeqCst) != self.my_generation
            {
                break;
            }

            // A terminal connection state stops all further scheduling
            if self.state.lock().await.connection.state().is_terminal() {
                debug!("Session token expired; tick loop stopping");
                break;
            }

            self.tick().await;
        }

        debug!("Tick loop stopped for session {}", self.session_id);
    }

    /// One timer tick: sample and encode the current frame, claim the
    /// single-flight slot, then dispatch concurrently with future ticks.
    async fn tick(&self) {
        if self.in_flight.load(Ordering::SeqCst) {
            // Previous cycle has not resolved; this tick is dropped, not
            // queued
            let mut state = self.state.lock().await;
            state.ticks_dropped += 1;
            debug!("Previous cycle still in flight; dropping tick");
            return;
        }

        let Some(encoded) = self.sample_frame().await else {
            return;
        };

        // No suspension point between the claim and the spawn, so an
        // aborted ticker can never strand the slot
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            let mut state = self.state.lock().await;
            state.ticks_dropped += 1;
            return;
        }

        let ctx = self.clone();
        tokio::spawn(async move {
            let credentials = ctx.store.credentials().await;
            let outcome = ctx.dispatcher.run_cycle(&encoded, credentials).await;
            ctx.complete_cycle(outcome).await;
            // The slot frees only after the outcome is applied, keeping
            // cycles strictly ordered
            ctx.in_flight.store(false, Ordering::SeqCst);
        });
    }

    /// Grab and encode the current frame. `None` skips the tick: the
    /// device may still be warming up, which is not an error.
    async fn sample_frame(&self) -> Option<EncodedFrame> {
        let grabbed = self.capture.lock().await.grab_frame();

        match grabbed {
            Ok(frame) => match self.codec.encode(&frame) {
                Ok(encoded) => Some(encoded),
                Err(FrameError::NotReady) => None,
                Err(e) => {
                    warn!("Failed to encode frame: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to grab frame: {}", e);
                None
            }
        }
    }

    /// Fold a finished cycle into the engine state. Outcomes from a
    /// torn-down generation are discarded wholesale.
    async fn complete_cycle(&self, outcome: CycleOutcome) {
        if !self.active.load(Ordering::SeqCst)
            || self.generation.load(Ordering::SeqCst) != self.my_generation
        {
            debug!("Discarding cycle outcome from a torn-down session");
            return;
        }

        match outcome {
            CycleOutcome::Skipped => {}

            CycleOutcome::AuthExpired => {
                self.store.invalidate_token().await;

                let mut state = self.state.lock().await;
                state.cycles_completed += 1;

                if state.connection.apply(CycleStatus::AuthRejected).is_some() {
                    warn!("Analyzer rejected the session token; proctoring will stop");

                    let events = self.events.clone();
                    let delay = self.redirect_delay;
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = events.send(SessionEvent::AuthExpired);
                    });
                }
            }

            CycleOutcome::Completed {
                warnings,
                emotion,
                emotion_succeeded,
                any_success,
            } => {
                let mut state = self.state.lock().await;
                state.cycles_completed += 1;

                let status = if any_success {
                    CycleStatus::Ok
                } else {
                    CycleStatus::Failed
                };
                if let Some(next) = state.connection.apply(status) {
                    info!("Connection state changed to {:?}", next);
                }

                // A successful call always records its label, including a
                // null report; only a failed call leaves the last one be
                if emotion_succeeded {
                    state.emotion = emotion;
                }

                let added = state.warnings.append(warnings);
                if added > 0 {
                    debug!("{} new warning(s) recorded", added);
                    let _ = self.events.send(SessionEvent::WarningAlert);
                }
            }
        }
    }
}
