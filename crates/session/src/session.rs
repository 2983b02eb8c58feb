//! Capture session lifecycle.
//!
//! One `CaptureSession` owns the camera handle and the stream channel for a
//! single course. Resource ownership is encoded in the state enum: a channel
//! without a device (or the reverse) is unrepresentable. The session is
//! `active` exactly when it is in `Streaming`.

use crate::backend::SessionApi;
use crate::camera::{CameraProvider, FrameSource};
use crate::encode::frame_to_png;
use crate::error::SessionError;
use crate::transport::{ChannelOpener, FrameChannel};
use crate::types::{Handshake, Student};
use std::mem;

pub enum SessionState<D, C> {
    Idle,
    Starting,
    Streaming { device: D, channel: C, ordinal: u32 },
    Stopping,
}

impl<D, C> SessionState<D, C> {
    pub fn is_streaming(&self) -> bool {
        matches!(self, SessionState::Streaming { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Starting => "starting",
            SessionState::Streaming { .. } => "streaming",
            SessionState::Stopping => "stopping",
        }
    }
}

pub struct CaptureSession<P, O, B>
where
    P: CameraProvider,
    O: ChannelOpener,
    B: SessionApi,
{
    course_id: String,
    roster: Vec<Student>,
    selected_date: Option<String>,
    ordinal: u32,
    frame_size: (u32, u32),
    frames_sent: u64,
    camera: P,
    opener: O,
    backend: B,
    state: SessionState<P::Device, O::Channel>,
}

impl<P, O, B> CaptureSession<P, O, B>
where
    P: CameraProvider,
    O: ChannelOpener,
    B: SessionApi,
{
    pub fn new(
        course_id: String,
        roster: Vec<Student>,
        selected_date: Option<String>,
        frame_size: (u32, u32),
        camera: P,
        opener: O,
        backend: B,
    ) -> Self {
        Self {
            course_id,
            roster,
            selected_date,
            ordinal: 0,
            frame_size,
            frames_sent: 0,
            camera,
            opener,
            backend,
            state: SessionState::Idle,
        }
    }

    pub fn active(&self) -> bool {
        self.state.is_streaming()
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.selected_date = Some(date.into());
    }

    /// Re-read the backend's session counter. A missing counter reads as
    /// zero; a backend failure keeps the previous value and is logged.
    ///
    /// Never re-addresses an already-open channel.
    pub async fn refresh_ordinal(&mut self) {
        match self.backend.session_count(&self.course_id).await {
            Ok(count) => self.ordinal = count.unwrap_or(0),
            Err(e) => tracing::warn!(
                error = %e,
                course_id = %self.course_id,
                "failed to fetch session count"
            ),
        }
    }

    /// Switch to another course while inactive. Refused during an active
    /// session: the course id is fixed for the session lifetime.
    pub async fn change_course(&mut self, course_id: String, roster: Vec<Student>) {
        if self.active() {
            tracing::warn!("course change ignored while a session is active");
            return;
        }
        self.course_id = course_id;
        self.roster = roster;
        self.refresh_ordinal().await;
    }

    /// Acquire the camera, record the session start, open the channel, and
    /// send the handshake. On any failure every resource acquired so far is
    /// released and the session returns to idle.
    ///
    /// The channel is addressed with the ordinal observed when starting
    /// began; the counter increment recorded below only affects displays.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::Idle) {
            return Ok(());
        }
        let date = self.selected_date.clone().ok_or(SessionError::MissingDate)?;

        self.state = SessionState::Starting;
        let ordinal = self.ordinal;

        let device = match self.camera.acquire() {
            Ok(device) => device,
            Err(e) => {
                self.state = SessionState::Idle;
                return Err(SessionError::DeviceAccess(e));
            }
        };

        // Non-fatal: the session streams whether or not the backend managed
        // to count it.
        match self.backend.record_session_start(&self.course_id).await {
            Ok(true) => tracing::debug!(course_id = %self.course_id, "session start recorded"),
            Ok(false) => {
                tracing::warn!(course_id = %self.course_id, "backend did not record session start")
            }
            Err(e) => tracing::warn!(error = %e, "failed to record session start"),
        }
        self.refresh_ordinal().await;

        let mut channel = match self.opener.open(&self.course_id, ordinal).await {
            Ok(channel) => channel,
            Err(e) => {
                drop(device);
                self.state = SessionState::Idle;
                return Err(SessionError::Channel(e));
            }
        };

        let handshake = Handshake {
            students: self.roster.clone(),
            date,
        };
        if let Err(e) = channel.send_handshake(&handshake).await {
            if let Err(close_err) = channel.close().await {
                tracing::warn!(error = %close_err, "channel close failed during aborted start");
            }
            drop(device);
            self.state = SessionState::Idle;
            return Err(SessionError::Channel(e));
        }

        self.frames_sent = 0;
        self.state = SessionState::Streaming {
            device,
            channel,
            ordinal,
        };
        tracing::info!(
            course_id = %self.course_id,
            ordinal,
            students = self.roster.len(),
            "capture session streaming"
        );
        Ok(())
    }

    /// One timer tick: capture, encode, enqueue. A no-op unless streaming.
    ///
    /// Capture and encode failures drop the frame and keep the session
    /// alive; a send failure tears the session down and surfaces a channel
    /// error.
    pub async fn tick(&mut self) -> Result<(), SessionError> {
        let SessionState::Streaming {
            device, channel, ..
        } = &mut self.state
        else {
            return Ok(());
        };

        let frame = match device.grab() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(error = %e, "frame capture error - skipping tick");
                return Ok(());
            }
        };

        let png = match frame_to_png(&frame, self.frame_size.0, self.frame_size.1) {
            Ok(png) => png,
            Err(e) => {
                tracing::warn!(error = %e, "frame encode error - skipping tick");
                return Ok(());
            }
        };

        if let Err(e) = channel.send_frame(png).await {
            self.stop().await;
            return Err(SessionError::Channel(e));
        }

        self.frames_sent += 1;
        if self.frames_sent.is_multiple_of(30) {
            tracing::debug!(frames = self.frames_sent, "stream status");
        }
        Ok(())
    }

    /// Tear the session down: close the channel, then release the camera,
    /// then clear state. Idempotent; safe to call in any state, including
    /// after a failed start where nothing was acquired.
    pub async fn stop(&mut self) {
        match mem::replace(&mut self.state, SessionState::Stopping) {
            SessionState::Streaming {
                device,
                mut channel,
                ordinal,
            } => {
                // Channel first, so nothing can send over a released device.
                if let Err(e) = channel.close().await {
                    tracing::warn!(error = %e, "channel close failed");
                }
                drop(device);
                tracing::info!(
                    course_id = %self.course_id,
                    ordinal,
                    frames = self.frames_sent,
                    "capture session stopped"
                );
            }
            // Nothing held in these states.
            SessionState::Idle | SessionState::Starting | SessionState::Stopping => {}
        }
        self.state = SessionState::Idle;
    }
}
