//! Frame loop controller.
//!
//! [`FrameLoop`] owns the drawing surface, the host scheduler and at most one
//! running [`Simulation`]. It runs one step per host frame callback and asks
//! for the next callback right after, so the chain continues until
//! [`dispose`](FrameLoop::dispose).
//!
//! Lifecycle:
//!
//! ```text
//!   Idle --start--> Running <--resize(valid)-- Waiting
//!                     |  ^                        ^
//!                     |  +----reconfigure---------+  (zero-sized surface)
//!                     v
//!                  Disposed
//! ```
//!
//! A zero-sized surface is not an error: the loop parks in `Waiting` and
//! starts on the first resize that gives it area.

use magnaflux_core::engine::Engine;
use magnaflux_core::error::EngineError;
use magnaflux_core::prng::Xorshift64;
use magnaflux_core::scheduler::{FrameScheduler, FrameToken, ListenerId, ManualScheduler};
use magnaflux_core::state::{FieldState, Intervention};
use magnaflux_core::surface::Surface;

use crate::simulation::Simulation;

/// What [`FrameLoop::reconfigure`] does with the running simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconfigurePolicy {
    /// Tear down and start fresh: new pool sized from the new state, time
    /// back to zero.
    #[default]
    Restart,
    /// Keep pool, positions and time; swap state and tag in place.
    Live,
}

/// Controller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Seeds the master generator; each restart forks a fresh stream from it.
    pub seed: u64,
    pub policy: ReconfigurePolicy,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            policy: ReconfigurePolicy::Restart,
        }
    }
}

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// Constructed, never started.
    Idle,
    /// Started, but the surface has no area yet.
    Waiting,
    /// A simulation is running and a frame callback is pending.
    Running,
    /// Torn down; every further call is a no-op.
    Disposed,
}

/// Owns the surface and drives the simulation from host frame callbacks.
pub struct FrameLoop<S: Surface, H: FrameScheduler> {
    surface: S,
    scheduler: H,
    config: ControllerConfig,
    state: FieldState,
    tag: Option<Intervention>,
    master: Xorshift64,
    simulation: Option<Simulation>,
    pending_frame: Option<FrameToken>,
    listener: Option<ListenerId>,
    pending_resize: Option<(u32, u32)>,
    phase: LoopPhase,
}

impl<S: Surface, H: FrameScheduler> FrameLoop<S, H> {
    pub fn new(
        surface: S,
        scheduler: H,
        state: FieldState,
        tag: Option<Intervention>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            surface,
            scheduler,
            master: Xorshift64::new(config.seed),
            config,
            state,
            tag,
            simulation: None,
            pending_frame: None,
            listener: None,
            pending_resize: None,
            phase: LoopPhase::Idle,
        }
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Consumes the controller, handing back the surface with the last
    /// frame on it.
    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn scheduler(&self) -> &H {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut H {
        &mut self.scheduler
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }

    /// The state the next restart will use (the host's latest snapshot).
    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn intervention(&self) -> Option<Intervention> {
        self.tag
    }

    /// The token of the frame callback currently awaited, if any.
    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending_frame
    }

    /// Status lines of the running simulation; empty when none runs.
    pub fn hud(&self) -> Vec<String> {
        self.simulation.as_ref().map(Simulation::hud).unwrap_or_default()
    }

    /// Mounts the view: attaches the resize listener and, if the surface
    /// has area, builds a simulation and requests the first frame.
    ///
    /// Starting a running loop does nothing; starting a disposed one neither.
    pub fn start(&mut self) -> Result<(), EngineError> {
        match self.phase {
            LoopPhase::Running | LoopPhase::Disposed => return Ok(()),
            LoopPhase::Idle | LoopPhase::Waiting => {}
        }
        if self.listener.is_none() {
            self.listener = Some(self.scheduler.attach_resize());
        }
        self.apply_pending_resize();
        if !self.surface.is_drawable() {
            log::debug!("surface has no area yet; deferring start");
            self.phase = LoopPhase::Waiting;
            return Ok(());
        }
        if self.simulation.is_none() {
            let (w, h) = self.surface.size();
            let rng = Box::new(self.master.fork());
            let sim = Simulation::new(&self.state, self.tag, w, h, rng)?;
            log::info!(
                "flux loop started: {} particles on {w}x{h}, intervention {}",
                sim.particles().len(),
                self.tag.map_or("none", Intervention::tag),
            );
            self.simulation = Some(sim);
        }
        self.request_frame();
        self.phase = LoopPhase::Running;
        Ok(())
    }

    /// Runs exactly one simulation+render step, if running.
    ///
    /// Pending resizes are applied first. If the surface lost its area the
    /// loop parks in `Waiting` and `Ok(false)` is returned.
    pub fn step(&mut self) -> Result<bool, EngineError> {
        if self.phase != LoopPhase::Running {
            return Ok(false);
        }
        self.apply_pending_resize();
        if !self.surface.is_drawable() {
            log::debug!("surface collapsed to zero area; waiting for resize");
            self.phase = LoopPhase::Waiting;
            return Ok(false);
        }
        match self.simulation.as_mut() {
            Some(sim) => {
                sim.step(&mut self.surface)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Host frame callback. Stale or cancelled tokens are ignored.
    ///
    /// Returns whether a frame was drawn. The next callback is requested
    /// after a successful step, keeping the chain alive.
    pub fn on_frame(&mut self, token: FrameToken) -> Result<bool, EngineError> {
        if self.pending_frame != Some(token) {
            log::debug!("ignoring stale frame callback {token:?}");
            return Ok(false);
        }
        self.pending_frame = None;
        let drew = self.step()?;
        if self.phase == LoopPhase::Running {
            self.request_frame();
        }
        Ok(drew)
    }

    /// Host resize notification.
    ///
    /// The new size is picked up before the next step reads it. A loop
    /// waiting for area starts right away when the size is valid.
    pub fn notify_resize(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        if self.phase == LoopPhase::Disposed {
            return Ok(());
        }
        log::debug!("resize to {width}x{height}");
        self.pending_resize = Some((width, height));
        if self.phase == LoopPhase::Waiting && width > 0 && height > 0 {
            self.start()?;
        }
        Ok(())
    }

    /// Hands over a new state snapshot and intervention tag.
    ///
    /// Under [`ReconfigurePolicy::Restart`] the running simulation is torn
    /// down (pending frame cancelled, resize listener detached, pool and
    /// time discarded) and a fresh one started. Under `Live` the running
    /// simulation adopts the new values in place.
    pub fn reconfigure(
        &mut self,
        state: FieldState,
        tag: Option<Intervention>,
    ) -> Result<(), EngineError> {
        if self.phase == LoopPhase::Disposed {
            return Ok(());
        }
        self.state = state;
        self.tag = tag;
        if self.config.policy == ReconfigurePolicy::Live {
            if let Some(sim) = self.simulation.as_mut() {
                log::debug!("reconfigure: live swap");
                sim.set_state(&self.state, self.tag);
                return Ok(());
            }
        }
        let was_started = self.phase != LoopPhase::Idle;
        log::info!("reconfigure: restarting flux loop");
        self.teardown();
        self.phase = LoopPhase::Idle;
        if was_started {
            self.start()
        } else {
            Ok(())
        }
    }

    /// Unmounts the view: cancels the pending frame, detaches the resize
    /// listener and drops the simulation. Idempotent.
    pub fn dispose(&mut self) {
        if self.phase == LoopPhase::Disposed {
            return;
        }
        self.teardown();
        self.phase = LoopPhase::Disposed;
        log::info!("flux loop disposed");
    }

    fn teardown(&mut self) {
        if let Some(token) = self.pending_frame.take() {
            self.scheduler.cancel_frame(token);
        }
        if let Some(id) = self.listener.take() {
            self.scheduler.detach_resize(id);
        }
        self.simulation = None;
    }

    fn request_frame(&mut self) {
        if self.pending_frame.is_none() {
            self.pending_frame = Some(self.scheduler.request_frame());
        }
    }

    fn apply_pending_resize(&mut self) {
        if let Some((w, h)) = self.pending_resize.take() {
            if (w, h) != self.surface.size() {
                self.surface.resize(w, h);
            }
        }
    }
}

impl<S: Surface> FrameLoop<S, ManualScheduler> {
    /// Fires up to `frames` due callbacks, as a host presenting that many
    /// frames would. Returns how many frames were drawn.
    pub fn pump(&mut self, frames: usize) -> Result<usize, EngineError> {
        let mut drawn = 0;
        for _ in 0..frames {
            let Some(token) = self.scheduler.next_due() else {
                break;
            };
            if self.on_frame(token)? {
                drawn += 1;
            }
        }
        Ok(drawn)
    }
}
