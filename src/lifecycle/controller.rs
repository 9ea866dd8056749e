use crate::filter::graph::{FilterGraph, FilterHandle, generate_base_id};
use crate::foundation::core::{Point, Size, TextureSize};
use crate::foundation::error::{GlassError, GlassResult};
use crate::lifecycle::config::GlassOpts;
use crate::lifecycle::host::{FrameToken, Host, ListenerToken, PointerEvent};
use crate::shader::field::evaluate_field;
use crate::shader::fragment::FragmentFn;
use crate::shader::pointer::PointerProbe;
use crate::shader::texture::{DisplacementTexture, encode_texture};

/// Where a controller is in its lifetime.
///
/// `Uninitialized -> Measuring -> Ready -> Disposed`, with `Failed` reached from `Measuring`
/// when the surface never gets a size or the first build fails. Nothing leaves `Disposed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlassState {
    /// Created, not attached.
    Uninitialized,
    /// Waiting on the frame clock for a non-zero surface size.
    Measuring {
        /// Ticks spent so far.
        attempts: u32,
    },
    /// Graph mounted and texture published.
    Ready,
    /// Gave up; no graph is mounted. Still needs `detach` to release the listener.
    Failed {
        /// Ticks spent before giving up.
        attempts: u32,
    },
    /// Detached; all host resources released.
    Disposed,
}

/// Keeps a displacement filter in sync with one surface.
///
/// The controller never calls into the host on its own: the host forwards frame callbacks,
/// resizes and pointer moves through the `on_*` methods, and every method borrows the host only
/// for the duration of the call.
pub struct GlassController<F> {
    fragment: F,
    opts: GlassOpts,
    base_id: String,
    state: GlassState,

    pending_frame: Option<FrameToken>,
    listener: Option<ListenerToken>,

    probe: PointerProbe,
    pointer_dependent: bool,

    surface: Size,
    graph: Option<FilterGraph>,
    texture: Option<DisplacementTexture>,
    evaluations: u64,
}

impl<F: FragmentFn> GlassController<F> {
    /// Create an unattached controller with its own filter id.
    pub fn new(fragment: F, opts: GlassOpts) -> GlassResult<Self> {
        opts.validate()?;
        let mut rng = match opts.id_seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let base_id = generate_base_id(&opts.id_prefix, &mut rng);
        Ok(Self {
            fragment,
            opts,
            base_id,
            state: GlassState::Uninitialized,
            pending_frame: None,
            listener: None,
            probe: PointerProbe::default(),
            pointer_dependent: false,
            surface: Size::ZERO,
            graph: None,
            texture: None,
            evaluations: 0,
        })
    }

    /// Current state.
    pub fn state(&self) -> GlassState {
        self.state
    }

    /// Handle to reference from the surface's style; `None` until `Ready` and after detach.
    pub fn handle(&self) -> Option<FilterHandle> {
        match self.state {
            GlassState::Ready => self.graph.as_ref().map(|g| g.handle().clone()),
            _ => None,
        }
    }

    /// Base id shared by the filter and its map (`{base}_filter`, `{base}_map`).
    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    /// Options in effect.
    pub fn opts(&self) -> &GlassOpts {
        &self.opts
    }

    /// Mounted graph, if any.
    pub fn graph(&self) -> Option<&FilterGraph> {
        self.graph.as_ref()
    }

    /// Most recently published texture, if any.
    pub fn texture(&self) -> Option<&DisplacementTexture> {
        self.texture.as_ref()
    }

    /// Last-known normalized pointer position.
    pub fn pointer(&self) -> Point {
        self.probe.pos()
    }

    /// Whether the latest evaluation read the pointer, making pointer moves recompute.
    pub fn pointer_dependent(&self) -> bool {
        self.pointer_dependent
    }

    /// Number of full-grid evaluations run so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Frame callback the controller is waiting on, if any.
    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending_frame
    }

    /// Surface size the current texture was built for.
    pub fn surface(&self) -> Size {
        self.surface
    }

    /// Start tracking the surface: install the pointer listener and schedule the first
    /// measurement. Returns the handle, which is always `None` at this point.
    #[tracing::instrument(level = "debug", skip_all, fields(id = %self.base_id))]
    pub fn attach<H: Host + ?Sized>(&mut self, host: &mut H) -> GlassResult<Option<FilterHandle>> {
        match self.state {
            GlassState::Uninitialized => {}
            GlassState::Disposed => return Err(GlassError::Disposed),
            _ => return Err(GlassError::validation("controller is already attached")),
        }
        self.listener = Some(host.listen_pointer());
        self.pending_frame = Some(host.request_frame());
        self.state = GlassState::Measuring { attempts: 0 };
        tracing::debug!("attached, measuring");
        Ok(self.handle())
    }

    /// Frame-clock callback. Tokens that are stale or were cancelled are ignored.
    ///
    /// While measuring, a zero size reschedules; a non-zero size builds and publishes the
    /// filter. Returns [`GlassError::Measure`] once the attempt budget is spent.
    pub fn on_frame<H: Host + ?Sized>(&mut self, host: &mut H, token: FrameToken) -> GlassResult<()> {
        if self.pending_frame != Some(token) {
            tracing::trace!(?token, "ignoring stale frame");
            return Ok(());
        }
        self.pending_frame = None;

        let GlassState::Measuring { attempts } = self.state else {
            return Ok(());
        };
        let attempts = attempts.saturating_add(1);
        let surface = host.measure();

        let Some(size) = TextureSize::from_surface(surface, self.opts.resolution) else {
            if attempts >= self.opts.max_measure_attempts {
                self.state = GlassState::Failed { attempts };
                tracing::warn!(id = %self.base_id, attempts, "surface never became measurable");
                return Err(GlassError::Measure { attempts });
            }
            tracing::trace!(attempts, "surface not measured yet");
            self.state = GlassState::Measuring { attempts };
            self.pending_frame = Some(host.request_frame());
            return Ok(());
        };

        if let Err(e) = self.build(host, surface, size) {
            self.state = GlassState::Failed { attempts };
            return Err(e);
        }
        Ok(())
    }

    /// Surface size changed. Rebuilds the texture when `Ready` and the size actually differs;
    /// the handle stays the same.
    pub fn on_resize<H: Host + ?Sized>(&mut self, host: &mut H) -> GlassResult<()> {
        if self.state != GlassState::Ready {
            return Ok(());
        }
        let surface = host.measure();
        if surface == self.surface {
            return Ok(());
        }
        let Some(size) = TextureSize::from_surface(surface, self.opts.resolution) else {
            tracing::debug!(id = %self.base_id, "surface collapsed, keeping last texture");
            return Ok(());
        };
        self.republish(host, surface, size)
    }

    /// Pointer moved over the surface.
    ///
    /// Always records the new position; recomputes only when `Ready` and the previous
    /// evaluation read the pointer. Returns whether a recompute happened.
    pub fn on_pointer_move<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        event: PointerEvent,
    ) -> GlassResult<bool> {
        if matches!(self.state, GlassState::Disposed | GlassState::Uninitialized) {
            return Ok(false);
        }
        let Some(pos) = event.normalized(host.bounding_rect()) else {
            return Ok(false);
        };
        self.probe.set(pos);

        if self.state != GlassState::Ready || !self.pointer_dependent {
            tracing::trace!(x = pos.x, y = pos.y, "pointer moved, no recompute");
            return Ok(false);
        }
        let Some(size) = TextureSize::from_surface(self.surface, self.opts.resolution) else {
            return Ok(false);
        };
        self.republish(host, self.surface, size)?;
        Ok(true)
    }

    /// Release everything held in the host: pending frame, pointer listener, mounted graph.
    ///
    /// Idempotent; safe in any state.
    #[tracing::instrument(level = "debug", skip_all, fields(id = %self.base_id))]
    pub fn detach<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.state == GlassState::Disposed {
            return;
        }
        if let Some(token) = self.pending_frame.take() {
            host.cancel_frame(token);
        }
        if let Some(token) = self.listener.take() {
            host.unlisten_pointer(token);
        }
        if let Some(graph) = self.graph.take() {
            host.unmount_filter(graph.handle());
        }
        self.texture = None;
        self.state = GlassState::Disposed;
        tracing::debug!("disposed");
    }

    fn build<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        surface: Size,
        size: TextureSize,
    ) -> GlassResult<()> {
        self.check_dims(size)?;
        let texture = self.render(size)?;
        let mut graph = FilterGraph::new(&self.base_id, surface)?;
        graph.publish(&texture, self.opts.resolution)?;
        host.mount_filter(&graph)?;

        tracing::debug!(
            id = %self.base_id,
            width = size.width,
            height = size.height,
            scale = graph.displacement().scale,
            "filter ready"
        );
        self.graph = Some(graph);
        self.texture = Some(texture);
        self.surface = surface;
        self.state = GlassState::Ready;
        Ok(())
    }

    fn republish<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        surface: Size,
        size: TextureSize,
    ) -> GlassResult<()> {
        self.check_dims(size)?;
        let texture = self.render(size)?;
        let Some(graph) = self.graph.as_mut() else {
            return Err(GlassError::evaluation("republish without a mounted graph"));
        };

        let prev_region = graph.region();
        graph.resize(surface);
        let update = match graph.publish(&texture, self.opts.resolution) {
            Ok(u) => u,
            Err(e) => {
                graph.resize(prev_region);
                return Err(e);
            }
        };
        host.update_filter(&update)?;

        tracing::debug!(id = %self.base_id, revision = update.revision, "texture republished");
        self.texture = Some(texture);
        self.surface = surface;
        Ok(())
    }

    fn render(&mut self, size: TextureSize) -> GlassResult<DisplacementTexture> {
        let field = evaluate_field(&self.fragment, size, &self.probe, self.opts.parallel)?;
        self.evaluations += 1;
        self.pointer_dependent = field.pointer_read();
        encode_texture(&field)
    }

    fn check_dims(&self, size: TextureSize) -> GlassResult<()> {
        let max = self.opts.max_texture_dim;
        if size.width > max || size.height > max {
            return Err(GlassError::validation(format!(
                "texture size too large: {}x{} (max {max}x{max})",
                size.width, size.height
            )));
        }
        Ok(())
    }
}

impl<F> Drop for GlassController<F> {
    fn drop(&mut self) {
        if !matches!(
            self.state,
            GlassState::Uninitialized | GlassState::Disposed
        ) {
            tracing::debug!(id = %self.base_id, "controller dropped without detach");
        }
    }
}

/// Create a controller for `fragment` and attach it to `host` in one step.
pub fn attach_glass<F, H>(host: &mut H, fragment: F, opts: GlassOpts) -> GlassResult<GlassController<F>>
where
    F: FragmentFn,
    H: Host + ?Sized,
{
    let mut ctrl = GlassController::new(fragment, opts)?;
    ctrl.attach(host)?;
    Ok(ctrl)
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/controller.rs"]
mod tests;
