use crate::filter::graph::{FilterGraph, FilterHandle, FilterUpdate};
use crate::foundation::core::{Point, Rect, Size};
use crate::foundation::error::{GlassError, GlassResult};
use crate::lifecycle::controller::GlassController;
use crate::lifecycle::host::{
    FilterHost, FrameClock, FrameToken, ListenerToken, PointerEvent, SurfaceProbe,
};
use crate::shader::fragment::FragmentFn;
use std::collections::{BTreeMap, BTreeSet};

/// A filter as currently mounted in a [`HeadlessHost`].
#[derive(Clone, Debug, PartialEq)]
pub struct MountedFilter {
    /// Filter region in surface pixels.
    pub region: Size,
    /// Current image source.
    pub href: Option<String>,
    /// Current displacement scale.
    pub scale: f64,
    /// Last applied publish revision.
    pub revision: u64,
    /// Markup captured at mount time.
    pub svg: String,
}

/// Cumulative host call counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostStats {
    /// `request_frame` calls.
    pub frames_requested: u64,
    /// `cancel_frame` calls that revoked a pending frame.
    pub frames_cancelled: u64,
    /// Successful `mount_filter` calls.
    pub mounts: u64,
    /// Successful `update_filter` calls.
    pub updates: u64,
    /// `unmount_filter` calls that removed a filter.
    pub unmounts: u64,
}

/// In-memory host: settable geometry, a manually advanced frame clock, and live resource
/// tracking.
///
/// Useful for tests, offline texture generation, and embedders without a compositor of their own.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    size: Size,
    rect: Rect,
    next_token: u64,
    pending_frames: BTreeSet<FrameToken>,
    listeners: BTreeSet<ListenerToken>,
    filters: BTreeMap<String, MountedFilter>,
    stats: HostStats,
}

impl HeadlessHost {
    /// Host whose surface has `size`, with its bounding box at the origin.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            rect: Rect::from_origin_size(Point::ORIGIN, size),
            ..Self::default()
        }
    }

    /// Change the measured size; the bounding box keeps its origin.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.rect = Rect::from_origin_size(self.rect.origin(), size);
    }

    /// Move or resize the client-space bounding box without touching the measured size.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    /// Fire the frame `ctrl` is waiting on, as one display refresh would.
    ///
    /// Frames owned by other controllers on this host stay pending, as does any frame `ctrl`
    /// requests during this tick. Returns the number of frames fired (0 or 1).
    pub fn tick<F: FragmentFn>(&mut self, ctrl: &mut GlassController<F>) -> GlassResult<usize> {
        let Some(token) = ctrl.pending_frame() else {
            return Ok(0);
        };
        if !self.pending_frames.remove(&token) {
            return Ok(0);
        }
        ctrl.on_frame(self, token)?;
        Ok(1)
    }

    /// Deliver a pointer move at client position `client` to `ctrl` if a listener is installed.
    pub fn pointer_move<F: FragmentFn>(
        &mut self,
        ctrl: &mut GlassController<F>,
        client: Point,
    ) -> GlassResult<bool> {
        if self.listeners.is_empty() {
            return Ok(false);
        }
        ctrl.on_pointer_move(self, PointerEvent { client })
    }

    /// Frames scheduled and not yet fired or cancelled.
    pub fn pending_frames(&self) -> usize {
        self.pending_frames.len()
    }

    /// Installed pointer listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Mounted filters.
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Pending frames, listeners and filters held on behalf of controllers.
    pub fn live_resources(&self) -> usize {
        self.pending_frames() + self.listener_count() + self.filter_count()
    }

    /// Look up a mounted filter.
    pub fn filter(&self, handle: &FilterHandle) -> Option<&MountedFilter> {
        self.filters.get(handle.as_str())
    }

    /// Call counters.
    pub fn stats(&self) -> HostStats {
        self.stats
    }
}

impl SurfaceProbe for HeadlessHost {
    fn measure(&self) -> Size {
        self.size
    }

    fn bounding_rect(&self) -> Rect {
        self.rect
    }
}

impl FrameClock for HeadlessHost {
    fn request_frame(&mut self) -> FrameToken {
        self.next_token += 1;
        let token = FrameToken(self.next_token);
        self.pending_frames.insert(token);
        self.stats.frames_requested += 1;
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.pending_frames.remove(&token) {
            self.stats.frames_cancelled += 1;
        }
    }
}

impl FilterHost for HeadlessHost {
    fn mount_filter(&mut self, graph: &FilterGraph) -> GlassResult<()> {
        let key = graph.handle().as_str();
        if self.filters.contains_key(key) {
            return Err(GlassError::validation(format!(
                "filter '{key}' is already mounted"
            )));
        }
        self.filters.insert(
            key.to_string(),
            MountedFilter {
                region: graph.region(),
                href: graph.image().href.clone(),
                scale: graph.displacement().scale,
                revision: graph.revision(),
                svg: graph.to_svg(),
            },
        );
        self.stats.mounts += 1;
        Ok(())
    }

    fn update_filter(&mut self, update: &FilterUpdate) -> GlassResult<()> {
        let Some(f) = self.filters.get_mut(update.handle.as_str()) else {
            return Err(GlassError::validation(format!(
                "filter '{}' is not mounted",
                update.handle
            )));
        };
        f.region = update.region;
        f.href = Some(update.href.clone());
        f.scale = update.scale;
        f.revision = update.revision;
        self.stats.updates += 1;
        Ok(())
    }

    fn unmount_filter(&mut self, handle: &FilterHandle) {
        if self.filters.remove(handle.as_str()).is_some() {
            self.stats.unmounts += 1;
        }
    }

    fn listen_pointer(&mut self) -> ListenerToken {
        self.next_token += 1;
        let token = ListenerToken(self.next_token);
        self.listeners.insert(token);
        token
    }

    fn unlisten_pointer(&mut self, token: ListenerToken) {
        self.listeners.remove(&token);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/headless.rs"]
mod tests;
