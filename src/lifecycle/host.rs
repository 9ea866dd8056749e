use crate::filter::graph::{FilterGraph, FilterHandle, FilterUpdate};
use crate::foundation::core::{Point, Rect, Size};
use crate::foundation::error::GlassResult;

/// Ticket for one scheduled frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameToken(pub u64);

/// Ticket for an installed pointer-move listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerToken(pub u64);

/// Pointer movement over the surface, in the same client space as
/// [`SurfaceProbe::bounding_rect`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Pointer position.
    pub client: Point,
}

impl PointerEvent {
    /// Pointer position normalized against `rect`, or `None` for an empty rect.
    pub fn normalized(self, rect: Rect) -> Option<Point> {
        let (w, h) = (rect.width(), rect.height());
        if !(w > 0.0 && h > 0.0) {
            return None;
        }
        Some(Point::new(
            (self.client.x - rect.x0) / w,
            (self.client.y - rect.y0) / h,
        ))
    }
}

/// Geometry of the element the effect is attached to.
pub trait SurfaceProbe {
    /// Layout size in device-independent pixels; zero while not laid out.
    fn measure(&self) -> Size;
    /// Bounding box in client space, used to normalize pointer events.
    fn bounding_rect(&self) -> Rect;
}

/// Host frame scheduling (an animation-frame style clock).
///
/// The host later calls [`crate::GlassController::on_frame`] with the returned token.
pub trait FrameClock {
    /// Schedule one callback on the next frame.
    fn request_frame(&mut self) -> FrameToken;
    /// Revoke a scheduled callback. Unknown or already-fired tokens are ignored.
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Where filter graphs live and where pointer events come from.
pub trait FilterHost {
    /// Insert a published graph so consumers can reference its handle.
    fn mount_filter(&mut self, graph: &FilterGraph) -> GlassResult<()>;
    /// Apply a new texture and scale to a mounted graph as one change.
    fn update_filter(&mut self, update: &FilterUpdate) -> GlassResult<()>;
    /// Remove a mounted graph. Unknown handles are ignored.
    fn unmount_filter(&mut self, handle: &FilterHandle);
    /// Start delivering pointer-move events for the surface.
    fn listen_pointer(&mut self) -> ListenerToken;
    /// Stop delivering pointer-move events. Unknown tokens are ignored.
    fn unlisten_pointer(&mut self, token: ListenerToken);
}

/// Everything a controller needs from its environment.
pub trait Host: SurfaceProbe + FrameClock + FilterHost {}

impl<T> Host for T where T: SurfaceProbe + FrameClock + FilterHost + ?Sized {}
