use crate::foundation::core::Point;
use std::sync::atomic::{AtomicBool, Ordering};

/// Last-known pointer position plus a record of whether an evaluation consulted it.
///
/// The position is normalized against the surface bounding box, so `(0, 0)` is the top-left
/// corner and `(1, 1)` the bottom-right. Values outside that range are kept as-is.
#[derive(Debug, Default)]
pub struct PointerProbe {
    pos: Point,
    read: AtomicBool,
}

impl PointerProbe {
    /// Create a probe holding `pos`.
    pub fn new(pos: Point) -> Self {
        Self {
            pos,
            read: AtomicBool::new(false),
        }
    }

    /// Current stored position, without marking it as read.
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Overwrite the stored position. Later writes replace earlier ones.
    pub fn set(&mut self, pos: Point) {
        self.pos = pos;
    }

    /// Reset the read flag and hand out an accessor for one evaluation.
    pub fn begin(&self) -> ObservedPointer<'_> {
        self.read.store(false, Ordering::Relaxed);
        ObservedPointer { probe: self }
    }

    /// Whether any accessor handed out by the last [`PointerProbe::begin`] was read.
    pub fn was_read(&self) -> bool {
        self.read.load(Ordering::Relaxed)
    }
}

impl Clone for PointerProbe {
    fn clone(&self) -> Self {
        Self {
            pos: self.pos,
            read: AtomicBool::new(self.was_read()),
        }
    }
}

/// Read-recording view of the pointer handed to fragment functions.
///
/// Every accessor returns the stored value unchanged and flags the owning probe.
#[derive(Clone, Copy, Debug)]
pub struct ObservedPointer<'a> {
    probe: &'a PointerProbe,
}

impl ObservedPointer<'_> {
    /// Horizontal pointer coordinate.
    pub fn x(&self) -> f64 {
        self.mark();
        self.probe.pos.x
    }

    /// Vertical pointer coordinate.
    pub fn y(&self) -> f64 {
        self.mark();
        self.probe.pos.y
    }

    /// Both coordinates.
    pub fn pos(&self) -> Point {
        self.mark();
        self.probe.pos
    }

    fn mark(&self) {
        self.probe.read.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shader/pointer.rs"]
mod tests;
