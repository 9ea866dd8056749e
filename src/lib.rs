//! Liquid glass turns a fragment function into a displacement-map filter for a surface.
//!
//! A fragment function maps a normalized surface coordinate (and optionally the pointer) to the
//! coordinate that pixel should be sampled from. This crate evaluates it over the surface's pixel
//! grid, quantizes the resulting vector field into an RGBA texture, and keeps a two-stage filter
//! graph (image source, then displacement map) published in a host compositor.
//!
//! # Pipeline overview
//!
//! 1. **Evaluate**: `FragmentFn + TextureSize + PointerProbe -> DisplacementField`
//! 2. **Encode**: `DisplacementField -> DisplacementTexture` (R = dx, G = dy, plus a scale)
//! 3. **Publish**: `DisplacementTexture -> FilterGraph` (image href and scale swapped together)
//! 4. **Drive**: [`GlassController`] waits for the surface to be measured, rebuilds on resize,
//!    and re-evaluates on pointer movement only when the fragment actually reads the pointer.
//!
//! The host environment (DOM, compositor, or [`HeadlessHost`] for tests) is reached through the
//! [`SurfaceProbe`], [`FrameClock`] and [`FilterHost`] traits.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod filter;
mod foundation;
mod lifecycle;
mod shader;

pub use crate::filter::displace::apply_displacement;
pub use crate::filter::graph::{
    ChannelSelector, FeDisplacementMap, FeImage, FilterGraph, FilterHandle, FilterUpdate,
    generate_base_id,
};
pub use crate::filter::post::{PostFx, apply_post, backdrop_filter};
pub use crate::foundation::core::{Point, Rect, Size, TextureSize, Vec2};
pub use crate::foundation::error::{GlassError, GlassResult};
pub use crate::foundation::math::{length, mix, rounded_rect_sdf, smoothstep};
pub use crate::lifecycle::config::GlassOpts;
pub use crate::lifecycle::controller::{GlassController, GlassState, attach_glass};
pub use crate::lifecycle::headless::{HeadlessHost, HostStats, MountedFilter};
pub use crate::lifecycle::host::{
    FilterHost, FrameClock, FrameToken, Host, ListenerToken, PointerEvent, SurfaceProbe,
};
pub use crate::shader::field::{DisplacementField, evaluate_field};
pub use crate::shader::fragment::{
    FragmentFn, IdentityFragment, LensFragment, LensShape, default_fragment, fragment_fn,
    lens_fragment,
};
pub use crate::shader::pointer::{ObservedPointer, PointerProbe};
pub use crate::shader::texture::{
    DisplacementTexture, NEUTRAL_CHANNEL, decode_channel, encode_texture,
};
