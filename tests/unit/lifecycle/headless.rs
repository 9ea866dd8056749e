use super::*;
use crate::lifecycle::config::GlassOpts;
use crate::lifecycle::controller::{GlassState, attach_glass};
use crate::shader::fragment::{IdentityFragment, default_fragment};

fn seeded(seed: u64) -> GlassOpts {
    GlassOpts {
        id_seed: Some(seed),
        max_measure_attempts: 4,
        ..GlassOpts::default()
    }
}

#[test]
fn tick_leaves_other_controllers_frames_pending() {
    let mut host = HeadlessHost::new(Size::new(16.0, 8.0));
    let mut a = attach_glass(&mut host, default_fragment, seeded(1)).unwrap();
    let mut b = attach_glass(&mut host, default_fragment, seeded(2)).unwrap();
    assert_eq!(host.pending_frames(), 2);

    assert_eq!(host.tick(&mut a).unwrap(), 1);
    assert_eq!(a.state(), GlassState::Ready);
    assert_eq!(host.pending_frames(), 1);
    assert_eq!(b.state(), GlassState::Measuring { attempts: 0 });

    // Ticking a controller with nothing pending fires nothing.
    assert_eq!(host.tick(&mut a).unwrap(), 0);
    assert_eq!(host.pending_frames(), 1);

    assert_eq!(host.tick(&mut b).unwrap(), 1);
    assert_eq!(b.state(), GlassState::Ready);
    assert_ne!(a.handle(), b.handle());
    assert_eq!(host.filter_count(), 2);

    a.detach(&mut host);
    b.detach(&mut host);
    assert_eq!(host.live_resources(), 0);
}

#[test]
fn failing_controller_does_not_drop_neighbor_frames() {
    let mut host = HeadlessHost::new(Size::new(64.0, 8.0));
    let tight = GlassOpts {
        max_texture_dim: 32,
        ..seeded(1)
    };
    let mut big = attach_glass(&mut host, IdentityFragment, tight).unwrap();
    let mut ok = attach_glass(&mut host, IdentityFragment, seeded(2)).unwrap();

    assert!(host.tick(&mut big).is_err());
    assert_eq!(big.state(), GlassState::Failed { attempts: 1 });
    assert_eq!(host.pending_frames(), 1);

    host.tick(&mut ok).unwrap();
    assert_eq!(ok.state(), GlassState::Ready);

    big.detach(&mut host);
    ok.detach(&mut host);
    assert_eq!(host.live_resources(), 0);
}

#[test]
fn shared_seed_collides_on_mount() {
    let mut host = HeadlessHost::new(Size::new(8.0, 8.0));
    let mut first = attach_glass(&mut host, IdentityFragment, seeded(5)).unwrap();
    let mut second = attach_glass(&mut host, IdentityFragment, seeded(5)).unwrap();
    assert_eq!(first.base_id(), second.base_id());

    host.tick(&mut first).unwrap();
    assert!(matches!(
        host.tick(&mut second),
        Err(GlassError::Validation(_))
    ));
    assert_eq!(second.state(), GlassState::Failed { attempts: 1 });
    assert_eq!(host.filter_count(), 1);
    assert!(first.handle().is_some());

    first.detach(&mut host);
    second.detach(&mut host);
    assert_eq!(host.live_resources(), 0);
}

#[test]
fn unseeded_controllers_get_distinct_ids() {
    let mut host = HeadlessHost::new(Size::new(8.0, 8.0));
    let mut ctrls: Vec<_> = (0..6)
        .map(|_| attach_glass(&mut host, IdentityFragment, GlassOpts::default()).unwrap())
        .collect();
    for c in &mut ctrls {
        host.tick(c).unwrap();
        assert_eq!(c.state(), GlassState::Ready);
    }
    assert_eq!(host.filter_count(), 6);
    for c in &mut ctrls {
        c.detach(&mut host);
    }
    assert_eq!(host.live_resources(), 0);
}
