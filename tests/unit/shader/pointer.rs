use super::*;

#[test]
fn untouched_accessor_is_not_read() {
    let probe = PointerProbe::new(Point::new(0.25, 0.75));
    let _ptr = probe.begin();
    assert!(!probe.was_read());
}

#[test]
fn any_accessor_marks_read_and_passes_values_through() {
    let probe = PointerProbe::new(Point::new(0.25, 0.75));

    let ptr = probe.begin();
    assert_eq!(ptr.x(), 0.25);
    assert!(probe.was_read());

    let ptr = probe.begin();
    assert!(!probe.was_read());
    assert_eq!(ptr.y(), 0.75);
    assert!(probe.was_read());

    let ptr = probe.begin();
    assert_eq!(ptr.pos(), Point::new(0.25, 0.75));
    assert!(probe.was_read());
}

#[test]
fn begin_resets_flag() {
    let probe = PointerProbe::default();
    probe.begin().x();
    assert!(probe.was_read());
    let _ = probe.begin();
    assert!(!probe.was_read());
}

#[test]
fn set_is_last_write_wins_and_does_not_mark() {
    let mut probe = PointerProbe::default();
    probe.set(Point::new(0.1, 0.1));
    probe.set(Point::new(0.9, 0.4));
    assert_eq!(probe.pos(), Point::new(0.9, 0.4));
    assert!(!probe.was_read());
}
