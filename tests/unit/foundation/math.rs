use super::*;

#[test]
fn clamp_u8_rounds_half_to_even_and_clamps() {
    assert_eq!(clamp_u8(-3.0), 0);
    assert_eq!(clamp_u8(300.0), 255);
    assert_eq!(clamp_u8(2.5), 2);
    assert_eq!(clamp_u8(3.5), 4);
    assert_eq!(clamp_u8(127.4), 127);
    assert_eq!(clamp_u8(f64::NAN), 0);
}

#[test]
fn floor_px_floors_toward_negative_infinity() {
    assert_eq!(floor_px(2.9), 2);
    assert_eq!(floor_px(-0.1), -1);
    assert_eq!(floor_px(f64::NAN), 0);
}

#[test]
fn shifted_in_bounds_rejects_both_edges() {
    assert_eq!(shifted_in_bounds(0, -1, 4), None);
    assert_eq!(shifted_in_bounds(3, 1, 4), None);
    assert_eq!(shifted_in_bounds(1, 2, 4), Some(3));
    assert_eq!(shifted_in_bounds(0, isize::MAX, 4), None);
}

#[test]
fn fnv_differs_for_different_input() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"abc");
    let mut b = Fnv1a64::new_default();
    b.write_bytes(b"abd");
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(0, 200), 0);
}
