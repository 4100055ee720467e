use super::*;

#[test]
fn zero_opacity_is_noop() {
    let mut buf = PixelBuffer::filled(4, 5, [11, 22, 33, 44]).unwrap();
    let before = buf.clone();
    scanlines(&mut buf, 0.0);
    assert_eq!(buf, before);
}

#[test]
fn full_opacity_blacks_out_even_rows_only() {
    let mut buf = PixelBuffer::filled(3, 5, [11, 22, 33, 44]).unwrap();
    scanlines(&mut buf, 1.0);
    for y in 0..5 {
        for x in 0..3 {
            let expected = if y % 2 == 0 { [0, 0, 0, 44] } else { [11, 22, 33, 44] };
            assert_eq!(buf.pixel(x, y), Some(expected));
        }
    }
}

#[test]
fn out_of_range_opacity_saturates() {
    let mut buf = PixelBuffer::filled(1, 1, [100, 200, 5, 1]).unwrap();
    scanlines(&mut buf, -1.0);
    assert_eq!(buf.pixel(0, 0), Some([200, 255, 10, 1]));
}
