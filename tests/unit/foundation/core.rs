use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let fps = Fps::whole(30).unwrap();
    assert_eq!(fps.as_f64(), 30.0);
}

#[test]
fn pixel_buffer_rejects_empty_dimensions() {
    assert!(PixelBuffer::new(0, 4).is_err());
    assert!(PixelBuffer::new(4, 0).is_err());
    assert!(PixelBuffer::new(1, 1).is_ok());
}

#[test]
fn from_rgba_checks_length() {
    assert!(PixelBuffer::from_rgba(2, 2, vec![0u8; 15]).is_err());
    let buf = PixelBuffer::from_rgba(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert_eq!(buf.pixel(1, 0), Some([5, 6, 7, 8]));
    assert_eq!(buf.pixel(2, 0), None);
    assert_eq!(buf.pixel(0, 1), None);
}

#[test]
fn filled_repeats_color() {
    let buf = PixelBuffer::filled(3, 2, [9, 8, 7, 6]).unwrap();
    assert_eq!(buf.as_bytes().len(), 24);
    assert!(buf.as_bytes().chunks_exact(4).all(|px| px == [9, 8, 7, 6]));
}

#[test]
fn copy_from_replaces_contents_and_dimensions() {
    let mut buf = PixelBuffer::new(1, 1).unwrap();
    buf.copy_from(2, 1, &[1, 1, 1, 1, 2, 2, 2, 2]).unwrap();
    assert_eq!((buf.width(), buf.height()), (2, 1));
    assert_eq!(buf.pixel(1, 0), Some([2, 2, 2, 2]));
    assert!(buf.copy_from(2, 2, &[0u8; 4]).is_err());
}

#[test]
fn digest_tracks_dimensions_and_bytes() {
    let a = PixelBuffer::filled(2, 2, [1, 2, 3, 4]).unwrap();
    let b = PixelBuffer::filled(4, 1, [1, 2, 3, 4]).unwrap();
    let c = PixelBuffer::filled(2, 2, [1, 2, 3, 5]).unwrap();
    assert_eq!(a.digest(), a.clone().digest());
    assert_ne!(a.digest(), b.digest());
    assert_ne!(a.digest(), c.digest());
}
