use super::*;

#[test]
fn identity_grade_is_noop() {
    let mut data = Vec::new();
    for v in 0..=255u8 {
        data.extend_from_slice(&[v, 255 - v, v / 2, v]);
    }
    let mut buf = PixelBuffer::from_rgba(16, 16, data).unwrap();
    let before = buf.clone();
    color_grade(&mut buf, ColorGrade::default());
    assert_eq!(buf, before);
}

#[test]
fn identity_with_explicit_values_is_noop_up_to_rounding() {
    let mut buf = PixelBuffer::filled(3, 3, [1, 128, 254, 17]).unwrap();
    let grade = ColorGrade {
        contrast: 1.0 + 1e-12,
        brightness: 0.0,
        saturation: 1.0,
    };
    color_grade(&mut buf, grade);
    assert_eq!(buf.pixel(1, 1), Some([1, 128, 254, 17]));
}

#[test]
fn brightness_and_zero_saturation() {
    let mut buf = PixelBuffer::filled(1, 1, [100, 100, 100, 50]).unwrap();
    color_grade(
        &mut buf,
        ColorGrade {
            brightness: 0.2,
            ..ColorGrade::default()
        },
    );
    assert_eq!(buf.pixel(0, 0), Some([151, 151, 151, 50]));

    let mut grey = PixelBuffer::filled(1, 1, [255, 0, 0, 255]).unwrap();
    color_grade(
        &mut grey,
        ColorGrade {
            saturation: 0.0,
            ..ColorGrade::default()
        },
    );
    assert_eq!(grey.pixel(0, 0), Some([76, 76, 76, 255]));
}

#[test]
fn contrast_clamps() {
    let mut buf = PixelBuffer::filled(1, 1, [250, 10, 128, 255]).unwrap();
    color_grade(
        &mut buf,
        ColorGrade {
            contrast: 10.0,
            ..ColorGrade::default()
        },
    );
    let px = buf.pixel(0, 0).unwrap();
    assert_eq!(px[0], 255);
    assert_eq!(px[1], 0);
}

#[test]
fn from_params_falls_back_to_identity() {
    let params = GlitchParams {
        contrast: Some(1.4),
        saturation: Some(f64::NAN),
        ..GlitchParams::default()
    };
    let g = ColorGrade::from_params(&params);
    assert_eq!(g.contrast, 1.4);
    assert_eq!(g.brightness, 0.0);
    assert_eq!(g.saturation, 1.0);
    assert!(ColorGrade::from_params(&GlitchParams::default()).is_identity());
}
