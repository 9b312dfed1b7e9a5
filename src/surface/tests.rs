use super::*;
use crate::pixel::{Grey8, Grey16, GreyF32, Rgb8, Rgba8, Rgba16, RgbaF32};
use alloc::vec;

fn sz(w: u32, h: u32) -> Size {
    Size::new(w, h)
}

#[test]
fn new_fills_with_converted_color() {
    let s = Surface::new(PixelFormat::Rgba16, sz(3, 2), Color::new(1.0, 0.0, 0.5, 1.0));
    assert_eq!(s.format(), PixelFormat::Rgba16);
    assert_eq!(s.size(), sz(3, 2));
    assert_eq!(s.pitch(), 3 * 8);
    let img = s.as_img::<Rgba16>().unwrap();
    assert!(img.rows().flatten().all(|p| *p == Rgba16::new(65535, 0, 32767, 65535)));
    assert!(s.as_img::<Rgba8>().is_none());
}

#[test]
fn every_format_constructs_and_reads_back() {
    for format in PixelFormat::ALL {
        let s = Surface::new(format, sz(2, 2), Color::WHITE);
        assert_eq!(s.format(), format);
        assert_eq!(s.get_pixel(1, 1), Some(Color::WHITE), "{format}");
        assert_eq!(s.get_pixel(2, 0), None);
        assert_eq!(s.get_pixel(-1, 0), None);
    }
}

#[test]
fn zero_sized_surfaces_are_allowed() {
    let mut s = Surface::new(PixelFormat::Rgb8, sz(0, 5), Color::WHITE);
    assert_eq!(s.size(), sz(0, 5));
    s.fill(Color::BLACK);
    s.blit(Surface::new(PixelFormat::Grey8, sz(2, 2), Color::WHITE).view(), Point::ORIGIN);
    assert_eq!(s.get_pixel(0, 0), None);
    assert_eq!(s.sub_view(Rect::new(0, 0, 10, 10)), None);
}

#[test]
fn put_pixel_clips() {
    let mut s = Surface::new(PixelFormat::Grey8, sz(2, 2), Color::BLACK);
    s.put_pixel(1, 0, Color::WHITE);
    s.put_pixel(2, 0, Color::WHITE);
    s.put_pixel(-1, 1, Color::WHITE);
    s.put_pixel(i32::MAX, i32::MAX, Color::WHITE);
    let img = s.as_img::<Grey8>().unwrap();
    let v: Vec<u8> = img.rows().flatten().map(|p| p.value()).collect();
    assert_eq!(v, [0, 255, 0, 0]);
}

#[test]
fn from_bytes_wraps_strided_memory() {
    // 2×2 RGB8 with a 9-byte pitch: one padding pixel per row.
    let mut bytes = vec![0xEEu8; 9 + 6];
    {
        let mut s = SurfaceMut::from_bytes(PixelFormat::Rgb8, &mut bytes, 2, 2, 9).unwrap();
        assert_eq!(s.pitch(), 9);
        s.fill(Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(s.view().row_bytes(1), Some(&[255, 0, 0, 255, 0, 0][..]));
    }
    assert_eq!(&bytes[..6], &[255, 0, 0, 255, 0, 0]);
    assert_eq!(&bytes[6..9], &[0xEE, 0xEE, 0xEE]);
    assert_eq!(&bytes[9..], &[255, 0, 0, 255, 0, 0]);
}

#[test]
fn from_bytes_rejects_bad_layouts() {
    fn err(r: Result<SurfaceMut<'_>, Error>) -> Error {
        r.map(|_| ()).unwrap_err()
    }
    let mut bytes = vec![0u8; 16];

    assert_eq!(
        err(SurfaceMut::from_bytes(PixelFormat::Rgba8, &mut bytes, 2, 3, 8)),
        Error::BufferTooSmall
    );
    assert!(matches!(
        err(SurfaceMut::from_bytes(PixelFormat::Rgba8, &mut bytes, 2, 2, 4)),
        Error::InvalidArgument(_)
    ));
    assert_eq!(
        err(SurfaceMut::from_bytes(PixelFormat::Grey16, &mut bytes, 1, 2, 5)),
        Error::Misaligned
    );
    assert!(matches!(
        err(SurfaceMut::from_bytes(PixelFormat::Grey8, &mut bytes, 0, 2, 4)),
        Error::InvalidArgument(_)
    ));
    assert_eq!(
        err(SurfaceMut::from_bytes(PixelFormat::Grey8, &mut bytes, 1, usize::MAX, usize::MAX)),
        Error::BufferTooSmall
    );
}

#[test]
fn from_bytes_accepts_rgb_rows_padded_to_four_bytes() {
    let mut bytes = [0xEEu8; 32];
    {
        let mut s = SurfaceMut::from_bytes(PixelFormat::Rgb8, &mut bytes, 5, 2, 16).unwrap();
        assert!(matches!(s, SurfaceMut::Padded(_)));
        assert_eq!((s.width(), s.height(), s.pitch()), (5, 2, 16));
        s.fill(Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(s.get_pixel(4, 1), Some(Color::rgb(1.0, 0.0, 0.0)));
        assert_eq!(s.get_pixel(5, 1), None);
        assert_eq!(s.view().row_bytes(1).map(<[u8]>::len), Some(15));
        assert!(s.as_img_mut::<Rgb8>().is_none());
    }
    let red: Vec<u8> = [255, 0, 0].repeat(5);
    assert_eq!(&bytes[..15], &red[..]);
    assert_eq!(bytes[15], 0xEE);
    assert_eq!(&bytes[16..31], &red[..]);
    assert_eq!(bytes[31], 0xEE);
}

/// The operations every writable surface supports, in one fixed sequence.
fn scribble(s: &mut SurfaceMut<'_>, pattern: SurfaceRef<'_>, glass: SurfaceRef<'_>) {
    let red = Color::rgb(1.0, 0.0, 0.0);
    let blue = Color::rgb(0.0, 0.0, 1.0);
    s.fill(Color::BLACK);
    s.fill_checkerboard(Rect::new(-1, 1, 6, 5), sz(2, 3), red, blue).unwrap();
    s.blit_rect(pattern, Rect::new(1, 0, 3, 3), Point::new(5, -1));
    s.blend(glass, Rect::new(0, 0, 4, 2), Point::new(-1, 3));
    s.blend_add(glass, Rect::new(1, 0, 3, 2), Point::new(2, 2));
    s.blit_scaled(pattern, Rect::new(0, 0, 3, 3), Rect::new(3, 1, 8, 4));
    s.fill_rect(Rect::new(0, 4, 2, 9), Color::WHITE);
    s.put_pixel(6, 0, Color::rgb(0.0, 1.0, 0.0));
    s.invert();
    s.tint(Color::new(1.0, 0.5, 0.25, 0.5));
}

#[test]
fn padded_rows_behave_like_a_contiguous_surface() {
    let mut pattern = Surface::new(PixelFormat::Rgba8, sz(3, 3), Color::BLACK);
    for (i, (x, y)) in [(0, 0), (1, 0), (2, 1), (1, 2), (0, 2)].into_iter().enumerate() {
        let v = (i + 1) as f32 / 5.0;
        pattern.put_pixel(x, y, Color::rgb(v, 1.0 - v, v * 0.5));
    }
    let glass = Surface::new(PixelFormat::RgbaF32, sz(4, 2), Color::new(0.0, 0.2, 1.0, 0.5));

    let mut compact = Surface::new(PixelFormat::Rgb8, sz(7, 5), Color::WHITE);
    scribble(&mut compact.view_mut(), pattern.view(), glass.view());

    let mut bytes = vec![0xAAu8; 4 * 22 + 21];
    let mut copy = Surface::new(PixelFormat::Rgb8, sz(7, 5), Color::WHITE);
    let mut other = vec![0u8; 4 * 22 + 21];
    {
        let mut padded =
            SurfaceMut::from_bytes(PixelFormat::Rgb8, &mut bytes, 7, 5, 22).unwrap();
        scribble(&mut padded, pattern.view(), glass.view());
        assert_eq!(padded.view(), compact.view());

        // as a source
        let view = padded.view();
        copy.blit(view, Point::ORIGIN);
        assert_eq!(copy, compact);
        assert_eq!(view.to_surface(), compact);
        assert_eq!(view.convert(PixelFormat::Rgba16), compact.convert(PixelFormat::Rgba16));
        assert_eq!(view.transform(Transform::Rotate90), compact.transform(Transform::Rotate90));
        assert_eq!(view.split_channels(), compact.split_channels());
        let inner = Rect::new(2, 1, 5, 4);
        assert_eq!(view.sub_view(inner), compact.sub_view(inner));
        assert_eq!(view.get_pixel(3, 2), compact.get_pixel(3, 2));

        // padded onto padded
        let mut target =
            SurfaceMut::from_bytes(PixelFormat::Rgb8, &mut other, 7, 5, 22).unwrap();
        target.blit_rect(view, inner, Point::new(4, 3));
        let mut expected = Surface::new(PixelFormat::Rgb8, sz(7, 5), Color::BLACK);
        expected.blit_rect(compact.view(), inner, Point::new(4, 3));
        assert_eq!(target.view(), expected.view());

        let mut sub = padded.sub_view_mut(inner).unwrap();
        sub.fill(Color::WHITE);
        let mut compact_sub = compact.sub_view_mut(inner).unwrap();
        compact_sub.fill(Color::WHITE);
        assert_eq!(padded.view(), compact.view());
    }
    for pad in [21, 43, 65, 87] {
        assert_eq!(bytes[pad], 0xAA, "padding byte {pad} was written");
    }
}

#[test]
fn padded_checkerboard_rejects_empty_cells() {
    let mut bytes = [0u8; 8];
    let mut s = SurfaceMut::from_bytes(PixelFormat::Rgb8, &mut bytes, 1, 2, 4).unwrap();
    let r = s.fill_checkerboard(Rect::new(0, 0, 1, 2), sz(0, 1), Color::WHITE, Color::BLACK);
    assert!(matches!(r, Err(Error::InvalidArgument(_))));
}

#[test]
fn from_bytes_reports_misaligned_memory() {
    // A u16 buffer guarantees 2-byte alignment; offsetting by one breaks it.
    let mut backing = vec![0u16; 8];
    let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut backing);
    let r = SurfaceMut::from_bytes(PixelFormat::Grey16, &mut bytes[1..], 2, 2, 4);
    assert_eq!(r.map(|_| ()).unwrap_err(), Error::Misaligned);
}

#[test]
fn equality_ignores_padding() {
    let grey = |v: &[u8]| v.iter().copied().map(Grey8::new).collect::<Vec<_>>();
    let a = ImgVec::new_stride(grey(&[1, 2, 99, 3, 4, 77]), 2, 2, 3);
    let b = ImgVec::new(grey(&[1, 2, 3, 4]), 2, 2);
    let (a, b) = (Surface::from_img(a), Surface::from(b));
    assert_eq!(a, b);
    assert_ne!(a.pitch(), b.pitch());

    let grey16 = a.convert(PixelFormat::Grey16);
    assert_ne!(a, grey16);
    assert_eq!(grey16.convert(PixelFormat::Grey8), b);
}

#[test]
fn convert_between_formats() {
    let s = Surface::new(PixelFormat::RgbaF32, sz(2, 1), Color::new(1.0, 0.5, 0.0, 0.25));
    let c = s.convert(PixelFormat::Rgba8);
    assert_eq!(c.as_img::<Rgba8>().unwrap().buf()[0], Rgba8::new(255, 127, 0, 63));
    let g = s.convert(PixelFormat::GreyF32);
    assert_eq!(g.as_img::<GreyF32>().unwrap().buf()[1].value(), 0.5);
}

#[test]
fn blit_and_blend_across_formats() {
    let mut dst = Surface::new(PixelFormat::Rgb8, sz(3, 3), Color::BLACK);
    let src = Surface::new(PixelFormat::RgbaF32, sz(2, 2), Color::new(1.0, 1.0, 1.0, 0.0));
    dst.blend(src.view(), Rect::new(0, 0, 2, 2), Point::new(2, 2));
    assert_eq!(dst, Surface::new(PixelFormat::Rgb8, sz(3, 3), Color::BLACK));

    dst.blit(src.view(), Point::new(2, 2));
    assert_eq!(dst.get_pixel(2, 2), Some(Color::WHITE));
    assert_eq!(dst.get_pixel(1, 1), Some(Color::BLACK));
}

#[test]
fn blend_add_zero_alpha_is_identity() {
    let mut dst = Surface::new(PixelFormat::RgbaF32, sz(2, 2), Color::new(0.1, 0.2, 0.3, 0.4));
    let before = dst.clone();
    let src = Surface::new(PixelFormat::Rgba16, sz(2, 2), Color::new(1.0, 1.0, 1.0, 0.0));
    dst.blend_add(src.view(), Rect::new(0, 0, 2, 2), Point::ORIGIN);
    assert_eq!(dst, before);
}

#[test]
fn blit_scaled_between_views() {
    let src = Surface::from_img(ImgVec::new(
        vec![Grey8::new(1), Grey8::new(2), Grey8::new(3), Grey8::new(4)],
        2,
        2,
    ));
    let mut dst = Surface::new(PixelFormat::Grey16, sz(4, 4), Color::BLACK);
    dst.blit_scaled(src.view(), Rect::new(0, 0, 2, 2), Rect::new(0, 0, 4, 4));
    let img = dst.as_img::<Grey16>().unwrap();
    assert_eq!(img.buf()[5].value(), 257);
    assert_eq!(img.buf()[15].value(), 4 * 257);
}

#[test]
fn sub_views_write_through() {
    let mut s = Surface::new(PixelFormat::Rgba8, sz(4, 4), Color::BLACK);
    {
        let mut sub = s.sub_view_mut(Rect::new(2, 2, 10, 10)).unwrap();
        assert_eq!(sub.size(), sz(2, 2));
        sub.fill(Color::WHITE);
        sub.put_pixel(0, 0, Color::rgb(0.0, 0.0, 1.0));
    }
    assert_eq!(s.get_pixel(1, 1), Some(Color::BLACK));
    assert_eq!(s.get_pixel(3, 3), Some(Color::WHITE));
    assert_eq!(s.get_pixel(2, 2), Some(Color::rgb(0.0, 0.0, 1.0)));

    let view = s.sub_view(Rect::new(3, 3, 4, 4)).unwrap();
    assert_eq!(view.get_pixel(0, 0), Some(Color::WHITE));
    assert_eq!(view.to_surface(), Surface::new(PixelFormat::Rgba8, sz(1, 1), Color::WHITE));
    assert!(s.sub_view(Rect::new(4, 0, 8, 8)).is_none());
}

#[test]
fn checkerboard_through_surface() {
    let mut s = Surface::new(PixelFormat::Grey8, sz(4, 2), Color::BLACK);
    s.fill_checkerboard(Rect::new(0, 0, 4, 2), sz(2, 2), Color::WHITE, Color::BLACK)
        .unwrap();
    assert_eq!(s.row_bytes(0), Some(&[255, 255, 0, 0][..]));
    assert!(matches!(
        s.fill_checkerboard(Rect::new(0, 0, 4, 2), sz(0, 0), Color::WHITE, Color::BLACK),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn row_bytes_mut_edits_pixels() {
    let mut s = Surface::new(PixelFormat::Rgb8, sz(2, 2), Color::BLACK);
    s.row_bytes_mut(1).unwrap()[3] = 9;
    assert_eq!(s.as_img::<Rgb8>().unwrap().buf()[3], Rgb8::new(9, 0, 0));
    assert!(s.row_bytes_mut(2).is_none());
}

#[test]
fn transform_swaps_dimensions() {
    let mut s = Surface::new(PixelFormat::Grey8, sz(3, 1), Color::BLACK);
    s.put_pixel(0, 0, Color::WHITE);
    let r = s.transform(Transform::Rotate90);
    assert_eq!(r.size(), sz(1, 3));
    assert_eq!(r.get_pixel(0, 0), Some(Color::WHITE));
    assert_eq!(r.get_pixel(0, 2), Some(Color::BLACK));
}

#[test]
fn filters_dispatch() {
    let mut s = Surface::new(PixelFormat::Rgba8, sz(1, 1), Color::from_rgba8(0, 100, 200, 255));
    s.invert();
    assert_eq!(s.get_pixel(0, 0), Some(Color::from_rgba8(255, 155, 55, 255)));
    s.desaturate();
    assert_eq!(s.get_pixel(0, 0), Some(Color::from_rgba8(155, 155, 155, 255)));
    s.tint(Color::new(0.0, 1.0, 1.0, 1.0));
    assert_eq!(s.get_pixel(0, 0), Some(Color::from_rgba8(0, 155, 155, 255)));

    let mut half = Surface::new(PixelFormat::RgbaF32, sz(1, 1), Color::new(1.0, 1.0, 1.0, 0.5));
    half.premultiply();
    assert_eq!(half.get_pixel(0, 0), Some(Color::new(0.5, 0.5, 0.5, 0.5)));
    half.unpremultiply();
    assert_eq!(half.get_pixel(0, 0), Some(Color::new(1.0, 1.0, 1.0, 0.5)));
}

#[test]
fn split_and_join_channels() {
    let s = Surface::new(PixelFormat::Rgba16, sz(3, 2), Color::new(1.0, 0.0, 0.0, 0.5));
    let planes = s.split_channels();
    assert_eq!(planes.len(), 4);
    assert!(planes.iter().all(|p| p.format() == PixelFormat::Grey16));
    assert_eq!(planes[0].get_pixel(2, 1), Some(Color::WHITE));
    let alpha = planes[3].as_img::<Grey16>().unwrap();
    assert!(alpha.rows().flatten().all(|p| p.value() == 32767));

    let views: Vec<_> = planes.iter().map(Surface::view).collect();
    assert_eq!(Surface::join_channels(&views).unwrap(), s);
    let rgb = Surface::join_channels(&views[..3]).unwrap();
    assert_eq!(rgb.format(), PixelFormat::Rgb16);
}

#[test]
fn join_channels_errors() {
    let a = Surface::new(PixelFormat::Grey8, sz(2, 2), Color::BLACK);
    let b = Surface::new(PixelFormat::Grey8, sz(3, 2), Color::BLACK);
    let f = Surface::new(PixelFormat::GreyF32, sz(2, 2), Color::BLACK);
    let c = Surface::new(PixelFormat::Rgb8, sz(2, 2), Color::BLACK);

    assert!(matches!(Surface::join_channels(&[]), Err(Error::InvalidArgument(_))));
    assert!(matches!(
        Surface::join_channels(&[a.view(), a.view()]),
        Err(Error::InvalidArgument(_))
    ));
    assert_eq!(
        Surface::join_channels(&[a.view(), a.view(), b.view()]),
        Err(Error::SizeMismatch)
    );
    assert_eq!(
        Surface::join_channels(&[a.view(), f.view(), a.view()]),
        Err(Error::FormatMismatch)
    );
    assert_eq!(Surface::join_channels(&[c.view()]), Err(Error::FormatMismatch));
}

#[test]
fn downcast_round_trip() {
    let img = ImgVec::new(vec![RgbaF32::new(0.0, 0.25, 0.5, 1.0); 4], 2, 2);
    let s = Surface::from_img(img.clone());
    let s = match s.into_img::<Rgb8>() {
        Ok(_) => panic!("wrong type downcast"),
        Err(s) => s,
    };
    assert_eq!(s.into_img::<RgbaF32>().unwrap().buf(), img.buf());

    let mut bytes = vec![0u8; 4];
    let mut m = SurfaceMut::from_bytes(PixelFormat::Grey8, &mut bytes, 2, 2, 2).unwrap();
    m.as_img_mut::<Grey8>().unwrap().buf_mut()[3] = Grey8::new(5);
    assert!(m.as_img_mut::<Grey16>().is_none());
    assert_eq!(m.get_pixel(1, 1), Some(Color::from_rgba8(5, 5, 5, 255)));
    let debug = alloc::format!("{m:?}");
    assert!(debug.contains("Grey8"));
}
