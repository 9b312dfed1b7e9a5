//! Split a pixel buffer into greyscale channel planes and join them back.

use alloc::vec::Vec;

use imgref::{ImgRef, ImgVec};
use rgb::Gray;

use crate::error::Error;
use crate::pixel::{Channel, Pixel};
use crate::region;

/// One greyscale plane per channel of `P`, in `r, g, b[, a]` order
/// (a single plane for greyscale input).
pub fn split<P: Pixel>(img: ImgRef<'_, P>) -> Vec<ImgVec<Gray<P::Channel>>> {
    let (w, h) = (img.width(), img.height());
    let zero = Gray::new(<P::Channel as bytemuck::Zeroable>::zeroed());
    let mut planes: Vec<_> = (0..P::CHANNELS)
        .map(|_| region::filled(w, h, zero))
        .collect();
    let strides: Vec<usize> = planes.iter().map(|p| p.stride()).collect();
    for (y, row) in img.rows().enumerate() {
        for (x, px) in row.iter().enumerate() {
            let values = [px.red(), px.green(), px.blue(), px.alpha_value()];
            let values: &[P::Channel] = if P::IS_GREY { &values[..1] } else { &values };
            for ((plane, stride), v) in planes.iter_mut().zip(&strides).zip(values) {
                plane.buf_mut()[y * stride + x] = Gray::new(*v);
            }
        }
    }
    log::debug!("split {w}x{h} into {} planes", planes.len());
    planes
}

/// Interleave greyscale planes into pixels of type `P`.
///
/// Needs exactly `P::CHANNELS` planes of one size.
///
/// # Errors
///
/// [`Error::InvalidArgument`] for the wrong number of planes,
/// [`Error::SizeMismatch`] if the planes differ in size.
pub fn join<P: Pixel>(planes: &[ImgRef<'_, Gray<P::Channel>>]) -> Result<ImgVec<P>, Error> {
    if planes.len() != P::CHANNELS {
        return Err(Error::InvalidArgument("plane count does not match the pixel layout"));
    }
    let (w, h) = match planes.first() {
        Some(p) => (p.width(), p.height()),
        None => return Err(Error::InvalidArgument("no planes to join")),
    };
    if planes.iter().any(|p| p.width() != w || p.height() != h) {
        return Err(Error::SizeMismatch);
    }
    let mut out = region::filled(w, h, <P as bytemuck::Zeroable>::zeroed());
    let stride = out.stride();
    let buf = out.buf_mut();
    for y in 0..h {
        for x in 0..w {
            let v = |i: usize| planes[i][(x, y)].value();
            buf[y * stride + x] = if P::IS_GREY {
                P::from_luma(v(0), P::Channel::MAX)
            } else if P::HAS_ALPHA {
                P::from_rgba(v(0), v(1), v(2), v(3))
            } else {
                P::from_rgb(v(0), v(1), v(2))
            };
        }
    }
    log::debug!("joined {} planes into {w}x{h}", planes.len());
    Ok(out)
}
