#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use kernelgrid_image as image;

#[doc(inline)]
pub use kernelgrid_imgproc as imgproc;
