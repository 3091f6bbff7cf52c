#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use facewarp_3d as k3d;

#[doc(inline)]
pub use facewarp_linalg as linalg;

#[doc(inline)]
pub use facewarp_registration as registration;

#[doc(inline)]
pub use facewarp_tps as tps;
