//! Frame execution
//!
//! - [`FrameDriver`]: runs the per-camera layer protocol over a composition
//! - [`Culler`]: visibility seam, with [`FrustumCuller`] as the default
//! - [`DrawSubmitter`]: draw submission seam implemented by the backend

pub mod cull;
pub mod frame;
pub mod submit;

pub use cull::{Culler, FrustumCuller, NoCulling};
pub use frame::{FrameDriver, FrameStats};
pub use submit::{DrawCall, DrawSubmitter};
