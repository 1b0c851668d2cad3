//! # loopscene-studio
//!
//! The editing session layer: an explicitly owned mutable store around the
//! project model with a defined mutation API, the debounced preview driver,
//! the upload decode boundary, and the render-collaborator export client.
//!
//! All mutation goes through [`Session`] from a single event-processing
//! thread; the only asynchronous pieces are upload decoding (fan-out /
//! fan-in), the cancellable preview recompile, and the single-in-flight
//! export.

pub mod export;
pub mod preview;
pub mod session;
pub mod upload;

pub use export::{ExportFormat, RenderClient};
pub use preview::{PreviewDriver, PreviewFrame};
pub use session::{ExportGuard, ImageDimension, Session};
pub use upload::{decode_batch, UploadFile};
