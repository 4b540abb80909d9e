mod noop;
mod traits;

pub use noop::NoOpBackendPlugin;
pub use traits::LocomotionBackend;
