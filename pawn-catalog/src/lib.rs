pub mod device;
pub mod pricing;

pub use device::{Device, DeviceError, DeviceKind, Imei};
pub use pricing::{Amount, MarkupPolicy};
