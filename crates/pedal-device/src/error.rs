use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for pedal device operations.
pub type Result<T> = StdResult<T, Error>;

/// Errors raised while opening or reading the pedal.
#[derive(Debug, Error)]
pub enum Error {
    /// Failure reported by the HID layer.
    #[error("HID error: {0}")]
    Hid(#[from] hidapi::HidError),

    /// No device with the configured ids is attached.
    #[error("No pedal found (VID=0x{vendor_id:04x}, PID=0x{product_id:04x})")]
    NotFound {
        /// USB vendor id searched for.
        vendor_id: u16,
        /// USB product id searched for.
        product_id: u16,
    },

    /// An input report was too short to hold every pedal.
    #[error("Short input report: got {len} bytes, need {need}")]
    ShortReport {
        /// Bytes received.
        len: usize,
        /// Header plus one byte per pedal.
        need: usize,
    },
}
