//! Elgato Stream Deck Pedal driver.
//!
//! [`StreamDeckPedal`] opens the device through hidapi and implements
//! [`footkey_engine::EdgeSource`], turning full-state input reports into one
//! edge per changed pedal with [`KeyStates`].

mod device;
mod error;
mod report;

pub use device::{
    DEFAULT_READ_TIMEOUT_MS, ELGATO_VENDOR_ID, PEDAL_KEYS, PEDAL_PRODUCT_ID, PedalCfg, PedalInfo,
    REPORT_HEADER_LEN, StreamDeckPedal, enumerate,
};
pub use error::{Error, Result};
pub use report::KeyStates;
