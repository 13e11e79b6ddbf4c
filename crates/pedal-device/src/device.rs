//! Stream Deck Pedal over hidapi.

use std::{ffi::CString, time::Duration};

use footkey_engine::{EdgeEvent, EdgeSource};
use hidapi::{HidApi, HidDevice};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::{
    error::{Error, Result},
    report::KeyStates,
};

/// Elgato USB vendor id.
pub const ELGATO_VENDOR_ID: u16 = 0x0fd9;
/// Stream Deck Pedal product id.
pub const PEDAL_PRODUCT_ID: u16 = 0x0086;
/// Physical pedals on the device.
pub const PEDAL_KEYS: usize = 3;
/// Bytes preceding the pedal states in an input report.
pub const REPORT_HEADER_LEN: usize = 4;
/// Default blocking read timeout.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 100;

/// Device selection and report layout.
#[derive(Clone, Debug)]
pub struct PedalCfg {
    /// USB vendor id.
    pub vendor_id: u16,
    /// USB product id.
    pub product_id: u16,
    /// Number of pedals.
    pub keys: usize,
    /// Report header length.
    pub header_len: usize,
    /// Upper bound on a single blocking read; cancellation is noticed between
    /// reads.
    pub read_timeout: Duration,
}

impl Default for PedalCfg {
    fn default() -> Self {
        Self {
            vendor_id: ELGATO_VENDOR_ID,
            product_id: PEDAL_PRODUCT_ID,
            keys: PEDAL_KEYS,
            header_len: REPORT_HEADER_LEN,
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
        }
    }
}

impl PedalCfg {
    /// Read timeout in the form hidapi expects.
    fn read_timeout_ms(&self) -> i32 {
        i32::try_from(self.read_timeout.as_millis()).unwrap_or(i32::MAX)
    }
}

/// An attached pedal, as reported by enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PedalInfo {
    /// Platform device path, as passed to `HidApi::open_path`.
    pub path: CString,
    /// Product string, if the device reports one.
    pub product: Option<String>,
    /// Serial number, if the device reports one.
    pub serial: Option<String>,
}

/// List attached devices matching `cfg`.
pub fn enumerate(cfg: &PedalCfg) -> Result<Vec<PedalInfo>> {
    let api = HidApi::new()?;
    Ok(matching(&api, cfg))
}

/// Devices known to `api` that match `cfg`.
fn matching(api: &HidApi, cfg: &PedalCfg) -> Vec<PedalInfo> {
    api.device_list()
        .filter(|d| d.vendor_id() == cfg.vendor_id && d.product_id() == cfg.product_id)
        .map(|d| PedalInfo {
            path: d.path().to_owned(),
            product: d.product_string().map(str::to_string),
            serial: d.serial_number().map(str::to_string),
        })
        .collect()
}

/// First of the `found` devices, or `NotFound`.
fn first_match(found: Vec<PedalInfo>, cfg: &PedalCfg) -> Result<PedalInfo> {
    found.into_iter().next().ok_or(Error::NotFound {
        vendor_id: cfg.vendor_id,
        product_id: cfg.product_id,
    })
}

/// An open Stream Deck Pedal.
pub struct StreamDeckPedal {
    /// HID handle.
    device: HidDevice,
    /// Report layout and timeouts.
    cfg: PedalCfg,
    /// Pedal state from the last report.
    states: KeyStates,
}

impl StreamDeckPedal {
    /// Open the first device matching `cfg`.
    pub fn open(cfg: PedalCfg) -> Result<Self> {
        let api = HidApi::new()?;
        let found = first_match(matching(&api, &cfg), &cfg)?;
        let device = api.open_path(&found.path)?;
        info!(
            vid = format_args!("0x{:04x}", cfg.vendor_id),
            pid = format_args!("0x{:04x}", cfg.product_id),
            path = %found.path.to_string_lossy(),
            serial = ?found.serial,
            "pedal_opened"
        );
        let states = KeyStates::new(cfg.keys, cfg.header_len);
        Ok(Self {
            device,
            cfg,
            states,
        })
    }

    /// Pedal state from the last report.
    pub fn states(&self) -> &KeyStates {
        &self.states
    }
}

impl EdgeSource for StreamDeckPedal {
    type Error = Error;

    fn run(
        &mut self,
        stop: &CancellationToken,
        sink: &mut dyn FnMut(EdgeEvent),
    ) -> Result<()> {
        let timeout = self.cfg.read_timeout_ms();
        // Room for reports longer than the pedal layout.
        let mut buf = vec![0u8; self.states.report_len().max(64)];
        while !stop.is_cancelled() {
            let n = self.device.read_timeout(&mut buf, timeout)?;
            if n == 0 {
                continue;
            }
            match self.states.update(&buf[..n]) {
                Ok(edges) => {
                    for ev in edges {
                        trace!(pedal = ev.pedal, pressed = ev.pressed, "pedal_edge");
                        sink(ev);
                    }
                }
                Err(e) => debug!(error = %e, "pedal_report_skipped"),
            }
        }
        debug!("pedal_read_loop_stopped");
        Ok(())
    }
}
