//! Input report decoding.

use footkey_engine::{EdgeEvent, PedalIndex};

use crate::error::{Error, Result};

/// Last known pressed state of every pedal.
///
/// Reports carry the full state of all pedals; [`KeyStates::update`] turns
/// successive reports into edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyStates {
    /// Bytes preceding the first pedal byte.
    header_len: usize,
    /// Pressed state by pedal index.
    pressed: Vec<bool>,
}

impl KeyStates {
    /// All `keys` pedals released.
    pub fn new(keys: usize, header_len: usize) -> Self {
        Self {
            header_len,
            pressed: vec![false; keys],
        }
    }

    /// Minimum report length.
    pub fn report_len(&self) -> usize {
        self.header_len + self.pressed.len()
    }

    /// Pressed state by pedal index.
    pub fn pressed(&self) -> &[bool] {
        &self.pressed
    }

    /// Apply a report, returning one edge per changed pedal in index order.
    ///
    /// A non-zero pedal byte means pressed. Short reports leave the state
    /// untouched.
    pub fn update(&mut self, report: &[u8]) -> Result<Vec<EdgeEvent>> {
        let need = self.report_len();
        if report.len() < need {
            return Err(Error::ShortReport {
                len: report.len(),
                need,
            });
        }
        let mut edges = Vec::new();
        let bytes = &report[self.header_len..need];
        for (i, (state, byte)) in self.pressed.iter_mut().zip(bytes).enumerate() {
            let now = *byte != 0;
            if now == *state {
                continue;
            }
            *state = now;
            // Pedal counts are far below u8::MAX.
            let pedal = PedalIndex::try_from(i).unwrap_or(PedalIndex::MAX);
            edges.push(EdgeEvent {
                pedal,
                pressed: now,
            });
        }
        Ok(edges)
    }
}
