//! Synthesized keyboard gestures.

#[cfg(target_os = "macos")]
mod imp {
    use core_graphics::{
        event::{CGEvent, CGEventFlags, CGEventTapLocation, CGKeyCode},
        event_source::{CGEventSource, CGEventSourceStateID},
    };
    use tracing::trace;

    use crate::{Error, Result};

    /// Left command virtual keycode.
    const KEY_COMMAND: CGKeyCode = 0x37;
    /// Tab virtual keycode.
    const KEY_TAB: CGKeyCode = 0x30;
    /// Command is pressed several times before tab; a single press is
    /// occasionally missed by the app switcher.
    const COMMAND_PRESSES: usize = 3;

    /// Build a keyboard event with explicit modifier flags.
    fn key_event(code: CGKeyCode, down: bool, flags: CGEventFlags) -> Result<CGEvent> {
        let source = CGEventSource::new(CGEventSourceStateID::HIDSystemState)
            .map_err(|_| Error::EventSource)?;
        let e = CGEvent::new_keyboard_event(source, code, down).map_err(|_| Error::EventCreate)?;
        e.set_flags(flags);
        Ok(e)
    }

    /// Post cmd+tab, switching to the previously active application.
    pub(crate) fn post_cycle_focus() -> Result<()> {
        let cmd = CGEventFlags::CGEventFlagCommand;
        for _ in 0..COMMAND_PRESSES {
            key_event(KEY_COMMAND, true, cmd)?.post(CGEventTapLocation::HID);
        }
        key_event(KEY_TAB, true, cmd)?.post(CGEventTapLocation::HID);
        key_event(KEY_TAB, false, cmd)?.post(CGEventTapLocation::HID);
        key_event(KEY_COMMAND, false, CGEventFlags::CGEventFlagNull)?
            .post(CGEventTapLocation::HID);
        trace!("posted_cycle_focus");
        Ok(())
    }
}

#[cfg(not(target_os = "macos"))]
mod imp {
    use crate::{Error, Result};

    /// Keyboard synthesis is only implemented on macOS.
    pub(crate) fn post_cycle_focus() -> Result<()> {
        Err(Error::Unsupported("focus cycle gesture"))
    }
}

pub(crate) use imp::post_cycle_focus;
