//! Frontmost application lookup.
//!
//! The owner of the first on-screen layer-0 window in the CGWindowList is the
//! frontmost application; its bundle path comes from `NSRunningApplication`.
//! CGWindowList is used instead of `NSWorkspace.frontmostApplication` because
//! the latter only refreshes while a main run loop is spinning.

#[cfg(target_os = "macos")]
mod imp {
    use core_foundation::{
        base::{CFRelease, CFTypeRef},
        dictionary::CFDictionaryRef,
        number::{CFNumberRef, kCFNumberSInt32Type},
        string::CFStringRef,
    };
    use core_graphics::window as cgw;
    use objc2_app_kit::NSRunningApplication;
    use tracing::trace;

    use crate::{Error, Result};

    /// Read an i32 value for `key` from a CG window dictionary.
    unsafe fn get_number(dict: CFDictionaryRef, key: CFStringRef) -> Option<i32> {
        let value = unsafe {
            core_foundation::dictionary::CFDictionaryGetValue(dict, key as *const core::ffi::c_void)
        };
        if value.is_null() {
            return None;
        }
        let mut out: i32 = 0;
        let ok = unsafe {
            core_foundation::number::CFNumberGetValue(
                value as CFNumberRef,
                kCFNumberSInt32Type,
                &mut out as *mut i32 as *mut core::ffi::c_void,
            )
        };
        if ok { Some(out) } else { None }
    }

    /// PID owning the frontmost normal-layer window.
    fn front_pid() -> Option<i32> {
        unsafe {
            let options: cgw::CGWindowListOption = cgw::kCGWindowListOptionOnScreenOnly
                | cgw::kCGWindowListOptionExcludeDesktopElements;
            let arr = cgw::CGWindowListCopyWindowInfo(options, cgw::kCGNullWindowID);
            if arr.is_null() {
                return None;
            }
            let count = core_foundation::array::CFArrayGetCount(arr);
            let mut pid = None;
            for i in 0..count {
                let item = core_foundation::array::CFArrayGetValueAtIndex(arr, i);
                if item.is_null() {
                    continue;
                }
                let dict = item as CFDictionaryRef;
                if let Some(layer) = get_number(dict, cgw::kCGWindowLayer)
                    && layer != 0
                {
                    continue;
                }
                if let Some(p) = get_number(dict, cgw::kCGWindowOwnerPID) {
                    pid = Some(p);
                    break;
                }
            }
            CFRelease(arr as CFTypeRef);
            pid
        }
    }

    /// Bundle path of the frontmost application, unescaped.
    pub(crate) fn frontmost_bundle_path() -> Result<String> {
        let pid = front_pid().ok_or(Error::NoFrontmostApp)?;
        // SAFETY: typed objc2 wrappers; returned objects are retained.
        let path = unsafe {
            NSRunningApplication::runningApplicationWithProcessIdentifier(pid as libc::pid_t)
                .and_then(|app| app.bundleURL())
                .and_then(|url| url.path())
        };
        let path = path.ok_or(Error::NoFrontmostApp)?.to_string();
        trace!(pid, path = %path, "frontmost_app");
        Ok(path)
    }
}

#[cfg(not(target_os = "macos"))]
mod imp {
    use crate::{Error, Result};

    /// Frontmost application lookup is only implemented on macOS.
    pub(crate) fn frontmost_bundle_path() -> Result<String> {
        Err(Error::Unsupported("frontmost application query"))
    }
}

pub(crate) use imp::frontmost_bundle_path;
