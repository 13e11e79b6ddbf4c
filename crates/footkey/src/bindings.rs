//! Default pedal bindings.

use std::{path::Path, sync::Arc};

use footkey_engine::{
    ActionRegistry, AdaptiveSwitcher, ExitHooks, Modifier, ModifierKey, PedalIndex, QuickSwitch,
};
use mac_desktop::{AppPath, DesktopOps};

use crate::error::Result;

/// Modifier held by each pedal, registered first.
pub const MODIFIERS: [(PedalIndex, ModifierKey); 3] = [
    (0, ModifierKey::Option),
    (1, ModifierKey::Shift),
    (2, ModifierKey::Control),
];

/// Pedal that focuses [`QUICK_SWITCH_APP`] while held.
pub const QUICK_SWITCH_PEDAL: PedalIndex = 0;
/// App focused by the quick switch pedal.
pub const QUICK_SWITCH_APP: &str = "Brave Browser.app";

/// Pedal that cycles through [`SWITCHER_APPS`].
pub const SWITCHER_PEDAL: PedalIndex = 2;
/// Fixed cycle of the switcher pedal.
pub const SWITCHER_APPS: [&str; 3] = [
    "Visual Studio Code.app",
    "Brave Browser.app",
    "~/Applications/Brave Browser Apps.localized/Messages.app",
];
/// Recently focused apps added to the switcher cycle.
pub const SWITCHER_NUM_RECENT: usize = 1;

/// Build the default registry.
///
/// Registration order matters: the app switchers replace the modifiers on
/// pedals 0 and 2, whose release hooks still fire at shutdown. Must be called
/// within a Tokio runtime.
pub fn default_registry(
    ops: &Arc<dyn DesktopOps>,
    script_dir: &Path,
    hooks: &ExitHooks,
) -> Result<ActionRegistry> {
    let mut reg = ActionRegistry::new();
    for (pedal, key) in MODIFIERS {
        reg.register(Modifier::new(pedal, key, script_dir, ops.clone(), hooks)?);
    }
    reg.register(QuickSwitch::new(
        QUICK_SWITCH_PEDAL,
        AppPath::resolve(QUICK_SWITCH_APP),
        ops.clone(),
    ));
    reg.register(AdaptiveSwitcher::new(
        SWITCHER_PEDAL,
        SWITCHER_APPS.iter().map(|a| AppPath::resolve(a)),
        SWITCHER_NUM_RECENT,
        ops.clone(),
    ));
    Ok(reg)
}

#[cfg(test)]
mod tests {
    use mac_desktop::MockDesktopOps;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn later_bindings_replace_modifiers() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockDesktopOps::new());
        let ops: Arc<dyn DesktopOps> = mock.clone();
        let hooks = ExitHooks::new();
        let reg = default_registry(&ops, dir.path(), &hooks).unwrap();

        let listed: Vec<String> = reg
            .list_registered()
            .map(|(p, a)| format!("{p}:{a:?}"))
            .collect();
        assert_eq!(listed.len(), 3);
        assert!(listed[0].starts_with("0:QuickSwitch"));
        assert!(listed[1].starts_with("1:Modifier"));
        assert!(listed[2].starts_with("2:AdaptiveSwitcher"));

        assert_eq!(mock.compiled().len(), 6);
        assert_eq!(hooks.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn replaced_modifiers_still_release_at_exit() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockDesktopOps::new());
        let ops: Arc<dyn DesktopOps> = mock.clone();
        let hooks = ExitHooks::new();
        let reg = default_registry(&ops, dir.path(), &hooks).unwrap();
        drop(reg);

        assert_eq!(hooks.run(), 3);
        let released: Vec<String> = mock
            .scripts_run()
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        assert_eq!(
            released,
            vec![
                ".footkey_option_up.scpt",
                ".footkey_shift_up.scpt",
                ".footkey_control_up.scpt",
            ]
        );
    }
}
