//! Held modifier keys driven by compiled AppleScript.
//!
//! A [`Modifier`] compiles one "key down" and one "key up" script per key at
//! construction, runs them on press and release, and registers the release
//! with [`ExitHooks`] so the key is let go at shutdown.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
    time::{Duration, Instant},
};

use mac_desktop::DesktopOps;
use tracing::{debug, trace, warn};

use crate::{
    action::{Action, PedalIndex},
    error::{Error, Result},
    exit_hooks::ExitHooks,
};

/// Script runs slower than this are logged at `warn`.
pub const SLOW_SCRIPT_MS: u64 = 250;

/// Prefix of every compiled script file name.
const SCRIPT_PREFIX: &str = ".footkey";

/// A modifier key System Events can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModifierKey {
    /// ⌘
    Command,
    /// ⇧
    Shift,
    /// ⌥
    Option,
    /// ⌃
    Control,
}

impl ModifierKey {
    /// Name System Events uses for the key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Shift => "shift",
            Self::Option => "option",
            Self::Control => "control",
        }
    }
}

impl fmt::Display for ModifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModifierKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "command" | "cmd" => Ok(Self::Command),
            "shift" => Ok(Self::Shift),
            "option" | "opt" | "alt" => Ok(Self::Option),
            "control" | "ctrl" => Ok(Self::Control),
            _ => Err(Error::UnknownModifier(s.to_string())),
        }
    }
}

/// Press or release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyDirection {
    /// Key pressed.
    Down,
    /// Key released.
    Up,
}

impl KeyDirection {
    /// Direction for a pedal edge.
    pub fn from_pressed(pressed: bool) -> Self {
        if pressed { Self::Down } else { Self::Up }
    }

    /// AppleScript keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Up => "up",
        }
    }
}

/// AppleScript source that presses or releases `key`.
///
/// The output depends only on its arguments.
pub fn script_source(key: ModifierKey, direction: KeyDirection) -> String {
    format!(
        "tell application \"System Events\"\n    key {} {}\nend tell\n",
        direction.as_str(),
        key.as_str()
    )
}

/// Compiled press and release scripts for one key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptPair {
    /// Runs on press.
    pub down: PathBuf,
    /// Runs on release and at shutdown.
    pub up: PathBuf,
}

impl ScriptPair {
    /// Deterministic script locations for `key` under `dir`.
    pub fn paths(key: ModifierKey, dir: &Path) -> Self {
        let path = |d: KeyDirection| {
            dir.join(format!("{SCRIPT_PREFIX}_{}_{}.scpt", key.as_str(), d.as_str()))
        };
        Self {
            down: path(KeyDirection::Down),
            up: path(KeyDirection::Up),
        }
    }

    /// Write and compile both scripts, overwriting existing files.
    pub fn compile(key: ModifierKey, dir: &Path, ops: &dyn DesktopOps) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let pair = Self::paths(key, dir);
        for direction in [KeyDirection::Down, KeyDirection::Up] {
            ops.compile_script(&script_source(key, direction), pair.path(direction))?;
        }
        debug!(key = %key, dir = %dir.display(), "modifier_scripts_compiled");
        Ok(pair)
    }

    /// Script for `direction`.
    pub fn path(&self, direction: KeyDirection) -> &Path {
        match direction {
            KeyDirection::Down => &self.down,
            KeyDirection::Up => &self.up,
        }
    }
}

/// Hold a modifier key for as long as the pedal is pressed.
pub struct Modifier {
    /// Bound pedal.
    pedal: PedalIndex,
    /// Held key.
    key: ModifierKey,
    /// Compiled press/release scripts.
    scripts: ScriptPair,
    /// Desktop side effects.
    ops: Arc<dyn DesktopOps>,
}

impl Modifier {
    /// Compile the scripts for `key` into `script_dir` and register the
    /// release with `hooks`.
    ///
    /// Fails only when the scripts cannot be written or compiled. The release
    /// hook fires at shutdown even if this modifier is later replaced in the
    /// registry.
    pub fn new(
        pedal: PedalIndex,
        key: ModifierKey,
        script_dir: &Path,
        ops: Arc<dyn DesktopOps>,
        hooks: &ExitHooks,
    ) -> Result<Self> {
        let scripts = ScriptPair::compile(key, script_dir, ops.as_ref())?;
        let up = scripts.up.clone();
        let hook_ops = ops.clone();
        hooks.register(format!("release {key} (pedal {pedal})"), move || {
            run_script(hook_ops.as_ref(), pedal, key, KeyDirection::Up, &up);
        });
        Ok(Self {
            pedal,
            key,
            scripts,
            ops,
        })
    }

    /// Held key.
    pub fn key(&self) -> ModifierKey {
        self.key
    }

    /// Compiled scripts.
    pub fn scripts(&self) -> &ScriptPair {
        &self.scripts
    }
}

impl Action for Modifier {
    fn pedal(&self) -> PedalIndex {
        self.pedal
    }

    fn on_edge(&mut self, pressed: bool) {
        let direction = KeyDirection::from_pressed(pressed);
        run_script(
            self.ops.as_ref(),
            self.pedal,
            self.key,
            direction,
            self.scripts.path(direction),
        );
    }
}

impl fmt::Debug for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modifier")
            .field("pedal", &self.pedal)
            .field("key", &self.key)
            .finish()
    }
}

/// Run one compiled script, timing it and absorbing failures.
fn run_script(
    ops: &dyn DesktopOps,
    pedal: PedalIndex,
    key: ModifierKey,
    direction: KeyDirection,
    script: &Path,
) {
    let start = Instant::now();
    let res = ops.run_script(script);
    let elapsed = start.elapsed();
    let dir = direction.as_str();
    match res {
        Ok(()) if elapsed > Duration::from_millis(SLOW_SCRIPT_MS) => {
            warn!(
                pedal,
                key = %key,
                dir,
                elapsed_ms = elapsed.as_millis(),
                "modifier_script_slow"
            );
        }
        Ok(()) => trace!(
            pedal,
            key = %key,
            dir,
            elapsed_ms = elapsed.as_millis(),
            "modifier_script"
        ),
        Err(e) => warn!(pedal, key = %key, dir, error = %e, "modifier_script_failed"),
    }
}

#[cfg(test)]
mod tests {
    use mac_desktop::MockDesktopOps;

    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("option".parse::<ModifierKey>().unwrap(), ModifierKey::Option);
        assert_eq!("Alt".parse::<ModifierKey>().unwrap(), ModifierKey::Option);
        assert_eq!("CMD".parse::<ModifierKey>().unwrap(), ModifierKey::Command);
        assert_eq!(" ctrl ".parse::<ModifierKey>().unwrap(), ModifierKey::Control);
        assert_eq!("shift".parse::<ModifierKey>().unwrap(), ModifierKey::Shift);
        assert!(matches!(
            "hyper".parse::<ModifierKey>(),
            Err(Error::UnknownModifier(s)) if s == "hyper"
        ));
    }

    #[test]
    fn script_source_is_reproducible() {
        let a = script_source(ModifierKey::Option, KeyDirection::Down);
        assert_eq!(a, script_source(ModifierKey::Option, KeyDirection::Down));
        assert_eq!(
            a,
            "tell application \"System Events\"\n    key down option\nend tell\n"
        );
        assert!(script_source(ModifierKey::Shift, KeyDirection::Up).contains("key up shift"));
    }

    #[test]
    fn script_paths_are_per_key_and_direction() {
        let pair = ScriptPair::paths(ModifierKey::Control, Path::new("/tmp/fk"));
        assert_eq!(pair.down, Path::new("/tmp/fk/.footkey_control_down.scpt"));
        assert_eq!(pair.up, Path::new("/tmp/fk/.footkey_control_up.scpt"));
    }

    #[test]
    fn construction_compiles_both_scripts_and_registers_release() {
        let dir = tempfile::tempdir().unwrap();
        let ops = Arc::new(MockDesktopOps::new());
        let hooks = ExitHooks::new();
        let m = Modifier::new(1, ModifierKey::Shift, dir.path(), ops.clone(), &hooks).unwrap();

        let compiled = ops.compiled();
        assert_eq!(compiled.len(), 2);
        assert_eq!(compiled[0].0, m.scripts().down);
        assert_eq!(
            compiled[0].1,
            script_source(ModifierKey::Shift, KeyDirection::Down)
        );
        assert_eq!(compiled[1].0, m.scripts().up);
        assert_eq!(hooks.len(), 1);

        assert_eq!(hooks.run(), 1);
        assert_eq!(ops.scripts_run(), vec![m.scripts().up.clone()]);
    }

    #[test]
    fn edges_run_matching_scripts() {
        let dir = tempfile::tempdir().unwrap();
        let ops = Arc::new(MockDesktopOps::new());
        let hooks = ExitHooks::new();
        let mut m =
            Modifier::new(0, ModifierKey::Option, dir.path(), ops.clone(), &hooks).unwrap();
        m.on_edge(true);
        m.on_edge(false);
        assert_eq!(
            ops.scripts_run(),
            vec![m.scripts().down.clone(), m.scripts().up.clone()]
        );
    }

    #[test]
    fn rebuilding_a_modifier_recompiles_identical_scripts() {
        let dir = tempfile::tempdir().unwrap();
        let ops = Arc::new(MockDesktopOps::new());
        let hooks = ExitHooks::new();
        let first =
            Modifier::new(0, ModifierKey::Option, dir.path(), ops.clone(), &hooks).unwrap();
        let second =
            Modifier::new(0, ModifierKey::Option, dir.path(), ops.clone(), &hooks).unwrap();
        assert_eq!(first.scripts(), second.scripts());

        let compiled = ops.compiled();
        assert_eq!(compiled.len(), 4);
        assert_eq!(compiled[0], compiled[2]);
        assert_eq!(compiled[1], compiled[3]);
        assert_eq!(hooks.run(), 2);
    }

    #[test]
    fn script_failures_are_absorbed() {
        let dir = tempfile::tempdir().unwrap();
        let ops = Arc::new(MockDesktopOps::new());
        let hooks = ExitHooks::new();
        let mut m =
            Modifier::new(0, ModifierKey::Option, dir.path(), ops.clone(), &hooks).unwrap();
        ops.set_fail_scripts(true);
        m.on_edge(true);
        m.on_edge(false);
        assert_eq!(hooks.run(), 1);
        assert_eq!(ops.scripts_run().len(), 3);
    }

    #[test]
    fn compile_failure_is_an_error_and_registers_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let ops = Arc::new(MockDesktopOps::new());
        ops.set_fail_scripts(true);
        let hooks = ExitHooks::new();
        let res = Modifier::new(0, ModifierKey::Option, dir.path(), ops, &hooks);
        assert!(matches!(res, Err(Error::Desktop(_))));
        assert!(hooks.is_empty());
    }

    #[test]
    fn missing_script_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        let ops = Arc::new(MockDesktopOps::new());
        Modifier::new(2, ModifierKey::Control, &nested, ops, &ExitHooks::new()).unwrap();
        assert!(nested.is_dir());
    }
}
