#![allow(dead_code)]
//! Shared fakes for integration tests.
//!
//! Include in each test file with:
//!   mod common;
//! then build an opener over `FakeAutomation` / `FakeAccessibility` or
//! `FakeRunner` and inspect what they recorded.

use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use file_tab_opener_lib::error::{AppError, Result};
use file_tab_opener_lib::models::{ErrorEvent, ProgressEvent, WindowRect};
use file_tab_opener_lib::opener::explorer::{
    AccessibilityBackend, AddressBar, Key, WindowAutomation, WindowHandle,
};
use file_tab_opener_lib::opener::finder::ScriptRunner;
use file_tab_opener_lib::opener::Reporter;

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Progress and error events collected from one batch.
#[derive(Debug, Default)]
pub struct Collected {
    pub progress: Vec<ProgressEvent>,
    pub errors: Vec<ErrorEvent>,
}

impl Collected {
    pub fn progress_tuples(&self) -> Vec<(usize, usize, String)> {
        self.progress
            .iter()
            .map(|p| (p.current, p.total, p.path.clone()))
            .collect()
    }
}

/// Run `f` with a reporter that records into the returned [`Collected`].
pub fn collect<T>(f: impl FnOnce(&mut Reporter<'_>) -> T) -> (T, Collected) {
    let progress = Mutex::new(Vec::new());
    let errors = Mutex::new(Vec::new());
    let result = {
        let mut reporter = Reporter::silent()
            .on_progress(|p| progress.lock().push(p.clone()))
            .on_error(|e| errors.lock().push(e.clone()));
        f(&mut reporter)
    };
    (
        result,
        Collected {
            progress: progress.into_inner(),
            errors: errors.into_inner(),
        },
    )
}

// ── Explorer ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct AutomationLog {
    pub windows: Vec<WindowHandle>,
    pub spawned: Vec<String>,
    /// Keyboard activity: `"Control+T"`, `"Return"`, `"type:<text>"`.
    pub keys: Vec<String>,
    pub moved: Vec<(WindowHandle, WindowRect)>,
    pub foregrounded: Vec<WindowHandle>,
    pub foreground: Option<WindowHandle>,
    /// How often each key label has been attempted, failures included.
    pub key_attempts: HashMap<String, usize>,
}

/// Scripted [`WindowAutomation`]: every successful spawn makes a new
/// Explorer window appear, unless told otherwise.
pub struct FakeAutomation {
    pub log: Mutex<AutomationLog>,
    windows_appear: bool,
    failing_spawns: HashSet<String>,
    failing_keys: HashSet<(String, usize)>,
    window_size: WindowRect,
}

impl Default for FakeAutomation {
    fn default() -> Self {
        Self {
            log: Mutex::new(AutomationLog::default()),
            windows_appear: true,
            failing_spawns: HashSet::new(),
            failing_keys: HashSet::new(),
            window_size: WindowRect::new(10, 20, 900, 700),
        }
    }
}

impl FakeAutomation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns succeed but no window ever shows up.
    pub fn without_new_windows(mut self) -> Self {
        self.windows_appear = false;
        self
    }

    pub fn failing_spawn(mut self, path: &str) -> Self {
        self.failing_spawns.insert(path.to_string());
        self
    }

    /// The `occurrence`-th (1-based) attempt of the key labelled `label`
    /// fails, e.g. `("Control+L", 1)` or `("type:/b", 1)`.
    pub fn failing_key(mut self, label: &str, occurrence: usize) -> Self {
        self.failing_keys.insert((label.to_string(), occurrence));
        self
    }

    /// Pre-existing Explorer windows, optionally with one in the foreground.
    pub fn with_windows(self, handles: &[isize], foreground: Option<isize>) -> Self {
        {
            let mut log = self.log.lock();
            log.windows = handles.iter().map(|h| WindowHandle(*h)).collect();
            log.foreground = foreground.map(WindowHandle);
        }
        self
    }

    pub fn spawned(&self) -> Vec<String> {
        self.log.lock().spawned.clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.log.lock().keys.clone()
    }

    pub fn moved(&self) -> Vec<(WindowHandle, WindowRect)> {
        self.log.lock().moved.clone()
    }

    fn record_key(&self, label: String) -> Result<()> {
        let mut log = self.log.lock();
        let attempts = log.key_attempts.entry(label.clone()).or_insert(0);
        *attempts += 1;
        if self.failing_keys.contains(&(label.clone(), *attempts)) {
            return Err(AppError::Automation(format!("SendInput rejected {}", label)));
        }
        log.keys.push(label);
        Ok(())
    }
}

fn key_name(key: Key) -> &'static str {
    match key {
        Key::Control => "Control",
        Key::T => "T",
        Key::L => "L",
        Key::Return => "Return",
    }
}

impl WindowAutomation for FakeAutomation {
    fn explorer_windows(&self) -> Vec<WindowHandle> {
        self.log.lock().windows.clone()
    }

    fn is_explorer_window(&self, hwnd: WindowHandle) -> bool {
        self.log.lock().windows.contains(&hwnd)
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        self.log.lock().foreground
    }

    fn window_rect(&self, hwnd: WindowHandle) -> Option<WindowRect> {
        Some(WindowRect {
            x: self.window_size.x + hwnd.0 as i32,
            ..self.window_size
        })
    }

    fn move_window(&self, hwnd: WindowHandle, rect: WindowRect) -> bool {
        self.log.lock().moved.push((hwnd, rect));
        true
    }

    fn bring_to_foreground(&self, hwnd: WindowHandle) -> bool {
        let mut log = self.log.lock();
        log.foregrounded.push(hwnd);
        log.foreground = Some(hwnd);
        true
    }

    fn spawn_explorer(&self, path: &str) -> Result<()> {
        if self.failing_spawns.contains(path) {
            return Err(AppError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "explorer.exe not found",
            )));
        }
        let mut log = self.log.lock();
        log.spawned.push(path.to_string());
        if self.windows_appear {
            let next = WindowHandle(100 + log.windows.len() as isize);
            log.windows.push(next);
        }
        Ok(())
    }

    fn send_key_combo(&self, modifier: Key, key: Key) -> Result<()> {
        self.record_key(format!("{}+{}", key_name(modifier), key_name(key)))
    }

    fn press_key(&self, key: Key) -> Result<()> {
        self.record_key(key_name(key).to_string())
    }

    fn type_text(&self, text: &str) -> Result<()> {
        self.record_key(format!("type:{}", text))
    }
}

#[derive(Debug, Default)]
pub struct BarState {
    pub value: String,
    pub set_calls: Vec<String>,
    pub attached_to: Vec<WindowHandle>,
    /// Read-backs that return a wrong path before the real value shows.
    pub mismatches_left: u32,
    pub set_fails: bool,
    pub read_fails: bool,
    /// The address bar never gives up keyboard focus after Enter.
    pub focus_held: bool,
}

/// Scripted UI Automation backend sharing one address bar state.
#[derive(Clone)]
pub struct FakeAccessibility {
    pub state: Arc<Mutex<BarState>>,
    available: bool,
    attach_fails: bool,
}

impl Default for FakeAccessibility {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(BarState::default())),
            available: true,
            attach_fails: false,
        }
    }
}

impl FakeAccessibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    pub fn failing_attach() -> Self {
        Self {
            attach_fails: true,
            ..Self::default()
        }
    }

    pub fn configure(self, f: impl FnOnce(&mut BarState)) -> Self {
        f(&mut self.state.lock());
        self
    }

    pub fn set_calls(&self) -> Vec<String> {
        self.state.lock().set_calls.clone()
    }
}

impl AccessibilityBackend for FakeAccessibility {
    fn is_available(&self) -> bool {
        self.available
    }

    fn attach(&self, hwnd: WindowHandle) -> Result<Box<dyn AddressBar>> {
        if self.attach_fails {
            return Err(AppError::Automation("element not found".to_string()));
        }
        self.state.lock().attached_to.push(hwnd);
        Ok(Box::new(FakeAddressBar {
            state: Arc::clone(&self.state),
        }))
    }
}

struct FakeAddressBar {
    state: Arc<Mutex<BarState>>,
}

impl AddressBar for FakeAddressBar {
    fn focus_window(&self) -> Result<()> {
        Ok(())
    }

    fn wait_ready(&self, _timeout: Duration) -> bool {
        true
    }

    fn set_text(&self, text: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.set_calls.push(text.to_string());
        if state.set_fails {
            return Err(AppError::Automation("ValuePattern unsupported".to_string()));
        }
        state.value = text.to_string();
        Ok(())
    }

    fn text(&self) -> Result<String> {
        let mut state = self.state.lock();
        if state.read_fails {
            return Err(AppError::Automation("element not available".to_string()));
        }
        if state.mismatches_left > 0 {
            state.mismatches_left -= 1;
            return Ok("/somewhere/else".to_string());
        }
        Ok(state.value.clone())
    }

    fn has_keyboard_focus(&self) -> bool {
        self.state.lock().focus_held
    }
}

// ── Finder ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RunnerLog {
    pub run_scripts: Vec<String>,
    pub spawned_scripts: Vec<String>,
}

/// Scripted [`ScriptRunner`].
#[derive(Default)]
pub struct FakeRunner {
    pub log: Mutex<RunnerLog>,
    run_error: Option<String>,
    timeout_secs: Option<u64>,
    failing_spawn_marker: Option<String>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `run` fails with this osascript stderr.
    pub fn failing_with(mut self, stderr: &str) -> Self {
        self.run_error = Some(stderr.to_string());
        self
    }

    pub fn timing_out(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// `spawn` fails for scripts that mention `marker`.
    pub fn failing_spawn_for(mut self, marker: &str) -> Self {
        self.failing_spawn_marker = Some(marker.to_string());
        self
    }

    pub fn run_scripts(&self) -> Vec<String> {
        self.log.lock().run_scripts.clone()
    }

    pub fn spawned_scripts(&self) -> Vec<String> {
        self.log.lock().spawned_scripts.clone()
    }
}

impl ScriptRunner for FakeRunner {
    fn run(&self, script: &str, _timeout: Duration) -> Result<String> {
        self.log.lock().run_scripts.push(script.to_string());
        if let Some(secs) = self.timeout_secs {
            return Err(AppError::ScriptTimeout { secs });
        }
        match &self.run_error {
            Some(stderr) => Err(AppError::Script(stderr.clone())),
            None => Ok(String::new()),
        }
    }

    fn spawn(&self, script: &str) -> Result<()> {
        if let Some(marker) = &self.failing_spawn_marker {
            if script.contains(marker.as_str()) {
                return Err(AppError::Script("Finder got an error: Can't make alias".to_string()));
            }
        }
        self.log.lock().spawned_scripts.push(script.to_string());
        Ok(())
    }
}
