use std::ffi::c_void;
use std::process::Command;

use windows::Win32::Foundation::{BOOL, HWND, LPARAM, RECT};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP,
    KEYEVENTF_UNICODE, VIRTUAL_KEY, VK_CONTROL, VK_L, VK_RETURN, VK_T,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetClassNameW, GetForegroundWindow, GetWindowRect, MoveWindow, SetForegroundWindow,
    ShowWindow, SW_RESTORE,
};

use super::automation::{Key, WindowAutomation, WindowHandle};
use crate::constants::{EXPLORER_EXECUTABLE, EXPLORER_WINDOW_CLASS};
use crate::error::{AppError, Result};
use crate::models::WindowRect;

/// [`WindowAutomation`] over user32.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Automation;

fn hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.0 as *mut c_void)
}

fn class_name(hwnd: HWND) -> String {
    let mut buf = [0u16; 256];
    let len = unsafe { GetClassNameW(hwnd, &mut buf) };
    String::from_utf16_lossy(&buf[..len.max(0) as usize])
}

unsafe extern "system" fn collect_explorer(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let found = &mut *(lparam.0 as *mut Vec<WindowHandle>);
    if class_name(hwnd) == EXPLORER_WINDOW_CLASS {
        found.push(WindowHandle(hwnd.0 as isize));
    }
    BOOL::from(true)
}

fn virtual_key(key: Key) -> VIRTUAL_KEY {
    match key {
        Key::Control => VK_CONTROL,
        Key::T => VK_T,
        Key::L => VK_L,
        Key::Return => VK_RETURN,
    }
}

fn key_input(vk: VIRTUAL_KEY, scan: u16, flags: KEYBD_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: scan,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn send(inputs: &[INPUT]) -> Result<()> {
    let sent = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };
    if sent as usize == inputs.len() {
        Ok(())
    } else {
        Err(AppError::Automation(format!(
            "SendInput delivered {} of {} events",
            sent,
            inputs.len()
        )))
    }
}

impl WindowAutomation for Win32Automation {
    fn explorer_windows(&self) -> Vec<WindowHandle> {
        let mut found: Vec<WindowHandle> = Vec::new();
        let lparam = LPARAM(&mut found as *mut Vec<WindowHandle> as isize);
        if let Err(e) = unsafe { EnumWindows(Some(collect_explorer), lparam) } {
            log::warn!("EnumWindows failed: {}", e);
        }
        found
    }

    fn is_explorer_window(&self, handle: WindowHandle) -> bool {
        class_name(hwnd(handle)) == EXPLORER_WINDOW_CLASS
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        let fg = unsafe { GetForegroundWindow() };
        (!fg.0.is_null()).then(|| WindowHandle(fg.0 as isize))
    }

    fn window_rect(&self, handle: WindowHandle) -> Option<WindowRect> {
        let mut rect = RECT::default();
        unsafe { GetWindowRect(hwnd(handle), &mut rect) }.ok()?;
        Some(WindowRect::from_corners(
            rect.left,
            rect.top,
            rect.right,
            rect.bottom,
        ))
    }

    fn move_window(&self, handle: WindowHandle, rect: WindowRect) -> bool {
        unsafe {
            MoveWindow(
                hwnd(handle),
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                BOOL::from(true),
            )
        }
        .is_ok()
    }

    fn bring_to_foreground(&self, handle: WindowHandle) -> bool {
        unsafe {
            let _ = ShowWindow(hwnd(handle), SW_RESTORE);
            SetForegroundWindow(hwnd(handle)).as_bool()
        }
    }

    fn spawn_explorer(&self, path: &str) -> Result<()> {
        Command::new(EXPLORER_EXECUTABLE).arg(path).spawn()?;
        Ok(())
    }

    fn send_key_combo(&self, modifier: Key, key: Key) -> Result<()> {
        let (m, k) = (virtual_key(modifier), virtual_key(key));
        send(&[
            key_input(m, 0, KEYBD_EVENT_FLAGS(0)),
            key_input(k, 0, KEYBD_EVENT_FLAGS(0)),
            key_input(k, 0, KEYEVENTF_KEYUP),
            key_input(m, 0, KEYEVENTF_KEYUP),
        ])
    }

    fn press_key(&self, key: Key) -> Result<()> {
        let vk = virtual_key(key);
        send(&[
            key_input(vk, 0, KEYBD_EVENT_FLAGS(0)),
            key_input(vk, 0, KEYEVENTF_KEYUP),
        ])
    }

    fn type_text(&self, text: &str) -> Result<()> {
        for unit in text.encode_utf16() {
            send(&[
                key_input(VIRTUAL_KEY(0), unit, KEYEVENTF_UNICODE),
                key_input(VIRTUAL_KEY(0), unit, KEYEVENTF_UNICODE | KEYEVENTF_KEYUP),
            ])?;
        }
        Ok(())
    }
}
