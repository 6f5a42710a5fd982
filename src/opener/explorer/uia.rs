use std::ffi::c_void;
use std::path::PathBuf;
use std::time::Duration;

use windows::core::{BSTR, VARIANT};
use windows::Win32::Foundation::{HWND, RPC_E_CHANGED_MODE};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoUninitialize, CLSCTX_INPROC_SERVER,
    COINIT_APARTMENTTHREADED,
};
use windows::Win32::UI::Accessibility::{
    CUIAutomation, IUIAutomation, IUIAutomationCondition, IUIAutomationElement,
    IUIAutomationValuePattern, TreeScope_Descendants, UIA_AutomationIdPropertyId,
    UIA_ControlTypePropertyId, UIA_EditControlTypeId, UIA_ValuePatternId,
};

use super::automation::{AccessibilityBackend, AddressBar, WindowHandle};
use crate::error::{AppError, Result};
use crate::retry::poll_until;

const UIA_CORE_DLL: &str = "UIAutomationCore.dll";
const ADDRESS_BAR_AUTOMATION_ID: &str = "TextBox";
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// UI Automation through COM.
///
/// Nothing is loaded until [`AccessibilityBackend::attach`]: COM is
/// initialised on the calling thread there and released with the returned
/// address bar.
#[derive(Debug, Default, Clone, Copy)]
pub struct UiaBackend;

impl AccessibilityBackend for UiaBackend {
    fn is_available(&self) -> bool {
        let system_root = std::env::var_os("SystemRoot").unwrap_or_else(|| "C:\\Windows".into());
        PathBuf::from(system_root)
            .join("System32")
            .join(UIA_CORE_DLL)
            .is_file()
    }

    fn attach(&self, hwnd: WindowHandle) -> Result<Box<dyn AddressBar>> {
        let com = ComApartment::enter()?;
        let automation: IUIAutomation =
            unsafe { CoCreateInstance(&CUIAutomation, None, CLSCTX_INPROC_SERVER)? };
        let window = unsafe { automation.ElementFromHandle(HWND(hwnd.0 as *mut c_void))? };
        let condition = address_bar_condition(&automation)?;

        Ok(Box::new(UiaAddressBar {
            window,
            condition,
            _automation: automation,
            _com: com,
        }))
    }
}

/// `AutomationId == "TextBox" && ControlType == Edit`, the edit box inside
/// Explorer's `PART_AutoSuggestBox`.
fn address_bar_condition(automation: &IUIAutomation) -> Result<IUIAutomationCondition> {
    unsafe {
        let by_id = automation.CreatePropertyCondition(
            UIA_AutomationIdPropertyId,
            &VARIANT::from(BSTR::from(ADDRESS_BAR_AUTOMATION_ID)),
        )?;
        let by_type = automation.CreatePropertyCondition(
            UIA_ControlTypePropertyId,
            &VARIANT::from(UIA_EditControlTypeId.0),
        )?;
        Ok(automation.CreateAndCondition(&by_id, &by_type)?)
    }
}

/// Per-thread COM initialisation, undone on drop if this guard did it.
struct ComApartment {
    owned: bool,
}

impl ComApartment {
    fn enter() -> Result<Self> {
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
        if hr == RPC_E_CHANGED_MODE {
            // Another apartment model is already active on this thread; use it.
            return Ok(Self { owned: false });
        }
        hr.ok()
            .map_err(|e| AppError::AccessibilityUnavailable(e.message().to_string()))?;
        Ok(Self { owned: true })
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        if self.owned {
            unsafe { CoUninitialize() };
        }
    }
}

// Field order matters: COM objects are released before the apartment.
struct UiaAddressBar {
    window: IUIAutomationElement,
    condition: IUIAutomationCondition,
    _automation: IUIAutomation,
    _com: ComApartment,
}

impl UiaAddressBar {
    fn edit(&self) -> Result<IUIAutomationElement> {
        Ok(unsafe { self.window.FindFirst(TreeScope_Descendants, &self.condition)? })
    }

    fn value_pattern(&self) -> Result<IUIAutomationValuePattern> {
        let edit = self.edit()?;
        Ok(unsafe { edit.GetCurrentPatternAs::<IUIAutomationValuePattern>(UIA_ValuePatternId)? })
    }

    fn is_ready(&self) -> bool {
        self.edit()
            .map(|edit| unsafe {
                edit.CurrentIsEnabled().map(|b| b.as_bool()).unwrap_or(false)
                    && !edit.CurrentIsOffscreen().map(|b| b.as_bool()).unwrap_or(true)
            })
            .unwrap_or(false)
    }
}

impl AddressBar for UiaAddressBar {
    fn focus_window(&self) -> Result<()> {
        unsafe { self.window.SetFocus()? };
        Ok(())
    }

    fn wait_ready(&self, timeout: Duration) -> bool {
        poll_until(timeout, READY_POLL_INTERVAL, || self.is_ready().then_some(())).is_some()
    }

    fn set_text(&self, text: &str) -> Result<()> {
        let pattern = self.value_pattern()?;
        unsafe { pattern.SetValue(&BSTR::from(text))? };
        Ok(())
    }

    fn text(&self) -> Result<String> {
        let pattern = self.value_pattern()?;
        Ok(unsafe { pattern.CurrentValue()? }.to_string())
    }

    /// `false` once the edit box is gone, which is how Explorer shows the
    /// breadcrumb bar again.
    fn has_keyboard_focus(&self) -> bool {
        self.edit()
            .and_then(|edit| Ok(unsafe { edit.CurrentHasKeyboardFocus()? }.as_bool()))
            .unwrap_or(false)
    }
}
