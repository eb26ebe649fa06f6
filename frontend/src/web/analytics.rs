//! Tracking backends calling the SDK globals (`gtag`, `fbq`, ...) installed by
//! the page's script tags.

use aigrowth_shared::TrackingError;
use aigrowth_shared::tracking::{Platform, PlatformCall, TrackingBackend, TrackingDispatcher};
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use crate::serde_helper;

/// Delivers calls to `window[platform.global_function()]`.
#[derive(Debug, Clone, Copy)]
pub struct GlobalFunctionBackend {
    platform: Platform,
}

impl GlobalFunctionBackend {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    fn function(&self) -> Option<Function> {
        let window = web_sys::window()?;
        let name = JsValue::from_str(self.platform.global_function());
        let value = Reflect::get(&window, &name).ok()?;
        value.dyn_into::<Function>().ok()
    }
}

impl TrackingBackend for GlobalFunctionBackend {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn deliver(&self, call: &PlatformCall) -> Result<(), TrackingError> {
        let function = self
            .function()
            .ok_or(TrackingError::Unavailable(self.platform))?;

        let args = Array::new();
        for arg in &call.args {
            let value = serde_helper::to_value(arg).map_err(|e| TrackingError::Call {
                platform: self.platform,
                reason: e.to_string(),
            })?;
            args.push(&value);
        }

        function
            .apply(&JsValue::UNDEFINED, &args)
            .map(|_| ())
            .map_err(|e| TrackingError::Call {
                platform: self.platform,
                reason: format!("{:?}", e),
            })
    }
}

/// One backend per configured platform.
pub fn dispatcher_for(platforms: &[Platform]) -> TrackingDispatcher {
    platforms.iter().fold(TrackingDispatcher::new(), |d, p| {
        d.with_backend(GlobalFunctionBackend::new(*p))
    })
}
