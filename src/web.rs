//! Browser binding
//!
//! The JS host owns the canvas, the `requestAnimationFrame` loop and the DOM
//! form/toasts. It forwards pointer and key input here and draws from the
//! JSON snapshot each frame.

use wasm_bindgen::prelude::*;

use crate::session::{Nudge, Session};
use crate::settings::Settings;

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Cancel Meetings starting...");
}

#[wasm_bindgen]
pub struct WebSession {
    inner: Session,
}

#[wasm_bindgen]
impl WebSession {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64) -> WebSession {
        let settings = Settings::load();
        log::info!("Web session created with seed {}", seed as u64);
        WebSession {
            inner: Session::with_settings(seed as u64, settings),
        }
    }

    #[wasm_bindgen(js_name = startSession)]
    pub fn start_session(&mut self, player_name: &str, now: f64) {
        self.inner.start_session(player_name, now);
    }

    #[wasm_bindgen(js_name = resetAfterClear)]
    pub fn reset_after_clear(&mut self, now: f64) {
        self.inner.reset_after_clear(now);
    }

    /// Pointer x in canvas units (the host undoes CSS scaling)
    #[wasm_bindgen(js_name = setPaddlePosition)]
    pub fn set_paddle_position(&mut self, x: f32) {
        self.inner.set_paddle_position(x);
    }

    /// `KeyboardEvent.key`; returns true if the key moved the paddle
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, key: &str) -> bool {
        match Nudge::from_key(key) {
            Some(nudge) => {
                self.inner.nudge_paddle(nudge);
                true
            }
            None => false,
        }
    }

    /// Animation-frame callback (`performance.now()`)
    pub fn frame(&mut self, now: f64) {
        self.inner.frame(now);
    }

    pub fn poll(&mut self, now: f64) {
        self.inner.poll(now);
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.frame_loop().is_running()
    }

    #[wasm_bindgen(js_name = cancelLoop)]
    pub fn cancel_loop(&mut self) {
        self.inner.cancel_loop();
    }

    /// Restart the loop after `cancelLoop`; false if nothing was started
    #[wasm_bindgen(js_name = resumeLoop)]
    pub fn resume_loop(&mut self) -> bool {
        self.inner.resume_loop()
    }

    /// Run counter; frame callbacks tagged with an older value are stale
    pub fn generation(&self) -> f64 {
        self.inner.frame_loop().generation() as f64
    }

    pub fn teardown(&mut self) {
        self.inner.teardown();
    }

    #[wasm_bindgen(js_name = setAutopilot)]
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.inner.set_autopilot(enabled);
    }

    /// Current settings as JSON
    #[wasm_bindgen(js_name = settingsJson)]
    pub fn settings_json(&self) -> Result<String, JsValue> {
        self.inner
            .settings()
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Replace the settings from JSON and persist them to LocalStorage
    #[wasm_bindgen(js_name = applySettings)]
    pub fn apply_settings(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        settings.save();
        self.inner.set_settings(settings);
        Ok(())
    }

    /// Current `FrameSnapshot` as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Events since the last call, as a JSON array
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.drain_events())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
