//! Browser host binding
//!
//! Exposes the spin engine to JavaScript as `WheelWidget`. Frames are pumped
//! by a requestAnimationFrame loop that only runs while the engine has a frame
//! outstanding. Engine output is queued and handed to the JS callbacks after
//! the engine borrow is released, so a callback may call back into the widget.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use super::Clock;
use crate::settings::{SpinOptions, SpinSettings};
use crate::wheel::{EventQueue, SeededRandom, SpinEngine, SpinEvent, SpinRequest, Wedge};

/// Clock backed by `Date.now()` with a frame-request flag for the rAF loop
#[derive(Debug, Clone, Default)]
pub struct RafClock {
    pending: Rc<Cell<bool>>,
}

impl RafClock {
    fn take_frame(&self) -> bool {
        self.pending.replace(false)
    }

    fn has_pending(&self) -> bool {
        self.pending.get()
    }
}

impl Clock for RafClock {
    fn now(&self) -> f64 {
        js_sys::Date::now()
    }

    fn schedule_frame(&self) {
        self.pending.set(true);
    }

    fn cancel_frame(&self) {
        self.pending.set(false);
    }
}

struct Inner {
    engine: SpinEngine<RafClock, SeededRandom>,
    clock: RafClock,
    events: EventQueue,
    on_frame: Option<js_sys::Function>,
    on_complete: Option<js_sys::Function>,
    loop_running: bool,
}

/// Install the panic hook and console logger
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"spin-wheel: logger already initialized".into());
    }
}

#[wasm_bindgen]
pub struct WheelWidget {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl WheelWidget {
    /// Create a widget from optional JSON settings
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> Result<WheelWidget, JsValue> {
        let settings = match settings_json {
            Some(json) => SpinSettings::from_json(&json).map_err(to_js_error)?,
            None => SpinSettings::default(),
        };
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);

        let clock = RafClock::default();
        let events = EventQueue::new();
        let mut engine = SpinEngine::with_settings(settings, clock.clone(), SeededRandom::new(seed));
        engine.set_listener(events.clone());

        log::info!("Wheel widget created with seed: {}", seed);

        Ok(WheelWidget {
            inner: Rc::new(RefCell::new(Inner {
                engine,
                clock,
                events,
                on_frame: None,
                on_complete: None,
                loop_running: false,
            })),
        })
    }

    /// Replace the wedge set; returns a weight warning if prizes exceed 100
    pub fn configure(&self, wedges_json: &str) -> Result<Option<String>, JsValue> {
        let wedges = Wedge::list_from_json(wedges_json).map_err(to_js_error)?;
        let report = self
            .inner
            .borrow_mut()
            .engine
            .configure(wedges)
            .map_err(to_js_error)?;
        Ok(report.warning().map(|w| w.to_string()))
    }

    /// Start a spin with the configured settings; false if one is in flight
    pub fn spin(&self) -> Result<bool, JsValue> {
        self.request_spin(SpinOptions::default())
    }

    /// Start a spin with JSON overrides (`minSpins`, `maxSpins`, `durationMs`)
    #[wasm_bindgen(js_name = spinWith)]
    pub fn spin_with(&self, options_json: &str) -> Result<bool, JsValue> {
        let options: SpinOptions = serde_json::from_str(options_json).map_err(to_js_error)?;
        self.request_spin(options)
    }

    pub fn reset(&self) {
        self.inner.borrow_mut().engine.reset();
    }

    #[wasm_bindgen(js_name = setAngle)]
    pub fn set_angle(&self, angle: f64) -> bool {
        self.inner.borrow_mut().engine.set_angle(angle)
    }

    #[wasm_bindgen(js_name = currentAngle)]
    pub fn current_angle(&self) -> f64 {
        self.inner.borrow().engine.current_angle()
    }

    #[wasm_bindgen(js_name = isSpinning)]
    pub fn is_spinning(&self) -> bool {
        self.inner.borrow().engine.is_spinning()
    }

    /// Register `(angle: number) => void`, called every animation frame
    #[wasm_bindgen(js_name = onFrame)]
    pub fn on_frame(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().on_frame = Some(callback);
    }

    /// Register `(resultJson: string) => void`, called once per completed spin
    #[wasm_bindgen(js_name = onSpinComplete)]
    pub fn on_spin_complete(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().on_complete = Some(callback);
    }

    fn request_spin(&self, options: SpinOptions) -> Result<bool, JsValue> {
        let request = self
            .inner
            .borrow_mut()
            .engine
            .spin(options)
            .map_err(to_js_error)?;
        ensure_loop(&self.inner);
        Ok(matches!(request, SpinRequest::Started { .. }))
    }
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn ensure_loop(inner: &Rc<RefCell<Inner>>) {
    let start = {
        let mut g = inner.borrow_mut();
        if g.loop_running || !g.clock.has_pending() {
            false
        } else {
            g.loop_running = true;
            true
        }
    };
    if start {
        request_animation_frame(inner.clone());
    }
}

fn request_animation_frame(inner: Rc<RefCell<Inner>>) {
    let Some(window) = web_sys::window() else {
        log::error!("No window available for animation frames");
        inner.borrow_mut().loop_running = false;
        return;
    };
    let closure = Closure::once(move |_time: f64| {
        frame_loop(inner);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn frame_loop(inner: Rc<RefCell<Inner>>) {
    let (events, on_frame, on_complete, again) = {
        let mut g = inner.borrow_mut();
        if g.clock.take_frame() {
            g.engine.on_animation_frame();
        }
        let again = g.clock.has_pending();
        g.loop_running = again;
        (g.events.drain(), g.on_frame.clone(), g.on_complete.clone(), again)
    };

    dispatch(events, on_frame.as_ref(), on_complete.as_ref());

    if again {
        request_animation_frame(inner);
    } else {
        // A callback may have started a new spin
        ensure_loop(&inner);
    }
}

fn dispatch(
    events: Vec<SpinEvent>,
    on_frame: Option<&js_sys::Function>,
    on_complete: Option<&js_sys::Function>,
) {
    for event in events {
        match event {
            SpinEvent::Frame(angle) => {
                if let Some(callback) = on_frame {
                    if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_f64(angle)) {
                        log::warn!("onFrame callback failed: {:?}", e);
                    }
                }
            }
            SpinEvent::Completed(result) => {
                let Some(callback) = on_complete else {
                    continue;
                };
                match serde_json::to_string(&result) {
                    Ok(json) => {
                        if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                            log::warn!("onSpinComplete callback failed: {:?}", e);
                        }
                    }
                    Err(e) => log::error!("Failed to serialize spin result: {}", e),
                }
            }
        }
    }
}
