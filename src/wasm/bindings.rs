//! JavaScript bindings for the MentionKit editor engine

use crate::config::{EditorConfig, ExternalContent};
use crate::console_log;
use crate::editor::{Editor, EditorHost, MentionTrigger};
use crate::offsets::OffsetIndex;
use crate::sync::{Clock, SyncOutcome};
use wasm_bindgen::prelude::*;

/// `Date.now()` clock
#[derive(Debug, Clone, Copy, Default)]
pub struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

/// Host that forwards editor callbacks to JavaScript functions
///
/// A callback that throws is logged to the console; the editor keeps going.
#[derive(Default)]
pub struct JsHost {
    on_change: Option<js_sys::Function>,
    on_mention_trigger: Option<js_sys::Function>,
    on_mention_hide: Option<js_sys::Function>,
}

impl EditorHost for JsHost {
    fn on_change(&mut self, plain_text: &str, html: &str) {
        if let Some(f) = &self.on_change {
            let result = f.call2(
                &JsValue::NULL,
                &JsValue::from_str(plain_text),
                &JsValue::from_str(html),
            );
            if let Err(e) = result {
                console_log!("onChange callback failed: {:?}", e);
            }
        }
    }

    fn on_mention_trigger(&mut self, trigger: &MentionTrigger) {
        let Some(f) = &self.on_mention_trigger else {
            return;
        };
        match serde_json::to_string(trigger) {
            Ok(json) => {
                if let Err(e) = f.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                    console_log!("onMentionTrigger callback failed: {:?}", e);
                }
            }
            Err(e) => console_log!("mention trigger serialization failed: {}", e),
        }
    }

    fn on_mention_hide(&mut self) {
        if let Some(f) = &self.on_mention_hide {
            if let Err(e) = f.call0(&JsValue::NULL) {
                console_log!("onMentionHide callback failed: {:?}", e);
            }
        }
    }
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// JavaScript-friendly wrapper for [`Editor`]
///
/// Engine offsets (mention trigger anchors, `insertMention` arguments) are
/// char offsets into the plain-text projection. DOM selection offsets are
/// UTF-16; convert with `toUtf16Offset` / `fromUtf16Offset`.
#[wasm_bindgen]
pub struct WasmEditor {
    inner: Editor<JsHost>,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor from an optional JSON config
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WasmEditor, JsValue> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json).map_err(js_error)?,
            None => EditorConfig::default(),
        };
        let inner = Editor::with_clock(config, JsHost::default(), JsClock).map_err(js_error)?;
        Ok(WasmEditor { inner })
    }

    /// Get the editor instance id
    #[wasm_bindgen(js_name = getId)]
    pub fn get_id(&self) -> String {
        self.inner.id().to_string()
    }

    /// Register `(plainText, html) => void`
    #[wasm_bindgen(js_name = setOnChange)]
    pub fn set_on_change(&mut self, callback: Option<js_sys::Function>) {
        self.inner.host_mut().on_change = callback;
    }

    /// Register `(triggerJson) => void`
    #[wasm_bindgen(js_name = setOnMentionTrigger)]
    pub fn set_on_mention_trigger(&mut self, callback: Option<js_sys::Function>) {
        self.inner.host_mut().on_mention_trigger = callback;
    }

    /// Register `() => void`
    #[wasm_bindgen(js_name = setOnMentionHide)]
    pub fn set_on_mention_hide(&mut self, callback: Option<js_sys::Function>) {
        self.inner.host_mut().on_mention_hide = callback;
    }

    /// Apply host content (`{"value": ..., "htmlValue": ...}` JSON)
    ///
    /// Returns `"applied"`, `"dropped"` or `"unchanged"`.
    #[wasm_bindgen(js_name = setContent)]
    pub fn set_content(&mut self, content_json: &str) -> Result<String, JsValue> {
        let content: ExternalContent = serde_json::from_str(content_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid JSON: {}", e)))?;
        let outcome = match self.inner.set_content(&content) {
            SyncOutcome::Applied => "applied",
            SyncOutcome::Dropped => "dropped",
            SyncOutcome::Unchanged => "unchanged",
        };
        Ok(outcome.to_string())
    }

    #[wasm_bindgen(js_name = insertText)]
    pub fn insert_text(&mut self, text: &str) -> Result<(), JsValue> {
        self.inner.insert_text(text).map_err(js_error)
    }

    #[wasm_bindgen(js_name = insertLineBreak)]
    pub fn insert_line_break(&mut self) -> Result<(), JsValue> {
        self.inner.insert_line_break().map_err(js_error)
    }

    #[wasm_bindgen(js_name = deleteBackward)]
    pub fn delete_backward(&mut self) -> Result<(), JsValue> {
        self.inner.delete_backward().map_err(js_error)
    }

    #[wasm_bindgen(js_name = deleteForward)]
    pub fn delete_forward(&mut self) -> Result<(), JsValue> {
        self.inner.delete_forward().map_err(js_error)
    }

    #[wasm_bindgen(js_name = compositionStart)]
    pub fn composition_start(&mut self) -> Result<(), JsValue> {
        self.inner.composition_start().map_err(js_error)
    }

    #[wasm_bindgen(js_name = compositionUpdate)]
    pub fn composition_update(&mut self, text: &str) -> Result<(), JsValue> {
        self.inner.composition_update(text).map_err(js_error)
    }

    #[wasm_bindgen(js_name = compositionEnd)]
    pub fn composition_end(&mut self, text: &str) -> Result<(), JsValue> {
        self.inner.composition_end(text).map_err(js_error)
    }

    /// Set the selection from DOM (UTF-16) offsets
    #[wasm_bindgen(js_name = setSelection)]
    pub fn set_selection(&mut self, anchor_utf16: usize, focus_utf16: usize) {
        let index = self.offset_index();
        self.inner
            .set_selection(index.utf16_to_char(anchor_utf16), index.utf16_to_char(focus_utf16));
    }

    /// Get the selection as `{"anchor": n, "focus": n}` in UTF-16 offsets
    #[wasm_bindgen(js_name = getSelection)]
    pub fn get_selection(&self) -> String {
        let index = self.offset_index();
        let selection = self.inner.selection();
        serde_json::json!({
            "anchor": index.char_to_utf16(selection.anchor),
            "focus": index.char_to_utf16(selection.focus),
        })
        .to_string()
    }

    /// Replace the query at `start..end` (engine offsets) with a mention
    ///
    /// Returns the insertion report as JSON.
    #[wasm_bindgen(js_name = insertMention)]
    pub fn insert_mention(
        &mut self,
        username: &str,
        start: usize,
        end: usize,
    ) -> Result<String, JsValue> {
        let insertion = self
            .inner
            .insert_mention(username, start, end)
            .map_err(js_error)?;
        serde_json::to_string(&insertion)
            .map_err(|e| JsValue::from_str(&format!("JSON serialization failed: {}", e)))
    }

    /// Run a formatting command; `false` if unsupported
    #[wasm_bindgen(js_name = execCommand)]
    pub fn exec_command(&mut self, name: &str, value: Option<String>) -> bool {
        self.inner.exec_command(name, value.as_deref())
    }

    /// Get the active mention query as JSON, if any
    #[wasm_bindgen(js_name = activeMentionQuery)]
    pub fn active_mention_query(&self) -> Option<String> {
        self.inner
            .active_mention_query()
            .and_then(|trigger| serde_json::to_string(trigger).ok())
    }

    #[wasm_bindgen(js_name = getHtml)]
    pub fn get_html(&self) -> String {
        self.inner.html()
    }

    #[wasm_bindgen(js_name = getPlainText)]
    pub fn get_plain_text(&self) -> String {
        self.inner.plain_text()
    }

    #[wasm_bindgen(js_name = clear)]
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    #[wasm_bindgen(js_name = focus)]
    pub fn focus(&mut self) {
        self.inner.focus();
    }

    #[wasm_bindgen(js_name = blur)]
    pub fn blur(&mut self) {
        self.inner.blur();
    }

    /// Silence-timer callback; returns whether typing ended
    #[wasm_bindgen(js_name = expireTyping)]
    pub fn expire_typing(&mut self) -> bool {
        self.inner.expire_typing()
    }

    /// Deadline of the silence window in `Date.now()` milliseconds
    #[wasm_bindgen(js_name = typingDeadline)]
    pub fn typing_deadline(&self) -> Option<f64> {
        self.inner.typing_deadline().map(|ms| ms as f64)
    }

    /// `"ltr"` or `"rtl"`
    #[wasm_bindgen(js_name = direction)]
    pub fn direction(&self) -> String {
        self.inner.direction().as_str().to_string()
    }

    #[wasm_bindgen(js_name = placeholder)]
    pub fn placeholder(&self) -> String {
        self.inner.placeholder().to_string()
    }

    #[wasm_bindgen(js_name = showsPlaceholder)]
    pub fn shows_placeholder(&self) -> bool {
        self.inner.shows_placeholder()
    }

    #[wasm_bindgen(js_name = isComposing)]
    pub fn is_composing(&self) -> bool {
        self.inner.is_composing()
    }

    /// Convert an engine offset to a DOM (UTF-16) offset
    #[wasm_bindgen(js_name = toUtf16Offset)]
    pub fn to_utf16_offset(&self, offset: usize) -> usize {
        self.offset_index().char_to_utf16(offset)
    }

    /// Convert a DOM (UTF-16) offset to an engine offset
    #[wasm_bindgen(js_name = fromUtf16Offset)]
    pub fn from_utf16_offset(&self, offset: usize) -> usize {
        self.offset_index().utf16_to_char(offset)
    }
}

impl WasmEditor {
    fn offset_index(&self) -> OffsetIndex {
        OffsetIndex::new(&self.inner.document().plain_text())
    }
}
