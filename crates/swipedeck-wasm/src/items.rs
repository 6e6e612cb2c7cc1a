// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! JavaScript values as deck items.

use std::rc::Rc;

use js_sys::Array;
use js_sys::Reflect;
use wasm_bindgen::prelude::*;

use swipedeck_core::deck::Keyed;

/// The property holding an item's identity key.
const KEY_PROPERTY: &str = "id";

/// An item supplied from JavaScript, with its key read up front.
pub struct JsItem {
    key: String,
    value: JsValue,
}

impl JsItem {
    pub fn value(&self) -> &JsValue {
        &self.value
    }
}

impl Keyed for JsItem {
    type Key = String;

    fn key(&self) -> String {
        self.key.clone()
    }
}

fn read_key(value: &JsValue, index: u32) -> Result<String, JsValue> {
    let key = Reflect::get(value, &JsValue::from_str(KEY_PROPERTY))?;
    if let Some(s) = key.as_string() {
        Ok(s)
    } else if let Some(n) = key.as_f64() {
        Ok(n.to_string())
    } else {
        Err(JsValue::from_str(&format!(
            "Item at index {index} has no string or number '{KEY_PROPERTY}' property"
        )))
    }
}

pub fn items_from_array(items: &Array) -> Result<Rc<[JsItem]>, JsValue> {
    let mut parsed = Vec::with_capacity(items.length() as usize);
    for index in 0..items.length() {
        let value = items.get(index);
        let key = read_key(&value, index)?;
        parsed.push(JsItem { key, value });
    }
    Ok(Rc::from(parsed))
}
