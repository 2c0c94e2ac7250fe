// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document's `<video>` elements.

use alloc::vec::Vec;

use playrate_core::video::VideoSet;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use web_sys::{Document, HtmlVideoElement};

/// A snapshot of the `<video>` elements in a document, in document order.
///
/// Query a fresh snapshot for every request; elements added or removed after
/// [`query`](Self::query) are not seen.
#[derive(Debug)]
pub struct DocumentVideos {
    videos: Vec<HtmlVideoElement>,
}

impl DocumentVideos {
    /// Collects every `<video>` element in `document`.
    ///
    /// # Errors
    ///
    /// Propagates a failing `querySelectorAll`.
    pub fn query(document: &Document) -> Result<Self, JsValue> {
        let list = document.query_selector_all("video")?;
        let videos = (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<HtmlVideoElement>().ok())
            .collect();
        Ok(Self { videos })
    }

    /// Returns the elements.
    #[must_use]
    pub fn elements(&self) -> &[HtmlVideoElement] {
        &self.videos
    }
}

impl VideoSet for DocumentVideos {
    fn len(&self) -> usize {
        self.videos.len()
    }

    fn first_rate(&self) -> Option<f64> {
        self.videos.first().map(|v| v.playback_rate())
    }

    fn set_all_rates(&mut self, rate: f64) -> usize {
        for video in &self.videos {
            video.set_playback_rate(rate);
        }
        self.videos.len()
    }
}
