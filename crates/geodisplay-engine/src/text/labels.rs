use std::collections::HashMap;

use super::{TextGeometry, TextShaper, TextStyle};

struct Entry {
    geometry: TextGeometry,
    used: bool,
}

/// Shaped grid labels keyed by their text.
///
/// All labels share one style. Entries not requested between
/// [`begin_frame`](Self::begin_frame) and [`end_frame`](Self::end_frame)
/// are evicted.
pub struct LabelCache {
    style: TextStyle,
    entries: HashMap<String, Entry>,
}

impl LabelCache {
    pub fn new(style: TextStyle) -> Self {
        Self { style, entries: HashMap::new() }
    }

    #[inline]
    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn begin_frame(&mut self) {
        for entry in self.entries.values_mut() {
            entry.used = false;
        }
    }

    pub fn end_frame(&mut self) {
        self.entries.retain(|_, e| e.used);
    }

    pub fn get(&mut self, text: &str, shaper: &mut dyn TextShaper) -> &TextGeometry {
        let style = &self.style;
        let entry = self.entries.entry(text.to_owned()).or_insert_with(|| Entry {
            geometry: shaper.shape(text, style),
            used: false,
        });
        entry.used = true;
        &entry.geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::paint::Color;
    use crate::text::FontId;

    #[derive(Default)]
    struct CountingShaper {
        calls: usize,
    }

    impl TextShaper for CountingShaper {
        fn shape(&mut self, text: &str, style: &TextStyle) -> TextGeometry {
            self.calls += 1;
            let mut geo = TextGeometry::default();
            geo.fill.push_rect(Rect::new(0.0, 0.0, text.len() as f32, 1.0), style.fill);
            geo
        }
    }

    fn cache() -> LabelCache {
        let mut style = TextStyle::new(FontId(0), 12.0);
        style.fill = Color::WHITE;
        LabelCache::new(style)
    }

    #[test]
    fn repeated_labels_are_shaped_once() {
        let mut shaper = CountingShaper::default();
        let mut labels = cache();
        labels.begin_frame();
        labels.get("-200", &mut shaper);
        labels.get("-200", &mut shaper);
        labels.end_frame();
        labels.begin_frame();
        labels.get("-200", &mut shaper);
        labels.end_frame();
        assert_eq!(shaper.calls, 1);
        assert_eq!(labels.len(), 1);
    }

    #[test]
    fn unused_labels_are_evicted() {
        let mut shaper = CountingShaper::default();
        let mut labels = cache();
        labels.begin_frame();
        labels.get("10", &mut shaper);
        labels.get("20", &mut shaper);
        labels.end_frame();

        labels.begin_frame();
        labels.get("20", &mut shaper);
        labels.end_frame();
        assert_eq!(labels.len(), 1);
        assert_eq!(shaper.calls, 2);
    }
}
