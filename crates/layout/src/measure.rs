//! The text measurement cache.
//!
//! Measuring text through the host callback is the most expensive thing the
//! engine does, so results are memoized per (string contents, measurement
//! config) fingerprint. Each entry records the string's unwrapped
//! dimensions plus a linked list of measured words the wrapper consumes.
//! Entries not touched for more than two frames are evicted inline during
//! lookup and their word chains recycled through free lists.

use crate::config::TextConfig;
use crate::context::ErrorChannel;
use crate::store::{Arena, Pool};
use crate::ErrorKind;
use trellis_types::Dimensions;

/// Terminator for word chains.
pub(crate) const WORD_NONE: i32 = -1;

#[derive(Debug, Clone, Copy)]
pub(crate) struct MeasuredWord {
    /// Byte offset into the source string.
    pub start: u32,
    /// Byte length. A length of 0 marks an explicit newline.
    pub len: u32,
    /// Measured width; words followed by a space include the space.
    pub width: f32,
    pub next: i32,
}

impl Default for MeasuredWord {
    fn default() -> Self {
        Self {
            start: 0,
            len: 0,
            width: 0.0,
            next: WORD_NONE,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct MeasureCacheItem {
    pub unwrapped: Dimensions,
    /// Width of the widest single word; the floor for word-wrapped sizing.
    pub min_width: f32,
    pub id: u32,
    pub words_start: i32,
    pub contains_newlines: bool,
    pub generation: u32,
    /// Bucket chain link; 0 terminates (slot 0 is reserved).
    pub next: i32,
}

impl Default for MeasureCacheItem {
    fn default() -> Self {
        Self {
            unwrapped: Dimensions::default(),
            min_width: 0.0,
            id: 0,
            words_start: WORD_NONE,
            contains_newlines: false,
            generation: 0,
            next: 0,
        }
    }
}

/// Fingerprint of the string contents plus the config fields that affect
/// measurement. Never 0.
fn fingerprint(text: &str, config: &TextConfig) -> u32 {
    let mut hash: u32 = 0;
    for &byte in text.as_bytes() {
        hash = hash.wrapping_add(u32::from(byte));
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    for field in [
        u32::from(config.font_id),
        u32::from(config.font_size),
        u32::from(config.letter_spacing),
    ] {
        hash = hash.wrapping_add(field);
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash = hash.wrapping_add(hash << 15);
    hash.wrapping_add(1)
}

pub(crate) struct MeasureTextCache {
    /// Closed-addressing table; bucket value is an item index, 0 = empty.
    buckets: Vec<i32>,
    items: Pool<MeasureCacheItem>,
    words: Pool<MeasuredWord>,
    item_free_list: Vec<i32>,
    word_free_list: Vec<i32>,
}

impl MeasureTextCache {
    pub fn new(max_items: usize, max_words: usize, arena: &mut Arena) -> Self {
        let bucket_count = (max_words / 32).max(1);
        let buckets = if arena.charge(bucket_count * size_of::<i32>()) {
            vec![0; bucket_count]
        } else {
            Vec::new()
        };
        let mut items = Pool::new(max_items, arena);
        // Slot 0 is reserved so 0 can terminate bucket chains.
        items.try_push(MeasureCacheItem::default());
        let words = Pool::new(max_words, arena);
        let item_free_list = if arena.charge(max_items * size_of::<i32>()) {
            Vec::with_capacity(max_items)
        } else {
            Vec::new()
        };
        let word_free_list = if arena.charge(max_words * size_of::<i32>()) {
            Vec::with_capacity(max_words)
        } else {
            Vec::new()
        };
        Self {
            buckets,
            items,
            words,
            item_free_list,
            word_free_list,
        }
    }

    pub fn word(&self, index: i32) -> &MeasuredWord {
        self.words.get(index as usize)
    }

    /// Looks up or builds the measurement entry for `text`, evicting stale
    /// entries encountered on the way. Returns a copy of the entry; an
    /// all-default entry (no words) signals failure after a reported error.
    pub fn measure_cached(
        &mut self,
        text: &str,
        config: &TextConfig,
        measure_fn: &mut dyn FnMut(&str, &TextConfig) -> Dimensions,
        errors: &mut ErrorChannel,
        generation: u32,
    ) -> MeasureCacheItem {
        if self.buckets.is_empty() {
            return MeasureCacheItem::default();
        }
        let id = fingerprint(text, config);
        let bucket = id as usize % self.buckets.len();
        let mut previous: i32 = 0;
        let mut index = self.buckets[bucket];
        while index != 0 {
            let entry = *self.items.get(index as usize);
            if entry.id == id {
                let entry = self.items.get_mut(index as usize);
                entry.generation = generation;
                return *entry;
            }
            if generation.wrapping_sub(entry.generation) > 2 {
                // Stale entry: recycle its word chain and the slot itself,
                // then unlink it from the bucket chain.
                let mut word_index = entry.words_start;
                while word_index != WORD_NONE {
                    let next_word = self.words.get(word_index as usize).next;
                    self.word_free_list.push(word_index);
                    word_index = next_word;
                }
                self.items.set(index as usize, MeasureCacheItem::default());
                self.item_free_list.push(index);
                if previous == 0 {
                    self.buckets[bucket] = entry.next;
                } else {
                    self.items.get_mut(previous as usize).next = entry.next;
                }
                index = entry.next;
            } else {
                previous = index;
                index = entry.next;
            }
        }

        let new_item = MeasureCacheItem {
            id,
            generation,
            ..MeasureCacheItem::default()
        };
        let new_index: i32 = if let Some(free) = self.item_free_list.pop() {
            self.items.set(free as usize, new_item);
            free
        } else {
            match self.items.try_push(new_item) {
                Some(pushed) => pushed as i32,
                None => {
                    errors.report_once(
                        ErrorKind::TextMeasurementCapacityExceeded,
                        "ran out of measurement cache entries; raise max_measured_word_count",
                    );
                    return MeasureCacheItem::default();
                }
            }
        };

        let space_width = measure_fn(" ", config).width;
        let mut measured = new_item;
        let mut measured_width = 0.0_f32;
        let mut measured_height = 0.0_f32;
        let mut line_width = 0.0_f32;
        let mut head = WORD_NONE;
        let mut prev_word = WORD_NONE;
        let bytes = text.as_bytes();
        let mut start = 0_usize;
        let mut end = 0_usize;
        while end < bytes.len() {
            let current = bytes[end];
            // Word boundaries are ASCII, so slicing at them is UTF-8 safe.
            if current == b' ' || current == b'\n' {
                let len = end - start;
                let dims = if len > 0 {
                    measure_fn(&text[start..end], config)
                } else {
                    Dimensions::default()
                };
                measured.min_width = measured.min_width.max(dims.width);
                measured_height = measured_height.max(dims.height);
                let mut overflowed = false;
                if current == b' ' {
                    let width = dims.width + space_width;
                    overflowed |= !self.add_word(
                        MeasuredWord {
                            start: start as u32,
                            len: (len + 1) as u32,
                            width,
                            next: WORD_NONE,
                        },
                        &mut head,
                        &mut prev_word,
                    );
                    line_width += width;
                } else {
                    if len > 0 {
                        overflowed |= !self.add_word(
                            MeasuredWord {
                                start: start as u32,
                                len: len as u32,
                                width: dims.width,
                                next: WORD_NONE,
                            },
                            &mut head,
                            &mut prev_word,
                        );
                    }
                    // A zero-length word marks the forced break.
                    overflowed |= !self.add_word(
                        MeasuredWord {
                            start: (end + 1) as u32,
                            len: 0,
                            width: 0.0,
                            next: WORD_NONE,
                        },
                        &mut head,
                        &mut prev_word,
                    );
                    line_width += dims.width;
                    measured_width = measured_width.max(line_width);
                    measured.contains_newlines = true;
                    line_width = 0.0;
                }
                if overflowed {
                    errors.report_once(
                        ErrorKind::TextMeasurementCapacityExceeded,
                        "ran out of measured-word slots; raise max_measured_word_count",
                    );
                    return MeasureCacheItem::default();
                }
                start = end + 1;
            }
            end += 1;
        }
        if end > start {
            let dims = measure_fn(&text[start..end], config);
            if !self.add_word(
                MeasuredWord {
                    start: start as u32,
                    len: (end - start) as u32,
                    width: dims.width,
                    next: WORD_NONE,
                },
                &mut head,
                &mut prev_word,
            ) {
                errors.report_once(
                    ErrorKind::TextMeasurementCapacityExceeded,
                    "ran out of measured-word slots; raise max_measured_word_count",
                );
                return MeasureCacheItem::default();
            }
            line_width += dims.width;
            measured_height = measured_height.max(dims.height);
            measured.min_width = measured.min_width.max(dims.width);
        }
        measured_width = measured_width.max(line_width) - f32::from(config.letter_spacing);

        measured.words_start = head;
        measured.unwrapped = Dimensions::new(measured_width, measured_height);
        self.items.set(new_index as usize, measured);

        if previous != 0 {
            self.items.get_mut(previous as usize).next = new_index;
        } else {
            self.buckets[bucket] = new_index;
        }
        measured
    }

    fn add_word(&mut self, word: MeasuredWord, head: &mut i32, prev: &mut i32) -> bool {
        let index: i32 = if let Some(free) = self.word_free_list.pop() {
            self.words.set(free as usize, word);
            free
        } else {
            match self.words.try_push(word) {
                Some(pushed) => pushed as i32,
                None => return false,
            }
        };
        if *prev == WORD_NONE {
            *head = index;
        } else {
            self.words.get_mut(*prev as usize).next = index;
        }
        *prev = index;
        true
    }
}
