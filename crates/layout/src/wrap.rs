//! Greedy word wrapping, run between the two solver passes.
//!
//! Consumes the measured-word chains from the cache and produces line
//! slices over the frame text buffer. Container widths are final at this
//! point; wrapping then sets each text element's height to
//! `line count x line height` for the Y pass to propagate.

use crate::config::TextWrapMode;
use crate::context::LayoutContext;
use crate::element::WrappedLine;
use crate::measure::WORD_NONE;
use crate::store::Span;
use trellis_types::Dimensions;

impl LayoutContext {
    pub(crate) fn wrap_text(&mut self) {
        for text_index in 0..self.text_data.len() {
            let mut text_data = *self.text_data.get(text_index);
            text_data.wrapped = Span {
                start: self.wrapped_lines.len() as u32,
                len: 0,
            };
            let container_index = text_data.element_index as usize;
            let container = *self.elements.get(container_index);
            let Some(text_config) = self.find_text_config(&container) else {
                self.text_data.set(text_index, text_data);
                continue;
            };
            let measured = self.measure_text_cached(text_data.text, &text_config);
            let line_height = if text_config.line_height > 0 {
                f32::from(text_config.line_height)
            } else {
                text_data.preferred.height
            };

            // Fits on one line, or wrapping is off entirely.
            if (!measured.contains_newlines
                && text_data.preferred.width <= container.dimensions.width)
                || text_config.wrap_mode == TextWrapMode::None
            {
                if self
                    .wrapped_lines
                    .try_push(WrappedLine {
                        dimensions: container.dimensions,
                        span: text_data.text,
                    })
                    .is_some()
                {
                    text_data.wrapped.len += 1;
                }
                self.text_data.set(text_index, text_data);
                continue;
            }

            // In Newlines mode only the explicit markers break lines.
            let boundary = if text_config.wrap_mode == TextWrapMode::Words {
                container.dimensions.width
            } else {
                f32::MAX
            };
            let space_width = self.measure_raw(" ", &text_config).width;
            let letter_spacing = f32::from(text_config.letter_spacing);
            let mut line_width = 0.0_f32;
            let mut line_length = 0_u32;
            let mut line_start = 0_u32;
            let mut word_index = measured.words_start;
            while word_index != WORD_NONE {
                if self.wrapped_lines.is_full() {
                    break;
                }
                let word = *self.measure_cache.word(word_index);
                if line_length == 0 && line_width + word.width > boundary {
                    // A single word wider than the container gets its own
                    // line rather than being split.
                    if self
                        .wrapped_lines
                        .try_push(WrappedLine {
                            dimensions: Dimensions::new(word.width, line_height),
                            span: Span {
                                start: text_data.text.start + word.start,
                                len: word.len,
                            },
                        })
                        .is_some()
                    {
                        text_data.wrapped.len += 1;
                    }
                    word_index = word.next;
                    line_start = word.start + word.len;
                } else if word.len == 0 || line_width + word.width > boundary {
                    // Forced break (zero-length marker) or overflow: flush,
                    // trimming a trailing space off the measured width.
                    let final_char_is_space = line_length > 0
                        && self
                            .frame_text
                            .get(text_data.text)
                            .as_bytes()
                            .get((line_start + line_length - 1) as usize)
                            == Some(&b' ');
                    let (trim_width, trim_len) = if final_char_is_space {
                        (space_width, 1)
                    } else {
                        (0.0, 0)
                    };
                    if self
                        .wrapped_lines
                        .try_push(WrappedLine {
                            dimensions: Dimensions::new(line_width - trim_width, line_height),
                            span: Span {
                                start: text_data.text.start + line_start,
                                len: line_length - trim_len,
                            },
                        })
                        .is_some()
                    {
                        text_data.wrapped.len += 1;
                    }
                    if line_length == 0 || word.len == 0 {
                        word_index = word.next;
                    }
                    line_width = 0.0;
                    line_length = 0;
                    line_start = word.start;
                } else {
                    line_width += word.width + letter_spacing;
                    line_length += word.len;
                    word_index = word.next;
                }
            }
            if line_length > 0
                && self
                    .wrapped_lines
                    .try_push(WrappedLine {
                        dimensions: Dimensions::new(line_width - letter_spacing, line_height),
                        span: Span {
                            start: text_data.text.start + line_start,
                            len: line_length,
                        },
                    })
                    .is_some()
            {
                text_data.wrapped.len += 1;
            }

            let mut container = *self.elements.get(container_index);
            container.dimensions.height = line_height * text_data.wrapped.len as f32;
            self.elements.set(container_index, container);
            self.text_data.set(text_index, text_data);
        }
    }
}
