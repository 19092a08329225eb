//! The per-frame declaration API: opening, configuring and closing
//! elements between `begin_layout` and `end_layout`.

use crate::config::{Declaration, FloatingAttachTo, FloatingClipTo, SizingAxis, TextConfig};
use crate::context::{LayoutContext, MapInsert, ROOT_LABEL};
use crate::element::{ElementConfig, ElementContent, LayoutElement, ResolvedLayout, SharedConfig, SizingKind, TextElementData, LayoutRoot};
use crate::config::LayoutDirection;
use crate::scroll::ScrollContainer;
use crate::store::{push_bounded, Span};
use crate::ErrorKind;
use trellis_types::{hash_number, hash_string, hash_string_indexed, Dimensions, ElementId};

impl LayoutContext {
    /// Hashes a string label into an element id.
    pub fn id(&self, label: &str) -> ElementId {
        hash_string(label, 0)
    }

    /// Hashes a string label plus an index, for elements declared in loops.
    pub fn idi(&self, label: &str, index: u32) -> ElementId {
        hash_string_indexed(label, index, 0)
    }

    pub(crate) fn current_open_index(&self) -> usize {
        self.open_stack.last().copied().unwrap_or(0) as usize
    }

    fn report_elements_exhausted(&mut self) {
        if !self.errors.warnings.max_elements_exceeded {
            self.errors.warnings.max_elements_exceeded = true;
            self.errors.report(
                ErrorKind::ElementsCapacityExceeded,
                "element capacity exceeded; further declarations are dropped this frame",
            );
        }
    }

    fn bind_id(&mut self, id: ElementId, element_index: u32) {
        match self.id_map.insert(id, element_index, self.generation) {
            MapInsert::DuplicateThisFrame => self.errors.report(
                ErrorKind::DuplicateId,
                "an element with this id was already declared this frame; keeping the first binding",
            ),
            // A full map leaves the element unaddressable but laid out.
            MapInsert::Full | MapInsert::Added | MapInsert::Reused => {}
        }
    }

    fn push_open_element(&mut self) -> Option<usize> {
        if self.elements.is_full() || self.errors.warnings.max_elements_exceeded {
            self.report_elements_exhausted();
            return None;
        }
        let index = self.elements.try_push(LayoutElement::default())?;
        push_bounded(&mut self.open_stack, index as u32);
        // Every element records the clip scope it was declared inside.
        let clip_id = self.open_clip_stack.last().copied().unwrap_or(0);
        push_bounded(&mut self.element_clip_ids, clip_id);
        Some(index)
    }

    /// Opens an anonymous element. Its id derives from the parent id and
    /// the element's sibling position, so it is stable across frames as
    /// long as sibling order is.
    pub fn open_element(&mut self) {
        let Some(index) = self.push_open_element() else {
            return;
        };
        let parent_index = match self.open_stack.len().checked_sub(2) {
            Some(position) => self.open_stack[position] as usize,
            None => 0,
        };
        let parent = *self.elements.get(parent_index);
        let offset = parent.child_count() as u32 + u32::from(parent.floating_children);
        let id = hash_number(offset, parent.id);
        self.elements.get_mut(index).id = id.id;
        self.bind_id(id, index as u32);
    }

    /// Opens an element under a caller-chosen id (see [`Self::id`] /
    /// [`Self::idi`]). Re-declaring an id within one frame reports
    /// `DuplicateId` and keeps the first binding.
    pub fn open_element_with_id(&mut self, id: ElementId) {
        let Some(index) = self.push_open_element() else {
            return;
        };
        self.elements.get_mut(index).id = id.id;
        self.bind_id(id, index as u32);
    }

    fn attach_config(&mut self, config: ElementConfig) {
        if self.errors.warnings.max_elements_exceeded {
            return;
        }
        if self.element_configs.try_push(config).is_some() {
            let open_index = self.current_open_index();
            self.elements.get_mut(open_index).configs.len += 1;
        } else {
            self.report_elements_exhausted();
        }
    }

    /// Attaches the declaration to the currently open element: layout
    /// settings plus any non-default sub-configs, registering floating
    /// roots and clip containers as a side effect.
    pub fn configure_open(&mut self, declaration: &Declaration) {
        if self.errors.warnings.max_elements_exceeded {
            return;
        }
        let open_index = self.current_open_index();
        self.elements.get_mut(open_index).layout = ResolvedLayout::from(&declaration.layout);

        let percent_over = |sizing: &SizingAxis| matches!(sizing, SizingAxis::Percent(p) if *p > 1.0);
        if percent_over(&declaration.layout.sizing.width)
            || percent_over(&declaration.layout.sizing.height)
        {
            self.errors.report(
                ErrorKind::PercentageOver1,
                "percent sizing expects a fraction in 0.0..=1.0, not a 0-100 value",
            );
        }

        self.elements.get_mut(open_index).configs = Span {
            start: self.element_configs.len() as u32,
            len: 0,
        };

        let mut shared = SharedConfig::default();
        let mut has_shared = false;
        if declaration.background_color.is_visible() {
            shared.background_color = declaration.background_color;
            has_shared = true;
        }
        if !declaration.corner_radius.is_zero() {
            shared.corner_radius = declaration.corner_radius;
            has_shared = true;
        }
        if declaration.user_data != 0 {
            shared.user_data = declaration.user_data;
            has_shared = true;
        }
        if has_shared {
            self.attach_config(ElementConfig::Shared(shared));
        }

        if let Some(image) = declaration.image {
            self.attach_config(ElementConfig::Image(image));
        }

        if declaration.aspect_ratio > 0.0 {
            self.attach_config(ElementConfig::Aspect(declaration.aspect_ratio));
            push_bounded(&mut self.aspect_indexes, open_index as u32);
        }

        if declaration.floating.attach_to != FloatingAttachTo::None {
            self.configure_floating(open_index, declaration);
        }

        if let Some(custom) = declaration.custom {
            self.attach_config(ElementConfig::Custom(custom));
        }

        if declaration.clip.horizontal || declaration.clip.vertical {
            self.configure_clip(open_index, declaration);
        }

        if !declaration.border.width.is_zero() {
            self.attach_config(ElementConfig::Border(declaration.border));
        }
    }

    fn configure_floating(&mut self, open_index: usize, declaration: &Declaration) {
        let mut floating = declaration.floating;
        // The synthetic root guarantees a hierarchical parent exists.
        let Some(parent_position) = self.open_stack.len().checked_sub(2) else {
            return;
        };
        let parent_index = self.open_stack[parent_position] as usize;
        let parent_id = self.elements.get(parent_index).id;

        let mut clip_element_id = 0_u32;
        match floating.attach_to {
            FloatingAttachTo::Parent => {
                floating.parent_id = parent_id;
                clip_element_id = self.open_clip_stack.last().copied().unwrap_or(0);
            }
            FloatingAttachTo::ElementWithId => match self.id_map.get(floating.parent_id) {
                None => self.errors.report(
                    ErrorKind::FloatingContainerParentNotFound,
                    "floating element declared with a parent id no element declared this frame",
                ),
                Some(item) => {
                    clip_element_id = self
                        .element_clip_ids
                        .get(item.element_index as usize)
                        .copied()
                        .unwrap_or(0);
                }
            },
            FloatingAttachTo::Root => {
                floating.parent_id = hash_string(ROOT_LABEL, 0).id;
            }
            FloatingAttachTo::None => unreachable!("guarded by caller"),
        }
        if floating.clip_to == FloatingClipTo::None {
            clip_element_id = 0;
        }

        if open_index < self.element_clip_ids.len() {
            self.element_clip_ids[open_index] = clip_element_id;
        }
        push_bounded(&mut self.open_clip_stack, clip_element_id);
        self.roots.try_push(LayoutRoot {
            element_index: open_index as u32,
            parent_id: floating.parent_id,
            clip_element_id,
            z_index: floating.z_index,
        });
        self.attach_config(ElementConfig::Floating(floating));
    }

    fn configure_clip(&mut self, open_index: usize, declaration: &Declaration) {
        self.attach_config(ElementConfig::Clip(declaration.clip));
        let element_id = self.elements.get(open_index).id;
        push_bounded(&mut self.open_clip_stack, element_id);

        // Bind or create the persistent scroll state for this container.
        let mut found = false;
        for container in &mut self.scroll_containers {
            if container.element_id == element_id {
                container.element_index = open_index as u32;
                container.open_this_frame = true;
                found = true;
                break;
            }
        }
        if !found && self.scroll_containers.len() < self.scroll_containers.capacity() {
            self.scroll_containers.push(ScrollContainer {
                element_id,
                element_index: open_index as u32,
                open_this_frame: true,
                ..ScrollContainer::default()
            });
        }
        if self.external_scroll_handling {
            if let Some(query) = &mut self.query_scroll_fn {
                let position = query(element_id);
                if let Some(container) = self
                    .scroll_containers
                    .iter_mut()
                    .find(|container| container.element_id == element_id)
                {
                    container.scroll_position = position;
                }
            }
        }
    }

    /// Appends a text leaf to the currently open element. Text elements
    /// have no children and are closed implicitly.
    pub fn open_text(&mut self, text: &str, config: &TextConfig) {
        if self.elements.is_full() || self.errors.warnings.max_elements_exceeded {
            self.report_elements_exhausted();
            return;
        }
        let parent_index = self.current_open_index();
        let Some(index) = self.elements.try_push(LayoutElement::default()) else {
            return;
        };
        let clip_id = self.open_clip_stack.last().copied().unwrap_or(0);
        push_bounded(&mut self.element_clip_ids, clip_id);
        push_bounded(&mut self.children_buffer, index as u32);

        let span = match self.frame_text.push(text) {
            Some(span) => span,
            None => {
                if !self.errors.warnings.frame_text_exceeded {
                    self.errors.warnings.frame_text_exceeded = true;
                    self.errors.report(
                        ErrorKind::ArenaCapacityExceeded,
                        "frame text capacity exceeded; raise frame_text_capacity",
                    );
                }
                Span::default()
            }
        };
        let measured = self.measure_text_cached(span, config);

        let parent = *self.elements.get(parent_index);
        let id = hash_number(parent.child_count() as u32, parent.id);
        self.bind_id(id, index as u32);

        let dimensions = Dimensions::new(
            measured.unwrapped.width,
            if config.line_height > 0 {
                f32::from(config.line_height)
            } else {
                measured.unwrapped.height
            },
        );
        let text_index = self
            .text_data
            .try_push(TextElementData {
                text: span,
                preferred: measured.unwrapped,
                element_index: index as u32,
                wrapped: Span::default(),
            })
            .unwrap_or(0) as u32;

        let configs_start = self.element_configs.len() as u32;
        let attached = self.element_configs.try_push(ElementConfig::Text(*config)).is_some();

        let element = self.elements.get_mut(index);
        element.id = id.id;
        element.dimensions = dimensions;
        element.min_dimensions = Dimensions::new(measured.min_width, dimensions.height);
        element.content = ElementContent::Text(text_index);
        element.configs = Span {
            start: configs_start,
            len: u32::from(attached),
        };

        if let ElementContent::Children(span) = &mut self.elements.get_mut(parent_index).content {
            span.len += 1;
        }
    }

    /// Closes the currently open element: fit-accumulates child sizes into
    /// its dimensions and minimum dimensions, clamps to the configured
    /// sizing bounds, and attaches it to its parent.
    pub fn close_element(&mut self) {
        if self.errors.warnings.max_elements_exceeded {
            return;
        }
        let open_index = self.current_open_index();
        let mut element = *self.elements.get(open_index);

        // Leave the clip scopes this element's configs opened.
        let mut clip_horizontal = false;
        let mut clip_vertical = false;
        let configs_start = element.configs.start as usize;
        for k in 0..element.configs.len as usize {
            match *self.element_configs.get(configs_start + k) {
                ElementConfig::Clip(clip) => {
                    clip_horizontal = clip.horizontal;
                    clip_vertical = clip.vertical;
                    self.open_clip_stack.pop();
                    break;
                }
                ElementConfig::Floating(_) => {
                    self.open_clip_stack.pop();
                }
                _ => {}
            }
        }

        let left_right = element.layout.padding.horizontal();
        let top_bottom = element.layout.padding.vertical();
        let child_count = element.child_count();
        let child_gap =
            (child_count.max(1) - 1) as f32 * f32::from(element.layout.child_gap);
        let children_start = self.element_children.len() as u32;

        match element.layout.direction {
            LayoutDirection::LeftToRight => {
                element.dimensions.width = left_right;
                element.min_dimensions.width = left_right;
                for i in 0..child_count {
                    let buffer_position = self.children_buffer.len() - child_count + i;
                    let child_index = self.children_buffer[buffer_position];
                    let child = *self.elements.get(child_index as usize);
                    element.dimensions.width += child.dimensions.width;
                    element.dimensions.height = element
                        .dimensions
                        .height
                        .max(child.dimensions.height + top_bottom);
                    // Clip containers may shrink below their content.
                    if !clip_horizontal {
                        element.min_dimensions.width += child.min_dimensions.width;
                    }
                    if !clip_vertical {
                        element.min_dimensions.height = element
                            .min_dimensions
                            .height
                            .max(child.min_dimensions.height + top_bottom);
                    }
                    self.element_children.try_push(child_index);
                }
                element.dimensions.width += child_gap;
                if !clip_horizontal {
                    element.min_dimensions.width += child_gap;
                }
            }
            LayoutDirection::TopToBottom => {
                element.dimensions.height = top_bottom;
                element.min_dimensions.height = top_bottom;
                for i in 0..child_count {
                    let buffer_position = self.children_buffer.len() - child_count + i;
                    let child_index = self.children_buffer[buffer_position];
                    let child = *self.elements.get(child_index as usize);
                    element.dimensions.height += child.dimensions.height;
                    element.dimensions.width = element
                        .dimensions
                        .width
                        .max(child.dimensions.width + left_right);
                    if !clip_vertical {
                        element.min_dimensions.height += child.min_dimensions.height;
                    }
                    if !clip_horizontal {
                        element.min_dimensions.width = element
                            .min_dimensions
                            .width
                            .max(child.min_dimensions.width + left_right);
                    }
                    self.element_children.try_push(child_index);
                }
                element.dimensions.height += child_gap;
                if !clip_vertical {
                    element.min_dimensions.height += child_gap;
                }
            }
        }
        if !element.is_text() {
            element.content = ElementContent::Children(Span {
                start: children_start,
                len: child_count as u32,
            });
        }
        self.children_buffer
            .truncate(self.children_buffer.len() - child_count);

        // Clamp to the configured bounds. An unset max reads as unbounded
        // from here on.
        if element.layout.width.kind != SizingKind::Percent {
            element.layout.width.normalize_max();
            element.dimensions.width = element
                .dimensions
                .width
                .max(element.layout.width.min)
                .min(element.layout.width.max);
            element.min_dimensions.width = element
                .min_dimensions
                .width
                .max(element.layout.width.min)
                .min(element.layout.width.max);
        } else {
            element.dimensions.width = 0.0;
        }
        if element.layout.height.kind != SizingKind::Percent {
            element.layout.height.normalize_max();
            element.dimensions.height = element
                .dimensions
                .height
                .max(element.layout.height.min)
                .min(element.layout.height.max);
            element.min_dimensions.height = element
                .min_dimensions
                .height
                .max(element.layout.height.min)
                .min(element.layout.height.max);
        } else {
            element.dimensions.height = 0.0;
        }
        self.elements.set(open_index, element);
        self.update_aspect_ratio_box(open_index);

        let is_floating = self.find_floating_config(&element).is_some();
        let closing_index = self.open_stack.pop().unwrap_or(0);
        if self.open_stack.len() > 1 {
            let parent_index = self.current_open_index();
            if is_floating {
                self.elements.get_mut(parent_index).floating_children += 1;
                return;
            }
            if let ElementContent::Children(span) =
                &mut self.elements.get_mut(parent_index).content
            {
                span.len += 1;
            }
            push_bounded(&mut self.children_buffer, closing_index);
        }
    }

    /// Derives a missing axis from the known one for aspect-ratio boxes.
    /// Runs at close and again after percent resolution.
    pub(crate) fn update_aspect_ratio_box(&mut self, index: usize) {
        let mut element = *self.elements.get(index);
        let Some(ratio) = self.find_aspect_ratio(&element) else {
            return;
        };
        if ratio <= 0.0 {
            return;
        }
        if element.dimensions.width == 0.0 && element.dimensions.height > 0.0 {
            element.dimensions.width = element.dimensions.height * ratio;
        } else if element.dimensions.width > 0.0 && element.dimensions.height == 0.0 {
            element.dimensions.height = element.dimensions.width / ratio;
        }
        if element.min_dimensions.width == 0.0 && element.min_dimensions.height > 0.0 {
            element.min_dimensions.width = element.min_dimensions.height * ratio;
        } else if element.min_dimensions.width > 0.0 && element.min_dimensions.height == 0.0 {
            element.min_dimensions.height = element.min_dimensions.width / ratio;
        }
        self.elements.set(index, element);
    }

    /// Declares an element and its children in one call.
    pub fn element(&mut self, declaration: &Declaration, children: impl FnOnce(&mut Self)) {
        self.open_element();
        self.configure_open(declaration);
        children(self);
        self.close_element();
    }

    /// [`Self::element`] with a caller-chosen id.
    pub fn element_with_id(
        &mut self,
        id: ElementId,
        declaration: &Declaration,
        children: impl FnOnce(&mut Self),
    ) {
        self.open_element_with_id(id);
        self.configure_open(declaration);
        children(self);
        self.close_element();
    }

    /// Declares a text leaf.
    pub fn text(&mut self, text: &str, config: &TextConfig) {
        self.open_text(text, config);
    }
}
