//! The sizing solver.
//!
//! Runs once along X with declaration-time heights, then again along Y
//! after text wrapping and aspect resolution. Distribution along the layout
//! axis compresses by the equal-largest rule on overflow and grows by the
//! symmetric equal-smallest rule on slack; both make strictly monotone
//! progress on the remaining slack, so the loops terminate.

use crate::config::{LayoutDirection, TextWrapMode};
use crate::context::{LayoutContext, TreeNode};
use crate::element::{AxisSizing, LayoutElement, SizingKind};
use crate::store::push_bounded;

pub(crate) const EPSILON: f32 = 0.01;

pub(crate) fn float_equal(left: f32, right: f32) -> bool {
    (left - right).abs() < EPSILON
}

fn axis_size(element: &LayoutElement, x_axis: bool) -> f32 {
    if x_axis {
        element.dimensions.width
    } else {
        element.dimensions.height
    }
}

fn set_axis_size(element: &mut LayoutElement, x_axis: bool, size: f32) {
    if x_axis {
        element.dimensions.width = size;
    } else {
        element.dimensions.height = size;
    }
}

fn axis_min_size(element: &LayoutElement, x_axis: bool) -> f32 {
    if x_axis {
        element.min_dimensions.width
    } else {
        element.min_dimensions.height
    }
}

fn axis_sizing(element: &LayoutElement, x_axis: bool) -> AxisSizing {
    if x_axis {
        element.layout.width
    } else {
        element.layout.height
    }
}

impl LayoutContext {
    /// The full post-declaration pipeline, run from `end_layout`.
    pub(crate) fn calculate_final_layout(&mut self) {
        self.size_along_axis(true);
        self.wrap_text();
        self.scale_aspect_heights();
        self.propagate_wrapped_heights();
        self.size_along_axis(false);
        self.scale_aspect_widths();
        self.sort_roots();
        self.emit_commands();
    }

    /// Width/height distribution for one axis, BFS per layout root.
    fn size_along_axis(&mut self, x_axis: bool) {
        for root_index in 0..self.roots.len() {
            let root = *self.roots.get(root_index);
            let root_element_index = root.element_index as usize;
            self.bfs_buffer.clear();
            push_bounded(&mut self.bfs_buffer, root.element_index);

            // Floating roots take their Grow/Percent sizes from the attach
            // parent rather than from spare space.
            let root_element = *self.elements.get(root_element_index);
            if let Some(floating) = self.find_floating_config(&root_element) {
                if let Some(parent_item) = self.id_map.get(floating.parent_id) {
                    let parent = *self.elements.get(parent_item.element_index as usize);
                    let mut root_element = root_element;
                    match root_element.layout.width.kind {
                        SizingKind::Grow => {
                            root_element.dimensions.width = parent.dimensions.width;
                        }
                        SizingKind::Percent => {
                            root_element.dimensions.width =
                                parent.dimensions.width * root_element.layout.width.percent;
                        }
                        _ => {}
                    }
                    match root_element.layout.height.kind {
                        SizingKind::Grow => {
                            root_element.dimensions.height = parent.dimensions.height;
                        }
                        SizingKind::Percent => {
                            root_element.dimensions.height =
                                parent.dimensions.height * root_element.layout.height.percent;
                        }
                        _ => {}
                    }
                    self.elements.set(root_element_index, root_element);
                }
            }

            let mut root_element = *self.elements.get(root_element_index);
            if root_element.layout.width.kind != SizingKind::Percent {
                root_element.dimensions.width = root_element
                    .dimensions
                    .width
                    .max(root_element.layout.width.min)
                    .min(root_element.layout.width.max);
            }
            if root_element.layout.height.kind != SizingKind::Percent {
                root_element.dimensions.height = root_element
                    .dimensions
                    .height
                    .max(root_element.layout.height.min)
                    .min(root_element.layout.height.max);
            }
            self.elements.set(root_element_index, root_element);

            let mut bfs_position = 0_usize;
            while bfs_position < self.bfs_buffer.len() {
                let parent_index = self.bfs_buffer[bfs_position] as usize;
                bfs_position += 1;
                let parent = *self.elements.get(parent_index);
                let parent_size = axis_size(&parent, x_axis);
                let parent_padding = if x_axis {
                    parent.layout.padding.horizontal()
                } else {
                    parent.layout.padding.vertical()
                };
                let parent_child_gap = f32::from(parent.layout.child_gap);
                let sizing_along_axis = (x_axis
                    && parent.layout.direction == LayoutDirection::LeftToRight)
                    || (!x_axis && parent.layout.direction == LayoutDirection::TopToBottom);
                let mut inner_content_size = 0.0_f32;
                let mut total_padding_and_gaps = parent_padding;
                let mut grow_count = 0_usize;
                self.resizable_buffer.clear();

                let children = parent.children();
                for child_offset in 0..children.len as usize {
                    let child_index =
                        *self.element_children.get(children.start as usize + child_offset);
                    let child = *self.elements.get(child_index as usize);
                    let child_sizing = axis_sizing(&child, x_axis);
                    let child_size = axis_size(&child, x_axis);

                    if !child.is_text() && child.child_count() > 0 {
                        push_bounded(&mut self.bfs_buffer, child_index);
                    }

                    // Wrappable text can trade width for height; text in
                    // other wrap modes keeps its measured size.
                    let resizable = child_sizing.kind != SizingKind::Percent
                        && child_sizing.kind != SizingKind::Fixed
                        && (!child.is_text()
                            || self
                                .find_text_config(&child)
                                .is_none_or(|config| config.wrap_mode == TextWrapMode::Words));
                    if resizable {
                        push_bounded(&mut self.resizable_buffer, child_index);
                    }

                    if sizing_along_axis {
                        inner_content_size += if child_sizing.kind == SizingKind::Percent {
                            0.0
                        } else {
                            child_size
                        };
                        if child_sizing.kind == SizingKind::Grow {
                            grow_count += 1;
                        }
                        if child_offset > 0 {
                            inner_content_size += parent_child_gap;
                            total_padding_and_gaps += parent_child_gap;
                        }
                    } else {
                        inner_content_size = inner_content_size.max(child_size);
                    }
                }

                // Percent children resolve against the parent's inner size.
                for child_offset in 0..children.len as usize {
                    let child_index =
                        *self.element_children.get(children.start as usize + child_offset);
                    let mut child = *self.elements.get(child_index as usize);
                    if axis_sizing(&child, x_axis).kind == SizingKind::Percent {
                        let resolved = (parent_size - total_padding_and_gaps)
                            * axis_sizing(&child, x_axis).percent;
                        set_axis_size(&mut child, x_axis, resolved);
                        self.elements.set(child_index as usize, child);
                        if sizing_along_axis {
                            inner_content_size += resolved;
                        }
                        self.update_aspect_ratio_box(child_index as usize);
                    }
                }

                if sizing_along_axis {
                    let size_to_distribute = parent_size - parent_padding - inner_content_size;
                    if size_to_distribute < 0.0 {
                        // A clip container just lets content overflow on
                        // the clipped axis.
                        if let Some(clip) = self.find_clip_config(&parent) {
                            if (x_axis && clip.horizontal) || (!x_axis && clip.vertical) {
                                continue;
                            }
                        }
                        self.compress_children(x_axis, size_to_distribute);
                    } else if size_to_distribute > 0.0 && grow_count > 0 {
                        let mut position = 0_usize;
                        while position < self.resizable_buffer.len() {
                            let child_index = self.resizable_buffer[position] as usize;
                            let kind = axis_sizing(self.elements.get(child_index), x_axis).kind;
                            if kind != SizingKind::Grow {
                                self.resizable_buffer.swap_remove(position);
                            } else {
                                position += 1;
                            }
                        }
                        self.grow_children(x_axis, size_to_distribute);
                    }
                } else {
                    // Off axis: grow children fill the parent, everyone is
                    // clamped into the padded box (or the content size for
                    // the clipped axis of a scroll container).
                    for position in 0..self.resizable_buffer.len() {
                        let child_index = self.resizable_buffer[position] as usize;
                        let mut child = *self.elements.get(child_index);
                        let child_sizing = axis_sizing(&child, x_axis);
                        let min_size = axis_min_size(&child, x_axis);
                        let mut child_size = axis_size(&child, x_axis);
                        let mut max_size = parent_size - parent_padding;
                        if let Some(clip) = self.find_clip_config(&parent) {
                            if (x_axis && clip.horizontal) || (!x_axis && clip.vertical) {
                                max_size = max_size.max(inner_content_size);
                            }
                        }
                        if child_sizing.kind == SizingKind::Grow {
                            child_size = max_size.min(child_sizing.max);
                        }
                        child_size = min_size.max(child_size.min(max_size));
                        set_axis_size(&mut child, x_axis, child_size);
                        self.elements.set(child_index, child);
                    }
                }
            }
        }
    }

    /// Equal-largest compression: repeatedly pull the currently-largest
    /// children down toward the second largest until the deficit is paid or
    /// every child sits at its minimum.
    fn compress_children(&mut self, x_axis: bool, mut size_to_distribute: f32) {
        while size_to_distribute < -EPSILON && !self.resizable_buffer.is_empty() {
            let mut largest = 0.0_f32;
            let mut second_largest = 0.0_f32;
            let mut width_to_add = size_to_distribute;
            for &child_index in &self.resizable_buffer {
                let child_size = axis_size(self.elements.get(child_index as usize), x_axis);
                if float_equal(child_size, largest) {
                    continue;
                }
                if child_size > largest {
                    second_largest = largest;
                    largest = child_size;
                }
                if child_size < largest {
                    second_largest = second_largest.max(child_size);
                    width_to_add = second_largest - largest;
                }
            }
            width_to_add =
                width_to_add.max(size_to_distribute / self.resizable_buffer.len() as f32);

            let mut position = 0_usize;
            while position < self.resizable_buffer.len() {
                let child_index = self.resizable_buffer[position] as usize;
                let mut child = *self.elements.get(child_index);
                let mut child_size = axis_size(&child, x_axis);
                let min_size = axis_min_size(&child, x_axis);
                let previous_size = child_size;
                if float_equal(child_size, largest) {
                    child_size += width_to_add;
                    let mut removed = false;
                    if child_size <= min_size {
                        child_size = min_size;
                        self.resizable_buffer.swap_remove(position);
                        removed = true;
                    }
                    size_to_distribute -= child_size - previous_size;
                    set_axis_size(&mut child, x_axis, child_size);
                    self.elements.set(child_index, child);
                    if removed {
                        // Re-examine the element swapped into this slot.
                        continue;
                    }
                }
                position += 1;
            }
        }
    }

    /// Equal-smallest growth: the mirror image of compression, bounded by
    /// each child's max.
    fn grow_children(&mut self, x_axis: bool, mut size_to_distribute: f32) {
        while size_to_distribute > EPSILON && !self.resizable_buffer.is_empty() {
            let mut smallest = f32::MAX;
            let mut second_smallest = f32::MAX;
            let mut width_to_add = size_to_distribute;
            for &child_index in &self.resizable_buffer {
                let child_size = axis_size(self.elements.get(child_index as usize), x_axis);
                if float_equal(child_size, smallest) {
                    continue;
                }
                if child_size < smallest {
                    second_smallest = smallest;
                    smallest = child_size;
                }
                if child_size > smallest {
                    second_smallest = second_smallest.min(child_size);
                    width_to_add = second_smallest - smallest;
                }
            }
            width_to_add =
                width_to_add.min(size_to_distribute / self.resizable_buffer.len() as f32);

            let mut position = 0_usize;
            while position < self.resizable_buffer.len() {
                let child_index = self.resizable_buffer[position] as usize;
                let mut child = *self.elements.get(child_index);
                let mut child_size = axis_size(&child, x_axis);
                let max_size = axis_sizing(&child, x_axis).max;
                let previous_size = child_size;
                if float_equal(child_size, smallest) {
                    child_size += width_to_add;
                    let mut removed = false;
                    if child_size >= max_size {
                        child_size = max_size;
                        self.resizable_buffer.swap_remove(position);
                        removed = true;
                    }
                    size_to_distribute -= child_size - previous_size;
                    set_axis_size(&mut child, x_axis, child_size);
                    self.elements.set(child_index, child);
                    if removed {
                        continue;
                    }
                }
                position += 1;
            }
        }
    }

    /// Re-fits container heights after wrapping and aspect scaling changed
    /// leaf heights. DFS so children resolve before their parents.
    fn propagate_wrapped_heights(&mut self) {
        self.dfs_buffer.clear();
        if self.visited.len() < self.dfs_buffer.capacity() {
            return;
        }
        for root_index in 0..self.roots.len() {
            let root = *self.roots.get(root_index);
            let slot = self.dfs_buffer.len();
            if slot < self.visited.len() {
                self.visited[slot] = false;
            }
            push_bounded(
                &mut self.dfs_buffer,
                TreeNode {
                    element_index: root.element_index,
                    ..TreeNode::default()
                },
            );
        }
        while !self.dfs_buffer.is_empty() {
            let top = self.dfs_buffer.len() - 1;
            let element_index = self.dfs_buffer[top].element_index as usize;
            let element = *self.elements.get(element_index);

            if !self.visited[top] {
                self.visited[top] = true;
                if element.is_text() || element.child_count() == 0 {
                    self.dfs_buffer.pop();
                    continue;
                }
                let children = element.children();
                for k in 0..children.len as usize {
                    let child_index = *self.element_children.get(children.start as usize + k);
                    let slot = self.dfs_buffer.len();
                    if slot < self.visited.len() {
                        self.visited[slot] = false;
                    }
                    push_bounded(
                        &mut self.dfs_buffer,
                        TreeNode {
                            element_index: child_index,
                            ..TreeNode::default()
                        },
                    );
                }
                continue;
            }
            self.dfs_buffer.pop();

            let mut element = element;
            let layout = element.layout;
            let children = element.children();
            match layout.direction {
                LayoutDirection::LeftToRight => {
                    for k in 0..children.len as usize {
                        let child_index = *self.element_children.get(children.start as usize + k);
                        let child = *self.elements.get(child_index as usize);
                        let child_height_with_padding = (child.dimensions.height
                            + layout.padding.vertical())
                        .max(element.dimensions.height);
                        element.dimensions.height = child_height_with_padding
                            .max(layout.height.min)
                            .min(layout.height.max);
                    }
                }
                LayoutDirection::TopToBottom => {
                    let mut content_height = layout.padding.vertical();
                    for k in 0..children.len as usize {
                        let child_index = *self.element_children.get(children.start as usize + k);
                        let child = *self.elements.get(child_index as usize);
                        content_height += child.dimensions.height;
                    }
                    content_height += (children.len.max(1) - 1) as f32
                        * f32::from(layout.child_gap);
                    element.dimensions.height = content_height
                        .max(layout.height.min)
                        .min(layout.height.max);
                }
            }
            self.elements.set(element_index, element);
        }
    }

    /// After the X pass: heights follow from widths, and the height max is
    /// pinned so the Y pass cannot stretch the box out of ratio.
    fn scale_aspect_heights(&mut self) {
        for position in 0..self.aspect_indexes.len() {
            let element_index = self.aspect_indexes[position] as usize;
            let mut element = *self.elements.get(element_index);
            let Some(ratio) = self.find_aspect_ratio(&element) else {
                continue;
            };
            element.dimensions.height = (1.0 / ratio) * element.dimensions.width;
            element.layout.height.max = element.dimensions.height;
            self.elements.set(element_index, element);
        }
    }

    /// After the Y pass: widths follow from final heights.
    fn scale_aspect_widths(&mut self) {
        for position in 0..self.aspect_indexes.len() {
            let element_index = self.aspect_indexes[position] as usize;
            let mut element = *self.elements.get(element_index);
            let Some(ratio) = self.find_aspect_ratio(&element) else {
                continue;
            };
            element.dimensions.width = ratio * element.dimensions.height;
            self.elements.set(element_index, element);
        }
    }

    /// Stable sort, ascending z. Root counts are small; a bubble pass keeps
    /// equal-z roots in declaration order.
    fn sort_roots(&mut self) {
        let mut sort_max = self.roots.len().saturating_sub(1);
        while sort_max > 0 {
            for k in 0..sort_max {
                let current = *self.roots.get(k);
                let next = *self.roots.get(k + 1);
                if next.z_index < current.z_index {
                    self.roots.set(k, next);
                    self.roots.set(k + 1, current);
                }
            }
            sort_max -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_equal_uses_epsilon_band() {
        assert!(float_equal(10.0, 10.0));
        assert!(float_equal(10.0, 10.009));
        assert!(!float_equal(10.0, 10.011));
    }
}
