//! Final traversal: positions every element and emits the render-command
//! stream.
//!
//! Roots are visited in ascending z order. Within a root a DFS assigns
//! positions on the way down (padding, alignment, scroll offsets) and emits
//! most commands immediately; borders and scissor ends are emitted on the
//! way back up so borders land outside the clip they decorate.

use crate::commands::{RawRenderCommand, RawRenderData, RawTextData};
use crate::config::{
    AttachPoint, FloatingConfig, LayoutAlignmentX, LayoutAlignmentY, LayoutDirection,
    TextAlignment,
};
use crate::context::{LayoutContext, TreeNode};
use crate::element::{ElementConfig, ElementContent, LayoutElement};
use crate::store::push_bounded;
use trellis_render_core::{
    BorderData, ClipData, CustomData, ImageData, RectangleData,
};
use trellis_types::{hash_number, BoundingBox, Dimensions, Vector2};

/// Seven attachable kinds plus text; more cannot be declared.
const MAX_CONFIGS_PER_ELEMENT: usize = 8;

/// Resolves the nine-point attach of a floating element against its
/// parent's final box.
fn attach_position(
    config: &FloatingConfig,
    parent: BoundingBox,
    dimensions: Dimensions,
) -> Vector2 {
    use AttachPoint::*;
    let mut position = Vector2::zero();
    position.x = match config.attach_points.parent {
        LeftTop | LeftCenter | LeftBottom => parent.x,
        CenterTop | CenterCenter | CenterBottom => parent.x + parent.width / 2.0,
        RightTop | RightCenter | RightBottom => parent.x + parent.width,
    };
    match config.attach_points.element {
        LeftTop | LeftCenter | LeftBottom => {}
        CenterTop | CenterCenter | CenterBottom => position.x -= dimensions.width / 2.0,
        RightTop | RightCenter | RightBottom => position.x -= dimensions.width,
    }
    position.y = match config.attach_points.parent {
        LeftTop | CenterTop | RightTop => parent.y,
        LeftCenter | CenterCenter | RightCenter => parent.y + parent.height / 2.0,
        LeftBottom | CenterBottom | RightBottom => parent.y + parent.height,
    };
    match config.attach_points.element {
        LeftTop | CenterTop | RightTop => {}
        LeftCenter | CenterCenter | RightCenter => position.y -= dimensions.height / 2.0,
        LeftBottom | CenterBottom | RightBottom => position.y -= dimensions.height,
    }
    position.x += config.offset.x;
    position.y += config.offset.y;
    position
}

impl LayoutContext {
    /// The element's final box including floating expansion; identical on
    /// descent and ascent so culling decisions agree.
    fn final_bounding_box(&self, node: &TreeNode, element: &LayoutElement) -> BoundingBox {
        let mut bounding_box = BoundingBox::new(
            node.position.x,
            node.position.y,
            element.dimensions.width,
            element.dimensions.height,
        );
        if let Some(floating) = self.find_floating_config(element) {
            bounding_box.x -= floating.expand.width;
            bounding_box.width += floating.expand.width * 2.0;
            bounding_box.y -= floating.expand.height;
            bounding_box.height += floating.expand.height * 2.0;
        }
        bounding_box
    }

    pub(crate) fn emit_commands(&mut self) {
        self.commands.clear();
        if self.visited.len() < self.dfs_buffer.capacity() {
            // Partially-charged arena; the capacity error already fired.
            return;
        }
        for root_index in 0..self.roots.len() {
            let root = *self.roots.get(root_index);
            let root_element = *self.elements.get(root.element_index as usize);
            self.dfs_buffer.clear();

            let mut root_position = Vector2::zero();
            if let Some(floating) = self.find_floating_config(&root_element) {
                if let Some(parent_item) = self.id_map.get(root.parent_id) {
                    root_position = attach_position(
                        &floating,
                        parent_item.bounding_box,
                        root_element.dimensions,
                    );
                }
            }

            // A floating root attached inside a clip container is scissored
            // against that container for its whole subtree.
            if root.clip_element_id != 0 {
                if let Some(clip_item) = self.id_map.get(root.clip_element_id) {
                    let clip_bounds = clip_item.bounding_box;
                    let clip_element = *self.elements.get(clip_item.element_index as usize);
                    let clip_config = self.find_clip_config(&clip_element);
                    if self.external_scroll_handling {
                        // The renderer translates scissored content itself,
                        // so the root has to pre-compensate.
                        if let Some(clip_config) = clip_config {
                            if clip_config.horizontal {
                                root_position.x += clip_config.child_offset.x;
                            }
                            if clip_config.vertical {
                                root_position.y += clip_config.child_offset.y;
                            }
                        }
                    }
                    let clip_data = clip_config
                        .map(|config| ClipData {
                            horizontal: config.horizontal,
                            vertical: config.vertical,
                        })
                        .unwrap_or_default();
                    self.add_render_command(RawRenderCommand {
                        bounding_box: clip_bounds,
                        id: hash_number(root_element.id, root_element.child_count() as u32 + 10)
                            .id,
                        z_index: root.z_index,
                        user_data: 0,
                        data: RawRenderData::ScissorStart(clip_data),
                    });
                }
            }

            if !self.visited.is_empty() {
                self.visited[0] = false;
            }
            push_bounded(
                &mut self.dfs_buffer,
                TreeNode {
                    element_index: root.element_index,
                    position: root_position,
                    next_child_offset: Vector2::new(
                        f32::from(root_element.layout.padding.left),
                        f32::from(root_element.layout.padding.top),
                    ),
                },
            );

            while !self.dfs_buffer.is_empty() {
                let top = self.dfs_buffer.len() - 1;
                let mut node = self.dfs_buffer[top];
                let element = *self.elements.get(node.element_index as usize);
                let layout = element.layout;

                if self.visited[top] {
                    self.emit_on_ascent(&node, &element, &root_element, root.z_index);
                    self.dfs_buffer.pop();
                    continue;
                }
                self.visited[top] = true;

                let bounding_box = self.final_bounding_box(&node, &element);
                let mut scroll_offset = Vector2::zero();
                let mut scroll_slot: Option<usize> = None;
                if let Some(clip) = self.find_clip_config(&element) {
                    for (slot, container) in self.scroll_containers.iter_mut().enumerate() {
                        if container.element_id == element.id {
                            container.bounding_box = bounding_box;
                            scroll_slot = Some(slot);
                            scroll_offset = clip.child_offset;
                            if self.external_scroll_handling {
                                scroll_offset = Vector2::zero();
                            }
                            break;
                        }
                    }
                }

                if let Some(item) = self.id_map.get_mut(element.id) {
                    item.bounding_box = bounding_box;
                }

                // Order this element's commands: scissor opens before
                // anything it clips, border is drawn last.
                let config_count = (element.configs.len as usize).min(MAX_CONFIGS_PER_ELEMENT);
                debug_assert!(
                    element.configs.len as usize <= MAX_CONFIGS_PER_ELEMENT,
                    "at most one config of each kind can be attached"
                );
                let configs_start = element.configs.start as usize;
                let mut sorted = [0_usize; MAX_CONFIGS_PER_ELEMENT];
                for (slot, index) in sorted.iter_mut().enumerate().take(config_count) {
                    *index = slot;
                }
                let mut sort_max = config_count.saturating_sub(1);
                while sort_max > 0 {
                    for k in 0..sort_max {
                        let current = sorted[k];
                        let next = sorted[k + 1];
                        let current_is_border = matches!(
                            self.element_configs.get(configs_start + current),
                            ElementConfig::Border(_)
                        );
                        let next_is_clip = matches!(
                            self.element_configs.get(configs_start + next),
                            ElementConfig::Clip(_)
                        );
                        if next_is_clip || current_is_border {
                            sorted[k] = next;
                            sorted[k + 1] = current;
                        }
                    }
                    sort_max -= 1;
                }

                let shared = self.find_shared_config(&element);
                let mut emit_rectangle =
                    shared.is_some_and(|shared| shared.background_color.is_visible());
                let shared = shared.unwrap_or_default();
                let offscreen = self.element_is_offscreen(&bounding_box);

                for &config_index in sorted.iter().take(config_count) {
                    let config = *self.element_configs.get(configs_start + config_index);
                    match config {
                        // These draw nothing on descent: shared and aspect
                        // are data for other commands, floating only moves
                        // the root, border waits for the ascent.
                        ElementConfig::Shared(_)
                        | ElementConfig::Aspect(_)
                        | ElementConfig::Floating(_)
                        | ElementConfig::Border(_) => {}
                        ElementConfig::Clip(clip) => {
                            if !offscreen {
                                self.add_render_command(RawRenderCommand {
                                    bounding_box,
                                    id: element.id,
                                    z_index: root.z_index,
                                    user_data: shared.user_data,
                                    data: RawRenderData::ScissorStart(ClipData {
                                        horizontal: clip.horizontal,
                                        vertical: clip.vertical,
                                    }),
                                });
                            }
                        }
                        ElementConfig::Image(image) => {
                            // Background and corner radius ride along on the
                            // image command instead of a separate rectangle.
                            emit_rectangle = false;
                            if !offscreen {
                                self.add_render_command(RawRenderCommand {
                                    bounding_box,
                                    id: element.id,
                                    z_index: root.z_index,
                                    user_data: shared.user_data,
                                    data: RawRenderData::Image(ImageData {
                                        background_color: shared.background_color,
                                        corner_radius: shared.corner_radius,
                                        image: image.data,
                                    }),
                                });
                            }
                        }
                        ElementConfig::Custom(custom) => {
                            emit_rectangle = false;
                            if !offscreen {
                                self.add_render_command(RawRenderCommand {
                                    bounding_box,
                                    id: element.id,
                                    z_index: root.z_index,
                                    user_data: shared.user_data,
                                    data: RawRenderData::Custom(CustomData {
                                        background_color: shared.background_color,
                                        corner_radius: shared.corner_radius,
                                        custom: custom.data,
                                    }),
                                });
                            }
                        }
                        ElementConfig::Text(text_config) => {
                            if offscreen {
                                continue;
                            }
                            let ElementContent::Text(text_index) = element.content else {
                                continue;
                            };
                            let text_data = *self.text_data.get(text_index as usize);
                            let natural_line_height = text_data.preferred.height;
                            let final_line_height = if text_config.line_height > 0 {
                                f32::from(text_config.line_height)
                            } else {
                                natural_line_height
                            };
                            // Half-leading centers each line in its slot.
                            let mut y_position = (final_line_height - natural_line_height) / 2.0;
                            for line_index in 0..text_data.wrapped.len {
                                let line = *self
                                    .wrapped_lines
                                    .get((text_data.wrapped.start + line_index) as usize);
                                if line.span.len == 0 {
                                    y_position += final_line_height;
                                    continue;
                                }
                                let mut x_offset = bounding_box.width - line.dimensions.width;
                                match text_config.alignment {
                                    TextAlignment::Left => x_offset = 0.0,
                                    TextAlignment::Center => x_offset /= 2.0,
                                    TextAlignment::Right => {}
                                }
                                self.add_render_command(RawRenderCommand {
                                    bounding_box: BoundingBox::new(
                                        bounding_box.x + x_offset,
                                        bounding_box.y + y_position,
                                        line.dimensions.width,
                                        line.dimensions.height,
                                    ),
                                    id: hash_number(line_index, element.id).id,
                                    z_index: root.z_index,
                                    user_data: text_config.user_data,
                                    data: RawRenderData::Text(RawTextData {
                                        line: line.span,
                                        base: text_data.text,
                                        color: text_config.color,
                                        font_id: text_config.font_id,
                                        font_size: text_config.font_size,
                                        letter_spacing: text_config.letter_spacing,
                                        line_height: text_config.line_height,
                                    }),
                                });
                                y_position += final_line_height;
                                if !self.options.disable_culling
                                    && bounding_box.y + y_position
                                        > self.layout_dimensions.height
                                {
                                    break;
                                }
                            }
                        }
                    }
                }

                if emit_rectangle && !offscreen {
                    self.add_render_command(RawRenderCommand {
                        bounding_box,
                        id: element.id,
                        z_index: root.z_index,
                        user_data: shared.user_data,
                        data: RawRenderData::Rectangle(RectangleData {
                            background_color: shared.background_color,
                            corner_radius: shared.corner_radius,
                        }),
                    });
                }

                if !element.is_text() {
                    let children = element.children();
                    let mut content_size = Dimensions::default();
                    // On-axis alignment: spare space shifts the first child
                    // offset; off-axis alignment is applied per child below.
                    match layout.direction {
                        LayoutDirection::LeftToRight => {
                            for k in 0..children.len as usize {
                                let child_index =
                                    *self.element_children.get(children.start as usize + k);
                                let child = *self.elements.get(child_index as usize);
                                content_size.width += child.dimensions.width;
                                content_size.height =
                                    content_size.height.max(child.dimensions.height);
                            }
                            content_size.width += (children.len.max(1) - 1) as f32
                                * f32::from(layout.child_gap);
                            let spare = element.dimensions.width
                                - layout.padding.horizontal()
                                - content_size.width;
                            let extra_space = match layout.child_alignment.x {
                                LayoutAlignmentX::Left => 0.0,
                                LayoutAlignmentX::Center => spare / 2.0,
                                LayoutAlignmentX::Right => spare,
                            };
                            node.next_child_offset.x += extra_space.max(0.0);
                        }
                        LayoutDirection::TopToBottom => {
                            for k in 0..children.len as usize {
                                let child_index =
                                    *self.element_children.get(children.start as usize + k);
                                let child = *self.elements.get(child_index as usize);
                                content_size.height += child.dimensions.height;
                                content_size.width =
                                    content_size.width.max(child.dimensions.width);
                            }
                            content_size.height += (children.len.max(1) - 1) as f32
                                * f32::from(layout.child_gap);
                            let spare = element.dimensions.height
                                - layout.padding.vertical()
                                - content_size.height;
                            let extra_space = match layout.child_alignment.y {
                                LayoutAlignmentY::Top => 0.0,
                                LayoutAlignmentY::Center => spare / 2.0,
                                LayoutAlignmentY::Bottom => spare,
                            };
                            node.next_child_offset.y += extra_space.max(0.0);
                        }
                    }
                    if let Some(slot) = scroll_slot {
                        self.scroll_containers[slot].content_size = Dimensions::new(
                            content_size.width + layout.padding.horizontal(),
                            content_size.height + layout.padding.vertical(),
                        );
                    }

                    // Queue children in reverse so the stack pops them in
                    // declaration order.
                    let count = children.len as usize;
                    let base = self.dfs_buffer.len();
                    for _ in 0..count {
                        if !push_bounded(&mut self.dfs_buffer, TreeNode::default()) {
                            break;
                        }
                    }
                    let reserved = self.dfs_buffer.len() - base;
                    for k in 0..reserved {
                        let child_index = *self.element_children.get(children.start as usize + k);
                        let child = *self.elements.get(child_index as usize);
                        match layout.direction {
                            LayoutDirection::LeftToRight => {
                                node.next_child_offset.y = f32::from(layout.padding.top);
                                let whitespace = element.dimensions.height
                                    - layout.padding.vertical()
                                    - child.dimensions.height;
                                match layout.child_alignment.y {
                                    LayoutAlignmentY::Top => {}
                                    LayoutAlignmentY::Center => {
                                        node.next_child_offset.y += whitespace / 2.0;
                                    }
                                    LayoutAlignmentY::Bottom => {
                                        node.next_child_offset.y += whitespace;
                                    }
                                }
                            }
                            LayoutDirection::TopToBottom => {
                                node.next_child_offset.x = f32::from(layout.padding.left);
                                let whitespace = element.dimensions.width
                                    - layout.padding.horizontal()
                                    - child.dimensions.width;
                                match layout.child_alignment.x {
                                    LayoutAlignmentX::Left => {}
                                    LayoutAlignmentX::Center => {
                                        node.next_child_offset.x += whitespace / 2.0;
                                    }
                                    LayoutAlignmentX::Right => {
                                        node.next_child_offset.x += whitespace;
                                    }
                                }
                            }
                        }
                        let child_position = Vector2::new(
                            node.position.x + node.next_child_offset.x + scroll_offset.x,
                            node.position.y + node.next_child_offset.y + scroll_offset.y,
                        );
                        let slot = base + reserved - 1 - k;
                        self.dfs_buffer[slot] = TreeNode {
                            element_index: child_index,
                            position: child_position,
                            next_child_offset: Vector2::new(
                                f32::from(child.layout.padding.left),
                                f32::from(child.layout.padding.top),
                            ),
                        };
                        if slot < self.visited.len() {
                            self.visited[slot] = false;
                        }
                        match layout.direction {
                            LayoutDirection::LeftToRight => {
                                node.next_child_offset.x +=
                                    child.dimensions.width + f32::from(layout.child_gap);
                            }
                            LayoutDirection::TopToBottom => {
                                node.next_child_offset.y +=
                                    child.dimensions.height + f32::from(layout.child_gap);
                            }
                        }
                    }
                }
                self.dfs_buffer[top] = node;
            }

            if root.clip_element_id != 0 {
                self.add_render_command(RawRenderCommand {
                    bounding_box: BoundingBox::default(),
                    id: hash_number(root_element.id, root_element.child_count() as u32 + 11).id,
                    z_index: root.z_index,
                    user_data: 0,
                    data: RawRenderData::ScissorEnd,
                });
            }
        }
    }

    /// Ascent emission: the border (outside any clip this element opened),
    /// separator rectangles between children, then the scissor end.
    fn emit_on_ascent(
        &mut self,
        node: &TreeNode,
        element: &LayoutElement,
        root_element: &LayoutElement,
        z_index: i16,
    ) {
        let layout = element.layout;
        let clip_config = self.find_clip_config(element);
        let mut scroll_offset = Vector2::zero();
        if let Some(clip) = clip_config {
            if self
                .scroll_containers
                .iter()
                .any(|container| container.element_id == element.id)
            {
                scroll_offset = clip.child_offset;
            }
            if self.external_scroll_handling {
                scroll_offset = Vector2::zero();
            }
        }

        let bounding_box = self.final_bounding_box(node, element);
        let offscreen = self.element_is_offscreen(&bounding_box);

        if let Some(border) = self.find_border_config(element) {
            if !offscreen {
                let shared = self.find_shared_config(element).unwrap_or_default();
                self.add_render_command(RawRenderCommand {
                    bounding_box,
                    id: hash_number(element.id, element.child_count() as u32).id,
                    z_index,
                    user_data: shared.user_data,
                    data: RawRenderData::Border(BorderData {
                        color: border.color,
                        corner_radius: shared.corner_radius,
                        width: border.width,
                    }),
                });

                if border.width.between_children > 0 && border.color.is_visible() {
                    let half_gap = f32::from(layout.child_gap / 2);
                    let mut border_offset = Vector2::new(
                        f32::from(layout.padding.left) - half_gap,
                        f32::from(layout.padding.top) - half_gap,
                    );
                    let children = element.children();
                    for k in 0..children.len as usize {
                        let child_index = *self.element_children.get(children.start as usize + k);
                        let child = *self.elements.get(child_index as usize);
                        if k > 0 {
                            let separator_bounds = match layout.direction {
                                LayoutDirection::LeftToRight => BoundingBox::new(
                                    bounding_box.x + border_offset.x + scroll_offset.x,
                                    bounding_box.y + scroll_offset.y,
                                    f32::from(border.width.between_children),
                                    element.dimensions.height,
                                ),
                                LayoutDirection::TopToBottom => BoundingBox::new(
                                    bounding_box.x + scroll_offset.x,
                                    bounding_box.y + border_offset.y + scroll_offset.y,
                                    element.dimensions.width,
                                    f32::from(border.width.between_children),
                                ),
                            };
                            self.add_render_command(RawRenderCommand {
                                bounding_box: separator_bounds,
                                id: hash_number(
                                    element.id,
                                    element.child_count() as u32 + 1 + k as u32,
                                )
                                .id,
                                z_index,
                                user_data: shared.user_data,
                                data: RawRenderData::Rectangle(RectangleData {
                                    background_color: border.color,
                                    ..RectangleData::default()
                                }),
                            });
                        }
                        match layout.direction {
                            LayoutDirection::LeftToRight => {
                                border_offset.x +=
                                    child.dimensions.width + f32::from(layout.child_gap);
                            }
                            LayoutDirection::TopToBottom => {
                                border_offset.y +=
                                    child.dimensions.height + f32::from(layout.child_gap);
                            }
                        }
                    }
                }
            }
        }

        // The scissor closes after the border so borders are not clipped at
        // the container edge. Skipped when the matching start was culled.
        if clip_config.is_some() && !offscreen {
            self.add_render_command(RawRenderCommand {
                bounding_box: BoundingBox::default(),
                id: hash_number(element.id, root_element.child_count() as u32 + 11).id,
                z_index,
                user_data: 0,
                data: RawRenderData::ScissorEnd,
            });
        }
    }
}
