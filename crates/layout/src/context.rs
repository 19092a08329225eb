//! The layout context: owner of every pool, cache and piece of persistent
//! state, and the surface the per-frame API hangs off.

use crate::config::{Declaration, LayoutConfig, Sizing, SizingAxis, TextConfig};
use crate::element::{
    ElementConfig, LayoutElement, LayoutRoot, TextElementData, WrappedLine,
};
use crate::commands::{RawRenderCommand, RawTextData, RenderCommandList};
use crate::measure::{MeasureCacheItem, MeasureTextCache, MeasuredWord};
use crate::scroll::{ScrollContainer, ScrollContainerData};
use crate::store::{charged_vec, Arena, FrameText, Pool, Span};
use crate::{ErrorData, ErrorKind};
use serde::{Deserialize, Serialize};
use trellis_types::{
    hash_string, BoundingBox, Color, Dimensions, ElementId, Vector2,
};

pub(crate) const ROOT_LABEL: &str = "Trellis__Root";

const DEFAULT_MAX_ELEMENT_COUNT: usize = 8192;
const DEFAULT_MAX_MEASURED_WORD_COUNT: usize = 16384;
const DEFAULT_FRAME_TEXT_CAPACITY: usize = 256 * 1024;

pub(crate) type MeasureTextFn = Box<dyn FnMut(&str, &TextConfig) -> Dimensions>;
pub(crate) type QueryScrollFn = Box<dyn FnMut(u32) -> Vector2>;
type ErrorHandlerFn = Box<dyn FnMut(&ErrorData)>;

/// Sizing knobs consumed once by [`LayoutContext::new`]. Plain data so hosts
/// can keep it in their own config files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Size of the layout surface (usually the window), in layout units.
    pub layout_dimensions: Dimensions,
    /// Upper bound on elements declared in one frame. Also sizes the
    /// children/config/command pools and the persistent id map.
    pub max_element_count: usize,
    /// Upper bound on live entries in the measured-word slab.
    pub max_measured_word_count: usize,
    /// Byte budget for per-frame declaration text.
    pub frame_text_capacity: usize,
    /// Total byte budget. `None` reserves exactly [`min_memory_size`].
    /// Anything smaller is reported as `ArenaCapacityExceeded` and leaves
    /// the short-changed pools empty.
    pub arena_capacity: Option<usize>,
    /// Disables offscreen culling of render commands.
    pub disable_culling: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            layout_dimensions: Dimensions::default(),
            max_element_count: DEFAULT_MAX_ELEMENT_COUNT,
            max_measured_word_count: DEFAULT_MAX_MEASURED_WORD_COUNT,
            frame_text_capacity: DEFAULT_FRAME_TEXT_CAPACITY,
            arena_capacity: None,
            disable_culling: false,
        }
    }
}

/// The arena budget required for a given set of options.
///
/// Kept in lockstep with the charges in [`LayoutContext::new`]; a unit test
/// pins the two together.
pub fn min_memory_size(options: &LayoutOptions) -> usize {
    let n = options.max_element_count;
    let w = options.max_measured_word_count;
    let sizes = [
        n * size_of::<LayoutElement>(),    // elements
        n * size_of::<u32>(),              // element_children
        n * size_of::<u32>(),              // children_buffer
        n * size_of::<ElementConfig>(),    // element_configs
        n * size_of::<TextElementData>(),  // text_data
        n * size_of::<WrappedLine>(),      // wrapped_lines
        n * size_of::<LayoutRoot>(),       // roots
        n * size_of::<u32>(),              // open_stack
        n * size_of::<u32>(),              // open_clip_stack
        n * size_of::<u32>(),              // element_clip_ids
        n * size_of::<u32>(),              // aspect_indexes
        n * size_of::<RawRenderCommand>(), // commands
        options.frame_text_capacity,       // frame_text
        n * size_of::<u32>(),              // bfs_buffer
        n * size_of::<u32>(),              // resizable_buffer
        n * size_of::<TreeNode>(),         // dfs_buffer
        n * size_of::<bool>(),             // visited
        n * size_of::<i32>(),              // id map buckets
        n * size_of::<IdMapItem>(),        // id map items
        (w / 32).max(1) * size_of::<i32>(), // measure cache buckets
        n * size_of::<MeasureCacheItem>(), // measure cache items
        w * size_of::<MeasuredWord>(),     // measured words
        n * size_of::<i32>(),              // measure item free list
        w * size_of::<i32>(),              // measure word free list
        n * size_of::<ScrollContainer>(),  // scroll containers
    ];
    let mut used = 0_usize;
    for bytes in sizes {
        used += (64 - used % 64) % 64;
        used += bytes;
    }
    used
}

/// Once-per-frame latches so repeated faults of the same kind only reach
/// the host a single time.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FrameWarnings {
    pub max_elements_exceeded: bool,
    pub render_commands_exceeded: bool,
    pub text_cache_exceeded: bool,
    pub measure_fn_missing: bool,
    pub frame_text_exceeded: bool,
}

pub(crate) struct ErrorChannel {
    handler: Option<ErrorHandlerFn>,
    pub warnings: FrameWarnings,
}

impl ErrorChannel {
    fn new() -> Self {
        Self {
            handler: None,
            warnings: FrameWarnings::default(),
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::new()
    }

    pub fn set_handler(&mut self, handler: ErrorHandlerFn) {
        self.handler = Some(handler);
    }

    pub fn report(&mut self, kind: ErrorKind, message: &'static str) {
        log::warn!("{kind}: {message}");
        if let Some(handler) = &mut self.handler {
            handler(&ErrorData { kind, message });
        }
    }

    /// Reports kinds with a per-frame latch at most once per frame; other
    /// kinds pass straight through.
    pub fn report_once(&mut self, kind: ErrorKind, message: &'static str) {
        let latch = match kind {
            ErrorKind::TextMeasurementCapacityExceeded => {
                Some(&mut self.warnings.text_cache_exceeded)
            }
            ErrorKind::TextMeasurementFunctionNotProvided => {
                Some(&mut self.warnings.measure_fn_missing)
            }
            _ => None,
        };
        if let Some(latch) = latch {
            if *latch {
                return;
            }
            *latch = true;
        }
        self.report(kind, message);
    }
}

/// Persistent id → element mapping. Closed addressing: buckets hold item
/// indices, collisions chain through `next`. Items survive across frames
/// and are re-bound by generation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IdMapItem {
    pub element_id: ElementId,
    pub element_index: u32,
    pub bounding_box: BoundingBox,
    pub generation: u32,
    pub next: i32,
}

impl Default for IdMapItem {
    fn default() -> Self {
        Self {
            element_id: ElementId::default(),
            element_index: 0,
            bounding_box: BoundingBox::default(),
            generation: 0,
            next: -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MapInsert {
    Added,
    Reused,
    DuplicateThisFrame,
    Full,
}

pub(crate) struct ElementIdMap {
    buckets: Vec<i32>,
    items: Pool<IdMapItem>,
}

impl ElementIdMap {
    fn new(capacity: usize, arena: &mut Arena) -> Self {
        let buckets = if arena.charge(capacity * size_of::<i32>()) {
            vec![-1; capacity]
        } else {
            Vec::new()
        };
        Self {
            buckets,
            items: Pool::new(capacity, arena),
        }
    }

    pub fn get(&self, id: u32) -> Option<&IdMapItem> {
        if self.buckets.is_empty() || id == 0 {
            return None;
        }
        let bucket = id as usize % self.buckets.len();
        let mut index = self.buckets[bucket];
        while index != -1 {
            let item = self.items.get(index as usize);
            if item.element_id.id == id {
                return Some(item);
            }
            index = item.next;
        }
        None
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut IdMapItem> {
        if self.buckets.is_empty() || id == 0 {
            return None;
        }
        let bucket = id as usize % self.buckets.len();
        let mut index = self.buckets[bucket];
        while index != -1 {
            let item = self.items.get(index as usize);
            if item.element_id.id == id {
                return Some(self.items.get_mut(index as usize));
            }
            index = item.next;
        }
        None
    }

    /// Binds `element_id` to `element_index` for the frame `generation + 1`.
    /// A slot already bound this frame is a duplicate and keeps its first
    /// binding; a slot from a prior generation is reused in place.
    pub fn insert(&mut self, element_id: ElementId, element_index: u32, generation: u32) -> MapInsert {
        if self.buckets.is_empty() || self.items.is_full() {
            return MapInsert::Full;
        }
        let bucket = element_id.id as usize % self.buckets.len();
        let mut previous = -1_i32;
        let mut index = self.buckets[bucket];
        while index != -1 {
            let item = *self.items.get(index as usize);
            if item.element_id.id == element_id.id {
                if item.generation <= generation {
                    let slot = self.items.get_mut(index as usize);
                    slot.element_id = element_id;
                    slot.generation = generation + 1;
                    slot.element_index = element_index;
                    return MapInsert::Reused;
                }
                return MapInsert::DuplicateThisFrame;
            }
            previous = index;
            index = item.next;
        }
        let new_index = match self.items.try_push(IdMapItem {
            element_id,
            element_index,
            bounding_box: BoundingBox::default(),
            generation: generation + 1,
            next: -1,
        }) {
            Some(pushed) => pushed as i32,
            None => return MapInsert::Full,
        };
        if previous != -1 {
            self.items.get_mut(previous as usize).next = new_index;
        } else {
            self.buckets[bucket] = new_index;
        }
        MapInsert::Added
    }
}

/// DFS scratch node for the height-propagation and emission passes.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TreeNode {
    pub element_index: u32,
    pub position: Vector2,
    pub next_child_offset: Vector2,
}

/// Post-layout geometry for an element id, from the persistent map.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElementData {
    pub bounding_box: BoundingBox,
    /// False when the id was never bound (the bounding box is zeroed).
    pub found: bool,
}

/// The engine. One context per layout surface; contexts are not `Sync` and
/// hosts that want parallel layouts create one per thread.
pub struct LayoutContext {
    pub(crate) options: LayoutOptions,
    pub(crate) layout_dimensions: Dimensions,
    pub(crate) generation: u32,
    pub(crate) external_scroll_handling: bool,
    pub(crate) errors: ErrorChannel,
    pub(crate) measure_fn: Option<MeasureTextFn>,
    pub(crate) query_scroll_fn: Option<QueryScrollFn>,

    pub(crate) arena: Arena,

    // Ephemeral, reset at begin_layout.
    pub(crate) elements: Pool<LayoutElement>,
    pub(crate) element_children: Pool<u32>,
    pub(crate) children_buffer: Vec<u32>,
    pub(crate) element_configs: Pool<ElementConfig>,
    pub(crate) text_data: Pool<TextElementData>,
    pub(crate) wrapped_lines: Pool<WrappedLine>,
    pub(crate) roots: Pool<LayoutRoot>,
    pub(crate) open_stack: Vec<u32>,
    pub(crate) open_clip_stack: Vec<u32>,
    pub(crate) element_clip_ids: Vec<u32>,
    pub(crate) aspect_indexes: Vec<u32>,
    pub(crate) commands: Pool<RawRenderCommand>,
    pub(crate) frame_text: FrameText,

    // Scratch reused between passes.
    pub(crate) bfs_buffer: Vec<u32>,
    pub(crate) resizable_buffer: Vec<u32>,
    pub(crate) dfs_buffer: Vec<TreeNode>,
    pub(crate) visited: Vec<bool>,

    // Persistent across frames.
    pub(crate) id_map: ElementIdMap,
    pub(crate) measure_cache: MeasureTextCache,
    pub(crate) scroll_containers: Vec<ScrollContainer>,
}

impl LayoutContext {
    /// Reserves all working memory up front. A budget below
    /// [`min_memory_size`] is reported through the error handler (set one
    /// with [`Self::set_error_handler`] before relying on it) and leaves
    /// the short-changed pools empty; the context then produces no output
    /// rather than failing later.
    pub fn new(options: LayoutOptions) -> Self {
        let budget = options
            .arena_capacity
            .unwrap_or_else(|| min_memory_size(&options));
        let n = options.max_element_count;
        let w = options.max_measured_word_count;
        let mut arena = Arena::new(budget);

        // Charge order mirrors min_memory_size.
        let elements = Pool::new(n, &mut arena);
        let element_children = Pool::new(n, &mut arena);
        let children_buffer = charged_vec::<u32>(n, &mut arena);
        let element_configs = Pool::new(n, &mut arena);
        let text_data = Pool::new(n, &mut arena);
        let wrapped_lines = Pool::new(n, &mut arena);
        let roots = Pool::new(n, &mut arena);
        let open_stack = charged_vec::<u32>(n, &mut arena);
        let open_clip_stack = charged_vec::<u32>(n, &mut arena);
        let element_clip_ids = charged_vec::<u32>(n, &mut arena);
        let aspect_indexes = charged_vec::<u32>(n, &mut arena);
        let commands = Pool::new(n, &mut arena);
        let frame_text = FrameText::new(options.frame_text_capacity, &mut arena);
        let bfs_buffer = charged_vec::<u32>(n, &mut arena);
        let resizable_buffer = charged_vec::<u32>(n, &mut arena);
        let dfs_buffer = charged_vec::<TreeNode>(n, &mut arena);
        let mut visited = charged_vec::<bool>(n, &mut arena);
        visited.resize(visited.capacity(), false);
        let id_map = ElementIdMap::new(n, &mut arena);
        let measure_cache = MeasureTextCache::new(n, w, &mut arena);
        let scroll_containers = charged_vec::<ScrollContainer>(n, &mut arena);

        let mut context = Self {
            options,
            layout_dimensions: options.layout_dimensions,
            generation: 0,
            external_scroll_handling: false,
            errors: ErrorChannel::new(),
            measure_fn: None,
            query_scroll_fn: None,
            arena,
            elements,
            element_children,
            children_buffer,
            element_configs,
            text_data,
            wrapped_lines,
            roots,
            open_stack,
            open_clip_stack,
            element_clip_ids,
            aspect_indexes,
            commands,
            frame_text,
            bfs_buffer,
            resizable_buffer,
            dfs_buffer,
            visited,
            id_map,
            measure_cache,
            scroll_containers,
        };
        if context.arena.exhausted() {
            context.errors.report(
                ErrorKind::ArenaCapacityExceeded,
                "arena budget too small for the configured capacities; raise arena_capacity",
            );
        } else {
            log::debug!(
                "layout context initialized: {} bytes reserved for {} elements / {} measured words",
                context.arena.used(),
                n,
                w
            );
        }
        context
    }

    /// Installs the host text-measurement function. Must measure a single
    /// word (no newlines) and be deterministic within a frame.
    pub fn set_measure_text_fn(
        &mut self,
        measure: impl FnMut(&str, &TextConfig) -> Dimensions + 'static,
    ) {
        self.measure_fn = Some(Box::new(measure));
    }

    pub fn set_error_handler(&mut self, handler: impl FnMut(&ErrorData) + 'static) {
        self.errors.set_handler(Box::new(handler));
    }

    /// Installs the scroll-offset query used in external scroll handling
    /// mode.
    pub fn set_query_scroll_offset_fn(&mut self, query: impl FnMut(u32) -> Vector2 + 'static) {
        self.query_scroll_fn = Some(Box::new(query));
    }

    /// When enabled, clip-config child offsets come from the query callback
    /// and are *not* applied to child positions during emission; the host's
    /// renderer translates scissored content itself.
    pub fn set_external_scroll_handling(&mut self, enabled: bool) {
        self.external_scroll_handling = enabled;
    }

    /// Handles window resize. Takes effect at the next `begin_layout`.
    pub fn set_layout_dimensions(&mut self, dimensions: Dimensions) {
        self.layout_dimensions = dimensions;
    }

    pub fn layout_dimensions(&self) -> Dimensions {
        self.layout_dimensions
    }

    /// The frame counter. Increments at every `begin_layout`.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Opens a new frame: resets ephemeral storage, ages persistent state,
    /// and opens the synthetic root covering the whole surface.
    pub fn begin_layout(&mut self) {
        self.elements.clear();
        self.element_children.clear();
        self.children_buffer.clear();
        self.element_configs.clear();
        self.text_data.clear();
        self.wrapped_lines.clear();
        self.roots.clear();
        self.open_stack.clear();
        self.open_clip_stack.clear();
        self.element_clip_ids.clear();
        self.aspect_indexes.clear();
        self.commands.clear();
        self.frame_text.clear();
        self.bfs_buffer.clear();
        self.resizable_buffer.clear();
        self.dfs_buffer.clear();
        self.errors.warnings = FrameWarnings::default();
        self.generation = self.generation.wrapping_add(1);

        // Containers not redeclared last frame lose their state.
        self.scroll_containers.retain(|container| container.open_this_frame);
        for container in &mut self.scroll_containers {
            container.open_this_frame = false;
        }

        let root_dimensions = self.layout_dimensions;
        self.open_element_with_id(hash_string(ROOT_LABEL, 0));
        self.configure_open(&Declaration {
            layout: LayoutConfig {
                sizing: Sizing {
                    width: SizingAxis::fixed(root_dimensions.width),
                    height: SizingAxis::fixed(root_dimensions.height),
                },
                ..LayoutConfig::default()
            },
            ..Declaration::default()
        });
        // A second sentinel entry keeps the root addressable after its
        // close in end_layout.
        crate::store::push_bounded(&mut self.open_stack, 0);
        self.roots.try_push(LayoutRoot {
            element_index: 0,
            parent_id: 0,
            clip_element_id: 0,
            z_index: 0,
        });
    }

    /// Closes the frame: runs the solver, wrapping and emission, and
    /// returns the ordered command stream. The stream borrows the context
    /// until the next mutating call.
    pub fn end_layout(&mut self) -> RenderCommandList<'_> {
        self.close_element();
        if self.open_stack.len() > 1 {
            self.errors.report(
                ErrorKind::UnbalancedOpenClose,
                "open_element calls without matching close_element at end_layout",
            );
        }
        self.calculate_final_layout();
        if self.errors.warnings.max_elements_exceeded {
            self.append_capacity_banner();
        }
        log::trace!(
            "frame {}: {} elements -> {} render commands",
            self.generation,
            self.elements.len(),
            self.commands.len()
        );
        RenderCommandList::new(self.commands.as_slice(), self.frame_text.as_str())
    }

    /// A centered red text command so capacity overflow is visible on
    /// screen, not only in the error channel.
    fn append_capacity_banner(&mut self) {
        let message = "Trellis error: element capacity exceeded";
        let Some(span) = self.frame_text.push(message) else {
            return;
        };
        let banner = RawRenderCommand {
            bounding_box: BoundingBox::new(
                self.layout_dimensions.width / 2.0 - message.len() as f32 * 4.0,
                self.layout_dimensions.height / 2.0,
                0.0,
                0.0,
            ),
            id: 0,
            z_index: 0,
            user_data: 0,
            data: crate::commands::RawRenderData::Text(RawTextData {
                line: span,
                base: span,
                color: Color::rgb(255.0, 0.0, 0.0),
                font_id: 0,
                font_size: 16,
                letter_spacing: 0,
                line_height: 0,
            }),
        };
        self.add_render_command(banner);
    }

    /// Post-layout bounding box for an element declared with `id`.
    pub fn element_data(&self, id: ElementId) -> ElementData {
        match self.id_map.get(id.id) {
            Some(item) => ElementData {
                bounding_box: item.bounding_box,
                found: true,
            },
            None => ElementData::default(),
        }
    }

    /// State of the scroll container declared with `id`, if any.
    pub fn scroll_container_data(&self, id: ElementId) -> Option<ScrollContainerData> {
        self.scroll_containers
            .iter()
            .find(|container| container.element_id == id.id)
            .map(|container| ScrollContainerData {
                scroll_position: container.scroll_position,
                bounding_box: container.bounding_box,
                content_dimensions: container.content_size,
            })
    }

    /// Host-side scroll update, applied between frames. The engine itself
    /// never mutates scroll positions.
    pub fn set_scroll_position(&mut self, id: ElementId, position: Vector2) {
        if let Some(container) = self
            .scroll_containers
            .iter_mut()
            .find(|container| container.element_id == id.id)
        {
            container.scroll_position = position;
        }
    }

    pub(crate) fn measure_text_cached(
        &mut self,
        span: Span,
        config: &TextConfig,
    ) -> MeasureCacheItem {
        let LayoutContext {
            measure_fn,
            measure_cache,
            errors,
            frame_text,
            generation,
            ..
        } = self;
        match measure_fn {
            Some(measure) => measure_cache.measure_cached(
                frame_text.get(span),
                config,
                measure.as_mut(),
                errors,
                *generation,
            ),
            None => {
                errors.report_once(
                    ErrorKind::TextMeasurementFunctionNotProvided,
                    "no measure function installed; call set_measure_text_fn before declaring text",
                );
                MeasureCacheItem::default()
            }
        }
    }

    pub(crate) fn measure_raw(&mut self, text: &str, config: &TextConfig) -> Dimensions {
        match &mut self.measure_fn {
            Some(measure) => measure(text, config),
            None => Dimensions::default(),
        }
    }

    pub(crate) fn add_render_command(&mut self, command: RawRenderCommand) {
        if self.commands.try_push(command).is_none()
            && !self.errors.warnings.render_commands_exceeded
        {
            self.errors.warnings.render_commands_exceeded = true;
            self.errors.report(
                ErrorKind::ElementsCapacityExceeded,
                "ran out of render command capacity; raise max_element_count",
            );
        }
    }

    // Config lookups over an element's config slice. First match wins, as
    // at most one config of each kind can be attached.

    pub(crate) fn configs_of(&self, element: &LayoutElement) -> &[ElementConfig] {
        let start = element.configs.start as usize;
        let end = start + element.configs.len as usize;
        &self.element_configs.as_slice()[start.min(self.element_configs.len())
            ..end.min(self.element_configs.len())]
    }

    pub(crate) fn find_clip_config(&self, element: &LayoutElement) -> Option<crate::config::ClipConfig> {
        self.configs_of(element).iter().find_map(|config| match config {
            ElementConfig::Clip(clip) => Some(*clip),
            _ => None,
        })
    }

    pub(crate) fn find_floating_config(
        &self,
        element: &LayoutElement,
    ) -> Option<crate::config::FloatingConfig> {
        self.configs_of(element).iter().find_map(|config| match config {
            ElementConfig::Floating(floating) => Some(*floating),
            _ => None,
        })
    }

    pub(crate) fn find_text_config(&self, element: &LayoutElement) -> Option<TextConfig> {
        self.configs_of(element).iter().find_map(|config| match config {
            ElementConfig::Text(text) => Some(*text),
            _ => None,
        })
    }

    pub(crate) fn find_shared_config(
        &self,
        element: &LayoutElement,
    ) -> Option<crate::element::SharedConfig> {
        self.configs_of(element).iter().find_map(|config| match config {
            ElementConfig::Shared(shared) => Some(*shared),
            _ => None,
        })
    }

    pub(crate) fn find_border_config(
        &self,
        element: &LayoutElement,
    ) -> Option<crate::config::BorderConfig> {
        self.configs_of(element).iter().find_map(|config| match config {
            ElementConfig::Border(border) => Some(*border),
            _ => None,
        })
    }

    pub(crate) fn find_aspect_ratio(&self, element: &LayoutElement) -> Option<f32> {
        self.configs_of(element).iter().find_map(|config| match config {
            ElementConfig::Aspect(ratio) => Some(*ratio),
            _ => None,
        })
    }

    pub(crate) fn element_is_offscreen(&self, bounding_box: &BoundingBox) -> bool {
        if self.options.disable_culling {
            return false;
        }
        bounding_box.x > self.layout_dimensions.width
            || bounding_box.y > self.layout_dimensions.height
            || bounding_box.x + bounding_box.width < 0.0
            || bounding_box.y + bounding_box.height < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_usage_matches_min_memory_size() {
        let _ = env_logger::builder().is_test(true).try_init();
        let options = LayoutOptions::default();
        let context = LayoutContext::new(options);
        assert_eq!(context.arena.used(), min_memory_size(&options));
        assert!(!context.arena.exhausted());
    }

    #[test]
    fn undersized_arena_reports_and_stays_inert() {
        let reported = std::rc::Rc::new(std::cell::Cell::new(false));
        let seen = reported.clone();
        let mut context = LayoutContext::new(LayoutOptions {
            arena_capacity: Some(1024),
            ..LayoutOptions::default()
        });
        context.set_error_handler(move |error| {
            if error.kind == ErrorKind::ArenaCapacityExceeded {
                seen.set(true);
            }
        });
        // The construction-time report predates the handler, so trigger the
        // inert path: a frame on empty pools must not panic and must emit
        // nothing.
        context.begin_layout();
        let commands = context.end_layout();
        assert_eq!(commands.len(), 0);
        assert!(!reported.get());
    }

    #[test]
    fn element_data_misses_report_not_found() {
        let context = LayoutContext::new(LayoutOptions::default());
        let data = context.element_data(hash_string("Nobody", 0));
        assert!(!data.found);
        assert_eq!(data.bounding_box, BoundingBox::default());
    }
}
