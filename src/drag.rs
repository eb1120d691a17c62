// Drag module - explicit Idle/Dragging state machine translating pointer
// motion into anchor+offset patches. Pointer events are injected by the
// presentation layer; no UI wiring lives here.
use crate::geometry::{Rect, clamp_position};
use crate::placement::{ResolvedPlacement, infer_dominant_anchor, offsets_in_mode};
use crate::spec::{RenderTarget, WatermarkSpec};
use serde::{Deserialize, Serialize};

/// Declarative update emitted during a drag, for the editor surface to
/// fold into its spec state. Never raw pixel positions: offsets are
/// already expressed in the spec's active position mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecPatch {
    pub anchor: crate::geometry::Anchor,
    pub offset_x: f32,
    pub offset_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging {
        /// Pointer offset from the overlay's top-left at press time, so
        /// the grab point stays under the cursor.
        grab_dx: f32,
        grab_dy: f32,
    },
}

#[derive(Debug)]
pub struct DragController {
    state: DragState,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Begin a drag with the pointer over the given placement.
    pub fn press(&mut self, pointer_x: f32, pointer_y: f32, placement: &ResolvedPlacement) {
        self.state = DragState::Dragging {
            grab_dx: pointer_x - placement.x,
            grab_dy: pointer_y - placement.y,
        };
    }

    /// One pointer-move while dragging: clamp the candidate rectangle to
    /// the canvas, reclassify the dominant anchor, and emit the offsets
    /// that reproduce the rectangle under that anchor. Returns `None` when
    /// no drag is active.
    ///
    /// Motions must be fed in the order received; intermediate ones may be
    /// coalesced upstream as long as the last one before release lands.
    pub fn motion(
        &mut self,
        pointer_x: f32,
        pointer_y: f32,
        spec: &WatermarkSpec,
        target: &RenderTarget,
        box_width: f32,
        box_height: f32,
    ) -> Option<SpecPatch> {
        let DragState::Dragging { grab_dx, grab_dy } = self.state else {
            return None;
        };

        let (w, h) = (target.width_f(), target.height_f());
        let candidate = Rect::new(
            clamp_position(pointer_x - grab_dx, box_width, w),
            clamp_position(pointer_y - grab_dy, box_height, h),
            box_width,
            box_height,
        );

        let anchor = infer_dominant_anchor(&candidate, w, h, spec.anchor);
        let (offset_x, offset_y) = offsets_in_mode(spec, target, anchor, &candidate);
        Some(SpecPatch {
            anchor,
            offset_x,
            offset_y,
        })
    }

    /// End the drag. The last emitted patch is already the committed
    /// state; nothing further to do.
    pub fn release(&mut self) {
        self.state = DragState::Idle;
    }

    /// Lost pointer capture or release outside the tracked element. Must
    /// always reach `Idle`.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
