// Preview module - runs the placement pipeline against N target canvases
// from one shared spec, with a shared signature-keyed measurement cache so
// identical content is measured once no matter how many previews show it.
use crate::drag::{DragController, SpecPatch};
use crate::measure::{MeasureCache, MeasureOutcome, MeasuredContentBox, Measurer, estimate};
use crate::placement::{ResolvedPlacement, preview_scale, resolve};
use crate::spec::{RenderTarget, WatermarkSpec};
use std::sync::Arc;
use tracing::debug;

/// One preview canvas's view of the shared spec. `placement` is `None`
/// while content is not yet measurable: the overlay stays hidden rather
/// than flashing at a guessed size. `provisional` is the estimate-based
/// rectangle, only for provisional clamp bounds upstream.
#[derive(Debug, Clone, Copy)]
pub struct PreviewFrame {
    pub target: RenderTarget,
    pub placement: Option<ResolvedPlacement>,
    pub provisional: ResolvedPlacement,
    pub is_main: bool,
}

/// An open editing/preview session: one immutable spec value at a time, a
/// list of targets, and exactly one drag-enabled main target. Holds no
/// durable state beyond the injected measurement cache.
pub struct PreviewSession {
    spec: WatermarkSpec,
    signature: String,
    targets: Vec<RenderTarget>,
    main_target: usize,
    measurer: Arc<Measurer>,
    cache: Arc<MeasureCache>,
    drag: DragController,
}

impl PreviewSession {
    pub fn new(
        spec: WatermarkSpec,
        targets: Vec<RenderTarget>,
        main_target: usize,
        measurer: Arc<Measurer>,
        cache: Arc<MeasureCache>,
    ) -> Self {
        let signature = spec.content_signature();
        Self {
            spec,
            signature,
            targets,
            main_target,
            measurer,
            cache,
            drag: DragController::new(),
        }
    }

    pub fn spec(&self) -> &WatermarkSpec {
        &self.spec
    }

    pub fn current_signature(&self) -> &str {
        &self.signature
    }

    /// Replace the spec (one field edit from the editor surface). Any
    /// measurement still in flight for the previous value becomes stale
    /// and will be dropped on arrival.
    pub fn update_spec(&mut self, spec: WatermarkSpec) {
        self.signature = spec.content_signature();
        self.spec = spec;
    }

    /// Fold a drag patch back into the spec. Position-only, so the content
    /// signature is unchanged by construction.
    pub fn apply_patch(&mut self, patch: SpecPatch) {
        self.spec = self
            .spec
            .with_anchor_and_offsets(patch.anchor, patch.offset_x, patch.offset_y);
    }

    /// Apply a measurement that was issued for `signature`. Returns false
    /// and drops the result when the session has moved on to a different
    /// spec value since the request went out.
    pub async fn apply_measurement(
        &self,
        signature: &str,
        measured: MeasuredContentBox,
    ) -> Option<MeasuredContentBox> {
        if signature != self.signature {
            debug!("Discarding stale measurement for superseded signature");
            return None;
        }
        self.cache.observe(signature, measured).await
    }

    /// Confirmed base-scale measurement for the current spec, measuring
    /// (or requesting assets) on cache miss. One distinct signature means
    /// one measurement, shared by every target.
    pub async fn measured_base(&self) -> Option<MeasuredContentBox> {
        if let Some(measured) = self.cache.get(&self.signature).await {
            return Some(measured);
        }
        // Captured at issue time; checked again on completion.
        let issued_for = self.signature.clone();
        match self.measurer.measure(&self.spec).await {
            MeasureOutcome::Ready(measured) => self.apply_measurement(&issued_for, measured).await,
            MeasureOutcome::Pending => None,
        }
    }

    /// Resolve every target from the same spec and the same confirmed
    /// measurement.
    pub async fn poll(&self) -> Vec<PreviewFrame> {
        let measured = self.measured_base().await;
        let provisional_box = estimate(&self.spec);
        self.targets
            .iter()
            .enumerate()
            .map(|(idx, target)| PreviewFrame {
                target: *target,
                placement: measured.map(|m| resolve(&self.spec, target, &m)),
                provisional: resolve(&self.spec, target, &provisional_box),
                is_main: idx == self.main_target,
            })
            .collect()
    }

    fn main(&self) -> Option<&RenderTarget> {
        self.targets.get(self.main_target)
    }

    /// Start dragging on the main target. Refused while the overlay is
    /// hidden (nothing visible to grab) or when no targets are configured.
    pub async fn begin_drag(&mut self, pointer_x: f32, pointer_y: f32) -> bool {
        let Some(measured) = self.measured_base().await else {
            return false;
        };
        let Some(main) = self.main() else {
            return false;
        };
        let placement = resolve(&self.spec, main, &measured);
        self.drag.press(pointer_x, pointer_y, &placement);
        true
    }

    /// One pointer-move on the main target: emits the patch for the editor
    /// surface and folds it into the session's own spec so every preview
    /// tracks the drag live.
    pub async fn drag_to(&mut self, pointer_x: f32, pointer_y: f32) -> Option<SpecPatch> {
        let measured = self.measured_base().await?;
        let target = *self.main()?;
        let scale = preview_scale(&self.spec, &target);
        let patch = self.drag.motion(
            pointer_x,
            pointer_y,
            &self.spec,
            &target,
            measured.width * scale,
            measured.height * scale,
        )?;
        self.apply_patch(patch);
        Some(patch)
    }

    pub fn end_drag(&mut self) {
        self.drag.release();
    }

    /// Lost capture or release outside the canvas; never leaves the
    /// session stuck in a dragging state.
    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }
}
