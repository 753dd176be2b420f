use std::fmt;

use serde::Serialize;

use crate::host::{Command, HostServices};
use crate::model::{Bidirectional, BidirectionalState};
use crate::runtime::AppContext;
use crate::toolbox::run_best_effort;

use super::{MeasurementError, Result, round_for_display};

const COMPUTING: &str = "Computing bidirectional measurement";
const CANNOT_COMPUTE: &str = "Can't compute bidirectional measurement";
const TOGGLE_VISIBILITY: &str = "Toggle visibility";

/// What the statistics header shows for one segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum MeasurementView {
    /// Requested and not cached yet. Shown disabled.
    Pending { notice: String },
    Failed { notice: String, reason: String },
    Ready(MeasurementReadout),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementReadout {
    /// Longer extent with its unit.
    pub length: String,
    pub width: String,
    pub annotation_uid: String,
    pub visible: bool,
    pub toggle_label: String,
}

/// Per-segment widget that asks the host for a bidirectional measurement the
/// first time it sees a segment without one.
pub struct BidirectionalTrigger {
    segmentation_id: String,
    segment_index: u32,
    services: HostServices,
    scope: String,
    requested: bool,
}

impl fmt::Debug for BidirectionalTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BidirectionalTrigger")
            .field("segmentation_id", &self.segmentation_id)
            .field("segment_index", &self.segment_index)
            .field("requested", &self.requested)
            .finish_non_exhaustive()
    }
}

impl BidirectionalTrigger {
    pub fn mount(
        context: &AppContext,
        segmentation_id: impl Into<String>,
        segment_index: u32,
    ) -> Self {
        Self {
            segmentation_id: segmentation_id.into(),
            segment_index,
            services: context.services().clone(),
            scope: context.settings().measurement_scope.clone(),
            requested: false,
        }
    }

    pub fn segmentation_id(&self) -> &str {
        &self.segmentation_id
    }

    pub fn segment_index(&self) -> u32 {
        self.segment_index
    }

    /// Whether this mount has already issued its compute request.
    pub fn has_requested(&self) -> bool {
        self.requested
    }

    /// Reads the segment cache and builds the header. Segments without named
    /// statistics render nothing. The first render that finds the slot absent
    /// issues the compute request; later renders never repeat it.
    pub fn render(&mut self) -> Result<Option<MeasurementView>> {
        let Some(state) = self.cached_state()? else {
            return Ok(None);
        };
        if state != BidirectionalState::Absent || self.requested {
            return Ok(Some(self.view(&state)));
        }

        self.request()?;
        let state = self.cached_state()?.unwrap_or_default();
        Ok(Some(self.view(&state)))
    }

    /// Flips the annotation's visibility and returns the new value. Showing a
    /// hidden annotation also jumps the viewer to it; a failed jump is logged
    /// and does not undo the toggle.
    pub fn toggle_visibility(&self) -> Result<bool> {
        let bidirectional = self.ready()?;
        let uid = &bidirectional.annotation_uid;
        let was_visible = self.services.visibility.is_visible(uid);

        self.services.visibility.set_visible(uid, !was_visible);
        self.services
            .segmentation
            .segmentation_updated(&self.segmentation_id);
        if !was_visible {
            run_best_effort(
                self.services.commands.as_ref(),
                &Command::JumpToAnnotation { uid: uid.clone() },
            );
        }
        tracing::debug!(annotation_uid = %uid, visible = !was_visible, "annotation visibility toggled");
        Ok(!was_visible)
    }

    fn request(&mut self) -> Result<()> {
        self.requested = true;
        let segmentation = self.services.segmentation.as_ref();
        segmentation.mark_bidirectional(
            &self.segmentation_id,
            self.segment_index,
            BidirectionalState::Pending,
        )?;

        let command = Command::ComputeBidirectional {
            segmentation_id: self.segmentation_id.clone(),
            segment_index: self.segment_index,
        };
        tracing::info!(
            segmentation_id = %self.segmentation_id,
            segment_index = self.segment_index,
            "bidirectional measurement requested"
        );
        if let Err(error) = self.services.commands.run(&command) {
            tracing::warn!(%error, "bidirectional measurement request failed");
            segmentation.mark_bidirectional(
                &self.segmentation_id,
                self.segment_index,
                BidirectionalState::Failed {
                    reason: error.to_string(),
                },
            )?;
        }
        Ok(())
    }

    /// `None` when the segment carries no named statistics.
    fn cached_state(&self) -> Result<Option<BidirectionalState>> {
        let segmentation = self
            .services
            .segmentation
            .segmentation(&self.segmentation_id)
            .ok_or_else(|| MeasurementError::UnknownSegmentation(self.segmentation_id.clone()))?;
        let segment = segmentation
            .segments
            .get(&self.segment_index)
            .ok_or_else(|| MeasurementError::UnknownSegment {
                segmentation_id: self.segmentation_id.clone(),
                segment_index: self.segment_index,
            })?;
        Ok(segment
            .cached_stats
            .named_stats
            .as_ref()
            .map(|stats| stats.bidirectional.clone()))
    }

    fn ready(&self) -> Result<Bidirectional> {
        self.cached_state()?
            .and_then(|state| state.ready().cloned())
            .ok_or_else(|| MeasurementError::NotReady {
                segmentation_id: self.segmentation_id.clone(),
                segment_index: self.segment_index,
            })
    }

    fn view(&self, state: &BidirectionalState) -> MeasurementView {
        let translate = |key: &str| self.services.translator.translate(&self.scope, key);
        match state {
            BidirectionalState::Absent | BidirectionalState::Pending => MeasurementView::Pending {
                notice: translate(COMPUTING),
            },
            BidirectionalState::Failed { reason } => MeasurementView::Failed {
                notice: translate(CANNOT_COMPUTE),
                reason: reason.clone(),
            },
            BidirectionalState::Ready(bidirectional) => {
                let unit = &bidirectional.unit;
                MeasurementView::Ready(MeasurementReadout {
                    length: format!("{} {unit}", round_for_display(bidirectional.length())),
                    width: format!("{} {unit}", round_for_display(bidirectional.width())),
                    annotation_uid: bidirectional.annotation_uid.clone(),
                    visible: self
                        .services
                        .visibility
                        .is_visible(&bidirectional.annotation_uid),
                    toggle_label: translate(TOGGLE_VISIBILITY),
                })
            }
        }
    }
}
