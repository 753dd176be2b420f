use std::fmt;
use std::sync::Arc;

use crate::model::{BidirectionalState, SectionId, Segmentation, ToolNode};

use super::{CommandDispatcher, Result};

/// Button/section registry of the host toolbar.
pub trait ToolbarService: Send + Sync {
    fn button_section(&self, section_id: &SectionId) -> Vec<ToolNode>;

    /// Forwards a tool button press to the toolbar dispatcher.
    fn on_interaction(&self, item_id: &str);

    /// Whether the host ships a custom configuration panel for a section.
    fn has_config_panel(&self, _section_id: &SectionId) -> bool {
        false
    }
}

pub trait SegmentationService: Send + Sync {
    fn segmentation(&self, segmentation_id: &str) -> Option<Segmentation>;

    /// Writes the bidirectional slot of a segment's cached statistics.
    fn mark_bidirectional(
        &self,
        segmentation_id: &str,
        segment_index: u32,
        state: BidirectionalState,
    ) -> Result<()>;

    /// Tells the service a segmentation's derived state changed.
    fn segmentation_updated(&self, segmentation_id: &str);
}

pub trait AnnotationVisibility: Send + Sync {
    fn is_visible(&self, annotation_uid: &str) -> bool;
    fn set_visible(&self, annotation_uid: &str, visible: bool);
}

pub trait Translator: Send + Sync {
    fn translate(&self, scope: &str, key: &str) -> String;
}

/// Returns every key unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, _scope: &str, key: &str) -> String {
        key.to_string()
    }
}

/// Capability bundle a toolbox host hands to every toolbox it mounts.
#[derive(Clone)]
pub struct HostServices {
    pub commands: Arc<dyn CommandDispatcher>,
    pub toolbar: Arc<dyn ToolbarService>,
    pub segmentation: Arc<dyn SegmentationService>,
    pub visibility: Arc<dyn AnnotationVisibility>,
    pub translator: Arc<dyn Translator>,
}

impl fmt::Debug for HostServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostServices").finish_non_exhaustive()
    }
}
