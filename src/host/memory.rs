use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Value, json};

use crate::model::{Bidirectional, BidirectionalState, SectionId, Segmentation, ToolNode};

use super::{
    AnnotationVisibility, Command, CommandDispatcher, HostError, HostServices, IdentityTranslator,
    Result, SegmentationService, ToolbarService,
};

/// Host double backed by in-process maps.
///
/// Tool activation mirrors a real toolbar: activating a tool clears the active
/// flag on every other plain tool. Bidirectional computations complete
/// synchronously when an answer is registered and stay pending otherwise.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    sections: Mutex<BTreeMap<SectionId, Vec<ToolNode>>>,
    config_panels: Mutex<BTreeSet<SectionId>>,
    segmentations: Mutex<BTreeMap<String, Segmentation>>,
    hidden_annotations: Mutex<BTreeSet<String>>,
    active_tool: Mutex<Option<String>>,
    dispatched: Mutex<Vec<Command>>,
    interactions: Mutex<Vec<String>>,
    updated_segmentations: Mutex<Vec<String>>,
    failing_commands: Mutex<BTreeSet<String>>,
    bidirectional_answers: Mutex<BTreeMap<(String, u32), Bidirectional>>,
    query_answer: Mutex<Option<String>>,
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn services(self: &Arc<Self>) -> HostServices {
        HostServices {
            commands: Arc::clone(self) as Arc<dyn CommandDispatcher>,
            toolbar: Arc::clone(self) as Arc<dyn ToolbarService>,
            segmentation: Arc::clone(self) as Arc<dyn SegmentationService>,
            visibility: Arc::clone(self) as Arc<dyn AnnotationVisibility>,
            translator: Arc::new(IdentityTranslator),
        }
    }

    pub fn insert_section(&self, section_id: impl Into<SectionId>, nodes: Vec<ToolNode>) {
        let section_id = section_id.into();
        let active = nodes
            .iter()
            .find(|node| node.is_active && !node.is_section())
            .map(|node| node.id.clone());
        guard(&self.sections).insert(section_id, nodes);
        if let Some(tool) = active {
            *guard(&self.active_tool) = Some(tool);
        }
    }

    pub fn insert_config_panel(&self, section_id: impl Into<SectionId>) {
        guard(&self.config_panels).insert(section_id.into());
    }

    pub fn insert_segmentation(&self, segmentation_id: impl Into<String>, segmentation: Segmentation) {
        guard(&self.segmentations).insert(segmentation_id.into(), segmentation);
    }

    pub fn fail_command(&self, command_name: impl Into<String>) {
        guard(&self.failing_commands).insert(command_name.into());
    }

    pub fn answer_bidirectional(
        &self,
        segmentation_id: impl Into<String>,
        segment_index: u32,
        answer: Bidirectional,
    ) {
        guard(&self.bidirectional_answers).insert((segmentation_id.into(), segment_index), answer);
    }

    pub fn answer_query(&self, answer: impl Into<String>) {
        *guard(&self.query_answer) = Some(answer.into());
    }

    pub fn active_tool(&self) -> Option<String> {
        guard(&self.active_tool).clone()
    }

    pub fn dispatched(&self) -> Vec<Command> {
        guard(&self.dispatched).clone()
    }

    pub fn dispatched_named(&self, command_name: &str) -> Vec<Command> {
        guard(&self.dispatched)
            .iter()
            .filter(|command| command.name() == command_name)
            .cloned()
            .collect()
    }

    pub fn interactions(&self) -> Vec<String> {
        guard(&self.interactions).clone()
    }

    pub fn updated_segmentations(&self) -> Vec<String> {
        guard(&self.updated_segmentations).clone()
    }

    fn activate_tool(&self, tool_name: &str) {
        for nodes in guard(&self.sections).values_mut() {
            for node in nodes.iter_mut().filter(|node| !node.is_section()) {
                node.is_active = node.id == tool_name;
            }
        }
        *guard(&self.active_tool) = Some(tool_name.to_string());
    }

    fn complete_bidirectional(&self, segmentation_id: &str, segment_index: u32) -> Result<Value> {
        let answer = guard(&self.bidirectional_answers)
            .get(&(segmentation_id.to_string(), segment_index))
            .cloned();
        match answer {
            Some(answer) => {
                self.mark_bidirectional(
                    segmentation_id,
                    segment_index,
                    BidirectionalState::Ready(answer),
                )?;
                Ok(json!({ "status": "ready" }))
            }
            None => Ok(json!({ "status": "pending" })),
        }
    }
}

impl CommandDispatcher for InMemoryHost {
    fn run(&self, command: &Command) -> Result<Value> {
        guard(&self.dispatched).push(command.clone());
        if guard(&self.failing_commands).contains(command.name()) {
            return Err(HostError::CommandFailed {
                command: command.name().to_string(),
                message: "rejected by host".to_string(),
            });
        }

        match command {
            Command::SetActiveTool { tool_name } => {
                self.activate_tool(tool_name);
                Ok(Value::Null)
            }
            Command::ComputeBidirectional {
                segmentation_id,
                segment_index,
            } => self.complete_bidirectional(segmentation_id, *segment_index),
            Command::RunTextQuery { .. } => Ok(guard(&self.query_answer)
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null)),
            Command::ResetInteractiveState | Command::JumpToAnnotation { .. } => Ok(Value::Null),
        }
    }
}

impl ToolbarService for InMemoryHost {
    fn button_section(&self, section_id: &SectionId) -> Vec<ToolNode> {
        guard(&self.sections)
            .get(section_id)
            .cloned()
            .unwrap_or_default()
    }

    fn on_interaction(&self, item_id: &str) {
        guard(&self.interactions).push(item_id.to_string());
        self.activate_tool(item_id);
    }

    fn has_config_panel(&self, section_id: &SectionId) -> bool {
        guard(&self.config_panels).contains(section_id)
    }
}

impl SegmentationService for InMemoryHost {
    fn segmentation(&self, segmentation_id: &str) -> Option<Segmentation> {
        guard(&self.segmentations).get(segmentation_id).cloned()
    }

    fn mark_bidirectional(
        &self,
        segmentation_id: &str,
        segment_index: u32,
        state: BidirectionalState,
    ) -> Result<()> {
        let mut segmentations = guard(&self.segmentations);
        let segmentation = segmentations
            .get_mut(segmentation_id)
            .ok_or_else(|| HostError::UnknownSegmentation(segmentation_id.to_string()))?;
        let segment = segmentation.segments.get_mut(&segment_index).ok_or_else(|| {
            HostError::UnknownSegment {
                segmentation_id: segmentation_id.to_string(),
                segment_index,
            }
        })?;
        segment
            .cached_stats
            .named_stats
            .get_or_insert_with(Default::default)
            .bidirectional = state;
        Ok(())
    }

    fn segmentation_updated(&self, segmentation_id: &str) {
        guard(&self.updated_segmentations).push(segmentation_id.to_string());
    }
}

impl AnnotationVisibility for InMemoryHost {
    fn is_visible(&self, annotation_uid: &str) -> bool {
        !guard(&self.hidden_annotations).contains(annotation_uid)
    }

    fn set_visible(&self, annotation_uid: &str, visible: bool) {
        let mut hidden = guard(&self.hidden_annotations);
        if visible {
            hidden.remove(annotation_uid);
        } else {
            hidden.insert(annotation_uid.to_string());
        }
    }
}
