use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Value, json};

use crate::host::InMemoryHost;
use crate::measurement::BidirectionalTrigger;
use crate::model::SectionId;
use crate::runtime::AppContext;
use crate::store::ModeStore;
use crate::toolbox::{KeyEvent, KeyOutcome, Toolbox, ToolboxConfig, ToolboxFrame};

use super::{Result, SessionError, SessionReport, SessionSpec, SessionStep, StepReport};

type MeasurementKey = (String, u32);

/// Replays a session against an in-memory host. A failing step is recorded
/// in the report and the remaining steps still run.
pub fn run_session(spec: &SessionSpec) -> Result<SessionReport> {
    spec.validate()?;

    let host = InMemoryHost::shared();
    spec.fixture.install(&host);
    let context = AppContext::new(ModeStore::shared(), host.services(), spec.settings.clone())?;
    let mut replay = Replay {
        toolboxes: spec
            .toolboxes
            .iter()
            .cloned()
            .map(|config| context.mount_toolbox(config))
            .collect(),
        measurements: BTreeMap::new(),
        context: &context,
    };

    let mut steps = Vec::with_capacity(spec.steps.len());
    for (index, step) in spec.steps.iter().enumerate() {
        let (outcome, error) = match replay.apply(step) {
            Ok(outcome) => (outcome, None),
            Err(error) => {
                tracing::warn!(index, step = step.kind(), %error, "session step failed");
                (Value::Null, Some(error.to_string()))
            }
        };
        steps.push(StepReport {
            index,
            step: step.kind().to_string(),
            outcome,
            error,
        });
    }
    tracing::info!(
        session = spec.name.as_deref().unwrap_or("unnamed"),
        steps = steps.len(),
        "session replayed"
    );

    Ok(SessionReport {
        session_name: spec.name.clone(),
        steps,
        dispatched: host.dispatched(),
        interactions: host.interactions(),
        active_tool: host.active_tool(),
        final_modes: context.store().snapshot(),
    })
}

/// Mounts one toolbox on the session fixture and renders it without
/// replaying any step.
pub fn render_section(spec: &SessionSpec, section_id: &SectionId) -> Result<Option<ToolboxFrame>> {
    let host = InMemoryHost::shared();
    spec.fixture.install(&host);
    let context = AppContext::new(ModeStore::shared(), host.services(), spec.settings.clone())?;
    let config = spec
        .toolboxes
        .iter()
        .find(|config| config.section_id == *section_id)
        .cloned()
        .unwrap_or_else(|| ToolboxConfig::new(section_id.clone(), section_id.as_str()));
    let toolbox = context.mount_toolbox(config);
    Ok(toolbox.render()?)
}

struct Replay<'a> {
    context: &'a AppContext,
    toolboxes: Vec<Toolbox>,
    measurements: BTreeMap<MeasurementKey, BidirectionalTrigger>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyReport<'a> {
    section: &'a SectionId,
    #[serde(flatten)]
    outcome: KeyOutcome,
}

impl Replay<'_> {
    fn apply(&mut self, step: &SessionStep) -> Result<Value> {
        let outcome = match step {
            SessionStep::Key { key, focus } => {
                let mut event = KeyEvent::new(key.clone(), *focus);
                let outcomes = self
                    .toolboxes
                    .iter()
                    .map(|toolbox| KeyReport {
                        section: toolbox.section_id(),
                        outcome: toolbox.handle_key(&mut event),
                    })
                    .collect::<Vec<_>>();
                serde_json::to_value(outcomes)?
            }
            SessionStep::Interact { section, item } => {
                serde_json::to_value(self.toolbox(section)?.interact(item))?
            }
            SessionStep::ToggleLock { section } => {
                json!({ "locked": self.toolbox(section)?.toggle_lock()? })
            }
            SessionStep::ToggleConfig { section } => {
                json!({ "configOpen": self.toolbox_mut(section)?.toggle_config()? })
            }
            SessionStep::SetLiveMode { section, enabled } => {
                changed(self.toolbox(section)?.set_live_mode(*enabled)?)
            }
            SessionStep::SetPosNeg { section, enabled } => {
                changed(self.toolbox(section)?.set_pos_neg(*enabled)?)
            }
            SessionStep::SetRefineNew { section, enabled } => {
                changed(self.toolbox(section)?.set_refine_new(*enabled)?)
            }
            SessionStep::SelectModel { section, model } => {
                changed(self.toolbox(section)?.select_model(*model)?)
            }
            SessionStep::SetReplaceNew { section, enabled } => {
                changed(self.toolbox(section)?.set_replace_new(*enabled)?)
            }
            SessionStep::SetQuery {
                section,
                instruction,
                query,
                start_slice,
                end_slice,
            } => {
                let toolbox = self.toolbox(section)?;
                let mut any = false;
                if let Some(instruction) = instruction {
                    any |= toolbox.set_query_instruction(instruction.clone())?;
                }
                if let Some(query) = query {
                    any |= toolbox.set_query_text(query.clone())?;
                }
                any |= toolbox.set_query_slices(*start_slice, *end_slice)?;
                changed(any)
            }
            SessionStep::RunQuery { section } => {
                json!({ "result": self.toolbox(section)?.run_query()? })
            }
            SessionStep::SetActiveSegment { index } => {
                changed(self.context.store().set_active_segment_index(*index))
            }
            SessionStep::Render { section } => serde_json::to_value(self.toolbox(section)?.render()?)?,
            SessionStep::MountMeasurement {
                segmentation_id,
                segment_index,
            } => {
                let trigger = self
                    .context
                    .mount_measurement(segmentation_id.clone(), *segment_index);
                self.measurements
                    .insert((segmentation_id.clone(), *segment_index), trigger);
                json!({ "mounted": true })
            }
            SessionStep::RenderMeasurement {
                segmentation_id,
                segment_index,
            } => {
                let view = self.measurement(segmentation_id, *segment_index).render()?;
                serde_json::to_value(view)?
            }
            SessionStep::ToggleAnnotation {
                segmentation_id,
                segment_index,
            } => {
                let visible = self
                    .measurement(segmentation_id, *segment_index)
                    .toggle_visibility()?;
                json!({ "visible": visible })
            }
        };
        Ok(outcome)
    }

    fn toolbox(&self, section: &SectionId) -> Result<&Toolbox> {
        self.toolboxes
            .iter()
            .find(|toolbox| toolbox.section_id() == section)
            .ok_or_else(|| SessionError::NotMounted(section.clone()))
    }

    fn toolbox_mut(&mut self, section: &SectionId) -> Result<&mut Toolbox> {
        self.toolboxes
            .iter_mut()
            .find(|toolbox| toolbox.section_id() == section)
            .ok_or_else(|| SessionError::NotMounted(section.clone()))
    }

    /// Mounts the trigger on first use.
    fn measurement(&mut self, segmentation_id: &str, segment_index: u32) -> &mut BidirectionalTrigger {
        let context = self.context;
        self.measurements
            .entry((segmentation_id.to_string(), segment_index))
            .or_insert_with(|| context.mount_measurement(segmentation_id, segment_index))
    }
}

fn changed(changed: bool) -> Value {
    json!({ "changed": changed })
}
