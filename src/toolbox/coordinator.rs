use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::host::{Command, HostServices};
use crate::model::{ModeSnapshot, SectionId, SelectedModel, ToolNode};
use crate::runtime::AppContext;
use crate::store::{ModeStore, Subscription};

use super::frame::{
    BodyFrame, ButtonFrame, HeaderFrame, LockControl, ModeBarFrame, ModelChoice, QueryPanelFrame,
    SectionFrame, ToolboxFrame,
};
use super::{
    HotkeyAction, HotkeyRouter, InteractionRoute, KeyEvent, KeyOutcome, LockSupervisor, Result,
    ToolboxConfig, ToolboxError, ToolboxKind, ToolboxSettings, resolve_active_options,
};

/// A mounted toolbox panel.
///
/// The toolbox keeps its own view of the mode store, refreshed by a store
/// subscription for as long as it is mounted. Dropping it unmounts it.
pub struct Toolbox {
    config: ToolboxConfig,
    kind: ToolboxKind,
    store: Arc<ModeStore>,
    services: HostServices,
    settings: Arc<ToolboxSettings>,
    supervisor: Arc<LockSupervisor>,
    view: Arc<Mutex<ModeSnapshot>>,
    routers: [HotkeyRouter; 4],
    config_open: bool,
    _subscription: Subscription,
}

impl fmt::Debug for Toolbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolbox")
            .field("config", &self.config)
            .field("kind", &self.kind)
            .field("view", &self.view())
            .finish_non_exhaustive()
    }
}

impl Toolbox {
    pub fn mount(context: &AppContext, config: ToolboxConfig) -> Self {
        let settings = Arc::clone(context.settings());
        let kind = settings.kind_of(&config.section_id);
        let store = Arc::clone(context.store());
        let view = Arc::new(Mutex::new(store.snapshot()));

        let mirror = Arc::clone(&view);
        let subscription = store.subscribe(move |_, snapshot| {
            *mirror.lock().unwrap_or_else(PoisonError::into_inner) = snapshot.clone();
        });

        let routers = HotkeyAction::ALL
            .map(|action| HotkeyRouter::new(action, settings.hotkeys.key_for(action)));

        tracing::debug!(section_id = %config.section_id, ?kind, "toolbox mounted");
        Self {
            config,
            kind,
            store,
            services: context.services().clone(),
            settings,
            supervisor: Arc::clone(context.supervisor()),
            view,
            routers,
            config_open: false,
            _subscription: subscription,
        }
    }

    pub fn config(&self) -> &ToolboxConfig {
        &self.config
    }

    pub fn section_id(&self) -> &SectionId {
        &self.config.section_id
    }

    pub fn kind(&self) -> ToolboxKind {
        self.kind
    }

    pub fn view(&self) -> ModeSnapshot {
        self.view_guard().clone()
    }

    /// Reconciles the view with the store in one step, for hosts that
    /// replace the store state wholesale.
    pub fn resync(&self) {
        *self.view_guard() = self.store.snapshot();
    }

    pub fn is_subject_to_lock(&self) -> bool {
        self.kind == ToolboxKind::Ai
    }

    pub fn is_locked(&self) -> bool {
        self.view_guard().is_locked()
    }

    /// Locked AI toolboxes hide their body and ignore hotkeys.
    pub fn is_collapsed(&self) -> bool {
        self.is_subject_to_lock() && self.is_locked()
    }

    pub fn handle_key(&self, event: &mut KeyEvent) -> KeyOutcome {
        let Some(router) = self.routers.iter().find(|router| router.matches(event)) else {
            return KeyOutcome::Unmatched;
        };
        if self.is_collapsed() {
            tracing::debug!(section_id = %self.config.section_id, key = %event.key, "hotkey suppressed while locked");
            return KeyOutcome::Suppressed;
        }
        let view = self.view();
        router.route(event, &view, &self.store)
    }

    pub fn interact(&self, item_id: &str) -> InteractionRoute {
        let locked = self.is_collapsed();
        let route = self.supervisor.route(locked, item_id);
        if route == InteractionRoute::Forwarded {
            self.services.toolbar.on_interaction(item_id);
        }
        route
    }

    /// Returns the new lock state.
    pub fn toggle_lock(&self) -> Result<bool> {
        self.require(ToolboxKind::Ai, "lock")?;
        let locked = !self.is_locked();
        self.store.set_locked(locked);
        tracing::info!(section_id = %self.config.section_id, locked, "toolbox lock toggled");
        Ok(locked)
    }

    /// Expands or folds the host configuration panel; available while locked.
    pub fn toggle_config(&mut self) -> Result<bool> {
        if !self.has_config_panel() {
            return Err(self.unavailable("configuration"));
        }
        self.config_open = !self.config_open;
        Ok(self.config_open)
    }

    pub fn set_live_mode(&self, enabled: bool) -> Result<bool> {
        self.require_mode_bar()?;
        tracing::info!(enabled, "live mode");
        Ok(self.store.set_live_mode(enabled))
    }

    pub fn set_pos_neg(&self, enabled: bool) -> Result<bool> {
        self.require_mode_bar()?;
        tracing::info!(enabled, "pos/neg");
        Ok(self.store.set_pos_neg(enabled))
    }

    pub fn set_refine_new(&self, enabled: bool) -> Result<bool> {
        self.require_mode_bar()?;
        tracing::info!(enabled, "refine/new");
        Ok(self.store.set_refine_new(enabled))
    }

    pub fn select_model(&self, model: SelectedModel) -> Result<bool> {
        self.require_mode_bar()?;
        tracing::info!(%model, "model selection");
        Ok(self.store.set_selected_model(model))
    }

    pub fn set_replace_new(&self, enabled: bool) -> Result<bool> {
        self.require(ToolboxKind::TextPrompt, "replace/new")?;
        tracing::info!(enabled, "replace/new");
        Ok(self.store.set_prompt_replace_new(enabled))
    }

    pub fn set_query_instruction(&self, instruction: impl Into<String>) -> Result<bool> {
        self.require(ToolboxKind::Diagnostic, "query")?;
        Ok(self.store.set_query_instruction(instruction))
    }

    pub fn set_query_text(&self, query: impl Into<String>) -> Result<bool> {
        self.require(ToolboxKind::Diagnostic, "query")?;
        Ok(self.store.set_query_text(query))
    }

    pub fn set_query_slices(&self, start: Option<i64>, end: Option<i64>) -> Result<bool> {
        self.require(ToolboxKind::Diagnostic, "query")?;
        let start_changed = self.store.set_query_start_slice(start);
        let end_changed = self.store.set_query_end_slice(end);
        Ok(start_changed || end_changed)
    }

    /// Sends the query panel contents to the host. A textual answer is stored
    /// as the query result.
    pub fn run_query(&self) -> Result<Option<String>> {
        self.require(ToolboxKind::Diagnostic, "query")?;
        let bundle = self.view().query;
        if !bundle.is_runnable() {
            return Err(ToolboxError::EmptyQuery);
        }
        let answer = self.services.commands.run(&Command::RunTextQuery {
            instruction: bundle.instruction,
            query: bundle.query,
            start_slice: bundle.start_slice,
            end_slice: bundle.end_slice,
        })?;
        match answer {
            Value::String(result) => {
                self.store.set_query_result(Some(result.clone()));
                Ok(Some(result))
            }
            _ => Ok(None),
        }
    }

    /// Builds the panel for the current state. Nothing is rendered when the
    /// toolbox section is empty.
    pub fn render(&self) -> Result<Option<ToolboxFrame>> {
        let toolbar = &self.services.toolbar;
        let top_level = toolbar.button_section(&self.config.section_id);
        if top_level.is_empty() {
            return Ok(None);
        }
        let section_ids = self.top_level_sections(&top_level)?;

        let view = self.view();
        let collapsed = self.is_collapsed();
        let header = self.header(&view);
        let body = (!collapsed).then(|| BodyFrame {
            config_open: self.config_open,
            sections: section_ids
                .iter()
                .map(|section_id| self.section_frame(section_id, &view))
                .collect(),
            active_options: resolve_active_options(&section_ids, |section_id| {
                toolbar.button_section(section_id)
            }),
        });

        Ok(Some(ToolboxFrame {
            section_id: self.config.section_id.clone(),
            header,
            open: self.config.default_open && !collapsed,
            body,
        }))
    }

    fn top_level_sections(&self, top_level: &[ToolNode]) -> Result<Vec<SectionId>> {
        top_level
            .iter()
            .map(|node| {
                node.child_section
                    .clone()
                    .ok_or_else(|| ToolboxError::NotASection {
                        section_id: self.config.section_id.clone(),
                        item_id: node.id.clone(),
                    })
            })
            .collect()
    }

    fn header(&self, view: &ModeSnapshot) -> HeaderFrame {
        let translator = &self.services.translator;
        let scope = &self.settings.translation_scope;
        let lock = self.is_subject_to_lock().then(|| {
            let locked = view.is_locked();
            let label = if locked { "Unlock tools" } else { "Lock tools" };
            LockControl {
                locked,
                label: translator.translate(scope, label),
            }
        });
        HeaderFrame {
            title: translator.translate(scope, &self.config.title),
            lock,
            config_gear: self.has_config_panel().then_some(self.config_open),
        }
    }

    fn section_frame(&self, section_id: &SectionId, view: &ModeSnapshot) -> SectionFrame {
        let hide = |id: &str| {
            self.kind == ToolboxKind::Diagnostic
                && self.settings.hidden_buttons.iter().any(|hidden| hidden == id)
        };
        let buttons = self
            .services
            .toolbar
            .button_section(section_id)
            .into_iter()
            .filter(|node| !hide(&node.id))
            .map(|node| ButtonFrame {
                id: node.id,
                is_active: node.is_active,
            })
            .collect();

        SectionFrame {
            section_id: section_id.clone(),
            mode_bar: (self.kind == ToolboxKind::Ai).then(|| ModeBarFrame {
                live_mode: view.live_mode,
                pos_neg: view.pos_neg,
                refine_new: view.refine_new,
                selected_model: view.selected_model,
                models: ModelChoice::all(),
            }),
            replace_new: (self.kind == ToolboxKind::TextPrompt).then_some(view.prompt_replace_new),
            buttons,
            query_panel: (self.kind == ToolboxKind::Diagnostic).then(|| QueryPanelFrame {
                instruction: view.query.instruction.clone(),
                query: view.query.query.clone(),
                start_slice: view.query.start_slice,
                end_slice: view.query.end_slice,
                run_enabled: view.query.is_runnable(),
                result: view.query.result.clone(),
            }),
        }
    }

    fn has_config_panel(&self) -> bool {
        self.services
            .toolbar
            .has_config_panel(&self.config.section_id)
    }

    fn require(&self, kind: ToolboxKind, control: &'static str) -> Result<()> {
        if self.kind != kind {
            return Err(self.unavailable(control));
        }
        Ok(())
    }

    fn require_mode_bar(&self) -> Result<()> {
        self.require(ToolboxKind::Ai, "mode bar")?;
        if self.is_collapsed() {
            return Err(ToolboxError::Locked(self.config.section_id.clone()));
        }
        Ok(())
    }

    fn unavailable(&self, control: &'static str) -> ToolboxError {
        ToolboxError::ControlUnavailable {
            section_id: self.config.section_id.clone(),
            control,
        }
    }

    fn view_guard(&self) -> MutexGuard<'_, ModeSnapshot> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Toolbox {
    fn drop(&mut self) {
        tracing::debug!(section_id = %self.config.section_id, "toolbox unmounted");
    }
}
