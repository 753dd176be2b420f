use std::sync::Arc;

use crate::host::HostServices;
use crate::measurement::BidirectionalTrigger;
use crate::store::{ModeStore, Subscription};
use crate::toolbox::{
    LockSupervisor, Result, Toolbox, ToolboxConfig, ToolboxSettings, install_reactions,
};

/// Everything toolboxes share: the mode store, host capabilities, settings and
/// the store reactions that turn mode transitions into commands.
#[derive(Debug)]
pub struct AppContext {
    store: Arc<ModeStore>,
    services: HostServices,
    settings: Arc<ToolboxSettings>,
    supervisor: Arc<LockSupervisor>,
    _reactions: Vec<Subscription>,
}

impl AppContext {
    pub fn new(
        store: Arc<ModeStore>,
        services: HostServices,
        settings: ToolboxSettings,
    ) -> Result<Self> {
        settings.validate()?;
        Ok(Self::assemble(store, services, settings))
    }

    pub fn with_defaults(services: HostServices) -> Self {
        Self::assemble(ModeStore::shared(), services, ToolboxSettings::default())
    }

    fn assemble(store: Arc<ModeStore>, services: HostServices, settings: ToolboxSettings) -> Self {
        let supervisor = Arc::new(LockSupervisor::new(
            settings.safe_tool.clone(),
            Arc::clone(&services.commands),
        ));
        let reactions = install_reactions(
            &store,
            Arc::clone(&services.commands),
            Arc::clone(&supervisor),
        );
        Self {
            store,
            services,
            settings: Arc::new(settings),
            supervisor,
            _reactions: reactions,
        }
    }

    pub fn store(&self) -> &Arc<ModeStore> {
        &self.store
    }

    pub fn services(&self) -> &HostServices {
        &self.services
    }

    pub fn settings(&self) -> &Arc<ToolboxSettings> {
        &self.settings
    }

    pub fn supervisor(&self) -> &Arc<LockSupervisor> {
        &self.supervisor
    }

    pub fn mount_toolbox(&self, config: ToolboxConfig) -> Toolbox {
        Toolbox::mount(self, config)
    }

    pub fn mount_measurement(
        &self,
        segmentation_id: impl Into<String>,
        segment_index: u32,
    ) -> BidirectionalTrigger {
        BidirectionalTrigger::mount(self, segmentation_id, segment_index)
    }
}
