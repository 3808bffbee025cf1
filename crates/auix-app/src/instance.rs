//! View instances
//!
//! A [`ViewInstance`] is one live page for one client: it owns its
//! [`ViewState`] and shares the compiled site read-only. Messages are
//! processed one at a time, to completion, in arrival order.

use std::sync::Arc;

use auix_compiler::{CompiledResource, CompiledSite, Route};
use auix_connector::CrudGateway;
use auix_core::prelude::*;
use auix_core::NavigationKind;

use crate::config::Settings;
use crate::message::Message;
use crate::process::process_message;
use crate::state::{Redirect, ViewState};

pub struct ViewInstance {
    site: Arc<CompiledSite>,
    resource: Arc<CompiledResource>,
    gateway: Arc<dyn CrudGateway>,
    state: ViewState,
}

impl std::fmt::Debug for ViewInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewInstance")
            .field("resource", &self.resource.name)
            .field("path", &self.state.path)
            .finish()
    }
}

impl ViewInstance {
    /// Mount the view serving `path`, talking to the resource's connector.
    pub fn mount(site: Arc<CompiledSite>, path: &str, settings: Settings) -> Result<Self> {
        let route = site.resolve(path)?;
        let resource = site.resource(&route.resource)?.clone();
        let connector = resource.connector.clone().ok_or_else(|| {
            Error::config(format!("resource '{}' has no connector", resource.name))
        })?;
        Ok(Self::start(site, route, resource, Arc::new(connector), settings))
    }

    /// Mount with an explicit gateway in place of the resource's connector.
    pub fn mount_with_gateway(
        site: Arc<CompiledSite>,
        path: &str,
        gateway: Arc<dyn CrudGateway>,
        settings: Settings,
    ) -> Result<Self> {
        let route = site.resolve(path)?;
        let resource = site.resource(&route.resource)?.clone();
        Ok(Self::start(site, route, resource, gateway, settings))
    }

    fn start(
        site: Arc<CompiledSite>,
        route: Route,
        resource: Arc<CompiledResource>,
        gateway: Arc<dyn CrudGateway>,
        settings: Settings,
    ) -> Self {
        let state = ViewState::new(route.resource.clone(), route.action.view(), settings);
        let mut instance = Self {
            site,
            resource,
            gateway,
            state,
        };
        instance.dispatch(Message::Mount { route });
        instance
    }

    pub fn dispatch(&mut self, message: Message) {
        process_message(
            &mut self.state,
            &self.resource,
            self.gateway.as_ref(),
            &self.site,
            message,
        );
    }

    /// Apply new params to this instance.
    pub fn patch(&mut self, path: &str) -> Result<()> {
        let route = self.site.resolve(path)?;
        if !self.serves(&route) {
            return Err(Error::config(format!(
                "{} is not served by the {} {} view",
                path,
                self.resource.name,
                self.state.screen.kind()
            )));
        }
        self.dispatch(Message::HandleParams { route });
        Ok(())
    }

    fn serves(&self, route: &Route) -> bool {
        route.resource == self.state.resource && route.action.view() == self.state.screen.kind()
    }

    /// Follow the pending redirect. Patches this instance serves stay in
    /// place; anything else mounts a new instance.
    pub fn follow_redirect(mut self) -> Result<Self> {
        let Some(Redirect { kind, to }) = self.state.take_redirect() else {
            return Ok(self);
        };
        let route = self.site.resolve(&to)?;
        if kind == NavigationKind::Patch && self.serves(&route) {
            self.dispatch(Message::HandleParams { route });
            return Ok(self);
        }
        debug!("Navigating from {} to {}", self.state.path, to);
        let settings = self.state.settings.clone();
        if route.resource == self.state.resource {
            let resource = self.resource.clone();
            Ok(Self::start(self.site, route, resource, self.gateway, settings))
        } else {
            Self::mount(self.site, &to, settings)
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    pub fn resource(&self) -> &Arc<CompiledResource> {
        &self.resource
    }

    pub fn site(&self) -> &Arc<CompiledSite> {
        &self.site
    }
}
