//! Message processing loop
//!
//! Runs a message through `update`, executes the resulting action and feeds
//! every follow-up message back in, in order, until the queue drains.

use std::collections::VecDeque;

use auix_compiler::{CompiledResource, CompiledSite};
use auix_connector::CrudGateway;

use crate::actions::handle_action;
use crate::handler;
use crate::message::Message;
use crate::state::ViewState;

/// Process a message through the TEA update function
pub fn process_message(
    state: &mut ViewState,
    resource: &CompiledResource,
    gateway: &dyn CrudGateway,
    site: &CompiledSite,
    message: Message,
) {
    let mut queue = VecDeque::from([message]);
    while let Some(m) = queue.pop_front() {
        let result = handler::update(state, resource, m);

        if let Some(follow_up) = result.message {
            queue.push_back(follow_up);
        }
        if let Some(action) = result.action {
            queue.push_back(handle_action(action, gateway, site));
        }
    }
}
