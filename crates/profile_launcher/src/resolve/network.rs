//! Host network and IPC namespaces

use crate::config::LaunchProfile;

pub const HOST_MODE: &str = "host";

/// Put every container in the host network and IPC namespaces
pub fn apply_host_network(profile: &mut LaunchProfile) {
    for container in &mut profile.containers {
        log::debug!("[{}] Using host network and IPC", container.name);
        container.host_config.network_mode = Some(HOST_MODE.to_string());
        container.host_config.ipc_mode = Some(HOST_MODE.to_string());
    }
}
