use std::sync::Arc;

use editlock_coordinator::{
    DescriptorSource, FileDescriptorProvider, LockCoordinator, LockDescriptorRegistry,
    StaticDescriptorProvider, SystemContext,
};
use editlock_events::ClusterTransport;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The node's lock coordinator.
    pub coordinator: Arc<LockCoordinator>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

/// Wire a coordinator from configuration.
///
/// Inline `LOCK_TYPES` descriptors come first, so a descriptor file can
/// override them by name.
pub fn build_coordinator(
    config: &ServerConfig,
    transport: Arc<dyn ClusterTransport>,
) -> LockCoordinator {
    let mut providers: Vec<Arc<dyn DescriptorSource>> = vec![Arc::new(
        StaticDescriptorProvider::new(config.lock_types.clone()),
    )];
    if let Some(path) = &config.descriptors_path {
        providers.push(Arc::new(FileDescriptorProvider::new(path)));
    }

    LockCoordinator::new(
        LockDescriptorRegistry::new(providers),
        Arc::new(SystemContext::default()),
        transport,
    )
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use editlock_core::locking::LockDescriptor;
    use editlock_events::{NodeId, NoopTransport};

    use super::*;

    fn config(lock_types: Vec<LockDescriptor>, path: Option<std::path::PathBuf>) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: Vec::new(),
            request_timeout_secs: 30,
            shutdown_timeout_secs: 5,
            node_id: NodeId::random(),
            descriptors_path: path,
            lock_types,
            sweep_interval_secs: 60,
            peer_urls: Vec::new(),
        }
    }

    #[test]
    fn inline_lock_types_are_registered() {
        let coordinator = build_coordinator(
            &config(vec![LockDescriptor::new("invoice", Some(60))], None),
            Arc::new(NoopTransport),
        );
        assert_eq!(
            coordinator.registry().get("invoice"),
            Some(LockDescriptor::new("invoice", Some(60)))
        );
        assert!(coordinator.registry().get("customer").is_none());
    }

    #[test]
    fn descriptor_file_overrides_inline_types() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name":"invoice","timeout_secs":900}},{{"name":"customer"}}]"#
        )
        .unwrap();

        let coordinator = build_coordinator(
            &config(
                vec![LockDescriptor::new("invoice", Some(60))],
                Some(file.path().to_path_buf()),
            ),
            Arc::new(NoopTransport),
        );
        assert_eq!(
            coordinator.registry().get("invoice"),
            Some(LockDescriptor::new("invoice", Some(900)))
        );
        assert_eq!(
            coordinator.registry().get("customer"),
            Some(LockDescriptor::new("customer", None))
        );
    }
}
