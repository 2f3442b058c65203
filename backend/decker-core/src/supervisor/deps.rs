use crate::Platform;
use crate::config::DeckerConfig;
use crate::port::{PortProbe, probe_for};
use crate::process::{ProcessLauncher, TokioLauncher};
use crate::resolve::{ExecutableResolver, PathResolver};
use crate::ui::{Notifier, OutputSink};

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything the supervisor talks to.
///
/// [`Dependencies::new`] wires the real implementations; the `with_*`
/// methods swap individual collaborators.
pub struct Dependencies {
    pub config: DeckerConfig,
    pub workspace: Option<PathBuf>,
    pub resolver: Arc<dyn ExecutableResolver>,
    pub probe: Arc<dyn PortProbe>,
    pub launcher: Arc<dyn ProcessLauncher>,
    pub notifier: Arc<dyn Notifier>,
    pub sink: Arc<dyn OutputSink>,
    pub platform: Platform,
}

impl Dependencies {
    pub fn new(
        config: DeckerConfig,
        workspace: Option<PathBuf>,
        notifier: Arc<dyn Notifier>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        let probe = probe_for(config.server.probe);
        Self {
            config,
            workspace,
            resolver: Arc::new(PathResolver::new()),
            probe,
            launcher: Arc::new(TokioLauncher),
            notifier,
            sink,
            platform: Platform::current(),
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn ExecutableResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_probe(mut self, probe: Arc<dyn PortProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_launcher(mut self, launcher: Arc<dyn ProcessLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn command(&self) -> &str {
        &self.config.executable.command
    }

    pub fn is_installed(&self) -> bool {
        self.resolver.is_installed(self.command())
    }

    /// The open workspace, if there is one and it is a directory.
    pub fn workspace_dir(&self) -> Option<&Path> {
        self.workspace.as_deref().filter(|dir| dir.is_dir())
    }
}
