use crate::config::model::{GlitchConfig, GlitchConfigPatch};
use crate::config::share::ConfigSource;
use crate::foundation::error::GlitchResult;
use crate::state::history::History;

/// Owns the current [`GlitchConfig`] and its undo/redo history.
///
/// Every successful mutation records the previous config. Failed mutations leave both the
/// config and the history untouched.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    history: History<GlitchConfig>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(GlitchConfig::default())
    }
}

impl ConfigStore {
    pub fn new(initial: GlitchConfig) -> Self {
        Self {
            history: History::new(initial),
        }
    }

    pub fn state(&self) -> &GlitchConfig {
        self.history.present()
    }

    /// Merge `patch` into the current config.
    pub fn set_state(&mut self, patch: &GlitchConfigPatch) -> GlitchResult<&GlitchConfig> {
        let next = self.state().patched(patch)?;
        self.commit(next, "edit");
        Ok(self.state())
    }

    /// Replace the whole config (preset load, gallery open).
    pub fn replace(&mut self, config: GlitchConfig) -> GlitchResult<&GlitchConfig> {
        config.validate()?;
        self.commit(config, "replace");
        Ok(self.state())
    }

    /// Back to the default config. Recorded like any other change.
    pub fn reset(&mut self) {
        self.commit(GlitchConfig::default(), "reset");
    }

    /// Parse and apply a config from `source`.
    ///
    /// On failure the error is logged and returned, and nothing changes.
    pub fn ingest(&mut self, source: &ConfigSource) -> GlitchResult<&GlitchConfig> {
        match source.resolve(self.state()) {
            Ok(next) => {
                self.commit(next, source.kind());
                Ok(self.state())
            }
            Err(err) => {
                tracing::warn!(source = source.kind(), error = %err, "rejected config");
                Err(err)
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        tracing::debug!(moved, "undo");
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        tracing::debug!(moved, "redo");
        moved
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn past(&self) -> impl ExactSizeIterator<Item = &GlitchConfig> {
        self.history.past()
    }

    pub fn future(&self) -> impl ExactSizeIterator<Item = &GlitchConfig> {
        self.history.future()
    }

    fn commit(&mut self, next: GlitchConfig, reason: &str) {
        tracing::debug!(reason, name = %next.effect_name, "config changed");
        self.history.push(next);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/store.rs"]
mod tests;
