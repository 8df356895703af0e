//! Edit script replay.
//!
//! A script is a JSON array of update messages (see [`StudioCommand`]). Steps that
//! create something may carry `"as": "<name>"`; later steps refer to the created
//! id as `"id": "$<name>"`. Refused steps are logged and skipped.

use std::collections::HashMap;

use serde_json::Value;
use thumbnail_core::{DocumentStore, StudioCommand, StudioError, StudioResult};

/// Outcome of a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Steps that changed or confirmed the document.
    pub applied: usize,
    /// Steps that were refused, with their notice.
    pub refused: Vec<(usize, String)>,
}

/// Replays scripts against a [`DocumentStore`], remembering named ids.
#[derive(Debug, Default)]
pub struct ScriptRunner {
    aliases: HashMap<String, Value>,
}

impl ScriptRunner {
    /// Create a runner with no aliases.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Id recorded under `name`, if any.
    #[must_use]
    pub fn alias(&self, name: &str) -> Option<&Value> {
        self.aliases.get(name)
    }

    /// Replay a JSON script.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Serialization`] if `json` is not an array. Individual
    /// steps that fail are reported in the [`ReplayReport`] instead.
    pub fn replay(&mut self, store: &mut DocumentStore, json: &str) -> StudioResult<ReplayReport> {
        let steps: Vec<Value> = serde_json::from_str(json).map_err(StudioError::Serialization)?;
        let mut report = ReplayReport::default();

        for (index, step) in steps.into_iter().enumerate() {
            match self.step(store, step) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    tracing::warn!(step = index, "{err}");
                    report.refused.push((index, err.to_string()));
                }
            }
        }

        tracing::info!(
            applied = report.applied,
            refused = report.refused.len(),
            "script replayed"
        );
        Ok(report)
    }

    fn step(&mut self, store: &mut DocumentStore, mut step: Value) -> StudioResult<()> {
        let alias = match step.as_object_mut() {
            Some(fields) => {
                let reference = match fields.get("id") {
                    Some(Value::String(id)) => id.strip_prefix('$').map(str::to_owned),
                    _ => None,
                };
                if let Some(name) = reference {
                    let id = self.aliases.get(&name).cloned().ok_or_else(|| {
                        StudioError::InvalidValue(format!("unknown alias: {name}"))
                    })?;
                    fields.insert("id".to_string(), id);
                }
                match fields.remove("as") {
                    Some(Value::String(name)) => Some(name),
                    Some(_) => {
                        return Err(StudioError::InvalidValue(
                            "alias must be a string".to_string(),
                        ))
                    }
                    None => None,
                }
            }
            None => None,
        };

        let command: StudioCommand =
            serde_json::from_value(step).map_err(StudioError::Serialization)?;

        let created = match command {
            StudioCommand::AddText { zone } => Some(store.add_element(zone)?.to_string()),
            StudioCommand::AddGradientStop => Some(store.add_gradient_stop()?.to_string()),
            StudioCommand::AddMeshPoint => Some(store.add_mesh_point()?.to_string()),
            other => {
                store.apply(other)?;
                None
            }
        };

        if let (Some(name), Some(id)) = (alias, created) {
            tracing::debug!(alias = %name, id = %id, "alias recorded");
            self.aliases.insert(name, Value::String(id));
        }
        Ok(())
    }
}
