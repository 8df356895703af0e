//! The single-writer document store.
//!
//! [`DocumentStore`] owns the canonical [`ThumbnailState`]. Every operation builds a
//! candidate copy, validates it, and only then publishes it as the next snapshot, so
//! a refused operation never leaves the document half-mutated. Readers hold
//! [`Snapshot`]s, which are never mutated after publication.

use std::sync::Arc;

use crate::command::{
    BackgroundUpdate, ElementUpdate, GradientUpdate, MeshPointUpdate, StopUpdate, StudioCommand,
    StyleUpdate,
};
use crate::document::MAX_ELEMENTS;
use crate::random::{RandomizePolicy, Rng64};
use crate::{
    BackgroundKind, Color, ElementId, FontConfig, GradientStop, MeshPoint, MeshPointId, StopId,
    StudioError, StudioResult, TextElement, ThumbnailState, Zone,
};

/// An immutable, shareable view of the document at one point in time.
pub type Snapshot = Arc<ThumbnailState>;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 0x5EED_7A11;

/// Minimum number of gradient stops kept for linear and radial gradients.
pub const MIN_GRADIENT_STOPS: usize = 2;

/// Owner of the canonical document.
///
/// # Example
///
/// ```
/// use thumbnail_core::{DocumentStore, Zone};
///
/// let mut store = DocumentStore::new();
/// let id = store.add_element(Zone::TopLeft).unwrap();
/// assert_eq!(store.state().element(id).map(|e| e.priority), Some(0));
/// ```
#[derive(Debug, Clone)]
pub struct DocumentStore {
    state: Snapshot,
    rng: Rng64,
    policy: RandomizePolicy,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    /// Create a store holding the default document.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create a store whose mesh randomizer starts from `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: Arc::new(ThumbnailState::default()),
            rng: Rng64::new(seed),
            policy: RandomizePolicy::default(),
        }
    }

    /// Replace the mesh randomization policy.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidValue`] if the policy could produce invalid points.
    pub fn with_policy(mut self, policy: RandomizePolicy) -> StudioResult<Self> {
        policy.validate()?;
        self.policy = policy;
        Ok(self)
    }

    /// The current document.
    #[must_use]
    pub fn state(&self) -> &ThumbnailState {
        &self.state
    }

    /// A shareable handle to the current document.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.state)
    }

    // -----------------------------------------------------------------------
    // Text elements
    // -----------------------------------------------------------------------

    /// Add a text element with default content and style to `zone`.
    ///
    /// The new element's priority is the number of elements already in that zone.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::CapacityExceeded`] if the document already holds the
    /// maximum number of elements; the document is unchanged.
    pub fn add_element(&mut self, zone: Zone) -> StudioResult<ElementId> {
        let mut id = None;
        self.commit("add_element", |doc| {
            if !doc.has_capacity() {
                return Err(StudioError::CapacityExceeded {
                    limit: MAX_ELEMENTS,
                });
            }
            let priority = u32::try_from(doc.zone_count(zone)).map_err(|_| {
                StudioError::InvariantViolation("zone priority overflow".to_string())
            })?;
            let element = TextElement::new(zone, priority);
            id = Some(element.id);
            doc.elements.push(element);
            Ok(())
        })?;
        id.ok_or_else(|| StudioError::InvariantViolation("element was not created".to_string()))
    }

    /// Remove an element. Unknown IDs are ignored; sibling priorities are untouched.
    pub fn remove_element(&mut self, id: ElementId) -> Snapshot {
        if self.state.element(id).is_none() {
            tracing::debug!("remove_element: {id} not present, nothing to do");
            return self.snapshot();
        }
        let mut draft = (*self.state).clone();
        draft.elements.retain(|e| e.id != id);
        self.publish("remove_element", draft)
    }

    /// Merge content, zone or priority into an element. Style is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::ElementNotFound`] for an unknown ID.
    pub fn update_element(&mut self, id: ElementId, update: &ElementUpdate) -> StudioResult<Snapshot> {
        self.commit("update_element", |doc| {
            let element = doc
                .element_mut(id)
                .ok_or_else(|| StudioError::ElementNotFound(id.to_string()))?;
            update.apply(element);
            Ok(())
        })
    }

    /// Merge style fields into an element's style.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::ElementNotFound`] for an unknown ID, or
    /// [`StudioError::InvalidValue`] if a merged value is out of range.
    pub fn update_style(&mut self, id: ElementId, update: &StyleUpdate) -> StudioResult<Snapshot> {
        self.commit("update_style", |doc| {
            let element = doc
                .element_mut(id)
                .ok_or_else(|| StudioError::ElementNotFound(id.to_string()))?;
            update.apply(&mut element.style);
            Ok(())
        })
    }

    // -----------------------------------------------------------------------
    // Background
    // -----------------------------------------------------------------------

    /// Merge top-level background fields. The gradient changes only when given.
    ///
    /// # Errors
    ///
    /// Returns an error if a replacement gradient breaks a background invariant.
    pub fn update_background(&mut self, update: BackgroundUpdate) -> StudioResult<Snapshot> {
        self.commit("update_background", |doc| {
            let bg = &mut doc.background;
            if let Some(kind) = update.kind {
                bg.kind = kind;
            }
            if let Some(color) = update.solid_color {
                bg.solid_color = color;
            }
            if let Some(gradient) = update.gradient {
                bg.gradient = gradient;
            }
            Ok(())
        })
    }

    /// Merge gradient fields and switch the background to gradient mode.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvariantViolation`] if fewer than two stops would
    /// remain, or [`StudioError::InvalidValue`] for out-of-range stops or points.
    pub fn update_gradient(&mut self, update: GradientUpdate) -> StudioResult<Snapshot> {
        self.commit("update_gradient", |doc| {
            doc.background.kind = BackgroundKind::Gradient;
            update.apply(&mut doc.background.gradient);
            Ok(())
        })
    }

    /// Replace the mesh points with a freshly generated set.
    ///
    /// Like every gradient edit this activates gradient mode.
    pub fn randomize_mesh_points(&mut self) -> Snapshot {
        let points = self.policy.generate(&mut self.rng);
        let mut draft = (*self.state).clone();
        draft.background.kind = BackgroundKind::Gradient;
        draft.background.gradient.mesh_points = points;
        self.publish("randomize_mesh_points", draft)
    }

    /// Append a white stop at 100%.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from [`update_gradient`](Self::update_gradient).
    pub fn add_gradient_stop(&mut self) -> StudioResult<StopId> {
        let stop = GradientStop::new(Color::WHITE, 100.0);
        let id = stop.id;
        let mut stops = self.state.background.gradient.stops.clone();
        stops.push(stop);
        self.update_gradient(GradientUpdate::stops(stops))?;
        Ok(id)
    }

    /// Merge color or position into one stop.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::StopNotFound`] for an unknown ID.
    pub fn update_gradient_stop(&mut self, id: StopId, update: &StopUpdate) -> StudioResult<Snapshot> {
        let mut stops = self.state.background.gradient.stops.clone();
        let stop = stops
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StudioError::StopNotFound(id.to_string()))?;
        if let Some(color) = update.color {
            stop.color = color;
        }
        if let Some(position) = update.position {
            stop.position = position;
        }
        self.update_gradient(GradientUpdate::stops(stops))
    }

    /// Remove one stop.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvariantViolation`] when only two stops remain, or
    /// [`StudioError::StopNotFound`] for an unknown ID.
    pub fn remove_gradient_stop(&mut self, id: StopId) -> StudioResult<Snapshot> {
        let mut stops = self.state.background.gradient.stops.clone();
        let before = stops.len();
        stops.retain(|s| s.id != id);
        if stops.len() == before {
            return Err(StudioError::StopNotFound(id.to_string()));
        }
        self.update_gradient(GradientUpdate::stops(stops))
    }

    /// Append a blue mesh point at the canvas center.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from [`update_gradient`](Self::update_gradient).
    pub fn add_mesh_point(&mut self) -> StudioResult<MeshPointId> {
        let point = MeshPoint::new(50.0, 50.0, Color::rgb(0, 0, 0xff), 150.0);
        let id = point.id;
        let mut points = self.state.background.gradient.mesh_points.clone();
        points.push(point);
        self.update_gradient(GradientUpdate::mesh_points(points))?;
        Ok(id)
    }

    /// Merge position, color or radius into one mesh point.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::MeshPointNotFound`] for an unknown ID, or
    /// [`StudioError::InvalidValue`] for out-of-range values.
    pub fn update_mesh_point(
        &mut self,
        id: MeshPointId,
        update: &MeshPointUpdate,
    ) -> StudioResult<Snapshot> {
        let mut points = self.state.background.gradient.mesh_points.clone();
        let point = points
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StudioError::MeshPointNotFound(id.to_string()))?;
        update.apply(point);
        self.update_gradient(GradientUpdate::mesh_points(points))
    }

    /// Remove one mesh point.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::MeshPointNotFound`] for an unknown ID.
    pub fn remove_mesh_point(&mut self, id: MeshPointId) -> StudioResult<Snapshot> {
        let mut points = self.state.background.gradient.mesh_points.clone();
        let before = points.len();
        points.retain(|p| p.id != id);
        if points.len() == before {
            return Err(StudioError::MeshPointNotFound(id.to_string()));
        }
        self.update_gradient(GradientUpdate::mesh_points(points))
    }

    // -----------------------------------------------------------------------
    // Message dispatch
    // -----------------------------------------------------------------------

    /// Apply one update message and return the next snapshot.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying operation; the document is unchanged.
    pub fn apply(&mut self, command: StudioCommand) -> StudioResult<Snapshot> {
        match command {
            StudioCommand::AddText { zone } => self.add_element(zone).map(|_| self.snapshot()),
            StudioCommand::RemoveText { id } => Ok(self.remove_element(id)),
            StudioCommand::UpdateElement { id, update } => self.update_element(id, &update),
            StudioCommand::UpdateStyle { id, update } => self.update_style(id, &update),
            StudioCommand::UpdateBackground(update) => self.update_background(update),
            StudioCommand::UpdateGradient(update) => self.update_gradient(update),
            StudioCommand::RandomizeMeshPoints => Ok(self.randomize_mesh_points()),
            StudioCommand::AddGradientStop => self.add_gradient_stop().map(|_| self.snapshot()),
            StudioCommand::UpdateGradientStop { id, update } => {
                self.update_gradient_stop(id, &update)
            }
            StudioCommand::RemoveGradientStop { id } => self.remove_gradient_stop(id),
            StudioCommand::AddMeshPoint => self.add_mesh_point().map(|_| self.snapshot()),
            StudioCommand::UpdateMeshPoint { id, update } => self.update_mesh_point(id, &update),
            StudioCommand::RemoveMeshPoint { id } => self.remove_mesh_point(id),
        }
    }

    // -----------------------------------------------------------------------
    // Commit machinery
    // -----------------------------------------------------------------------

    /// Run `f` against a copy of the document, validate, then publish.
    fn commit<F>(&mut self, op: &'static str, f: F) -> StudioResult<Snapshot>
    where
        F: FnOnce(&mut ThumbnailState) -> StudioResult<()>,
    {
        let mut draft = (*self.state).clone();
        if let Err(e) = f(&mut draft).and_then(|()| validate(&draft)) {
            tracing::warn!(op, "refused: {e}");
            return Err(e);
        }
        Ok(self.publish(op, draft))
    }

    fn publish(&mut self, op: &'static str, draft: ThumbnailState) -> Snapshot {
        self.state = Arc::new(draft);
        tracing::debug!(
            op,
            elements = self.state.element_count(),
            background = ?self.state.background.kind,
            "document updated"
        );
        self.snapshot()
    }
}

/// Check every document invariant.
fn validate(doc: &ThumbnailState) -> StudioResult<()> {
    if doc.element_count() > MAX_ELEMENTS {
        return Err(StudioError::CapacityExceeded {
            limit: MAX_ELEMENTS,
        });
    }
    for element in doc.elements() {
        validate_style(&element.style)?;
    }

    let gradient = &doc.background().gradient;
    if gradient.stops.len() < MIN_GRADIENT_STOPS {
        return Err(StudioError::InvariantViolation(format!(
            "a gradient needs at least {MIN_GRADIENT_STOPS} stops"
        )));
    }
    for stop in &gradient.stops {
        ensure_percent("stop position", stop.position)?;
    }
    for point in &gradient.mesh_points {
        ensure_percent("mesh point x", point.x)?;
        ensure_percent("mesh point y", point.y)?;
        if !(point.radius > 0.0 && point.radius.is_finite()) {
            return Err(StudioError::InvalidValue(format!(
                "mesh point radius must be positive, got {}",
                point.radius
            )));
        }
    }
    if !gradient.angle.is_finite() {
        return Err(StudioError::InvalidValue(
            "gradient angle must be finite".to_string(),
        ));
    }
    Ok(())
}

fn validate_style(style: &FontConfig) -> StudioResult<()> {
    if !(style.size > 0.0 && style.size.is_finite()) {
        return Err(StudioError::InvalidValue(format!(
            "font size must be positive, got {}",
            style.size
        )));
    }
    if !(0.0..=1.0).contains(&style.opacity) {
        return Err(StudioError::InvalidValue(format!(
            "opacity must be within 0..=1, got {}",
            style.opacity
        )));
    }
    if !(style.line_height > 0.0 && style.line_height.is_finite()) {
        return Err(StudioError::InvalidValue(format!(
            "line height must be positive, got {}",
            style.line_height
        )));
    }
    if !style.letter_spacing.is_finite() {
        return Err(StudioError::InvalidValue(
            "letter spacing must be finite".to_string(),
        ));
    }
    Ok(())
}

fn ensure_percent(what: &str, value: f32) -> StudioResult<()> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(StudioError::InvalidValue(format!(
            "{what} must be within 0..=100, got {value}"
        )))
    }
}
