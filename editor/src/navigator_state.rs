//! State behind the scene navigator panel
//!
//! The panel keeps the active tag selection, the last filter result and
//! the tag counts it was computed against. It only asks the navigator again
//! when a change notification arrived or one of the listed entities died.

use crate::settings::NavigatorSettings;
use crate::shared_state::{isolate_entity, SharedEditorStateHandle};
use engine::core::entity::World;
use engine::navigator::{
    ActiveSelection, MatchMode, NavigatorLocator, NavigatorResult, SubscriptionId, TrackedEntry,
};
use glam::Vec3;
use std::cell::Cell;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Share of a hint color taken by the name-derived tint
const TINT_STRENGTH: f32 = 0.3;

/// Brightness multiplier for tags that are part of the selection
pub const ACTIVE_TAG_BRIGHTNESS: f32 = 1.0;

/// Brightness multiplier for tags that are not selected
pub const INACTIVE_TAG_BRIGHTNESS: f32 = 0.5;

/// How visible a listed entity is in the scene, used to dim its row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryActivity {
    /// Enabled and reachable
    #[default]
    Active,
    /// Enabled itself but hidden by something it belongs to
    InactiveParent,
    /// Switched off
    Inactive,
}

impl EntryActivity {
    /// Activity of `entity` in `world`
    pub fn of(entity: hecs::Entity, world: &World) -> Self {
        if world.is_enabled(entity) {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    /// Brightness multiplier applied to the row color
    pub fn brightness(self) -> f32 {
        match self {
            Self::Active => 1.0,
            Self::InactiveParent => 0.7,
            Self::Inactive => 0.5,
        }
    }
}

/// Tint derived from the hash of `text`, normalized to `TINT_STRENGTH`
fn seeded_tint(text: &str) -> Vec3 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    let seed = hasher.finish();

    let channels = Vec3::new(
        (seed & 0xff) as f32,
        ((seed >> 8) & 0xff) as f32,
        ((seed >> 16) & 0xff) as f32,
    );
    channels.normalize_or_zero() * TINT_STRENGTH
}

fn compose(tint: Vec3, brightness: f32) -> [f32; 4] {
    let base = (1.0 - TINT_STRENGTH) * brightness;
    [base + tint.x, base + tint.y, base + tint.z, 1.0]
}

/// Muted color for `text`, stable for the same string
pub fn seeded_color(text: &str, brightness: f32) -> [f32; 4] {
    compose(seeded_tint(text), brightness)
}

/// Scene navigator panel state
#[derive(Debug)]
pub struct NavigatorPanelState {
    selection: ActiveSelection,
    filtered: Vec<TrackedEntry<hecs::Entity>>,
    tag_counts: BTreeMap<String, usize>,
    rebuild: Rc<Cell<bool>>,
    tints: HashMap<String, Vec3>,
    subscriptions: Option<(SubscriptionId, SubscriptionId)>,
}

impl Default for NavigatorPanelState {
    fn default() -> Self {
        Self::new(ActiveSelection::default())
    }
}

impl NavigatorPanelState {
    /// Create a panel state with the given selection
    pub fn new(selection: ActiveSelection) -> Self {
        Self {
            selection,
            filtered: Vec::new(),
            tag_counts: BTreeMap::new(),
            rebuild: Rc::new(Cell::new(true)),
            tints: HashMap::new(),
            subscriptions: None,
        }
    }

    /// Create a panel state from persisted settings
    pub fn from_settings(settings: &NavigatorSettings) -> Self {
        let selection = settings.to_selection();
        info!(
            active = selection.tags.len(),
            mode = ?selection.mode,
            "Restored navigator selection"
        );
        Self::new(selection)
    }

    /// Settings capturing the current selection
    pub fn to_settings(&self) -> NavigatorSettings {
        NavigatorSettings::from_selection(&self.selection)
    }

    /// Start listening to `locator` for changes
    pub fn attach(&mut self, locator: &mut NavigatorLocator<hecs::Entity>) {
        self.detach(locator);

        let flag = self.rebuild.clone();
        let collection = locator.subscribe_collection_changed(Rc::new(move || flag.set(true)));
        let flag = self.rebuild.clone();
        let provider = locator.subscribe_provider_changed(Rc::new(move || flag.set(true)));

        self.subscriptions = Some((collection, provider));
        self.rebuild.set(true);
        debug!("Navigator panel attached");
    }

    /// Stop listening to `locator`
    pub fn detach(&mut self, locator: &mut NavigatorLocator<hecs::Entity>) {
        if let Some((collection, provider)) = self.subscriptions.take() {
            locator.unsubscribe_collection_changed(collection);
            locator.unsubscribe_provider_changed(provider);
            debug!("Navigator panel detached");
        }
    }

    /// Whether the next refresh will query the navigator
    pub fn needs_rebuild(&self, world: &World) -> bool {
        self.rebuild.get() || self.filtered.iter().any(|entry| !world.contains(entry.handle))
    }

    /// Flag the cached result as outdated
    pub fn mark_dirty(&self) {
        self.rebuild.set(true);
    }

    /// Recompute the filtered list if anything changed. Returns whether it did.
    pub fn refresh(
        &mut self,
        locator: &NavigatorLocator<hecs::Entity>,
        world: &World,
    ) -> NavigatorResult<bool> {
        if !self.needs_rebuild(world) {
            return Ok(false);
        }

        // Querying may reconcile destroyed entities and notify; counts are
        // read afterwards so that notification is already accounted for.
        self.filtered = locator.query(world, &self.selection)?;
        self.tag_counts = locator.tag_counts()?;
        self.rebuild.set(false);

        debug!(
            tags = self.tag_counts.len(),
            matched = self.filtered.len(),
            "Rebuilt navigator filter"
        );
        Ok(true)
    }

    /// Active selection
    pub fn selection(&self) -> &ActiveSelection {
        &self.selection
    }

    /// Last filter result, ordered by display name
    pub fn filtered(&self) -> &[TrackedEntry<hecs::Entity>] {
        &self.filtered
    }

    /// Tag counts as of the last refresh
    pub fn tag_counts(&self) -> &BTreeMap<String, usize> {
        &self.tag_counts
    }

    /// Tags the panel lists: every counted tag plus active tags that no
    /// longer have holders, which show with a count of zero
    pub fn visible_tags(&self) -> Vec<(String, usize)> {
        let mut tags = self.tag_counts.clone();
        for tag in &self.selection.tags {
            tags.entry(tag.clone()).or_insert(0);
        }
        tags.into_iter().collect()
    }

    /// Flip `tag` in or out of the selection
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        let active = self.selection.toggle(tag);
        debug!(tag = %tag, active, "Toggled navigator tag");
        self.rebuild.set(true);
        active
    }

    /// Deactivate every tag
    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.rebuild.set(true);
        }
    }

    /// Change how active tags combine
    pub fn set_match_mode(&mut self, mode: MatchMode) {
        if self.selection.mode != mode {
            debug!(?mode, "Navigator match mode changed");
            self.selection.mode = mode;
            self.rebuild.set(true);
        }
    }

    /// Change the match mode from a UI index
    pub fn set_match_mode_index(&mut self, index: i32) -> NavigatorResult<()> {
        let mode = MatchMode::from_index(index)?;
        self.set_match_mode(mode);
        Ok(())
    }

    fn tint(&mut self, text: &str) -> Vec3 {
        if let Some(tint) = self.tints.get(text) {
            return *tint;
        }
        let tint = seeded_tint(text);
        self.tints.insert(text.to_string(), tint);
        tint
    }

    /// Color hint for a tag, brighter while it is selected
    pub fn tag_color(&mut self, tag: &str) -> [f32; 4] {
        let brightness = if self.selection.is_active(tag) {
            ACTIVE_TAG_BRIGHTNESS
        } else {
            INACTIVE_TAG_BRIGHTNESS
        };
        compose(self.tint(tag), brightness)
    }

    /// Color hint for a listed entity, dimmed unless it is active
    pub fn entry_color(&mut self, display_name: &str, activity: EntryActivity) -> [f32; 4] {
        compose(self.tint(display_name), activity.brightness())
    }

    /// Focus the editor on `entity`
    ///
    /// Returns false when the entity no longer exists.
    pub fn isolate(
        &self,
        entity: hecs::Entity,
        world: &World,
        shared_state: &SharedEditorStateHandle,
    ) -> bool {
        if !world.contains(entity) {
            warn!(entity = ?entity, "Unable to isolate destroyed entity");
            self.rebuild.set(true);
            return false;
        }
        info!(entity = ?entity, "Isolating entity");
        isolate_entity(shared_state, entity)
    }
}
