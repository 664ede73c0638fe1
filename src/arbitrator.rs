//! Source arbitrator
//!
//! Keeps every registered priority input and resolves which one is visible.
//! Expiry is evaluated only in [`SourceArbitrator::set_current_time`], against a
//! time supplied by the render tick, so the registry itself never waits on a
//! clock.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Instant;

use crate::color::{BLACK, Rgb};
use crate::error::{ConfigurationError, LookupError};
use crate::image::ImageFrame;

/// Priority of the permanent background entry.
///
/// Inputs must use a smaller value.
pub const SENTINEL_PRIORITY: i32 = 255;

const SENTINEL_ORIGIN: &str = "background";

/// Data carried by a priority input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPayload {
    /// One color per LED (a single color fills the strip)
    Colors(Vec<Rgb>),
    /// Captured image, mapped onto the LEDs by the renderer
    Image(ImageFrame),
}

/// Kind of producer behind an input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// The permanent background entry
    Background,
    Color,
    Image,
    Grabber,
    Effect,
    Remote,
}

impl Component {
    /// Component implied by the payload kind
    pub const fn of(payload: &InputPayload) -> Self {
        match payload {
            InputPayload::Colors(_) => Self::Color,
            InputPayload::Image(_) => Self::Image,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Color => "color",
            Self::Image => "image",
            Self::Grabber => "grabber",
            Self::Effect => "effect",
            Self::Remote => "remote",
        }
    }
}

/// One registered input
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityInput {
    pub priority: i32,
    pub payload: Arc<InputPayload>,
    /// `None` keeps the input until it is cleared
    pub expires_at: Option<Instant>,
    pub component: Component,
    /// Who registered the input
    pub origin: String,
}

impl PriorityInput {
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|t| t <= now)
    }
}

/// Registry of active priority inputs.
///
/// The background entry at [`SENTINEL_PRIORITY`] is always registered. The
/// visible input is the lowest priority, unless one has been pinned with
/// [`SourceArbitrator::select_priority`].
///
/// Operations that remove inputs hand the removed entries back, so a shared
/// caller can release large payloads after leaving its critical section.
#[derive(Debug)]
pub struct SourceArbitrator {
    inputs: BTreeMap<i32, PriorityInput>,
    background: PriorityInput,
    current: i32,
    previous: i32,
    /// Pinned priority; `None` while automatic selection is enabled
    selected: Option<i32>,
}

impl SourceArbitrator {
    /// Create a registry whose background is `led_count` black LEDs
    pub fn new(led_count: usize) -> Self {
        Self::with_background(InputPayload::Colors(alloc::vec![BLACK; led_count]))
    }

    pub fn with_background(background: InputPayload) -> Self {
        Self {
            inputs: BTreeMap::new(),
            background: sentinel(Arc::new(background)),
            current: SENTINEL_PRIORITY,
            previous: SENTINEL_PRIORITY,
            selected: None,
        }
    }

    /// Insert or replace the input at `priority`, returning the replaced one
    pub fn set_input(
        &mut self,
        priority: i32,
        payload: InputPayload,
        timeout: Option<Instant>,
    ) -> Result<Option<PriorityInput>, ConfigurationError> {
        let component = Component::of(&payload);
        self.set_shared_input(priority, Arc::new(payload), timeout, component, String::new())
    }

    pub fn set_input_with_origin(
        &mut self,
        priority: i32,
        payload: InputPayload,
        timeout: Option<Instant>,
        origin: impl Into<String>,
    ) -> Result<Option<PriorityInput>, ConfigurationError> {
        let component = Component::of(&payload);
        self.set_shared_input(priority, Arc::new(payload), timeout, component, origin.into())
    }

    /// Insert or replace an input tagged with its producer
    pub fn set_shared_input(
        &mut self,
        priority: i32,
        payload: Arc<InputPayload>,
        timeout: Option<Instant>,
        component: Component,
        origin: String,
    ) -> Result<Option<PriorityInput>, ConfigurationError> {
        if priority >= SENTINEL_PRIORITY {
            return Err(ConfigurationError::ReservedPriority {
                priority,
                limit: SENTINEL_PRIORITY,
            });
        }
        let replaced = self.inputs.insert(
            priority,
            PriorityInput {
                priority,
                payload,
                expires_at: timeout,
                component,
                origin,
            },
        );
        self.update_current();
        Ok(replaced)
    }

    /// Replace what is shown when no input is active, returning the old background
    pub fn set_background(&mut self, payload: InputPayload) -> PriorityInput {
        core::mem::replace(&mut self.background, sentinel(Arc::new(payload)))
    }

    /// Remove the input at `priority`; absent priorities are ignored
    pub fn clear_input(&mut self, priority: i32) -> Option<PriorityInput> {
        let removed = self.inputs.remove(&priority);
        if removed.is_some() {
            self.update_current();
        }
        removed
    }

    /// Remove every input except the background
    pub fn clear_all(&mut self) -> BTreeMap<i32, PriorityInput> {
        let removed = core::mem::take(&mut self.inputs);
        self.update_current();
        removed
    }

    /// Remove every input whose expiry time is at or before `now`
    pub fn set_current_time(&mut self, now: Instant) -> Vec<PriorityInput> {
        let expired: Vec<i32> = self
            .inputs
            .values()
            .filter(|input| input.is_expired(now))
            .map(|input| input.priority)
            .collect();
        if expired.is_empty() {
            return Vec::new();
        }

        let removed = expired
            .iter()
            .filter_map(|priority| self.inputs.remove(priority))
            .collect();
        self.update_current();
        removed
    }

    /// Pin `priority` as the visible input and disable automatic selection.
    ///
    /// Selection returns to automatic once the pinned input goes away.
    pub fn select_priority(&mut self, priority: i32) -> Result<(), LookupError> {
        if !self.has_priority(priority) {
            return Err(LookupError(priority));
        }
        self.selected = Some(priority);
        self.update_current();
        Ok(())
    }

    /// Switch automatic selection on or off; returns whether the state changed.
    ///
    /// Switching it off pins the currently visible priority.
    pub fn set_source_auto_select(&mut self, enabled: bool) -> bool {
        if enabled == self.selected.is_none() {
            return false;
        }
        self.selected = if enabled { None } else { Some(self.current) };
        self.update_current();
        true
    }

    pub fn is_source_auto_select_enabled(&self) -> bool {
        self.selected.is_none()
    }

    /// Pinned priority, if automatic selection is off
    pub fn selected_priority(&self) -> Option<i32> {
        self.selected
    }

    /// Visible priority: the pinned one, else the smallest registered value
    pub fn current_priority(&self) -> i32 {
        self.current
    }

    /// Visible priority before the latest change
    pub fn previous_priority(&self) -> i32 {
        self.previous
    }

    pub fn has_priority(&self, priority: i32) -> bool {
        priority == SENTINEL_PRIORITY || self.inputs.contains_key(&priority)
    }

    /// Registered priorities in ascending order, background included
    pub fn priorities(&self) -> Vec<i32> {
        self.inputs
            .keys()
            .copied()
            .chain(core::iter::once(SENTINEL_PRIORITY))
            .collect()
    }

    pub fn input_info(&self, priority: i32) -> Result<&PriorityInput, LookupError> {
        if priority == SENTINEL_PRIORITY {
            return Ok(&self.background);
        }
        self.inputs.get(&priority).ok_or(LookupError(priority))
    }

    /// Producer kind of the input at `priority`
    pub fn component_of(&self, priority: i32) -> Result<Component, LookupError> {
        self.input_info(priority).map(|input| input.component)
    }

    /// The visible input
    pub fn current_input(&self) -> &PriorityInput {
        if self.current == SENTINEL_PRIORITY {
            return &self.background;
        }
        self.inputs
            .get(&self.current)
            .unwrap_or(&self.background)
    }

    /// Earliest pending expiry time
    pub fn next_expiry(&self) -> Option<Instant> {
        self.inputs.values().filter_map(|input| input.expires_at).min()
    }

    /// Number of registered inputs, background included
    pub fn len(&self) -> usize {
        self.inputs.len() + 1
    }

    /// Always false, the background entry is permanent
    pub fn is_empty(&self) -> bool {
        false
    }

    fn update_current(&mut self) {
        if self.selected.is_some_and(|priority| !self.has_priority(priority)) {
            self.selected = None;
        }
        let visible = self.selected.unwrap_or_else(|| {
            self.inputs
                .keys()
                .next()
                .copied()
                .unwrap_or(SENTINEL_PRIORITY)
        });
        if visible != self.current {
            self.previous = self.current;
            self.current = visible;
        }
    }
}

fn sentinel(payload: Arc<InputPayload>) -> PriorityInput {
    PriorityInput {
        priority: SENTINEL_PRIORITY,
        payload,
        expires_at: None,
        component: Component::Background,
        origin: SENTINEL_ORIGIN.into(),
    }
}

/// [`SourceArbitrator`] shared between producer threads and the render tick.
///
/// Each call holds a critical section only for the registry update itself.
/// Payload allocation happens before it and replaced payloads are released
/// after it.
pub struct SharedArbitrator {
    inner: Mutex<RefCell<SourceArbitrator>>,
}

impl SharedArbitrator {
    pub fn new(led_count: usize) -> Self {
        Self::from_arbitrator(SourceArbitrator::new(led_count))
    }

    pub const fn from_arbitrator(arbitrator: SourceArbitrator) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(arbitrator)),
        }
    }

    /// Run `f` with exclusive access to the registry.
    ///
    /// `f` must not block or perform I/O.
    pub fn with<R>(&self, f: impl FnOnce(&mut SourceArbitrator) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow(cs).borrow_mut()))
    }

    pub fn set_input(
        &self,
        priority: i32,
        payload: InputPayload,
        timeout: Option<Instant>,
    ) -> Result<(), ConfigurationError> {
        let component = Component::of(&payload);
        self.set_component_input(priority, payload, timeout, component, String::new())
    }

    pub fn set_input_with_origin(
        &self,
        priority: i32,
        payload: InputPayload,
        timeout: Option<Instant>,
        origin: impl Into<String>,
    ) -> Result<(), ConfigurationError> {
        let component = Component::of(&payload);
        self.set_component_input(priority, payload, timeout, component, origin)
    }

    pub fn set_component_input(
        &self,
        priority: i32,
        payload: InputPayload,
        timeout: Option<Instant>,
        component: Component,
        origin: impl Into<String>,
    ) -> Result<(), ConfigurationError> {
        let payload = Arc::new(payload);
        let origin = origin.into();
        let replaced =
            self.with(|arb| arb.set_shared_input(priority, payload, timeout, component, origin))?;
        drop(replaced);
        Ok(())
    }

    pub fn set_background(&self, payload: InputPayload) {
        let payload = Arc::new(payload);
        let old = self.with(|arb| core::mem::replace(&mut arb.background, sentinel(payload)));
        drop(old);
    }

    pub fn clear_input(&self, priority: i32) {
        let removed = self.with(|arb| arb.clear_input(priority));
        drop(removed);
    }

    pub fn clear_all(&self) {
        let removed = self.with(SourceArbitrator::clear_all);
        drop(removed);
    }

    pub fn select_priority(&self, priority: i32) -> Result<(), LookupError> {
        self.with(|arb| arb.select_priority(priority))
    }

    pub fn set_source_auto_select(&self, enabled: bool) -> bool {
        self.with(|arb| arb.set_source_auto_select(enabled))
    }

    pub fn is_source_auto_select_enabled(&self) -> bool {
        self.with(|arb| arb.is_source_auto_select_enabled())
    }

    pub fn current_priority(&self) -> i32 {
        self.with(|arb| arb.current_priority())
    }

    pub fn has_priority(&self, priority: i32) -> bool {
        self.with(|arb| arb.has_priority(priority))
    }

    pub fn priorities(&self) -> Vec<i32> {
        self.with(|arb| arb.priorities())
    }

    pub fn component_of(&self, priority: i32) -> Result<Component, LookupError> {
        self.with(|arb| arb.component_of(priority))
    }

    /// Copy of the input at `priority`; the payload itself is shared, not cloned
    pub fn input_info(&self, priority: i32) -> Result<PriorityInput, LookupError> {
        self.with(|arb| arb.input_info(priority).cloned())
    }
}
