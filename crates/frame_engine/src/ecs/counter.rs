//! Live instance accounting
//!
//! Counts entities and components that have been created but not yet
//! drained. Used for the shutdown leak check.

/// Live object and component counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InstanceCounter {
    objects: usize,
    components: usize,
}

impl InstanceCounter {
    /// Both counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities created and not yet drained
    pub fn live_objects(&self) -> usize {
        self.objects
    }

    /// Components created and not yet released
    pub fn live_components(&self) -> usize {
        self.components
    }

    /// Whether nothing is alive
    pub fn is_clear(&self) -> bool {
        self.objects == 0 && self.components == 0
    }

    /// Log both counters at info level
    pub fn report(&self, stage: &str) {
        log::info!(
            "{stage}: {} live objects, {} live components",
            self.objects,
            self.components
        );
    }

    pub(crate) fn add_object(&mut self) {
        self.objects += 1;
    }

    pub(crate) fn remove_object(&mut self) {
        if self.objects == 0 {
            log::warn!("Object counter underflow");
            return;
        }
        self.objects -= 1;
    }

    pub(crate) fn add_component(&mut self) {
        self.components += 1;
    }

    pub(crate) fn remove_component(&mut self) {
        if self.components == 0 {
            log::warn!("Component counter underflow");
            return;
        }
        self.components -= 1;
    }
}
