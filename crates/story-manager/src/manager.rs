//! Stories manager
//!
//! Owns the index store and the fetch controller for one session and drives
//! them from channel events:
//! - Navigation (select, jump to story, jump to component)
//! - Args update/reset requests, confirmed by the preview's echo
//! - The run loop: initial fetch, then one refetch per batch of events that
//!   contains an invalidation

use crate::config::ManagerConfig;
use crate::controller::{FetchController, FetchState};
use crate::error::ManagerError;
use crate::host::ManagerHost;
use crate::navigation::{resolve_story, NavOutcome, Route};
use crate::source::{HttpIndexSource, IndexSource};
use story_channel::{Channel, Event, Subscription};
use story_index::{Args, LeafEntry};
use story_store::{IndexStore, Selection};

/// Manager-side stories state and protocol for one session
#[derive(Debug)]
pub struct StoriesManager<H> {
    pub(crate) store: IndexStore,
    pub(crate) controller: FetchController,
    pub(crate) channel: Channel,
    pub(crate) host: H,
}

impl<H: ManagerHost> StoriesManager<H> {
    /// Create a manager over an explicit source
    #[must_use]
    pub fn new(store: IndexStore, source: Box<dyn IndexSource>, channel: Channel, host: H) -> Self {
        Self {
            store,
            controller: FetchController::new(source),
            channel,
            host,
        }
    }

    /// Create a manager fetching over HTTP as configured
    ///
    /// # Errors
    /// Returns an error if the config is invalid or the HTTP client cannot
    /// be built.
    pub fn from_config(config: &ManagerConfig, channel: Channel, host: H) -> Result<Self, ManagerError> {
        config.validate()?;
        let source = HttpIndexSource::new(config.index_url.clone(), config.fetch_timeout())?;
        Ok(Self::new(
            IndexStore::new(config.index_config()),
            Box::new(source),
            channel,
            host,
        ))
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    #[inline]
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[inline]
    #[must_use]
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    #[inline]
    #[must_use]
    pub fn fetch_state(&self) -> FetchState {
        self.controller.state()
    }

    #[inline]
    #[must_use]
    pub fn fetch_count(&self) -> u64 {
        self.controller.fetch_count()
    }

    /// Fetch and install the index
    pub async fn fetch_index(&mut self) -> FetchState {
        self.controller.fetch(&mut self.store).await
    }

    /// Process events until the channel closes
    ///
    /// Events queued together are handled as one batch; a batch holding any
    /// number of invalidations triggers exactly one refetch.
    pub async fn run(&mut self, mut subscription: Subscription) {
        tracing::info!("Stories manager started");
        self.fetch_index().await;

        while let Ok(envelope) = subscription.recv().await {
            let mut refetch = self.handle(envelope);
            for envelope in subscription.drain() {
                refetch |= self.handle(envelope);
            }
            if refetch {
                self.fetch_index().await;
            }
        }

        tracing::info!("Channel closed, stories manager stopped");
    }

    /// Select a story the way `selectStory(titleOrId?, name?)` resolves it
    pub fn select_story(&mut self, title_or_id: Option<&str>, name: Option<&str>) -> NavOutcome {
        let Some(tree) = self.store.tree() else {
            return NavOutcome::NotFound;
        };
        let current = self.store.selection().map(|s| s.story_id.as_str());

        let Some(target) = resolve_story(tree, current, title_or_id, name) else {
            tracing::debug!(
                "No story matches title or id {:?} and name {:?}",
                title_or_id,
                name
            );
            return NavOutcome::NotFound;
        };
        let id = target.id().to_string();
        self.navigate_to(&id)
    }

    /// Move `delta` stories through the depth-first leaf order
    pub fn jump_to_story(&mut self, delta: isize) -> NavOutcome {
        let Some((tree, current)) = self.current_position() else {
            return NavOutcome::NotFound;
        };
        match tree.find_leaf_by_offset(current, delta) {
            Some(id) => {
                let id = id.to_string();
                self.navigate_to(&id)
            }
            None => NavOutcome::OutOfRange,
        }
    }

    /// Move to the first story of the component `delta` positions away
    pub fn jump_to_component(&mut self, delta: isize) -> NavOutcome {
        let Some((tree, current)) = self.current_position() else {
            return NavOutcome::NotFound;
        };
        match tree.find_sibling_story_id(current, delta, true) {
            Some(id) => {
                let id = id.to_string();
                self.navigate_to(&id)
            }
            None => NavOutcome::OutOfRange,
        }
    }

    fn current_position(&self) -> Option<(&story_index::IndexTree, &str)> {
        let tree = self.store.tree()?;
        let current = self.store.selection()?.story_id.as_str();
        tree.contains(current).then_some((tree, current))
    }

    pub(crate) fn navigate_to(&mut self, id: &str) -> NavOutcome {
        let Some(route) = self.store.entry(id).and_then(Route::for_entry) else {
            return NavOutcome::NotFound;
        };

        let selection = Selection::new(id, route.view_mode.clone());
        if !self.store.set_selection(selection) {
            tracing::debug!("Selection unchanged: {}", route);
            return NavOutcome::Unchanged;
        }

        tracing::debug!("Navigating to {}", route);
        self.host.navigate(&route);
        NavOutcome::Navigated(route)
    }

    /// Ask the entry's target to merge `updated_args`
    ///
    /// Local args change only when the preview echoes `story-args-updated`.
    pub fn update_story_args(&self, entry: &LeafEntry, updated_args: Args) -> usize {
        self.channel.emit_local(Event::UpdateStoryArgs {
            story_id: entry.id.clone(),
            updated_args,
            target: entry.ref_id.clone(),
        })
    }

    /// Ask the entry's target to reset `arg_names`, or every arg when `None`
    pub fn reset_story_args(&self, entry: &LeafEntry, arg_names: Option<Vec<String>>) -> usize {
        self.channel.emit_local(Event::ResetStoryArgs {
            story_id: entry.id.clone(),
            arg_names,
            target: entry.ref_id.clone(),
        })
    }
}
