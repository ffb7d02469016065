use crate::data::filter::{filtered_indices, FilterState};
use crate::data::loader::{LoadError, Source};
use crate::data::model::{ColumnId, Dataset};
use crate::data::sort::{sort_indices, toggle_sort, SortDirective};
use crate::data::view::{table_view, TableView};

// ---------------------------------------------------------------------------
// Load lifecycle
// ---------------------------------------------------------------------------

/// Process-wide loading state: `Idle → Loading → {Ready, Failed}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Every mutation replaces filters or sort wholesale and recomputes the
/// visible rows before returning, so readers never see a half-applied change.
#[derive(Debug)]
pub struct AppState {
    /// Loaded dataset (None until a load succeeds).
    dataset: Option<Dataset>,

    /// Per-column filter selections.
    filters: FilterState,

    /// Active sort, if any.
    sort: Option<SortDirective>,

    /// Indices of rows passing the current filters, in display order.
    visible_indices: Vec<usize>,

    load_state: LoadState,

    /// Bumped on every load request; results from older requests are dropped.
    generation: u64,

    /// Last requested source, for reloading.
    source: Option<Source>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            filters: FilterState::default(),
            sort: None,
            visible_indices: Vec::new(),
            load_state: LoadState::Idle,
            generation: 0,
            source: None,
        }
    }
}

impl AppState {
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> Option<&SortDirective> {
        self.sort.as_ref()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    pub fn visible_indices(&self) -> &[usize] {
        &self.visible_indices
    }

    /// Render model for the table, available once a dataset is loaded.
    pub fn view(&self) -> Option<TableView<'_>> {
        self.dataset.as_ref().map(|ds| {
            table_view(ds, &self.visible_indices, &self.filters, self.sort.as_ref())
        })
    }

    // -- loading --

    /// Enter `Loading` for `source` and return the generation the eventual
    /// result must carry.
    pub fn begin_load(&mut self, source: Source) -> u64 {
        self.generation += 1;
        log::info!("Loading {source} (#{})", self.generation);
        self.source = Some(source);
        self.load_state = LoadState::Loading;
        self.generation
    }

    /// Apply the outcome of load `generation`. Returns `false` and leaves the
    /// state untouched when a newer load has been issued since.
    pub fn finish_load(&mut self, generation: u64, result: Result<Dataset, LoadError>) -> bool {
        if generation != self.generation {
            log::debug!(
                "Discarding stale load #{generation} (current #{})",
                self.generation
            );
            return false;
        }
        match result {
            Ok(dataset) => {
                if dataset.is_empty() {
                    log::warn!("Source has no data rows");
                }
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    dataset.len(),
                    dataset.columns
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load: {e:#}");
                self.dataset = None;
                self.visible_indices.clear();
                self.load_state = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    /// Drop interest in any load still in flight.
    pub fn abandon_pending(&mut self) {
        if self.load_state == LoadState::Loading {
            self.generation += 1;
            self.load_state = if self.dataset.is_some() {
                LoadState::Ready
            } else {
                LoadState::Idle
            };
        }
    }

    /// Ingest a newly loaded dataset; filters and sort start empty.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.filters = FilterState::default();
        self.sort = None;
        self.dataset = Some(dataset);
        self.load_state = LoadState::Ready;
        self.refresh();
    }

    // -- user input --

    /// Select `value` for `column`; the empty string clears the column.
    pub fn set_filter(&mut self, column: impl Into<ColumnId>, value: impl Into<String>) {
        self.filters = self.filters.with_filter(column, value);
        self.refresh();
    }

    pub fn clear_filters(&mut self) {
        self.filters = FilterState::default();
        self.refresh();
    }

    /// Header click on `column`: ascending → descending → unsorted.
    pub fn toggle_sort(&mut self, column: &str) {
        self.sort = toggle_sort(self.sort.as_ref(), column);
        self.refresh();
    }

    /// Recompute `visible_indices` from dataset, filters and sort.
    fn refresh(&mut self) {
        let Some(ds) = &self.dataset else {
            self.visible_indices.clear();
            return;
        };
        let mut indices = filtered_indices(&ds.rows, &self.filters);
        sort_indices(&ds.rows, &mut indices, self.sort.as_ref());
        log::debug!(
            "{} of {} rows visible ({} filters, sort {:?})",
            indices.len(),
            ds.len(),
            self.filters.len(),
            self.sort
        );
        self.visible_indices = indices;
    }
}
