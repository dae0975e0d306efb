use crate::analyzer::filter::{FilterCriteria, FilterOptions};
use crate::error::AppError;
use crate::state::{AppState, DatasetAccess};

/// Distinct values offered by each filter of the sidebar.
pub fn get_filter_options(state: &AppState) -> Result<FilterOptions, AppError> {
    state.with_dataset(|dataset, _| FilterOptions::from_records(&dataset.records))
}

/// Criteria with every available value selected, the page's initial state.
pub fn get_default_criteria(state: &AppState) -> Result<FilterCriteria, AppError> {
    get_filter_options(state).map(|options| FilterCriteria::select_all(&options))
}
