//! Energy-record paging over the REST backend.

use ei_client::{ApiClient, ClientError};
use ei_core::{ENERGY_PAGE_SIZE, EnergyPage, EnergyRecord};
use ei_state::{LoaderConfig, PageData, PageRequest, PageSource, WindowedLoader};

/// Loader sized for the energy table.
pub fn energy_loader() -> WindowedLoader<EnergyRecord> {
    WindowedLoader::new(LoaderConfig::with_page_size(ENERGY_PAGE_SIZE))
}

#[derive(Debug, Clone)]
pub struct EnergyService {
    api: ApiClient,
}

impl EnergyService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl PageSource<EnergyRecord> for EnergyService {
    type Error = ClientError;

    fn fetch_page(&self, request: &PageRequest) -> Result<PageData<EnergyRecord>, ClientError> {
        let page = self
            .api
            .energy_page(request.page, request.limit, request.location.as_deref())?;
        Ok(into_page_data(page))
    }
}

pub fn into_page_data(page: EnergyPage) -> PageData<EnergyRecord> {
    PageData {
        records: page.data,
        pagination: page.pagination,
    }
}
