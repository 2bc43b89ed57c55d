//! Wires settings into a ready orchestrator.

use std::sync::Arc;

use tracing::info;

use songbird_agent::{
    DataEntryWorker, LanguageModel, LlmSummarizer, ModelConfig, OpenRouterClient, Receptionist,
};
use songbird_booking::{BookingApi, HttpBookingApi, MockBookingApi, ToolGateway};
use songbird_core::Settings;
use songbird_memory::{InMemoryStore, SummaryArchive};
use songbird_orchestrator::Orchestrator;

use crate::error::Result;

/// Which booking backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingBackend {
    /// The restaurant's HTTP booking API.
    #[default]
    Http,
    /// The in-process mock service.
    Mock,
}

/// Build the booking client for `backend`.
pub fn booking_api(settings: &Settings, backend: BookingBackend) -> Result<Arc<dyn BookingApi>> {
    let api: Arc<dyn BookingApi> = match backend {
        BookingBackend::Http => Arc::new(HttpBookingApi::new(
            settings.booking_api_url.clone(),
            settings.booking_restaurant.clone(),
            settings.booking_bearer_token.clone(),
        )?),
        BookingBackend::Mock => Arc::new(MockBookingApi::new()),
    };
    Ok(api)
}

/// Build the orchestrator around an existing model and booking client.
///
/// Summaries are archived under the data directory so returning guests
/// are recognised after a restart.
pub fn build_with(
    settings: &Settings,
    model: Arc<dyn LanguageModel>,
    api: Arc<dyn BookingApi>,
) -> Result<Orchestrator> {
    songbird_core::ensure_all_dirs()?;
    let archive = SummaryArchive::new(songbird_core::data_dir())?;
    let memory = Arc::new(InMemoryStore::new().with_archive(archive));

    let receptionist = Receptionist::new(
        model.clone(),
        ModelConfig::receptionist(settings.model.clone()),
        settings.restaurant_name.clone(),
    );
    let data_entry = DataEntryWorker::new(
        model.clone(),
        ModelConfig::data_entry(settings.model.clone()),
        ToolGateway::new(api),
    );
    let summarizer = Arc::new(LlmSummarizer::new(
        model,
        ModelConfig::summarizer(settings.model.clone()),
    ));

    info!(model = %settings.model, restaurant = %settings.restaurant_name, "Orchestrator ready");
    Ok(Orchestrator::new(memory, receptionist, data_entry, summarizer))
}

/// Build the production orchestrator from settings.
pub fn build_orchestrator(settings: &Settings, backend: BookingBackend) -> Result<Orchestrator> {
    let model: Arc<dyn LanguageModel> =
        Arc::new(OpenRouterClient::new(settings.require_api_key()?));
    let api = booking_api(settings, backend)?;
    build_with(settings, model, api)
}
