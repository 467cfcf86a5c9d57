//! Server-side optimisation of stored project images.

use gigbook_api::ProjectImageApi;
use gigbook_core::AsyncResource;
use tracing::info;

/// Store backing the "optimise images" action.
pub struct ProjectImageStore<A> {
    api: A,
    optimise: AsyncResource<serde_json::Value>,
}

impl<A> std::fmt::Debug for ProjectImageStore<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectImageStore")
            .field("optimising", &self.optimise.is_loading())
            .finish_non_exhaustive()
    }
}

impl<A: ProjectImageApi> ProjectImageStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            optimise: AsyncResource::new(),
        }
    }

    /// Run the optimisation on the server.
    ///
    /// While a run is already in flight this returns the last result
    /// without sending another request.
    pub async fn optimise_images(&self) -> Option<serde_json::Value> {
        if self.optimise.is_loading() {
            info!("Image optimisation already running");
            return self.optimise.data();
        }
        self.optimise
            .run(|| self.api.optimise_project_images())
            .await
    }

    pub fn optimising(&self) -> bool {
        self.optimise.is_loading()
    }

    pub fn optimise_error(&self) -> Option<String> {
        self.optimise.error()
    }
}
