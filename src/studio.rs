// studio.rs
use crate::error::StudioError;
use crate::gallery::{Gallery, Poster};
use crate::prompt::{build_base_prompt, with_no_text_suffix, DEFAULT_CONCEPT};
use crate::ratio::{Dimensions, Ratio, Resolution};
use crate::theme::{PreferenceStore, Theme};
use crate::upload::{decode_data_url, to_data_url, validate_upload, FileSource};

use async_trait::async_trait;
use chrono::Local;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

/// The two proxy calls the studio depends on.
#[async_trait]
pub trait PosterApi: Send + Sync {
    async fn refine_prompt(&self, prompt: &str) -> Result<String, StudioError>;

    /// Returns the raw base64 image payload.
    async fn generate_image(&self, prompt: &str, width: u32, height: u32) -> Result<String, StudioError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Generating,
}

/// Everything one generation needs, captured when it starts.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub concept: String,
    pub ratio: Ratio,
    pub dimensions: Dimensions,
    pub base_prompt: String,
    pub refine: bool,
}

#[derive(Debug, Default)]
pub struct StudioState {
    pub uploaded_image: Option<String>,
    pub selected_ratio: Ratio,
    pub resolution: Resolution,
    pub refine_enabled: bool,
    pub concept: String,
    pub theme: Theme,
    pub gallery: Gallery,
    phase: Phase,
    notices: Vec<String>,
}

impl StudioState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!("Notification: {}", message);
        self.notices.push(message);
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// The typed concept, or the placeholder concept when nothing was typed.
    pub fn effective_concept(&self) -> String {
        let typed = self.concept.trim();
        if typed.is_empty() {
            DEFAULT_CONCEPT.trim().to_string()
        } else {
            typed.to_string()
        }
    }

    pub fn select_ratio(&mut self, tag: &str) {
        match tag.parse::<Ratio>() {
            Ok(ratio) => {
                self.selected_ratio = ratio;
                self.notify(format!("Aspect ratio set to {}", ratio));
            }
            Err(e) => self.notify(e),
        }
    }

    /// Idle -> Generating. A second trigger while Generating is refused.
    pub fn begin_generation(&mut self) -> Result<GenerationRequest, StudioError> {
        if self.phase == Phase::Generating {
            return Err(StudioError::Busy);
        }
        if self.uploaded_image.is_none() {
            return Err(StudioError::MissingProductImage);
        }

        let concept = self.effective_concept();
        let ratio = self.selected_ratio;
        let dimensions = ratio.dimensions(self.resolution.long_side());
        let base_prompt = build_base_prompt(&concept, ratio.tag(), dimensions.width, dimensions.height);

        self.phase = Phase::Generating;
        Ok(GenerationRequest {
            concept,
            ratio,
            dimensions,
            base_prompt,
            refine: self.refine_enabled,
        })
    }

    /// Back to Idle whatever the outcome. Returns the new poster's id on success.
    pub fn finish_generation(
        &mut self,
        request: GenerationRequest,
        outcome: Result<String, StudioError>,
    ) -> Option<u64> {
        self.phase = Phase::Idle;
        match outcome {
            Ok(image) => {
                let id = self
                    .gallery
                    .add(image, request.concept, request.ratio, Local::now())
                    .id;
                info!("Poster {} added ({} in gallery)", id, self.gallery.len());
                self.notify("Cinematic poster generated!");
                Some(id)
            }
            Err(e) => {
                error!("Generation failed: {}", e);
                self.notify(e.to_string());
                None
            }
        }
    }

    pub fn delete_poster(&mut self, id: u64) -> Option<Poster> {
        let removed = self.gallery.remove(id);
        match &removed {
            Some(_) => self.notify("Poster deleted"),
            None => self.notify(format!("No poster with id {}", id)),
        }
        removed
    }

    pub fn show_history(&mut self) {
        let count = self.gallery.len();
        self.notify(format!("Viewing {} generated posters", count));
    }
}

/// Passes the base prompt through, or refines it and appends the no-text suffix.
/// A failed refinement is returned as is; there is no fallback to the base prompt.
pub async fn refine_prompt_if_enabled<A>(api: &A, prompt: &str, enabled: bool) -> Result<String, StudioError>
where
    A: PosterApi + ?Sized,
{
    if !enabled {
        return Ok(prompt.to_string());
    }
    let refined = api.refine_prompt(prompt).await?;
    Ok(with_no_text_suffix(&refined))
}

/// Refine (optional) then generate, strictly in that order. Yields a displayable data URL.
pub async fn run_generation<A>(api: &A, request: &GenerationRequest) -> Result<String, StudioError>
where
    A: PosterApi + ?Sized,
{
    let prompt = refine_prompt_if_enabled(api, &request.base_prompt, request.refine).await?;
    let Dimensions { width, height } = request.dimensions;
    let base64 = api.generate_image(&prompt, width, height).await?;
    Ok(format!("data:image/png;base64,{}", base64))
}

/// The gallery client: owns the state and the collaborators its actions need.
pub struct Studio<A, S> {
    api: A,
    store: S,
    pub state: StudioState,
}

impl<A, S> Studio<A, S>
where
    A: PosterApi,
    S: PreferenceStore,
{
    pub fn new(api: A, store: S) -> Self {
        Studio {
            api,
            store,
            state: StudioState::default(),
        }
    }

    /// Applies the saved theme. Only a saved "dark" starts dark.
    pub async fn load_preferences(&mut self) {
        match self.store.load_theme().await {
            Ok(Some(Theme::Dark)) => self.state.theme = Theme::Dark,
            Ok(_) => self.state.theme = Theme::Light,
            Err(e) => warn!("Could not load theme preference: {}", e),
        }
    }

    pub async fn toggle_theme(&mut self) {
        self.state.theme = self.state.theme.toggled();
        if let Err(e) = self.store.save_theme(self.state.theme).await {
            error!("Failed to save theme preference: {}", e);
            self.state.notify("Failed to save theme preference");
        }
    }

    /// Validates and loads a product image. Failures become notifications only.
    pub async fn upload<F>(&mut self, file: &F)
    where
        F: FileSource + ?Sized,
    {
        if let Err(rejection) = validate_upload(file.mime_type(), file.size()) {
            warn!("Upload rejected: {}", rejection);
            self.state.notify(rejection.to_string());
            return;
        }

        match file.read().await {
            Ok(bytes) => {
                self.state.uploaded_image = Some(to_data_url(file.mime_type(), &bytes));
                info!("Product image loaded ({} bytes)", bytes.len());
                self.state.notify("Product image uploaded successfully!");
            }
            Err(e) => {
                error!("Upload read failed: {:?}", e);
                self.state.notify(e.to_string());
            }
        }
    }

    pub async fn generate(&mut self) -> Option<u64> {
        let request = match self.state.begin_generation() {
            Ok(request) => request,
            Err(e) => {
                warn!("Generation not started: {}", e);
                self.state.notify(e.to_string());
                return None;
            }
        };
        info!(
            "Generating {} poster at {} (refine: {})",
            request.ratio, request.dimensions, request.refine
        );

        let outcome = run_generation(&self.api, &request).await;
        self.state.finish_generation(request, outcome)
    }

    /// Writes the poster's image into `dir` as `poster-{id}.png`.
    pub async fn download(&mut self, id: u64, dir: &Path) -> Option<PathBuf> {
        let Some(poster) = self.state.gallery.get(id) else {
            self.state.notify(format!("No poster with id {}", id));
            return None;
        };
        let target = dir.join(poster.file_name());

        let written = match decode_data_url(&poster.image) {
            Ok((_, bytes)) => tokio::fs::write(&target, bytes).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        match written {
            Ok(()) => {
                info!("Poster {} saved to {}", id, target.display());
                self.state.notify("Poster downloaded!");
                Some(target)
            }
            Err(e) => {
                error!("Download of poster {} failed: {}", id, e);
                self.state.notify("Download failed");
                None
            }
        }
    }
}
