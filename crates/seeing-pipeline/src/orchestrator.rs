//! Orchestrator — runs the five stages for one uploaded image.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, info_span, Instrument};

use seeing_clients::{
    build_http_client, CaptionService, HttpImageSoundService, HttpLandmarkService,
    HttpStorageService, LandmarkService, SpeechService, StorageService,
};
use seeing_core::{
    compose_description, OrchestratorConfig, PipelineOutput, PipelineState, Result, Service,
    StorageReference, UploadedImage,
};

use crate::cleanup::CleanupGuard;
use crate::stages::{best_effort, mandatory};
use crate::tracker::PipelineRun;

/// The four downstream collaborators.
#[derive(Clone)]
pub struct Collaborators {
    pub storage: Arc<dyn StorageService>,
    pub captioner: Arc<dyn CaptionService>,
    pub landmarks: Arc<dyn LandmarkService>,
    pub speech: Arc<dyn SpeechService>,
}

impl Collaborators {
    /// HTTP collaborators sharing one pooled client.
    pub fn http(config: &OrchestratorConfig) -> Result<Self> {
        let client = build_http_client(&config.timeouts)?;
        let image_sound = Arc::new(HttpImageSoundService::new(
            client.clone(),
            &config.services.image_sound,
        ));

        Ok(Self {
            storage: Arc::new(HttpStorageService::new(client.clone(), &config.services.storage)),
            captioner: image_sound.clone(),
            landmarks: Arc::new(HttpLandmarkService::new(client, &config.services.landmark)),
            speech: image_sound,
        })
    }
}

/// Top-level orchestrator. Holds no per-request state.
pub struct Orchestrator {
    services: Collaborators,
    stage_budget: Duration,
}

impl Orchestrator {
    /// `stage_budget` bounds every collaborator call, cleanup included.
    pub fn new(services: Collaborators, stage_budget: Duration) -> Self {
        Self {
            services,
            stage_budget,
        }
    }

    /// Build an orchestrator talking to the configured HTTP services.
    pub fn from_config(config: &OrchestratorConfig) -> Result<Self> {
        let services = Collaborators::http(config)?;
        Ok(Self::new(services, config.timeouts.total))
    }

    /// Run the full pipeline for `image`.
    ///
    /// Returns the composed text, the landmark (if any), and the audio.
    /// If the upload succeeded the stored object has been deleted (or the
    /// delete attempted) by the time this returns, whatever the outcome.
    pub async fn process(&self, image: UploadedImage) -> Result<PipelineOutput> {
        let request_id = uuid::Uuid::new_v4();
        let span = info_span!("pipeline", %request_id, filename = %image.filename);

        async move {
            info!("Processing image: {} ({} bytes)", image.filename, image.bytes.len());
            let mut run = PipelineRun::new();
            let result = self.run(image, &mut run).await;
            info!(state = %run.current(), "Pipeline finished");
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, image: UploadedImage, run: &mut PipelineRun) -> Result<PipelineOutput> {
        run.advance(PipelineState::Uploading);
        let reference = match mandatory(
            Service::Storage,
            self.stage_budget,
            self.services.storage.upload(&image),
        )
        .await
        {
            Ok(reference) => reference,
            Err(e) => {
                run.advance(PipelineState::Failed);
                return Err(e);
            }
        };
        drop(image);
        info!("Image uploaded successfully. URL: {}", reference.url);

        let guard = CleanupGuard::new(
            self.services.storage.clone(),
            reference.key.clone(),
            self.stage_budget,
        );

        let result = self.describe_and_speak(&reference, run).await;

        run.advance(PipelineState::CleaningUp);
        guard.release().await;

        run.advance(if result.is_ok() {
            PipelineState::Succeeded
        } else {
            PipelineState::Failed
        });
        result
    }

    /// Stages 2–4. Every exit from here still goes through cleanup.
    async fn describe_and_speak(
        &self,
        reference: &StorageReference,
        run: &mut PipelineRun,
    ) -> Result<PipelineOutput> {
        run.advance(PipelineState::Describing);
        let description = mandatory(
            Service::Captioning,
            self.stage_budget,
            self.services.captioner.describe(&reference.url),
        )
        .await?;
        info!("Got image description: {}", description);

        run.advance(PipelineState::DetectingLandmark);
        let landmark_info = best_effort(
            Service::Landmark,
            self.stage_budget,
            self.services.landmarks.detect(&reference.url),
        )
        .await;
        if let Some(info) = &landmark_info {
            info!(
                landmark = %info.landmark,
                city = %info.city,
                score = info.score,
                "Got landmark info"
            );
        }

        let text_description = compose_description(&description, landmark_info.as_ref());

        run.advance(PipelineState::Synthesizing);
        let audio = mandatory(
            Service::Speech,
            self.stage_budget,
            self.services.speech.synthesize(&text_description),
        )
        .await?;
        info!("Got audio data of length: {} bytes", audio.len());

        Ok(PipelineOutput {
            text_description,
            landmark_info,
            audio,
        })
    }
}
