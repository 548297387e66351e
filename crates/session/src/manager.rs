//! The session manager: orchestrates parse, generate, edit, and
//! generate-all against the gateway.
//!
//! Created once at application startup and cloned into request handlers
//! behind an `Arc`. All state mutation happens under the internal lock;
//! the lock is never held across a gateway await, so concurrent
//! operations interleave only at those suspension points.
//!
//! Invariants maintained here:
//! - A dish's `generating`/`editing` flag returns to false whenever the
//!   operation settles, on the success and the failure path alike.
//! - An operation on a dish with a job already in flight is rejected
//!   rather than raced.
//! - The batch loop is strictly sequential: one generation request in
//!   flight at any instant, dishes visited in menu order.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use platelens_core::artifact::ImageArtifact;
use platelens_core::dish::{self, Dish};
use platelens_core::prompt;
use platelens_core::style::ImageStyle;
use platelens_core::types::DishId;
use platelens_gemini::MenuGateway;

use crate::error::SessionError;
use crate::state::{SessionSnapshot, SessionState};

/// Summary of a generate-all run, returned to the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// Dishes that received a fresh artifact this run.
    pub generated: usize,
    /// Dishes skipped because an artifact already existed.
    pub skipped: usize,
    /// Dishes whose generation failed; the batch continued past them.
    pub failed: usize,
}

/// Orchestration context for one browser session.
pub struct SessionManager {
    gateway: Arc<dyn MenuGateway>,
    state: RwLock<SessionState>,
}

impl SessionManager {
    pub fn new(gateway: Arc<dyn MenuGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Read-only snapshot of the current session state.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.read().await.snapshot()
    }

    /// Drop the currently displayed error, if any.
    pub async fn dismiss_error(&self) {
        self.state.write().await.last_error = None;
    }

    /// Parse raw menu text into a fresh dish list.
    ///
    /// The previous dish list, image cache, and job flags are cleared
    /// when the operation begins; on failure the store stays empty, so a
    /// failed parse never leaves a partial dish list behind.
    pub async fn parse_menu(&self, menu_text: &str) -> Result<Vec<Dish>, SessionError> {
        if let Err(e) = dish::validate_menu_text(menu_text) {
            let mut state = self.state.write().await;
            let err = SessionError::Validation(e);
            state.record_error(&err);
            return Err(err);
        }

        {
            let mut state = self.state.write().await;
            state.last_error = None;
            state.clear_entities();
            state.parsing = true;
        }

        let request = prompt::parse_menu_prompt(menu_text);
        let result = self.gateway.parse_menu(&request).await;

        let mut state = self.state.write().await;
        state.parsing = false;
        match result {
            Ok(parsed) => {
                let dishes: Vec<Dish> = parsed.into_iter().map(Dish::from_parsed).collect();
                state.dishes = dishes.clone();
                state.parsed_at = Some(chrono::Utc::now());
                tracing::info!(count = dishes.len(), "Menu parsed");
                Ok(dishes)
            }
            Err(e) => {
                let err = SessionError::Parse(e.to_string());
                state.record_error(&err);
                tracing::warn!(error = %err, "Menu parse failed");
                Err(err)
            }
        }
    }

    /// Generate an image for one dish in the given style.
    ///
    /// A fresh artifact overwrites any cached one for the dish.
    pub async fn generate_image(
        &self,
        id: DishId,
        style: ImageStyle,
    ) -> Result<ImageArtifact, SessionError> {
        self.state.write().await.last_error = None;
        self.run_generate(id, style).await
    }

    /// Apply a free-text edit instruction to a dish's cached image.
    ///
    /// Edits are destructive and sequential: the result overwrites the
    /// cached artifact, and each edit applies to the latest state.
    pub async fn edit_image(
        &self,
        id: DishId,
        instruction: &str,
    ) -> Result<ImageArtifact, SessionError> {
        let (name, encoded) = {
            let mut state = self.state.write().await;
            state.last_error = None;

            let dish = match state.dish(id) {
                Some(d) => d.clone(),
                None => {
                    let err = SessionError::UnknownDish(id);
                    state.record_error(&err);
                    return Err(err);
                }
            };
            let artifact = match state.images.get(&id) {
                Some(a) => a.clone(),
                None => {
                    let err = SessionError::NoBaseImage { dish: dish.name };
                    state.record_error(&err);
                    return Err(err);
                }
            };
            if !state.job_mut(id).idle() {
                let err = SessionError::Busy { dish: dish.name };
                state.record_error(&err);
                return Err(err);
            }
            let encoded = match artifact.encoded_parts() {
                Ok(e) => e,
                Err(e) => {
                    let err = SessionError::Edit {
                        dish: dish.name,
                        reason: e.to_string(),
                    };
                    state.record_error(&err);
                    return Err(err);
                }
            };
            state.job_mut(id).editing = true;
            (dish.name, encoded)
        };

        tracing::debug!(dish = %name, "Requesting image edit");
        let result = self.gateway.edit_image(&encoded, instruction).await;

        let mut state = self.state.write().await;
        if let Some(job) = state.jobs.get_mut(&id) {
            job.editing = false;
        }
        match result {
            Ok(artifact) => {
                if state.dish(id).is_some() {
                    state.images.insert(id, artifact.clone());
                }
                Ok(artifact)
            }
            Err(e) => {
                let err = SessionError::Edit {
                    dish: name,
                    reason: e.to_string(),
                };
                state.record_error(&err);
                tracing::warn!(error = %err, "Image edit failed");
                Err(err)
            }
        }
    }

    /// Generate images for every dish that lacks one, sequentially in
    /// menu order.
    ///
    /// Per-dish failures are recorded as the current error and do not
    /// halt the run. The batch flag clears on every path, including an
    /// empty dish list.
    pub async fn generate_all(&self, style: ImageStyle) -> BatchOutcome {
        let ids: Vec<DishId> = {
            let mut state = self.state.write().await;
            state.last_error = None;
            state.batch_in_progress = true;
            state.dishes.iter().map(|d| d.id).collect()
        };

        let mut outcome = BatchOutcome::default();
        for id in ids {
            // Skip decision is made when the dish is reached, not when
            // the batch starts, so a manually generated image is not
            // regenerated.
            let has_image = self.state.read().await.images.contains_key(&id);
            if has_image {
                outcome.skipped += 1;
                continue;
            }
            match self.run_generate(id, style).await {
                Ok(_) => outcome.generated += 1,
                Err(_) => outcome.failed += 1,
            }
        }

        self.state.write().await.batch_in_progress = false;
        tracing::info!(
            generated = outcome.generated,
            skipped = outcome.skipped,
            failed = outcome.failed,
            "Batch generation finished"
        );
        outcome
    }

    /// Shared generation path for single-dish and batch invocations.
    ///
    /// Does not clear `last_error`: the batch loop must surface the most
    /// recent failure of the whole run, so only entry points clear.
    async fn run_generate(
        &self,
        id: DishId,
        style: ImageStyle,
    ) -> Result<ImageArtifact, SessionError> {
        let (name, request) = {
            let mut state = self.state.write().await;
            let dish = match state.dish(id) {
                Some(d) => d.clone(),
                None => {
                    let err = SessionError::UnknownDish(id);
                    state.record_error(&err);
                    return Err(err);
                }
            };
            if !state.job_mut(id).idle() {
                let err = SessionError::Busy { dish: dish.name };
                state.record_error(&err);
                return Err(err);
            }
            state.job_mut(id).generating = true;
            let request = prompt::generation_prompt(&dish, style);
            (dish.name, request)
        };

        tracing::debug!(dish = %name, "Requesting image generation");
        let result = self.gateway.generate_image(&request).await;

        let mut state = self.state.write().await;
        if let Some(job) = state.jobs.get_mut(&id) {
            job.generating = false;
        }
        match result {
            Ok(artifact) => {
                if state.dish(id).is_some() {
                    state.images.insert(id, artifact.clone());
                }
                Ok(artifact)
            }
            Err(e) => {
                let err = SessionError::Generation {
                    dish: name,
                    reason: e.to_string(),
                };
                state.record_error(&err);
                tracing::warn!(error = %err, "Image generation failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    use platelens_core::artifact::EncodedImage;
    use platelens_core::dish::ParsedDish;
    use platelens_gemini::GatewayError;

    use super::*;

    /// Scripted gateway: results are queued per capability and popped in
    /// call order; every call is counted.
    #[derive(Default)]
    struct MockGateway {
        parse_results: Mutex<VecDeque<Result<Vec<ParsedDish>, GatewayError>>>,
        generate_results: Mutex<VecDeque<Result<ImageArtifact, GatewayError>>>,
        edit_results: Mutex<VecDeque<Result<ImageArtifact, GatewayError>>>,
        generate_prompts: Mutex<Vec<String>>,
        parse_calls: AtomicUsize,
        generate_calls: AtomicUsize,
        edit_calls: AtomicUsize,
    }

    impl MockGateway {
        fn queue_parse(&self, dishes: &[(&str, &str)]) {
            let parsed = dishes
                .iter()
                .map(|(name, description)| ParsedDish {
                    name: name.to_string(),
                    description: description.to_string(),
                })
                .collect();
            self.parse_results.lock().unwrap().push_back(Ok(parsed));
        }

        fn queue_parse_failure(&self) {
            self.parse_results
                .lock()
                .unwrap()
                .push_back(Err(GatewayError::Malformed("scripted failure".to_string())));
        }

        fn queue_generate(&self, tag: &str) {
            self.generate_results
                .lock()
                .unwrap()
                .push_back(Ok(artifact(tag)));
        }

        fn queue_generate_failure(&self) {
            self.generate_results
                .lock()
                .unwrap()
                .push_back(Err(GatewayError::NoImage));
        }

        fn queue_edit(&self, tag: &str) {
            self.edit_results.lock().unwrap().push_back(Ok(artifact(tag)));
        }

        fn queue_edit_failure(&self) {
            self.edit_results
                .lock()
                .unwrap()
                .push_back(Err(GatewayError::NoImage));
        }
    }

    #[async_trait]
    impl MenuGateway for MockGateway {
        async fn parse_menu(&self, _prompt: &str) -> Result<Vec<ParsedDish>, GatewayError> {
            self.parse_calls.fetch_add(1, Ordering::SeqCst);
            self.parse_results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Malformed("unscripted call".to_string())))
        }

        async fn generate_image(&self, prompt: &str) -> Result<ImageArtifact, GatewayError> {
            self.generate_calls.fetch_add(1, Ordering::SeqCst);
            self.generate_prompts.lock().unwrap().push(prompt.to_string());
            self.generate_results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::NoImage))
        }

        async fn edit_image(
            &self,
            _image: &EncodedImage,
            _instruction: &str,
        ) -> Result<ImageArtifact, GatewayError> {
            self.edit_calls.fetch_add(1, Ordering::SeqCst);
            self.edit_results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::NoImage))
        }
    }

    fn artifact(tag: &str) -> ImageArtifact {
        ImageArtifact::from_encoded_parts("image/jpeg", &STANDARD.encode(tag.as_bytes()))
    }

    fn session(gateway: &Arc<MockGateway>) -> SessionManager {
        SessionManager::new(Arc::clone(gateway) as Arc<dyn MenuGateway>)
    }

    /// Parse a menu of the given dishes and return their ids in order.
    async fn parse_dishes(
        gateway: &Arc<MockGateway>,
        manager: &SessionManager,
        names: &[&str],
    ) -> Vec<DishId> {
        let dishes: Vec<(&str, &str)> = names.iter().map(|n| (*n, "test dish")).collect();
        gateway.queue_parse(&dishes);
        let parsed = manager.parse_menu("some menu").await.unwrap();
        parsed.iter().map(|d| d.id).collect()
    }

    // -- parse ----------------------------------------------------------------

    #[tokio::test]
    async fn parse_replaces_dishes_and_clears_cache() {
        let gateway = Arc::new(MockGateway::default());
        let manager = session(&gateway);

        let ids = parse_dishes(&gateway, &manager, &["Pizza", "Salad"]).await;
        gateway.queue_generate("pizza-v1");
        manager.generate_image(ids[0], ImageStyle::BrightModern).await.unwrap();

        let ids = parse_dishes(&gateway, &manager, &["Soup"]).await;
        let snapshot = manager.snapshot().await;
        assert_eq!(snapshot.dishes.len(), 1);
        assert_eq!(snapshot.dishes[0].id, ids[0]);
        assert!(snapshot.images.is_empty());
        assert!(snapshot.jobs.is_empty());
    }

    #[tokio::test]
    async fn parse_failure_leaves_store_empty() {
        let gateway = Arc::new(MockGateway::default());
        let manager = session(&gateway);

        parse_dishes(&gateway, &manager, &["Pizza"]).await;
        gateway.queue_parse_failure();
        let result = manager.parse_menu("another menu").await;

        assert_matches!(result, Err(SessionError::Parse(_)));
        let snapshot = manager.snapshot().await;
        assert!(snapshot.dishes.is_empty());
        assert!(!snapshot.parsing);
        assert!(snapshot.last_error.is_some());
    }

    #[tokio::test]
    async fn parse_rejects_empty_menu_without_gateway_call() {
        let gateway = Arc::new(MockGateway::default());
        let manager = session(&gateway);

        let result = manager.parse_menu("   \n ").await;

        assert_matches!(result, Err(SessionError::Validation(_)));
        assert_eq!(gateway.parse_calls.load(Ordering::SeqCst), 0);
    }

    // -- generate -------------------------------------------------------------

    #[tokio::test]
    async fn generate_caches_artifact_and_resets_flag() {
        let gateway = Arc::new(MockGateway::default());
        let manager = session(&gateway);
        let ids = parse_dishes(&gateway, &manager, &["Pizza"]).await;

        gateway.queue_generate("pizza-v1");
        let result = manager.generate_image(ids[0], ImageStyle::BrightModern).await.unwrap();

        let snapshot = manager.snapshot().await;
        assert_eq!(snapshot.images.len(), 1);
        assert_eq!(snapshot.images[&ids[0]], result.as_data_uri());
        assert!(!snapshot.jobs[&ids[0]].generating);
        assert!(snapshot.last_error.is_none());
    }

    #[tokio::test]
    async fn generate_failure_resets_flag_and_records_error() {
        let gateway = Arc::new(MockGateway::default());
        let manager = session(&gateway);
        let ids = parse_dishes(&gateway, &manager, &["Pizza"]).await;

        gateway.queue_generate_failure();
        let result = manager.generate_image(ids[0], ImageStyle::BrightModern).await;

        assert_matches!(result, Err(SessionError::Generation { .. }));
        let snapshot = manager.snapshot().await;
        assert!(!snapshot.jobs[&ids[0]].generating);
        assert!(snapshot.images.is_empty());
        let message = snapshot.last_error.unwrap();
        assert!(message.contains("Pizza"), "error should name the dish: {message}");
    }

    #[tokio::test]
    async fn generate_unknown_dish_is_rejected_without_gateway_call() {
        let gateway = Arc::new(MockGateway::default());
        let manager = session(&gateway);

        let result = manager
            .generate_image(uuid::Uuid::new_v4(), ImageStyle::BrightModern)
            .await;

        assert_matches!(result, Err(SessionError::UnknownDish(_)));
        assert_eq!(gateway.generate_calls.load(Ordering::SeqCst), 0);
    }

    // -- edit -----------------------------------------------------------------

    #[tokio::test]
    async fn edit_without_base_image_never_contacts_gateway() {
        let gateway = Arc::new(MockGateway::default());
        let manager = session(&gateway);
        let ids = parse_dishes(&gateway, &manager, &["Pizza"]).await;

        let result = manager.edit_image(ids[0], "add basil").await;

        assert_matches!(result, Err(SessionError::NoBaseImage { .. }));
        assert_eq!(gateway.edit_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn edits_are_destructive_and_sequential() {
        let gateway = Arc::new(MockGateway::default());
        let manager = session(&gateway);
        let ids = parse_dishes(&gateway, &manager, &["Pizza"]).await;

        gateway.queue_generate("pizza-v1");
        manager.generate_image(ids[0], ImageStyle::BrightModern).await.unwrap();
        gateway.queue_edit("pizza-v2");
        manager.edit_image(ids[0], "add basil").await.unwrap();
        gateway.queue_edit("pizza-v3");
        let last = manager.edit_image(ids[0], "more cheese").await.unwrap();

        let snapshot = manager.snapshot().await;
        assert_eq!(snapshot.images.len(), 1);
        assert_eq!(snapshot.images[&ids[0]], last.as_data_uri());
        assert_eq!(gateway.edit_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn edit_failure_resets_flag_and_keeps_prior_artifact() {
        let gateway = Arc::new(MockGateway::default());
        let manager = session(&gateway);
        let ids = parse_dishes(&gateway, &manager, &["Pizza"]).await;

        gateway.queue_generate("pizza-v1");
        let original = manager.generate_image(ids[0], ImageStyle::BrightModern).await.unwrap();
        gateway.queue_edit_failure();
        let result = manager.edit_image(ids[0], "add basil").await;

        assert_matches!(result, Err(SessionError::Edit { .. }));
        let snapshot = manager.snapshot().await;
        assert!(!snapshot.jobs[&ids[0]].editing);
        assert_eq!(snapshot.images[&ids[0]], original.as_data_uri());
    }

    // -- per-dish exclusion ---------------------------------------------------

    /// Gateway whose generate call blocks until released, to hold a job
    /// in flight while the test issues a conflicting operation.
    struct BlockingGateway {
        release: tokio::sync::Semaphore,
    }

    #[async_trait]
    impl MenuGateway for BlockingGateway {
        async fn parse_menu(&self, _prompt: &str) -> Result<Vec<ParsedDish>, GatewayError> {
            Ok(vec![ParsedDish {
                name: "Pizza".to_string(),
                description: "test dish".to_string(),
            }])
        }

        async fn generate_image(&self, _prompt: &str) -> Result<ImageArtifact, GatewayError> {
            let _permit = self.release.acquire().await.expect("semaphore closed");
            Ok(artifact("blocked"))
        }

        async fn edit_image(
            &self,
            _image: &EncodedImage,
            _instruction: &str,
        ) -> Result<ImageArtifact, GatewayError> {
            Ok(artifact("edited"))
        }
    }

    #[tokio::test]
    async fn conflicting_operation_on_busy_dish_is_rejected() {
        let gateway = Arc::new(BlockingGateway {
            release: tokio::sync::Semaphore::new(0),
        });
        let manager = Arc::new(SessionManager::new(
            Arc::clone(&gateway) as Arc<dyn MenuGateway>
        ));
        let id = manager.parse_menu("menu").await.unwrap()[0].id;

        let background = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.generate_image(id, ImageStyle::BrightModern).await })
        };
        // Let the background task reach the gateway await.
        while !manager.snapshot().await.jobs.get(&id).copied().unwrap_or_default().generating {
            tokio::task::yield_now().await;
        }

        let conflict = manager.generate_image(id, ImageStyle::RusticDark).await;
        assert_matches!(conflict, Err(SessionError::Busy { .. }));

        gateway.release.add_permits(1);
        background.await.unwrap().unwrap();
        assert!(!manager.snapshot().await.jobs[&id].generating);
    }

    // -- generate all ---------------------------------------------------------

    #[tokio::test]
    async fn batch_skips_cached_dishes_in_order() {
        let gateway = Arc::new(MockGateway::default());
        let manager = session(&gateway);
        let ids = parse_dishes(&gateway, &manager, &["Arancini", "Bruschetta", "Calzone"]).await;

        gateway.queue_generate("bruschetta-v1");
        manager.generate_image(ids[1], ImageStyle::BrightModern).await.unwrap();

        gateway.queue_generate("arancini-v1");
        gateway.queue_generate("calzone-v1");
        let outcome = manager.generate_all(ImageStyle::BrightModern).await;

        assert_eq!(outcome, BatchOutcome { generated: 2, skipped: 1, failed: 0 });
        // One manual call plus exactly two batch calls, A before C.
        assert_eq!(gateway.generate_calls.load(Ordering::SeqCst), 3);
        let prompts = gateway.generate_prompts.lock().unwrap();
        assert!(prompts[1].contains("Arancini"));
        assert!(prompts[2].contains("Calzone"));
        assert!(!manager.snapshot().await.batch_in_progress);
    }

    #[tokio::test]
    async fn batch_failure_does_not_halt_the_run() {
        let gateway = Arc::new(MockGateway::default());
        let manager = session(&gateway);
        let ids = parse_dishes(&gateway, &manager, &["Arancini", "Bruschetta", "Calzone"]).await;

        gateway.queue_generate_failure();
        gateway.queue_generate("bruschetta-v1");
        gateway.queue_generate("calzone-v1");
        let outcome = manager.generate_all(ImageStyle::BrightModern).await;

        assert_eq!(outcome, BatchOutcome { generated: 2, skipped: 0, failed: 1 });
        let snapshot = manager.snapshot().await;
        assert!(snapshot.images.contains_key(&ids[1]));
        assert!(snapshot.images.contains_key(&ids[2]));
        assert!(!snapshot.images.contains_key(&ids[0]));
        // The surfaced error is the most recent failure of the run.
        let message = snapshot.last_error.unwrap();
        assert!(message.contains("Arancini"), "error should name the failed dish: {message}");
    }

    #[tokio::test]
    async fn batch_on_empty_session_clears_flag() {
        let gateway = Arc::new(MockGateway::default());
        let manager = session(&gateway);

        let outcome = manager.generate_all(ImageStyle::BrightModern).await;

        assert_eq!(outcome, BatchOutcome::default());
        assert!(!manager.snapshot().await.batch_in_progress);
    }

    // -- end to end -----------------------------------------------------------

    #[tokio::test]
    async fn margherita_flow_keeps_exactly_one_cached_artifact() {
        let gateway = Arc::new(MockGateway::default());
        let manager = session(&gateway);

        gateway.queue_parse(&[("Margherita Pizza", "tomato, mozzarella, basil")]);
        let dishes = manager
            .parse_menu("Margherita Pizza - tomato, mozzarella, basil")
            .await
            .unwrap();
        assert_eq!(dishes.len(), 1);
        assert_eq!(dishes[0].name, "Margherita Pizza");
        assert_eq!(dishes[0].description, "tomato, mozzarella, basil");

        gateway.queue_generate("margherita-v1");
        let generated = manager
            .generate_image(dishes[0].id, ImageStyle::BrightModern)
            .await
            .unwrap();
        assert_eq!(manager.snapshot().await.images.len(), 1);

        gateway.queue_edit("margherita-v2");
        let edited = manager.edit_image(dishes[0].id, "add a basil leaf").await.unwrap();

        let snapshot = manager.snapshot().await;
        assert_eq!(snapshot.images.len(), 1);
        assert_eq!(snapshot.images[&dishes[0].id], edited.as_data_uri());
        assert_ne!(generated.as_data_uri(), edited.as_data_uri());
    }
}
