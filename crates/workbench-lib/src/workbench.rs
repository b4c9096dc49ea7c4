//! Workbench state machine
//!
//! [`WorkbenchState::apply`] is a pure transition: it takes an event and
//! returns the next state plus the effects a host must run. [`Workbench`]
//! is the default host; it runs effects inline and feeds their completions
//! back as events.
//!
//! Each model selection bumps a generation counter. Effects capture the
//! generation they were issued under, and completions carrying an older
//! generation are treated as stale.

use crate::api::{HttpModelApi, ModelApi};
use crate::catalog::Catalog;
use crate::config::{ConfigError, StaleMetricsPolicy, WorkbenchConfig};
use crate::metrics::{AlgorithmVariant, TrainingMetricsCache, TrainingResultSet};
use crate::models::{InputValues, Model};
use crate::observability::{StructuredLogger, WorkbenchMetrics};
use crate::prediction::{PredictError, PredictionClient, PredictionResult};
use crate::presenter::{present, present_training, PresentedPrediction, TrainingView};
use crate::sample::generate_sample;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum MetricsView {
    /// Selected without fetching metrics
    Idle,
    Loading { generation: u64 },
    Ready(TrainingResultSet),
}

/// The model currently being explored
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub model: Model,
    pub variant: AlgorithmVariant,
    pub inputs: InputValues,
    pub metrics: MetricsView,
}

impl Selection {
    fn new(model: Model, metrics: MetricsView) -> Self {
        Self {
            model,
            variant: AlgorithmVariant::Best,
            inputs: InputValues::new(),
            metrics,
        }
    }

    /// True when at least one input holds a non-empty value
    pub fn has_inputs(&self) -> bool {
        self.inputs.values().any(|v| match v {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    CatalogLoaded(Catalog),
    ModelSelected(String),
    /// Select a model for input entry only; metrics can follow through
    /// [`Event::MetricsRequested`]
    ModelSelectedWithoutMetrics(String),
    MetricsRequested,
    VariantChosen(AlgorithmVariant),
    InputChanged {
        field: String,
        value: Value,
    },
    SampleRequested,
    SampleGenerated {
        generation: u64,
        inputs: InputValues,
    },
    PredictRequested,
    MetricsLoaded {
        generation: u64,
        model_id: String,
        set: TrainingResultSet,
    },
    PredictCompleted {
        generation: u64,
        result: Result<PredictionResult, PredictError>,
    },
}

/// Work requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadMetrics {
        generation: u64,
        model_id: String,
    },
    GenerateSample {
        generation: u64,
        model: Model,
    },
    SubmitPrediction {
        generation: u64,
        model: Model,
        inputs: InputValues,
    },
}

/// Why an event left the state unchanged
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("a prediction is already in progress")]
    Busy,

    #[error("no model selected")]
    NoSelection,

    #[error("fill in at least one input before predicting")]
    NoInputs,

    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("model has no input named {0}")]
    UnknownField(String),

    #[error("metrics for {model_id} (generation {generation}) arrived after selection {current}")]
    StaleMetrics {
        model_id: String,
        generation: u64,
        current: u64,
    },

    #[error("prediction from generation {generation} arrived after selection {current}")]
    StalePrediction { generation: u64, current: u64 },

    #[error("sample from generation {generation} arrived after selection {current}")]
    StaleSample { generation: u64, current: u64 },
}

/// Result of applying one event
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: WorkbenchState,
    pub effects: Vec<Effect>,
    pub rejected: Option<Rejection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkbenchState {
    catalog: Catalog,
    selection: Option<Selection>,
    generation: u64,
    busy: bool,
    prediction: Option<PredictionResult>,
    last_error: Option<PredictError>,
    stale_policy: StaleMetricsPolicy,
}

impl Default for WorkbenchState {
    fn default() -> Self {
        Self::new(StaleMetricsPolicy::default())
    }
}

impl WorkbenchState {
    pub fn new(stale_policy: StaleMetricsPolicy) -> Self {
        Self {
            catalog: Catalog::default(),
            selection: None,
            generation: 0,
            busy: false,
            prediction: None,
            last_error: None,
            stale_policy,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        self.prediction.as_ref()
    }

    pub fn last_error(&self) -> Option<&PredictError> {
        self.last_error.as_ref()
    }

    /// Display view of the latest prediction for the selected model
    pub fn presented(&self) -> Option<PresentedPrediction> {
        let selection = self.selection.as_ref()?;
        present(self.prediction.as_ref(), &selection.model)
    }

    /// Display view of the chosen variant, once metrics are in
    pub fn training_view(&self) -> Option<TrainingView> {
        let selection = self.selection.as_ref()?;
        match &selection.metrics {
            MetricsView::Ready(set) => {
                Some(present_training(set, selection.variant, &selection.model))
            }
            MetricsView::Idle | MetricsView::Loading { .. } => None,
        }
    }

    /// Compute the state following `event`
    pub fn apply(&self, event: Event) -> Transition {
        let mut next = self.clone();
        let mut effects = Vec::new();
        let rejected = next.step(event, &mut effects).err();
        Transition {
            state: next,
            effects,
            rejected,
        }
    }

    /// Rejections return before anything is touched, except that a stale
    /// prediction still clears the busy flag
    fn step(&mut self, event: Event, effects: &mut Vec<Effect>) -> Result<(), Rejection> {
        match event {
            Event::CatalogLoaded(catalog) => {
                self.catalog = catalog;
                self.selection = None;
                self.prediction = None;
                self.last_error = None;
                self.generation += 1;
            }
            Event::ModelSelected(model_id) => self.select(model_id, true, effects)?,
            Event::ModelSelectedWithoutMetrics(model_id) => {
                self.select(model_id, false, effects)?
            }
            Event::MetricsRequested => {
                let generation = self.generation;
                let selection = self.selection_mut()?;
                selection.metrics = MetricsView::Loading { generation };
                effects.push(Effect::LoadMetrics {
                    generation,
                    model_id: selection.model.id.clone(),
                });
            }
            Event::VariantChosen(variant) => {
                self.selection_mut()?.variant = variant;
            }
            Event::InputChanged { field, value } => {
                let selection = self.selection_mut()?;
                if selection.model.field(&field).is_none() {
                    return Err(Rejection::UnknownField(field));
                }
                selection.inputs.insert(field, value);
            }
            Event::SampleRequested => {
                let generation = self.generation;
                let model = self.selection_mut()?.model.clone();
                effects.push(Effect::GenerateSample { generation, model });
            }
            Event::SampleGenerated { generation, inputs } => {
                if generation != self.generation {
                    return Err(Rejection::StaleSample {
                        generation,
                        current: self.generation,
                    });
                }
                self.selection_mut()?.inputs = inputs;
            }
            Event::PredictRequested => {
                if self.busy {
                    return Err(Rejection::Busy);
                }
                let generation = self.generation;
                let selection = self.selection.as_ref().ok_or(Rejection::NoSelection)?;
                if !selection.has_inputs() {
                    return Err(Rejection::NoInputs);
                }
                effects.push(Effect::SubmitPrediction {
                    generation,
                    model: selection.model.clone(),
                    inputs: selection.inputs.clone(),
                });
                self.busy = true;
                self.prediction = None;
                self.last_error = None;
            }
            Event::MetricsLoaded {
                generation,
                model_id,
                set,
            } => {
                let current = self.generation;
                let policy = self.stale_policy;
                let selection = self.selection_mut()?;
                if generation != current && policy == StaleMetricsPolicy::Discard {
                    return Err(Rejection::StaleMetrics {
                        model_id,
                        generation,
                        current,
                    });
                }
                selection.metrics = MetricsView::Ready(set);
            }
            Event::PredictCompleted { generation, result } => {
                // the request is over even when its result is dropped
                self.busy = false;
                if generation != self.generation {
                    return Err(Rejection::StalePrediction {
                        generation,
                        current: self.generation,
                    });
                }
                match result {
                    Ok(result) => self.prediction = Some(result),
                    Err(e) => {
                        self.prediction = None;
                        self.last_error = Some(e);
                    }
                }
            }
        }
        Ok(())
    }

    fn select(
        &mut self,
        model_id: String,
        load_metrics: bool,
        effects: &mut Vec<Effect>,
    ) -> Result<(), Rejection> {
        let model = self
            .catalog
            .find(&model_id)
            .cloned()
            .ok_or(Rejection::UnknownModel(model_id))?;
        self.generation += 1;
        let metrics = if load_metrics {
            effects.push(Effect::LoadMetrics {
                generation: self.generation,
                model_id: model.id.clone(),
            });
            MetricsView::Loading {
                generation: self.generation,
            }
        } else {
            MetricsView::Idle
        };
        self.selection = Some(Selection::new(model, metrics));
        self.prediction = None;
        self.last_error = None;
        Ok(())
    }

    fn selection_mut(&mut self) -> Result<&mut Selection, Rejection> {
        self.selection.as_mut().ok_or(Rejection::NoSelection)
    }
}

/// Default host for [`WorkbenchState`]
pub struct Workbench {
    state: WorkbenchState,
    api: Arc<dyn ModelApi>,
    metrics_cache: TrainingMetricsCache,
    client: PredictionClient,
    rng: StdRng,
    config: WorkbenchConfig,
    logger: StructuredLogger,
    metrics: WorkbenchMetrics,
}

impl Workbench {
    /// Build a workbench talking HTTP to the configured backend
    pub fn connect(config: WorkbenchConfig) -> Result<Self, ConfigError> {
        let api = Arc::new(HttpModelApi::new(&config)?);
        Ok(Self::new(api, config))
    }

    pub fn new(api: Arc<dyn ModelApi>, config: WorkbenchConfig) -> Self {
        let logger = StructuredLogger::new("workbench");
        let metrics = WorkbenchMetrics::new();
        let timeout = config.request_timeout();
        Self {
            state: WorkbenchState::new(config.stale_metrics),
            metrics_cache: TrainingMetricsCache::new(
                api.clone(),
                timeout,
                logger.clone(),
                metrics.clone(),
            ),
            client: PredictionClient::new(api.clone(), timeout, logger.clone(), metrics.clone()),
            api,
            rng: StdRng::from_os_rng(),
            config,
            logger,
            metrics,
        }
    }

    /// Make sample generation reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn state(&self) -> &WorkbenchState {
        &self.state
    }

    pub fn config(&self) -> &WorkbenchConfig {
        &self.config
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy() || self.client.is_busy()
    }

    /// Fetch the catalog and install it
    pub async fn load_catalog(&mut self) -> &Catalog {
        let catalog = Catalog::load(
            self.api.as_ref(),
            self.config.request_timeout(),
            &self.logger,
            &self.metrics,
        )
        .await;
        // installing a catalog is never rejected
        let _ = self.dispatch(Event::CatalogLoaded(catalog)).await;
        self.state.catalog()
    }

    /// Apply `event` and run every effect it triggers until the queue
    /// drains. Returns the first rejection met along the way.
    pub async fn dispatch(&mut self, event: Event) -> Result<(), Rejection> {
        let mut queue = VecDeque::from([event]);
        let mut first_rejection = None;

        while let Some(event) = queue.pop_front() {
            let action = event_name(&event);
            let transition = self.state.apply(event);
            self.state = transition.state;

            if let Some(rejection) = transition.rejected {
                self.record_rejection(action, &rejection);
                first_rejection.get_or_insert(rejection);
            }
            for effect in transition.effects {
                queue.push_back(self.run_effect(effect).await);
            }
        }

        match first_rejection {
            Some(rejection) => Err(rejection),
            None => Ok(()),
        }
    }

    /// Run one effect and return the event reporting its completion
    pub async fn run_effect(&mut self, effect: Effect) -> Event {
        match effect {
            Effect::LoadMetrics {
                generation,
                model_id,
            } => {
                let set = self.metrics_cache.load(&model_id).await;
                Event::MetricsLoaded {
                    generation,
                    model_id,
                    set,
                }
            }
            Effect::GenerateSample { generation, model } => Event::SampleGenerated {
                generation,
                inputs: generate_sample(&model, &mut self.rng),
            },
            Effect::SubmitPrediction {
                generation,
                model,
                inputs,
            } => {
                let result = self.client.predict(&model, &inputs).await;
                Event::PredictCompleted { generation, result }
            }
        }
    }

    fn record_rejection(&self, action: &str, rejection: &Rejection) {
        match rejection {
            Rejection::StaleMetrics {
                model_id,
                generation,
                current,
            } => {
                self.logger.log_stale_metrics(model_id, *generation, *current);
                self.metrics.inc_stale_metrics_discarded();
            }
            other => self.logger.log_rejected(action, &other.to_string()),
        }
    }
}

fn event_name(event: &Event) -> &'static str {
    match event {
        Event::CatalogLoaded(_) => "catalog_loaded",
        Event::ModelSelected(_) => "model_selected",
        Event::ModelSelectedWithoutMetrics(_) => "model_selected_without_metrics",
        Event::MetricsRequested => "metrics_requested",
        Event::VariantChosen(_) => "variant_chosen",
        Event::InputChanged { .. } => "input_changed",
        Event::SampleRequested => "sample_requested",
        Event::SampleGenerated { .. } => "sample_generated",
        Event::PredictRequested => "predict_requested",
        Event::MetricsLoaded { .. } => "metrics_loaded",
        Event::PredictCompleted { .. } => "predict_completed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ModelDescriptor, PredictionPayload, ProbabilityOutput, TrainingRecord};
    use crate::metrics::reconcile;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CAREER: &str = "career-path-prediction";
    const EMPLOYMENT: &str = "employment-probability-post-graduation";

    fn applied(state: &WorkbenchState, event: Event) -> (WorkbenchState, Vec<Effect>) {
        let transition = state.apply(event);
        assert!(transition.rejected.is_none(), "{:?}", transition.rejected);
        (transition.state, transition.effects)
    }

    fn rejected(state: &WorkbenchState, event: Event) -> Rejection {
        state.apply(event).rejected.expect("event should be rejected")
    }

    fn selected(model_id: &str) -> WorkbenchState {
        applied(&WorkbenchState::default(), Event::ModelSelected(model_id.to_string())).0
    }

    fn probability_result(p: f64) -> PredictionResult {
        PredictionResult::remote(PredictionPayload::Probability(ProbabilityOutput {
            probability: p,
            factors: vec![],
            model_accuracy: None,
            model_confidence: None,
        }))
    }

    #[test]
    fn test_selection_requests_metrics_for_new_generation() {
        let (state, effects) = applied(
            &WorkbenchState::default(),
            Event::ModelSelected(CAREER.to_string()),
        );

        assert_eq!(state.generation(), 1);
        assert_eq!(
            effects,
            vec![Effect::LoadMetrics {
                generation: 1,
                model_id: CAREER.to_string()
            }]
        );
        let selection = state.selection().unwrap();
        assert_eq!(selection.variant, AlgorithmVariant::Best);
        assert_eq!(selection.metrics, MetricsView::Loading { generation: 1 });
        assert!(state.training_view().is_none());
    }

    #[test]
    fn test_unknown_model_rejected_without_change() {
        let state = WorkbenchState::default();
        let transition = state.apply(Event::ModelSelected("nope".to_string()));
        assert_eq!(
            transition.rejected,
            Some(Rejection::UnknownModel("nope".to_string()))
        );
        assert_eq!(transition.state, state);
        assert!(transition.effects.is_empty());
    }

    #[test]
    fn test_stale_metrics_discarded() {
        let first = selected(CAREER);
        let (second, _) = applied(&first, Event::ModelSelected(EMPLOYMENT.to_string()));

        let stale = Event::MetricsLoaded {
            generation: 1,
            model_id: CAREER.to_string(),
            set: reconcile(CAREER, &[]).set,
        };
        assert_eq!(
            rejected(&second, stale),
            Rejection::StaleMetrics {
                model_id: CAREER.to_string(),
                generation: 1,
                current: 2
            }
        );

        let fresh = Event::MetricsLoaded {
            generation: 2,
            model_id: EMPLOYMENT.to_string(),
            set: reconcile(EMPLOYMENT, &[]).set,
        };
        let (ready, _) = applied(&second, fresh);
        let view = ready.training_view().unwrap();
        assert_eq!(view.num_samples, "5,500");
    }

    #[test]
    fn test_apply_latest_policy_keeps_last_writer() {
        let state = WorkbenchState::new(StaleMetricsPolicy::ApplyLatest);
        let (first, _) = applied(&state, Event::ModelSelected(CAREER.to_string()));
        let (second, _) = applied(&first, Event::ModelSelected(EMPLOYMENT.to_string()));

        let set = reconcile(CAREER, &[]).set;
        let (after, _) = applied(
            &second,
            Event::MetricsLoaded {
                generation: 1,
                model_id: CAREER.to_string(),
                set: set.clone(),
            },
        );
        assert_eq!(after.selection().unwrap().metrics, MetricsView::Ready(set));
    }

    #[test]
    fn test_predict_needs_selection_and_inputs() {
        assert_eq!(
            rejected(&WorkbenchState::default(), Event::PredictRequested),
            Rejection::NoSelection
        );

        let state = selected(EMPLOYMENT);
        assert_eq!(rejected(&state, Event::PredictRequested), Rejection::NoInputs);

        let (blank, _) = applied(
            &state,
            Event::InputChanged {
                field: "gpa".to_string(),
                value: json!(""),
            },
        );
        assert_eq!(rejected(&blank, Event::PredictRequested), Rejection::NoInputs);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let state = selected(EMPLOYMENT);
        assert_eq!(
            rejected(
                &state,
                Event::InputChanged {
                    field: "shoe_size".to_string(),
                    value: json!(42)
                }
            ),
            Rejection::UnknownField("shoe_size".to_string())
        );
    }

    #[test]
    fn test_second_predict_rejected_while_busy() {
        let state = selected(EMPLOYMENT);
        let (filled, _) = applied(
            &state,
            Event::InputChanged {
                field: "gpa".to_string(),
                value: json!(3.4),
            },
        );
        let (busy, effects) = applied(&filled, Event::PredictRequested);
        assert!(busy.is_busy());
        assert!(matches!(
            effects.as_slice(),
            [Effect::SubmitPrediction { generation: 1, .. }]
        ));
        assert_eq!(rejected(&busy, Event::PredictRequested), Rejection::Busy);

        let (done, _) = applied(
            &busy,
            Event::PredictCompleted {
                generation: 1,
                result: Ok(probability_result(0.85)),
            },
        );
        assert!(!done.is_busy());
        assert!(done.presented().is_some());
    }

    #[test]
    fn test_failed_prediction_clears_result() {
        let mut state = selected(EMPLOYMENT);
        state.selection.as_mut().unwrap().inputs.insert("gpa".to_string(), json!(3.0));
        state.prediction = Some(probability_result(0.4));

        let (busy, _) = applied(&state, Event::PredictRequested);
        assert!(busy.prediction().is_none());
        let (failed, _) = applied(
            &busy,
            Event::PredictCompleted {
                generation: 1,
                result: Err(PredictError::NoResponse),
            },
        );
        assert!(failed.prediction().is_none());
        assert_eq!(failed.last_error(), Some(&PredictError::NoResponse));
    }

    #[test]
    fn test_stale_prediction_dropped_but_busy_cleared() {
        let mut state = selected(EMPLOYMENT);
        state.selection.as_mut().unwrap().inputs.insert("gpa".to_string(), json!(3.0));
        let (busy, _) = applied(&state, Event::PredictRequested);
        let (moved_on, _) = applied(&busy, Event::ModelSelected(CAREER.to_string()));

        let transition = moved_on.apply(Event::PredictCompleted {
            generation: 1,
            result: Ok(probability_result(0.9)),
        });
        assert_eq!(
            transition.rejected,
            Some(Rejection::StalePrediction {
                generation: 1,
                current: 2
            })
        );
        assert!(!transition.state.is_busy());
        assert!(transition.state.prediction().is_none());
    }

    #[test]
    fn test_sample_request_emits_effect_and_result_replaces_inputs() {
        let state = selected(CAREER);
        let (_, effects) = applied(&state, Event::SampleRequested);
        assert!(matches!(effects.as_slice(), [Effect::GenerateSample { .. }]));

        let inputs: InputValues = [("gpa".to_string(), json!(3.2))].into_iter().collect();
        let (after, _) = applied(
            &state,
            Event::SampleGenerated {
                generation: 1,
                inputs: inputs.clone(),
            },
        );
        assert_eq!(after.selection().unwrap().inputs, inputs);
    }

    #[test]
    fn test_sample_for_previous_selection_is_dropped() {
        let state = selected(CAREER);
        let (_, effects) = applied(&state, Event::SampleRequested);
        let [Effect::GenerateSample { generation, model }] = effects.as_slice() else {
            panic!("expected a sample effect, got {:?}", effects);
        };
        assert_eq!(*generation, 1);

        let career_sample = generate_sample(model, &mut StdRng::seed_from_u64(3));
        let (moved_on, _) = applied(&state, Event::ModelSelected(EMPLOYMENT.to_string()));
        let transition = moved_on.apply(Event::SampleGenerated {
            generation: *generation,
            inputs: career_sample,
        });

        assert_eq!(
            transition.rejected,
            Some(Rejection::StaleSample {
                generation: 1,
                current: 2
            })
        );
        assert!(transition.state.selection().unwrap().inputs.is_empty());
    }

    #[test]
    fn test_selection_without_metrics_defers_fetch() {
        let (state, effects) = applied(
            &WorkbenchState::default(),
            Event::ModelSelectedWithoutMetrics(EMPLOYMENT.to_string()),
        );
        assert!(effects.is_empty());
        assert_eq!(state.generation(), 1);
        assert_eq!(state.selection().unwrap().metrics, MetricsView::Idle);
        assert!(state.training_view().is_none());

        let (loading, effects) = applied(&state, Event::MetricsRequested);
        assert_eq!(
            effects,
            vec![Effect::LoadMetrics {
                generation: 1,
                model_id: EMPLOYMENT.to_string()
            }]
        );
        assert_eq!(
            loading.selection().unwrap().metrics,
            MetricsView::Loading { generation: 1 }
        );
        assert_eq!(
            rejected(&WorkbenchState::default(), Event::MetricsRequested),
            Rejection::NoSelection
        );
    }

    /// Backend that fails everything except predictions, counting calls
    #[derive(Default)]
    struct CountingApi {
        predictions: AtomicUsize,
        metrics_fetches: AtomicUsize,
    }

    #[async_trait]
    impl ModelApi for CountingApi {
        async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ApiError> {
            Err(ApiError::NoResponse("down".to_string()))
        }

        async fn training_results(&self) -> Result<Vec<TrainingRecord>, ApiError> {
            self.metrics_fetches.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::NoResponse("down".to_string()))
        }

        async fn run_prediction(
            &self,
            _endpoint: &str,
            _inputs: &InputValues,
        ) -> Result<PredictionPayload, ApiError> {
            self.predictions.fetch_add(1, Ordering::SeqCst);
            Ok(probability_result(0.72).payload)
        }
    }

    #[tokio::test]
    async fn test_driver_runs_full_flow() {
        let api = Arc::new(CountingApi::default());
        let mut workbench = Workbench::new(api.clone(), WorkbenchConfig::default()).with_seed(7);

        assert_eq!(workbench.load_catalog().await.len(), 2);
        workbench
            .dispatch(Event::ModelSelected(EMPLOYMENT.to_string()))
            .await
            .unwrap();
        let view = workbench.state().training_view().unwrap();
        assert_eq!(view.accuracy, "95.2%");

        workbench.dispatch(Event::SampleRequested).await.unwrap();
        assert!(workbench.state().selection().unwrap().has_inputs());

        workbench.dispatch(Event::PredictRequested).await.unwrap();
        assert!(!workbench.is_busy());
        assert_eq!(api.predictions.load(Ordering::SeqCst), 1);

        let presented = workbench.state().presented().unwrap();
        assert!(presented.from_remote);
        assert_eq!(presented.model_accuracy, 94.8);
    }

    #[tokio::test]
    async fn test_driver_reports_rejection() {
        let api = Arc::new(CountingApi::default());
        let mut workbench = Workbench::new(api.clone(), WorkbenchConfig::default());
        workbench
            .dispatch(Event::ModelSelected(CAREER.to_string()))
            .await
            .unwrap();

        let err = workbench.dispatch(Event::PredictRequested).await.unwrap_err();
        assert_eq!(err, Rejection::NoInputs);
        assert_eq!(api.predictions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_driver_predicts_without_metrics_fetch() {
        let api = Arc::new(CountingApi::default());
        let mut workbench = Workbench::new(api.clone(), WorkbenchConfig::default()).with_seed(11);
        workbench.load_catalog().await;

        workbench
            .dispatch(Event::ModelSelectedWithoutMetrics(EMPLOYMENT.to_string()))
            .await
            .unwrap();
        workbench.dispatch(Event::SampleRequested).await.unwrap();
        workbench.dispatch(Event::PredictRequested).await.unwrap();

        assert_eq!(api.metrics_fetches.load(Ordering::SeqCst), 0);
        assert_eq!(api.predictions.load(Ordering::SeqCst), 1);
        assert!(workbench.state().presented().is_some());
    }
}
