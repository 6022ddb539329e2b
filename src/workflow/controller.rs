//! One generic controller drives every diagnostic module.
//!
//! Network-facing operations come in two halves: a synchronous `begin_*`
//! that validates and returns a ticket, and a synchronous `complete_*` that
//! applies the response. Every ticket carries the generation it was issued
//! under; reset and newer requests bump the generation, so a late response
//! can never overwrite newer state. The async `submit` / `upload_report`
//! wrappers run both halves around the service call.

use std::sync::Arc;

use uuid::Uuid;

use super::{Completion, Phase, WorkflowError};
use crate::models::{CanonicalRecord, Modality, ModuleId, PredictionVerdict, RawExtraction};
use crate::pipeline::normalize::{normalize, NormalizeError};
use crate::pipeline::report::{ReportArtifact, ReportSynthesizer};
use crate::pipeline::request::{build_request, PredictionRequest};
use crate::pipeline::schema::{FieldSchema, SchemaRegistry};
use crate::pipeline::service::{PredictionOracle, ReportScraper, ServiceError, Session};
use crate::pipeline::strategy::{module_for, DiagnosticModule};
use crate::pipeline::upload::Upload;
use crate::pipeline::validation::{validate_image, validate_report_upload, ValidationError};
use crate::pipeline::verdict::classify;

/// An issued prediction request.
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    pub generation: u64,
    pub request: PredictionRequest,
}

/// An issued scraper upload.
#[derive(Debug, Clone)]
pub struct UploadTicket {
    pub generation: u64,
    pub path: &'static str,
    pub report: Upload,
}

pub struct Workflow {
    id: Uuid,
    module: Arc<dyn DiagnosticModule>,
    schema: FieldSchema,
    record: CanonicalRecord,
    image: Option<Upload>,
    phase: Phase,
    error: Option<WorkflowError>,
    verdict: Option<PredictionVerdict>,
    artifact: Option<ReportArtifact>,
    generation: u64,
    pending_upload: Option<u64>,
}

impl Workflow {
    pub fn new(module: Arc<dyn DiagnosticModule>, schema: FieldSchema) -> Self {
        let record = CanonicalRecord::empty(&schema);
        Self {
            id: Uuid::new_v4(),
            module,
            schema,
            record,
            image: None,
            phase: Phase::Idle,
            error: None,
            verdict: None,
            artifact: None,
            generation: 0,
            pending_upload: None,
        }
    }

    /// Built-in strategy with its registry schema.
    pub fn for_module(id: ModuleId, registry: &SchemaRegistry) -> Self {
        Self::new(module_for(id), registry.schema(id).clone())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn module(&self) -> &dyn DiagnosticModule {
        self.module.as_ref()
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn record(&self) -> &CanonicalRecord {
        &self.record
    }

    pub fn image(&self) -> Option<&Upload> {
        self.image.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn error(&self) -> Option<&WorkflowError> {
        self.error.as_ref()
    }

    /// User-facing text of the last failure, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(WorkflowError::user_message)
    }

    pub fn verdict(&self) -> Option<&PredictionVerdict> {
        self.verdict.as_ref()
    }

    pub fn artifact(&self) -> Option<&ReportArtifact> {
        self.artifact.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A submission or scrape is in flight.
    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Submitting || self.pending_upload.is_some()
    }

    // ── Form editing ────────────────────────────────────────

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), WorkflowError> {
        self.require_editable("edit the form")?;
        if !self.record.set(name, value) {
            return Err(ValidationError::UnknownField(name.to_string()).into());
        }
        self.phase = Phase::Editing;
        Ok(())
    }

    /// Attach the image for an imaging module. A non-image file is
    /// rejected and any earlier selection stays in place.
    pub fn select_image(&mut self, image: Upload) -> Result<(), WorkflowError> {
        self.require_editable("select an image")?;
        if self.module.modality() != Modality::Image {
            return Err(WorkflowError::InvalidTransition {
                action: "select an image",
                phase: self.phase,
            });
        }
        if let Err(e) = validate_image(Modality::Image, Some(&image)) {
            return Err(self.fail(e.into()));
        }
        tracing::debug!(workflow = %self.id, module = %self.module.id(), bytes = image.len(), "Image selected");
        self.image = Some(image);
        self.phase = Phase::Editing;
        Ok(())
    }

    // ── Submission ──────────────────────────────────────────

    pub fn begin_submit(&mut self) -> Result<SubmitTicket, WorkflowError> {
        if self.is_busy() {
            return Err(WorkflowError::Busy);
        }
        self.require_editable("submit")?;

        let request = match build_request(
            self.module.as_ref(),
            &self.schema,
            &self.record,
            self.image.as_ref(),
        ) {
            Ok(request) => request,
            Err(e) => {
                self.phase = Phase::Editing;
                if let ValidationError::MissingFields(missing) = &e {
                    tracing::debug!(workflow = %self.id, missing = ?missing, "Submission blocked");
                }
                return Err(self.fail(e.into()));
            }
        };

        self.generation += 1;
        self.phase = Phase::Submitting;
        self.error = None;
        tracing::info!(
            workflow = %self.id,
            module = %self.module.id(),
            generation = self.generation,
            "Submission started"
        );
        Ok(SubmitTicket {
            generation: self.generation,
            request,
        })
    }

    /// Apply the oracle's answer for a ticket. Failures return to `Editing`
    /// with the record untouched.
    pub fn complete_submit(
        &mut self,
        generation: u64,
        result: Result<String, ServiceError>,
    ) -> Result<Completion, WorkflowError> {
        if generation != self.generation || self.phase != Phase::Submitting {
            tracing::debug!(
                workflow = %self.id,
                generation,
                current = self.generation,
                "Discarding stale prediction response"
            );
            return Ok(Completion::Stale);
        }

        match result {
            Ok(text) => {
                let verdict = classify(self.module.as_ref(), &text);
                tracing::info!(
                    workflow = %self.id,
                    module = %self.module.id(),
                    generation,
                    negative = verdict.is_negative(),
                    "Prediction shown"
                );
                self.verdict = Some(verdict);
                self.artifact = None;
                self.phase = Phase::ResultShown;
                Ok(Completion::Applied)
            }
            Err(e) => {
                tracing::warn!(workflow = %self.id, module = %self.module.id(), error = %e, "Prediction failed");
                self.verdict = None;
                self.artifact = None;
                self.phase = Phase::Editing;
                Err(self.fail(WorkflowError::PredictionFailed(e)))
            }
        }
    }

    pub async fn submit<O: PredictionOracle>(
        &mut self,
        oracle: &O,
        session: &Session,
    ) -> Result<PredictionVerdict, WorkflowError> {
        let ticket = self.begin_submit()?;
        let result = oracle.predict(&ticket.request, session).await;
        match self.complete_submit(ticket.generation, result)? {
            Completion::Applied => self.verdict.clone().ok_or(WorkflowError::Superseded),
            Completion::Stale => Err(WorkflowError::Superseded),
        }
    }

    // ── Report scraping ─────────────────────────────────────

    pub fn begin_upload(&mut self, report: Upload) -> Result<UploadTicket, WorkflowError> {
        let path = self
            .module
            .scrape_path()
            .ok_or(NormalizeError::UnsupportedModule(self.module.id()))?;
        if self.is_busy() {
            return Err(WorkflowError::Busy);
        }
        self.require_editable("upload a report")?;
        if let Err(e) = validate_report_upload(&report) {
            return Err(self.fail(e.into()));
        }

        self.generation += 1;
        self.pending_upload = Some(self.generation);
        self.error = None;
        tracing::info!(
            workflow = %self.id,
            module = %self.module.id(),
            generation = self.generation,
            bytes = report.len(),
            "Report upload started"
        );
        Ok(UploadTicket {
            generation: self.generation,
            path,
            report,
        })
    }

    /// Apply the scraper's answer. Success replaces every field with the
    /// normalized value; failure leaves the form as it was.
    pub fn complete_upload(
        &mut self,
        generation: u64,
        result: Result<RawExtraction, ServiceError>,
    ) -> Result<Completion, WorkflowError> {
        if self.pending_upload != Some(generation) || generation != self.generation {
            tracing::debug!(
                workflow = %self.id,
                generation,
                current = self.generation,
                "Discarding stale scraper response"
            );
            return Ok(Completion::Stale);
        }
        self.pending_upload = None;

        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(workflow = %self.id, module = %self.module.id(), error = %e, "Report scraping failed");
                return Err(self.fail(WorkflowError::ScrapeFailed(e)));
            }
        };

        let record = normalize(self.module.as_ref(), &self.schema, &raw)?;
        self.record = record;
        self.phase = Phase::Editing;
        Ok(Completion::Applied)
    }

    pub async fn upload_report<S: ReportScraper>(
        &mut self,
        scraper: &S,
        report: Upload,
        session: &Session,
    ) -> Result<&CanonicalRecord, WorkflowError> {
        let ticket = self.begin_upload(report)?;
        let result = scraper.scrape(ticket.path, &ticket.report, session).await;
        match self.complete_upload(ticket.generation, result)? {
            Completion::Applied => Ok(&self.record),
            Completion::Stale => Err(WorkflowError::Superseded),
        }
    }

    // ── Export and reset ────────────────────────────────────

    /// Generate (once) and return the report for the shown result.
    pub async fn export(
        &mut self,
        synthesizer: &ReportSynthesizer,
    ) -> Result<ReportArtifact, WorkflowError> {
        if self.phase != Phase::ResultShown {
            return Err(WorkflowError::InvalidTransition {
                action: "export",
                phase: self.phase,
            });
        }
        if let Some(artifact) = &self.artifact {
            return Ok(artifact.clone());
        }
        let Some(verdict) = self.verdict.clone() else {
            return Err(WorkflowError::InvalidTransition {
                action: "export",
                phase: self.phase,
            });
        };

        self.phase = Phase::Exporting;
        let result = synthesizer
            .synthesize(self.module.as_ref(), &self.record, &verdict)
            .await;
        self.phase = Phase::ResultShown;

        match result {
            Ok(artifact) => {
                self.error = None;
                self.artifact = Some(artifact.clone());
                Ok(artifact)
            }
            Err(e) => {
                tracing::error!(workflow = %self.id, module = %self.module.id(), error = %e, "Export failed");
                Err(self.fail(e.into()))
            }
        }
    }

    /// Back to an empty form. Any in-flight response becomes stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.record.clear();
        self.image = None;
        self.verdict = None;
        self.artifact = None;
        self.error = None;
        self.pending_upload = None;
        self.phase = Phase::Idle;
        tracing::info!(
            workflow = %self.id,
            module = %self.module.id(),
            generation = self.generation,
            "Workflow reset"
        );
    }

    fn require_editable(&self, action: &'static str) -> Result<(), WorkflowError> {
        if self.phase.is_editable() {
            return Ok(());
        }
        match self.phase {
            Phase::Submitting => Err(WorkflowError::Busy),
            phase => Err(WorkflowError::InvalidTransition { action, phase }),
        }
    }

    fn fail(&mut self, error: WorkflowError) -> WorkflowError {
        self.error = Some(error.clone());
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::report::{render_default_template, ReportError, TemplateStore};
    use crate::pipeline::service::{MockOracle, MockScraper};

    const DIABETES_VALUES: [(&str, &str); 8] = [
        ("pregnancies", "2"),
        ("glucose", "120"),
        ("bloodPressure", "70"),
        ("skinThickness", "20"),
        ("insulin", "79"),
        ("bmi", "22.5"),
        ("diabetesPedigreeFunction", "0.35"),
        ("age", "33"),
    ];

    fn workflow(id: ModuleId) -> Workflow {
        Workflow::for_module(id, &SchemaRegistry::builtin().unwrap())
    }

    fn filled_diabetes() -> Workflow {
        let mut wf = workflow(ModuleId::Diabetes);
        for (name, value) in DIABETES_VALUES {
            wf.set_field(name, value).unwrap();
        }
        wf
    }

    fn filled_breast() -> Workflow {
        let mut wf = workflow(ModuleId::Breast);
        wf.set_field("name", "Ada").unwrap();
        wf.set_field("age", "44").unwrap();
        wf.set_field("gender", "F").unwrap();
        wf.select_image(Upload::new("scan.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF]))
            .unwrap();
        wf
    }

    fn lab_report() -> Upload {
        Upload::new("labs.pdf", "application/pdf", b"%PDF-1.4".to_vec())
    }

    fn synthesizer() -> ReportSynthesizer {
        ReportSynthesizer::new(TemplateStore::from_bytes(render_default_template().unwrap()))
    }

    #[tokio::test]
    async fn successful_submit_shows_verdict() {
        let mut wf = filled_diabetes();
        let oracle = MockOracle::new("The person is not diabetic");
        let verdict = wf.submit(&oracle, &Session::anonymous()).await.unwrap();
        assert!(verdict.is_negative());
        assert_eq!(wf.phase(), Phase::ResultShown);
        assert_eq!(oracle.calls(), 1);
        assert!(wf.error().is_none());
    }

    #[tokio::test]
    async fn oracle_failure_returns_to_editing_with_record_intact() {
        let mut wf = filled_diabetes();
        let before = wf.record().clone();
        let oracle = MockOracle::failing(ServiceError::Status {
            status: 500,
            body: "Internal Server Error".into(),
        });
        let err = wf.submit(&oracle, &Session::anonymous()).await.unwrap_err();
        assert!(matches!(err, WorkflowError::PredictionFailed(_)));
        assert_eq!(wf.phase(), Phase::Editing);
        assert_eq!(wf.record(), &before);
        assert_eq!(
            wf.error_message().as_deref(),
            Some("Failed to predict. Please try again.")
        );
        assert!(wf.verdict().is_none());
        assert!(wf.artifact().is_none());

        // Retry without re-entering data.
        let oracle = MockOracle::new("The person is diabetic");
        wf.submit(&oracle, &Session::anonymous()).await.unwrap();
        assert_eq!(wf.phase(), Phase::ResultShown);
    }

    #[tokio::test]
    async fn incomplete_form_never_reaches_oracle() {
        let mut wf = workflow(ModuleId::Diabetes);
        wf.set_field("glucose", "120").unwrap();
        let oracle = MockOracle::new("unused");
        let err = wf.submit(&oracle, &Session::anonymous()).await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Validation(ValidationError::MissingFields(_))
        ));
        assert_eq!(oracle.calls(), 0);
        assert_eq!(wf.phase(), Phase::Editing);
        assert_eq!(wf.generation(), 0);
    }

    #[tokio::test]
    async fn image_module_requires_image() {
        let mut wf = workflow(ModuleId::Lung);
        wf.set_field("name", "Lin").unwrap();
        wf.set_field("age", "58").unwrap();
        wf.set_field("gender", "M").unwrap();
        let oracle = MockOracle::new("unused");
        let err = wf.submit(&oracle, &Session::anonymous()).await.unwrap_err();
        assert_eq!(err, WorkflowError::Validation(ValidationError::MissingImage));
        assert_eq!(err.user_message(), "Please upload an image file.");
        assert_eq!(oracle.calls(), 0);
    }

    #[test]
    fn non_image_selection_rejected() {
        let mut wf = filled_breast();
        let err = wf
            .select_image(Upload::new("scan.pdf", "application/pdf", vec![1]))
            .unwrap_err();
        assert_eq!(err.user_message(), "Please upload a valid image file.");
        assert_eq!(wf.image().map(|i| i.file_name.as_str()), Some("scan.jpg"));
        assert_eq!(wf.error_message().as_deref(), Some("Please upload a valid image file."));
    }

    #[test]
    fn rejected_first_image_leaves_selection_empty() {
        let mut wf = workflow(ModuleId::Lung);
        assert!(wf
            .select_image(Upload::new("notes.txt", "text/plain", vec![1]))
            .is_err());
        assert!(wf.image().is_none());
    }

    #[test]
    fn parameter_modules_take_no_image() {
        let mut wf = workflow(ModuleId::Heart);
        let err = wf
            .select_image(Upload::new("a.png", "image/png", vec![1]))
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn image_submission_sends_multipart() {
        let mut wf = filled_breast();
        let oracle = MockOracle::new("The person is suffering");
        let verdict = wf.submit(&oracle, &Session::anonymous()).await.unwrap();
        assert!(!verdict.is_negative());
        let request = oracle.last_request().unwrap();
        assert_eq!(request.path, "/api/v1/predict/breast-pred");
        assert_eq!(request.field_names(), vec!["name", "age", "gender"]);
    }

    #[test]
    fn stale_prediction_after_reset_is_discarded() {
        let mut wf = filled_diabetes();
        let ticket = wf.begin_submit().unwrap();
        wf.reset();
        let outcome = wf
            .complete_submit(ticket.generation, Ok("The person is diabetic".into()))
            .unwrap();
        assert_eq!(outcome, Completion::Stale);
        assert_eq!(wf.phase(), Phase::Idle);
        assert!(wf.verdict().is_none());
    }

    #[test]
    fn superseded_submission_cannot_overwrite_newer_one() {
        let mut wf = filled_diabetes();
        let first = wf.begin_submit().unwrap();
        wf.reset();
        for (name, value) in DIABETES_VALUES {
            wf.set_field(name, value).unwrap();
        }
        let second = wf.begin_submit().unwrap();
        assert!(second.generation > first.generation);

        assert_eq!(
            wf.complete_submit(first.generation, Ok("old".into())).unwrap(),
            Completion::Stale
        );
        assert_eq!(wf.phase(), Phase::Submitting);
        wf.complete_submit(second.generation, Ok("new".into())).unwrap();
        assert_eq!(wf.verdict().unwrap().text, "new");
    }

    #[test]
    fn duplicate_submission_is_busy() {
        let mut wf = filled_diabetes();
        let _ticket = wf.begin_submit().unwrap();
        assert_eq!(wf.begin_submit().unwrap_err(), WorkflowError::Busy);
        assert_eq!(wf.begin_upload(lab_report()).unwrap_err(), WorkflowError::Busy);
        assert_eq!(wf.set_field("age", "34").unwrap_err(), WorkflowError::Busy);
        assert!(wf.is_busy());
    }

    #[test]
    fn submit_blocked_while_scrape_pending() {
        let mut wf = filled_diabetes();
        let ticket = wf.begin_upload(lab_report()).unwrap();
        assert_eq!(wf.begin_submit().unwrap_err(), WorkflowError::Busy);
        // Manual entry stays available.
        wf.set_field("age", "40").unwrap();
        wf.complete_upload(ticket.generation, Err(ServiceError::Connection("x".into())))
            .unwrap_err();
        assert!(!wf.is_busy());
        assert!(wf.begin_submit().is_ok());
    }

    #[tokio::test]
    async fn scraped_report_fills_form_and_leaves_gaps() {
        let mut wf = workflow(ModuleId::Diabetes);
        let raw: RawExtraction = [("Glucose", "120"), ("BMI", "22.5")].into_iter().collect();
        let scraper = MockScraper::new(raw);
        let record = wf
            .upload_report(&scraper, lab_report(), &Session::anonymous())
            .await
            .unwrap();
        assert_eq!(record.value("glucose"), "120");
        assert_eq!(record.value("bmi"), "22.5");
        assert_eq!(record.filled_count(), 2);
        assert_eq!(wf.phase(), Phase::Editing);

        let oracle = MockOracle::new("unused");
        let err = wf.submit(&oracle, &Session::anonymous()).await.unwrap_err();
        match err {
            WorkflowError::Validation(ValidationError::MissingFields(missing)) => {
                assert_eq!(
                    missing,
                    vec![
                        "pregnancies",
                        "bloodPressure",
                        "skinThickness",
                        "insulin",
                        "diabetesPedigreeFunction",
                        "age",
                    ]
                );
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(oracle.calls(), 0);
    }

    #[tokio::test]
    async fn scrape_replaces_manual_entries() {
        let mut wf = filled_diabetes();
        let raw: RawExtraction = [("Glucose", "99")].into_iter().collect();
        wf.upload_report(&MockScraper::new(raw), lab_report(), &Session::anonymous())
            .await
            .unwrap();
        assert_eq!(wf.record().value("glucose"), "99");
        assert_eq!(wf.record().value("age"), "");
    }

    #[tokio::test]
    async fn heart_scrape_coerces_fasting_blood_sugar() {
        let mut wf = workflow(ModuleId::Heart);
        let raw: RawExtraction = [("Fasting blood sugar > 120 mg/dl", "Yes"), ("Age", "63")]
            .into_iter()
            .collect();
        wf.upload_report(&MockScraper::new(raw), lab_report(), &Session::anonymous())
            .await
            .unwrap();
        assert_eq!(wf.record().value("fastingBloodSugar"), "1");
        assert_eq!(wf.record().value("age"), "63");
    }

    #[tokio::test]
    async fn scrape_failure_keeps_form() {
        let mut wf = filled_diabetes();
        let before = wf.record().clone();
        let scraper = MockScraper::failing(ServiceError::Status {
            status: 422,
            body: "bad pdf".into(),
        });
        let err = wf
            .upload_report(&scraper, lab_report(), &Session::anonymous())
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::ScrapeFailed(_)));
        assert_eq!(wf.record(), &before);
        assert_eq!(
            wf.error_message().as_deref(),
            Some("Failed to process PDF. Please try again.")
        );
    }

    #[test]
    fn stale_scrape_after_reset_is_discarded() {
        let mut wf = workflow(ModuleId::Diabetes);
        let ticket = wf.begin_upload(lab_report()).unwrap();
        wf.reset();
        let raw: RawExtraction = [("Glucose", "120")].into_iter().collect();
        assert_eq!(
            wf.complete_upload(ticket.generation, Ok(raw)).unwrap(),
            Completion::Stale
        );
        assert_eq!(wf.record().filled_count(), 0);
        assert_eq!(wf.phase(), Phase::Idle);
    }

    #[test]
    fn imaging_modules_have_no_upload_path() {
        let mut wf = workflow(ModuleId::Breast);
        assert!(matches!(
            wf.begin_upload(lab_report()),
            Err(WorkflowError::UnsupportedModule(_))
        ));
    }

    #[test]
    fn report_upload_must_be_pdf() {
        let mut wf = workflow(ModuleId::Heart);
        let err = wf
            .begin_upload(Upload::new("labs.png", "image/png", vec![1]))
            .unwrap_err();
        assert_eq!(err.user_message(), "Please upload a valid PDF file.");
        assert!(!wf.is_busy());
    }

    #[test]
    fn unknown_field_rejected() {
        let mut wf = workflow(ModuleId::Diabetes);
        assert_eq!(
            wf.set_field("cholesterol", "200").unwrap_err(),
            WorkflowError::Validation(ValidationError::UnknownField("cholesterol".into()))
        );
        assert_eq!(wf.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn export_caches_artifact() {
        let mut wf = filled_diabetes();
        wf.submit(&MockOracle::new("The person is not diabetic"), &Session::anonymous())
            .await
            .unwrap();
        let synth = synthesizer();
        let first = wf.export(&synth).await.unwrap();
        assert_eq!(first.file_name, "Diabetes_Pred_Result.pdf");
        assert_eq!(wf.phase(), Phase::ResultShown);
        let second = wf.export(&synth).await.unwrap();
        assert!(Arc::ptr_eq(&first.bytes, &second.bytes));
    }

    #[tokio::test]
    async fn export_requires_result() {
        let mut wf = filled_diabetes();
        let err = wf.export(&synthesizer()).await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InvalidTransition { action: "export", phase: Phase::Editing }
        ));
    }

    #[tokio::test]
    async fn export_failure_is_retryable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Report.pdf");
        let synth = ReportSynthesizer::new(TemplateStore::new(&path));

        let mut wf = filled_diabetes();
        wf.submit(&MockOracle::new("The person is diabetic"), &Session::anonymous())
            .await
            .unwrap();
        let err = wf.export(&synth).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Report(ReportError::TemplateUnavailable(_))));
        assert_eq!(
            wf.error_message().as_deref(),
            Some("Failed to generate PDF. Please try again.")
        );
        assert_eq!(wf.phase(), Phase::ResultShown);

        std::fs::write(&path, render_default_template().unwrap()).unwrap();
        let artifact = wf.export(&synth).await.unwrap();
        assert!(!artifact.is_empty());
        assert!(wf.error().is_none());
    }

    #[tokio::test]
    async fn reset_from_result_clears_everything() {
        let mut wf = filled_breast();
        wf.submit(&MockOracle::new("not suffering"), &Session::anonymous())
            .await
            .unwrap();
        wf.export(&synthesizer()).await.unwrap();
        assert!(wf.artifact().is_some());

        wf.reset();
        assert_eq!(wf.phase(), Phase::Idle);
        assert!(wf.verdict().is_none());
        assert!(wf.artifact().is_none());
        assert!(wf.image().is_none());
        assert!(wf.error().is_none());
        assert_eq!(wf.record(), &CanonicalRecord::empty(wf.schema()));
    }

    #[tokio::test]
    async fn result_is_frozen_until_reset() {
        let mut wf = filled_diabetes();
        wf.submit(&MockOracle::new("The person is diabetic"), &Session::anonymous())
            .await
            .unwrap();
        assert!(matches!(
            wf.set_field("age", "50"),
            Err(WorkflowError::InvalidTransition { .. })
        ));
        assert!(matches!(
            wf.begin_submit(),
            Err(WorkflowError::InvalidTransition { .. })
        ));
        assert_eq!(wf.record().value("age"), "33");
    }
}
