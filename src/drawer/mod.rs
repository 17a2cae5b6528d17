//! Create/edit protocol: a form draft bound to either nothing (create) or an
//! existing record (edit), validated locally and submitted as one request.
//!
//! A successful submit closes the drawer and the owning list re-fetches its
//! scope; rows are never spliced in locally.

pub mod forms;
pub mod upload;
pub mod validate;

use serde_json::Value;
use tracing::debug;

use crate::api::{ApiClient, Method};
use crate::error::AdminResult;
use crate::list::ListController;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawerMode {
    Create,
    /// Editing the record with this id
    Edit(String),
}

impl DrawerMode {
    pub fn is_create(&self) -> bool {
        matches!(self, DrawerMode::Create)
    }
}

/// One request produced by a form
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// Verb used in templated error messages ("Create failed: 500")
    pub action: &'static str,
    pub method: Method,
    pub path: String,
    pub body: Value,
}

impl Submission {
    pub fn create(path: impl Into<String>, body: Value) -> Self {
        Self { action: "Create", method: Method::Post, path: path.into(), body }
    }

    pub fn update(path: impl Into<String>, body: Value) -> Self {
        Self { action: "Update", method: Method::Put, path: path.into(), body }
    }

    pub async fn send(self, client: &ApiClient) -> AdminResult<Option<Value>> {
        client.mutate(self.action, self.method, &self.path, Some(self.body)).await
    }
}

pub trait Form {
    /// Validate the draft and build its request. Failing here means no
    /// request is issued.
    fn submission(&self, mode: &DrawerMode) -> AdminResult<Submission>;

    /// Field values that can be secrets, scrubbed from error messages
    fn secrets(&self) -> Vec<&str> {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// 2xx; carries the server's response body
    Saved(Option<Value>),
    /// Local validation failed, nothing sent
    Invalid(String),
    /// Server or transport failure; the drawer stays open
    Failed(String),
    /// A submit is already in flight for this drawer
    Busy,
}

impl SubmitOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved(_))
    }
}

#[derive(Debug)]
pub struct Drawer<F> {
    mode: DrawerMode,
    form: F,
    open: bool,
    submitting: bool,
    error: Option<String>,
}

impl<F: Form> Drawer<F> {
    pub fn create(form: F) -> Self {
        Self::new(DrawerMode::Create, form)
    }

    pub fn edit(id: impl Into<String>, form: F) -> Self {
        Self::new(DrawerMode::Edit(id.into()), form)
    }

    pub fn new(mode: DrawerMode, form: F) -> Self {
        Self { mode, form, open: true, submitting: false, error: None }
    }

    pub fn mode(&self) -> &DrawerMode {
        &self.mode
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start a submit. The drawer is marked busy until `finish` is called.
    pub fn begin_submit(&mut self) -> Result<Submission, SubmitOutcome> {
        if self.submitting {
            return Err(SubmitOutcome::Busy);
        }
        self.error = None;
        match self.form.submission(&self.mode) {
            Ok(submission) => {
                self.submitting = true;
                Ok(submission)
            }
            Err(e) => {
                let message = e.message();
                self.error = Some(message.clone());
                Err(SubmitOutcome::Invalid(message))
            }
        }
    }

    pub fn finish(&mut self, result: AdminResult<Option<Value>>) -> SubmitOutcome {
        self.submitting = false;
        match result {
            Ok(body) => {
                self.open = false;
                SubmitOutcome::Saved(body)
            }
            Err(e) => {
                let e = self.form.secrets().into_iter().fold(e, |e, s| e.redacted(s));
                let message = e.message();
                debug!("drawer submit failed: {}", message);
                self.error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    pub async fn submit(&mut self, client: &ApiClient) -> SubmitOutcome {
        match self.begin_submit() {
            Ok(submission) => {
                let result = submission.send(client).await;
                self.finish(result)
            }
            Err(outcome) => outcome,
        }
    }

    /// Submit, and on success re-fetch the owning list's current scope.
    pub async fn submit_then_refresh(&mut self, client: &ApiClient, list: &mut ListController) -> SubmitOutcome {
        let outcome = self.submit(client).await;
        if outcome.is_saved() {
            list.reload(client).await;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::forms::LanguageForm;
    use super::*;
    use crate::error::AdminError;
    use serde_json::json;

    #[test]
    fn second_submit_while_busy_is_refused() {
        let mut drawer = Drawer::create(LanguageForm { name: "English".into(), code: "en".into() });
        let first = drawer.begin_submit().unwrap();
        assert_eq!(first.body, json!({ "name": "English", "code": "en" }));
        assert_eq!(drawer.begin_submit().unwrap_err(), SubmitOutcome::Busy);

        drawer.finish(Err(AdminError::from_response("Create", 500, None)));
        assert!(drawer.is_open());
        assert!(!drawer.is_submitting());
        assert_eq!(drawer.error(), Some("Create failed: 500"));
        assert!(drawer.begin_submit().is_ok());
    }

    #[test]
    fn invalid_form_sends_nothing() {
        let mut drawer = Drawer::create(LanguageForm { name: " ".into(), code: "en".into() });
        assert_eq!(drawer.begin_submit().unwrap_err(), SubmitOutcome::Invalid("Name is required".into()));
        assert!(!drawer.is_submitting());
    }

    #[test]
    fn success_closes() {
        let mut drawer = Drawer::create(LanguageForm { name: "Telugu".into(), code: "te".into() });
        drawer.begin_submit().unwrap();
        assert!(drawer.finish(Ok(None)).is_saved());
        assert!(!drawer.is_open());
    }
}
