use serde_json::Value;
use tracing::debug;

use super::scope::{matches_search, normalize_parent, ListScope};
use crate::api::{ApiClient, ApiRequest, Page, PageMeta};
use crate::error::AdminResult;
use crate::resources::ResourceDef;

/// A fetch issued for one scope generation
#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    request: ApiRequest,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &ApiRequest {
        &self.request
    }

    /// Perform the fetch. The result still has to be handed back to the
    /// controller, which decides whether it is current.
    pub async fn run(self, client: &ApiClient) -> Fetched {
        let result = client.fetch_list(self.request).await;
        Fetched { generation: self.generation, result }
    }
}

#[derive(Debug)]
pub struct Fetched {
    pub generation: u64,
    pub result: AdminResult<Page<Value>>,
}

#[derive(Debug, Clone)]
pub enum FetchPlan {
    /// Nothing to fetch; state already reflects the empty scope
    Skip,
    Fetch(FetchTicket),
}

impl FetchPlan {
    pub fn ticket(&self) -> Option<&FetchTicket> {
        match self {
            FetchPlan::Fetch(t) => Some(t),
            FetchPlan::Skip => None,
        }
    }
}

/// Paginated, scoped view of one collection.
///
/// Every scope change bumps a generation counter; a response is applied only
/// when it carries the current generation, so a slow response for an old
/// parent or page can never overwrite a newer one.
#[derive(Debug)]
pub struct ListController {
    resource: &'static ResourceDef,
    scope: ListScope,
    search: String,
    generation: u64,
    mounted: bool,
    rows: Vec<Value>,
    meta: PageMeta,
    loading: bool,
    error: Option<String>,
}

impl ListController {
    pub fn new(resource: &'static ResourceDef, page_size: u32) -> Self {
        Self {
            resource,
            scope: ListScope::new(page_size),
            search: String::new(),
            generation: 0,
            mounted: true,
            rows: Vec::new(),
            meta: PageMeta::single(1, page_size, 0),
            loading: false,
            error: None,
        }
    }

    pub fn resource(&self) -> &'static ResourceDef {
        self.resource
    }

    pub fn scope(&self) -> &ListScope {
        &self.scope
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn meta(&self) -> &PageMeta {
        &self.meta
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Change the parent. Rows and error are cleared and paging restarts.
    pub fn set_parent(&mut self, parent: Option<String>) -> FetchPlan {
        self.scope.parent = normalize_parent(parent);
        self.scope.page = 1;
        self.rows.clear();
        self.error = None;
        self.plan()
    }

    pub fn set_page(&mut self, page: u32) -> FetchPlan {
        self.scope.page = page.max(1);
        self.plan()
    }

    pub fn set_filter(&mut self, key: &str, value: impl ToString) -> FetchPlan {
        self.scope.filters.retain(|(k, _)| k != key);
        self.scope.filters.push((key.to_string(), value.to_string()));
        self.scope.page = 1;
        self.plan()
    }

    /// Re-fetch the current scope, e.g. after a successful mutation.
    pub fn refresh(&mut self) -> FetchPlan {
        self.plan()
    }

    fn plan(&mut self) -> FetchPlan {
        self.generation += 1;
        match self.resource.list_request(&self.scope) {
            Some(request) if self.mounted => {
                self.loading = true;
                self.error = None;
                FetchPlan::Fetch(FetchTicket { generation: self.generation, request })
            }
            Some(_) => FetchPlan::Skip,
            None => {
                self.rows.clear();
                self.meta = PageMeta::single(1, self.scope.page_size, 0);
                self.loading = false;
                self.error = None;
                FetchPlan::Skip
            }
        }
    }

    /// Apply a finished fetch. Returns `false` when it was stale and dropped.
    pub fn complete(&mut self, fetched: Fetched) -> bool {
        if !self.mounted || fetched.generation != self.generation {
            debug!(
                "discarding stale {} response (generation {}, current {})",
                self.resource.name, fetched.generation, self.generation
            );
            return false;
        }
        self.loading = false;
        match fetched.result {
            Ok(page) => {
                self.rows = page.rows;
                self.meta = page.meta;
                self.error = None;
            }
            Err(e) => {
                self.rows.clear();
                self.error = Some(e.message());
            }
        }
        true
    }

    /// Run a plan to completion against `client`.
    pub async fn execute(&mut self, client: &ApiClient, plan: FetchPlan) -> bool {
        match plan {
            FetchPlan::Skip => false,
            FetchPlan::Fetch(ticket) => {
                let fetched = ticket.run(client).await;
                self.complete(fetched)
            }
        }
    }

    pub async fn reload(&mut self, client: &ApiClient) -> bool {
        let plan = self.refresh();
        self.execute(client, plan).await
    }

    /// The view is gone; anything still in flight is ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.generation += 1;
        self.loading = false;
    }

    /// Client-side filter; never triggers a fetch.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn visible_rows(&self) -> Vec<&Value> {
        self.rows
            .iter()
            .filter(|row| matches_search(row, self.resource.search_keys, &self.search))
            .collect()
    }

    pub fn awaiting_parent(&self) -> bool {
        self.resource.requires_parent() && self.scope.parent.is_none()
    }

    pub fn empty_message(&self) -> String {
        if self.awaiting_parent() {
            if let Some(prompt) = self.resource.empty_prompt {
                return prompt.to_string();
            }
        }
        if !self.search.trim().is_empty() {
            format!("No matching {}", self.resource.name)
        } else {
            format!("No {} found", self.resource.name)
        }
    }

    pub fn pagination_label(&self) -> String {
        self.meta.summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdminError;
    use crate::resources::{DISTRICTS, MANDALS};
    use serde_json::json;

    fn page(rows: Value) -> AdminResult<Page<Value>> {
        Ok(crate::api::normalize_list(Some(rows), 1, 10))
    }

    #[test]
    fn missing_parent_skips_and_prompts() {
        let mut list = ListController::new(&MANDALS, 10);
        assert!(matches!(list.refresh(), FetchPlan::Skip));
        assert!(list.rows().is_empty());
        assert_eq!(list.empty_message(), "Select a district to view mandals");
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut list = ListController::new(&MANDALS, 10);
        let first = list.set_parent(Some("D1".into()));
        let second = list.set_parent(Some("D2".into()));
        let (g1, g2) = (first.ticket().unwrap().generation(), second.ticket().unwrap().generation());

        assert!(list.complete(Fetched { generation: g2, result: page(json!([{ "name": "Two" }])) }));
        assert!(!list.complete(Fetched { generation: g1, result: page(json!([{ "name": "One" }])) }));
        assert_eq!(list.rows()[0]["name"], "Two");
        assert!(!list.is_loading());
    }

    #[test]
    fn parent_change_clears_rows_and_error() {
        let mut list = ListController::new(&DISTRICTS, 10);
        let plan = list.refresh();
        let generation = plan.ticket().unwrap().generation();
        list.complete(Fetched {
            generation,
            result: Err(AdminError::from_response("Request", 500, None)),
        });
        assert_eq!(list.error(), Some("Request failed: 500"));

        let plan = list.set_parent(Some("S1".into()));
        assert!(list.error().is_none());
        assert!(list.is_loading());
        assert_eq!(plan.ticket().unwrap().request().query_value("stateId"), Some("S1"));
    }

    #[test]
    fn unmount_ignores_in_flight() {
        let mut list = ListController::new(&DISTRICTS, 10);
        let generation = list.refresh().ticket().unwrap().generation();
        list.unmount();
        assert!(!list.complete(Fetched { generation, result: page(json!([{}])) }));
        assert!(list.rows().is_empty());
    }

    #[test]
    fn search_filters_without_refetch() {
        let mut list = ListController::new(&DISTRICTS, 10);
        let generation = list.refresh().ticket().unwrap().generation();
        list.complete(Fetched {
            generation,
            result: page(json!([{ "name": "Guntur" }, { "name": "Krishna" }])),
        });
        list.set_search("GUN");
        assert_eq!(list.visible_rows().len(), 1);
        assert_eq!(list.generation(), generation);
        list.set_search("zzz");
        assert_eq!(list.empty_message(), "No matching districts");
    }

    #[test]
    fn page_change_keeps_parent() {
        let mut list = ListController::new(&DISTRICTS, 10);
        list.set_parent(Some("S1".into()));
        let plan = list.set_page(3);
        let request = plan.ticket().unwrap().request();
        assert_eq!(request.query_value("page"), Some("3"));
        assert_eq!(request.query_value("stateId"), Some("S1"));
    }
}
