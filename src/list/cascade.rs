use serde_json::Value;

use super::controller::{FetchPlan, ListController};
use super::scope::matches_search;
use crate::api::{ApiClient, ApiRequest};
use crate::error::AdminResult;
use crate::resources::{ResourceDef, ScopePolicy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildPhase {
    Loading,
    Loaded,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeState {
    NoParentSelected,
    /// "All" on a resource whose parent scope is optional
    AllParents(ChildPhase),
    ParentSelected { parent_id: String, phase: ChildPhase },
}

/// A parent picker driving a scoped child list (state → district,
/// district → mandal/constituency, language → category, tenant → reporter).
#[derive(Debug)]
pub struct FilterCascade {
    parents: Vec<Value>,
    parent_keys: &'static [&'static str],
    child: ListController,
}

impl FilterCascade {
    pub fn new(parent: &'static ResourceDef, child: &'static ResourceDef, page_size: u32) -> Self {
        Self {
            parents: Vec::new(),
            parent_keys: parent.search_keys,
            child: ListController::new(child, page_size),
        }
    }

    /// Load the full parent option list.
    pub async fn load_parents(&mut self, client: &ApiClient, request: ApiRequest) -> AdminResult<()> {
        let page = client.fetch_list(request).await?;
        self.parents = page.rows;
        Ok(())
    }

    pub fn set_parents(&mut self, parents: Vec<Value>) {
        self.parents = parents;
    }

    pub fn parents(&self) -> &[Value] {
        &self.parents
    }

    /// Filter the already-loaded parent options; never a server round trip.
    pub fn search_parents(&self, query: &str) -> Vec<&Value> {
        self.parents
            .iter()
            .filter(|p| matches_search(p, self.parent_keys, query))
            .collect()
    }

    /// Select a parent, or `None`/blank for "All".
    pub fn select(&mut self, parent_id: Option<String>) -> FetchPlan {
        self.child.set_parent(parent_id)
    }

    pub fn state(&self) -> CascadeState {
        let phase = || match (self.child.is_loading(), self.child.error()) {
            (true, _) => ChildPhase::Loading,
            (false, Some(e)) => ChildPhase::Error(e.to_string()),
            (false, None) => ChildPhase::Loaded,
        };
        match (&self.child.scope().parent, self.child.resource().scope) {
            (Some(id), _) => CascadeState::ParentSelected { parent_id: id.clone(), phase: phase() },
            (None, ScopePolicy::Optional(_)) => CascadeState::AllParents(phase()),
            (None, _) => CascadeState::NoParentSelected,
        }
    }

    pub fn child(&self) -> &ListController {
        &self.child
    }

    pub fn child_mut(&mut self) -> &mut ListController {
        &mut self.child
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::Fetched;
    use crate::resources::{DISTRICTS, MANDALS, STATES};
    use serde_json::json;

    #[test]
    fn selecting_all_returns_to_no_parent() {
        let mut cascade = FilterCascade::new(&DISTRICTS, &MANDALS, 10);
        assert_eq!(cascade.state(), CascadeState::NoParentSelected);

        let plan = cascade.select(Some("D1".into()));
        assert!(plan.ticket().is_some());
        assert_eq!(
            cascade.state(),
            CascadeState::ParentSelected { parent_id: "D1".into(), phase: ChildPhase::Loading }
        );

        assert!(matches!(cascade.select(Some(String::new())), FetchPlan::Skip));
        assert_eq!(cascade.state(), CascadeState::NoParentSelected);
        assert!(cascade.child().rows().is_empty());
    }

    #[test]
    fn district_all_states_mode_fetches() {
        let mut cascade = FilterCascade::new(&STATES, &DISTRICTS, 10);
        let plan = cascade.select(None);
        let generation = plan.ticket().unwrap().generation();
        cascade.child_mut().complete(Fetched {
            generation,
            result: Ok(crate::api::normalize_list(Some(json!([{ "name": "X" }])), 1, 10)),
        });
        assert_eq!(cascade.state(), CascadeState::AllParents(ChildPhase::Loaded));
    }

    #[test]
    fn parent_search_is_local() {
        let mut cascade = FilterCascade::new(&DISTRICTS, &MANDALS, 10);
        cascade.set_parents(vec![json!({ "id": "1", "name": "Guntur" }), json!({ "id": "2", "name": "Nellore" })]);
        let hits = cascade.search_parents("nell");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["id"], "2");
        assert_eq!(cascade.child().generation(), 0);
    }
}
