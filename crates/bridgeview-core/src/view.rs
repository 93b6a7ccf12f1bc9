// ── View state machine ──
//
// Exactly one view is active at a time; that is a property of the type
// (a single `active` field), not of bookkeeping. Every activation or reload
// issues a fresh `LoadToken`; outcomes carrying an older token for the same
// scope are stale and get dropped.

use bridgeview_api::DocType;

/// The six top-level views, in tab order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumIter,
)]
pub enum ViewId {
    #[default]
    Dashboard,
    Sensors,
    #[strum(to_string = "MQTT")]
    Mqtt,
    Logs,
    Config,
    Docs,
}

impl ViewId {
    pub const ALL: [ViewId; 6] = [
        ViewId::Dashboard,
        ViewId::Sensors,
        ViewId::Mqtt,
        ViewId::Logs,
        ViewId::Config,
        ViewId::Docs,
    ];

    fn index(self) -> usize {
        match self {
            Self::Dashboard => 0,
            Self::Sensors => 1,
            Self::Mqtt => 2,
            Self::Logs => 3,
            Self::Config => 4,
            Self::Docs => 5,
        }
    }

    /// Number key (1-6) bound to this view.
    pub fn number(self) -> u8 {
        match self {
            Self::Dashboard => 1,
            Self::Sensors => 2,
            Self::Mqtt => 3,
            Self::Logs => 4,
            Self::Config => 5,
            Self::Docs => 6,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.number() == n)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// What a load belongs to: a top-level view or the sensor detail overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadScope {
    View(ViewId),
    SensorDetail,
}

/// Stamp carried by every fetch and echoed back by its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadToken {
    pub scope: LoadScope,
    pub seq: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    active: ViewId,
    doc_tab: DocType,
    next_seq: u64,
    latest: [u64; 6],
    latest_detail: u64,
}

impl ViewState {
    pub fn active(&self) -> ViewId {
        self.active
    }

    pub fn doc_tab(&self) -> DocType {
        self.doc_tab
    }

    /// Make `view` the active view and issue its load token.
    pub fn activate(&mut self, view: ViewId) -> LoadToken {
        self.active = view;
        self.issue(view)
    }

    /// Switch the docs sub-tab. Issues a docs token without changing the
    /// active view.
    pub fn select_doc_tab(&mut self, doc_tab: DocType) -> LoadToken {
        self.doc_tab = doc_tab;
        self.issue(ViewId::Docs)
    }

    /// New token for `view`, superseding every earlier one.
    pub fn issue(&mut self, view: ViewId) -> LoadToken {
        let seq = self.bump();
        self.latest[view.index()] = seq;
        LoadToken {
            scope: LoadScope::View(view),
            seq,
        }
    }

    pub fn issue_detail(&mut self) -> LoadToken {
        let seq = self.bump();
        self.latest_detail = seq;
        LoadToken {
            scope: LoadScope::SensorDetail,
            seq,
        }
    }

    /// Whether `token` is still the newest one for its scope.
    pub fn is_current(&self, token: LoadToken) -> bool {
        let latest = match token.scope {
            LoadScope::View(view) => self.latest[view.index()],
            LoadScope::SensorDetail => self.latest_detail,
        };
        token.seq == latest
    }

    fn bump(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn any_tab_sequence_leaves_one_active_view() {
        let mut state = ViewState::default();
        let sequence = [
            ViewId::Logs,
            ViewId::Logs,
            ViewId::Dashboard,
            ViewId::Docs,
            ViewId::Mqtt,
            ViewId::Sensors,
            ViewId::Config,
        ];
        for view in sequence {
            state.activate(view);
            assert_eq!(state.active(), view);
            let active: Vec<_> = ViewId::iter().filter(|v| *v == state.active()).collect();
            assert_eq!(active.len(), 1);
        }
    }

    #[test]
    fn reactivation_supersedes_earlier_token() {
        let mut state = ViewState::default();
        let first = state.activate(ViewId::Logs);
        let other = state.activate(ViewId::Sensors);
        assert!(state.is_current(first));
        let second = state.activate(ViewId::Logs);
        assert!(!state.is_current(first));
        assert!(state.is_current(second));
        assert!(state.is_current(other));
    }

    #[test]
    fn doc_tab_issues_docs_token_without_switching_view() {
        let mut state = ViewState::default();
        let docs = state.activate(ViewId::Docs);
        state.activate(ViewId::Dashboard);
        let tab = state.select_doc_tab(DocType::Conversion);
        assert_eq!(state.active(), ViewId::Dashboard);
        assert_eq!(state.doc_tab(), DocType::Conversion);
        assert!(!state.is_current(docs));
        assert_eq!(tab.scope, LoadScope::View(ViewId::Docs));
    }

    #[test]
    fn detail_tokens_are_independent_of_views() {
        let mut state = ViewState::default();
        let detail = state.issue_detail();
        state.activate(ViewId::Sensors);
        assert!(state.is_current(detail));
        state.issue_detail();
        assert!(!state.is_current(detail));
    }

    #[test]
    fn number_keys_and_cycling() {
        for view in ViewId::ALL {
            assert_eq!(ViewId::from_number(view.number()), Some(view));
            assert_eq!(view.next().prev(), view);
        }
        assert_eq!(ViewId::from_number(7), None);
        assert_eq!(ViewId::Docs.next(), ViewId::Dashboard);
        assert_eq!(ViewId::Mqtt.to_string(), "MQTT");
    }
}
